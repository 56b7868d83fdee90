//! Repetition and separated lists
//!
//! All loops here are iterative, so long repetitions do not grow the call
//! stack. `many` and everything built on it stop at the first failure and at
//! the first success that does not move the stream; without that check a
//! parser that can match the empty string would loop forever.

use super::parser::{Parser, Reply};
use super::stream::Stream;

/// Apply `parser` repeatedly, pushing values until it fails or stops
/// making progress. A failed step leaves the state and stream of the last
/// good step; a step that succeeds without consuming input ends the loop
/// with its state kept and its value dropped.
fn repeat<'a, S, T>(
    parser: &Parser<'a, S, T>,
    mut state: S,
    mut stream: Stream<'a>,
    values: &mut Vec<T>,
) -> (S, Stream<'a>)
where
    S: Clone + 'a,
    T: 'a,
{
    loop {
        let Reply {
            state: next_state,
            stream: next_stream,
            outcome,
        } = parser.apply(state.clone(), stream);
        match outcome {
            Ok(value) if next_stream != stream => {
                values.push(value);
                state = next_state;
                stream = next_stream;
            }
            Ok(_) => return (next_state, next_stream),
            Err(_) => return (state, stream),
        }
    }
}

/// Zero or more applications of `parser`.
///
/// Always succeeds. Stops when `parser` fails (the failure and its state are
/// dropped) or when it succeeds without consuming input (that value is
/// dropped, the state it produced is kept).
pub fn many<'a, S, T>(parser: Parser<'a, S, T>) -> Parser<'a, S, Vec<T>>
where
    S: Clone + 'a,
    T: 'a,
{
    Parser::new(move |state, stream| {
        let mut values = Vec::new();
        let (state, stream) = repeat(&parser, state, stream, &mut values);
        Reply::ok(state, stream, values)
    })
}

/// One or more applications of `parser`. Fails iff the first one fails.
pub fn many1<'a, S, T>(parser: Parser<'a, S, T>) -> Parser<'a, S, Vec<T>>
where
    S: Clone + 'a,
    T: 'a,
{
    Parser::new(move |state, stream| {
        let Reply {
            state,
            stream,
            outcome,
        } = parser.apply(state, stream);
        let first = match outcome {
            Ok(value) => value,
            Err(messages) => return Reply::err(state, stream, messages),
        };
        let mut values = vec![first];
        let (state, stream) = repeat(&parser, state, stream, &mut values);
        Reply::ok(state, stream, values)
    })
}

/// Apply `parser` until `end` matches.
///
/// Each round tries `end` first; if it succeeds its consumption is kept and
/// the collected values are returned. Otherwise `parser` runs, and a failure
/// of `parser` fails the whole combinator with that failure. There is no
/// progress check: a zero-width `parser` that never lets `end` match will
/// not terminate.
pub fn many_till<'a, S, T, E>(parser: Parser<'a, S, T>, end: Parser<'a, S, E>) -> Parser<'a, S, Vec<T>>
where
    S: Clone + 'a,
    T: 'a,
    E: 'a,
{
    Parser::new(move |mut state: S, mut stream| {
        let mut values = Vec::new();
        loop {
            let finished = end.apply(state.clone(), stream);
            if finished.is_ok() {
                return Reply::ok(finished.state, finished.stream, values);
            }

            let Reply {
                state: next_state,
                stream: next_stream,
                outcome,
            } = parser.apply(state, stream);
            match outcome {
                Ok(value) => values.push(value),
                Err(messages) => return Reply::err(next_state, next_stream, messages),
            }
            state = next_state;
            stream = next_stream;
        }
    })
}

/// One or more `item`s separated by `separator`; separator values are dropped.
///
/// A separator that is not followed by an item is left unconsumed.
pub fn sep_by1<'a, S, T, U>(separator: Parser<'a, S, U>, item: Parser<'a, S, T>) -> Parser<'a, S, Vec<T>>
where
    S: Clone + 'a,
    T: 'a,
    U: 'a,
{
    let tail = separator.then(item.clone());
    Parser::new(move |state, stream| {
        let Reply {
            state,
            stream,
            outcome,
        } = item.apply(state, stream);
        let first = match outcome {
            Ok(value) => value,
            Err(messages) => return Reply::err(state, stream, messages),
        };
        let mut values = vec![first];
        let (state, stream) = repeat(&tail, state, stream, &mut values);
        Reply::ok(state, stream, values)
    })
}

/// Zero or more `item`s separated by `separator`
pub fn sep_by<'a, S, T, U>(separator: Parser<'a, S, U>, item: Parser<'a, S, T>) -> Parser<'a, S, Vec<T>>
where
    S: Clone + 'a,
    T: 'a,
    U: 'a,
{
    or_empty(sep_by1(separator, item))
}

/// One or more `item`s separated by `separator`, with an optional trailing
/// separator
pub fn sep_end_by1<'a, S, T, U>(
    separator: Parser<'a, S, U>,
    item: Parser<'a, S, T>,
) -> Parser<'a, S, Vec<T>>
where
    S: Clone + 'a,
    T: 'a,
    U: 'a,
{
    let trailing = super::choice::maybe(separator.clone());
    sep_by1(separator, item).skip_right(trailing)
}

/// Zero or more `item`s separated by `separator`, with an optional trailing
/// separator after at least one item
pub fn sep_end_by<'a, S, T, U>(
    separator: Parser<'a, S, U>,
    item: Parser<'a, S, T>,
) -> Parser<'a, S, Vec<T>>
where
    S: Clone + 'a,
    T: 'a,
    U: 'a,
{
    or_empty(sep_end_by1(separator, item))
}

/// Succeed with an empty list (at the starting point) if `parser` fails
fn or_empty<'a, S, T>(parser: Parser<'a, S, Vec<T>>) -> Parser<'a, S, Vec<T>>
where
    S: Clone + 'a,
    T: 'a,
{
    Parser::new(move |state: S, stream| {
        let reply = parser.apply(state.clone(), stream);
        if reply.is_ok() {
            reply
        } else {
            Reply::ok(state, stream, Vec::new())
        }
    })
}

/// Run `parser` and throw its value away
pub fn skip<'a, S, T>(parser: Parser<'a, S, T>) -> Parser<'a, S, ()>
where
    S: 'a,
    T: 'a,
{
    parser.map(|_| ())
}

/// [`many`] without collecting values
pub fn skip_many<'a, S, T>(parser: Parser<'a, S, T>) -> Parser<'a, S, ()>
where
    S: Clone + 'a,
    T: 'a,
{
    skip(many(parser))
}

/// [`many1`] without collecting values
pub fn skip_many1<'a, S, T>(parser: Parser<'a, S, T>) -> Parser<'a, S, ()>
where
    S: Clone + 'a,
    T: 'a,
{
    skip(many1(parser))
}

/// Apply `parser` exactly `n` times.
///
/// `n == 0` succeeds with an empty list without running `parser`. The first
/// failure is returned exactly as `parser` produced it.
pub fn count<'a, S, T>(n: usize, parser: Parser<'a, S, T>) -> Parser<'a, S, Vec<T>>
where
    S: 'a,
    T: 'a,
{
    Parser::new(move |mut state, mut stream| {
        let mut values = Vec::with_capacity(n);
        for _ in 0..n {
            let reply = parser.apply(state, stream);
            match reply.outcome {
                Ok(value) => values.push(value),
                Err(messages) => return Reply::err(reply.state, reply.stream, messages),
            }
            state = reply.state;
            stream = reply.stream;
        }
        Reply::ok(state, stream, values)
    })
}
