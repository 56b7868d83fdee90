//! Primitive terminal parsers
//!
//! Every primitive either consumes a prefix of the remaining input and
//! succeeds with a new stream, or fails and hands back exactly the stream it
//! was given.

use super::parser::{Parser, Reply};
use super::regex_cache;
use super::source_location::Location;

/// Always succeed with `value`, consuming nothing
pub fn succeed<'a, S, T>(value: T) -> Parser<'a, S, T>
where
    S: 'a,
    T: Clone + 'a,
{
    Parser::new(move |state, stream| Reply::ok(state, stream, value.clone()))
}

/// Always fail with `message`, consuming nothing
pub fn fail<'a, S, T>(message: impl Into<String>) -> Parser<'a, S, T>
where
    S: 'a,
    T: 'a,
{
    let message = message.into();
    Parser::new(move |state, stream| Reply::err(state, stream, vec![message.clone()]))
}

/// Match `expected` exactly.
///
/// On failure the message is `expected "<expected>"`.
pub fn str<'a, S: 'a>(expected: &str) -> Parser<'a, S, &'a str> {
    let expected = expected.to_string();
    let message = format!("expected \"{}\"", expected);
    Parser::new(move |state, stream| {
        if stream.remaining().starts_with(expected.as_str()) {
            let next = stream.advance(expected.len());
            Reply::ok(state, next, stream.consumed_until(&next))
        } else {
            Reply::err(state, stream, vec![message.clone()])
        }
    })
}

/// Match a regular expression anchored at the current position.
///
/// The pattern is compiled when the parser is built, at most once per
/// thread. An invalid pattern produces a parser that always fails with
/// `invalid pattern "<pattern>"`; a pattern that does not match fails with
/// `expected pattern "<pattern>"`. Matching follows the `regex` crate's
/// leftmost-first semantics, so greedy quantifiers take the longest prefix.
pub fn re<'a, S: 'a>(pattern: &str) -> Parser<'a, S, &'a str> {
    match regex_cache::anchored(pattern) {
        Some(regex) => {
            let message = format!("expected pattern \"{}\"", pattern);
            Parser::new(move |state, stream| match regex.find(stream.remaining()) {
                Some(found) => {
                    let next = stream.advance(found.end());
                    Reply::ok(state, next, found.as_str())
                }
                None => Reply::err(state, stream, vec![message.clone()]),
            })
        }
        None => fail(format!("invalid pattern \"{}\"", pattern)),
    }
}

/// Consume leading characters while `predicate` holds.
///
/// Never fails; the value may be empty.
pub fn consume_while<'a, S, F>(predicate: F) -> Parser<'a, S, &'a str>
where
    S: 'a,
    F: Fn(char) -> bool + 'a,
{
    Parser::new(move |state, stream| {
        let remaining = stream.remaining();
        let len = remaining
            .char_indices()
            .find(|&(_, c)| !predicate(c))
            .map_or(remaining.len(), |(idx, _)| idx);
        let next = stream.advance(len);
        Reply::ok(state, next, &remaining[..len])
    })
}

/// Succeed with `()` only when no input remains
pub fn eof<'a, S: 'a>() -> Parser<'a, S, ()> {
    Parser::new(|state, stream| {
        if stream.is_at_end() {
            Reply::ok(state, stream, ())
        } else {
            Reply::err(state, stream, vec!["expected end of input".to_string()])
        }
    })
}

/// Consume exactly one character
pub fn any_char<'a, S: 'a>() -> Parser<'a, S, char> {
    Parser::new(|state, stream| match stream.remaining().chars().next() {
        Some(c) => Reply::ok(state, stream.advance(c.len_utf8()), c),
        None => Reply::err(state, stream, vec!["unexpected end of input".to_string()]),
    })
}

/// Run `parser` without consuming input.
///
/// On success the value (and any state change) is kept but the stream is
/// rewound to where `look_ahead` started. Failures are returned untouched.
pub fn look_ahead<'a, S, T>(parser: Parser<'a, S, T>) -> Parser<'a, S, T>
where
    S: 'a,
    T: 'a,
{
    Parser::new(move |state, stream| {
        let reply = parser.apply(state, stream);
        match reply.outcome {
            Ok(value) => Reply::ok(reply.state, stream, value),
            Err(messages) => Reply::err(reply.state, reply.stream, messages),
        }
    })
}

/// Succeed with `()` without consuming input iff `parser` fails here.
///
/// When `parser` matches, the failure reads `unexpected "<matched text>"` and
/// both state and stream are the ones `not_followed_by` received.
pub fn not_followed_by<'a, S, T>(parser: Parser<'a, S, T>) -> Parser<'a, S, ()>
where
    S: Clone + 'a,
    T: 'a,
{
    Parser::new(move |state: S, stream| {
        let reply = parser.apply(state.clone(), stream);
        if reply.is_ok() {
            let found = stream.consumed_until(&reply.stream);
            Reply::err(state, stream, vec![format!("unexpected \"{}\"", found)])
        } else {
            Reply::ok(state, stream, ())
        }
    })
}

/// Succeed with the current location, consuming nothing
pub fn position<'a, S: 'a>() -> Parser<'a, S, Location<'a>> {
    Parser::new(|state, stream| Reply::ok(state, stream, stream.location()))
}

/// Run `parser` and succeed with the slice of input it consumed
pub fn recognize<'a, S, T>(parser: Parser<'a, S, T>) -> Parser<'a, S, &'a str>
where
    S: 'a,
    T: 'a,
{
    Parser::new(move |state, stream| {
        let reply = parser.apply(state, stream);
        let consumed = stream.consumed_until(&reply.stream);
        reply.map(|_| consumed)
    })
}

/// Run `open`, `parser` and `close` in order, keeping the value of `parser`
pub fn between<'a, S, A, B, T>(
    open: Parser<'a, S, A>,
    close: Parser<'a, S, B>,
    parser: Parser<'a, S, T>,
) -> Parser<'a, S, T>
where
    S: 'a,
    A: 'a,
    B: 'a,
    T: 'a,
{
    open.then(parser).skip_right(close)
}
