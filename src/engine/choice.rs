//! Ordered choice and failure aggregation
//!
//! Alternatives are tried left to right, each from the state and stream the
//! choice started with. When every alternative fails, their messages are
//! concatenated in order (no deduplication) and the choice fails at its
//! starting point.

use super::parser::{Messages, Parser, Reply};
use super::primitives::succeed;

impl<'a, S: Clone + 'a, T: 'a> Parser<'a, S, T> {
    /// Try `self`, and if it fails try `other` from the same starting point
    pub fn or(self, other: Parser<'a, S, T>) -> Self {
        or(self, other)
    }
}

/// Try `left`; if it fails, try `right` from the original state and stream.
///
/// If both fail, the messages are `left ++ right` and the reply carries the
/// original state and stream.
pub fn or<'a, S, T>(left: Parser<'a, S, T>, right: Parser<'a, S, T>) -> Parser<'a, S, T>
where
    S: Clone + 'a,
    T: 'a,
{
    Parser::new(move |state: S, stream| {
        let mut messages = match left.apply(state.clone(), stream) {
            Reply {
                outcome: Err(messages),
                ..
            } => messages,
            success => return success,
        };

        match right.apply(state.clone(), stream) {
            Reply {
                outcome: Err(more),
                ..
            } => {
                messages.extend(more);
                Reply::err(state, stream, messages)
            }
            success => success,
        }
    })
}

/// Try each parser in turn; the first success wins.
///
/// An empty list always fails with no messages.
pub fn choice<'a, S, T>(parsers: Vec<Parser<'a, S, T>>) -> Parser<'a, S, T>
where
    S: Clone + 'a,
    T: 'a,
{
    Parser::new(move |state: S, stream| {
        let mut messages = Messages::new();
        for parser in &parsers {
            match parser.apply(state.clone(), stream) {
                Reply {
                    outcome: Err(more),
                    ..
                } => messages.extend(more),
                success => return success,
            }
        }
        Reply::err(state, stream, messages)
    })
}

/// Run `parser`, falling back to `default` (consuming nothing) on failure
pub fn optional<'a, S, T>(default: T, parser: Parser<'a, S, T>) -> Parser<'a, S, T>
where
    S: Clone + 'a,
    T: Clone + 'a,
{
    or(parser, succeed(default))
}

/// Turn failure into `None`.
///
/// Never fails. On failure the messages are dropped and the reply carries the
/// state and stream `maybe` started with.
pub fn maybe<'a, S, T>(parser: Parser<'a, S, T>) -> Parser<'a, S, Option<T>>
where
    S: Clone + 'a,
    T: 'a,
{
    Parser::new(move |state: S, stream| {
        let reply = parser.apply(state.clone(), stream);
        match reply.outcome {
            Ok(value) => Reply::ok(reply.state, reply.stream, Some(value)),
            Err(_) => Reply::ok(state, stream, None),
        }
    })
}

/// Replace every failure message of `parser` with `expected <name>`
pub fn label<'a, S, T>(name: &str, parser: Parser<'a, S, T>) -> Parser<'a, S, T>
where
    S: 'a,
    T: 'a,
{
    let message = format!("expected {}", name);
    parser.map_err(move |_| vec![message.clone()])
}
