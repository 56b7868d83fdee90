//! Caller state primitives
//!
//! The state value rides alongside the stream through every combinator.
//! These parsers never fail and never consume input; they only read or
//! rewrite the state.

use super::parser::{Parser, Reply};

/// Choose the next parser by looking at the current state
pub fn read_state<'a, S, T, F>(f: F) -> Parser<'a, S, T>
where
    S: 'a,
    T: 'a,
    F: Fn(&S) -> Parser<'a, S, T> + 'a,
{
    Parser::new(move |state, stream| {
        let next = f(&state);
        next.apply(state, stream)
    })
}

/// Succeed with a copy of the current state
pub fn get_state<'a, S>() -> Parser<'a, S, S>
where
    S: Clone + 'a,
{
    Parser::new(|state: S, stream| Reply::ok(state.clone(), stream, state))
}

/// Discard the current state and install `new_state`
pub fn replace_state<'a, S>(new_state: S) -> Parser<'a, S, ()>
where
    S: Clone + 'a,
{
    Parser::new(move |_, stream| Reply::ok(new_state.clone(), stream, ()))
}

/// Replace the current state with `f(state)`
pub fn transform_state<'a, S, F>(f: F) -> Parser<'a, S, ()>
where
    S: 'a,
    F: Fn(S) -> S + 'a,
{
    Parser::new(move |state, stream| Reply::ok(f(state), stream, ()))
}
