//! Operator chains for expression grammars
//!
//! `chainl` and `chainr` parse `operand (operator operand)*` where the
//! operator parser yields the function that combines two operands. Layering
//! one chain per precedence level gives a full expression grammar:
//!
//! ```rust
//! use parsnip::prelude::*;
//!
//! fn number<'a>() -> Parser<'a, (), i64> {
//!     re("[0-9]+").map(|digits: &str| digits.parse::<i64>().unwrap_or(0))
//! }
//!
//! fn op<'a>(symbol: &str, f: fn(i64, i64) -> i64) -> Parser<'a, (), fn(i64, i64) -> i64> {
//!     str(symbol).map(move |_| f)
//! }
//!
//! let power = chainr(op("^", |a, b| a.pow(b as u32)), number());
//! let product = chainl(op("*", |a, b| a * b), power);
//! let sum = chainl(op("+", |a, b| a + b).or(op("-", |a, b| a - b)), product);
//!
//! assert_eq!(run(&sum, "2^3^2-10-1*3").unwrap().value, 512 - 10 - 3);
//! ```
//!
//! An operator/operand pair that fails part way is undone and the chain
//! ends before it. Neither chain checks for progress: if both the operator
//! and the operand can match the empty string the chain never ends.

use super::parser::{Parser, Reply};
use super::stream::Stream;

/// Parse one operand, then any number of `(operator, operand)` pairs, combining
/// left to right: `a - b - c` is `(a - b) - c`.
pub fn chainl<'a, S, T, F>(operator: Parser<'a, S, F>, operand: Parser<'a, S, T>) -> Parser<'a, S, T>
where
    S: Clone + 'a,
    T: 'a,
    F: FnOnce(T, T) -> T + 'a,
{
    Parser::new(move |state, stream| {
        let Reply {
            mut state,
            mut stream,
            outcome,
        } = operand.apply(state, stream);
        let mut acc = match outcome {
            Ok(value) => value,
            Err(messages) => return Reply::err(state, stream, messages),
        };

        loop {
            let Some((f, rhs, next_state, next_stream)) =
                operator_then_operand(&operator, &operand, state.clone(), stream)
            else {
                break;
            };
            acc = f(acc, rhs);
            state = next_state;
            stream = next_stream;
        }

        Reply::ok(state, stream, acc)
    })
}

/// Parse one operand, then any number of `(operator, operand)` pairs, combining
/// right to left: `a ^ b ^ c` is `a ^ (b ^ c)`.
pub fn chainr<'a, S, T, F>(operator: Parser<'a, S, F>, operand: Parser<'a, S, T>) -> Parser<'a, S, T>
where
    S: Clone + 'a,
    T: 'a,
    F: FnOnce(T, T) -> T + 'a,
{
    Parser::new(move |state, stream| {
        let Reply {
            mut state,
            mut stream,
            outcome,
        } = operand.apply(state, stream);
        let mut last = match outcome {
            Ok(value) => value,
            Err(messages) => return Reply::err(state, stream, messages),
        };

        // Left operands waiting for everything to their right
        let mut pending: Vec<(T, F)> = Vec::new();
        loop {
            let Some((f, rhs, next_state, next_stream)) =
                operator_then_operand(&operator, &operand, state.clone(), stream)
            else {
                break;
            };
            pending.push((std::mem::replace(&mut last, rhs), f));
            state = next_state;
            stream = next_stream;
        }

        let mut acc = last;
        while let Some((lhs, f)) = pending.pop() {
            acc = f(lhs, acc);
        }
        Reply::ok(state, stream, acc)
    })
}

/// One `operator operand` step, or `None` if either half fails
fn operator_then_operand<'a, S, T, F>(
    operator: &Parser<'a, S, F>,
    operand: &Parser<'a, S, T>,
    state: S,
    stream: Stream<'a>,
) -> Option<(F, T, S, Stream<'a>)>
where
    S: 'a,
    T: 'a,
    F: 'a,
{
    let Reply {
        state,
        stream,
        outcome,
    } = operator.apply(state, stream);
    let f = outcome.ok()?;

    let Reply {
        state,
        stream,
        outcome,
    } = operand.apply(state, stream);
    let rhs = outcome.ok()?;

    Some((f, rhs, state, stream))
}
