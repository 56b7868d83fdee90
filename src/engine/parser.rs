//! Parser values and core composition
//!
//! A [`Parser`] is an immutable, cheaply clonable value that maps
//! `(state, stream)` to a [`Reply`]. It has two shapes: an immediate
//! transformer, or a deferred one built on first use (see
//! [`lazy`](super::lazy::lazy)). Every combinator in this crate is built from
//! [`Parser::new`], [`Parser::apply`] and [`Parser::bind`].

use super::lazy::Deferred;
use super::stream::Stream;
use std::fmt;
use std::rc::Rc;

/// Ordered failure messages. Never deduplicated.
pub type Messages = Vec<String>;

/// Result of a single parser application
pub type Outcome<T> = Result<T, Messages>;

/// What a parser hands back: the state and stream to continue from, plus
/// either a value or the reasons it failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<'a, S, T> {
    /// Caller state after the application
    pub state: S,
    /// Stream after the application
    pub stream: Stream<'a>,
    /// Value or failure messages
    pub outcome: Outcome<T>,
}

impl<'a, S, T> Reply<'a, S, T> {
    /// A successful reply
    #[inline]
    pub fn ok(state: S, stream: Stream<'a>, value: T) -> Self {
        Self {
            state,
            stream,
            outcome: Ok(value),
        }
    }

    /// A failed reply
    #[inline]
    pub fn err(state: S, stream: Stream<'a>, messages: Messages) -> Self {
        Self {
            state,
            stream,
            outcome: Err(messages),
        }
    }

    /// Did the application succeed?
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Transform the value, leaving state and stream alone
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<'a, S, U> {
        Reply {
            state: self.state,
            stream: self.stream,
            outcome: self.outcome.map(f),
        }
    }

    /// Transform the failure messages, leaving state and stream alone
    #[inline]
    pub fn map_err(self, f: impl FnOnce(Messages) -> Messages) -> Self {
        Reply {
            state: self.state,
            stream: self.stream,
            outcome: self.outcome.map_err(f),
        }
    }
}

type ParseFn<'a, S, T> = dyn Fn(S, Stream<'a>) -> Reply<'a, S, T> + 'a;

pub(crate) enum Repr<'a, S, T> {
    Immediate(Box<ParseFn<'a, S, T>>),
    Deferred(Deferred<'a, S, T>),
}

/// A composable parser over source text borrowed for `'a`, threading a
/// caller state `S` and producing values of type `T`.
///
/// Cloning is a reference-count bump; the underlying definition is shared.
pub struct Parser<'a, S, T> {
    repr: Rc<Repr<'a, S, T>>,
}

impl<S, T> Clone for Parser<'_, S, T> {
    fn clone(&self) -> Self {
        Self {
            repr: Rc::clone(&self.repr),
        }
    }
}

impl<S, T> fmt::Debug for Parser<'_, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match &*self.repr {
            Repr::Immediate(_) => "immediate",
            Repr::Deferred(d) if d.is_forced() => "deferred (forced)",
            Repr::Deferred(_) => "deferred",
        };
        write!(f, "Parser({})", shape)
    }
}

impl<'a, S: 'a, T: 'a> Parser<'a, S, T> {
    /// Build a parser from a raw state/stream transformer.
    ///
    /// The function must hand back the stream it received whenever it
    /// fails, unless it is deliberately reporting a failure further on.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(S, Stream<'a>) -> Reply<'a, S, T> + 'a,
    {
        Self {
            repr: Rc::new(Repr::Immediate(Box::new(f))),
        }
    }

    pub(crate) fn from_deferred(deferred: Deferred<'a, S, T>) -> Self {
        Self {
            repr: Rc::new(Repr::Deferred(deferred)),
        }
    }

    /// Run this parser against `stream` with `state`.
    ///
    /// Deferred parsers are built on their first application and the built
    /// parser is reused afterwards.
    #[inline]
    pub fn apply(&self, state: S, stream: Stream<'a>) -> Reply<'a, S, T> {
        match &*self.repr {
            Repr::Immediate(f) => f(state, stream),
            Repr::Deferred(deferred) => deferred.apply(state, stream),
        }
    }

    /// Transform the value of a successful parse
    pub fn map<U, F>(self, f: F) -> Parser<'a, S, U>
    where
        U: 'a,
        F: Fn(T) -> U + 'a,
    {
        Parser::new(move |state, stream| self.apply(state, stream).map(&f))
    }

    /// Transform the messages of a failed parse
    pub fn map_err<F>(self, f: F) -> Self
    where
        F: Fn(Messages) -> Messages + 'a,
    {
        Parser::new(move |state, stream| self.apply(state, stream).map_err(&f))
    }

    /// Sequential composition: on success feed the value to `f` and run the
    /// parser it returns from where this one stopped. On failure `f` is never
    /// called and the failure is returned as is.
    pub fn bind<U, F>(self, f: F) -> Parser<'a, S, U>
    where
        U: 'a,
        F: Fn(T) -> Parser<'a, S, U> + 'a,
    {
        Parser::new(move |state, stream| {
            let Reply {
                state,
                stream,
                outcome,
            } = self.apply(state, stream);
            match outcome {
                Ok(value) => f(value).apply(state, stream),
                Err(messages) => Reply::err(state, stream, messages),
            }
        })
    }

    /// Run `self` then `next`, keeping the value of `next`
    pub fn then<U: 'a>(self, next: Parser<'a, S, U>) -> Parser<'a, S, U> {
        Parser::new(move |state, stream| {
            let Reply {
                state,
                stream,
                outcome,
            } = self.apply(state, stream);
            match outcome {
                Ok(_) => next.apply(state, stream),
                Err(messages) => Reply::err(state, stream, messages),
            }
        })
    }

    /// Run `self` then `next`, keeping the value of `self`
    pub fn skip_right<U: 'a>(self, next: Parser<'a, S, U>) -> Self {
        pair(self, next).map(|(value, _)| value)
    }
}

/// Free-function form of [`Parser::map`]
pub fn map<'a, S, T, U, F>(f: F, parser: Parser<'a, S, T>) -> Parser<'a, S, U>
where
    S: 'a,
    T: 'a,
    U: 'a,
    F: Fn(T) -> U + 'a,
{
    parser.map(f)
}

/// Free-function form of [`Parser::map_err`]
pub fn map_err<'a, S, T, F>(f: F, parser: Parser<'a, S, T>) -> Parser<'a, S, T>
where
    S: 'a,
    T: 'a,
    F: Fn(Messages) -> Messages + 'a,
{
    parser.map_err(f)
}

/// Free-function form of [`Parser::bind`]
pub fn bind<'a, S, T, U, F>(f: F, parser: Parser<'a, S, T>) -> Parser<'a, S, U>
where
    S: 'a,
    T: 'a,
    U: 'a,
    F: Fn(T) -> Parser<'a, S, U> + 'a,
{
    parser.bind(f)
}

/// Run `first` then `second` and keep both values
pub fn pair<'a, S, A, B>(first: Parser<'a, S, A>, second: Parser<'a, S, B>) -> Parser<'a, S, (A, B)>
where
    S: 'a,
    A: 'a,
    B: 'a,
{
    Parser::new(move |state, stream| {
        let Reply {
            state,
            stream,
            outcome,
        } = first.apply(state, stream);
        match outcome {
            Ok(a) => second.apply(state, stream).map(|b| (a, b)),
            Err(messages) => Reply::err(state, stream, messages),
        }
    })
}

/// Run a parser producing a function, then a parser producing its argument,
/// and apply one to the other.
///
/// Chaining `ap` over curried closures accumulates multi-argument results
/// without naming intermediate values.
pub fn ap<'a, S, A, B, F>(function: Parser<'a, S, F>, value: Parser<'a, S, A>) -> Parser<'a, S, B>
where
    S: 'a,
    A: 'a,
    B: 'a,
    F: FnOnce(A) -> B + 'a,
{
    pair(function, value).map(|(f, a)| f(a))
}

/// Run each parser in order, collecting the values.
///
/// Stops at the first failure and returns it; later parsers are not tried.
pub fn sequence<'a, S, T>(parsers: Vec<Parser<'a, S, T>>) -> Parser<'a, S, Vec<T>>
where
    S: 'a,
    T: 'a,
{
    Parser::new(move |mut state, mut stream| {
        let mut values = Vec::with_capacity(parsers.len());
        for parser in &parsers {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::primitives::{fail, str, succeed};

    #[test]
    fn test_apply_immediate() {
        let parser: Parser<'_, (), &str> = str("ab");
        let reply = parser.apply((), Stream::new("abc"));
        assert_eq!(reply.outcome, Ok("ab"));
        assert_eq!(reply.stream.remaining(), "c");
    }

    #[test]
    fn test_map_transforms_value_only() {
        let parser: Parser<'_, (), usize> = str("abc").map(|s: &str| s.len());
        let reply = parser.apply((), Stream::new("abcd"));
        assert_eq!(reply.outcome, Ok(3));
        assert_eq!(reply.stream.offset(), 3);
    }

    #[test]
    fn test_map_passes_failure_through() {
        let parser: Parser<'_, (), usize> = str("abc").map(|s: &str| s.len());
        let reply = parser.apply((), Stream::new("xyz"));
        assert_eq!(reply.outcome, Err(vec!["expected \"abc\"".to_string()]));
        assert_eq!(reply.stream.offset(), 0);
    }

    #[test]
    fn test_map_err_transforms_messages_only() {
        let parser: Parser<'_, (), &str> =
            str("abc").map_err(|m| m.into_iter().map(|s| s.to_uppercase()).collect());
        let reply = parser.apply((), Stream::new("x"));
        assert_eq!(reply.outcome, Err(vec!["EXPECTED \"ABC\"".to_string()]));

        let ok = parser.apply((), Stream::new("abc"));
        assert_eq!(ok.outcome, Ok("abc"));
    }

    #[test]
    fn test_bind_short_circuits() {
        use std::cell::Cell;
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let parser: Parser<'_, (), &str> = str("a").bind(move |_| {
            seen.set(seen.get() + 1);
            str("b")
        });

        let reply = parser.apply((), Stream::new("xb"));
        assert!(!reply.is_ok());
        assert_eq!(calls.get(), 0);

        let reply = parser.apply((), Stream::new("ab"));
        assert_eq!(reply.outcome, Ok("b"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_bind_failure_after_first_keeps_advanced_stream() {
        let parser: Parser<'_, (), &str> = str("a").bind(|_| str("b"));
        let reply = parser.apply((), Stream::new("ac"));
        assert_eq!(reply.stream.offset(), 1);
        assert_eq!(reply.outcome, Err(vec!["expected \"b\"".to_string()]));
    }

    #[test]
    fn test_ap_applies_function() {
        let join = succeed::<(), _>(|a: String| move |b: String| a + &b);
        let parser = ap(
            ap(join, str("x").map(String::from)),
            str("y").map(String::from),
        );
        let reply = parser.apply((), Stream::new("xy"));
        assert_eq!(reply.outcome, Ok("xy".to_string()));
    }

    #[test]
    fn test_sequence_collects_in_order() {
        let parser: Parser<'_, (), Vec<&str>> = sequence(vec![str("a"), str("b"), str("c")]);
        let reply = parser.apply((), Stream::new("abcd"));
        assert_eq!(reply.outcome, Ok(vec!["a", "b", "c"]));
        assert_eq!(reply.stream.remaining(), "d");
    }

    #[test]
    fn test_sequence_stops_at_first_failure() {
        let parser: Parser<'_, (), Vec<&str>> =
            sequence(vec![str("a"), fail("boom"), str("never")]);
        let reply = parser.apply((), Stream::new("a"));
        assert_eq!(reply.outcome, Err(vec!["boom".to_string()]));
        assert_eq!(reply.stream.offset(), 1);
    }

    #[test]
    fn test_then_and_skip_right() {
        let right: Parser<'_, (), &str> = str("(").then(str("x"));
        assert_eq!(right.apply((), Stream::new("(x")).outcome, Ok("x"));

        let left: Parser<'_, (), &str> = str("x").skip_right(str(";"));
        let reply = left.apply((), Stream::new("x;"));
        assert_eq!(reply.outcome, Ok("x"));
        assert!(reply.stream.is_at_end());
    }

    #[test]
    fn test_debug_shape() {
        let parser: Parser<'_, (), &str> = str("a");
        assert_eq!(format!("{:?}", parser), "Parser(immediate)");
    }
}
