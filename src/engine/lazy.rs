//! Deferred parser construction
//!
//! Grammar rules are ordinary values, so a rule that mentions itself (or a
//! sibling defined further down) cannot be built eagerly. [`lazy`] wraps the
//! construction in a thunk that runs on the first application and is cached
//! for every application after that.
//!
//! Applications of deferred parsers are also where grammar recursion
//! happens, so this is where nesting depth is counted against the
//! configured recursion limit.

use super::parser::{Parser, Reply};
use super::stream::Stream;
use once_cell::unsync::OnceCell;
use std::cell::{Cell, RefCell};

/// Default maximum nesting of deferred parser applications.
///
/// Each nesting level costs several native stack frames, so this is kept
/// well inside the 2 MB stack of a spawned thread. Raise it only for
/// threads with a larger stack.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 128;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static LIMIT: Cell<usize> = const { Cell::new(DEFAULT_MAX_RECURSION_DEPTH) };
    static IN_RUN: Cell<bool> = const { Cell::new(false) };
    static TRIPPED: Cell<Option<LimitExceeded>> = const { Cell::new(None) };
}

/// Where and how the recursion limit was first exceeded during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LimitExceeded {
    pub(crate) offset: usize,
    pub(crate) depth: usize,
    pub(crate) limit: usize,
}

impl LimitExceeded {
    pub(crate) fn message(&self) -> String {
        format!(
            "recursion limit exceeded: depth {} exceeds limit of {}",
            self.depth, self.limit
        )
    }
}

type Thunk<'a, S, T> = Box<dyn FnOnce() -> Parser<'a, S, T> + 'a>;

/// One-shot construction cell behind a deferred parser
pub(crate) struct Deferred<'a, S, T> {
    thunk: RefCell<Option<Thunk<'a, S, T>>>,
    forced: OnceCell<Parser<'a, S, T>>,
}

impl<S, T> Deferred<'_, S, T> {
    pub(crate) fn is_forced(&self) -> bool {
        self.forced.get().is_some()
    }
}

impl<'a, S: 'a, T: 'a> Deferred<'a, S, T> {
    fn new(thunk: Thunk<'a, S, T>) -> Self {
        Self {
            thunk: RefCell::new(Some(thunk)),
            forced: OnceCell::new(),
        }
    }

    /// Build the parser if needed and return it.
    ///
    /// Returns `None` only when the thunk is already running further up the
    /// call stack, i.e. the rule tried to apply itself while being built.
    fn force(&self) -> Option<&Parser<'a, S, T>> {
        if let Some(parser) = self.forced.get() {
            return Some(parser);
        }

        let thunk = self.thunk.borrow_mut().take()?;
        log_debug!("forcing deferred parser");
        let parser = thunk();

        // The thunk was taken above, so nothing else can have filled the cell.
        let _ = self.forced.set(parser);
        self.forced.get()
    }

    pub(crate) fn apply(&self, state: S, stream: Stream<'a>) -> Reply<'a, S, T> {
        // Once the limit has tripped inside a run, every deferred rule fails
        // at once so the whole run unwinds without further work.
        if let Some(tripped) = TRIPPED.with(Cell::get) {
            return Reply::err(state, stream, vec![tripped.message()]);
        }

        let guard = DepthGuard::enter();
        let depth = guard.depth();
        let limit = LIMIT.with(Cell::get);
        if limit > 0 && depth > limit {
            let exceeded = LimitExceeded {
                offset: stream.offset(),
                depth,
                limit,
            };
            log_debug!(
                "recursion limit exceeded at offset {}: depth {} > {}",
                exceeded.offset,
                depth,
                limit
            );
            if IN_RUN.with(Cell::get) {
                TRIPPED.with(|t| t.set(Some(exceeded)));
            }
            return Reply::err(state, stream, vec![exceeded.message()]);
        }

        match self.force() {
            Some(parser) => parser.apply(state, stream),
            None => Reply::err(
                state,
                stream,
                vec!["lazy parser applied while it was being constructed".to_string()],
            ),
        }
    }
}

/// Tracks how many deferred applications are currently on the stack
struct DepthGuard {
    depth: usize,
}

impl DepthGuard {
    fn enter() -> Self {
        let depth = DEPTH.with(|d| {
            let next = d.get() + 1;
            d.set(next);
            next
        });
        Self { depth }
    }

    fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Run `f` as one parse run with the deferred-recursion limit set to `limit`
/// (`0` means unlimited).
///
/// Exceeding the limit inside `f` is fatal for the run: the first excess is
/// recorded and returned next to `f`'s result. The previous limit and run
/// bookkeeping are restored afterwards, also on unwind, so runs may nest.
pub(crate) fn with_recursion_limit<R>(
    limit: usize,
    f: impl FnOnce() -> R,
) -> (R, Option<LimitExceeded>) {
    struct Restore {
        limit: usize,
        in_run: bool,
        tripped: Option<LimitExceeded>,
    }

    impl Drop for Restore {
        fn drop(&mut self) {
            LIMIT.with(|l| l.set(self.limit));
            IN_RUN.with(|r| r.set(self.in_run));
            TRIPPED.with(|t| t.set(self.tripped));
        }
    }

    let _restore = Restore {
        limit: LIMIT.with(|l| l.replace(limit)),
        in_run: IN_RUN.with(|r| r.replace(true)),
        tripped: TRIPPED.with(|t| t.replace(None)),
    };
    let result = f();
    let tripped = TRIPPED.with(|t| t.take());
    (result, tripped)
}

/// Defer building a parser until it is first applied.
///
/// `thunk` runs at most once per `lazy` value; clones share the result.
/// This is the way to write rules that refer to themselves:
///
/// ```rust
/// use parsnip::prelude::*;
///
/// // parens ::= "(" parens ")" | ""
/// fn parens<'a>() -> Parser<'a, (), usize> {
///     lazy(|| {
///         between(str("("), str(")"), parens())
///             .map(|depth| depth + 1)
///             .or(succeed(0))
///     })
/// }
///
/// let result = run(&parens(), "((()))").unwrap();
/// assert_eq!(result.value, 3);
/// ```
pub fn lazy<'a, S, T, F>(thunk: F) -> Parser<'a, S, T>
where
    S: 'a,
    T: 'a,
    F: FnOnce() -> Parser<'a, S, T> + 'a,
{
    Parser::from_deferred(Deferred::new(Box::new(thunk)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::choice::or;
    use crate::engine::primitives::{str, succeed};
    use std::rc::Rc;

    #[test]
    fn test_thunk_not_run_at_construction() {
        let runs = Rc::new(Cell::new(0));
        let seen = Rc::clone(&runs);
        let _parser: Parser<'_, (), &str> = lazy(move || {
            seen.set(seen.get() + 1);
            str("a")
        });
        assert_eq!(runs.get(), 0);
    }

    #[test]
    fn test_thunk_runs_once() {
        let runs = Rc::new(Cell::new(0));
        let seen = Rc::clone(&runs);
        let parser: Parser<'_, (), &str> = lazy(move || {
            seen.set(seen.get() + 1);
            str("a")
        });

        let first = parser.apply((), Stream::new("a"));
        let second = parser.apply((), Stream::new("a"));
        let copy = parser.clone();
        let third = copy.apply((), Stream::new("b"));

        assert_eq!(first.outcome, Ok("a"));
        assert_eq!(second.outcome, Ok("a"));
        assert!(third.outcome.is_err());
        assert_eq!(runs.get(), 1);
        assert!(format!("{:?}", parser).contains("forced"));
    }

    fn nested<'a>() -> Parser<'a, (), usize> {
        lazy(|| or(str("(").then(nested()).map(|n| n + 1), succeed(0)))
    }

    #[test]
    fn test_self_reference() {
        let reply = nested().apply((), Stream::new("((((x"));
        assert_eq!(reply.outcome, Ok(4));
        assert_eq!(reply.stream.remaining(), "x");
    }

    #[test]
    fn test_recursion_limit() {
        let input = "(".repeat(50);
        let (reply, tripped) = with_recursion_limit(10, || nested().apply((), Stream::new(&input)));
        // The enclosing `or`s still fall back, but the run records the excess.
        assert_eq!(reply.outcome, Ok(9));
        assert_eq!(
            tripped,
            Some(LimitExceeded {
                offset: 10,
                depth: 11,
                limit: 10,
            })
        );
        assert_eq!(DEPTH.with(Cell::get), 0);
        assert_eq!(LIMIT.with(Cell::get), DEFAULT_MAX_RECURSION_DEPTH);
        assert_eq!(TRIPPED.with(Cell::get), None);
        assert!(!IN_RUN.with(Cell::get));
    }

    #[test]
    fn test_tripped_limit_short_circuits_later_rules() {
        let input = format!("{})", "(".repeat(20));
        let builds = Rc::new(Cell::new(0));
        let seen = Rc::clone(&builds);
        let close: Parser<'_, (), &str> = lazy(move || {
            seen.set(seen.get() + 1);
            str(")")
        });
        let parser = nested().then(close.clone());

        let (reply, tripped) = with_recursion_limit(3, || parser.apply((), Stream::new(&input)));
        assert_eq!(
            reply.outcome,
            Err(vec!["recursion limit exceeded: depth 4 exceeds limit of 3".to_string()])
        );
        assert_eq!(tripped.map(|t| t.offset), Some(3));
        assert_eq!(builds.get(), 0);

        // A fresh run starts clean.
        let (reply, tripped) = with_recursion_limit(3, || close.apply((), Stream::new(")")));
        assert_eq!(reply.outcome, Ok(")"));
        assert_eq!(tripped, None);
        assert_eq!(builds.get(), 1);
    }

    #[test]
    fn test_zero_limit_is_unlimited() {
        let input = "(".repeat(150);
        let (reply, tripped) = with_recursion_limit(0, || nested().apply((), Stream::new(&input)));
        assert_eq!(reply.outcome, Ok(150));
        assert_eq!(tripped, None);
    }

    #[test]
    fn test_limit_outside_run_is_not_sticky() {
        let input = "(".repeat(DEFAULT_MAX_RECURSION_DEPTH + 5);
        let reply = nested().apply((), Stream::new(&input));
        assert_eq!(reply.outcome, Ok(DEFAULT_MAX_RECURSION_DEPTH - 1));
        assert_eq!(TRIPPED.with(Cell::get), None);

        let reply = nested().apply((), Stream::new("((x"));
        assert_eq!(reply.outcome, Ok(2));
    }

    #[test]
    fn test_reentrant_force_fails_instead_of_panicking() {
        let slot: Rc<RefCell<Option<Parser<'static, (), &'static str>>>> =
            Rc::new(RefCell::new(None));
        let inner = Rc::clone(&slot);
        let parser: Parser<'static, (), &'static str> = lazy(move || {
            let me = inner.borrow().clone();
            match me {
                Some(me) => {
                    let reply = me.apply((), Stream::new("a"));
                    assert!(reply.outcome.is_err());
                    str("a")
                }
                None => str("a"),
            }
        });
        *slot.borrow_mut() = Some(parser.clone());

        let reply = parser.apply((), Stream::new("a"));
        assert_eq!(reply.outcome, Ok("a"));
        // Break the cycle so the test does not leak.
        slot.borrow_mut().take();
    }
}
