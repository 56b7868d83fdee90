//! Prelude module for convenient imports
//!
//! Brings the parser type, every combinator and the run entry points into
//! scope:
//!
//! ```
//! use parsnip::prelude::*;
//! ```
//!
//! Note that this exports a function named `str`. It lives in the value
//! namespace, so the `str` type keeps working as usual.

// ============================================================================
// Core Types
// ============================================================================

pub use crate::engine::{Location, Messages, Outcome, Parser, Reply, Stream};

// ============================================================================
// Combinators
// ============================================================================

pub use crate::engine::{
    any_char, ap, between, bind, chainl, chainr, choice, consume_while, count, eof, fail,
    get_state, label, lazy, look_ahead, many, many1, many_till, map, map_err, maybe,
    not_followed_by, optional, or, pair, position, re, read_state, recognize, replace_state,
    sep_by, sep_by1, sep_end_by, sep_end_by1, sequence, skip, skip_many, skip_many1, str,
    succeed, transform_state,
};

// ============================================================================
// Running
// ============================================================================

pub use crate::engine::{
    run, run_with_config, run_with_state, Failure, FailureReport, ParserConfig, RunResult,
    Success,
};
