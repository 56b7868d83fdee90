//! The combinator engine
//!
//! # Module Organization
//!
//! ## Input
//! - [`stream`] - Persistent stream over the source text
//! - [`source_location`] - Line/column derivation from byte offsets
//!
//! ## Parsers
//! - [`parser`] - The parser value, application, and sequencing
//! - [`primitives`] - Terminal parsers (text, patterns, end of input, lookahead)
//! - [`choice`] - Ordered choice and failure aggregation
//! - [`repetition`] - Repetition and separated lists
//! - [`infix`] - Left/right associative operator chains
//! - [`lazy`] - Deferred construction for recursive rules
//! - [`state`] - Reading and rewriting the caller state
//!
//! ## Running
//! - [`run`] - Entry points and run configuration
//! - [`error`] - Run failures and serializable reports
//! - `regex_cache` - Per-thread store of compiled patterns (internal)

// ============================================================================
// Module Declarations
// ============================================================================

pub mod choice;
pub mod error;
pub mod infix;
pub mod lazy;
pub mod parser;
pub mod primitives;
mod regex_cache;
pub mod repetition;
pub mod run;
pub mod source_location;
pub mod state;
pub mod stream;

// ============================================================================
// Core Types
// ============================================================================

pub use parser::{Messages, Outcome, Parser, Reply};
pub use source_location::{offset_to_line_col, Location};
pub use stream::Stream;

// ============================================================================
// Composition
// ============================================================================

pub use parser::{ap, bind, map, map_err, pair, sequence};

// ============================================================================
// Primitives
// ============================================================================

pub use primitives::{
    any_char, between, consume_while, eof, fail, look_ahead, not_followed_by, position, re,
    recognize, str, succeed,
};

// ============================================================================
// Choice, Repetition, Chains
// ============================================================================

pub use choice::{choice, label, maybe, optional, or};
pub use infix::{chainl, chainr};
pub use repetition::{
    count, many, many1, many_till, sep_by, sep_by1, sep_end_by, sep_end_by1, skip, skip_many,
    skip_many1,
};

// ============================================================================
// Recursion and State
// ============================================================================

pub use lazy::{lazy, DEFAULT_MAX_RECURSION_DEPTH};
pub use state::{get_state, read_state, replace_state, transform_state};

// ============================================================================
// Running
// ============================================================================

pub use error::{Failure, FailureReport};
pub use run::{
    run, run_with_config, run_with_state, ParserConfig, RunResult, Success,
    DEFAULT_MAX_INPUT_SIZE,
};
