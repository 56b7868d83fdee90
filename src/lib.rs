//! Parsnip - Parser Combinators with Threaded State
//!
//! Grammars are assembled from small parser values instead of hand-written
//! recursive descent:
//! - Persistent streams: backtracking is free, failures never leave partial
//!   consumption behind
//! - Ordered choice that concatenates the failure messages of every branch
//! - Repetition with a progress check, so empty matches cannot loop forever
//! - Left/right associative operator chains for expression grammars
//! - Deferred construction for self-referential rules
//! - A caller-chosen state value threaded through every step
//! - Line/column derived on demand from byte offsets
//!
//! ## Quick Start
//!
//! ```rust
//! use parsnip::prelude::*;
//!
//! let word = re("[a-z]+");
//! let list = sep_by(str(","), word).skip_right(eof());
//!
//! let result = run(&list, "red,green,blue").unwrap();
//! assert_eq!(result.value, vec!["red", "green", "blue"]);
//!
//! let failure = run(&list, "red,,blue").unwrap_err();
//! assert_eq!(failure.to_string(), "line 1, column 3: expected end of input");
//! ```
//!
//! ## Threading State
//!
//! ```rust
//! use parsnip::prelude::*;
//!
//! let item = re("[0-9]+").skip_right(transform_state(|n: u32| n + 1));
//! let items = sep_by(str(" "), item);
//!
//! let result = run_with_state(&items, 0, "1 2 3").unwrap();
//! assert_eq!(result.state, 3);
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging using the `log` crate

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

/// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

// Prelude module for convenient imports
pub mod prelude;

pub mod engine;

/// Re-export commonly used types for convenience
pub use engine::{
    run, run_with_config, run_with_state, Failure, FailureReport, Location, Parser, ParserConfig,
    Reply, RunResult, Stream, Success,
};
