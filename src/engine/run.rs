//! Top-level entry points
//!
//! A run feeds the whole source text and an initial state to a parser and
//! reports where it stopped. A run does not require the input to be fully
//! consumed; end a grammar with [`eof`](super::primitives::eof) for that.

use super::error::Failure;
use super::lazy::{self, DEFAULT_MAX_RECURSION_DEPTH};
use super::parser::{Parser, Reply};
use super::stream::Stream;

/// Default maximum input size: 100 MB
pub const DEFAULT_MAX_INPUT_SIZE: usize = 100 * 1024 * 1024;

/// Limits applied to a run.
///
/// # Example
///
/// ```rust
/// use parsnip::prelude::*;
///
/// let config = ParserConfig::new()
///     .with_max_input_size(1024)
///     .with_max_recursion_depth(64);
///
/// let result = run_with_config(&str("hi"), (), "hi", config);
/// assert!(result.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum allowed input size in bytes
    pub max_input_size: usize,

    /// Maximum nesting of `lazy` parser applications (0 = no limit).
    ///
    /// Exceeding it fails the whole run, whatever alternatives enclose the
    /// rule that went too deep.
    pub max_recursion_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum input size
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// Set the maximum recursion depth
    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }
}

/// A run that produced a value
#[derive(Debug, Clone, PartialEq)]
pub struct Success<'a, S, T> {
    /// Final state
    pub state: S,
    /// Final stream; `stream.remaining()` is whatever was left unparsed
    pub stream: Stream<'a>,
    /// Parsed value
    pub value: T,
}

/// Outcome of a top-level run
pub type RunResult<'a, S, T> = Result<Success<'a, S, T>, Failure<'a, S>>;

/// Run `parser` over `input` with the unit state
pub fn run<'a, T: 'a>(parser: &Parser<'a, (), T>, input: &'a str) -> RunResult<'a, (), T> {
    run_with_config(parser, (), input, ParserConfig::default())
}

/// Run `parser` over `input` starting from `state`
pub fn run_with_state<'a, S: 'a, T: 'a>(
    parser: &Parser<'a, S, T>,
    state: S,
    input: &'a str,
) -> RunResult<'a, S, T> {
    run_with_config(parser, state, input, ParserConfig::default())
}

/// Run `parser` over `input` starting from `state`, under `config`'s limits
///
/// Input larger than `config.max_input_size` fails at offset 0 without
/// running the parser.
pub fn run_with_config<'a, S: 'a, T: 'a>(
    parser: &Parser<'a, S, T>,
    state: S,
    input: &'a str,
    config: ParserConfig,
) -> RunResult<'a, S, T> {
    let stream = Stream::new(input);

    if input.len() > config.max_input_size {
        log_debug!(
            "rejecting input: {} bytes exceeds limit of {}",
            input.len(),
            config.max_input_size
        );
        return Err(Failure {
            state,
            stream,
            messages: vec![format!(
                "input too large: {} bytes exceeds limit of {} bytes",
                input.len(),
                config.max_input_size
            )],
        });
    }

    log_debug!("starting run: input_len={}", input.len());

    let (reply, tripped) =
        lazy::with_recursion_limit(config.max_recursion_depth, || parser.apply(state, stream));
    let Reply {
        state,
        stream,
        outcome,
    } = reply;

    if let Some(exceeded) = tripped {
        log_debug!(
            "run aborted: recursion limit of {} exceeded at offset {}",
            exceeded.limit,
            exceeded.offset
        );
        let at = Stream::new(input).try_advance(exceeded.offset).unwrap_or(stream);
        return Err(Failure {
            state,
            stream: at,
            messages: vec![exceeded.message()],
        });
    }

    match outcome {
        Ok(value) => {
            log_debug!("run succeeded at offset {}", stream.offset());
            Ok(Success {
                state,
                stream,
                value,
            })
        }
        Err(messages) => {
            log_debug!(
                "run failed at offset {} with {} message(s)",
                stream.offset(),
                messages.len()
            );
            Err(Failure {
                state,
                stream,
                messages,
            })
        }
    }
}
