//! Run failures and their reports
//!
//! Inside the combinator algebra a failure is just an `Err(messages)` in a
//! [`Reply`](super::parser::Reply). At the top level it becomes a
//! [`Failure`], which remembers where parsing stopped and can be rendered for
//! people (`Display`) or serialized for tools ([`FailureReport`]).
//!
//! # Example Output
//!
//! ```text
//! line 2, column 4: expected "a" or expected "b"
//! ```

use super::parser::Messages;
use super::source_location::Location;
use super::stream::Stream;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A run that ended in failure
#[derive(Debug, Clone, PartialEq)]
pub struct Failure<'a, S> {
    /// State at the point of failure
    pub state: S,
    /// Stream at the point of failure
    pub stream: Stream<'a>,
    /// Failure messages in the order they were produced
    pub messages: Messages,
}

impl<'a, S> Failure<'a, S> {
    /// Where parsing stopped
    pub fn location(&self) -> Location<'a> {
        self.stream.location()
    }

    /// Messages joined with `" or "`
    pub fn explanation(&self) -> String {
        if self.messages.is_empty() {
            "parse failed".to_string()
        } else {
            self.messages.join(" or ")
        }
    }

    /// Owned, serializable summary of this failure
    pub fn report(&self) -> FailureReport {
        let location = self.location();
        FailureReport {
            offset: self.stream.offset(),
            line: location.line,
            column: location.column,
            source_line: location.source_line.to_string(),
            messages: self.messages.clone(),
        }
    }
}

impl<S> fmt::Display for Failure<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location(), self.explanation())
    }
}

impl<S: fmt::Debug> std::error::Error for Failure<'_, S> {}

/// Serializable description of a failed run, detached from the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    /// Byte offset where parsing stopped
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Byte column within the line (0-based)
    pub column: usize,
    /// Text of the line where parsing stopped
    pub source_line: String,
    /// Failure messages in order
    pub messages: Vec<String>,
}

impl FailureReport {
    /// Render as a JSON object
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Multi-line, human readable rendering with a caret under the column
    pub fn render(&self) -> String {
        let location = Location {
            source_line: &self.source_line,
            line: self.line,
            column: self.column,
        };
        let explanation = if self.messages.is_empty() {
            "parse failed".to_string()
        } else {
            self.messages.join(" or ")
        };
        format!("error at {}: {}\n{}", location, explanation, location.snippet())
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
