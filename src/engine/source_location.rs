//! Source Location Utilities
//!
//! Line/column information is never stored on a stream. It is derived on
//! demand from the source text and an absolute byte offset, so a location
//! can never drift out of sync with the stream it describes.

use serde::Serialize;
use std::fmt;

/// A point in the source text, expressed as the line that contains it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location<'a> {
    /// Text of the line containing the offset, without its `'\n'`
    pub source_line: &'a str,
    /// Line number (1-based)
    pub line: usize,
    /// Byte column within `source_line` (0-based)
    pub column: usize,
}

impl<'a> Location<'a> {
    /// Locate `offset` within `data`.
    ///
    /// Lines are separated by `'\n'`. An offset sitting on a line break
    /// belongs to the line the break terminates, so the end of a line has
    /// `column == source_line.len()`. Offsets past the end are clamped.
    pub fn at(data: &'a str, offset: usize) -> Self {
        let offset = offset.min(data.len());

        let mut line_start = 0;
        let mut line = 1;

        for line_end in memchr::memchr_iter(b'\n', data.as_bytes()) {
            if offset <= line_end {
                return Self {
                    source_line: &data[line_start..line_end],
                    line,
                    column: offset - line_start,
                };
            }
            line_start = line_end + 1;
            line += 1;
        }

        Self {
            source_line: &data[line_start..],
            line,
            column: offset - line_start,
        }
    }

    /// Render the source line with a caret under the column
    pub fn snippet(&self) -> String {
        let gutter = format!("{} | ", self.line);
        let width = self
            .source_line
            .get(..self.column)
            .map_or(self.column, |prefix| prefix.chars().count());
        let pad = gutter.len() + width;
        format!("{}{}\n{}^", gutter, self.source_line, " ".repeat(pad))
    }
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Convert a byte offset to `(line, column)`, 1-based line and 0-based column
#[inline]
pub fn offset_to_line_col(data: &str, offset: usize) -> (usize, usize) {
    let location = Location::at(data, offset);
    (location.line, location.column)
}
