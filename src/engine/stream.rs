//! Persistent input stream
//!
//! A [`Stream`] is an immutable view of the source text together with the
//! number of bytes consumed so far. Primitives never mutate a stream; a
//! successful match produces a new, advanced copy and a failed match hands
//! back the stream it received. Backtracking is therefore just dropping a
//! value.

use super::source_location::Location;

/// A position inside an immutable source text.
///
/// Invariant: `remaining()` is always `&data()[offset()..]`, i.e. the suffix
/// obtained by dropping exactly `offset()` bytes from the front.
#[derive(Debug, Clone, Copy)]
pub struct Stream<'a> {
    data: &'a str,
    offset: usize,
}

impl<'a> Stream<'a> {
    /// Start a stream at the beginning of `data`
    #[inline]
    pub fn new(data: &'a str) -> Self {
        Self { data, offset: 0 }
    }

    /// The complete source text
    #[inline]
    pub fn data(&self) -> &'a str {
        self.data
    }

    /// The unconsumed suffix of the source text
    #[inline]
    pub fn remaining(&self) -> &'a str {
        &self.data[self.offset..]
    }

    /// Number of bytes consumed so far
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// True once every byte of the source has been consumed
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.offset == self.data.len()
    }

    /// Return a copy of this stream moved forward by `len` bytes.
    ///
    /// # Panics
    ///
    /// Panics if the new offset is past the end of the source or does not
    /// fall on a `char` boundary, the same way slicing a `str` does. Use
    /// [`Stream::try_advance`] when `len` is not known to be valid.
    #[inline]
    pub fn advance(self, len: usize) -> Self {
        match self.try_advance(len) {
            Some(next) => next,
            None => panic!(
                "stream advanced by {} bytes from offset {} past a char boundary or the end",
                len, self.offset
            ),
        }
    }

    /// Move forward by `len` bytes, or `None` if that would leave the source
    /// or split a `char`
    #[inline]
    pub fn try_advance(self, len: usize) -> Option<Self> {
        let offset = self.offset.checked_add(len)?;
        if !self.data.is_char_boundary(offset) {
            return None;
        }
        Some(Self {
            data: self.data,
            offset,
        })
    }

    /// The text consumed between `self` and a later stream over the same source
    ///
    /// Returns an empty slice if `later` is not ahead of `self`.
    pub fn consumed_until(&self, later: &Stream<'a>) -> &'a str {
        if later.offset <= self.offset {
            return "";
        }
        &self.data[self.offset..later.offset]
    }

    /// Line, line number and column of the current offset
    #[inline]
    pub fn location(&self) -> Location<'a> {
        Location::at(self.data, self.offset)
    }

    /// 1-based line number of the current offset
    #[inline]
    pub fn line(&self) -> usize {
        self.location().line
    }

    /// 0-based byte column of the current offset within its line
    #[inline]
    pub fn column(&self) -> usize {
        self.location().column
    }
}

/// Streams compare equal when they view the same source allocation at the
/// same offset. Only the pointer is compared, never the text, so repetition
/// combinators can check for progress in constant time.
impl PartialEq for Stream<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data.as_ptr(), other.data.as_ptr())
            && self.data.len() == other.data.len()
            && self.offset == other.offset
    }
}

impl Eq for Stream<'_> {}
