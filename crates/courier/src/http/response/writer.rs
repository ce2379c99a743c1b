// Copyright (c) 2025 Zensical and contributors

// SPDX-License-Identifier: MIT
// Third-party contributions licensed under DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! Buffered text writer.

use std::{fmt, io, mem};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Buffered text writer.
///
/// The writer collects body text until the [`Response`][] is flushed, which
/// writes the buffer to the connection after the header block, framed as a
/// chunk if the response uses chunked transfer coding. Text can be written
/// through either [`fmt::Write`] or [`io::Write`].
///
/// [`Response`]: crate::http::Response
///
/// # Examples
///
/// ```
/// use courier::http::response::TextWriter;
/// use std::fmt::Write;
///
/// // Create writer and write text
/// let mut writer = TextWriter::new();
/// write!(writer, "<p>{}</p>", 42).unwrap();
/// assert_eq!(writer.len(), 9);
/// ```
#[derive(Debug, Default)]
pub struct TextWriter {
    /// Pending bytes.
    buffer: Vec<u8>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl TextWriter {
    /// Creates an empty text writer.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the pending bytes, leaving the writer empty.
    #[inline]
    pub(crate) fn take(&mut self) -> Vec<u8> {
        mem::take(&mut self.buffer)
    }
}

#[allow(clippy::must_use_candidate)]
impl TextWriter {
    /// Returns the number of pending bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns whether there are no pending bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Write for TextWriter {
    /// Appends the given text.
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl io::Write for TextWriter {
    /// Appends the given bytes.
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    /// Does nothing, as bytes are only sent when the response is flushed.
    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
