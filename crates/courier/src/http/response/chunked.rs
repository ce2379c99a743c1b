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

//! Chunked transfer coding.

use std::io::{self, Write};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Body writer with optional chunked transfer coding.
///
/// In framed mode, every non-empty write is emitted as a single chunk, i.e.,
/// `<hex-size>\r\n<bytes>\r\n`, and [`Chunked::finish`] emits the terminating
/// `0\r\n\r\n`. In raw mode, bytes are passed through as they are. The writer
/// doesn't look at any headers - whoever creates it must choose the mode that
/// matches the committed `Transfer-Encoding`.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use courier::http::response::Chunked;
/// use std::io::Write;
///
/// // Create writer and write chunk
/// let mut body = Chunked::new(Vec::new());
/// body.write_all(b"Hello, world!")?;
/// body.finish()?;
///
/// // Obtain framed bytes
/// assert_eq!(body.into_inner(), b"d\r\nHello, world!\r\n0\r\n\r\n");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Chunked<W> {
    /// Underlying writer.
    inner: W,
    /// Whether writes are framed as chunks.
    framed: bool,
    /// Whether the terminating chunk was written.
    finished: bool,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<W> Chunked<W>
where
    W: Write,
{
    /// Creates a writer framing every write as a chunk.
    #[inline]
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self { inner, framed: true, finished: false }
    }

    /// Creates a writer passing bytes through without framing.
    #[inline]
    #[must_use]
    pub fn raw(inner: W) -> Self {
        Self { inner, framed: false, finished: false }
    }

    /// Finishes the body.
    ///
    /// In framed mode, this writes the terminating zero-length chunk, which
    /// happens only once. Writes after finishing the body fail.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.framed && !self.finished {
            self.inner.write_all(b"0\r\n\r\n")?;
        }
        self.finished = true;
        Ok(())
    }

    /// Returns whether writes are framed as chunks.
    #[inline]
    #[must_use]
    pub fn is_framed(&self) -> bool {
        self.framed
    }

    /// Consumes the writer and returns the underlying writer.
    #[inline]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<W> Write for Chunked<W>
where
    W: Write,
{
    /// Writes the given bytes, framed as a single chunk if necessary.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.finished {
            return Err(io::Error::other("chunked body already finished"));
        }

        // Empty chunks must never be framed, as a zero-length chunk would
        // terminate the body prematurely
        if buf.is_empty() {
            return Ok(0);
        }
        if !self.framed {
            return self.inner.write(buf);
        }

        // Emit size line, data and trailing CRLF as one chunk
        write!(self.inner, "{:x}\r\n", buf.len())?;
        self.inner.write_all(buf)?;
        self.inner.write_all(b"\r\n")?;
        Ok(buf.len())
    }

    /// Flushes the underlying writer.
    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framed_writes() {
        let mut body = Chunked::new(Vec::new());
        body.write_all(b"abc").unwrap();
        body.write_all(&[b'x'; 26]).unwrap();
        body.write_all(b"").unwrap();
        body.finish().unwrap();

        let mut expected = b"3\r\nabc\r\n1a\r\n".to_vec();
        expected.extend_from_slice(&[b'x'; 26]);
        expected.extend_from_slice(b"\r\n0\r\n\r\n");
        assert_eq!(body.into_inner(), expected);
    }

    #[test]
    fn test_raw_writes() {
        let mut body = Chunked::raw(Vec::new());
        assert!(!body.is_framed());
        body.write_all(b"abc").unwrap();
        body.finish().unwrap();
        assert_eq!(body.into_inner(), b"abc");
    }

    #[test]
    fn test_finish_once() {
        let mut body = Chunked::new(Vec::new());
        body.finish().unwrap();
        body.finish().unwrap();
        assert!(body.write_all(b"late").is_err());
        assert_eq!(body.into_inner(), b"0\r\n\r\n");
    }
}
