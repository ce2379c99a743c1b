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

//! Metered connection sink.

use std::io::{self, Write};
use std::sync::Arc;

use super::stats::Counter;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Metered connection sink.
///
/// Every byte accepted by the underlying sink is recorded both locally and in
/// the shared counter, so the counters reflect exactly what reached the wire,
/// including bytes written before a failure.
#[derive(Debug)]
pub struct Wire<W> {
    /// Underlying sink.
    sink: W,
    /// Shared byte counter.
    counter: Arc<dyn Counter>,
    /// Bytes sent through this sink.
    sent: u64,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<W> Wire<W> {
    /// Creates a metered sink.
    pub fn new(sink: W, counter: Arc<dyn Counter>) -> Self {
        Self { sink, counter, sent: 0 }
    }

    /// Returns the number of bytes sent through this sink.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Returns a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Consumes the metered sink and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<W> Write for Wire<W>
where
    W: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let bytes = self.sink.write(buf)?;
        self.sent += bytes as u64;
        self.counter.add(bytes as u64);
        Ok(bytes)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}
