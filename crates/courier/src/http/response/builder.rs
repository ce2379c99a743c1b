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

//! HTTP response builder.

use std::io::Write;
use std::sync::Arc;

use crate::http::Header;

use super::stats::{Counter, Statistics};
use super::wire::Wire;
use super::{Headers, Response, State};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Default number of bytes read from a body source at once.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP response builder.
#[derive(Debug)]
pub struct Builder {
    /// Number of bytes read from a body source at once.
    chunk_size: usize,
    /// Whether the connection is kept alive.
    keep_alive: bool,
    /// Byte counter.
    counter: Option<Arc<dyn Counter>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Builder {
    /// Creates a response builder.
    ///
    /// If the defaults are sufficient, [`Response::new`] can be used instead,
    /// which creates a response with status `200 OK`, `Connection: close` and
    /// a chunk size of [`DEFAULT_CHUNK_SIZE`] bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::http::response::Builder;
    ///
    /// // Create response builder
    /// let builder = Builder::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            keep_alive: false,
            counter: None,
        }
    }

    /// Sets the number of bytes read from a body source at once.
    ///
    /// Every chunk is flushed to the connection before the next one is read,
    /// so smaller chunks get partial output to the client sooner. A size of
    /// zero is treated as one.
    #[inline]
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Sets whether the connection is kept alive.
    #[inline]
    #[must_use]
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Sets the counter recording the bytes sent.
    ///
    /// Without a counter, the process-wide [`Statistics::global`] is used.
    #[inline]
    #[must_use]
    pub fn counter(mut self, counter: Arc<dyn Counter>) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Creates the response writing to the given sink.
    ///
    /// The sink is never closed by the response, as its lifetime belongs to
    /// the connection. Use [`Response::into_inner`] to get it back.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::http::response::Builder;
    ///
    /// // Create response with custom chunk size
    /// let res = Builder::new()
    ///     .chunk_size(4096)
    ///     .keep_alive(true)
    ///     .build(Vec::new());
    /// ```
    pub fn build<W>(self, sink: W) -> Response<W>
    where
        W: Write,
    {
        let counter: Arc<dyn Counter> = match self.counter {
            Some(counter) => counter,
            None => Statistics::global(),
        };

        // Connection header is always present, so it's set upfront
        let mut headers = Headers::new();
        headers.insert(Header::Connection, connection(self.keep_alive));
        Response {
            headers,
            cookies: Vec::new(),
            state: State::Open,
            wire: Wire::new(sink, counter),
            writer: None,
            chunk_size: self.chunk_size,
        }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Builder {
    /// Creates a response builder.
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the `Connection` header value.
pub(super) fn connection(keep_alive: bool) -> &'static str {
    if keep_alive { "keep-alive" } else { "close" }
}
