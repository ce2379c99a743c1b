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

//! Transmission statistics.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

// ----------------------------------------------------------------------------
// Statics
// ----------------------------------------------------------------------------

/// Process-wide statistics, used when no other counter is configured.
static GLOBAL: LazyLock<Arc<Statistics>> =
    LazyLock::new(|| Arc::new(Statistics::new()));

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Byte counter.
///
/// A counter is shared by all responses it's given to, and is notified about
/// every byte written to a client. Implementations must be safe to call from
/// many threads at once, as responses on different connections run in
/// parallel.
pub trait Counter: Debug + Send + Sync {
    /// Records the given number of bytes as sent.
    fn add(&self, bytes: u64);
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Transmission statistics.
///
/// # Examples
///
/// ```
/// use courier::http::response::{Counter, Statistics};
///
/// // Create statistics and record bytes
/// let stats = Statistics::new();
/// stats.add(512);
/// assert_eq!(stats.bytes_sent(), 512);
/// ```
#[derive(Debug, Default)]
pub struct Statistics {
    /// Number of bytes sent.
    bytes_sent: AtomicU64,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Statistics {
    /// Creates statistics with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide statistics.
    ///
    /// Responses record into these statistics unless they were built with a
    /// different counter, so an external reporter can read the aggregate.
    #[inline]
    #[must_use]
    pub fn global() -> Arc<Statistics> {
        Arc::clone(&GLOBAL)
    }

    /// Returns the number of bytes sent.
    #[inline]
    #[must_use]
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Counter for Statistics {
    #[inline]
    fn add(&self, bytes: u64) {
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_concurrent_increments() {
        let stats = Arc::new(Statistics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        stats.add(3);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.bytes_sent(), 24_000);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(Arc::ptr_eq(&Statistics::global(), &Statistics::global()));
    }
}
