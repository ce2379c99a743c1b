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

//! Header block encoding.

use super::Headers;

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Encodes the header set into the header block placed on the wire.
///
/// The block consists of the status line, one line per field, and the empty
/// line terminating the header section. This is a pure function, so writing
/// the bytes is left to the caller.
///
/// # Examples
///
/// ```
/// use courier::http::response::{encode, Headers};
/// use courier::http::Header;
///
/// // Create header set and add header
/// let mut headers = Headers::new();
/// headers.insert(Header::ContentLength, 0);
///
/// // Encode header block
/// let bytes = encode(&headers);
/// assert_eq!(bytes, b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
/// ```
#[must_use]
pub fn encode(headers: &Headers) -> Vec<u8> {
    // Compute an estimate for the block size - we need 9 bytes for the prefix
    // and 2 bytes for each CRLF, plus the status text. For every field, we
    // estimate an average of 64 bytes, which is fine as an upper bound
    let capacity = 9
        + headers.status().len() + 2 // fmt
        + headers.len() * 64 + 2; // fmt

    // Create pre-sized buffer and append prefix and status
    let mut buffer = Vec::with_capacity(capacity);
    buffer.extend_from_slice(b"HTTP/1.1 ");
    buffer.extend_from_slice(headers.status().as_bytes());
    buffer.extend_from_slice(b"\r\n");

    // Append all fields to buffer
    for (name, value) in headers {
        buffer.extend_from_slice(name.as_bytes());
        buffer.extend_from_slice(b": ");
        buffer.extend_from_slice(value.as_bytes());
        buffer.extend_from_slice(b"\r\n");
    }

    // Append empty line and return buffer
    buffer.extend_from_slice(b"\r\n");
    buffer
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::http::{Header, Status};

    use super::*;

    #[test]
    fn test_encode_empty() {
        let headers = Headers::new();
        assert_eq!(encode(&headers), b"HTTP/1.1 200 OK\r\n\r\n");
    }

    #[test]
    fn test_encode_fields_in_order() {
        let mut headers = Headers::new();
        headers.set_status(Status::MethodNotAllowed);
        headers.insert(Header::Connection, "close");
        headers.insert(Header::Allow, "GET, HEAD");
        headers.insert(Header::SetCookie, "a=1");
        headers.insert(Header::SetCookie, "b=2");
        assert_eq!(
            String::from_utf8(encode(&headers)).unwrap(),
            "HTTP/1.1 405 Method Not Allowed\r\n\
             Connection: close\r\n\
             Allow: GET, HEAD\r\n\
             Set-Cookie: a=1\r\n\
             Set-Cookie: b=2\r\n\
             \r\n"
        );
    }
}
