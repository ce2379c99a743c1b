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

//! HTTP response headers.

use std::fmt;
use std::slice;

use crate::http::{Header, Status};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP response headers.
///
/// The header set holds the status line text and an ordered list of fields.
/// Names are compared case-insensitively, and fields are serialized in the
/// order they were first set, so the header block is deterministic for any
/// given sequence of updates.
///
/// All fields hold a single value, where the last write wins, except for
/// [`Header::SetCookie`], which is appended on every write, since every cookie
/// requires its own field.
///
/// # Examples
///
/// ```
/// use courier::http::response::Headers;
/// use courier::http::Header;
///
/// // Create header set and add header
/// let mut headers = Headers::new();
/// headers.insert(Header::ContentType, "text/plain");
///
/// // Lookup is case-insensitive
/// assert_eq!(headers.get("content-type"), Some("text/plain"));
/// ```
#[derive(Clone, Debug)]
pub struct Headers {
    /// Status line text, e.g. `200 OK`.
    status: String,
    /// Ordered list of fields.
    fields: Vec<(String, String)>,
}

/// Iterator over header fields.
#[derive(Debug)]
pub struct Iter<'a> {
    /// Inner iterator.
    inner: slice::Iter<'a, (String, String)>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Headers {
    /// Creates a header set with status `200 OK` and no fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::http::response::Headers;
    ///
    /// // Create header set
    /// let headers = Headers::new();
    /// assert_eq!(headers.status(), "200 OK");
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the status line text.
    #[inline]
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replaces the status line text.
    ///
    /// The value is not validated, so any code and reason can be given, but
    /// line breaks are removed, as they would end the status line.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::http::response::Headers;
    /// use courier::http::Status;
    ///
    /// // Create header set and update status
    /// let mut headers = Headers::new();
    /// headers.set_status(Status::NotFound);
    /// assert_eq!(headers.status(), "404 Not Found");
    /// ```
    #[allow(clippy::needless_pass_by_value)]
    #[inline]
    pub fn set_status<S>(&mut self, status: S)
    where
        S: ToString,
    {
        self.status = strip_line_breaks(status.to_string());
    }

    /// Returns the first value for the given header.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::http::response::Headers;
    /// use courier::http::Header;
    ///
    /// // Create header set and add header
    /// let mut headers = Headers::new();
    /// headers.insert(Header::Location, "/");
    ///
    /// // Obtain header value
    /// assert_eq!(headers.get("LOCATION"), Some("/"));
    /// assert_eq!(headers.get(Header::Allow), None);
    /// ```
    #[must_use]
    pub fn get<N>(&self, name: N) -> Option<&str>
    where
        N: AsRef<str>,
    {
        let name = name.as_ref();
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns all values for the given header, in insertion order.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::http::response::Headers;
    /// use courier::http::Header;
    ///
    /// // Create header set and add cookies
    /// let mut headers = Headers::new();
    /// headers.insert(Header::SetCookie, "a=1");
    /// headers.insert(Header::SetCookie, "b=2");
    ///
    /// // Obtain all values
    /// let values: Vec<_> = headers.get_all(Header::SetCookie).collect();
    /// assert_eq!(values, ["a=1", "b=2"]);
    /// ```
    pub fn get_all<N>(&self, name: N) -> impl Iterator<Item = &str>
    where
        N: AsRef<str>,
    {
        self.fields.iter().filter_map(move |(key, value)| {
            key.eq_ignore_ascii_case(name.as_ref()).then_some(value.as_str())
        })
    }

    /// Returns whether the header is contained.
    #[inline]
    #[must_use]
    pub fn contains<N>(&self, name: N) -> bool
    where
        N: AsRef<str>,
    {
        self.get(name).is_some()
    }

    /// Updates the given header.
    ///
    /// If a field with the same name exists, its value is replaced in place,
    /// keeping the original position. [`Header::SetCookie`] is always added
    /// as a new field. Line breaks are removed from name and value, so a field
    /// can never spill into the next line of the header block.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::http::response::Headers;
    /// use courier::http::Header;
    ///
    /// // Create header set and update header twice
    /// let mut headers = Headers::new();
    /// headers.insert(Header::ContentType, "text/plain");
    /// headers.insert("content-type", "text/html");
    ///
    /// // Last write wins
    /// assert_eq!(headers.len(), 1);
    /// assert_eq!(headers.get(Header::ContentType), Some("text/html"));
    /// ```
    #[allow(clippy::needless_pass_by_value)]
    pub fn insert<N, V>(&mut self, name: N, value: V)
    where
        N: AsRef<str>,
        V: ToString,
    {
        let name = strip_line_breaks(name.as_ref().to_string());
        let value = strip_line_breaks(value.to_string());
        if !Header::SetCookie.matches(&name) {
            let field = self
                .fields
                .iter_mut()
                .find(|(key, _)| key.eq_ignore_ascii_case(&name));
            if let Some((_, current)) = field {
                *current = value;
                return;
            }
        }

        // Header is new or repeatable
        self.fields.push((name, value));
    }

    /// Removes all fields for the given header.
    #[inline]
    pub fn remove<N>(&mut self, name: N)
    where
        N: AsRef<str>,
    {
        let name = name.as_ref();
        self.fields.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    /// Returns an iterator over the header fields.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.fields.iter() }
    }
}

#[allow(clippy::must_use_candidate)]
impl Headers {
    /// Returns the number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether there are any fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Headers {
    /// Creates a header set with status `200 OK` and no fields.
    #[inline]
    fn default() -> Self {
        Self {
            status: Status::Ok.to_string(),
            fields: Vec::new(),
        }
    }
}

// ----------------------------------------------------------------------------

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    /// Returns the next header field.
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    /// Creates an iterator over the header fields.
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Headers {
    /// Formats the header fields for display.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (name, value) in self {
            f.write_str(name)?;
            f.write_str(": ")?;
            f.write_str(value)?;
            f.write_str("\r\n")?;
        }

        // No errors occurred
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Removes carriage returns and line feeds from the given value.
pub(super) fn strip_line_breaks(mut value: String) -> String {
    value.retain(|char| !matches!(char, '\r' | '\n'));
    value
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let mut headers = Headers::new();
        headers.insert("X-Request-Id", "42");
        for name in ["X-Request-Id", "x-request-id", "X-REQUEST-ID"] {
            assert!(headers.contains(name), "Failed for name: {name}");
            assert_eq!(headers.get(name), Some("42"));
        }
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut headers = Headers::new();
        headers.insert(Header::Connection, "close");
        headers.insert(Header::ContentType, "text/plain");
        headers.insert("CONNECTION", "keep-alive");

        let fields: Vec<_> = headers.iter().collect();
        assert_eq!(
            fields,
            [("Connection", "keep-alive"), ("Content-Type", "text/plain")]
        );
    }

    #[test]
    fn test_set_cookie_accumulates() {
        let mut headers = Headers::new();
        headers.insert(Header::SetCookie, "a=1");
        headers.insert("set-cookie", "b=2");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get(Header::SetCookie), Some("a=1"));
    }

    #[test]
    fn test_missing_header() {
        let headers = Headers::new();
        assert_eq!(headers.get(Header::ContentLength), None);
        assert!(!headers.contains(Header::ContentLength));
        assert_eq!(headers.get_all(Header::SetCookie).count(), 0);
    }

    #[test]
    fn test_remove() {
        let mut headers = Headers::new();
        headers.insert(Header::SetCookie, "a=1");
        headers.insert(Header::SetCookie, "b=2");
        headers.insert(Header::Allow, "GET");
        headers.remove("set-cookie");
        assert_eq!(headers.len(), 1);
        assert!(headers.contains(Header::Allow));
    }

    #[test]
    fn test_line_breaks_are_removed() {
        let mut headers = Headers::new();
        headers.set_status("200 OK\r\nX-Injected: 1");
        headers.insert(Header::Location, "/a\r\nSet-Cookie: evil=1");
        headers.insert("X-Na\nme", "v");
        assert_eq!(headers.status(), "200 OKX-Injected: 1");
        assert_eq!(headers.get(Header::Location), Some("/aSet-Cookie: evil=1"));
        assert_eq!(headers.get("X-Name"), Some("v"));
        assert!(!headers.contains(Header::SetCookie));
    }

    #[test]
    fn test_display() {
        let mut headers = Headers::new();
        headers.insert(Header::ContentLength, 3);
        headers.insert(Header::Allow, "GET, HEAD");
        assert_eq!(
            headers.to_string(),
            "Content-Length: 3\r\nAllow: GET, HEAD\r\n"
        );
    }
}
