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

//! HTTP cookie.

use httpdate::fmt_http_date;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::headers::strip_line_breaks;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Character set to be percent-encoded in cookie values.
const SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'*');

/// Latest representable expiry date, 9999-12-31 23:59:59 GMT.
const MAX_EXPIRES: Duration = Duration::from_secs(253_402_300_799);

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP cookie.
///
/// Cookies are collected by the [`Response`][] and turned into `Set-Cookie`
/// fields when the header block is committed, in the order they were added.
///
/// [`Response`]: crate::http::Response
///
/// # Examples
///
/// ```
/// use courier::http::response::Cookie;
///
/// // Create cookie
/// let cookie = Cookie::new("session", "abc")
///     .path("/")
///     .http_only(true);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value, before encoding.
    pub value: String,
    /// Lifetime in seconds, relative to the time of encoding.
    pub max_age: Option<i64>,
    /// Cookie path.
    pub path: Option<String>,
    /// Cookie domain.
    pub domain: Option<String>,
    /// Whether the cookie is hidden from scripts.
    pub http_only: bool,
    /// Whether the cookie is only sent over secure connections.
    pub secure: bool,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Cookie {
    /// Creates a session cookie without any attributes.
    #[must_use]
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            value: value.into(),
            max_age: None,
            path: None,
            domain: None,
            http_only: false,
            secure: false,
        }
    }

    /// Encodes the cookie into a `Set-Cookie` field value.
    ///
    /// The value is percent-encoded, and attributes are appended in a fixed
    /// order: `Expires`, `Path`, `Domain`, `HttpOnly`, `Secure`, each only if
    /// set. The expiry date is computed from the given time. Line breaks in
    /// name, path and domain are removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::http::response::Cookie;
    /// use std::time::UNIX_EPOCH;
    ///
    /// // Create cookie and encode it
    /// let cookie = Cookie::new("id", "a b")
    ///     .max_age(3600)
    ///     .path("/");
    /// assert_eq!(
    ///     cookie.encode(UNIX_EPOCH),
    ///     "id=a%20b; Expires=Thu, 01 Jan 1970 01:00:00 GMT; Path=/"
    /// );
    /// ```
    #[must_use]
    pub fn encode(&self, now: SystemTime) -> String {
        let mut value = format!(
            "{}={}",
            strip_line_breaks(self.name.clone()),
            utf8_percent_encode(&self.value, SET)
        );
        if let Some(max_age) = self.max_age {
            value.push_str("; Expires=");
            value.push_str(&fmt_http_date(expires(now, max_age)));
        }
        if let Some(path) = &self.path {
            value.push_str("; Path=");
            value.push_str(&strip_line_breaks(path.clone()));
        }
        if let Some(domain) = &self.domain {
            value.push_str("; Domain=");
            value.push_str(&strip_line_breaks(domain.clone()));
        }
        if self.http_only {
            value.push_str("; HttpOnly");
        }
        if self.secure {
            value.push_str("; Secure");
        }
        value
    }
}

impl Cookie {
    /// Sets the lifetime in seconds.
    ///
    /// A lifetime of `-1` keeps the cookie a session cookie, so no `Expires`
    /// attribute is sent. Zero or other negative values yield an expiry date
    /// that is not in the future, which instructs the client to discard the
    /// cookie.
    #[inline]
    #[must_use]
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = (seconds != -1).then_some(seconds);
        self
    }

    /// Sets the path.
    #[inline]
    #[must_use]
    pub fn path<P>(mut self, path: P) -> Self
    where
        P: Into<String>,
    {
        self.path = Some(path.into());
        self
    }

    /// Sets the domain.
    #[inline]
    #[must_use]
    pub fn domain<D>(mut self, domain: D) -> Self
    where
        D: Into<String>,
    {
        self.domain = Some(domain.into());
        self
    }

    /// Sets whether the cookie is hidden from scripts.
    #[inline]
    #[must_use]
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Sets whether the cookie is restricted to secure connections.
    #[inline]
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Computes the expiry date, clamped to the range HTTP dates can express.
fn expires(now: SystemTime, max_age: i64) -> SystemTime {
    let delta = Duration::from_secs(max_age.unsigned_abs());
    let date = if max_age < 0 {
        now.checked_sub(delta).unwrap_or(UNIX_EPOCH)
    } else {
        now.checked_add(delta).unwrap_or(UNIX_EPOCH + MAX_EXPIRES)
    };
    date.clamp(UNIX_EPOCH, UNIX_EPOCH + MAX_EXPIRES)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_value() {
        let test_cases = vec![
            ("plain", "plain"),
            ("a b", "a%20b"),
            ("x;y=z", "x%3By%3Dz"),
            ("a-b.c_d*", "a-b.c_d*"),
            ("żółw", "%C5%BC%C3%B3%C5%82w"),
        ];

        for (value, expected) in test_cases {
            let cookie = Cookie::new("k", value);
            assert_eq!(
                cookie.encode(UNIX_EPOCH),
                format!("k={expected}"),
                "Failed for value: {value}"
            );
        }
    }

    #[test]
    fn test_encode_without_max_age_has_no_expires() {
        let cookie = Cookie::new("k", "v").path("/").domain("example.com");
        let value = cookie.encode(SystemTime::now());
        assert!(!value.contains("Expires"));
        assert_eq!(value, "k=v; Path=/; Domain=example.com");
    }

    #[test]
    fn test_encode_session_lifetime_has_no_expires() {
        let cookie = Cookie::new("k", "v").max_age(3600).max_age(-1);
        assert_eq!(cookie.max_age, None);
        assert_eq!(cookie.encode(SystemTime::now()), "k=v");

        // Other negative lifetimes still expire the cookie
        let cookie = Cookie::new("k", "v").max_age(-2);
        assert_eq!(
            cookie.encode(UNIX_EPOCH + Duration::from_secs(2)),
            "k=v; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn test_encode_strips_line_breaks() {
        let cookie = Cookie::new("k", "v\r\n")
            .path("/\r\nX-Injected: 1")
            .domain("d\n");
        assert_eq!(
            cookie.encode(UNIX_EPOCH),
            "k=v%0D%0A; Path=/X-Injected: 1; Domain=d"
        );
    }

    #[test]
    fn test_encode_expires_from_clock() {
        let now = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let cookie = Cookie::new("k", "v").max_age(3600);
        assert_eq!(
            cookie.encode(now),
            "k=v; Expires=Tue, 14 Nov 2023 23:13:20 GMT"
        );
    }

    #[test]
    fn test_encode_attribute_order() {
        let cookie = Cookie::new("k", "v")
            .secure(true)
            .http_only(true)
            .domain("d")
            .path("/p")
            .max_age(0);
        assert_eq!(
            cookie.encode(UNIX_EPOCH),
            "k=v; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/p; Domain=d; \
             HttpOnly; Secure"
        );
    }

    #[test]
    fn test_expires_is_clamped() {
        let now = UNIX_EPOCH + Duration::from_secs(60);
        assert_eq!(expires(now, -3600), UNIX_EPOCH);
        assert_eq!(expires(now, i64::MAX), UNIX_EPOCH + MAX_EXPIRES);
    }
}
