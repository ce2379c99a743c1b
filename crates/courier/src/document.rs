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

//! Canned error documents.

use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

use crate::http::response::{Error, Result};
use crate::http::{Header, Response, Status};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Built-in messages for well-known error conditions.
const MESSAGES: &[(Status, &str)] = &[
    (
        Status::BadRequest,
        "<p>Your browser sent a request that this server could not \
         understand.</p>",
    ),
    (Status::Forbidden, "<p>Access Denied.</p>"),
    (
        Status::NotFound,
        "<p>The requested URL was not found on this server.</p>",
    ),
    (
        Status::MethodNotAllowed,
        "<p>The method specified in the Request-Line is not allowed for the \
         resource identified by the Request-URI.</p>",
    ),
    (
        Status::LengthRequired,
        "<p>The server refuses to accept the request without a defined \
         Content-Length.</p>",
    ),
    (
        Status::PayloadTooLarge,
        "<p>The request entity is larger than the server is willing or able \
         to process.</p>",
    ),
    (
        Status::UriTooLong,
        "<p>The Request-URI is longer than the server is willing to \
         interpret.</p>",
    ),
    (
        Status::InternalServerError,
        "<p>The server encountered an unexpected condition which prevented \
         it from fulfilling the request.</p>",
    ),
    (
        Status::NotImplemented,
        "<p>The server does not support the functionality required to \
         fulfill the request.</p>",
    ),
    (
        Status::ServiceUnavailable,
        "<p>The server is currently unable to handle the request due to a \
         temporary overloading or maintenance of the server.</p>",
    ),
];

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Canned error document.
///
/// An error document describes everything needed to answer a request with an
/// error condition: status, page title and message, additional headers, and
/// an optional custom document on disk, which replaces the built-in page if
/// it can be opened. Serving a document is a regular, successful response.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use courier::document::ErrorDocument;
/// use courier::http::{Header, Response};
///
/// // Create response and serve error document
/// let mut res = Response::new(Vec::new());
/// ErrorDocument::method_not_allowed("GET, HEAD").serve(&mut res)?;
/// assert_eq!(res.headers().get(Header::Allow), Some("GET, HEAD"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ErrorDocument {
    /// Response status.
    pub status: Status,
    /// Page title.
    pub title: String,
    /// Page message, as HTML.
    pub body: String,
    /// Additional headers.
    pub headers: Vec<(Header, String)>,
    /// Custom document on disk.
    pub path: Option<PathBuf>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl ErrorDocument {
    /// Creates an error document for the given status.
    ///
    /// The title is derived from the status, e.g. `Error 404 - Not Found`,
    /// and the message is taken from the built-in messages, falling back to
    /// the reason phrase for statuses without one.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::document::ErrorDocument;
    /// use courier::http::Status;
    ///
    /// // Create error document
    /// let doc = ErrorDocument::new(Status::Forbidden);
    /// assert_eq!(doc.title, "Error 403 - Forbidden");
    /// assert_eq!(doc.body, "<p>Access Denied.</p>");
    /// ```
    #[must_use]
    pub fn new(status: Status) -> Self {
        let body = MESSAGES
            .iter()
            .find(|(candidate, _)| *candidate == status)
            .map_or_else(
                || format!("<p>{}.</p>", status.name()),
                |(_, message)| (*message).to_string(),
            );
        Self {
            status,
            title: format!("Error {} - {}", status.code(), status.name()),
            body,
            headers: Vec::new(),
            path: None,
        }
    }

    /// Adds a header sent along with the document.
    #[inline]
    #[must_use]
    pub fn header<V>(mut self, header: Header, value: V) -> Self
    where
        V: ToString,
    {
        self.headers.push((header, value.to_string()));
        self
    }

    /// Sets a custom document, served instead of the built-in page.
    ///
    /// The built-in page is still used if the path isn't a readable regular
    /// file.
    #[inline]
    #[must_use]
    pub fn with_document<P>(mut self, path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.path = Some(path.into());
        self
    }

    /// Renders the built-in page.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "<!DOCTYPE html><html><head><title>{title}</title></head>\
             <body><h1>{title}</h1>{body}</body></html>",
            title = self.title,
            body = self.body,
        )
    }

    /// Serves the document through the given response.
    ///
    /// Status, content type and additional headers are set, and then either
    /// the custom document or the built-in page is streamed. The response
    /// must not be committed yet.
    pub fn serve<W>(&self, res: &mut Response<W>) -> Result
    where
        W: Write,
    {
        res.set_status(self.status)?;
        res.set_content_type("text/html; charset=utf-8")?;
        for (header, value) in &self.headers {
            res.set_header(*header, value)?;
        }

        // Prefer custom document, as long as it's a regular file
        if let Some(path) = &self.path {
            match res.serve_file(path) {
                Err(Error::Io(err)) if !res.is_committed() => {
                    warn!(
                        path = %path.display(),
                        %err,
                        "error document unavailable, using built-in page"
                    );
                }
                result => return result,
            }
        }

        // Serve built-in page
        let page = self.render();
        res.set_content_length(page.len() as u64)?;
        res.serve_stream(page.as_bytes())
    }
}

impl ErrorDocument {
    /// Creates a "400 Bad Request" document.
    #[must_use]
    pub fn bad_request() -> Self {
        Self::new(Status::BadRequest)
    }

    /// Creates a "403 Forbidden" document.
    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(Status::Forbidden)
    }

    /// Creates a "404 Not Found" document.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(Status::NotFound)
    }

    /// Creates a "405 Method Not Allowed" document.
    ///
    /// The allowed methods are sent in the `Allow` header, which is required
    /// for this status.
    #[must_use]
    pub fn method_not_allowed<M>(allowed: M) -> Self
    where
        M: ToString,
    {
        Self::new(Status::MethodNotAllowed).header(Header::Allow, allowed)
    }

    /// Creates a "411 Length Required" document.
    #[must_use]
    pub fn length_required() -> Self {
        Self::new(Status::LengthRequired)
    }

    /// Creates a "413 Payload Too Large" document.
    #[must_use]
    pub fn payload_too_large() -> Self {
        Self::new(Status::PayloadTooLarge)
    }

    /// Creates a "414 URI Too Long" document.
    #[must_use]
    pub fn uri_too_long() -> Self {
        Self::new(Status::UriTooLong)
    }

    /// Creates a "500 Internal Server Error" document.
    #[must_use]
    pub fn internal_server_error() -> Self {
        Self::new(Status::InternalServerError)
    }

    /// Creates a "501 Not Implemented" document.
    #[must_use]
    pub fn not_implemented() -> Self {
        Self::new(Status::NotImplemented)
    }

    /// Creates a "503 Service Unavailable" document.
    #[must_use]
    pub fn service_unavailable() -> Self {
        Self::new(Status::ServiceUnavailable)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::{env, fs, process};

    use crate::http::response::{Builder, Statistics};

    use super::*;

    fn response() -> Response<Vec<u8>> {
        Builder::new()
            .counter(Arc::new(Statistics::new()))
            .build(Vec::new())
    }

    fn output(res: &Response<Vec<u8>>) -> String {
        String::from_utf8(res.get_ref().clone()).unwrap()
    }

    #[test]
    fn test_titles() {
        let test_cases = vec![
            (ErrorDocument::bad_request(), "Error 400 - Bad Request"),
            (ErrorDocument::not_found(), "Error 404 - Not Found"),
            (ErrorDocument::length_required(), "Error 411 - Length Required"),
            (ErrorDocument::uri_too_long(), "Error 414 - URI Too Long"),
            (
                ErrorDocument::internal_server_error(),
                "Error 500 - Internal Server Error",
            ),
            (
                ErrorDocument::service_unavailable(),
                "Error 503 - Service Unavailable",
            ),
        ];

        for (doc, expected) in test_cases {
            assert_eq!(doc.title, expected);
            assert!(doc.body.starts_with("<p>"));
        }
    }

    #[test]
    fn test_fallback_message() {
        let doc = ErrorDocument::new(Status::RequestTimeout);
        assert_eq!(doc.body, "<p>Request Timeout.</p>");
    }

    #[test]
    fn test_serve_forbidden() {
        let mut res = response();
        let doc = ErrorDocument::forbidden();
        doc.serve(&mut res).unwrap();

        let page = doc.render();
        assert_eq!(
            page,
            "<!DOCTYPE html><html><head><title>Error 403 - Forbidden</title>\
             </head><body><h1>Error 403 - Forbidden</h1>\
             <p>Access Denied.</p></body></html>"
        );

        let output = output(&res);
        assert!(output.starts_with("HTTP/1.1 403 Forbidden\r\n"));
        assert!(output.ends_with(&format!("\r\n\r\n{page}")));
        assert_eq!(
            res.headers().get(Header::ContentLength),
            Some(page.len().to_string().as_str())
        );
        assert!(!res.headers().contains(Header::Allow));
    }

    #[test]
    fn test_serve_method_not_allowed() {
        let mut res = response();
        ErrorDocument::method_not_allowed("GET, HEAD")
            .serve(&mut res)
            .unwrap();

        let output = output(&res);
        assert!(output.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));
        assert!(output.contains("\r\nAllow: GET, HEAD\r\n"));
        assert!(output.contains("Content-Type: text/html; charset=utf-8\r\n"));
    }

    #[test]
    fn test_serve_custom_document() {
        let path = env::temp_dir()
            .join(format!("courier-{}-403.html", process::id()));
        fs::write(&path, "<h1>Go away</h1>").unwrap();

        let mut res = response();
        ErrorDocument::forbidden()
            .with_document(&path)
            .serve(&mut res)
            .unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(res.headers().get(Header::ContentLength), Some("16"));
        assert!(output(&res).ends_with("\r\n\r\n<h1>Go away</h1>"));
    }

    #[test]
    fn test_serve_missing_custom_document() {
        let mut res = response();
        let doc = ErrorDocument::not_found()
            .with_document(env::temp_dir().join("courier-missing-404.html"));
        doc.serve(&mut res).unwrap();
        assert!(output(&res).ends_with(&doc.render()));
    }

    #[test]
    fn test_serve_directory_as_custom_document() {
        let mut res = response();
        let doc = ErrorDocument::forbidden().with_document(env::temp_dir());
        doc.serve(&mut res).unwrap();

        let page = doc.render();
        assert!(output(&res).starts_with("HTTP/1.1 403 Forbidden\r\n"));
        assert!(output(&res).ends_with(&format!("\r\n\r\n{page}")));
        assert_eq!(
            res.headers().get(Header::ContentLength),
            Some(page.len().to_string().as_str())
        );
    }

    #[test]
    fn test_serve_committed_response() {
        let mut res = response();
        res.commit().unwrap();
        assert!(matches!(
            ErrorDocument::forbidden().serve(&mut res),
            Err(Error::AlreadyCommitted)
        ));
    }
}
