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

//! HTTP response.

use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, trace};

use super::component::{Header, Status};

mod builder;
mod chunked;
mod cookie;
mod encode;
mod error;
mod headers;
mod mime;
mod stats;
mod wire;
mod writer;

pub use builder::{Builder, DEFAULT_CHUNK_SIZE};
pub use chunked::Chunked;
pub use cookie::Cookie;
pub use encode::encode;
pub use error::{Error, Result};
pub use headers::{Headers, Iter};
pub use stats::{Counter, Statistics};
use wire::Wire;
pub use writer::TextWriter;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Response state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Headers and cookies can be changed.
    Open,
    /// Header block was written, body may follow.
    Committed,
    /// Body was finished by [`Response::flush`].
    Finished,
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP response.
///
/// A response is bound to the sink of a single connection, and owns the path
/// from headers, cookies and body to the bytes on the wire. It starts out
/// open, which means that status, headers and cookies can be changed. The
/// header block is committed exactly once, either explicitly through
/// [`Response::commit`], or implicitly by the first body write. From then on,
/// the header set is frozen: every method that would change it fails with
/// [`Error::AlreadyCommitted`].
///
/// Bodies are either streamed from a reader or file, which is sent in chunks
/// and flushed after every chunk, or written as text through the lazily
/// created [`TextWriter`], which is sent when the response is flushed. If
/// text was written and neither `Content-Length` nor `Transfer-Encoding` is
/// set, the response switches to chunked transfer coding on its own.
///
/// Any I/O error is passed to the caller, after which the response must not
/// be used anymore, and the connection should be dropped.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use courier::http::{Response, Status};
/// use std::fmt::Write;
///
/// // Create response and write text
/// let mut res = Response::new(Vec::new());
/// res.set_status(Status::Ok)?;
/// res.set_content_type("text/plain")?;
/// write!(res.writer(), "Hello, world!")?;
///
/// // Finish response
/// res.flush()?;
/// assert!(res.is_committed());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Response<W> {
    /// Response headers.
    headers: Headers,
    /// Cookies, turned into fields on commit.
    cookies: Vec<Cookie>,
    /// Response state.
    state: State,
    /// Metered connection sink.
    wire: Wire<W>,
    /// Text writer, created on first access.
    writer: Option<TextWriter>,
    /// Number of bytes read from a body source at once.
    chunk_size: usize,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<W> Response<W>
where
    W: Write,
{
    /// Creates a response with default configuration.
    ///
    /// The response starts with status `200 OK` and `Connection: close`, and
    /// records sent bytes in the process-wide [`Statistics::global`]. Use a
    /// [`Builder`] for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::http::Response;
    ///
    /// // Create response
    /// let res = Response::new(Vec::new());
    /// assert_eq!(res.headers().status(), "200 OK");
    /// ```
    #[inline]
    #[must_use]
    pub fn new(sink: W) -> Self {
        Builder::new().build(sink)
    }

    /// Commits the header block.
    ///
    /// Cookies are added as `Set-Cookie` fields in insertion order, then the
    /// header block is written to the connection. This can only happen once
    /// per response, so a second call fails with [`Error::AlreadyCommitted`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use courier::http::Response;
    ///
    /// // Create response and commit headers
    /// let mut res = Response::new(Vec::new());
    /// res.commit()?;
    ///
    /// // Committing again is an error
    /// assert!(res.commit().is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn commit(&mut self) -> Result {
        self.ensure_open()?;
        self.state = State::Committed;

        // Cookies are only turned into fields now, so they are encoded with
        // the time the header block is actually sent
        let now = SystemTime::now();
        for cookie in &self.cookies {
            self.headers.insert(Header::SetCookie, cookie.encode(now));
        }

        // Write header block through the same path as any other body
        debug!(
            status = self.headers.status(),
            fields = self.headers.len(),
            "committing headers"
        );
        let block = encode(&self.headers);
        self.copy(block.as_slice())
    }

    /// Streams the given source to the connection.
    ///
    /// If the header block wasn't committed yet, it's committed first. The
    /// source is read until its end, and every chunk is flushed to the
    /// connection right away. Read and write errors are passed on, but the
    /// source is closed without reporting errors, as all data was sent.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use courier::http::Response;
    ///
    /// // Create response and stream body
    /// let mut res = Response::new(Vec::new());
    /// res.set_content_length(13)?;
    /// res.serve_stream(&b"Hello, world!"[..])?;
    /// assert!(res.get_ref().ends_with(b"\r\n\r\nHello, world!"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn serve_stream<R>(&mut self, source: R) -> Result
    where
        R: Read,
    {
        match self.state {
            State::Open => self.commit()?,
            State::Committed => {}
            State::Finished => return Err(Error::Finished),
        }
        self.copy(source)
    }

    /// Streams the file at the given path to the connection.
    ///
    /// `Content-Length` is set to the size of the file, and `Content-Type` is
    /// derived from the file extension, unless it was set before. As headers
    /// must still be changeable, the response must not be committed yet. If
    /// the file can't be opened or isn't a regular file, the response is left
    /// untouched.
    pub fn serve_file<P>(&mut self, path: P) -> Result
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        self.ensure_open()?;

        // Open file before touching headers, as directories can be opened
        // as well, but fail on the first read
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(Error::Io(io::Error::new(
                ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            )));
        }
        self.set_content_length(metadata.len())?;
        if !self.headers.contains(Header::ContentType) {
            self.set_content_type(mime::guess(path))?;
        }
        self.serve_stream(file)
    }

    /// Finishes the response.
    ///
    /// If text was written and the body length is unknown, the response is
    /// switched to chunked transfer coding before the header block is sent.
    /// Then, headers are committed unless that already happened, pending text
    /// is sent, followed by the terminating chunk when chunked, and the sink
    /// is flushed.
    ///
    /// Flushing again only flushes the sink. However, if text was written in
    /// the meantime, this fails with [`Error::Finished`], as the body can't be
    /// extended anymore.
    pub fn flush(&mut self) -> Result {
        if self.state == State::Open {
            if self.writer.is_some()
                && !self.headers.contains(Header::TransferEncoding)
                && !self.headers.contains(Header::ContentLength)
            {
                self.headers.insert(Header::TransferEncoding, "chunked");
            }
            self.commit()?;
        }

        // Send pending text, framed according to the committed headers
        if let Some(writer) = &mut self.writer {
            let pending = writer.take();
            if self.state == State::Finished {
                if !pending.is_empty() {
                    return Err(Error::Finished);
                }
            } else {
                let mut body = if is_chunked(&self.headers) {
                    Chunked::new(&mut self.wire)
                } else {
                    Chunked::raw(&mut self.wire)
                };
                body.write_all(&pending)?;
                body.finish()?;
            }
        }

        // Mark as finished and flush sink
        self.state = State::Finished;
        self.wire.flush()?;
        Ok(())
    }

    /// Copies the source to the connection, flushing after every chunk.
    fn copy<R>(&mut self, mut source: R) -> Result
    where
        R: Read,
    {
        let mut buffer = vec![0; self.chunk_size];
        loop {
            let bytes = match source.read(&mut buffer) {
                Ok(0) => break,
                Ok(bytes) => bytes,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            self.wire.write_all(&buffer[..bytes])?;
            self.wire.flush()?;
            trace!(bytes, "sent chunk");
        }

        // The source is closed when dropped, which discards close errors
        self.wire.flush()?;
        Ok(())
    }
}

impl<W> Response<W> {
    /// Returns the header set.
    ///
    /// After the response was committed, this is the header block that was
    /// sent, including the `Set-Cookie` fields derived from cookies.
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the header set for modification.
    #[inline]
    pub fn headers_mut(&mut self) -> Result<&mut Headers> {
        self.ensure_open()?;
        Ok(&mut self.headers)
    }

    /// Returns the cookies added so far.
    #[inline]
    #[must_use]
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Returns the content type, if set.
    #[inline]
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(Header::ContentType)
    }

    /// Returns the text writer, creating it on first access.
    ///
    /// Repeated calls return the same writer, so text accumulates until the
    /// response is flushed. Requesting the writer is what makes a response
    /// without known length use chunked transfer coding.
    #[inline]
    pub fn writer(&mut self) -> &mut TextWriter {
        self.writer.get_or_insert_with(TextWriter::new)
    }

    /// Returns whether the header block was committed.
    #[inline]
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.state != State::Open
    }

    /// Returns the number of bytes this response sent to the connection.
    #[inline]
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.wire.sent()
    }

    /// Returns a reference to the underlying sink.
    #[inline]
    pub fn get_ref(&self) -> &W {
        self.wire.get_ref()
    }

    /// Consumes the response and returns the underlying sink.
    #[inline]
    pub fn into_inner(self) -> W {
        self.wire.into_inner()
    }

    /// Ensures the header block wasn't committed yet.
    fn ensure_open(&self) -> Result {
        if self.state == State::Open {
            Ok(())
        } else {
            Err(Error::AlreadyCommitted)
        }
    }
}

impl<W> Response<W> {
    /// Sets the status line text, e.g., a [`Status`].
    #[allow(clippy::needless_pass_by_value)]
    pub fn set_status<S>(&mut self, status: S) -> Result
    where
        S: ToString,
    {
        self.headers_mut().map(|headers| headers.set_status(status))
    }

    /// Sets the given header, see [`Headers::insert`].
    pub fn set_header<N, V>(&mut self, name: N, value: V) -> Result
    where
        N: AsRef<str>,
        V: ToString,
    {
        self.headers_mut().map(|headers| headers.insert(name, value))
    }

    /// Sets the `Content-Type` header.
    pub fn set_content_type<V>(&mut self, content_type: V) -> Result
    where
        V: ToString,
    {
        self.set_header(Header::ContentType, content_type)
    }

    /// Sets the `Content-Length` header.
    pub fn set_content_length(&mut self, length: u64) -> Result {
        self.set_header(Header::ContentLength, length)
    }

    /// Sets the `Connection` header to `keep-alive` or `close`.
    pub fn set_keep_alive(&mut self, keep_alive: bool) -> Result {
        self.set_header(Header::Connection, builder::connection(keep_alive))
    }

    /// Adds a cookie, sent as a `Set-Cookie` field on commit.
    pub fn add_cookie(&mut self, cookie: Cookie) -> Result {
        self.ensure_open()?;
        self.cookies.push(cookie);
        Ok(())
    }

    /// Redirects permanently to the given location.
    pub fn redirect<L>(&mut self, location: L) -> Result
    where
        L: ToString,
    {
        self.set_status(Status::MovedPermanently)?;
        self.set_header(Header::Location, location)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns whether the headers select chunked transfer coding.
fn is_chunked(headers: &Headers) -> bool {
    headers
        .get(Header::TransferEncoding)
        .is_some_and(|value| value.eq_ignore_ascii_case("chunked"))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fmt::Write as _;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::{env, fs, process};

    use super::*;

    /// Sink counting flushes.
    #[derive(Debug, Default)]
    struct FlushCounter {
        bytes: Vec<u8>,
        flushes: usize,
    }

    impl Write for FlushCounter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.bytes.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    /// Sink failing on every write.
    #[derive(Debug)]
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Source failing after the first read.
    struct Truncated(bool);

    impl Read for Truncated {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0 {
                return Err(io::Error::from(ErrorKind::UnexpectedEof));
            }
            self.0 = true;
            buf[0] = b'x';
            Ok(1)
        }
    }

    fn response() -> (Response<Vec<u8>>, Arc<Statistics>) {
        let stats = Arc::new(Statistics::new());
        let res = Builder::new().counter(stats.clone()).build(Vec::new());
        (res, stats)
    }

    fn output(res: &Response<Vec<u8>>) -> String {
        String::from_utf8(res.get_ref().clone()).unwrap()
    }

    #[test]
    fn test_commit_defaults() {
        let (mut res, stats) = response();
        res.commit().unwrap();
        assert_eq!(output(&res), "HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n");
        assert_eq!(stats.bytes_sent(), res.sent());
    }

    #[test]
    fn test_commit_twice_fails() {
        let (mut res, _) = response();
        res.commit().unwrap();
        assert!(matches!(res.commit(), Err(Error::AlreadyCommitted)));
        res.flush().unwrap();
        assert!(matches!(res.commit(), Err(Error::AlreadyCommitted)));
    }

    #[test]
    fn test_mutation_after_commit_fails() {
        let (mut res, _) = response();
        res.serve_stream(&b""[..]).unwrap();
        assert!(matches!(
            res.set_status(Status::NotFound),
            Err(Error::AlreadyCommitted)
        ));
        assert!(res.set_content_type("text/plain").is_err());
        assert!(res.set_keep_alive(true).is_err());
        assert!(res.add_cookie(Cookie::new("a", "b")).is_err());
        assert!(res.headers_mut().is_err());
        assert_eq!(res.headers().status(), "200 OK");
    }

    #[test]
    fn test_cookies_in_order() {
        let (mut res, _) = response();
        res.add_cookie(Cookie::new("a", "1")).unwrap();
        res.add_cookie(Cookie::new("b", "2").path("/").secure(true)).unwrap();
        res.commit().unwrap();
        assert_eq!(
            output(&res),
            "HTTP/1.1 200 OK\r\nConnection: close\r\n\
             Set-Cookie: a=1\r\n\
             Set-Cookie: b=2; Path=/; Secure\r\n\r\n"
        );
        assert_eq!(res.cookies().len(), 2);
    }

    #[test]
    fn test_writer_without_length_is_chunked() {
        let (mut res, _) = response();
        res.writer().write_str("Hello").unwrap();
        res.flush().unwrap();
        assert_eq!(res.headers().get(Header::TransferEncoding), Some("chunked"));
        assert_eq!(
            output(&res),
            "HTTP/1.1 200 OK\r\nConnection: close\r\n\
             Transfer-Encoding: chunked\r\n\r\n\
             5\r\nHello\r\n0\r\n\r\n"
        );
    }

    #[test]
    fn test_writer_with_length_is_raw() {
        let (mut res, _) = response();
        res.set_content_length(5).unwrap();
        res.writer().write_str("Hello").unwrap();
        res.flush().unwrap();
        assert!(!res.headers().contains(Header::TransferEncoding));
        assert_eq!(
            output(&res),
            "HTTP/1.1 200 OK\r\nConnection: close\r\n\
             Content-Length: 5\r\n\r\nHello"
        );
    }

    #[test]
    fn test_writer_is_memoized() {
        let (mut res, _) = response();
        res.writer().write_str("a").unwrap();
        res.writer().write_str("b").unwrap();
        assert_eq!(res.writer().len(), 2);
    }

    #[test]
    fn test_flush_without_writer() {
        let (mut res, _) = response();
        res.flush().unwrap();
        assert!(!res.headers().contains(Header::TransferEncoding));
        assert_eq!(output(&res), "HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n");
    }

    #[test]
    fn test_flush_twice() {
        let (mut res, _) = response();
        res.writer().write_str("Hi").unwrap();
        res.flush().unwrap();
        let sent = res.sent();
        res.flush().unwrap();
        assert_eq!(res.sent(), sent);
        assert!(output(&res).ends_with("2\r\nHi\r\n0\r\n\r\n"));

        // Extending a finished body is an error
        res.writer().write_str("late").unwrap();
        assert!(matches!(res.flush(), Err(Error::Finished)));
        assert!(matches!(
            res.serve_stream(&b"late"[..]),
            Err(Error::Finished)
        ));
    }

    #[test]
    fn test_stream_byte_accounting() {
        let stats = Arc::new(Statistics::new());
        let mut res = Builder::new()
            .counter(stats.clone())
            .build(FlushCounter::default());
        res.commit().unwrap();

        // Capture state after header block
        let bytes = res.get_ref().bytes.len();
        let flushes = res.get_ref().flushes;
        let sent = stats.bytes_sent();

        // Stream 1500 bytes, which is three chunks of at most 512 bytes
        let body = vec![7u8; 1500];
        res.serve_stream(Cursor::new(body.clone())).unwrap();
        assert_eq!(res.get_ref().bytes.len() - bytes, 1500);
        assert_eq!(&res.get_ref().bytes[bytes..], body.as_slice());
        assert_eq!(stats.bytes_sent() - sent, 1500);
        assert_eq!(res.get_ref().flushes - flushes, 4);
    }

    #[test]
    fn test_chunk_size() {
        let mut res = Builder::new()
            .counter(Arc::new(Statistics::new()))
            .chunk_size(100)
            .build(FlushCounter::default());
        res.commit().unwrap();
        let flushes = res.get_ref().flushes;
        res.serve_stream(&[0u8; 250][..]).unwrap();
        assert_eq!(res.get_ref().flushes - flushes, 4);
    }

    #[test]
    fn test_write_failure_propagates() {
        let mut res = Builder::new()
            .counter(Arc::new(Statistics::new()))
            .build(Broken);
        assert!(matches!(res.commit(), Err(Error::Io(_))));
        assert!(res.is_committed());
        assert_eq!(res.sent(), 0);
    }

    #[test]
    fn test_read_failure_propagates() {
        let (mut res, _) = response();
        res.commit().unwrap();
        let sent = res.sent();
        assert!(matches!(
            res.serve_stream(Truncated(false)),
            Err(Error::Io(_))
        ));
        assert_eq!(res.sent(), sent + 1);
    }

    #[test]
    fn test_serve_file() {
        let path = env::temp_dir()
            .join(format!("courier-{}-serve.txt", process::id()));
        fs::write(&path, "file contents").unwrap();

        let (mut res, _) = response();
        res.serve_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(res.headers().get(Header::ContentLength), Some("13"));
        assert_eq!(res.content_type(), Some("text/plain; charset=utf-8"));
        assert!(output(&res).ends_with("\r\n\r\nfile contents"));
    }

    #[test]
    fn test_serve_missing_file() {
        let (mut res, _) = response();
        let path = env::temp_dir().join("courier-missing-file.txt");
        assert!(matches!(res.serve_file(&path), Err(Error::Io(_))));
        assert!(!res.is_committed());
        assert!(!res.headers().contains(Header::ContentLength));
    }

    #[test]
    fn test_serve_directory() {
        let (mut res, _) = response();
        let result = res.serve_file(env::temp_dir());
        assert!(matches!(
            result,
            Err(Error::Io(err)) if err.kind() == ErrorKind::InvalidInput
        ));
        assert!(!res.is_committed());
        assert!(!res.headers().contains(Header::ContentLength));
        assert!(!res.headers().contains(Header::ContentType));
        assert_eq!(res.sent(), 0);
    }

    #[test]
    fn test_redirect() {
        let (mut res, _) = response();
        res.redirect("/login").unwrap();
        res.set_keep_alive(true).unwrap();
        res.flush().unwrap();
        assert_eq!(
            output(&res),
            "HTTP/1.1 301 Moved Permanently\r\n\
             Connection: keep-alive\r\n\
             Location: /login\r\n\r\n"
        );
    }
}
