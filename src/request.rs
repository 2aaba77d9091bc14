//! The immutable request produced by [`RequestBuilder::build`].
//!
//! A [`Request`] owns a full copy of the builder state at the time `build()`
//! was called. Only the body producer is shared, since it is an external
//! resource. A `Request` is `Send + Sync` and may be read from any number of
//! threads.

use crate::builder::RequestBuilder;
use crate::uri::IntoUri;
use crate::{BodySpec, Error, HttpHeaders, Result};
use http::{HeaderValue, Method, Version};
use std::time::Duration;
use url::Url;

/// Timeout hint attached to the extensions of [`Request::to_http`] output.
///
/// The transport decides how to enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout(pub Duration);

/// An immutable HTTP request descriptor.
///
/// # Examples
///
/// ```
/// use requisition::{BodySpec, Request};
/// use std::time::Duration;
///
/// let mut builder = Request::builder_for("https://api.example.com/users")?;
/// builder
///     .post(BodySpec::from_string(r#"{"name":"Alice"}"#))?
///     .header("Content-Type", "application/json")?
///     .timeout(Duration::from_secs(30))?;
///
/// let request = builder.build()?;
/// assert_eq!(request.method(), "POST");
/// assert_eq!(request.uri().path(), "/users");
/// assert_eq!(request.timeout(), Some(Duration::from_secs(30)));
/// assert_eq!(
///     request.headers().first_value("content-type"),
///     Some("application/json")
/// );
/// # Ok::<(), requisition::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    uri: Url,
    method: Method,
    headers: HttpHeaders,
    body: Option<BodySpec>,
    expect_continue: bool,
    timeout: Option<Duration>,
    version: Option<Version>,
}

impl Request {
    /// Creates a builder with no URI set.
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    /// Creates a builder targeting `uri`.
    ///
    /// # Errors
    ///
    /// Fails as [`RequestBuilder::uri`] does.
    pub fn builder_for(uri: impl IntoUri) -> Result<RequestBuilder> {
        RequestBuilder::with_uri(uri)
    }

    pub(crate) fn new(
        uri: Url,
        method: Method,
        headers: HttpHeaders,
        body: Option<BodySpec>,
        expect_continue: bool,
        timeout: Option<Duration>,
        version: Option<Version>,
    ) -> Self {
        Self {
            uri,
            method,
            headers,
            body,
            expect_continue,
            timeout,
            version,
        }
    }

    /// The request target.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request headers.
    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// The attached body, or `None` if no body is attached.
    ///
    /// A present body may still be empty, see [`BodySpec::empty`].
    pub fn body(&self) -> Option<&BodySpec> {
        self.body.as_ref()
    }

    /// Whether the transport should send `Expect: 100-continue`.
    pub fn expect_continue(&self) -> bool {
        self.expect_continue
    }

    /// The timeout hint, if one was set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The preferred protocol version, if one was set.
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    /// Converts this descriptor into an [`http::Request`] for a transport.
    ///
    /// The body reference is carried as the request body. The timeout hint,
    /// if any, is stored as a [`Timeout`] extension, and `expect_continue`
    /// becomes an `Expect: 100-continue` header unless an `Expect` header was
    /// already set explicitly, in which case that value is kept. The URI
    /// fragment is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the `http` crate rejects the URI
    /// or a header.
    pub fn to_http(&self) -> Result<http::Request<Option<BodySpec>>> {
        let mut target = self.uri.clone();
        target.set_fragment(None);
        let uri: http::Uri = target
            .as_str()
            .parse()
            .map_err(|e| Error::invalid(format!("Invalid URI {}: {}", target, e)))?;

        let mut builder = http::Request::builder()
            .method(self.method.clone())
            .uri(uri);
        if let Some(version) = self.version {
            builder = builder.version(version);
        }
        let mut request = builder
            .body(self.body.clone())
            .map_err(|e| Error::invalid(format!("Invalid request: {}", e)))?;

        *request.headers_mut() = self.headers.to_header_map()?;
        if self.expect_continue {
            request
                .headers_mut()
                .entry(http::header::EXPECT)
                .or_insert(HeaderValue::from_static("100-continue"));
        }
        if let Some(timeout) = self.timeout {
            request.extensions_mut().insert(Timeout(timeout));
        }

        Ok(request)
    }
}
