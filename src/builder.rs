//! Fluent builder for [`Request`] descriptors.
//!
//! The [`RequestBuilder`] validates every argument as it is supplied and
//! raises failures at the offending call. A failed call leaves the builder as
//! it was, except for [`RequestBuilder::headers`], which keeps the pairs
//! applied before the first invalid one.

use crate::config::BuilderConfig;
use crate::headers::{HeaderStore, IntoHeaderPairs};
use crate::method::{MethodState, RequestMethods};
use crate::uri::{IntoUri, UriValidator};
use crate::{BodySpec, Error, Request, Result};
use http::Version;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Logs a rejected builder call and passes the result through.
fn logged<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    result.inspect_err(|e| {
        tracing::debug!(
            operation = operation,
            error = %e,
            "Rejected request builder call"
        )
    })
}

/// Builder for configuring and creating a [`Request`].
///
/// Each mutator takes `&mut self` and returns the same builder for chaining.
/// [`build`](Self::build) may be called any number of times; every call
/// produces an independent snapshot of the current state.
///
/// # Examples
///
/// ```
/// use requisition::{BodySpec, RequestBuilder};
/// use http::Version;
/// use std::time::Duration;
///
/// let mut builder = RequestBuilder::with_uri("http://www.foo.com/")?;
/// builder
///     .header("X-Foo", "1")?
///     .method("GET", BodySpec::empty())?
///     .expect_continue(true)
///     .timeout(Duration::from_secs(0xBEEF))?
///     .version(Version::HTTP_2)?;
///
/// let request = builder.build()?;
///
/// let copied = builder
///     .copy()
///     .header("X-Foo", "2")?
///     .header("X-Bar", "3")?
///     .build()?;
///
/// assert_eq!(request.headers().all_values("X-Foo"), ["1"]);
/// assert_eq!(copied.headers().all_values("X-Foo"), ["1", "2"]);
/// assert_eq!(request.timeout(), copied.timeout());
/// # Ok::<(), requisition::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    uri: Option<Url>,
    method: MethodState,
    headers: HeaderStore,
    expect_continue: bool,
    timeout: Option<Duration>,
    version: Option<Version>,
}

impl RequestBuilder {
    /// Creates a builder with no URI and the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with no URI using `config`.
    ///
    /// # Examples
    ///
    /// ```
    /// use requisition::{BuilderConfig, RequestBuilder};
    ///
    /// let config = BuilderConfig::builder().allow_header("Host").build();
    /// let mut builder = RequestBuilder::with_config(config);
    /// builder.header("Host", "internal.example.com")?;
    /// # Ok::<(), requisition::Error>(())
    /// ```
    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            headers: HeaderStore::with_config(Arc::new(config)),
            ..Self::default()
        }
    }

    /// Creates a builder targeting `uri`.
    ///
    /// # Errors
    ///
    /// Fails as [`uri`](Self::uri) does.
    pub fn with_uri(uri: impl IntoUri) -> Result<Self> {
        let mut builder = Self::new();
        builder.uri(uri)?;
        Ok(builder)
    }

    /// Sets the request target.
    ///
    /// # Errors
    ///
    /// - [`Error::NullArgument`] if `uri` is `None`.
    /// - [`Error::InvalidArgument`] if the URI is relative, is not `http` or
    ///   `https`, or has an invalid port.
    pub fn uri(&mut self, uri: impl IntoUri) -> Result<&mut Self> {
        self.uri = Some(logged("uri", UriValidator::validate(uri))?);
        Ok(self)
    }

    /// Appends a header value, keeping values already set for `name`.
    ///
    /// # Errors
    ///
    /// - [`Error::NullArgument`] if `name` or `value` is `None`.
    /// - [`Error::InvalidArgument`] if `name` is not a token or is restricted,
    ///   or `value` is empty or contains CR or LF.
    pub fn header<'a>(
        &mut self,
        name: impl Into<Option<&'a str>>,
        value: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self> {
        let (name, value) = (name.into(), value.into());
        logged("header", self.headers.append(name, value))?;
        tracing::trace!(header = name, "Appended header");
        Ok(self)
    }

    /// Sets a header, replacing any values already set for `name`.
    ///
    /// # Errors
    ///
    /// Same as [`header`](Self::header).
    pub fn set_header<'a>(
        &mut self,
        name: impl Into<Option<&'a str>>,
        value: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self> {
        let (name, value) = (name.into(), value.into());
        logged("set_header", self.headers.set(name, value))?;
        tracing::trace!(header = name, "Set header");
        Ok(self)
    }

    /// Appends headers from a flat sequence of name/value pairs.
    ///
    /// Pairs are applied left to right; when a pair is rejected, the pairs
    /// before it remain applied.
    ///
    /// # Errors
    ///
    /// - [`Error::NullArgument`] if `pairs` is `None` or a pair holds `None`.
    /// - [`Error::InvalidArgument`] if `pairs` is empty or of odd length, or a
    ///   pair is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use requisition::RequestBuilder;
    ///
    /// let mut builder = RequestBuilder::with_uri("http://www.foo.com/")?;
    /// builder.headers(["Accept", "*/*", "X-Foo", "1"])?;
    ///
    /// assert!(builder.headers(["X-Bar", "2", "X-Baz"]).is_err());
    /// assert!(builder.headers([Some("X-Bar"), None]).is_err());
    /// # Ok::<(), requisition::Error>(())
    /// ```
    pub fn headers<'a>(&mut self, pairs: impl IntoHeaderPairs<'a>) -> Result<&mut Self> {
        let pairs = pairs.into_header_pairs();
        logged("headers", self.headers.append_pairs(pairs.as_deref()))?;
        Ok(self)
    }

    /// Sets the method to `GET` and drops any attached body.
    pub fn get(&mut self) -> &mut Self {
        self.method.get();
        self
    }

    /// Sets the method to `HEAD` with a present, empty body.
    ///
    /// This is the same state [`RequestMethods::head`] produces.
    pub fn head(&mut self) -> &mut Self {
        self.method.head();
        self
    }

    /// Sets the method to `POST` with `body`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullArgument`] if `body` is `None`.
    pub fn post(&mut self, body: impl Into<Option<BodySpec>>) -> Result<&mut Self> {
        logged("post", self.method.post(body))?;
        Ok(self)
    }

    /// Sets the method to `PUT` with `body`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullArgument`] if `body` is `None`.
    pub fn put(&mut self, body: impl Into<Option<BodySpec>>) -> Result<&mut Self> {
        logged("put", self.method.put(body))?;
        Ok(self)
    }

    /// Sets the method to `DELETE` and drops any attached body.
    pub fn delete(&mut self) -> &mut Self {
        self.method.delete();
        self
    }

    /// Sets an arbitrary method token with `body`.
    ///
    /// The body is kept as given, even when `name` is a well-known method
    /// such as `GET`.
    ///
    /// # Errors
    ///
    /// - [`Error::NullArgument`] if `name` or `body` is `None`.
    /// - [`Error::InvalidArgument`] if `name` is empty, not a token, or
    ///   `CONNECT`.
    pub fn method<'a>(
        &mut self,
        name: impl Into<Option<&'a str>>,
        body: impl Into<Option<BodySpec>>,
    ) -> Result<&mut Self> {
        logged("method", self.method.custom(name, body))?;
        tracing::trace!(method = %self.method.method(), "Set method");
        Ok(self)
    }

    /// Sets whether the transport should send `Expect: 100-continue`.
    pub fn expect_continue(&mut self, enable: bool) -> &mut Self {
        self.expect_continue = enable;
        self
    }

    /// Sets the timeout hint.
    ///
    /// # Errors
    ///
    /// - [`Error::NullArgument`] if `timeout` is `None`.
    /// - [`Error::InvalidArgument`] if `timeout` is zero.
    pub fn timeout(&mut self, timeout: impl Into<Option<Duration>>) -> Result<&mut Self> {
        let timeout = logged(
            "timeout",
            timeout.into().ok_or(Error::NullArgument("timeout")),
        )?;
        if timeout.is_zero() {
            return logged(
                "timeout",
                Err(Error::invalid(format!("invalid duration: {:?}", timeout))),
            );
        }
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Sets the preferred protocol version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullArgument`] if `version` is `None`.
    pub fn version(&mut self, version: impl Into<Option<Version>>) -> Result<&mut Self> {
        let version = logged(
            "version",
            version.into().ok_or(Error::NullArgument("version")),
        )?;
        self.version = Some(version);
        Ok(self)
    }

    /// Returns an independent builder with the same state.
    ///
    /// Headers are copied structurally and scalars by value. The body
    /// producer, if any, is shared.
    pub fn copy(&self) -> RequestBuilder {
        self.clone()
    }

    /// Builds a [`Request`] from the current state.
    ///
    /// Without an explicit method the request is a `GET` with no body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if no URI was ever set.
    pub fn build(&self) -> Result<Request> {
        let uri = logged(
            "build",
            self.uri
                .clone()
                .ok_or_else(|| Error::InvalidState("URI is required".to_string())),
        )?;

        let request = Request::new(
            uri,
            self.method.method(),
            self.headers.snapshot_view(),
            self.method.body().cloned(),
            self.expect_continue,
            self.timeout,
            self.version,
        );

        tracing::trace!(
            method = %request.method(),
            uri = %request.uri(),
            headers = request.headers().len(),
            has_body = request.body().is_some(),
            "Built request"
        );

        Ok(request)
    }
}

impl RequestMethods for RequestBuilder {
    fn method<'a>(
        &mut self,
        name: impl Into<Option<&'a str>>,
        body: impl Into<Option<BodySpec>>,
    ) -> Result<&mut Self> {
        RequestBuilder::method(self, name, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_URI: &str = "http://www.foo.com/";

    fn builder() -> RequestBuilder {
        RequestBuilder::with_uri(TEST_URI).unwrap()
    }

    #[test]
    fn test_build_without_uri() {
        let err = RequestBuilder::new().build().unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[test]
    fn test_build_defaults() {
        let request = builder().build().unwrap();
        assert_eq!(request.uri().as_str(), TEST_URI);
        assert_eq!(request.method(), "GET");
        assert!(request.body().is_none());
        assert!(request.headers().is_empty());
        assert!(!request.expect_continue());
        assert_eq!(request.timeout(), None);
        assert_eq!(request.version(), None);
    }

    #[test]
    fn test_failed_uri_keeps_previous() {
        let mut b = builder();
        assert!(b.uri("https://www.foo.com:-1/").is_err());
        assert!(b.uri(None::<&str>).unwrap_err().is_null_argument());
        assert_eq!(b.build().unwrap().uri().as_str(), TEST_URI);

        b.uri("https://other.example.com/x").unwrap();
        assert_eq!(b.build().unwrap().uri().host_str(), Some("other.example.com"));
    }

    #[test]
    fn test_timeout_validation() {
        let mut b = builder();
        assert_eq!(b.timeout(None).unwrap_err(), Error::NullArgument("timeout"));
        assert!(b.timeout(Duration::ZERO).unwrap_err().is_invalid_argument());
        assert_eq!(b.build().unwrap().timeout(), None);

        b.timeout(Duration::from_nanos(1)).unwrap();
        assert_eq!(b.build().unwrap().timeout(), Some(Duration::from_nanos(1)));
    }

    #[test]
    fn test_version_validation() {
        let mut b = builder();
        assert_eq!(b.version(None).unwrap_err(), Error::NullArgument("version"));
        b.version(Version::HTTP_11).unwrap();
        assert_eq!(b.build().unwrap().version(), Some(Version::HTTP_11));
    }

    #[test]
    fn test_restricted_header_through_builder() {
        let mut b = builder();
        assert!(b.header("Host", "example.com").unwrap_err().is_invalid_argument());
        assert!(b.set_header("Connection", "close").unwrap_err().is_invalid_argument());

        let mut open = RequestBuilder::with_config(BuilderConfig::unrestricted());
        open.uri(TEST_URI).unwrap().header("Host", "example.com").unwrap();
        assert_eq!(
            open.build().unwrap().headers().first_value("host"),
            Some("example.com")
        );
    }

    #[test]
    fn test_copy_shares_config() {
        let mut b = RequestBuilder::with_config(BuilderConfig::unrestricted());
        b.uri(TEST_URI).unwrap();
        let mut copy = b.copy();
        assert!(copy.header("Upgrade", "h2c").is_ok());
    }

    #[test]
    fn test_copy_shares_body_producer() {
        let body = BodySpec::from_string("shared");
        let mut b = builder();
        b.post(body.clone()).unwrap();

        let copy = b.copy();
        b.get();

        assert!(b.build().unwrap().body().is_none());
        assert_eq!(copy.build().unwrap().body(), Some(&body));
    }

    #[test]
    fn test_build_snapshots_are_independent() {
        let mut b = builder();
        b.header("X-Foo", "1").unwrap();
        let first = b.build().unwrap();

        b.header("X-Foo", "2")
            .unwrap()
            .delete()
            .expect_continue(true);
        let second = b.build().unwrap();

        assert_eq!(first.headers().all_values("X-Foo"), ["1"]);
        assert_eq!(first.method(), "GET");
        assert!(!first.expect_continue());
        assert_eq!(second.headers().all_values("X-Foo"), ["1", "2"]);
        assert_eq!(second.method(), "DELETE");
        assert!(second.expect_continue());
    }

    #[test]
    fn test_trait_head_matches_inherent_head() {
        let mut via_trait = builder();
        RequestMethods::head(&mut via_trait).unwrap();
        let mut inherent = builder();
        inherent.head();

        let a = via_trait.build().unwrap();
        let b = inherent.build().unwrap();
        assert_eq!(a.method(), b.method());
        assert!(a.body().is_some_and(BodySpec::is_empty));
        assert!(b.body().is_some_and(BodySpec::is_empty));
    }
}
