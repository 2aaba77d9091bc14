//! The method/body state of a builder.
//!
//! A builder carries exactly one [`MethodState`]. Each method-setting call
//! replaces the method and its body together, so only the most recent call
//! counts.

use crate::headers::is_token;
use crate::{BodySpec, Error, Result};
use http::Method;

/// The current method token and its paired body.
///
/// # Examples
///
/// ```
/// use requisition::{BodySpec, MethodState};
/// use http::Method;
///
/// let mut state = MethodState::default();
/// state.post(BodySpec::from_string("data")).unwrap();
/// state.get();
///
/// assert_eq!(state.method(), Method::GET);
/// assert!(state.body().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MethodState {
    /// No method-setting call was made yet; resolves to `GET` without body.
    #[default]
    Unset,

    /// A method was set explicitly.
    Current {
        /// The method token.
        method: Method,
        /// The attached body, or `None` if no body is attached.
        body: Option<BodySpec>,
    },
}

impl MethodState {
    /// Switches to `GET`, dropping any attached body.
    pub fn get(&mut self) {
        self.replace(Method::GET, None);
    }

    /// Switches to `HEAD` with a present, empty body.
    pub fn head(&mut self) {
        self.replace(Method::HEAD, Some(BodySpec::empty()));
    }

    /// Switches to `POST` with `body`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullArgument`] if `body` is `None`.
    pub fn post(&mut self, body: impl Into<Option<BodySpec>>) -> Result<()> {
        let body = body.into().ok_or(Error::NullArgument("body"))?;
        self.replace(Method::POST, Some(body));
        Ok(())
    }

    /// Switches to `PUT` with `body`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullArgument`] if `body` is `None`.
    pub fn put(&mut self, body: impl Into<Option<BodySpec>>) -> Result<()> {
        let body = body.into().ok_or(Error::NullArgument("body"))?;
        self.replace(Method::PUT, Some(body));
        Ok(())
    }

    /// Switches to `DELETE`, dropping any attached body.
    pub fn delete(&mut self) {
        self.replace(Method::DELETE, None);
    }

    /// Switches to an arbitrary method token with `body`.
    ///
    /// Tokens are case-sensitive, so `"get"` is a custom method distinct from
    /// `GET`. The body is kept exactly as given, even for well-known methods.
    ///
    /// # Errors
    ///
    /// - [`Error::NullArgument`] if `name` or `body` is `None`.
    /// - [`Error::InvalidArgument`] if `name` is empty, is not a token, or is
    ///   `CONNECT`.
    pub fn custom<'a>(
        &mut self,
        name: impl Into<Option<&'a str>>,
        body: impl Into<Option<BodySpec>>,
    ) -> Result<()> {
        let name = name.into().ok_or(Error::NullArgument("method"))?;
        let body = body.into().ok_or(Error::NullArgument("body"))?;

        if name.is_empty() {
            return Err(Error::invalid("empty method"));
        }
        if !is_token(name) {
            return Err(Error::invalid(format!("illegal method: {:?}", name)));
        }
        if name == Method::CONNECT.as_str() {
            return Err(Error::invalid("method CONNECT is not supported"));
        }

        let method = Method::from_bytes(name.as_bytes())
            .map_err(|e| Error::invalid(format!("illegal method {:?}: {}", name, e)))?;
        self.replace(method, Some(body));
        Ok(())
    }

    fn replace(&mut self, method: Method, body: Option<BodySpec>) {
        *self = MethodState::Current { method, body };
    }

    /// Returns the effective method, `GET` while unset.
    pub fn method(&self) -> Method {
        match self {
            MethodState::Unset => Method::GET,
            MethodState::Current { method, .. } => method.clone(),
        }
    }

    /// Returns the attached body, if any.
    pub fn body(&self) -> Option<&BodySpec> {
        match self {
            MethodState::Unset => None,
            MethodState::Current { body, .. } => body.as_ref(),
        }
    }

    /// Returns `true` if no method-setting call was made.
    pub fn is_unset(&self) -> bool {
        matches!(self, MethodState::Unset)
    }
}

/// The minimal method-setting capability of a request builder.
///
/// Implementors supply the [`method`](Self::method) primitive and inherit
/// [`head`](Self::head), which is defined purely in terms of it.
///
/// The default `head` attaches [`BodySpec::empty()`]: a body that is
/// *present* but yields zero bytes. This differs from a `GET` built without
/// a body, where the body is absent. Implementors that override `head` may
/// pick either form.
///
/// # Examples
///
/// ```
/// use requisition::{BodySpec, RequestBuilder, RequestMethods, Result};
///
/// struct Wrapper(RequestBuilder);
///
/// impl RequestMethods for Wrapper {
///     fn method<'a>(
///         &mut self,
///         name: impl Into<Option<&'a str>>,
///         body: impl Into<Option<BodySpec>>,
///     ) -> Result<&mut Self> {
///         self.0.method(name, body)?;
///         Ok(self)
///     }
/// }
///
/// let mut wrapper = Wrapper(RequestBuilder::with_uri("http://www.foo.com/")?);
/// wrapper.head()?;
/// let request = wrapper.0.build()?;
/// assert_eq!(request.method(), "HEAD");
/// assert!(request.body().is_some_and(|body| body.is_empty()));
/// # Ok::<(), requisition::Error>(())
/// ```
pub trait RequestMethods {
    /// Sets the method token and its body.
    ///
    /// # Errors
    ///
    /// - [`Error::NullArgument`] if `name` or `body` is `None`.
    /// - [`Error::InvalidArgument`] if `name` is not a valid method token.
    fn method<'a>(
        &mut self,
        name: impl Into<Option<&'a str>>,
        body: impl Into<Option<BodySpec>>,
    ) -> Result<&mut Self>;

    /// Sets the method to `HEAD` with a present, empty body.
    fn head(&mut self) -> Result<&mut Self> {
        self.method("HEAD", BodySpec::empty())
    }
}
