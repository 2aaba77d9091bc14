//! Validation of request target URIs.
//!
//! A request target must be absolute, use the `http` or `https` scheme and,
//! when it carries an explicit port, keep it within `0..=65535`.

use crate::{Error, Result};
use url::Url;

/// Conversion into a request target URI.
///
/// Implemented for already parsed [`Url`]s and for strings, which are parsed
/// on conversion. `Option<T>` is accepted as well; `None` stands for a missing
/// URI and fails with [`Error::NullArgument`].
///
/// Strings containing spaces or ASCII control characters (including tab, CR
/// and LF) are rejected rather than cleaned up. Parsing normalizes the rest:
/// an explicit default port such as `:80` for `http` is dropped, and the
/// scheme and host are lowercased.
///
/// # Examples
///
/// ```
/// use requisition::IntoUri;
///
/// let uri = "https://api.example.com/users".into_uri().unwrap();
/// assert_eq!(uri.host_str(), Some("api.example.com"));
///
/// let missing: Option<&str> = None;
/// assert!(missing.into_uri().unwrap_err().is_null_argument());
/// ```
pub trait IntoUri {
    /// Converts `self` into a parsed URI.
    fn into_uri(self) -> Result<Url>;
}

impl IntoUri for Url {
    fn into_uri(self) -> Result<Url> {
        Ok(self)
    }
}

impl IntoUri for &Url {
    fn into_uri(self) -> Result<Url> {
        Ok(self.clone())
    }
}

impl IntoUri for &str {
    fn into_uri(self) -> Result<Url> {
        if self.chars().any(|c| c == ' ' || c.is_ascii_control()) {
            return Err(Error::invalid(format!(
                "URI contains whitespace or control characters: {:?}",
                self
            )));
        }
        Url::parse(self).map_err(|e| match e {
            url::ParseError::RelativeUrlWithoutBase => {
                Error::invalid(format!("not absolute: {}", self))
            }
            url::ParseError::InvalidPort => Error::invalid(format!("invalid port: {}", self)),
            other => Error::invalid(format!("invalid URI {}: {}", self, other)),
        })
    }
}

impl IntoUri for String {
    fn into_uri(self) -> Result<Url> {
        self.as_str().into_uri()
    }
}

impl IntoUri for &String {
    fn into_uri(self) -> Result<Url> {
        self.as_str().into_uri()
    }
}

impl<T: IntoUri> IntoUri for Option<T> {
    fn into_uri(self) -> Result<Url> {
        self.ok_or(Error::NullArgument("uri"))?.into_uri()
    }
}

/// Stateless validator for request target URIs.
#[derive(Debug, Clone, Copy)]
pub struct UriValidator;

impl UriValidator {
    /// Validates `uri` and returns it parsed.
    ///
    /// # Errors
    ///
    /// - [`Error::NullArgument`] if `uri` is `None`.
    /// - [`Error::InvalidArgument`] if the URI is relative, uses a scheme
    ///   other than `http`/`https`, or carries an out-of-range port.
    ///
    /// # Examples
    ///
    /// ```
    /// use requisition::UriValidator;
    ///
    /// assert!(UriValidator::validate("http://www.foo.com/").is_ok());
    /// assert!(UriValidator::validate("/relative/path").is_err());
    /// assert!(UriValidator::validate("badScheme://www.foo.com/").is_err());
    /// ```
    pub fn validate(uri: impl IntoUri) -> Result<Url> {
        let uri = uri.into_uri()?;

        let scheme = uri.scheme();
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(Error::invalid(format!("unsupported scheme: {}", scheme)));
        }

        // Out-of-range ports never get this far: parsing rejects anything that
        // does not fit in a u16.
        if uri.host().is_none() {
            return Err(Error::invalid(format!("missing host: {}", uri)));
        }

        Ok(uri)
    }
}
