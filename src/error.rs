//! Error types for request construction.
//!
//! Every failure is raised by the call that introduced it. Nothing is deferred
//! to [`RequestBuilder::build`](crate::RequestBuilder::build) except the check
//! that a URI was ever set.

/// The main error type for building requests.
///
/// # Examples
///
/// ```
/// use requisition::{Error, RequestBuilder};
///
/// let mut builder = RequestBuilder::new();
/// match builder.header("X-Trace", "a\r\nb") {
///     Err(Error::InvalidArgument(reason)) => eprintln!("rejected: {}", reason),
///     Err(e) => eprintln!("other error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required argument was missing.
    ///
    /// The payload names the argument, e.g. `"uri"` or `"header name"`.
    #[error("{0} must not be null")]
    NullArgument(&'static str),

    /// A supplied value is syntactically malformed.
    ///
    /// Covers non-absolute or unsupported URIs, header names and values that
    /// violate the token or CR/LF rules, odd or empty header pair batches,
    /// malformed method tokens and non-positive timeouts.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The builder is not in a state that allows the operation.
    ///
    /// Raised by `build()` when no URI was ever successfully set.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Failed to serialize a JSON request body.
    #[error("Failed to serialize request body: {0}")]
    SerializationFailed(String),
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidArgument(reason.into())
    }

    /// Returns `true` if a required argument was missing.
    pub fn is_null_argument(&self) -> bool {
        matches!(self, Error::NullArgument(_))
    }

    /// Returns `true` if a supplied argument was malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use requisition::RequestBuilder;
    ///
    /// let err = RequestBuilder::with_uri("ftp://files.example.com/").unwrap_err();
    /// assert!(err.is_invalid_argument());
    /// ```
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Returns `true` if the operation was invoked in an invalid state.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Error::InvalidState(_))
    }
}

/// A specialized `Result` type for request construction.
///
/// This is a convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
