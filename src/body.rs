//! Request body references.
//!
//! A [`BodySpec`] is a shared handle to an externally owned body producer.
//! This crate never reads body content; it only carries the handle from the
//! builder to the built request. "No body attached" is expressed as
//! `Option::<BodySpec>::None`, which is distinct from [`BodySpec::empty`].

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A producer of request body bytes.
///
/// Implementations are owned by the transport side; whether they can be
/// replayed is up to them.
pub trait BodyPublisher: Send + Sync + fmt::Debug {
    /// Returns the number of bytes this producer will yield, or `None` if the
    /// length is not known in advance.
    fn content_length(&self) -> Option<u64>;

    /// Returns the full body content if the producer holds it in memory.
    fn bytes(&self) -> Option<&[u8]> {
        None
    }
}

/// A body held fully in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytesPublisher {
    bytes: Vec<u8>,
}

impl BytesPublisher {
    /// Returns the body content.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl BodyPublisher for BytesPublisher {
    fn content_length(&self) -> Option<u64> {
        Some(self.bytes.len() as u64)
    }

    fn bytes(&self) -> Option<&[u8]> {
        Some(&self.bytes)
    }
}

/// Shared reference to a body producer.
///
/// Cloning a `BodySpec` shares the producer rather than copying it, and two
/// specs compare equal only if they refer to the same producer.
///
/// # Examples
///
/// ```
/// use requisition::BodySpec;
///
/// let body = BodySpec::from_string("hello");
/// assert_eq!(body.content_length(), Some(5));
///
/// let shared = body.clone();
/// assert_eq!(body, shared);
/// assert_ne!(body, BodySpec::from_string("hello"));
///
/// assert!(BodySpec::empty().is_empty());
/// ```
#[derive(Clone)]
pub struct BodySpec {
    publisher: Arc<dyn BodyPublisher>,
}

impl BodySpec {
    /// Creates a body that yields zero bytes.
    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Creates a body from a UTF-8 string.
    pub fn from_string(body: impl Into<String>) -> Self {
        Self::from_bytes(body.into().into_bytes())
    }

    /// Creates a body from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_publisher(BytesPublisher {
            bytes: bytes.into(),
        })
    }

    /// Creates a body holding the JSON serialization of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] if `value` cannot be serialized.
    ///
    /// # Examples
    ///
    /// ```
    /// use requisition::BodySpec;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct CreateUser { name: String }
    ///
    /// let body = BodySpec::from_json(&CreateUser { name: "Alice".into() })?;
    /// assert_eq!(body.content_length(), Some(16));
    /// # Ok::<(), requisition::Error>(())
    /// ```
    pub fn from_json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| Error::SerializationFailed(e.to_string()))?;
        Ok(Self::from_bytes(bytes))
    }

    /// Wraps an external body producer.
    pub fn from_publisher<P: BodyPublisher + 'static>(publisher: P) -> Self {
        Self {
            publisher: Arc::new(publisher),
        }
    }

    /// Returns the producer behind this spec.
    pub fn publisher(&self) -> &dyn BodyPublisher {
        self.publisher.as_ref()
    }

    /// Returns the number of bytes the producer will yield, if known.
    pub fn content_length(&self) -> Option<u64> {
        self.publisher.content_length()
    }

    /// Returns the body content if it is held in memory.
    ///
    /// Bodies created with [`from_string`](Self::from_string),
    /// [`from_bytes`](Self::from_bytes) or [`from_json`](Self::from_json)
    /// always return `Some`.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.publisher.bytes()
    }

    /// Returns `true` if the producer is known to yield zero bytes.
    pub fn is_empty(&self) -> bool {
        self.content_length() == Some(0)
    }
}

impl PartialEq for BodySpec {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.publisher, &other.publisher)
    }
}

impl Eq for BodySpec {}

impl fmt::Debug for BodySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodySpec")
            .field("content_length", &self.content_length())
            .finish()
    }
}
