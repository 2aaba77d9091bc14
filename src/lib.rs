//! # Requisition - validated HTTP request descriptors
//!
//! Requisition builds immutable HTTP request descriptors through a fluent,
//! eagerly validating builder. It performs no I/O: the [`Request`] it
//! produces is handed to a transport, which owns connections, TLS, redirects
//! and response handling.
//!
//! ## Quick Start
//!
//! ```
//! use requisition::{BodySpec, RequestBuilder};
//! use http::Version;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), requisition::Error> {
//! let mut builder = RequestBuilder::with_uri("https://api.example.com/users")?;
//! builder
//!     .post(BodySpec::from_string(r#"{"name":"Alice"}"#))?
//!     .header("Content-Type", "application/json")?
//!     .header("Accept", "application/json")?
//!     .timeout(Duration::from_secs(30))?
//!     .version(Version::HTTP_2)?;
//!
//! let request = builder.build()?;
//! assert_eq!(request.method(), "POST");
//!
//! // Reconfigure the same builder; the first snapshot is unaffected.
//! builder.get();
//! let probe = builder.build()?;
//! assert!(probe.body().is_none());
//! assert!(request.body().is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Fail-fast validation** - every argument is checked at the call that supplies it
//! - **Last call wins** - method and body are replaced together by each method-setting call
//! - **Ordered, case-insensitive headers** - multiple values per name, first casing kept for display
//! - **Independent copies** - [`RequestBuilder::copy`] shares nothing mutable with its source
//! - **Immutable snapshots** - every [`RequestBuilder::build`] call captures the state at that moment
//! - **Transport hand-off** - [`Request::to_http`] converts into an [`http::Request`]
//! - **Automatic logging** - rejected calls and built requests are reported through `tracing`
//!
//! ## Error Handling
//!
//! ```
//! use requisition::{Error, RequestBuilder};
//!
//! let mut builder = RequestBuilder::new();
//! match builder.build() {
//!     Err(Error::InvalidState(reason)) => eprintln!("not ready: {}", reason),
//!     Err(e) => eprintln!("other error: {}", e),
//!     Ok(_) => unreachable!(),
//! }
//!
//! assert!(matches!(builder.header(None, "value"), Err(Error::NullArgument(_))));
//! assert!(matches!(builder.header("X-Foo", "a\nb"), Err(Error::InvalidArgument(_))));
//! ```

mod body;
mod builder;
pub mod config;
mod error;
pub mod headers;
mod method;
mod request;
mod uri;

pub use body::{BodyPublisher, BodySpec, BytesPublisher};
pub use builder::RequestBuilder;
pub use config::BuilderConfig;
pub use error::{Error, Result};
pub use headers::{HeaderStore, HttpHeaders, IntoHeaderPairs};
pub use method::{MethodState, RequestMethods};
pub use request::{Request, Timeout};
pub use uri::{IntoUri, UriValidator};
