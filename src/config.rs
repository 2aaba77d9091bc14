//! Builder configuration.
//!
//! Controls which header names a [`RequestBuilder`](crate::RequestBuilder)
//! refuses to set. Framing and connection management headers belong to the
//! transport, so they are restricted unless explicitly allowed.

use std::collections::BTreeSet;

/// Environment variable listing restricted header names to allow.
///
/// The value is a comma-separated list, e.g. `host,connection`.
pub const ALLOW_RESTRICTED_HEADERS_ENV: &str = "REQUISITION_ALLOW_RESTRICTED_HEADERS";

/// Header names restricted by default.
pub const DEFAULT_RESTRICTED_HEADERS: [&str; 5] =
    ["connection", "content-length", "expect", "host", "upgrade"];

/// Configuration shared by a builder and all of its copies.
///
/// # Examples
///
/// ```
/// use requisition::BuilderConfig;
///
/// let config = BuilderConfig::builder()
///     .allow_header("Host")
///     .restrict_header("X-Internal")
///     .build();
///
/// assert!(!config.is_restricted("host"));
/// assert!(config.is_restricted("x-internal"));
/// assert!(config.is_restricted("Content-Length"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Lowercased names the builder refuses to set.
    restricted_headers: BTreeSet<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            restricted_headers: DEFAULT_RESTRICTED_HEADERS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl BuilderConfig {
    /// Creates a new builder for configuring request builders.
    pub fn builder() -> BuilderConfigBuilder {
        BuilderConfigBuilder::default()
    }

    /// Creates a configuration with no restricted headers.
    pub fn unrestricted() -> Self {
        Self {
            restricted_headers: BTreeSet::new(),
        }
    }

    /// Loads the default configuration, lifting any restricted header named in
    /// [`ALLOW_RESTRICTED_HEADERS_ENV`].
    pub fn from_env() -> Self {
        match std::env::var(ALLOW_RESTRICTED_HEADERS_ENV) {
            Ok(list) => Self::default().allowing(list.split(',')),
            Err(_) => Self::default(),
        }
    }

    /// Returns `true` if `name` may not be set through the builder.
    ///
    /// The comparison is case-insensitive.
    pub fn is_restricted(&self, name: &str) -> bool {
        self.restricted_headers.contains(&name.to_ascii_lowercase())
    }

    /// Iterates over the restricted names, lowercased.
    pub fn restricted_headers(&self) -> impl Iterator<Item = &str> {
        self.restricted_headers.iter().map(String::as_str)
    }

    fn allowing<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for name in names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if self.restricted_headers.remove(&name.to_ascii_lowercase()) {
                tracing::debug!(header = name, "Allowing restricted header");
            }
        }
        self
    }
}

/// Builder for `BuilderConfig`.
#[derive(Default)]
pub struct BuilderConfigBuilder {
    allow_all: bool,
    allowed: Vec<String>,
    restricted: Vec<String>,
}

impl BuilderConfigBuilder {
    /// Lifts the restriction on `name`.
    pub fn allow_header(mut self, name: impl Into<String>) -> Self {
        self.allowed.push(name.into());
        self
    }

    /// Adds `name` to the restricted set.
    pub fn restrict_header(mut self, name: impl Into<String>) -> Self {
        self.restricted.push(name.into());
        self
    }

    /// Lifts every default restriction.
    ///
    /// Names added with [`restrict_header`](Self::restrict_header) still apply.
    pub fn allow_all_headers(mut self) -> Self {
        self.allow_all = true;
        self
    }

    /// Builds the `BuilderConfig`.
    pub fn build(self) -> BuilderConfig {
        let base = if self.allow_all {
            BuilderConfig::unrestricted()
        } else {
            BuilderConfig::default()
        };
        let mut config = base.allowing(self.allowed.iter().map(String::as_str));
        config.restricted_headers.extend(
            self.restricted
                .iter()
                .map(|name| name.trim().to_ascii_lowercase())
                .filter(|name| !name.is_empty()),
        );
        config
    }
}
