//! Ordered, case-insensitive, multi-valued header storage.
//!
//! [`HeaderStore`] is the builder's mutable header container. Names compare
//! case-insensitively but keep the casing of their first insertion for
//! display. Values for a name keep their insertion order, and names keep the
//! order in which they were first seen.
//!
//! [`HttpHeaders`] is the read-only snapshot embedded in a built
//! [`Request`](crate::Request).
//!
//! Syntax rules:
//!
//! | Part  | Rule |
//! |-------|------|
//! | Name  | Non-empty token: `ALPHA`, `DIGIT` or one of ``!#$%&'*+-.^_`|~`` |
//! | Value | Non-empty, no CR or LF; HTAB, SP, visible ASCII or U+0080..U+00FF |

use crate::config::BuilderConfig;
use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Returns `true` if `b` may appear in an HTTP token.
fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// Returns `true` if `s` is a non-empty HTTP token.
///
/// Tokens are used for both header names and method names.
pub(crate) fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_tchar)
}

fn is_value_char(c: char) -> bool {
    match c {
        '\t' | ' ' => true,
        '\u{21}'..='\u{7e}' => true,
        '\u{80}'..='\u{ff}' => true,
        _ => false,
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid("empty header name"));
    }
    if !is_token(name) {
        return Err(Error::invalid(format!("invalid header name: {:?}", name)));
    }
    Ok(())
}

fn validate_value(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid(format!("empty value for header {:?}", name)));
    }
    if value.contains(['\r', '\n']) {
        return Err(Error::invalid(format!(
            "header value for {:?} contains CR or LF",
            name
        )));
    }
    if !value.chars().all(is_value_char) {
        return Err(Error::invalid(format!(
            "invalid header value for {:?}: {:?}",
            name, value
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct HeaderEntry {
    /// Casing of the first insertion.
    name: String,
    values: Vec<String>,
}

/// Conversion into a flat sequence of header name/value pairs.
///
/// Even positions hold names, odd positions hold values. Implemented for
/// arrays, slices and vectors of `&str` or `Option<&str>`; an element of
/// `None` is a missing argument. `Option<T>` is accepted as well, where `None`
/// stands for a missing sequence.
pub trait IntoHeaderPairs<'a> {
    /// Returns the flat pair sequence, or `None` if the sequence is missing.
    fn into_header_pairs(self) -> Option<Vec<Option<&'a str>>>;
}

impl<'a, const N: usize> IntoHeaderPairs<'a> for [&'a str; N] {
    fn into_header_pairs(self) -> Option<Vec<Option<&'a str>>> {
        Some(self.into_iter().map(Some).collect())
    }
}

impl<'a, const N: usize> IntoHeaderPairs<'a> for [Option<&'a str>; N] {
    fn into_header_pairs(self) -> Option<Vec<Option<&'a str>>> {
        Some(self.to_vec())
    }
}

impl<'a, const N: usize> IntoHeaderPairs<'a> for &[&'a str; N] {
    fn into_header_pairs(self) -> Option<Vec<Option<&'a str>>> {
        Some(self.iter().copied().map(Some).collect())
    }
}

impl<'a> IntoHeaderPairs<'a> for &[&'a str] {
    fn into_header_pairs(self) -> Option<Vec<Option<&'a str>>> {
        Some(self.iter().copied().map(Some).collect())
    }
}

impl<'a> IntoHeaderPairs<'a> for &[Option<&'a str>] {
    fn into_header_pairs(self) -> Option<Vec<Option<&'a str>>> {
        Some(self.to_vec())
    }
}

impl<'a> IntoHeaderPairs<'a> for Vec<&'a str> {
    fn into_header_pairs(self) -> Option<Vec<Option<&'a str>>> {
        Some(self.into_iter().map(Some).collect())
    }
}

impl<'a> IntoHeaderPairs<'a> for Vec<Option<&'a str>> {
    fn into_header_pairs(self) -> Option<Vec<Option<&'a str>>> {
        Some(self)
    }
}

impl<'a, T: IntoHeaderPairs<'a>> IntoHeaderPairs<'a> for Option<T> {
    fn into_header_pairs(self) -> Option<Vec<Option<&'a str>>> {
        self.and_then(IntoHeaderPairs::into_header_pairs)
    }
}

/// Mutable header container owned by a builder.
///
/// Every stored pair has passed syntax validation, and no two names that are
/// equal ignoring ASCII case are tracked separately. Cloning produces a fully
/// independent store.
///
/// # Examples
///
/// ```
/// use requisition::HeaderStore;
///
/// let mut store = HeaderStore::new();
/// store.append(Some("X-Foo"), Some("1")).unwrap();
/// store.append(Some("x-foo"), Some("2")).unwrap();
/// assert_eq!(store.get("X-FOO"), ["1", "2"]);
///
/// store.set(Some("X-Foo"), Some("9")).unwrap();
/// assert_eq!(store.get("x-foo"), ["9"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeaderStore {
    /// Keyed by lowercased name.
    entries: IndexMap<String, HeaderEntry>,
    config: Arc<BuilderConfig>,
}

impl HeaderStore {
    /// Creates an empty store with the default restricted header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store using the restrictions in `config`.
    pub fn with_config(config: Arc<BuilderConfig>) -> Self {
        Self {
            entries: IndexMap::new(),
            config,
        }
    }

    /// Validates a name/value pair, returning both on success.
    fn checked<'a>(
        &self,
        name: Option<&'a str>,
        value: Option<&'a str>,
    ) -> Result<(&'a str, &'a str)> {
        let name = name.ok_or(Error::NullArgument("header name"))?;
        let value = value.ok_or(Error::NullArgument("header value"))?;

        validate_name(name)?;
        if self.config.is_restricted(name) {
            return Err(Error::invalid(format!("restricted header name: {:?}", name)));
        }
        validate_value(name, value)?;

        Ok((name, value))
    }

    /// Appends `value` to the values of `name`, creating the entry if absent.
    ///
    /// # Errors
    ///
    /// - [`Error::NullArgument`] if either argument is `None`.
    /// - [`Error::InvalidArgument`] if the name is not a token, is restricted,
    ///   or the value is empty or contains CR/LF or other forbidden characters.
    pub fn append(&mut self, name: Option<&str>, value: Option<&str>) -> Result<()> {
        let (name, value) = self.checked(name, value)?;
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| HeaderEntry {
                name: name.to_string(),
                values: Vec::new(),
            })
            .values
            .push(value.to_string());
        Ok(())
    }

    /// Replaces all values of `name` with the single `value`.
    ///
    /// Validation is the same as for [`append`](Self::append). Other names are
    /// untouched, and an existing name keeps its position and display casing.
    pub fn set(&mut self, name: Option<&str>, value: Option<&str>) -> Result<()> {
        let (name, value) = self.checked(name, value)?;
        let entry = self
            .entries
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| HeaderEntry {
                name: name.to_string(),
                values: Vec::new(),
            });
        entry.values.clear();
        entry.values.push(value.to_string());
        Ok(())
    }

    /// Appends consecutive name/value pairs from a flat sequence.
    ///
    /// Pairs are applied left to right. On the first invalid pair the error is
    /// returned and every pair before it stays applied.
    ///
    /// # Errors
    ///
    /// - [`Error::NullArgument`] if the sequence is `None`, or for the first
    ///   pair holding a `None`.
    /// - [`Error::InvalidArgument`] if the sequence is empty or of odd length,
    ///   or for the first malformed pair.
    pub fn append_pairs(&mut self, pairs: Option<&[Option<&str>]>) -> Result<()> {
        let pairs = pairs.ok_or(Error::NullArgument("header pairs"))?;
        if pairs.is_empty() {
            return Err(Error::invalid("empty header pair sequence"));
        }
        if pairs.len() % 2 != 0 {
            return Err(Error::invalid(format!(
                "odd number of header pair elements: {}",
                pairs.len()
            )));
        }

        for pair in pairs.chunks_exact(2) {
            self.append(pair[0], pair[1])?;
        }
        Ok(())
    }

    /// Returns the values stored for `name`, in insertion order.
    ///
    /// Returns an empty slice if the name is absent.
    pub fn get(&self, name: &str) -> &[String] {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|entry| entry.values.as_slice())
            .unwrap_or_default()
    }

    /// Returns the number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no header is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an independent copy of this store.
    pub fn copy(&self) -> HeaderStore {
        self.clone()
    }

    /// Returns a read-only snapshot of the current contents.
    pub fn snapshot_view(&self) -> HttpHeaders {
        HttpHeaders {
            entries: self.entries.clone(),
        }
    }
}

/// Read-only, case-insensitive view of request headers.
///
/// Equality compares names case-insensitively and ignores the order of names,
/// but respects the order of each name's values.
///
/// # Examples
///
/// ```
/// use requisition::RequestBuilder;
///
/// let request = RequestBuilder::with_uri("https://example.com/")?
///     .header("Accept", "text/html")?
///     .header("accept", "application/json")?
///     .build()?;
///
/// let headers = request.headers();
/// assert_eq!(headers.all_values("ACCEPT"), ["text/html", "application/json"]);
/// assert_eq!(headers.first_value("Accept"), Some("text/html"));
/// # Ok::<(), requisition::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct HttpHeaders {
    entries: IndexMap<String, HeaderEntry>,
}

impl PartialEq for HttpHeaders {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|(key, entry)| {
                other
                    .entries
                    .get(key)
                    .is_some_and(|theirs| theirs.values == entry.values)
            })
    }
}

impl Eq for HttpHeaders {}

impl HttpHeaders {
    /// Returns all values of `name`, in insertion order.
    pub fn all_values(&self, name: &str) -> &[String] {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|entry| entry.values.as_slice())
            .unwrap_or_default()
    }

    /// Returns the first value of `name`, if any.
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.all_values(name).first().map(String::as_str)
    }

    /// Returns `true` if `name` has at least one value.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Iterates over `(display name, values)` in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .values()
            .map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    /// Returns the number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no headers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the headers as a map from display name to values.
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .values()
            .map(|entry| (entry.name.clone(), entry.values.clone()))
            .collect()
    }

    /// Converts the headers into an [`http::HeaderMap`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if a name or value is not accepted
    /// by the `http` crate.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for entry in self.entries.values() {
            let name = HeaderName::from_bytes(entry.name.as_bytes())
                .map_err(|e| Error::invalid(format!("Invalid header name: {}", e)))?;
            for value in &entry.values {
                let value = HeaderValue::from_str(value)
                    .map_err(|e| Error::invalid(format!("Invalid header value: {}", e)))?;
                map.append(name.clone(), value);
            }
        }
        Ok(map)
    }
}
