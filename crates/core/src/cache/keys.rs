//! Request-scoped cache key derivation.
//!
//! Keys have the shape `admin:<namespace>:<scope>[:<params>]`:
//!
//! - `namespace` names the cached operation (`stats`, `properties`, ...);
//! - `scope` is the percent-encoded caller identifier;
//! - `params` is the normalized, percent-encoded parameter set, omitted
//!   entirely when there are no parameters.
//!
//! Percent-encoding keeps `:` out of the scope and parameter segments and
//! keeps glob metacharacters (`*`, `?`, `[`, `\`) out of every key, so a key
//! can always be matched literally and no two parameter tuples can produce
//! the same string.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::patterns::InvalidationPattern;

/// Prefix shared by every key the admin backend writes.
pub const KEY_PREFIX: &str = "admin";

/// The cached operation a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Dashboard revenue/booking/property counters.
    Stats,
    /// Listing of every property owned by the caller.
    Properties,
    /// A single property with its rooms.
    Property,
    /// Booking rollup across the caller's properties.
    Bookings,
}

impl CacheNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheNamespace::Stats => "stats",
            CacheNamespace::Properties => "properties",
            CacheNamespace::Property => "property",
            CacheNamespace::Bookings => "bookings",
        }
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of the caller that cached data is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerScope(String);

impl CallerScope {
    /// Creates a scope from a caller identifier.
    ///
    /// Returns `None` for blank identifiers: an empty scope would put every
    /// anonymous caller under the same key.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized request parameters that take part in a cache key.
///
/// Parameters are kept sorted by name. Values are trimmed and blank values
/// are dropped, so `?status=` and no query string at all produce the same
/// key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter. Blank values are ignored.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds a parameter when a value is present.
    pub fn with_optional<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        let value = value.to_string();
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        self.0.insert(name.into(), value.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializes the parameters as `name=value&name=value`.
    fn fragment(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// A fully derived cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors that prevent a cache key from being derived.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyDerivationError {
    #[error("No caller scope available for the {0} cache")]
    MissingScope(CacheNamespace),
}

/// Derives the cache key for an operation performed by a caller.
///
/// Fails closed: without a caller scope there is no key, so the caller can
/// neither read nor populate a caller-scoped namespace.
///
/// # Examples
///
/// ```
/// use haven_core::cache::{derive_key, CacheNamespace, CallerScope, RequestParams};
///
/// let scope = CallerScope::new("admin-7").unwrap();
/// let key = derive_key(CacheNamespace::Stats, Some(&scope), &RequestParams::new()).unwrap();
/// assert_eq!(key.as_str(), "admin:stats:admin-7");
///
/// let params = RequestParams::new().with("status", "confirmed");
/// let key = derive_key(CacheNamespace::Bookings, Some(&scope), &params).unwrap();
/// assert_eq!(key.as_str(), "admin:bookings:admin-7:status=confirmed");
///
/// assert!(derive_key(CacheNamespace::Stats, None, &RequestParams::new()).is_err());
/// ```
pub fn derive_key(
    namespace: CacheNamespace,
    scope: Option<&CallerScope>,
    params: &RequestParams,
) -> Result<CacheKey, KeyDerivationError> {
    let scope = scope.ok_or(KeyDerivationError::MissingScope(namespace))?;
    let mut key = scoped_prefix(namespace, scope);
    if !params.is_empty() {
        key.push(':');
        key.push_str(&params.fragment());
    }
    Ok(CacheKey(key))
}

/// Pattern covering every key of `namespace` derived for `scope`, whatever
/// its parameters.
///
/// The match is a superset: the trailing wildcard also covers scopes that
/// share the prefix (`admin-7` also matches `admin-70`). Over-invalidation
/// only costs a reload; it never leaves a stale entry behind.
pub fn scope_pattern(namespace: CacheNamespace, scope: &CallerScope) -> InvalidationPattern {
    InvalidationPattern::new(format!("{}*", scoped_prefix(namespace, scope)))
}

fn scoped_prefix(namespace: CacheNamespace, scope: &CallerScope) -> String {
    format!(
        "{}:{}:{}",
        KEY_PREFIX,
        namespace,
        urlencoding::encode(scope.as_str())
    )
}
