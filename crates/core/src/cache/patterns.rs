//! Glob-style invalidation patterns.
//!
//! The dialect is the subset of the Redis `KEYS`/`SCAN MATCH` syntax that the
//! backend relies on, so the in-memory cache and Redis agree on which keys a
//! pattern covers:
//!
//! - `*` matches any run of characters, including none;
//! - `?` matches exactly one character;
//! - `\` makes the next character literal.

use std::fmt;

/// A wildcard expression selecting the cache keys to drop after a write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvalidationPattern(String);

impl InvalidationPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, key: &str) -> bool {
        pattern_matches(&self.0, key)
    }
}

impl fmt::Display for InvalidationPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use haven_core::cache::pattern_matches;
///
/// assert!(pattern_matches("admin:properties:42*", "admin:properties:42"));
/// assert!(pattern_matches("admin:properties:42*", "admin:properties:42:page=2"));
/// assert!(!pattern_matches("admin:properties:42*", "admin:properties:43"));
/// assert!(pattern_matches("admin:?:x", "admin:a:x"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();

    let mut p = 0;
    let mut k = 0;
    // Position right after the last `*` seen, and the key position it was tried at.
    let mut resume: Option<(usize, usize)> = None;

    while k < key.len() {
        match pattern.get(p) {
            Some('*') => {
                resume = Some((p + 1, k));
                p += 1;
                continue;
            }
            Some('?') => {
                p += 1;
                k += 1;
                continue;
            }
            Some('\\') if p + 1 < pattern.len() => {
                if pattern[p + 1] == key[k] {
                    p += 2;
                    k += 1;
                    continue;
                }
            }
            Some(c) if *c == key[k] => {
                p += 1;
                k += 1;
                continue;
            }
            _ => {}
        }

        // Mismatch: let the last `*` swallow one more character.
        match resume {
            Some((star_end, star_k)) => {
                p = star_end;
                k = star_k + 1;
                resume = Some((star_end, star_k + 1));
            }
            None => return false,
        }
    }

    while pattern.get(p) == Some(&'*') {
        p += 1;
    }
    p == pattern.len()
}
