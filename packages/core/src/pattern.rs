//! Colon-segmented glob matching for key enumeration.
//!
//! Keys and patterns are split on `:` into segments. `*` is the only
//! wildcard and always stands for one whole segment. Matching has two modes:
//!
//! - **Trailing wildcard** (`user:*`): the segments before the final `*` are
//!   compared positionally and the key may continue to any depth below them.
//!   A lone `*` matches every key.
//! - **Exact arity** (`user:*:profile`): pattern and key must have the same
//!   number of segments; interior `*` segments match any single segment.
//!
//! An interior `*` never absorbs extra depth. `user:*:profile` does not
//! match `user:1:settings:profile`.

/// Segment separator for keys and patterns.
pub const SEPARATOR: char = ':';

/// The whole-segment wildcard.
pub const WILDCARD: &str = "*";

/// Split a key or pattern into segments.
pub fn split(s: &str) -> Vec<&str> {
    s.split(SEPARATOR).collect()
}

/// Decide whether key segments match pattern segments.
pub fn matches<P, K>(pattern: &[P], key: &[K]) -> bool
where
    P: AsRef<str>,
    K: AsRef<str>,
{
    if pattern.len() == 1 && pattern[0].as_ref() == WILDCARD {
        return true;
    }

    if pattern.len() > key.len() {
        return false;
    }

    if let Some((last, prefix)) = pattern.split_last() {
        if last.as_ref() == WILDCARD {
            return segments_match(prefix, &key[..prefix.len()]);
        }
    }

    pattern.len() == key.len() && segments_match(pattern, key)
}

/// Convenience form of [`matches`] over unsplit strings.
pub fn matches_str(pattern: &str, key: &str) -> bool {
    matches(&split(pattern), &split(key))
}

fn segments_match<P: AsRef<str>, K: AsRef<str>>(pattern: &[P], key: &[K]) -> bool {
    pattern
        .iter()
        .zip(key)
        .all(|(p, k)| p.as_ref() == WILDCARD || p.as_ref() == k.as_ref())
}

/// A pattern split once and reused across many keys.
///
/// Backends that enumerate keys themselves hold one of these for the
/// duration of a scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<String>,
}

impl Pattern {
    /// Split a pattern string into segments.
    pub fn parse(pattern: &str) -> Self {
        Self {
            segments: split(pattern).into_iter().map(str::to_string).collect(),
        }
    }

    /// The pattern's segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True when this pattern matches every key.
    pub fn is_universal(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == WILDCARD
    }

    /// Match an unsplit key.
    pub fn matches(&self, key: &str) -> bool {
        matches(&self.segments, &split(key))
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments.join(":"))
    }
}
