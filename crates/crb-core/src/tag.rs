//! Clan / player tag handling.
//!
//! The game shows tags as `#2PP`, users type them as `2pp`, `#2PP` or `##2pp`, and the API
//! wants them percent-encoded (`%232PP`). Everything goes through [`Tag::new`] first.

use std::fmt;

/// Percent-encoded `#`, the prefix every API path segment carries.
pub const ENCODED_HASH: &str = "%23";

/// A normalized tag: no `#`, upper-cased, no surrounding whitespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    pub fn new(raw: &str) -> Self {
        Self(normalize_tag(raw))
    }

    /// The bare normalized tag (`2PP`).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segment for the primary API (`%232PP`).
    pub fn url_segment(&self) -> String {
        format!("{ENCODED_HASH}{}", self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of characters in the normalized tag.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Strip every `#`, trim, upper-case.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '#')
        .collect::<String>()
        .to_uppercase()
}
