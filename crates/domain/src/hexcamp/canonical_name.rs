use super::{PathSegments, MARKER_LABEL};
use std::fmt;

/// Fully-qualified rewrite target:
/// `<prefix><positions...>.<base>.h3.<suffix>.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalName(String);

impl CanonicalName {
    pub fn new(prefix: &str, path: &PathSegments, suffix: &str) -> Self {
        let suffix = suffix.trim_end_matches('.');
        Self(format!("{}{}.{}.{}.", prefix, path, MARKER_LABEL, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
