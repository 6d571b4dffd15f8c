use crate::DomainError;
use fancy_regex::Regex;
use std::fmt;

/// Label that roots every synthesized name. An identifier equal to it is
/// never decoded, so the handler cannot rewrite its own output.
pub const MARKER_LABEL: &str = "h3";

/// A query name split around the configured suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    /// Leading labels kept verbatim, each with its trailing dot (`"www."`),
    /// or empty.
    pub prefix: String,
    /// The single label right before the suffix.
    pub identifier: String,
}

/// Matches `(<label>.)* <identifier> . <suffix> .` with the pattern compiled
/// once per configured suffix.
pub struct QueryNameMatcher {
    suffix: String,
    pattern: Regex,
}

impl QueryNameMatcher {
    pub fn new(domain: &str) -> Result<Self, DomainError> {
        let suffix = domain.trim_end_matches('.').to_ascii_lowercase();
        if suffix.is_empty() || suffix.split('.').any(str::is_empty) {
            return Err(DomainError::InvalidDomainName(format!(
                "Invalid hexcamp domain suffix '{}'",
                domain
            )));
        }

        let source = format!(
            r"(?i)^((?:[^.]+\.)*)(?!{marker}\.)([^.]+)\.{suffix}\.?$",
            marker = MARKER_LABEL,
            suffix = fancy_regex::escape(&suffix),
        );
        let pattern = Regex::new(&source).map_err(|e| {
            DomainError::InvalidDomainName(format!("Failed to compile matcher for '{}': {}", suffix, e))
        })?;

        Ok(Self { suffix, pattern })
    }

    /// The configured suffix, lower-cased and without the trailing dot.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns `None` when the name is not below the suffix, has no
    /// identifier label, or its identifier is the marker label.
    pub fn match_name(&self, name: &str) -> Option<NameMatch> {
        let captures = self.pattern.captures(name).ok()??;
        let prefix = captures.get(1).map_or("", |m| m.as_str());
        let identifier = captures.get(2)?.as_str();

        Some(NameMatch {
            prefix: prefix.to_string(),
            identifier: identifier.to_string(),
        })
    }
}

impl fmt::Debug for QueryNameMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryNameMatcher")
            .field("suffix", &self.suffix)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}
