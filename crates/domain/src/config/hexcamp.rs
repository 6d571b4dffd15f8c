use super::errors::ConfigError;
use serde::{Deserialize, Serialize};

pub const DIRECTIVE_NAME: &str = "hexcamp";

/// The one setting the hexcamp handler takes: the domain suffix it answers
/// for.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct HexcampConfig {
    #[serde(default)]
    pub domain: String,
}

impl HexcampConfig {
    pub fn new(domain: &str) -> Self {
        Self {
            domain: normalize_domain(domain),
        }
    }

    /// Parses a one-line directive such as `hexcamp test.hex.camp`.
    ///
    /// This is the form used when the handler is embedded in a host server
    /// that configures plugins line by line; the TOML file and `--domain`
    /// go through the same single-token check in [`validate`](Self::validate).
    pub fn from_directive(line: &str) -> Result<Self, ConfigError> {
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some(DIRECTIVE_NAME) => {}
            Some(other) => {
                return Err(ConfigError::Directive(format!(
                    "expected '{}', found '{}'",
                    DIRECTIVE_NAME, other
                )))
            }
            None => return Err(ConfigError::Directive("empty directive".to_string())),
        }

        let domain = single_token(tokens).map_err(ConfigError::Directive)?;
        let config = Self::new(domain);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let domain = normalize_domain(&self.domain);
        let domain = single_token(domain.split_whitespace()).map_err(ConfigError::Validation)?;

        for label in domain.split('.') {
            if label.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "hexcamp domain '{}' has an empty label",
                    self.domain
                )));
            }
            if label.len() > 63 {
                return Err(ConfigError::Validation(format!(
                    "hexcamp domain label '{}' exceeds 63 characters",
                    label
                )));
            }
            if !label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(ConfigError::Validation(format!(
                    "hexcamp domain label '{}' contains invalid characters",
                    label
                )));
            }
        }

        Ok(())
    }

    pub fn normalized(&self) -> Self {
        Self::new(&self.domain)
    }
}

fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// The domain argument: exactly one token, nothing after it.
fn single_token<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<&'a str, String> {
    let domain = tokens
        .next()
        .ok_or_else(|| format!("'{}' requires a domain argument", DIRECTIVE_NAME))?;

    if let Some(extra) = tokens.next() {
        return Err(format!(
            "unexpected argument '{}' after domain '{}'",
            extra, domain
        ));
    }

    Ok(domain)
}
