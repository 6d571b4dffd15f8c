use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::ConfigError;
use super::hexcamp::HexcampConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;

const LOCAL_CONFIG: &str = "hexcamp.toml";
const SYSTEM_CONFIG: &str = "/etc/hexcamp/config.toml";

/// Main configuration structure for the hexcamp responder
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address, request deadline)
    #[serde(default)]
    pub server: ServerConfig,

    /// Domain suffix handled by the geocell rewriter
    #[serde(default)]
    pub hexcamp: HexcampConfig,

    /// Where recursive lookups and unmatched queries go
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. hexcamp.toml in current directory
    /// 3. /etc/hexcamp/config.toml
    /// 4. Default configuration
    ///
    /// Command-line overrides are applied last.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if Path::new(LOCAL_CONFIG).exists() {
            Self::from_file(LOCAL_CONFIG)?
        } else if Path::new(SYSTEM_CONFIG).exists() {
            Self::from_file(SYSTEM_CONFIG)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.hexcamp = config.hexcamp.normalized();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(domain) = overrides.domain {
            self.hexcamp = HexcampConfig::new(&domain);
        }
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if !overrides.upstream_servers.is_empty() {
            self.upstream.servers = overrides.upstream_servers;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hexcamp.validate()?;

        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.server.request_timeout_ms == 0 || self.upstream.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Timeouts must be greater than 0".to_string(),
            ));
        }

        if self.upstream.needs_servers() {
            if self.upstream.servers.is_empty() {
                return Err(ConfigError::Validation(
                    "No upstream servers configured".to_string(),
                ));
            }
            self.upstream
                .socket_addrs()
                .map_err(ConfigError::Validation)?;
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub domain: Option<String>,
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub upstream_servers: Vec<String>,
    pub log_level: Option<String>,
}
