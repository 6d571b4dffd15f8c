use anyhow::Context;
use hexcamp_domain::{CliOverrides, Config};

/// Loads the configuration file (explicit path, `hexcamp.toml`, then
/// `/etc/hexcamp/config.toml`) and applies command-line overrides.
pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    Config::load(path, cli_overrides).context("Failed to load configuration")
}
