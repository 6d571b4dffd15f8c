use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// How the recursive lookup of a canonical name is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// Back through this server's own handler chain, tagged as canonical.
    #[default]
    Chain,
    /// Straight to the upstream servers.
    Direct,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub lookup: LookupMode,

    /// Forward requests no other handler answered.
    #[serde(default = "default_true")]
    pub forward_unmatched: bool,
}

impl UpstreamConfig {
    pub fn socket_addrs(&self) -> Result<Vec<SocketAddr>, String> {
        self.servers
            .iter()
            .map(|server| {
                server
                    .parse::<SocketAddr>()
                    .map_err(|e| format!("Invalid upstream server '{}': {}", server, e))
            })
            .collect()
    }

    pub fn needs_servers(&self) -> bool {
        self.forward_unmatched || self.lookup == LookupMode::Direct
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            timeout_ms: default_timeout_ms(),
            lookup: LookupMode::default(),
            forward_unmatched: true,
        }
    }
}

fn default_servers() -> Vec<String> {
    vec!["8.8.8.8:53".to_string()]
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}
