//! Configuration types for Vyzier.
//!
//! `ChatConfig` represents `config.toml` in the data directory. Every field
//! has a default, so an empty or partial file is valid.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which resolver strategy answers user messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverMode {
    /// Keyword rules with simulated latency (development).
    #[default]
    Local,
    /// HTTP call to the configured endpoint (production).
    Remote,
}

impl fmt::Display for ResolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverMode::Local => write!(f, "local"),
            ResolverMode::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for ResolverMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(ResolverMode::Local),
            "remote" => Ok(ResolverMode::Remote),
            other => Err(format!("invalid resolver mode: '{other}'")),
        }
    }
}

/// Top-level configuration for the chat session subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub resolver: ResolverMode,

    /// Remote chat endpoint, required when `resolver = "remote"`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Upper bound on a single remote call.
    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,

    /// Number of prior messages sent along with each request.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Simulated latency bounds for the local resolver.
    #[serde(default = "default_latency_min_ms")]
    pub latency_min_ms: u64,
    #[serde(default = "default_latency_max_ms")]
    pub latency_max_ms: u64,

    /// Storage key of the message history record.
    #[serde(default = "default_history_key")]
    pub history_key: String,

    /// Storage key of the message-count analytics record.
    #[serde(default = "default_count_key")]
    pub count_key: String,
}

fn default_remote_timeout_secs() -> u64 {
    30
}

fn default_history_limit() -> usize {
    6
}

fn default_latency_min_ms() -> u64 {
    200
}

fn default_latency_max_ms() -> u64 {
    2_000
}

fn default_history_key() -> String {
    "vyzier_chat_history".to_string()
}

fn default_count_key() -> String {
    "vyzier_message_count".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverMode::default(),
            endpoint: None,
            remote_timeout_secs: default_remote_timeout_secs(),
            history_limit: default_history_limit(),
            latency_min_ms: default_latency_min_ms(),
            latency_max_ms: default_latency_max_ms(),
            history_key: default_history_key(),
            count_key: default_count_key(),
        }
    }
}

impl ChatConfig {
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    /// Latency bounds as `(min, max)`, swapped if configured backwards.
    pub fn latency_bounds(&self) -> (Duration, Duration) {
        let min = self.latency_min_ms.min(self.latency_max_ms);
        let max = self.latency_min_ms.max(self.latency_max_ms);
        (Duration::from_millis(min), Duration::from_millis(max))
    }
}
