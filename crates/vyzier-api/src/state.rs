//! Application state wiring storage, configuration, and resolvers together.
//!
//! The core session types are generic over persistence and resolver traits;
//! `AppState` pins them to the SQLite adapter and a runtime-selected
//! `BoxResolver`.

use std::path::PathBuf;

use anyhow::{Context, bail};
use tracing::info;

use vyzier_core::chat::controller::SessionController;
use vyzier_core::chat::store::MessageStore;
use vyzier_core::resolver::box_resolver::BoxResolver;
use vyzier_core::resolver::latency::RandomLatency;
use vyzier_core::resolver::local::LocalRuleResolver;
use vyzier_infra::config::{load_chat_config, resolve_data_dir};
use vyzier_infra::remote::client::RemoteResolver;
use vyzier_infra::sqlite::kv::SqlitePersistence;
use vyzier_infra::sqlite::pool::DatabasePool;
use vyzier_types::config::{ChatConfig, ResolverMode};

pub type ConcreteMessageStore = MessageStore<SqlitePersistence>;

pub type ConcreteSessionController = SessionController<SqlitePersistence, BoxResolver>;

/// Shared application state for every CLI command.
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: ChatConfig,
    pub persistence: SqlitePersistence,
}

impl AppState {
    /// Open the data directory, load `config.toml`, and connect to the database.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_chat_config(&data_dir).await;
        let pool = DatabasePool::open_in(&data_dir)
            .await
            .context("failed to open conversation database")?;

        Ok(Self {
            data_dir,
            config,
            persistence: SqlitePersistence::new(pool),
        })
    }

    pub fn message_store(&self) -> ConcreteMessageStore {
        MessageStore::from_config(self.persistence.clone(), &self.config)
    }

    /// Configuration with the chat command's flags applied.
    pub fn chat_config(&self, local: bool, remote: Option<String>) -> ChatConfig {
        with_overrides(self.config.clone(), local, remote)
    }

    /// Load the stored conversation and start a session with the resolver
    /// named by `config`.
    pub async fn start_session(
        &self,
        config: &ChatConfig,
    ) -> anyhow::Result<ConcreteSessionController> {
        let resolver = build_resolver(config)?;
        info!(resolver = %config.resolver, "Starting chat session");

        let controller = SessionController::start(self.message_store(), resolver)
            .await
            .with_config(config);
        Ok(controller)
    }
}

/// Apply CLI flags on top of the file configuration.
///
/// `--local` beats `--remote` (or `VYZIER_ENDPOINT`), which beats the file.
pub fn with_overrides(mut config: ChatConfig, local: bool, remote: Option<String>) -> ChatConfig {
    if local {
        config.resolver = ResolverMode::Local;
    } else if let Some(endpoint) = remote.filter(|e| !e.trim().is_empty()) {
        config.resolver = ResolverMode::Remote;
        config.endpoint = Some(endpoint);
    }
    config
}

/// Build the resolver strategy named by `config`.
pub fn build_resolver(config: &ChatConfig) -> anyhow::Result<BoxResolver> {
    match config.resolver {
        ResolverMode::Local => {
            let (min, max) = config.latency_bounds();
            Ok(BoxResolver::new(LocalRuleResolver::new(RandomLatency::new(
                min, max,
            ))))
        }
        ResolverMode::Remote => {
            let Some(endpoint) = config.endpoint.as_deref() else {
                bail!("remote resolver selected but no endpoint configured (use --remote <URL> or set `endpoint` in config.toml)");
            };
            let remote =
                RemoteResolver::new(endpoint, config.remote_timeout(), config.history_limit)?;
            Ok(BoxResolver::new(remote))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vyzier_core::resolver::provider::ResponseResolver;

    #[test]
    fn test_local_flag_wins() {
        let config = with_overrides(
            ChatConfig::default(),
            true,
            Some("http://localhost:3000/api/chat".to_string()),
        );
        assert_eq!(config.resolver, ResolverMode::Local);
        assert_eq!(config.endpoint, None);
    }

    #[test]
    fn test_remote_flag_overrides_file() {
        let file = ChatConfig {
            endpoint: Some("http://old.example.com/chat".to_string()),
            ..ChatConfig::default()
        };
        let config = with_overrides(file, false, Some("http://new.example.com/chat".to_string()));
        assert_eq!(config.resolver, ResolverMode::Remote);
        assert_eq!(config.endpoint.as_deref(), Some("http://new.example.com/chat"));
    }

    #[test]
    fn test_no_flags_keeps_file_config() {
        let file = ChatConfig {
            resolver: ResolverMode::Remote,
            endpoint: Some("http://api.example.com/chat".to_string()),
            ..ChatConfig::default()
        };
        assert_eq!(with_overrides(file.clone(), false, None), file);
        assert_eq!(with_overrides(file.clone(), false, Some("  ".to_string())), file);
    }

    #[test]
    fn test_build_resolver_by_mode() {
        let local = build_resolver(&ChatConfig::default()).unwrap();
        assert_eq!(ResponseResolver::name(&local), "local");

        let config = with_overrides(
            ChatConfig::default(),
            false,
            Some("http://127.0.0.1:9/api/chat".to_string()),
        );
        let remote = build_resolver(&config).unwrap();
        assert_eq!(ResponseResolver::name(&remote), "remote");
    }

    #[test]
    fn test_remote_without_endpoint_is_an_error() {
        let config = ChatConfig {
            resolver: ResolverMode::Remote,
            ..ChatConfig::default()
        };
        assert!(build_resolver(&config).is_err());
    }
}
