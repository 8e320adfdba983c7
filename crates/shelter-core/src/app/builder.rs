//! AgentBuilder - agent の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - trait object（`Arc<dyn CacheStorage>` など）への変換

use std::sync::Arc;

use crate::app::agent::Agent;
use crate::app::config::{AgentConfig, ConfigError};
use crate::domain::{AssetManifest, CacheVersion};
use crate::impls::{ClientRegistry, InMemoryCacheStorage};
use crate::ports::{CacheStorage, ClientControl, IdGenerator, Network, SystemClock, UlidGenerator};

/// AgentBuilder は Agent を構築
///
/// # 使用例
/// ```ignore
/// let agent = AgentBuilder::from_config(&config)?
///     .network(Arc::new(HttpNetwork::new(origin)?))
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - version / manifest / network は必須。足りなければ BuildError
/// - manifest の不変条件（fallback が precache 対象か、など）は
///   AssetManifest の構築時に検証済み
/// - storage と clients は省略するとインメモリ実装を使う
pub struct AgentBuilder {
    version: Option<CacheVersion>,
    manifest: Option<AssetManifest>,
    storage: Option<Arc<dyn CacheStorage>>,
    network: Option<Arc<dyn Network>>,
    clients: Option<Arc<dyn ClientControl>>,
}

/// BuildError は agent 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing {0}. Call AgentBuilder::{0}() before build().")]
    Missing(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            version: None,
            manifest: None,
            storage: None,
            network: None,
            clients: None,
        }
    }

    /// 設定を検証して version / manifest を埋めた builder を作成
    pub fn from_config(config: &AgentConfig) -> Result<Self, BuildError> {
        let (version, manifest) = config.validate()?;
        Ok(Self::new().version(version).manifest(manifest))
    }

    pub fn version(mut self, version: CacheVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn manifest(mut self, manifest: AssetManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn storage<S: CacheStorage + 'static>(mut self, storage: Arc<S>) -> Self {
        self.storage = Some(storage as Arc<dyn CacheStorage>);
        self
    }

    pub fn network<N: Network + 'static>(mut self, network: Arc<N>) -> Self {
        self.network = Some(network as Arc<dyn Network>);
        self
    }

    pub fn clients<C: ClientControl + 'static>(mut self, clients: Arc<C>) -> Self {
        self.clients = Some(clients as Arc<dyn ClientControl>);
        self
    }

    pub fn build(self) -> Result<Agent, BuildError> {
        let version = self.version.ok_or(BuildError::Missing("version"))?;
        let manifest = self.manifest.ok_or(BuildError::Missing("manifest"))?;
        let network = self.network.ok_or(BuildError::Missing("network"))?;
        let storage: Arc<dyn CacheStorage> = match self.storage {
            Some(storage) => storage,
            None => Arc::new(InMemoryCacheStorage::new()),
        };
        let clients: Arc<dyn ClientControl> = match self.clients {
            Some(clients) => clients,
            None => Arc::new(ClientRegistry::new()),
        };

        let id = UlidGenerator::new(SystemClock).generate_agent_id();
        Ok(Agent::new(id, version, manifest, storage, network, clients))
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AgentState;
    use crate::impls::StaticNetwork;

    #[test]
    fn build_from_default_config() {
        let agent = AgentBuilder::from_config(&AgentConfig::default())
            .unwrap()
            .network(Arc::new(StaticNetwork::new()))
            .build()
            .unwrap();
        assert_eq!(agent.version().as_str(), "shelter-v1");
        assert!(agent.id().to_string().starts_with("agent-"));
    }

    #[test]
    fn build_missing_network() {
        let result = AgentBuilder::from_config(&AgentConfig::default())
            .unwrap()
            .build();
        assert!(matches!(result, Err(BuildError::Missing("network"))));
    }

    #[test]
    fn build_missing_manifest() {
        let result = AgentBuilder::new()
            .version(CacheVersion::new("v1").unwrap())
            .network(Arc::new(StaticNetwork::new()))
            .build();
        assert!(matches!(result, Err(BuildError::Missing("manifest"))));
    }

    #[test]
    fn invalid_config_fails_before_build() {
        let config = AgentConfig {
            fallback: "/offline.html".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            AgentBuilder::from_config(&config),
            Err(BuildError::Config(ConfigError::Manifest(_)))
        ));
    }

    #[tokio::test]
    async fn new_agent_starts_parsed() {
        let agent = AgentBuilder::from_config(&AgentConfig::default())
            .unwrap()
            .network(Arc::new(StaticNetwork::new()))
            .build()
            .unwrap();
        assert_eq!(agent.state().await, AgentState::Parsed);
    }
}
