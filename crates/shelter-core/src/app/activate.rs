//! Activate handler - 旧バージョンのストア削除と claim
//!
//! 現バージョン以外の名前を持つストアは無条件に削除します（移行処理なし）。
//! 削除は並行に行い、すべて終わってから activated になります。

use futures::future::try_join_all;
use serde::Serialize;

use crate::app::agent::Agent;
use crate::domain::{ActivateError, AgentState};

/// activate の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationReport {
    /// 削除したストア名
    pub deleted: Vec<String>,
    /// 制御下に置いたページ数
    pub claimed: usize,
}

impl Agent {
    /// activate イベントを処理する
    pub async fn activate(&self) -> Result<ActivationReport, ActivateError> {
        self.transition(AgentState::Installed, AgentState::Activating)
            .await
            .map_err(ActivateError::InvalidState)?;

        let deleted = match self.delete_stale_stores().await {
            Ok(deleted) => deleted,
            Err(err) => {
                self.set_state(AgentState::Redundant).await;
                tracing::warn!(agent = %self.id, version = %self.version, error = %err, "activate failed");
                return Err(err);
            }
        };

        let claimed = self.clients.claim().await;
        self.set_state(AgentState::Activated).await;

        tracing::info!(
            agent = %self.id,
            version = %self.version,
            deleted = ?deleted,
            claimed,
            "activated"
        );
        Ok(ActivationReport { deleted, claimed })
    }

    async fn delete_stale_stores(&self) -> Result<Vec<String>, ActivateError> {
        let current = self.version.as_str();
        let stale: Vec<String> = self
            .storage
            .keys()
            .await?
            .into_iter()
            .filter(|name| name != current)
            .collect();

        let storage = self.storage.as_ref();
        try_join_all(stale.iter().map(|name| async move {
            let existed = storage.delete(name).await?;
            tracing::debug!(cache = %name, existed, "stale cache deleted");
            Ok::<_, ActivateError>(())
        }))
        .await?;

        Ok(stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::agent::tests::{harness_on, harness_with, origin};
    use crate::domain::{Request, Response};
    use crate::impls::InMemoryCacheStorage;
    use crate::ports::{CacheStorage, ClientControl};
    use std::sync::Arc;

    #[tokio::test]
    async fn activation_deletes_every_other_store() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        storage.open("app-v0").await.unwrap();
        storage
            .put("legacy", &Request::get("/"), Response::ok("old"))
            .await
            .unwrap();
        let h = harness_on("app-v1", origin(), storage);
        h.agent.install().await.unwrap();

        let report = h.agent.activate().await.unwrap();

        assert_eq!(report.deleted, vec!["app-v0", "legacy"]);
        assert_eq!(h.storage.keys().await.unwrap(), vec!["app-v1"]);
        assert_eq!(h.agent.state().await, AgentState::Activated);
    }

    #[tokio::test]
    async fn version_bump_replaces_previous_store() {
        let storage = Arc::new(InMemoryCacheStorage::new());

        let v1 = harness_on("app-v1", origin(), storage.clone());
        v1.agent.install().await.unwrap();
        v1.agent.activate().await.unwrap();

        let v2 = harness_on("app-v2", origin(), storage.clone());
        v2.agent.install().await.unwrap();
        assert_eq!(storage.keys().await.unwrap(), vec!["app-v1", "app-v2"]);

        let report = v2.agent.activate().await.unwrap();
        assert_eq!(report.deleted, vec!["app-v1"]);
        assert_eq!(storage.keys().await.unwrap(), vec!["app-v2"]);
    }

    #[tokio::test]
    async fn activation_claims_open_clients() {
        let h = harness_with("app-v1", origin());
        let page = h.clients.open_client().await;
        h.agent.install().await.unwrap();
        assert!(!h.clients.is_controlled(page).await);

        let report = h.agent.activate().await.unwrap();

        assert_eq!(report.claimed, 1);
        assert!(h.clients.is_controlled(page).await);
        // claim は冪等
        assert_eq!(h.clients.claim().await, 1);
    }

    #[tokio::test]
    async fn activate_requires_installed_state() {
        let h = harness_with("app-v1", origin());
        let err = h.agent.activate().await.unwrap_err();
        assert!(matches!(err, ActivateError::InvalidState(AgentState::Parsed)));
    }
}
