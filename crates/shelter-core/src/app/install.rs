//! Install handler - 静的アセットの precache
//!
//! # フロー
//! 1. parsed → installing
//! 2. skip_waiting（待機中の旧バージョンを待たない）
//! 3. バージョン名のストアを開く
//! 4. 全アセットを並行に fetch。1 件でも失敗したら何も書かずに失敗
//! 5. 全件を put（途中で失敗したらこのバッチで書いた分を取り消す）
//! 6. fallback がストアにあることを確認
//! 7. installed（失敗時は redundant）

use futures::future::try_join_all;
use serde::Serialize;

use crate::app::agent::Agent;
use crate::domain::{AgentState, InstallError, Request, Response};
use crate::ports::{CacheStorage, Network};

/// install の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub version: String,
    pub precached: usize,
    pub bytes: usize,
}

impl Agent {
    /// install イベントを処理する
    pub async fn install(&self) -> Result<InstallReport, InstallError> {
        self.transition(AgentState::Parsed, AgentState::Installing)
            .await
            .map_err(InstallError::InvalidState)?;

        self.clients.skip_waiting().await;

        match self.precache().await {
            Ok(report) => {
                self.set_state(AgentState::Installed).await;
                tracing::info!(
                    agent = %self.id,
                    version = %self.version,
                    assets = report.precached,
                    bytes = report.bytes,
                    "installed"
                );
                Ok(report)
            }
            Err(err) => {
                self.set_state(AgentState::Redundant).await;
                tracing::warn!(
                    agent = %self.id,
                    version = %self.version,
                    error = %err,
                    "install failed"
                );
                Err(err)
            }
        }
    }

    async fn precache(&self) -> Result<InstallReport, InstallError> {
        let name = self.version.as_str();
        self.storage.open(name).await?;

        let fetched = fetch_all(self.network.as_ref(), self.manifest.assets()).await?;
        let bytes = fetched.iter().map(|(_, res)| res.len()).sum();
        put_all(self.storage.as_ref(), name, fetched).await?;

        let fallback = Request::get(self.manifest.fallback());
        if self.storage.match_request(name, &fallback).await?.is_none() {
            return Err(InstallError::FallbackMissing(fallback.url));
        }

        Ok(InstallReport {
            version: name.to_string(),
            precached: self.manifest.len(),
            bytes,
        })
    }
}

/// アセットを並行に fetch する。最初の失敗でバッチ全体が失敗する
///
/// transport の失敗に加えて、2xx 以外のステータスも失敗として扱う。
async fn fetch_all(
    network: &dyn Network,
    assets: &[String],
) -> Result<Vec<(Request, Response)>, InstallError> {
    try_join_all(assets.iter().map(|asset| async move {
        let request = Request::get(asset.as_str());
        let response = network
            .fetch(&request)
            .await
            .map_err(|source| InstallError::AssetFetch {
                asset: asset.clone(),
                source,
            })?;
        if !response.is_ok() {
            return Err(InstallError::AssetStatus {
                asset: asset.clone(),
                status: response.status,
            });
        }
        tracing::trace!(%asset, bytes = response.len(), "asset fetched");
        Ok::<_, InstallError>((request, response))
    }))
    .await
}

/// 全件を put する。途中で失敗したら、このバッチで書いたエントリを書き込み前の状態に戻す
///
/// 既に同じキーのエントリがあった場合は削除ではなく元の応答を書き戻す。
async fn put_all(
    storage: &dyn CacheStorage,
    name: &str,
    fetched: Vec<(Request, Response)>,
) -> Result<(), InstallError> {
    let mut written: Vec<(Request, Option<Response>)> = Vec::with_capacity(fetched.len());
    for (request, response) in fetched {
        let previous = match storage.match_request(name, &request).await {
            Ok(previous) => previous,
            Err(err) => {
                rollback(storage, name, written).await;
                return Err(err.into());
            }
        };
        if let Err(err) = storage.put(name, &request, response).await {
            rollback(storage, name, written).await;
            return Err(err.into());
        }
        written.push((request, previous));
    }
    Ok(())
}

async fn rollback(storage: &dyn CacheStorage, name: &str, written: Vec<(Request, Option<Response>)>) {
    for (request, previous) in written.into_iter().rev() {
        let restored = match previous {
            Some(response) => storage.put(name, &request, response).await,
            None => storage.remove(name, &request).await.map(|_| ()),
        };
        if let Err(err) = restored {
            tracing::warn!(cache = name, %request, error = %err, "precache rollback failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::agent::tests::{ASSETS, harness_on, harness_with, origin};
    use crate::domain::{CacheError, NetworkError};
    use crate::impls::InMemoryCacheStorage;
    use std::sync::Arc;

    #[tokio::test]
    async fn install_precaches_every_asset() {
        let h = harness_with("app-v1", origin());

        let report = h.agent.install().await.unwrap();

        assert_eq!(report.precached, ASSETS.len());
        for asset in ASSETS {
            let cached = h
                .storage
                .match_request("app-v1", &Request::get(asset))
                .await
                .unwrap();
            assert!(cached.is_some(), "{asset} should be precached");
        }
        assert_eq!(h.agent.state().await, AgentState::Installed);
        assert!(h.clients.waiting_skipped());
    }

    #[tokio::test]
    async fn unreachable_asset_fails_the_whole_batch() {
        let network = origin();
        network.fail_on("/icon-512.png").await;
        let h = harness_with("app-v1", network);

        let err = h.agent.install().await.unwrap_err();

        assert!(matches!(
            err,
            InstallError::AssetFetch { ref asset, source: NetworkError::Connect(_) } if asset == "/icon-512.png"
        ));
        assert!(h.storage.entries("app-v1").await.unwrap().is_empty());
        assert_eq!(h.agent.state().await, AgentState::Redundant);
    }

    #[tokio::test]
    async fn non_ok_asset_status_fails_the_batch() {
        let network = origin();
        network
            .set_route("/manifest.json", Response::new(500, "boom"))
            .await;
        let h = harness_with("app-v1", network);

        let err = h.agent.install().await.unwrap_err();

        assert!(matches!(
            err,
            InstallError::AssetStatus { status: 500, .. }
        ));
        assert!(h.storage.entries("app-v1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn put_failure_rolls_back_the_batch() {
        // 最初の数件は入るが全件は入らない quota
        let storage = Arc::new(InMemoryCacheStorage::new().with_quota(30));
        let h = harness_on("app-v1", origin(), storage);

        let err = h.agent.install().await.unwrap_err();

        assert!(matches!(
            err,
            InstallError::Cache(CacheError::QuotaExceeded { .. })
        ));
        assert!(h.storage.entries("app-v1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_reinstall_keeps_entries_from_the_earlier_install() {
        // 同じバージョン名で先に入っていたエントリ
        let storage = Arc::new(InMemoryCacheStorage::new().with_quota(30));
        storage
            .put("app-v1", &Request::get("/"), Response::ok("old"))
            .await
            .unwrap();
        let h = harness_on("app-v1", origin(), storage);

        let err = h.agent.install().await.unwrap_err();

        assert!(matches!(
            err,
            InstallError::Cache(CacheError::QuotaExceeded { .. })
        ));
        let kept = h
            .storage
            .match_request("app-v1", &Request::get("/"))
            .await
            .unwrap();
        assert_eq!(kept, Some(Response::ok("old")));
        assert_eq!(h.storage.entries("app-v1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn offline_install_fails_and_agent_becomes_redundant() {
        let h = harness_with("app-v1", origin());
        h.network.go_offline();

        let err = h.agent.install().await.unwrap_err();
        assert!(matches!(
            err,
            InstallError::AssetFetch {
                source: NetworkError::Offline,
                ..
            }
        ));
        assert_eq!(h.agent.state().await, AgentState::Redundant);
    }

    #[tokio::test]
    async fn install_twice_is_rejected() {
        let h = harness_with("app-v1", origin());
        h.agent.install().await.unwrap();

        let err = h.agent.install().await.unwrap_err();
        assert!(matches!(
            err,
            InstallError::InvalidState(AgentState::Installed)
        ));
    }
}
