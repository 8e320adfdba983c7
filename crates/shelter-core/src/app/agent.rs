//! Agent - オフラインキャッシュ agent 本体
//!
//! ライフサイクルの 3 つのハンドラを持ちます。
//! - **install** (`app::install`): 静的アセットの precache
//! - **activate** (`app::activate`): 旧バージョンのストア削除と claim
//! - **fetch** (`app::fetch`): network-first + キャッシュ fallback
//!
//! 各ハンドラは非同期処理の完了まで戻りません（waitUntil / respondWith 相当）。
//! 例外は fetch 成功後のキャッシュ書き込みで、これはバックグラウンドタスクとして
//! 切り離され、`settle()` で完了を待てます。

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::{JoinError, JoinSet};

use crate::app::status::{AgentStats, AgentStatus};
use crate::domain::{AgentId, AgentState, AssetManifest, CacheVersion};
use crate::ports::{CacheStorage, ClientControl, Network};

pub struct Agent {
    pub(super) id: AgentId,
    pub(super) version: CacheVersion,
    pub(super) manifest: AssetManifest,
    pub(super) storage: Arc<dyn CacheStorage>,
    pub(super) network: Arc<dyn Network>,
    pub(super) clients: Arc<dyn ClientControl>,
    pub(super) state: RwLock<AgentState>,
    pub(super) stats: Arc<AgentStats>,
    /// 切り離されたキャッシュ書き込み
    pub(super) pending_writes: Mutex<JoinSet<()>>,
}

impl Agent {
    pub(crate) fn new(
        id: AgentId,
        version: CacheVersion,
        manifest: AssetManifest,
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
        clients: Arc<dyn ClientControl>,
    ) -> Self {
        Self {
            id,
            version,
            manifest,
            storage,
            network,
            clients,
            state: RwLock::new(AgentState::Parsed),
            stats: Arc::new(AgentStats::default()),
            pending_writes: Mutex::new(JoinSet::new()),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn version(&self) -> &CacheVersion {
        &self.version
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    pub async fn state(&self) -> AgentState {
        *self.state.read().await
    }

    pub fn stats(&self) -> &AgentStats {
        &self.stats
    }

    /// `expected` から `next` へ遷移。現在の状態が違えばそれを返す
    pub(super) async fn transition(
        &self,
        expected: AgentState,
        next: AgentState,
    ) -> Result<(), AgentState> {
        let mut state = self.state.write().await;
        let from = *state;
        if from != expected {
            return Err(from);
        }
        tracing::debug!(agent = %self.id, %from, to = %next, "state transition");
        *state = next;
        Ok(())
    }

    pub(super) async fn set_state(&self, next: AgentState) {
        let mut state = self.state.write().await;
        let from = *state;
        tracing::debug!(agent = %self.id, %from, to = %next, "state transition");
        *state = next;
    }

    /// 切り離されたキャッシュ書き込みがすべて終わるまで待つ
    ///
    /// 待っている間はロックを持たないので、並行する fetch は止まらない。
    /// 待機中に増えた書き込みも、セットが空になるまで続けて待つ。
    pub async fn settle(&self) {
        loop {
            let mut batch = std::mem::take(&mut *self.pending_writes.lock().await);
            if batch.is_empty() {
                break;
            }
            while let Some(joined) = batch.join_next().await {
                self.reap(joined);
            }
        }
    }

    /// 終了した書き込みタスクの後始末。panic / abort は書き込み失敗として数える
    pub(super) fn reap(&self, joined: Result<(), JoinError>) {
        if let Err(err) = joined {
            self.stats.record_cache_write(false);
            tracing::warn!(agent = %self.id, error = %err, "cache write task aborted");
        }
    }

    pub async fn status(&self) -> AgentStatus {
        let stores = self.storage.keys().await.unwrap_or_else(|err| {
            tracing::warn!(agent = %self.id, error = %err, "listing cache stores failed");
            Vec::new()
        });
        let entries = self
            .storage
            .entries(self.version.as_str())
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(
                    agent = %self.id,
                    cache = %self.version,
                    error = %err,
                    "listing cache entries failed"
                );
                Vec::new()
            });

        AgentStatus {
            agent_id: self.id,
            version: self.version.to_string(),
            state: self.state().await,
            stores,
            cached_entries: entries.len(),
            cached_bytes: entries.iter().map(|e| e.size).sum(),
            stats: self.stats.snapshot(),
        }
    }
}
