//! Status - agent の観測用カウンタとスナップショット
//!
//! バックグラウンドのキャッシュ書き込み失敗はここで数えます
//! （呼び出し元には返さないが、黙って捨てることもしない）。

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::domain::{AgentId, AgentState, FetchOutcome};

/// AgentStats は fetch の結果ごとのカウンタ
#[derive(Debug, Default)]
pub struct AgentStats {
    network: AtomicU64,
    cache: AtomicU64,
    fallback: AtomicU64,
    passthrough: AtomicU64,
    unavailable: AtomicU64,
    cache_writes: AtomicU64,
    cache_write_failures: AtomicU64,
}

impl AgentStats {
    pub fn record(&self, outcome: &FetchOutcome) {
        let counter = match outcome {
            FetchOutcome::Passthrough => &self.passthrough,
            FetchOutcome::Network(_) => &self.network,
            FetchOutcome::Cache(_) => &self.cache,
            FetchOutcome::Fallback(_) => &self.fallback,
            FetchOutcome::Unavailable => &self.unavailable,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_write(&self, ok: bool) {
        if ok {
            self.cache_writes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_write_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            network: self.network.load(Ordering::Relaxed),
            cache: self.cache.load(Ordering::Relaxed),
            fallback: self.fallback.load(Ordering::Relaxed),
            passthrough: self.passthrough.load(Ordering::Relaxed),
            unavailable: self.unavailable.load(Ordering::Relaxed),
            cache_writes: self.cache_writes.load(Ordering::Relaxed),
            cache_write_failures: self.cache_write_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub network: u64,
    pub cache: u64,
    pub fallback: u64,
    pub passthrough: u64,
    pub unavailable: u64,
    pub cache_writes: u64,
    pub cache_write_failures: u64,
}

/// AgentStatus は agent の現在の状態
///
/// # 使用例
/// ```ignore
/// let status = agent.status().await;
/// println!("{}", serde_json::to_string_pretty(&status)?);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AgentStatus {
    pub agent_id: AgentId,
    pub version: String,
    pub state: AgentState,
    /// このオリジンに存在するストア名（作成順）
    pub stores: Vec<String>,
    /// 現バージョンのストアのエントリ数
    pub cached_entries: usize,
    pub cached_bytes: usize,
    pub stats: StatsSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Response;

    #[test]
    fn record_counts_by_outcome() {
        let stats = AgentStats::default();
        stats.record(&FetchOutcome::Network(Response::ok("a")));
        stats.record(&FetchOutcome::Network(Response::ok("b")));
        stats.record(&FetchOutcome::Fallback(Response::ok("c")));
        stats.record(&FetchOutcome::Passthrough);
        stats.record_cache_write(true);
        stats.record_cache_write(false);

        let snap = stats.snapshot();
        assert_eq!(snap.network, 2);
        assert_eq!(snap.fallback, 1);
        assert_eq!(snap.passthrough, 1);
        assert_eq!(snap.cache, 0);
        assert_eq!(snap.cache_writes, 1);
        assert_eq!(snap.cache_write_failures, 1);
    }
}
