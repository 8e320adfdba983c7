//! InMemoryCacheStorage - 開発・テスト用のキャッシュストア
//!
//! # 学習ポイント
//! - tokio の RwLock で複数タスクからの読み書きを直列化
//! - ストアの作成順とエントリの保存順を Vec で保持
//! - Clock を差し替えて stored_at を決定的にする

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{CacheError, CachedEntry, Request, RequestKey, Response};
use crate::ports::{CacheStorage, Clock, SystemClock};

#[derive(Debug, Clone)]
struct StoredResponse {
    response: Response,
    entry: CachedEntry,
}

/// 名前付きストア 1 つ分
#[derive(Debug, Default)]
struct NamedStore {
    name: String,
    entries: HashMap<RequestKey, StoredResponse>,
    /// 保存順（put で上書きされたキーは末尾に移動）
    order: Vec<RequestKey>,
}

impl NamedStore {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn size(&self) -> usize {
        self.entries.values().map(|s| s.entry.size).sum()
    }
}

/// InMemoryCacheStorage はプロセス内のキャッシュストア集合
///
/// # 使用例
/// ```ignore
/// let storage = InMemoryCacheStorage::new();
/// storage.open("app-v1").await?;
/// storage.put("app-v1", &Request::get("/"), Response::ok("hi")).await?;
/// ```
///
/// # Quota
/// `with_quota()` を設定すると、全ストアの body 合計がそれを超える put は
/// `CacheError::QuotaExceeded` で拒否されます。既存エントリは削除しません。
pub struct InMemoryCacheStorage<C = SystemClock> {
    stores: RwLock<Vec<NamedStore>>,
    quota: Option<usize>,
    clock: C,
}

impl InMemoryCacheStorage<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryCacheStorage<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryCacheStorage<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            stores: RwLock::new(Vec::new()),
            quota: None,
            clock,
        }
    }

    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// 全ストアの body 合計バイト数
    pub async fn total_size(&self) -> usize {
        self.stores.read().await.iter().map(NamedStore::size).sum()
    }
}

#[async_trait]
impl<C: Clock> CacheStorage for InMemoryCacheStorage<C> {
    async fn open(&self, name: &str) -> Result<(), CacheError> {
        let mut stores = self.stores.write().await;
        if !stores.iter().any(|s| s.name == name) {
            stores.push(NamedStore::new(name));
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self
            .stores
            .read()
            .await
            .iter()
            .map(|s| s.name.clone())
            .collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let mut stores = self.stores.write().await;
        let before = stores.len();
        stores.retain(|s| s.name != name);
        Ok(stores.len() != before)
    }

    async fn put(
        &self,
        name: &str,
        request: &Request,
        response: Response,
    ) -> Result<(), CacheError> {
        if !request.method.is_get() {
            return Err(CacheError::UnsupportedMethod {
                method: request.method.clone(),
                url: request.url.clone(),
            });
        }
        if response.is_partial() {
            return Err(CacheError::PartialResponse(request.url.clone()));
        }

        let key = request.key();
        let mut stores = self.stores.write().await;

        if let Some(quota) = self.quota {
            // 同じキーの上書き分は差し引いて計算する
            let replaced = stores
                .iter()
                .find(|s| s.name == name)
                .and_then(|s| s.entries.get(&key))
                .map(|s| s.entry.size)
                .unwrap_or(0);
            let current: usize = stores.iter().map(NamedStore::size).sum();
            let requested = current - replaced + response.len();
            if requested > quota {
                return Err(CacheError::QuotaExceeded { requested, quota });
            }
        }

        let idx = match stores.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                stores.push(NamedStore::new(name));
                stores.len() - 1
            }
        };
        let store = &mut stores[idx];

        let entry = CachedEntry {
            key: key.clone(),
            status: response.status,
            size: response.len(),
            stored_at: self.clock.now(),
        };
        if store
            .entries
            .insert(key.clone(), StoredResponse { response, entry })
            .is_some()
        {
            store.order.retain(|k| k != &key);
        }
        store.order.push(key);
        Ok(())
    }

    async fn remove(&self, name: &str, request: &Request) -> Result<bool, CacheError> {
        let mut stores = self.stores.write().await;
        let Some(store) = stores.iter_mut().find(|s| s.name == name) else {
            return Ok(false);
        };
        let key = request.key();
        if store.entries.remove(&key).is_none() {
            return Ok(false);
        }
        store.order.retain(|k| k != &key);
        Ok(true)
    }

    async fn match_request(
        &self,
        name: &str,
        request: &Request,
    ) -> Result<Option<Response>, CacheError> {
        let stores = self.stores.read().await;
        let Some(store) = stores.iter().find(|s| s.name == name) else {
            return Ok(None);
        };
        Ok(store
            .entries
            .get(&request.key())
            .map(|s| s.response.clone()))
    }

    async fn entries(&self, name: &str) -> Result<Vec<CachedEntry>, CacheError> {
        let stores = self.stores.read().await;
        let store = stores
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| CacheError::StoreNotFound(name.to_string()))?;
        Ok(store
            .order
            .iter()
            .filter_map(|k| store.entries.get(k))
            .map(|s| s.entry.clone())
            .collect())
    }
}
