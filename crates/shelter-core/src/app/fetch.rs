//! Fetch handler - network-first + キャッシュ fallback
//!
//! # フロー
//! 1. GET 以外、または activated でなければ passthrough（何もしない）
//! 2. ネットワークに fetch
//!    - 成功: Response を複製し、1 つを返却、もう 1 つをバックグラウンドで put
//!    - 失敗: ストアを引く → なければ fallback パスを引く → それもなければ unavailable
//!
//! キャッシュとネットワークを競争させることはしません。
//! 成功したネットワーク応答は常に優先され、常にキャッシュを更新します。

use std::sync::Arc;

use crate::app::agent::Agent;
use crate::domain::{FetchOutcome, Request, Response};

impl Agent {
    /// fetch イベントを処理する
    pub async fn handle_fetch(&self, request: &Request) -> FetchOutcome {
        let outcome = self.respond(request).await;
        self.stats.record(&outcome);
        tracing::debug!(agent = %self.id, %request, outcome = outcome.label(), "fetch handled");
        outcome
    }

    async fn respond(&self, request: &Request) -> FetchOutcome {
        if !request.method.is_get() {
            return FetchOutcome::Passthrough;
        }
        if !self.state().await.can_intercept_fetch() {
            return FetchOutcome::Passthrough;
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                self.schedule_cache_write(request.clone(), response.clone())
                    .await;
                FetchOutcome::Network(response)
            }
            Err(err) => {
                tracing::debug!(%request, error = %err, "network failed, falling back to cache");
                self.from_cache(request).await
            }
        }
    }

    async fn from_cache(&self, request: &Request) -> FetchOutcome {
        let name = self.version.as_str();

        if let Some(response) = self.lookup(name, request).await {
            return FetchOutcome::Cache(response);
        }

        let fallback = Request::get(self.manifest.fallback());
        match self.lookup(name, &fallback).await {
            Some(response) => FetchOutcome::Fallback(response),
            None => {
                tracing::warn!(
                    %request,
                    fallback = %fallback.url,
                    "offline with no cached response and no cached fallback"
                );
                FetchOutcome::Unavailable
            }
        }
    }

    /// ストア参照の失敗はキャッシュミスとして扱う
    async fn lookup(&self, name: &str, request: &Request) -> Option<Response> {
        match self.storage.match_request(name, request).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(cache = name, %request, error = %err, "cache lookup failed");
                None
            }
        }
    }

    /// 成功した応答の複製を切り離されたタスクで保存する
    ///
    /// 呼び出し元はこの書き込みを待たない。失敗は stats と warn ログに残る。
    async fn schedule_cache_write(&self, request: Request, response: Response) {
        let storage = Arc::clone(&self.storage);
        let stats = Arc::clone(&self.stats);
        let name = self.version.as_str().to_string();

        let mut pending = self.pending_writes.lock().await;
        // 完了済みのタスクを回収しておく
        while let Some(joined) = pending.try_join_next() {
            self.reap(joined);
        }

        pending.spawn(async move {
            match storage.put(&name, &request, response).await {
                Ok(()) => {
                    stats.record_cache_write(true);
                    tracing::trace!(cache = %name, %request, "response cached");
                }
                Err(err) => {
                    stats.record_cache_write(false);
                    tracing::warn!(cache = %name, %request, error = %err, "background cache write failed");
                }
            }
        });
    }
}
