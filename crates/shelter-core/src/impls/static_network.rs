//! StaticNetwork - URL → Response の固定表で応答する Network
//!
//! テストとデモで「オリジンサーバー」の代わりに使います。
//! 登録されていない URL には 404 を返し（サーバーと同じく fetch 自体は成功）、
//! `fail_on()` で指定した URL には接続エラーを返します。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{NetworkError, Request, RequestKey, Response};
use crate::ports::Network;

#[derive(Default)]
pub struct StaticNetwork {
    routes: RwLock<HashMap<String, Response>>,
    failing: RwLock<HashSet<String>>,
    log: Mutex<Vec<Request>>,
}

impl StaticNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// 構築時にルートを登録（builder 形式）
    pub fn route(mut self, url: impl Into<String>, response: Response) -> Self {
        self.routes.get_mut().insert(url.into(), response);
        self
    }

    /// 実行中にルートを差し替える
    pub async fn set_route(&self, url: impl Into<String>, response: Response) {
        self.routes.write().await.insert(url.into(), response);
    }

    /// 指定 URL への fetch を接続エラーにする
    pub async fn fail_on(&self, url: impl Into<String>) {
        self.failing.write().await.insert(url.into());
    }

    /// これまでに受けたリクエスト
    pub async fn requests(&self) -> Vec<Request> {
        self.log.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.log.lock().await.len()
    }
}

#[async_trait]
impl Network for StaticNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        self.log.lock().await.push(request.clone());

        let url = RequestKey::new(request.method.clone(), &request.url).url;
        if self.failing.read().await.contains(&url) {
            return Err(NetworkError::Connect(format!("refused: {url}")));
        }

        let routes = self.routes.read().await;
        Ok(routes
            .get(&url)
            .cloned()
            .unwrap_or_else(|| Response::new(404, "not found")))
    }
}
