//! SwitchableNetwork - 任意の Network をオフラインにできるラッパー
//!
//! オフライン中の fetch は内側の Network に届かず `NetworkError::Offline` になります。

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::domain::{NetworkError, Request, Response};
use crate::ports::Network;

pub struct SwitchableNetwork<N> {
    inner: N,
    online: AtomicBool,
}

impl<N: Network> SwitchableNetwork<N> {
    /// オンライン状態で作成
    pub fn new(inner: N) -> Self {
        Self {
            inner,
            online: AtomicBool::new(true),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn go_offline(&self) {
        self.set_online(false);
    }

    pub fn go_online(&self) {
        self.set_online(true);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }
}

#[async_trait]
impl<N: Network> Network for SwitchableNetwork<N> {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        if !self.is_online() {
            return Err(NetworkError::Offline);
        }
        self.inner.fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::StaticNetwork;

    #[tokio::test]
    async fn offline_requests_never_reach_inner_network() {
        let net = SwitchableNetwork::new(StaticNetwork::new().route("/", Response::ok("home")));

        assert!(net.fetch(&Request::get("/")).await.is_ok());

        net.go_offline();
        assert_eq!(
            net.fetch(&Request::get("/")).await,
            Err(NetworkError::Offline)
        );
        assert_eq!(net.inner().request_count().await, 1);

        net.go_online();
        assert!(net.is_online());
        assert!(net.fetch(&Request::get("/")).await.is_ok());
    }
}
