//! ClientRegistry - 開いているページの記録と claim
//!
//! # 学習ポイント
//! - IdGenerator を注入して ClientId を生成
//! - claim は「開いているページすべて」を制御下に置く（リロード不要）

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ClientId;
use crate::ports::{ClientControl, IdGenerator, SystemClock, UlidGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClientRecord {
    id: ClientId,
    controlled: bool,
}

pub struct ClientRegistry<G = UlidGenerator<SystemClock>> {
    clients: RwLock<Vec<ClientRecord>>,
    waiting_skipped: AtomicBool,
    ids: G,
}

impl ClientRegistry<UlidGenerator<SystemClock>> {
    pub fn new() -> Self {
        Self::with_id_generator(UlidGenerator::new(SystemClock))
    }
}

impl Default for ClientRegistry<UlidGenerator<SystemClock>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: IdGenerator> ClientRegistry<G> {
    pub fn with_id_generator(ids: G) -> Self {
        Self {
            clients: RwLock::new(Vec::new()),
            waiting_skipped: AtomicBool::new(false),
            ids,
        }
    }

    /// ページが開かれた（まだ制御下にはない）
    pub async fn open_client(&self) -> ClientId {
        let id = self.ids.generate_client_id();
        self.clients.write().await.push(ClientRecord {
            id,
            controlled: false,
        });
        id
    }

    /// ページが閉じられた。存在した場合 true
    pub async fn close_client(&self, id: ClientId) -> bool {
        let mut clients = self.clients.write().await;
        let before = clients.len();
        clients.retain(|c| c.id != id);
        clients.len() != before
    }

    pub async fn is_controlled(&self, id: ClientId) -> bool {
        self.clients
            .read()
            .await
            .iter()
            .any(|c| c.id == id && c.controlled)
    }

    pub async fn controlled(&self) -> Vec<ClientId> {
        self.clients
            .read()
            .await
            .iter()
            .filter(|c| c.controlled)
            .map(|c| c.id)
            .collect()
    }

    pub fn waiting_skipped(&self) -> bool {
        self.waiting_skipped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<G: IdGenerator> ClientControl for ClientRegistry<G> {
    async fn skip_waiting(&self) {
        self.waiting_skipped.store(true, Ordering::SeqCst);
    }

    async fn claim(&self) -> usize {
        let mut clients = self.clients.write().await;
        for client in clients.iter_mut() {
            client.controlled = true;
        }
        clients.len()
    }
}
