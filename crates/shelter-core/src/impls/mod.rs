//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryCacheStorage**: プロセス内のキャッシュストア
//! - **HttpNetwork**: reqwest による本番用の Network
//! - **StaticNetwork**: 固定表で応答する Network（テスト・デモ用）
//! - **SwitchableNetwork**: オンライン/オフラインを切り替えるラッパー
//! - **ClientRegistry**: 開いているページの記録

pub mod clients;
pub mod http_network;
pub mod inmem_cache;
pub mod static_network;
pub mod switchable;

pub use self::clients::ClientRegistry;
pub use self::http_network::HttpNetwork;
pub use self::inmem_cache::InMemoryCacheStorage;
pub use self::static_network::StaticNetwork;
pub use self::switchable::SwitchableNetwork;
