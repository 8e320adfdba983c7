//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait はホストプラットフォームが提供する外部の協調者
//! （Cache Store API, Network Fetch API, ページ制御 API）への
//! インターフェースを提供し、実装の詳細を隠蔽します。

pub mod cache_storage;
pub mod clients;
pub mod clock;
pub mod id_generator;
pub mod network;

pub use self::cache_storage::CacheStorage;
pub use self::clients::ClientControl;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::network::Network;
