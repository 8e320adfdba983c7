//! Network port - ライブ fetch の抽象化
//!
//! # 実装
//! - **HttpNetwork**: reqwest でオリジンに問い合わせる（本番用）
//! - **StaticNetwork**: URL → Response の固定表（テスト・デモ用）
//! - **SwitchableNetwork**: 任意の Network をオンライン/オフラインで切り替える

use async_trait::async_trait;

use crate::domain::{NetworkError, Request, Response};

/// Network はリクエストをネットワークに送る
///
/// HTTP のエラーステータス（404, 500 など）は `Ok(Response)` で返します。
/// `Err` になるのは transport レベルの失敗（オフライン、DNS、接続断など）だけです。
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError>;
}
