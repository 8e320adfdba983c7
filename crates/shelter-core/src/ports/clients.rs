//! ClientControl port - 開いているページの制御
//!
//! # 実装
//! - **ClientRegistry**: 開いているページを記録し、claim で制御下に置く

use async_trait::async_trait;

/// ClientControl はホストのページ制御 API
///
/// - `skip_waiting()`: 待機中の旧バージョンを待たずに置き換え可能にする
/// - `claim()`: 開いているページをリロードなしで制御下に置く
#[async_trait]
pub trait ClientControl: Send + Sync {
    async fn skip_waiting(&self);

    /// 制御下に置いたページ数を返す
    async fn claim(&self) -> usize;
}
