//! CacheStorage port - 名前付きキャッシュストアの集合
//!
//! ホスト（ブラウザ）が提供する Cache Store API の抽象化です。
//! ストア内部の整合性は実装側が保証する前提で、agent 側ではロックしません。
//!
//! # 実装
//! - **InMemoryCacheStorage**: 開発・テスト用（`impls::inmem_cache`）

use async_trait::async_trait;

use crate::domain::{CacheError, CachedEntry, Request, Response};

/// CacheStorage は名前 → ストア、ストア内は request → response の二段のマップ
///
/// # 設計原則
/// - `keys()` はストアの作成順で返す
/// - `put()` は GET 以外のリクエストと 206 レスポンスを拒否する
/// - 存在しないストアへの `match_request()` は None（エラーではない）
///
/// # Thread Safety
/// - `Send + Sync` を要求（バックグラウンドの書き込みタスクから使うため）
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// ストアを開く（なければ作成）
    async fn open(&self, name: &str) -> Result<(), CacheError>;

    /// すべてのストア名（作成順）
    async fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// ストアを削除。存在した場合 true
    async fn delete(&self, name: &str) -> Result<bool, CacheError>;

    /// request をキーに response を保存（ストアがなければ作成）
    async fn put(&self, name: &str, request: &Request, response: Response)
    -> Result<(), CacheError>;

    /// ストアから 1 エントリを削除。存在した場合 true
    async fn remove(&self, name: &str, request: &Request) -> Result<bool, CacheError>;

    async fn match_request(
        &self,
        name: &str,
        request: &Request,
    ) -> Result<Option<Response>, CacheError>;

    /// ストア内のエントリ一覧（保存順）
    async fn entries(&self, name: &str) -> Result<Vec<CachedEntry>, CacheError>;
}
