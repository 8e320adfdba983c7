//! Errors - エラー型と分類
//!
//! # 分類
//! - **NetworkError**: fetch の transport 失敗（HTTP エラーステータスは含まない）
//! - **CacheError**: CacheStorage の操作失敗
//! - **InstallError**: install フェーズの失敗（precache の一括追加など）
//! - **ActivateError**: activate フェーズの失敗
//! - **ManifestError / VersionError**: 起動時の設定値の検証エラー

use thiserror::Error;

use super::request::Method;
use super::state::AgentState;

/// NetworkError はネットワークレベルの失敗
///
/// 404 や 500 は「成功した fetch」として Response で返るため、ここには含まれません。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("network is offline")]
    Offline,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("cache store not found: {0}")]
    StoreNotFound(String),

    #[error("cannot cache {method} request for {url}: only GET is supported")]
    UnsupportedMethod { method: Method, url: String },

    #[error("cannot cache a partial (206) response for {0}")]
    PartialResponse(String),

    #[error("cache quota exceeded: storing {requested} bytes would exceed {quota} bytes")]
    QuotaExceeded { requested: usize, quota: usize },
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("install requires state parsed, but agent is {0}")]
    InvalidState(AgentState),

    #[error("failed to fetch asset {asset}: {source}")]
    AssetFetch {
        asset: String,
        #[source]
        source: NetworkError,
    },

    #[error("asset {asset} responded with status {status}")]
    AssetStatus { asset: String, status: u16 },

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("fallback {0} is not present in the cache after precache")]
    FallbackMissing(String),
}

#[derive(Debug, Error)]
pub enum ActivateError {
    #[error("activate requires state installed, but agent is {0}")]
    InvalidState(AgentState),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("asset list is empty")]
    Empty,

    #[error("asset path must start with '/': {0}")]
    NotAbsolute(String),

    #[error("asset path listed twice: {0}")]
    Duplicate(String),

    #[error("fallback {0} is not among the precached assets")]
    FallbackNotPrecached(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("cache version must not be empty")]
    Empty,

    #[error("cache version must not contain whitespace: {0:?}")]
    Whitespace(String),
}
