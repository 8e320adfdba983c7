//! CachedEntry - キャッシュストア内の 1 エントリのメタ情報

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::request::RequestKey;

/// CachedEntry はストアに保存された request/response ペアの要約
///
/// body 自体は含めません（status 表示や一覧用）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedEntry {
    pub key: RequestKey,
    pub status: u16,
    pub size: usize,
    pub stored_at: DateTime<Utc>,
}
