//! CacheVersion - アクティブなキャッシュストアの名前
//!
//! バージョン名は起動時に注入する設定値です。
//! 名前を変えると activate 時に古いストアがすべて削除されます。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::VersionError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheVersion(String);

impl CacheVersion {
    pub fn new(name: impl Into<String>) -> Result<Self, VersionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(VersionError::Empty);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(VersionError::Whitespace(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CacheVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CacheVersion> for String {
    fn from(version: CacheVersion) -> Self {
        version.0
    }
}

impl fmt::Display for CacheVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
