//! AgentConfig - 起動時に注入する設定
//!
//! バージョン名とアセット一覧はコード上の定数ではなく、
//! JSON ファイル（または呼び出し側のコード）から渡します。
//!
//! ```json
//! {
//!   "version": "app-v2",
//!   "assets": ["/", "/index.html", "/manifest.json"],
//!   "fallback": "/index.html",
//!   "origin": "https://app.example.com/"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{AssetManifest, CacheVersion, ManifestError, VersionError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid cache version: {0}")]
    Version(#[from] VersionError),

    #[error("invalid asset manifest: {0}")]
    Manifest(#[from] ManifestError),
}

/// AgentConfig は agent 1 バージョン分の設定
///
/// 省略されたフィールドはデフォルト値（`Default` 実装）で埋めます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// アクティブなキャッシュストアの名前
    pub version: String,

    /// install 時に precache するパス（定義順）
    pub assets: Vec<String>,

    /// ネットワークもキャッシュも使えないときに返すパス
    pub fallback: String,

    /// HttpNetwork が使うオリジン（CLI 用）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            version: "shelter-v1".to_string(),
            assets: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/manifest.json".to_string(),
                "/icon-192.png".to_string(),
                "/icon-512.png".to_string(),
            ],
            fallback: "/index.html".to_string(),
            origin: None,
        }
    }
}

impl AgentConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// 設定値を検証してドメイン型に変換
    pub fn validate(&self) -> Result<(CacheVersion, AssetManifest), ConfigError> {
        let version = CacheVersion::new(self.version.clone())?;
        let manifest = AssetManifest::new(self.assets.iter().cloned(), self.fallback.clone())?;
        Ok((version, manifest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let (version, manifest) = AgentConfig::default().validate().unwrap();
        assert_eq!(version.as_str(), "shelter-v1");
        assert_eq!(manifest.fallback(), "/index.html");
        assert_eq!(manifest.len(), 5);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = AgentConfig::from_json_str(r#"{ "version": "app-v7" }"#).unwrap();
        assert_eq!(config.version, "app-v7");
        assert_eq!(config.fallback, "/index.html");
        assert_eq!(config.origin, None);
    }

    #[test]
    fn validate_reports_fallback_outside_assets() {
        let config = AgentConfig::from_json_str(
            r#"{ "assets": ["/", "/app.js"], "fallback": "/offline.html" }"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Manifest(ManifestError::FallbackNotPrecached(_)))
        ));
    }

    #[test]
    fn validate_reports_bad_version() {
        let config = AgentConfig {
            version: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Version(VersionError::Empty))
        ));
    }

    #[test]
    fn parse_error_is_reported() {
        assert!(matches!(
            AgentConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = AgentConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
