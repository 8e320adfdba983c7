//! AssetManifest - install 時に precache する静的アセットの一覧
//!
//! # 不変条件（構築時にチェック）
//! - アセットが 1 件以上ある
//! - すべてのパスが `/` で始まる
//! - 同じパスが二重に登録されていない
//! - fallback パスがアセット一覧に含まれている
//!
//! 最後の条件により、オフライン時に返す fallback ページが
//! precache されていない、という静かな欠落を起動時に潰します。

use serde::Serialize;
use std::collections::HashSet;

use super::errors::ManifestError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetManifest {
    assets: Vec<String>,
    fallback: String,
}

impl AssetManifest {
    pub fn new<I, S>(assets: I, fallback: impl Into<String>) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let assets: Vec<String> = assets.into_iter().map(Into::into).collect();
        let fallback = fallback.into();

        if assets.is_empty() {
            return Err(ManifestError::Empty);
        }

        let mut seen = HashSet::new();
        for asset in &assets {
            if !asset.starts_with('/') {
                return Err(ManifestError::NotAbsolute(asset.clone()));
            }
            if !seen.insert(asset.as_str()) {
                return Err(ManifestError::Duplicate(asset.clone()));
            }
        }

        if !seen.contains(fallback.as_str()) {
            return Err(ManifestError::FallbackNotPrecached(fallback));
        }

        Ok(Self { assets, fallback })
    }

    /// 定義順のアセット一覧
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_declaration_order() {
        let m = AssetManifest::new(["/", "/index.html", "/manifest.json"], "/index.html").unwrap();
        assert_eq!(m.assets(), ["/", "/index.html", "/manifest.json"]);
        assert_eq!(m.fallback(), "/index.html");
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn rejects_empty_list() {
        let m = AssetManifest::new(Vec::<String>::new(), "/index.html");
        assert_eq!(m, Err(ManifestError::Empty));
    }

    #[test]
    fn rejects_relative_path() {
        let m = AssetManifest::new(["/", "icon.png"], "/");
        assert_eq!(m, Err(ManifestError::NotAbsolute("icon.png".to_string())));
    }

    #[test]
    fn rejects_duplicates() {
        let m = AssetManifest::new(["/", "/app.js", "/app.js"], "/");
        assert_eq!(m, Err(ManifestError::Duplicate("/app.js".to_string())));
    }

    #[test]
    fn rejects_fallback_outside_assets() {
        let m = AssetManifest::new(["/", "/app.js"], "/offline.html");
        assert_eq!(
            m,
            Err(ManifestError::FallbackNotPrecached("/offline.html".to_string()))
        );
    }
}
