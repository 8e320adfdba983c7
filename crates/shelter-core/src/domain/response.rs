//! Response - ライブ fetch またはキャッシュ参照の結果
//!
//! Response は不変の「バイト列 + メタデータ」として扱います。
//! body は `Bytes` なので clone は参照カウントの増加だけで済み、
//! 呼び出し元への返却とキャッシュへの書き込みに同じ内容を渡せます。

use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// 200 OK のレスポンスを作成
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, body)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// ヘッダーを取得（名前は大文字小文字を区別しない）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// 2xx かどうか
    pub fn is_ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// 206 Partial Content はキャッシュに保存できない
    pub fn is_partial(&self) -> bool {
        self.status == 206
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(200, true)]
    #[case(204, true)]
    #[case(299, true)]
    #[case(304, false)]
    #[case(404, false)]
    #[case(500, false)]
    fn ok_range(#[case] status: u16, #[case] expected: bool) {
        assert_eq!(Response::new(status, "").is_ok(), expected);
    }

    #[test]
    fn clone_shares_identical_bytes() {
        let res = Response::ok("<html></html>").with_header("Content-Type", "text/html");
        let copy = res.clone();

        assert_eq!(res, copy);
        assert_eq!(res.body.as_ptr(), copy.body.as_ptr());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let res = Response::ok("").with_header("Content-Type", "image/png");
        assert_eq!(res.header("content-type"), Some("image/png"));
        assert_eq!(res.header("etag"), None);
    }
}
