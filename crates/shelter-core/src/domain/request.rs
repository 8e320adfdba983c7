//! Request - 横取りされるネットワークリクエスト
//!
//! agent から見た Request は読み取り専用です。
//! キャッシュの同一性は `RequestKey`（method + URL）で表現します。

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP メソッド
///
/// agent が実際に扱うのは GET のみ。それ以外は素通し（passthrough）です。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Other(String),
}

impl Method {
    /// 文字列から Method を作成（大文字小文字は区別しない）
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "PATCH" => Method::Patch,
            "OPTIONS" => Method::Options,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
            Method::Other(s) => s,
        }
    }

    pub fn is_get(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request は agent が観測するリクエスト
///
/// `url` は scope からの絶対パス（例: `/index.html`）または完全な URL。
/// agent は URL を書き換えず、そのまま Network / CacheStorage に渡します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// GET リクエストを作成
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// キャッシュのキーを作成
    pub fn key(&self) -> RequestKey {
        RequestKey::new(self.method.clone(), &self.url)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// RequestKey はキャッシュ上のリクエストの同一性
///
/// # 正規化
/// - fragment（`#...`）は落とす（サーバーに届かないため）
/// - query string は残す（別リソースとして扱う）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestKey {
    pub method: Method,
    pub url: String,
}

impl RequestKey {
    pub fn new(method: Method, url: &str) -> Self {
        let url = match url.split_once('#') {
            Some((before, _)) => before,
            None => url,
        };
        Self {
            method,
            url: url.to_string(),
        }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::upper("GET", Method::Get)]
    #[case::lower("post", Method::Post)]
    #[case::mixed("Delete", Method::Delete)]
    #[case::custom("PROPFIND", Method::Other("PROPFIND".to_string()))]
    fn method_parse(#[case] input: &str, #[case] expected: Method) {
        assert_eq!(Method::parse(input), expected);
    }

    #[test]
    fn key_drops_fragment_but_keeps_query() {
        let a = Request::get("/app.js?v=2#section").key();
        let b = Request::get("/app.js?v=2").key();
        let c = Request::get("/app.js?v=3").key();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.url, "/app.js?v=2");
    }

    #[test]
    fn headers_do_not_change_the_key() {
        let plain = Request::get("/index.html");
        let with_accept = Request::get("/index.html").with_header("Accept", "text/html");

        assert_eq!(with_accept.headers, vec![("Accept".to_string(), "text/html".to_string())]);
        assert_eq!(plain.key(), with_accept.key());
    }

    #[test]
    fn key_distinguishes_methods() {
        let get = Request::get("/").key();
        let head = Request::new(Method::Head, "/").key();
        assert_ne!(get, head);
    }

    #[test]
    fn display_shows_method_and_url() {
        assert_eq!(Request::get("/index.html").to_string(), "GET /index.html");
    }
}
