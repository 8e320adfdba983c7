//! HttpNetwork - reqwest でオリジンサーバーに fetch する Network
//!
//! Request の URL はオリジンからの相対パスとして解決します
//! （完全な URL ならそのまま使われます）。
//! タイムアウトは設定しません。ハングした fetch はそのまま待ち続けます。

use async_trait::async_trait;
use reqwest::Url;

use crate::domain::{NetworkError, Request, Response};
use crate::ports::Network;

pub struct HttpNetwork {
    client: reqwest::Client,
    origin: Url,
}

impl HttpNetwork {
    pub fn new(origin: &str) -> Result<Self, NetworkError> {
        let origin = Url::parse(origin).map_err(|e| NetworkError::InvalidUrl(format!("{origin}: {e}")))?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| NetworkError::Other(e.to_string()))?;
        Ok(Self { client, origin })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// リクエスト URL をオリジン基準で解決
    pub fn resolve(&self, url: &str) -> Result<Url, NetworkError> {
        self.origin
            .join(url)
            .map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")))
    }
}

fn classify(err: reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout(err.to_string())
    } else if err.is_connect() {
        NetworkError::Connect(err.to_string())
    } else {
        NetworkError::Other(err.to_string())
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        let mut url = self.resolve(&request.url)?;
        url.set_fragment(None);

        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| NetworkError::Other(format!("invalid method {}: {e}", request.method)))?;

        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let res = builder.send().await.map_err(classify)?;

        let status = res.status().as_u16();
        let headers = res
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = res.bytes().await.map_err(classify)?;

        tracing::debug!(%request, status, bytes = body.len(), "network response");
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_paths_against_origin() {
        let net = HttpNetwork::new("https://app.example.com/").unwrap();
        assert_eq!(
            net.resolve("/icon-192.png").unwrap().as_str(),
            "https://app.example.com/icon-192.png"
        );
        assert_eq!(
            net.resolve("https://cdn.example.com/x.js").unwrap().as_str(),
            "https://cdn.example.com/x.js"
        );
    }

    #[test]
    fn rejects_invalid_origin() {
        assert!(matches!(
            HttpNetwork::new("not a url"),
            Err(NetworkError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        // port 9 (discard) on localhost is normally closed
        let net = HttpNetwork::new("http://127.0.0.1:9/").unwrap();
        let result = net.fetch(&Request::get("/")).await;
        assert!(result.is_err());
    }
}
