//! Outcome model: what the fetch handler did with one request.
//!
//! The handler never surfaces a runtime network failure to the page. Instead
//! it reports which path produced the response, so callers (and tests) can
//! tell a live response from a cached one or from the offline fallback.

use serde::{Deserialize, Serialize};

use super::response::Response;

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Network,
    Cache,
    Fallback,
}

/// Result of one fetch-handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The agent took no action; the platform resolves the request normally.
    Passthrough,

    /// Live network response. A copy has been scheduled for caching.
    Network(Response),

    /// Network failed; an exact cache match was found.
    Cache(Response),

    /// Network failed and nothing matched; the fallback page is served.
    Fallback(Response),

    /// Network failed, no match, and the fallback itself is not cached.
    /// The platform surfaces a generic network error to the page.
    Unavailable,
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchOutcome::Network(res) | FetchOutcome::Cache(res) | FetchOutcome::Fallback(res) => {
                Some(res)
            }
            FetchOutcome::Passthrough | FetchOutcome::Unavailable => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            FetchOutcome::Network(res) | FetchOutcome::Cache(res) | FetchOutcome::Fallback(res) => {
                Some(res)
            }
            FetchOutcome::Passthrough | FetchOutcome::Unavailable => None,
        }
    }

    pub fn source(&self) -> Option<ResponseSource> {
        match self {
            FetchOutcome::Network(_) => Some(ResponseSource::Network),
            FetchOutcome::Cache(_) => Some(ResponseSource::Cache),
            FetchOutcome::Fallback(_) => Some(ResponseSource::Fallback),
            FetchOutcome::Passthrough | FetchOutcome::Unavailable => None,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, FetchOutcome::Passthrough)
    }

    /// Short label used in logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Passthrough => "passthrough",
            FetchOutcome::Network(_) => "network",
            FetchOutcome::Cache(_) => "cache",
            FetchOutcome::Fallback(_) => "fallback",
            FetchOutcome::Unavailable => "unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_matches_variant() {
        let res = Response::ok("x");
        assert_eq!(
            FetchOutcome::Network(res.clone()).source(),
            Some(ResponseSource::Network)
        );
        assert_eq!(
            FetchOutcome::Fallback(res.clone()).source(),
            Some(ResponseSource::Fallback)
        );
        assert_eq!(FetchOutcome::Unavailable.source(), None);
        assert_eq!(FetchOutcome::Passthrough.response(), None);
    }

    #[test]
    fn into_response_returns_body() {
        let outcome = FetchOutcome::Cache(Response::ok("cached"));
        assert_eq!(outcome.label(), "cache");
        assert_eq!(outcome.into_response().unwrap().body, "cached");
    }
}
