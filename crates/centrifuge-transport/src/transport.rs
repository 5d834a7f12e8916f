//! The transport seam between the client and the network.

use async_trait::async_trait;
use centrifuge_core::{CentrifugeError, CentrifugeResult, SignedRequest};
use reqwest::Url;
use serde_json::Value;

/// Path of the HTTP API under the server host.
pub const API_PATH: &str = "/api/";

/// Delivers one signed request to the server and decodes the answer.
///
/// The trait is object-safe so a client can hold `Arc<dyn Transport>` and
/// tests can substitute a recording double.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send `request` to the API under `host` and return the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`CentrifugeError::Transport`] for network failures and non-200
    /// answers, and [`CentrifugeError::Encoding`] for bodies that are not JSON.
    async fn communicate(&self, host: &str, request: &SignedRequest) -> CentrifugeResult<Value>;
}

/// Build the API endpoint URL (`{host}/api/`) for a server host.
///
/// # Errors
///
/// Returns [`CentrifugeError::Config`] if `host` is not an absolute
/// `http`/`https` URL.
pub fn api_url(host: &str) -> CentrifugeResult<Url> {
    let base = host.trim_end_matches('/');
    let url = Url::parse(&format!("{base}{API_PATH}"))
        .map_err(|e| CentrifugeError::Config(format!("invalid host {host:?}: {e}")))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        scheme => Err(CentrifugeError::Config(format!(
            "invalid host {host:?}: expected an http(s) URL, got scheme {scheme:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_append_api_path() {
        assert_eq!(
            api_url("http://localhost:8000").unwrap().as_str(),
            "http://localhost:8000/api/"
        );
        assert_eq!(
            api_url("https://rt.example.com/").unwrap().as_str(),
            "https://rt.example.com/api/"
        );
        assert_eq!(api_url("http://x").unwrap().as_str(), "http://x/api/");
    }

    #[test]
    fn test_should_keep_host_prefix_path() {
        assert_eq!(
            api_url("https://example.com/centrifugo").unwrap().as_str(),
            "https://example.com/centrifugo/api/"
        );
    }

    #[test]
    fn test_should_reject_malformed_hosts() {
        assert!(matches!(api_url("localhost:8000"), Err(CentrifugeError::Config(_))));
        assert!(matches!(api_url("ftp://example.com"), Err(CentrifugeError::Config(_))));
        assert!(matches!(api_url(""), Err(CentrifugeError::Config(_))));
    }
}
