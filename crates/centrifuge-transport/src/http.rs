//! reqwest-backed [`Transport`].
//!
//! Each call is a single `POST {host}/api/` with a form body of `data` and
//! `sign`. Outcomes are classified as:
//!
//! | Outcome | Result |
//! |---------|--------|
//! | no response (DNS, TLS, timeout, reset) | `Transport { status: None, .. }` |
//! | status other than 200 | `Transport { status: Some(code), .. }` with the raw body |
//! | 200 with a JSON body | decoded [`Value`] |
//! | 200 with anything else | `Encoding` |
//!
//! Nothing is retried here.

use std::error::Error as _;

use async_trait::async_trait;
use centrifuge_core::{CentrifugeError, CentrifugeResult, SignedRequest, TransportConfig};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

use crate::tls::load_trust_anchors;
use crate::transport::{Transport, api_url};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

const USER_AGENT: &str = concat!("centrifuge-api-rs/", env!("CARGO_PKG_VERSION"));

/// HTTP transport with fixed TLS trust and timeout settings.
///
/// The configuration is read-only after construction, so one instance can
/// serve any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: TransportConfig,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CentrifugeError::Config`] if a certificate file or directory
    /// cannot be loaded or the HTTP client cannot be built.
    pub fn new(config: TransportConfig) -> CentrifugeResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        for cert in load_trust_anchors(&config)? {
            builder = builder.add_root_certificate(cert);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| CentrifugeError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// The configuration this transport was built with.
    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn communicate(&self, host: &str, request: &SignedRequest) -> CentrifugeResult<Value> {
        let url = api_url(host)?;
        debug!(url = %url, bytes = request.data.len(), "sending API request");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(request.to_form_body())
            .send()
            .await
            .map_err(|e| CentrifugeError::transport(None, describe(&e), ""))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CentrifugeError::transport(Some(status.as_u16()), describe(&e), ""))?;

        debug!(status = status.as_u16(), bytes = body.len(), "received API response");

        if status != StatusCode::OK {
            return Err(CentrifugeError::transport(
                Some(status.as_u16()),
                status.canonical_reason().unwrap_or("unexpected status"),
                body,
            ));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Flatten a reqwest error and its sources into one diagnostic line.
fn describe(err: &reqwest::Error) -> String {
    let mut message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };

    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
