//! Client and transport configuration.
//!
//! Both structs are immutable values: build them once (by hand, with the
//! typed builder, or from environment variables) and hand them to the client.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::error::{CentrifugeError, CentrifugeResult};
use crate::types::HashAlgorithm;

/// Default server address.
const DEFAULT_HOST: &str = "http://localhost:8000";

/// Default MAC secret, matching the server's out-of-the-box configuration.
pub const DEFAULT_SECRET: &str = "secret";

/// HTTP transport settings.
///
/// TLS peer and hostname verification are always on; the certificate options
/// only add trust anchors.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use centrifuge_core::TransportConfig;
///
/// let config = TransportConfig::builder().connect_timeout_ms(Some(500)).build();
/// assert_eq!(config.connect_timeout(), Some(Duration::from_millis(500)));
/// assert_eq!(config.request_timeout(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct TransportConfig {
    /// PEM file with one or more extra trusted CA certificates.
    #[builder(default)]
    pub trusted_cert_file: Option<PathBuf>,

    /// Directory of PEM files with extra trusted CA certificates.
    #[builder(default)]
    pub trusted_ca_path: Option<PathBuf>,

    /// Connect timeout in milliseconds; HTTP stack default when unset.
    #[builder(default)]
    pub connect_timeout_ms: Option<u64>,

    /// Total request timeout in milliseconds; HTTP stack default when unset.
    #[builder(default)]
    pub request_timeout_ms: Option<u64>,
}

impl TransportConfig {
    /// Connect timeout as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    /// Total request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `CENTRIFUGE_CA_FILE` | *(unset)* |
    /// | `CENTRIFUGE_CA_PATH` | *(unset)* |
    /// | `CENTRIFUGE_CONNECT_TIMEOUT_MS` | *(unset)* |
    /// | `CENTRIFUGE_REQUEST_TIMEOUT_MS` | *(unset)* |
    ///
    /// # Errors
    ///
    /// Returns [`CentrifugeError::Config`] if a timeout is not a number.
    pub fn from_env() -> CentrifugeResult<Self> {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("CENTRIFUGE_CA_FILE") {
            config.trusted_cert_file = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("CENTRIFUGE_CA_PATH") {
            config.trusted_ca_path = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("CENTRIFUGE_CONNECT_TIMEOUT_MS") {
            config.connect_timeout_ms = Some(parse_millis("CENTRIFUGE_CONNECT_TIMEOUT_MS", &v)?);
        }
        if let Ok(v) = std::env::var("CENTRIFUGE_REQUEST_TIMEOUT_MS") {
            config.request_timeout_ms = Some(parse_millis("CENTRIFUGE_REQUEST_TIMEOUT_MS", &v)?);
        }

        Ok(config)
    }
}

/// Client settings: where the server lives and how requests are signed.
///
/// The secret seeds every MAC and is never transmitted; `Debug` output
/// redacts it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Server base address, e.g. `https://centrifugo.example.com`.
    #[builder(default = String::from(DEFAULT_HOST), setter(into))]
    pub host: String,

    /// Shared MAC secret.
    #[builder(default = String::from(DEFAULT_SECRET), setter(into))]
    pub secret: String,

    /// Digest algorithm for all signatures.
    #[builder(default)]
    pub algorithm: HashAlgorithm,

    /// HTTP transport settings.
    #[builder(default)]
    #[serde(default)]
    pub transport: TransportConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            secret: String::from(DEFAULT_SECRET),
            algorithm: HashAlgorithm::default(),
            transport: TransportConfig::default(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("transport", &self.transport)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `CENTRIFUGE_HOST` | `http://localhost:8000` |
    /// | `CENTRIFUGE_SECRET` | `secret` |
    /// | `CENTRIFUGE_ALGORITHM` | `sha256` |
    ///
    /// Transport settings are read by [`TransportConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns [`CentrifugeError::Config`] for an unsupported algorithm or a
    /// malformed timeout.
    pub fn from_env() -> CentrifugeResult<Self> {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("CENTRIFUGE_HOST") {
            config.host = v;
        }
        if let Ok(v) = std::env::var("CENTRIFUGE_SECRET") {
            config.secret = v;
        }
        if let Ok(v) = std::env::var("CENTRIFUGE_ALGORITHM") {
            config.algorithm = v.parse()?;
        }
        config.transport = TransportConfig::from_env()?;

        debug!(host = %config.host, algorithm = %config.algorithm, "loaded client configuration");
        Ok(config)
    }
}

fn parse_millis(name: &str, value: &str) -> CentrifugeResult<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| CentrifugeError::Config(format!("{name}={value:?} is not a millisecond count: {e}")))
}
