//! The API client.
//!
//! Every API call follows the same pipeline:
//!
//! 1. Build the `{method, params}` envelope.
//! 2. Serialize it once to compact JSON (`data`).
//! 3. Sign exactly those bytes (`sign`).
//! 4. Hand `{data, sign}` to the transport and return the decoded answer.
//!
//! Serialization failures stop the call before anything touches the network.

use std::sync::Arc;

use centrifuge_auth::{ChannelSign, ConnectCredentials, HashGenerator};
use centrifuge_core::{
    CentrifugeResult, ClientConfig, Envelope, Method, NoParams, SignedRequest,
};
use centrifuge_transport::{HttpTransport, Transport, api_url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::params::{
    BroadcastParams, ChannelParams, DisconnectParams, PublishParams, UnsubscribeParams,
};

/// Client for the messaging server's HTTP API.
///
/// Holds the server host, one [`HashGenerator`] and one [`Transport`]. It has
/// no mutable state, so clones are cheap and calls may run concurrently.
///
/// # Examples
///
/// ```no_run
/// # async fn run() -> centrifuge_core::CentrifugeResult<()> {
/// use centrifuge_client::Client;
/// use serde_json::json;
///
/// let client = Client::new("http://localhost:8000", "secret")?;
/// client.publish("news", &json!({"text": "hi"})).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    host: String,
    hash_generator: HashGenerator,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Library version.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// Create a client with HMAC-SHA256 signing and the default HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`centrifuge_core::CentrifugeError::Config`] for a malformed host.
    pub fn new(host: impl Into<String>, secret: &str) -> CentrifugeResult<Self> {
        let transport = HttpTransport::new(Default::default())?;
        Self::with_parts(host, HashGenerator::new(secret)?, Arc::new(transport))
    }

    /// Create a client from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`centrifuge_core::CentrifugeError::Config`] for a malformed
    /// host or unreadable certificates.
    pub fn from_config(config: &ClientConfig) -> CentrifugeResult<Self> {
        let hash_generator = HashGenerator::with_algorithm(&config.secret, config.algorithm)?;
        let transport = HttpTransport::new(config.transport.clone())?;
        Self::with_parts(config.host.clone(), hash_generator, Arc::new(transport))
    }

    /// Create a client from explicit collaborators, e.g. a test transport.
    ///
    /// # Errors
    ///
    /// Returns [`centrifuge_core::CentrifugeError::Config`] for a malformed host.
    pub fn with_parts(
        host: impl Into<String>,
        hash_generator: HashGenerator,
        transport: Arc<dyn Transport>,
    ) -> CentrifugeResult<Self> {
        let host = host.into();
        api_url(&host)?;
        Ok(Self {
            host,
            hash_generator,
            transport,
        })
    }

    /// Server host this client talks to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The generator behind every signature.
    #[must_use]
    pub fn hash_generator(&self) -> &HashGenerator {
        &self.hash_generator
    }

    /// Send `data` into `channel`.
    pub async fn publish<T>(&self, channel: &str, data: &T) -> CentrifugeResult<Value>
    where
        T: Serialize + ?Sized,
    {
        self.send(Method::Publish, &PublishParams { channel, data })
            .await
    }

    /// Send the same `data` into several channels.
    pub async fn broadcast<S, T>(&self, channels: &[S], data: &T) -> CentrifugeResult<Value>
    where
        S: AsRef<str>,
        T: Serialize + ?Sized,
    {
        let channels = channels.iter().map(|c| c.as_ref()).collect();
        self.send(Method::Broadcast, &BroadcastParams { channels, data })
            .await
    }

    /// Unsubscribe user `user_id` from `channel`.
    pub async fn unsubscribe(&self, channel: &str, user_id: &str) -> CentrifugeResult<Value> {
        self.send(
            Method::Unsubscribe,
            &UnsubscribeParams {
                channel,
                user: user_id,
            },
        )
        .await
    }

    /// Disconnect every connection of user `user_id`.
    pub async fn disconnect(&self, user_id: &str) -> CentrifugeResult<Value> {
        self.send(Method::Disconnect, &DisconnectParams { user: user_id })
            .await
    }

    /// Clients currently subscribed to `channel`.
    pub async fn presence(&self, channel: &str) -> CentrifugeResult<Value> {
        self.send(Method::Presence, &ChannelParams { channel }).await
    }

    /// Last messages sent into `channel`.
    pub async fn history(&self, channel: &str) -> CentrifugeResult<Value> {
        self.send(Method::History, &ChannelParams { channel }).await
    }

    /// Currently active channels.
    pub async fn channels(&self) -> CentrifugeResult<Value> {
        self.send(Method::Channels, &NoParams {}).await
    }

    /// Statistics about running server nodes.
    pub async fn stats(&self) -> CentrifugeResult<Value> {
        self.send(Method::Stats, &NoParams {}).await
    }

    /// Serialize, sign and dispatch an arbitrary API call.
    ///
    /// The transport's decoded answer is returned unchanged.
    ///
    /// # Errors
    ///
    /// [`centrifuge_core::CentrifugeError::Encoding`] if `params` cannot be
    /// serialized (nothing is sent), otherwise whatever the transport reports.
    pub async fn send<P>(&self, method: Method, params: &P) -> CentrifugeResult<Value>
    where
        P: Serialize + ?Sized,
    {
        debug!(method = %method, host = %self.host, "dispatching API call");

        let data = Envelope::new(method, params).to_json()?;
        let sign = self.generate_api_sign(&data);
        let request = SignedRequest::new(data, sign);

        self.transport.communicate(&self.host, &request).await
    }

    /// Sign a serialized request body.
    #[must_use]
    pub fn generate_api_sign(&self, data: &str) -> String {
        self.hash_generator.api_sign(data)
    }

    /// Check a request body signature in constant time.
    #[must_use]
    pub fn verify_api_sign(&self, data: &str, sign: &str) -> bool {
        self.hash_generator.verify([data], sign)
    }

    /// Connection token for an end-user client.
    ///
    /// `timestamp` must be the value the client sends when connecting.
    #[must_use]
    pub fn generate_client_token(&self, user: &str, timestamp: &str, info: &str) -> String {
        self.hash_generator.client_token(user, timestamp, info)
    }

    /// Subscription sign for private channel `channel` and connection `client`.
    #[must_use]
    pub fn generate_channel_sign(&self, client: &str, channel: &str, info: &str) -> String {
        self.hash_generator.channel_sign(client, channel, info)
    }

    /// Complete connection parameters stamped with the current time.
    #[must_use]
    pub fn connect_credentials(&self, user: &str, info: &str) -> ConnectCredentials {
        ConnectCredentials::issue(&self.hash_generator, user, info)
    }

    /// Complete private-channel authorization for one subscription.
    #[must_use]
    pub fn channel_credentials(&self, client: &str, channel: &str, info: &str) -> ChannelSign {
        ChannelSign::issue(&self.hash_generator, client, channel, info)
    }
}
