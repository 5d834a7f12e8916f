//! Client for the Centrifuge real-time messaging server HTTP API.
//!
//! [`Client`] publishes messages, manages presence and history, and issues the
//! signed tokens end-user clients present to the server. Requests are signed
//! with the shared secret and posted to `{host}/api/`.
//!
//! # Usage
//!
//! ```no_run
//! # async fn run() -> centrifuge_core::CentrifugeResult<()> {
//! use centrifuge_client::Client;
//! use serde_json::json;
//!
//! let client = Client::new("https://centrifugo.example.com", "secret")?;
//! client.publish("news", &json!({"text": "hello"})).await?;
//! let presence = client.presence("news").await?;
//!
//! // Hand these to a browser client.
//! let credentials = client.connect_credentials("42", "");
//! # Ok(())
//! # }
//! ```

mod client;
pub mod params;

pub use centrifuge_auth::{ChannelSign, ConnectCredentials, HashGenerator};
pub use centrifuge_core::{
    CentrifugeError, CentrifugeResult, ClientConfig, HashAlgorithm, Method, TransportConfig,
};
pub use centrifuge_transport::{HttpTransport, Transport};
pub use client::Client;
