//! Credentials handed to browser or mobile clients.
//!
//! A backend issues these and passes them to the end-user client, which
//! presents them to the messaging server when it connects or subscribes to a
//! private channel. The server recomputes each token with the shared secret.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generator::HashGenerator;

/// Connection parameters for an end-user client: `{user, timestamp, info, token}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectCredentials {
    /// Application user id (may be empty for anonymous access).
    pub user: String,
    /// Unix time in seconds, as sent in the connection handshake.
    pub timestamp: String,
    /// Extra connection info, usually a JSON string.
    pub info: String,
    /// HEX(HMAC(secret, user || timestamp || info)).
    pub token: String,
}

impl ConnectCredentials {
    /// Issue credentials stamped with the current time.
    #[must_use]
    pub fn issue(generator: &HashGenerator, user: &str, info: &str) -> Self {
        Self::issue_at(generator, user, Utc::now(), info)
    }

    /// Issue credentials stamped with `issued_at`.
    #[must_use]
    pub fn issue_at(
        generator: &HashGenerator,
        user: &str,
        issued_at: DateTime<Utc>,
        info: &str,
    ) -> Self {
        let timestamp = issued_at.timestamp().to_string();
        let token = generator.client_token(user, &timestamp, info);
        Self {
            user: user.to_owned(),
            timestamp,
            info: info.to_owned(),
            token,
        }
    }
}

/// Authorization for one private-channel subscription: `{client, channel, info, sign}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSign {
    /// Connection id assigned by the server.
    pub client: String,
    /// Private channel name.
    pub channel: String,
    /// Extra channel info, usually a JSON string.
    pub info: String,
    /// HEX(HMAC(secret, client || channel || info)).
    pub sign: String,
}

impl ChannelSign {
    /// Sign a subscription of `client` to `channel`.
    #[must_use]
    pub fn issue(generator: &HashGenerator, client: &str, channel: &str, info: &str) -> Self {
        Self {
            client: client.to_owned(),
            channel: channel.to_owned(),
            info: info.to_owned(),
            sign: generator.channel_sign(client, channel, info),
        }
    }
}
