//! Wire-level types shared across the client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CentrifugeError;

/// An API method understood by the messaging server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// Send data into a single channel.
    Publish,
    /// Send the same data into several channels.
    Broadcast,
    /// Unsubscribe a user from a channel.
    Unsubscribe,
    /// Disconnect every connection of a user.
    Disconnect,
    /// Clients currently subscribed to a channel.
    Presence,
    /// Last messages sent into a channel.
    History,
    /// Currently active channels.
    Channels,
    /// Statistics about running server nodes.
    Stats,
    /// Any other method name, passed through unchanged.
    Custom(String),
}

impl Method {
    /// The method name as it appears in the envelope.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Publish => "publish",
            Self::Broadcast => "broadcast",
            Self::Unsubscribe => "unsubscribe",
            Self::Disconnect => "disconnect",
            Self::Presence => "presence",
            Self::History => "history",
            Self::Channels => "channels",
            Self::Stats => "stats",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for Method {
    fn from(name: &str) -> Self {
        match name {
            "publish" => Self::Publish,
            "broadcast" => Self::Broadcast,
            "unsubscribe" => Self::Unsubscribe,
            "disconnect" => Self::Disconnect,
            "presence" => Self::Presence,
            "history" => Self::History,
            "channels" => Self::Channels,
            "stats" => Self::Stats,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Method {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Method {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from(name.as_str()))
    }
}

/// One remote API call: `{"method": ..., "params": {...}}`.
///
/// Field order is fixed, so the serialized form is stable for a given
/// `params` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<P = serde_json::Value> {
    /// The API method.
    pub method: Method,
    /// Method-specific parameters.
    pub params: P,
}

impl<P: Serialize> Envelope<P> {
    /// Create an envelope.
    pub fn new(method: Method, params: P) -> Self {
        Self { method, params }
    }

    /// Serialize to the compact JSON string that gets signed and sent.
    pub fn to_json(&self) -> Result<String, CentrifugeError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parameters for methods that take none; serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoParams {}

/// A serialized envelope together with its signature.
///
/// `sign` is computed over exactly the bytes of `data`; the pair is
/// transmitted without touching `data` again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedRequest {
    /// Serialized envelope.
    pub data: String,
    /// Lower-case hex MAC over `data`.
    pub sign: String,
}

impl SignedRequest {
    /// Pair serialized data with its signature.
    pub fn new(data: impl Into<String>, sign: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            sign: sign.into(),
        }
    }

    /// Encode as an `application/x-www-form-urlencoded` body (`data=...&sign=...`).
    #[must_use]
    pub fn to_form_body(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("data", &self.data)
            .append_pair("sign", &self.sign)
            .finish()
    }
}

/// Digest algorithm used for every MAC the client produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// HMAC-MD5.
    Md5,
    /// HMAC-SHA1.
    Sha1,
    /// HMAC-SHA256, the server's default.
    #[default]
    Sha256,
    /// HMAC-SHA384.
    Sha384,
    /// HMAC-SHA512.
    Sha512,
}

impl HashAlgorithm {
    /// Lower-case algorithm name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = CentrifugeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(CentrifugeError::Config(format!(
                "unsupported hash algorithm: {s}"
            ))),
        }
    }
}
