//! Typed `params` objects for the built-in API methods.
//!
//! Field order here is the order keys appear in the signed JSON.

use serde::Serialize;

/// `publish` parameters.
#[derive(Debug, Serialize)]
pub struct PublishParams<'a, T: ?Sized> {
    /// Target channel.
    pub channel: &'a str,
    /// Message payload.
    pub data: &'a T,
}

/// `broadcast` parameters.
#[derive(Debug, Serialize)]
pub struct BroadcastParams<'a, T: ?Sized> {
    /// Target channels.
    pub channels: Vec<&'a str>,
    /// Message payload.
    pub data: &'a T,
}

/// `unsubscribe` parameters.
#[derive(Debug, Serialize)]
pub struct UnsubscribeParams<'a> {
    /// Channel to remove the user from.
    pub channel: &'a str,
    /// User id.
    pub user: &'a str,
}

/// `disconnect` parameters.
#[derive(Debug, Serialize)]
pub struct DisconnectParams<'a> {
    /// User id.
    pub user: &'a str,
}

/// Parameters for methods addressing a single channel (`presence`, `history`).
#[derive(Debug, Serialize)]
pub struct ChannelParams<'a> {
    /// Channel name.
    pub channel: &'a str,
}
