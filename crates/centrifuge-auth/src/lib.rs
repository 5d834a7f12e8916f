//! HMAC signing for the Centrifuge API client.
//!
//! One secret protects three trust boundaries: API requests sent by the
//! backend, connection tokens presented by end-user clients, and signs that
//! authorize private-channel subscriptions. All three are produced by
//! [`HashGenerator`], so rotating the secret rotates them together.
//!
//! # Usage
//!
//! ```rust
//! use centrifuge_auth::{ConnectCredentials, HashGenerator};
//!
//! let generator = HashGenerator::new("secret").unwrap();
//! let credentials = ConnectCredentials::issue(&generator, "42", "");
//! assert_eq!(credentials.token.len(), 64);
//! ```
//!
//! # Modules
//!
//! - [`generator`] - Keyed MAC over ordered parts
//! - [`credentials`] - Serializable connection and channel credentials

pub mod credentials;
pub mod generator;

pub use credentials::{ChannelSign, ConnectCredentials};
pub use centrifuge_core::DEFAULT_SECRET;
pub use generator::HashGenerator;
