//! Core types, configuration, and errors for the Centrifuge API client.
//!
//! This crate provides the vocabulary shared by the signing, transport and
//! client crates: the request envelope and its signed wire form, the MAC
//! algorithm selector, client/transport configuration, and the error
//! taxonomy every operation reports through.

mod config;
mod error;
mod types;

pub use config::{ClientConfig, DEFAULT_SECRET, TransportConfig};
pub use error::{CentrifugeError, CentrifugeResult};
pub use types::{Envelope, HashAlgorithm, Method, NoParams, SignedRequest};
