//! HTTP transport for the Centrifuge API client.
//!
//! The [`Transport`] trait is the seam the client dispatches through;
//! [`HttpTransport`] is the production implementation built on `reqwest`.
//!
//! # Modules
//!
//! - [`transport`] - Transport trait and API URL construction
//! - [`http`] - reqwest-backed transport
//! - `tls` - Loading extra trust anchors

pub mod http;
mod tls;
pub mod transport;

pub use http::HttpTransport;
pub use transport::{API_PATH, Transport, api_url};
