//! Integration tests against a running Centrifuge server.
//!
//! These tests require a server listening at `CENTRIFUGE_HOST` (default
//! `http://localhost:8000`) configured with `CENTRIFUGE_SECRET` (default
//! `secret`). They are marked `#[ignore]` so they don't run during normal
//! `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p centrifuge-integration -- --ignored
//! ```

use std::sync::Once;

use centrifuge_client::{Client, ClientConfig};
use serde_json::Value;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Client configuration from the environment.
#[must_use]
pub fn test_config() -> ClientConfig {
    ClientConfig::from_env().expect("valid CENTRIFUGE_* environment")
}

/// Create a client pointing at the local server.
#[must_use]
pub fn api_client() -> Client {
    init_tracing();
    Client::from_config(&test_config()).expect("client from environment")
}

/// Generate a unique channel name for a test.
#[must_use]
pub fn test_channel_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// The first command reply in an API answer.
///
/// The server answers with an array of `{method, error, body}` replies; a
/// bare object is treated as a single reply.
#[must_use]
pub fn first_reply(value: &Value) -> &Value {
    match value {
        Value::Array(replies) => replies.first().expect("at least one reply"),
        other => other,
    }
}

/// Assert that a reply carries no error.
pub fn assert_reply_ok(value: &Value, method: &str) {
    let reply = first_reply(value);
    assert_eq!(reply["method"], method, "unexpected reply: {value}");
    assert!(
        reply["error"].is_null() || reply["error"] == "",
        "{method} failed: {value}"
    );
}

mod test_api;
mod test_error;
