//! Error types for the Centrifuge API client.

/// Error returned by every client, signing and transport operation.
#[derive(Debug, thiserror::Error)]
pub enum CentrifugeError {
    /// A request envelope could not be serialized, or a response body could
    /// not be decoded as JSON.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The HTTP exchange failed or the server answered with a non-200 status.
    #[error("transport error (status: {}): {message}; body: {body}", status_display(.status))]
    Transport {
        /// HTTP status code, absent when no response was received.
        status: Option<u16>,
        /// Diagnostic text from the HTTP layer.
        message: String,
        /// Raw response body, empty when no response was received.
        body: String,
    },

    /// Invalid configuration (unsupported algorithm, malformed host,
    /// unreadable certificates).
    #[error("configuration error: {0}")]
    Config(String),
}

impl CentrifugeError {
    /// Build a [`CentrifugeError::Transport`] error.
    pub fn transport(
        status: Option<u16>,
        message: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::Transport {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    /// The HTTP status carried by a transport error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

#[allow(clippy::ref_option)]
fn status_display(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_owned(), |s| s.to_string())
}

/// Convenience result type for Centrifuge API operations.
pub type CentrifugeResult<T> = Result<T, CentrifugeError>;
