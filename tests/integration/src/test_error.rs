//! Error handling integration tests.

#[cfg(test)]
mod tests {
    use centrifuge_client::{CentrifugeError, Client, ClientConfig};

    use crate::test_config;

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_requests_signed_with_wrong_secret() {
        let config = ClientConfig {
            secret: "definitely-not-the-secret".to_owned(),
            ..test_config()
        };
        let client = Client::from_config(&config).expect("client");

        let err = client.stats().await.expect_err("wrong secret must fail");

        match err {
            CentrifugeError::Transport { status, .. } => {
                assert!(matches!(status, Some(400 | 401 | 403)), "status: {status:?}");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fail_fast_on_closed_port() {
        let config = ClientConfig {
            host: "http://127.0.0.1:1".to_owned(),
            ..test_config()
        };
        let client = Client::from_config(&config).expect("client");

        let err = client.channels().await.expect_err("closed port must fail");

        assert!(matches!(err, CentrifugeError::Transport { status: None, .. }));
    }
}
