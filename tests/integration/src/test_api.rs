//! API method integration tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{api_client, assert_reply_ok, first_reply, test_channel_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_publish_and_read_history() {
        let client = api_client();
        let channel = test_channel_name("history");

        let published = client
            .publish(&channel, &json!({"text": "hello"}))
            .await
            .expect("publish");
        assert_reply_ok(&published, "publish");

        let history = client.history(&channel).await.expect("history");
        assert_reply_ok(&history, "history");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_broadcast_to_several_channels() {
        let client = api_client();
        let channels = [test_channel_name("b1"), test_channel_name("b2")];

        let result = client
            .broadcast(&channels, &json!({"n": 1}))
            .await
            .expect("broadcast");

        assert_reply_ok(&result, "broadcast");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_empty_presence() {
        let client = api_client();
        let channel = test_channel_name("presence");

        let result = client.presence(&channel).await.expect("presence");

        assert_reply_ok(&result, "presence");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_channels_and_stats() {
        let client = api_client();

        let channels = client.channels().await.expect("channels");
        assert_reply_ok(&channels, "channels");

        let stats = client.stats().await.expect("stats");
        assert_reply_ok(&stats, "stats");
        assert!(!first_reply(&stats)["body"].is_null());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_unsubscribe_and_disconnect_unknown_user() {
        let client = api_client();
        let channel = test_channel_name("unsub");

        let result = client.unsubscribe(&channel, "nobody").await.expect("unsubscribe");
        assert_reply_ok(&result, "unsubscribe");

        let result = client.disconnect("nobody").await.expect("disconnect");
        assert_reply_ok(&result, "disconnect");
    }
}
