// tests/client_retry_test.rs

use br_mediathek::client::{RobustClient, Transport};
use br_mediathek::config::AppConfig;
use br_mediathek::error::AppError;
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn test_client_does_not_retry_by_default() {
    let mut server = mockito::Server::new_async().await;
    let unavailable = server
        .mock("GET", "/sendungen/index.html")
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(1)
        .create_async()
        .await;

    let config = AppConfig::default();
    assert_eq!(config.max_retries, 0);
    let client = RobustClient::new(&config).expect("Failed to create client");

    let result = client
        .fetch_text(&format!("{}/sendungen/index.html", server.url()), &[], "UTF-8")
        .await;

    // 传输层的失败原样交给调用方，不会重试
    assert!(matches!(result, Err(AppError::Network(_))), "意外的结果: {:?}", result);
    unavailable.assert_async().await;
}

#[tokio::test]
async fn test_fetch_text_sends_headers_and_decodes_charset() {
    let mut server = mockito::Server::new_async().await;
    // "Grüße" 的 ISO-8859-1 编码
    let latin1_body: &[u8] = b"Gr\xfc\xdfe";
    let page = server
        .mock("GET", "/alt.html")
        .match_header("referer", "https://www.br.de/mediathek/")
        .with_status(200)
        .with_header("content-type", "text/html; charset=ISO-8859-1")
        .with_body(latin1_body)
        .create_async()
        .await;

    let client = RobustClient::new(&AppConfig::default()).expect("Failed to create client");
    let text = client
        .fetch_text(
            &format!("{}/alt.html", server.url()),
            &[("Referer", "https://www.br.de/mediathek/")],
            "UTF-8",
        )
        .await
        .expect("Request should succeed");

    page.assert_async().await;
    assert_eq!(text, "Grüße");
}

#[tokio::test]
async fn test_post_json_sends_body() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({"operationName": "VideoDetail", "variables": {"clipId": "av:1"}});
    let endpoint = server
        .mock("POST", "/graphql")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(body.clone()))
        .with_status(200)
        .with_body(r#"{"data":{}}"#)
        .create_async()
        .await;

    let client = RobustClient::new(&AppConfig::default()).expect("Failed to create client");
    let text = client
        .post_json(
            &format!("{}/graphql", server.url()),
            &[("Content-Type", "application/json")],
            &body,
            "UTF-8",
        )
        .await
        .expect("Request should succeed");

    endpoint.assert_async().await;
    assert_eq!(text, r#"{"data":{}}"#);
}
