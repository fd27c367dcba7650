use std::time::Duration;

use console_engine::{FailureKind, ReqwestTransport, Transport, TransportSettings};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(server: &MockServer) -> ReqwestTransport {
    ReqwestTransport::new(TransportSettings::new(&server.uri()).unwrap()).unwrap()
}

#[tokio::test]
async fn posts_json_and_returns_the_parsed_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/poll"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"log_from": 3, "context": "ctx"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "log_version": 4})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = transport(&server)
        .post_json("poll", &json!({"log_from": 3, "context": "ctx"}))
        .await
        .expect("reply");

    assert_eq!(reply, json!({"ok": true, "log_version": 4}));
}

#[tokio::test]
async fn server_error_is_an_error_not_a_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pause"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let err = transport(&server)
        .post_json("/pause", &json!({"paused": true, "context": "ctx"}))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn non_json_reply_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = transport(&server)
        .post_json("templates", &json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn oversized_reply_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/poll"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "{{\"content\":\"{}\"}}",
            "x".repeat(256)
        )))
        .mount(&server)
        .await;

    let mut settings = TransportSettings::new(&server.uri()).unwrap();
    settings.max_bytes = 64;
    let err = ReqwestTransport::new(settings)
        .unwrap()
        .post_json("poll", &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind,
        FailureKind::TooLarge { max_bytes: 64, .. }
    ));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/poll"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true}))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let mut settings = TransportSettings::new(&server.uri()).unwrap();
    settings.request_timeout = Some(Duration::from_millis(100));
    let err = ReqwestTransport::new(settings)
        .unwrap()
        .post_json("poll", &json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() {
    // Bind then drop a server so the port is very likely closed.
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let transport = ReqwestTransport::new(TransportSettings::new(&uri).unwrap()).unwrap();
    let err = transport.post_json("poll", &json!({})).await.unwrap_err();

    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
}
