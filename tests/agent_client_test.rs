//! Agent API client tests using wiremock.
//!
//! These tests verify the endpoints `HttpSessionService` calls and how it maps
//! agent answers and failures to `ServiceError`.

use std::time::Duration;

use collector_console::error::ServiceError;
use collector_console::service::{HttpSessionService, IMPORT_PATH, INFO_PATH, RELOAD_PATH};
use collector_console::shell::{ConfigService, SessionService};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpSessionService {
    HttpSessionService::new(server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_info_decodes_version_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "InstanceID": "collector01",
            "Version": "0.9.1",
            "Commit": "abc1234def",
            "Branch": "master",
            "BuildStamp": "1700000000"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let info = assert_ok!(client(&server).fetch_info().await);
    assert_eq!(info.instance_id, "collector01");
    assert_eq!(info.short_label(), "v0.9.1 (abc1234)");
}

#[tokio::test]
async fn test_reload_returns_elapsed_description() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RELOAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("2.41s")))
        .mount(&server)
        .await;

    let elapsed = assert_ok!(client(&server).reload_config().await);
    assert_eq!(elapsed, "2.41s");
}

#[tokio::test]
async fn test_error_status_carries_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RELOAD_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("Error on reload: HMC hmc01 unreachable"),
        )
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).reload_config().await);
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), "Error on reload: HMC hmc01 unreachable");
}

#[tokio::test]
async fn test_empty_error_body_uses_reason_phrase() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).logout().await);
    assert_eq!(
        err,
        ServiceError::Status {
            status: 503,
            message: "Service Unavailable".to_string()
        }
    );
}

#[tokio::test]
async fn test_login_cookie_is_reused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "admin", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Set-Cookie", "session=abc123; Path=/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    assert_ok!(client.login("admin", "secret").await);
    assert_ok!(client.logout().await);
}

#[tokio::test]
async fn test_list_entries_accepts_map_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cfg/hmcservers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hmc01": {"ID": "hmc01", "Host": "10.0.0.5"},
            "hmc02": {"ID": "hmc02", "Host": "10.0.0.6"}
        })))
        .mount(&server)
        .await;

    let entries = assert_ok!(client(&server).list_entries("/api/cfg/hmcservers").await);
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn test_list_entries_rejects_scalar_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cfg/influxservers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(17)))
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).list_entries("/api/cfg/influxservers").await);
    assert!(matches!(err, ServiceError::Decode(_)));
}

#[tokio::test]
async fn test_import_posts_document_with_overwrite_flag() {
    let server = MockServer::start().await;
    let document = json!({"HMCServers": {"hmc01": {"ID": "hmc01"}}});
    Mock::given(method("POST"))
        .and(path(format!("{}/false", IMPORT_PATH)))
        .and(body_json(document.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("1 entries imported")))
        .expect(1)
        .mount(&server)
        .await;

    let summary = assert_ok!(client(&server).import_config(document, false).await);
    assert_eq!(summary, "1 entries imported");
}

#[tokio::test]
async fn test_unreachable_agent_is_transport_error() {
    // Nothing listens on the discard port
    let client = HttpSessionService::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = assert_err!(client.fetch_info().await);
    assert!(matches!(err, ServiceError::Transport(_)), "got {:?}", err);
}
