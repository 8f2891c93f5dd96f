//! Virtual repository membership synchronization

mod common;

use artifactory_client::{ClientError, Outcome, VirtualRepositoryConfiguration};
use common::{MockTransport, client_with, virtual_repo_json};
use reqwest::Method;

fn sent_config(transport: &MockTransport) -> VirtualRepositoryConfiguration {
    let req = transport.last_request();
    assert_eq!(req.method, Method::POST);
    serde_json::from_slice(req.body.as_deref().expect("body")).expect("virtual config")
}

#[tokio::test]
async fn test_add_appends_and_writes_once() {
    common::init_tracing();
    let transport = MockTransport::new()
        .respond(200, &virtual_repo_json("libs", &["a-local", "b-local"]))
        .respond(200, "")
        .shared();
    let client = client_with(&transport);

    let outcome = client.add_repository_to_group("libs", "c-local").await.unwrap();
    assert_eq!(outcome, Outcome::Success(()));
    assert_eq!(transport.request_count(), 2);

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[1].url.path(), "/api/repositories/libs");

    let sent = sent_config(&transport);
    assert_eq!(sent.key, "libs");
    assert_eq!(sent.package_type, "maven");
    assert_eq!(sent.repositories, vec!["a-local", "b-local", "c-local"]);
}

#[tokio::test]
async fn test_add_is_idempotent() {
    let transport = MockTransport::new()
        .respond(200, &virtual_repo_json("libs", &["a-local"]))
        .respond(200, "")
        .respond(200, &virtual_repo_json("libs", &["a-local", "b-local"]))
        .shared();
    let client = client_with(&transport);

    client.add_repository_to_group("libs", "b-local").await.unwrap();
    client.add_repository_to_group("libs", "b-local").await.unwrap();

    let writes = transport
        .requests()
        .iter()
        .filter(|r| r.method == Method::POST)
        .count();
    assert_eq!(writes, 1);
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn test_remove_filters_all_matches() {
    let transport = MockTransport::new()
        .respond(200, &virtual_repo_json("libs", &["a-local", "b-local", "a-local"]))
        .respond(200, "")
        .shared();
    let client = client_with(&transport);

    let outcome = client.remove_repository_from_group("libs", "a-local").await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(sent_config(&transport).repositories, vec!["b-local"]);
}

#[tokio::test]
async fn test_remove_absent_does_not_write() {
    let transport = MockTransport::new()
        .respond(200, &virtual_repo_json("libs", &["a-local"]))
        .shared();
    let client = client_with(&transport);

    let outcome = client.remove_repository_from_group("libs", "z-local").await.unwrap();
    assert_eq!(outcome, Outcome::Success(()));
    assert_eq!(transport.request_count(), 1);
    assert_eq!(transport.last_request().method, Method::GET);
}

#[tokio::test]
async fn test_fetch_status_aborts_without_write() {
    let transport = MockTransport::new().respond(404, "no such repo").shared();
    let client = client_with(&transport);

    let outcome = client.add_repository_to_group("missing", "a-local").await.unwrap();
    let status = outcome.status().expect("business status");
    assert_eq!(status.status_code, 404);
    assert_eq!(status.text(), "no such repo");
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_fetch_errors_are_retried_then_surface() {
    let transport = MockTransport::new().respond(500, "down").shared();
    let client = client_with(&transport);

    let err = client
        .add_repository_to_group("libs", "a-local")
        .await
        .unwrap_err();
    match &err {
        ClientError::RetriesExhausted { attempts, source } => {
            assert_eq!(*attempts, 3);
            assert!(matches!(**source, ClientError::Server { status: 500, .. }));
        }
        other => panic!("Expected RetriesExhausted, got {:?}", other),
    }
    assert!(err.to_string().contains("3 attempts"));
    assert!(transport.requests().iter().all(|r| r.method == Method::GET));
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn test_transient_fetch_failure_recovers() {
    let transport = MockTransport::new()
        .fail("connection reset")
        .fail("connection reset")
        .respond(200, &virtual_repo_json("libs", &[]))
        .respond(200, "")
        .shared();
    let client = client_with(&transport);

    let outcome = client.add_repository_to_group("libs", "a-local").await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(transport.request_count(), 4);
    assert_eq!(sent_config(&transport).repositories, vec!["a-local"]);
}

#[tokio::test]
async fn test_write_status_is_returned() {
    let transport = MockTransport::new()
        .respond(200, &virtual_repo_json("libs", &[]))
        .respond(400, r#"{"errors":[{"status":400,"message":"Invalid member"}]}"#)
        .shared();
    let client = client_with(&transport);

    let outcome = client.add_repository_to_group("libs", "a-local").await.unwrap();
    assert_eq!(outcome.status().unwrap().to_string(), "400 Invalid member");
}

#[tokio::test]
async fn test_write_server_error_is_not_retried() {
    let transport = MockTransport::new()
        .respond(200, &virtual_repo_json("libs", &[]))
        .respond(502, "bad gateway")
        .shared();
    let client = client_with(&transport);

    let result = client.add_repository_to_group("libs", "a-local").await;
    assert!(matches!(result, Err(ClientError::Server { status: 502, .. })));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_empty_keys_rejected() {
    let transport = MockTransport::new().shared();
    let client = client_with(&transport);

    assert!(matches!(
        client.add_repository_to_group("", "a-local").await,
        Err(ClientError::EmptyKey)
    ));
    assert!(matches!(
        client.remove_repository_from_group("libs", "").await,
        Err(ClientError::EmptyKey)
    ));
    assert_eq!(transport.request_count(), 0);
}
