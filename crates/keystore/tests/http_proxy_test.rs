use keystore::model::{ContainerType, OrderCreate, SecretCreate, SecretUpdate};
use keystore::{KeystoreConfig, KeystoreError, KeystoreSystem};
use resource_framework::SessionError;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn connect(server: &MockServer) -> KeystoreSystem {
    let config = KeystoreConfig {
        endpoint: Some(format!("{}/v1", server.uri())),
        token: Some("tok".into()),
        project_id: Some("proj".into()),
        ..Default::default()
    };
    KeystoreSystem::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_create_secret_sends_credentials_and_merges_ref() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/secrets"))
        .and(header("x-auth-token", "tok"))
        .and(header("x-project-id", "proj"))
        .and(body_json(json!({
            "name": "db-password",
            "payload": "hunter2",
            "payload_content_type": "text/plain"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"secret_ref": "http://kms/v1/secrets/s-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let system = connect(&server).await;
    let secret = system
        .proxy
        .create_secret(SecretCreate::named("db-password").with_payload("hunter2"))
        .await
        .unwrap();

    assert_eq!(secret.secret_ref.as_deref(), Some("http://kms/v1/secrets/s-1"));
    assert_eq!(secret.name.as_deref(), Some("db-password"));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_get_container_decodes_body_and_maps_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/containers/c-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "container_ref": "http://kms/v1/containers/c-1",
            "name": "tls",
            "type": "certificate",
            "status": "ACTIVE",
            "secret_refs": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/containers/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let system = connect(&server).await;

    let container = system.proxy.get_container("c-1").await.unwrap();
    assert_eq!(container.container_type, Some(ContainerType::Certificate));

    let missing = system.proxy.get_container("gone").await;
    assert!(matches!(missing, Err(KeystoreError::NotFound { kind: "container", .. })));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_find_secret_falls_back_to_name_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secrets/db-password"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/secrets"))
        .and(query_param("name", "db-password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secrets": [
                {"secret_ref": "http://kms/v1/secrets/s-1", "name": "db-password"},
                {"secret_ref": "http://kms/v1/secrets/s-2", "name": "db-password-old"}
            ],
            "total": 2
        })))
        .mount(&server)
        .await;

    let system = connect(&server).await;
    let found = system.proxy.find_secret("db-password").await.unwrap().unwrap();
    assert_eq!(found.secret_ref.as_deref(), Some("http://kms/v1/secrets/s-1"));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_update_secret_puts_then_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/secrets/s-1"))
        .and(body_json(json!({"payload": "new"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/secrets/s-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secret_ref": "http://kms/v1/secrets/s-1",
            "name": "db-password",
            "status": "ACTIVE"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let system = connect(&server).await;
    let update = SecretUpdate {
        payload: Some("new".into()),
        ..Default::default()
    };
    let secret = system.proxy.update_secret("s-1", update).await.unwrap();
    assert_eq!(secret.status.as_deref(), Some("ACTIVE"));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_delete_order_respects_ignore_missing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/orders/o-404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let system = connect(&server).await;
    system.proxy.delete_order("o-404", true).await.unwrap();
    let strict = system.proxy.delete_order("o-404", false).await;
    assert!(matches!(strict, Err(KeystoreError::NotFound { kind: "order", .. })));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_service_errors_surface_as_communication_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/orders"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "title": "Bad Request",
            "description": "Invalid bit_length"
        })))
        .mount(&server)
        .await;

    let system = connect(&server).await;

    let listed = system.proxy.orders().await;
    assert!(matches!(
        listed,
        Err(KeystoreError::Communication(SessionError::Unauthorized(401)))
    ));

    let created = system
        .proxy
        .create_order(OrderCreate::key("bad", "aes", 7))
        .await;
    match created {
        Err(KeystoreError::Communication(SessionError::Status { status, message })) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid bit_length");
        }
        other => panic!("expected status error, got {other:?}"),
    }

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_ids_cannot_reach_another_kind() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/containers/c-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/secrets/..%2Fcontainers%2Fc-1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let system = connect(&server).await;
    let result = system.proxy.delete_secret("../containers/c-1", false).await;
    assert!(matches!(result, Err(KeystoreError::NotFound { kind: "secret", .. })));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_find_dot_segment_searches_by_name_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "versions": {"values": [{"id": "v1", "status": "CURRENT"}]}
        })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/secrets"))
        .and(query_param("name", ".."))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secrets": [],
            "total": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let system = connect(&server).await;
    assert!(system.proxy.find_secret("..").await.unwrap().is_none());
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_non_entity_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secrets/s-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "versions": {"values": []}
        })))
        .mount(&server)
        .await;

    let system = connect(&server).await;
    let result = system.proxy.get_secret("s-1").await;
    assert!(matches!(
        result,
        Err(KeystoreError::Communication(SessionError::InvalidResponse(_)))
    ));
    system.shutdown().await.unwrap();
}
