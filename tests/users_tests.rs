//! Integration tests for the users service against a local HTTP server.

use integrations_citbbs::{
    CitbbsClient, CitbbsErrorKind, CreateUserRequest, DeleteUserRequest, GetUserRequest,
    ListOption, ListUsersRequest, User, UserState, UsersService,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> CitbbsClient {
    CitbbsClient::builder()
        .base_url(server.uri())
        .access_token("test-token")
        .user_agent("citbbs-tests/1.0")
        .build()
        .expect("client builds")
}

#[tokio::test]
async fn test_create_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/alice"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("content-type", "application/json"))
        .and(header("user-agent", "citbbs-tests/1.0"))
        .and(header_exists("x-request-id"))
        .and(body_json(&json!({"name": "alice"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "alice",
            "state": "pending",
            "created_at": "2024-05-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = client
        .users()
        .create(&CreateUserRequest::new("alice"))
        .await
        .unwrap();

    assert_eq!(user.name, "alice");
    assert_eq!(user.state, Some(UserState::Pending));
    assert!(user.created_at.is_some());
}

#[tokio::test]
async fn test_get_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "alice"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = client
        .users()
        .get(&GetUserRequest::new("alice"))
        .await
        .unwrap();

    assert_eq!(user, User::new("alice"));
}

#[tokio::test]
async fn test_list_users_default_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/organizations/acme/users"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"name": "carol"}, {"name": "alice"}, {"name": "bob"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let users = client
        .users()
        .list(&ListUsersRequest::new("acme"), vec![])
        .await
        .unwrap();

    let names: Vec<_> = users.into_iter().map(|u| u.name).collect();
    assert_eq!(names, vec!["carol", "alice", "bob"]);
}

#[tokio::test]
async fn test_list_users_with_options() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/organizations/acme/users"))
        .and(query_param("per_page", "10"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let users = client
        .users()
        .list(
            &ListUsersRequest::new("acme"),
            vec![ListOption::PerPage(50), ListOption::Page(3), ListOption::PerPage(10)],
        )
        .await
        .unwrap();

    assert!(users.is_empty());
}

#[tokio::test]
async fn test_delete_user() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "bob"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let deleted = client
        .users()
        .delete(&DeleteUserRequest::new("acme", "bob"))
        .await
        .unwrap();

    assert_eq!(deleted.map(|d| d.user).as_deref(), Some("bob"));
}

#[tokio::test]
async fn test_delete_user_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/bob"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let deleted = client
        .users()
        .delete(&DeleteUserRequest::new("acme", "bob"))
        .await
        .unwrap();

    assert!(deleted.is_none());
}

#[tokio::test]
async fn test_not_found_maps_to_typed_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("x-request-id", "srv-42")
                .set_body_json(json!({"code": "not_found", "message": "Not Found"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .users()
        .get(&GetUserRequest::new("ghost"))
        .await
        .unwrap_err();

    assert_eq!(*err.kind(), CitbbsErrorKind::NotFound);
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.code(), Some("not_found"));
    assert_eq!(err.request_id(), Some("srv-42"));
    assert!(err.context().is_empty());
}

#[tokio::test]
async fn test_server_error_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .users()
        .delete(&DeleteUserRequest::new("acme", "bob"))
        .await
        .unwrap_err();

    assert_eq!(*err.kind(), CitbbsErrorKind::ServiceUnavailable);
    assert!(err.is_retryable());
    assert_eq!(client.metrics().snapshot().requests_failed, 1);
}

#[tokio::test]
async fn test_malformed_body_surfaces_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .users()
        .get(&GetUserRequest::new("alice"))
        .await
        .unwrap_err();

    assert_eq!(*err.kind(), CitbbsErrorKind::DeserializationError);
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"name": "slow"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = CitbbsClient::builder()
        .base_url(server.uri())
        .access_token("test-token")
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = client
        .users()
        .get(&GetUserRequest::new("slow"))
        .await
        .unwrap_err();

    assert_eq!(*err.kind(), CitbbsErrorKind::Timeout);
}

#[tokio::test]
async fn test_shared_client_concurrent_calls() {
    let server = MockServer::start().await;
    for name in ["a", "b", "c", "d"] {
        Mock::given(method("GET"))
            .and(path(format!("/users/{}", name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": name})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = Arc::new(client_for(&server));
    let handles: Vec<_> = ["a", "b", "c", "d"]
        .into_iter()
        .map(|name| {
            let client = client.clone();
            tokio::spawn(async move { client.users().get(&GetUserRequest::new(name)).await })
        })
        .collect();

    for (handle, expected) in handles.into_iter().zip(["a", "b", "c", "d"]) {
        let user = handle.await.unwrap().unwrap();
        assert_eq!(user.name, expected);
    }
    assert_eq!(client.metrics().snapshot().requests_success, 4);
}
