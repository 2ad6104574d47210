//! API client and profile adapter behavior against a live mock server.

mod common;

use common::test_user;
use hearth_client::infrastructure::api_client::ApiClient;
use hearth_client::infrastructure::services::profile::{ProfileApiAdapter, ProfileService};
use hearth_model::PendingEdits;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn update_profile_posts_touched_fields_and_parses_the_user() {
    let mut server = mockito::Server::new_async().await;
    let user = test_user("bob");

    let mock = server
        .mock("POST", format!("/user/update/{}", user.id).as_str())
        .match_body(mockito::Matcher::Json(
            serde_json::json!({ "username": "bobby" }),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(&user).unwrap())
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(server.url()));
    let adapter = ProfileApiAdapter::new(client);

    let mut edits = PendingEdits::default();
    edits.username = Some("bobby".to_string());

    let returned = adapter.update_profile(user.id, &edits).await.unwrap();
    assert_eq!(returned, user);
    mock.assert_async().await;
}

#[tokio::test]
async fn structured_rejection_surfaces_the_backend_message() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();

    server
        .mock("POST", format!("/user/update/{user_id}").as_str())
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":false,"message":"Email in use"}"#)
        .create_async()
        .await;

    let adapter = ProfileApiAdapter::new(Arc::new(ApiClient::new(server.url())));
    let err = adapter
        .update_profile(user_id, &PendingEdits::default())
        .await
        .unwrap_err();

    assert!(err.is_rejected());
    assert_eq!(err.surface_message(), "Email in use");
}

#[tokio::test]
async fn non_json_failure_surfaces_a_transport_message() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();

    server
        .mock("DELETE", format!("/user/delete/{user_id}").as_str())
        .with_status(502)
        .with_body("<html>bad gateway</html>")
        .create_async()
        .await;

    let adapter = ProfileApiAdapter::new(Arc::new(ApiClient::new(server.url())));
    let err = adapter.delete_account(user_id).await.unwrap_err();

    assert!(!err.is_rejected());
    assert_eq!(
        err.surface_message(),
        "Request failed with status 502 Bad Gateway"
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    // Nothing listens on port 1.
    let adapter = ProfileApiAdapter::new(Arc::new(ApiClient::new(
        "http://127.0.0.1:1".to_string(),
    )));
    let err = adapter.sign_out().await.unwrap_err();
    assert!(!err.is_rejected());
    assert!(!err.surface_message().is_empty());
}

#[tokio::test]
async fn bearer_token_is_attached_when_set() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();

    let mock = server
        .mock("DELETE", format!("/user/delete/{user_id}").as_str())
        .match_header("authorization", "Bearer session-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(server.url()));
    client.set_token(Some("session-token".to_string())).await;

    let adapter = ProfileApiAdapter::new(client);
    adapter.delete_account(user_id).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn sign_out_success_drops_the_local_token() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/auth/signout")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"message":"signed out"}"#)
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(server.url()));
    client.set_token(Some("session-token".to_string())).await;

    let adapter = ProfileApiAdapter::new(client.clone());
    adapter.sign_out().await.unwrap();

    assert_eq!(client.get_token().await, None);
}

#[tokio::test]
async fn delete_succeeds_when_the_response_body_is_not_json() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();

    let mock = server
        .mock("DELETE", format!("/user/delete/{user_id}").as_str())
        .with_status(200)
        .with_body("deleted")
        .create_async()
        .await;

    let adapter = ProfileApiAdapter::new(Arc::new(ApiClient::new(server.url())));
    adapter.delete_account(user_id).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn sign_out_succeeds_on_an_empty_response_body() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/auth/signout")
        .with_status(204)
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(server.url()));
    client.set_token(Some("session-token".to_string())).await;

    let adapter = ProfileApiAdapter::new(client.clone());
    adapter.sign_out().await.unwrap();

    assert_eq!(client.get_token().await, None);
}

#[tokio::test]
async fn sign_out_failure_keeps_the_local_token() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/auth/signout")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(server.url()));
    client.set_token(Some("session-token".to_string())).await;

    let adapter = ProfileApiAdapter::new(client.clone());
    adapter.sign_out().await.unwrap_err();

    assert_eq!(
        client.get_token().await,
        Some("session-token".to_string())
    );
}
