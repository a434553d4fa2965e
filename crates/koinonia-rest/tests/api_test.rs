//! End-to-end tests of the HTTP surface over the in-memory store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use koinonia_config::{SecurityConfig, ServerConfig};
use koinonia_repository::MemoryStore;
use koinonia_rest::{create_router, AppState};
use koinonia_security::PasswordHasher;
use koinonia_service::{
    AuthServiceImpl, CommentServiceImpl, InteractionServiceImpl, PostServiceImpl, UserServiceImpl,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const UNKNOWN_ID: &str = "00000000-0000-4000-8000-000000000001";

fn app_with(store: Arc<MemoryStore>) -> Router {
    let state = AppState {
        post_service: Arc::new(PostServiceImpl::new(
            store.clone(),
            store.clone(),
            store.clone(),
        )),
        comment_service: Arc::new(CommentServiceImpl::new(
            store.clone(),
            store.clone(),
            store.clone(),
        )),
        interaction_service: Arc::new(InteractionServiceImpl::new(store.clone())),
        auth_service: Arc::new(AuthServiceImpl::new(
            store.clone(),
            Arc::new(PasswordHasher::with_cost(1)),
            Arc::new(SecurityConfig::default()),
        )),
        user_service: Arc::new(UserServiceImpl::new(store.clone(), store.clone())),
        store,
    };
    create_router(state, &ServerConfig::default())
}

fn app() -> Router {
    app_with(Arc::new(MemoryStore::new()))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "stephanas-household",
            "name": "Member"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let content = &body["content"];
    (
        content["accessToken"].as_str().unwrap().to_string(),
        content["user"]["id"].as_str().unwrap().to_string(),
    )
}

async fn publish(app: &Router, token: &str, is_public: bool) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/posts",
        Some(token),
        Some(json!({ "content": "Be watchful, stand firm", "isPublic": is_public })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["content"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, "GET", "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    let (status, _) = send(&app, "GET", "/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_ready_reports_unavailable_store() {
    let store = Arc::new(MemoryStore::new());
    store.set_available(false);
    let app = app_with(store);

    let (status, body) = send(&app, "GET", "/ready", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
async fn test_protected_route_without_token_is_unauthorized() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/posts",
        None,
        Some(json!({ "content": "Hello" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Unauthorized", "error": "USER_NOT_AUTHENTICATED" })
    );

    let (status, _) = send(&app, "POST", "/api/v1/auth/logout", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_like_twice_over_http() {
    let app = app();
    let (token, user_id) = register(&app, "stephanas@example.com").await;
    let post_id = publish(&app, &token, true).await;

    let like = json!({ "postId": post_id, "action": "like" });
    let (status, body) = send(&app, "POST", "/api/v1/posts/like", Some(&token), Some(like.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "content": { "action": "like", "postId": post_id, "userId": user_id }
        })
    );

    let (status, body) = send(&app, "POST", "/api/v1/posts/like", Some(&token), Some(like)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "ALREADY_LIKED");
    assert_eq!(body["message"], "Post already liked");
}

#[tokio::test]
async fn test_private_post_is_hidden_from_others() {
    let app = app();
    let (owner, _) = register(&app, "chloe@example.com").await;
    let (other, _) = register(&app, "fortunatus@example.com").await;
    let post_id = publish(&app, &owner, false).await;

    let uri = format!("/api/v1/posts/{post_id}");
    let (status, _) = send(&app, "GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "ACCESS_DENIED");

    let (status, body) = send(&app, "GET", "/api/v1/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["posts"], json!([]));
    assert_eq!(body["content"]["pagination"]["limit"], 20);
}

#[tokio::test]
async fn test_delete_post_over_http() {
    let app = app();
    let (owner, _) = register(&app, "achaicus@example.com").await;
    let (other, _) = register(&app, "sosthenes@example.com").await;
    let post_id = publish(&app, &owner, true).await;
    let uri = format!("/api/v1/posts/{post_id}");

    let (status, body) = send(&app, "DELETE", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, body) = send(&app, "DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["message"], "Post deleted successfully");

    let (status, body) = send(&app, "DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "POST_NOT_FOUND");
}

#[tokio::test]
async fn test_comment_thread_over_http() {
    let app = app();
    let (token, _) = register(&app, "gaius@example.com").await;
    let post_id = publish(&app, &token, true).await;
    let uri = format!("/api/v1/posts/{post_id}/comments");

    let (status, body) = send(&app, "POST", &uri, Some(&token), Some(json!({ "content": "Grace" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let parent = body["content"]["id"].clone();

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(json!({ "content": "Peace", "parentId": parent })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let comments = body["content"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["replies"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_input_is_validation_error() {
    let app = app();
    let (token, _) = register(&app, "erastus@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/posts")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = send(&app, "GET", "/api/v1/posts/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = send(&app, "GET", "/api/v1/posts?limit=500", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_me_and_profile_update() {
    let app = app();
    let (token, user_id) = register(&app, "quartus@example.com").await;

    let (status, body) = send(&app, "GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["id"], user_id.as_str());
    assert_eq!(body["content"]["postCount"], 0);
    assert!(body["content"].get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/users/me",
        Some(&token),
        Some(json!({ "bio": "A brother" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["bio"], "A brother");

    let (status, body) = send(&app, "GET", &format!("/api/v1/users/{user_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["bio"], "A brother");
}

#[tokio::test]
async fn test_record_interaction_over_http() {
    let app = app();
    let (token, _) = register(&app, "tertius@example.com").await;
    let post_id = publish(&app, &token, true).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/interactions",
        Some(&token),
        Some(json!({ "postId": post_id, "type": "share" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["content"]["interactionType"], "share");

    let (_, feed) = send(&app, "GET", "/api/v1/posts", Some(&token), None).await;
    assert_eq!(feed["content"]["posts"][0]["stats"]["shares"], 1);
}

#[tokio::test]
async fn test_comments_on_private_post_require_owner() {
    let app = app();
    let (owner, _) = register(&app, "nympha@example.com").await;
    let (other, _) = register(&app, "archippus@example.com").await;
    let post_id = publish(&app, &owner, false).await;
    let uri = format!("/api/v1/posts/{post_id}/comments");

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(&owner),
        Some(json!({ "content": "secret note" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment_uri = format!("/api/v1/comments/{}", body["content"]["id"].as_str().unwrap());

    for token in [None, Some(other.as_str())] {
        let (status, body) = send(&app, "GET", &uri, token, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "ACCESS_DENIED");

        let (status, body) = send(&app, "GET", &comment_uri, token, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.get("content").is_none());
    }

    let (status, body) = send(&app, "GET", &comment_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["content"], "secret note");

    let missing = format!("/api/v1/posts/{UNKNOWN_ID}/comments");
    let (status, body) = send(&app, "GET", &missing, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "POST_NOT_FOUND");
}

#[tokio::test]
async fn test_user_directory_and_feed_filters() {
    let app = app();
    let (token, member_id) = register(&app, "stephanas@example.com").await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "email": "lydia@example.com",
            "password": "seller-of-purple",
            "name": "Lydia of Thyatira"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let lydia = body["content"]["accessToken"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "GET", "/api/v1/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/api/v1/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["users"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/api/v1/users?search=thyat", Some(&token), None).await;
    let users = body["content"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "Lydia of Thyatira");

    publish(&app, &token, true).await;
    publish(&app, &lydia, true).await;
    let uri = format!("/api/v1/posts?authorId={member_id}");
    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let posts = body["content"]["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["authorId"], member_id.as_str());

    let long = "x".repeat(101);
    let (status, body) = send(&app, "GET", &format!("/api/v1/posts?search={long}"), None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}
