//! Integration tests for the kenteken API router.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use kenteken_api::{
    api::{create_router, AppState},
    store::connect_options,
    Config, DuplicateStrategy, MemoryStore, MySqlStore, RegistrationStore, StoreError,
};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Store that is never reachable.
struct UnavailableStore;

#[async_trait]
impl RegistrationStore for UnavailableStore {
    async fn insert(&self, _kenteken: &str) -> Result<(), StoreError> {
        Err(StoreError::StoreUnavailable("connection refused".into()))
    }
}

/// Store that counts how often it was called.
#[derive(Default)]
struct CountingStore {
    calls: AtomicUsize,
}

#[async_trait]
impl RegistrationStore for CountingStore {
    async fn insert(&self, _kenteken: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn create_test_app(store: Arc<dyn RegistrationStore>) -> Router {
    create_router(AppState::new(store))
}

fn post_kenteken(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/storeKenteken")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn test_store_new_kenteken() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(store.clone());

    let response = app
        .oneshot(post_kenteken(r#"{"Kenteken":"AB-123-C"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_text(response).await.is_empty());
    assert_eq!(store.count("AB-123-C").await, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_store_duplicate_kenteken() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(store.clone());

    let response = app
        .clone()
        .oneshot(post_kenteken(r#"{"Kenteken":"AB-123-C"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_kenteken(r#"{"Kenteken":"AB-123-C"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_text(response).await, "Kenteken already in database\n");
    assert_eq!(store.count("AB-123-C").await, 1);
}

#[tokio::test]
async fn test_kenteken_match_is_case_sensitive() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(store.clone());

    for kenteken in ["AB-123-C", "ab-123-c"] {
        let response = app
            .clone()
            .oneshot(post_kenteken(format!(r#"{{"Kenteken":"{}"}}"#, kenteken)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn test_malformed_json() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(store.clone());

    let response = app.oneshot(post_kenteken("AB-123-C")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Error Unmarshalling JSON\n");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_array_body_rejected() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(store.clone());

    for body in [r#"["AB-123-C"]"#, "[]"] {
        let response = app.clone().oneshot(post_kenteken(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Error Unmarshalling JSON\n");
    }

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_field_name_matched_ignoring_case() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(store.clone());

    let response = app
        .oneshot(post_kenteken(r#"{"kENTEKEN":"AB-123-C"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(store.count("AB-123-C").await, 1);
    assert_eq!(store.count("").await, 0);
}

#[tokio::test]
async fn test_null_kenteken_stored_as_empty() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(store.clone());

    let response = app
        .oneshot(post_kenteken(r#"{"Kenteken":null}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(store.count("").await, 1);
}

#[tokio::test]
async fn test_wrong_field_type() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(store.clone());

    let response = app
        .oneshot(post_kenteken(r#"{"Kenteken":123}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_body_over_limit() {
    let store = Arc::new(MemoryStore::new());
    let app = create_router(AppState::new(store.clone()).with_max_body_bytes(16));

    let response = app
        .oneshot(post_kenteken(r#"{"Kenteken":"AB-123-C-AND-MUCH-MORE"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Error reading request body\n");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_get_not_allowed() {
    let store = Arc::new(CountingStore::default());
    let app = create_test_app(store.clone());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/storeKenteken")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_text(response).await, "Invalid request method\n");
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_other_methods_not_allowed() {
    let store = Arc::new(CountingStore::default());
    let app = create_test_app(store.clone());

    for method in ["PUT", "DELETE", "PATCH"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/storeKenteken")
                    .body(Body::from(r#"{"Kenteken":"AB-123-C"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app(Arc::new(MemoryStore::new()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_unavailable() {
    let app = create_test_app(Arc::new(UnavailableStore));

    let response = app
        .oneshot(post_kenteken(r#"{"Kenteken":"AB-123-C"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "Error inserting Kenteken into database\n"
    );
}

#[tokio::test]
async fn test_unreachable_mysql() {
    let config = Config::from_json(
        r#"{
            "MYSQL_HOST": "127.0.0.1",
            "MYSQL_USER": "kenteken",
            "MYSQL_PASSWORD": "secret",
            "MYSQL_DATABASE": "rdw",
            "MYSQL_PORT": "1"
        }"#,
    )
    .unwrap();
    let pool = MySqlPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy_with(connect_options(&config).unwrap());
    let store = MySqlStore::new(pool, DuplicateStrategy::UniqueConstraint);
    let app = create_test_app(Arc::new(store));

    let response = app
        .oneshot(post_kenteken(r#"{"Kenteken":"AB-123-C"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
