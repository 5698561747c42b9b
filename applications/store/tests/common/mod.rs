//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use segue_store::{create_router, AppState};
use segue_vault::AesGcmTokenCipher;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Router backed by a fresh file database, plus what tests need to inspect it
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub cipher: AesGcmTokenCipher,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("store.db").display());

        let pool = segue_storage::create_pool(&db_url).await.unwrap();
        segue_storage::run_migrations(&pool).await.unwrap();

        let cipher = AesGcmTokenCipher::from_base64_key(&segue_vault::generate_key()).unwrap();
        let router = create_router(AppState::new(pool.clone(), Arc::new(cipher.clone())));

        Self {
            router,
            pool,
            cipher,
            _temp_dir: temp_dir,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None).await
    }

    /// Register a user through the API
    pub async fn create_user(&self, user_id: &str, token: &str) {
        let (status, _) = self
            .post(
                "/api/v1/users/token",
                serde_json::json!({ "user_id": user_id, "access_token": token }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}
