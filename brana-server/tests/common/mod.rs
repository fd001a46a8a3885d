//! In-process test harness: full router over an in-memory database

#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use brana_server::{Config, ServerState, build_router};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    router: Router,
    state: ServerState,
    images_dir: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_tests(dir.path().to_string_lossy());
        let state = ServerState::initialize(&config).await.unwrap();
        Self {
            router: build_router(state.clone()),
            state,
            images_dir: config.images_dir(),
            _dir: dir,
        }
    }

    pub fn state(&self) -> &ServerState {
        &self.state
    }

    pub fn images_dir(&self) -> &PathBuf {
        &self.images_dir
    }

    /// Sign a token for a user as returned by the API (stored role and permissions)
    pub fn token_for(&self, user: &Value) -> String {
        let role = serde_json::from_value(user["role"].clone()).unwrap();
        let permissions: Vec<String> = serde_json::from_value(user["permissions"].clone()).unwrap();
        self.state
            .get_jwt_service()
            .generate_token(
                user["id"].as_str().unwrap(),
                user["email"].as_str().unwrap(),
                user["name"].as_str().unwrap(),
                role,
                &permissions,
            )
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, token, Some(body)).await
    }

    /// First signup becomes the active super admin
    pub async fn admin_token(&self) -> String {
        let (status, body) = self
            .post(
                "/api/admin/auth/signup",
                None,
                json!({"name": "Ada", "email": "ada@brana.kids", "password": "password123"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "signup failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_product(&self, token: &str, body: Value) -> Value {
        let (status, product) = self.post("/api/products", Some(token), body).await;
        assert_eq!(status, StatusCode::OK, "create product failed: {product}");
        product
    }
}
