#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use atc_api::auth::jwt::{generate_access_token, JwtConfig};
use atc_api::config::{AuthConfig, ServerConfig};
use atc_api::router::build_app_router;
use atc_api::state::AppState;
use atc_core::commands::{CommandFields, Scope};
use atc_db::models::command::{CommandRow, CreateCommand};
use atc_db::CommandStore;
use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-long-enough";
pub const TEST_API_KEY: &str = "integration-test-api-key";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults and the given auth mode.
pub fn test_config(auth: AuthConfig) -> ServerConfig {
    ServerConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        auth,
    }
}

/// Build the full application router (JWT mode) over `store`.
pub fn build_test_app(store: Arc<dyn CommandStore>) -> Router {
    build_app_with_auth(store, AuthConfig::Jwt(jwt_config()))
}

/// Build the full application router (API-key mode) over `store`.
pub fn build_api_key_app(store: Arc<dyn CommandStore>) -> Router {
    build_app_with_auth(store, AuthConfig::api_key(TEST_API_KEY))
}

pub fn build_app_with_auth(store: Arc<dyn CommandStore>, auth: AuthConfig) -> Router {
    build_app_router(AppState {
        store,
        config: Arc::new(test_config(auth)),
    })
}

/// `Authorization` header value carrying a freshly minted token.
pub fn bearer() -> String {
    let token = generate_access_token("integration-tester", &jwt_config())
        .expect("token generation should succeed");
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Request helpers (JWT-authenticated)
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let auth = bearer();
    send(app, Method::GET, uri, &[("authorization", auth.as_str())], None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let auth = bearer();
    send(app, Method::POST, uri, &[("authorization", auth.as_str())], Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let auth = bearer();
    send(app, Method::PUT, uri, &[("authorization", auth.as_str())], Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let auth = bearer();
    send(app, Method::DELETE, uri, &[("authorization", auth.as_str())], None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("response body should be JSON")
}

// ---------------------------------------------------------------------------
// Store doubles
// ---------------------------------------------------------------------------

/// A store whose every call fails like a dropped database connection.
pub struct FailingStore;

#[async_trait]
impl CommandStore for FailingStore {
    async fn list_by_scope(&self, _scope: &Scope) -> Result<Vec<CommandRow>, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn find_scoped(&self, _id: &str, _scope: &Scope) -> Result<Option<CommandRow>, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn create(&self, _input: &CreateCommand) -> Result<CommandRow, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn update(
        &self,
        _id: &str,
        _scope: &Scope,
        _fields: &CommandFields,
    ) -> Result<bool, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn delete(&self, _id: &str, _scope: &Scope) -> Result<bool, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }
}
