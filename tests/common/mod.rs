#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use storefront_api::{
    config::{AppConfig, StoreBackend},
    middleware::session::create_session_layer,
    models::NewUser,
    routes::build_app,
    services::user_service::hash_password,
    state::AppState,
};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub cookie: Option<String>,
    pub headers: axum::http::HeaderMap,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: None,
        store_backend: StoreBackend::Memory,
        host: "127.0.0.1".into(),
        port: 0,
        session_secure: false,
        session_expiry_secs: 3600,
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_state(AppState::in_memory())
    }

    pub fn with_state(state: AppState) -> Self {
        let sessions = create_session_layer(MemoryStore::default(), &test_config());
        let router = build_app(state.clone(), sessions);
        Self { router, state }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let cookie = headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };

        TestResponse {
            status,
            body,
            cookie,
            headers,
        }
    }

    /// Insert an account directly, bypassing registration (which never grants admin).
    pub async fn create_user(&self, username: &str, password: &str, is_admin: bool) -> i64 {
        self.state
            .users
            .insert_user(&NewUser {
                username: username.into(),
                email: format!("{username}@example.com"),
                password_hash: hash_password(password).expect("hash"),
                full_name: username.into(),
                is_admin,
            })
            .await
            .expect("insert user")
    }

    /// Log in through the API and return the session cookie.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let resp = self
            .send(
                Method::POST,
                "/api/users?action=login",
                Some(serde_json::json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "login failed: {}", resp.body);
        resp.cookie.expect("session cookie")
    }

    pub async fn admin_cookie(&self) -> String {
        self.create_user("admin", "admin123", true).await;
        self.login("admin", "admin123").await
    }
}
