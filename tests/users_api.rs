use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

mod common;
use common::TestApp;

fn registration(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "password": "hunter22",
        "full_name": "Ada Lovelace"
    })
}

async fn register(app: &TestApp, body: Value) -> common::TestResponse {
    app.send(Method::POST, "/api/users?action=register", Some(body), None)
        .await
}

#[tokio::test]
async fn register_then_login_then_read_own_profile() {
    let app = TestApp::new();

    let registered = register(&app, registration("ada", "ada@example.com")).await;
    assert_eq!(registered.status, StatusCode::OK);
    assert_eq!(registered.body["success"], true);
    let user_id = registered.body["user_id"].as_i64().expect("user_id");

    let login = app
        .send(
            Method::POST,
            "/api/users?action=login",
            Some(json!({ "username": "ada", "password": "hunter22" })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["user_id"], user_id);
    assert_eq!(login.body["username"], "ada");
    assert_eq!(login.body["is_admin"], false);
    let cookie = login.cookie.expect("session cookie");
    assert!(cookie.starts_with("storefront_session="));

    let me = app
        .send(Method::GET, "/api/users?action=get_user", None, Some(&cookie))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    let data = &me.body["data"];
    assert_eq!(data["id"], user_id);
    assert_eq!(data["email"], "ada@example.com");
    assert_eq!(data["full_name"], "Ada Lovelace");
    assert!(data.get("password").is_none());
    assert!(data.get("password_hash").is_none());
}

#[tokio::test]
async fn registration_never_grants_admin() {
    let app = TestApp::new();
    let mut body = registration("mallory", "m@example.com");
    body["is_admin"] = json!(true);
    let registered = register(&app, body).await;
    let id = registered.body["user_id"].as_i64().unwrap();

    let user = app.state.users.find_user(id).await.unwrap().unwrap();
    assert!(!user.is_admin);
}

#[tokio::test]
async fn duplicate_username_or_email_conflicts() {
    let app = TestApp::new();
    assert_eq!(
        register(&app, registration("ada", "ada@example.com")).await.status,
        StatusCode::OK
    );

    let same_name = register(&app, registration("ada", "other@example.com")).await;
    assert_eq!(same_name.status, StatusCode::CONFLICT);
    assert_eq!(same_name.body["message"], "Username or email already exists");

    let same_email = register(&app, registration("grace", "ada@example.com")).await;
    assert_eq!(same_email.status, StatusCode::CONFLICT);

    assert_eq!(app.state.users.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn registration_requires_username_email_and_password() {
    let app = TestApp::new();
    let resp = register(&app, json!({ "username": "ada", "password": "x" })).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["message"], "All fields are required");

    let garbage = app
        .send(Method::POST, "/api/users?action=register", None, None)
        .await;
    assert_eq!(garbage.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_password_and_unknown_user_look_the_same() {
    let app = TestApp::new();
    app.create_user("ada", "right-password", false).await;

    let wrong_password = app
        .send(
            Method::POST,
            "/api/users?action=login",
            Some(json!({ "username": "ada", "password": "wrong" })),
            None,
        )
        .await;
    let unknown_user = app
        .send(
            Method::POST,
            "/api/users?action=login",
            Some(json!({ "username": "nobody", "password": "wrong" })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, wrong_password.status);
    assert_eq!(unknown_user.body, wrong_password.body);
    assert_eq!(wrong_password.body["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_requires_both_fields() {
    let app = TestApp::new();
    let resp = app
        .send(
            Method::POST,
            "/api/users?action=login",
            Some(json!({ "username": "ada" })),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_requires_a_session() {
    let app = TestApp::new();
    let resp = app
        .send(Method::GET, "/api/users?action=get_user", None, None)
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["message"], "Not authenticated");
}

#[tokio::test]
async fn only_admins_list_users() {
    let app = TestApp::new();
    app.create_user("shopper", "secret1", false).await;
    let shopper = app.login("shopper", "secret1").await;

    let denied = app
        .send(Method::GET, "/api/users?action=get_all", None, Some(&shopper))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let anonymous = app
        .send(Method::GET, "/api/users?action=get_all", None, None)
        .await;
    assert_eq!(anonymous.status, StatusCode::FORBIDDEN);

    let admin = app.admin_cookie().await;
    let listed = app
        .send(Method::GET, "/api/users?action=get_all", None, Some(&admin))
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let users = listed.body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password").is_none()));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new();
    app.create_user("ada", "hunter22", false).await;
    let cookie = app.login("ada", "hunter22").await;

    let out = app
        .send(Method::GET, "/api/users?action=logout", None, Some(&cookie))
        .await;
    assert_eq!(out.status, StatusCode::OK);
    assert_eq!(out.body["message"], "Logged out successfully");

    let after = app
        .send(Method::GET, "/api/users?action=get_user", None, Some(&cookie))
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_a_session_still_succeeds() {
    let app = TestApp::new();
    let out = app
        .send(Method::POST, "/api/users?action=logout", None, None)
        .await;
    assert_eq!(out.status, StatusCode::OK);
}

#[tokio::test]
async fn register_over_get_is_not_allowed() {
    let app = TestApp::new();
    let resp = app
        .send(
            Method::GET,
            "/api/users?action=register",
            Some(registration("ada", "ada@example.com")),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(app.state.users.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_user_action_is_rejected() {
    let app = TestApp::new();
    let resp = app
        .send(Method::GET, "/api/users?action=delete_all", None, None)
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["message"], "Invalid action");
}
