use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

/// A registered and logged-in test user
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

/// Register a user and log in; returns id and bearer token.
pub async fn register_and_login(server: &TestServer, username: &str) -> TestUser {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let user: Value = response.json();
    let id = Uuid::parse_str(user["id"].as_str().expect("user id")).expect("uuid");

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "username": username,
            "password": "password123",
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let token = body["access_token"].as_str().expect("token").to_string();

    TestUser {
        id,
        username: username.to_string(),
        token,
    }
}

/// Promote a user to admin directly in the database
pub async fn make_admin(pool: &sqlx::SqlitePool, user_id: Uuid) {
    sqlx::query("UPDATE users SET role = 'admin' WHERE id = ?")
        .bind(user_id.to_string())
        .execute(pool)
        .await
        .expect("Failed to promote user");
}
