//! Shared helpers for the API integration tests.

#![allow(dead_code)]

use axum_test::TestServer;
use chanboard::auth::hash_password;
use chanboard::board::{Board, BoardRepository, NewBoard, NewPost, Post, PostRepository};
use chanboard::db::{NewUser, Role, User, UserRepository};
use chanboard::web::{create_router, AppState};
use chanboard::{Config, Database};
use serde_json::{json, Value};
use std::sync::Arc;

/// Password given to every staff account created by the helpers.
pub const PASSWORD: &str = "password123";

/// Header carrying the client address in tests.
pub const FORWARDED_FOR: &str = "X-Forwarded-For";

/// Configuration for tests: no cooldown, generous rate limits, small pages.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.api_rate_limit = 10_000;
    config.server.login_rate_limit = 1_000;
    config.posting.cooldown_secs = 0;
    config.posting.threads_per_page = 2;
    config.posting.preview_replies = 1;
    config
}

/// A test server with direct access to its database.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
}

/// Start a server with the default test configuration.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

/// Start a server with a custom configuration.
pub async fn spawn_app_with(config: Config) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let state = Arc::new(AppState::new(db.clone(), config));
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");
    TestApp { server, db }
}

/// Create a board directly in the database.
pub async fn create_board(db: &Database, short_id: &str, name: &str) -> Board {
    BoardRepository::new(db.pool())
        .create(&NewBoard::new(short_id, name))
        .await
        .expect("Failed to create test board")
}

/// Create a thread directly in the database.
pub async fn create_thread(db: &Database, board: &Board, message: &str, ip: &str) -> Post {
    PostRepository::new(db.pool())
        .create(&NewPost::thread(board.id, "Anonymous", message, ip))
        .await
        .expect("Failed to create test thread")
}

/// Create a staff account with [`PASSWORD`].
pub async fn create_staff(db: &Database, username: &str, role: Role) -> User {
    let hash = hash_password(PASSWORD).expect("Failed to hash password");
    UserRepository::new(db.pool())
        .create(&NewUser::new(username, hash).with_role(role))
        .await
        .expect("Failed to create staff account")
}

/// Log in and return the session token.
pub async fn login(server: &TestServer, username: &str) -> String {
    let response = server
        .post("/api/admin/login")
        .json(&json!({ "username": username, "password": PASSWORD }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["data"]["token"]
        .as_str()
        .expect("login response without token")
        .to_string()
}

/// Create a staff account and log it in.
pub async fn staff_token(app: &TestApp, username: &str, role: Role) -> String {
    create_staff(&app.db, username, role).await;
    login(&app.server, username).await
}

/// Authorization header value for a token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
