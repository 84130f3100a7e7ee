//! Web API Admin Tests
//!
//! Integration tests for staff sessions and the admin panel endpoints.

mod common;

use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::StatusCode;
use chanboard::db::Role;
use common::{
    bearer, create_board, create_staff, create_thread, login, spawn_app, staff_token, PASSWORD,
};
use serde_json::{json, Value};

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_admin_requires_session() {
    let app = spawn_app().await;

    let response = app.server.get("/api/admin/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"]["code"], "UNAUTHORIZED");

    app.server
        .get("/api/admin/boards")
        .add_header(AUTHORIZATION, bearer("not-a-session"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_me_logout() {
    let app = spawn_app().await;
    create_staff(&app.db, "alice", Role::Admin).await;

    let response = app
        .server
        .post("/api/admin/login")
        .json(&json!({ "username": "alice", "password": PASSWORD }))
        .await;
    response.assert_status_ok();
    let cookie = response.header(SET_COOKIE);
    assert!(cookie.to_str().unwrap().starts_with("chan_session="));
    assert!(cookie.to_str().unwrap().contains("HttpOnly"));

    let body = response.json::<Value>();
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert_eq!(body["data"]["user"]["role"], "admin");
    assert!(body["data"]["user"].get("password").is_none());

    let response = app
        .server
        .get("/api/admin/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["username"], "alice");

    app.server
        .post("/api/admin/logout")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    app.server
        .get("/api/admin/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_cookie_authenticates() {
    let app = spawn_app().await;
    create_staff(&app.db, "alice", Role::Moderator).await;
    let token = login(&app.server, "alice").await;

    let response = app
        .server
        .get("/api/admin/me")
        .add_header(COOKIE, format!("chan_session={}", token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["role"], "moderator");
}

#[tokio::test]
async fn test_login_failures() {
    let app = spawn_app().await;
    create_staff(&app.db, "alice", Role::Admin).await;

    let response = app
        .server
        .post("/api/admin/login")
        .json(&json!({ "username": "alice", "password": "wrong-password" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .post("/api/admin/login")
        .json(&json!({ "username": "nobody", "password": PASSWORD }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .post("/api/admin/login")
        .json(&json!({ "username": "  ", "password": PASSWORD }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_lockout() {
    let app = spawn_app().await;
    create_staff(&app.db, "alice", Role::Admin).await;

    for _ in 0..5 {
        app.server
            .post("/api/admin/login")
            .json(&json!({ "username": "alice", "password": "wrong-password" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    // Locked even with the right password
    let response = app
        .server
        .post("/api/admin/login")
        .json(&json!({ "username": "alice", "password": PASSWORD }))
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
}

#[tokio::test]
async fn test_inactive_account_cannot_login() {
    let app = spawn_app().await;
    let admin = staff_token(&app, "root", Role::Admin).await;
    let user = create_staff(&app.db, "bob", Role::Moderator).await;

    app.server
        .put(&format!("/api/admin/users/{}", user.id))
        .add_header(AUTHORIZATION, bearer(&admin))
        .json(&json!({ "is_active": false }))
        .await
        .assert_status_ok();

    app.server
        .post("/api/admin/login")
        .json(&json!({ "username": "bob", "password": PASSWORD }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
async fn test_moderator_forbidden_on_admin_endpoints() {
    let app = spawn_app().await;
    let board = create_board(&app.db, "g", "Technology").await;
    let token = staff_token(&app, "mod", Role::Moderator).await;

    let response = app
        .server
        .get("/api/admin/users")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"]["code"], "FORBIDDEN");

    app.server
        .delete(&format!("/api/admin/boards/{}", board.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .get("/api/admin/settings")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    // Moderation endpoints are open to moderators
    app.server
        .get("/api/admin/reports")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();
}

// ============================================================================
// Boards
// ============================================================================

#[tokio::test]
async fn test_board_management() {
    let app = spawn_app().await;
    let token = staff_token(&app, "root", Role::Admin).await;

    let response = app
        .server
        .post("/api/admin/boards")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "short_id": "v", "name": "Video Games", "description": "vidya" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let board = response.json::<Value>()["data"].clone();
    let id = board["id"].as_i64().unwrap();
    assert_eq!(board["title"], "/v/ - Video Games");

    // Duplicate short ID
    app.server
        .post("/api/admin/boards")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "short_id": "v", "name": "Other" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    // Short IDs are lowercase alphanumerics
    app.server
        .post("/api/admin/boards")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "short_id": "V!", "name": "Bad" }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .server
        .put(&format!("/api/admin/boards/{}", id))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "name": "Video Games & More", "is_active": false }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["is_active"], false);

    // Inactive boards disappear from the public API
    app.server
        .get("/api/boards/v")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let response = app
        .server
        .get("/api/admin/boards")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 1);

    app.server
        .delete(&format!("/api/admin/boards/{}", id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    app.server
        .delete(&format!("/api/admin/boards/{}", id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reorder_boards() {
    let app = spawn_app().await;
    let a = create_board(&app.db, "a", "Anime").await;
    let g = create_board(&app.db, "g", "Technology").await;
    let token = staff_token(&app, "root", Role::Admin).await;

    let response = app
        .server
        .post("/api/admin/boards/reorder")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "board_ids": [g.id, a.id] }))
        .await;
    response.assert_status_ok();

    let boards = app.server.get("/api/boards").await.json::<Value>();
    assert_eq!(boards["data"][0]["short_id"], "g");
    assert_eq!(boards["data"][1]["short_id"], "a");

    // Every board must be listed
    app.server
        .post("/api/admin/boards/reorder")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "board_ids": [g.id] }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Posts
// ============================================================================

#[tokio::test]
async fn test_soft_delete_and_restore() {
    let app = spawn_app().await;
    let board = create_board(&app.db, "g", "Technology").await;
    let op = create_thread(&app.db, &board, "rule breaker", "10.0.0.5").await;
    let token = staff_token(&app, "mod", Role::Moderator).await;

    app.server
        .delete(&format!("/api/admin/posts/{}", op.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    app.server
        .get(&format!("/api/threads/{}", op.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // Staff still see the post and its address
    let response = app
        .server
        .get(&format!("/api/admin/posts/{}", op.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let post = response.json::<Value>()["data"].clone();
    assert_eq!(post["is_deleted"], true);
    assert_eq!(post["ip_address"], "10.0.0.5");

    let response = app
        .server
        .post(&format!("/api/admin/posts/{}/restore", op.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["is_deleted"], false);

    app.server
        .get(&format!("/api/threads/{}", op.id))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_hard_delete_and_bad_mode() {
    let app = spawn_app().await;
    let board = create_board(&app.db, "g", "Technology").await;
    let op = create_thread(&app.db, &board, "gone", "10.0.0.5").await;
    let token = staff_token(&app, "mod", Role::Moderator).await;

    app.server
        .delete(&format!("/api/admin/posts/{}", op.id))
        .add_query_param("mode", "shred")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .delete(&format!("/api/admin/posts/{}", op.id))
        .add_query_param("mode", "hard")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    app.server
        .get(&format!("/api/admin/posts/{}", op.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pin_and_lock() {
    let app = spawn_app().await;
    let board = create_board(&app.db, "g", "Technology").await;
    let op = create_thread(&app.db, &board, "rules", "10.0.0.5").await;
    let token = staff_token(&app, "mod", Role::Moderator).await;

    let response = app
        .server
        .post(&format!("/api/admin/posts/{}/pin", op.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["is_pinned"], true);

    let response = app
        .server
        .post(&format!("/api/admin/posts/{}/lock", op.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["is_locked"], true);

    app.server
        .post(&format!("/api/threads/{}/replies", op.id))
        .json(&json!({ "message": "locked?" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .post(&format!("/api/admin/posts/{}/unlock", op.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    let response = app
        .server
        .post(&format!("/api/threads/{}/replies", op.id))
        .json(&json!({ "message": "open again" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let reply_id = response.json::<Value>()["data"]["id"].as_i64().unwrap();

    // Replies cannot be pinned
    app.server
        .post(&format!("/api/admin/posts/{}/pin", reply_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_posts_by_ip() {
    let app = spawn_app().await;
    let board = create_board(&app.db, "g", "Technology").await;
    create_thread(&app.db, &board, "one", "10.0.0.5").await;
    create_thread(&app.db, &board, "two", "10.0.0.5").await;
    create_thread(&app.db, &board, "other", "10.0.0.6").await;
    let token = staff_token(&app, "mod", Role::Moderator).await;

    let response = app
        .server
        .get("/api/admin/posts")
        .add_query_param("ip", "10.0.0.5")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let posts = response.json::<Value>()["data"].clone();
    assert_eq!(posts.as_array().unwrap().len(), 2);
    assert_eq!(posts[0]["message"], "two");

    let response = app
        .server
        .delete("/api/admin/posts")
        .add_query_param("ip", "10.0.0.5")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["count"], 2);

    let page = app.server.get("/api/boards/g/threads").await.json::<Value>();
    assert_eq!(page["meta"]["total"], 1);
}

#[tokio::test]
async fn test_posts_by_ip_canonical_filter() {
    let app = spawn_app().await;
    create_board(&app.db, "g", "Technology").await;
    let token = staff_token(&app, "mod", Role::Moderator).await;

    app.server
        .post("/api/boards/g/threads")
        .add_header("X-Forwarded-For", "2001:DB8:0:0::7")
        .json(&json!({ "message": "from v6" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .get("/api/admin/posts")
        .add_query_param("ip", "2001:db8:0000::7")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let posts = response.json::<Value>()["data"].clone();
    assert_eq!(posts.as_array().unwrap().len(), 1);
    assert_eq!(posts[0]["ip_address"], "2001:db8::7");

    app.server
        .get("/api/admin/posts")
        .add_query_param("ip", "10.0.0.999")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Bans
// ============================================================================

#[tokio::test]
async fn test_ban_lifecycle() {
    let app = spawn_app().await;
    let board = create_board(&app.db, "g", "Technology").await;
    create_thread(&app.db, &board, "spam", "192.0.2.10").await;
    let token = staff_token(&app, "mod", Role::Moderator).await;

    let response = app
        .server
        .post("/api/admin/bans")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({
            "ip_address": "192.0.2.10",
            "reason": "spam",
            "duration_hours": 24,
            "delete_posts": true
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>()["data"].clone();
    assert_eq!(body["deleted_posts"], 1);
    assert_eq!(body["ban"]["is_permanent"], false);
    let ban_id = body["ban"]["id"].as_i64().unwrap();

    let response = app
        .server
        .post("/api/boards/g/threads")
        .add_header("X-Forwarded-For", "192.0.2.10")
        .json(&json!({ "message": "evading" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"]["code"], "BANNED");

    let response = app
        .server
        .get("/api/admin/bans")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 1);

    app.server
        .delete(&format!("/api/admin/bans/{}", ban_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    // Lifted bans only show up with ?all=true
    let response = app
        .server
        .get("/api/admin/bans")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert!(response.json::<Value>()["data"].as_array().unwrap().is_empty());

    let response = app
        .server
        .get("/api/admin/bans")
        .add_query_param("all", true)
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    let bans = response.json::<Value>()["data"].clone();
    assert_eq!(bans[0]["is_active"], false);

    app.server
        .post("/api/boards/g/threads")
        .add_header("X-Forwarded-For", "192.0.2.10")
        .json(&json!({ "message": "reformed" }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_ban_validation() {
    let app = spawn_app().await;
    let token = staff_token(&app, "mod", Role::Moderator).await;

    app.server
        .post("/api/admin/bans")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "ip_address": "not-an-ip", "reason": "spam" }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    app.server
        .post("/api/admin/bans")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "ip_address": "192.0.2.10", "reason": "spam", "duration_hours": 0 }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    for hours in [87_601, i64::MAX] {
        let response = app
            .server
            .post("/api/admin/bans")
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&json!({ "ip_address": "192.0.2.10", "reason": "spam", "duration_hours": hours }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["error"]["code"], "VALIDATION_ERROR");
    }

    let response = app
        .server
        .get("/api/admin/bans")
        .add_query_param("all", true)
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert!(response.json::<Value>()["data"].as_array().unwrap().is_empty());

    app.server
        .delete("/api/admin/bans/999")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Reports
// ============================================================================

#[tokio::test]
async fn test_report_review() {
    let app = spawn_app().await;
    let board = create_board(&app.db, "g", "Technology").await;
    let op = create_thread(&app.db, &board, "offending", "10.0.0.5").await;
    let token = staff_token(&app, "mod", Role::Moderator).await;

    for ip in ["198.51.100.1", "198.51.100.2"] {
        app.server
            .post(&format!("/api/posts/{}/report", op.id))
            .add_header("X-Forwarded-For", ip)
            .json(&json!({ "reason": "illegal" }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = app
        .server
        .get("/api/admin/reports")
        .add_query_param("status", "open")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let reports = response.json::<Value>()["data"].clone();
    assert_eq!(reports.as_array().unwrap().len(), 2);
    assert_eq!(reports[0]["status"], "open");
    let first = reports[0]["id"].as_i64().unwrap();
    let second = reports[1]["id"].as_i64().unwrap();

    let response = app
        .server
        .post(&format!("/api/admin/reports/{}/resolve", first))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["status"], "resolved");

    let response = app
        .server
        .post(&format!("/api/admin/reports/{}/dismiss", second))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["status"], "dismissed");

    let response = app
        .server
        .get("/api/admin/reports")
        .add_query_param("status", "open")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert!(response.json::<Value>()["data"].as_array().unwrap().is_empty());

    let response = app
        .server
        .get("/api/admin/reports")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 2);

    app.server
        .get("/api/admin/reports")
        .add_query_param("status", "pending")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_user_management() {
    let app = spawn_app().await;
    let root = create_staff(&app.db, "root", Role::Admin).await;
    let token = login(&app.server, "root").await;

    let response = app
        .server
        .post("/api/admin/users")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "username": "janitor", "password": "long-enough-pw" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let user = response.json::<Value>()["data"].clone();
    assert_eq!(user["role"], "moderator");
    let user_id = user["id"].as_i64().unwrap();

    // Duplicate username
    app.server
        .post("/api/admin/users")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "username": "janitor", "password": "long-enough-pw" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    // Weak password
    app.server
        .post("/api/admin/users")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "username": "weakling", "password": "short" }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .server
        .put(&format!("/api/admin/users/{}", user_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "role": "admin" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["role"], "admin");

    let response = app
        .server
        .get("/api/admin/users")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 2);

    // Staff cannot delete themselves
    app.server
        .delete(&format!("/api/admin/users/{}", root.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::CONFLICT);

    app.server
        .delete(&format!("/api/admin/users/{}", user_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    app.server
        .delete(&format!("/api/admin/users/{}", user_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Settings
// ============================================================================

#[tokio::test]
async fn test_settings() {
    let app = spawn_app().await;
    create_board(&app.db, "g", "Technology").await;
    let token = staff_token(&app, "root", Role::Admin).await;

    let response = app
        .server
        .put("/api/admin/settings")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "settings": { "posting_enabled": "false", "announcement": "maintenance" } }))
        .await;
    response.assert_status_ok();
    let settings = response.json::<Value>()["data"].clone();
    assert!(settings
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["key"] == "announcement" && s["value"] == "maintenance"));

    app.server
        .post("/api/boards/g/threads")
        .json(&json!({ "message": "anyone?" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .put("/api/admin/settings")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "settings": { "Bad Key": "x" } }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    // A mistyped boolean is rejected and posting stays disabled
    app.server
        .put("/api/admin/settings")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "settings": { "posting_enabled": "ture" } }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    app.server
        .post("/api/boards/g/threads")
        .json(&json!({ "message": "still closed?" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
