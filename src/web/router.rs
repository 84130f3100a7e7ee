//! Router configuration for the JSON API.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::*;
use super::middleware::{api_rate_limit, create_cors_layer, login_rate_limit, security_headers};

/// Create the application router.
///
/// Public routes live under `/api`, staff routes under `/api/admin`, and
/// `/health` sits outside both and is not rate limited.
pub fn create_router(state: Arc<AppState>) -> Router {
    let limits = state.rate_limits.clone();
    let login_limits = state.rate_limits.clone();

    let public_routes = Router::new()
        .route("/boards", get(list_boards))
        .route("/boards/:short_id", get(get_board))
        .route(
            "/boards/:short_id/threads",
            get(list_threads).post(create_thread),
        )
        .route("/boards/:short_id/catalog", get(catalog))
        .route("/threads/:id", get(get_thread))
        .route("/threads/:id/replies", post(create_reply))
        .route("/posts/:id/report", post(report_post))
        .route("/ban", get(ban_status));

    let login_route = Router::new()
        .route("/login", post(login))
        .route_layer(middleware::from_fn(move |req, next| {
            let state = login_limits.clone();
            login_rate_limit(state, req, next)
        }));

    let admin_routes = Router::new()
        .merge(login_route)
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/boards", get(admin_list_boards).post(admin_create_board))
        .route("/boards/reorder", post(admin_reorder_boards))
        .route(
            "/boards/:id",
            put(admin_update_board).delete(admin_delete_board),
        )
        .route(
            "/posts",
            get(admin_posts_by_ip).delete(admin_delete_posts_by_ip),
        )
        .route("/posts/:id", get(admin_get_post).delete(admin_delete_post))
        .route("/posts/:id/restore", post(admin_restore_post))
        .route("/posts/:id/pin", post(admin_pin_thread))
        .route("/posts/:id/unpin", post(admin_unpin_thread))
        .route("/posts/:id/lock", post(admin_lock_thread))
        .route("/posts/:id/unlock", post(admin_unlock_thread))
        .route("/bans", get(admin_list_bans).post(admin_create_ban))
        .route("/bans/:id", delete(admin_lift_ban))
        .route("/reports", get(admin_list_reports))
        .route("/reports/:id/resolve", post(admin_resolve_report))
        .route("/reports/:id/dismiss", post(admin_dismiss_report))
        .route("/users", get(admin_list_users).post(admin_create_user))
        .route(
            "/users/:id",
            put(admin_update_user).delete(admin_delete_user),
        )
        .route(
            "/settings",
            get(admin_list_settings).put(admin_update_settings),
        );

    let api_routes = Router::new()
        .merge(public_routes)
        .nest("/admin", admin_routes)
        .layer(middleware::from_fn(move |req, next| {
            let state = limits.clone();
            api_rate_limit(state, req, next)
        }));

    let cors = create_cors_layer(&state.config.server.cors_origins);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(state)
}
