//! JSON API for chanboard.
//!
//! Public endpoints serve boards, threads and posting; `/api/admin`
//! serves the moderation panel behind staff sessions.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
