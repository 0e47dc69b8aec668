//! Trinity API
//!
//! Axum routes and middleware for the trinity vault planner.

pub mod handlers;
pub mod router;
pub mod security;
pub mod state;

#[cfg(feature = "openapi")]
pub mod openapi;

pub use router::create_router;
pub use state::AppState;
