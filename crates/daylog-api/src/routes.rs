//! Route definitions
//!
//! Defines all HTTP API endpoints.

use axum::{Router, routing::get};

use crate::handlers::{calendar, get_day, health, notify_body, notify_query, put_day};
use crate::server::AppState;

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Day records
        .route("/day", get(get_day).put(put_day))
        // Slack notification
        .route("/slack", get(notify_query).post(notify_body))
        // Month grid
        .route("/calendar", get(calendar))
}
