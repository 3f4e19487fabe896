//! daylog-api: HTTP API for Daylog
//!
//! Provides the day read/upsert endpoints and the Slack notify endpoints.
//! Built with axum for async HTTP handling.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::{ApiError, Result};
pub use server::{AppState, build_app, start_server};
