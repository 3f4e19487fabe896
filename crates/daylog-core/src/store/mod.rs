//! Day record storage
//!
//! Provides SQLite persistence for Day records and a shared handle for
//! concurrent request handlers.

mod repository;
mod sqlite;
mod types;

pub use repository::DayRepository;
pub use sqlite::DayStore;
pub use types::Day;
