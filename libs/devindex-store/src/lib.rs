//! Local SQLite persistence for the devindex engine.
//!
//! Stores the term corpus with its snapshot version, per-term progress
//! (implementing [`devindex_core::ProgressStore`]) and quiz session history.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::{DbError, Result};
pub use repository::{DatabaseStats, SessionRepository, SqliteRepository, TermRepository};
