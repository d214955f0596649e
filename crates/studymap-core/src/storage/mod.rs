//! Storage Module
//!
//! SQLite-based storage layer with:
//! - Race-safe canonical topic/skill resolution
//! - Transactional entry + classification + skill-link writes
//! - Idempotent connection edge upserts
//! - Read-only aggregate queries over committed state

mod migrations;
mod sqlite;

pub use migrations::MIGRATIONS;
pub use sqlite::{Result, Storage, StorageError, StoreStats};
