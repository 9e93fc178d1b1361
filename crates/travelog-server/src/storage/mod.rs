//! Storage layer
//!
//! Key-value backends for the record store. SQLite (embedded) is the
//! durable default; DashMap (in-memory) serves development and tests.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
