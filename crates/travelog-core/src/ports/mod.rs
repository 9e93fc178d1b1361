//! Port traits (interfaces) for dependency injection

pub mod storage;

pub use storage::{KeyEntry, KvStore, ListOptions, ListPage, DEFAULT_LIST_LIMIT};
