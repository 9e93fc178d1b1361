//! Travelog Core Library
//!
//! Record types, the key-value store port, attachment encoding and the
//! record store adapter for the Travelog service.

pub mod attachment;
pub mod error;
pub mod ports;
pub mod record;
pub mod store;

pub use attachment::{decode_data_uri, encode_data_uri, Attachment};
pub use error::{Result, TravelogError};
pub use ports::{KeyEntry, KvStore, ListOptions, ListPage};
pub use record::{NewRecord, Record, RECORD_PREFIX};
pub use store::RecordStore;
