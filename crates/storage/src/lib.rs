#![forbid(unsafe_code)]

mod codec;
mod locks;
pub mod keys;
pub mod records;
pub mod registry;
pub mod repository;
pub mod sqlite;

pub use records::RecordStore;
pub use registry::StudentRegistry;
pub use repository::{InMemoryRepository, KeyValueStore, Storage, StorageError};
