//! Storage backends implementing [`crate::domain::ports::ProjectStore`].

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
