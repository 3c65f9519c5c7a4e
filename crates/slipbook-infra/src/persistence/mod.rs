//! Persistence implementations
//!
//! File-based implementation of the persistence gateway.

mod json_file_store;

pub use json_file_store::JsonFileStore;
