//! Infrastructure layer for slipbook

pub mod persistence;

pub use persistence::JsonFileStore;
