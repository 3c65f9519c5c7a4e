//! Error types for slipbook

use thiserror::Error;

/// Rejected user input. Blocks progression at the point of entry; the
/// in-progress session is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Party name is required")]
    MissingParty,

    #[error("Gross weight must be greater than zero (got {0})")]
    NonPositiveGrossWeight(f64),

    #[error("Amount before tax must be greater than zero (got {0})")]
    NonPositiveAmount(f64),

    #[error("Band weight cannot be negative (got {0})")]
    NegativeBandWeight(f64),

    #[error("{0} is too large to calculate")]
    NonFiniteValue(&'static str),

    #[error("Invalid operation '{0}'. Use: amount shortcut (e.g., 2000 R)")]
    MalformedOperation(String),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Shortcut code must be a single letter (got '{0}')")]
    InvalidShortcutCode(String),

    #[error("Shortcut label cannot be empty")]
    EmptyShortcutLabel,

    #[error("Shortcut code '{0}' already exists")]
    DuplicateShortcut(String),

    #[error("Invalid sign '{0}' (expected + or -)")]
    InvalidSign(String),

    #[error("Party '{0}' still has delivery records; delete them first")]
    PartyInUse(String),
}

/// A reference that could not be resolved against reference data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("Shortcut '{0}' not found")]
    UnknownShortcut(String),

    #[error("Party id {0} not found")]
    UnknownParty(u32),
}

/// Storage failures. These never cross the persistence gateway: they are
/// logged there and the operation degrades to a no-op.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage data corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Refusing to store a record with a non-finite {0}")]
    NonFinite(&'static str),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Resolution(#[from] ResolutionError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Excel export error: {0}")]
    Excel(String),
}

pub type Result<T> = std::result::Result<T, Error>;
