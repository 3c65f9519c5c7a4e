//! Domain layer: delivery pricing, ledger aggregation and the allocation view
//!
//! Everything here is synchronous and free of I/O. Persistence is reached
//! only through the [`repository::PersistenceGateway`] trait.

pub mod directory;
pub mod model;
pub mod repository;
pub mod service;

pub use directory::{PartyDirectory, ShortcutDirectory};
pub use model::{
    Adjustment, DeliveryRecord, DiscountSelector, LedgerRecord, Party, PartyKey, Shortcut, Sign,
};
