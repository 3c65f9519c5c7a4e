//! Domain model types

pub mod delivery;
pub mod ledger;
pub mod party;
pub mod shortcut;

pub use delivery::{DeliveryRecord, DiscountSelector};
pub use ledger::{Adjustment, LedgerRecord};
pub use party::{Party, PartyKey};
pub use shortcut::{Shortcut, Sign};
