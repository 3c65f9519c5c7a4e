//! Persistence and lookup traits
//!
//! The gateway never fails towards its caller: storage errors are logged
//! by the implementation and loads degrade to empty collections.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{DeliveryRecord, LedgerRecord, Party, PartyKey, Shortcut};

/// `date -> party key -> deliveries`, keys as stored on disk.
pub type DeliveryStore = BTreeMap<String, BTreeMap<String, Vec<DeliveryRecord>>>;

/// `date -> party name -> ledger`.
pub type LedgerStore = BTreeMap<String, BTreeMap<String, LedgerRecord>>;

/// On-disk form of a date key.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Whether any date holds deliveries filed under party `id`.
pub fn has_deliveries_for_party(store: &DeliveryStore, id: u32) -> bool {
    let key = PartyKey::Id(id).storage_key();
    store
        .values()
        .any(|parties| parties.get(&key).is_some_and(|records| !records.is_empty()))
}

pub trait PersistenceGateway: Send + Sync {
    fn load_deliveries(&self) -> DeliveryStore;

    /// Append one delivery under `(date, key)`.
    fn save_delivery(&self, date: NaiveDate, key: &PartyKey, record: &DeliveryRecord);

    fn load_ledgers(&self) -> LedgerStore;

    /// Store `record` under its date and party name, replacing any earlier one.
    fn save_ledger(&self, record: &LedgerRecord);

    fn load_parties(&self) -> Vec<Party>;

    fn save_parties(&self, parties: &[Party]);

    fn load_shortcuts(&self) -> Vec<Shortcut>;

    fn save_shortcuts(&self, shortcuts: &[Shortcut]);

    /// Remove the deliveries under `(date, key)` that match one of
    /// `matching` by truck id and final amount. Returns how many went.
    fn delete_deliveries(&self, date: NaiveDate, key: &PartyKey, matching: &[DeliveryRecord]) -> usize;

    /// Remove every delivery under `(date, key)`.
    fn delete_all_deliveries(&self, date: NaiveDate, key: &PartyKey);

    /// Drop all deliveries and ledgers. Parties and shortcuts stay.
    fn delete_all_data(&self);
}

/// Name/key lookups that fall back to their input when unresolved.
pub trait Directory {
    fn party_name_for_key(&self, key: &str) -> String;

    fn party_key_for_name(&self, name: &str) -> String;
}
