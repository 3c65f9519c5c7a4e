//! JSON file implementation of the persistence gateway
//!
//! Each collection lives in its own pretty-printed JSON file inside the
//! data directory. Every save reads the whole file, changes one entry and
//! writes the whole file back, all under a single mutex.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};

use slipbook_domain::model::{DeliveryRecord, LedgerRecord, Party, PartyKey, Shortcut};
use slipbook_domain::repository::{date_key, DeliveryStore, LedgerStore, PersistenceGateway};
use slipbook_types::PersistenceError;

const DELIVERIES_FILE: &str = "sub_slips.json";
const LEDGERS_FILE: &str = "main_slips.json";
const PARTIES_FILE: &str = "parties.json";
const SHORTCUTS_FILE: &str = "shortcuts.json";

/// Two final amounts closer than this are the same delivery.
const AMOUNT_TOLERANCE: f64 = 0.01;

type StoreResult<T> = std::result::Result<T, PersistenceError>;

pub struct JsonFileStore {
    data_dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `data_dir`.
    pub fn open(data_dir: PathBuf) -> StoreResult<Self> {
        fs::create_dir_all(&data_dir)?;
        debug!(path = %data_dir.display(), "opened data directory");
        Ok(Self {
            data_dir,
            lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn guard(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.lock.lock().map_err(|_| PersistenceError::LockPoisoned)
    }

    fn read<T: DeserializeOwned + Default>(&self, file_name: &str) -> StoreResult<T> {
        let path = self.data_dir.join(file_name);
        if !path.exists() {
            return Ok(T::default());
        }
        let reader = BufReader::new(File::open(&path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write through a sibling temp file renamed over the target, so a
    /// failed write leaves the previous file intact.
    fn write<T: Serialize>(&self, file_name: &str, value: &T) -> StoreResult<()> {
        let path = self.data_dir.join(file_name);
        let tmp_path = self.data_dir.join(format!("{}.tmp", file_name));
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove_file(&self, file_name: &str) -> StoreResult<()> {
        let path = self.data_dir.join(file_name);
        if path.exists() {
            fs::remove_file(&path)?;
            info!(path = %path.display(), "deleted data file");
        }
        Ok(())
    }

    fn locked_read<T: DeserializeOwned + Default>(&self, file_name: &str) -> StoreResult<T> {
        let _guard = self.guard()?;
        self.read(file_name)
    }

    fn locked_write<T: Serialize>(&self, file_name: &str, value: &T) -> StoreResult<()> {
        let _guard = self.guard()?;
        self.write(file_name, value)
    }

    fn try_save_delivery(&self, date: NaiveDate, key: &PartyKey, record: &DeliveryRecord) -> StoreResult<()> {
        if let Some(field) = record.non_finite_field() {
            return Err(PersistenceError::NonFinite(field));
        }
        let _guard = self.guard()?;
        let mut store: DeliveryStore = self.read(DELIVERIES_FILE)?;
        store
            .entry(date_key(date))
            .or_default()
            .entry(key.storage_key())
            .or_default()
            .push(record.clone());
        self.write(DELIVERIES_FILE, &store)
    }

    fn try_save_ledger(&self, record: &LedgerRecord) -> StoreResult<()> {
        if let Some(field) = record.non_finite_field() {
            return Err(PersistenceError::NonFinite(field));
        }
        let _guard = self.guard()?;
        let mut store: LedgerStore = self.read(LEDGERS_FILE)?;
        store
            .entry(date_key(record.date))
            .or_default()
            .insert(record.party_name.clone(), record.clone());
        self.write(LEDGERS_FILE, &store)
    }

    fn try_delete_deliveries(
        &self,
        date: NaiveDate,
        key: &PartyKey,
        matching: &[DeliveryRecord],
    ) -> StoreResult<usize> {
        let _guard = self.guard()?;
        let mut store: DeliveryStore = self.read(DELIVERIES_FILE)?;
        let day = date_key(date);
        let party_key = key.storage_key();

        let Some(records) = store.get_mut(&day).and_then(|parties| parties.get_mut(&party_key)) else {
            return Ok(0);
        };
        let before = records.len();
        records.retain(|record| !matching.iter().any(|m| same_delivery(record, m)));
        let removed = before - records.len();

        prune(&mut store, &day, &party_key);
        self.write(DELIVERIES_FILE, &store)?;
        Ok(removed)
    }

    fn try_delete_all_deliveries(&self, date: NaiveDate, key: &PartyKey) -> StoreResult<()> {
        let _guard = self.guard()?;
        let mut store: DeliveryStore = self.read(DELIVERIES_FILE)?;
        let day = date_key(date);
        let party_key = key.storage_key();
        if let Some(records) = store.get_mut(&day).and_then(|parties| parties.get_mut(&party_key)) {
            records.clear();
        }
        prune(&mut store, &day, &party_key);
        self.write(DELIVERIES_FILE, &store)
    }

    fn try_delete_all_data(&self) -> StoreResult<()> {
        let _guard = self.guard()?;
        self.remove_file(DELIVERIES_FILE)?;
        self.remove_file(LEDGERS_FILE)
    }
}

fn same_delivery(a: &DeliveryRecord, b: &DeliveryRecord) -> bool {
    a.truck_id == b.truck_id && (a.final_amount - b.final_amount).abs() < AMOUNT_TOLERANCE
}

/// Drop the party entry if it is empty, then the date entry if that is empty.
fn prune(store: &mut DeliveryStore, date_key: &str, party_key: &str) {
    if let Some(parties) = store.get_mut(date_key) {
        if parties.get(party_key).is_some_and(Vec::is_empty) {
            parties.remove(party_key);
        }
        if parties.is_empty() {
            store.remove(date_key);
        }
    }
}

/// Log a storage failure and carry on with an empty value.
fn absorb<T: Default>(operation: &str, result: StoreResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!(operation, error = %e, "storage operation failed; continuing without it");
            T::default()
        }
    }
}

impl PersistenceGateway for JsonFileStore {
    fn load_deliveries(&self) -> DeliveryStore {
        absorb("load_deliveries", self.locked_read(DELIVERIES_FILE))
    }

    fn save_delivery(&self, date: NaiveDate, key: &PartyKey, record: &DeliveryRecord) {
        absorb("save_delivery", self.try_save_delivery(date, key, record));
    }

    fn load_ledgers(&self) -> LedgerStore {
        absorb("load_ledgers", self.locked_read(LEDGERS_FILE))
    }

    fn save_ledger(&self, record: &LedgerRecord) {
        absorb("save_ledger", self.try_save_ledger(record));
    }

    fn load_parties(&self) -> Vec<Party> {
        absorb("load_parties", self.locked_read(PARTIES_FILE))
    }

    fn save_parties(&self, parties: &[Party]) {
        absorb("save_parties", self.locked_write(PARTIES_FILE, &parties));
    }

    fn load_shortcuts(&self) -> Vec<Shortcut> {
        absorb("load_shortcuts", self.locked_read(SHORTCUTS_FILE))
    }

    fn save_shortcuts(&self, shortcuts: &[Shortcut]) {
        absorb("save_shortcuts", self.locked_write(SHORTCUTS_FILE, &shortcuts));
    }

    fn delete_deliveries(&self, date: NaiveDate, key: &PartyKey, matching: &[DeliveryRecord]) -> usize {
        absorb("delete_deliveries", self.try_delete_deliveries(date, key, matching))
    }

    fn delete_all_deliveries(&self, date: NaiveDate, key: &PartyKey) {
        absorb("delete_all_deliveries", self.try_delete_all_deliveries(date, key));
    }

    fn delete_all_data(&self) {
        absorb("delete_all_data", self.try_delete_all_data());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slipbook_domain::model::{Adjustment, DiscountSelector, Sign};
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn delivery(truck: &str, final_amount: f64) -> DeliveryRecord {
        DeliveryRecord {
            party_name: "Patel".to_string(),
            truck_id: truck.to_string(),
            gross_weight: 6500.0,
            band_weights: vec![6200.0, 300.0],
            rate1: 20.0,
            rate2: 5.0,
            quality_adj: vec![2.0],
            band_amounts: vec![167.4],
            discount: DiscountSelector::OnePointFive,
            pre_tax_amount: 164.89,
            tax: final_amount - 164.89,
            final_amount,
        }
    }

    fn ledger(base_total: f64) -> LedgerRecord {
        LedgerRecord {
            date: date(),
            party_name: "Patel".to_string(),
            base_total,
            adjustments: vec![Adjustment {
                amount: 20.0,
                shortcut_code: "R".to_string(),
                label: "Rent".to_string(),
                sign: Sign::Minus,
            }],
            settled_total: base_total - 20.0,
        }
    }

    fn open_store() -> (TempDir, JsonFileStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_files_load_empty() {
        let (_dir, store) = open_store();
        assert!(store.load_deliveries().is_empty());
        assert!(store.load_ledgers().is_empty());
        assert!(store.load_parties().is_empty());
        assert!(store.load_shortcuts().is_empty());
    }

    #[test]
    fn test_delivery_round_trip() {
        let (_dir, store) = open_store();
        let record = delivery("T1", 214.89);
        store.save_delivery(date(), &PartyKey::Id(1), &record);
        store.save_delivery(date(), &PartyKey::Name("Walk-in".to_string()), &delivery("T2", 100.0));

        let loaded = store.load_deliveries();
        assert_eq!(loaded["2025-03-14"]["1"], vec![record]);
        assert_eq!(loaded["2025-03-14"]["Walk-in"].len(), 1);
    }

    #[test]
    fn test_ledger_replaced_wholesale() {
        let (_dir, store) = open_store();
        let mut first = ledger(500.0);
        first.adjustments.push(first.adjustments[0].clone());
        store.save_ledger(&first);
        let second = ledger(700.0);
        store.save_ledger(&second);

        let loaded = store.load_ledgers();
        assert_eq!(loaded["2025-03-14"]["Patel"], second);
    }

    #[test]
    fn test_reference_data_round_trip() {
        let (_dir, store) = open_store();
        let parties = vec![Party { id: 1, name: "Patel".to_string() }];
        let shortcuts = vec![Shortcut::new("R", "Rent", Sign::Minus).with_allocation_view(true)];
        store.save_parties(&parties);
        store.save_shortcuts(&shortcuts);
        assert_eq!(store.load_parties(), parties);
        assert_eq!(store.load_shortcuts(), shortcuts);
    }

    #[test]
    fn test_delete_matches_truck_and_amount() {
        let (_dir, store) = open_store();
        let key = PartyKey::Id(1);
        store.save_delivery(date(), &key, &delivery("T1", 214.89));
        store.save_delivery(date(), &key, &delivery("T1", 300.0));
        store.save_delivery(date(), &key, &delivery("T2", 214.89));

        let removed = store.delete_deliveries(date(), &key, &[delivery("T1", 214.885)]);
        assert_eq!(removed, 1);
        let left = &store.load_deliveries()["2025-03-14"]["1"];
        assert_eq!(left.len(), 2);
        assert!(left.iter().all(|d| !(d.truck_id == "T1" && d.final_amount == 214.89)));
    }

    #[test]
    fn test_delete_prunes_empty_entries() {
        let (_dir, store) = open_store();
        let key = PartyKey::Id(1);
        store.save_delivery(date(), &key, &delivery("T1", 214.89));
        store.delete_deliveries(date(), &key, &[delivery("T1", 214.89)]);
        assert!(store.load_deliveries().is_empty());

        store.save_delivery(date(), &key, &delivery("T1", 214.89));
        store.save_delivery(date(), &key, &delivery("T2", 100.0));
        store.delete_all_deliveries(date(), &key);
        assert!(store.load_deliveries().is_empty());
    }

    #[test]
    fn test_delete_all_data_keeps_reference_data() {
        let (_dir, store) = open_store();
        store.save_parties(&[Party { id: 1, name: "Patel".to_string() }]);
        store.save_delivery(date(), &PartyKey::Id(1), &delivery("T1", 214.89));
        store.save_ledger(&ledger(214.89));

        store.delete_all_data();
        assert!(store.load_deliveries().is_empty());
        assert!(store.load_ledgers().is_empty());
        assert_eq!(store.load_parties().len(), 1);
    }

    #[test]
    fn test_corrupted_file_is_absorbed() {
        let (_dir, store) = open_store();
        fs::write(store.data_dir().join(DELIVERIES_FILE), "{ not json").unwrap();
        assert!(store.load_deliveries().is_empty());
        // A failed read aborts the save rather than overwriting the file
        store.save_delivery(date(), &PartyKey::Id(1), &delivery("T1", 214.89));
        let raw = fs::read_to_string(store.data_dir().join(DELIVERIES_FILE)).unwrap();
        assert_eq!(raw, "{ not json");
    }

    #[test]
    fn test_overflowing_record_is_not_stored() {
        let (_dir, store) = open_store();
        let key = PartyKey::Id(1);
        store.save_delivery(date(), &key, &delivery("T1", 214.89));

        let mut overflowed = delivery("T2", 214.89);
        overflowed.pre_tax_amount = f64::INFINITY;
        overflowed.final_amount = f64::INFINITY;
        store.save_delivery(date(), &key, &overflowed);
        store.save_delivery(date(), &key, &delivery("T3", 100.0));

        let trucks: Vec<String> = store.load_deliveries()["2025-03-14"]["1"]
            .iter()
            .map(|d| d.truck_id.clone())
            .collect();
        assert_eq!(trucks, vec!["T1", "T3"]);

        let mut ledger = ledger(214.89);
        ledger.settled_total = f64::INFINITY;
        store.save_ledger(&ledger);
        assert!(store.load_ledgers().is_empty());
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let (_dir, store) = open_store();
        store.save_delivery(date(), &PartyKey::Id(1), &delivery("T1", 214.89));
        let names: Vec<String> = fs::read_dir(store.data_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![DELIVERIES_FILE.to_string()]);
    }

    #[test]
    fn test_reads_existing_file_layout() {
        let (_dir, store) = open_store();
        let json = r#"{
          "2025-03-14": {
            "Patel": {
              "date": "2025-03-14",
              "partyName": "Patel",
              "totalBeforeOperations": 1000.0,
              "operations": [
                { "amount": 200.0, "shortcutId": "R", "description": "Rent", "operationType": "-" }
              ],
              "totalAfterOperations": 800.0
            }
          }
        }"#;
        fs::write(store.data_dir().join(LEDGERS_FILE), json).unwrap();
        let loaded = store.load_ledgers();
        let record = &loaded["2025-03-14"]["Patel"];
        assert_eq!(record.settled_total, 800.0);
        assert_eq!(record.adjustments[0].sign, Sign::Minus);
    }
}
