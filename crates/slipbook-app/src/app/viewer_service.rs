//! Delivery browsing and deletion

use chrono::NaiveDate;
use tracing::{info, warn};

use slipbook_domain::model::{DeliveryRecord, PartyKey};
use slipbook_domain::repository::date_key;

use crate::AppContext;

/// Dates holding deliveries, newest first.
pub fn available_dates(ctx: &AppContext) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = ctx
        .gateway()
        .load_deliveries()
        .keys()
        .filter_map(|key| match NaiveDate::parse_from_str(key, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                warn!(key = %key, "skipping delivery date that is not YYYY-MM-DD");
                None
            }
        })
        .collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates
}

/// Party keys with deliveries on `date`, ids first in numeric order.
pub fn party_keys_for_date(ctx: &AppContext, date: NaiveDate) -> Vec<PartyKey> {
    let mut keys: Vec<PartyKey> = ctx
        .gateway()
        .load_deliveries()
        .get(&date_key(date))
        .map(|parties| parties.keys().map(|k| PartyKey::parse(k)).collect())
        .unwrap_or_default();
    keys.sort();
    keys
}

/// Party keys of `date` paired with their display names.
pub fn parties_for_date(ctx: &AppContext, date: NaiveDate) -> Vec<(PartyKey, String)> {
    party_keys_for_date(ctx, date)
        .into_iter()
        .map(|key| {
            let name = ctx.parties.display_name(&key);
            (key, name)
        })
        .collect()
}

pub fn deliveries_for_key(ctx: &AppContext, date: NaiveDate, key: &PartyKey) -> Vec<DeliveryRecord> {
    ctx.gateway()
        .load_deliveries()
        .remove(&date_key(date))
        .and_then(|mut parties| parties.remove(&key.storage_key()))
        .unwrap_or_default()
}

/// Deliveries of `party_name` on `date`, found through its party key.
pub fn deliveries_for(ctx: &AppContext, date: NaiveDate, party_name: &str) -> Vec<DeliveryRecord> {
    deliveries_for_key(ctx, date, &ctx.parties.resolve_key(party_name))
}

/// Delete the listed deliveries (matched by truck and final amount).
pub fn delete_deliveries(
    ctx: &AppContext,
    date: NaiveDate,
    key: &PartyKey,
    matching: &[DeliveryRecord],
) -> usize {
    let removed = ctx.gateway().delete_deliveries(date, key, matching);
    info!(%date, key = %key, removed, "deleted deliveries");
    removed
}

pub fn delete_all_deliveries(ctx: &AppContext, date: NaiveDate, key: &PartyKey) {
    ctx.gateway().delete_all_deliveries(date, key);
    info!(%date, key = %key, "deleted all deliveries of party");
}

/// Remove all deliveries and ledgers; parties and shortcuts stay.
pub fn delete_all_data(ctx: &AppContext) {
    ctx.gateway().delete_all_data();
    warn!("all deliveries and ledgers deleted");
}
