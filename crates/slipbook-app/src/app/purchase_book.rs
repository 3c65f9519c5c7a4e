//! Purchase book: the allocation view of a party or a whole day

use chrono::NaiveDate;

use slipbook_domain::model::PartyKey;
use slipbook_domain::repository::{date_key, Directory};
use slipbook_domain::service::{project, AllocationView};

use crate::app::viewer_service::party_keys_for_date;
use crate::AppContext;

/// Purchase book rows of one party key on `date`.
pub fn party_view(ctx: &AppContext, date: NaiveDate, key: &PartyKey) -> AllocationView {
    let day = date_key(date);
    let deliveries = ctx
        .gateway()
        .load_deliveries()
        .remove(&day)
        .and_then(|mut parties| parties.remove(&key.storage_key()))
        .unwrap_or_default();
    // Ledgers are filed under the party name, deliveries under the key.
    let ledger_name = ctx.parties.party_name_for_key(&key.storage_key());
    let ledger = ctx
        .gateway()
        .load_ledgers()
        .remove(&day)
        .and_then(|mut parties| parties.remove(&ledger_name));
    project(
        &ctx.parties.display_name(key),
        &deliveries,
        ledger.as_ref(),
        &ctx.shortcuts,
    )
}

/// Purchase book of every party with deliveries on `date`, in key order.
pub fn day_view(ctx: &AppContext, date: NaiveDate) -> AllocationView {
    let mut view = AllocationView {
        columns: ctx.shortcuts.allocation_columns(),
        rows: Vec::new(),
    };
    for key in party_keys_for_date(ctx, date) {
        view.extend(party_view(ctx, date, &key));
    }
    view
}
