//! Ledger (main slip) use cases and the per-day summary

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use slipbook_domain::model::Adjustment;
use slipbook_domain::repository::date_key;
use slipbook_domain::service::{parse_operation, LedgerSession};
use slipbook_types::Result;

use crate::app::viewer_service::deliveries_for;
use crate::AppContext;

/// Open the ledger of `party_name` on `date`, with a base total taken from
/// the deliveries as they are now.
pub fn open_ledger(ctx: &AppContext, date: NaiveDate, party_name: &str) -> LedgerSession {
    let deliveries = deliveries_for(ctx, date, party_name);
    let existing = ctx
        .gateway()
        .load_ledgers()
        .remove(&date_key(date))
        .and_then(|mut parties| parties.remove(party_name));
    LedgerSession::create_or_load(date, party_name, &deliveries, existing.as_ref())
}

/// Apply one typed operation line. Returns `false` on the finish sentinel.
pub fn apply_operation(ctx: &AppContext, session: &mut LedgerSession, text: &str) -> Result<bool> {
    let Some((amount, code)) = parse_operation(text)? else {
        return Ok(false);
    };
    session.append_operation(amount, &code, &ctx.shortcuts)?;
    Ok(true)
}

/// Persist the session, replacing any ledger saved earlier for the same
/// party and date.
pub fn save_ledger(ctx: &AppContext, session: &mut LedgerSession) {
    let record = session.to_record();
    ctx.gateway().save_ledger(&record);
    session.mark_saved();
    info!(
        date = %record.date,
        party = %record.party_name,
        operations = record.adjustments.len(),
        settled_total = record.settled_total,
        "saved ledger"
    );
}

/// One line of the day summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummaryRow {
    pub party_name: String,
    pub base_total: f64,
    pub minus: Vec<Adjustment>,
    pub plus: Vec<Adjustment>,
    pub settled_total: f64,
}

/// Every saved ledger of `date`, with operations split into minus and plus.
pub fn day_summary(ctx: &AppContext, date: NaiveDate) -> Vec<LedgerSummaryRow> {
    ctx.gateway()
        .load_ledgers()
        .remove(&date_key(date))
        .unwrap_or_default()
        .into_values()
        .map(|record| {
            let (minus, plus) = record.split_by_sign();
            LedgerSummaryRow {
                party_name: record.party_name.clone(),
                base_total: record.base_total,
                minus: minus.into_iter().cloned().collect(),
                plus: plus.into_iter().cloned().collect(),
                settled_total: record.settled_total,
            }
        })
        .collect()
}
