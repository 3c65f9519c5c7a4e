//! Ledger (main slip) sessions for one party on one date

use chrono::NaiveDate;
use slipbook_types::{parse_entry, round_currency, ResolutionError, ValidationError};

use crate::directory::ShortcutDirectory;
use crate::model::{Adjustment, DeliveryRecord, LedgerRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerState {
    /// Adjustments exist only in memory.
    Unsaved,
    /// The in-memory adjustments match the persisted snapshot.
    Saved,
}

/// In-memory working copy of a ledger.
#[derive(Debug, Clone)]
pub struct LedgerSession {
    date: NaiveDate,
    party_name: String,
    base_total: f64,
    adjustments: Vec<Adjustment>,
    state: LedgerState,
}

impl LedgerSession {
    /// Open the ledger of `party_name` on `date`.
    ///
    /// The base total always comes from `deliveries`, never from the saved
    /// snapshot; only the adjustment list is taken from `existing`.
    pub fn create_or_load(
        date: NaiveDate,
        party_name: &str,
        deliveries: &[DeliveryRecord],
        existing: Option<&LedgerRecord>,
    ) -> Self {
        let base_total = round_currency(deliveries.iter().map(|d| d.final_amount).sum());
        let (adjustments, state) = match existing {
            Some(record) => (record.adjustments.clone(), LedgerState::Saved),
            None => (Vec::new(), LedgerState::Unsaved),
        };
        Self {
            date,
            party_name: party_name.to_string(),
            base_total,
            adjustments,
            state,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn party_name(&self) -> &str {
        &self.party_name
    }

    pub fn base_total(&self) -> f64 {
        self.base_total
    }

    pub fn adjustments(&self) -> &[Adjustment] {
        &self.adjustments
    }

    pub fn state(&self) -> LedgerState {
        self.state
    }

    pub fn settled_total(&self) -> f64 {
        let signed: f64 = self.adjustments.iter().map(Adjustment::signed_amount).sum();
        round_currency(self.base_total + signed)
    }

    pub fn append(&mut self, adjustment: Adjustment) {
        self.adjustments.push(adjustment);
        self.state = LedgerState::Unsaved;
    }

    /// Append `amount` under shortcut `code`, snapshotting its label and sign.
    pub fn append_operation(
        &mut self,
        amount: f64,
        code: &str,
        shortcuts: &ShortcutDirectory,
    ) -> Result<&Adjustment, ResolutionError> {
        let shortcut = shortcuts
            .find(code)
            .ok_or_else(|| ResolutionError::UnknownShortcut(code.to_string()))?;
        self.append(Adjustment::from_shortcut(amount, shortcut));
        Ok(&self.adjustments[self.adjustments.len() - 1])
    }

    /// Drop every adjustment so the settled total equals the base total.
    pub fn reset(&mut self) {
        self.adjustments.clear();
        self.state = LedgerState::Unsaved;
    }

    pub fn to_record(&self) -> LedgerRecord {
        LedgerRecord {
            date: self.date,
            party_name: self.party_name.clone(),
            base_total: self.base_total,
            adjustments: self.adjustments.clone(),
            settled_total: self.settled_total(),
        }
    }

    pub fn mark_saved(&mut self) {
        self.state = LedgerState::Saved;
    }
}

/// Parse one operation line such as `2000 R`.
///
/// A lone zero (`0`, `0.0`, `0.00`) ends operation entry and yields `None`.
pub fn parse_operation(text: &str) -> Result<Option<(f64, String)>, ValidationError> {
    let trimmed = text.trim();
    if matches!(trimmed, "0" | "0.0" | "0.00") {
        return Ok(None);
    }
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let [amount, code] = tokens.as_slice() else {
        return Err(ValidationError::MalformedOperation(trimmed.to_string()));
    };
    let amount = parse_entry(amount).ok_or_else(|| ValidationError::InvalidAmount(amount.to_string()))?;
    Ok(Some((amount, code.to_string())))
}
