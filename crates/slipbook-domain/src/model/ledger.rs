use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::shortcut::{Shortcut, Sign};

/// A signed ledger entry. Label and sign are copied from the shortcut
/// when the entry is made, so later shortcut edits leave it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub amount: f64,
    #[serde(rename = "shortcutId")]
    pub shortcut_code: String,
    #[serde(rename = "description")]
    pub label: String,
    #[serde(rename = "operationType")]
    pub sign: Sign,
}

impl Adjustment {
    pub fn from_shortcut(amount: f64, shortcut: &Shortcut) -> Self {
        Self {
            amount,
            shortcut_code: shortcut.code.clone(),
            label: shortcut.label.clone(),
            sign: shortcut.sign,
        }
    }

    pub fn signed_amount(&self) -> f64 {
        self.sign.signed(self.amount)
    }
}

/// Saved main slip for one party on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub date: NaiveDate,
    #[serde(rename = "partyName")]
    pub party_name: String,
    #[serde(rename = "totalBeforeOperations")]
    pub base_total: f64,
    #[serde(rename = "operations", default)]
    pub adjustments: Vec<Adjustment>,
    #[serde(rename = "totalAfterOperations")]
    pub settled_total: f64,
}

impl LedgerRecord {
    /// Adjustments split into (minus, plus) columns, each in entry order.
    pub fn split_by_sign(&self) -> (Vec<&Adjustment>, Vec<&Adjustment>) {
        self.adjustments
            .iter()
            .partition(|a| a.sign == Sign::Minus)
    }

    /// Name of the first field holding NaN or infinity, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        if !self.base_total.is_finite() {
            Some("base total")
        } else if !self.adjustments.iter().all(|a| a.amount.is_finite()) {
            Some("adjustment amount")
        } else if !self.settled_total.is_finite() {
            Some("settled total")
        } else {
            None
        }
    }
}
