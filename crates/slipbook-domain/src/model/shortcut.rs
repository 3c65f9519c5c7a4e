//! Adjustment shortcuts (reference data)

use serde::{Deserialize, Serialize};
use slipbook_types::ValidationError;

/// Direction in which an adjustment moves a ledger total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Sign {
    pub fn apply(self, total: f64, amount: f64) -> f64 {
        match self {
            Sign::Plus => total + amount,
            Sign::Minus => total - amount,
        }
    }

    /// `amount` with this sign attached.
    pub fn signed(self, amount: f64) -> f64 {
        self.apply(0.0, amount)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        }
    }
}

impl std::str::FromStr for Sign {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Sign::Plus),
            "-" => Ok(Sign::Minus),
            other => Err(ValidationError::InvalidSign(other.to_string())),
        }
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single-letter code for a recurring ledger adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortcut {
    #[serde(rename = "alphabet")]
    pub code: String,
    #[serde(rename = "description")]
    pub label: String,
    #[serde(rename = "operation")]
    pub sign: Sign,
    #[serde(rename = "showInPurchaseBook", default)]
    pub include_in_allocation_view: bool,
}

impl Shortcut {
    pub fn new(code: &str, label: &str, sign: Sign) -> Self {
        Self {
            code: code.trim().to_string(),
            label: label.trim().to_string(),
            sign,
            include_in_allocation_view: false,
        }
    }

    pub fn with_allocation_view(mut self, include: bool) -> Self {
        self.include_in_allocation_view = include;
        self
    }

    /// Code is exactly one alphabetic character and the label is non-blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut chars = self.code.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_alphabetic() => {}
            _ => return Err(ValidationError::InvalidShortcutCode(self.code.clone())),
        }
        if self.label.trim().is_empty() {
            return Err(ValidationError::EmptyShortcutLabel);
        }
        Ok(())
    }
}

impl std::fmt::Display for Shortcut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} ({})", self.code, self.label, self.sign)
    }
}
