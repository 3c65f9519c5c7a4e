//! Weight breakdown: entered band weights → priced bands + dust band
//!
//! Entries are collected until a zero sentinel. The last non-blank entry
//! is the dust band, taken literally. Whatever the gross weight leaves over
//! after the known bands and the dust goes to the single blank slot if
//! there is exactly one, otherwise onto the first priced band.

use serde::{Deserialize, Serialize};
use slipbook_types::parse_entry;
use tracing::warn;

/// Resolved bands of one delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandBreakdown {
    pub priced: Vec<f64>,
    pub dust: f64,
    /// How far the declared bands overshot the gross weight. The remainder
    /// is clamped to zero rather than rejected; this records what was lost.
    pub clamped_excess: f64,
}

impl BandBreakdown {
    /// Priced bands followed by the dust band.
    pub fn band_weights(&self) -> Vec<f64> {
        let mut weights = self.priced.clone();
        weights.push(self.dust);
        weights
    }

    pub fn total(&self) -> f64 {
        self.priced.iter().sum::<f64>() + self.dust
    }

    pub fn is_clamped(&self) -> bool {
        self.clamped_excess > 0.0
    }
}

/// Resolve the entries that preceded the sentinel. `None` is a blank slot.
pub fn resolve_breakdown(entries: &[Option<f64>], gross_weight: f64) -> BandBreakdown {
    let Some(dust_index) = entries.iter().rposition(Option::is_some) else {
        // Nothing entered: the whole load is dust.
        return BandBreakdown {
            priced: Vec::new(),
            dust: gross_weight,
            clamped_excess: 0.0,
        };
    };
    let dust = entries[dust_index].unwrap_or(0.0);
    let slots = &entries[..dust_index];

    let sum_known: f64 = slots.iter().flatten().sum();
    let raw_remainder = gross_weight - sum_known - dust;
    let remainder = raw_remainder.max(0.0);
    let clamped_excess = (-raw_remainder).max(0.0);
    if clamped_excess > 0.0 {
        warn!(
            gross_weight,
            declared = sum_known + dust,
            clamped_excess,
            "declared bands exceed gross weight; remainder clamped to zero"
        );
    }

    let blanks: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.is_none())
        .map(|(i, _)| i)
        .collect();

    let mut priced: Vec<f64> = slots.iter().map(|slot| slot.unwrap_or(0.0)).collect();
    match (blanks.as_slice(), priced.first_mut()) {
        ([only_blank], _) => priced[*only_blank] = remainder,
        (_, Some(first)) => *first += remainder,
        // A lone entry is the dust band; the remainder gets its own band.
        (_, None) => priced.push(remainder),
    }

    BandBreakdown {
        priced,
        dust,
        clamped_excess,
    }
}

/// Whether entered text is the zero sentinel that ends band entry.
pub fn is_sentinel(text: &str) -> bool {
    parse_entry(text) == Some(0.0)
}

/// Progress of band entry for one delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum ReducerState {
    Collecting { entries: Vec<Option<f64>> },
    Resolved(BandBreakdown),
}

/// Feeds entered band texts one at a time until the sentinel, then
/// resolves them against the gross weight.
#[derive(Debug, Clone)]
pub struct WeightEntryReducer {
    gross_weight: f64,
    state: ReducerState,
}

impl WeightEntryReducer {
    pub fn new(gross_weight: f64) -> Self {
        Self {
            gross_weight,
            state: ReducerState::Collecting {
                entries: Vec::new(),
            },
        }
    }

    pub fn state(&self) -> &ReducerState {
        &self.state
    }

    /// Push one entered value. Ignored once resolved.
    pub fn push(&mut self, text: &str) -> &ReducerState {
        if is_sentinel(text) {
            return self.finish();
        }
        if let ReducerState::Collecting { entries } = &mut self.state {
            entries.push(parse_entry(text));
        }
        &self.state
    }

    /// Resolve as if the sentinel had been entered now.
    pub fn finish(&mut self) -> &ReducerState {
        if let ReducerState::Collecting { entries } = &self.state {
            self.state = ReducerState::Resolved(resolve_breakdown(entries, self.gross_weight));
        }
        &self.state
    }

    pub fn breakdown(&self) -> Option<&BandBreakdown> {
        match &self.state {
            ReducerState::Resolved(breakdown) => Some(breakdown),
            ReducerState::Collecting { .. } => None,
        }
    }

    pub fn into_breakdown(mut self) -> BandBreakdown {
        self.finish();
        match self.state {
            ReducerState::Resolved(breakdown) => breakdown,
            ReducerState::Collecting { entries } => resolve_breakdown(&entries, self.gross_weight),
        }
    }
}
