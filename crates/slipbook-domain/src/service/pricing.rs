//! Band pricing, dust discount and flat tax

use serde::{Deserialize, Serialize};
use slipbook_types::{round_currency, ValidationError};

use crate::model::{DeliveryRecord, DiscountSelector};
use crate::service::weight_breakdown::BandBreakdown;

/// Rate per 1000 kg of one priced band.
pub fn effective_rate(rate1: f64, rate2: f64, quality_adj: f64) -> f64 {
    rate1 + rate2 + quality_adj
}

/// Unrounded amount of one priced band.
pub fn band_amount(band_weight: f64, rate: f64) -> f64 {
    rate * (band_weight / 1000.0)
}

/// One line of the pricing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub weight: f64,
    pub rate: f64,
    pub amount: f64,
}

/// Price every priced band. Quality adjustments missing from the end of
/// `quality_adj` count as zero; extra ones are ignored.
pub fn price_rows(priced_weights: &[f64], rate1: f64, rate2: f64, quality_adj: &[f64]) -> Vec<PriceRow> {
    priced_weights
        .iter()
        .enumerate()
        .map(|(i, &weight)| {
            let quality = quality_adj.get(i).copied().unwrap_or(0.0);
            let rate = effective_rate(rate1, rate2, quality);
            PriceRow {
                weight,
                rate,
                amount: band_amount(weight, rate),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub pre_tax: f64,
    pub tax: f64,
    pub final_amount: f64,
}

/// Discount the summed band amounts, then add the flat tax.
pub fn compose(band_amounts: &[f64], discount: &DiscountSelector, tax: f64) -> Totals {
    let gross: f64 = band_amounts.iter().sum();
    let pre_tax = round_currency(gross * discount.factor());
    Totals {
        pre_tax,
        tax,
        final_amount: round_currency(pre_tax + tax),
    }
}

/// Everything entered for one delivery before it is priced.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryDraft {
    pub party_name: String,
    pub truck_id: String,
    pub gross_weight: f64,
    pub breakdown: BandBreakdown,
    pub rate1: f64,
    pub rate2: f64,
    pub quality_adj: Vec<f64>,
    pub discount: DiscountSelector,
    pub tax: f64,
}

impl DeliveryDraft {
    pub fn price_rows(&self) -> Vec<PriceRow> {
        price_rows(&self.breakdown.priced, self.rate1, self.rate2, &self.quality_adj)
    }

    pub fn totals(&self) -> Totals {
        let amounts: Vec<f64> = self.price_rows().iter().map(|r| r.amount).collect();
        compose(&amounts, &self.discount, self.tax)
    }

    /// Price the draft into a record, refusing drafts that cannot be saved.
    pub fn into_record(self) -> Result<DeliveryRecord, ValidationError> {
        if self.party_name.trim().is_empty() {
            return Err(ValidationError::MissingParty);
        }
        if self.gross_weight <= 0.0 {
            return Err(ValidationError::NonPositiveGrossWeight(self.gross_weight));
        }
        if let Some(&weight) = self.breakdown.band_weights().iter().find(|w| **w < 0.0) {
            return Err(ValidationError::NegativeBandWeight(weight));
        }
        let rows = self.price_rows();
        let band_amounts: Vec<f64> = rows.iter().map(|r| r.amount).collect();
        let totals = compose(&band_amounts, &self.discount, self.tax);
        if totals.pre_tax <= 0.0 {
            return Err(ValidationError::NonPositiveAmount(totals.pre_tax));
        }

        let mut quality_adj = self.quality_adj;
        quality_adj.resize(self.breakdown.priced.len(), 0.0);

        let record = DeliveryRecord {
            party_name: self.party_name.trim().to_string(),
            truck_id: self.truck_id.trim().to_string(),
            gross_weight: self.gross_weight,
            band_weights: self.breakdown.band_weights(),
            rate1: self.rate1,
            rate2: self.rate2,
            quality_adj,
            band_amounts,
            discount: self.discount,
            pre_tax_amount: totals.pre_tax,
            tax: totals.tax,
            final_amount: totals.final_amount,
        };
        match record.non_finite_field() {
            Some(field) => Err(ValidationError::NonFiniteValue(field)),
            None => Ok(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::weight_breakdown::resolve_breakdown;
    use proptest::prelude::*;

    fn draft() -> DeliveryDraft {
        DeliveryDraft {
            party_name: "Patel".to_string(),
            truck_id: "MH12 AB 1234".to_string(),
            gross_weight: 6500.0,
            breakdown: resolve_breakdown(&[Some(1200.0), Some(300.0)], 6500.0),
            rate1: 20.0,
            rate2: 5.0,
            quality_adj: vec![2.0],
            discount: DiscountSelector::OnePointFive,
            tax: 50.0,
        }
    }

    #[test]
    fn test_worked_example() {
        let record = draft().into_record().unwrap();
        assert_eq!(record.band_weights, vec![6200.0, 300.0]);
        assert!((record.band_amounts[0] - 167.4).abs() < 1e-9);
        assert_eq!(record.pre_tax_amount, 164.89);
        assert_eq!(record.tax, 50.0);
        assert_eq!(record.final_amount, 214.89);
    }

    #[test]
    fn test_tax_is_flat() {
        let mut d = draft();
        d.tax = 18.0;
        let totals = d.totals();
        assert_eq!(totals.final_amount, round_currency(totals.pre_tax + 18.0));
    }

    #[test]
    fn test_discount_one_percent() {
        let totals = compose(&[1000.0], &DiscountSelector::One, 0.0);
        assert_eq!(totals.pre_tax, 990.0);
    }

    #[test]
    fn test_dust_is_never_priced() {
        let rows = price_rows(&[], 20.0, 5.0, &[]);
        assert!(rows.is_empty());
        assert_eq!(compose(&[], &DiscountSelector::None, 10.0).final_amount, 10.0);
    }

    #[test]
    fn test_missing_quality_counts_as_zero() {
        let rows = price_rows(&[1000.0, 2000.0], 10.0, 0.0, &[5.0]);
        assert_eq!(rows[0].rate, 15.0);
        assert_eq!(rows[1].rate, 10.0);
        assert_eq!(rows[1].amount, 20.0);
    }

    #[test]
    fn test_record_quality_padded_to_band_count() {
        let mut d = draft();
        d.breakdown = resolve_breakdown(&[Some(1000.0), None, Some(500.0)], 6500.0);
        let record = d.into_record().unwrap();
        assert_eq!(record.quality_adj, vec![2.0, 0.0]);
        assert_eq!(record.band_amounts.len(), 2);
    }

    #[test]
    fn test_rejects_missing_party() {
        let mut d = draft();
        d.party_name = "   ".to_string();
        assert_eq!(d.into_record(), Err(ValidationError::MissingParty));
    }

    #[test]
    fn test_rejects_zero_gross() {
        let mut d = draft();
        d.gross_weight = 0.0;
        assert_eq!(d.into_record(), Err(ValidationError::NonPositiveGrossWeight(0.0)));
    }

    #[test]
    fn test_rejects_unpriced_delivery() {
        let mut d = draft();
        d.rate1 = 0.0;
        d.rate2 = 0.0;
        d.quality_adj = vec![0.0];
        assert_eq!(d.into_record(), Err(ValidationError::NonPositiveAmount(0.0)));
    }

    #[test]
    fn test_rejects_overflowing_amounts() {
        let mut d = draft();
        d.rate1 = 1e308;
        d.rate2 = 1e308;
        assert!(d.totals().final_amount.is_infinite());
        assert_eq!(d.into_record(), Err(ValidationError::NonFiniteValue("band amount")));
    }

    #[test]
    fn test_rejects_negative_band() {
        let mut d = draft();
        d.breakdown = resolve_breakdown(&[Some(1000.0), Some(-300.0)], 6500.0);
        assert_eq!(d.into_record(), Err(ValidationError::NegativeBandWeight(-300.0)));
    }

    proptest! {
        #[test]
        fn band_amount_is_linear_in_weight(w in 0.0f64..100_000.0, rate in 0.0f64..10_000.0, k in 0.0f64..10.0) {
            let scaled = band_amount(w * k, rate);
            let expected = band_amount(w, rate) * k;
            prop_assert!((scaled - expected).abs() <= 1e-6 * expected.abs().max(1.0));
        }

        #[test]
        fn band_amount_is_linear_in_rate(w in 0.0f64..100_000.0, rate in 0.0f64..10_000.0, k in 0.0f64..10.0) {
            let scaled = band_amount(w, rate * k);
            let expected = band_amount(w, rate) * k;
            prop_assert!((scaled - expected).abs() <= 1e-6 * expected.abs().max(1.0));
        }

        #[test]
        fn no_discount_keeps_sum(amounts in proptest::collection::vec(0.0f64..100_000.0, 0..5)) {
            let totals = compose(&amounts, &DiscountSelector::None, 0.0);
            let sum: f64 = amounts.iter().sum();
            prop_assert!((totals.pre_tax - sum).abs() <= 0.005 + 1e-9);
        }

        #[test]
        fn final_is_pre_tax_plus_tax(
            amounts in proptest::collection::vec(0.0f64..100_000.0, 0..5),
            tax in 0.0f64..10_000.0,
            selector in prop_oneof![Just("1.5"), Just("1"), Just("N"), Just("7")],
        ) {
            let totals = compose(&amounts, &DiscountSelector::parse(selector), tax);
            prop_assert!((totals.final_amount - (totals.pre_tax + totals.tax)).abs() <= 0.005 + 1e-9);
        }
    }
}
