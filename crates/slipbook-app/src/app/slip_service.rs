//! Slip entry: one truck delivery from typed input to a saved record

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use slipbook_domain::model::{DeliveryRecord, DiscountSelector};
use slipbook_domain::service::{DeliveryDraft, WeightEntryReducer};
use slipbook_types::Result;

use crate::AppContext;

/// Raw input of one delivery as typed by the operator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlipEntry {
    pub party_name: String,
    pub truck_id: String,
    pub gross_weight: f64,
    /// Band weights in entry order. Entry stops at the first zero.
    pub bands: Vec<String>,
    pub rate1: f64,
    pub rate2: f64,
    pub quality_adj: Vec<f64>,
    pub discount: DiscountSelector,
    pub tax: f64,
}

impl SlipEntry {
    /// Resolve the bands and assemble a draft ready to price.
    pub fn to_draft(&self) -> DeliveryDraft {
        let mut reducer = WeightEntryReducer::new(self.gross_weight);
        for text in &self.bands {
            reducer.push(text);
        }
        DeliveryDraft {
            party_name: self.party_name.clone(),
            truck_id: self.truck_id.clone(),
            gross_weight: self.gross_weight,
            breakdown: reducer.into_breakdown(),
            rate1: self.rate1,
            rate2: self.rate2,
            quality_adj: self.quality_adj.clone(),
            discount: self.discount.clone(),
            tax: self.tax,
        }
    }
}

/// Price and save one delivery under the party's key for `date`.
pub fn save_delivery(ctx: &AppContext, date: NaiveDate, entry: &SlipEntry) -> Result<DeliveryRecord> {
    let record = entry.to_draft().into_record()?;
    let key = ctx.parties.resolve_key(&record.party_name);
    ctx.gateway().save_delivery(date, &key, &record);
    info!(
        %date,
        party = %record.party_name,
        key = %key,
        truck = %record.truck_id,
        final_amount = record.final_amount,
        "saved delivery"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{context, date};
    use slipbook_types::{Error, ValidationError};

    fn entry() -> SlipEntry {
        SlipEntry {
            party_name: "Patel".to_string(),
            truck_id: "MH12 AB 1234".to_string(),
            gross_weight: 6500.0,
            bands: vec!["1200".to_string(), "300".to_string(), "0".to_string()],
            rate1: 20.0,
            rate2: 5.0,
            quality_adj: vec![2.0],
            discount: DiscountSelector::OnePointFive,
            tax: 50.0,
        }
    }

    #[test]
    fn test_save_known_party_under_id() {
        let (_dir, mut ctx) = context();
        ctx.parties.add("Patel").unwrap();
        let record = save_delivery(&ctx, date(), &entry()).unwrap();
        assert_eq!(record.final_amount, 214.89);

        let stored = ctx.gateway().load_deliveries();
        assert_eq!(stored["2025-03-14"]["1"], vec![record]);
    }

    #[test]
    fn test_save_unknown_party_under_name() {
        let (_dir, ctx) = context();
        save_delivery(&ctx, date(), &entry()).unwrap();
        let stored = ctx.gateway().load_deliveries();
        assert!(stored["2025-03-14"].contains_key("Patel"));
    }

    #[test]
    fn test_bands_after_sentinel_are_ignored() {
        let mut input = entry();
        input.bands.push("999".to_string());
        let draft = input.to_draft();
        assert_eq!(draft.breakdown.band_weights(), vec![6200.0, 300.0]);
    }

    #[test]
    fn test_validation_blocks_save() {
        let (_dir, ctx) = context();
        let mut input = entry();
        input.gross_weight = 0.0;
        let err = save_delivery(&ctx, date(), &input).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::NonPositiveGrossWeight(_))
        ));
        assert!(ctx.gateway().load_deliveries().is_empty());
    }

    #[test]
    fn test_overflowing_rates_keep_store_readable() {
        let (_dir, ctx) = context();
        save_delivery(&ctx, date(), &entry()).unwrap();

        let mut huge = entry();
        huge.truck_id = "T2".to_string();
        huge.rate1 = slipbook_types::parse_amount("1e308");
        huge.rate2 = huge.rate1;
        let err = save_delivery(&ctx, date(), &huge).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::NonFiniteValue(_))));

        let mut next = entry();
        next.truck_id = "T3".to_string();
        save_delivery(&ctx, date(), &next).unwrap();
        assert_eq!(ctx.gateway().load_deliveries()["2025-03-14"]["Patel"].len(), 2);
    }
}
