//! Purchase book projection
//!
//! Spreads a ledger's adjustments evenly over the deliveries of the same
//! party and date. Nothing produced here is persisted.

use serde::{Deserialize, Serialize};

use crate::directory::ShortcutDirectory;
use crate::model::{DeliveryRecord, LedgerRecord};

/// A shortcut shown as its own column in the purchase book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationColumn {
    pub code: String,
    pub label: String,
}

/// One adjustment column's share of a single delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnShare {
    /// Unsigned per-delivery amount, as displayed.
    pub amount: f64,
    /// Per-delivery amount with the adjustment signs applied.
    pub signed: f64,
}

/// Figures printed once per delivery, on its centre row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTotals {
    pub truck_id: String,
    pub pre_tax: f64,
    pub tax: f64,
    pub final_amount: f64,
    /// One entry per column of the view.
    pub shares: Vec<ColumnShare>,
    pub allocated_final: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    /// Set on the first row of the party.
    pub party_name: Option<String>,
    /// Set on the first row of each delivery.
    pub gross_weight: Option<f64>,
    pub band_weight: f64,
    /// `None` on the dust row of a delivery without priced bands.
    pub rate: Option<f64>,
    pub band_amount: f64,
    pub totals: Option<DeliveryTotals>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationView {
    pub columns: Vec<AllocationColumn>,
    pub rows: Vec<AllocationRow>,
}

impl AllocationView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append another party's rows. Columns are kept from `self`.
    pub fn extend(&mut self, other: AllocationView) {
        if self.columns.is_empty() {
            self.columns = other.columns;
        }
        self.rows.extend(other.rows);
    }
}

/// Per-delivery share of every column. Adjustments with the same code are
/// summed; codes absent from the ledger share zero. Empty when `delivery_count` is 0.
pub fn column_shares(
    columns: &[AllocationColumn],
    ledger: Option<&LedgerRecord>,
    delivery_count: usize,
) -> Vec<ColumnShare> {
    if delivery_count == 0 {
        return Vec::new();
    }
    let n = delivery_count as f64;
    columns
        .iter()
        .map(|column| {
            let (amount, signed) = ledger
                .map(|record| {
                    record
                        .adjustments
                        .iter()
                        .filter(|a| a.shortcut_code == column.code)
                        .fold((0.0, 0.0), |(amount, signed), a| {
                            (amount + a.amount, signed + a.signed_amount())
                        })
                })
                .unwrap_or((0.0, 0.0));
            ColumnShare {
                amount: amount / n,
                signed: signed / n,
            }
        })
        .collect()
}

/// Build the purchase book rows of one party on one date.
pub fn project(
    party_name: &str,
    deliveries: &[DeliveryRecord],
    ledger: Option<&LedgerRecord>,
    shortcuts: &ShortcutDirectory,
) -> AllocationView {
    let columns = shortcuts.allocation_columns();
    let shares = column_shares(&columns, ledger, deliveries.len());
    let adjustment: f64 = shares.iter().map(|s| s.signed).sum();

    let mut rows = Vec::new();
    for delivery in deliveries {
        let mut band_rows: Vec<AllocationRow> = delivery
            .priced_weights()
            .iter()
            .enumerate()
            .map(|(i, &weight)| AllocationRow {
                party_name: None,
                gross_weight: None,
                band_weight: weight,
                rate: Some(delivery.effective_rate(i)),
                band_amount: delivery.band_amounts.get(i).copied().unwrap_or(0.0),
                totals: None,
            })
            .collect();
        if band_rows.is_empty() {
            band_rows.push(AllocationRow {
                party_name: None,
                gross_weight: None,
                band_weight: delivery.dust_weight(),
                rate: None,
                band_amount: 0.0,
                totals: None,
            });
        }

        band_rows[0].gross_weight = Some(delivery.gross_weight);
        let centre = band_rows.len() / 2;
        band_rows[centre].totals = Some(DeliveryTotals {
            truck_id: delivery.truck_id.clone(),
            pre_tax: delivery.pre_tax_amount,
            tax: delivery.tax,
            final_amount: delivery.final_amount,
            shares: shares.clone(),
            allocated_final: delivery.final_amount + adjustment,
        });
        rows.extend(band_rows);
    }

    if let Some(first) = rows.first_mut() {
        first.party_name = Some(party_name.to_string());
    }

    AllocationView { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Adjustment, DiscountSelector, Shortcut, Sign};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn delivery(truck: &str, bands: Vec<f64>, final_amount: f64) -> DeliveryRecord {
        let priced = bands.len().saturating_sub(1);
        DeliveryRecord {
            party_name: "Patel".to_string(),
            truck_id: truck.to_string(),
            gross_weight: bands.iter().sum(),
            band_amounts: bands[..priced].iter().map(|w| w * 25.0 / 1000.0).collect(),
            band_weights: bands,
            rate1: 20.0,
            rate2: 5.0,
            quality_adj: vec![0.0; priced],
            discount: DiscountSelector::None,
            pre_tax_amount: final_amount,
            tax: 0.0,
            final_amount,
        }
    }

    fn shortcuts() -> ShortcutDirectory {
        ShortcutDirectory::from_shortcuts(vec![
            Shortcut::new("H", "Hamali", Sign::Minus).with_allocation_view(true),
            Shortcut::new("R", "Rent", Sign::Minus),
            Shortcut::new("C", "Commission", Sign::Plus).with_allocation_view(true),
        ])
    }

    fn ledger(adjustments: Vec<(f64, &str, Sign)>) -> LedgerRecord {
        LedgerRecord {
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            party_name: "Patel".to_string(),
            base_total: 0.0,
            adjustments: adjustments
                .into_iter()
                .map(|(amount, code, sign)| Adjustment {
                    amount,
                    shortcut_code: code.to_string(),
                    label: code.to_string(),
                    sign,
                })
                .collect(),
            settled_total: 0.0,
        }
    }

    #[test]
    fn test_rows_per_priced_band() {
        let deliveries = vec![
            delivery("T1", vec![4000.0, 2000.0, 1000.0, 100.0], 175.0),
            delivery("T2", vec![3000.0, 50.0], 75.0),
        ];
        let view = project("Patel", &deliveries, None, &shortcuts());
        assert_eq!(view.rows.len(), 4);
        assert_eq!(view.columns.len(), 2);
        assert_eq!(view.columns[0].code, "H");
        assert_eq!(view.columns[1].code, "C");

        assert_eq!(view.rows[0].party_name.as_deref(), Some("Patel"));
        assert!(view.rows[1..].iter().all(|r| r.party_name.is_none()));

        assert_eq!(view.rows[0].gross_weight, Some(7100.0));
        assert_eq!(view.rows[3].gross_weight, Some(3050.0));

        // Three bands: totals on the middle one
        assert!(view.rows[0].totals.is_none());
        assert_eq!(view.rows[1].totals.as_ref().unwrap().truck_id, "T1");
        assert!(view.rows[2].totals.is_none());
        assert_eq!(view.rows[3].totals.as_ref().unwrap().truck_id, "T2");
    }

    #[test]
    fn test_even_split_and_allocated_final() {
        let deliveries = vec![
            delivery("T1", vec![4000.0, 100.0], 100.0),
            delivery("T2", vec![3000.0, 50.0], 75.0),
        ];
        let record = ledger(vec![
            (200.0, "H", Sign::Minus),
            (500.0, "R", Sign::Minus),
            (30.0, "C", Sign::Plus),
            (10.0, "C", Sign::Plus),
        ]);
        let view = project("Patel", &deliveries, Some(&record), &shortcuts());
        let totals = view.rows[0].totals.as_ref().unwrap();
        assert_eq!(totals.shares[0].amount, 100.0);
        assert_eq!(totals.shares[1].amount, 20.0);
        // Rent is not in the view and does not move the allocated final
        assert_eq!(totals.allocated_final, 100.0 - 100.0 + 20.0);
    }

    #[test]
    fn test_snapshotted_sign_wins() {
        let deliveries = vec![delivery("T1", vec![1000.0, 0.0], 25.0)];
        // Hamali is a minus shortcut now, but was a plus when entered
        let record = ledger(vec![(10.0, "H", Sign::Plus)]);
        let view = project("Patel", &deliveries, Some(&record), &shortcuts());
        assert_eq!(view.rows[0].totals.as_ref().unwrap().allocated_final, 35.0);
    }

    #[test]
    fn test_dust_only_delivery_keeps_a_row() {
        let deliveries = vec![delivery("T9", vec![4200.0], 0.0)];
        let view = project("Patel", &deliveries, None, &shortcuts());
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].rate, None);
        assert_eq!(view.rows[0].band_weight, 4200.0);
        assert!(view.rows[0].totals.is_some());
    }

    #[test]
    fn test_no_deliveries_is_noop() {
        let record = ledger(vec![(200.0, "H", Sign::Minus)]);
        let view = project("Patel", &[], Some(&record), &shortcuts());
        assert!(view.is_empty());
        assert!(column_shares(&view.columns, Some(&record), 0).is_empty());
    }

    proptest! {
        #[test]
        fn shares_sum_to_adjustment(amount in 0.0f64..1_000_000.0, n in 1usize..40) {
            let columns = vec![AllocationColumn { code: "H".to_string(), label: "Hamali".to_string() }];
            let record = ledger(vec![(amount, "H", Sign::Minus)]);
            let shares = column_shares(&columns, Some(&record), n);
            let total = shares[0].amount * n as f64;
            prop_assert!((total - amount).abs() <= 1e-6 * amount.max(1.0));
        }
    }
}
