//! Domain services

pub mod allocation;
pub mod ledger_aggregator;
pub mod pricing;
pub mod weight_breakdown;

pub use allocation::{project, AllocationColumn, AllocationRow, AllocationView, DeliveryTotals};
pub use ledger_aggregator::{parse_operation, LedgerSession, LedgerState};
pub use pricing::{compose, price_rows, DeliveryDraft, PriceRow, Totals};
pub use weight_breakdown::{resolve_breakdown, BandBreakdown, WeightEntryReducer};
