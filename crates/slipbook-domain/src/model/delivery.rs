use serde::{Deserialize, Serialize};

/// Dust discount picked for a delivery.
///
/// Stored on disk as the raw selector text (`"1.5"`, `"1"`, `"N"`, or
/// whatever the operator typed).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiscountSelector {
    #[default]
    OnePointFive,
    One,
    None,
    Custom(String),
}

impl DiscountSelector {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "1.5" => DiscountSelector::OnePointFive,
            "1" => DiscountSelector::One,
            "N" => DiscountSelector::None,
            other => DiscountSelector::Custom(other.to_string()),
        }
    }

    /// Multiplier applied to the summed band amounts.
    ///
    /// Custom selectors carry no discount.
    pub fn factor(&self) -> f64 {
        match self {
            DiscountSelector::OnePointFive => 0.985,
            DiscountSelector::One => 0.99,
            DiscountSelector::None | DiscountSelector::Custom(_) => 1.0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DiscountSelector::OnePointFive => "1.5",
            DiscountSelector::One => "1",
            DiscountSelector::None => "N",
            DiscountSelector::Custom(raw) => raw,
        }
    }
}

impl From<String> for DiscountSelector {
    fn from(raw: String) -> Self {
        DiscountSelector::parse(&raw)
    }
}

impl From<DiscountSelector> for String {
    fn from(selector: DiscountSelector) -> Self {
        selector.as_str().to_string()
    }
}

impl std::fmt::Display for DiscountSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One priced truck delivery (sub-slip). Immutable once saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub party_name: String,
    #[serde(rename = "truckNumber")]
    pub truck_id: String,
    #[serde(rename = "mainWeight")]
    pub gross_weight: f64,
    /// Resolved bands in kg; the last element is the dust band.
    #[serde(rename = "subWeights")]
    pub band_weights: Vec<f64>,
    #[serde(rename = "price1")]
    pub rate1: f64,
    #[serde(rename = "price2")]
    pub rate2: f64,
    /// One quality adjustment per priced band (currency per ton).
    #[serde(rename = "qualityValues")]
    pub quality_adj: Vec<f64>,
    #[serde(rename = "calculatedPrices")]
    pub band_amounts: Vec<f64>,
    #[serde(rename = "dustDiscount", default)]
    pub discount: DiscountSelector,
    #[serde(rename = "totalBeforeGst")]
    pub pre_tax_amount: f64,
    /// Flat currency amount, never a percentage.
    #[serde(rename = "gst")]
    pub tax: f64,
    pub final_amount: f64,
}

impl DeliveryRecord {
    /// Band weights that carry a price (everything but the dust band).
    pub fn priced_weights(&self) -> &[f64] {
        match self.band_weights.split_last() {
            Some((_, priced)) => priced,
            None => &[],
        }
    }

    pub fn dust_weight(&self) -> f64 {
        self.band_weights.last().copied().unwrap_or(0.0)
    }

    /// Name of the first field holding NaN or infinity, if any.
    ///
    /// JSON has no encoding for these, so such a record cannot be stored.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        let all_finite = |values: &[f64]| values.iter().all(|v| v.is_finite());
        [
            ("gross weight", self.gross_weight.is_finite()),
            ("band weight", all_finite(&self.band_weights)),
            ("rate", self.rate1.is_finite() && self.rate2.is_finite()),
            ("quality adjustment", all_finite(&self.quality_adj)),
            ("band amount", all_finite(&self.band_amounts)),
            ("amount before tax", self.pre_tax_amount.is_finite()),
            ("tax", self.tax.is_finite()),
            ("final amount", self.final_amount.is_finite()),
        ]
        .into_iter()
        .find_map(|(field, ok)| (!ok).then_some(field))
    }

    /// Effective rate (per 1000 kg) of priced band `index`.
    pub fn effective_rate(&self, index: usize) -> f64 {
        let quality = self.quality_adj.get(index).copied().unwrap_or(0.0);
        crate::service::pricing::effective_rate(self.rate1, self.rate2, quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_factor() {
        assert_eq!(DiscountSelector::parse("1.5").factor(), 0.985);
        assert_eq!(DiscountSelector::parse("1").factor(), 0.99);
        assert_eq!(DiscountSelector::parse("N").factor(), 1.0);
        assert_eq!(DiscountSelector::parse("2.5").factor(), 1.0);
    }

    #[test]
    fn test_discount_custom_keeps_text() {
        let selector = DiscountSelector::parse("3");
        assert_eq!(selector, DiscountSelector::Custom("3".to_string()));
        assert_eq!(selector.to_string(), "3");
    }

    #[test]
    fn test_discount_serializes_as_string() {
        let json = serde_json::to_string(&DiscountSelector::One).unwrap();
        assert_eq!(json, "\"1\"");
        let back: DiscountSelector = serde_json::from_str("\"N\"").unwrap();
        assert_eq!(back, DiscountSelector::None);
    }

    #[test]
    fn test_priced_weights_excludes_dust() {
        let record = DeliveryRecord {
            party_name: "Patel".to_string(),
            truck_id: "MH12 AB 1234".to_string(),
            gross_weight: 6500.0,
            band_weights: vec![4000.0, 2200.0, 300.0],
            rate1: 20.0,
            rate2: 5.0,
            quality_adj: vec![2.0, -1.0],
            band_amounts: vec![108.0, 52.8],
            discount: DiscountSelector::None,
            pre_tax_amount: 160.8,
            tax: 0.0,
            final_amount: 160.8,
        };
        assert_eq!(record.priced_weights(), &[4000.0, 2200.0]);
        assert_eq!(record.dust_weight(), 300.0);
        assert_eq!(record.effective_rate(1), 24.0);
        assert_eq!(record.effective_rate(5), 25.0);
    }
}
