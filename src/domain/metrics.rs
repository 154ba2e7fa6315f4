//! # Metrics Read Model
//!
//! Aggregate pricing figures derived from stored offers. Never persisted.

use serde::{Deserialize, Serialize};

/// Per-carrier aggregate over the selected quote population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierMetrics {
    /// Carrier name (grouping key).
    pub carrier_name: String,
    /// Number of offers from this carrier.
    pub total_quotes: u64,
    /// Sum of final prices.
    pub total_freight: f64,
    /// Mean final price.
    pub average_freight: f64,
}

/// Aggregate metrics response.
///
/// An empty population yields an empty `by_carrier` list and zero
/// min/max rather than missing fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsResponse {
    /// Per-carrier aggregates, ordered by carrier name ascending.
    pub by_carrier: Vec<CarrierMetrics>,
    /// Lowest final price across the population.
    #[serde(rename = "cheapest_overall")]
    pub cheapest: f64,
    /// Highest final price across the population.
    #[serde(rename = "most_expensive_overall")]
    pub most_expensive: f64,
}

impl MetricsResponse {
    /// Returns the total number of offers across all carriers.
    #[must_use]
    pub fn total_offers(&self) -> u64 {
        self.by_carrier.iter().map(|c| c.total_quotes).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_serializes_with_zeroes() {
        let value = serde_json::to_value(MetricsResponse::default()).unwrap();
        assert_eq!(
            value,
            json!({"by_carrier": [], "cheapest_overall": 0.0, "most_expensive_overall": 0.0})
        );
    }

    #[test]
    fn field_names_match_public_contract() {
        let resp = MetricsResponse {
            by_carrier: vec![CarrierMetrics {
                carrier_name: "Correios".into(),
                total_quotes: 2,
                total_freight: 41.98,
                average_freight: 20.99,
            }],
            cheapest: 17.0,
            most_expensive: 20.99,
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["by_carrier"][0]["carrier_name"], "Correios");
        assert_eq!(value["by_carrier"][0]["total_quotes"], 2);
        assert_eq!(value["cheapest_overall"], 17.0);
        assert_eq!(resp.total_offers(), 2);
    }
}
