//! Static sales pipeline and financial-health panels. Display data only:
//! no transition ever writes to these.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DealStage {
    Discovery,
    Proposal,
    Negotiation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deal {
    pub company:     String,
    pub value:       f64,
    pub stage:       DealStage,
    /// Close probability, percent.
    pub probability: u8,
}

impl Deal {
    fn new(company: &str, value: f64, stage: DealStage, probability: u8) -> Self {
        Self { company: company.to_string(), value, stage, probability }
    }

    pub fn weighted_value(&self) -> f64 {
        self.value * f64::from(self.probability) / 100.0
    }
}

pub fn seed_deals() -> Vec<Deal> {
    vec![
        Deal::new("ProTech Industries", 45_000.0, DealStage::Proposal,    75),
        Deal::new("DataMax Corp",       28_000.0, DealStage::Discovery,   40),
        Deal::new("CloudFirst Ltd",     67_000.0, DealStage::Negotiation, 85),
        Deal::new("InnovateNow",        89_000.0, DealStage::Negotiation, 90),
    ]
}

/// Probability-weighted value of a set of deals.
pub fn weighted_pipeline(deals: &[Deal]) -> f64 {
    deals.iter().map(Deal::weighted_value).sum()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialHealth {
    pub arr:                   f64,
    pub net_revenue_retention: f64, // percent
    pub churn_rate:            f64, // percent
    pub ltv_to_cac:            f64,
    pub gross_margin:          f64, // percent
    pub runway_months:         f64,
}

impl FinancialHealth {
    pub fn seed() -> Self {
        Self {
            arr:                   1_556_400.0,
            net_revenue_retention: 112.8,
            churn_rate:            2.6,
            ltv_to_cac:            4.1,
            gross_margin:          81.3,
            runway_months:         7.9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_pipeline_sums_probability_weighted_values() {
        // 33 750 + 11 200 + 56 950 + 80 100
        let total = weighted_pipeline(&seed_deals());
        assert!((total - 182_000.0).abs() < 1e-6, "got {total}");
    }
}
