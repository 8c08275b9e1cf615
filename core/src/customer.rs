//! Customer health records and the health → risk threshold function.
//!
//! INVARIANT: a customer's `risk` is always `RiskLevel::for_health(health)`.
//! Every write path goes through `Customer::with_health`, which recomputes
//! both fields together.

use serde::{Deserialize, Serialize};

pub const HEALTH_MAX: u8 = 100;
pub const CRITICAL_BELOW: u8 = 40;
pub const MEDIUM_BELOW: u8 = 70;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    Critical,
}

impl RiskLevel {
    /// `< 40` Critical, `< 70` Medium, otherwise Low.
    pub fn for_health(health: u8) -> Self {
        if health < CRITICAL_BELOW {
            Self::Critical
        } else if health < MEDIUM_BELOW {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Display-only direction arrow carried with each account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Stable,
    Declining,
    Growing,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "CustomerFields")]
pub struct Customer {
    pub id:     String,
    pub name:   String,
    pub plan:   String,
    pub mrr:    f64,
    health:     u8,
    risk:       RiskLevel,
    pub trend:  Trend,
}

impl Customer {
    pub fn new(id: &str, name: &str, plan: &str, mrr: f64, health: u8, trend: Trend) -> Self {
        let health = health.min(HEALTH_MAX);
        Self {
            id:    id.to_string(),
            name:  name.to_string(),
            plan:  plan.to_string(),
            mrr,
            health,
            risk:  RiskLevel::for_health(health),
            trend,
        }
    }

    pub fn health(&self) -> u8 { self.health }
    pub fn risk(&self) -> RiskLevel { self.risk }

    /// Copy with a new health score and the matching risk label.
    /// Scores above 100 saturate.
    pub fn with_health(&self, health: u8) -> Self {
        let health = health.min(HEALTH_MAX);
        Self {
            health,
            risk: RiskLevel::for_health(health),
            ..self.clone()
        }
    }
}

/// Wire shape of a customer. Any `risk` on the wire is ignored and
/// re-derived from `health`.
#[derive(Deserialize)]
struct CustomerFields {
    id:     String,
    name:   String,
    plan:   String,
    mrr:    f64,
    health: u8,
    trend:  Trend,
}

impl From<CustomerFields> for Customer {
    fn from(f: CustomerFields) -> Self {
        Customer::new(&f.id, &f.name, &f.plan, f.mrr, f.health, f.trend)
    }
}

/// How a scenario reshapes every customer's health score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthTransform {
    Unchanged,
    /// `max(floor, health - delta)`
    DropWithFloor { delta: u8, floor: u8 },
    /// `min(ceiling, health + delta)`
    RaiseWithCeiling { delta: u8, ceiling: u8 },
}

impl HealthTransform {
    pub fn apply(&self, health: u8) -> u8 {
        match *self {
            Self::Unchanged => health,
            Self::DropWithFloor { delta, floor } => health.saturating_sub(delta).max(floor),
            Self::RaiseWithCeiling { delta, ceiling } => health.saturating_add(delta).min(ceiling),
        }
    }

    pub fn apply_to(&self, customer: &Customer) -> Customer {
        customer.with_health(self.apply(customer.health))
    }
}

pub fn seed_customers() -> Vec<Customer> {
    vec![
        Customer::new("CUST-1001", "TechCorp Solutions",  "Enterprise",   8_500.0,  85, Trend::Stable),
        Customer::new("CUST-1002", "DataFlow Industries", "Professional", 3_200.0,  25, Trend::Declining),
        Customer::new("CUST-1003", "CloudServ Inc",       "Enterprise",   12_000.0, 95, Trend::Growing),
        Customer::new("CUST-1004", "StartupX",            "Starter",      899.0,    62, Trend::Stable),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exclusive_upper_bounds() {
        assert_eq!(RiskLevel::for_health(0), RiskLevel::Critical);
        assert_eq!(RiskLevel::for_health(39), RiskLevel::Critical);
        assert_eq!(RiskLevel::for_health(40), RiskLevel::Medium);
        assert_eq!(RiskLevel::for_health(69), RiskLevel::Medium);
        assert_eq!(RiskLevel::for_health(70), RiskLevel::Low);
        assert_eq!(RiskLevel::for_health(100), RiskLevel::Low);
    }

    #[test]
    fn seed_risk_follows_health() {
        for c in seed_customers() {
            assert_eq!(c.risk(), RiskLevel::for_health(c.health()), "{}", c.id);
        }
    }

    #[test]
    fn drop_with_floor_does_not_underflow() {
        let t = HealthTransform::DropWithFloor { delta: 50, floor: 15 };
        assert_eq!(t.apply(25), 15);
        assert_eq!(t.apply(85), 35);
    }

    #[test]
    fn deserialized_risk_is_rederived_from_health() {
        let json = r#"{"id":"CUST-1","name":"Acme","plan":"Starter","mrr":100.0,
                       "health":20,"risk":"Low","trend":"stable"}"#;

        let c: Customer = serde_json::from_str(json).unwrap();

        assert_eq!(c.health(), 20);
        assert_eq!(c.risk(), RiskLevel::Critical);
    }

    #[test]
    fn with_health_saturates_at_100() {
        let c = seed_customers().remove(0).with_health(140);
        assert_eq!(c.health(), 100);
        assert_eq!(c.risk(), RiskLevel::Low);
    }
}
