//! Hand-authored insight cards. Scenarios swap the whole list at once.

use serde::{Deserialize, Serialize};

/// Colour class shared by insights and feed events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Critical,
    Warning,
    Opportunity,
    Success,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical    => "critical",
            Self::Warning     => "warning",
            Self::Opportunity => "opportunity",
            Self::Success     => "success",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub id:       u32,
    pub kind:     SignalKind,
    pub category: String,
    pub title:    String,
    pub message:  String,
    pub action:   String,
}

impl Insight {
    pub fn new(
        id: u32,
        kind: SignalKind,
        category: &str,
        title: &str,
        message: &str,
        action: &str,
    ) -> Self {
        Self {
            id,
            kind,
            category: category.to_string(),
            title:    title.to_string(),
            message:  message.to_string(),
            action:   action.to_string(),
        }
    }
}

/// The insight panel shown before any scenario is applied.
pub fn seed_insights() -> Vec<Insight> {
    vec![
        Insight::new(
            1,
            SignalKind::Critical,
            "Customer Success",
            "Churn Risk Alert",
            "3 customers showing high churn probability. $47K MRR at risk.",
            "Schedule intervention calls immediately",
        ),
        Insight::new(
            2,
            SignalKind::Opportunity,
            "Revenue Growth",
            "Expansion Opportunity",
            "CloudServ Inc at 95% plan capacity. Ready for upsell conversation.",
            "Trigger expansion workflow",
        ),
        Insight::new(
            3,
            SignalKind::Warning,
            "Product Performance",
            "API Response Time",
            "Response time increased 15% over baseline. Monitor for customer impact.",
            "Review infrastructure scaling",
        ),
    ]
}
