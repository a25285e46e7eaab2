use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-band risk category derived from the final probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskCategory {
    /// Below 0.4 is low, 0.4 through 0.6 inclusive is moderate, above is high.
    pub fn from_probability(p: f64) -> Self {
        if p < 0.4 {
            RiskCategory::Low
        } else if p <= 0.6 {
            RiskCategory::Moderate
        } else {
            RiskCategory::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low Risk",
            RiskCategory::Moderate => "Moderate Risk",
            RiskCategory::High => "High Risk",
        }
    }

    /// CSS class used by the results page.
    pub fn css_class(&self) -> &'static str {
        match self {
            RiskCategory::Low => "risk-low",
            RiskCategory::Moderate => "risk-moderate",
            RiskCategory::High => "risk-high",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category label for a probability.
pub fn risk_category(p: f64) -> &'static str {
    RiskCategory::from_probability(p).label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_exact() {
        assert_eq!(risk_category(0.39), "Low Risk");
        assert_eq!(risk_category(0.4), "Moderate Risk");
        assert_eq!(risk_category(0.6), "Moderate Risk");
        assert_eq!(risk_category(0.61), "High Risk");
        assert_eq!(risk_category(0.0), "Low Risk");
        assert_eq!(risk_category(1.0), "High Risk");
    }

    #[test]
    fn serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&RiskCategory::Moderate).unwrap(),
            "\"Moderate Risk\""
        );
        assert_eq!(RiskCategory::High.to_string(), "High Risk");
    }
}
