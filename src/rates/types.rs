//! Core types for market rate breakdowns

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two paired lending markets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    /// Plain frxUSD market; idle capital earns nothing
    #[serde(rename = "frxUSD")]
    Base,
    /// Yield-bearing sfrxUSD market; idle capital earns the wrapper yield
    #[serde(rename = "sfrxUSD")]
    Wrapper,
}

impl Market {
    /// Both markets in table order
    pub const ALL: [Market; 2] = [Market::Base, Market::Wrapper];

    pub fn label(&self) -> &'static str {
        match self {
            Market::Base => "frxUSD",
            Market::Wrapper => "sfrxUSD",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which field of a [`RateBreakdown`] a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AprComponent {
    #[serde(rename = "lentAPR")]
    LentApr,
    #[serde(rename = "unlentAPR")]
    UnlentApr,
    #[serde(rename = "borrowAPR")]
    BorrowApr,
}

impl AprComponent {
    pub fn label(&self) -> &'static str {
        match self {
            AprComponent::LentApr => "lentAPR",
            AprComponent::UnlentApr => "unlentAPR",
            AprComponent::BorrowApr => "borrowAPR",
        }
    }
}

impl fmt::Display for AprComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// APR breakdown for a single market under one scenario
///
/// All values are annual rates as decimals (0.05 = 5%). Nothing is
/// clamped: inverse solutions may be negative or non-finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBreakdown {
    /// Yield earned on the lent portion of capital
    #[serde(rename = "lentAPR")]
    pub lent_apr: f64,

    /// Yield earned on idle capital
    #[serde(rename = "unlentAPR")]
    pub unlent_apr: f64,

    /// Rate paid by borrowers
    #[serde(rename = "borrowAPR")]
    pub borrow_apr: f64,
}

impl RateBreakdown {
    pub fn new(lent_apr: f64, unlent_apr: f64, borrow_apr: f64) -> Self {
        Self {
            lent_apr,
            unlent_apr,
            borrow_apr,
        }
    }

    /// Total APR earned by a supplier (stacked bar height)
    pub fn total_supply_apr(&self) -> f64 {
        self.lent_apr + self.unlent_apr
    }

    pub fn component(&self, component: AprComponent) -> f64 {
        match component {
            AprComponent::LentApr => self.lent_apr,
            AprComponent::UnlentApr => self.unlent_apr,
            AprComponent::BorrowApr => self.borrow_apr,
        }
    }

    /// True when every field is a finite number
    pub fn is_finite(&self) -> bool {
        self.lent_apr.is_finite() && self.unlent_apr.is_finite() && self.borrow_apr.is_finite()
    }
}

/// Rate breakdowns for both markets computed from the same inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketPair {
    #[serde(rename = "frxUSDRates")]
    pub base: RateBreakdown,

    #[serde(rename = "sfrxUSDRates")]
    pub wrapper: RateBreakdown,
}

impl MarketPair {
    pub fn get(&self, market: Market) -> &RateBreakdown {
        match market {
            Market::Base => &self.base,
            Market::Wrapper => &self.wrapper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_supply_apr() {
        let rates = RateBreakdown::new(0.085, 0.012, 0.10);
        assert!((rates.total_supply_apr() - 0.097).abs() < 1e-12);
    }

    #[test]
    fn test_component_lookup() {
        let rates = RateBreakdown::new(0.01, 0.02, 0.03);
        assert_eq!(rates.component(AprComponent::LentApr), 0.01);
        assert_eq!(rates.component(AprComponent::UnlentApr), 0.02);
        assert_eq!(rates.component(AprComponent::BorrowApr), 0.03);
    }

    #[test]
    fn test_labels_match_serde_names() {
        assert_eq!(serde_json::to_string(&Market::Wrapper).unwrap(), "\"sfrxUSD\"");
        assert_eq!(serde_json::to_string(&AprComponent::UnlentApr).unwrap(), "\"unlentAPR\"");
        assert_eq!(Market::Base.to_string(), "frxUSD");
    }

    #[test]
    fn test_breakdown_wire_names() {
        let json = serde_json::to_value(RateBreakdown::new(0.1, 0.0, 0.2)).unwrap();
        assert_eq!(json["lentAPR"], 0.1);
        assert_eq!(json["borrowAPR"], 0.2);
    }

    #[test]
    fn test_is_finite() {
        assert!(RateBreakdown::new(0.1, 0.0, 0.2).is_finite());
        assert!(!RateBreakdown::new(f64::NAN, 0.0, 0.2).is_finite());
        assert!(!RateBreakdown::new(0.1, 0.0, f64::INFINITY).is_finite());
    }
}
