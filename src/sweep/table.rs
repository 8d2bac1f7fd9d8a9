//! Tabular sweep output

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rates::{AprComponent, Market, MarketPair};

/// The independent variable varied by a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAxis {
    Utilization,
    BorrowRate,
    LendRate,
}

impl SweepAxis {
    /// Column name used for the independent variable in exported tables
    pub fn column(&self) -> &'static str {
        match self {
            SweepAxis::Utilization => "utilization_rate",
            SweepAxis::BorrowRate => "borrow_rate",
            SweepAxis::LendRate => "lend_rate",
        }
    }

    /// File name stem shared by every artifact written for this axis
    pub fn file_stem(&self) -> &'static str {
        match self {
            SweepAxis::Utilization => "apr_by_utilization",
            SweepAxis::BorrowRate => "apr_by_borrow_rate",
            SweepAxis::LendRate => "apr_by_lend_rate",
        }
    }

    /// Human readable axis title
    pub fn title(&self) -> &'static str {
        match self {
            SweepAxis::Utilization => "Utilization Rate",
            SweepAxis::BorrowRate => "Borrow Rate",
            SweepAxis::LendRate => "Lend Rate",
        }
    }
}

impl fmt::Display for SweepAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One sample point of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    /// Value of the swept variable
    pub x: f64,
    pub market: Market,
    #[serde(rename = "apr_type")]
    pub component: AprComponent,
    pub value: f64,
}

/// Ordered rows produced by one sweep
///
/// Each sample contributes six rows: lent and unlent APR for the base
/// then wrapper market, followed by the borrow APR of each market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepTable {
    pub axis: SweepAxis,
    pub rows: Vec<SweepRow>,
}

/// Rows emitted per sample
pub const ROWS_PER_SAMPLE: usize = 6;

impl SweepTable {
    pub fn new(axis: SweepAxis) -> Self {
        Self {
            axis,
            rows: Vec::new(),
        }
    }

    pub fn with_capacity(axis: SweepAxis, samples: usize) -> Self {
        Self {
            axis,
            rows: Vec::with_capacity(samples * ROWS_PER_SAMPLE),
        }
    }

    /// Append the six rows for one sample
    pub fn push_sample(&mut self, x: f64, pair: &MarketPair) {
        for market in Market::ALL {
            let rates = pair.get(market);
            for component in [AprComponent::LentApr, AprComponent::UnlentApr] {
                self.rows.push(SweepRow {
                    x,
                    market,
                    component,
                    value: rates.component(component),
                });
            }
        }

        for market in Market::ALL {
            self.rows.push(SweepRow {
                x,
                market,
                component: AprComponent::BorrowApr,
                value: pair.get(market).borrow_apr,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of sampled x values
    pub fn sample_count(&self) -> usize {
        self.rows.len() / ROWS_PER_SAMPLE
    }

    /// Distinct swept values in generation order
    pub fn axis_values(&self) -> Vec<f64> {
        self.rows
            .chunks(ROWS_PER_SAMPLE)
            .filter_map(|chunk| chunk.first().map(|row| row.x))
            .collect()
    }

    /// Values of one market/component in x order
    pub fn series(&self, market: Market, component: AprComponent) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|row| row.market == market && row.component == component)
            .map(|row| row.value)
            .collect()
    }

    /// Lent and unlent APR rows
    pub fn apr_rows(&self) -> impl Iterator<Item = &SweepRow> {
        self.rows
            .iter()
            .filter(|row| row.component != AprComponent::BorrowApr)
    }

    /// Borrow APR rows
    pub fn borrow_rows(&self) -> impl Iterator<Item = &SweepRow> {
        self.rows
            .iter()
            .filter(|row| row.component == AprComponent::BorrowApr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::compute_forward;

    #[test]
    fn test_file_stems() {
        assert_eq!(SweepAxis::Utilization.file_stem(), "apr_by_utilization");
        assert_eq!(SweepAxis::BorrowRate.file_stem(), "apr_by_borrow_rate");
        assert_eq!(SweepAxis::LendRate.file_stem(), "apr_by_lend_rate");
    }

    #[test]
    fn test_push_sample_row_order() {
        let mut table = SweepTable::new(SweepAxis::Utilization);
        table.push_sample(0.85, &compute_forward(0.85, 0.10, 0.08));

        let order: Vec<(Market, AprComponent)> =
            table.rows.iter().map(|r| (r.market, r.component)).collect();
        assert_eq!(
            order,
            vec![
                (Market::Base, AprComponent::LentApr),
                (Market::Base, AprComponent::UnlentApr),
                (Market::Wrapper, AprComponent::LentApr),
                (Market::Wrapper, AprComponent::UnlentApr),
                (Market::Base, AprComponent::BorrowApr),
                (Market::Wrapper, AprComponent::BorrowApr),
            ]
        );
        assert!(table.rows.iter().all(|r| r.x == 0.85));
    }

    #[test]
    fn test_series_and_axis_values() {
        let mut table = SweepTable::new(SweepAxis::BorrowRate);
        for &b in &[0.0, 0.01, 0.02] {
            table.push_sample(b, &compute_forward(0.5, b, 0.08));
        }

        assert_eq!(table.sample_count(), 3);
        assert_eq!(table.axis_values(), vec![0.0, 0.01, 0.02]);
        assert_eq!(
            table.series(Market::Wrapper, AprComponent::BorrowApr),
            vec![0.0, 0.01, 0.02]
        );
        assert_eq!(table.apr_rows().count(), 12);
        assert_eq!(table.borrow_rows().count(), 6);
    }

    #[test]
    fn test_row_serializes_apr_type() {
        let row = SweepRow {
            x: 0.5,
            market: Market::Base,
            component: AprComponent::LentApr,
            value: 0.05,
        };
        let json = serde_json::to_value(row).unwrap();
        assert_eq!(json["apr_type"], "lentAPR");
        assert_eq!(json["market"], "frxUSD");
    }
}
