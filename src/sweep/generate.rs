//! Sweep generators
//!
//! Each generator varies one input over an evenly spaced grid and
//! tabulates both markets at every point. Output is deterministic.

use log::debug;

use super::table::{SweepAxis, SweepTable};
use crate::rates::{compute_forward, compute_inverse, MarketPair};

/// Utilization samples over [0, 1] (5% increments)
pub const DEFAULT_UTILIZATION_STEPS: usize = 21;

/// Upper bound for borrow rate sweeps
pub const DEFAULT_MAX_BORROW_RATE: f64 = 0.20;

/// Upper bound for lend rate sweeps
pub const DEFAULT_MAX_LEND_RATE: f64 = 0.20;

/// Largest number of samples any sweep is allowed to take
pub const MAX_SWEEP_SAMPLES: usize = 101;

/// `count` evenly spaced values from `start` to `end` inclusive
///
/// The last value is exactly `end`. A count of one yields `[start]`.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            values[count - 1] = end;
            values
        }
    }
}

/// Number of 1% samples from 0 to `max_rate` inclusive
///
/// The float cast saturates: negative or NaN maxima give a single sample
/// and an infinite maximum gives `usize::MAX`.
pub fn percent_steps(max_rate: f64) -> usize {
    ((max_rate * 100.0).round() as usize).saturating_add(1)
}

fn tabulate<F>(axis: SweepAxis, xs: &[f64], compute: F) -> SweepTable
where
    F: Fn(f64) -> MarketPair,
{
    let mut table = SweepTable::with_capacity(axis, xs.len());
    for &x in xs {
        table.push_sample(x, &compute(x));
    }

    debug!("{} sweep: {} samples, {} rows", axis, xs.len(), table.len());
    table
}

/// Sweep utilization over [0, 1] at a fixed borrow rate
pub fn sweep_utilization(borrow_rate: f64, wrapper_yield: f64, steps: usize) -> SweepTable {
    let utilizations = linspace(0.0, 1.0, steps);
    tabulate(SweepAxis::Utilization, &utilizations, |u| {
        compute_forward(u, borrow_rate, wrapper_yield)
    })
}

/// Sweep the borrow rate from 0 to `max_borrow_rate` in 1% steps at fixed utilization
pub fn sweep_borrow_rate(utilization: f64, wrapper_yield: f64, max_borrow_rate: f64) -> SweepTable {
    let borrow_rates = linspace(0.0, max_borrow_rate, percent_steps(max_borrow_rate));
    tabulate(SweepAxis::BorrowRate, &borrow_rates, |b| {
        compute_forward(utilization, b, wrapper_yield)
    })
}

/// Sweep the target lend rate from 0 to `max_lend_rate` in 1% steps at fixed utilization
///
/// Uses the inverse computation, so a zero utilization fills the borrow
/// columns with non-finite values.
pub fn sweep_lend_rate(utilization: f64, wrapper_yield: f64, max_lend_rate: f64) -> SweepTable {
    let lend_rates = linspace(0.0, max_lend_rate, percent_steps(max_lend_rate));
    tabulate(SweepAxis::LendRate, &lend_rates, |lend| {
        compute_inverse(utilization, lend, wrapper_yield)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{AprComponent, Market};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linspace_edges() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.3, 1.0, 1), vec![0.3]);
        assert_eq!(linspace(0.0, 1.0, 2), vec![0.0, 1.0]);

        let values = linspace(0.0, 0.2, 21);
        assert_eq!(values.len(), 21);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[20], 0.2);
        assert_abs_diff_eq!(values[5], 0.05, epsilon = 1e-15);
    }

    #[test]
    fn test_percent_steps() {
        assert_eq!(percent_steps(0.20), 21);
        assert_eq!(percent_steps(0.29), 30);
        assert_eq!(percent_steps(0.0), 1);
        assert_eq!(percent_steps(-0.1), 1);
        assert_eq!(percent_steps(f64::NAN), 1);
    }

    #[test]
    fn test_percent_steps_saturates_on_infinite_maximum() {
        assert_eq!(percent_steps(f64::INFINITY), usize::MAX);
        assert_eq!(percent_steps(1.0), MAX_SWEEP_SAMPLES);
    }

    #[test]
    fn test_sweep_utilization_shape() {
        let table = sweep_utilization(0.10, 0.08, DEFAULT_UTILIZATION_STEPS);
        assert_eq!(table.axis, SweepAxis::Utilization);
        assert_eq!(table.len(), 126);

        let xs = table.axis_values();
        assert_eq!(xs.len(), 21);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[20], 1.0);
        for pair in xs.windows(2) {
            assert_abs_diff_eq!(pair[1] - pair[0], 0.05, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sweep_utilization_values() {
        let table = sweep_utilization(0.10, 0.08, DEFAULT_UTILIZATION_STEPS);

        let unlent = table.series(Market::Wrapper, AprComponent::UnlentApr);
        assert_abs_diff_eq!(unlent[0], 0.08, epsilon = 1e-15);
        assert_abs_diff_eq!(unlent[20], 0.0, epsilon = 1e-15);

        let base_unlent = table.series(Market::Base, AprComponent::UnlentApr);
        assert!(base_unlent.iter().all(|&v| v == 0.0));

        let borrow = table.series(Market::Base, AprComponent::BorrowApr);
        assert!(borrow.iter().all(|&v| v == 0.10));
    }

    #[test]
    fn test_sweep_borrow_rate_shape() {
        let table = sweep_borrow_rate(0.85, 0.08, DEFAULT_MAX_BORROW_RATE);
        assert_eq!(table.axis, SweepAxis::BorrowRate);
        assert_eq!(table.len(), 126);

        let xs = table.axis_values();
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[20], 0.20);
        for pair in xs.windows(2) {
            assert_abs_diff_eq!(pair[1] - pair[0], 0.01, epsilon = 1e-12);
        }

        let lent = table.series(Market::Base, AprComponent::LentApr);
        for (x, lent) in xs.iter().zip(&lent) {
            assert_abs_diff_eq!(*lent, x * 0.85, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_sweep_lend_rate_uses_inverse() {
        let table = sweep_lend_rate(0.85, 0.08, DEFAULT_MAX_LEND_RATE);
        assert_eq!(table.axis, SweepAxis::LendRate);
        assert_eq!(table.len(), 126);

        let xs = table.axis_values();
        let base_borrow = table.series(Market::Base, AprComponent::BorrowApr);
        let wrapper_borrow = table.series(Market::Wrapper, AprComponent::BorrowApr);
        for i in 0..xs.len() {
            assert_abs_diff_eq!(base_borrow[i], xs[i] / 0.85, epsilon = 1e-12);
            assert_abs_diff_eq!(
                wrapper_borrow[i],
                (xs[i] - 0.08 * (1.0 - 0.85)) / 0.85,
                epsilon = 1e-12
            );
        }

        // Low lend targets are covered by idle yield alone
        assert!(wrapper_borrow[0] < 0.0);
    }

    #[test]
    fn test_sweep_lend_rate_zero_utilization_propagates() {
        let table = sweep_lend_rate(0.0, 0.08, 0.05);
        let base_borrow = table.series(Market::Base, AprComponent::BorrowApr);
        // 0 / 0 at the first sample, then +inf
        assert!(base_borrow[0].is_nan());
        assert!(base_borrow[1..].iter().all(|v| v.is_infinite()));
    }

    #[test]
    fn test_sweeps_are_deterministic() {
        assert_eq!(
            sweep_lend_rate(0.7, 0.05, 0.15),
            sweep_lend_rate(0.7, 0.05, 0.15)
        );
    }
}
