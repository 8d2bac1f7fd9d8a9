//! Forward and inverse rate calculations
//!
//! Inputs are not range-checked: callers supply utilization in [0, 1] and
//! non-negative rates. Division by a zero utilization in the inverse
//! follows IEEE-754 and yields infinities or NaN; use
//! [`try_compute_inverse`] to reject that case instead.

use super::error::RateError;
use super::types::{MarketPair, RateBreakdown};

/// Yield earned by idle wrapper capital
fn idle_yield(utilization: f64, wrapper_yield: f64) -> f64 {
    wrapper_yield * (1.0 - utilization)
}

/// Compute both markets' APR breakdown from a borrow rate
///
/// Both markets report the same lent APR (`borrow_rate * utilization`);
/// only the wrapper market earns yield on unlent capital.
pub fn compute_forward(utilization: f64, borrow_rate: f64, wrapper_yield: f64) -> MarketPair {
    let lent_apr = borrow_rate * utilization;

    MarketPair {
        base: RateBreakdown::new(lent_apr, 0.0, borrow_rate),
        wrapper: RateBreakdown::new(
            lent_apr,
            idle_yield(utilization, wrapper_yield),
            borrow_rate,
        ),
    }
}

/// Solve for the borrow rate that produces `lend_rate` in each market
///
/// The wrapper market's idle yield already covers part of the lend rate,
/// so its required borrow rate is lower and may go negative.
pub fn compute_inverse(utilization: f64, lend_rate: f64, wrapper_yield: f64) -> MarketPair {
    let base = RateBreakdown::new(lend_rate, 0.0, lend_rate / utilization);

    let unlent_apr = idle_yield(utilization, wrapper_yield);
    let wrapper_borrow = (lend_rate - unlent_apr) / utilization;
    let wrapper = RateBreakdown::new(wrapper_borrow * utilization, unlent_apr, wrapper_borrow);

    MarketPair { base, wrapper }
}

/// Checked variant of [`compute_inverse`]
///
/// Rejects zero utilization and non-finite inputs rather than letting
/// infinities and NaN into the result.
pub fn try_compute_inverse(
    utilization: f64,
    lend_rate: f64,
    wrapper_yield: f64,
) -> Result<MarketPair, RateError> {
    for (name, value) in [
        ("utilization", utilization),
        ("lend_rate", lend_rate),
        ("wrapper_yield", wrapper_yield),
    ] {
        if !value.is_finite() {
            return Err(RateError::NonFinite { name, value });
        }
    }

    if utilization == 0.0 {
        return Err(RateError::ZeroUtilization);
    }

    Ok(compute_inverse(utilization, lend_rate, wrapper_yield))
}
