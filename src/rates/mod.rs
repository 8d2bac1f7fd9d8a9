//! Rate engine for the paired frxUSD / sfrxUSD markets
//!
//! Closed-form formulas mapping (utilization, borrow rate, wrapper yield)
//! to a per-market APR breakdown, plus the inverse problem of solving for
//! the borrow rate that produces a target lend rate.

mod types;
mod engine;
mod error;

pub use types::{Market, AprComponent, RateBreakdown, MarketPair};
pub use engine::{compute_forward, compute_inverse, try_compute_inverse};
pub use error::RateError;
