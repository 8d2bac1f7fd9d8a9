//! Fraxlend APR - rate modeling for paired frxUSD / sfrxUSD lending markets
//!
//! This library provides:
//! - Forward rates (lent, unlent and borrow APR) from utilization and borrow rate
//! - Inverse rates solving for the borrow rate behind a target lend rate
//! - Sweeps over utilization, borrow rate and lend rate for both markets
//! - CSV / JSON export, SVG charts and a standalone HTML report

pub mod rates;
pub mod sweep;
pub mod scenario;
pub mod output;
pub mod report;

// Re-export commonly used types
pub use rates::{
    compute_forward, compute_inverse, try_compute_inverse, AprComponent, Market, MarketPair,
    RateBreakdown,
};
pub use scenario::{ScenarioConfig, ScenarioOverrides, ScenarioReport, ScenarioRunner};
pub use sweep::{
    sweep_borrow_rate, sweep_lend_rate, sweep_utilization, SweepAxis, SweepRow, SweepTable,
};
