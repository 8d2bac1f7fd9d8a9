//! Sweep generators that tabulate both markets across one varying input

mod table;
mod generate;

pub use table::{SweepAxis, SweepRow, SweepTable, ROWS_PER_SAMPLE};
pub use generate::{
    linspace, percent_steps, sweep_borrow_rate, sweep_lend_rate, sweep_utilization,
    DEFAULT_MAX_BORROW_RATE, DEFAULT_MAX_LEND_RATE, DEFAULT_UTILIZATION_STEPS, MAX_SWEEP_SAMPLES,
};
