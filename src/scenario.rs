//! Scenario configuration and batch runner
//!
//! A scenario fixes the market inputs (utilization, borrow rate, wrapper
//! yield) and sweep bounds. Configs are built from defaults, an optional
//! JSON file and environment overrides, then run through all three sweeps.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::rates::{compute_forward, compute_inverse, MarketPair};
use crate::sweep::{
    sweep_borrow_rate, sweep_lend_rate, sweep_utilization, SweepTable, DEFAULT_MAX_BORROW_RATE,
    DEFAULT_MAX_LEND_RATE, DEFAULT_UTILIZATION_STEPS, MAX_SWEEP_SAMPLES,
};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// Inputs for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Fixed utilization for the borrow and lend rate sweeps (default: 85%)
    #[serde(default = "default_utilization_rate")]
    pub utilization_rate: f64,

    /// Fixed borrow rate for the utilization sweep (default: 10%)
    #[serde(default = "default_borrow_rate")]
    pub borrow_rate: f64,

    /// External yield earned by idle sfrxUSD (default: 8%)
    #[serde(default = "default_wrapper_yield")]
    pub wrapper_yield: f64,

    #[serde(default = "default_max_borrow_rate")]
    pub max_borrow_rate: f64,

    #[serde(default = "default_max_lend_rate")]
    pub max_lend_rate: f64,

    /// Number of utilization samples over [0, 1]
    #[serde(default = "default_utilization_steps")]
    pub utilization_steps: usize,
}

fn default_utilization_rate() -> f64 {
    0.85
}

fn default_borrow_rate() -> f64 {
    0.10
}

fn default_wrapper_yield() -> f64 {
    0.08
}

fn default_max_borrow_rate() -> f64 {
    DEFAULT_MAX_BORROW_RATE
}

fn default_max_lend_rate() -> f64 {
    DEFAULT_MAX_LEND_RATE
}

fn default_utilization_steps() -> usize {
    DEFAULT_UTILIZATION_STEPS
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            utilization_rate: default_utilization_rate(),
            borrow_rate: default_borrow_rate(),
            wrapper_yield: default_wrapper_yield(),
            max_borrow_rate: default_max_borrow_rate(),
            max_lend_rate: default_max_lend_rate(),
            utilization_steps: default_utilization_steps(),
        }
    }
}

/// Explicit values that win over every other config source
///
/// Populated from command-line flags. `None` keeps the underlying value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioOverrides {
    pub utilization_rate: Option<f64>,
    pub borrow_rate: Option<f64>,
    pub wrapper_yield: Option<f64>,
    pub max_borrow_rate: Option<f64>,
    pub max_lend_rate: Option<f64>,
    pub utilization_steps: Option<usize>,
}

/// Parse an override value, warning and keeping the current value on failure
fn parse_override<T: std::str::FromStr>(name: &str, raw: Option<String>, current: T) -> T {
    match raw {
        None => current,
        Some(s) => match s.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring {}={:?}: not a valid number", name, s);
                current
            }
        },
    }
}

impl ScenarioConfig {
    /// Load a config from a JSON file; missing fields take defaults
    pub fn from_json_path(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply overrides from a key lookup such as the process environment
    ///
    /// Reads UTILIZATION_RATE, BORROW_RATE, WRAPPER_YIELD, MAX_BORROW_RATE,
    /// MAX_LEND_RATE and UTILIZATION_STEPS.
    pub fn with_overrides<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            utilization_rate: parse_override(
                "UTILIZATION_RATE",
                lookup("UTILIZATION_RATE"),
                self.utilization_rate,
            ),
            borrow_rate: parse_override("BORROW_RATE", lookup("BORROW_RATE"), self.borrow_rate),
            wrapper_yield: parse_override(
                "WRAPPER_YIELD",
                lookup("WRAPPER_YIELD"),
                self.wrapper_yield,
            ),
            max_borrow_rate: parse_override(
                "MAX_BORROW_RATE",
                lookup("MAX_BORROW_RATE"),
                self.max_borrow_rate,
            ),
            max_lend_rate: parse_override(
                "MAX_LEND_RATE",
                lookup("MAX_LEND_RATE"),
                self.max_lend_rate,
            ),
            utilization_steps: parse_override(
                "UTILIZATION_STEPS",
                lookup("UTILIZATION_STEPS"),
                self.utilization_steps,
            ),
        }
    }

    /// Apply explicit overrides on top of the current values
    pub fn with_flags(mut self, flags: &ScenarioOverrides) -> Self {
        if let Some(v) = flags.utilization_rate {
            self.utilization_rate = v;
        }
        if let Some(v) = flags.borrow_rate {
            self.borrow_rate = v;
        }
        if let Some(v) = flags.wrapper_yield {
            self.wrapper_yield = v;
        }
        if let Some(v) = flags.max_borrow_rate {
            self.max_borrow_rate = v;
        }
        if let Some(v) = flags.max_lend_rate {
            self.max_lend_rate = v;
        }
        if let Some(v) = flags.utilization_steps {
            self.utilization_steps = v;
        }
        self
    }

    /// Build a validated config from every source
    ///
    /// Precedence, lowest first: defaults, the JSON file, `lookup`
    /// (the environment in the binaries), then `flags`.
    pub fn layered<F>(
        file: Option<&Path>,
        lookup: F,
        flags: &ScenarioOverrides,
    ) -> Result<Self, ScenarioError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match file {
            Some(path) => Self::from_json_path(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(lookup).with_flags(flags);
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that cannot produce a table
    ///
    /// Sweep maxima must lie in [0, 1] and the utilization sweep may take at
    /// most `MAX_SWEEP_SAMPLES` points, so no sweep exceeds 101 samples.
    /// Rates outside [0, 1] are legal inputs to the formulas and only warn.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.utilization_steps == 0 || self.utilization_steps > MAX_SWEEP_SAMPLES {
            return Err(ScenarioError::Invalid(format!(
                "utilization_steps must be between 1 and {} (got {})",
                MAX_SWEEP_SAMPLES, self.utilization_steps
            )));
        }
        for (name, value) in [
            ("max_borrow_rate", self.max_borrow_rate),
            ("max_lend_rate", self.max_lend_rate),
        ] {
            // Also catches NaN
            if !(0.0..=1.0).contains(&value) {
                return Err(ScenarioError::Invalid(format!(
                    "{} must be within [0, 1] (got {})",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("utilization_rate", self.utilization_rate),
            ("borrow_rate", self.borrow_rate),
            ("wrapper_yield", self.wrapper_yield),
        ] {
            if !(0.0..=1.0).contains(&value) {
                warn!("{} = {} is outside [0, 1]", name, value);
            }
        }
        if self.utilization_rate == 0.0 {
            warn!("utilization_rate = 0: lend rate sweep borrow APRs will be non-finite");
        }

        Ok(())
    }
}

/// Results of running every sweep for one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub config: ScenarioConfig,

    /// Forward rates at the configured utilization and borrow rate
    pub forward: MarketPair,

    /// Inverse rates solving for the base market's lent APR
    pub inverse: MarketPair,

    pub by_utilization: SweepTable,
    pub by_borrow_rate: SweepTable,
    pub by_lend_rate: SweepTable,
}

impl ScenarioReport {
    /// The three sweep tables in chart order
    pub fn tables(&self) -> [&SweepTable; 3] {
        [&self.by_utilization, &self.by_borrow_rate, &self.by_lend_rate]
    }
}

/// Runs all sweeps for a scenario
///
/// # Example
/// ```
/// use fraxlend_apr::{ScenarioConfig, ScenarioRunner};
///
/// let runner = ScenarioRunner::new(ScenarioConfig::default());
/// let report = runner.run();
/// assert_eq!(report.by_utilization.len(), 126);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: ScenarioConfig,
}

impl ScenarioRunner {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    /// Run the forward point, inverse point and all three sweeps
    pub fn run(&self) -> ScenarioReport {
        Self::run_config(&self.config)
    }

    /// Run several scenarios, one report per config
    pub fn run_configs(configs: &[ScenarioConfig]) -> Vec<ScenarioReport> {
        configs.iter().map(Self::run_config).collect()
    }

    fn run_config(config: &ScenarioConfig) -> ScenarioReport {
        let c = config;
        info!(
            "Running scenario: utilization={:.2}%, borrow={:.2}%, wrapper yield={:.2}%",
            c.utilization_rate * 100.0,
            c.borrow_rate * 100.0,
            c.wrapper_yield * 100.0
        );

        let forward = compute_forward(c.utilization_rate, c.borrow_rate, c.wrapper_yield);
        let inverse = compute_inverse(c.utilization_rate, forward.base.lent_apr, c.wrapper_yield);

        ScenarioReport {
            config: c.clone(),
            forward,
            inverse,
            by_utilization: sweep_utilization(c.borrow_rate, c.wrapper_yield, c.utilization_steps),
            by_borrow_rate: sweep_borrow_rate(
                c.utilization_rate,
                c.wrapper_yield,
                c.max_borrow_rate,
            ),
            by_lend_rate: sweep_lend_rate(c.utilization_rate, c.wrapper_yield, c.max_lend_rate),
        }
    }

    /// Get reference to the scenario config
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Get mutable reference to the scenario config for customization
    pub fn config_mut(&mut self) -> &mut ScenarioConfig {
        &mut self.config
    }
}
