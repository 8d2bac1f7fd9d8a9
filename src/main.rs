//! Fraxlend APR CLI
//!
//! Writes the APR comparison charts, prints point rates and exports sweep
//! tables. Scenario inputs come from defaults, an optional JSON file,
//! environment variables and flags, in increasing precedence.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fraxlend_apr::output::{self, format_percent};
use fraxlend_apr::{
    compute_forward, sweep_borrow_rate, sweep_lend_rate, sweep_utilization, try_compute_inverse,
    Market, MarketPair, ScenarioConfig, ScenarioOverrides, ScenarioRunner, SweepTable,
};
use log::info;
use std::env;
use std::io;
use std::path::PathBuf;

/// APR comparison for the frxUSD and sfrxUSD lending markets
#[derive(Parser)]
#[command(name = "fraxlend_apr", version, about)]
struct Cli {
    #[command(flatten)]
    scenario: ScenarioArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct ScenarioArgs {
    /// JSON scenario file; missing fields take defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Utilization rate as a decimal (e.g. 0.85)
    #[arg(long, global = true)]
    utilization: Option<f64>,

    /// Borrow rate for the utilization sweep
    #[arg(long, global = true)]
    borrow_rate: Option<f64>,

    /// sfrxUSD interest rate earned by idle capital
    #[arg(long, global = true)]
    wrapper_yield: Option<f64>,

    #[arg(long, global = true)]
    max_borrow_rate: Option<f64>,

    #[arg(long, global = true)]
    max_lend_rate: Option<f64>,

    /// Number of utilization samples over [0, 1]
    #[arg(long, global = true)]
    steps: Option<usize>,
}

impl ScenarioArgs {
    fn overrides(&self) -> ScenarioOverrides {
        ScenarioOverrides {
            utilization_rate: self.utilization,
            borrow_rate: self.borrow_rate,
            wrapper_yield: self.wrapper_yield,
            max_borrow_rate: self.max_borrow_rate,
            max_lend_rate: self.max_lend_rate,
            utilization_steps: self.steps,
        }
    }

    /// Defaults, then config file, then environment, then flags
    fn resolve(&self) -> Result<ScenarioConfig> {
        let config = ScenarioConfig::layered(
            self.config.as_deref(),
            |name| env::var(name).ok(),
            &self.overrides(),
        )
        .context("resolving scenario")?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Write the three APR comparison charts (default)
    Charts {
        #[arg(long, short = 'o', default_value = "output")]
        out: PathBuf,
    },

    /// Print the rate breakdown for both markets at one point
    Rates {
        #[arg(value_enum)]
        direction: Direction,

        /// Borrow rate (forward) or target lend rate (inverse);
        /// defaults to the scenario borrow rate / its lent APR
        #[arg(long)]
        rate: Option<f64>,

        #[arg(long)]
        json: bool,
    },

    /// Print or write one sweep table
    Sweep {
        #[arg(value_enum)]
        axis: AxisArg,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// JSON instead of CSV
        #[arg(long)]
        json: bool,
    },

    /// Write all three tables as CSV plus the full report as JSON
    Export {
        #[arg(long, short = 'o', default_value = "output")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Forward,
    Inverse,
}

#[derive(Clone, Copy, ValueEnum)]
enum AxisArg {
    Utilization,
    BorrowRate,
    LendRate,
}

fn print_pair(pair: &MarketPair) {
    println!("{:<8} {:>10} {:>10} {:>10}", "Market", "Lent", "Unlent", "Borrow");
    println!("{}", "-".repeat(41));
    for market in Market::ALL {
        let r = pair.get(market);
        println!(
            "{:<8} {:>10} {:>10} {:>10}",
            market.label(),
            format_percent(r.lent_apr, 3),
            format_percent(r.unlent_apr, 3),
            format_percent(r.borrow_apr, 3)
        );
    }
}

fn run_rates(
    config: &ScenarioConfig,
    direction: Direction,
    rate: Option<f64>,
    json: bool,
) -> Result<()> {
    let u = config.utilization_rate;
    let y = config.wrapper_yield;

    let pair = match direction {
        Direction::Forward => compute_forward(u, rate.unwrap_or(config.borrow_rate), y),
        Direction::Inverse => {
            let lend = rate.unwrap_or(config.borrow_rate * u);
            try_compute_inverse(u, lend, y).context("cannot solve for borrow rate")?
        }
    };

    if json {
        println!("{}", output::to_json(&pair)?);
    } else {
        println!(
            "Utilization {}, sfrxUSD rate {}",
            format_percent(u, 2),
            format_percent(y, 2)
        );
        print_pair(&pair);
    }
    Ok(())
}

fn run_sweep(
    config: &ScenarioConfig,
    axis: AxisArg,
    out: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let table: SweepTable = match axis {
        AxisArg::Utilization => {
            sweep_utilization(config.borrow_rate, config.wrapper_yield, config.utilization_steps)
        }
        AxisArg::BorrowRate => {
            sweep_borrow_rate(config.utilization_rate, config.wrapper_yield, config.max_borrow_rate)
        }
        AxisArg::LendRate => {
            sweep_lend_rate(config.utilization_rate, config.wrapper_yield, config.max_lend_rate)
        }
    };

    match (out, json) {
        (Some(path), true) => output::write_json_path(&table, &path)?,
        (Some(path), false) => output::write_csv_path(&table, &path)?,
        (None, true) => println!("{}", output::to_json(&table)?),
        (None, false) => output::write_csv(&table, io::stdout().lock())?,
    }
    Ok(())
}

fn run_export(config: ScenarioConfig, out: PathBuf) -> Result<()> {
    let report = ScenarioRunner::new(config).run();
    output::write_tables(&report, &out)
        .with_context(|| format!("writing tables to {}", out.display()))?;
    output::write_json_path(&report, &out.join("report.json"))?;

    println!("Sweep tables have been exported to '{}'.", out.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.scenario.resolve()?;

    let command = cli.command.unwrap_or(Command::Charts {
        out: PathBuf::from("output"),
    });

    match command {
        Command::Charts { out } => {
            let report = ScenarioRunner::new(config).run();
            let written = output::write_charts(&report, &out)
                .with_context(|| format!("writing charts to {}", out.display()))?;
            info!("{} charts written", written.len());
            println!(
                "APR comparison graphs have been generated in the '{}' directory.",
                out.display()
            );
        }
        Command::Rates { direction, rate, json } => run_rates(&config, direction, rate, json)?,
        Command::Sweep { axis, out, json } => run_sweep(&config, axis, out, json)?,
        Command::Export { out } => run_export(config, out)?,
    }

    Ok(())
}
