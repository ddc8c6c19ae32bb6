use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use carbon_sim::catalog::default_scenarios;
use carbon_sim::csv::{read_scenarios, write_report_to_stdout};
use carbon_sim::simulator::ModalKind;
use carbon_sim::{Amount, Scenario, Simulator, SimulatorConfig};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Play a day of spending through the carbon-aware transaction simulator.
#[derive(Parser)]
#[command(name = "carbon-sim", version)]
struct Cli {
    /// Scenario csv (sequence_id,name,amount,category,time); defaults to the built-in day
    scenarios: Option<PathBuf>,

    /// Daily spending limit
    #[arg(long, default_value_t = 1000.0)]
    budget: f64,

    /// Streak the user starts with
    #[arg(long, default_value_t = SimulatorConfig::DEFAULT_STREAK_SEED)]
    streak: u32,

    /// How long the carbon impact modal stays up, in milliseconds
    #[arg(long, default_value_t = 3000)]
    delay_ms: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(budget) = Amount::try_from_float(cli.budget).filter(|b| *b >= Amount::default())
    else {
        error!(budget = cli.budget, "daily budget must be a non-negative amount");
        process::exit(2);
    };

    let scenarios = match &cli.scenarios {
        Some(path) => load_scenarios(path),
        None => default_scenarios(),
    };

    let config = SimulatorConfig::default()
        .with_daily_budget(budget)
        .with_streak_seed(cli.streak)
        .with_commit_delay(Duration::from_millis(cli.delay_ms));

    let mut simulator = Simulator::new(config, scenarios);
    play_through(&mut simulator).await;

    let (Some(session), Some(summary)) = (simulator.session(), simulator.completion()) else {
        error!("simulator stopped before every scenario was played");
        process::exit(1);
    };

    if let Err(e) = write_report_to_stdout(&session.transaction_log, &summary) {
        error!("failed to write report: {e}");
        process::exit(1);
    }
}

fn load_scenarios(path: &Path) -> Vec<Scenario> {
    if path.extension().is_none_or(|ext| ext != "csv") {
        warn!(path = %path.display(), "input file seems to not be a csv file");
    }

    let rows = match read_scenarios(path) {
        Ok(rows) => rows,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    rows.filter_map(|result| match result {
        Ok(scenario) => Some(scenario),
        Err(e) => {
            warn!("{e}");
            None
        }
    })
    .collect()
}

/// Stand in for the user: buy everything that fits, cancel what doesn't.
async fn play_through(simulator: &mut Simulator) {
    simulator.open();

    while let Some(sequence_id) = simulator.current_scenario().map(|s| s.sequence_id) {
        if simulator.submit(sequence_id).is_err() {
            break;
        }

        let modal = simulator.session().and_then(|s| s.modal.kind());
        match modal {
            Some(ModalKind::BudgetExceeded) => {
                if simulator.cancel_exceeded_transaction().is_err() {
                    break;
                }
            }
            _ => {
                if let Some(suggestion) = simulator.pending_suggestion() {
                    info!(
                        sequence_id,
                        alternative = %suggestion.category,
                        saved_kg = suggestion.saved_kg,
                        "lower-emission option suggested"
                    );
                }
                simulator.settle().await;
            }
        }
    }
}
