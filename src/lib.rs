pub mod amount;
pub mod catalog;
pub mod config;
pub mod csv;
pub mod footprint;
pub mod model;
pub mod simulator;

pub use amount::Amount;
pub use config::SimulatorConfig;
pub use footprint::{compute_footprint, suggest_alternative};
pub use model::{CarbonResult, Category, EmissionFactor, Scenario, SequenceId, Transaction};
pub use simulator::{Command, Simulator};
