//! Daily physiology, foraging, mortality and reproduction of herbivore
//! populations that compete for forage in the habitats of a vegetation
//! model.

pub mod average;
pub mod config;
pub mod distribution;
pub mod energy_budget;
pub mod error;
pub mod expenditure;
pub mod forage;
pub mod foraging;
pub mod habitat;
pub mod herbivore;
pub mod hft;
pub mod mortality;
pub mod net_energy;
pub mod nitrogen;
pub mod output;
pub mod parameters;
pub mod population;
pub mod reproduction;
pub mod rng;
pub mod simulate_day;
pub mod simulation;
pub mod snapshot;

pub use config::{Scenario, ScenarioLoader};
pub use error::{FaunaError, Result};
pub use herbivore::{Herbivore, Representation};
pub use hft::{Hft, HftList, Sex};
pub use parameters::Parameters;
pub use simulation::{Engine, EngineBuilder, EngineSettings, SimulationUnit};
