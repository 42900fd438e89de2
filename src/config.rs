//! Scenario files: everything needed to set up a simulation run.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::FaunaError;
use crate::forage::{ForageValues, HabitatForage};
use crate::habitat::{HabitatEnvironment, StaticHabitat};
use crate::hft::{Hft, HftList};
use crate::parameters::Parameters;
use crate::population::PopulationList;
use crate::simulation::{EngineSettings, SimulationUnit};

fn default_years() -> u32 {
    10
}

fn default_digestibility() -> f64 {
    0.5
}

fn default_nitrogen_fraction() -> f64 {
    0.015
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_output_interval_days() -> u32 {
    365
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_years")]
    pub years: u32,
    /// Overrides `years` when set.
    #[serde(default)]
    pub days: Option<u64>,
    pub parameters: Parameters,
    pub hfts: Vec<Hft>,
    pub habitats: Vec<HabitatConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// A habitat with constant standing grass.
#[derive(Debug, Clone, Deserialize)]
pub struct HabitatConfig {
    pub name: String,
    /// Standing grass [kgDM/km²], restored every day.
    pub grass_mass: f64,
    #[serde(default = "default_digestibility")]
    pub digestibility: f64,
    /// Nitrogen per dry matter [kgN/kgDM].
    #[serde(default = "default_nitrogen_fraction")]
    pub nitrogen_fraction: f64,
    #[serde(flatten)]
    pub environment: HabitatEnvironment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Days averaged into one output file; 0 disables output.
    #[serde(default = "default_output_interval_days")]
    pub interval_days: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            interval_days: default_output_interval_days(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Reads, parses and validates a scenario file.
    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn validate(&self) -> crate::error::Result<()> {
        self.parameters.validate()?;
        if self.hfts.is_empty() {
            return Err(FaunaError::Config("scenario defines no HFT".into()));
        }
        if self.habitats.is_empty() {
            return Err(FaunaError::Config("scenario defines no habitat".into()));
        }
        let mut names = HashSet::new();
        for habitat in &self.habitats {
            if !names.insert(habitat.name.as_str()) {
                return Err(FaunaError::Config(format!(
                    "habitat name '{}' is not unique",
                    habitat.name
                )));
            }
            if !(habitat.grass_mass >= 0.0) {
                return Err(FaunaError::Config(format!(
                    "habitat '{}': grass_mass must be >= 0 (current value: {})",
                    habitat.name, habitat.grass_mass
                )));
            }
            if !(0.0..=1.0).contains(&habitat.digestibility)
                || !(0.0..=1.0).contains(&habitat.nitrogen_fraction)
            {
                return Err(FaunaError::Config(format!(
                    "habitat '{}': digestibility and nitrogen_fraction must be in [0,1]",
                    habitat.name
                )));
            }
        }
        HftList::new(self.hfts.clone())?.validate(&self.parameters)
    }

    /// Number of days to simulate.
    pub fn days(&self, override_days: Option<u64>) -> u64 {
        override_days
            .or(self.days)
            .unwrap_or(u64::from(self.years) * 365)
    }

    /// One simulation unit per habitat, each with empty populations of all
    /// HFTs.
    pub fn build_units(&self) -> Result<Vec<SimulationUnit>> {
        let hfts = HftList::new(self.hfts.clone())?;
        let mut units = Vec::with_capacity(self.habitats.len());
        for config in &self.habitats {
            let mass = ForageValues::from_grass(config.grass_mass);
            let forage = HabitatForage::new(
                mass,
                ForageValues::from_grass(config.digestibility),
                mass * config.nitrogen_fraction,
            )
            .with_context(|| format!("Invalid forage in habitat '{}'", config.name))?;
            let habitat = StaticHabitat::new(config.name.clone(), forage, config.environment);
            let populations = PopulationList::from_hfts(&hfts, &self.parameters)?;
            units.push(SimulationUnit::new(Box::new(habitat), populations));
        }
        Ok(units)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            scenario_name: self.name.clone(),
            seed: self.seed,
            parameters: self.parameters.clone(),
            output_interval_days: self.output.interval_days,
            output_dir: self.output.dir.clone(),
        }
    }
}
