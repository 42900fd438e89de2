//! Multi-day driver over all habitats.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::habitat::Habitat;
use crate::output::DayOutput;
use crate::parameters::Parameters;
use crate::population::PopulationList;
use crate::rng::RngManager;
use crate::simulate_day::SimulateDay;
use crate::snapshot::OutputWriter;

/// A habitat together with the herbivore populations living in it.
#[derive(Debug)]
pub struct SimulationUnit {
    habitat: Box<dyn Habitat>,
    populations: PopulationList,
    initial_establishment_done: bool,
}

impl SimulationUnit {
    pub fn new(habitat: Box<dyn Habitat>, populations: PopulationList) -> Self {
        Self {
            habitat,
            populations,
            initial_establishment_done: false,
        }
    }

    pub fn habitat(&self) -> &dyn Habitat {
        self.habitat.as_ref()
    }

    pub fn populations(&self) -> &PopulationList {
        &self.populations
    }

    pub fn populations_mut(&mut self) -> &mut PopulationList {
        &mut self.populations
    }

    pub fn is_initial_establishment_done(&self) -> bool {
        self.initial_establishment_done
    }

    pub(crate) fn set_initial_establishment_done(&mut self) {
        self.initial_establishment_done = true;
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut dyn Habitat, &mut PopulationList) {
        (self.habitat.as_mut(), &mut self.populations)
    }
}

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub parameters: Parameters,
    /// Days between output files; 0 disables output.
    pub output_interval_days: u32,
    pub output_dir: PathBuf,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    units: Vec<SimulationUnit>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            units: Vec::new(),
        }
    }

    pub fn with_unit(mut self, unit: SimulationUnit) -> Self {
        self.units.push(unit);
        self
    }

    pub fn push_unit(&mut self, unit: SimulationUnit) {
        self.units.push(unit);
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            units: self.units,
            output_writer: OutputWriter::new(
                &self.settings.output_dir,
                self.settings.output_interval_days,
            ),
            day: 0,
            settings: self.settings,
        }
    }
}

/// Output of all habitats for one simulated day.
#[derive(Debug, Clone)]
pub struct DaySnapshot {
    /// Days since the start of the simulation, starting at 1.
    pub day: u64,
    pub day_of_year: u32,
    /// One entry per simulation unit, keyed by habitat name.
    pub outputs: Vec<(String, DayOutput)>,
}

pub struct Engine {
    rng: RngManager,
    units: Vec<SimulationUnit>,
    output_writer: OutputWriter,
    /// Days simulated so far.
    day: u64,
    settings: EngineSettings,
}

impl Engine {
    pub fn run(&mut self, days: u64) -> Result<()> {
        self.run_with_hook(days, |_| {})
    }

    /// Runs `days` days and hands the output of every day to `hook`.
    pub fn run_with_hook<F>(&mut self, days: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(&DaySnapshot),
    {
        for _ in 0..days {
            let day_of_year = (self.day % 365) as u32;
            let interval = u64::from(self.settings.parameters.establishment_interval);
            let periodic_establishment = interval > 0 && self.day % interval == 0;

            let mut outputs = Vec::with_capacity(self.units.len());
            for unit in &mut self.units {
                let establish = !unit.is_initial_establishment_done() || periodic_establishment;
                let name = unit.habitat().name().to_string();
                let rng_stream = self.rng.stream(&name);
                let output = SimulateDay::new(day_of_year, unit, &self.settings.parameters)
                    .and_then(|step| step.run(true, establish, rng_stream))
                    .with_context(|| {
                        format!("Failed to simulate day {} in habitat '{name}'", self.day)
                    })?;
                unit.set_initial_establishment_done();
                outputs.push((name, output));
            }

            self.day += 1;
            let snapshot = DaySnapshot {
                day: self.day,
                day_of_year,
                outputs,
            };
            self.output_writer
                .maybe_write(&snapshot, &self.settings.scenario_name)?;
            hook(&snapshot);
        }
        info!(
            scenario = %self.settings.scenario_name,
            days = self.day,
            "Simulation finished"
        );
        Ok(())
    }

    /// Days simulated so far.
    pub fn day(&self) -> u64 {
        self.day
    }

    pub fn units(&self) -> &[SimulationUnit] {
        &self.units
    }
}
