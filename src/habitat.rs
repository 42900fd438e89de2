//! Interface to the vegetation model that hosts the herbivores.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::{FaunaError, Result};
use crate::forage::{ForageMass, HabitatForage};
use crate::output::HabitatData;

fn default_air_temperature() -> f64 {
    20.0
}

/// Abiotic conditions of a habitat on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HabitatEnvironment {
    /// [°C]
    #[serde(default = "default_air_temperature")]
    pub air_temperature: f64,
    /// [cm]
    #[serde(default)]
    pub snow_depth: f64,
}

impl Default for HabitatEnvironment {
    fn default() -> Self {
        Self {
            air_temperature: default_air_temperature(),
            snow_depth: 0.0,
        }
    }
}

/// A spatial unit with forage, as provided by the host vegetation model.
pub trait Habitat: Debug {
    fn name(&self) -> &str;

    /// Called once at the beginning of each simulated day.
    fn init_day(&mut self, _day_of_year: u32) -> Result<()> {
        Ok(())
    }

    fn available_forage(&self) -> HabitatForage;

    fn environment(&self) -> HabitatEnvironment;

    /// Takes away what the herbivores ate [kgDM/km²].
    fn remove_eaten_forage(&mut self, eaten: &ForageMass) -> Result<()>;

    /// Returns nitrogen in herbivore excreta and carcasses to the soil
    /// [kgN/km²].
    fn add_excreted_nitrogen(&mut self, nitrogen: f64) -> Result<()>;

    fn todays_output(&self) -> HabitatData;
}

/// Habitat whose standing forage is reset to a fixed level every day.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticHabitat {
    name: String,
    standing: HabitatForage,
    forage: HabitatForage,
    environment: HabitatEnvironment,
    output: HabitatData,
    /// Total nitrogen returned by herbivores [kgN/km²].
    soil_nitrogen: f64,
}

impl StaticHabitat {
    pub fn new(name: impl Into<String>, standing: HabitatForage, environment: HabitatEnvironment) -> Self {
        Self {
            name: name.into(),
            standing,
            forage: standing,
            environment,
            output: HabitatData::default(),
            soil_nitrogen: 0.0,
        }
    }

    pub fn set_environment(&mut self, environment: HabitatEnvironment) {
        self.environment = environment;
    }

    pub fn set_standing_forage(&mut self, standing: HabitatForage) {
        self.standing = standing;
    }

    pub fn soil_nitrogen(&self) -> f64 {
        self.soil_nitrogen
    }
}

impl Habitat for StaticHabitat {
    fn name(&self) -> &str {
        &self.name
    }

    fn init_day(&mut self, day_of_year: u32) -> Result<()> {
        if day_of_year >= 365 {
            return Err(FaunaError::invalid(
                "StaticHabitat::init_day",
                format!("day of year {day_of_year} is outside [0,364]"),
            ));
        }
        self.forage = self.standing;
        self.output = HabitatData {
            available_forage: self.forage.mass,
            ..HabitatData::default()
        };
        Ok(())
    }

    fn available_forage(&self) -> HabitatForage {
        self.forage
    }

    fn environment(&self) -> HabitatEnvironment {
        self.environment
    }

    fn remove_eaten_forage(&mut self, eaten: &ForageMass) -> Result<()> {
        eaten.check_non_negative("StaticHabitat::remove_eaten_forage")?;
        for (ft, kg) in eaten.iter() {
            let available = self.forage.mass.get(ft);
            if kg > available * 1.0001 + 1e-9 {
                return Err(FaunaError::logic(format!(
                    "herbivores ate {kg} kgDM/km² of {ft} but only {available} were available"
                )));
            }
        }
        self.forage.remove(eaten);
        self.output.eaten_forage += *eaten;
        Ok(())
    }

    fn add_excreted_nitrogen(&mut self, nitrogen: f64) -> Result<()> {
        if !(nitrogen >= 0.0) {
            return Err(FaunaError::invalid(
                "StaticHabitat::add_excreted_nitrogen",
                format!("nitrogen is negative ({nitrogen})"),
            ));
        }
        self.soil_nitrogen += nitrogen;
        self.output.excreted_nitrogen += nitrogen;
        Ok(())
    }

    fn todays_output(&self) -> HabitatData {
        self.output.clone()
    }
}
