//! Global simulation parameters shared by all habitats.

use serde::{Deserialize, Serialize};

use crate::error::{FaunaError, Result};

/// How herbivores are represented in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HerbivoreType {
    /// Same-age, same-sex groups described by a density.
    Cohort,
    /// Discrete animals living in a habitat of fixed area.
    Individual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForageDistributionAlgorithm {
    /// Every herbivore gets the same fraction of its demand.
    #[default]
    Equally,
}

fn default_habitat_area_km2() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    #[serde(default)]
    pub forage_distribution: ForageDistributionAlgorithm,
    pub herbivore_type: HerbivoreType,
    /// Habitat area [km²]; only used for individuals.
    #[serde(default = "default_habitat_area_km2")]
    pub habitat_area_km2: f64,
    /// Days between re-establishment checks; 0 means initial establishment only.
    #[serde(default)]
    pub establishment_interval: u32,
    /// Cohorts at or below this density [ind/km²] count as dead.
    pub dead_herbivore_threshold: f64,
}

impl Parameters {
    pub fn cohorts(dead_herbivore_threshold: f64) -> Self {
        Self {
            forage_distribution: ForageDistributionAlgorithm::Equally,
            herbivore_type: HerbivoreType::Cohort,
            habitat_area_km2: default_habitat_area_km2(),
            establishment_interval: 0,
            dead_herbivore_threshold,
        }
    }

    pub fn individuals(habitat_area_km2: f64) -> Self {
        Self {
            forage_distribution: ForageDistributionAlgorithm::Equally,
            herbivore_type: HerbivoreType::Individual,
            habitat_area_km2,
            establishment_interval: 0,
            dead_herbivore_threshold: 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut messages = Vec::new();
        if !(self.habitat_area_km2 > 0.0) || !self.habitat_area_km2.is_finite() {
            messages.push(format!(
                "habitat_area_km2 must be a positive number (current value: {})",
                self.habitat_area_km2
            ));
        }
        if !(self.dead_herbivore_threshold >= 0.0) || !self.dead_herbivore_threshold.is_finite() {
            messages.push(format!(
                "dead_herbivore_threshold must be >= 0 (current value: {})",
                self.dead_herbivore_threshold
            ));
        }
        if messages.is_empty() {
            Ok(())
        } else {
            Err(FaunaError::Config(messages.join("; ")))
        }
    }
}
