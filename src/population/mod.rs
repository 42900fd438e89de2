//! Collections of herbivores of one HFT.

mod cohort;
mod individual;
mod list;

use std::fmt::Debug;
use std::sync::Arc;

pub use cohort::CohortPopulation;
pub use individual::IndividualPopulation;
pub use list::PopulationList;

use crate::error::{FaunaError, Result};
use crate::herbivore::Herbivore;
use crate::hft::Hft;

/// Owns all herbivore objects of one HFT and handles their birth,
/// establishment and removal.
pub trait Population: Debug {
    fn hft(&self) -> &Arc<Hft>;

    /// All herbivore objects, including dead ones not yet purged.
    fn herbivores(&self) -> &[Herbivore];

    fn herbivores_mut(&mut self) -> &mut [Herbivore];

    /// Adds newborns with a total density of `ind_per_km2`, split evenly
    /// between the sexes.
    fn create_offspring(&mut self, ind_per_km2: f64) -> Result<()>;

    /// Populates an empty population with the HFT's establishment density.
    fn establish(&mut self) -> Result<()>;

    /// Removes all dead herbivore objects.
    fn purge_of_dead(&mut self) {
        let _ = self.take_dead();
    }

    /// Removes and returns all dead herbivore objects.
    fn take_dead(&mut self) -> Vec<Herbivore>;

    fn kill_all(&mut self) {
        for herbivore in self.herbivores_mut() {
            herbivore.kill();
        }
    }

    fn is_empty(&self) -> bool {
        self.herbivores().is_empty()
    }

    /// Density of living herbivores [ind/km²].
    fn ind_per_km2(&self) -> f64 {
        self.herbivores()
            .iter()
            .filter(|h| !h.is_dead())
            .map(Herbivore::ind_per_km2)
            .sum()
    }

    /// Mass density of living herbivores [kg/km²].
    fn kg_per_km2(&self) -> f64 {
        self.herbivores()
            .iter()
            .filter(|h| !h.is_dead())
            .map(Herbivore::kg_per_km2)
            .sum()
    }
}

fn check_offspring_density(ind_per_km2: f64) -> Result<()> {
    if !(ind_per_km2 >= 0.0) {
        return Err(FaunaError::invalid(
            "Population::create_offspring",
            format!("offspring density is negative ({ind_per_km2})"),
        ));
    }
    Ok(())
}

/// Establishment ages in days, one entry per age class.
fn establishment_ages(hft: &Hft) -> Vec<u32> {
    let (first, last) = hft.establishment_age_range;
    (first..=last).map(|years| years * 365).collect()
}
