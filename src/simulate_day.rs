//! One simulated day of one habitat with its herbivores.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::debug;

use crate::distribution::{feed_herbivores, ForageDistributor};
use crate::error::{FaunaError, Result};
use crate::forage::{ForageType, HabitatForage};
use crate::output::{DayOutput, HerbivoreData};
use crate::parameters::Parameters;
use crate::simulation::SimulationUnit;

/// Forage mass [kgDM/km²] below which herbivores cannot find anything.
pub const MIN_EDIBLE_FORAGE: f64 = 10_000.0;

/// Runs all herbivore processes of one habitat for one day.
pub struct SimulateDay<'a> {
    day_of_year: u32,
    unit: &'a mut SimulationUnit,
    params: &'a Parameters,
}

impl<'a> SimulateDay<'a> {
    pub fn new(day_of_year: u32, unit: &'a mut SimulationUnit, params: &'a Parameters) -> Result<Self> {
        if day_of_year >= 365 {
            return Err(FaunaError::invalid(
                "SimulateDay::new",
                format!("day of year {day_of_year} is outside [0,364]"),
            ));
        }
        Ok(Self {
            day_of_year,
            unit,
            params,
        })
    }

    /// Simulates the day and returns its aggregated output.
    ///
    /// With `do_herbivores` false only the habitat advances. With
    /// `establish_if_needed` every empty population is established before
    /// the herbivores are simulated.
    pub fn run<R: Rng + ?Sized>(
        self,
        do_herbivores: bool,
        establish_if_needed: bool,
        rng: &mut R,
    ) -> Result<DayOutput> {
        let day = self.day_of_year;
        let (habitat, populations) = self.unit.parts_mut();
        habitat.init_day(day)?;

        let mut output = DayOutput {
            day_of_year: day,
            ..DayOutput::default()
        };
        if !do_herbivores {
            output.habitat = habitat.todays_output();
            return Ok(output);
        }

        let mut available = corrected_forage(&habitat.available_forage());
        let environment = habitat.environment();

        populations.kill_nonviable();
        if establish_if_needed {
            populations.establish_empty()?;
        }

        let mut offspring: BTreeMap<String, f64> = BTreeMap::new();
        let mut excreted_nitrogen = 0.0;
        for population in populations.iter_mut() {
            let mut total = 0.0;
            for herbivore in population.herbivores_mut() {
                if !herbivore.is_dead() {
                    total += herbivore.simulate_day(day, &environment, rng)?;
                }
                excreted_nitrogen += herbivore.take_nitrogen_excreta();
            }
            offspring.insert(population.hft().name.clone(), total);
        }

        let before = available.mass;
        let distributor = ForageDistributor::new(self.params.forage_distribution);
        let mut herbivores = populations.all_herbivores_mut();
        feed_herbivores(&mut available, &mut herbivores, &distributor)?;
        let eaten = before - available.mass;
        habitat.remove_eaten_forage(&eaten)?;

        for population in populations.iter() {
            let datapoints: Vec<HerbivoreData> = population
                .herbivores()
                .iter()
                .filter(|h| h.today() == Some(day))
                .map(|h| h.todays_output().clone())
                .collect();
            if !datapoints.is_empty() {
                output.hft_data.insert(
                    population.hft().name.clone(),
                    HerbivoreData::create_datapoint(&datapoints)?,
                );
            }
        }

        habitat.add_excreted_nitrogen(excreted_nitrogen)?;

        for (name, ind_per_km2) in offspring {
            if let Some(population) = populations.get_mut(&name) {
                population.create_offspring(ind_per_km2)?;
            }
        }
        populations.purge_of_dead();

        output.habitat = habitat.todays_output();
        debug!(
            habitat = habitat.name(),
            day,
            eaten = eaten.sum(),
            excreted_nitrogen,
            herbivores = output.hft_data.values().map(|d| d.inddens).sum::<f64>(),
            "Simulated day"
        );
        Ok(output)
    }
}

/// Forage too sparse to be found counts as absent, together with its
/// nitrogen.
fn corrected_forage(forage: &HabitatForage) -> HabitatForage {
    let mut corrected = *forage;
    for ft in ForageType::ALL {
        if corrected.mass.get(ft) <= MIN_EDIBLE_FORAGE {
            corrected.mass.set(ft, 0.0);
            corrected.nitrogen.set(ft, 0.0);
        }
    }
    corrected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forage::ForageValues;
    use crate::habitat::{HabitatEnvironment, StaticHabitat};
    use crate::hft::{Hft, HftList};
    use crate::population::PopulationList;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn unit(grass: f64, params: &Parameters) -> SimulationUnit {
        let hfts = HftList::new(vec![Hft {
            name: "grazer".into(),
            establishment_density: 10.0,
            establishment_age_range: (2, 3),
            ..Hft::default()
        }])
        .unwrap();
        let forage = HabitatForage::new(
            ForageValues::new(grass),
            ForageValues::new(0.6),
            ForageValues::new(grass * 0.02),
        )
        .unwrap();
        let habitat = StaticHabitat::new("meadow", forage, HabitatEnvironment::default());
        SimulationUnit::new(
            Box::new(habitat),
            PopulationList::from_hfts(&hfts, params).unwrap(),
        )
    }

    #[test]
    fn test_sparse_forage_is_ignored() {
        let forage = HabitatForage::new(
            ForageValues::new(MIN_EDIBLE_FORAGE),
            ForageValues::new(0.5),
            ForageValues::new(100.0),
        )
        .unwrap();
        let corrected = corrected_forage(&forage);
        assert!(corrected.mass.is_zero());
        assert!(corrected.nitrogen.is_zero());
        assert_eq!(corrected.digestibility, forage.digestibility);
    }

    #[test]
    fn test_day_without_herbivores() {
        let params = Parameters::cohorts(0.0);
        let mut unit = unit(100_000.0, &params);
        let output = SimulateDay::new(0, &mut unit, &params)
            .unwrap()
            .run(false, true, &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();
        assert!(output.hft_data.is_empty());
        assert!(unit.populations().get("grazer").unwrap().is_empty());
        assert!(SimulateDay::new(365, &mut unit, &params).is_err());
    }

    #[test]
    fn test_establish_feed_and_report() {
        let params = Parameters::cohorts(0.0);
        let mut unit = unit(100_000.0, &params);
        let output = SimulateDay::new(10, &mut unit, &params)
            .unwrap()
            .run(true, true, &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();
        let grazers = &output.hft_data["grazer"];
        assert!((grazers.inddens - 10.0).abs() < 1e-9);
        assert!(grazers.eaten_forage_per_ind.sum() > 0.0);
        assert!(output.habitat.eaten_forage.sum() > 0.0);
        assert_eq!(output.habitat.available_forage.sum(), 100_000.0);
        let eaten_per_km2 = grazers.eaten_forage_per_ind.sum() * grazers.inddens;
        assert!((output.habitat.eaten_forage.sum() - eaten_per_km2).abs() / eaten_per_km2 < 0.01);
    }
}
