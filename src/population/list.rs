use tracing::info;

use crate::error::{FaunaError, Result};
use crate::herbivore::Herbivore;
use crate::hft::HftList;
use crate::parameters::{HerbivoreType, Parameters};

use super::{CohortPopulation, IndividualPopulation, Population};

/// All populations of one habitat, at most one per HFT.
#[derive(Debug, Default)]
pub struct PopulationList {
    populations: Vec<Box<dyn Population>>,
}

impl PopulationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one empty population per HFT in the representation selected
    /// by `params`.
    pub fn from_hfts(hfts: &HftList, params: &Parameters) -> Result<Self> {
        let mut list = Self::new();
        for hft in hfts.iter() {
            let population: Box<dyn Population> = match params.herbivore_type {
                HerbivoreType::Cohort => Box::new(CohortPopulation::new(
                    hft.clone(),
                    params.dead_herbivore_threshold,
                )?),
                HerbivoreType::Individual => Box::new(IndividualPopulation::new(
                    hft.clone(),
                    params.habitat_area_km2,
                )?),
            };
            list.add(population)?;
        }
        Ok(list)
    }

    pub fn add(&mut self, population: Box<dyn Population>) -> Result<()> {
        let name = &population.hft().name;
        if self.get(name).is_some() {
            return Err(FaunaError::invalid(
                "PopulationList::add",
                format!("a population of HFT '{name}' already exists"),
            ));
        }
        self.populations.push(population);
        Ok(())
    }

    pub fn get(&self, hft_name: &str) -> Option<&dyn Population> {
        self.populations
            .iter()
            .find(|p| p.hft().name == hft_name)
            .map(|p| p.as_ref())
    }

    pub fn get_mut(&mut self, hft_name: &str) -> Option<&mut (dyn Population + 'static)> {
        self.populations
            .iter_mut()
            .find(|p| p.hft().name == hft_name)
            .map(|p| p.as_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Population> {
        self.populations.iter().map(|p| p.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Population>> {
        self.populations.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.populations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    /// Living herbivores of all populations.
    pub fn all_herbivores_mut(&mut self) -> Vec<&mut Herbivore> {
        self.populations
            .iter_mut()
            .flat_map(|p| p.herbivores_mut().iter_mut())
            .filter(|h| !h.is_dead())
            .collect()
    }

    /// Kills every established population whose density dropped below the
    /// HFT's minimum share of the establishment density.
    pub fn kill_nonviable(&mut self) {
        for population in self.populations.iter_mut() {
            if population.is_empty() {
                continue;
            }
            let hft = population.hft().clone();
            let minimum = hft.mortality_minimum_density_threshold * hft.establishment_density;
            let density = population.ind_per_km2();
            if density > 0.0 && density < minimum {
                info!(
                    hft = %hft.name,
                    ind_per_km2 = density,
                    minimum,
                    "Population is no longer viable"
                );
                population.kill_all();
            }
        }
    }

    /// Establishes every population without any herbivores.
    pub fn establish_empty(&mut self) -> Result<()> {
        for population in self.populations.iter_mut() {
            if population.is_empty() {
                population.establish()?;
            }
        }
        Ok(())
    }

    pub fn purge_of_dead(&mut self) {
        for population in self.populations.iter_mut() {
            population.purge_of_dead();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hft::Hft;
    use std::sync::Arc;

    fn hfts() -> HftList {
        HftList::new(vec![
            Hft {
                name: "grazer".into(),
                establishment_density: 10.0,
                establishment_age_range: (1, 2),
                ..Hft::default()
            },
            Hft {
                name: "browser".into(),
                establishment_density: 4.0,
                establishment_age_range: (1, 2),
                ..Hft::default()
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_one_population_per_hft() {
        let hfts = hfts();
        let mut list = PopulationList::from_hfts(&hfts, &Parameters::cohorts(0.0)).unwrap();
        assert_eq!(list.len(), 2);
        let grazer = hfts.get("grazer").unwrap().clone();
        let duplicate = CohortPopulation::new(Arc::clone(&grazer), 0.0).unwrap();
        assert!(list.add(Box::new(duplicate)).is_err());
        assert!(list.get("browser").is_some());
        assert!(list.get("nobody").is_none());
    }

    #[test]
    fn test_establish_empty_and_kill_nonviable() {
        let mut list = PopulationList::from_hfts(&hfts(), &Parameters::cohorts(0.0)).unwrap();
        list.establish_empty().unwrap();
        assert!((list.get("grazer").unwrap().ind_per_km2() - 10.0).abs() < 1e-9);
        assert_eq!(list.all_herbivores_mut().len(), 8);

        // Drop the grazers to 40 % of their establishment density.
        for herbivore in list.get_mut("grazer").unwrap().herbivores_mut() {
            herbivore
                .apply_mortality(0.6, &mut rand::rngs::mock::StepRng::new(0, 1))
                .unwrap();
        }
        list.kill_nonviable();
        assert_eq!(list.get("grazer").unwrap().ind_per_km2(), 0.0);
        assert!((list.get("browser").unwrap().ind_per_km2() - 4.0).abs() < 1e-9);

        list.purge_of_dead();
        assert!(list.get("grazer").unwrap().is_empty());
        assert_eq!(list.all_herbivores_mut().len(), 4);
    }

    #[test]
    fn test_individual_mode() {
        let mut list = PopulationList::from_hfts(&hfts(), &Parameters::individuals(2.0)).unwrap();
        list.establish_empty().unwrap();
        assert_eq!(list.get("grazer").unwrap().herbivores().len(), 20);
        assert_eq!(list.get("browser").unwrap().herbivores().len(), 8);
    }
}
