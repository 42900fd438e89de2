use std::sync::Arc;

use tracing::info;

use crate::error::{FaunaError, Result};
use crate::herbivore::{Herbivore, Representation};
use crate::hft::{Hft, Sex};

use super::{check_offspring_density, establishment_ages, Population};

/// Population of cohorts: every object stands for all animals of one age
/// and sex.
#[derive(Debug, Clone)]
pub struct CohortPopulation {
    hft: Arc<Hft>,
    dead_threshold: f64,
    cohorts: Vec<Herbivore>,
}

impl CohortPopulation {
    pub fn new(hft: Arc<Hft>, dead_threshold: f64) -> Result<Self> {
        if !(dead_threshold >= 0.0) {
            return Err(FaunaError::invalid(
                "CohortPopulation::new",
                format!("dead threshold is negative ({dead_threshold})"),
            ));
        }
        Ok(Self {
            hft,
            dead_threshold,
            cohorts: Vec::new(),
        })
    }

    pub fn dead_threshold(&self) -> f64 {
        self.dead_threshold
    }

    /// Merges living cohorts of identical age and sex into one.
    pub fn merge_cohorts(&mut self) -> Result<()> {
        let mut donors = vec![false; self.cohorts.len()];
        for i in 0..self.cohorts.len() {
            let (head, tail) = self.cohorts.split_at_mut(i + 1);
            let target = &mut head[i];
            if target.is_dead() || donors[i] {
                continue;
            }
            for (j, other) in tail.iter_mut().enumerate() {
                if !other.is_dead()
                    && other.age_days() == target.age_days()
                    && other.sex() == target.sex()
                {
                    target.merge(other)?;
                    donors[i + 1 + j] = true;
                }
            }
        }
        let mut index = 0;
        self.cohorts.retain(|_| {
            let keep = !donors[index];
            index += 1;
            keep
        });
        Ok(())
    }

    fn representation(&self, ind_per_km2: f64) -> Result<Representation> {
        Representation::cohort(ind_per_km2, self.dead_threshold)
    }
}

impl Population for CohortPopulation {
    fn hft(&self) -> &Arc<Hft> {
        &self.hft
    }

    fn herbivores(&self) -> &[Herbivore] {
        &self.cohorts
    }

    fn herbivores_mut(&mut self) -> &mut [Herbivore] {
        &mut self.cohorts
    }

    fn create_offspring(&mut self, ind_per_km2: f64) -> Result<()> {
        check_offspring_density(ind_per_km2)?;
        if ind_per_km2 == 0.0 {
            return Ok(());
        }
        for sex in [Sex::Male, Sex::Female] {
            let newborns = Herbivore::new_birth(
                Arc::clone(&self.hft),
                sex,
                self.representation(ind_per_km2 / 2.0)?,
            )?;
            self.cohorts.push(newborns);
        }
        self.merge_cohorts()
    }

    fn establish(&mut self) -> Result<()> {
        if !self.cohorts.is_empty() {
            return Err(FaunaError::logic(format!(
                "cannot establish non-empty population of HFT '{}'",
                self.hft.name
            )));
        }
        let ages = establishment_ages(&self.hft);
        let density = self.hft.establishment_density / (2.0 * ages.len() as f64);
        for &age_days in &ages {
            for sex in [Sex::Female, Sex::Male] {
                let representation = self.representation(density)?;
                let cohort = if age_days == 0 {
                    Herbivore::new_birth(Arc::clone(&self.hft), sex, representation)?
                } else {
                    Herbivore::new_established(
                        age_days,
                        1.0,
                        Arc::clone(&self.hft),
                        sex,
                        representation,
                    )?
                };
                self.cohorts.push(cohort);
            }
        }
        info!(
            hft = %self.hft.name,
            cohorts = self.cohorts.len(),
            ind_per_km2 = self.hft.establishment_density,
            "Established cohort population"
        );
        Ok(())
    }

    fn take_dead(&mut self) -> Vec<Herbivore> {
        let (dead, alive) = std::mem::take(&mut self.cohorts)
            .into_iter()
            .partition(Herbivore::is_dead);
        self.cohorts = alive;
        dead
    }
}
