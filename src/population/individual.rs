use std::sync::Arc;

use tracing::info;

use crate::error::{FaunaError, Result};
use crate::herbivore::{Herbivore, Representation};
use crate::hft::{Hft, Sex};

use super::{check_offspring_density, establishment_ages, Population};

/// Population of individually simulated animals in a habitat of fixed area.
#[derive(Debug, Clone)]
pub struct IndividualPopulation {
    hft: Arc<Hft>,
    area_km2: f64,
    individuals: Vec<Herbivore>,
    /// Fraction of an animal per sex carried over to the next birth.
    incomplete_offspring: f64,
}

impl IndividualPopulation {
    pub fn new(hft: Arc<Hft>, area_km2: f64) -> Result<Self> {
        if !(area_km2 > 0.0) {
            return Err(FaunaError::invalid(
                "IndividualPopulation::new",
                format!("habitat area must be positive ({area_km2})"),
            ));
        }
        Ok(Self {
            hft,
            area_km2,
            individuals: Vec::new(),
            incomplete_offspring: 0.0,
        })
    }

    pub fn area_km2(&self) -> f64 {
        self.area_km2
    }

    fn spawn(&self, age_days: u32, sex: Sex) -> Result<Herbivore> {
        let representation = Representation::individual(self.area_km2)?;
        if age_days == 0 {
            Herbivore::new_birth(Arc::clone(&self.hft), sex, representation)
        } else {
            Herbivore::new_established(age_days, 1.0, Arc::clone(&self.hft), sex, representation)
        }
    }
}

impl Population for IndividualPopulation {
    fn hft(&self) -> &Arc<Hft> {
        &self.hft
    }

    fn herbivores(&self) -> &[Herbivore] {
        &self.individuals
    }

    fn herbivores_mut(&mut self) -> &mut [Herbivore] {
        &mut self.individuals
    }

    fn create_offspring(&mut self, ind_per_km2: f64) -> Result<()> {
        check_offspring_density(ind_per_km2)?;
        let per_sex = ind_per_km2 / 2.0 * self.area_km2 + self.incomplete_offspring;
        let count = per_sex.floor();
        self.incomplete_offspring = per_sex - count;
        for _ in 0..count as usize {
            for sex in [Sex::Male, Sex::Female] {
                let newborn = self.spawn(0, sex)?;
                self.individuals.push(newborn);
            }
        }
        Ok(())
    }

    fn establish(&mut self) -> Result<()> {
        if !self.individuals.is_empty() {
            return Err(FaunaError::logic(format!(
                "cannot establish non-empty population of HFT '{}'",
                self.hft.name
            )));
        }
        let ages = establishment_ages(&self.hft);
        let total = (self.hft.establishment_density * self.area_km2).ceil() as usize;
        let per_class = total / ages.len();
        let remainder = total % ages.len();

        let mut created = 0;
        for (class, &age_days) in ages.iter().enumerate() {
            let count = per_class + usize::from(class < remainder);
            for _ in 0..count {
                let sex = if created % 2 == 0 { Sex::Female } else { Sex::Male };
                let individual = self.spawn(age_days, sex)?;
                self.individuals.push(individual);
                created += 1;
            }
        }
        info!(
            hft = %self.hft.name,
            individuals = created,
            area_km2 = self.area_km2,
            "Established individual population"
        );
        Ok(())
    }

    fn take_dead(&mut self) -> Vec<Herbivore> {
        let (dead, alive) = std::mem::take(&mut self.individuals)
            .into_iter()
            .partition(Herbivore::is_dead);
        self.individuals = alive;
        dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hft() -> Arc<Hft> {
        Arc::new(Hft {
            name: "grazer".into(),
            establishment_age_range: (1, 3),
            establishment_density: 2.5,
            ..Hft::default()
        })
    }

    #[test]
    fn test_establishment_spreads_over_age_classes() {
        let mut pop = IndividualPopulation::new(hft(), 4.0).unwrap();
        pop.establish().unwrap();
        // ceil(2.5 * 4) = 10 animals over 3 age classes: 4, 3, 3.
        assert_eq!(pop.herbivores().len(), 10);
        let count_age = |years: u32| {
            pop.herbivores()
                .iter()
                .filter(|h| h.age_days() == years * 365)
                .count()
        };
        assert_eq!(count_age(1), 4);
        assert_eq!(count_age(2), 3);
        assert_eq!(count_age(3), 3);
        let females = pop
            .herbivores()
            .iter()
            .filter(|h| h.sex() == Sex::Female)
            .count();
        assert_eq!(females, 5);
        assert!((pop.ind_per_km2() - 2.5).abs() < 1e-12);
        assert!(pop.establish().is_err());
    }

    #[test]
    fn test_offspring_fractions_carry_over() {
        let mut pop = IndividualPopulation::new(hft(), 1.0).unwrap();
        // 0.6 per sex: nothing yet.
        pop.create_offspring(1.2).unwrap();
        assert!(pop.is_empty());
        // 1.2 per sex: one of each.
        pop.create_offspring(1.2).unwrap();
        assert_eq!(pop.herbivores().len(), 2);
        assert!(pop.herbivores().iter().any(|h| h.sex() == Sex::Female));
        assert!(pop.herbivores().iter().any(|h| h.sex() == Sex::Male));
        assert!(pop.herbivores().iter().all(|h| h.age_days() == 0));
        assert!(pop.create_offspring(-1.0).is_err());
    }

    #[test]
    fn test_purge_of_dead() {
        let mut pop = IndividualPopulation::new(hft(), 4.0).unwrap();
        pop.establish().unwrap();
        pop.herbivores_mut()[3].kill();
        pop.purge_of_dead();
        assert_eq!(pop.herbivores().len(), 9);
        assert!(IndividualPopulation::new(hft(), 0.0).is_err());
    }
}
