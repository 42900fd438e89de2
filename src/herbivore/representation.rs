use crate::error::{FaunaError, Result};

/// How one [`Herbivore`](super::Herbivore) object maps onto real animals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Representation {
    /// Many animals of the same age and sex, described by a density.
    Cohort {
        ind_per_km2: f64,
        /// Densities at or below this value count as extinct [ind/km²].
        dead_threshold: f64,
    },
    /// One animal living in a habitat of fixed area.
    Individual { area_km2: f64, dead: bool },
}

impl Representation {
    pub fn cohort(ind_per_km2: f64, dead_threshold: f64) -> Result<Self> {
        if !(ind_per_km2 >= 0.0) {
            return Err(FaunaError::invalid(
                "Representation::cohort",
                format!("density is negative ({ind_per_km2})"),
            ));
        }
        if !(dead_threshold >= 0.0) {
            return Err(FaunaError::invalid(
                "Representation::cohort",
                format!("dead threshold is negative ({dead_threshold})"),
            ));
        }
        Ok(Representation::Cohort {
            ind_per_km2,
            dead_threshold,
        })
    }

    pub fn individual(area_km2: f64) -> Result<Self> {
        if !(area_km2 > 0.0) {
            return Err(FaunaError::invalid(
                "Representation::individual",
                format!("habitat area must be positive ({area_km2})"),
            ));
        }
        Ok(Representation::Individual {
            area_km2,
            dead: false,
        })
    }

    pub fn ind_per_km2(&self) -> f64 {
        match *self {
            Representation::Cohort { ind_per_km2, .. } => ind_per_km2,
            Representation::Individual { dead: true, .. } => 0.0,
            Representation::Individual { area_km2, .. } => 1.0 / area_km2,
        }
    }

    pub fn is_dead(&self) -> bool {
        match *self {
            Representation::Cohort {
                ind_per_km2,
                dead_threshold,
            } => ind_per_km2 <= dead_threshold,
            Representation::Individual { dead, .. } => dead,
        }
    }

    pub fn is_cohort(&self) -> bool {
        matches!(self, Representation::Cohort { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cohort_death_by_threshold() {
        let repr = Representation::cohort(0.5, 0.5).unwrap();
        assert!(repr.is_dead());
        let repr = Representation::cohort(0.6, 0.5).unwrap();
        assert!(!repr.is_dead());
        assert!(Representation::cohort(-1.0, 0.0).is_err());
        assert!(Representation::cohort(1.0, -0.1).is_err());
    }

    #[test]
    fn test_individual_density() {
        let repr = Representation::individual(4.0).unwrap();
        assert_eq!(repr.ind_per_km2(), 0.25);
        let dead = Representation::Individual {
            area_km2: 4.0,
            dead: true,
        };
        assert_eq!(dead.ind_per_km2(), 0.0);
        assert!(dead.is_dead());
        assert!(Representation::individual(0.0).is_err());
    }
}
