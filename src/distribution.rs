//! Sharing scarce forage among competing herbivores.

use tracing::debug;

use crate::error::{FaunaError, Result};
use crate::forage::{ForageMass, ForageType, HabitatForage};
use crate::herbivore::Herbivore;
use crate::parameters::ForageDistributionAlgorithm;

/// Share of the available forage that may be handed out; keeps the pool
/// from being drained to exactly zero by rounding errors.
const SAFETY_FACTOR: f64 = 0.999;

/// Remaining forage mass [kgDM/km²] below which feeding stops.
const MIN_AVAILABLE_MASS: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForageDistributor {
    algorithm: ForageDistributionAlgorithm,
}

impl ForageDistributor {
    pub fn new(algorithm: ForageDistributionAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Splits `available` among `demands` [kgDM/km²], returning one portion
    /// per demand in the same order.
    pub fn distribute(&self, available: &ForageMass, demands: &[ForageMass]) -> Result<Vec<ForageMass>> {
        available.check_non_negative("ForageDistributor::distribute")?;
        for demand in demands {
            demand.check_non_negative("ForageDistributor::distribute")?;
        }
        match self.algorithm {
            ForageDistributionAlgorithm::Equally => Ok(distribute_equally(available, demands)),
        }
    }
}

/// Every herbivore gets the same fraction of its demand for each forage
/// type.
fn distribute_equally(available: &ForageMass, demands: &[ForageMass]) -> Vec<ForageMass> {
    let available = *available * SAFETY_FACTOR;
    let total = demands
        .iter()
        .fold(ForageMass::zero(), |sum, demand| sum + *demand);

    let mut portions = demands.to_vec();
    for ft in ForageType::ALL {
        let total_demand = total.get(ft);
        if total_demand <= available.get(ft) {
            continue;
        }
        for (portion, demand) in portions.iter_mut().zip(demands) {
            let share = if total_demand > 0.0 {
                available.get(ft) * demand.get(ft) / total_demand
            } else {
                0.0
            };
            portion.set(ft, share);
        }
    }
    portions
}

/// Feeds all `herbivores` from `available` until either the forage or the
/// demands are exhausted. Eaten forage is subtracted from `available`; the
/// total eaten [kgDM/km²] is returned.
pub fn feed_herbivores(
    available: &mut HabitatForage,
    herbivores: &mut [&mut Herbivore],
    distributor: &ForageDistributor,
) -> Result<ForageMass> {
    let mut total_eaten = ForageMass::zero();
    // Each round can satisfy at least one forage type completely.
    for round in 0..ForageType::ALL.len() {
        if available.total_mass() <= MIN_AVAILABLE_MASS {
            break;
        }
        let demands = herbivores
            .iter_mut()
            .map(|h| h.forage_demands(available))
            .collect::<Result<Vec<_>>>()?;
        if demands.iter().all(ForageMass::is_zero) {
            break;
        }

        let portions = distributor.distribute(&available.mass, &demands)?;
        let nitrogen_content = available.nitrogen_content();
        let mut eaten = ForageMass::zero();
        for (herbivore, portion) in herbivores.iter_mut().zip(&portions) {
            if herbivore.ind_per_km2() > 0.0 && !portion.is_zero() {
                herbivore.eat(portion, &available.digestibility, &(*portion * nitrogen_content))?;
                eaten += *portion;
            }
        }
        for (ft, kg) in eaten.iter() {
            if kg > available.mass.get(ft) {
                return Err(FaunaError::logic(format!(
                    "herbivores ate {kg} kgDM/km² of {ft} but only {} were available",
                    available.mass.get(ft)
                )));
            }
        }
        debug!(round, eaten = eaten.sum(), "Feeding round");
        available.remove(&eaten);
        total_eaten += eaten;
    }
    Ok(total_eaten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forage::ForageValues;

    #[test]
    fn test_enough_forage_returns_demands() {
        let distributor = ForageDistributor::default();
        let demands = vec![ForageValues::new(10.0), ForageValues::new(20.0)];
        let portions = distributor
            .distribute(&ForageValues::new(100.0), &demands)
            .unwrap();
        assert_eq!(portions, demands);
    }

    #[test]
    fn test_scarce_forage_is_shared_proportionally() {
        let distributor = ForageDistributor::default();
        let demands = vec![ForageValues::new(10.0), ForageValues::new(30.0)];
        let portions = distributor
            .distribute(&ForageValues::new(20.0), &demands)
            .unwrap();
        let available = 20.0 * SAFETY_FACTOR;
        assert!((portions[0].sum() - available * 0.25).abs() < 1e-9);
        assert!((portions[1].sum() - available * 0.75).abs() < 1e-9);
        let total: f64 = portions.iter().map(ForageValues::sum).sum();
        assert!(total < 20.0);
    }

    #[test]
    fn test_zero_demand_gets_nothing() {
        let distributor = ForageDistributor::default();
        let demands = vec![ForageValues::zero(), ForageValues::new(30.0)];
        let portions = distributor
            .distribute(&ForageValues::new(20.0), &demands)
            .unwrap();
        assert!(portions[0].is_zero());
        assert!(distributor
            .distribute(&ForageValues::new(-1.0), &demands)
            .is_err());
    }
}
