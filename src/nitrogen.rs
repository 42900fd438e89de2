//! Nitrogen uptake, retention and excretion of a herbivore population.

use crate::error::{FaunaError, Result};

/// Nitrogen fraction in live herbivore mass [kgN/kg].
pub const N_CONTENT_IN_TISSUE: f64 = 0.03;

/// Time ingesta need to pass the digestive tract [hours].
pub fn retention_time(bodymass: f64) -> Result<f64> {
    if !(bodymass > 0.0) {
        return Err(FaunaError::invalid(
            "retention_time",
            format!("body mass must be positive ({bodymass})"),
        ));
    }
    Ok(32.8 * bodymass.powf(0.07))
}

/// Nitrogen pools of one herbivore object [kgN/km²].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NitrogenInHerbivore {
    /// In the guts and the body.
    bound: f64,
    /// Excreted and ready to return to the soil.
    excreta: f64,
    /// Eaten today and not yet digested.
    ingested: f64,
}

impl NitrogenInHerbivore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn excreta(&self) -> f64 {
        self.excreta
    }

    /// Nitrogen inside the animals.
    pub fn unavailable(&self) -> f64 {
        self.bound + self.ingested
    }

    pub fn ingest(&mut self, nitrogen: f64) -> Result<()> {
        if !(nitrogen >= 0.0) {
            return Err(FaunaError::invalid(
                "NitrogenInHerbivore::ingest",
                format!("nitrogen is negative ({nitrogen})"),
            ));
        }
        self.ingested += nitrogen;
        Ok(())
    }

    /// Moves ingested nitrogen into the bound pool up to what guts and
    /// tissue can hold; the overflow is excreted.
    ///
    /// `retention_time` in hours, `massdens` in kg/km².
    pub fn digest_today(&mut self, retention_time: f64, massdens: f64) -> Result<()> {
        if !(retention_time > 0.0) {
            return Err(FaunaError::invalid(
                "NitrogenInHerbivore::digest_today",
                format!("retention time must be positive ({retention_time})"),
            ));
        }
        if !(massdens >= 0.0) {
            return Err(FaunaError::invalid(
                "NitrogenInHerbivore::digest_today",
                format!("mass density is negative ({massdens})"),
            ));
        }
        let max_in_guts = self.ingested * retention_time / 24.0;
        let max_bound = max_in_guts + massdens * N_CONTENT_IN_TISSUE;
        self.excreta += (self.bound + self.ingested - max_bound).max(0.0);
        self.bound = max_bound.min(self.bound + self.ingested);
        self.ingested = 0.0;
        Ok(())
    }

    pub fn merge(&mut self, other: &NitrogenInHerbivore) {
        self.bound += other.bound;
        self.excreta += other.excreta;
        self.ingested += other.ingested;
    }

    /// Takes out the excreted nitrogen.
    pub fn reset_excreta(&mut self) -> f64 {
        std::mem::take(&mut self.excreta)
    }

    /// Takes out all nitrogen, e.g. when the animals died.
    pub fn reset_total(&mut self) -> f64 {
        let total = self.unavailable() + self.excreta;
        *self = Self::default();
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retention_time() {
        assert!(retention_time(0.0).is_err());
        assert!((retention_time(100.0).unwrap() - 45.276604).abs() < 1e-5);
    }

    #[test]
    fn test_overflow_is_excreted() {
        let mut n = NitrogenInHerbivore::new();
        assert!(n.ingest(-1.0).is_err());
        n.ingest(10.0).unwrap();
        // 12 h retention keeps half of a day's intake in the guts.
        n.digest_today(12.0, 0.0).unwrap();
        assert!((n.unavailable() - 5.0).abs() < 1e-12);
        assert!((n.excreta() - 5.0).abs() < 1e-12);
        assert!((n.reset_excreta() - 5.0).abs() < 1e-12);
        assert_eq!(n.excreta(), 0.0);
    }

    #[test]
    fn test_tissue_binds_nitrogen() {
        let mut n = NitrogenInHerbivore::new();
        n.ingest(1.0).unwrap();
        n.digest_today(24.0, 1000.0).unwrap();
        assert_eq!(n.excreta(), 0.0);
        assert_eq!(n.unavailable(), 1.0);
        assert!(n.digest_today(0.0, 1.0).is_err());
    }

    #[test]
    fn test_merge_and_reset_total() {
        let mut a = NitrogenInHerbivore::new();
        a.ingest(2.0).unwrap();
        let mut b = NitrogenInHerbivore::new();
        b.ingest(3.0).unwrap();
        a.merge(&b);
        assert_eq!(a.unavailable(), 5.0);
        assert_eq!(a.reset_total(), 5.0);
        assert_eq!(a.unavailable(), 0.0);
    }
}
