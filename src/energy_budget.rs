//! Fat reserves and energy balance of one herbivore.

use crate::average::average;
use crate::error::{FaunaError, Result};

/// Tolerance for float drift when checking the daily fat gain cap.
const GAIN_TOLERANCE: f64 = 1.001;

/// Energy budget that stores surplus energy as body fat and covers deficits
/// by burning it.
///
/// All masses are per individual [kg], energies [MJ/ind].
#[derive(Debug, Clone, PartialEq)]
pub struct FatmassEnergyBudget {
    /// MJ needed to gain one kg of fat.
    anabolism_coefficient: f64,
    /// MJ released by burning one kg of fat.
    catabolism_coefficient: f64,
    energy_needs: f64,
    fatmass: f64,
    max_fatmass: f64,
    /// Maximum fat gain today [kg]; zero means no limit.
    max_fatmass_gain: f64,
    /// Fat gained since the last call to `set_max_fatmass` [kg].
    fatmass_gain_today: f64,
}

impl FatmassEnergyBudget {
    pub fn new(
        initial_fatmass: f64,
        max_fatmass: f64,
        anabolism_coefficient: f64,
        catabolism_coefficient: f64,
    ) -> Result<Self> {
        const CONTEXT: &str = "FatmassEnergyBudget::new";
        if !(initial_fatmass >= 0.0) {
            return Err(FaunaError::invalid(
                CONTEXT,
                format!("initial fat mass is negative ({initial_fatmass})"),
            ));
        }
        if !(max_fatmass > 0.0) {
            return Err(FaunaError::invalid(
                CONTEXT,
                format!("maximum fat mass must be positive ({max_fatmass})"),
            ));
        }
        if initial_fatmass > max_fatmass {
            return Err(FaunaError::invalid(
                CONTEXT,
                format!("initial fat mass {initial_fatmass} exceeds maximum {max_fatmass}"),
            ));
        }
        if !(anabolism_coefficient > 0.0) || !(catabolism_coefficient > 0.0) {
            return Err(FaunaError::invalid(
                CONTEXT,
                "anabolism and catabolism coefficients must be positive",
            ));
        }
        Ok(Self {
            anabolism_coefficient,
            catabolism_coefficient,
            energy_needs: 0.0,
            fatmass: initial_fatmass,
            max_fatmass,
            max_fatmass_gain: 0.0,
            fatmass_gain_today: 0.0,
        })
    }

    pub fn get_energy_needs(&self) -> f64 {
        self.energy_needs
    }

    pub fn get_fatmass(&self) -> f64 {
        self.fatmass
    }

    pub fn get_max_fatmass(&self) -> f64 {
        self.max_fatmass
    }

    /// Maximum energy [MJ/ind] that can still be stored as fat today.
    pub fn get_max_anabolism_per_day(&self) -> f64 {
        let mut gain = self.max_fatmass - self.fatmass;
        if self.max_fatmass_gain > 0.0 {
            gain = gain.min(self.max_fatmass_gain - self.fatmass_gain_today);
        }
        gain.max(0.0) * self.anabolism_coefficient
    }

    pub fn add_energy_needs(&mut self, energy: f64) -> Result<()> {
        if !(energy >= 0.0) {
            return Err(FaunaError::invalid(
                "FatmassEnergyBudget::add_energy_needs",
                format!("energy is negative ({energy})"),
            ));
        }
        self.energy_needs += energy;
        Ok(())
    }

    /// Covers all accumulated energy needs by burning fat.
    ///
    /// Fat mass cannot drop below zero; unmet needs are dropped and show up
    /// as low body condition.
    pub fn catabolize_fat(&mut self) {
        if self.energy_needs == 0.0 {
            return;
        }
        let burned = self.energy_needs / self.catabolism_coefficient;
        self.fatmass = (self.fatmass - burned).max(0.0);
        self.energy_needs = 0.0;
    }

    /// Ingests net energy [MJ/ind]: first pays off energy needs, then
    /// stores the rest as fat.
    pub fn metabolize_energy(&mut self, energy: f64) -> Result<()> {
        if !(energy >= 0.0) {
            return Err(FaunaError::invalid(
                "FatmassEnergyBudget::metabolize_energy",
                format!("energy is negative ({energy})"),
            ));
        }
        if energy <= self.energy_needs {
            self.energy_needs -= energy;
            return Ok(());
        }
        let surplus = energy - self.energy_needs;
        self.energy_needs = 0.0;

        let gain = surplus / self.anabolism_coefficient;
        let max_gain = self.get_max_anabolism_per_day() / self.anabolism_coefficient;
        if gain > max_gain * GAIN_TOLERANCE + f64::EPSILON {
            return Err(FaunaError::logic(format!(
                "fat gain of {gain} kg exceeds today's maximum of {max_gain} kg"
            )));
        }
        self.fatmass = (self.fatmass + gain).min(self.max_fatmass);
        self.fatmass_gain_today += gain;
        Ok(())
    }

    /// Sets the ceiling for fat mass and for today's gain, starting a new
    /// day of anabolism.
    ///
    /// Current fat mass is clamped down to the new ceiling.
    pub fn set_max_fatmass(&mut self, max_fatmass: f64, max_gain: f64) -> Result<()> {
        const CONTEXT: &str = "FatmassEnergyBudget::set_max_fatmass";
        if !(max_fatmass > 0.0) {
            return Err(FaunaError::invalid(
                CONTEXT,
                format!("maximum fat mass must be positive ({max_fatmass})"),
            ));
        }
        if !(max_gain >= 0.0) {
            return Err(FaunaError::invalid(
                CONTEXT,
                format!("maximum gain is negative ({max_gain})"),
            ));
        }
        self.max_fatmass = max_fatmass;
        self.max_fatmass_gain = max_gain;
        self.fatmass_gain_today = 0.0;
        self.fatmass = self.fatmass.min(max_fatmass);
        Ok(())
    }

    /// Overwrites fat mass with `body_condition * max_fatmass`.
    pub fn force_body_condition(&mut self, body_condition: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&body_condition) {
            return Err(FaunaError::invalid(
                "FatmassEnergyBudget::force_body_condition",
                format!("body condition {body_condition} is outside [0,1]"),
            ));
        }
        self.fatmass = body_condition * self.max_fatmass;
        Ok(())
    }

    /// Weighted average of this budget and `other`.
    pub fn merge(&mut self, other: &FatmassEnergyBudget, this_weight: f64, other_weight: f64) -> Result<()> {
        self.energy_needs = average(self.energy_needs, other.energy_needs, this_weight, other_weight)?;
        self.fatmass = average(self.fatmass, other.fatmass, this_weight, other_weight)?;
        self.max_fatmass = average(self.max_fatmass, other.max_fatmass, this_weight, other_weight)?;
        self.fatmass = self.fatmass.min(self.max_fatmass);
        Ok(())
    }
}
