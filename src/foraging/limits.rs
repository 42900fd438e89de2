use serde::{Deserialize, Serialize};

use crate::error::{FaunaError, Result};
use crate::forage::{
    Digestibility, ForageEnergy, ForageEnergyContent, ForageFraction, ForageMass, ForageType,
};

/// Physiological upper bound of daily intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigestiveLimit {
    #[serde(rename = "none")]
    None,
    /// `c * M^e` as total dry matter per day.
    #[serde(rename = "allometric")]
    Allometric,
    /// Fraction of body mass per day, scaled with `M^0.75` for juveniles.
    #[serde(rename = "fixed_fraction")]
    FixedFraction,
    /// Digestion limit of Illius & Gordon (1992), grass only.
    #[serde(rename = "illius_gordon_1992")]
    IlliusGordon1992,
}

/// Constraints on intake imposed by foraging behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ForagingLimit {
    /// Type II functional response applied to the Illius & Gordon (1992)
    /// energy limit.
    #[serde(rename = "illius_oconnor_2000")]
    IlliusOConnor2000,
    /// Type II functional response applied to the mass intake limit.
    #[serde(rename = "general_functional_response")]
    GeneralFunctionalResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DietComposer {
    #[default]
    #[serde(rename = "pure_grazer")]
    PureGrazer,
}

impl DietComposer {
    /// Energy fractions of the diet; they sum up to 1.
    pub fn composition(self) -> ForageFraction {
        match self {
            DietComposer::PureGrazer => ForageFraction::from_grass(1.0),
        }
    }
}

/// Holling Type II functional response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfMaxIntake {
    half_max_density: f64,
    max_intake: f64,
}

impl HalfMaxIntake {
    /// `half_max_density` is the forage density at which intake reaches half
    /// of `max_intake`; both in consistent units.
    pub fn new(half_max_density: f64, max_intake: f64) -> Result<Self> {
        if !(half_max_density > 0.0) {
            return Err(FaunaError::invalid(
                "HalfMaxIntake::new",
                format!("half-max density must be positive ({half_max_density})"),
            ));
        }
        if !(max_intake > 0.0) {
            return Err(FaunaError::invalid(
                "HalfMaxIntake::new",
                format!("maximum intake must be positive ({max_intake})"),
            ));
        }
        Ok(Self {
            half_max_density,
            max_intake,
        })
    }

    pub fn intake_rate(&self, density: f64) -> Result<f64> {
        if !(density >= 0.0) {
            return Err(FaunaError::invalid(
                "HalfMaxIntake::intake_rate",
                format!("density must not be negative ({density})"),
            ));
        }
        Ok(self.max_intake * density / (self.half_max_density + density))
    }
}

/// Maximum energy digestible per day [MJ/ind/day] after Illius & Gordon (1992).
pub fn digestive_limit_illius_gordon_1992(
    bodymass: f64,
    bodymass_adult: f64,
    digestibility: &Digestibility,
    ijk: [f64; 3],
) -> Result<ForageEnergy> {
    if !(bodymass_adult > 0.0) {
        return Err(FaunaError::invalid(
            "digestive_limit_illius_gordon_1992",
            format!("adult body mass must be positive ({bodymass_adult})"),
        ));
    }
    if !(bodymass > 0.0) {
        return Err(FaunaError::invalid(
            "digestive_limit_illius_gordon_1992",
            format!("body mass must be positive ({bodymass})"),
        ));
    }
    let [i, j, k] = ijk;
    let mut result = ForageEnergy::zero();
    for (ft, d) in digestibility.iter() {
        match ft {
            ForageType::Grass => {
                if d > 0.0 {
                    let limit = i
                        * (j * d).exp()
                        * bodymass_adult.powf(k * d.exp() + 0.73)
                        * (bodymass / bodymass_adult).powf(0.75);
                    result.set(ft, limit);
                }
            }
        }
    }
    Ok(result)
}

/// Splits a total dry matter intake over forage types so that the energy
/// proportions follow `mj_proportions`.
pub fn max_intake_as_total_mass(
    mj_proportions: &ForageFraction,
    energy_content: &ForageEnergyContent,
    kg_total: f64,
) -> Result<ForageMass> {
    if kg_total < 0.0 {
        return Err(FaunaError::invalid(
            "max_intake_as_total_mass",
            format!("total mass is negative ({kg_total})"),
        ));
    }
    if kg_total == 0.0 {
        return Ok(ForageMass::zero());
    }
    let mass_proportions = mj_proportions.divide_safely(energy_content, 0.0);
    Ok(mass_proportions / mass_proportions.sum() * kg_total)
}
