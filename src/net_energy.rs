//! Net energy content of forage.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::forage::{Digestibility, ForageEnergyContent, ForageType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestionType {
    #[default]
    Ruminant,
    /// Hindgut (caecum or colon) fermenter.
    Hindgut,
}

impl DigestionType {
    /// Digestion efficiency relative to ruminants.
    pub fn efficiency(self) -> f64 {
        match self {
            DigestionType::Ruminant => 1.0,
            DigestionType::Hindgut => 0.93,
        }
    }

    /// Illius & Gordon (1992) intake parameters i, j, k.
    pub fn illius_gordon_1992_ijk(self) -> [f64; 3] {
        match self {
            DigestionType::Ruminant => [0.034, 3.565, 0.077],
            DigestionType::Hindgut => [0.108, 3.284, 0.080],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetEnergyModel {
    /// Metabolizable energy from digestibility, corrected for heat
    /// increment (Illius & Gordon 1991).
    #[default]
    Default,
}

/// Metabolizable energy per digestible dry matter [MJ/kgDM].
pub fn metabolizable_energy_coefficient(forage_type: ForageType) -> f64 {
    match forage_type {
        ForageType::Grass => 15.0,
    }
}

impl NetEnergyModel {
    /// Net energy content [MJ/kgDM] per forage type.
    pub fn net_energy_content(
        self,
        digestibility: &Digestibility,
        digestion_type: DigestionType,
    ) -> Result<ForageEnergyContent> {
        digestibility.check_fraction("NetEnergyModel::net_energy_content")?;
        match self {
            NetEnergyModel::Default => {
                let mut result = ForageEnergyContent::zero();
                for (ft, dig) in digestibility.iter() {
                    let me = dig * metabolizable_energy_coefficient(ft);
                    let ne = me * (0.019 * me + 0.503) * digestion_type.efficiency();
                    result.set(ft, ne);
                }
                Ok(result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forage::ForageValues;

    #[test]
    fn test_default_model() {
        let dig = ForageValues::new(0.5);
        let ruminant = NetEnergyModel::Default
            .net_energy_content(&dig, DigestionType::Ruminant)
            .unwrap();
        // ME = 7.5 MJ/kg
        let expected = 7.5 * (0.019 * 7.5 + 0.503);
        assert!((ruminant.get(ForageType::Grass) - expected).abs() < 1e-12);

        let hindgut = NetEnergyModel::Default
            .net_energy_content(&dig, DigestionType::Hindgut)
            .unwrap();
        assert!((hindgut.get(ForageType::Grass) - expected * 0.93).abs() < 1e-12);
    }

    #[test]
    fn test_zero_digestibility_gives_zero_energy() {
        let content = NetEnergyModel::Default
            .net_energy_content(&ForageValues::zero(), DigestionType::Ruminant)
            .unwrap();
        assert!(content.is_zero());
    }

    #[test]
    fn test_rejects_digestibility_above_one() {
        let result = NetEnergyModel::Default
            .net_energy_content(&ForageValues::new(1.2), DigestionType::Ruminant);
        assert!(result.is_err());
    }
}
