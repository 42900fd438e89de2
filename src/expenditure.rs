//! Daily energy expenditure [MJ/ind/day].

use serde::{Deserialize, Serialize};

use crate::error::{FaunaError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpenditureComponent {
    /// `c * M^e` with the HFT's allometry parameters.
    #[serde(rename = "allometric")]
    Allometric,
    /// Activity-based cattle model of Taylor et al. (1981).
    #[serde(rename = "taylor_1981")]
    Taylor1981,
    /// Temperature-dependent model of Zhu et al. (2018).
    #[serde(rename = "zhu_2018")]
    Zhu2018,
    /// Heat loss below the lower critical temperature.
    #[serde(rename = "thermoregulation")]
    Thermoregulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConductanceModel {
    #[default]
    #[serde(rename = "bradley_deavers_1980")]
    BradleyDeavers1980,
    /// Winter fur of reindeer and caribou.
    #[serde(rename = "cuyler_oeritsland_2004")]
    CuylerOeritsland2004,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FurSeason {
    Summer,
    Winter,
}

impl ConductanceModel {
    /// Whole-body thermal conductance [W/°C].
    pub fn conductance(self, bodymass: f64) -> f64 {
        match self {
            ConductanceModel::BradleyDeavers1980 => conductance_bradley_deavers_1980(bodymass),
            ConductanceModel::CuylerOeritsland2004 => {
                conductance_cuyler_oeritsland_2004(bodymass, FurSeason::Winter)
            }
        }
    }
}

pub fn conductance_bradley_deavers_1980(bodymass: f64) -> f64 {
    0.224 * bodymass.powf(0.574)
}

pub fn conductance_cuyler_oeritsland_2004(bodymass: f64, season: FurSeason) -> f64 {
    let coefficient = match season {
        FurSeason::Summer => 0.29,
        FurSeason::Winter => 0.08,
    };
    coefficient * bodymass.powf(0.57)
}

/// Taylor et al. (1981): `0.4 * M * M_ad^-0.27`.
pub fn expenditure_taylor_1981(bodymass: f64, adult_bodymass: f64) -> Result<f64> {
    if !(bodymass > 0.0) || !(adult_bodymass > 0.0) {
        return Err(FaunaError::invalid(
            "expenditure_taylor_1981",
            format!("body masses must be positive ({bodymass}, {adult_bodymass})"),
        ));
    }
    Ok(0.4 * bodymass * adult_bodymass.powf(-0.27))
}

/// Zhu et al. (2018): field metabolic rate as a function of air temperature.
pub fn expenditure_zhu_2018(bodymass: f64, air_temperature: f64) -> Result<f64> {
    if !(bodymass > 0.0) {
        return Err(FaunaError::invalid(
            "expenditure_zhu_2018",
            format!("body mass must be positive ({bodymass})"),
        ));
    }
    Ok(0.36 * (-0.0079 * air_temperature).exp() * bodymass.powf(0.75))
}

/// Extra expenditure to keep the core temperature when the ambient
/// temperature falls below the lower critical temperature.
///
/// `conductance` is in W/°C, `thermoneutral_rate` in MJ/ind/day.
pub fn thermoregulatory_expenditure(
    thermoneutral_rate: f64,
    conductance: f64,
    core_temperature: f64,
    ambient_temperature: f64,
) -> Result<f64> {
    if thermoneutral_rate < 0.0 {
        return Err(FaunaError::invalid(
            "thermoregulatory_expenditure",
            format!("thermoneutral rate is negative ({thermoneutral_rate})"),
        ));
    }
    if !(conductance > 0.0) {
        return Err(FaunaError::invalid(
            "thermoregulatory_expenditure",
            format!("conductance must be positive ({conductance})"),
        ));
    }
    if core_temperature <= 0.0 {
        return Err(FaunaError::invalid(
            "thermoregulatory_expenditure",
            format!("core temperature must be positive ({core_temperature})"),
        ));
    }
    // W/°C -> MJ/day/°C
    let conductance_mj = conductance * 24.0 * 3600.0 * 1e-6;
    let critical_temperature = core_temperature - thermoneutral_rate / conductance_mj;
    Ok(conductance_mj * (critical_temperature - ambient_temperature).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taylor_adult_matches_formula() {
        let value = expenditure_taylor_1981(100.0, 100.0).unwrap();
        assert!((value - 0.4 * 100.0 * 100f64.powf(-0.27)).abs() < 1e-12);
        assert!(expenditure_taylor_1981(0.0, 100.0).is_err());
    }

    #[test]
    fn test_zhu_decreases_with_temperature() {
        let cold = expenditure_zhu_2018(60.0, -20.0).unwrap();
        let warm = expenditure_zhu_2018(60.0, 20.0).unwrap();
        assert!(cold > warm);
    }

    #[test]
    fn test_no_thermoregulation_above_critical_temperature() {
        let conductance = conductance_bradley_deavers_1980(60.0);
        let rate = 10.0;
        let cond_mj = conductance * 0.0864;
        let critical = 38.0 - rate / cond_mj;
        let above = thermoregulatory_expenditure(rate, conductance, 38.0, critical + 1.0).unwrap();
        assert_eq!(above, 0.0);
        let below = thermoregulatory_expenditure(rate, conductance, 38.0, critical - 10.0).unwrap();
        assert!((below - cond_mj * 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_conductance_models() {
        let summer = conductance_cuyler_oeritsland_2004(100.0, FurSeason::Summer);
        let winter = conductance_cuyler_oeritsland_2004(100.0, FurSeason::Winter);
        assert!(summer > winter);
        assert_eq!(
            ConductanceModel::CuylerOeritsland2004.conductance(100.0),
            winter
        );
    }
}
