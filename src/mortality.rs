//! Causes of death. Each factor yields an independent daily mortality in
//! [0,1].

use serde::{Deserialize, Serialize};

use crate::error::{FaunaError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MortalityFactor {
    /// Constant rate, distinguishing the first year of life.
    #[serde(rename = "background")]
    Background,
    /// Certain death after the lifespan.
    #[serde(rename = "lifespan")]
    Lifespan,
    /// Cohort starvation after Illius & O'Connor (2000).
    #[serde(rename = "starvation_illius_oconnor_2000")]
    StarvationIlliusOConnor2000,
    /// Death below a body fat threshold.
    #[serde(rename = "starvation_threshold")]
    StarvationThreshold,
}

impl MortalityFactor {
    pub fn name(self) -> &'static str {
        match self {
            MortalityFactor::Background => "background",
            MortalityFactor::Lifespan => "lifespan",
            MortalityFactor::StarvationIlliusOConnor2000 => "starvation_illius_oconnor_2000",
            MortalityFactor::StarvationThreshold => "starvation_threshold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundMortality {
    annual_juvenile: f64,
    annual_adult: f64,
}

impl BackgroundMortality {
    pub fn new(annual_juvenile: f64, annual_adult: f64) -> Result<Self> {
        for rate in [annual_juvenile, annual_adult] {
            if !(0.0..1.0).contains(&rate) {
                return Err(FaunaError::invalid(
                    "BackgroundMortality::new",
                    format!("annual mortality {rate} is outside [0,1)"),
                ));
            }
        }
        Ok(Self {
            annual_juvenile,
            annual_adult,
        })
    }

    pub fn daily(&self, age_days: u32) -> f64 {
        let annual = if age_days < 365 {
            self.annual_juvenile
        } else {
            self.annual_adult
        };
        1.0 - (1.0 - annual).powf(1.0 / 365.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifespanMortality {
    lifespan_years: u32,
}

impl LifespanMortality {
    pub fn new(lifespan_years: u32) -> Result<Self> {
        if lifespan_years == 0 {
            return Err(FaunaError::invalid(
                "LifespanMortality::new",
                "lifespan must be at least one year",
            ));
        }
        Ok(Self { lifespan_years })
    }

    pub fn daily(&self, age_days: u32) -> f64 {
        if age_days >= self.lifespan_years * 365 {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarvationThreshold {
    min_bodyfat: f64,
}

impl StarvationThreshold {
    pub const DEFAULT_MIN_BODYFAT: f64 = 0.005;

    pub fn new(min_bodyfat: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&min_bodyfat) {
            return Err(FaunaError::invalid(
                "StarvationThreshold::new",
                format!("minimum body fat {min_bodyfat} is outside [0,1)"),
            ));
        }
        Ok(Self { min_bodyfat })
    }

    pub fn daily(&self, bodyfat: f64) -> Result<f64> {
        if !(0.0..1.0).contains(&bodyfat) {
            return Err(FaunaError::invalid(
                "StarvationThreshold::daily",
                format!("body fat {bodyfat} is outside [0,1)"),
            ));
        }
        Ok(if bodyfat < self.min_bodyfat { 1.0 } else { 0.0 })
    }
}

impl Default for StarvationThreshold {
    fn default() -> Self {
        Self {
            min_bodyfat: Self::DEFAULT_MIN_BODYFAT,
        }
    }
}

/// Result of the Illius & O'Connor (2000) starvation model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Starvation {
    pub mortality: f64,
    /// Mean body condition of the survivors.
    pub body_condition: f64,
}

/// Body condition within a cohort is normally distributed around the mean;
/// the fraction of the distribution below zero dies.
///
/// With `shift_body_condition` the fat of the dead animals is counted as
/// zero, so the survivors' mean rises to `bc / (1 - mortality)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarvationIlliusOConnor2000 {
    deviation: f64,
    shift_body_condition: bool,
}

impl StarvationIlliusOConnor2000 {
    pub fn new(deviation: f64, shift_body_condition: bool) -> Result<Self> {
        if !(0.0..=1.0).contains(&deviation) {
            return Err(FaunaError::invalid(
                "StarvationIlliusOConnor2000::new",
                format!("standard deviation {deviation} is outside [0,1]"),
            ));
        }
        Ok(Self {
            deviation,
            shift_body_condition,
        })
    }

    pub fn daily(&self, body_condition: f64) -> Result<Starvation> {
        if !(0.0..=1.0).contains(&body_condition) {
            return Err(FaunaError::invalid(
                "StarvationIlliusOConnor2000::daily",
                format!("body condition {body_condition} is outside [0,1]"),
            ));
        }
        if self.deviation == 0.0 {
            return Ok(Starvation {
                mortality: 0.0,
                body_condition,
            });
        }
        let mortality = cumulative_normal(-body_condition / self.deviation).clamp(0.0, 1.0);
        let body_condition = if self.shift_body_condition && mortality > 0.0 && mortality < 1.0 {
            (body_condition / (1.0 - mortality)).min(1.0)
        } else {
            body_condition
        };
        Ok(Starvation {
            mortality,
            body_condition,
        })
    }
}

/// Standard normal cumulative distribution function Φ.
///
/// Abramowitz & Stegun formula 7.1.26; absolute error below 1.5e-7.
pub fn cumulative_normal(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs() / std::f64::consts::SQRT_2;
    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    0.5 * (1.0 + sign * y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_mortality() {
        assert!(BackgroundMortality::new(1.0, 0.1).is_err());
        assert!(BackgroundMortality::new(0.1, -0.1).is_err());
        let background = BackgroundMortality::new(0.3, 0.1).unwrap();
        let juvenile = background.daily(10);
        let adult = background.daily(400);
        assert!(juvenile > adult);
        // Compounded over a year, the daily rate restores the annual one.
        let survival = (1.0 - adult).powi(365);
        assert!((1.0 - survival - 0.1).abs() < 1e-9);
        assert_eq!(BackgroundMortality::new(0.0, 0.0).unwrap().daily(1000), 0.0);
    }

    #[test]
    fn test_lifespan_mortality() {
        assert!(LifespanMortality::new(0).is_err());
        let lifespan = LifespanMortality::new(20).unwrap();
        assert_eq!(lifespan.daily(0), 0.0);
        assert_eq!(lifespan.daily(20 * 365 - 1), 0.0);
        assert_eq!(lifespan.daily(20 * 365), 1.0);
        assert_eq!(lifespan.daily(21 * 365), 1.0);
    }

    #[test]
    fn test_starvation_threshold() {
        assert!(StarvationThreshold::new(1.0).is_err());
        assert!(StarvationThreshold::new(-0.1).is_err());
        let threshold = StarvationThreshold::default();
        assert_eq!(threshold.daily(0.0).unwrap(), 1.0);
        assert_eq!(threshold.daily(0.1).unwrap(), 0.0);
        assert!(threshold.daily(1.0).is_err());
    }

    #[test]
    fn test_cumulative_normal() {
        assert!((cumulative_normal(0.0) - 0.5).abs() < 1e-7);
        assert!((cumulative_normal(1.0) - 0.841344746).abs() < 1e-6);
        assert!((cumulative_normal(-1.0) - 0.158655254).abs() < 1e-6);
        assert!(cumulative_normal(-8.0) < 1e-6);
    }

    #[test]
    fn test_starvation_illius_oconnor() {
        assert!(StarvationIlliusOConnor2000::new(1.5, true).is_err());
        let model = StarvationIlliusOConnor2000::new(0.125, false).unwrap();
        let starving = model.daily(0.0).unwrap();
        assert!((starving.mortality - 0.5).abs() < 1e-6);
        let fat = model.daily(1.0).unwrap();
        assert!(fat.mortality < 1e-6);
        assert_eq!(fat.body_condition, 1.0);
        assert!(model.daily(1.1).is_err());
        assert!(model.daily(0.05).unwrap().mortality > model.daily(0.2).unwrap().mortality);
    }

    #[test]
    fn test_starvation_shifts_body_condition() {
        let model = StarvationIlliusOConnor2000::new(0.125, true).unwrap();
        let result = model.daily(0.1).unwrap();
        assert!(result.mortality > 0.0);
        assert!((result.body_condition - 0.1 / (1.0 - result.mortality)).abs() < 1e-12);
    }

    #[test]
    fn test_no_deviation_no_starvation() {
        let model = StarvationIlliusOConnor2000::new(0.0, true).unwrap();
        let result = model.daily(0.0).unwrap();
        assert_eq!(result.mortality, 0.0);
        assert_eq!(result.body_condition, 0.0);
    }
}
