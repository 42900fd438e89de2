//! Offspring production of mature females.

use serde::{Deserialize, Serialize};

use crate::error::{FaunaError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReproductionModel {
    /// No reproduction at all.
    #[serde(rename = "none")]
    None,
    /// Annual maximum regardless of body condition.
    #[serde(rename = "constant_maximum")]
    ConstantMaximum,
    /// Annual maximum scaled by body condition.
    #[serde(rename = "linear")]
    Linear,
    /// Logistic response to body condition (Illius & O'Connor 2000).
    #[serde(rename = "illius_oconnor_2000")]
    IlliusOConnor2000,
}

/// Days of the year in which offspring are born.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreedingSeason {
    start: u32,
    length: u32,
}

impl BreedingSeason {
    /// `start` is the day of the year (0 = January 1st), `length` in days.
    pub fn new(start: u32, length: u32) -> Result<Self> {
        if start >= 365 {
            return Err(FaunaError::invalid(
                "BreedingSeason::new",
                format!("start day {start} is outside [0,364]"),
            ));
        }
        if !(1..=365).contains(&length) {
            return Err(FaunaError::invalid(
                "BreedingSeason::new",
                format!("length {length} is outside [1,365]"),
            ));
        }
        Ok(Self { start, length })
    }

    /// Whether `day` lies in `[start, start + length)`, wrapping over the
    /// end of the year.
    pub fn is_in_season(&self, day: u32) -> Result<bool> {
        check_day(day, "BreedingSeason::is_in_season")?;
        let offset = (day + 365 - self.start) % 365;
        Ok(offset < self.length)
    }

    /// Spreads an annual rate evenly over the season.
    pub fn annual_to_daily_rate(&self, annual: f64) -> f64 {
        annual / self.length as f64
    }
}

fn check_day(day: u32, context: &'static str) -> Result<()> {
    if day >= 365 {
        return Err(FaunaError::invalid(
            context,
            format!("day of year {day} is outside [0,364]"),
        ));
    }
    Ok(())
}

fn check_body_condition(body_condition: f64, context: &'static str) -> Result<()> {
    if !(0.0..=1.0).contains(&body_condition) {
        return Err(FaunaError::invalid(
            context,
            format!("body condition {body_condition} is outside [0,1]"),
        ));
    }
    Ok(())
}

/// Reproduction model bound to one breeding season and annual maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reproduction {
    model: ReproductionModel,
    season: BreedingSeason,
    annual_maximum: f64,
    /// Growth rate and midpoint of the logistic curve.
    logistic: [f64; 2],
}

impl Reproduction {
    pub fn new(
        model: ReproductionModel,
        season: BreedingSeason,
        annual_maximum: f64,
        logistic: [f64; 2],
    ) -> Result<Self> {
        if !(annual_maximum >= 0.0) {
            return Err(FaunaError::invalid(
                "Reproduction::new",
                format!("annual maximum {annual_maximum} is negative"),
            ));
        }
        Ok(Self {
            model,
            season,
            annual_maximum,
            logistic,
        })
    }

    /// Offspring per female today.
    pub fn offspring_proportion(&self, day: u32, body_condition: f64) -> Result<f64> {
        const CONTEXT: &str = "Reproduction::offspring_proportion";
        check_day(day, CONTEXT)?;
        check_body_condition(body_condition, CONTEXT)?;
        if self.model == ReproductionModel::None || !self.season.is_in_season(day)? {
            return Ok(0.0);
        }
        let k = self.annual_maximum;
        let annual = match self.model {
            ReproductionModel::None => 0.0,
            ReproductionModel::ConstantMaximum => k,
            ReproductionModel::Linear => k * body_condition,
            ReproductionModel::IlliusOConnor2000 => {
                let [b, c] = self.logistic;
                k / (1.0 + (-b * (body_condition - c)).exp())
            }
        };
        Ok(self.season.annual_to_daily_rate(annual.clamp(0.0, k)))
    }
}
