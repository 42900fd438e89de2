//! Per-forage-type values and the forage offered by a habitat.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::average::average;
use crate::error::{FaunaError, Result};

/// Edible forage categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForageType {
    Grass,
}

impl ForageType {
    pub const ALL: [ForageType; 1] = [ForageType::Grass];

    fn index(self) -> usize {
        match self {
            ForageType::Grass => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ForageType::Grass => "grass",
        }
    }
}

impl fmt::Display for ForageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const COUNT: usize = ForageType::ALL.len();

/// One scalar per forage type.
///
/// The same container carries masses, digestibilities, energy contents and
/// fractions; the type aliases below name what a value means.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForageValues {
    values: [f64; COUNT],
}

/// Dry matter mass [kgDM/km² or kgDM/ind].
pub type ForageMass = ForageValues;
/// Proportional digestibility [0,1].
pub type Digestibility = ForageValues;
/// Net energy per dry matter [MJ/kgDM].
pub type ForageEnergyContent = ForageValues;
/// Energy [MJ].
pub type ForageEnergy = ForageValues;
/// Dimensionless fraction.
pub type ForageFraction = ForageValues;

impl ForageValues {
    /// All forage types set to `value`.
    pub fn new(value: f64) -> Self {
        Self {
            values: [value; COUNT],
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0)
    }

    pub fn from_grass(value: f64) -> Self {
        let mut result = Self::zero();
        result.set(ForageType::Grass, value);
        result
    }

    pub fn get(&self, forage_type: ForageType) -> f64 {
        self.values[forage_type.index()]
    }

    pub fn set(&mut self, forage_type: ForageType, value: f64) {
        self.values[forage_type.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (ForageType, f64)> + '_ {
        ForageType::ALL.iter().map(move |&ft| (ft, self.get(ft)))
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Element-wise minimum.
    pub fn min(&self, other: &ForageValues) -> ForageValues {
        self.zip_with(other, f64::min)
    }

    /// Element-wise division where a zero divisor yields `na` for that type.
    pub fn divide_safely(&self, divisor: &ForageValues, na: f64) -> ForageValues {
        self.zip_with(divisor, |a, b| if b == 0.0 { na } else { a / b })
    }

    /// Weighted average with another object, element by element.
    pub fn merge(&self, other: &ForageValues, this_weight: f64, other_weight: f64) -> Result<ForageValues> {
        let mut result = ForageValues::zero();
        for ft in ForageType::ALL {
            result.set(ft, average(self.get(ft), other.get(ft), this_weight, other_weight)?);
        }
        Ok(result)
    }

    /// Fails if any value is negative or not finite.
    pub fn check_non_negative(&self, context: &'static str) -> Result<()> {
        for (ft, value) in self.iter() {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(FaunaError::invalid(
                    context,
                    format!("{ft} value {value} is not a finite non-negative number"),
                ));
            }
        }
        Ok(())
    }

    /// Fails if any value lies outside [0,1].
    pub fn check_fraction(&self, context: &'static str) -> Result<()> {
        for (ft, value) in self.iter() {
            if !(0.0..=1.0).contains(&value) {
                return Err(FaunaError::invalid(
                    context,
                    format!("{ft} fraction {value} is outside [0,1]"),
                ));
            }
        }
        Ok(())
    }

    fn zip_with(&self, other: &ForageValues, f: impl Fn(f64, f64) -> f64) -> ForageValues {
        let mut values = [0.0; COUNT];
        for (i, value) in values.iter_mut().enumerate() {
            *value = f(self.values[i], other.values[i]);
        }
        ForageValues { values }
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> ForageValues {
        ForageValues {
            values: self.values.map(f),
        }
    }
}

impl Add for ForageValues {
    type Output = ForageValues;
    fn add(self, rhs: ForageValues) -> ForageValues {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl AddAssign for ForageValues {
    fn add_assign(&mut self, rhs: ForageValues) {
        *self = *self + rhs;
    }
}

impl Sub for ForageValues {
    type Output = ForageValues;
    fn sub(self, rhs: ForageValues) -> ForageValues {
        self.zip_with(&rhs, |a, b| a - b)
    }
}

impl SubAssign for ForageValues {
    fn sub_assign(&mut self, rhs: ForageValues) {
        *self = *self - rhs;
    }
}

impl Mul for ForageValues {
    type Output = ForageValues;
    fn mul(self, rhs: ForageValues) -> ForageValues {
        self.zip_with(&rhs, |a, b| a * b)
    }
}

impl Mul<f64> for ForageValues {
    type Output = ForageValues;
    fn mul(self, rhs: f64) -> ForageValues {
        self.map(|a| a * rhs)
    }
}

/// Division by a scalar; a zero divisor yields zero.
impl Div<f64> for ForageValues {
    type Output = ForageValues;
    fn div(self, rhs: f64) -> ForageValues {
        if rhs == 0.0 {
            ForageValues::zero()
        } else {
            self.map(|a| a / rhs)
        }
    }
}

/// Forage available in one habitat on one day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HabitatForage {
    /// Dry matter [kgDM/km²].
    pub mass: ForageMass,
    pub digestibility: Digestibility,
    /// Nitrogen contained in the dry matter [kgN/km²].
    pub nitrogen: ForageMass,
}

impl HabitatForage {
    pub fn new(mass: ForageMass, digestibility: Digestibility, nitrogen: ForageMass) -> Result<Self> {
        mass.check_non_negative("HabitatForage::new")?;
        digestibility.check_fraction("HabitatForage::new")?;
        nitrogen.check_non_negative("HabitatForage::new")?;
        Ok(Self {
            mass,
            digestibility,
            nitrogen,
        })
    }

    pub fn total_mass(&self) -> f64 {
        self.mass.sum()
    }

    /// Nitrogen per dry matter [kgN/kgDM].
    pub fn nitrogen_content(&self) -> ForageFraction {
        self.nitrogen.divide_safely(&self.mass, 0.0)
    }

    /// Removes `eaten` mass together with its proportional share of nitrogen.
    pub fn remove(&mut self, eaten: &ForageMass) {
        let nitrogen = *eaten * self.nitrogen_content();
        self.nitrogen = (self.nitrogen - nitrogen).zip_with(&ForageValues::zero(), f64::max);
        self.mass = (self.mass - *eaten).zip_with(&ForageValues::zero(), f64::max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide_safely_zero_divisor() {
        let a = ForageValues::new(3.0);
        let b = ForageValues::zero();
        assert_eq!(a.divide_safely(&b, 0.0), ForageValues::zero());
        assert_eq!(a / 0.0, ForageValues::zero());
    }

    #[test]
    fn test_arithmetic() {
        let a = ForageValues::from_grass(4.0);
        let b = ForageValues::from_grass(1.5);
        assert_eq!((a + b).get(ForageType::Grass), 5.5);
        assert_eq!((a - b).get(ForageType::Grass), 2.5);
        assert_eq!((a * b).get(ForageType::Grass), 6.0);
        assert_eq!(a.min(&b), b);
        assert_eq!((a * 0.5).sum(), 2.0);
        assert!(!a.is_zero());
    }

    #[test]
    fn test_merge_weighted() {
        let a = ForageValues::new(1.0);
        let b = ForageValues::new(3.0);
        let merged = a.merge(&b, 1.0, 3.0).unwrap();
        assert!((merged.get(ForageType::Grass) - 2.5).abs() < 1e-12);
        assert!(a.merge(&b, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_habitat_forage_validation() {
        let bad = HabitatForage::new(
            ForageValues::new(-1.0),
            ForageValues::new(0.5),
            ForageValues::zero(),
        );
        assert!(bad.is_err());
        let bad = HabitatForage::new(
            ForageValues::new(1.0),
            ForageValues::new(1.5),
            ForageValues::zero(),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_remove_takes_nitrogen_share() {
        let mut forage = HabitatForage::new(
            ForageValues::new(100.0),
            ForageValues::new(0.6),
            ForageValues::new(2.0),
        )
        .unwrap();
        forage.remove(&ForageValues::new(25.0));
        assert!((forage.total_mass() - 75.0).abs() < 1e-12);
        assert!((forage.nitrogen.sum() - 1.5).abs() < 1e-12);
    }
}
