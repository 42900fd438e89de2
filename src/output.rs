//! Daily output records of herbivores and habitats.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::average::average;
use crate::error::{FaunaError, Result};
use crate::forage::{ForageEnergy, ForageEnergyContent, ForageMass, ForageType};
use crate::mortality::MortalityFactor;

/// State and fluxes of one herbivore object (or an aggregate) on one day.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HerbivoreData {
    pub age_years: f64,
    /// Body fat fraction [kg/kg].
    pub bodyfat: f64,
    /// Nitrogen bound in the herbivores [kgN/km²].
    pub bound_nitrogen: f64,
    /// [kgN/ind/day]
    pub eaten_nitrogen_per_ind: f64,
    /// [MJ/ind/day]
    pub expenditure: f64,
    /// [ind/km²]
    pub inddens: f64,
    /// [kg/km²]
    pub massdens: f64,
    /// New born [ind/km²/day].
    pub offspring: f64,
    /// Daily mortality per cause.
    pub mortality: BTreeMap<MortalityFactor, f64>,
    /// [kgDM/ind/day]
    pub eaten_forage_per_ind: ForageMass,
    /// [kgDM/kg/day]
    pub eaten_forage_per_mass: ForageMass,
    /// Net energy content of the available forage [MJ/kgDM].
    pub energy_content: ForageEnergyContent,
    /// [MJ/ind/day]
    pub energy_intake_per_ind: ForageEnergy,
    /// [MJ/kg/day]
    pub energy_intake_per_mass: ForageEnergy,
}

impl HerbivoreData {
    /// Aggregates the output of many herbivore objects of one HFT.
    ///
    /// Densities and fluxes per area are summed; values per individual are
    /// averaged weighted by individual density.
    pub fn create_datapoint(items: &[HerbivoreData]) -> Result<HerbivoreData> {
        if items.is_empty() {
            return Err(FaunaError::invalid(
                "HerbivoreData::create_datapoint",
                "no herbivore output to aggregate",
            ));
        }
        let mut result = HerbivoreData::default();
        for other in items {
            let (w1, w2) = (result.inddens, other.inddens);
            if w1 > 0.0 || w2 > 0.0 {
                result.age_years = average(result.age_years, other.age_years, w1, w2)?;
                result.bodyfat = average(result.bodyfat, other.bodyfat, w1, w2)?;
                result.eaten_nitrogen_per_ind =
                    average(result.eaten_nitrogen_per_ind, other.eaten_nitrogen_per_ind, w1, w2)?;
                result.expenditure = average(result.expenditure, other.expenditure, w1, w2)?;
                result.eaten_forage_per_ind =
                    result.eaten_forage_per_ind.merge(&other.eaten_forage_per_ind, w1, w2)?;
                result.eaten_forage_per_mass =
                    result.eaten_forage_per_mass.merge(&other.eaten_forage_per_mass, w1, w2)?;
                result.energy_intake_per_ind =
                    result.energy_intake_per_ind.merge(&other.energy_intake_per_ind, w1, w2)?;
                result.energy_intake_per_mass =
                    result.energy_intake_per_mass.merge(&other.energy_intake_per_mass, w1, w2)?;
                result.energy_content =
                    merge_energy_content(&result.energy_content, &other.energy_content, w1, w2)?;
                for (factor, value) in &other.mortality {
                    let current = result.mortality.get(factor).copied().unwrap_or(0.0);
                    result.mortality.insert(*factor, average(current, *value, w1, w2)?);
                }
            }
            result.bound_nitrogen += other.bound_nitrogen;
            result.inddens += other.inddens;
            result.massdens += other.massdens;
            result.offspring += other.offspring;
        }
        Ok(result)
    }

    /// Weighted average over time, e.g. to write monthly means.
    pub fn merge(&mut self, other: &HerbivoreData, this_weight: f64, other_weight: f64) -> Result<()> {
        if !(this_weight >= 0.0) || !(other_weight >= 0.0) {
            return Err(FaunaError::invalid(
                "HerbivoreData::merge",
                "weights must not be negative",
            ));
        }
        if this_weight == 0.0 && other_weight == 0.0 {
            return Err(FaunaError::invalid(
                "HerbivoreData::merge",
                "both objects have zero weight",
            ));
        }
        if other_weight == 0.0 {
            return Ok(());
        }
        if this_weight == 0.0 {
            *self = other.clone();
            return Ok(());
        }
        if other.inddens > 0.0 || self.inddens > 0.0 {
            let w1 = this_weight * self.inddens;
            let w2 = other_weight * other.inddens;
            self.age_years = average(self.age_years, other.age_years, w1, w2)?;
            self.bodyfat = average(self.bodyfat, other.bodyfat, w1, w2)?;
            self.expenditure = average(self.expenditure, other.expenditure, w1, w2)?;
        }
        let (w1, w2) = (this_weight, other_weight);
        self.eaten_nitrogen_per_ind =
            average(self.eaten_nitrogen_per_ind, other.eaten_nitrogen_per_ind, w1, w2)?;
        // Only causes present in both records are meaningful averages.
        let mut mortality = BTreeMap::new();
        for (factor, value) in &other.mortality {
            if let Some(current) = self.mortality.get(factor) {
                mortality.insert(*factor, average(*current, *value, w1, w2)?);
            }
        }
        self.mortality = mortality;
        self.bound_nitrogen = average(self.bound_nitrogen, other.bound_nitrogen, w1, w2)?;
        self.inddens = average(self.inddens, other.inddens, w1, w2)?;
        self.massdens = average(self.massdens, other.massdens, w1, w2)?;
        self.offspring = average(self.offspring, other.offspring, w1, w2)?;
        self.eaten_forage_per_ind = self.eaten_forage_per_ind.merge(&other.eaten_forage_per_ind, w1, w2)?;
        self.eaten_forage_per_mass = self.eaten_forage_per_mass.merge(&other.eaten_forage_per_mass, w1, w2)?;
        self.energy_intake_per_ind = self.energy_intake_per_ind.merge(&other.energy_intake_per_ind, w1, w2)?;
        self.energy_intake_per_mass =
            self.energy_intake_per_mass.merge(&other.energy_intake_per_mass, w1, w2)?;
        self.energy_content = merge_energy_content(&self.energy_content, &other.energy_content, w1, w2)?;
        Ok(())
    }
}

/// Zero energy content means "not measured" and must not dilute the mean.
fn merge_energy_content(
    a: &ForageEnergyContent,
    b: &ForageEnergyContent,
    w1: f64,
    w2: f64,
) -> Result<ForageEnergyContent> {
    let mut result = *a;
    for ft in ForageType::ALL {
        if b.get(ft) != 0.0 {
            let value = if a.get(ft) == 0.0 {
                b.get(ft)
            } else {
                average(a.get(ft), b.get(ft), w1, w2)?
            };
            result.set(ft, value);
        }
    }
    Ok(result)
}

/// Forage and nitrogen fluxes of one habitat on one day.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HabitatData {
    /// Standing forage before feeding [kgDM/km²].
    pub available_forage: ForageMass,
    /// [kgDM/km²/day]
    pub eaten_forage: ForageMass,
    /// [kgN/km²/day]
    pub excreted_nitrogen: f64,
}

impl HabitatData {
    pub fn merge(&mut self, other: &HabitatData, this_weight: f64, other_weight: f64) -> Result<()> {
        self.available_forage = self.available_forage.merge(&other.available_forage, this_weight, other_weight)?;
        self.eaten_forage = self.eaten_forage.merge(&other.eaten_forage, this_weight, other_weight)?;
        self.excreted_nitrogen = average(self.excreted_nitrogen, other.excreted_nitrogen, this_weight, other_weight)?;
        Ok(())
    }
}

/// Everything one habitat reports for one day.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DayOutput {
    pub day_of_year: u32,
    pub habitat: HabitatData,
    /// Aggregated herbivore output by HFT name.
    pub hft_data: BTreeMap<String, HerbivoreData>,
}

impl DayOutput {
    /// Temporal average with `other`; HFTs missing on one side count as
    /// absent for that share of the period.
    pub fn merge(&mut self, other: &DayOutput, this_weight: f64, other_weight: f64) -> Result<()> {
        self.habitat.merge(&other.habitat, this_weight, other_weight)?;
        for (name, data) in &other.hft_data {
            match self.hft_data.get_mut(name) {
                Some(current) => current.merge(data, this_weight, other_weight)?,
                None => {
                    let mut empty = HerbivoreData::default();
                    empty.merge(data, this_weight, other_weight)?;
                    self.hft_data.insert(name.clone(), empty);
                }
            }
        }
        for (name, data) in self.hft_data.iter_mut() {
            if !other.hft_data.contains_key(name) {
                data.merge(&HerbivoreData::default(), this_weight, other_weight)?;
            }
        }
        self.day_of_year = other.day_of_year;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forage::ForageValues;

    fn data(inddens: f64, bodyfat: f64) -> HerbivoreData {
        HerbivoreData {
            inddens,
            massdens: inddens * 50.0,
            bodyfat,
            eaten_forage_per_ind: ForageValues::new(bodyfat * 10.0),
            mortality: BTreeMap::from([(MortalityFactor::Background, bodyfat)]),
            ..HerbivoreData::default()
        }
    }

    #[test]
    fn test_create_datapoint_weights_by_density() {
        let result = HerbivoreData::create_datapoint(&[data(1.0, 0.1), data(3.0, 0.2)]).unwrap();
        assert_eq!(result.inddens, 4.0);
        assert_eq!(result.massdens, 200.0);
        assert!((result.bodyfat - 0.175).abs() < 1e-12);
        assert!((result.eaten_forage_per_ind.sum() - 1.75).abs() < 1e-12);
        assert!((result.mortality[&MortalityFactor::Background] - 0.175).abs() < 1e-12);
        assert!(HerbivoreData::create_datapoint(&[]).is_err());
    }

    #[test]
    fn test_create_datapoint_with_empty_cohort() {
        let result = HerbivoreData::create_datapoint(&[data(0.0, 0.0), data(2.0, 0.2)]).unwrap();
        assert_eq!(result.bodyfat, 0.2);
    }

    #[test]
    fn test_merge_over_time() {
        let mut a = data(2.0, 0.1);
        let b = data(2.0, 0.3);
        a.merge(&b, 1.0, 1.0).unwrap();
        assert!((a.bodyfat - 0.2).abs() < 1e-12);
        assert_eq!(a.inddens, 2.0);
        assert!(a.merge(&b, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_energy_content_zero_is_ignored() {
        let merged = merge_energy_content(&ForageValues::zero(), &ForageValues::new(6.0), 1.0, 1.0).unwrap();
        assert_eq!(merged, ForageValues::new(6.0));
    }
}
