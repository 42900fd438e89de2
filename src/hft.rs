//! Herbivore functional types: immutable parameter sets shared by all
//! herbivores of one species or ecotype.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FaunaError, Result};
use crate::expenditure::{ConductanceModel, ExpenditureComponent};
use crate::foraging::{DietComposer, DigestiveLimit, ForagingLimit};
use crate::mortality::MortalityFactor;
use crate::net_energy::{DigestionType, NetEnergyModel};
use crate::parameters::{HerbivoreType, Parameters};
use crate::reproduction::ReproductionModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// Parameters of `c * M^e`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllometryParameters {
    pub coefficient: f64,
    pub exponent: f64,
}

impl AllometryParameters {
    pub fn new(coefficient: f64, exponent: f64) -> Self {
        Self {
            coefficient,
            exponent,
        }
    }

    pub fn calc(&self, mass: f64) -> f64 {
        self.coefficient * mass.powf(self.exponent)
    }
}

fn default_name() -> String {
    "example".into()
}
fn default_body_fat_birth() -> f64 {
    0.2
}
fn default_body_fat_catabolism_efficiency() -> f64 {
    0.8
}
fn default_body_fat_deviation() -> f64 {
    0.125
}
fn default_body_fat_gross_energy() -> f64 {
    39.1
}
fn default_body_fat_maximum() -> f64 {
    0.25
}
fn default_body_fat_maximum_daily_gain() -> f64 {
    0.05
}
fn default_body_mass_birth() -> f64 {
    5.0
}
fn default_body_mass_female() -> f64 {
    50.0
}
fn default_body_mass_male() -> f64 {
    70.0
}
fn default_breeding_season_length() -> u32 {
    30
}
fn default_breeding_season_start() -> u32 {
    121
}
fn default_digestion_allometric() -> AllometryParameters {
    AllometryParameters::new(0.05, 0.75)
}
fn default_digestion_fixed_fraction() -> f64 {
    0.05
}
fn default_digestion_limit() -> DigestiveLimit {
    DigestiveLimit::FixedFraction
}
fn default_establishment_age_range() -> (u32, u32) {
    (1, 15)
}
fn default_establishment_density() -> f64 {
    1.0
}
fn default_expenditure_allometric() -> AllometryParameters {
    AllometryParameters::new(0.4, 0.75)
}
fn default_expenditure_components() -> BTreeSet<ExpenditureComponent> {
    BTreeSet::from([ExpenditureComponent::Allometric])
}
fn default_half_max_intake_density() -> f64 {
    20.0
}
fn default_lifespan() -> u32 {
    16
}
fn default_physical_maturity() -> u32 {
    3
}
fn default_sexual_maturity() -> u32 {
    2
}
fn default_mortality_adult_rate() -> f64 {
    0.1
}
fn default_mortality_juvenile_rate() -> f64 {
    0.3
}
fn default_mortality_factors() -> BTreeSet<MortalityFactor> {
    BTreeSet::from([MortalityFactor::Background, MortalityFactor::Lifespan])
}
fn default_minimum_density_threshold() -> f64 {
    0.5
}
fn default_true() -> bool {
    true
}
fn default_starvation_threshold_bodyfat() -> f64 {
    0.005
}
fn default_reproduction_annual_maximum() -> f64 {
    1.0
}
fn default_gestation_length() -> u32 {
    9
}
fn default_reproduction_logistic() -> [f64; 2] {
    [15.0, 0.3]
}
fn default_reproduction_model() -> ReproductionModel {
    ReproductionModel::ConstantMaximum
}
fn default_core_temperature() -> f64 {
    38.0
}

/// Herbivore Functional Type.
///
/// Body masses are live weight [kg], rates are fractions per year unless
/// noted otherwise, ages are in years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hft {
    #[serde(default = "default_name")]
    pub name: String,

    /// Fraction of body mass that is fat at birth.
    #[serde(default = "default_body_fat_birth")]
    pub body_fat_birth: f64,
    /// Fraction of fat gross energy that is available when burning fat.
    #[serde(default = "default_body_fat_catabolism_efficiency")]
    pub body_fat_catabolism_efficiency: f64,
    /// Standard deviation of body condition within a cohort.
    #[serde(default = "default_body_fat_deviation")]
    pub body_fat_deviation: f64,
    /// Energy content of body fat [MJ/kg].
    #[serde(default = "default_body_fat_gross_energy")]
    pub body_fat_gross_energy: f64,
    /// Maximum fraction of fat in the live body mass.
    #[serde(default = "default_body_fat_maximum")]
    pub body_fat_maximum: f64,
    /// Maximum fat gain per day as a fraction of body mass; zero means no limit.
    #[serde(default = "default_body_fat_maximum_daily_gain")]
    pub body_fat_maximum_daily_gain: f64,

    #[serde(default = "default_body_mass_birth")]
    pub body_mass_birth: f64,
    #[serde(default = "default_body_mass_female")]
    pub body_mass_female: f64,
    #[serde(default = "default_body_mass_male")]
    pub body_mass_male: f64,

    /// Length of the breeding season [days].
    #[serde(default = "default_breeding_season_length")]
    pub breeding_season_length: u32,
    /// First day of the breeding season (0 = January 1st).
    #[serde(default = "default_breeding_season_start")]
    pub breeding_season_start: u32,

    /// Allometric digestive limit [kgDM/day].
    #[serde(default = "default_digestion_allometric")]
    pub digestion_allometric: AllometryParameters,
    /// Daily intake as a fraction of adult body mass.
    #[serde(default = "default_digestion_fixed_fraction")]
    pub digestion_fixed_fraction: f64,
    /// Parameters i, j, k of Illius & Gordon (1992). Defaults depend on the
    /// digestion type when omitted.
    #[serde(default)]
    pub digestion_i_g_1992_ijk: Option<[f64; 3]>,
    #[serde(default = "default_digestion_limit")]
    pub digestion_limit: DigestiveLimit,
    #[serde(default)]
    pub digestion_net_energy_model: NetEnergyModel,
    #[serde(default)]
    pub digestion_type: DigestionType,

    /// Range of ages [years] of herbivores spawned at establishment.
    #[serde(default = "default_establishment_age_range")]
    pub establishment_age_range: (u32, u32),
    /// Total density at establishment [ind/km²].
    #[serde(default = "default_establishment_density")]
    pub establishment_density: f64,

    /// Allometric expenditure [MJ/ind/day].
    #[serde(default = "default_expenditure_allometric")]
    pub expenditure_allometric: AllometryParameters,
    #[serde(default = "default_expenditure_components")]
    pub expenditure_components: BTreeSet<ExpenditureComponent>,

    #[serde(default)]
    pub foraging_diet_composer: DietComposer,
    #[serde(default)]
    pub foraging_limits: BTreeSet<ForagingLimit>,
    /// Forage density at which intake is half of the maximum [gDM/m²].
    #[serde(default = "default_half_max_intake_density")]
    pub foraging_half_max_intake_density: f64,

    #[serde(default = "default_lifespan")]
    pub life_history_lifespan: u32,
    #[serde(default = "default_physical_maturity")]
    pub life_history_physical_maturity_female: u32,
    #[serde(default = "default_physical_maturity")]
    pub life_history_physical_maturity_male: u32,
    #[serde(default = "default_sexual_maturity")]
    pub life_history_sexual_maturity: u32,

    #[serde(default = "default_mortality_adult_rate")]
    pub mortality_adult_rate: f64,
    #[serde(default = "default_mortality_factors")]
    pub mortality_factors: BTreeSet<MortalityFactor>,
    #[serde(default = "default_mortality_juvenile_rate")]
    pub mortality_juvenile_rate: f64,
    /// Populations below this fraction of the establishment density die out.
    #[serde(default = "default_minimum_density_threshold")]
    pub mortality_minimum_density_threshold: f64,
    #[serde(default = "default_true")]
    pub mortality_shift_body_condition_for_starvation: bool,
    /// Body fat fraction below which the threshold starvation model kills.
    #[serde(default = "default_starvation_threshold_bodyfat")]
    pub mortality_starvation_threshold_bodyfat: f64,

    /// Maximum offspring per female per year.
    #[serde(default = "default_reproduction_annual_maximum")]
    pub reproduction_annual_maximum: f64,
    /// Gestation length [months].
    #[serde(default = "default_gestation_length")]
    pub reproduction_gestation_length: u32,
    /// Growth rate and midpoint of the logistic body condition curve.
    #[serde(default = "default_reproduction_logistic")]
    pub reproduction_logistic: [f64; 2],
    #[serde(default = "default_reproduction_model")]
    pub reproduction_model: ReproductionModel,

    #[serde(default)]
    pub thermoregulation_conductance: ConductanceModel,
    /// Body core temperature [°C].
    #[serde(default = "default_core_temperature")]
    pub thermoregulation_core_temperature: f64,
}

impl Default for Hft {
    fn default() -> Self {
        Self {
            name: default_name(),
            body_fat_birth: default_body_fat_birth(),
            body_fat_catabolism_efficiency: default_body_fat_catabolism_efficiency(),
            body_fat_deviation: default_body_fat_deviation(),
            body_fat_gross_energy: default_body_fat_gross_energy(),
            body_fat_maximum: default_body_fat_maximum(),
            body_fat_maximum_daily_gain: default_body_fat_maximum_daily_gain(),
            body_mass_birth: default_body_mass_birth(),
            body_mass_female: default_body_mass_female(),
            body_mass_male: default_body_mass_male(),
            breeding_season_length: default_breeding_season_length(),
            breeding_season_start: default_breeding_season_start(),
            digestion_allometric: default_digestion_allometric(),
            digestion_fixed_fraction: default_digestion_fixed_fraction(),
            digestion_i_g_1992_ijk: None,
            digestion_limit: default_digestion_limit(),
            digestion_net_energy_model: NetEnergyModel::default(),
            digestion_type: DigestionType::default(),
            establishment_age_range: default_establishment_age_range(),
            establishment_density: default_establishment_density(),
            expenditure_allometric: default_expenditure_allometric(),
            expenditure_components: default_expenditure_components(),
            foraging_diet_composer: DietComposer::default(),
            foraging_limits: BTreeSet::new(),
            foraging_half_max_intake_density: default_half_max_intake_density(),
            life_history_lifespan: default_lifespan(),
            life_history_physical_maturity_female: default_physical_maturity(),
            life_history_physical_maturity_male: default_physical_maturity(),
            life_history_sexual_maturity: default_sexual_maturity(),
            mortality_adult_rate: default_mortality_adult_rate(),
            mortality_factors: default_mortality_factors(),
            mortality_juvenile_rate: default_mortality_juvenile_rate(),
            mortality_minimum_density_threshold: default_minimum_density_threshold(),
            mortality_shift_body_condition_for_starvation: true,
            mortality_starvation_threshold_bodyfat: default_starvation_threshold_bodyfat(),
            reproduction_annual_maximum: default_reproduction_annual_maximum(),
            reproduction_gestation_length: default_gestation_length(),
            reproduction_logistic: default_reproduction_logistic(),
            reproduction_model: default_reproduction_model(),
            thermoregulation_conductance: ConductanceModel::default(),
            thermoregulation_core_temperature: default_core_temperature(),
        }
    }
}

impl Hft {
    pub fn adult_bodymass(&self, sex: Sex) -> f64 {
        match sex {
            Sex::Male => self.body_mass_male,
            Sex::Female => self.body_mass_female,
        }
    }

    pub fn physical_maturity(&self, sex: Sex) -> u32 {
        match sex {
            Sex::Male => self.life_history_physical_maturity_male,
            Sex::Female => self.life_history_physical_maturity_female,
        }
    }

    /// Length of the body condition window that steers reproduction [days].
    pub fn gestation_days(&self) -> usize {
        self.reproduction_gestation_length as usize * 30
    }

    /// Illius & Gordon (1992) parameters i, j, k.
    pub fn illius_gordon_ijk(&self) -> [f64; 3] {
        self.digestion_i_g_1992_ijk
            .unwrap_or_else(|| self.digestion_type.illius_gordon_1992_ijk())
    }

    /// Checks all parameters, collecting every problem into one error.
    ///
    /// Questionable but valid settings are logged as warnings.
    pub fn validate(&self, params: &Parameters) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();
        let mut check = |ok: bool, msg: String| {
            if !ok {
                errors.push(msg);
            }
        };

        check(!self.name.is_empty(), "name is empty".into());
        check(
            !self.name.contains([' ', ',', '_']),
            format!("name '{}' contains a forbidden character: ' ' ',' '_'", self.name),
        );

        check(
            self.body_fat_birth > 0.0 && self.body_fat_birth <= self.body_fat_maximum,
            format!("body_fat_birth must be in (0, body_fat_maximum] ({})", self.body_fat_birth),
        );
        check(
            (0.0..=1.0).contains(&self.body_fat_catabolism_efficiency)
                && self.body_fat_catabolism_efficiency > 0.0,
            format!(
                "body_fat_catabolism_efficiency must be in (0,1] ({})",
                self.body_fat_catabolism_efficiency
            ),
        );
        check(
            (0.0..=1.0).contains(&self.body_fat_deviation),
            format!("body_fat_deviation must be in [0,1] ({})", self.body_fat_deviation),
        );
        check(
            self.body_fat_gross_energy > 0.0,
            format!("body_fat_gross_energy must be > 0 ({})", self.body_fat_gross_energy),
        );
        check(
            self.body_fat_maximum > 0.0 && self.body_fat_maximum < 1.0,
            format!("body_fat_maximum must be in (0,1) ({})", self.body_fat_maximum),
        );
        check(
            self.body_fat_maximum_daily_gain >= 0.0
                && self.body_fat_maximum_daily_gain <= self.body_fat_maximum,
            format!(
                "body_fat_maximum_daily_gain must be in [0, body_fat_maximum] ({}); zero means no limit",
                self.body_fat_maximum_daily_gain
            ),
        );

        check(
            self.body_mass_birth > 0.0,
            format!("body_mass_birth must be > 0 ({})", self.body_mass_birth),
        );
        check(
            self.body_mass_birth <= self.body_mass_male && self.body_mass_birth <= self.body_mass_female,
            format!(
                "body_mass_birth ({}) must not exceed body_mass_male or body_mass_female",
                self.body_mass_birth
            ),
        );
        check(
            self.body_mass_female >= 1.0,
            format!("body_mass_female must be >= 1 ({})", self.body_mass_female),
        );
        check(
            self.body_mass_male >= 1.0,
            format!("body_mass_male must be >= 1 ({})", self.body_mass_male),
        );

        check(
            self.breeding_season_start < 365,
            format!("breeding_season_start must be in [0,364] ({})", self.breeding_season_start),
        );
        check(
            (1..=365).contains(&self.breeding_season_length),
            format!("breeding_season_length must be in [1,365] ({})", self.breeding_season_length),
        );

        check(
            self.thermoregulation_core_temperature > 0.0,
            format!(
                "thermoregulation_core_temperature must be > 0 ({})",
                self.thermoregulation_core_temperature
            ),
        );

        check(
            self.mortality_minimum_density_threshold > 0.0 && self.mortality_minimum_density_threshold < 1.0,
            format!(
                "mortality_minimum_density_threshold must be in (0,1) ({})",
                self.mortality_minimum_density_threshold
            ),
        );
        check(
            (0.0..1.0).contains(&self.mortality_adult_rate),
            format!("mortality_adult_rate must be in [0,1) ({})", self.mortality_adult_rate),
        );
        check(
            (0.0..1.0).contains(&self.mortality_juvenile_rate),
            format!("mortality_juvenile_rate must be in [0,1) ({})", self.mortality_juvenile_rate),
        );
        check(
            self.mortality_starvation_threshold_bodyfat >= 0.0
                && self.mortality_starvation_threshold_bodyfat < self.body_fat_maximum,
            format!(
                "mortality_starvation_threshold_bodyfat must be in [0, body_fat_maximum) ({})",
                self.mortality_starvation_threshold_bodyfat
            ),
        );
        check(
            !(params.herbivore_type == HerbivoreType::Individual
                && self
                    .mortality_factors
                    .contains(&MortalityFactor::StarvationIlliusOConnor2000)),
            "starvation_illius_oconnor_2000 is only valid for cohorts".into(),
        );

        let (first, last) = self.establishment_age_range;
        check(
            first <= last,
            format!("establishment_age_range must be ordered ({first}, {last})"),
        );
        check(
            self.establishment_density > 0.0,
            format!("establishment_density must be > 0 ({})", self.establishment_density),
        );
        if params.herbivore_type == HerbivoreType::Individual {
            check(
                self.establishment_density > 2.0 / params.habitat_area_km2,
                format!(
                    "establishment_density ({} ind/km²) must exceed two individuals in a habitat of {} km²",
                    self.establishment_density, params.habitat_area_km2
                ),
            );
        }

        check(
            !self.expenditure_components.is_empty(),
            "no energy expenditure components defined".into(),
        );
        check(
            !(self
                .expenditure_components
                .contains(&ExpenditureComponent::Thermoregulation)
                && self.expenditure_components.contains(&ExpenditureComponent::Zhu2018)),
            "thermoregulation and zhu_2018 are exclusive: zhu_2018 already includes thermoregulation".into(),
        );
        check(
            !(self.expenditure_components.contains(&ExpenditureComponent::Allometric)
                && self.expenditure_allometric.coefficient < 0.0),
            format!(
                "expenditure_allometric coefficient must not be negative ({})",
                self.expenditure_allometric.coefficient
            ),
        );

        let io2000 = self.foraging_limits.contains(&ForagingLimit::IlliusOConnor2000);
        let functional = self
            .foraging_limits
            .contains(&ForagingLimit::GeneralFunctionalResponse);
        check(
            !(io2000 && self.foraging_diet_composer != DietComposer::PureGrazer),
            "foraging limit illius_oconnor_2000 requires a pure grass diet".into(),
        );
        check(
            !((io2000 || functional) && !(self.foraging_half_max_intake_density > 0.0)),
            format!(
                "foraging_half_max_intake_density must be > 0 with a functional response ({})",
                self.foraging_half_max_intake_density
            ),
        );
        check(
            !(io2000 && functional),
            "foraging limits illius_oconnor_2000 and general_functional_response are exclusive".into(),
        );

        check(
            self.reproduction_gestation_length > 0,
            "reproduction_gestation_length must be positive".into(),
        );
        check(
            self.reproduction_annual_maximum >= 0.0,
            format!(
                "reproduction_annual_maximum must be >= 0 ({})",
                self.reproduction_annual_maximum
            ),
        );
        check(
            !(self.digestion_limit == DigestiveLimit::Allometric
                && self.digestion_allometric.coefficient < 0.0),
            format!(
                "digestion_allometric coefficient must not be negative ({})",
                self.digestion_allometric.coefficient
            ),
        );
        check(
            !(self.digestion_limit == DigestiveLimit::FixedFraction
                && !(self.digestion_fixed_fraction > 0.0 && self.digestion_fixed_fraction < 1.0)),
            format!(
                "digestion_fixed_fraction must be in (0,1) ({})",
                self.digestion_fixed_fraction
            ),
        );

        check(
            self.life_history_physical_maturity_female >= 1,
            "life_history_physical_maturity_female must be >= 1".into(),
        );
        check(
            self.life_history_physical_maturity_male >= 1,
            "life_history_physical_maturity_male must be >= 1".into(),
        );
        check(
            self.life_history_sexual_maturity >= 1,
            "life_history_sexual_maturity must be >= 1".into(),
        );
        check(
            self.life_history_lifespan >= 1,
            "life_history_lifespan must be >= 1".into(),
        );
        if self.mortality_factors.contains(&MortalityFactor::Lifespan) {
            check(
                last < self.life_history_lifespan,
                format!(
                    "establishment_age_range ({first}, {last}) must lie below the lifespan ({})",
                    self.life_history_lifespan
                ),
            );
        }

        if self.digestion_limit == DigestiveLimit::None {
            warn!(hft = %self.name, "no digestive limit defined");
        }
        if self.foraging_limits.is_empty() {
            warn!(hft = %self.name, "no foraging limits defined");
        }
        if self.expenditure_components.len() == 1
            && self
                .expenditure_components
                .contains(&ExpenditureComponent::Thermoregulation)
        {
            warn!(hft = %self.name, "thermoregulation is the only expenditure component");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(FaunaError::Config(format!(
                "HFT '{}' is invalid: {}",
                self.name,
                errors.join("; ")
            )))
        }
    }
}

/// Owns every HFT of a run; herbivores hold shared handles into it.
#[derive(Debug, Clone, Default)]
pub struct HftList {
    hfts: Vec<Arc<Hft>>,
}

impl HftList {
    pub fn new(hfts: Vec<Hft>) -> Result<Self> {
        let mut list = Self::default();
        for hft in hfts {
            list.insert(hft)?;
        }
        Ok(list)
    }

    pub fn insert(&mut self, hft: Hft) -> Result<Arc<Hft>> {
        if self.get(&hft.name).is_some() {
            return Err(FaunaError::Config(format!(
                "HFT '{}' is defined more than once",
                hft.name
            )));
        }
        let hft = Arc::new(hft);
        self.hfts.push(Arc::clone(&hft));
        Ok(hft)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Hft>> {
        self.hfts.iter().find(|hft| hft.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Hft>> {
        self.hfts.iter()
    }

    pub fn len(&self) -> usize {
        self.hfts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hfts.is_empty()
    }

    pub fn validate(&self, params: &Parameters) -> Result<()> {
        self.hfts.iter().try_for_each(|hft| hft.validate(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cohort_params() -> Parameters {
        Parameters::cohorts(1e-6)
    }

    #[test]
    fn test_default_hft_is_valid() {
        assert!(Hft::default().validate(&cohort_params()).is_ok());
    }

    #[test]
    fn test_invalid_parameters_are_collected() {
        let hft = Hft {
            name: "bad name".into(),
            body_fat_maximum: 1.5,
            breeding_season_length: 0,
            ..Hft::default()
        };
        let err = hft.validate(&cohort_params()).unwrap_err();
        assert!(err.is_config());
        let text = err.to_string();
        assert!(text.contains("forbidden character"));
        assert!(text.contains("body_fat_maximum"));
        assert!(text.contains("breeding_season_length"));
    }

    #[test]
    fn test_thermoregulation_excludes_zhu() {
        let hft = Hft {
            expenditure_components: BTreeSet::from([
                ExpenditureComponent::Zhu2018,
                ExpenditureComponent::Thermoregulation,
            ]),
            ..Hft::default()
        };
        assert!(hft.validate(&cohort_params()).is_err());
    }

    #[test]
    fn test_empty_expenditure_is_invalid() {
        let hft = Hft {
            expenditure_components: BTreeSet::new(),
            ..Hft::default()
        };
        assert!(hft.validate(&cohort_params()).is_err());
    }

    #[test]
    fn test_stochastic_starvation_rejected_for_individuals() {
        let hft = Hft {
            mortality_factors: BTreeSet::from([MortalityFactor::StarvationIlliusOConnor2000]),
            establishment_density: 10.0,
            ..Hft::default()
        };
        assert!(hft.validate(&cohort_params()).is_ok());
        assert!(hft.validate(&Parameters::individuals(1.0)).is_err());
    }

    #[test]
    fn test_hft_list_rejects_duplicates() {
        let result = HftList::new(vec![Hft::default(), Hft::default()]);
        assert!(result.is_err());
        let list = HftList::new(vec![Hft::default()]).unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.get("example").is_some());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let yaml = "name: moose\nbody_mass_female: 400\nmortality_factors: [background, starvation_threshold]\n";
        let hft: Hft = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(hft.name, "moose");
        assert_eq!(hft.body_mass_female, 400.0);
        assert_eq!(hft.body_mass_male, 70.0);
        assert!(hft.mortality_factors.contains(&MortalityFactor::StarvationThreshold));
        assert_eq!(hft.illius_gordon_ijk(), [0.034, 3.565, 0.077]);
    }
}
