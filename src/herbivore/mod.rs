//! The herbivore entity and its daily state transition.

mod representation;

use std::sync::Arc;

use rand::Rng;

pub use representation::Representation;

use crate::average::PeriodAverage;
use crate::energy_budget::FatmassEnergyBudget;
use crate::error::{FaunaError, Result};
use crate::expenditure::{
    expenditure_taylor_1981, expenditure_zhu_2018, thermoregulatory_expenditure,
    ExpenditureComponent,
};
use crate::forage::{Digestibility, ForageEnergyContent, ForageMass, HabitatForage};
use crate::foraging::ForageDemandSolver;
use crate::habitat::HabitatEnvironment;
use crate::hft::{Hft, Sex};
use crate::mortality::{
    BackgroundMortality, LifespanMortality, MortalityFactor, StarvationIlliusOConnor2000,
    StarvationThreshold,
};
use crate::nitrogen::{retention_time, NitrogenInHerbivore};
use crate::output::HerbivoreData;
use crate::reproduction::{BreedingSeason, Reproduction};

/// One cohort or one individual of a herbivore functional type.
///
/// The object owns its energy budget, its forage demand state and its
/// output of the current day. All per-area values are in km⁻², all
/// per-individual values in kg or MJ.
#[derive(Debug, Clone)]
pub struct Herbivore {
    hft: Arc<Hft>,
    sex: Sex,
    age_days: u32,
    today: Option<u32>,
    representation: Representation,
    energy_budget: FatmassEnergyBudget,
    environment: Option<HabitatEnvironment>,
    forage_demands: ForageDemandSolver,
    /// Body condition of recent days, steering reproduction.
    body_condition_gestation: PeriodAverage,
    nitrogen: NitrogenInHerbivore,
    output: HerbivoreData,
}

impl Herbivore {
    /// Creates a newborn with age 0 and the birth body fat of its HFT.
    pub fn new_birth(hft: Arc<Hft>, sex: Sex, representation: Representation) -> Result<Self> {
        let birth_fat = hft.body_fat_birth * hft.body_mass_birth;
        Self::create(hft, sex, 0, representation, |max_fatmass| {
            birth_fat.min(max_fatmass)
        })
    }

    /// Creates a herbivore of arbitrary age with fat mass
    /// `body_condition * max_fatmass`.
    pub fn new_established(
        age_days: u32,
        body_condition: f64,
        hft: Arc<Hft>,
        sex: Sex,
        representation: Representation,
    ) -> Result<Self> {
        const CONTEXT: &str = "Herbivore::new_established";
        if age_days == 0 {
            return Err(FaunaError::invalid(
                CONTEXT,
                "age must be positive; use the birth constructor for newborns",
            ));
        }
        if !(0.0..=1.0).contains(&body_condition) {
            return Err(FaunaError::invalid(
                CONTEXT,
                format!("body condition {body_condition} is outside [0,1]"),
            ));
        }
        if hft.mortality_factors.contains(&MortalityFactor::Lifespan)
            && age_days > hft.life_history_lifespan * 365
        {
            return Err(FaunaError::invalid(
                CONTEXT,
                format!(
                    "age of {age_days} days exceeds the lifespan of {} years",
                    hft.life_history_lifespan
                ),
            ));
        }
        Self::create(hft, sex, age_days, representation, |max_fatmass| {
            body_condition * max_fatmass
        })
    }

    fn create(
        hft: Arc<Hft>,
        sex: Sex,
        age_days: u32,
        representation: Representation,
        initial_fatmass: impl FnOnce(f64) -> f64,
    ) -> Result<Self> {
        let max_fatmass = potential_bodymass(&hft, sex, age_days) * hft.body_fat_maximum;
        let energy_budget = FatmassEnergyBudget::new(
            initial_fatmass(max_fatmass),
            max_fatmass,
            hft.body_fat_gross_energy,
            hft.body_fat_gross_energy * hft.body_fat_catabolism_efficiency,
        )?;
        Ok(Self {
            forage_demands: ForageDemandSolver::new(Arc::clone(&hft), sex),
            body_condition_gestation: PeriodAverage::new(hft.gestation_days().max(1))?,
            energy_budget,
            hft,
            sex,
            age_days,
            today: None,
            representation,
            environment: None,
            nitrogen: NitrogenInHerbivore::new(),
            output: HerbivoreData::default(),
        })
    }

    pub fn hft(&self) -> &Arc<Hft> {
        &self.hft
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn age_days(&self) -> u32 {
        self.age_days
    }

    /// Completed years of life.
    pub fn age_years(&self) -> u32 {
        self.age_days / 365
    }

    pub fn today(&self) -> Option<u32> {
        self.today
    }

    pub fn representation(&self) -> &Representation {
        &self.representation
    }

    pub fn energy_budget(&self) -> &FatmassEnergyBudget {
        &self.energy_budget
    }

    pub fn todays_output(&self) -> &HerbivoreData {
        &self.output
    }

    pub fn is_dead(&self) -> bool {
        self.representation.is_dead()
    }

    pub fn ind_per_km2(&self) -> f64 {
        self.representation.ind_per_km2()
    }

    pub fn kg_per_km2(&self) -> f64 {
        self.ind_per_km2() * self.bodymass()
    }

    pub fn fatmass(&self) -> f64 {
        self.energy_budget.get_fatmass()
    }

    pub fn bodymass(&self) -> f64 {
        self.fatmass() + self.lean_bodymass()
    }

    pub fn lean_bodymass(&self) -> f64 {
        if self.age_days == 0 {
            self.hft.body_mass_birth * (1.0 - self.hft.body_fat_birth)
        } else {
            self.potential_bodymass() * (1.0 - self.hft.body_fat_maximum)
        }
    }

    /// Body mass with full fat reserves.
    pub fn potential_bodymass(&self) -> f64 {
        potential_bodymass(&self.hft, self.sex, self.age_days)
    }

    pub fn max_fatmass(&self) -> f64 {
        self.potential_bodymass() * self.hft.body_fat_maximum
    }

    /// Fat fraction of the whole body [kg/kg].
    pub fn bodyfat(&self) -> f64 {
        self.fatmass() / self.bodymass()
    }

    /// Fat mass relative to maximum fat mass.
    pub fn body_condition(&self) -> f64 {
        (self.fatmass() / self.energy_budget.get_max_fatmass()).clamp(0.0, 1.0)
    }

    /// Advances the herbivore by one day and returns the offspring density
    /// it produced [ind/km²].
    pub fn simulate_day<R: Rng + ?Sized>(
        &mut self,
        day: u32,
        environment: &HabitatEnvironment,
        rng: &mut R,
    ) -> Result<f64> {
        if day >= 365 {
            return Err(FaunaError::invalid(
                "Herbivore::simulate_day",
                format!("day of year {day} is outside [0,364]"),
            ));
        }
        if self.is_dead() {
            return Err(FaunaError::logic(format!(
                "simulate_day() called on a dead herbivore of HFT '{}'",
                self.hft.name
            )));
        }
        self.environment = Some(*environment);

        // Yesterday's ingesta pass the guts.
        self.nitrogen
            .digest_today(retention_time(self.bodymass())?, self.kg_per_km2())?;

        self.today = Some(day);
        self.age_days += 1;

        if self.sex == Sex::Female {
            self.body_condition_gestation.add_value(self.body_condition());
        }

        self.energy_budget.set_max_fatmass(
            self.max_fatmass(),
            self.hft.body_fat_maximum_daily_gain * self.bodymass(),
        )?;

        self.output = HerbivoreData {
            age_years: self.age_years() as f64,
            bodyfat: self.bodyfat(),
            bound_nitrogen: self.nitrogen.unavailable(),
            inddens: self.ind_per_km2(),
            massdens: self.kg_per_km2(),
            ..HerbivoreData::default()
        };

        self.energy_budget.catabolize_fat();

        let expenditure = self.todays_expenditure()?;
        self.energy_budget.add_energy_needs(expenditure)?;
        self.output.expenditure = expenditure;

        let offspring = self.todays_offspring_proportion()? * self.ind_per_km2();
        self.output.offspring = offspring;

        self.apply_mortality_factors_today(rng)?;

        Ok(offspring)
    }

    /// Forage this herbivore object would eat today [kgDM/km²].
    ///
    /// Availability-dependent limits are fixed by the first call of the
    /// day; later calls only reflect changes in energy needs and intake.
    pub fn forage_demands(&mut self, available: &HabitatForage) -> Result<ForageMass> {
        if self.is_dead() {
            return Ok(ForageMass::zero());
        }
        let day = self.today.ok_or_else(|| {
            FaunaError::logic("Herbivore::forage_demands() called before simulate_day()")
        })?;
        if !self.forage_demands.is_day_initialized(day)? {
            let energy_content = self.net_energy_content(&available.digestibility)?;
            self.forage_demands
                .init_today(day, available, &energy_content, self.bodymass())?;
            self.output.energy_content = energy_content;
        }
        let needs =
            self.energy_budget.get_energy_needs() + self.energy_budget.get_max_anabolism_per_day();
        Ok(self.forage_demands.demand(needs)? * self.ind_per_km2())
    }

    /// Ingests forage [kgDM/km²] together with its nitrogen [kgN/km²].
    pub fn eat(
        &mut self,
        kg_per_km2: &ForageMass,
        digestibility: &Digestibility,
        nitrogen_kg_per_km2: &ForageMass,
    ) -> Result<()> {
        const CONTEXT: &str = "Herbivore::eat";
        kg_per_km2.check_non_negative(CONTEXT)?;
        nitrogen_kg_per_km2.check_non_negative(CONTEXT)?;
        let density = self.ind_per_km2();
        if density == 0.0 {
            if kg_per_km2.is_zero() {
                return Ok(());
            }
            return Err(FaunaError::logic(format!(
                "herbivore of HFT '{}' with zero density cannot eat",
                self.hft.name
            )));
        }
        if kg_per_km2.is_zero() {
            return Ok(());
        }

        let kg_per_ind = *kg_per_km2 / density;
        let nitrogen_per_ind = *nitrogen_kg_per_km2 / density;
        let mj_per_ind = self.net_energy_content(digestibility)? * kg_per_ind;

        self.forage_demands.add_eaten(&kg_per_ind)?;
        self.energy_budget.metabolize_energy(mj_per_ind.sum())?;

        let bodymass = self.bodymass();
        self.output.eaten_forage_per_ind += kg_per_ind;
        self.output.eaten_forage_per_mass += kg_per_ind / bodymass;
        self.output.energy_intake_per_ind += mj_per_ind;
        self.output.energy_intake_per_mass += mj_per_ind / bodymass;
        self.output.eaten_nitrogen_per_ind += nitrogen_per_ind.sum();

        self.nitrogen.ingest(nitrogen_per_ind.sum() * density)?;
        Ok(())
    }

    /// Hands over nitrogen for the soil [kgN/km²]; dead herbivores release
    /// everything they held.
    pub fn take_nitrogen_excreta(&mut self) -> f64 {
        if self.is_dead() {
            self.nitrogen.reset_total()
        } else {
            self.nitrogen.reset_excreta()
        }
    }

    /// Applies a daily mortality fraction in [0,1].
    ///
    /// Cohorts lose that share of their density; an individual dies with
    /// that probability.
    pub fn apply_mortality<R: Rng + ?Sized>(&mut self, mortality: f64, rng: &mut R) -> Result<()> {
        if !(0.0..=1.0).contains(&mortality) {
            return Err(FaunaError::invalid(
                "Herbivore::apply_mortality",
                format!("mortality {mortality} is outside [0,1]"),
            ));
        }
        match &mut self.representation {
            Representation::Cohort { ind_per_km2, .. } => {
                *ind_per_km2 = (*ind_per_km2 - mortality * *ind_per_km2).max(0.0);
            }
            Representation::Individual { dead, .. } => {
                if mortality == 1.0 || (mortality > 0.0 && rng.gen::<f64>() < mortality) {
                    *dead = true;
                }
            }
        }
        Ok(())
    }

    /// Marks the herbivore as dead, e.g. when its population is no longer
    /// viable.
    pub fn kill(&mut self) {
        match &mut self.representation {
            Representation::Cohort { ind_per_km2, .. } => *ind_per_km2 = 0.0,
            Representation::Individual { dead, .. } => *dead = true,
        }
    }

    /// Absorbs another cohort of the same HFT, sex and age.
    ///
    /// The donor keeps existing with zero density.
    pub fn merge(&mut self, other: &mut Herbivore) -> Result<()> {
        let (this_density, other_density) = match (self.representation, other.representation) {
            (
                Representation::Cohort { ind_per_km2: a, .. },
                Representation::Cohort { ind_per_km2: b, .. },
            ) => (a, b),
            _ => {
                return Err(FaunaError::invalid(
                    "Herbivore::merge",
                    "only cohorts can be merged",
                ))
            }
        };
        if self.hft.name != other.hft.name {
            return Err(FaunaError::invalid(
                "Herbivore::merge",
                format!("HFTs differ ('{}' and '{}')", self.hft.name, other.hft.name),
            ));
        }
        if self.sex != other.sex || self.age_days != other.age_days {
            return Err(FaunaError::invalid(
                "Herbivore::merge",
                "cohorts differ in sex or age",
            ));
        }
        if other_density > 0.0 {
            self.energy_budget
                .merge(&other.energy_budget, this_density, other_density)?;
        }
        self.nitrogen.merge(&other.nitrogen);
        other.nitrogen = NitrogenInHerbivore::new();
        if let Representation::Cohort { ind_per_km2, .. } = &mut self.representation {
            *ind_per_km2 = this_density + other_density;
        }
        if let Representation::Cohort { ind_per_km2, .. } = &mut other.representation {
            *ind_per_km2 = 0.0;
        }
        Ok(())
    }

    fn net_energy_content(&self, digestibility: &Digestibility) -> Result<ForageEnergyContent> {
        self.hft
            .digestion_net_energy_model
            .net_energy_content(digestibility, self.hft.digestion_type)
    }

    fn todays_expenditure(&self) -> Result<f64> {
        let environment = self.environment.ok_or_else(|| {
            FaunaError::logic("Herbivore: environment is not set before expenditure")
        })?;
        let bodymass = self.bodymass();
        let mut expenditure = 0.0;
        for component in &self.hft.expenditure_components {
            expenditure += match component {
                ExpenditureComponent::Allometric => self.hft.expenditure_allometric.calc(bodymass),
                ExpenditureComponent::Taylor1981 => {
                    expenditure_taylor_1981(bodymass, self.hft.adult_bodymass(self.sex))?
                }
                ExpenditureComponent::Zhu2018 => {
                    expenditure_zhu_2018(bodymass, environment.air_temperature)?
                }
                ExpenditureComponent::Thermoregulation => 0.0,
            };
        }
        if self
            .hft
            .expenditure_components
            .contains(&ExpenditureComponent::Thermoregulation)
        {
            expenditure += thermoregulatory_expenditure(
                expenditure,
                self.hft.thermoregulation_conductance.conductance(bodymass),
                self.hft.thermoregulation_core_temperature,
                environment.air_temperature,
            )?;
        }
        Ok(expenditure)
    }

    /// Offspring per individual today; zero for males and immature females.
    fn todays_offspring_proportion(&self) -> Result<f64> {
        let day = match self.today {
            Some(day) => day,
            None => return Ok(0.0),
        };
        if self.sex != Sex::Female || self.age_years() < self.hft.life_history_sexual_maturity {
            return Ok(0.0);
        }
        let season = BreedingSeason::new(
            self.hft.breeding_season_start,
            self.hft.breeding_season_length,
        )?;
        let reproduction = Reproduction::new(
            self.hft.reproduction_model,
            season,
            self.hft.reproduction_annual_maximum,
            self.hft.reproduction_logistic,
        )?;
        let body_condition = self.body_condition_gestation.get_average()?.clamp(0.0, 1.0);
        reproduction.offspring_proportion(day, body_condition)
    }

    fn apply_mortality_factors_today<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let hft = Arc::clone(&self.hft);
        let mut total = 0.0;
        for &factor in &hft.mortality_factors {
            let mortality = match factor {
                MortalityFactor::Background => BackgroundMortality::new(
                    self.hft.mortality_juvenile_rate,
                    self.hft.mortality_adult_rate,
                )?
                .daily(self.age_days),
                MortalityFactor::Lifespan => {
                    LifespanMortality::new(self.hft.life_history_lifespan)?.daily(self.age_days)
                }
                MortalityFactor::StarvationIlliusOConnor2000 => {
                    // Body condition of first-year animals does not vary.
                    let deviation = if self.age_years() >= 1 {
                        self.hft.body_fat_deviation
                    } else {
                        0.0
                    };
                    let starvation = StarvationIlliusOConnor2000::new(
                        deviation,
                        self.hft.mortality_shift_body_condition_for_starvation,
                    )?
                    .daily(self.body_condition())?;
                    if starvation.body_condition != self.body_condition() {
                        self.energy_budget
                            .force_body_condition(starvation.body_condition)?;
                    }
                    starvation.mortality
                }
                MortalityFactor::StarvationThreshold => {
                    StarvationThreshold::new(self.hft.mortality_starvation_threshold_bodyfat)?
                        .daily(self.bodyfat())?
                }
            };
            self.output.mortality.insert(factor, mortality);
            total += mortality;
        }
        self.apply_mortality(total.min(1.0), rng)
    }
}

/// Body mass with full fat reserves, growing linearly from birth to
/// physical maturity.
fn potential_bodymass(hft: &Hft, sex: Sex, age_days: u32) -> f64 {
    let adult = hft.adult_bodymass(sex);
    let maturity = hft.physical_maturity(sex);
    if age_days / 365 >= maturity {
        return adult;
    }
    let birth = hft.body_mass_birth * (1.0 - hft.body_fat_birth) / (1.0 - hft.body_fat_maximum);
    let growth = age_days as f64 / (maturity as f64 * 365.0);
    birth + growth * (adult - birth)
}
