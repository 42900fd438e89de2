use std::sync::Arc;

use crate::error::{FaunaError, Result};
use crate::forage::{
    Digestibility, ForageEnergyContent, ForageFraction, ForageMass, ForageType, HabitatForage,
};
use crate::hft::{Hft, Sex};

use super::limits::{
    digestive_limit_illius_gordon_1992, max_intake_as_total_mass, DigestiveLimit, ForagingLimit,
    HalfMaxIntake,
};

/// Upper bound of intake before any limit applies [kgDM/ind/day].
const UNLIMITED_INTAKE: f64 = 10_000.0;
/// Intake without a digestive limit [kgDM/ind/day].
const NO_DIGESTIVE_LIMIT: f64 = 100_000.0;
/// Converts gDM/m² to kgDM/km².
const G_PER_M2_TO_KG_PER_KM2: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
struct Today {
    day: u32,
    available: HabitatForage,
    bodymass: f64,
    energy_content: ForageEnergyContent,
    diet: ForageFraction,
    /// Remaining possible intake for today [kgDM/ind].
    max_intake: ForageMass,
}

/// Forage demand of one herbivore individual.
///
/// Everything that depends on forage availability and body mass is
/// computed once in [`ForageDemandSolver::init_today`]; later queries on the
/// same day only vary with the energy needs and with what has been eaten.
#[derive(Debug, Clone, PartialEq)]
pub struct ForageDemandSolver {
    hft: Arc<Hft>,
    sex: Sex,
    today: Option<Today>,
}

impl ForageDemandSolver {
    pub fn new(hft: Arc<Hft>, sex: Sex) -> Self {
        Self {
            hft,
            sex,
            today: None,
        }
    }

    pub fn is_day_initialized(&self, day: u32) -> Result<bool> {
        if day >= 365 {
            return Err(FaunaError::invalid(
                "ForageDemandSolver::is_day_initialized",
                format!("day {day} is greater than 364"),
            ));
        }
        Ok(self.today.as_ref().map(|t| t.day) == Some(day))
    }

    pub fn init_today(
        &mut self,
        day: u32,
        available: &HabitatForage,
        energy_content: &ForageEnergyContent,
        bodymass: f64,
    ) -> Result<()> {
        const CONTEXT: &str = "ForageDemandSolver::init_today";
        let adult = self.hft.adult_bodymass(self.sex);
        if !(bodymass > 0.0) {
            return Err(FaunaError::invalid(CONTEXT, format!("body mass must be positive ({bodymass})")));
        }
        if bodymass > adult * (1.0 + 1e-9) {
            return Err(FaunaError::invalid(
                CONTEXT,
                format!("body mass {bodymass} exceeds adult body mass {adult}"),
            ));
        }
        if day >= 365 {
            return Err(FaunaError::invalid(CONTEXT, format!("day {day} is greater than 364")));
        }
        let diet = self.hft.foraging_diet_composer.composition();
        let mut max_intake = ForageMass::new(UNLIMITED_INTAKE);
        max_intake = max_intake.min(&self.max_foraging(available, energy_content, bodymass)?);
        max_intake = max_intake.min(&self.max_digestion(
            &available.digestibility,
            energy_content,
            &diet,
            bodymass,
        )?);

        if self
            .hft
            .foraging_limits
            .contains(&ForagingLimit::GeneralFunctionalResponse)
        {
            let grass_max = max_intake.get(ForageType::Grass);
            if grass_max > 0.0 {
                let response = HalfMaxIntake::new(
                    self.hft.foraging_half_max_intake_density * G_PER_M2_TO_KG_PER_KM2,
                    grass_max,
                )?;
                max_intake.set(
                    ForageType::Grass,
                    response.intake_rate(available.mass.get(ForageType::Grass))?,
                );
            }
        }

        self.today = Some(Today {
            day,
            available: *available,
            bodymass,
            energy_content: *energy_content,
            diet,
            max_intake,
        });
        Ok(())
    }

    /// Forage mass [kgDM/ind] needed to cover `energy_needs` [MJ/ind],
    /// bounded by today's remaining intake capacity and the available forage.
    pub fn demand(&self, energy_needs: f64) -> Result<ForageMass> {
        let today = self.today.as_ref().ok_or_else(|| {
            FaunaError::logic("ForageDemandSolver::demand() called before init_today()")
        })?;
        if energy_needs < 0.0 {
            return Err(FaunaError::invalid(
                "ForageDemandSolver::demand",
                format!("energy needs are negative ({energy_needs})"),
            ));
        }
        if energy_needs == 0.0 {
            return Ok(ForageMass::zero());
        }

        let max_energy = today.max_intake * today.energy_content;
        let max_energy_sum = max_energy.sum();
        if max_energy_sum == 0.0 {
            return Ok(ForageMass::zero());
        }

        // The forage type that is scarcest relative to its share in the diet
        // limits the whole diet.
        let mut min_fraction: f64 = 1.0;
        for (ft, share) in today.diet.iter() {
            if share > 0.0 {
                let energy = max_energy.get(ft);
                let fraction = if energy > 0.0 {
                    share * max_energy_sum / energy
                } else {
                    0.0
                };
                min_fraction = min_fraction.min(fraction);
            }
        }
        let composed = max_energy * (today.diet * min_fraction);
        let composed_sum = composed.sum();
        if composed_sum == 0.0 {
            return Ok(ForageMass::zero());
        }

        let reduction = (energy_needs / composed_sum).min(1.0);
        let energy_intake = composed * reduction;
        let mass = energy_intake.divide_safely(&today.energy_content, 0.0);
        Ok(mass.min(&today.available.mass))
    }

    /// Registers forage [kgDM/ind] eaten today.
    pub fn add_eaten(&mut self, eaten: &ForageMass) -> Result<()> {
        let today = self.today.as_mut().ok_or_else(|| {
            FaunaError::logic("ForageDemandSolver::add_eaten() called before init_today()")
        })?;
        for (ft, kg) in eaten.iter() {
            if kg > today.max_intake.get(ft) * 1.001 + f64::EPSILON {
                return Err(FaunaError::logic(format!(
                    "eaten {ft} ({kg} kg/ind) exceeds today's maximum intake ({} kg/ind)",
                    today.max_intake.get(ft)
                )));
            }
        }
        let eaten = eaten.min(&today.max_intake);
        today.max_intake -= eaten;
        Ok(())
    }

    /// Remaining intake capacity today [kgDM/ind].
    pub fn max_intake(&self) -> Option<ForageMass> {
        self.today.as_ref().map(|t| t.max_intake)
    }

    fn bodymass_adult(&self) -> f64 {
        self.hft.adult_bodymass(self.sex)
    }

    fn max_foraging(
        &self,
        available: &HabitatForage,
        energy_content: &ForageEnergyContent,
        bodymass: f64,
    ) -> Result<ForageMass> {
        let mut result = ForageMass::new(UNLIMITED_INTAKE);
        for limit in &self.hft.foraging_limits {
            match limit {
                ForagingLimit::IlliusOConnor2000 => {
                    let digestive = digestive_limit_illius_gordon_1992(
                        bodymass,
                        self.bodymass_adult(),
                        &available.digestibility,
                        self.hft.illius_gordon_ijk(),
                    )?;
                    let max_mj = digestive.get(ForageType::Grass);
                    let grass_mj = if max_mj > 0.0 {
                        HalfMaxIntake::new(
                            self.hft.foraging_half_max_intake_density * G_PER_M2_TO_KG_PER_KM2,
                            max_mj,
                        )?
                        .intake_rate(available.mass.get(ForageType::Grass))?
                    } else {
                        0.0
                    };
                    let content = energy_content.get(ForageType::Grass);
                    // No energy means no feeding.
                    let grass_kg = if content > 0.0 { grass_mj / content } else { 0.0 };
                    result.set(ForageType::Grass, result.get(ForageType::Grass).min(grass_kg));
                }
                // Applied on top of the digestive limit in `init_today`.
                ForagingLimit::GeneralFunctionalResponse => {}
            }
        }
        Ok(result)
    }

    fn max_digestion(
        &self,
        digestibility: &Digestibility,
        energy_content: &ForageEnergyContent,
        diet: &ForageFraction,
        bodymass: f64,
    ) -> Result<ForageMass> {
        match self.hft.digestion_limit {
            DigestiveLimit::None => Ok(ForageMass::new(NO_DIGESTIVE_LIMIT)),
            DigestiveLimit::Allometric => max_intake_as_total_mass(
                diet,
                energy_content,
                self.hft.digestion_allometric.calc(bodymass),
            ),
            DigestiveLimit::FixedFraction => {
                let adult = self.bodymass_adult();
                let mut fraction = self.hft.digestion_fixed_fraction;
                if bodymass < adult {
                    fraction = fraction / adult.powf(-0.75) * bodymass.powf(-0.75);
                }
                max_intake_as_total_mass(diet, energy_content, fraction * bodymass)
            }
            DigestiveLimit::IlliusGordon1992 => {
                let limit_mj = digestive_limit_illius_gordon_1992(
                    bodymass,
                    self.bodymass_adult(),
                    digestibility,
                    self.hft.illius_gordon_ijk(),
                )?;
                Ok(limit_mj.divide_safely(energy_content, 0.0))
            }
        }
    }
}
