use std::collections::BTreeSet;

use herbivory::{
    forage::{ForageValues, HabitatForage},
    habitat::{HabitatEnvironment, StaticHabitat},
    mortality::MortalityFactor,
    population::{Population, PopulationList},
    simulate_day::SimulateDay,
    Hft, HftList, Parameters, SimulationUnit,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn unit(hft: Hft, grass: f64, params: &Parameters) -> SimulationUnit {
    let hfts = HftList::new(vec![hft]).expect("unique HFT names");
    let forage = HabitatForage::new(
        ForageValues::new(grass),
        ForageValues::new(0.55),
        ForageValues::new(grass * 0.02),
    )
    .expect("valid forage");
    SimulationUnit::new(
        Box::new(StaticHabitat::new("meadow", forage, HabitatEnvironment::default())),
        PopulationList::from_hfts(&hfts, params).expect("populations"),
    )
}

fn grazer() -> Hft {
    Hft {
        name: "grazer".into(),
        ..Hft::default()
    }
}

#[test]
fn population_persists_with_ample_forage() {
    let params = Parameters::cohorts(1e-6);
    let mut unit = unit(grazer(), 300_000.0, &params);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    for day in 0..365 {
        let output = SimulateDay::new(day, &mut unit, &params)
            .unwrap()
            .run(true, day == 0, &mut rng)
            .expect("day runs");
        let grazers = &output.hft_data["grazer"];
        assert!(grazers.inddens > 0.0, "day {day}: population vanished");
        assert!(output.habitat.eaten_forage.sum() > 0.0, "day {day}: nothing eaten");
    }

    let population = unit.populations().get("grazer").unwrap();
    assert!(
        population.ind_per_km2() > 0.5,
        "density after one year: {}",
        population.ind_per_km2()
    );
    assert!(population.herbivores().iter().all(|h| !h.is_dead()));
}

#[test]
fn population_starves_without_forage() {
    let hft = Hft {
        mortality_factors: BTreeSet::from([
            MortalityFactor::Background,
            MortalityFactor::StarvationThreshold,
        ]),
        ..grazer()
    };
    let params = Parameters::cohorts(1e-6);
    let mut unit = unit(hft, 0.0, &params);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    for day in 0..200 {
        SimulateDay::new(day, &mut unit, &params)
            .unwrap()
            .run(true, day == 0, &mut rng)
            .expect("day runs");
    }
    let population = unit.populations().get("grazer").unwrap();
    assert!(population.is_empty(), "{} cohorts left", population.herbivores().len());
}

#[test]
fn nitrogen_eaten_is_returned_to_the_habitat() {
    let params = Parameters::cohorts(1e-6);
    let mut unit = unit(grazer(), 300_000.0, &params);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let mut eaten_nitrogen = 0.0;
    let mut excreted_nitrogen = 0.0;
    for day in 0..60 {
        let output = SimulateDay::new(day, &mut unit, &params)
            .unwrap()
            .run(true, day == 0, &mut rng)
            .unwrap();
        eaten_nitrogen += output.habitat.eaten_forage.sum() * 0.02;
        excreted_nitrogen += output.habitat.excreted_nitrogen;
    }
    assert!(eaten_nitrogen > 0.0);
    assert!(excreted_nitrogen < eaten_nitrogen);

    // Dead herbivores release everything they still hold.
    for population in unit.populations_mut().iter_mut() {
        population.kill_all();
    }
    let output = SimulateDay::new(60, &mut unit, &params)
        .unwrap()
        .run(true, false, &mut rng)
        .unwrap();
    excreted_nitrogen += output.habitat.excreted_nitrogen;

    let relative_error = (excreted_nitrogen - eaten_nitrogen).abs() / eaten_nitrogen;
    assert!(relative_error < 1e-9, "eaten {eaten_nitrogen}, excreted {excreted_nitrogen}");
    assert!(unit.populations().get("grazer").unwrap().is_empty());
}

#[test]
fn periodic_establishment_refills_empty_populations() {
    let params = Parameters::cohorts(1e-6);
    let mut unit = unit(grazer(), 300_000.0, &params);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    SimulateDay::new(0, &mut unit, &params)
        .unwrap()
        .run(true, true, &mut rng)
        .unwrap();
    for population in unit.populations_mut().iter_mut() {
        population.kill_all();
    }
    SimulateDay::new(1, &mut unit, &params)
        .unwrap()
        .run(true, false, &mut rng)
        .unwrap();
    assert!(unit.populations().get("grazer").unwrap().is_empty());

    let output = SimulateDay::new(2, &mut unit, &params)
        .unwrap()
        .run(true, true, &mut rng)
        .unwrap();
    assert!((output.hft_data["grazer"].inddens - 1.0).abs() < 1e-9);
}
