use herbivory::{
    forage::{ForageValues, HabitatForage},
    habitat::{HabitatEnvironment, StaticHabitat},
    population::PopulationList,
    simulate_day::SimulateDay,
    Hft, HftList, Parameters, SimulationUnit,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn grazer(name: &str, density: f64) -> Hft {
    Hft {
        name: name.into(),
        establishment_density: density,
        ..Hft::default()
    }
}

fn unit(hfts: Vec<Hft>, grass: f64, params: &Parameters) -> SimulationUnit {
    let hfts = HftList::new(hfts).unwrap();
    let forage = HabitatForage::new(
        ForageValues::new(grass),
        ForageValues::new(0.55),
        ForageValues::new(grass * 0.015),
    )
    .unwrap();
    SimulationUnit::new(
        Box::new(StaticHabitat::new("meadow", forage, HabitatEnvironment::default())),
        PopulationList::from_hfts(&hfts, params).unwrap(),
    )
}

#[test]
fn scarce_forage_is_shared_without_overuse() {
    let params = Parameters::cohorts(1e-6);
    let grass = 12_000.0;
    let mut unit = unit(
        vec![grazer("left", 10_000.0), grazer("right", 10_000.0)],
        grass,
        &params,
    );
    let output = SimulateDay::new(100, &mut unit, &params)
        .unwrap()
        .run(true, true, &mut ChaCha8Rng::seed_from_u64(4))
        .unwrap();

    let eaten = output.habitat.eaten_forage.sum();
    assert!(eaten <= grass, "eaten {eaten} of {grass}");
    // Demand exceeds supply, so everything but the safety margin is eaten.
    assert!((eaten - grass * 0.999).abs() / grass < 1e-6, "eaten {eaten}");

    let left = &output.hft_data["left"];
    let right = &output.hft_data["right"];
    assert!(left.eaten_forage_per_ind.sum() > 0.0);
    // Identical HFTs get identical shares.
    let difference = (left.eaten_forage_per_ind.sum() - right.eaten_forage_per_ind.sum()).abs();
    assert!(difference < 1e-9, "left and right differ by {difference}");
}

#[test]
fn ample_forage_satisfies_every_herbivore() {
    let params = Parameters::cohorts(1e-6);
    let grass = 500_000.0;
    let mut unit = unit(vec![grazer("left", 1.0), grazer("right", 3.0)], grass, &params);
    let output = SimulateDay::new(100, &mut unit, &params)
        .unwrap()
        .run(true, true, &mut ChaCha8Rng::seed_from_u64(4))
        .unwrap();

    let eaten = output.habitat.eaten_forage.sum();
    assert!(eaten > 0.0 && eaten < grass * 0.01, "eaten {eaten}");
    let left = &output.hft_data["left"];
    let right = &output.hft_data["right"];
    // Same age structure, so per-individual intake does not depend on density.
    let relative = (left.eaten_forage_per_ind.sum() - right.eaten_forage_per_ind.sum()).abs()
        / left.eaten_forage_per_ind.sum();
    assert!(relative < 1e-9, "per-individual intake differs by {relative}");
    let per_km2 = left.eaten_forage_per_ind.sum() * left.inddens
        + right.eaten_forage_per_ind.sum() * right.inddens;
    assert!((per_km2 - eaten).abs() / eaten < 1e-6);
}

#[test]
fn forage_below_detection_limit_is_not_eaten() {
    let params = Parameters::cohorts(1e-6);
    let mut unit = unit(vec![grazer("left", 10.0)], 9_000.0, &params);
    let output = SimulateDay::new(0, &mut unit, &params)
        .unwrap()
        .run(true, true, &mut ChaCha8Rng::seed_from_u64(4))
        .unwrap();
    assert_eq!(output.habitat.eaten_forage.sum(), 0.0);
    assert_eq!(output.hft_data["left"].eaten_forage_per_ind.sum(), 0.0);
}
