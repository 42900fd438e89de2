use std::fs;

use herbivory::{population::Population, snapshot::OutputWriter, EngineBuilder, ScenarioLoader};
use tempfile::tempdir;

#[test]
fn engine_runs_hook_each_day() {
    let loader = ScenarioLoader::new(".");
    let scenario = loader
        .load("scenarios/savanna.yaml")
        .expect("scenario should load");
    let temp = tempdir().expect("tempdir");
    let mut settings = scenario.engine_settings();
    settings.output_interval_days = 5;
    settings.output_dir = temp.path().to_path_buf();

    let mut builder = EngineBuilder::new(settings);
    for unit in scenario.build_units().expect("units build") {
        builder.push_unit(unit);
    }
    let mut engine = builder.build();

    let mut days = Vec::new();
    let mut habitats = Vec::new();
    engine
        .run_with_hook(10, |snapshot| {
            days.push(snapshot.day);
            habitats.push(snapshot.outputs.len());
        })
        .expect("run succeeds");

    assert_eq!(days.len(), 10);
    assert_eq!(days.first().copied(), Some(1));
    assert_eq!(days.last().copied(), Some(10));
    assert!(habitats.iter().all(|&n| n == 2));
    assert_eq!(engine.day(), 10);

    for day in [5, 10] {
        let path = temp
            .path()
            .join("savanna")
            .join(format!("output_{day:08}.json"));
        let metadata = OutputWriter::load_metadata(&path).expect("output written");
        assert_eq!(metadata.day, day);
        assert_eq!(metadata.days_averaged, 5);
        assert_eq!(metadata.habitat_count, 2);
    }

    for unit in engine.units() {
        let population = unit.populations().get("grazer").expect("grazer population");
        assert!(population.ind_per_km2() > 0.0, "{} is empty", unit.habitat().name());
    }
}

const INDIVIDUAL_SCENARIO: &str = r#"
name: island
seed: 3
days: 40
parameters:
  herbivore_type: individual
  habitat_area_km2: 20.0
  dead_herbivore_threshold: 0.0
hfts:
  - name: browser
    establishment_density: 2.0
    establishment_age_range: [2, 5]
habitats:
  - name: island
    grass_mass: 150000.0
output:
  interval_days: 0
"#;

fn run_island(dir: &std::path::Path) -> Vec<f64> {
    let scenario = ScenarioLoader::new(dir).load("island.yaml").expect("scenario loads");
    let mut builder = EngineBuilder::new(scenario.engine_settings());
    for unit in scenario.build_units().unwrap() {
        builder.push_unit(unit);
    }
    let mut engine = builder.build();
    let mut densities = Vec::new();
    engine
        .run_with_hook(scenario.days(None), |snapshot| {
            let (_, output) = &snapshot.outputs[0];
            densities.push(output.hft_data.get("browser").map_or(0.0, |d| d.inddens));
        })
        .unwrap();
    densities
}

#[test]
fn same_seed_reproduces_individual_run() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("island.yaml"), INDIVIDUAL_SCENARIO).unwrap();

    let first = run_island(temp.path());
    let second = run_island(temp.path());
    assert_eq!(first.len(), 40);
    assert_eq!(first, second);
    // 40 animals on 20 km².
    assert!((first[0] - 2.0).abs() < 1e-9, "initial density {}", first[0]);
}

#[test]
fn habitats_with_the_same_name_are_rejected() {
    let temp = tempdir().unwrap();
    let twins = INDIVIDUAL_SCENARIO.replace(
        "habitats:\n  - name: island\n    grass_mass: 150000.0\n",
        "habitats:\n  - name: island\n    grass_mass: 150000.0\n  - name: island\n    grass_mass: 90000.0\n",
    );
    assert_ne!(twins, INDIVIDUAL_SCENARIO);
    fs::write(temp.path().join("twins.yaml"), twins).unwrap();

    let err = ScenarioLoader::new(temp.path())
        .load("twins.yaml")
        .expect_err("duplicate habitat names must not load");
    assert!(format!("{err:#}").contains("island"), "{err:#}");
}
