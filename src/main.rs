use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use herbivory::{population::Population, EngineBuilder, ScenarioLoader};

#[derive(Debug, Parser)]
#[command(author, version, about = "Herbivore population simulator")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/savanna.yaml")]
    scenario: PathBuf,

    /// Override the number of simulated days
    #[arg(long)]
    days: Option<u64>,

    /// Override the output interval in days (0 disables output)
    #[arg(long)]
    output_interval: Option<u32>,

    /// Directory for output files
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let scenario = ScenarioLoader::new(".").load(&cli.scenario)?;
    let days = scenario.days(cli.days);

    let mut settings = scenario.engine_settings();
    if let Some(interval) = cli.output_interval {
        settings.output_interval_days = interval;
    }
    if let Some(dir) = cli.output_dir {
        settings.output_dir = dir;
    }

    let mut builder = EngineBuilder::new(settings);
    for unit in scenario.build_units()? {
        builder.push_unit(unit);
    }
    let mut engine = builder.build();
    engine.run(days)?;

    for unit in engine.units() {
        for population in unit.populations().iter() {
            info!(
                habitat = unit.habitat().name(),
                hft = %population.hft().name,
                ind_per_km2 = population.ind_per_km2(),
                kg_per_km2 = population.kg_per_km2(),
                "Final population"
            );
        }
    }
    println!(
        "Scenario '{}' completed for {} days.",
        scenario.name, days
    );
    Ok(())
}
