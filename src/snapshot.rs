//! Periodic JSON output of averaged daily results.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::output::DayOutput;
use crate::simulation::DaySnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMetadata {
    /// Last simulated day covered by the file.
    pub day: u64,
    /// Number of days averaged into the file.
    pub days_averaged: u32,
    pub timestamp: String,
    pub habitat_count: usize,
}

#[derive(Serialize)]
struct OutputFile<'a> {
    metadata: OutputMetadata,
    habitats: &'a BTreeMap<String, DayOutput>,
}

#[derive(Deserialize)]
struct OutputHeader {
    metadata: OutputMetadata,
}

/// Averages daily output over a fixed interval and writes one JSON file
/// per interval.
pub struct OutputWriter {
    output_dir: PathBuf,
    interval_days: u32,
    accumulated: BTreeMap<String, DayOutput>,
    days_accumulated: u32,
}

impl OutputWriter {
    pub fn new(output_dir: impl AsRef<Path>, interval_days: u32) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            interval_days,
            accumulated: BTreeMap::new(),
            days_accumulated: 0,
        }
    }

    pub fn should_write(&self, day: u64) -> bool {
        self.interval_days != 0 && day > 0 && day % u64::from(self.interval_days) == 0
    }

    /// Adds one day of output; writes the interval average when the
    /// interval is complete and returns the file path.
    pub fn maybe_write(&mut self, snapshot: &DaySnapshot, scenario_name: &str) -> Result<Option<PathBuf>> {
        if self.interval_days == 0 {
            return Ok(None);
        }
        let weight = f64::from(self.days_accumulated);
        for (name, output) in &snapshot.outputs {
            let merged = match self.accumulated.get_mut(name) {
                Some(mean) if weight > 0.0 => {
                    mean.merge(output, weight, 1.0)
                        .with_context(|| format!("Failed to average output of habitat '{name}'"))?;
                    true
                }
                _ => false,
            };
            if !merged {
                self.accumulated.insert(name.clone(), output.clone());
            }
        }
        self.days_accumulated += 1;

        if !self.should_write(snapshot.day) {
            return Ok(None);
        }
        let path = self.write(snapshot.day, scenario_name)?;
        self.accumulated.clear();
        self.days_accumulated = 0;
        Ok(Some(path))
    }

    fn write(&self, day: u64, scenario_name: &str) -> Result<PathBuf> {
        let dir = self.output_dir.join(scenario_name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        let file = OutputFile {
            metadata: OutputMetadata {
                day,
                days_averaged: self.days_accumulated,
                timestamp: chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string(),
                habitat_count: self.accumulated.len(),
            },
            habitats: &self.accumulated,
        };
        let path = dir.join(format!("output_{day:08}.json"));
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Reads the metadata of a written output file.
    pub fn load_metadata(path: impl AsRef<Path>) -> Result<OutputMetadata> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read output file {}", path.display()))?;
        let header: OutputHeader = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(header.metadata)
    }
}
