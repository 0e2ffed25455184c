//! High-level, ergonomic library API: one-shot validation of WKT, PROJ.4 and
//! EPSG definitions, and batch helpers that validate one CRS against every
//! scene id listed in a directory of scene-list files. Prefer these
//! entrypoints over the lower-level `core` modules when integrating crscheck.
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use crate::core::params::ValidatorConfig;
use crate::core::validator::{CrsValidator, ValidationResult};
use crate::error::{Error, Result};
use crate::io::conversion::{BuildReport, ConversionTable};
use crate::types::CrsInput;

/// Validate any declared CRS, optionally against a scene id
pub fn validate_input(
    input: &CrsInput,
    scene_id: Option<&str>,
    config: &ValidatorConfig,
) -> Result<ValidationResult> {
    let mut validator = CrsValidator::new(input.clone()).with_config(config.clone());
    if let Some(id) = scene_id {
        validator = validator.with_scene_id(id);
    }
    validator.validate()
}

pub fn validate_wkt(
    wkt: &str,
    scene_id: Option<&str>,
    config: &ValidatorConfig,
) -> Result<ValidationResult> {
    validate_input(&CrsInput::Wkt(wkt.to_string()), scene_id, config)
}

pub fn validate_proj4(
    proj4: &str,
    scene_id: Option<&str>,
    config: &ValidatorConfig,
) -> Result<ValidationResult> {
    validate_input(&CrsInput::Proj4(proj4.to_string()), scene_id, config)
}

pub fn validate_epsg(
    code: u32,
    scene_id: Option<&str>,
    config: &ValidatorConfig,
) -> Result<ValidationResult> {
    validate_input(&CrsInput::Epsg(code), scene_id, config)
}

/// Build the conversion table at `db` from a loader file and optional polar overrides
pub fn build_conversion_table(
    db: &Path,
    loader: &Path,
    polar_overrides: Option<&Path>,
) -> Result<BuildReport> {
    Ok(ConversionTable::build(db, loader, polar_overrides)?)
}

/// Outcome for one scene id of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct SceneOutcome {
    pub scene_id: String,
    pub valid: bool,
    pub error_message: String,
}

/// Batch validation report
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub checked: usize,
    pub valid: usize,
    pub invalid: usize,
    pub errors: usize,
    pub outcomes: Vec<SceneOutcome>,
    pub elapsed: Duration,
}

/// Read scene ids from a list file: one per line, blank lines skipped
pub fn read_scene_list(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Return an iterator over the scene-list files directly inside `dir`, sorted by name
pub fn iterate_scene_lists(dir: &Path) -> Result<std::vec::IntoIter<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(Error::from)? {
        let entry = entry.map_err(Error::from)?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files.into_iter())
}

/// Validate `input` against every scene id in every list file of `dir`.
/// If `continue_on_error` is true, strict-mode import errors are counted and the run continues.
pub fn validate_scene_lists(
    input: &CrsInput,
    dir: &Path,
    config: &ValidatorConfig,
    continue_on_error: bool,
) -> Result<BatchReport> {
    let started = Instant::now();
    let mut report = BatchReport::default();

    for list in iterate_scene_lists(dir)? {
        info!("Reading scene list: {:?}", list);
        for scene_id in read_scene_list(&list)? {
            report.checked += 1;
            match validate_input(input, Some(&scene_id), config) {
                Ok(result) => {
                    if result.valid {
                        report.valid += 1;
                    } else {
                        report.invalid += 1;
                    }
                    report.outcomes.push(SceneOutcome {
                        scene_id,
                        valid: result.valid,
                        error_message: result.error_message,
                    });
                }
                Err(e) => {
                    warn!("Error validating scene {}: {}", scene_id, e);
                    report.errors += 1;
                    if !continue_on_error {
                        return Err(e);
                    }
                }
            }
        }
    }

    report.elapsed = started.elapsed();
    info!(
        "Checked {} scenes in {:.3}s",
        report.checked,
        report.elapsed.as_secs_f64()
    );
    Ok(report)
}
