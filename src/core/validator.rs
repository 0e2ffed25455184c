//! CRS validation state machine.
//!
//! A [`CrsValidator`] imports the declared CRS through GDAL, runs OGR's
//! structural validator and, when a Landsat scene id is supplied, cross-checks
//! the declaration against the zone expected for the scene's path/row.
//!
//! ```text
//! Unvalidated --import--> Parsed --scene lookup + transforms--> SceneChecked
//!      |                    |                                       |
//!      +--------------------+---------------------------------------+--> Resolved
//! ```
//!
//! Only import failures in [`ImportMode::Strict`] surface as errors; every other
//! outcome is an answer carried by [`ValidationResult`].
use gdal::spatial_ref::SpatialRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::params::ValidatorConfig;
use crate::core::reference::build_expected_crs;
use crate::core::scene::parse_path_row;
use crate::error::{Error, Result};
use crate::io::conversion::{ConversionTable, TableError};
use crate::io::gdal::{
    check_transform, export_wkt, import_srs, is_polar_stereographic, structural_code, utm_zone,
};
use crate::types::{CrsInput, DiagnosticCode, ImportMode, PathRow, Zone};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ValidationStage {
    Unvalidated,
    Parsed,
    SceneChecked,
    Resolved,
}

/// Outcome of the scene cross-check
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CrossCheck {
    /// No scene id was supplied
    NotRequested,
    /// A scene id was supplied but the check could not run, either because
    /// the id or the table was unusable or because the definition was invalid
    Skipped { reason: String },
    Passed { path_row: PathRow, zone: Zone },
    Failed {
        path_row: PathRow,
        zone: Option<Zone>,
        reason: String,
    },
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub error_code: DiagnosticCode,
    pub error_message: String,
    /// Last state reached before resolution
    pub resolved_from: ValidationStage,
    pub cross_check: CrossCheck,
    /// WKT export of the declared CRS, when it could be exported
    pub wkt: Option<String>,
    pub warnings: Vec<String>,
}

/// Where the scene cross-check stands before the declared CRS is parsed
enum SceneTarget {
    None,
    Skip(String),
    Check(PathRow),
}

/// Reason recorded when a scene was given but the definition failed first
const DEFINITION_INVALID: &str = "definition invalid";

impl SceneTarget {
    fn skipped_for_invalid_definition(self) -> CrossCheck {
        match self {
            SceneTarget::None => CrossCheck::NotRequested,
            SceneTarget::Skip(reason) => CrossCheck::Skipped { reason },
            SceneTarget::Check(_) => CrossCheck::Skipped {
                reason: DEFINITION_INVALID.to_string(),
            },
        }
    }
}

/// Mutable state of one validation run
struct Run {
    stage: ValidationStage,
    code: DiagnosticCode,
    cross_check: CrossCheck,
    wkt: Option<String>,
    warnings: Vec<String>,
}

impl Run {
    fn new() -> Self {
        Self {
            stage: ValidationStage::Unvalidated,
            code: DiagnosticCode::CorruptData,
            cross_check: CrossCheck::NotRequested,
            wkt: None,
            warnings: Vec::new(),
        }
    }

    fn advance(&mut self, stage: ValidationStage) {
        debug!("Validation {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    fn resolve(self, valid: bool) -> ValidationResult {
        debug!(
            "Validation {:?} -> Resolved (valid={}, {})",
            self.stage, valid, self.code
        );
        ValidationResult {
            valid,
            error_code: self.code,
            error_message: self.code.message().to_string(),
            resolved_from: self.stage,
            cross_check: self.cross_check,
            wkt: self.wkt,
            warnings: self.warnings,
        }
    }
}

/// Validator for a single declared CRS, optionally tied to a Landsat scene
#[derive(Debug, Clone)]
pub struct CrsValidator {
    input: CrsInput,
    scene_id: Option<String>,
    config: ValidatorConfig,
}

impl CrsValidator {
    pub fn new(input: CrsInput) -> Self {
        Self {
            input,
            scene_id: None,
            config: ValidatorConfig::default(),
        }
    }

    pub fn from_wkt<S: Into<String>>(wkt: S) -> Self {
        Self::new(CrsInput::Wkt(wkt.into()))
    }

    pub fn from_proj4<S: Into<String>>(proj4: S) -> Self {
        Self::new(CrsInput::Proj4(proj4.into()))
    }

    pub fn from_epsg(code: u32) -> Self {
        Self::new(CrsInput::Epsg(code))
    }

    /// Attach a scene id; an empty id means none
    pub fn with_scene_id<S: Into<String>>(mut self, scene_id: S) -> Self {
        let scene_id = scene_id.into();
        self.scene_id = if scene_id.trim().is_empty() {
            None
        } else {
            Some(scene_id)
        };
        self
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    fn scene_target(&self, run: &mut Run) -> SceneTarget {
        let Some(scene_id) = self.scene_id.as_deref() else {
            return SceneTarget::None;
        };
        match parse_path_row(scene_id) {
            Ok(path_row) => SceneTarget::Check(path_row),
            Err(e) => {
                let reason = format!("Unable to parse scene id, defaulting to no scene id: {}", e);
                run.warn(reason.clone());
                SceneTarget::Skip(reason)
            }
        }
    }

    /// Run the full validation sequence
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut run = Run::new();
        let target = self.scene_target(&mut run);

        let srs = match import_srs(&self.input) {
            Ok(srs) => srs,
            Err(source) => match self.config.import_mode {
                ImportMode::Strict => {
                    return Err(Error::Import {
                        kind: self.input.kind(),
                        source,
                    });
                }
                ImportMode::Lenient => {
                    run.code = source.diagnostic();
                    run.warn(format!(
                        "Failed to import {} definition: {}",
                        self.input.kind(),
                        source
                    ));
                    run.cross_check = target.skipped_for_invalid_definition();
                    return Ok(run.resolve(false));
                }
            },
        };

        run.code = structural_code(&srs);
        run.advance(ValidationStage::Parsed);
        run.wkt = export_wkt(&srs).ok();

        if !run.code.is_none() {
            run.cross_check = target.skipped_for_invalid_definition();
            return Ok(run.resolve(false));
        }

        let path_row = match target {
            SceneTarget::None => return Ok(self.resolve_without_scene(run)),
            SceneTarget::Skip(reason) => {
                run.cross_check = CrossCheck::Skipped { reason };
                return Ok(self.resolve_without_scene(run));
            }
            SceneTarget::Check(path_row) => path_row,
        };

        let zone = match self.lookup_zone(path_row) {
            Ok(zone) => zone,
            Err(reason) => {
                run.warn(reason.clone());
                run.cross_check = CrossCheck::Skipped { reason };
                return Ok(self.resolve_without_scene(run));
            }
        };

        run.advance(ValidationStage::SceneChecked);
        let valid = match zone.and_then(|zone| cross_check(&srs, path_row, zone).map(|_| zone)) {
            Ok(zone) => {
                run.cross_check = CrossCheck::Passed { path_row, zone };
                true
            }
            Err(failure) => {
                debug!("Cross-check failed for {}: {}", path_row, failure.reason);
                run.code = DiagnosticCode::CorruptData;
                run.cross_check = CrossCheck::Failed {
                    path_row,
                    zone: failure.zone,
                    reason: failure.reason,
                };
                false
            }
        };
        Ok(run.resolve(valid))
    }

    fn resolve_without_scene(&self, mut run: Run) -> ValidationResult {
        if run.wkt.is_none() {
            run.code = DiagnosticCode::CorruptData;
            run.warn("Spatial reference could not be exported to WKT".to_string());
            return run.resolve(false);
        }
        debug!("Scene id not provided or not checkable, structure appears OK");
        run.resolve(true)
    }

    /// Expected zone for a path/row. `Err` carries a reason to skip the
    /// cross-check; `Ok(Err(_))` is a table that answered with a bad zone.
    fn lookup_zone(
        &self,
        path_row: PathRow,
    ) -> std::result::Result<std::result::Result<Zone, Failure>, String> {
        let Some(table_path) = self.config.conversion_table.as_deref() else {
            return Err("No conversion table configured, unable to verify scene location".into());
        };
        let table = ConversionTable::open(table_path).map_err(|e| {
            format!("Database not found, unable to verify scene location: {}", e)
        })?;
        match table.lookup_zone(path_row) {
            Ok(Some(zone)) => Ok(Ok(zone)),
            Ok(None) => Err(format!(
                "No zone recorded for path/row {} in {:?}, unable to verify scene location",
                path_row,
                table.path()
            )),
            Err(TableError::InvalidZone(raw)) => Ok(Err(Failure {
                zone: None,
                reason: format!("conversion table holds invalid zone {:?}", raw),
            })),
            Err(e) => Err(format!(
                "Conversion table {:?} unavailable, unable to verify scene location: {}",
                table.path(),
                e
            )),
        }
    }
}

struct Failure {
    zone: Option<Zone>,
    reason: String,
}

/// Transforms must build both ways and a declared projection must agree with
/// the scene's: same UTM zone for UTM scenes, polar stereographic for polar ones.
/// Geographic declarations only need the transforms.
fn cross_check(
    declared: &SpatialRef,
    path_row: PathRow,
    zone: Zone,
) -> std::result::Result<(), Failure> {
    let fail = |reason: String| Failure {
        zone: Some(zone),
        reason,
    };
    let expected = build_expected_crs(zone)
        .map_err(|e| fail(format!("cannot build CRS for zone {}: {}", zone, e)))?;
    check_transform(declared, &expected).map_err(|e| fail(e.to_string()))?;
    if !declared.is_projected() {
        return Ok(());
    }
    match (utm_zone(declared), zone) {
        (Some(declared_zone), Zone::Utm(expected_zone)) if declared_zone != expected_zone => {
            Err(fail(format!(
                "declared UTM zone {} but path/row {} lies in zone {}",
                declared_zone, path_row, expected_zone
            )))
        }
        (Some(_), Zone::Utm(_)) => Ok(()),
        (None, Zone::Utm(expected_zone)) => Err(fail(format!(
            "declared projection is not UTM but path/row {} lies in zone {}",
            path_row, expected_zone
        ))),
        (Some(declared_zone), Zone::PolarStereographic) => Err(fail(format!(
            "declared UTM zone {} but path/row {} requires polar stereographic",
            declared_zone, path_row
        ))),
        (None, Zone::PolarStereographic) if is_polar_stereographic(declared) => Ok(()),
        (None, Zone::PolarStereographic) => Err(fail(format!(
            "path/row {} requires polar stereographic but another projection was declared",
            path_row
        ))),
    }
}
