//! Shared types and enums used across crscheck.
//! Includes `InputKind`, `ImportMode`, the OGR `DiagnosticCode` table,
//! the conversion-table `Zone` value and Landsat `PathRow` coordinates.
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Zone text stored in the conversion table for polar-stereographic scenes
pub const POLAR_ZONE_MARKER: &str = "3031";

/// EPSG code of WGS 84 / Antarctic Polar Stereographic
pub const POLAR_EPSG: u32 = 3031;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum InputKind {
    Wkt,
    Proj4,
    Epsg,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InputKind::Wkt => "WKT",
            InputKind::Proj4 => "PROJ.4",
            InputKind::Epsg => "EPSG",
        };
        write!(f, "{}", s)
    }
}

/// A declared coordinate reference system, tagged by the importer it needs
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", content = "definition", rename_all = "lowercase")]
pub enum CrsInput {
    Wkt(String),
    Proj4(String),
    Epsg(u32),
}

impl CrsInput {
    pub fn kind(&self) -> InputKind {
        match self {
            CrsInput::Wkt(_) => InputKind::Wkt,
            CrsInput::Proj4(_) => InputKind::Proj4,
            CrsInput::Epsg(_) => InputKind::Epsg,
        }
    }
}

impl std::fmt::Display for CrsInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrsInput::Wkt(wkt) => write!(f, "{}", wkt),
            CrsInput::Proj4(proj4) => write!(f, "{}", proj4),
            CrsInput::Epsg(code) => write!(f, "EPSG:{}", code),
        }
    }
}

/// How import failures of the declared CRS are surfaced.
///
/// `Strict` propagates them as [`crate::Error::Import`]; `Lenient` reports an
/// invalid result and leaves the descriptor unset.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    Strict,
    #[default]
    Lenient,
}

/// OGRERR diagnostic codes as reported by GDAL's structural validator
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DiagnosticCode {
    None,
    NotEnoughData,
    NotEnoughMemory,
    UnsupportedGeometryType,
    UnsupportedOperation,
    CorruptData,
    Failure,
    UnsupportedSrs,
    InvalidHandle,
    NonExistingFeature,
    Unknown(i32),
}

impl DiagnosticCode {
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => DiagnosticCode::None,
            1 => DiagnosticCode::NotEnoughData,
            2 => DiagnosticCode::NotEnoughMemory,
            3 => DiagnosticCode::UnsupportedGeometryType,
            4 => DiagnosticCode::UnsupportedOperation,
            5 => DiagnosticCode::CorruptData,
            6 => DiagnosticCode::Failure,
            7 => DiagnosticCode::UnsupportedSrs,
            8 => DiagnosticCode::InvalidHandle,
            9 => DiagnosticCode::NonExistingFeature,
            other => DiagnosticCode::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            DiagnosticCode::None => 0,
            DiagnosticCode::NotEnoughData => 1,
            DiagnosticCode::NotEnoughMemory => 2,
            DiagnosticCode::UnsupportedGeometryType => 3,
            DiagnosticCode::UnsupportedOperation => 4,
            DiagnosticCode::CorruptData => 5,
            DiagnosticCode::Failure => 6,
            DiagnosticCode::UnsupportedSrs => 7,
            DiagnosticCode::InvalidHandle => 8,
            DiagnosticCode::NonExistingFeature => 9,
            DiagnosticCode::Unknown(code) => *code,
        }
    }

    /// Message paired with the code, named after the constants in GDAL's ogr_core.h
    pub fn message(&self) -> &'static str {
        match self {
            DiagnosticCode::None => "OGRERR_NONE",
            DiagnosticCode::NotEnoughData => "OGRERR_NOT_ENOUGH_DATA",
            DiagnosticCode::NotEnoughMemory => "OGRERR_NOT_ENOUGH_MEMORY",
            DiagnosticCode::UnsupportedGeometryType => "OGRERR_UNSUPPORTED_GEOMETRY_TYPE",
            DiagnosticCode::UnsupportedOperation => "OGRERR_UNSUPPORTED_OPERATION",
            DiagnosticCode::CorruptData => "OGRERR_CORRUPT_DATA",
            DiagnosticCode::Failure => "OGRERR_FAILURE",
            DiagnosticCode::UnsupportedSrs => "OGRERR_UNSUPPORTED_SRS",
            DiagnosticCode::InvalidHandle => "OGRERR_INVALID_HANDLE",
            DiagnosticCode::NonExistingFeature => "OGRERR_NON_EXISTING_FEATURE",
            DiagnosticCode::Unknown(_) => "Unknown GDAL/OGR Error",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DiagnosticCode::None)
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

/// Expected projection of a scene, as stored in the `conversion` table
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Zone {
    /// UTM zone number; range is not checked here, GDAL rejects bad zones
    Utm(i64),
    PolarStereographic,
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Utm(zone) => write!(f, "{}", zone),
            Zone::PolarStereographic => write!(f, "{}", POLAR_ZONE_MARKER),
        }
    }
}

impl FromStr for Zone {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == POLAR_ZONE_MARKER {
            return Ok(Zone::PolarStereographic);
        }
        s.parse::<i64>().map(Zone::Utm)
    }
}

/// Landsat World Reference System grid coordinates
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PathRow {
    pub path: u32,
    pub row: u32,
}

impl std::fmt::Display for PathRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}/{:03}", self.path, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_codes_map_to_ogr_names() {
        assert_eq!(DiagnosticCode::from_raw(0), DiagnosticCode::None);
        assert_eq!(DiagnosticCode::from_raw(5).message(), "OGRERR_CORRUPT_DATA");
        assert_eq!(DiagnosticCode::from_raw(7).message(), "OGRERR_UNSUPPORTED_SRS");
        assert_eq!(
            DiagnosticCode::from_raw(9).message(),
            "OGRERR_NON_EXISTING_FEATURE"
        );
        for raw in 0..=9 {
            assert_eq!(DiagnosticCode::from_raw(raw).code(), raw);
        }
    }

    #[test]
    fn unknown_diagnostic_code_keeps_raw_value() {
        let code = DiagnosticCode::from_raw(42);
        assert_eq!(code, DiagnosticCode::Unknown(42));
        assert_eq!(code.code(), 42);
        assert_eq!(code.message(), "Unknown GDAL/OGR Error");
        assert!(!code.is_none());
    }

    #[test]
    fn zone_text_form() {
        assert_eq!("12".parse::<Zone>().unwrap(), Zone::Utm(12));
        assert_eq!(" 7 ".parse::<Zone>().unwrap(), Zone::Utm(7));
        assert_eq!("3031".parse::<Zone>().unwrap(), Zone::PolarStereographic);
        assert_eq!(Zone::PolarStereographic.to_string(), POLAR_ZONE_MARKER);
        assert_eq!(Zone::Utm(0).to_string(), "0");
        assert!("polar".parse::<Zone>().is_err());
    }

    #[test]
    fn import_mode_defaults_to_lenient() {
        assert_eq!(ImportMode::default(), ImportMode::Lenient);
        let parsed: ImportMode = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(parsed, ImportMode::Strict);
    }
}
