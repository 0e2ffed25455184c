use gdal::errors::GdalError as GdalCrateError;
use gdal::spatial_ref::{CoordTransform, SpatialRef};
use std::os::raw::c_int;
use thiserror::Error;
use tracing::debug;

use crate::types::{CrsInput, DiagnosticCode};

/// Errors encountered when calling into GDAL/OGR
#[derive(Debug, Error)]
pub enum GdalError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Spatial reference exported an empty WKT")]
    EmptyWkt,
    #[error("Cannot build coordinate transformation {direction}: {source}")]
    Transform {
        direction: &'static str,
        #[source]
        source: GdalCrateError,
    },
}

impl GdalError {
    /// Best-effort OGRERR code for this error; CORRUPT_DATA when GDAL gave none
    pub fn diagnostic(&self) -> DiagnosticCode {
        match self {
            GdalError::Gdal(GdalCrateError::OgrError { err, .. }) => {
                DiagnosticCode::from_raw(*err as i32)
            }
            _ => DiagnosticCode::CorruptData,
        }
    }
}

/// Import a declared CRS through the importer matching its kind
pub fn import_srs(input: &CrsInput) -> Result<SpatialRef, GdalError> {
    let srs = match input {
        CrsInput::Wkt(wkt) => SpatialRef::from_wkt(wkt)?,
        CrsInput::Proj4(proj4) => SpatialRef::from_proj4(proj4)?,
        CrsInput::Epsg(code) => SpatialRef::from_epsg(*code)?,
    };
    Ok(srs)
}

/// Nodes of a geographic or projected CRS that must carry a non-empty name
const NAMED_NODES: [&str; 2] = ["GEOGCS", "DATUM"];

/// Run OGR's structural validator (`OSRValidate`) on a spatial reference,
/// then reject geographic or projected CRSs with a missing or unnamed
/// GEOGCS/DATUM node, which OSRValidate lets through.
pub fn structural_code(srs: &SpatialRef) -> DiagnosticCode {
    let raw = unsafe { gdal_sys::OSRValidate(srs.to_c_hsrs()) };
    let code = DiagnosticCode::from_raw(raw as i32);
    debug!("OSRValidate returned {}", code);
    if !code.is_none() || !(srs.is_geographic() || srs.is_projected()) {
        return code;
    }
    for node in NAMED_NODES {
        let name = srs.get_attr_value(node, 0).ok().flatten();
        if name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            debug!("{} node is missing or has an empty name", node);
            return DiagnosticCode::CorruptData;
        }
    }
    code
}

/// Whether a projected CRS uses the polar stereographic projection
pub fn is_polar_stereographic(srs: &SpatialRef) -> bool {
    srs.is_projected()
        && srs
            .get_attr_value("PROJECTION", 0)
            .ok()
            .flatten()
            .is_some_and(|p| p.starts_with("Polar_Stereographic"))
}

/// Export to WKT, treating an empty export as a failure
pub fn export_wkt(srs: &SpatialRef) -> Result<String, GdalError> {
    let wkt = srs.to_wkt()?;
    if wkt.trim().is_empty() {
        return Err(GdalError::EmptyWkt);
    }
    Ok(wkt)
}

/// UTM zone number of a projected UTM CRS, or `None` when it is not UTM
pub fn utm_zone(srs: &SpatialRef) -> Option<i64> {
    let mut north: c_int = 0;
    let zone = unsafe { gdal_sys::OSRGetUTMZone(srs.to_c_hsrs(), &mut north) };
    if zone == 0 { None } else { Some(zone as i64) }
}

/// Construct coordinate transforms in both directions between two CRSs
pub fn check_transform(declared: &SpatialRef, expected: &SpatialRef) -> Result<(), GdalError> {
    CoordTransform::new(expected, declared).map_err(|source| GdalError::Transform {
        direction: "expected->declared",
        source,
    })?;
    CoordTransform::new(declared, expected).map_err(|source| GdalError::Transform {
        direction: "declared->expected",
        source,
    })?;
    Ok(())
}
