//! Expected CRS for a conversion-table zone.
use gdal::spatial_ref::SpatialRef;

use crate::io::GdalError;
use crate::types::{POLAR_EPSG, Zone};

/// PROJ.4 definition of a WGS 84 UTM zone. The zone is not range-checked.
pub fn utm_proj4(zone: i64) -> String {
    format!("+proj=utm +zone={} +datum=WGS84 +units=m +no_defs", zone)
}

/// Build the CRS a scene in `zone` is expected to be delivered in
pub fn build_expected_crs(zone: Zone) -> Result<SpatialRef, GdalError> {
    let srs = match zone {
        Zone::PolarStereographic => SpatialRef::from_epsg(POLAR_EPSG)?,
        Zone::Utm(n) => SpatialRef::from_proj4(&utm_proj4(n))?,
    };
    Ok(srs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utm_definition_format() {
        assert_eq!(
            utm_proj4(12),
            "+proj=utm +zone=12 +datum=WGS84 +units=m +no_defs"
        );
        assert_eq!(
            utm_proj4(61),
            "+proj=utm +zone=61 +datum=WGS84 +units=m +no_defs"
        );
    }

    #[test]
    fn builds_utm_and_polar_references() {
        let utm = build_expected_crs(Zone::Utm(12)).unwrap();
        assert_eq!(crate::io::gdal::utm_zone(&utm), Some(12));
        let polar = build_expected_crs(Zone::PolarStereographic).unwrap();
        assert!(polar.to_wkt().unwrap().contains("Polar"));
    }
}
