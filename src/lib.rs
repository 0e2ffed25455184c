#![doc = r#"
crscheck — validate coordinate reference systems with GDAL.

This crate checks that a declared CRS (WKT, PROJ.4 string or EPSG code) is
something GDAL/OGR can import, structurally validate and export again. When a
Landsat scene id is supplied, the declaration is also cross-checked against
the UTM (or Antarctic polar-stereographic) zone that the scene's WRS path/row
maps to in a SQLite conversion table. It powers the `crscheck` CLI and can be
embedded in your own Rust applications.

Requirements
------------
- GDAL development headers and runtime available on your system.
- SQLite runtime (used for the path/row conversion table).
- Rust 2024 edition toolchain.

Quick start: validate a definition
----------------------------------
```rust,no_run
use crscheck::CrsValidator;

fn main() -> crscheck::Result<()> {
    let result = CrsValidator::from_proj4("+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs")
        .validate()?;
    assert!(result.valid);

    let result = CrsValidator::from_epsg(9999).validate()?;
    println!("{} -> {}", result.valid, result.error_message);
    Ok(())
}
```

Cross-check against a Landsat scene
-----------------------------------
```rust,no_run
use crscheck::{CrsValidator, CrossCheck, ValidatorConfig};

fn main() -> crscheck::Result<()> {
    let config = ValidatorConfig::default().with_conversion_table("conversion-table.db");
    let result = CrsValidator::from_proj4("+proj=utm +zone=12 +datum=WGS84 +units=m +no_defs")
        .with_scene_id("LC80410362014100LGN00")
        .with_config(config)
        .validate()?;

    match result.cross_check {
        CrossCheck::Passed { zone, .. } => println!("scene lies in zone {zone}"),
        CrossCheck::Failed { reason, .. } => println!("mismatch: {reason}"),
        CrossCheck::Skipped { reason } => println!("not checked: {reason}"),
        CrossCheck::NotRequested => {}
    }
    Ok(())
}
```

Building the conversion table
-----------------------------
```rust,no_run
use std::path::Path;

fn main() -> crscheck::Result<()> {
    let report = crscheck::build_conversion_table(
        Path::new("conversion-table.db"),
        Path::new("PATH_ROW_TO_UTM_ZONE.ldr"),
        Some(Path::new("polar_pathrows.csv")),
    )?;
    println!("records={} overrides={}", report.records, report.overrides);
    Ok(())
}
```

Error handling
--------------
Validation answers "is this CRS valid" with a [`ValidationResult`] rather than
an error. Only a failed import in [`ImportMode::Strict`] is returned as
[`Error::Import`]; the default lenient mode reports it as an invalid result.

Useful modules
--------------
- [`api`] — high-level, ergonomic entry points and batch helpers.
- [`core`] — scene id parsing, expected-CRS builder and the validator.
- [`io`] — GDAL adapters and the SQLite conversion table.
- [`types`] — enums and core types (e.g. `CrsInput`, `DiagnosticCode`, `Zone`).
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::params::ValidatorConfig;
pub use crate::core::validator::{CrossCheck, CrsValidator, ValidationResult, ValidationStage};
pub use crate::error::{Error, Result};
pub use crate::types::{CrsInput, DiagnosticCode, ImportMode, InputKind, PathRow, Zone};

// Lower-level helpers
pub use crate::core::reference::{build_expected_crs, utm_proj4};
pub use crate::core::scene::{SceneIdError, parse_path_row};
pub use crate::io::conversion::{BuildReport, ConversionTable, TableError};
pub use crate::io::gdal::GdalError;

// High-level API re-exports
pub use crate::api::{
    BatchReport, SceneOutcome, build_conversion_table, iterate_scene_lists, read_scene_list,
    validate_epsg, validate_input, validate_proj4, validate_scene_lists, validate_wkt,
};
