//! I/O layer: GDAL/OGR spatial-reference adapters and the SQLite-backed
//! path/row conversion table.
pub mod conversion;
pub use conversion::{BuildReport, ConversionEntry, ConversionTable, TableError};

pub mod gdal;
pub use gdal::GdalError;
