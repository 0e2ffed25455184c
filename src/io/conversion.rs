//! SQLite-backed (path, row) -> zone conversion table.
//!
//! The table is built offline from the LPGS `PATH_ROW_TO_UTM_ZONE` loader file
//! (11 header lines, then `path|row|zone` records) and an optional CSV list of
//! `path,row` pairs forced to the polar-stereographic marker. Validation only
//! ever reads it, opening a fresh read-only connection per lookup.
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::types::{POLAR_ZONE_MARKER, PathRow, Zone};

/// Number of header lines preceding the records of a loader file
pub const LOADER_HEADER_LINES: usize = 11;

const CREATE_CONVERSION_TABLE: &str = "CREATE TABLE IF NOT EXISTS conversion (
    path INTEGER NOT NULL,
    row INTEGER NOT NULL,
    zone TEXT NOT NULL,
    PRIMARY KEY (path, row)
)";
// Tables from older builds may lack the primary key, so replacement deletes first
const DELETE_ZONE: &str = "DELETE FROM conversion WHERE path = ?1 AND row = ?2";
const UPSERT_ZONE: &str = "INSERT OR REPLACE INTO conversion (path, row, zone) VALUES (?1, ?2, ?3)";
const SELECT_ZONE: &str = "SELECT zone FROM conversion WHERE path = ?1 AND row = ?2";

/// Errors encountered when building or reading the conversion table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Conversion table not found: {0}")]
    NotFound(PathBuf),
    #[error("Malformed record on line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },
    #[error("Invalid zone value in conversion table: {0:?}")]
    InvalidZone(String),
}

/// A single loader or override record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionEntry {
    pub path_row: PathRow,
    pub zone: Zone,
}

/// Summary of a table build
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct BuildReport {
    pub records: usize,
    pub overrides: usize,
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>) -> Option<T> {
    field.map(str::trim).and_then(|f| f.parse::<T>().ok())
}

/// Parse the records of a loader file, skipping its fixed header
pub fn parse_loader(contents: &str) -> Result<Vec<ConversionEntry>, TableError> {
    let mut entries = Vec::new();
    for (idx, line) in contents.lines().enumerate().skip(LOADER_HEADER_LINES) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut fields = trimmed.split('|');
        let path = parse_field::<u32>(fields.next());
        let row = parse_field::<u32>(fields.next());
        let zone = parse_field::<Zone>(fields.next());
        match (path, row, zone, fields.next()) {
            (Some(path), Some(row), Some(zone), None) => entries.push(ConversionEntry {
                path_row: PathRow { path, row },
                zone,
            }),
            _ => {
                return Err(TableError::MalformedRecord {
                    line: idx + 1,
                    content: line.to_string(),
                });
            }
        }
    }
    Ok(entries)
}

/// Parse a headerless `path,row` CSV override list
pub fn parse_overrides<R: std::io::Read>(reader: R) -> Result<Vec<PathRow>, TableError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut pairs = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let path = parse_field::<u32>(record.get(0));
        let row = parse_field::<u32>(record.get(1));
        match (path, row, record.len()) {
            (Some(path), Some(row), 2) => pairs.push(PathRow { path, row }),
            _ => {
                return Err(TableError::MalformedRecord {
                    line: idx + 1,
                    content: record.iter().collect::<Vec<_>>().join(","),
                });
            }
        }
    }
    Ok(pairs)
}

/// Handle on a persisted conversion table
#[derive(Debug, Clone)]
pub struct ConversionTable {
    path: PathBuf,
}

impl ConversionTable {
    /// Build (or extend) the table at `db` from a loader file and optional overrides.
    /// Existing rows for the same (path, row) are replaced; overrides are applied last.
    pub fn build<P: AsRef<Path>>(
        db: P,
        loader: &Path,
        overrides: Option<&Path>,
    ) -> Result<BuildReport, TableError> {
        let entries = parse_loader(&fs::read_to_string(loader)?)?;
        let polar = match overrides {
            Some(p) => parse_overrides(fs::File::open(p)?)?,
            None => Vec::new(),
        };

        let mut conn = Connection::open(db.as_ref())?;
        conn.execute(CREATE_CONVERSION_TABLE, [])?;

        let tx = conn.transaction()?;
        {
            let mut delete = tx.prepare(DELETE_ZONE)?;
            let mut upsert = tx.prepare(UPSERT_ZONE)?;
            let mut write = |pr: PathRow, zone: String| -> Result<(), TableError> {
                delete.execute(params![pr.path, pr.row])?;
                upsert.execute(params![pr.path, pr.row, zone])?;
                Ok(())
            };
            for entry in &entries {
                write(entry.path_row, entry.zone.to_string())?;
            }
            for pr in &polar {
                write(*pr, POLAR_ZONE_MARKER.to_string())?;
            }
        }
        tx.commit()?;

        info!(
            "Built conversion table {:?}: {} records, {} polar overrides",
            db.as_ref(),
            entries.len(),
            polar.len()
        );
        Ok(BuildReport {
            records: entries.len(),
            overrides: polar.len(),
        })
    }

    /// Refer to an existing table file; fails with `NotFound` if it is absent
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(TableError::NotFound(path));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Zone for a (path, row), or `None` when no row matches
    pub fn lookup_zone(&self, path_row: PathRow) -> Result<Option<Zone>, TableError> {
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let raw: Option<String> = conn
            .query_row(SELECT_ZONE, params![path_row.path, path_row.row], |row| {
                row.get::<_, rusqlite::types::Value>(0)
            })
            .optional()?
            .map(|value| match value {
                rusqlite::types::Value::Integer(i) => i.to_string(),
                rusqlite::types::Value::Text(s) => s,
                other => format!("{:?}", other),
            });
        conn.close().map_err(|(_, e)| e)?;

        debug!("Zone lookup for {}: {:?}", path_row, raw);
        raw.map(|z| z.parse::<Zone>().map_err(|_| TableError::InvalidZone(z)))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(records: &[&str]) -> String {
        let mut s = String::new();
        for i in 0..LOADER_HEADER_LINES {
            s.push_str(&format!("header line {}\n", i));
        }
        for r in records {
            s.push_str(r);
            s.push('\n');
        }
        s
    }

    #[test]
    fn loader_skips_header_and_blank_lines() {
        let entries = parse_loader(&loader(&["1|1|31", "", " 41 | 36 | 12 "])).unwrap();
        assert_eq!(
            entries,
            vec![
                ConversionEntry {
                    path_row: PathRow { path: 1, row: 1 },
                    zone: Zone::Utm(31),
                },
                ConversionEntry {
                    path_row: PathRow { path: 41, row: 36 },
                    zone: Zone::Utm(12),
                },
            ]
        );
    }

    #[test]
    fn loader_header_is_never_parsed() {
        // header text would be malformed as a record
        assert!(parse_loader(&loader(&[])).unwrap().is_empty());
    }

    #[test]
    fn loader_rejects_malformed_records() {
        let err = parse_loader(&loader(&["1|1|31", "2|x|31"])).unwrap_err();
        match err {
            TableError::MalformedRecord { line, .. } => assert_eq!(line, 13),
            other => panic!("unexpected error: {other}"),
        }
        assert!(parse_loader(&loader(&["1|1"])).is_err());
        assert!(parse_loader(&loader(&["1|1|31|9"])).is_err());
    }

    #[test]
    fn overrides_parse_pairs() {
        let pairs = parse_overrides("10,120\n 11 , 121\n\n".as_bytes()).unwrap();
        assert_eq!(
            pairs,
            vec![PathRow { path: 10, row: 120 }, PathRow { path: 11, row: 121 }]
        );
        assert!(parse_overrides("10\n".as_bytes()).is_err());
        assert!(parse_overrides("a,b\n".as_bytes()).is_err());
    }

    #[test]
    fn open_missing_table_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConversionTable::open(dir.path().join("missing.db")).unwrap_err();
        assert!(matches!(err, TableError::NotFound(_)));
    }

    #[test]
    fn build_then_lookup_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let ldr = dir.path().join("PATH_ROW_TO_UTM_ZONE.ldr");
        let csv = dir.path().join("polar.csv");
        let db = dir.path().join("conversion-table.db");
        fs::write(&ldr, loader(&["41|36|12", "100|120|45", "100|121|45"])).unwrap();
        fs::write(&csv, "100,120\n").unwrap();

        let report = ConversionTable::build(&db, &ldr, Some(&csv)).unwrap();
        assert_eq!(report, BuildReport { records: 3, overrides: 1 });

        let table = ConversionTable::open(&db).unwrap();
        assert_eq!(
            table.lookup_zone(PathRow { path: 41, row: 36 }).unwrap(),
            Some(Zone::Utm(12))
        );
        assert_eq!(
            table.lookup_zone(PathRow { path: 100, row: 120 }).unwrap(),
            Some(Zone::PolarStereographic)
        );
        assert_eq!(
            table.lookup_zone(PathRow { path: 100, row: 121 }).unwrap(),
            Some(Zone::Utm(45))
        );
        assert_eq!(table.lookup_zone(PathRow { path: 1, row: 1 }).unwrap(), None);
    }

    #[test]
    fn rebuild_overwrites_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let ldr = dir.path().join("a.ldr");
        let db = dir.path().join("t.db");
        fs::write(&ldr, loader(&["41|36|12"])).unwrap();
        ConversionTable::build(&db, &ldr, None).unwrap();
        fs::write(&ldr, loader(&["41|36|13"])).unwrap();
        ConversionTable::build(&db, &ldr, None).unwrap();

        let table = ConversionTable::open(&db).unwrap();
        assert_eq!(
            table.lookup_zone(PathRow { path: 41, row: 36 }).unwrap(),
            Some(Zone::Utm(13))
        );
    }

    #[test]
    fn integer_zone_column_is_accepted() {
        // tables created by older loaders declared zone as int
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("legacy.db");
        let conn = Connection::open(&db).unwrap();
        conn.execute("CREATE TABLE conversion (path int, row int, zone int)", [])
            .unwrap();
        conn.execute("INSERT INTO conversion VALUES (41, 36, 12)", [])
            .unwrap();
        conn.execute("INSERT INTO conversion VALUES (50, 50, 3031)", [])
            .unwrap();
        drop(conn);

        let table = ConversionTable::open(&db).unwrap();
        assert_eq!(
            table.lookup_zone(PathRow { path: 41, row: 36 }).unwrap(),
            Some(Zone::Utm(12))
        );
        assert_eq!(
            table.lookup_zone(PathRow { path: 50, row: 50 }).unwrap(),
            Some(Zone::PolarStereographic)
        );
    }

    #[test]
    fn build_into_keyless_table_replaces_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("legacy.db");
        let conn = Connection::open(&db).unwrap();
        conn.execute_batch(
            "CREATE TABLE conversion (path int, row int, zone int);
             INSERT INTO conversion VALUES (100, 120, 45);
             INSERT INTO conversion VALUES (41, 36, 13);",
        )
        .unwrap();
        drop(conn);

        let ldr = dir.path().join("a.ldr");
        let csv = dir.path().join("polar.csv");
        fs::write(&ldr, loader(&["41|36|12", "100|120|45"])).unwrap();
        fs::write(&csv, "100,120\n").unwrap();
        ConversionTable::build(&db, &ldr, Some(&csv)).unwrap();

        let table = ConversionTable::open(&db).unwrap();
        assert_eq!(
            table.lookup_zone(PathRow { path: 100, row: 120 }).unwrap(),
            Some(Zone::PolarStereographic)
        );
        assert_eq!(
            table.lookup_zone(PathRow { path: 41, row: 36 }).unwrap(),
            Some(Zone::Utm(12))
        );
        let conn = Connection::open(&db).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM conversion", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 2);
    }
}
