//! Landsat scene identifier parsing.
//!
//! Only the fixed byte ranges `[3, 6)` (path) and `[6, 9)` (row) of a scene id
//! are interpreted, e.g. `LC80410362014100LGN00` -> path 41, row 36.
use thiserror::Error;

use crate::types::PathRow;

const PATH_RANGE: std::ops::Range<usize> = 3..6;
const ROW_RANGE: std::ops::Range<usize> = 6..9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneIdError {
    #[error("Scene id {0:?} is shorter than 9 characters")]
    TooShort(String),
    #[error("Scene id {id:?} has non-digit {field} field")]
    NotDigits { id: String, field: &'static str },
}

fn digits(id: &str, range: std::ops::Range<usize>, field: &'static str) -> Result<u32, SceneIdError> {
    let bytes = &id.as_bytes()[range];
    if !bytes.iter().all(u8::is_ascii_digit) {
        return Err(SceneIdError::NotDigits {
            id: id.to_string(),
            field,
        });
    }
    Ok(bytes
        .iter()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0')))
}

/// Extract the WRS path and row from a scene id
pub fn parse_path_row(scene_id: &str) -> Result<PathRow, SceneIdError> {
    if scene_id.len() < ROW_RANGE.end {
        return Err(SceneIdError::TooShort(scene_id.to_string()));
    }
    let path = digits(scene_id, PATH_RANGE, "path")?;
    let row = digits(scene_id, ROW_RANGE, "row")?;
    Ok(PathRow { path, row })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_landsat_scene_ids() {
        assert_eq!(
            parse_path_row("LC80410362014100LGN00").unwrap(),
            PathRow { path: 41, row: 36 }
        );
        assert_eq!(
            parse_path_row("LE71232012003256EDC00").unwrap(),
            PathRow { path: 123, row: 201 }
        );
        // exactly nine characters is enough
        assert_eq!(
            parse_path_row("LT5001002").unwrap(),
            PathRow { path: 1, row: 2 }
        );
    }

    #[test]
    fn rejects_short_ids() {
        assert_eq!(
            parse_path_row("LC804103"),
            Err(SceneIdError::TooShort("LC804103".to_string()))
        );
        assert!(parse_path_row("").is_err());
    }

    #[test]
    fn rejects_non_digit_fields() {
        assert!(matches!(
            parse_path_row("LC8-41036XXXX"),
            Err(SceneIdError::NotDigits { field: "path", .. })
        ));
        assert!(matches!(
            parse_path_row("LC8041 36XXXX"),
            Err(SceneIdError::NotDigits { field: "row", .. })
        ));
        assert!(matches!(
            parse_path_row("not-a-scene-id"),
            Err(SceneIdError::NotDigits { .. })
        ));
    }

    #[test]
    fn multibyte_prefix_does_not_panic() {
        // 'é' is two bytes, the digit windows land on non-digit bytes
        assert!(parse_path_row("éé041036xx").is_err());
    }
}
