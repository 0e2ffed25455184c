use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::ImportMode;

/// Validator settings, loadable from a JSON config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// SQLite conversion table; None disables the scene cross-check
    pub conversion_table: Option<PathBuf>,
    pub import_mode: ImportMode,
}

impl ValidatorConfig {
    pub fn with_conversion_table<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.conversion_table = Some(path.into());
        self
    }

    pub fn with_import_mode(mut self, mode: ImportMode) -> Self {
        self.import_mode = mode;
        self
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: ValidatorConfig =
            serde_json::from_str(r#"{"conversion_table": "/data/conversion-table.db"}"#).unwrap();
        assert_eq!(
            cfg.conversion_table.as_deref(),
            Some(Path::new("/data/conversion-table.db"))
        );
        assert_eq!(cfg.import_mode, ImportMode::Lenient);
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crscheck.json");
        std::fs::write(&path, r#"{"import_mode": "strict"}"#).unwrap();
        let cfg = ValidatorConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg, ValidatorConfig::default().with_import_mode(ImportMode::Strict));
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let err = ValidatorConfig::from_json_file("/nonexistent/crscheck.json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
