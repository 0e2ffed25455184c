use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

use crscheck::CrsInput;

#[derive(Parser)]
#[command(name = "crscheck", version, about = "Validate CRS definitions with GDAL")]
pub struct CliArgs {
    /// Enable debug logging (otherwise RUST_LOG, default warn)
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    /// JSON config file (conversion_table, import_mode)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a single CRS definition
    Validate {
        #[command(flatten)]
        crs: CrsArgs,

        /// Landsat scene id to cross-check the CRS against
        #[arg(short, long)]
        scene_id: Option<String>,

        /// Print the full result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Validate one CRS against every scene id in a directory of scene lists
    Batch {
        #[command(flatten)]
        crs: CrsArgs,

        /// Directory of files holding one scene id per line
        #[arg(long)]
        scene_lists: PathBuf,

        /// Keep going after strict-mode import errors
        #[arg(long, default_value_t = false)]
        continue_on_error: bool,
    },

    /// Build the path/row conversion table from LPGS reference files
    BuildTable {
        /// PATH_ROW_TO_UTM_ZONE loader file (11 header lines, path|row|zone records)
        #[arg(long)]
        ldr: PathBuf,

        /// CSV of path,row pairs forced to polar stereographic (EPSG:3031)
        #[arg(long)]
        polar_overrides: Option<PathBuf>,

        /// Output SQLite database
        #[arg(short, long, default_value = "conversion-table.db")]
        output: PathBuf,
    },
}

/// The declared CRS plus validator options shared by `validate` and `batch`
#[derive(Args)]
#[command(group(ArgGroup::new("crs").required(true).args(["wkt", "proj4", "epsg"])))]
pub struct CrsArgs {
    /// Well-known text definition
    #[arg(long)]
    pub wkt: Option<String>,

    /// PROJ.4 definition (e.g. "+proj=longlat +datum=WGS84 +no_defs")
    #[arg(long, allow_hyphen_values = true)]
    pub proj4: Option<String>,

    /// EPSG code (e.g. 4326)
    #[arg(long)]
    pub epsg: Option<u32>,

    /// Conversion table used for the scene cross-check (overrides config)
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Fail instead of reporting invalid when the definition cannot be imported
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

impl CrsArgs {
    pub fn input(&self) -> CrsInput {
        match (&self.wkt, &self.proj4, self.epsg) {
            (Some(wkt), _, _) => CrsInput::Wkt(wkt.clone()),
            (None, Some(proj4), _) => CrsInput::Proj4(proj4.clone()),
            (None, None, Some(code)) => CrsInput::Epsg(code),
            (None, None, None) => unreachable!("the crs argument group is required"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crs_of(args: &[&str]) -> CrsInput {
        match CliArgs::try_parse_from(args.iter().copied()).unwrap().command {
            Command::Validate { crs, .. } | Command::Batch { crs, .. } => crs.input(),
            Command::BuildTable { .. } => panic!("expected a CRS command"),
        }
    }

    #[test]
    fn exactly_one_crs_flag_is_required() {
        assert!(CliArgs::try_parse_from(["crscheck", "validate"]).is_err());
        assert!(
            CliArgs::try_parse_from(["crscheck", "validate", "--epsg", "4326", "--wkt", "X"])
                .is_err()
        );
    }

    #[test]
    fn crs_flag_selects_input_kind() {
        assert_eq!(
            crs_of(&["crscheck", "validate", "--epsg", "4326"]),
            CrsInput::Epsg(4326)
        );
        assert_eq!(
            crs_of(&["crscheck", "validate", "--proj4", "+proj=longlat +datum=WGS84"]),
            CrsInput::Proj4("+proj=longlat +datum=WGS84".to_string())
        );
        assert_eq!(
            crs_of(&["crscheck", "batch", "--wkt", "GEOGCS[]", "--scene-lists", "lists"]),
            CrsInput::Wkt("GEOGCS[]".to_string())
        );
    }
}
