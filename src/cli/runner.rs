use tracing::info;
use tracing_subscriber::EnvFilter;

use crscheck::api::{build_conversion_table, validate_input, validate_scene_lists};
use crscheck::{CrossCheck, ImportMode, ValidationResult, ValidatorConfig};

use super::args::{CliArgs, Command, CrsArgs};
use super::errors::AppError;

fn init_logging(debug: bool) -> Result<(), AppError> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| {
            EnvFilter::try_new("warn").map_err(|e| AppError::LogFilter(e.to_string()))
        })?
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Config file values, overridden by command-line flags
fn load_config(args_config: Option<&std::path::Path>, crs: &CrsArgs) -> Result<ValidatorConfig, AppError> {
    let mut config = match args_config {
        Some(path) => ValidatorConfig::from_json_file(path)?,
        None => ValidatorConfig::default(),
    };
    if let Some(table) = &crs.table {
        config.conversion_table = Some(table.clone());
    }
    if crs.strict {
        config.import_mode = ImportMode::Strict;
    }
    Ok(config)
}

fn print_result(result: &ValidationResult) {
    println!(
        "{}: {} ({})",
        if result.valid { "valid" } else { "invalid" },
        result.error_message,
        result.error_code.code()
    );
    match &result.cross_check {
        CrossCheck::NotRequested => {}
        CrossCheck::Skipped { reason } => println!("scene check skipped: {}", reason),
        CrossCheck::Passed { path_row, zone } => {
            println!("scene check passed: path/row {} zone {}", path_row, zone)
        }
        CrossCheck::Failed {
            path_row, reason, ..
        } => println!("scene check failed for path/row {}: {}", path_row, reason),
    }
}

/// Run the parsed command; `Ok(false)` means the checked CRS was invalid
pub fn run(args: CliArgs) -> Result<bool, Box<dyn std::error::Error>> {
    init_logging(args.log)?;

    match args.command {
        Command::Validate {
            crs,
            scene_id,
            json,
        } => {
            let input = crs.input();
            let config = load_config(args.config.as_deref(), &crs)?;
            info!("Validating {} definition", input.kind());

            let result =
                validate_input(&input, scene_id.as_deref(), &config).map_err(AppError::from)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
            Ok(result.valid)
        }
        Command::Batch {
            crs,
            scene_lists,
            continue_on_error,
        } => {
            let input = crs.input();
            let config = load_config(args.config.as_deref(), &crs)?;
            info!("Starting batch validation from directory: {:?}", scene_lists);

            let report = validate_scene_lists(&input, &scene_lists, &config, continue_on_error)
                .map_err(AppError::from)?;
            for outcome in &report.outcomes {
                println!(
                    "{} {}",
                    outcome.scene_id,
                    if outcome.valid { "good" } else { "bad" }
                );
            }
            println!(
                "checked={} valid={} invalid={} errors={} elapsed={:.3}s",
                report.checked,
                report.valid,
                report.invalid,
                report.errors,
                report.elapsed.as_secs_f64()
            );
            Ok(report.invalid == 0 && report.errors == 0)
        }
        Command::BuildTable {
            ldr,
            polar_overrides,
            output,
        } => {
            let report = build_conversion_table(&output, &ldr, polar_overrides.as_deref())
                .map_err(AppError::from)?;
            println!(
                "Wrote {:?}: {} records, {} polar overrides",
                output, report.records, report.overrides
            );
            Ok(true)
        }
    }
}
