//! crscheck CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, dispatch to
//! validation, batch or table-building, and exit with status 1 when the
//! checked CRS is invalid. For programmatic use, prefer the library API
//! (`crscheck::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    if !cli::run(args)? {
        std::process::exit(1);
    }
    Ok(())
}
