//! Command Line Interface (CLI) layer for crscheck.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for single validations, batch
//! scene-list runs and conversion-table builds. It wires user-provided options
//! to the library functionality exposed via `crscheck::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
