//! Command-line interface for evaluating candidate EIH sites.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod evaluate;
mod fs;

pub use error::CliError;
use evaluate::{EvaluateArgs, run_evaluate};

pub(crate) const ARG_ADDRESS: &str = "address";
pub(crate) const ARG_REFERENCE: &str = "reference";
pub(crate) const ARG_FACILITY_TYPE: &str = "facility-type";
pub(crate) const ARG_SIZE_SQM: &str = "size-sqm";
pub(crate) const ARG_RADIUS_KM: &str = "radius-km";
pub(crate) const ARG_NOMINATIM_URL: &str = "nominatim-url";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ENV_ADDRESS: &str = "PLACEWELL_CMDS_EVALUATE_ADDRESS";
pub(crate) const ENV_REFERENCE: &str = "PLACEWELL_CMDS_EVALUATE_REFERENCE";

/// Run the PlaceWell CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] describing the first failure encountered.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse()?;
    match cli.command {
        Command::Evaluate(args) => run_evaluate(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "placewell",
    about = "Evaluate candidate sites for Emergency Interim Housing",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score, assess and classify a single site address.
    Evaluate(EvaluateArgs),
}

#[cfg(test)]
mod tests;
