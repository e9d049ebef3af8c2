//! Fetches hh.ru job postings, filters them, and persists the result as JSON or CSV.

mod cli;
pub mod config;
pub mod error;
pub mod prompt;
pub mod telemetry;
pub mod workflows;

use error::AppError;

/// Entry point shared by the binary: parses arguments and runs the chosen command.
pub fn run() -> Result<(), AppError> {
    cli::run()
}
