//! pagecheck - Command-line tool for checking colors and dates scraped from web UIs

use std::process::ExitCode;

use pagecheck::cli;

fn main() -> ExitCode {
    cli::run()
}
