//! Check command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::check::{collect_files, CheckReport, Checker};
use crate::config::{OutputFormat, PagecheckConfig};
use crate::datetime::DateValue;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the check command
pub fn run_check(files: &[PathBuf], dir: Option<&Path>, config: &PagecheckConfig) -> ExitCode {
    let file_list = match collect_files(files, dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if file_list.is_empty() {
        eprintln!("Error: No files to check");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let checker = Checker::new(config, DateValue::now());
    let report = match checker.check_files(&file_list) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match config.check.output {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => print_text(&report),
    }

    if report.is_success() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

fn print_text(report: &CheckReport) {
    for file in &report.files {
        for outcome in file.outcomes.iter().filter(|o| !o.passed) {
            println!(
                "{}:{}: FAIL [{}] {}",
                file.path.display(),
                outcome.line,
                outcome.kind,
                outcome.message.as_deref().unwrap_or("")
            );
        }
    }
    println!(
        "{} case(s) in {} file(s): {} passed, {} failed",
        report.total(),
        report.files.len(),
        report.passed(),
        report.failed()
    );
}

fn print_json(report: &CheckReport) {
    let body = serde_json::json!({
        "files": report.files,
        "total": report.total(),
        "passed": report.passed(),
        "failed": report.failed(),
    });
    match serde_json::to_string_pretty(&body) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}
