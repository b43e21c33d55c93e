//! Batch checking of assertion cases from JSONL files
//!
//! Each non-blank line is one JSON object tagged by `kind`:
//!
//! ```text
//! {"kind": "color", "actual": "rgb(255, 0, 0)", "expected": "red"}
//! {"kind": "color", "target": "background", "actual": "rgb(0, 128, 0)", "expected": "#008000"}
//! {"kind": "date_format", "actual": "14-05-2025", "from": "DD-MM-YYYY", "to": "MM/DD/YYYY", "expected": "05/14/2025"}
//! {"kind": "date_range", "actual": "05/16/2025", "before": 2, "after": 3}
//! {"kind": "date_same", "first": "05/14/2025", "second": "05/14/2025"}
//! ```
//!
//! Lines starting with `//` are comments. Date cases without a `format` use the
//! configured default pattern.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assertions::{expect_color, AssertionError, ColorTarget, DateAssertions};
use crate::config::PagecheckConfig;
use crate::datetime::DateValue;

/// Error reading check files
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// One assertion case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckCase {
    Color {
        actual: String,
        expected: String,
        #[serde(default)]
        target: ColorTarget,
    },
    DateFormat {
        actual: String,
        from: String,
        to: String,
        expected: String,
    },
    DateRange {
        actual: String,
        #[serde(default)]
        format: Option<String>,
        before: i64,
        after: i64,
    },
    DateValid {
        actual: String,
        #[serde(default)]
        format: Option<String>,
    },
    DateToday {
        actual: String,
        #[serde(default)]
        format: Option<String>,
    },
    DateBefore {
        actual: String,
        #[serde(default)]
        format: Option<String>,
    },
    DateAfter {
        actual: String,
        #[serde(default)]
        format: Option<String>,
    },
    DateSame {
        first: String,
        second: String,
        #[serde(default)]
        format: Option<String>,
    },
    MonthDay {
        actual: String,
    },
}

impl CheckCase {
    pub fn kind(&self) -> &'static str {
        match self {
            CheckCase::Color { .. } => "color",
            CheckCase::DateFormat { .. } => "date_format",
            CheckCase::DateRange { .. } => "date_range",
            CheckCase::DateValid { .. } => "date_valid",
            CheckCase::DateToday { .. } => "date_today",
            CheckCase::DateBefore { .. } => "date_before",
            CheckCase::DateAfter { .. } => "date_after",
            CheckCase::DateSame { .. } => "date_same",
            CheckCase::MonthDay { .. } => "month_day",
        }
    }
}

/// Result of evaluating one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    /// Line number (1-indexed)
    pub line: usize,
    /// Case kind, or `invalid` for lines that did not parse
    pub kind: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcomes for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcomes: Vec<CheckOutcome>,
}

impl FileReport {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed).count()
    }
}

/// Outcomes for a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub files: Vec<FileReport>,
}

impl CheckReport {
    pub fn total(&self) -> usize {
        self.files.iter().map(|f| f.outcomes.len()).sum()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().map(FileReport::failed).sum()
    }

    pub fn passed(&self) -> usize {
        self.total() - self.failed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Evaluates check cases against a fixed "now".
#[derive(Debug, Clone)]
pub struct Checker {
    dates: DateAssertions,
    default_format: String,
    fail_fast: bool,
}

impl Checker {
    pub fn new(config: &PagecheckConfig, now: DateValue) -> Self {
        Self {
            dates: DateAssertions::at(now).with_settings(config.dates.clone()),
            default_format: config.dates.format.clone(),
            fail_fast: config.check.fail_fast,
        }
    }

    /// Evaluate a single case.
    pub fn evaluate(&self, case: &CheckCase) -> Result<(), AssertionError> {
        let fmt = |format: &Option<String>| format.clone().unwrap_or_else(|| self.default_format.clone());
        let dates = &self.dates;

        match case {
            CheckCase::Color { actual, expected, target } => expect_color(*target, actual, expected),
            CheckCase::DateFormat { actual, from, to, expected } => {
                dates.validate_date_format(actual, from, to, expected)
            }
            CheckCase::DateRange { actual, format, before, after } => {
                dates.validate_date_within_range(actual, &fmt(format), *before, *after)
            }
            CheckCase::DateValid { actual, format } => dates.validate_date_is_valid(actual, &fmt(format)),
            CheckCase::DateToday { actual, format } => dates.validate_date_is_today(actual, &fmt(format)),
            CheckCase::DateBefore { actual, format } => {
                dates.validate_date_is_before_today(actual, &fmt(format))
            }
            CheckCase::DateAfter { actual, format } => {
                dates.validate_date_is_after_today(actual, &fmt(format))
            }
            CheckCase::DateSame { first, second, format } => {
                dates.validate_two_dates_match(first, second, &fmt(format))
            }
            CheckCase::MonthDay { actual } => dates.validate_month_day_format(actual),
        }
    }

    /// Evaluate one JSONL line. Returns `None` for blank and comment lines.
    pub fn check_line(&self, line_number: usize, line: &str) -> Option<CheckOutcome> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            return None;
        }

        let outcome = match serde_json::from_str::<CheckCase>(trimmed) {
            Ok(case) => {
                let result = self.evaluate(&case);
                CheckOutcome {
                    line: line_number,
                    kind: case.kind().to_string(),
                    passed: result.is_ok(),
                    message: result.err().map(|e| e.to_string()),
                }
            }
            Err(e) => CheckOutcome {
                line: line_number,
                kind: "invalid".to_string(),
                passed: false,
                message: Some(e.to_string()),
            },
        };
        Some(outcome)
    }

    /// Evaluate every case in a JSONL document.
    pub fn check_str(&self, content: &str) -> Vec<CheckOutcome> {
        let mut outcomes = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if let Some(outcome) = self.check_line(idx + 1, line) {
                let failed = !outcome.passed;
                outcomes.push(outcome);
                if failed && self.fail_fast {
                    break;
                }
            }
        }
        outcomes
    }

    pub fn check_file(&self, path: &Path) -> Result<FileReport, CheckError> {
        let content = fs::read_to_string(path)
            .map_err(|source| CheckError::Io { path: path.to_path_buf(), source })?;
        let outcomes = self.check_str(&content);
        tracing::debug!(path = %path.display(), cases = outcomes.len(), "checked file");
        Ok(FileReport { path: path.to_path_buf(), outcomes })
    }

    /// Check files in parallel. Report order follows `paths`.
    pub fn check_files(&self, paths: &[PathBuf]) -> Result<CheckReport, CheckError> {
        let files = paths.par_iter().map(|p| self.check_file(p)).collect::<Result<Vec<_>, _>>()?;
        Ok(CheckReport { files })
    }
}

/// Resolve the files to check: explicit paths if given, otherwise every `.jsonl` under `dir`.
pub fn collect_files(files: &[PathBuf], dir: Option<&Path>) -> Result<Vec<PathBuf>, CheckError> {
    if !files.is_empty() {
        for path in files {
            if !path.exists() {
                return Err(CheckError::NotFound(path.clone()));
            }
        }
        return Ok(files.to_vec());
    }

    let mut result = Vec::new();
    if let Some(dir) = dir {
        if !dir.exists() {
            return Err(CheckError::NotFound(dir.to_path_buf()));
        }
        if !dir.is_dir() {
            return Err(CheckError::NotADirectory(dir.to_path_buf()));
        }
        let pattern = format!("{}/**/*.jsonl", Pattern::escape(&dir.to_string_lossy()));
        for entry in glob(&pattern)? {
            let path = entry.map_err(|e| CheckError::Io { path: e.path().to_path_buf(), source: e.into_error() })?;
            result.push(path);
        }
        result.sort();
    }
    Ok(result)
}
