//! Date command implementations

use clap::Subcommand;
use std::process::ExitCode;

use crate::assertions::{AssertionError, DateAssertions};
use crate::config::{CliOverrides, PagecheckConfig};
use crate::datetime::{self, TimeUnit};

use super::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Subcommand, Debug, Clone)]
pub enum DateAction {
    /// Reformat a date from one pattern to another
    Convert {
        value: String,

        /// Pattern the value is written in
        #[arg(long)]
        from: String,

        /// Pattern to render
        #[arg(long)]
        to: String,
    },

    /// Check that a date is valid for a pattern (strict unless --lenient)
    Valid {
        value: String,

        #[arg(short, long)]
        format: Option<String>,

        /// Accept out-of-range fields by rolling them over
        #[arg(long)]
        lenient: bool,
    },

    /// Check that two dates denote the same moment
    Same {
        first: String,
        second: String,

        #[arg(short, long)]
        format: Option<String>,
    },

    /// Check that a date lies within a window around today
    Range {
        value: String,

        #[arg(short, long)]
        format: Option<String>,

        /// Days before today that still count
        #[arg(long, allow_negative_numbers = true)]
        before: i64,

        /// Days after today that still count
        #[arg(long, allow_negative_numbers = true)]
        after: i64,
    },

    /// Shift a date and print it in the same pattern
    Adjust {
        value: String,

        #[arg(short, long)]
        format: Option<String>,

        /// Amount to add (negative to subtract)
        #[arg(long, allow_negative_numbers = true)]
        amount: i64,

        /// Unit: ms, s, m, h, d, w, M, y or their long names
        #[arg(long, default_value = "day")]
        unit: TimeUnit,
    },

    /// Print today's date, optionally shifted by a number of days
    Today {
        #[arg(short, long)]
        format: Option<String>,

        /// Days to add (negative for the past)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset_days: i64,
    },

    /// Check that a date is before today
    Before {
        value: String,

        #[arg(short, long)]
        format: Option<String>,

        /// Only count dates at most this many days back
        #[arg(long)]
        window_days: Option<i64>,
    },

    /// Check that a date is after today
    After {
        value: String,

        #[arg(short, long)]
        format: Option<String>,

        /// Only count dates at most this many days ahead
        #[arg(long)]
        window_days: Option<i64>,
    },
}

impl DateAction {
    /// Config overrides carried by this command's flags.
    pub fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides::default();
        match self {
            DateAction::Convert { .. } => {}
            DateAction::Valid { format, lenient, .. } => {
                overrides.date_format = format.clone();
                overrides.strict = lenient.then_some(false);
            }
            DateAction::Same { format, .. }
            | DateAction::Range { format, .. }
            | DateAction::Adjust { format, .. }
            | DateAction::Today { format, .. } => {
                overrides.date_format = format.clone();
            }
            DateAction::Before { format, window_days, .. } | DateAction::After { format, window_days, .. } => {
                overrides.date_format = format.clone();
                overrides.legacy_window_days = *window_days;
            }
        }
        overrides
    }
}

pub fn run_date(action: DateAction, config: &PagecheckConfig) -> ExitCode {
    let format = config.dates.format.as_str();
    let assertions = DateAssertions::today().with_settings(config.dates.clone());

    match action {
        DateAction::Convert { value, from, to } => match datetime::convert_format(&value, &from, &to) {
            Ok(converted) => {
                println!("{}", converted);
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        },
        DateAction::Valid { value, .. } => report(assertions.validate_date_is_valid(&value, format), "valid"),
        DateAction::Same { first, second, .. } => {
            report(assertions.validate_two_dates_match(&first, &second, format), "same")
        }
        DateAction::Range { value, before, after, .. } => {
            report(assertions.validate_date_within_range(&value, format, before, after), "in range")
        }
        DateAction::Adjust { value, amount, unit, .. } => match datetime::adjust_date(&value, format, amount, unit) {
            Ok(adjusted) => {
                println!("{}", adjusted);
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        },
        DateAction::Today { offset_days, .. } => {
            if offset_days == 0 {
                println!("{}", datetime::current_date(format));
            } else {
                println!("{}", datetime::add_days_to_current_date(offset_days, format));
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        DateAction::Before { value, .. } => report(assertions.validate_date_is_before_today(&value, format), "before"),
        DateAction::After { value, .. } => report(assertions.validate_date_is_after_today(&value, format), "after"),
    }
}

fn report(result: Result<(), AssertionError>, label: &str) -> ExitCode {
    match result {
        Ok(()) => {
            println!("{}", label);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            println!("fail: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
