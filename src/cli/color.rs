//! Color command implementations (normalize, compare, names)

use clap::Subcommand;
use std::process::ExitCode;

use crate::assertions::{expect_color, ColorTarget};
use crate::color::{self, NormalizedColor};

use super::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Subcommand, Debug, Clone)]
pub enum ColorAction {
    /// Print the normalized form of a color
    Normalize {
        /// Color name, #hex, or rgb(r, g, b)
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare an observed color against an expected one (exit 1 on mismatch)
    Compare {
        /// Observed value, usually a computed style
        actual: String,

        /// Expected name, #hex, or rgb(r, g, b)
        expected: String,

        /// Style property the observed value came from
        #[arg(long, value_enum, default_value_t = ColorTarget::Text)]
        target: ColorTarget,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in color names
    Names,
}

pub fn run_color(action: ColorAction) -> ExitCode {
    match action {
        ColorAction::Normalize { value, json } => run_normalize(&value, json),
        ColorAction::Compare { actual, expected, target, json } => {
            run_compare(&actual, &expected, target, json)
        }
        ColorAction::Names => {
            for (name, value) in color::named_colors() {
                println!("{:<14} {}", name, value);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
    }
}

fn run_normalize(value: &str, json: bool) -> ExitCode {
    let normalized = color::normalize(value);

    if json {
        let body = match normalized {
            NormalizedColor::Resolved(rgb) => serde_json::json!({
                "input": value,
                "resolved": true,
                "rgb": rgb.to_string(),
                "r": rgb.r,
                "g": rgb.g,
                "b": rgb.b,
            }),
            NormalizedColor::Unresolved(ref text) => serde_json::json!({
                "input": value,
                "resolved": false,
                "rgb": text,
            }),
        };
        println!("{}", body);
    } else {
        println!("{}", normalized);
        if !normalized.is_resolved() {
            eprintln!("Warning: '{}' is not a recognized color", value.trim());
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

fn run_compare(actual: &str, expected: &str, target: ColorTarget, json: bool) -> ExitCode {
    let result = expect_color(target, actual, expected);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "actual": color::rgb_string(actual),
                "expected": color::rgb_string(expected),
                "matches": result.is_ok(),
            })
        );
    } else {
        match &result {
            Ok(()) => println!("match"),
            Err(e) => println!("mismatch: {}", e),
        }
    }

    if result.is_ok() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}
