//! Configuration schema types for `pagecheck.toml`
//!
//! Defines the structure and validation rules for pagecheck configuration.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::datetime::{DateFormats, ParseMode};

/// Report format for command output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

/// Date handling section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatesConfig {
    /// Pattern used when a command or check case gives none
    #[serde(default = "default_date_format")]
    pub format: String,
    /// Parse mode for `date valid`
    #[serde(default = "default_strict")]
    pub strict: bool,
    /// When set, "before today" / "after today" checks use a window of this many days
    /// instead of an unbounded comparison
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_window_days: Option<i64>,
}

impl Default for DatesConfig {
    fn default() -> Self {
        Self { format: default_date_format(), strict: default_strict(), legacy_window_days: None }
    }
}

impl DatesConfig {
    pub fn parse_mode(&self) -> ParseMode {
        ParseMode::from(self.strict)
    }
}

fn default_date_format() -> String {
    DateFormats::FULL_DATE.to_string()
}

fn default_strict() -> bool {
    true
}

/// Batch checker section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CheckConfig {
    /// Stop evaluating a file at its first failing case
    #[serde(default)]
    pub fail_fast: bool,
    /// Default report format
    #[serde(default)]
    pub output: OutputFormat,
}

/// Complete pagecheck.toml configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PagecheckConfig {
    /// Date settings
    #[serde(default)]
    pub dates: DatesConfig,
    /// Batch checker settings
    #[serde(default)]
    pub check: CheckConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "dates.format")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pagecheck.toml: '{}' {}", self.field, self.message)
    }
}

impl PagecheckConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.dates.format.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "dates.format".to_string(),
                message: "must be a non-empty pattern".to_string(),
            });
        }

        if let Some(days) = self.dates.legacy_window_days {
            if days <= 0 {
                errors.push(ConfigValidationError {
                    field: "dates.legacy_window_days".to_string(),
                    message: format!("must be positive, got {}", days),
                });
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: PagecheckConfig = toml::from_str("").unwrap();
        assert_eq!(config, PagecheckConfig::default());
        assert_eq!(config.dates.format, "MM/DD/YYYY");
        assert!(config.dates.strict);
        assert_eq!(config.dates.legacy_window_days, None);
        assert!(!config.check.fail_fast);
        assert_eq!(config.check.output, OutputFormat::Text);
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[dates]
format = "YYYY-MM-DD"
strict = false
legacy_window_days = 3650

[check]
fail_fast = true
output = "json"
"#;
        let config: PagecheckConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.dates.format, "YYYY-MM-DD");
        assert!(!config.dates.strict);
        assert_eq!(config.dates.parse_mode(), ParseMode::Lenient);
        assert_eq!(config.dates.legacy_window_days, Some(3650));
        assert!(config.check.fail_fast);
        assert_eq!(config.check.output, OutputFormat::Json);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_unknown_output_format_fails() {
        let toml = r#"
[check]
output = "xml"
"#;
        assert!(toml::from_str::<PagecheckConfig>(toml).is_err());
    }

    #[test]
    fn test_validation_empty_format() {
        let toml = r#"
[dates]
format = "  "
"#;
        let config: PagecheckConfig = toml::from_str(toml).unwrap();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "dates.format");
    }

    #[test]
    fn test_validation_window_must_be_positive() {
        let toml = r#"
[dates]
legacy_window_days = 0
"#;
        let config: PagecheckConfig = toml::from_str(toml).unwrap();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("legacy_window_days"));
    }
}
