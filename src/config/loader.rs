//! Configuration loading and discovery for `pagecheck.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{OutputFormat, PagecheckConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "pagecheck.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse pagecheck.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the default date pattern
    pub date_format: Option<String>,
    /// Override strict date validation
    pub strict: Option<bool>,
    /// Override the before/after window
    pub legacy_window_days: Option<i64>,
    /// Override fail-fast checking
    pub fail_fast: Option<bool>,
    /// Override report format
    pub output: Option<OutputFormat>,
}

/// Find pagecheck.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for pagecheck.toml
/// 2. Check XDG_CONFIG_HOME/pagecheck/pagecheck.toml (or ~/.config/pagecheck/pagecheck.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find pagecheck.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("pagecheck").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find pagecheck.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a pagecheck.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses [`find_config`]
/// to locate one. If no config file is found, returns the default configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("e2e/pagecheck.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<PagecheckConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(PagecheckConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<PagecheckConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: PagecheckConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut PagecheckConfig, overrides: &CliOverrides) {
    if let Some(ref format) = overrides.date_format {
        config.dates.format = format.clone();
    }

    if let Some(strict) = overrides.strict {
        config.dates.strict = strict;
    }

    if let Some(days) = overrides.legacy_window_days {
        config.dates.legacy_window_days = Some(days);
    }

    if let Some(fail_fast) = overrides.fail_fast {
        config.check.fail_fast = fail_fast;
    }

    if let Some(output) = overrides.output {
        config.check.output = output;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &[u8]) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents)
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"[dates]\nformat = \"YYYY\"");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"");

        let subdir = temp.path().join("tests").join("e2e");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, None);
    }

    #[test]
    #[serial]
    fn test_find_xdg_config() {
        let temp = TempDir::new().expect("should create temp dir");
        let dir = temp.path().join("pagecheck");
        fs::create_dir_all(&dir).expect("should create xdg dir");
        let config_path = write_config(&dir, b"");

        let previous = env::var_os("XDG_CONFIG_HOME");
        env::set_var("XDG_CONFIG_HOME", temp.path());
        let found = find_xdg_config();
        match previous {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }

        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            br#"
[dates]
format = "DD.MM.YYYY"
legacy_window_days = 30

[check]
fail_fast = true
"#,
        );

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.dates.format, "DD.MM.YYYY");
        assert_eq!(config.dates.legacy_window_days, Some(30));
        assert!(config.check.fail_fast);
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("nonexistent.toml");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"this is not valid toml {{{");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            br#"
[dates]
format = ""
legacy_window_days = -5
"#,
        );

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides_format() {
        let mut config = PagecheckConfig::default();
        let overrides =
            CliOverrides { date_format: Some("YYYY-MM-DD".to_string()), ..Default::default() };

        merge_cli_overrides(&mut config, &overrides);
        assert_eq!(config.dates.format, "YYYY-MM-DD");
    }

    #[test]
    fn test_merge_cli_overrides_multiple() {
        let mut config = PagecheckConfig::default();
        let overrides = CliOverrides {
            strict: Some(false),
            legacy_window_days: Some(3650),
            fail_fast: Some(true),
            output: Some(OutputFormat::Json),
            ..Default::default()
        };

        merge_cli_overrides(&mut config, &overrides);
        assert!(!config.dates.strict);
        assert_eq!(config.dates.legacy_window_days, Some(3650));
        assert!(config.check.fail_fast);
        assert_eq!(config.check.output, OutputFormat::Json);
        assert_eq!(config.dates.format, "MM/DD/YYYY");
    }

    #[test]
    fn test_merge_empty_overrides_is_noop() {
        let mut config = PagecheckConfig::default();
        merge_cli_overrides(&mut config, &CliOverrides::default());
        assert_eq!(config, PagecheckConfig::default());
    }
}
