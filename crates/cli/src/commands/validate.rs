//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::SpinConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::CliError;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    interval_ms: u64,
    damping: f64,
    threshold: f64,
    tick_ms: u64,
    decay_delay_ms: u64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        Err(CliError::config_validation(result.error.unwrap_or_default()).into())
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    interval_ms: config.sampler.interval_ms,
                    damping: config.smoother.damping,
                    threshold: config.smoother.threshold,
                    tick_ms: config.smoother.tick_ms,
                    decay_delay_ms: config.smoother.decay_delay_ms,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &SpinConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let sampler = &config.sampler;
    let smoother = &config.smoother;

    if smoother.decay_delay_ms <= sampler.interval_ms {
        warnings.push(format!(
            "smoother.decay_delay_ms ({}) <= sampler.interval_ms ({}) - speed starts decaying between samples",
            smoother.decay_delay_ms, sampler.interval_ms
        ));
    }

    if smoother.tick_ms > smoother.decay_delay_ms {
        warnings.push(format!(
            "smoother.tick_ms ({}) > smoother.decay_delay_ms ({}) - speed updates lag behind decay",
            smoother.tick_ms, smoother.decay_delay_ms
        ));
    }

    if smoother.damping < 0.01 {
        warnings.push(format!(
            "smoother.damping ({}) is very small - speed converges slowly",
            smoother.damping
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Sample interval: {} ms", summary.interval_ms);
            println!("  Damping: {}", summary.damping);
            println!("  Threshold: {}", summary.threshold);
            println!("  Tick: {} ms", summary.tick_ms);
            println!("  Decay delay: {} ms", summary.decay_delay_ms);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_valid_config() {
        let file = config_file("[sampler]\ninterval_ms = 16\n");
        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        };

        let result = validate_config(&args);
        assert!(result.valid);
        assert_eq!(result.summary.unwrap().interval_ms, 16);
        assert!(result.warnings.is_none());
    }

    #[test]
    fn test_invalid_config() {
        let file = config_file("[smoother]\ndamping = 0.0\n");
        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: false,
        };

        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("smoother.damping"));
        assert!(run_validate(&args).is_err());
    }

    #[test]
    fn test_warnings() {
        let mut config = SpinConfig::default();
        config.smoother.decay_delay_ms = 10;
        config.smoother.tick_ms = 15;

        let warnings = collect_warnings(&config);
        assert_eq!(warnings.len(), 2);
        assert!(collect_warnings(&SpinConfig::default()).is_empty());
    }
}
