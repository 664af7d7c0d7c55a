//! Configuration validation system.

use super::error::{ConfigError, ConfigResult};
use super::types::HarnessConfig;
use tracing::warn;

/// A single validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// Error message.
    pub message: String,
    /// Severity level.
    pub severity: ValidationSeverity,
}

impl ValidationError {
    /// Create a new error.
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }

    /// Create a new warning.
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }
}

/// Severity of validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    /// Error - configuration is invalid.
    Error,
    /// Warning - configuration may have issues.
    Warning,
}

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty (valid) result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Check if the validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self
            .errors
            .iter()
            .any(|e| e.severity == ValidationSeverity::Error)
    }

    /// Get all validation issues.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get only errors (not warnings).
    #[must_use]
    pub fn errors_only(&self) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ValidationSeverity::Error)
            .collect()
    }

    /// Get only warnings.
    #[must_use]
    pub fn warnings(&self) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ValidationSeverity::Warning)
            .collect()
    }

    fn require_axis<T>(&mut self, field: &str, values: &[T], below_min: impl Fn(&T) -> bool) {
        if values.is_empty() {
            self.add_error(ValidationError::error(field, "axis cannot be empty"));
        } else if values.iter().any(below_min) {
            self.add_error(ValidationError::error(field, "values must be at least 1"));
        }
    }
}

/// Trait for configuration validators.
pub trait Validator: std::fmt::Debug + Send + Sync {
    /// Validate a configuration and return any errors.
    fn validate(&self, config: &HarnessConfig) -> ValidationResult;
}

/// Run `validators` over `config` in order.
///
/// Warnings are logged; only errors fail validation.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] listing every error found by
/// the first failing validator.
pub fn validate_with(config: &HarnessConfig, validators: &[&dyn Validator]) -> ConfigResult<()> {
    for validator in validators {
        let result = validator.validate(config);
        for warning in result.warnings() {
            warn!(field = %warning.field, "{}", warning.message);
        }
        if !result.is_valid() {
            let errors: Vec<String> = result
                .errors_only()
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            return Err(ConfigError::ValidationError(errors.join("; ")));
        }
    }
    Ok(())
}

/// Built-in validator enforcing the sweep data-model bounds.
#[derive(Debug, Default)]
pub struct BasicValidator;

impl BasicValidator {
    /// Create a new basic validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Validator for BasicValidator {
    fn validate(&self, config: &HarnessConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        if config.runner.timeout_secs == 0 {
            result.add_error(ValidationError::error(
                "runner.timeout_secs",
                "Timeout must be greater than 0",
            ));
        }

        // Counter sweep
        let counter = &config.counter;
        if counter.binary.is_empty() {
            result.add_error(ValidationError::error(
                "counter.binary",
                "Probe binary name cannot be empty",
            ));
        }
        result.require_axis("counter.threads", &counter.threads, |&t| t == 0);
        if counter.iters == 0 {
            result.add_error(ValidationError::error(
                "counter.iters",
                "Iterations must be at least 1",
            ));
        }
        if counter.reps == 0 {
            result.add_error(ValidationError::error(
                "counter.reps",
                "Repetitions must be at least 1",
            ));
        }

        // Pipeline sweep
        let pipeline = &config.pipeline;
        if pipeline.binary.is_empty() {
            result.add_error(ValidationError::error(
                "pipeline.binary",
                "Probe binary name cannot be empty",
            ));
        }
        result.require_axis("pipeline.messages", &pipeline.messages, |&m| m == 0);
        result.require_axis("pipeline.buffers", &pipeline.buffers, |&b| b == 0);
        if pipeline.pause_us.is_empty() {
            result.add_error(ValidationError::error(
                "pipeline.pause_us",
                "axis cannot be empty",
            ));
        }
        if pipeline.reps == 0 {
            result.add_error(ValidationError::error(
                "pipeline.reps",
                "Repetitions must be at least 1",
            ));
        }

        // A slice value off its axis renders an empty chart
        if let Some(messages) = pipeline.plot_messages {
            if !pipeline.messages.contains(&messages) {
                result.add_error(ValidationError::warning(
                    "pipeline.plot_messages",
                    format!("{messages} is not one of the swept message counts"),
                ));
            }
        }
        if let Some(pause) = pipeline.plot_pause_us {
            if !pipeline.pause_us.contains(&pause) {
                result.add_error(ValidationError::warning(
                    "pipeline.plot_pause_us",
                    format!("{pause} is not one of the swept pauses"),
                ));
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_validator_valid() {
        let config = HarnessConfig::default();
        let validator = BasicValidator::new();
        let result = validator.validate(&config);
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_zero_thread_count_rejected() {
        let mut config = HarnessConfig::default();
        config.counter.threads = vec![1, 0, 4];

        let result = BasicValidator::new().validate(&config);

        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].field, "counter.threads");
        assert!(result.errors()[0].message.contains("at least 1"));
    }

    #[test]
    fn test_empty_pipeline_axes_rejected() {
        let mut config = HarnessConfig::default();
        config.pipeline.buffers.clear();
        config.pipeline.pause_us.clear();

        let result = BasicValidator::new().validate(&config);

        let fields: Vec<&str> = result.errors_only().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["pipeline.buffers", "pipeline.pause_us"]);
    }

    #[test]
    fn test_zero_pause_allowed() {
        let mut config = HarnessConfig::default();
        config.pipeline.pause_us = vec![0];

        assert!(BasicValidator::new().validate(&config).is_valid());
    }

    #[test]
    fn test_zero_reps_and_timeout_rejected() {
        let mut config = HarnessConfig::default();
        config.counter.reps = 0;
        config.pipeline.reps = 0;
        config.runner.timeout_secs = 0;

        let result = BasicValidator::new().validate(&config);
        assert_eq!(result.errors_only().len(), 3);
    }

    #[test]
    fn test_off_axis_slice_is_warning() {
        let mut config = HarnessConfig::default();
        config.pipeline.plot_messages = Some(123);

        let result = BasicValidator::new().validate(&config);

        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
        assert!(result.warnings()[0].message.contains("123"));
    }

    #[derive(Debug)]
    struct RejectAll;

    impl Validator for RejectAll {
        fn validate(&self, _config: &HarnessConfig) -> ValidationResult {
            let mut result = ValidationResult::new();
            result.add_error(ValidationError::error("paths.bin_dir", "rejected"));
            result
        }
    }

    #[test]
    fn test_validate_with_joins_errors() {
        let mut config = HarnessConfig::default();
        config.counter.threads.clear();
        config.pipeline.reps = 0;

        match validate_with(&config, &[&BasicValidator]) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("counter.threads: axis cannot be empty"));
                assert!(msg.contains("; pipeline.reps"));
            },
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_with_stops_at_first_failing_validator() {
        let config = HarnessConfig::default();

        assert!(validate_with(&config, &[&BasicValidator]).is_ok());
        let err = validate_with(&config, &[&BasicValidator, &RejectAll]).unwrap_err();
        assert!(err.to_string().contains("paths.bin_dir: rejected"));
    }

    #[test]
    fn test_warnings_do_not_fail_validation() {
        let mut config = HarnessConfig::default();
        config.pipeline.plot_pause_us = Some(123);

        assert!(validate_with(&config, &[&BasicValidator]).is_ok());
    }
}
