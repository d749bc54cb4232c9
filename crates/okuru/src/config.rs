// crates/okuru/src/config.rs

use std::str::FromStr;

use serde::Deserialize;

use crate::errors::ConfigError;

/// Default capacity of the input and output channels of an indexing stream.
pub const DEFAULT_STREAM_CAPACITY: usize = 16;

/// Top-level configuration for okuru.
#[derive(Debug, Clone, Deserialize)]
pub struct OkuruConfig {
  /// [batch] section
  pub batch: BatchLimits,
  /// [stream] section
  #[serde(default)]
  pub stream: StreamConfig,
  /// [logging] section
  #[serde(default)]
  pub logging: LoggingConfig,
}

/// [batch] section configuration.
///
/// Both limits come from the remote service (for example 1000 documents and
/// 16 MiB per request). They are required inputs: the accumulator never picks
/// values on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BatchLimits {
  /// Maximum number of operations per flush
  pub max_batch_count: usize,
  /// Maximum estimated serialized size (bytes) per flush, request envelope included
  pub max_batch_bytes: usize,
  /// Fixed bytes the transport wraps around every batch.
  ///
  /// Counted against `max_batch_bytes` before the first operation.
  #[serde(default)]
  pub envelope_bytes: usize,
}

impl BatchLimits {
  /// Creates limits from the remote service's per-request caps.
  pub fn new(max_batch_count: usize, max_batch_bytes: usize) -> Self {
    Self {
      max_batch_count,
      max_batch_bytes,
      envelope_bytes: 0,
    }
  }

  /// Reserves `envelope_bytes` of every batch for the transport's wrapper.
  #[must_use]
  pub fn with_envelope_bytes(mut self, envelope_bytes: usize) -> Self {
    self.envelope_bytes = envelope_bytes;
    self
  }

  /// Validates both limits.
  ///
  /// # Errors
  /// - `InvalidMaxBatchCount` / `InvalidMaxBatchBytes` when a limit is zero
  /// - `EnvelopeExceedsBatchBytes` when the envelope leaves no room for operations
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.max_batch_count < 1 {
      return Err(ConfigError::InvalidMaxBatchCount {
        actual: self.max_batch_count,
      });
    }

    if self.max_batch_bytes < 1 {
      return Err(ConfigError::InvalidMaxBatchBytes {
        actual: self.max_batch_bytes,
      });
    }

    if self.envelope_bytes >= self.max_batch_bytes {
      return Err(ConfigError::EnvelopeExceedsBatchBytes {
        envelope_bytes: self.envelope_bytes,
        max_batch_bytes: self.max_batch_bytes,
      });
    }

    Ok(())
  }
}

/// [stream] section configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
  /// Bounded capacity of the stream's input and output channels
  #[serde(default = "default_stream_capacity")]
  pub capacity: usize,
}

impl Default for StreamConfig {
  fn default() -> Self {
    Self {
      capacity: DEFAULT_STREAM_CAPACITY,
    }
  }
}

fn default_stream_capacity() -> usize {
  DEFAULT_STREAM_CAPACITY
}

/// [logging] section configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
  /// Log level: "trace" | "debug" | "info" | "warn" | "error"
  #[serde(default)]
  pub level: LogLevel,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  /// trace
  Trace,

  /// debug
  Debug,

  /// info
  #[default]
  Info,

  /// warn
  Warn,

  /// error
  Error,
}

impl LogLevel {
  /// Returns the directive understood by `tracing_subscriber::EnvFilter`.
  pub fn as_filter(&self) -> &'static str {
    match self {
      LogLevel::Trace => "trace",
      LogLevel::Debug => "debug",
      LogLevel::Info => "info",
      LogLevel::Warn => "warn",
      LogLevel::Error => "error",
    }
  }
}

impl FromStr for LogLevel {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "trace" => Ok(Self::Trace),
      "debug" => Ok(Self::Debug),
      "info" => Ok(Self::Info),
      "warn" => Ok(Self::Warn),
      "error" => Ok(Self::Error),
      _ => Err(format!(
        "Unknown log level: {}. Valid values: trace, debug, info, warn, error",
        s
      )),
    }
  }
}

// ===== Accessor Methods =====

impl OkuruConfig {
  /// Creates a configuration with default stream and logging sections.
  pub fn new(batch: BatchLimits) -> Self {
    Self {
      batch,
      stream: StreamConfig::default(),
      logging: LoggingConfig::default(),
    }
  }

  /// Returns the batch limits handed to every accumulator.
  pub fn batch_limits(&self) -> BatchLimits {
    self.batch
  }

  /// Returns the channel capacity of indexing streams.
  pub fn stream_capacity(&self) -> usize {
    self.stream.capacity
  }

  /// Returns the log level.
  pub fn log_level(&self) -> LogLevel {
    self.logging.level
  }

  /// Validates the configuration.
  ///
  /// # Validation Items
  /// - `batch.max_batch_count` >= 1
  /// - `batch.max_batch_bytes` >= 1
  /// - `batch.envelope_bytes` < `batch.max_batch_bytes`
  /// - `stream.capacity` >= 1
  ///
  /// # Errors
  /// Returns the first failing `ConfigError`.
  pub fn validate(&self) -> Result<(), ConfigError> {
    self.batch.validate()?;

    if self.stream.capacity < 1 {
      return Err(ConfigError::InvalidStreamCapacity {
        actual: self.stream.capacity,
      });
    }

    Ok(())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Module
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  // ─── Test Helpers ─────────────────────────────────────────────────────

  fn create_valid_config() -> OkuruConfig {
    OkuruConfig {
      batch: BatchLimits::new(1_000, 16 * 1024 * 1024),
      stream: StreamConfig { capacity: 8 },
      logging: LoggingConfig {
        level: LogLevel::Debug,
      },
    }
  }

  // ─── validate() ───────────────────────────────────────────────────────

  #[test]
  fn validate_accepts_valid_config() {
    let config = create_valid_config();
    assert!(config.validate().is_ok(), "valid config should pass validation");
  }

  #[test]
  fn validate_accepts_minimum_limits() {
    let mut config = create_valid_config();
    config.batch = BatchLimits::new(1, 1);
    config.stream.capacity = 1;

    assert!(config.validate().is_ok());
  }

  #[test]
  fn validate_rejects_zero_batch_count() {
    let mut config = create_valid_config();
    config.batch.max_batch_count = 0;

    let err = config.validate().unwrap_err();
    assert_eq!(err, ConfigError::InvalidMaxBatchCount { actual: 0 });
  }

  #[test]
  fn validate_rejects_zero_batch_bytes() {
    let mut config = create_valid_config();
    config.batch.max_batch_bytes = 0;

    let err = config.validate().unwrap_err();
    assert_eq!(err, ConfigError::InvalidMaxBatchBytes { actual: 0 });
  }

  #[test]
  fn validate_rejects_envelope_filling_the_byte_cap() {
    let mut config = create_valid_config();
    config.batch = BatchLimits::new(10, 11).with_envelope_bytes(11);

    let err = config.validate().unwrap_err();
    assert_eq!(
      err,
      ConfigError::EnvelopeExceedsBatchBytes {
        envelope_bytes: 11,
        max_batch_bytes: 11,
      }
    );
  }

  #[test]
  fn validate_rejects_zero_stream_capacity() {
    let mut config = create_valid_config();
    config.stream.capacity = 0;

    let err = config.validate().unwrap_err();
    assert_eq!(err, ConfigError::InvalidStreamCapacity { actual: 0 });
  }

  #[test]
  fn validate_reports_batch_errors_first() {
    let mut config = create_valid_config();
    config.batch.max_batch_count = 0; // First error
    config.stream.capacity = 0; // Second error candidate

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidMaxBatchCount { .. }));
  }

  // ─── Deserialization ──────────────────────────────────────────────────

  #[test]
  fn deserialize_applies_section_defaults() {
    let json = r#"{"batch": {"max_batch_count": 2, "max_batch_bytes": 1000}}"#;
    let config: OkuruConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.batch_limits(), BatchLimits::new(2, 1000));
    assert_eq!(config.batch_limits().envelope_bytes, 0);
    assert_eq!(config.stream_capacity(), DEFAULT_STREAM_CAPACITY);
    assert_eq!(config.log_level(), LogLevel::Info);
  }

  #[test]
  fn deserialize_requires_batch_limits() {
    let json = r#"{"batch": {"max_batch_count": 2}}"#;
    let result: Result<OkuruConfig, _> = serde_json::from_str(json);
    assert!(result.is_err(), "max_batch_bytes has no default");
  }

  #[test]
  fn deserialize_reads_log_level() {
    let json = r#"{
      "batch": {"max_batch_count": 10, "max_batch_bytes": 10},
      "stream": {"capacity": 4},
      "logging": {"level": "warn"}
    }"#;
    let config: OkuruConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.stream_capacity(), 4);
    assert_eq!(config.log_level(), LogLevel::Warn);
  }

  // ─── LogLevel ─────────────────────────────────────────────────────────

  #[test]
  fn log_level_from_str_is_case_insensitive() {
    assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
    assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
    assert!(LogLevel::from_str("verbose").is_err());
  }

  #[test]
  fn log_level_as_filter() {
    assert_eq!(LogLevel::Trace.as_filter(), "trace");
    assert_eq!(LogLevel::Warn.as_filter(), "warn");
  }
}
