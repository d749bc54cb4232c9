//! Config loading from environment variables

use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;

use okuru::config::{LogLevel, LoggingConfig, StreamConfig};
use okuru::{BatchLimits, OkuruConfig};

use super::constants::{
  DEFAULT_API_VERSION, DEFAULT_MAX_BATCH_BYTES, DEFAULT_MAX_BATCH_COUNT, DEFAULT_TIMEOUT_SECS,
};
use crate::errors::HttpError;
use crate::models::ENVELOPE_BYTES;

/// Remote index connection and batching configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
  /// Service endpoint (e.g. "https://my-service.search.windows.net")
  pub endpoint: String,
  /// Target index name
  pub index_name: String,
  /// Admin key sent as the `api-key` header, if any
  pub api_key: Option<String>,
  /// API version query parameter
  pub api_version: String,
  /// Per-request batch limits, request envelope reserved
  pub limits: BatchLimits,
  /// Request timeout
  pub timeout: Duration,
  /// Indexing stream channel capacity
  pub stream_capacity: usize,
  /// Log level for the command-line tool
  pub log_level: LogLevel,
}

impl HttpConfig {
  /// Loads configuration from environment variables
  ///
  /// | variable                 | required | default        |
  /// |--------------------------|----------|----------------|
  /// | `OKURU_ENDPOINT`         | yes      |                |
  /// | `OKURU_INDEX_NAME`       | yes      |                |
  /// | `OKURU_API_KEY`          | no       |                |
  /// | `OKURU_API_VERSION`      | no       | `2023-11-01`   |
  /// | `OKURU_MAX_BATCH_COUNT`  | no       | 1000           |
  /// | `OKURU_MAX_BATCH_BYTES`  | no       | 16 MiB         |
  /// | `OKURU_TIMEOUT_SECS`     | no       | 30             |
  /// | `OKURU_STREAM_CAPACITY`  | no       | 16             |
  /// | `OKURU_LOG_LEVEL`        | no       | `info`         |
  ///
  /// # Errors
  /// Returns an error if a required variable is missing or a value is invalid
  pub fn from_env() -> crate::errors::Result<Self> {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Loads configuration through an arbitrary variable lookup.
  ///
  /// `from_env` delegates here; tests pass a map instead of mutating the
  /// process environment.
  pub fn from_lookup<F>(lookup: F) -> crate::errors::Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let required = |name: &str| {
      lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| HttpError::config(format!("{name} is not set")))
    };

    let endpoint = required("OKURU_ENDPOINT")?.trim_end_matches('/').to_string();
    let index_name = required("OKURU_INDEX_NAME")?;
    let api_key = lookup("OKURU_API_KEY").filter(|v| !v.is_empty());
    let api_version =
      lookup("OKURU_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

    let max_batch_count =
      parse_or(&lookup, "OKURU_MAX_BATCH_COUNT", DEFAULT_MAX_BATCH_COUNT)?;
    let max_batch_bytes =
      parse_or(&lookup, "OKURU_MAX_BATCH_BYTES", DEFAULT_MAX_BATCH_BYTES)?;
    let timeout_secs = parse_or(&lookup, "OKURU_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
    if timeout_secs == 0 {
      return Err(HttpError::config("OKURU_TIMEOUT_SECS must be at least 1"));
    }
    let stream_capacity =
      parse_or(&lookup, "OKURU_STREAM_CAPACITY", okuru::config::DEFAULT_STREAM_CAPACITY)?;

    let log_level = match lookup("OKURU_LOG_LEVEL") {
      Some(level) => LogLevel::from_str(&level).map_err(HttpError::config)?,
      None => LogLevel::default(),
    };

    let config = Self {
      endpoint,
      index_name,
      api_key,
      api_version,
      limits: BatchLimits::new(max_batch_count, max_batch_bytes).with_envelope_bytes(ENVELOPE_BYTES),
      timeout: Duration::from_secs(timeout_secs),
      stream_capacity,
      log_level,
    };

    config.to_okuru_config().validate().map_err(|e| HttpError::config(e.to_string()))?;
    config.index_url()?;

    Ok(config)
  }

  /// Builds the core library configuration.
  pub fn to_okuru_config(&self) -> OkuruConfig {
    OkuruConfig {
      batch: self.limits,
      stream: StreamConfig {
        capacity: self.stream_capacity,
      },
      logging: LoggingConfig {
        level: self.log_level,
      },
    }
  }

  /// URL of the document indexing endpoint.
  ///
  /// `{endpoint}/indexes/{index_name}/docs/index?api-version={api_version}`,
  /// with the index name percent-encoded as one path segment.
  ///
  /// # Errors
  /// The endpoint is not an absolute `http(s)` URL.
  pub fn index_url(&self) -> crate::errors::Result<Url> {
    let invalid = || HttpError::config(format!("OKURU_ENDPOINT is not a valid URL: {}", self.endpoint));

    let mut url = Url::parse(&self.endpoint).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
      return Err(invalid());
    }

    url
      .path_segments_mut()
      .map_err(|()| invalid())?
      .pop_if_empty()
      .extend(["indexes", self.index_name.as_str(), "docs", "index"]);
    url.query_pairs_mut().append_pair("api-version", &self.api_version);

    Ok(url)
  }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> crate::errors::Result<T>
where
  F: Fn(&str) -> Option<String>,
  T: FromStr,
{
  match lookup(name) {
    Some(raw) => raw
      .trim()
      .parse()
      .map_err(|_| HttpError::config(format!("{name} is not a valid number: {raw}"))),
    None => Ok(default),
  }
}
