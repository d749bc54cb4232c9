//! Error definitions

use std::sync::Arc;
use thiserror::Error;

/// Errors raised while validating `OkuruConfig`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
  /// batch.max_batch_count < 1
  #[error("batch.max_batch_count must be at least 1: actual={actual}")]
  InvalidMaxBatchCount {
    /// Value actually configured
    actual: usize,
  },

  /// batch.max_batch_bytes < 1
  #[error("batch.max_batch_bytes must be at least 1: actual={actual}")]
  InvalidMaxBatchBytes {
    /// Value actually configured
    actual: usize,
  },

  /// batch.envelope_bytes >= batch.max_batch_bytes
  #[error(
    "batch.envelope_bytes must be smaller than batch.max_batch_bytes: envelope_bytes={envelope_bytes}, max_batch_bytes={max_batch_bytes}"
  )]
  EnvelopeExceedsBatchBytes {
    /// Configured envelope size
    envelope_bytes: usize,
    /// Configured byte cap
    max_batch_bytes: usize,
  },

  /// stream.capacity < 1
  #[error("stream.capacity must be at least 1: actual={actual}")]
  InvalidStreamCapacity {
    /// Value actually configured
    actual: usize,
  },
}

/// Failure of the flush transport.
///
/// Never retried by this crate; surfaced verbatim to the caller of the
/// batch operation or to the consumer of an indexing stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportError {
  /// The request could not be sent or no response arrived (network failure, timeout)
  #[error("index request failed: {reason}")]
  Request {
    /// Underlying failure
    reason: String,
  },

  /// The remote service answered with a non-success status
  #[error("index request rejected with status {status}: {message}")]
  Status {
    /// HTTP-like status code
    status: u16,
    /// Response body or reason phrase
    message: String,
  },

  /// The response body could not be interpreted as a per-document result list
  #[error("malformed index response: {reason}")]
  MalformedResponse {
    /// Why parsing failed
    reason: String,
  },

  /// The result list does not line up with the flushed batch
  #[error("transport returned {actual} results for a batch of {expected} operations")]
  ResultCountMismatch {
    /// Number of operations in the flushed batch
    expected: usize,
    /// Number of results returned
    actual: usize,
  },
}

/// Errors raised by the batch accumulator and the batch indexing operation
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum BatchError {
  /// The flush transport failed
  #[error(transparent)]
  Transport(#[from] TransportError),

  /// An operation could not be serialized for size estimation
  #[error("failed to serialize document operation: ordinal={ordinal}, error={source}")]
  Serialize {
    /// Ordinal of the offending operation
    ordinal: u64,
    /// Underlying JSON error
    #[source]
    source: Arc<serde_json::Error>,
  },
}

impl BatchError {
  /// Returns the transport error, if this failure came from the transport.
  pub fn as_transport(&self) -> Option<&TransportError> {
    match self {
      BatchError::Transport(err) => Some(err),
      _ => None,
    }
  }
}

/// Errors raised by the input side of an indexing stream
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StreamError {
  /// The stream no longer accepts input (closed, or stopped after a terminal error)
  #[error("indexing stream is closed")]
  Closed,
}

/// Unified error
/// Public APIs of this crate that combine several stages return this error
/// `OkuruResult<T>` = `Result<T, OkuruError>`
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum OkuruError {
  /// Batching or transport failure
  #[error(transparent)]
  Batch(#[from] BatchError),

  /// Indexing stream failure
  #[error(transparent)]
  Stream(#[from] StreamError),

  /// Configuration failure
  #[error(transparent)]
  Config(#[from] ConfigError),
}

impl From<TransportError> for OkuruError {
  fn from(err: TransportError) -> Self {
    OkuruError::Batch(BatchError::Transport(err))
  }
}

/// Standard result alias for the okuru crate
pub type OkuruResult<T> = Result<T, OkuruError>;
