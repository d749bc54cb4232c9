//! Batch accumulator
//!
//! Groups document operations into batches bounded by the remote service's
//! per-request count and size limits, and flushes them through a
//! `FlushTransport`.

use std::mem;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::BatchLimits;
use crate::errors::{BatchError, TransportError};
use crate::models::{DocumentOperation, DocumentResult};
use crate::transport::FlushTransport;

/// Operations awaiting transmission plus their estimated serialized size.
#[derive(Debug, Default)]
struct PendingBatch {
  operations: Vec<DocumentOperation>,
  estimated_bytes: usize,
}

impl PendingBatch {
  fn len(&self) -> usize {
    self.operations.len()
  }

  fn is_empty(&self) -> bool {
    self.operations.is_empty()
  }

  fn push(&mut self, operation: DocumentOperation, size: usize) {
    self.operations.push(operation);
    self.estimated_bytes += size;
  }

  /// Moves the operations out and leaves an empty batch behind.
  fn take(&mut self) -> Vec<DocumentOperation> {
    self.estimated_bytes = 0;
    mem::take(&mut self.operations)
  }
}

/// Accumulates operations and flushes them in bounded batches.
///
/// # Batch bounds
///
/// Every flushed batch holds at most `max_batch_count` operations and at most
/// `max_batch_bytes` estimated bytes, `envelope_bytes` included. The only exception is a batch made of a
/// single operation that is larger than `max_batch_bytes` on its own: it is
/// still sent, alone.
///
/// # Serialized flushes
///
/// `add` and `flush` take `&mut self`, so one accumulator can never have two
/// transport calls in flight. To feed one accumulator from several tasks, use
/// [`IndexingStream`](crate::batch::IndexingStream), whose worker owns it.
pub struct BatchAccumulator<T> {
  transport: T,
  limits: BatchLimits,
  pending: PendingBatch,
  flushes: u64,
}

impl<T: FlushTransport> BatchAccumulator<T> {
  /// Creates an empty accumulator.
  pub fn new(transport: T, limits: BatchLimits) -> Self {
    Self {
      transport,
      limits,
      pending: PendingBatch::default(),
      flushes: 0,
    }
  }

  /// Adds one operation, flushing first or afterwards when a limit is reached.
  ///
  /// # Processing Flow
  /// 1. Estimate the operation's serialized size
  /// 2. If the pending batch is non-empty and the operation would push it past
  ///    a limit, flush the pending batch first
  /// 3. Append the operation
  /// 4. If step 2 did not flush and the batch is now full, flush it
  ///
  /// At most one flush happens per call. Its results are returned; an empty
  /// vector means nothing was flushed.
  ///
  /// # Errors
  /// - `BatchError::Serialize` if the operation cannot be serialized
  /// - `BatchError::Transport` if the flush fails. The failed batch is
  ///   dropped, not requeued. When the failure happened in step 2, `operation`
  ///   has already been placed in the fresh batch.
  pub async fn add(
    &mut self,
    operation: DocumentOperation,
  ) -> Result<Vec<DocumentResult>, BatchError> {
    let size = operation.estimated_size().map_err(|source| BatchError::Serialize {
      ordinal: operation.ordinal(),
      source: Arc::new(source),
    })?;

    if !self.pending.is_empty() && self.would_overflow(size) {
      let flushed = self.flush().await;
      self.pending.push(operation, size);
      return flushed;
    }

    self.pending.push(operation, size);

    if self.is_full() {
      return self.flush().await;
    }

    Ok(Vec::new())
  }

  /// Transmits the pending batch, if any.
  ///
  /// Returns an empty vector without calling the transport when nothing is
  /// pending. Results carry the ordinals of the flushed operations, in order.
  ///
  /// # Errors
  /// - `BatchError::Transport` when the transport fails or returns a result
  ///   count that does not match the batch
  pub async fn flush(&mut self) -> Result<Vec<DocumentResult>, BatchError> {
    if self.pending.is_empty() {
      return Ok(Vec::new());
    }

    let bytes = self.pending.estimated_bytes;
    let batch = self.pending.take();
    let ordinals: Vec<u64> = batch.iter().map(DocumentOperation::ordinal).collect();
    self.flushes += 1;

    debug!(
      flush = self.flushes,
      count = ordinals.len(),
      bytes,
      "flushing batch"
    );

    let mut results = self.transport.flush(batch).await.inspect_err(|e| {
      warn!(flush = self.flushes, error = %e, "batch flush failed");
    })?;

    if results.len() != ordinals.len() {
      warn!(
        flush = self.flushes,
        expected = ordinals.len(),
        actual = results.len(),
        "transport result count does not match batch"
      );
      return Err(
        TransportError::ResultCountMismatch {
          expected: ordinals.len(),
          actual: results.len(),
        }
        .into(),
      );
    }

    for (result, ordinal) in results.iter_mut().zip(ordinals) {
      result.ordinal = ordinal;
    }

    Ok(results)
  }

  fn would_overflow(&self, size: usize) -> bool {
    self.pending.len() + 1 > self.limits.max_batch_count
      || self.batch_bytes() + size > self.limits.max_batch_bytes
  }

  fn is_full(&self) -> bool {
    self.pending.len() >= self.limits.max_batch_count
      || self.batch_bytes() >= self.limits.max_batch_bytes
  }

  /// Pending operations plus the transport envelope.
  fn batch_bytes(&self) -> usize {
    self.limits.envelope_bytes + self.pending.estimated_bytes
  }

  // ===== Accessors =====

  /// Number of operations waiting for the next flush.
  pub fn pending_len(&self) -> usize {
    self.pending.len()
  }

  /// Estimated serialized size of the pending operations, envelope excluded.
  pub fn pending_bytes(&self) -> usize {
    self.pending.estimated_bytes
  }

  /// Whether nothing is pending.
  pub fn is_empty(&self) -> bool {
    self.pending.is_empty()
  }

  /// Number of transport calls issued so far, failed ones included.
  pub fn flushes(&self) -> u64 {
    self.flushes
  }

  /// Configured limits.
  pub fn limits(&self) -> BatchLimits {
    self.limits
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Module
// ─────────────────────────────────────────────────────────────────────────────
