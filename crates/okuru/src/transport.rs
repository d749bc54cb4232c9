//! Flush transport abstraction.
//!
//! The accumulator never talks to the network itself. The owning client injects
//! a `FlushTransport` bound to its HTTP layer (see the `okuru-http` crate), and
//! tests inject in-memory implementations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::TransportError;
use crate::models::{DocumentOperation, DocumentResult};

/// Sends one batch of operations to the remote index.
///
/// Implementations must return exactly one `DocumentResult` per operation, in
/// batch order. Per-document rejections are reported as results with
/// `succeeded == false`; `Err` is reserved for failures of the whole request.
#[async_trait]
pub trait FlushTransport: Send + Sync {
  /// Transmits `batch` and returns its per-document results.
  ///
  /// Ownership of the batch moves into the transport for the duration of the
  /// call.
  async fn flush(&self, batch: Vec<DocumentOperation>) -> Result<Vec<DocumentResult>, TransportError>;
}

#[async_trait]
impl<T> FlushTransport for Arc<T>
where
  T: FlushTransport + ?Sized,
{
  async fn flush(&self, batch: Vec<DocumentOperation>) -> Result<Vec<DocumentResult>, TransportError> {
    (**self).flush(batch).await
  }
}
