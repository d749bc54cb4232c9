// crates/okuru/src/service.rs

//! IndexingClient: okuru クレートの統合ファサード。
//!
//! - バッチ上限 (BatchLimits) の保持
//! - FlushTransport の保持
//! - 呼び出しごとに新しい BatchAccumulator を構築
//!
//! Each logical operation (one `index_documents` call, one indexing stream)
//! gets its own accumulator, so results never mix across operations.

use std::sync::Arc;

use tracing::info;

use crate::batch::{
  BatchAccumulator, IndexDocumentsBatch, IndexingResults, IndexingStream, IndexingWriter,
  index_documents,
};
use crate::config::{BatchLimits, OkuruConfig};
use crate::errors::OkuruResult;
use crate::models::{Document, DocumentResult};
use crate::transport::FlushTransport;

/// okuru クレートの統合ファサード。
///
/// Owns the transport bound to one remote index and hands out batch and
/// stream operations against it.
pub struct IndexingClient<T: ?Sized> {
  /// Batch limits of the remote service
  limits: BatchLimits,

  /// Channel capacity of indexing streams
  stream_capacity: usize,

  /// Transport shared by every operation
  transport: Arc<T>,
}

impl<T> IndexingClient<T>
where
  T: FlushTransport + ?Sized + 'static,
{
  /// Creates a client.
  ///
  /// # Errors
  /// - Invalid configuration (`ConfigError`)
  pub fn new(transport: Arc<T>, config: &OkuruConfig) -> OkuruResult<Self> {
    config.validate()?;

    let limits = config.batch_limits();
    info!(
      max_batch_count = limits.max_batch_count,
      max_batch_bytes = limits.max_batch_bytes,
      stream_capacity = config.stream_capacity(),
      "indexing client initialized"
    );

    Ok(Self {
      limits,
      stream_capacity: config.stream_capacity(),
      transport,
    })
  }

  fn accumulator(&self) -> BatchAccumulator<Arc<T>> {
    BatchAccumulator::new(Arc::clone(&self.transport), self.limits)
  }

  /// Indexes a batch of actions and returns one result per action.
  ///
  /// # Errors
  /// - The first transport error; no partial results are returned
  pub async fn index_documents(&self, batch: IndexDocumentsBatch) -> OkuruResult<Vec<DocumentResult>> {
    let mut accumulator = self.accumulator();
    let results = index_documents(&mut accumulator, batch).await?;
    Ok(results)
  }

  /// Uploads documents (insert or replace).
  pub async fn upload_documents(
    &self,
    documents: impl IntoIterator<Item = Document>,
  ) -> OkuruResult<Vec<DocumentResult>> {
    self.index_documents(IndexDocumentsBatch::new().upload(documents)).await
  }

  /// Merges documents into existing ones.
  pub async fn merge_documents(
    &self,
    documents: impl IntoIterator<Item = Document>,
  ) -> OkuruResult<Vec<DocumentResult>> {
    self.index_documents(IndexDocumentsBatch::new().merge(documents)).await
  }

  /// Merges documents, uploading the ones that do not exist yet.
  pub async fn merge_or_upload_documents(
    &self,
    documents: impl IntoIterator<Item = Document>,
  ) -> OkuruResult<Vec<DocumentResult>> {
    self.index_documents(IndexDocumentsBatch::new().merge_or_upload(documents)).await
  }

  /// Deletes the documents whose `key_field` matches one of `keys`.
  pub async fn delete_documents<K>(
    &self,
    key_field: &str,
    keys: impl IntoIterator<Item = K>,
  ) -> OkuruResult<Vec<DocumentResult>>
  where
    K: Into<String>,
  {
    self.index_documents(IndexDocumentsBatch::new().delete(key_field, keys)).await
  }

  /// Opens an indexing stream with its own accumulator.
  ///
  /// Must be called inside a tokio runtime.
  pub fn create_indexing_stream(&self) -> (IndexingWriter, IndexingResults) {
    IndexingStream::new(self.accumulator()).with_capacity(self.stream_capacity).spawn()
  }

  // ===== アクセサ =====

  /// Returns the batch limits.
  pub fn batch_limits(&self) -> BatchLimits {
    self.limits
  }

  /// Returns the stream channel capacity.
  pub fn stream_capacity(&self) -> usize {
    self.stream_capacity
  }

  /// Returns the shared transport.
  pub fn transport(&self) -> &Arc<T> {
    &self.transport
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// テストモジュール
// ─────────────────────────────────────────────────────────────────────────────
