//! Batch indexing operation
//!
//! Drives a finite collection of documents through an accumulator and
//! returns every per-document result, in input order.

use tracing::debug;

use crate::batch::accumulator::BatchAccumulator;
use crate::errors::BatchError;
use crate::models::{Document, DocumentOperation, DocumentResult, IndexAction};
use crate::transport::FlushTransport;

/// Ordered list of `(action, document)` pairs to index in one call.
///
/// ```rust,ignore
/// let batch = IndexDocumentsBatch::new()
///     .upload(new_hotels)
///     .merge(rating_updates)
///     .delete("hotelId", ["3", "7"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexDocumentsBatch {
  actions: Vec<(IndexAction, Document)>,
}

impl IndexDocumentsBatch {
  /// Creates an empty batch
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends `documents` with the given action
  #[must_use]
  pub fn with_action(
    mut self,
    action: IndexAction,
    documents: impl IntoIterator<Item = Document>,
  ) -> Self {
    self.actions.extend(documents.into_iter().map(|document| (action, document)));
    self
  }

  /// Appends uploads
  #[must_use]
  pub fn upload(self, documents: impl IntoIterator<Item = Document>) -> Self {
    self.with_action(IndexAction::Upload, documents)
  }

  /// Appends merges
  #[must_use]
  pub fn merge(self, documents: impl IntoIterator<Item = Document>) -> Self {
    self.with_action(IndexAction::Merge, documents)
  }

  /// Appends merge-or-uploads
  #[must_use]
  pub fn merge_or_upload(self, documents: impl IntoIterator<Item = Document>) -> Self {
    self.with_action(IndexAction::MergeOrUpload, documents)
  }

  /// Appends deletions: one `{key_field: key}` document per key
  #[must_use]
  pub fn delete<K>(self, key_field: &str, keys: impl IntoIterator<Item = K>) -> Self
  where
    K: Into<String>,
  {
    let documents = keys.into_iter().map(|key| Document::new().with_field(key_field, key.into()));
    self.with_action(IndexAction::Delete, documents)
  }

  /// Appends one action
  pub fn push(&mut self, action: IndexAction, document: Document) {
    self.actions.push((action, document));
  }

  /// Number of actions
  pub fn len(&self) -> usize {
    self.actions.len()
  }

  /// Whether the batch is empty
  pub fn is_empty(&self) -> bool {
    self.actions.is_empty()
  }

  /// Iterates over the actions in submission order
  pub fn iter(&self) -> impl Iterator<Item = &(IndexAction, Document)> {
    self.actions.iter()
  }
}

impl IntoIterator for IndexDocumentsBatch {
  type Item = (IndexAction, Document);
  type IntoIter = std::vec::IntoIter<(IndexAction, Document)>;

  fn into_iter(self) -> Self::IntoIter {
    self.actions.into_iter()
  }
}

impl FromIterator<(IndexAction, Document)> for IndexDocumentsBatch {
  fn from_iter<I: IntoIterator<Item = (IndexAction, Document)>>(iter: I) -> Self {
    Self {
      actions: iter.into_iter().collect(),
    }
  }
}

/// Indexes every item and returns the concatenated results.
///
/// Ordinals are input positions. Items are added one at a time; after the
/// last one the accumulator is flushed unconditionally. Expects an empty
/// accumulator.
///
/// # Errors
/// The first error aborts the operation: no results are returned and no
/// further items are submitted.
pub async fn index_documents<T, I>(
  accumulator: &mut BatchAccumulator<T>,
  items: I,
) -> Result<Vec<DocumentResult>, BatchError>
where
  T: FlushTransport,
  I: IntoIterator<Item = (IndexAction, Document)>,
{
  let mut aggregated = Vec::new();

  for (ordinal, (action, document)) in (0u64..).zip(items) {
    let operation = DocumentOperation::new(ordinal, action, document);
    aggregated.extend(accumulator.add(operation).await?);
  }

  aggregated.extend(accumulator.flush().await?);

  debug!(
    total = aggregated.len(),
    flushes = accumulator.flushes(),
    "batch indexing completed"
  );

  Ok(aggregated)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::config::BatchLimits;
  use crate::errors::TransportError;
  use crate::transport::mock::RecordingTransport;

  fn doc(id: &str) -> Document {
    Document::new().with_field("id", id)
  }

  #[test]
  fn builder_keeps_submission_order() {
    let batch = IndexDocumentsBatch::new()
      .upload([doc("1"), doc("2")])
      .merge([doc("3")])
      .delete("id", ["4"]);

    let actions: Vec<IndexAction> = batch.iter().map(|(a, _)| *a).collect();
    assert_eq!(
      actions,
      vec![
        IndexAction::Upload,
        IndexAction::Upload,
        IndexAction::Merge,
        IndexAction::Delete
      ]
    );
    assert_eq!(batch.len(), 4);
  }

  #[test]
  fn delete_builds_key_only_documents() {
    let batch = IndexDocumentsBatch::new().delete("hotelId", ["7".to_string()]);
    let (action, document) = batch.into_iter().next().unwrap();

    assert_eq!(action, IndexAction::Delete);
    assert_eq!(document, Document::new().with_field("hotelId", "7"));
  }

  #[tokio::test]
  async fn returns_results_for_every_document_in_order() {
    let transport = Arc::new(RecordingTransport::new());
    let mut acc = BatchAccumulator::new(Arc::clone(&transport), BatchLimits::new(2, 1000));

    let batch = IndexDocumentsBatch::new().upload([doc("d1"), doc("d2"), doc("d3")]);
    let results = index_documents(&mut acc, batch).await.unwrap();

    let keys: Vec<_> = results.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["d1", "d2", "d3"]);
    assert_eq!(transport.batch_ordinals(), vec![vec![0, 1], vec![2]]);
  }

  #[tokio::test]
  async fn empty_input_issues_no_transport_call() {
    let transport = Arc::new(RecordingTransport::new());
    let mut acc = BatchAccumulator::new(Arc::clone(&transport), BatchLimits::new(2, 1000));

    let results = index_documents(&mut acc, IndexDocumentsBatch::new()).await.unwrap();

    assert!(results.is_empty());
    assert_eq!(transport.calls(), 0);
  }

  #[tokio::test]
  async fn transport_failure_rejects_whole_operation() {
    let transport = Arc::new(RecordingTransport::failing_on(0));
    let mut acc = BatchAccumulator::new(Arc::clone(&transport), BatchLimits::new(2, 1000));

    let batch = IndexDocumentsBatch::new().upload([doc("d1"), doc("d2")]);
    let err = index_documents(&mut acc, batch).await.unwrap_err();

    assert!(matches!(err.as_transport(), Some(TransportError::Status { .. })));
  }

  #[tokio::test]
  async fn stops_submitting_after_first_failure() {
    let transport = Arc::new(RecordingTransport::failing_on(1));
    let mut acc = BatchAccumulator::new(Arc::clone(&transport), BatchLimits::new(2, 1000));

    let docs: Vec<_> = (0..8).map(|i| doc(&format!("d{i}"))).collect();
    let result = index_documents(&mut acc, IndexDocumentsBatch::new().upload(docs)).await;

    assert!(result.is_err());
    assert_eq!(transport.batch_ordinals(), vec![vec![0, 1], vec![2, 3]]);
  }
}
