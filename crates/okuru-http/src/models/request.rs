//! リクエストモデル定義

use serde::Serialize;

use okuru::DocumentOperation;

/// Body of one `docs/index` request
///
/// Each operation serializes as its document fields plus `@search.action`.
#[derive(Debug, Serialize)]
pub struct IndexBatchRequest<'a> {
  /// Operations of one flushed batch, in ordinal order
  pub value: &'a [DocumentOperation],
}

/// Bytes `IndexBatchRequest` adds around its operations.
///
/// `{"value":[` + `]}`, minus the one separator byte every operation's size
/// estimate already includes.
pub const ENVELOPE_BYTES: usize = r#"{"value":[]}"#.len() - 1;

impl<'a> IndexBatchRequest<'a> {
  /// Wraps a batch without copying it
  pub fn new(value: &'a [DocumentOperation]) -> Self {
    Self { value }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use okuru::{Document, IndexAction};
  use serde_json::json;

  #[test]
  fn serialize_wraps_operations_in_value() {
    let batch = vec![
      DocumentOperation::new(0, IndexAction::Upload, Document::new().with_field("id", "1")),
      DocumentOperation::new(1, IndexAction::Delete, Document::new().with_field("id", "2")),
    ];

    let body = serde_json::to_value(IndexBatchRequest::new(&batch)).unwrap();

    assert_eq!(
      body,
      json!({
        "value": [
          {"@search.action": "upload", "id": "1"},
          {"@search.action": "delete", "id": "2"}
        ]
      })
    );
  }

  #[test]
  fn body_size_is_estimates_plus_envelope() {
    let batch: Vec<_> = (0..3)
      .map(|i| {
        DocumentOperation::new(
          i,
          IndexAction::MergeOrUpload,
          Document::new().with_field("id", format!("doc-{i}")).with_field("rating", i),
        )
      })
      .collect();
    let estimated: usize = batch.iter().map(|op| op.estimated_size().unwrap()).sum();

    let body = serde_json::to_vec(&IndexBatchRequest::new(&batch)).unwrap();

    assert_eq!(body.len(), estimated + ENVELOPE_BYTES);
  }

  #[test]
  fn serialize_empty_batch() {
    let body = serde_json::to_string(&IndexBatchRequest::new(&[])).unwrap();
    assert_eq!(body, r#"{"value":[]}"#);
  }
}
