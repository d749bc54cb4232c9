//! crates/okuru/tests/integration_test.rs
//!
//! End-to-end scenarios through the public API.
//! Limits are `max_batch_count = 2`, `max_batch_bytes = 1000` throughout.
//! A scripted in-memory transport records every batch it receives.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::json;

use okuru::batch::{BatchAccumulator, IndexingStream, index_documents};
use okuru::{
  BatchLimits, Document, DocumentOperation, DocumentResult, IndexAction, IndexDocumentsBatch,
  IndexingClient, IndexingReport, OkuruConfig, OkuruError, StreamError, TransportError,
  FlushTransport,
};

/// Transport that answers from the document's `"id"` and fails on one call.
#[derive(Default)]
struct ScriptedTransport {
  batches: Mutex<Vec<Vec<String>>>,
  fail_on_call: Option<usize>,
}

impl ScriptedTransport {
  fn failing_on(call: usize) -> Self {
    Self {
      fail_on_call: Some(call),
      ..Self::default()
    }
  }

  fn batches(&self) -> Vec<Vec<String>> {
    self.batches.lock().unwrap().clone()
  }
}

fn key_of(op: &DocumentOperation) -> String {
  op.document().field("id").and_then(|v| v.as_str()).unwrap_or_default().to_string()
}

#[async_trait]
impl FlushTransport for ScriptedTransport {
  async fn flush(&self, batch: Vec<DocumentOperation>) -> Result<Vec<DocumentResult>, TransportError> {
    let call = {
      let mut batches = self.batches.lock().unwrap();
      batches.push(batch.iter().map(key_of).collect());
      batches.len() - 1
    };

    if self.fail_on_call == Some(call) {
      return Err(TransportError::Request {
        reason: "connection reset".to_string(),
      });
    }

    Ok(
      batch
        .iter()
        .map(|op| {
          if op.document().field("valid") == Some(&json!(false)) {
            DocumentResult::failure(key_of(op), 400, "invalid document")
          } else {
            DocumentResult::success(key_of(op), 200)
          }
        })
        .collect(),
    )
  }
}

fn limits() -> BatchLimits {
  BatchLimits::new(2, 1000)
}

fn doc(id: &str) -> Document {
  Document::new().with_field("id", id).with_field("title", format!("title of {id}"))
}

fn keys(results: &[DocumentResult]) -> Vec<String> {
  results.iter().map(|r| r.key.clone()).collect()
}

// ── Scenario 1: three small documents in batch mode ──
#[tokio::test]
async fn batch_mode_splits_three_documents_into_two_calls() {
  let transport = Arc::new(ScriptedTransport::default());
  let mut accumulator = BatchAccumulator::new(Arc::clone(&transport), limits());

  let items = IndexDocumentsBatch::new().upload([doc("d1"), doc("d2"), doc("d3")]);
  let results = index_documents(&mut accumulator, items).await.expect("indexing failed");

  assert_eq!(keys(&results), vec!["d1", "d2", "d3"]);
  assert_eq!(results.iter().map(|r| r.ordinal).collect::<Vec<_>>(), vec![0, 1, 2]);
  assert_eq!(
    transport.batches(),
    vec![vec!["d1".to_string(), "d2".to_string()], vec!["d3".to_string()]]
  );
}

// ── Scenario 2: one document larger than the byte cap ──
#[tokio::test]
async fn oversized_document_is_sent_alone() {
  let transport = Arc::new(ScriptedTransport::default());
  let mut accumulator = BatchAccumulator::new(Arc::clone(&transport), limits());

  let big = Document::new().with_field("id", "big").with_field("body", "x".repeat(5000));
  let results = index_documents(&mut accumulator, IndexDocumentsBatch::new().upload([big]))
    .await
    .expect("indexing failed");

  assert_eq!(results.len(), 1);
  assert_eq!(transport.batches(), vec![vec!["big".to_string()]]);
}

// ── Scenario 3: the only flush fails ──
#[tokio::test]
async fn batch_mode_rejects_with_transport_error() {
  let transport = Arc::new(ScriptedTransport::failing_on(0));
  let client = IndexingClient::new(Arc::clone(&transport), &OkuruConfig::new(limits()))
    .expect("client creation failed");

  let err = client.upload_documents([doc("d1"), doc("d2")]).await.unwrap_err();

  match err {
    OkuruError::Batch(batch_err) => assert_eq!(
      batch_err.as_transport(),
      Some(&TransportError::Request {
        reason: "connection reset".to_string()
      })
    ),
    other => panic!("expected a batch error, got {other:?}"),
  }
}

// ── Scenario 4: stream mode, one full batch then close ──
#[tokio::test]
async fn stream_emits_one_batch_and_ends() {
  let transport = Arc::new(ScriptedTransport::default());
  let (writer, mut results) =
    IndexingStream::new(BatchAccumulator::new(Arc::clone(&transport), limits())).spawn();

  writer.upload(doc("d1")).await.unwrap();
  writer.upload(doc("d2")).await.unwrap();
  writer.close();

  let mut emissions = Vec::new();
  while let Some(outcome) = results.next().await {
    emissions.push(outcome.expect("stream failed"));
  }

  assert_eq!(emissions.len(), 1);
  assert_eq!(keys(&emissions[0]), vec!["d1", "d2"]);
  assert_eq!(transport.batches().len(), 1);
}

// ── Scenario 5: stream mode, failure after one successful flush ──
#[tokio::test]
async fn stream_reports_terminal_error_after_partial_results() {
  let transport = Arc::new(ScriptedTransport::failing_on(1));
  let client = IndexingClient::new(Arc::clone(&transport), &OkuruConfig::new(limits()))
    .expect("client creation failed");
  let (writer, mut results) = client.create_indexing_stream();

  for id in ["d1", "d2", "d3", "d4"] {
    writer.upload(doc(id)).await.unwrap();
  }

  let first = results.next_batch().await.expect("missing emission").expect("first flush failed");
  assert_eq!(keys(&first), vec!["d1", "d2"]);

  let terminal = results.next_batch().await.expect("missing terminal error");
  assert!(terminal.is_err());

  assert_eq!(writer.upload(doc("d5")).await, Err(StreamError::Closed));
  assert!(results.next_batch().await.is_none());
  assert_eq!(transport.batches().len(), 2);
}

// ── Partial batch failure is data, not an error ──
#[tokio::test]
async fn rejected_documents_show_up_in_report() {
  let transport = Arc::new(ScriptedTransport::default());
  let client = IndexingClient::new(transport, &OkuruConfig::new(limits())).unwrap();

  let batch = IndexDocumentsBatch::new()
    .upload([doc("ok-1"), doc("bad").with_field("valid", false)])
    .merge_or_upload([doc("ok-2")]);
  let results = client.index_documents(batch).await.expect("indexing failed");
  let report = IndexingReport::from_results(&results);

  assert_eq!(report.total, 3);
  assert_eq!(report.failed_keys, vec!["bad".to_string()]);
  assert!(!report.is_all_succeeded());
}

// ── Mixed actions keep their order and ordinals across flush boundaries ──
#[tokio::test]
async fn ordinals_follow_submission_order_across_flushes() {
  let transport = Arc::new(ScriptedTransport::default());
  let client = IndexingClient::new(transport, &OkuruConfig::new(limits())).unwrap();

  let items: IndexDocumentsBatch = (0..7)
    .map(|i| {
      let action = if i % 2 == 0 { IndexAction::Upload } else { IndexAction::Delete };
      (action, doc(&format!("k{i}")))
    })
    .collect();

  let results = client.index_documents(items).await.unwrap();

  assert_eq!(results.iter().map(|r| r.ordinal).collect::<Vec<_>>(), (0..7).collect::<Vec<u64>>());
  assert_eq!(keys(&results)[6], "k6");
}
