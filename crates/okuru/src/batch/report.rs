//! Indexing result report
//!
//! Summarizes the per-document outcomes of one logical operation.

use serde::{Deserialize, Serialize};

use crate::models::DocumentResult;

/// Summary of an aggregated result list
///
/// Per-document failures are ordinary data; this report makes them easy to
/// spot without walking the full result list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingReport {
  /// Documents with a result
  pub total: usize,
  /// Documents accepted by the remote service
  pub succeeded: usize,
  /// Documents rejected by the remote service
  pub failed: usize,
  /// Keys of the rejected documents, in submission order
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub failed_keys: Vec<String>,
}

impl IndexingReport {
  /// Builds a report from a result list
  pub fn from_results(results: &[DocumentResult]) -> Self {
    let mut report = Self::default();
    report.record_all(results);
    report
  }

  /// Whether every document succeeded (failed == 0)
  pub fn is_all_succeeded(&self) -> bool {
    self.failed == 0
  }

  /// Records one result
  pub fn record(&mut self, result: &DocumentResult) {
    self.total += 1;
    if result.succeeded {
      self.succeeded += 1;
    } else {
      self.failed += 1;
      self.failed_keys.push(result.key.clone());
    }
  }

  /// Records a batch of results
  pub fn record_all(&mut self, results: &[DocumentResult]) {
    for result in results {
      self.record(result);
    }
  }
}
