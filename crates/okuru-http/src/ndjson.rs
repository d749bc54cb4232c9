//! NDJSON 入力の読み込み
//!
//! One JSON object per line. An optional `"@search.action"` field selects
//! the action (default `upload`) and is removed from the document.

use serde_json::Value as JsonValue;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use okuru::models::ACTION_KEY;
use okuru::{
  Document, FlushTransport, IndexAction, IndexingClient, IndexingReport, IndexingResults,
  IndexingWriter,
};

use crate::errors::{HttpError, Result};

/// Parses one input line.
///
/// Blank lines yield `Ok(None)`. `line_no` is 1-based and only used in errors.
///
/// # Errors
/// The line is not a JSON object or names an unknown action.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<(IndexAction, Document)>> {
  let line = line.trim();
  if line.is_empty() {
    return Ok(None);
  }

  let mut fields = match serde_json::from_str::<JsonValue>(line) {
    Ok(JsonValue::Object(fields)) => fields,
    Ok(_) => return Err(HttpError::invalid_input(line_no, "expected a JSON object")),
    Err(e) => return Err(HttpError::invalid_input(line_no, e.to_string())),
  };

  let action = match fields.remove(ACTION_KEY) {
    Some(raw) => serde_json::from_value::<IndexAction>(raw)
      .map_err(|e| HttpError::invalid_input(line_no, format!("invalid {ACTION_KEY}: {e}")))?,
    None => IndexAction::default(),
  };

  Ok(Some((action, Document::from_map(fields))))
}

/// Feeds every line of `reader` into an indexing stream, then closes it.
///
/// Stops early, without error, when the stream stops accepting input after
/// a terminal flush error; that error reaches the result side.
///
/// Returns the number of documents queued into the stream. After a terminal
/// error some of them may have been discarded unsent; the report built from
/// the results counts only documents the transport saw.
///
/// # Errors
/// Reading failed or a line could not be parsed. The writer is dropped,
/// so the stream still flushes what it already received.
pub async fn pump_ndjson<R>(reader: R, writer: IndexingWriter) -> Result<usize>
where
  R: AsyncBufRead + Unpin,
{
  let mut lines = reader.lines();
  let mut line_no = 0;
  let mut queued = 0;

  while let Some(line) = lines.next_line().await? {
    line_no += 1;
    let Some((action, document)) = parse_line(line_no, &line)? else {
      continue;
    };

    if writer.write(action, document).await.is_err() {
      debug!(line = line_no, "indexing stream closed, stopping input");
      break;
    }
    queued += 1;
  }

  writer.close();
  Ok(queued)
}

/// Indexes every document of an NDJSON reader through one indexing stream.
///
/// Input is read while earlier batches are in flight; each emitted batch is
/// logged and folded into the report.
///
/// # Errors
/// - The stream ended with a transport error
/// - Reading or parsing the input failed (documents before the bad line are
///   still flushed)
pub async fn index_ndjson<T, R>(client: &IndexingClient<T>, reader: R) -> Result<IndexingReport>
where
  T: FlushTransport + ?Sized + 'static,
  R: AsyncBufRead + Unpin,
{
  let (writer, results) = client.create_indexing_stream();

  let (queued, report) = tokio::join!(pump_ndjson(reader, writer), collect_report(results));
  let report = report?;
  let queued = queued?;

  info!(
    queued,
    succeeded = report.succeeded,
    failed = report.failed,
    "NDJSON input indexed"
  );
  Ok(report)
}

async fn collect_report(mut results: IndexingResults) -> Result<IndexingReport> {
  let mut report = IndexingReport::default();
  let mut batch_no = 0;

  while let Some(outcome) = results.next_batch().await {
    let batch = outcome?;
    batch_no += 1;
    let failed = batch.iter().filter(|r| !r.succeeded).count();
    info!(batch = batch_no, documents = batch.len(), failed, "batch indexed");
    report.record_all(&batch);
  }

  Ok(report)
}
