//! Streaming adapter
//!
//! Feeds a `BatchAccumulator` from a push-based input and emits one result
//! batch per flush. A single worker task owns the accumulator; input and
//! output are bounded `tokio::sync::mpsc` channels, so
//!
//! - no input item is read while a flush triggered by the previous one is
//!   pending,
//! - a consumer that stops reading stops the worker from pulling input,
//! - the first error is emitted downstream and ends the stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::batch::accumulator::BatchAccumulator;
use crate::config::DEFAULT_STREAM_CAPACITY;
use crate::errors::{BatchError, StreamError};
use crate::models::{Document, DocumentOperation, DocumentResult, IndexAction};
use crate::transport::FlushTransport;

/// One emission of an indexing stream: the results of one flush, or the
/// terminal error.
pub type BatchOutcome = Result<Vec<DocumentResult>, BatchError>;

type InputItem = (IndexAction, Document);

/// Builder for an indexing stream around one accumulator.
///
/// ```rust,ignore
/// let (writer, mut results) = IndexingStream::new(accumulator).with_capacity(8).spawn();
/// writer.upload(doc).await?;
/// writer.close();
/// while let Some(batch) = results.next_batch().await { /* ... */ }
/// ```
pub struct IndexingStream<T> {
  accumulator: BatchAccumulator<T>,
  capacity: usize,
}

impl<T> IndexingStream<T>
where
  T: FlushTransport + 'static,
{
  /// Wraps an accumulator. The stream owns it from now on.
  pub fn new(accumulator: BatchAccumulator<T>) -> Self {
    Self {
      accumulator,
      capacity: DEFAULT_STREAM_CAPACITY,
    }
  }

  /// Sets the capacity of the input and output channels (minimum 1).
  #[must_use]
  pub fn with_capacity(mut self, capacity: usize) -> Self {
    self.capacity = capacity.max(1);
    self
  }

  /// Starts the worker task and returns both ends of the stream.
  ///
  /// Must be called inside a tokio runtime.
  pub fn spawn(self) -> (IndexingWriter, IndexingResults) {
    let (input_tx, input_rx) = mpsc::channel(self.capacity);
    let (output_tx, output_rx) = mpsc::channel(self.capacity);

    tokio::spawn(run_worker(self.accumulator, input_rx, output_tx));

    (IndexingWriter { tx: input_tx }, IndexingResults { rx: output_rx })
  }

  /// Pipes `input` into a new stream and returns the result side.
  ///
  /// Forwarding stops when `input` ends or when the stream stops accepting
  /// writes after a terminal error.
  pub fn forward<S>(self, input: S) -> IndexingResults
  where
    S: Stream<Item = (IndexAction, Document)> + Send + 'static,
  {
    let (writer, results) = self.spawn();

    tokio::spawn(async move {
      let mut input = Box::pin(input);
      while let Some((action, document)) = input.next().await {
        if writer.write(action, document).await.is_err() {
          debug!("indexing stream closed, stopping input forwarding");
          break;
        }
      }
      writer.close();
    });

    results
  }
}

/// Input side of an indexing stream.
///
/// Cloneable; the stream ends once every clone is closed or dropped.
#[derive(Debug, Clone)]
pub struct IndexingWriter {
  tx: mpsc::Sender<InputItem>,
}

impl IndexingWriter {
  /// Submits one document. Waits while the input channel is full.
  ///
  /// `Ok` means the document was queued, not that it was sent. Documents still
  /// queued when the stream stops on a terminal error are discarded without
  /// a result; only documents with a `DocumentResult` reached the transport.
  ///
  /// # Errors
  /// `StreamError::Closed` once the stream has stopped (terminal error, or
  /// the result side was dropped).
  pub async fn write(&self, action: IndexAction, document: Document) -> Result<(), StreamError> {
    self.tx.send((action, document)).await.map_err(|_| StreamError::Closed)
  }

  /// Submits an upload.
  pub async fn upload(&self, document: Document) -> Result<(), StreamError> {
    self.write(IndexAction::Upload, document).await
  }

  /// Submits a merge.
  pub async fn merge(&self, document: Document) -> Result<(), StreamError> {
    self.write(IndexAction::Merge, document).await
  }

  /// Submits a merge-or-upload.
  pub async fn merge_or_upload(&self, document: Document) -> Result<(), StreamError> {
    self.write(IndexAction::MergeOrUpload, document).await
  }

  /// Submits the deletion of the document whose `key_field` equals `key`.
  pub async fn delete(&self, key_field: &str, key: impl Into<String>) -> Result<(), StreamError> {
    self.write(IndexAction::Delete, Document::new().with_field(key_field, key.into())).await
  }

  /// Whether the stream has stopped accepting input.
  pub fn is_closed(&self) -> bool {
    self.tx.is_closed()
  }

  /// Signals end of input for this writer.
  pub fn close(self) {
    drop(self);
  }
}

/// Output side of an indexing stream.
///
/// Yields one `Ok(results)` per flush, in flush order, then either ends or
/// yields a single `Err` and ends.
#[derive(Debug)]
pub struct IndexingResults {
  rx: mpsc::Receiver<BatchOutcome>,
}

impl IndexingResults {
  /// Waits for the next emission. `None` once the stream has ended.
  pub async fn next_batch(&mut self) -> Option<BatchOutcome> {
    self.rx.recv().await
  }

  /// Concatenates every emission until the stream ends.
  ///
  /// # Errors
  /// The terminal error, if the stream ended with one. Results received
  /// before it are discarded.
  pub async fn collect_all(mut self) -> Result<Vec<DocumentResult>, BatchError> {
    let mut all = Vec::new();
    while let Some(outcome) = self.next_batch().await {
      all.extend(outcome?);
    }
    Ok(all)
  }
}

impl Stream for IndexingResults {
  type Item = BatchOutcome;

  fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    self.rx.poll_recv(cx)
  }
}

/// Worker loop: one item in, at most one flush, results out, repeat.
async fn run_worker<T: FlushTransport>(
  mut accumulator: BatchAccumulator<T>,
  mut input: mpsc::Receiver<InputItem>,
  output: mpsc::Sender<BatchOutcome>,
) {
  let mut next_ordinal: u64 = 0;
  let mut emitted: usize = 0;

  debug!(limits = ?accumulator.limits(), "indexing stream started");

  loop {
    let item = tokio::select! {
      biased;
      _ = output.closed() => {
        debug!("result side dropped, stopping indexing stream");
        return;
      }
      item = input.recv() => item,
    };

    let Some((action, document)) = item else {
      break;
    };

    let operation = DocumentOperation::new(next_ordinal, action, document);
    next_ordinal += 1;

    match accumulator.add(operation).await {
      Ok(results) if results.is_empty() => {}
      Ok(results) => {
        emitted += results.len();
        if output.send(Ok(results)).await.is_err() {
          debug!("result side dropped, stopping indexing stream");
          return;
        }
      }
      Err(err) => {
        fail(&mut input, &output, err).await;
        return;
      }
    }
  }

  match accumulator.flush().await {
    Ok(results) => {
      emitted += results.len();
      if !results.is_empty() && output.send(Ok(results)).await.is_err() {
        debug!("result side dropped before final flush was delivered");
        return;
      }
    }
    Err(err) => {
      fail(&mut input, &output, err).await;
      return;
    }
  }

  info!(
    submitted = next_ordinal,
    emitted,
    flushes = accumulator.flushes(),
    "indexing stream completed"
  );
}

/// Stops accepting input, discards what is still buffered, then emits the
/// terminal error.
async fn fail(
  input: &mut mpsc::Receiver<InputItem>,
  output: &mpsc::Sender<BatchOutcome>,
  err: BatchError,
) {
  input.close();
  let mut discarded: usize = 0;
  while input.try_recv().is_ok() {
    discarded += 1;
  }

  warn!(error = %err, discarded, "indexing stream stopped by error");
  if output.send(Err(err)).await.is_err() {
    debug!("result side dropped before the error was delivered");
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Module
// ─────────────────────────────────────────────────────────────────────────────
