//! batch モジュール
//!
//! Size-bounded batching of document operations, the streaming adapter and
//! the one-shot batch indexing operation.

pub mod accumulator;
pub mod operation;
pub mod report;
pub mod stream;

/// 主要な型を再エクスポート
pub use accumulator::BatchAccumulator;
pub use operation::{IndexDocumentsBatch, index_documents};
pub use report::IndexingReport;
pub use stream::{BatchOutcome, IndexingResults, IndexingStream, IndexingWriter};
