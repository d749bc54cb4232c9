//! okuru 全文検索インデックス送信ライブラリー
//!
//! Submits documents to a remote full-text search index in batches that
//! respect the service's per-request count and size limits, while keeping
//! per-document ordering and result correlation.

/// バッチモジュール - BatchAccumulator, IndexingStream, index_documents を提供
pub mod batch;

/// 設定モジュール - OkuruConfig, BatchLimits 等の設定構造体を定義
pub mod config;

/// エラーモジュール - OkuruError, TransportError 等のエラー型を定義
pub mod errors;

/// データモデルモジュール - Document, DocumentOperation, DocumentResult を定義
pub mod models;

/// サービスモジュール - IndexingClient 等の上位レベルAPIを提供
pub mod service;

/// トランスポートモジュール - FlushTransport トレイトを定義
pub mod transport;

/// 再エクスポート
pub use batch::{
  BatchAccumulator, IndexDocumentsBatch, IndexingReport, IndexingResults, IndexingStream,
  IndexingWriter,
};
pub use config::{BatchLimits, OkuruConfig};
pub use errors::{BatchError, OkuruError, OkuruResult, StreamError, TransportError};
pub use models::{Document, DocumentOperation, DocumentResult, IndexAction};
pub use service::IndexingClient;
pub use transport::FlushTransport;
