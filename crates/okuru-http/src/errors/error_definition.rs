//! HTTP クライアント・コマンドのエラー定義

use thiserror::Error;

use okuru::errors::{BatchError, OkuruError, TransportError};

/// エラーの種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpErrorKind {
  /// 設定が無効
  Config,
  /// 入力行が無効
  InvalidInput,
  /// リモートサービスへの送信失敗
  Transport,
  /// 入出力エラー
  Io,
  /// 内部エラー
  Internal,
}

impl HttpErrorKind {
  /// エラーコードを取得
  #[must_use]
  pub fn code(&self) -> &'static str {
    match self {
      Self::Config => "config_error",
      Self::InvalidInput => "invalid_input",
      Self::Transport => "transport_error",
      Self::Io => "io_error",
      Self::Internal => "internal_error",
    }
  }

  /// Process exit code of the command-line tool
  #[must_use]
  pub fn exit_code(&self) -> u8 {
    match self {
      Self::Config => 2,
      Self::InvalidInput => 3,
      Self::Transport => 4,
      Self::Io | Self::Internal => 1,
    }
  }
}

/// HTTP 層のエラー
#[derive(Debug, Error)]
pub enum HttpError {
  /// 設定エラー
  #[error("設定エラー: {0}")]
  Config(String),

  /// NDJSON 入力の行が無効
  #[error("入力値が無効です: line={line}, {reason}")]
  InvalidInput {
    /// 1-based line number
    line: usize,
    /// Why the line was rejected
    reason: String,
  },

  /// インデックス処理エラー
  #[error(transparent)]
  Indexing(#[from] OkuruError),

  /// 入出力エラー
  #[error("入出力エラー: {0}")]
  Io(#[from] std::io::Error),

  /// 内部エラー
  #[error("内部エラー: {0}")]
  Internal(String),
}

impl HttpError {
  /// エラーの種類を取得
  #[must_use]
  pub fn kind(&self) -> HttpErrorKind {
    match self {
      Self::Config(_) => HttpErrorKind::Config,
      Self::InvalidInput { .. } => HttpErrorKind::InvalidInput,
      Self::Indexing(OkuruError::Config(_)) => HttpErrorKind::Config,
      Self::Indexing(_) => HttpErrorKind::Transport,
      Self::Io(_) => HttpErrorKind::Io,
      Self::Internal(_) => HttpErrorKind::Internal,
    }
  }

  /// エラーコードを取得
  #[must_use]
  pub fn code(&self) -> &'static str {
    self.kind().code()
  }

  /// 設定エラーを作成
  #[must_use]
  pub fn config(message: impl Into<String>) -> Self {
    Self::Config(message.into())
  }

  /// 無効な入力エラーを作成
  #[must_use]
  pub fn invalid_input(line: usize, reason: impl Into<String>) -> Self {
    Self::InvalidInput {
      line,
      reason: reason.into(),
    }
  }

  /// 内部エラーを作成
  #[must_use]
  pub fn internal(message: impl Into<String>) -> Self {
    Self::Internal(message.into())
  }
}

impl From<BatchError> for HttpError {
  fn from(err: BatchError) -> Self {
    Self::Indexing(err.into())
  }
}

impl From<TransportError> for HttpError {
  fn from(err: TransportError) -> Self {
    Self::Indexing(err.into())
  }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, HttpError>;
