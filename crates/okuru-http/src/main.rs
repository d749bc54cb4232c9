//! okuru-http エントリーポイント
//!
//! Reads NDJSON documents from stdin, indexes them in size-bounded batches
//! and prints the indexing report as JSON on stdout.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use okuru::IndexingClient;
use okuru::config::LogLevel;
use okuru_http::config::HttpConfig;
use okuru_http::{HttpError, HttpFlushTransport, index_ndjson};

#[tokio::main]
async fn main() -> ExitCode {
  // 設定の読み込み
  let config = match HttpConfig::from_env() {
    Ok(config) => config,
    Err(err) => {
      init_tracing(LogLevel::default());
      return report_failure(&err);
    }
  };

  // ロギングの初期化
  init_tracing(config.log_level);

  match run(config).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => report_failure(&err),
  }
}

async fn run(config: HttpConfig) -> Result<(), HttpError> {
  tracing::info!(index = %config.index_name, endpoint = %config.endpoint, "設定を読み込みました");

  let transport = Arc::new(HttpFlushTransport::new(&config)?);
  let client = IndexingClient::new(transport, &config.to_okuru_config())?;

  let report = index_ndjson(&client, BufReader::new(tokio::io::stdin())).await?;

  let json = serde_json::to_string_pretty(&report)
    .map_err(|e| HttpError::internal(format!("failed to serialize report: {e}")))?;
  println!("{json}");

  if !report.is_all_succeeded() {
    tracing::warn!(failed = report.failed, "some documents were rejected");
  }
  Ok(())
}

fn init_tracing(level: LogLevel) {
  // RUST_LOG takes precedence over OKURU_LOG_LEVEL
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();
}

fn report_failure(err: &HttpError) -> ExitCode {
  tracing::error!(code = err.code(), "{err}");
  ExitCode::from(err.kind().exit_code())
}
