//! `FlushTransport` over the remote index's HTTP document API

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use okuru::{DocumentOperation, DocumentResult, FlushTransport, TransportError};

use crate::config::{API_KEY_HEADER, HttpConfig};
use crate::errors::{HttpError, Result};
use crate::models::{IndexBatchRequest, IndexBatchResponse};

/// Sends each flushed batch as one `POST .../docs/index` request.
///
/// Only 200 and 207 (multi-status) carry per-document results; every other
/// status fails the whole batch.
#[derive(Debug, Clone)]
pub struct HttpFlushTransport {
  http_client: reqwest::Client,
  index_url: Url,
  api_key: Option<String>,
}

impl HttpFlushTransport {
  /// Builds the HTTP client for one index.
  ///
  /// # Errors
  /// - The endpoint is not a valid URL
  /// - The TLS backend or client could not be initialized
  pub fn new(config: &HttpConfig) -> Result<Self> {
    let http_client = reqwest::Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| HttpError::internal(format!("failed to build HTTP client: {e}")))?;

    Ok(Self {
      http_client,
      index_url: config.index_url()?,
      api_key: config.api_key.clone(),
    })
  }

  /// URL every batch is posted to
  pub fn index_url(&self) -> &str {
    self.index_url.as_str()
  }
}

#[async_trait]
impl FlushTransport for HttpFlushTransport {
  async fn flush(&self, batch: Vec<DocumentOperation>) -> std::result::Result<Vec<DocumentResult>, TransportError> {
    let mut request = self.http_client.post(self.index_url.clone()).json(&IndexBatchRequest::new(&batch));
    if let Some(key) = &self.api_key {
      request = request.header(API_KEY_HEADER, key);
    }

    let response = request.send().await.map_err(|e| TransportError::Request {
      reason: e.to_string(),
    })?;

    let status = response.status();
    let body = response.bytes().await.map_err(|e| TransportError::Request {
      reason: format!("failed to read response body: {e}"),
    })?;

    if status != StatusCode::OK && status != StatusCode::MULTI_STATUS {
      let message = String::from_utf8_lossy(&body).into_owned();
      warn!(status = status.as_u16(), operations = batch.len(), "index request rejected");
      return Err(TransportError::Status {
        status: status.as_u16(),
        message: if message.is_empty() {
          status.canonical_reason().unwrap_or_default().to_string()
        } else {
          message
        },
      });
    }

    let parsed: IndexBatchResponse =
      serde_json::from_slice(&body).map_err(|e| TransportError::MalformedResponse {
        reason: e.to_string(),
      })?;

    debug!(
      status = status.as_u16(),
      operations = batch.len(),
      results = parsed.value.len(),
      "index request completed"
    );

    Ok(parsed.value.into_iter().map(DocumentResult::from).collect())
  }
}
