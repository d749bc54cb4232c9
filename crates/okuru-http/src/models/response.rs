//! Response Model Definition

use serde::Deserialize;

use okuru::DocumentResult;

/// Body of a 200 or 207 `docs/index` response
#[derive(Debug, Deserialize)]
pub struct IndexBatchResponse {
  /// One entry per submitted action, in submission order
  pub value: Vec<IndexingResultDto>,
}

/// Per-document indexing result (DTO)
///
/// Converted into `DocumentResult`; the ordinal is stamped later by the
/// accumulator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingResultDto {
  /// Document key
  pub key: String,
  /// Whether the action succeeded
  pub status: bool,
  /// Per-document status code
  pub status_code: u16,
  /// Failure detail
  #[serde(default)]
  pub error_message: Option<String>,
}

impl From<IndexingResultDto> for DocumentResult {
  fn from(dto: IndexingResultDto) -> Self {
    match (dto.status, dto.error_message) {
      (true, _) => DocumentResult::success(dto.key, dto.status_code),
      (false, message) => DocumentResult::failure(
        dto.key,
        dto.status_code,
        message.unwrap_or_else(|| format!("status {}", dto.status_code)),
      ),
    }
  }
}
