//! HTTP 設定の定数定義

/// デフォルトの API バージョン
///
/// Appended to every index request as `api-version`.
pub const DEFAULT_API_VERSION: &str = "2023-11-01";

/// Maximum number of actions the remote service accepts per request.
pub const DEFAULT_MAX_BATCH_COUNT: usize = 1000;

/// Maximum request payload the remote service accepts (16 MiB).
pub const DEFAULT_MAX_BATCH_BYTES: usize = 16 * 1024 * 1024;

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header carrying the admin key.
pub const API_KEY_HEADER: &str = "api-key";
