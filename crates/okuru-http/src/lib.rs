//! okuru-http crate
//!
//! HTTP flush transport for the okuru indexing library, plus a command that
//! streams NDJSON documents from stdin into a remote index.
//!
//! ## Usage Example
//! ```bash
//! export OKURU_ENDPOINT=https://my-service.search.windows.net
//! export OKURU_INDEX_NAME=hotels
//! export OKURU_API_KEY=...
//! cat hotels.ndjson | okuru-http
//! ```

pub mod config;
pub mod errors;
pub mod models;
pub mod ndjson;
pub mod transport;

pub use config::HttpConfig;
pub use errors::{HttpError, HttpErrorKind};
pub use models::{IndexBatchRequest, IndexBatchResponse, IndexingResultDto};
pub use ndjson::{index_ndjson, parse_line, pump_ndjson};
pub use transport::HttpFlushTransport;
