//! モデルモジュール

mod request;
mod response;

pub use request::{ENVELOPE_BYTES, IndexBatchRequest};
pub use response::{IndexBatchResponse, IndexingResultDto};
