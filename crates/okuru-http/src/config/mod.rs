//! Config module

mod constants;
mod env;

pub use constants::{
  API_KEY_HEADER, DEFAULT_API_VERSION, DEFAULT_MAX_BATCH_BYTES, DEFAULT_MAX_BATCH_COUNT,
  DEFAULT_TIMEOUT_SECS,
};
pub use env::HttpConfig;
