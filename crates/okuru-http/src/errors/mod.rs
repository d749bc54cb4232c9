//! errors module
pub mod error_definition;

pub use error_definition::{HttpError, HttpErrorKind, Result};
