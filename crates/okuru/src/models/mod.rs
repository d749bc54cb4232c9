//! Data models: documents, operations and per-document results.

pub mod model_definition;

pub use model_definition::{
  ACTION_KEY, Document, DocumentOperation, DocumentResult, Fields, IndexAction,
};
