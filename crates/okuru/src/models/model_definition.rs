//! Data Model Definition
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

/// Reserved key carrying the indexing action in a serialized operation.
///
/// Any field of the same name inside a document is ignored on the wire.
pub const ACTION_KEY: &str = "@search.action";

/// Arbitrary field map of a document.
pub type Fields = Map<String, JsonValue>;

/// Indexing action applied to a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexAction {
  /// Insert, or replace the whole document if the key exists
  #[default]
  Upload,
  /// Update fields of an existing document
  Merge,
  /// Merge if the key exists, upload otherwise
  MergeOrUpload,
  /// Remove the document with the given key
  Delete,
}

impl IndexAction {
  /// Returns the wire name of the action.
  pub fn as_str(&self) -> &'static str {
    match self {
      IndexAction::Upload => "upload",
      IndexAction::Merge => "merge",
      IndexAction::MergeOrUpload => "mergeOrUpload",
      IndexAction::Delete => "delete",
    }
  }
}

impl std::fmt::Display for IndexAction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Document payload submitted to the remote index
///
/// A plain JSON object. The index schema (key field, field types) belongs to
/// the remote service and is not interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
  fields: Fields,
}

impl Document {
  /// Creates an empty document
  pub fn new() -> Self {
    Self::default()
  }

  /// Wraps an existing field map
  pub fn from_map(fields: Fields) -> Self {
    Self { fields }
  }

  /// Builder that sets one field and returns Self
  #[must_use]
  pub fn with_field(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
    self.fields.insert(name.into(), value.into());
    self
  }

  /// Returns a field value
  pub fn field(&self, name: &str) -> Option<&JsonValue> {
    self.fields.get(name)
  }

  /// Returns all fields
  pub fn fields(&self) -> &Fields {
    &self.fields
  }

  /// Number of fields
  pub fn len(&self) -> usize {
    self.fields.len()
  }

  /// Whether the document has no fields
  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  /// Consumes the document and returns its field map
  pub fn into_map(self) -> Fields {
    self.fields
  }
}

impl From<Fields> for Document {
  fn from(fields: Fields) -> Self {
    Self::from_map(fields)
  }
}

/// One document annotated with an indexing action and its position in the
/// overall input sequence.
///
/// Immutable once created. The ordinal is assigned by whoever drives the
/// accumulator and is never sent over the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOperation {
  ordinal: u64,
  action: IndexAction,
  document: Document,
}

impl DocumentOperation {
  /// Creates an operation
  pub fn new(ordinal: u64, action: IndexAction, document: Document) -> Self {
    Self {
      ordinal,
      action,
      document,
    }
  }

  /// Position in the overall input sequence
  pub fn ordinal(&self) -> u64 {
    self.ordinal
  }

  /// Indexing action
  pub fn action(&self) -> IndexAction {
    self.action
  }

  /// Document payload
  pub fn document(&self) -> &Document {
    &self.document
  }

  /// Estimated contribution of this operation to a request body (bytes).
  ///
  /// Length of the JSON wire form plus one separator byte.
  pub fn estimated_size(&self) -> Result<usize, serde_json::Error> {
    Ok(serde_json::to_vec(self)?.len() + 1)
  }
}

/// Wire form: the document's fields plus `"@search.action"`.
impl Serialize for DocumentOperation {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry(ACTION_KEY, &self.action)?;
    for (name, value) in self.document.fields().iter().filter(|(name, _)| name.as_str() != ACTION_KEY) {
      map.serialize_entry(name, value)?;
    }
    map.end()
  }
}

/// Outcome of one document operation
///
/// `succeeded == false` is a per-document rejection, reported as data rather
/// than as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResult {
  /// Ordinal of the operation this result belongs to
  #[serde(default)]
  pub ordinal: u64,

  /// Document key as reported by the remote service
  pub key: String,

  /// Whether the operation succeeded
  pub succeeded: bool,

  /// HTTP-like status code for this document
  pub status_code: u16,

  /// Failure reason, if any
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error_message: Option<String>,
}

impl DocumentResult {
  /// Successful result. The ordinal is stamped by the accumulator.
  pub fn success(key: impl Into<String>, status_code: u16) -> Self {
    Self {
      ordinal: 0,
      key: key.into(),
      succeeded: true,
      status_code,
      error_message: None,
    }
  }

  /// Failed result. The ordinal is stamped by the accumulator.
  pub fn failure(key: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
    Self {
      ordinal: 0,
      key: key.into(),
      succeeded: false,
      status_code,
      error_message: Some(message.into()),
    }
  }
}
