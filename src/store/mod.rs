//! Document-store seam: the engine talks to the system of record through this
//! interface only. Documents are JSON objects addressed by `collection/id`
//! paths, with subcollections nested under their parent document path
//! (e.g. `tournaments/{tid}/matches/{matchId}`).

mod memory;

pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A stored document: a JSON object, field names in wire (camelCase) form.
pub type Document = serde_json::Map<String, Value>;

/// Errors from the document store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// The addressed document does not exist.
    NotFound(String),
    /// The document or its content could not be read/encoded.
    Data(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(path) => write!(f, "Document {} not found", path),
            StoreError::Data(msg) => write!(f, "Document data error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// A single field mutation inside a patch.
#[derive(Clone, Debug)]
pub enum FieldValue {
    /// Set the field to the given value.
    Set(Value),
    /// Add the delta to the field's current numeric value (missing counts as 0).
    Increment(i64),
}

/// A partial update: per-field mutations merged into an existing document.
#[derive(Clone, Debug, Default)]
pub struct Patch {
    fields: Vec<(String, FieldValue)>,
}

impl Patch {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Set a field to a JSON value.
    pub fn set(mut self, field: &str, value: Value) -> Self {
        self.fields.push((field.to_string(), FieldValue::Set(value)));
        self
    }

    /// Numerically increment a field.
    pub fn increment(mut self, field: &str, delta: i64) -> Self {
        self.fields
            .push((field.to_string(), FieldValue::Increment(delta)));
        self
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }
}

/// One operation inside an atomic batch.
#[derive(Clone, Debug)]
pub enum Write {
    /// Create (or replace) a full document.
    Create { path: String, doc: Document },
    /// Merge a patch into an existing document.
    Update { path: String, patch: Patch },
}

/// Field-equality filter for queries.
#[derive(Clone, Debug)]
pub struct Filter {
    pub field: String,
    pub equals: Value,
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            equals: value.into(),
        }
    }
}

/// Read-modify-write scope handed to a transaction body. Updates are staged and
/// commit only if the body returns Ok.
pub trait TransactionScope {
    fn get(&self, path: &str) -> Result<Option<Document>, StoreError>;
    fn update(&mut self, path: &str, patch: Patch);
}

/// Transaction body: reads and staged writes against a single isolated scope.
pub type TxBody<'a> = &'a mut dyn FnMut(&mut dyn TransactionScope) -> Result<(), StoreError>;

/// The operations the engine consumes from the backing store.
///
/// `batch_write` is atomic (all writes or none). `run_transaction` additionally
/// isolates its reads from concurrent transactions, so two concurrent bodies
/// targeting the same document serialize.
pub trait DocumentStore: Send + Sync {
    fn get(&self, path: &str) -> Result<Option<Document>, StoreError>;

    /// Direct children of `collection` matching every filter, as `(id, doc)`.
    fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<(String, Document)>, StoreError>;

    fn update(&self, path: &str, patch: Patch) -> Result<(), StoreError>;

    fn batch_write(&self, writes: Vec<Write>) -> Result<(), StoreError>;

    fn run_transaction(&self, body: TxBody<'_>) -> Result<(), StoreError>;
}

/// Serialize a model into a document.
pub fn to_doc<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StoreError::Data("expected a JSON object".to_string())),
        Err(e) => Err(StoreError::Data(e.to_string())),
    }
}

/// Deserialize a document into a model.
pub fn from_doc<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(doc)).map_err(|e| StoreError::Data(e.to_string()))
}

pub fn user_path(user_id: &str) -> String {
    format!("users/{}", user_id)
}

pub fn match_path(match_id: &str) -> String {
    format!("matches/{}", match_id)
}

pub fn tournament_path(tournament_id: &str) -> String {
    format!("tournaments/{}", tournament_id)
}

pub fn registrations_collection(tournament_id: &str) -> String {
    format!("tournaments/{}/registrations", tournament_id)
}

pub fn registration_path(tournament_id: &str, user_id: &str) -> String {
    format!("tournaments/{}/registrations/{}", tournament_id, user_id)
}

pub fn tournament_matches_collection(tournament_id: &str) -> String {
    format!("tournaments/{}/matches", tournament_id)
}

pub fn tournament_match_path(tournament_id: &str, match_id: &str) -> String {
    format!("tournaments/{}/matches/{}", tournament_id, match_id)
}
