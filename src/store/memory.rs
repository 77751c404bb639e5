//! In-memory document store: a path-keyed map behind one RwLock.
//!
//! Batches and transactions hold the write lock for their whole duration, which
//! gives the atomicity and isolation the engine relies on. Good enough for a
//! single-process deployment and for tests; a real backing store plugs in
//! behind the same trait.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;

use super::{
    Document, DocumentStore, FieldValue, Filter, Patch, StoreError, TransactionScope, TxBody, Write,
};

#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<BTreeMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a document. Not part of the engine-facing interface;
    /// used by platform glue and tests for flows the engine does not own.
    pub fn set(&self, path: &str, doc: Document) {
        let mut docs = self.docs.write().unwrap_or_else(|e| e.into_inner());
        docs.insert(path.to_string(), doc);
    }

    /// Delete a document (same caveat as [`MemoryStore::set`]).
    pub fn delete(&self, path: &str) -> bool {
        let mut docs = self.docs.write().unwrap_or_else(|e| e.into_inner());
        docs.remove(path).is_some()
    }

    /// Number of stored documents (for tests asserting "nothing was written").
    pub fn len(&self) -> usize {
        let docs = self.docs.read().unwrap_or_else(|e| e.into_inner());
        docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// True when `path` is a direct child of `collection` (no deeper nesting).
fn in_collection(path: &str, collection: &str) -> bool {
    match path.strip_prefix(collection) {
        Some(rest) => {
            rest.starts_with('/') && !rest[1..].is_empty() && !rest[1..].contains('/')
        }
        None => false,
    }
}

fn matches_filters(doc: &Document, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|f| doc.get(&f.field) == Some(&f.equals))
}

fn apply_patch(doc: &mut Document, patch: &Patch) {
    for (field, op) in patch.fields() {
        match op {
            FieldValue::Set(value) => {
                doc.insert(field.clone(), value.clone());
            }
            FieldValue::Increment(delta) => {
                let current = doc.get(field).and_then(Value::as_i64).unwrap_or(0);
                doc.insert(field.clone(), Value::from(current + delta));
            }
        }
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, path: &str) -> Result<Option<Document>, StoreError> {
        let docs = self.docs.read().unwrap_or_else(|e| e.into_inner());
        Ok(docs.get(path).cloned())
    }

    fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<(String, Document)>, StoreError> {
        let docs = self.docs.read().unwrap_or_else(|e| e.into_inner());
        Ok(docs
            .iter()
            .filter(|(path, doc)| in_collection(path, collection) && matches_filters(doc, filters))
            .map(|(path, doc)| {
                let id = path.rsplit('/').next().unwrap_or(path).to_string();
                (id, doc.clone())
            })
            .collect())
    }

    fn update(&self, path: &str, patch: Patch) -> Result<(), StoreError> {
        let mut docs = self.docs.write().unwrap_or_else(|e| e.into_inner());
        let doc = docs
            .get_mut(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        apply_patch(doc, &patch);
        Ok(())
    }

    fn batch_write(&self, writes: Vec<Write>) -> Result<(), StoreError> {
        let mut docs = self.docs.write().unwrap_or_else(|e| e.into_inner());

        // Validate every update target first so a failing batch leaves no
        // partial state behind.
        for write in &writes {
            if let Write::Update { path, .. } = write {
                if !docs.contains_key(path) {
                    return Err(StoreError::NotFound(path.clone()));
                }
            }
        }

        for write in writes {
            match write {
                Write::Create { path, doc } => {
                    docs.insert(path, doc);
                }
                Write::Update { path, patch } => {
                    if let Some(doc) = docs.get_mut(&path) {
                        apply_patch(doc, &patch);
                    }
                }
            }
        }
        Ok(())
    }

    fn run_transaction(&self, body: TxBody<'_>) -> Result<(), StoreError> {
        // Write lock for the whole body: reads see committed state, staged
        // writes apply atomically, concurrent transactions serialize.
        let mut docs = self.docs.write().unwrap_or_else(|e| e.into_inner());

        let mut scope = MemoryTxScope {
            docs: &*docs,
            staged: Vec::new(),
        };
        body(&mut scope)?;
        let staged = scope.staged;

        for (path, _) in &staged {
            if !docs.contains_key(path) {
                return Err(StoreError::NotFound(path.clone()));
            }
        }
        for (path, patch) in staged {
            if let Some(doc) = docs.get_mut(&path) {
                apply_patch(doc, &patch);
            }
        }
        Ok(())
    }
}

struct MemoryTxScope<'a> {
    docs: &'a BTreeMap<String, Document>,
    staged: Vec<(String, Patch)>,
}

impl TransactionScope for MemoryTxScope<'_> {
    fn get(&self, path: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.docs.get(path).cloned())
    }

    fn update(&mut self, path: &str, patch: Patch) {
        self.staged.push((path.to_string(), patch));
    }
}
