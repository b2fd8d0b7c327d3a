use crate::cell::Cell;
use crate::document::{Comment, SheetDocument};
use std::sync::RwLock;
use thiserror::Error;

/// Failure taxonomy for store operations. The HTTP layer maps these to
/// status codes (400 / 404 / 500); the store itself never retries.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Process-wide owner of one [`SheetDocument`], the only sanctioned way to
/// read or mutate it.
///
/// Constructed once and injected into request handlers rather than living
/// as a module-level singleton. Every mutation runs under the write lock,
/// so the comment/flag invariant is re-established atomically; readers
/// share the read lock and never observe a half-applied mutation.
pub struct SheetStore {
    doc: RwLock<SheetDocument>,
}

impl SheetStore {
    pub fn new(rows: u32, cols: u32) -> Self {
        SheetStore {
            doc: RwLock::new(SheetDocument::new(rows, cols)),
        }
    }

    pub fn with_document(doc: SheetDocument) -> Self {
        SheetStore {
            doc: RwLock::new(doc),
        }
    }

    /// Returns an independent copy of the whole document. Mutating the
    /// result never affects stored state.
    pub fn document(&self) -> SheetDocument {
        self.doc.read().unwrap().clone()
    }

    /// Wholesale overwrite from a raw JSON payload. The shape check happens
    /// here at the boundary; a payload that does not parse into a
    /// [`SheetDocument`] is rejected as [`StoreError::InvalidDocument`] and
    /// leaves the stored document untouched.
    pub fn replace_from_json(&self, payload: &[u8]) -> Result<(), StoreError> {
        let doc: SheetDocument = serde_json::from_slice(payload)
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        self.replace_document(doc);
        Ok(())
    }

    /// Last writer wins; no merge with the previous document.
    pub fn replace_document(&self, doc: SheetDocument) {
        *self.doc.write().unwrap() = doc;
    }

    /// Exact-key lookup. Malformed or out-of-range ids are simply absent
    /// from the grid.
    pub fn cell(&self, cell_id: &str) -> Result<Cell, StoreError> {
        self.doc
            .read()
            .unwrap()
            .cell(cell_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("cell {} not found", cell_id)))
    }

    /// Merges a new value into an existing cell and returns the updated
    /// cell. Never creates cells; never touches the comment flag.
    pub fn update_cell(&self, cell_id: &str, value: String) -> Result<Cell, StoreError> {
        self.doc
            .write()
            .unwrap()
            .update_cell(cell_id, value)
            .ok_or_else(|| StoreError::NotFound(format!("cell {} not found", cell_id)))
    }

    pub fn comments_for_cell(&self, cell_id: &str) -> Vec<Comment> {
        self.doc.read().unwrap().comments_for_cell(cell_id)
    }

    pub fn add_comment(
        &self,
        cell_id: &str,
        content: &str,
        author: &str,
    ) -> Result<Comment, StoreError> {
        if content.is_empty() {
            return Err(StoreError::InvalidInput("comment content is empty".into()));
        }
        if author.is_empty() {
            return Err(StoreError::InvalidInput("comment author is empty".into()));
        }

        self.doc
            .write()
            .unwrap()
            .add_comment(cell_id, content, author)
            .ok_or_else(|| StoreError::NotFound(format!("cell {} not found", cell_id)))
    }

    /// `false` (not an error) when no comment with that id exists.
    pub fn delete_comment(&self, comment_id: &str) -> bool {
        self.doc.write().unwrap().delete_comment(comment_id)
    }
}
