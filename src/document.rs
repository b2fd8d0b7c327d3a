use crate::cell::Cell;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// An authored annotation attached to exactly one cell.
///
/// Comments are immutable after creation; they are only ever appended to
/// or removed from a document's comment list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub cell_id: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// The full in-memory state of one spreadsheet: a dense grid of cells
/// keyed by `"<row>-<col>"` plus the ordered comment list.
///
/// Invariant: `cell.has_comment` is true exactly when at least one entry
/// in `comments` references that cell. [`add_comment`](Self::add_comment)
/// and [`delete_comment`](Self::delete_comment) re-establish it on every
/// mutation; nothing else may write the flag.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SheetDocument {
    pub cells: HashMap<String, Cell>,
    pub comments: Vec<Comment>,
}

/// Short values used by [`SheetDocument::seed_sample_values`].
const SAMPLE_WORDS: &[&str] = &[
    "Alice", "Bob", "Carol", "David", "Emma", "Frank", "Grace", "Henry", "total", "draft",
    "pending", "done", "review", "north", "south", "retail", "wholesale", "invoice",
];

impl SheetDocument {
    /// Allocates every cell of a `rows` x `cols` grid eagerly, all with
    /// empty values and no comments.
    pub fn new(rows: u32, cols: u32) -> Self {
        let mut cells = HashMap::with_capacity((rows * cols) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let cell = Cell::create(row, col);
                cells.insert(cell.id.clone(), cell);
            }
        }
        SheetDocument {
            cells,
            comments: Vec::new(),
        }
    }

    /// Fills roughly half the cells with short demo values (names or small
    /// integers). Only `value` is touched; comment flags stay derived.
    pub fn seed_sample_values<R: Rng>(&mut self, rng: &mut R) {
        for cell in self.cells.values_mut() {
            if rng.gen_bool(0.5) {
                cell.value = if rng.gen_bool(0.5) {
                    SAMPLE_WORDS.choose(rng).unwrap_or(&"").to_string()
                } else {
                    rng.gen_range(1..=100).to_string()
                };
            }
        }
    }

    pub fn cell(&self, cell_id: &str) -> Option<&Cell> {
        self.cells.get(cell_id)
    }

    /// Merges a new value into an existing cell. Never creates cells and
    /// never touches `has_comment`. `None` if the id is not in the grid.
    pub fn update_cell(&mut self, cell_id: &str, value: String) -> Option<Cell> {
        let cell = self.cells.get_mut(cell_id)?;
        cell.value = value;
        Some(cell.clone())
    }

    /// All comments referencing `cell_id`, in insertion order. Empty when
    /// there are none (an unknown id is indistinguishable from a cell
    /// without comments here).
    pub fn comments_for_cell(&self, cell_id: &str) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| c.cell_id == cell_id)
            .cloned()
            .collect()
    }

    /// Appends a freshly-stamped comment and sets the target cell's flag.
    /// `None` if the cell does not exist; the comment list is untouched in
    /// that case.
    pub fn add_comment(&mut self, cell_id: &str, content: &str, author: &str) -> Option<Comment> {
        let cell = self.cells.get_mut(cell_id)?;

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            cell_id: cell_id.to_string(),
            content: content.to_string(),
            author: author.to_string(),
            created_at: Utc::now(),
        };

        self.comments.push(comment.clone());
        cell.has_comment = true;

        Some(comment)
    }

    /// Removes the comment with the given id and recomputes the affected
    /// cell's flag from the surviving comments. `false` if no such comment
    /// existed.
    pub fn delete_comment(&mut self, comment_id: &str) -> bool {
        let Some(index) = self.comments.iter().position(|c| c.id == comment_id) else {
            return false;
        };

        let deleted = self.comments.remove(index);

        let still_commented = self.comments.iter().any(|c| c.cell_id == deleted.cell_id);
        if !still_commented {
            if let Some(cell) = self.cells.get_mut(&deleted.cell_id) {
                cell.has_comment = false;
            }
        }

        true
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flag_invariant_holds(doc: &SheetDocument) -> bool {
        doc.cells.values().all(|cell| {
            cell.has_comment == doc.comments.iter().any(|c| c.cell_id == cell.id)
        })
    }

    #[test]
    fn new_grid_is_dense_and_empty() {
        let doc = SheetDocument::new(20, 10);
        assert_eq!(doc.cells.len(), 200);
        assert!(doc.comments.is_empty());
        assert!(doc.cells.values().all(|c| c.value.is_empty() && !c.has_comment));
        assert!(doc.cell("0-0").is_some());
        assert!(doc.cell("19-9").is_some());
        assert!(doc.cell("20-0").is_none());
    }

    #[test]
    fn update_cell_only_touches_value() {
        let mut doc = SheetDocument::new(20, 10);
        let cell = doc.update_cell("0-0", "42".to_string()).unwrap();
        assert_eq!(cell.value, "42");
        assert!(!cell.has_comment);
        assert_eq!(doc.cell("0-0").unwrap().value, "42");
        assert!(doc.update_cell("999-999", "x".to_string()).is_none());
        assert_eq!(doc.cells.len(), 200);
    }

    #[test]
    fn add_comment_sets_flag_and_stamps_fields() {
        let mut doc = SheetDocument::new(20, 10);
        let comment = doc.add_comment("0-0", "Check this", "Alice").unwrap();
        assert!(!comment.id.is_empty());
        assert_eq!(comment.cell_id, "0-0");
        assert_eq!(comment.content, "Check this");
        assert_eq!(comment.author, "Alice");
        assert!(doc.cell("0-0").unwrap().has_comment);
        assert!(flag_invariant_holds(&doc));
    }

    #[test]
    fn add_comment_to_missing_cell_is_a_no_op() {
        let mut doc = SheetDocument::new(20, 10);
        assert!(doc.add_comment("999-999", "x", "a").is_none());
        assert!(doc.comments.is_empty());
        assert!(flag_invariant_holds(&doc));
    }

    #[test]
    fn deleting_one_of_two_comments_keeps_the_flag() {
        let mut doc = SheetDocument::new(20, 10);
        let first = doc.add_comment("3-4", "first", "Alice").unwrap();
        let second = doc.add_comment("3-4", "second", "Bob").unwrap();

        assert!(doc.delete_comment(&first.id));
        assert!(doc.cell("3-4").unwrap().has_comment);
        assert!(flag_invariant_holds(&doc));

        assert!(doc.delete_comment(&second.id));
        assert!(!doc.cell("3-4").unwrap().has_comment);
        assert!(doc.comments_for_cell("3-4").is_empty());
        assert!(flag_invariant_holds(&doc));
    }

    #[test]
    fn delete_unknown_comment_returns_false() {
        let mut doc = SheetDocument::new(20, 10);
        doc.add_comment("0-0", "keep me", "Alice").unwrap();
        assert!(!doc.delete_comment("no-such-id"));
        assert_eq!(doc.comments.len(), 1);
        assert!(doc.cell("0-0").unwrap().has_comment);
    }

    #[test]
    fn comments_preserve_insertion_order() {
        let mut doc = SheetDocument::new(20, 10);
        doc.add_comment("1-1", "one", "Alice").unwrap();
        doc.add_comment("2-2", "other cell", "Bob").unwrap();
        doc.add_comment("1-1", "two", "Bob").unwrap();
        doc.add_comment("1-1", "three", "Alice").unwrap();

        let contents: Vec<_> = doc
            .comments_for_cell("1-1")
            .into_iter()
            .map(|c| c.content)
            .collect();
        assert_eq!(contents, ["one", "two", "three"]);
    }

    #[test]
    fn seeding_fills_values_but_never_flags() {
        let mut doc = SheetDocument::new(20, 10);
        let mut rng = StdRng::seed_from_u64(7);
        doc.seed_sample_values(&mut rng);

        assert!(doc.cells.values().any(|c| !c.value.is_empty()));
        assert!(doc.cells.values().all(|c| !c.has_comment));
        assert!(doc.comments.is_empty());
    }

    #[test]
    fn document_serializes_with_wire_field_names() {
        let mut doc = SheetDocument::new(1, 1);
        doc.add_comment("0-0", "hello", "Alice").unwrap();

        let value = serde_json::to_value(&doc).unwrap();
        let cell = &value["cells"]["0-0"];
        assert_eq!(cell["hasComment"], true);
        let comment = &value["comments"][0];
        assert_eq!(comment["cellId"], "0-0");
        assert!(comment["createdAt"].is_string());

        let back: SheetDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }
}
