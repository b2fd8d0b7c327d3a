use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref CELL_ID_REGEX: Regex = Regex::new(r"^(\d+)-(\d+)$").unwrap();
}

/// Composite key addressing one grid position.
///
/// The wire encoding is `"<row>-<col>"`, zero-indexed (e.g. `"0-0"` is the
/// top-left cell). Display labels follow spreadsheet convention instead:
/// column letter plus one-indexed row, so `"0-0"` displays as `A1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellId {
    pub row: u32,
    pub col: u32,
}

impl CellId {
    pub fn new(row: u32, col: u32) -> Self {
        CellId { row, col }
    }

    /// Parses the `"<row>-<col>"` encoding. Returns `None` for anything
    /// that is not two dash-separated non-negative integers.
    pub fn parse(id: &str) -> Option<Self> {
        let caps = CELL_ID_REGEX.captures(id)?;
        let row = caps[1].parse().ok()?;
        let col = caps[2].parse().ok()?;
        Some(CellId { row, col })
    }

    /// Spreadsheet-style display label, e.g. `A1` for row 0 / col 0.
    /// Columns past `Z` continue with two letters (`AA`, `AB`, ...).
    pub fn label(&self) -> String {
        let mut letters = String::new();
        let mut c = self.col;
        loop {
            letters.insert(0, (b'A' + (c % 26) as u8) as char);
            if c < 26 {
                break;
            }
            c = c / 26 - 1;
        }
        format!("{}{}", letters, self.row + 1)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

/// One addressable grid position holding a text value and a
/// comment-presence flag.
///
/// `has_comment` is derived state owned by the comment operations on
/// [`SheetDocument`](crate::document::SheetDocument); cell updates never
/// touch it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub id: String,
    pub row: u32,
    pub col: u32,
    pub value: String,
    pub has_comment: bool,
}

impl Cell {
    pub fn create(row: u32, col: u32) -> Self {
        Cell {
            id: CellId::new(row, col).to_string(),
            row,
            col,
            value: String::new(),
            has_comment: false,
        }
    }
}
