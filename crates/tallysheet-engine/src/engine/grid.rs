//! Read-only access to raw cell text.
//!
//! The evaluator never owns cell storage. It reads through [`GridAccessor`],
//! which any sparse or dense store can implement. Unset and out-of-bounds
//! cells read as the empty string.

use dashmap::DashMap;
use std::collections::HashMap;

use super::CellRef;

/// Thread-safe sparse grid storage of raw cell text.
pub type Grid = DashMap<CellRef, String>;

/// Source of raw cell text for evaluation.
pub trait GridAccessor {
    /// Raw text at (row, col), or `""` if the cell is unset or out of bounds.
    fn raw_text(&self, row: usize, col: usize) -> String;

    fn cell_text(&self, cell: &CellRef) -> String {
        self.raw_text(cell.row, cell.col)
    }
}

impl GridAccessor for DashMap<CellRef, String> {
    fn raw_text(&self, row: usize, col: usize) -> String {
        self.get(&CellRef::new(row, col))
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

impl GridAccessor for HashMap<CellRef, String> {
    fn raw_text(&self, row: usize, col: usize) -> String {
        self.get(&CellRef::new(row, col)).cloned().unwrap_or_default()
    }
}

/// Dense rows of text; ragged rows are fine.
impl GridAccessor for Vec<Vec<String>> {
    fn raw_text(&self, row: usize, col: usize) -> String {
        self.get(row)
            .and_then(|cells| cells.get(col))
            .cloned()
            .unwrap_or_default()
    }
}

impl<G: GridAccessor + ?Sized> GridAccessor for &G {
    fn raw_text(&self, row: usize, col: usize) -> String {
        (**self).raw_text(row, col)
    }
}
