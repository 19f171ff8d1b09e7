use super::Document;
use crate::error::{Result, TallysheetError};
use std::collections::HashSet;
use tallysheet_engine::engine::CellRef;

impl Document {
    /// Drop cached displays of the changed cell and everything that depends
    /// on it, transitively. Cells in `untracked` may read anything, so they
    /// and their dependents are dropped too. Returns those cells, the changed
    /// cell first.
    fn invalidate_from(&mut self, changed_cell: &CellRef) -> Vec<CellRef> {
        let mut affected = Vec::new();
        let mut to_process: Vec<CellRef> = self.untracked.iter().cloned().collect();
        to_process.sort_by(|a, b| b.cmp(a));
        to_process.push(changed_cell.clone());
        let mut visited = HashSet::new();
        while let Some(cell_ref) = to_process.pop() {
            if !visited.insert(cell_ref.clone()) {
                continue;
            }
            self.display_cache.remove(&cell_ref);
            if let Some(deps) = self.dependents.get(&cell_ref) {
                let mut deps: Vec<CellRef> = deps.iter().cloned().collect();
                // Stable notification order.
                deps.sort_by(|a, b| b.cmp(a));
                to_process.extend(deps);
            }
            affected.push(cell_ref);
        }
        affected
    }

    /// Set cell contents from input string.
    ///
    /// This is the content-change notification: the raw text is stored
    /// (surrounding whitespace trimmed, empty input clears the cell) and the
    /// cells whose display may have changed are returned.
    pub fn set_cell_from_input(&mut self, cell_ref: CellRef, input: &str) -> Vec<CellRef> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            self.grid.remove(&cell_ref);
        } else {
            self.grid.insert(cell_ref.clone(), trimmed.to_string());
        }
        self.modified = true;

        self.rebuild_dependents();
        let affected = self.invalidate_from(&cell_ref);
        tracing::debug!(cell = %cell_ref, affected = affected.len(), "cell changed");
        affected
    }

    /// Same as [`Document::set_cell_from_input`], addressing the cell as "A1".
    pub fn set_cell_by_name(&mut self, name: &str, input: &str) -> Result<Vec<CellRef>> {
        let cell_ref = CellRef::from_str(name.trim())
            .ok_or_else(|| TallysheetError::InvalidReference(name.to_string()))?;
        Ok(self.set_cell_from_input(cell_ref, input))
    }

    /// Clear the specified cell
    pub fn clear_cell(&mut self, cell_ref: &CellRef) -> Vec<CellRef> {
        self.set_cell_from_input(cell_ref.clone(), "")
    }
}
