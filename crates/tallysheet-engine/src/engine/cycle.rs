//! Circular reference detection during evaluation.
//!
//! Resolving a formula cell can evaluate further formula cells, so the
//! evaluator walks the reference graph depth first. [`EvalStack`] tracks the
//! cells currently being evaluated: entering a cell that is already on the
//! stack means the chain loops back on itself (A1 -> B1 -> A1). The stack
//! also caps chain length so very deep acyclic chains fail cleanly.

use std::collections::HashSet;

use super::{CellRef, EvalError};

/// Cells currently being evaluated, innermost last.
#[derive(Debug)]
pub struct EvalStack {
    visiting: HashSet<CellRef>,
    path: Vec<CellRef>,
    max_depth: usize,
}

impl EvalStack {
    pub fn new(max_depth: usize) -> EvalStack {
        EvalStack {
            visiting: HashSet::new(),
            path: Vec::new(),
            max_depth,
        }
    }

    /// Push a cell before evaluating its formula.
    pub fn enter(&mut self, cell: &CellRef) -> Result<(), EvalError> {
        if self.visiting.contains(cell) {
            tracing::debug!(cell = %cell, path = ?self.path_names(), "circular reference");
            return Err(EvalError::CircularReference(cell.clone()));
        }
        if self.path.len() >= self.max_depth {
            tracing::debug!(cell = %cell, depth = self.path.len(), "reference chain too deep");
            return Err(EvalError::DepthExceeded(self.max_depth));
        }
        self.visiting.insert(cell.clone());
        self.path.push(cell.clone());
        Ok(())
    }

    /// Pop the innermost cell once its formula has been evaluated.
    pub fn leave(&mut self) {
        if let Some(cell) = self.path.pop() {
            self.visiting.remove(&cell);
        }
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Cells on the stack, outermost first.
    pub fn path(&self) -> &[CellRef] {
        &self.path
    }

    fn path_names(&self) -> Vec<String> {
        self.path.iter().map(|c| c.to_string()).collect()
    }
}
