use super::Document;
use tallysheet_engine::engine::{
    CellContent, CellRef, EvalResult, GridAccessor, Value, display_result,
};

impl Document {
    /// Raw text of a cell, as typed (formulas keep their '=').
    pub fn raw_text(&self, cell_ref: &CellRef) -> String {
        self.grid.cell_text(cell_ref)
    }

    /// Get the display value for a cell.
    ///
    /// Formula cells show their result, or `#ERROR: <message>`; every other
    /// cell shows its text unchanged.
    pub fn get_cell_display(&mut self, cell_ref: &CellRef) -> String {
        if let Some(cached) = self.display_cache.get(cell_ref) {
            return cached.clone();
        }

        let raw = self.raw_text(cell_ref);
        if !CellContent::classify(&raw).is_formula() {
            return raw;
        }

        let result = self.evaluator.evaluate_cell(cell_ref, &self.grid);
        if let Err(err) = &result {
            tracing::debug!(cell = %cell_ref, %err, "formula failed");
        }
        let display = display_result(&result, self.decimals);
        self.display_cache.insert(cell_ref.clone(), display.clone());
        display
    }

    /// Typed result for a cell, for callers that need to tell failures apart
    /// without looking at display strings. Not cached.
    pub fn evaluate_cell(&self, cell_ref: &CellRef) -> EvalResult<Value> {
        self.evaluator.evaluate_cell(cell_ref, &self.grid)
    }

    /// Evaluate ad-hoc text against the document without storing it.
    /// The leading '=' is optional.
    pub fn evaluate_input(&self, input: &str) -> EvalResult<Value> {
        let trimmed = input.trim();
        let body = trimmed.strip_prefix('=').unwrap_or(trimmed);
        self.evaluator.evaluate(body, &self.grid)
    }
}
