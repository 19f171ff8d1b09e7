use crate::config::Config;
use tallysheet_engine::engine::{CellContent, CellRef, EvalOptions, Evaluator, Grid, scan_dependencies};
use std::collections::{HashMap, HashSet};

/// UI-agnostic document state for the spreadsheet.
pub struct Document {
    /// Raw cell text; formulas keep their leading '='.
    pub grid: Grid,
    /// Formula evaluator (stateless apart from its options)
    pub(crate) evaluator: Evaluator,
    /// Fixed decimal places for numeric displays
    pub decimals: Option<usize>,
    /// Whether the grid has been modified
    pub modified: bool,
    /// Reverse dependency map: cell -> cells whose formulas read it
    pub dependents: HashMap<CellRef, HashSet<CellRef>>,
    /// Formula cells reading ranges too large to track; invalidated on every edit
    pub untracked: HashSet<CellRef>,
    /// Display strings of formula cells, dropped when an input changes
    pub(crate) display_cache: HashMap<CellRef, String>,
}

impl Document {
    /// Create an empty document with default settings.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Document {
            grid: Grid::new(),
            evaluator: Evaluator::new(config.eval.clone()),
            decimals: config.decimals,
            modified: false,
            dependents: HashMap::new(),
            untracked: HashSet::new(),
            display_cache: HashMap::new(),
        }
    }

    pub fn eval_options(&self) -> &EvalOptions {
        self.evaluator.options()
    }

    /// Rebuild the reverse dependency map from the grid.
    /// Call this after cells are added, removed, or their formulas change.
    pub(crate) fn rebuild_dependents(&mut self) {
        let localized = self.evaluator.options().localized_names;
        self.dependents.clear();
        self.untracked.clear();
        for entry in self.grid.iter() {
            let CellContent::Formula(body) = CellContent::classify(entry.value()) else {
                continue;
            };
            let deps = scan_dependencies(body, localized);
            if deps.untracked {
                self.untracked.insert(entry.key().clone());
            }
            for dep in deps.cells {
                self.dependents
                    .entry(dep)
                    .or_default()
                    .insert(entry.key().clone());
            }
        }
    }

    /// Occupied cells in row-major order.
    pub fn cells(&self) -> Vec<CellRef> {
        let mut cells: Vec<CellRef> = self.grid.iter().map(|entry| entry.key().clone()).collect();
        cells.sort();
        cells
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
