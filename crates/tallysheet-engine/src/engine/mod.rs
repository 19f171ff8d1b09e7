//! Spreadsheet formula engine API.
//!
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`GridAccessor`], [`Grid`] - Read access to raw cell text
//! - [`CellContent`], [`Value`] - Classification of raw text and evaluated values
//! - [`RangeRef`] - `A1` / `A1:B5` range parsing and iteration
//! - [`Evaluator`] - Formula evaluation with recursive reference resolution
//! - [`extract_dependencies`] - Cells a formula reads
//! - [`format_value`], [`format_error`] - Display strings

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod error;
mod eval;
mod format;
mod grid;
mod preprocess;
mod range;

pub use cell::{CellContent, Value};
pub use cell_ref::CellRef;
pub use cycle::EvalStack;
pub use deps::{Dependencies, MAX_DEPENDENCY_RANGE_CELLS, extract_dependencies, scan_dependencies};
pub use error::{EvalError, EvalErrorKind, EvalResult};
pub use eval::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_RANGE_CELLS, EvalOptions, Evaluator, evaluate};
pub use format::{MAX_DECIMALS, display_result, format_error, format_number, format_value};
pub use grid::{Grid, GridAccessor};
pub use preprocess::{Op, Token, normalize_formula, tokenize};
pub use range::RangeRef;
