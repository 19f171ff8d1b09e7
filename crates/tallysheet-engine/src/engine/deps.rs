//! Dependency extraction from formula strings.
//!
//! Finds every cell a formula body reads, following the same dispatch as the
//! evaluator: the range of a `SUM`/`AVERAGE` call, the reference inside
//! `SQRT`, or the reference operands of an arithmetic formula. The document
//! uses this to invalidate cached displays of dependent cells.

use super::preprocess::{Token, normalize_formula, tokenize};
use super::range::RangeRef;
use super::CellRef;
use crate::functions::{BuiltinKind, match_call};

/// Ranges covering more cells than this are not expanded into dependencies.
pub const MAX_DEPENDENCY_RANGE_CELLS: usize = 1_000_000;

/// Cells a formula reads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dependencies {
    pub cells: Vec<CellRef>,
    /// The formula reads a range too large to list; its inputs are unknown.
    pub untracked: bool,
}

/// Extract all cell references from a formula body (without '=').
///
/// Ranges larger than [`MAX_DEPENDENCY_RANGE_CELLS`] are left out; use
/// [`scan_dependencies`] to find out whether that happened.
pub fn extract_dependencies(formula: &str, localized: bool) -> Vec<CellRef> {
    scan_dependencies(formula, localized).cells
}

/// Like [`extract_dependencies`], also flagging formulas whose range could
/// not be listed.
pub fn scan_dependencies(formula: &str, localized: bool) -> Dependencies {
    let normalized = normalize_formula(formula);

    let Some((builtin, arg)) = match_call(&normalized, localized) else {
        let cells = tokenize(&normalized)
            .into_iter()
            .filter_map(|token| match token {
                Token::Operand(text) => CellRef::from_str(text),
                Token::Op(_) => None,
            })
            .collect();
        return Dependencies { cells, untracked: false };
    };

    match builtin.kind {
        BuiltinKind::Sum | BuiltinKind::Average => {
            // Unparseable ranges fail the same way whatever the grid holds.
            let Some(range) = RangeRef::parse(arg) else {
                return Dependencies::default();
            };
            match range.cell_count() {
                Some(count) if count <= MAX_DEPENDENCY_RANGE_CELLS => Dependencies {
                    cells: range.cells().collect(),
                    untracked: false,
                },
                _ => Dependencies {
                    cells: Vec::new(),
                    untracked: true,
                },
            }
        }
        BuiltinKind::Sqrt => Dependencies {
            cells: CellRef::from_str(arg).into_iter().collect(),
            untracked: false,
        },
    }
}
