//! Range parsing and expansion.
//!
//! A range is either one reference (`A1`) or two joined by a colon
//! (`A1:B5`). Two-reference ranges cover the rectangle between their
//! corners in either order, so `A5:A1` is the same range as `A1:A5`.
//!
//! Expansion resolves every covered cell (evaluating formula cells on the
//! way) and keeps the ones that coerce to a number. A single reference
//! behaves differently: a non-numeric cell counts as one zero.

use super::eval::Session;
use super::{CellRef, EvalError, GridAccessor};

/// A parsed range expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RangeRef {
    Single(CellRef),
    Area { start: CellRef, end: CellRef },
}

impl RangeRef {
    /// Parse `REF` or `REF:REF`. Returns None for anything else.
    pub fn parse(range: &str) -> Option<RangeRef> {
        let parts: Vec<&str> = range.split(':').collect();
        match parts.as_slice() {
            [single] => Some(RangeRef::Single(CellRef::from_str(single)?)),
            [start, end] => Some(RangeRef::Area {
                start: CellRef::from_str(start)?,
                end: CellRef::from_str(end)?,
            }),
            _ => None,
        }
    }

    /// Top-left corner.
    pub fn min(&self) -> CellRef {
        match self {
            RangeRef::Single(cell) => cell.clone(),
            RangeRef::Area { start, end } => {
                CellRef::new(start.row.min(end.row), start.col.min(end.col))
            }
        }
    }

    /// Bottom-right corner.
    pub fn max(&self) -> CellRef {
        match self {
            RangeRef::Single(cell) => cell.clone(),
            RangeRef::Area { start, end } => {
                CellRef::new(start.row.max(end.row), start.col.max(end.col))
            }
        }
    }

    /// Number of covered cells, or None if it overflows `usize`.
    pub fn cell_count(&self) -> Option<usize> {
        let (min, max) = (self.min(), self.max());
        let rows = (max.row - min.row).checked_add(1)?;
        let cols = (max.col - min.col).checked_add(1)?;
        rows.checked_mul(cols)
    }

    /// Covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + use<> {
        let (min, max) = (self.min(), self.max());
        let (min_col, max_col) = (min.col, max.col);
        (min.row..=max.row)
            .flat_map(move |row| (min_col..=max_col).map(move |col| CellRef::new(row, col)))
    }
}

impl<G: GridAccessor + ?Sized> Session<'_, G> {
    /// Expand a normalized range expression into numbers.
    pub(crate) fn expand(&mut self, range: &str) -> Result<Vec<f64>, EvalError> {
        let parsed =
            RangeRef::parse(range).ok_or_else(|| EvalError::MalformedRange(range.to_string()))?;

        match parsed {
            RangeRef::Single(cell) => {
                let value = self.resolve_cell(&cell)?;
                Ok(vec![value.as_number_or_zero()])
            }
            area => {
                let limit = self.max_range_cells();
                match area.cell_count() {
                    Some(count) if count <= limit => {}
                    _ => {
                        return Err(EvalError::RangeTooLarge {
                            range: range.to_string(),
                            limit,
                        });
                    }
                }
                let mut values = Vec::new();
                for cell in area.cells() {
                    if let Some(n) = self.resolve_cell(&cell)?.as_number() {
                        values.push(n);
                    }
                }
                Ok(values)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Evaluator;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn grid(cells: &[(&str, &str)]) -> HashMap<CellRef, String> {
        cells
            .iter()
            .map(|(name, text)| (CellRef::from_str(name).unwrap(), text.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(
            RangeRef::parse("A1"),
            Some(RangeRef::Single(CellRef::new(0, 0)))
        );
        assert_eq!(
            RangeRef::parse("B2:C5"),
            Some(RangeRef::Area {
                start: CellRef::new(1, 1),
                end: CellRef::new(4, 2),
            })
        );
        assert_eq!(RangeRef::parse("A1:B2:C3"), None);
        assert_eq!(RangeRef::parse("A1:"), None);
        assert_eq!(RangeRef::parse("5"), None);
        assert_eq!(RangeRef::parse(""), None);
    }

    #[test]
    fn test_cells_row_major() {
        let range = RangeRef::parse("B2:A1").unwrap();
        let cells: Vec<String> = range.cells().map(|c| c.to_string()).collect();
        assert_eq!(cells, vec!["A1", "B1", "A2", "B2"]);
        assert_eq!(range.cell_count(), Some(4));
    }

    #[test]
    fn test_order_independent() {
        let forward: Vec<CellRef> = RangeRef::parse("A1:A3").unwrap().cells().collect();
        let backward: Vec<CellRef> = RangeRef::parse("A3:A1").unwrap().cells().collect();
        assert_eq!(forward, backward);

        let g = grid(&[("A1", "1"), ("A2", "2"), ("A3", "3")]);
        let evaluator = Evaluator::default();
        assert_eq!(
            evaluator.expand_range("A3:A1", &g).unwrap(),
            evaluator.expand_range("A1:A3", &g).unwrap()
        );
    }

    #[test]
    fn test_area_skips_non_numeric() {
        let g = grid(&[("A1", "x"), ("A2", "4"), ("A4", "=A2*2")]);
        let values = Evaluator::default().expand_range("A1:A4", &g).unwrap();
        assert_eq!(values, vec![4.0, 8.0]);
    }

    #[test]
    fn test_single_reference_substitutes_zero() {
        let g = grid(&[("A1", "x")]);
        let evaluator = Evaluator::default();
        assert_eq!(evaluator.expand_range("A1", &g).unwrap(), vec![0.0]);
        assert_eq!(evaluator.expand_range("Z99", &g).unwrap(), vec![0.0]);
        assert_eq!(evaluator.expand_range("A1:A1", &g).unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn test_malformed_range_is_an_error() {
        let g = grid(&[]);
        let err = Evaluator::default().expand_range("A1:B", &g).unwrap_err();
        assert_eq!(err, EvalError::MalformedRange("A1:B".to_string()));
    }

    #[test]
    fn test_area_over_limit_is_an_error() {
        let g = grid(&[("A1", "1")]);
        let small = Evaluator::new(crate::engine::EvalOptions {
            max_range_cells: 4,
            ..Default::default()
        });
        assert_eq!(small.expand_range("A1:B2", &g), Ok(vec![1.0]));
        let err = small.expand_range("A1:C2", &g).unwrap_err();
        assert_eq!(
            err,
            EvalError::RangeTooLarge {
                range: "A1:C2".to_string(),
                limit: 4
            }
        );
        // A single reference is never refused.
        assert_eq!(small.expand_range("Z99", &g), Ok(vec![0.0]));
    }

    #[test]
    fn test_huge_area_fails_fast() {
        let err = Evaluator::default()
            .expand_range("A1:ZZZZ99999999", &grid(&[]))
            .unwrap_err();
        assert_eq!(err.kind(), crate::engine::EvalErrorKind::RangeTooLarge);
    }
}
