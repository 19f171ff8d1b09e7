//! Formula evaluation.
//!
//! A formula body (the cell text after '=') is normalized, then dispatched:
//! a whole-formula call to a built-in (`SUM`, `AVERAGE`, `SQRT`) or else a
//! flat arithmetic expression reduced strictly left to right, with no
//! operator precedence and no parentheses. `2+3*4` is `(2+3)*4`.
//!
//! Cell references are resolved through a [`GridAccessor`]. A referenced
//! cell holding its own formula is evaluated recursively, every time; nothing
//! is cached between calls.

use super::cycle::EvalStack;
use super::preprocess::{Token, normalize_formula, tokenize};
use super::{CellContent, CellRef, EvalError, EvalResult, GridAccessor, Value};
use crate::functions::{BuiltinKind, match_call};

/// Default bound on nested formula references.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Default bound on the number of cells one range may cover.
pub const DEFAULT_MAX_RANGE_CELLS: usize = 1_000_000;

/// Evaluator settings.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalOptions {
    /// Longest chain of formula cells referencing formula cells.
    pub max_depth: usize,
    /// Accept `SUMA`, `PROMEDIO` and `RAIZ` as aliases.
    pub localized_names: bool,
    /// Largest rectangle `SUM`/`AVERAGE` will walk.
    pub max_range_cells: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            localized_names: true,
            max_range_cells: DEFAULT_MAX_RANGE_CELLS,
        }
    }
}

/// Stateless formula evaluator. Holds only its options; the grid is passed
/// to every call and never modified.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    options: EvalOptions,
}

impl Evaluator {
    pub fn new(options: EvalOptions) -> Evaluator {
        Evaluator { options }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Evaluate a formula body (without the leading '=').
    pub fn evaluate<G: GridAccessor + ?Sized>(&self, formula: &str, grid: &G) -> EvalResult<Value> {
        Session::new(&self.options, grid).eval_formula(formula)
    }

    /// Resolve a cell: formulas are evaluated, anything else is returned as text.
    pub fn evaluate_cell<G: GridAccessor + ?Sized>(
        &self,
        cell: &CellRef,
        grid: &G,
    ) -> EvalResult<Value> {
        Session::new(&self.options, grid).resolve_cell(cell)
    }

    /// Expand a range expression (`A1` or `A1:B5`) into its numeric values.
    pub fn expand_range<G: GridAccessor + ?Sized>(
        &self,
        range: &str,
        grid: &G,
    ) -> EvalResult<Vec<f64>> {
        Session::new(&self.options, grid).expand(&normalize_formula(range))
    }
}

/// Evaluate a formula body with default options.
pub fn evaluate<G: GridAccessor + ?Sized>(formula: &str, grid: &G) -> EvalResult<Value> {
    Evaluator::default().evaluate(formula, grid)
}

// Starts from +0.0 so an empty range displays as "0", not "-0".
fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, n| acc + n)
}

/// State of one top-level evaluation: the grid and the cells in progress.
pub(crate) struct Session<'a, G: ?Sized> {
    options: &'a EvalOptions,
    grid: &'a G,
    stack: EvalStack,
}

impl<'a, G: GridAccessor + ?Sized> Session<'a, G> {
    fn new(options: &'a EvalOptions, grid: &'a G) -> Self {
        Session {
            options,
            grid,
            stack: EvalStack::new(options.max_depth),
        }
    }

    pub(crate) fn max_range_cells(&self) -> usize {
        self.options.max_range_cells
    }

    pub(crate) fn eval_formula(&mut self, formula: &str) -> EvalResult<Value> {
        let normalized = normalize_formula(formula);

        let Some((builtin, arg)) = match_call(&normalized, self.options.localized_names) else {
            return self.eval_arithmetic(&normalized);
        };

        match builtin.kind {
            BuiltinKind::Sum => {
                let values = self.expand(arg)?;
                Ok(Value::Scalar(sum(&values)))
            }
            BuiltinKind::Average => {
                let values = self.expand(arg)?;
                if values.is_empty() {
                    return Ok(Value::Scalar(0.0));
                }
                Ok(Value::Scalar(sum(&values) / values.len() as f64))
            }
            BuiltinKind::Sqrt => {
                let n = self.single_argument(builtin.name, arg)?;
                if n < 0.0 {
                    return Err(EvalError::Domain {
                        function: builtin.name,
                        value: n,
                    });
                }
                Ok(Value::Scalar(n.sqrt()))
            }
        }
    }

    fn eval_arithmetic(&mut self, formula: &str) -> EvalResult<Value> {
        let mut acc: Option<f64> = None;
        let mut pending = None;

        // The tokenizer puts an operator between any two operands, so once
        // `acc` is seeded there is always a pending operator. A leading
        // operator is dropped with the seed.
        for token in tokenize(formula) {
            match token {
                Token::Op(op) => pending = Some(op),
                Token::Operand(text) => {
                    let rhs = self.operand(text)?;
                    acc = Some(match (acc, pending.take()) {
                        (Some(lhs), Some(op)) => op.apply(lhs, rhs),
                        _ => rhs,
                    });
                }
            }
        }

        Ok(acc.map(Value::Scalar).unwrap_or_else(Value::empty))
    }

    /// Reference -> resolved cell value, literal -> parsed number; zero on failure.
    fn operand(&mut self, text: &str) -> EvalResult<f64> {
        match CellRef::from_str(text) {
            Some(cell) => Ok(self.resolve_cell(&cell)?.as_number_or_zero()),
            None => Ok(text.parse::<f64>().unwrap_or(0.0)),
        }
    }

    /// SQRT's argument: one reference through the range path, or a literal.
    fn single_argument(&mut self, function: &'static str, arg: &str) -> EvalResult<f64> {
        if CellRef::from_str(arg).is_some() {
            let values = self.expand(arg)?;
            return Ok(values.first().copied().unwrap_or(0.0));
        }
        arg.parse::<f64>()
            .map_err(|_| EvalError::MalformedArgument {
                function,
                argument: arg.to_string(),
            })
    }

    pub(crate) fn resolve_cell(&mut self, cell: &CellRef) -> EvalResult<Value> {
        let raw = self.grid.cell_text(cell);
        match CellContent::classify(&raw) {
            CellContent::Empty => Ok(Value::empty()),
            CellContent::Literal(text) => Ok(Value::Text(text.to_string())),
            CellContent::Formula(body) => {
                tracing::trace!(cell = %cell, depth = self.stack.depth(), "evaluating referenced formula");
                self.stack.enter(cell)?;
                let result = self.eval_formula(body);
                self.stack.leave();
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EvalErrorKind;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn grid(cells: &[(&str, &str)]) -> HashMap<CellRef, String> {
        cells
            .iter()
            .map(|(name, text)| (CellRef::from_str(name).unwrap(), text.to_string()))
            .collect()
    }

    fn scalar(formula: &str, cells: &[(&str, &str)]) -> f64 {
        match evaluate(formula, &grid(cells)) {
            Ok(Value::Scalar(n)) => n,
            other => panic!("{formula}: expected a number, got {other:?}"),
        }
    }

    #[test]
    fn test_sum_range() {
        assert_eq!(scalar("SUM(A1:A3)", &[("A1", "1"), ("A2", "2"), ("A3", "3")]), 6.0);
        assert_eq!(scalar("sum( a1 : a3 )", &[("A1", "1"), ("A2", "2"), ("A3", "3")]), 6.0);
    }

    #[test]
    fn test_sum_of_empty_range_is_zero() {
        assert_eq!(scalar("SUM(B1:C9)", &[]), 0.0);
    }

    #[test]
    fn test_sum_rectangle_with_formulas() {
        let cells = [("A1", "1"), ("B1", "2"), ("A2", "=A1+B1"), ("B2", "hello")];
        assert_eq!(scalar("SUM(A1:B2)", &cells), 6.0);
    }

    #[test]
    fn test_average_excludes_non_numeric() {
        assert_eq!(scalar("AVERAGE(A1:A2)", &[("A1", "x"), ("A2", "4")]), 4.0);
    }

    #[test]
    fn test_average_of_nothing_is_zero() {
        assert_eq!(scalar("AVERAGE(A1:A5)", &[("A1", "x")]), 0.0);
    }

    #[test]
    fn test_average_single_reference_counts_zero() {
        assert_eq!(scalar("AVERAGE(A1)", &[("A1", "x")]), 0.0);
        assert_eq!(scalar("AVERAGE(A1)", &[("A1", "9")]), 9.0);
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(scalar("SQRT(A1)", &[("A1", "16")]), 4.0);
        assert_eq!(scalar("SQRT(2.25)", &[]), 1.5);
        assert_eq!(scalar("SQRT(A1)", &[("A1", "text")]), 0.0);
    }

    #[test]
    fn test_sqrt_negative_is_domain_error() {
        let err = evaluate("SQRT(A1)", &grid(&[("A1", "-4")])).unwrap_err();
        assert_eq!(err.kind(), EvalErrorKind::DomainError);
        assert_eq!(err.to_string(), "math domain error: SQRT of -4");
    }

    #[test]
    fn test_sqrt_malformed_argument() {
        let err = evaluate("SQRT(abc)", &grid(&[])).unwrap_err();
        assert_eq!(
            err,
            EvalError::MalformedArgument {
                function: "SQRT",
                argument: "ABC".to_string(),
            }
        );
    }

    #[test]
    fn test_no_precedence() {
        assert_eq!(scalar("2+3*4", &[]), 20.0);
        assert_eq!(scalar("10-4/2", &[]), 3.0);
    }

    #[test]
    fn test_division_by_zero_is_zero() {
        assert_eq!(scalar("A1/B1", &[("A1", "10"), ("B1", "0")]), 0.0);
        assert_eq!(scalar("A1/B1", &[("A1", "10")]), 0.0);
    }

    #[test]
    fn test_bad_tokens_coerce_to_zero() {
        assert_eq!(scalar("5+FOO", &[]), 5.0);
        assert_eq!(scalar("A1+1", &[("A1", "not a number")]), 1.0);
        assert_eq!(scalar("A0+1", &[]), 1.0);
    }

    #[test]
    fn test_leading_minus_is_an_operator() {
        // The seed ignores the pending operator, so the sign is lost.
        assert_eq!(scalar("-5+3", &[]), 8.0);
        assert_eq!(scalar("2*-3", &[]), -1.0);
    }

    #[test]
    fn test_each_operand_uses_latest_operator() {
        assert_eq!(scalar("10-2/4*3", &[]), 6.0);
        assert_eq!(scalar("1+2--3", &[]), 0.0);
        assert_eq!(scalar("7", &[]), 7.0);
    }

    #[test]
    fn test_no_operands_is_empty_text() {
        let g = grid(&[]);
        assert_eq!(evaluate("", &g), Ok(Value::empty()));
        assert_eq!(evaluate("+-", &g), Ok(Value::empty()));
    }

    #[test]
    fn test_recursive_reference() {
        let g = grid(&[("A1", "=B1"), ("B1", "5")]);
        let evaluator = Evaluator::default();
        assert_eq!(
            evaluator.evaluate_cell(&CellRef::new(0, 0), &g),
            Ok(Value::Scalar(5.0))
        );
    }

    #[test]
    fn test_chained_formulas() {
        let cells = [("A1", "=B1*2"), ("B1", "=C1+1"), ("C1", "=SUM(D1:D2)"), ("D1", "1"), ("D2", "2")];
        assert_eq!(scalar("A1", &cells), 8.0);
    }

    #[test]
    fn test_non_formula_cell_is_unchanged() {
        let g = grid(&[("A1", "42"), ("B1", " some text ")]);
        let evaluator = Evaluator::default();
        assert_eq!(
            evaluator.evaluate_cell(&CellRef::new(0, 0), &g),
            Ok(Value::Text("42".to_string()))
        );
        assert_eq!(
            evaluator.evaluate_cell(&CellRef::new(0, 1), &g),
            Ok(Value::Text(" some text ".to_string()))
        );
    }

    #[test]
    fn test_circular_reference() {
        let g = grid(&[("A1", "=B1"), ("B1", "=A1")]);
        let err = Evaluator::default()
            .evaluate_cell(&CellRef::new(0, 0), &g)
            .unwrap_err();
        assert_eq!(err, EvalError::CircularReference(CellRef::new(0, 0)));
    }

    #[test]
    fn test_self_reference_through_range() {
        let g = grid(&[("A1", "1"), ("A3", "=SUM(A1:A3)")]);
        let err = Evaluator::default()
            .evaluate_cell(&CellRef::new(2, 0), &g)
            .unwrap_err();
        assert_eq!(err.kind(), EvalErrorKind::CircularReference);
    }

    #[test]
    fn test_diamond_is_not_circular() {
        let cells = [("A1", "=B1+C1"), ("B1", "=D1"), ("C1", "=D1"), ("D1", "3")];
        assert_eq!(scalar("A1", &cells), 6.0);
    }

    #[test]
    fn test_depth_limit() {
        let cells: HashMap<CellRef, String> = (0..10)
            .map(|row| (CellRef::new(row, 0), format!("=A{}", row + 2)))
            .collect();
        let evaluator = Evaluator::new(EvalOptions {
            max_depth: 4,
            ..EvalOptions::default()
        });
        let err = evaluator.evaluate_cell(&CellRef::new(0, 0), &cells).unwrap_err();
        assert_eq!(err, EvalError::DepthExceeded(4));
    }

    #[test]
    fn test_localized_names() {
        let cells = [("A1", "2"), ("A2", "4")];
        assert_eq!(scalar("SUMA(A1:A2)", &cells), 6.0);
        assert_eq!(scalar("promedio(A1:A2)", &cells), 3.0);
        assert_eq!(scalar("RAIZ(A2)", &cells), 2.0);

        let strict = Evaluator::new(EvalOptions {
            localized_names: false,
            ..EvalOptions::default()
        });
        // Falls through to arithmetic, where the whole thing is one bad token.
        assert_eq!(strict.evaluate("SUMA(A1:A2)", &grid(&cells)), Ok(Value::Scalar(0.0)));
    }

    #[test]
    fn test_error_in_referenced_cell_propagates() {
        let g = grid(&[("A1", "=SQRT(-1)"), ("B1", "=A1+1")]);
        let err = Evaluator::default()
            .evaluate_cell(&CellRef::new(0, 1), &g)
            .unwrap_err();
        assert_eq!(err.kind(), EvalErrorKind::DomainError);
    }

    #[test]
    fn test_malformed_sum_range() {
        let err = evaluate("SUM(A1)+SUM(A2)", &grid(&[])).unwrap_err();
        assert_eq!(err.kind(), EvalErrorKind::MalformedRange);
    }

    #[test]
    fn test_sum_over_range_limit() {
        let err = evaluate("SUM(A1:ZZZZ99999999)", &grid(&[])).unwrap_err();
        assert_eq!(err.to_string(), "range A1:ZZZZ99999999 covers more than 1000000 cells");
        let err = evaluate("AVERAGE(A1:B500001)", &grid(&[])).unwrap_err();
        assert_eq!(err.kind(), EvalErrorKind::RangeTooLarge);
    }
}
