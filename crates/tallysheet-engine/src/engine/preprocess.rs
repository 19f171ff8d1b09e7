//! Formula normalization and tokenizing.
//!
//! Formulas are matched on a canonical form: uppercased with every whitespace
//! character removed. Arithmetic bodies are then split on the four operators,
//! keeping the operators as tokens. There are no string literals in the
//! formula language, so neither step can corrupt anything.

use regex::Regex;
use std::sync::OnceLock;

/// Binary operator in a flat arithmetic formula.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    fn from_char(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Sub),
            '*' => Some(Op::Mul),
            '/' => Some(Op::Div),
            _ => None,
        }
    }

    /// Apply to an accumulator. Division by zero gives zero.
    pub fn apply(self, acc: f64, rhs: f64) -> f64 {
        match self {
            Op::Add => acc + rhs,
            Op::Sub => acc - rhs,
            Op::Mul => acc * rhs,
            Op::Div => {
                if rhs == 0.0 {
                    0.0
                } else {
                    acc / rhs
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    Op(Op),
    /// A cell reference or a numeric literal, still unresolved.
    Operand(&'a str),
}

/// Uppercase and strip all whitespace.
pub fn normalize_formula(formula: &str) -> String {
    formula
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

fn operator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[+\-*/]").expect("operator regex must compile"))
}

/// Split a normalized formula into operands and operators.
///
/// Empty pieces between adjacent operators are dropped, so `-5` yields
/// `[Op(Sub), Operand("5")]`: a leading minus is an operator, not a sign.
pub fn tokenize(formula: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in operator_re().find_iter(formula) {
        let operand = &formula[last..m.start()];
        if !operand.is_empty() {
            tokens.push(Token::Operand(operand));
        }
        if let Some(op) = m.as_str().chars().next().and_then(Op::from_char) {
            tokens.push(Token::Op(op));
        }
        last = m.end();
    }
    let tail = &formula[last..];
    if !tail.is_empty() {
        tokens.push(Token::Operand(tail));
    }
    tokens
}
