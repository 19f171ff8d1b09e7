//! Evaluation error types.

use thiserror::Error;

use super::CellRef;

/// Coarse classification of an [`EvalError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EvalErrorKind {
    CircularReference,
    DomainError,
    MalformedRange,
    MalformedArgument,
    DepthExceeded,
    RangeTooLarge,
}

/// Errors that escape a formula evaluation.
///
/// Bad tokens, non-numeric range cells and division by zero are absorbed into
/// numeric defaults and never show up here.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("circular reference at {0}")]
    CircularReference(CellRef),

    #[error("math domain error: {function} of {value}")]
    Domain { function: &'static str, value: f64 },

    #[error("malformed range: {0:?}")]
    MalformedRange(String),

    #[error("{function} cannot use {argument:?} as a number")]
    MalformedArgument {
        function: &'static str,
        argument: String,
    },

    #[error("reference chain deeper than {0} cells")]
    DepthExceeded(usize),

    #[error("range {range} covers more than {limit} cells")]
    RangeTooLarge { range: String, limit: usize },
}

impl EvalError {
    pub fn kind(&self) -> EvalErrorKind {
        match self {
            EvalError::CircularReference(_) => EvalErrorKind::CircularReference,
            EvalError::Domain { .. } => EvalErrorKind::DomainError,
            EvalError::MalformedRange(_) => EvalErrorKind::MalformedRange,
            EvalError::MalformedArgument { .. } => EvalErrorKind::MalformedArgument,
            EvalError::DepthExceeded(_) => EvalErrorKind::DepthExceeded,
            EvalError::RangeTooLarge { .. } => EvalErrorKind::RangeTooLarge,
        }
    }
}

pub type EvalResult<T> = std::result::Result<T, EvalError>;
