//! Error types for sheet mutations.

use gridcalc_engine::engine::Position;
use gridcalc_engine::formula::FormulaParseError;
use thiserror::Error;

/// Errors raised by sheet operations. A failed operation never changes the
/// sheet.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SheetError {
    #[error("invalid cell position {0:?}")]
    InvalidPosition(Position),

    #[error("formula syntax error: {0}")]
    FormulaSyntax(#[from] FormulaParseError),

    #[error("circular dependency detected")]
    CircularDependency,
}

pub type Result<T> = std::result::Result<T, SheetError>;
