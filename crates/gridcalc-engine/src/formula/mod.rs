//! Formula objects: parsed arithmetic expressions over cell references.
//!
//! [`Formula::parse`] turns an expression string (without the leading `=`)
//! into an object that can be evaluated against a cell lookup, printed in
//! canonical form, and queried for the cells it references.

mod ast;
mod parser;

use thiserror::Error;

use crate::engine::Position;

use ast::Expr;

/// A value-level evaluation error. Becomes the formula's result rather than
/// aborting the computation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum FormulaError {
    /// Reference to a cell with an invalid position.
    #[error("#REF!")]
    Ref,
    /// A referenced cell's text cannot be interpreted as a number.
    #[error("#VALUE!")]
    Value,
    /// Division by zero.
    #[error("#DIV/0!")]
    Div0,
}

/// Rejection of a syntactically incorrect expression.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FormulaParseError {
    #[error("unexpected character '{0}' in formula")]
    UnexpectedChar(char),
    #[error("malformed number '{0}'")]
    InvalidNumber(String),
    #[error("malformed cell reference '{0}'")]
    InvalidCellRef(String),
    #[error("cell reference '{0}' is out of range")]
    RefOutOfRange(String),
    #[error("unexpected '{0}' in formula")]
    UnexpectedToken(String),
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    #[error("expected closing parenthesis")]
    UnclosedParen,
}

/// A parsed formula.
#[derive(Clone, Debug)]
pub struct Formula {
    ast: Expr,
    referenced: Vec<Position>,
}

impl Formula {
    /// Parse an expression string (the text after the `=` sign).
    pub fn parse(expression: &str) -> Result<Formula, FormulaParseError> {
        let ast = parser::parse(expression)?;
        let mut referenced = Vec::new();
        ast.collect_refs(&mut referenced);
        referenced.sort_unstable();
        referenced.dedup();
        Ok(Formula { ast, referenced })
    }

    /// Evaluate the formula, resolving each cell reference through `lookup`.
    /// If several referenced cells carry errors, whichever surfaces first in
    /// evaluation order becomes the result.
    pub fn evaluate<F>(&self, lookup: F) -> Result<f64, FormulaError>
    where
        F: Fn(Position) -> Result<f64, FormulaError>,
    {
        self.ast.evaluate(&lookup)
    }

    /// The canonical expression text: no whitespace, minimal parentheses.
    pub fn expression(&self) -> String {
        self.ast.to_string()
    }

    /// Cells directly referenced by this formula, sorted and deduplicated.
    pub fn referenced_cells(&self) -> &[Position] {
        &self.referenced
    }
}
