//! Cell data structures for the sparse sheet.
//!
//! - [`CellContent`] - what a cell holds (nothing, text, or a parsed formula)
//! - [`CellValue`] - the computed, displayable value of a cell
//! - [`Cell`] - content plus inbound dependents and a memoized value cache
//! - [`CellProvider`] - cell lookup seam the sheet implements for evaluation

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;

use crate::formula::{Formula, FormulaError, FormulaParseError};

use super::position::Position;

/// Leading character marking formula input.
pub const FORMULA_SIGN: char = '=';
/// Leading character suppressing formula/number interpretation of text.
pub const ESCAPE_SIGN: char = '\'';

/// The content stored in a cell.
#[derive(Clone, Debug)]
pub enum CellContent {
    Empty,
    Text(String),
    Formula(Formula),
}

/// The computed value of a cell: text, a number, or an evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Error(FormulaError),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// Read access to installed cells, used to resolve references during
/// formula evaluation.
pub trait CellProvider {
    fn cell_at(&self, pos: Position) -> Option<&Cell>;
}

/// A cell: content, the positions that depend on it, and a lazily filled
/// value cache. The dependents set is maintained by the sheet.
#[derive(Debug)]
pub struct Cell {
    content: CellContent,
    dependents: BTreeSet<Position>,
    cache: RefCell<Option<CellValue>>,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            content: CellContent::Empty,
            dependents: BTreeSet::new(),
            cache: RefCell::new(None),
        }
    }

    /// Classify user input and build the matching content.
    /// - `""` -> Empty
    /// - `"="` alone -> Text (the literal `=`)
    /// - `"=<expr>"` -> Formula (parse failure propagates, nothing is built)
    /// - anything else -> Text
    pub fn from_input(text: &str) -> Result<Cell, FormulaParseError> {
        let content = match text.strip_prefix(FORMULA_SIGN) {
            Some(expression) if !expression.is_empty() => {
                CellContent::Formula(Formula::parse(expression)?)
            }
            _ if text.is_empty() => CellContent::Empty,
            _ => CellContent::Text(text.to_string()),
        };
        Ok(Cell {
            content,
            dependents: BTreeSet::new(),
            cache: RefCell::new(None),
        })
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// The cell text as it would appear for editing: raw text with any
    /// escape preserved; formulas render as `=` plus the canonical
    /// expression.
    pub fn text(&self) -> String {
        match &self.content {
            CellContent::Empty => String::new(),
            CellContent::Text(s) => s.clone(),
            CellContent::Formula(formula) => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    /// The visible value of the cell. Computed on first access and cached
    /// until the sheet invalidates it.
    pub fn value<P: CellProvider>(&self, cells: &P) -> CellValue {
        if let Some(cached) = self.cache.borrow().as_ref() {
            return cached.clone();
        }
        let value = match &self.content {
            CellContent::Empty => CellValue::Text(String::new()),
            CellContent::Text(s) => {
                CellValue::Text(s.strip_prefix(ESCAPE_SIGN).unwrap_or(s).to_string())
            }
            CellContent::Formula(formula) => {
                match formula.evaluate(|pos| lookup_number(cells, pos)) {
                    Ok(n) => CellValue::Number(n),
                    Err(e) => CellValue::Error(e),
                }
            }
        };
        *self.cache.borrow_mut() = Some(value.clone());
        value
    }

    /// Cells this cell's formula reads, sorted and deduplicated.
    pub fn referenced_cells(&self) -> &[Position] {
        match &self.content {
            CellContent::Formula(formula) => formula.referenced_cells(),
            _ => &[],
        }
    }

    /// True iff the cell participates in the dependency graph.
    pub fn is_referenced(&self) -> bool {
        !self.dependents.is_empty() || !self.referenced_cells().is_empty()
    }

    /// Positions whose cells read this one.
    pub fn dependents(&self) -> &BTreeSet<Position> {
        &self.dependents
    }

    pub fn add_dependent(&mut self, pos: Position) {
        self.dependents.insert(pos);
    }

    pub fn remove_dependent(&mut self, pos: Position) {
        self.dependents.remove(&pos);
    }

    pub fn set_dependents(&mut self, dependents: BTreeSet<Position>) {
        self.dependents = dependents;
    }

    /// Drop the memoized value. The next `value` call recomputes.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().take();
    }

    pub fn has_cached_value(&self) -> bool {
        self.cache.borrow().is_some()
    }
}

/// Coerce the cell at `pos` to a number for formula evaluation.
///
/// Absent cells count as zero. Text coerces from the cell's raw text: empty
/// text is zero, escaped text never coerces, otherwise the text must parse
/// as a decimal number.
fn lookup_number<P: CellProvider>(cells: &P, pos: Position) -> Result<f64, FormulaError> {
    let Some(cell) = cells.cell_at(pos) else {
        return Ok(0.0);
    };
    match cell.value(cells) {
        CellValue::Number(n) => Ok(n),
        CellValue::Error(e) => Err(e),
        CellValue::Text(_) => {
            let raw = cell.text();
            if raw.is_empty() {
                return Ok(0.0);
            }
            if raw.starts_with(ESCAPE_SIGN) {
                return Err(FormulaError::Value);
            }
            raw.parse::<f64>().map_err(|_| FormulaError::Value)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{Cell, CellContent, CellProvider, CellValue};
    use crate::formula::FormulaError;
    use crate::engine::Position;

    struct MapCells(HashMap<Position, Cell>);

    impl MapCells {
        fn new(entries: &[(&str, &str)]) -> MapCells {
            MapCells(
                entries
                    .iter()
                    .map(|(name, text)| {
                        (
                            Position::from_a1(name).unwrap(),
                            Cell::from_input(text).unwrap(),
                        )
                    })
                    .collect(),
            )
        }

        fn value(&self, name: &str) -> CellValue {
            self.0
                .get(&Position::from_a1(name).unwrap())
                .unwrap()
                .value(self)
        }
    }

    impl CellProvider for MapCells {
        fn cell_at(&self, pos: Position) -> Option<&Cell> {
            self.0.get(&pos)
        }
    }

    #[test]
    fn test_input_classification() {
        assert!(matches!(
            Cell::from_input("").unwrap().content(),
            CellContent::Empty
        ));
        assert!(matches!(
            Cell::from_input("hello").unwrap().content(),
            CellContent::Text(_)
        ));
        assert!(matches!(
            Cell::from_input("=").unwrap().content(),
            CellContent::Text(_)
        ));
        assert!(matches!(
            Cell::from_input("=1+2").unwrap().content(),
            CellContent::Formula(_)
        ));
        assert!(Cell::from_input("=1+").is_err());
    }

    #[test]
    fn test_text_preserves_input() {
        assert_eq!(Cell::from_input("").unwrap().text(), "");
        assert_eq!(Cell::from_input("=").unwrap().text(), "=");
        assert_eq!(Cell::from_input("'=hello").unwrap().text(), "'=hello");
        assert_eq!(Cell::from_input("=1+2").unwrap().text(), "=1+2");
        // Formula text is canonical, not the raw input.
        assert_eq!(Cell::from_input("=1 + 2").unwrap().text(), "=1+2");
    }

    #[test]
    fn test_escaped_text_value() {
        let cells = MapCells::new(&[("A1", "'=hello")]);
        assert_eq!(cells.value("A1"), CellValue::Text("=hello".to_string()));
    }

    #[test]
    fn test_formula_value_over_cells() {
        let cells = MapCells::new(&[("A1", "2"), ("A2", "3"), ("A3", "=A1+A2*2")]);
        assert_eq!(cells.value("A3"), CellValue::Number(8.0));
    }

    #[test]
    fn test_coercion_rules() {
        let cells = MapCells::new(&[
            ("A1", "3.14"),
            ("A2", "=A1*2"),
            ("B1", "'3.14"),
            ("B2", "=B1*2"),
            ("C1", "not a number"),
            ("C2", "=C1"),
            ("D1", ""),
            ("D2", "=D1+E99"),
        ]);
        assert_eq!(cells.value("A2"), CellValue::Number(6.28));
        assert_eq!(cells.value("B2"), CellValue::Error(FormulaError::Value));
        assert_eq!(cells.value("C2"), CellValue::Error(FormulaError::Value));
        // Empty and absent cells both count as zero.
        assert_eq!(cells.value("D2"), CellValue::Number(0.0));
    }

    #[test]
    fn test_upstream_error_propagates() {
        let cells = MapCells::new(&[("A1", "=1/0"), ("A2", "=A1+5")]);
        assert_eq!(cells.value("A1"), CellValue::Error(FormulaError::Div0));
        assert_eq!(cells.value("A2"), CellValue::Error(FormulaError::Div0));
    }

    #[test]
    fn test_value_is_cached_until_cleared() {
        let cells = MapCells::new(&[("A1", "=1+1")]);
        let cell = cells.cell_at(Position::from_a1("A1").unwrap()).unwrap();
        assert!(!cell.has_cached_value());
        cell.value(&cells);
        assert!(cell.has_cached_value());
        cell.clear_cache();
        assert!(!cell.has_cached_value());
    }

    #[test]
    fn test_is_referenced() {
        let mut cell = Cell::from_input("hello").unwrap();
        assert!(!cell.is_referenced());
        cell.add_dependent(Position::from_a1("B2").unwrap());
        assert!(cell.is_referenced());

        let formula = Cell::from_input("=A1").unwrap();
        assert!(formula.is_referenced());
    }
}
