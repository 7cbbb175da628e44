//! gridcalc-core - sparse sheet model over the gridcalc computation engine.

pub mod error;
pub mod sheet;

pub use error::{Result, SheetError};
pub use sheet::Sheet;

pub use gridcalc_engine::engine::{
    creates_cycle, Cell, CellContent, CellProvider, CellValue, Position, Size, ESCAPE_SIGN,
    FORMULA_SIGN,
};
pub use gridcalc_engine::formula::{Formula, FormulaError, FormulaParseError};
