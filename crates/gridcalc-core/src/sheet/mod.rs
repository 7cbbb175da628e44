//! Sparse sheet model.
//!
//! [`Sheet`] owns every cell and keeps the dependency graph between them
//! consistent: outbound `referenced` edges live in each cell's parsed
//! formula, inbound `dependents` edges are maintained by the mutation ops
//! in `ops.rs`. Printing and printable-size computation live in `print.rs`.

mod ops;
mod print;

use std::collections::HashMap;

use gridcalc_engine::engine::{Cell, CellProvider, CellValue, Position};

use crate::error::{Result, SheetError};

/// A sparse spreadsheet: position → owned cell.
///
/// Cells reference each other by position only, so the graph carries no
/// ownership cycles. Not safe for concurrent mutation; synchronization is
/// the caller's responsibility.
#[derive(Debug, Default)]
pub struct Sheet {
    cells: HashMap<Position, Cell>,
}

impl Sheet {
    /// Create a ready-to-use empty sheet.
    pub fn new() -> Sheet {
        Sheet {
            cells: HashMap::new(),
        }
    }

    /// Borrow the cell at `pos`, if one exists. Placeholder cells
    /// materialized for dangling references are reported like any other
    /// cell (present, with empty text).
    pub fn cell(&self, pos: Position) -> Result<Option<&Cell>> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }
        Ok(self.cells.get(&pos))
    }

    /// Computed value of the cell at `pos`, if one exists.
    pub fn value(&self, pos: Position) -> Result<Option<CellValue>> {
        Ok(self.cell(pos)?.map(|cell| cell.value(self)))
    }
}

impl CellProvider for Sheet {
    fn cell_at(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }
}
