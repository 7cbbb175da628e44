use std::collections::HashSet;

use gridcalc_engine::engine::{creates_cycle, Cell, Position};
use tracing::{debug, trace};

use super::Sheet;
use crate::error::{Result, SheetError};

impl Sheet {
    /// Set the contents of the cell at `pos`.
    ///
    /// Text starting with `=` (and longer than the sign alone) is parsed as
    /// a formula. Fails with [`SheetError::FormulaSyntax`] on a malformed
    /// formula and [`SheetError::CircularDependency`] when installing the
    /// cell would close a reference cycle; on any failure the sheet is left
    /// unchanged.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }

        let mut candidate = Cell::from_input(text)?;

        // Would installing the candidate close a cycle through the current
        // graph? Checked before any edge is touched, so a rejected set
        // leaves the graph exactly as it was.
        if creates_cycle(candidate.referenced_cells(), pos, self) {
            return Err(SheetError::CircularDependency);
        }

        // Unhook the replaced cell's outbound edges and carry its
        // dependents over: observers of `pos` keep observing it.
        if let Some(old) = self.cells.get(&pos) {
            let old_refs: Vec<Position> = old.referenced_cells().to_vec();
            let old_dependents = old.dependents().clone();
            for target in old_refs {
                if let Some(cell) = self.cells.get_mut(&target) {
                    cell.remove_dependent(pos);
                }
            }
            candidate.set_dependents(old_dependents);
        }

        // Referenced-but-missing positions become empty placeholders so the
        // inbound edge has somewhere to live.
        for target in candidate.referenced_cells().to_vec() {
            self.cells
                .entry(target)
                .or_insert_with(Cell::new_empty)
                .add_dependent(pos);
        }

        self.cells.insert(pos, candidate);
        self.invalidate_from(pos);
        debug!(row = pos.row, col = pos.col, "cell set");
        Ok(())
    }

    /// Remove the cell at `pos`. Clearing an absent cell is a no-op.
    ///
    /// Cells that still reference `pos` keep a live inbound edge: the cell
    /// is demoted to an empty placeholder rather than dropped, so a later
    /// `set_cell` here reaches its dependents again.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }
        let Some(cell) = self.cells.get(&pos) else {
            return Ok(());
        };
        let old_refs: Vec<Position> = cell.referenced_cells().to_vec();
        let dependents = cell.dependents().clone();

        // Downstream caches still hold this cell's old value.
        self.invalidate_from(pos);

        for target in old_refs {
            if let Some(cell) = self.cells.get_mut(&target) {
                cell.remove_dependent(pos);
            }
        }

        if dependents.is_empty() {
            self.cells.remove(&pos);
        } else {
            let mut placeholder = Cell::new_empty();
            placeholder.set_dependents(dependents);
            self.cells.insert(pos, placeholder);
        }
        debug!(row = pos.row, col = pos.col, "cell cleared");
        Ok(())
    }

    /// Drop the cached value of `start` and of every cell transitively
    /// reachable from it along dependents edges. The visited set keeps the
    /// walk terminating even on a momentarily ill-formed graph.
    fn invalidate_from(&self, start: Position) {
        let mut visited: HashSet<Position> = HashSet::new();
        let mut queue = vec![start];
        while let Some(pos) = queue.pop() {
            if !visited.insert(pos) {
                continue;
            }
            if let Some(cell) = self.cells.get(&pos) {
                cell.clear_cache();
                queue.extend(cell.dependents().iter().copied());
            }
        }
        trace!(count = visited.len(), "caches invalidated");
    }
}
