use std::io::{self, Write};

use gridcalc_engine::engine::{Cell, Position, Size};

use super::Sheet;

impl Sheet {
    /// Bounding size of every existing cell, placeholders included, or
    /// `(0, 0)` for an empty sheet.
    pub fn printable_size(&self) -> Size {
        if self.cells.is_empty() {
            return Size::default();
        }
        let mut max_row = 0;
        let mut max_col = 0;
        for pos in self.cells.keys() {
            max_row = max_row.max(pos.row);
            max_col = max_col.max(pos.col);
        }
        Size {
            rows: max_row + 1,
            cols: max_col + 1,
        }
    }

    /// Write computed values over the printable rectangle: row-major, a
    /// single tab between cells, a newline after every row.
    pub fn print_values<W: Write>(&self, output: &mut W) -> io::Result<()> {
        self.print_with(output, |sheet, cell| cell.value(sheet).to_string())
    }

    /// Write cell texts over the printable rectangle.
    pub fn print_texts<W: Write>(&self, output: &mut W) -> io::Result<()> {
        self.print_with(output, |_, cell| cell.text())
    }

    fn print_with<W, F>(&self, output: &mut W, render: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&Sheet, &Cell) -> String,
    {
        let area = self.printable_size();
        for row in 0..area.rows {
            for col in 0..area.cols {
                if col > 0 {
                    output.write_all(b"\t")?;
                }
                if let Some(cell) = self.cells.get(&Position::new(row, col)) {
                    output.write_all(render(self, cell).as_bytes())?;
                }
            }
            output.write_all(b"\n")?;
        }
        Ok(())
    }
}
