//! gridcalc_engine - Spreadsheet computation engine: positions, cells,
//! formulas, and cycle detection.

pub mod engine;
pub mod formula;
