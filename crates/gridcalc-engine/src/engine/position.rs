//! Cell position parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style notation
//! (e.g., "A1", "B2", "AA100") and zero-indexed row/column coordinates,
//! plus the [`Size`] of a printable area.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A cell position by row and column indices (0-indexed).
///
/// Ordering is lexicographic by `(row, col)`.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

/// Dimensions of a rectangular cell area.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Position {
    pub const MAX_ROWS: i32 = 16384;
    pub const MAX_COLS: i32 = 16384;

    /// Sentinel denoting the absence of a position.
    pub const NONE: Position = Position { row: -1, col: -1 };

    pub fn new(row: i32, col: i32) -> Position {
        Position { row, col }
    }

    /// True iff the position lies inside the addressable rectangle.
    pub fn is_valid(&self) -> bool {
        (0..Self::MAX_ROWS).contains(&self.row) && (0..Self::MAX_COLS).contains(&self.col)
    }

    /// Parse a position from spreadsheet notation (e.g., "A1", "XFD16384").
    /// Column letters must be uppercase. Returns None on malformed input or
    /// when either component falls outside the addressable rectangle.
    pub fn from_a1(name: &str) -> Option<Position> {
        let caps = a1_re().captures(name)?;
        let letters = &caps[1];
        let digits = &caps[2];

        let mut col_acc = 0i64;
        for c in letters.bytes() {
            let digit = (c - b'A') as i64 + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
            if col_acc > Self::MAX_COLS as i64 {
                return None;
            }
        }
        let col = (col_acc - 1) as i32;

        let row_1based = digits.parse::<i64>().ok()?;
        if row_1based < 1 || row_1based > Self::MAX_ROWS as i64 {
            return None;
        }
        let row = (row_1based - 1) as i32;

        Some(Position::new(row, col))
    }

    /// Convert a column index to spreadsheet letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: i32) -> String {
        let mut result = String::new();
        let mut n = col as i64 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

fn a1_re() -> &'static Regex {
    static A1_RE: OnceLock<Regex> = OnceLock::new();
    A1_RE.get_or_init(|| Regex::new(r"^([A-Z]+)([0-9]+)$").expect("position regex must compile"))
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_a1(s).ok_or_else(|| format!("Invalid cell position: {}", s))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}{}", Position::col_to_letters(self.col), self.row + 1)
    }
}
