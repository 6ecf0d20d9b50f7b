//! Cell references, type codes, and resolved cell values.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest column index a worksheet can address (column XFD).
const MAX_COLUMN: u64 = 16_383;

/// A decoded A1-style cell reference.
///
/// The alphabetic prefix is base-26 with `A` as digit 1, stored zero-based
/// (`A` = 0, `Z` = 25, `AA` = 26). The row keeps its one-based display
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    /// Zero-based column index.
    pub column: u32,
    /// One-based row number.
    pub row: u32,
}

impl CellRef {
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Parse a reference such as `A1` or `AB12`.
    pub fn parse(reference: &str) -> Result<Self> {
        let digits_at = reference
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::CellRef(reference.to_string()))?;
        let (letters, digits) = reference.split_at(digits_at);
        if letters.is_empty() {
            return Err(Error::CellRef(reference.to_string()));
        }

        let mut column: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::CellRef(reference.to_string()));
            }
            column = column * 26 + u64::from(c.to_ascii_uppercase() as u8 - b'A') + 1;
            if column > MAX_COLUMN + 1 {
                return Err(Error::CellRef(reference.to_string()));
            }
        }

        let row: u32 = digits
            .parse()
            .map_err(|_| Error::CellRef(reference.to_string()))?;
        if row == 0 {
            return Err(Error::CellRef(reference.to_string()));
        }

        Ok(Self {
            column: (column - 1) as u32,
            row,
        })
    }

    /// Render back to A1 notation.
    pub fn to_a1(self) -> String {
        format!("{}{}", column_label(self.column), self.row)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_label(self.column), self.row)
    }
}

/// Column letters for a zero-based column index (0 = `A`, 26 = `AA`).
pub fn column_label(column: u32) -> String {
    let mut n = u64::from(column) + 1;
    let mut letters = [0u8; 8];
    let mut used = 0;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters[used] = b'A' + rem;
        used += 1;
        n = (n - 1) / 26;
    }
    letters[..used].iter().rev().map(|&b| b as char).collect()
}

/// Cell content kind decoded from the `t` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    /// Numeric literal (`n` or no attribute).
    Number,
    /// Index into the shared strings table (`s`).
    SharedString,
    /// Text stored inside the cell (`inlineStr`).
    InlineString,
    /// Cached string result of a formula (`str`).
    FormulaString,
}

impl CellType {
    /// Decode a `t` attribute value. Codes outside the supported set
    /// (`b` booleans, `e` errors, future additions) are rejected.
    pub fn from_code(code: Option<&str>) -> Result<Self> {
        match code {
            None | Some("n") => Ok(Self::Number),
            Some("s") => Ok(Self::SharedString),
            Some("inlineStr") => Ok(Self::InlineString),
            Some("str") => Ok(Self::FormulaString),
            Some(other) => Err(Error::UnsupportedCellType(other.to_string())),
        }
    }

    /// The `t` attribute spelling for this kind.
    pub fn code(self) -> &'static str {
        match self {
            Self::Number => "n",
            Self::SharedString => "s",
            Self::InlineString => "inlineStr",
            Self::FormulaString => "str",
        }
    }
}

/// One populated cell with its value already resolved.
///
/// Shared-string cells carry the looked-up text, not the index. `value` is
/// `None` when the cell had no value node at all; an explicit empty string
/// stays `Some("")` so callers can tell the two apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub reference: CellRef,
    pub cell_type: CellType,
    pub value: Option<String>,
}

impl Cell {
    /// Resolved text, treating a missing value as empty.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}
