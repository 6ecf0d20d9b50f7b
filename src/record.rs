//! Header-keyed records derived from worksheet rows.

use crate::worksheet::Row;
use serde::{Deserialize, Serialize};

/// Column headers read from row 1.
///
/// Each header lands at its cell's decoded column index, so the result
/// lines up with [`crate::CellRef::column`] regardless of document order or
/// gaps in the header row. Gaps become empty names; cells under an empty
/// name never produce record fields.
pub fn headers(rows: &[Row]) -> Vec<String> {
    let Some(header_row) = rows.iter().find(|r| r.number == 1) else {
        return Vec::new();
    };

    let mut headers: Vec<String> = Vec::new();
    for cell in &header_row.cells {
        let index = cell.reference.column as usize;
        if index >= headers.len() {
            headers.resize(index + 1, String::new());
        }
        headers[index] = cell.text().to_string();
    }
    headers
}

/// One data row re-keyed by column header.
///
/// Fields keep the row's document order, which matches column order only
/// when the writer emitted cells left to right. Fields carry only non-empty
/// values; a blank cell and an absent cell are indistinguishable here.
/// Callers that need the distinction work with [`Row`] directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Source row number.
    pub row: u32,
    /// (header, value) pairs in the row's document order.
    pub fields: Vec<(String, String)>,
}

impl Record {
    /// Value for a header, if the row had one.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// Number of populated fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Re-key data rows by the given headers.
///
/// Row 1 is the header row and is skipped. Cells whose column index falls
/// outside the header range are dropped with a logged count. Rows that end
/// up with zero fields (entirely empty rows) are omitted.
pub fn to_records(rows: &[Row], headers: &[String]) -> Vec<Record> {
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for row in rows {
        if row.number == 1 {
            continue;
        }

        let mut fields = Vec::new();
        for cell in &row.cells {
            let index = cell.reference.column as usize;
            let Some(header) = headers.get(index) else {
                dropped += 1;
                continue;
            };
            if header.is_empty() {
                continue;
            }
            let value = cell.text();
            if value.is_empty() {
                continue;
            }
            fields.push((header.clone(), value.to_string()));
        }

        if !fields.is_empty() {
            records.push(Record {
                row: row.number,
                fields,
            });
        }
    }

    if dropped > 0 {
        log::debug!(
            "dropped {dropped} cell(s) beyond the {}-column header range",
            headers.len()
        );
    }

    records
}
