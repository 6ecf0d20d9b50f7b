//! Worksheet row and cell parsing.

use crate::cell::{Cell, CellRef, CellType};
use crate::error::{Error, Result};
use crate::shared_strings::SharedStrings;
use serde::{Deserialize, Serialize};

/// One worksheet row, cells in document order.
///
/// Only populated cells appear; column gaps are visible through each cell's
/// reference. A `<row>` element with no cell children is kept as an empty
/// row so callers see the worksheet as written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// One-based row number from the `r` attribute.
    pub number: u32,
    pub cells: Vec<Cell>,
}

impl Row {
    /// Whether any cell resolves to non-empty text.
    pub fn has_values(&self) -> bool {
        self.cells.iter().any(|c| !c.text().is_empty())
    }

    /// Resolved text of the cell at a zero-based column index, if populated.
    pub fn value_at(&self, column: u32) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.reference.column == column)
            .map(|c| c.text())
    }
}

/// Parse `<sheetData>` rows from worksheet XML, resolving cell values
/// against the shared strings table.
///
/// Rows come back in document order with whatever numbering the file
/// declares. Formula bodies are skipped; only cached values are read.
pub(crate) fn parse_rows(xml: &str, shared: &SharedStrings) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    // Flags below scope text capture; trimming would eat significant
    // whitespace in inline strings.
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut state = SheetState::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(ref e)) => match e.name().as_ref() {
                b"row" => state.open_row(e),
                b"c" if state.row.is_some() => state.open_cell(e)?,
                b"v" if state.cell.is_some() => {
                    state.in_value = true;
                    state.saw_value = true;
                }
                b"is" if state.cell.is_some() => state.in_inline = true,
                b"t" if state.in_inline => {
                    state.in_value = true;
                    state.saw_value = true;
                }
                b"f" if state.cell.is_some() => state.in_formula = true,
                _ => {}
            },
            Ok(quick_xml::events::Event::Empty(ref e)) => match e.name().as_ref() {
                b"row" => {
                    state.open_row(e);
                    rows.push(state.close_row());
                }
                b"c" if state.row.is_some() => {
                    state.open_cell(e)?;
                    state.close_cell(shared)?;
                }
                b"v" | b"t" if state.cell.is_some() && !state.in_formula => {
                    state.saw_value = true;
                }
                _ => {}
            },
            Ok(quick_xml::events::Event::Text(ref e)) => {
                if state.in_value && !state.in_formula {
                    let text = e.unescape()?;
                    state.value.push_str(&text);
                }
            }
            Ok(quick_xml::events::Event::End(ref e)) => match e.name().as_ref() {
                b"row" => rows.push(state.close_row()),
                b"c" => state.close_cell(shared)?,
                b"v" => state.in_value = false,
                b"is" => state.in_inline = false,
                b"t" if state.in_inline => state.in_value = false,
                b"f" => state.in_formula = false,
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

/// Mutable parse state for one worksheet pass.
#[derive(Default)]
struct SheetState {
    row: Option<Row>,
    last_row_number: u32,
    next_column: u32,
    cell: Option<(CellRef, CellType)>,
    value: String,
    saw_value: bool,
    in_value: bool,
    in_inline: bool,
    in_formula: bool,
}

impl SheetState {
    fn open_row(&mut self, e: &quick_xml::events::BytesStart<'_>) {
        let mut number = None;
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"r" {
                number = String::from_utf8_lossy(&attr.value).parse::<u32>().ok();
            }
        }
        // Files may omit row numbers; continue from the previous row.
        let number = number.unwrap_or(self.last_row_number + 1);
        self.last_row_number = number;
        self.next_column = 0;
        self.row = Some(Row {
            number,
            cells: Vec::new(),
        });
    }

    fn close_row(&mut self) -> Row {
        self.row.take().unwrap_or_default()
    }

    fn open_cell(&mut self, e: &quick_xml::events::BytesStart<'_>) -> Result<()> {
        let mut reference = None;
        let mut type_code = None;
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => {
                    reference = Some(CellRef::parse(&String::from_utf8_lossy(&attr.value))?);
                }
                b"t" => {
                    type_code = Some(String::from_utf8_lossy(&attr.value).to_string());
                }
                _ => {}
            }
        }

        let row_number = self.row.as_ref().map(|r| r.number).unwrap_or(1);
        let reference = reference.unwrap_or_else(|| CellRef::new(self.next_column, row_number));
        let cell_type = CellType::from_code(type_code.as_deref())?;

        self.cell = Some((reference, cell_type));
        self.value.clear();
        self.saw_value = false;
        Ok(())
    }

    fn close_cell(&mut self, shared: &SharedStrings) -> Result<()> {
        let Some((reference, cell_type)) = self.cell.take() else {
            return Ok(());
        };
        self.next_column = reference.column + 1;

        let raw = if self.saw_value {
            Some(std::mem::take(&mut self.value))
        } else {
            self.value.clear();
            None
        };
        let value = resolve_value(raw, cell_type, shared)?;

        if let Some(ref mut row) = self.row {
            row.cells.push(Cell {
                reference,
                cell_type,
                value,
            });
        }
        self.in_value = false;
        self.in_inline = false;
        self.in_formula = false;
        Ok(())
    }
}

/// Turn the captured raw text into the cell's resolved value.
fn resolve_value(
    raw: Option<String>,
    cell_type: CellType,
    shared: &SharedStrings,
) -> Result<Option<String>> {
    match cell_type {
        CellType::SharedString => match raw {
            Some(text) => {
                let index: usize = text.trim().parse().map_err(|_| {
                    Error::XmlParse(format!("shared string index is not numeric: {text:?}"))
                })?;
                let resolved = shared.get(index).ok_or(Error::SharedStringIndex {
                    index,
                    len: shared.len(),
                })?;
                Ok(Some(resolved.to_string()))
            }
            None => Ok(None),
        },
        CellType::Number | CellType::InlineString | CellType::FormulaString => Ok(raw),
    }
}
