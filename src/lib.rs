//! # unsheet
//!
//! Tabular data extraction from OOXML spreadsheets.
//!
//! This library opens `.xlsx` archives, parses worksheet rows with their
//! cell values resolved (shared strings, inline strings, numeric and
//! formula-cached literals), and re-keys data rows by the header row into
//! records ready for aggregation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unsheet::Workbook;
//!
//! let workbook = Workbook::open("inventory.xlsx")?;
//! let rows = workbook.rows("Sheet1")?;
//!
//! let headers = unsheet::headers(&rows);
//! for record in unsheet::to_records(&rows, &headers) {
//!     for (name, value) in &record.fields {
//!         println!("{name}: {value}");
//!     }
//! }
//! # Ok::<(), unsheet::Error>(())
//! ```
//!
//! Worksheets are selected by display name, zero-based index, or part file
//! name. Failures inside one worksheet can be degraded to an empty row
//! sequence with [`Workbook::rows_or_empty`]; archive-level problems are
//! always errors.

pub mod cell;
pub mod error;
pub mod package;
pub mod record;
pub mod report;
pub mod shared_strings;
pub mod workbook;
pub mod worksheet;

pub use cell::{column_label, Cell, CellRef, CellType};
pub use error::{Error, Result};
pub use package::Package;
pub use record::{headers, to_records, Record};
pub use report::{display_width, fill_rates, frequency, pad_label, split_frequency, Extent};
pub use shared_strings::SharedStrings;
pub use workbook::{SheetInfo, Workbook};
pub use worksheet::Row;

use std::path::Path;

/// Read one worksheet's rows from a file.
///
/// # Example
///
/// ```no_run
/// let rows = unsheet::read_rows("inventory.xlsx", "Sheet1")?;
/// println!("{} rows", rows.len());
/// # Ok::<(), unsheet::Error>(())
/// ```
pub fn read_rows(path: impl AsRef<Path>, selector: &str) -> Result<Vec<Row>> {
    Workbook::open(path)?.rows(selector)
}

/// Read header-keyed records from one worksheet of a file.
///
/// # Example
///
/// ```no_run
/// let records = unsheet::read_records("inventory.xlsx", "Sheet1")?;
/// for record in &records {
///     println!("{:?}", record.get("Name"));
/// }
/// # Ok::<(), unsheet::Error>(())
/// ```
pub fn read_records(path: impl AsRef<Path>, selector: &str) -> Result<Vec<Record>> {
    let workbook = Workbook::open(path)?;
    let rows = workbook.rows(selector)?;
    let headers = headers(&rows);
    Ok(to_records(&rows, &headers))
}
