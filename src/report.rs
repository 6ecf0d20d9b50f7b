//! Derived summaries over extracted rows and records.

use crate::cell::CellRef;
use crate::record::Record;
use crate::worksheet::Row;
use std::collections::HashMap;
use std::fmt;
use unicode_width::UnicodeWidthStr;

/// The populated region of a worksheet, rendered `A1:N201`.
///
/// Derived from the parsed cells rather than the worksheet's `<dimension>`
/// element, which writers routinely leave stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub min: CellRef,
    pub max: CellRef,
}

impl Extent {
    /// Componentwise bounds over every populated cell, or `None` when the
    /// rows hold no cells at all.
    pub fn of(rows: &[Row]) -> Option<Self> {
        let mut extent: Option<Self> = None;
        for cell in rows.iter().flat_map(|r| &r.cells) {
            let r = cell.reference;
            extent = Some(match extent {
                None => Self { min: r, max: r },
                Some(e) => Self {
                    min: CellRef::new(e.min.column.min(r.column), e.min.row.min(r.row)),
                    max: CellRef::new(e.max.column.max(r.column), e.max.row.max(r.row)),
                },
            });
        }
        extent
    }

    /// Number of rows spanned, header included.
    pub fn row_count(&self) -> u32 {
        self.max.row - self.min.row + 1
    }

    /// Number of columns spanned.
    pub fn column_count(&self) -> u32 {
        self.max.column - self.min.column + 1
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.min, self.max)
    }
}

/// Occurrence counts for one field across all records, most frequent first
/// (ties broken alphabetically for stable output). A value equal to the
/// `na` placeholder counts as missing.
pub fn frequency(records: &[Record], header: &str, na: Option<&str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        let Some(value) = record.get(header) else {
            continue;
        };
        if na == Some(value) {
            continue;
        }
        *counts.entry(value.to_string()).or_default() += 1;
    }
    sort_by_count(counts)
}

/// Occurrence counts where each field value is split on a delimiter first,
/// with parts trimmed. Multi-valued columns (comma-separated lists) count
/// once per part.
pub fn split_frequency(
    records: &[Record],
    header: &str,
    separator: char,
    na: Option<&str>,
) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        let Some(value) = record.get(header) else {
            continue;
        };
        if na == Some(value) {
            continue;
        }
        for part in value.split(separator) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            *counts.entry(part.to_string()).or_default() += 1;
        }
    }
    sort_by_count(counts)
}

/// Fraction of records carrying a real value per named header, in header
/// order. Placeholder values count as missing, unnamed columns are skipped.
pub fn fill_rates(records: &[Record], headers: &[String], na: Option<&str>) -> Vec<(String, f64)> {
    headers
        .iter()
        .filter(|h| !h.is_empty())
        .map(|header| {
            let filled = records
                .iter()
                .filter(|r| r.get(header).is_some_and(|v| na != Some(v)))
                .count();
            let rate = if records.is_empty() {
                0.0
            } else {
                filled as f64 / records.len() as f64
            };
            (header.clone(), rate)
        })
        .collect()
}

/// Display width of a label, wide characters accounted for.
pub fn display_width(label: &str) -> usize {
    label.width()
}

/// Pad a label to a display width, wide characters accounted for.
pub fn pad_label(label: &str, width: usize) -> String {
    let used = label.width();
    let mut padded = String::with_capacity(label.len() + width.saturating_sub(used));
    padded.push_str(label);
    for _ in used..width {
        padded.push(' ');
    }
    padded
}

fn sort_by_count(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut items: Vec<_> = counts.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell, CellType};

    fn row_with(number: u32, references: &[&str]) -> Row {
        Row {
            number,
            cells: references
                .iter()
                .map(|r| Cell {
                    reference: CellRef::parse(r).unwrap(),
                    cell_type: CellType::Number,
                    value: Some("x".to_string()),
                })
                .collect(),
        }
    }

    fn record(fields: &[(&str, &str)]) -> Record {
        Record {
            row: 2,
            fields: fields
                .iter()
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_extent_bounds() {
        let rows = vec![
            row_with(2, &["B2", "D2"]),
            row_with(5, &["C5"]),
            row_with(3, &[]),
        ];

        let extent = Extent::of(&rows).unwrap();
        assert_eq!(extent.to_string(), "B2:D5");
        assert_eq!(extent.row_count(), 4);
        assert_eq!(extent.column_count(), 3);
    }

    #[test]
    fn test_extent_of_empty_rows() {
        assert!(Extent::of(&[]).is_none());
        assert!(Extent::of(&[row_with(1, &[])]).is_none());
    }

    #[test]
    fn test_frequency_ordering_and_na() {
        let records = vec![
            record(&[("status", "active")]),
            record(&[("status", "active")]),
            record(&[("status", "retired")]),
            record(&[("status", "N/A")]),
            record(&[("other", "x")]),
        ];

        let freq = frequency(&records, "status", Some("N/A"));
        assert_eq!(
            freq,
            vec![("active".to_string(), 2), ("retired".to_string(), 1)]
        );

        let unfiltered = frequency(&records, "status", None);
        assert_eq!(unfiltered.len(), 3);
    }

    #[test]
    fn test_frequency_breaks_ties_alphabetically() {
        let records = vec![
            record(&[("k", "beta")]),
            record(&[("k", "alpha")]),
        ];

        let freq = frequency(&records, "k", None);
        assert_eq!(freq[0].0, "alpha");
        assert_eq!(freq[1].0, "beta");
    }

    #[test]
    fn test_split_frequency_trims_parts() {
        let records = vec![
            record(&[("tags", "red, blue")]),
            record(&[("tags", "blue")]),
            record(&[("tags", " , ")]),
        ];

        let freq = split_frequency(&records, "tags", ',', None);
        assert_eq!(
            freq,
            vec![("blue".to_string(), 2), ("red".to_string(), 1)]
        );
    }

    #[test]
    fn test_fill_rates() {
        let headers = vec!["name".to_string(), String::new(), "dept".to_string()];
        let records = vec![
            record(&[("name", "Ada"), ("dept", "Compute")]),
            record(&[("name", "Grace")]),
            record(&[("name", "N/A"), ("dept", "Archive")]),
        ];

        let rates = fill_rates(&records, &headers, Some("N/A"));
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].0, "name");
        assert!((rates[0].1 - 2.0 / 3.0).abs() < 1e-9);
        assert!((rates[1].1 - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_fill_rates_with_no_records() {
        let headers = vec!["name".to_string()];
        let rates = fill_rates(&[], &headers, None);
        assert_eq!(rates, vec![("name".to_string(), 0.0)]);
    }

    #[test]
    fn test_pad_label_counts_display_width() {
        assert_eq!(pad_label("ab", 4), "ab  ");
        assert_eq!(pad_label("abcd", 3), "abcd");
        // Full-width characters occupy two columns each.
        assert_eq!(pad_label("データ", 8), "データ  ");
    }
}
