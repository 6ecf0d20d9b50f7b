//! Workbook loading and worksheet access.

use crate::error::{Error, Result};
use crate::package::Package;
use crate::shared_strings::SharedStrings;
use crate::worksheet::{parse_rows, Row};
use std::collections::HashMap;
use std::path::Path;

/// One entry in the workbook's sheet directory.
#[derive(Debug, Clone)]
pub struct SheetInfo {
    /// Display name from `xl/workbook.xml`.
    pub name: String,
    /// Worksheet part path inside the archive.
    pub part: String,
}

/// An opened spreadsheet with its sheet directory and shared strings loaded.
///
/// Loading reads the workbook-level parts once; worksheet parts are parsed
/// on demand per [`Workbook::rows`] call. The value is immutable after
/// `open`, so extractions from different sheets are independent.
pub struct Workbook {
    package: Package,
    shared: SharedStrings,
    sheets: Vec<SheetInfo>,
}

impl Workbook {
    /// Open a workbook from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Open a workbook from in-memory archive bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    fn from_package(package: Package) -> Result<Self> {
        // A zip without a workbook part is not a spreadsheet.
        if !package.has_part("xl/workbook.xml") {
            return Err(Error::MissingPart("xl/workbook.xml".to_string()));
        }

        // Inline-string-only workbooks legitimately ship without a shared
        // strings part; a present but malformed one is fatal.
        let shared = if package.has_part("xl/sharedStrings.xml") {
            SharedStrings::parse(&package.read_xml("xl/sharedStrings.xml")?)?
        } else {
            SharedStrings::default()
        };

        let rels = parse_relationships(&package)?;
        let sheets = parse_sheet_directory(&package, &rels)?;

        Ok(Self {
            package,
            shared,
            sheets,
        })
    }

    /// The workbook's shared strings table (empty when the part is absent).
    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared
    }

    /// The underlying archive.
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Sheet directory in workbook order.
    pub fn sheets(&self) -> &[SheetInfo] {
        &self.sheets
    }

    /// Display names of all sheets in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of sheets in the directory.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Parse one worksheet's rows in document order.
    ///
    /// The selector is tried as a display name, then a zero-based index,
    /// then a worksheet part file name (`sheet1.xml` or the full
    /// `xl/worksheets/sheet1.xml` path).
    pub fn rows(&self, selector: &str) -> Result<Vec<Row>> {
        let part = self
            .resolve_part(selector)
            .ok_or_else(|| Error::SheetNotFound(selector.to_string()))?;
        let xml = self.package.read_xml(&part)?;
        parse_rows(&xml, &self.shared)
    }

    /// Parse the worksheet at a zero-based directory index.
    pub fn rows_at(&self, index: usize) -> Result<Vec<Row>> {
        let sheet = self
            .sheets
            .get(index)
            .ok_or_else(|| Error::SheetNotFound(format!("#{index}")))?;
        let xml = self.package.read_xml(&sheet.part)?;
        parse_rows(&xml, &self.shared)
    }

    /// Like [`Workbook::rows`], but a failed worksheet degrades to an empty
    /// sequence with a logged diagnostic instead of an error. Callers keep
    /// whatever the other sheets produced.
    pub fn rows_or_empty(&self, selector: &str) -> Vec<Row> {
        match self.rows(selector) {
            Ok(rows) => rows,
            Err(err) => {
                log::warn!("skipping worksheet {selector:?}: {err}");
                Vec::new()
            }
        }
    }

    fn resolve_part(&self, selector: &str) -> Option<String> {
        if let Some(sheet) = self.sheets.iter().find(|s| s.name == selector) {
            return Some(sheet.part.clone());
        }
        if let Ok(index) = selector.parse::<usize>() {
            if let Some(sheet) = self.sheets.get(index) {
                return Some(sheet.part.clone());
            }
        }
        if let Some(sheet) = self.sheets.iter().find(|s| s.part == selector) {
            return Some(sheet.part.clone());
        }
        // Bare part names keep parity with addressing worksheets by file,
        // even when the directory does not list them.
        let candidate = format!("xl/worksheets/{selector}");
        if self.package.has_part(&candidate) {
            return Some(candidate);
        }
        if self.package.has_part(selector) {
            return Some(selector.to_string());
        }
        None
    }
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("sheets", &self.sheets)
            .field("shared_strings", &self.shared.len())
            .finish()
    }
}

/// Parse `xl/_rels/workbook.xml.rels` into an id-to-target map.
fn parse_relationships(package: &Package) -> Result<HashMap<String, String>> {
    let mut rels = HashMap::new();
    if !package.has_part("xl/_rels/workbook.xml.rels") {
        return Ok(rels);
    }

    let xml = package.read_xml("xl/_rels/workbook.xml.rels")?;
    let mut reader = quick_xml::Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e)) => {
                if e.name().as_ref() == b"Relationship" {
                    let mut id = String::new();
                    let mut target = String::new();
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Target" => {
                                target = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            _ => {}
                        }
                    }
                    if !id.is_empty() && !target.is_empty() {
                        rels.insert(id, target);
                    }
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Parse `xl/workbook.xml` into the sheet directory, resolving each entry's
/// relationship target to a part path.
fn parse_sheet_directory(
    package: &Package,
    rels: &HashMap<String, String>,
) -> Result<Vec<SheetInfo>> {
    let mut sheets = Vec::new();
    let xml = package.read_xml("xl/workbook.xml")?;
    let mut reader = quick_xml::Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e)) => {
                if e.name().as_ref() == b"sheet" {
                    let mut name = String::new();
                    let mut sheet_id = String::new();
                    let mut rel_id = String::new();
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => name = String::from_utf8_lossy(&attr.value).to_string(),
                            b"sheetId" => {
                                sheet_id = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            b"r:id" => {
                                rel_id = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            _ => {}
                        }
                    }
                    if !name.is_empty() {
                        let part = resolve_target(rels.get(&rel_id), &sheet_id, sheets.len());
                        sheets.push(SheetInfo { name, part });
                    }
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Turn a relationship target into an archive part path. Entries whose
/// relationship is missing fall back to the conventional worksheet path.
fn resolve_target(target: Option<&String>, sheet_id: &str, position: usize) -> String {
    match target {
        Some(t) if t.starts_with('/') => t[1..].to_string(),
        Some(t) => format!("xl/{t}"),
        None if !sheet_id.is_empty() => format!("xl/worksheets/sheet{sheet_id}.xml"),
        None => format!("xl/worksheets/sheet{}.xml", position + 1),
    }
}
