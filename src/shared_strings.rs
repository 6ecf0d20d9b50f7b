//! Shared strings table parsing.

use crate::error::{Error, Result};

/// The workbook-wide shared strings table.
///
/// String cells in worksheet parts store an index into this table instead
/// of the text itself. Each `<si>` entry may be a single `<t>` run or a
/// rich-text sequence of runs; runs are concatenated in document order.
#[derive(Debug, Clone, Default)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Parse the shared strings table from `xl/sharedStrings.xml` content.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut strings = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        // Whitespace inside <t> runs is significant; the in_t flag keeps
        // inter-element whitespace out instead of the trimmer.
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut current = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"t" if in_si => {
                        in_t = true;
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::Empty(e)) => {
                    // A self-closing <si/> still occupies an index.
                    if e.name().as_ref() == b"si" {
                        strings.push(String::new());
                    }
                }
                Ok(quick_xml::events::Event::Text(e)) => {
                    if in_t {
                        let text = e.unescape()?;
                        current.push_str(&text);
                    }
                }
                Ok(quick_xml::events::Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(std::mem::take(&mut current));
                        in_si = false;
                    }
                    b"t" => {
                        in_t = false;
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { strings })
    }

    /// Look up a string by zero-based index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate over all entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_entries() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="3">
    <si><t>Name</t></si>
    <si><t>Department</t></si>
    <si><t>Status</t></si>
</sst>"#;

        let sst = SharedStrings::parse(xml).unwrap();
        assert_eq!(sst.len(), 3);
        assert_eq!(sst.get(0), Some("Name"));
        assert_eq!(sst.get(2), Some("Status"));
        assert_eq!(sst.get(3), None);
    }

    #[test]
    fn test_rich_text_runs_concatenate() {
        let xml = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <si>
        <r><t>Quarterly</t></r>
        <r><rPr><b/></rPr><t> Report</t></r>
    </si>
</sst>"#;

        let sst = SharedStrings::parse(xml).unwrap();
        assert_eq!(sst.len(), 1);
        assert_eq!(sst.get(0), Some("Quarterly Report"));
    }

    #[test]
    fn test_self_closing_entry_keeps_index() {
        let xml = r#"<sst><si><t>before</t></si><si/><si><t>after</t></si></sst>"#;

        let sst = SharedStrings::parse(xml).unwrap();
        assert_eq!(sst.len(), 3);
        assert_eq!(sst.get(1), Some(""));
        assert_eq!(sst.get(2), Some("after"));
    }

    #[test]
    fn test_entities_unescaped() {
        let xml = r#"<sst><si><t>Research &amp; Development</t></si></sst>"#;

        let sst = SharedStrings::parse(xml).unwrap();
        assert_eq!(sst.get(0), Some("Research & Development"));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let err = SharedStrings::parse("<sst><si><t>oops</si>").unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));
    }
}
