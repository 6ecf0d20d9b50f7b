//! Error types for the unsheet library.

use std::io;
use thiserror::Error;

/// Result type alias for unsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting tabular data from a workbook.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a readable ZIP container.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required workbook part is missing from the archive.
    #[error("Missing part: {0}")]
    MissingPart(String),

    /// Error during text encoding conversion.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A cell referenced a shared string slot that does not exist.
    #[error("Shared string index {index} out of range (table has {len} entries)")]
    SharedStringIndex { index: usize, len: usize },

    /// No worksheet matched the requested selector.
    #[error("Worksheet not found: {0}")]
    SheetNotFound(String),

    /// A cell reference could not be decoded.
    #[error("Invalid cell reference: {0:?}")]
    CellRef(String),

    /// A cell carried a type code outside the supported set.
    #[error("Unsupported cell type: {0:?}")]
    UnsupportedCellType(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingPart("xl/workbook.xml".to_string());
        assert_eq!(err.to_string(), "Missing part: xl/workbook.xml");

        let err = Error::SharedStringIndex { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "Shared string index 7 out of range (table has 3 entries)"
        );

        let err = Error::UnsupportedCellType("b".to_string());
        assert_eq!(err.to_string(), "Unsupported cell type: \"b\"");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
