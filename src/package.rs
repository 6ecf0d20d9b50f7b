//! ZIP container access for OOXML workbook archives.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

/// An opened workbook archive.
///
/// Owns the raw archive bytes for the lifetime of one extraction; every
/// part read happens through this value, so the handle is released when it
/// goes out of scope regardless of how parsing went.
pub struct Package {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl Package {
    /// Open a workbook archive from a file path.
    ///
    /// Fails with [`Error::Io`] when the path cannot be read and with
    /// [`Error::ZipArchive`] when the bytes are not a ZIP container.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Open a workbook archive from an in-memory byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part from the archive as a string.
    ///
    /// Handles UTF-8 (with or without BOM) and UTF-16 LE/BE encoded parts.
    pub fn read_xml(&self, part: &str) -> Result<String> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(part)
            .map_err(|_| Error::MissingPart(part.to_string()))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        decode_part_bytes(&bytes)
    }

    /// Check whether a part exists in the archive.
    pub fn has_part(&self, part: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == part)
    }

    /// Names of all parts in the archive, in no particular order.
    pub fn part_names(&self) -> Vec<String> {
        self.archive.borrow().file_names().map(String::from).collect()
    }

    /// Number of parts in the archive.
    pub fn part_count(&self) -> usize {
        self.archive.borrow().len()
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("parts", &self.part_count())
            .finish()
    }
}

/// Decode the raw bytes of an XML part, honoring a leading BOM.
pub(crate) fn decode_part_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        return String::from_utf8(rest.to_vec()).map_err(|e| Error::Encoding(e.to_string()));
    }
    if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
        return Ok(patch_encoding_declaration(&decode_utf16(rest, false)?));
    }
    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        return Ok(patch_encoding_declaration(&decode_utf16(rest, true)?));
    }
    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // BOM-less UTF-16 of markup puts null bytes in odd positions
            // (LE) or even positions (BE) for the ASCII code units.
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                Ok(patch_encoding_declaration(&decode_utf16(bytes, false)?))
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                Ok(patch_encoding_declaration(&decode_utf16(bytes, true)?))
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], big_endian: bool) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Encoding(e.to_string()))
}

/// Rewrite a UTF-16 encoding declaration after transcoding.
///
/// The declaration still announces UTF-16 once the part has been decoded to
/// a Rust string, which quick-xml rejects when reading from a `&str` source.
fn patch_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end) = content.find("?>") {
            let (decl, rest) = content.split_at(end + 2);
            let fixed = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");
            return format!("{fixed}{rest}");
        }
    }
    content.to_string()
}
