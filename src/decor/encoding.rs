//! Offset encodings
//!
//! Matching always happens on `&str` byte offsets. Hosts index strings
//! differently (JavaScript counts UTF-16 code units), so positions are
//! converted to the host's unit before they leave the engine.

use serde::{Deserialize, Serialize};

/// Unit in which document positions are counted
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OffsetEncoding {
    /// UTF-8 bytes (Rust string indexing)
    #[default]
    Utf8,
    /// UTF-16 code units (JavaScript string indexing)
    Utf16,
}

impl OffsetEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            OffsetEncoding::Utf8 => "utf8",
            OffsetEncoding::Utf16 => "utf16",
        }
    }

    /// Length of `text` in this encoding
    pub fn len(&self, text: &str) -> usize {
        match self {
            OffsetEncoding::Utf8 => text.len(),
            OffsetEncoding::Utf16 => text.encode_utf16().count(),
        }
    }
}

/// Converts ascending byte offsets within one string to encoded offsets.
///
/// Each call continues from the previous one, so converting all spans of a
/// run costs a single pass over the text.
pub struct OffsetMapper<'t> {
    text: &'t str,
    encoding: OffsetEncoding,
    byte: usize,
    unit: usize,
}

impl<'t> OffsetMapper<'t> {
    pub fn new(text: &'t str, encoding: OffsetEncoding) -> Self {
        Self {
            text,
            encoding,
            byte: 0,
            unit: 0,
        }
    }

    /// Encoded offset of `byte_offset`, which must lie on a char boundary
    pub fn map(&mut self, byte_offset: usize) -> usize {
        if self.encoding == OffsetEncoding::Utf8 {
            return byte_offset;
        }

        if byte_offset < self.byte {
            self.byte = 0;
            self.unit = 0;
        }
        self.unit += self.text[self.byte..byte_offset].encode_utf16().count();
        self.byte = byte_offset;
        self.unit
    }
}
