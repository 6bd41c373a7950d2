//! Fixed 16-byte name slots shared by VXL limb headers and HVA section
//! tables.
//!
//! Names are ASCII, NUL-padded on disk. Equality is byte-for-byte on the
//! trimmed text: the engine treats `"Body"` and `"body"` as distinct
//! strings, so no case folding happens here. Case-insensitive comparison
//! exists only as an explicit helper for filename-style lookups.

use std::fmt;

/// A 16-byte, NUL-padded section or file name.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SectionName([u8; 16]);

impl SectionName {
    pub const SIZE: usize = 16;

    /// Build from text, truncating to 15 bytes so at least one NUL
    /// terminator always remains (the engine reads these as C strings).
    pub fn new(name: &str) -> Self {
        let mut bytes = [0u8; 16];
        let src = name.as_bytes();
        let len = src.len().min(15);
        bytes[..len].copy_from_slice(&src[..len]);
        Self(bytes)
    }

    /// Wrap raw bytes exactly as they appear on disk.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// The raw 16-byte slot, padding included.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Name text with trailing NUL padding trimmed. Non-ASCII bytes are
    /// replaced, matching how tooling has always displayed these fields.
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(16);
        String::from_utf8_lossy(&self.0[..end])
    }

    /// Case-insensitive comparison for filename-style lookups.
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(other)
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }
}

impl fmt::Debug for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionName({:?})", self.as_str())
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl From<&str> for SectionName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
