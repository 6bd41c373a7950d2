//! HVA animation format codec.
//!
//! An HVA file carries per-frame 3x4 transforms for every section of its
//! paired VXL. Section names must match the VXL's limb names in order;
//! that cross-file check is the pair validator's job, not this codec's.
//!
//! # Layout
//! ```text
//! 0x00: file name (16 bytes, NUL padded)
//! 0x10: u32 frame count
//! 0x14: u32 section count
//! 0x18: section names (section_count x 16 bytes)
//! var:  matrices (frame_count x section_count x 48 bytes,
//!       12 x f32 row-major, section-major within each frame)
//! ```
//!
//! A non-animated model ships exactly one frame of identity-like
//! transforms.

use crate::error::FormatError;
use crate::formats::name::SectionName;
use crate::math::Matrix3x4;

/// HVA file header (24 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HvaHeader {
    pub name: SectionName,
    pub frame_count: u32,
    pub section_count: u32,
}

impl HvaHeader {
    pub const SIZE: usize = 24;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..16].copy_from_slice(self.name.as_bytes());
        bytes[16..20].copy_from_slice(&self.frame_count.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.section_count.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut name = [0u8; 16];
        name.copy_from_slice(&bytes[0..16]);
        Some(Self {
            name: SectionName::from_bytes(name),
            frame_count: u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]),
            section_count: u32::from_le_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]),
        })
    }

    /// Total file size implied by this header, saturating on hostile
    /// counts so an oversized claim fails the length check instead of
    /// overflowing.
    pub fn expected_file_size(&self) -> usize {
        let names = (self.section_count as usize).saturating_mul(SectionName::SIZE);
        let matrices = (self.frame_count as usize)
            .saturating_mul(self.section_count as usize)
            .saturating_mul(Matrix3x4::SIZE);
        Self::SIZE.saturating_add(names).saturating_add(matrices)
    }
}

/// A decoded HVA file: named sections plus one transform per section per
/// frame. Value object, like [`crate::formats::vxl::VxlFile`].
#[derive(Debug, Clone, PartialEq)]
pub struct HvaFile {
    /// File name slot from the header (conventionally the base name,
    /// uppercased; not compared against anything).
    pub name: SectionName,
    pub section_names: Vec<SectionName>,
    /// `frames[f][s]` is section `s`'s transform in frame `f`.
    pub frames: Vec<Vec<Matrix3x4>>,
}

impl HvaFile {
    /// Single-frame animation holding the identity transform for every
    /// section, the steady state for non-animated models.
    pub fn identity(name: &str, section_names: Vec<SectionName>) -> Self {
        let frame = vec![Matrix3x4::IDENTITY; section_names.len()];
        Self {
            name: SectionName::new(name),
            section_names,
            frames: vec![frame],
        }
    }

    /// Decode a complete HVA file.
    pub fn decode(bytes: &[u8]) -> Result<Self, FormatError> {
        let header = HvaHeader::from_bytes(bytes).ok_or(FormatError::TruncatedInput {
            offset: 0,
            needed: HvaHeader::SIZE,
            available: bytes.len(),
        })?;
        let expected = header.expected_file_size();
        if bytes.len() < expected {
            return Err(FormatError::TruncatedInput {
                offset: HvaHeader::SIZE,
                needed: expected - HvaHeader::SIZE,
                available: bytes.len(),
            });
        }

        let section_count = header.section_count as usize;
        let mut section_names = Vec::with_capacity(section_count);
        for i in 0..section_count {
            let offset = HvaHeader::SIZE + i * SectionName::SIZE;
            let mut name = [0u8; 16];
            name.copy_from_slice(&bytes[offset..offset + 16]);
            section_names.push(SectionName::from_bytes(name));
        }

        let mut offset = HvaHeader::SIZE + section_count * SectionName::SIZE;
        let mut frames = Vec::with_capacity(header.frame_count as usize);
        for _ in 0..header.frame_count {
            let mut frame = Vec::with_capacity(section_count);
            for _ in 0..section_count {
                // Bounds already established by the header size check.
                let matrix = Matrix3x4::from_bytes(&bytes[offset..offset + Matrix3x4::SIZE])
                    .ok_or(FormatError::TruncatedInput {
                        offset,
                        needed: Matrix3x4::SIZE,
                        available: bytes.len(),
                    })?;
                frame.push(matrix);
                offset += Matrix3x4::SIZE;
            }
            frames.push(frame);
        }

        Ok(Self {
            name: header.name,
            section_names,
            frames,
        })
    }

    /// Encode to bytes, the exact mirror of [`HvaFile::decode`].
    pub fn encode(&self) -> Result<Vec<u8>, FormatError> {
        for (i, frame) in self.frames.iter().enumerate() {
            if frame.len() != self.section_names.len() {
                return Err(FormatError::FrameSizeMismatch {
                    frame: i,
                    expected: self.section_names.len(),
                    actual: frame.len(),
                });
            }
        }
        let frame_count: u32 =
            self.frames.len().try_into().map_err(|_| FormatError::FieldOverflow {
                what: "frame count",
                value: self.frames.len() as u64,
                field: "u32",
            })?;
        let section_count: u32 =
            self.section_names
                .len()
                .try_into()
                .map_err(|_| FormatError::FieldOverflow {
                    what: "section count",
                    value: self.section_names.len() as u64,
                    field: "u32",
                })?;

        let header = HvaHeader {
            name: self.name,
            frame_count,
            section_count,
        };
        let mut out = Vec::with_capacity(header.expected_file_size());
        out.extend_from_slice(&header.to_bytes());
        for name in &self.section_names {
            out.extend_from_slice(name.as_bytes());
        }
        for frame in &self.frames {
            for matrix in frame {
                out.extend_from_slice(&matrix.to_bytes());
            }
        }
        Ok(out)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn section_count(&self) -> usize {
        self.section_names.len()
    }
}
