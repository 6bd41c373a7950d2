//! Fixed-size VXL records: file header, palette, limb header, limb tailer.
//!
//! All integers and floats are little-endian. Offsets quoted below are
//! within the record, not the file.

use crate::error::FormatError;
use crate::formats::name::SectionName;
use crate::math::Matrix3x4;

/// 16-byte file identifier at the very start of every VXL file.
pub const VXL_MAGIC: [u8; 16] = *b"Voxel Animation\0";

/// Offset-table value marking a column with no span data at all.
pub const EMPTY_COLUMN_SENTINEL: u32 = 0xFFFF_FFFF;

/// VXL file header (34 bytes)
///
/// ```text
/// 0x00: magic "Voxel Animation\0" (16 bytes)
/// 0x10: u32 always 1
/// 0x14: u32 limb count
/// 0x18: u32 limb count (duplicate)
/// 0x1C: u32 body size
/// 0x20: u8 palette remap start
/// 0x21: u8 palette remap end
/// ```
///
/// The duplicated limb count is read leniently: the first copy wins, a
/// disagreement is left to validation tooling to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VxlHeader {
    pub limb_count: u32,
    pub body_size: u32,
    pub remap_start: u8,
    pub remap_end: u8,
}

impl VxlHeader {
    pub const SIZE: usize = 34;

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..16].copy_from_slice(&VXL_MAGIC);
        bytes[16..20].copy_from_slice(&1u32.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.limb_count.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.limb_count.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.body_size.to_le_bytes());
        bytes[32] = self.remap_start;
        bytes[33] = self.remap_end;
        bytes
    }

    /// Read header from bytes, verifying the magic string.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < Self::SIZE {
            return Err(FormatError::TruncatedInput {
                offset: 0,
                needed: Self::SIZE,
                available: bytes.len(),
            });
        }
        if bytes[0..16] != VXL_MAGIC {
            let end = bytes[0..16].iter().position(|&b| b == 0).unwrap_or(16);
            return Err(FormatError::BadMagic {
                found: String::from_utf8_lossy(&bytes[0..end]).into_owned(),
            });
        }
        Ok(Self {
            limb_count: u32::from_le_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]),
            body_size: u32::from_le_bytes([bytes[28], bytes[29], bytes[30], bytes[31]]),
            remap_start: bytes[32],
            remap_end: bytes[33],
        })
    }
}

/// 256-entry RGB palette (768 bytes), stored verbatim.
///
/// The codec reads this block through without interpreting it; which
/// indices a model actually uses is the converter's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(pub [[u8; 3]; 256]);

impl Palette {
    pub const SIZE: usize = 768;

    /// Grayscale ramp with a team-color gradient in the remap range,
    /// matching what legacy export tooling writes when no source palette
    /// exists.
    pub fn grayscale_with_team_ramp(remap_start: u8, remap_end: u8) -> Self {
        let mut colors = [[0u8; 3]; 256];
        for (i, c) in colors.iter_mut().enumerate() {
            let i = i as u8;
            if i >= remap_start && i <= remap_end {
                let intensity = (i - remap_start).wrapping_mul(16);
                *c = [intensity, intensity / 2, intensity / 4];
            } else {
                *c = [i, i, i];
            }
        }
        Self(colors)
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        for (i, rgb) in self.0.iter().enumerate() {
            bytes[i * 3..i * 3 + 3].copy_from_slice(rgb);
        }
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut colors = [[0u8; 3]; 256];
        for (i, rgb) in colors.iter_mut().enumerate() {
            rgb.copy_from_slice(&bytes[i * 3..i * 3 + 3]);
        }
        Some(Self(colors))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self([[0; 3]; 256])
    }
}

/// Per-limb header (28 bytes): name, limb index, two legacy words.
///
/// ```text
/// 0x00: name (16 bytes, NUL padded)
/// 0x10: u32 limb index
/// 0x14: u32 always 1
/// 0x18: u32 always 0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimbHeader {
    pub name: SectionName,
    pub index: u32,
}

impl LimbHeader {
    pub const SIZE: usize = 28;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..16].copy_from_slice(self.name.as_bytes());
        bytes[16..20].copy_from_slice(&self.index.to_le_bytes());
        bytes[20..24].copy_from_slice(&1u32.to_le_bytes());
        // bytes 24..28 stay 0
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
            index: u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]),
        })
    }
}

/// Per-limb tailer (92 bytes), stored after the body region.
///
/// ```text
/// 0x00: u32 span-start table offset (body relative)
/// 0x04: u32 span-end table offset (body relative)
/// 0x08: u32 span data offset (body relative)
/// 0x0C: f32 scale
/// 0x10: 12 x f32 transform (3x4, row-major)
/// 0x40: 3 x f32 min bounds
/// 0x4C: 3 x f32 max bounds
/// 0x58: u8 x 3 dimensions (x, y, z)
/// 0x5B: u8 normals mode
/// ```
///
/// Older community docs also cite dimensions at tailer offset 80; that is
/// documentation drift. Offset 88 is what the file-size formula and every
/// working exporter agree on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbTailer {
    pub span_start_offset: u32,
    pub span_end_offset: u32,
    pub span_data_offset: u32,
    pub scale: f32,
    pub transform: Matrix3x4,
    pub min_bounds: [f32; 3],
    pub max_bounds: [f32; 3],
    pub dims: [u8; 3],
    pub normals_mode: u8,
}

impl LimbTailer {
    pub const SIZE: usize = 92;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.span_start_offset.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.span_end_offset.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.span_data_offset.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.scale.to_le_bytes());
        bytes[16..64].copy_from_slice(&self.transform.to_bytes());
        for (i, v) in self.min_bounds.iter().enumerate() {
            bytes[64 + i * 4..68 + i * 4].copy_from_slice(&v.to_le_bytes());
        }
        for (i, v) in self.max_bounds.iter().enumerate() {
            bytes[76 + i * 4..80 + i * 4].copy_from_slice(&v.to_le_bytes());
        }
        bytes[88..91].copy_from_slice(&self.dims);
        bytes[91] = self.normals_mode;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let u32_at = |o: usize| u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);
        let f32_at = |o: usize| f32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);
        Some(Self {
            span_start_offset: u32_at(0),
            span_end_offset: u32_at(4),
            span_data_offset: u32_at(8),
            scale: f32_at(12),
            transform: Matrix3x4::from_bytes(&bytes[16..64])?,
            min_bounds: [f32_at(64), f32_at(68), f32_at(72)],
            max_bounds: [f32_at(76), f32_at(80), f32_at(84)],
            dims: [bytes[88], bytes[89], bytes[90]],
            normals_mode: bytes[91],
        })
    }
}
