//! VXL voxel geometry format codec.
//!
//! A VXL file holds one or more named limbs (hull, turret, barrel, ...),
//! each a sparse voxel volume stored as run-length span columns.
//!
//! # Layout
//! ```text
//! 0x000: header (34 bytes, see [`VxlHeader`])
//! 0x022: palette (768 bytes)
//! 0x322: limb headers (limb_count x 28 bytes)
//! var:   body region (per limb: span-start table, span-end table, span data)
//! var:   limb tailers (limb_count x 92 bytes, see [`LimbTailer`])
//! ```
//!
//! Decoding is two-pass by necessity: column counts and heights live in
//! the tailers, which sit *after* the body. The tailer offset is computed
//! analytically from header-declared sizes (`34 + 768 + limb_count*28 +
//! body_size`) before the body is touched, so decode never scans
//! speculatively.
//!
//! Column offsets in the two tables are relative to the limb's span data
//! area (`span_data_offset`), with `0xFFFF_FFFF` in both tables marking a
//! column that stores no bytes at all.

mod header;

#[cfg(test)]
mod tests;

pub use header::{
    LimbHeader, LimbTailer, Palette, VxlHeader, EMPTY_COLUMN_SENTINEL, VXL_MAGIC,
};

use crate::error::{FormatError, ValidationError};
use crate::formats::name::SectionName;
use crate::formats::span::{self, Column};
use crate::math::Matrix3x4;

/// Standard model scale, 1/12 of a game cell per voxel.
pub const STANDARD_SCALE: f32 = 0.083333;

/// Default palette remap range reserved for team colors.
pub const DEFAULT_REMAP_START: u8 = 16;
pub const DEFAULT_REMAP_END: u8 = 31;

/// Normal-encoding style declared per limb.
///
/// The raw byte is preserved on [`Limb`] so unknown values survive a
/// round-trip; this enum names the two styles the engine ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NormalsMode {
    /// 36-entry normal table ("Tiberian Sun style").
    TiberianSun = 2,
    /// 244-entry normal table ("Red Alert 2 style").
    RedAlert2 = 4,
}

impl NormalsMode {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            2 => Some(NormalsMode::TiberianSun),
            4 => Some(NormalsMode::RedAlert2),
            _ => None,
        }
    }
}

/// One named sub-model inside a VXL file.
#[derive(Debug, Clone, PartialEq)]
pub struct Limb {
    pub name: SectionName,
    pub scale: f32,
    /// 3x4 row-major section transform.
    pub transform: Matrix3x4,
    pub min_bounds: [f32; 3],
    pub max_bounds: [f32; 3],
    /// Grid extents (x, y, z); columns are addressed `y * dims[0] + x`.
    pub dims: [u8; 3],
    /// Raw normals-mode byte; see [`NormalsMode`].
    pub normals_mode: u8,
    /// `dims[0] * dims[1]` columns, row-major by y.
    pub columns: Vec<Column>,
}

impl Limb {
    /// Column at (x, y), or `None` outside the grid.
    pub fn column(&self, x: u8, y: u8) -> Option<&Column> {
        if x >= self.dims[0] || y >= self.dims[1] {
            return None;
        }
        self.columns
            .get(y as usize * self.dims[0] as usize + x as usize)
    }

    /// Declared normal style, if the raw byte names a known one.
    pub fn normals_style(&self) -> Option<NormalsMode> {
        NormalsMode::from_raw(self.normals_mode)
    }

    /// Total occupied voxels across all columns.
    pub fn voxel_count(&self) -> usize {
        self.columns.iter().map(Column::voxel_count).sum()
    }
}

/// A decoded VXL file: palette, remap range, and ordered limbs.
///
/// Value object: decoding bytes or converting a grid produces one, and
/// transformations (renames, normal rewrites) produce new instances.
#[derive(Debug, Clone, PartialEq)]
pub struct VxlFile {
    pub palette: Palette,
    pub remap_start: u8,
    pub remap_end: u8,
    pub limbs: Vec<Limb>,
}

impl VxlFile {
    /// Decode a complete VXL file.
    pub fn decode(bytes: &[u8]) -> Result<Self, FormatError> {
        let header = VxlHeader::from_bytes(bytes)?;
        let limb_count = header.limb_count as usize;

        let palette = Palette::from_bytes(&bytes[VxlHeader::SIZE..]).ok_or(
            FormatError::TruncatedInput {
                offset: VxlHeader::SIZE,
                needed: Palette::SIZE,
                available: bytes.len(),
            },
        )?;

        let limb_headers_start = VxlHeader::SIZE + Palette::SIZE;
        let body_start = limb_headers_start + limb_count * LimbHeader::SIZE;
        let tailer_start = body_start + header.body_size as usize;
        let file_size = tailer_start + limb_count * LimbTailer::SIZE;
        if bytes.len() < file_size {
            return Err(FormatError::TruncatedInput {
                offset: tailer_start,
                needed: limb_count * LimbTailer::SIZE,
                available: bytes.len(),
            });
        }

        let body = &bytes[body_start..tailer_start];
        let mut limbs = Vec::with_capacity(limb_count);

        for i in 0..limb_count {
            let limb_header = LimbHeader::from_bytes(&bytes[limb_headers_start + i * LimbHeader::SIZE..])
                .ok_or(FormatError::TruncatedInput {
                    offset: limb_headers_start + i * LimbHeader::SIZE,
                    needed: LimbHeader::SIZE,
                    available: bytes.len(),
                })?;
            let tailer = LimbTailer::from_bytes(&bytes[tailer_start + i * LimbTailer::SIZE..])
                .ok_or(FormatError::TruncatedInput {
                    offset: tailer_start + i * LimbTailer::SIZE,
                    needed: LimbTailer::SIZE,
                    available: bytes.len(),
                })?;

            let columns = decode_limb_columns(body, &tailer, i)?;
            limbs.push(Limb {
                name: limb_header.name,
                scale: tailer.scale,
                transform: tailer.transform,
                min_bounds: tailer.min_bounds,
                max_bounds: tailer.max_bounds,
                dims: tailer.dims,
                normals_mode: tailer.normals_mode,
                columns,
            });
        }

        Ok(Self {
            palette,
            remap_start: header.remap_start,
            remap_end: header.remap_end,
            limbs,
        })
    }

    /// Encode to bytes. The inverse of [`VxlFile::decode`]: span data is
    /// serialized first per limb, offsets derived from byte positions,
    /// then header, palette, limb headers, bodies, and tailers are
    /// emitted in their fixed order.
    pub fn encode(&self) -> Result<Vec<u8>, FormatError> {
        let limb_count: u32 = self.limbs.len().try_into().map_err(|_| {
            FormatError::FieldOverflow {
                what: "limb count",
                value: self.limbs.len() as u64,
                field: "u32",
            }
        })?;

        let mut body = Vec::new();
        let mut tailers = Vec::with_capacity(self.limbs.len());

        for (i, limb) in self.limbs.iter().enumerate() {
            let columns_len = limb.dims[0] as usize * limb.dims[1] as usize;
            if limb.columns.len() != columns_len {
                return Err(FormatError::ColumnCountMismatch {
                    limb: i,
                    expected: columns_len,
                    actual: limb.columns.len(),
                });
            }

            let base = body.len();
            let mut starts = vec![0u32; columns_len];
            let mut ends = vec![0u32; columns_len];
            let mut span_data = Vec::new();

            for (col, column) in limb.columns.iter().enumerate() {
                match column {
                    Column::Empty => {
                        starts[col] = EMPTY_COLUMN_SENTINEL;
                        ends[col] = EMPTY_COLUMN_SENTINEL;
                    }
                    Column::Spans(spans) => {
                        let start = span_data.len();
                        span::encode_column(spans, limb.dims[2], &mut span_data).map_err(
                            |source| FormatError::Span {
                                limb: i,
                                column: col,
                                source,
                            },
                        )?;
                        starts[col] = start as u32;
                        ends[col] = span_data.len() as u32;
                    }
                }
            }

            // Real offsets must stay distinguishable from the sentinel.
            if span_data.len() as u64 >= EMPTY_COLUMN_SENTINEL as u64 {
                return Err(FormatError::FieldOverflow {
                    what: "span data size",
                    value: span_data.len() as u64,
                    field: "u32",
                });
            }

            for &v in &starts {
                body.extend_from_slice(&v.to_le_bytes());
            }
            for &v in &ends {
                body.extend_from_slice(&v.to_le_bytes());
            }
            body.extend_from_slice(&span_data);

            tailers.push(LimbTailer {
                span_start_offset: base as u32,
                span_end_offset: (base + columns_len * 4) as u32,
                span_data_offset: (base + columns_len * 8) as u32,
                scale: limb.scale,
                transform: limb.transform,
                min_bounds: limb.min_bounds,
                max_bounds: limb.max_bounds,
                dims: limb.dims,
                normals_mode: limb.normals_mode,
            });
        }

        let body_size: u32 = body.len().try_into().map_err(|_| FormatError::FieldOverflow {
            what: "body size",
            value: body.len() as u64,
            field: "u32",
        })?;

        let header = VxlHeader {
            limb_count,
            body_size,
            remap_start: self.remap_start,
            remap_end: self.remap_end,
        };

        let mut out = Vec::with_capacity(header.expected_file_size());
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(&self.palette.to_bytes());
        for (i, limb) in self.limbs.iter().enumerate() {
            let limb_header = LimbHeader {
                name: limb.name,
                index: i as u32,
            };
            out.extend_from_slice(&limb_header.to_bytes());
        }
        out.extend_from_slice(&body);
        for tailer in &tailers {
            out.extend_from_slice(&tailer.to_bytes());
        }
        Ok(out)
    }

    /// Check the model is usable: every limb must have non-zero
    /// dimensions, and no column may stack past its limb's depth. Both
    /// decode fine structurally; they must be flagged, never silently
    /// accepted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (i, limb) in self.limbs.iter().enumerate() {
            if limb.dims.contains(&0) {
                return Err(ValidationError::ZeroDimensions {
                    limb: i,
                    dims: limb.dims,
                });
            }
            for (col, column) in limb.columns.iter().enumerate() {
                let occupied = column.occupied_height();
                if occupied > limb.dims[2] as usize {
                    return Err(ValidationError::ColumnOverflow {
                        limb: i,
                        column: col,
                        occupied,
                        dim_z: limb.dims[2],
                    });
                }
            }
        }
        Ok(())
    }

    /// Ordered section names, as the pair validator compares them.
    pub fn section_names(&self) -> impl Iterator<Item = &SectionName> {
        self.limbs.iter().map(|l| &l.name)
    }

    /// New file with every limb's normals-mode byte rewritten.
    pub fn with_normals_mode(&self, mode: NormalsMode) -> Self {
        let mut file = self.clone();
        for limb in &mut file.limbs {
            limb.normals_mode = mode as u8;
        }
        file
    }
}

impl VxlHeader {
    /// Total file size implied by this header:
    /// `34 + 768 + limb_count*28 + body_size + limb_count*92`.
    pub fn expected_file_size(&self) -> usize {
        Self::SIZE
            + Palette::SIZE
            + self.limb_count as usize * (LimbHeader::SIZE + LimbTailer::SIZE)
            + self.body_size as usize
    }
}

fn decode_limb_columns(
    body: &[u8],
    tailer: &LimbTailer,
    limb: usize,
) -> Result<Vec<Column>, FormatError> {
    let columns_len = tailer.dims[0] as usize * tailer.dims[1] as usize;
    let starts = read_offset_table(body, tailer.span_start_offset, columns_len)?;
    let ends = read_offset_table(body, tailer.span_end_offset, columns_len)?;
    let data_base = tailer.span_data_offset as usize;

    let mut columns = Vec::with_capacity(columns_len);
    for (col, (&start, &end)) in starts.iter().zip(&ends).enumerate() {
        if start == EMPTY_COLUMN_SENTINEL || end == EMPTY_COLUMN_SENTINEL {
            columns.push(Column::Empty);
            continue;
        }
        let lo = data_base + start as usize;
        let hi = data_base + end as usize;
        if lo > hi || hi > body.len() {
            return Err(FormatError::ColumnOutOfBounds {
                limb,
                column: col,
                start,
                end,
                body_len: body.len(),
            });
        }
        let (spans, _consumed) = span::decode_column(&body[lo..hi]).map_err(|source| {
            FormatError::Span {
                limb,
                column: col,
                source,
            }
        })?;
        columns.push(Column::Spans(spans));
    }
    Ok(columns)
}

fn read_offset_table(
    body: &[u8],
    offset: u32,
    columns_len: usize,
) -> Result<Vec<u32>, FormatError> {
    let start = offset as usize;
    let needed = columns_len * 4;
    let table = body
        .get(start..start + needed)
        .ok_or(FormatError::TruncatedInput {
            offset: start,
            needed,
            available: body.len(),
        })?;
    Ok(table
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
