//! Run-length span codec for one voxel column.
//!
//! A column is the stack of voxels sharing one (x, y) inside a limb. On
//! disk it is a run-length list of spans:
//!
//! ```text
//! span:       skip u8, count u8, (color u8, normal u8) x count, count u8
//! terminator: remaining u8, 0 u8
//! ```
//!
//! `skip` counts empty voxels since the end of the previous span (or the
//! column floor for the first span). The trailing duplicate count is
//! required by the game engine and must agree with the leading one. The
//! terminator's first byte carries the empty voxels left above the last
//! span, so a well-formed column always accounts for exactly `dim_z`
//! voxels.
//!
//! Columns with no voxel data at all are represented one level up by the
//! sentinel offset in the VXL offset tables and never reach this codec.

use crate::error::SpanError;

/// One voxel: palette color index plus encoded lighting normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voxel {
    pub color: u8,
    pub normal: u8,
}

/// A maximal run of contiguous occupied voxels within a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Empty voxels between the previous span (or column floor) and this one.
    pub skip: u8,
    /// Occupied voxels, bottom to top.
    pub voxels: Vec<Voxel>,
}

/// One limb column: either absent from the file entirely, or a span list.
///
/// `Spans(vec![])` is a column that is present with zero voxels (it still
/// carries a terminator on disk); `Empty` is the sentinel-offset case with
/// no bytes at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Empty,
    Spans(Vec<Span>),
}

impl Column {
    /// Total occupied voxels in this column.
    pub fn voxel_count(&self) -> usize {
        match self {
            Column::Empty => 0,
            Column::Spans(spans) => spans.iter().map(|s| s.voxels.len()).sum(),
        }
    }

    /// Voxel slots consumed by skips plus spans (the z the last span ends at).
    pub fn occupied_height(&self) -> usize {
        match self {
            Column::Empty => 0,
            Column::Spans(spans) => spans
                .iter()
                .map(|s| s.skip as usize + s.voxels.len())
                .sum(),
        }
    }
}

/// Decode one column from the start of `bytes`.
///
/// Stops exactly at the terminator and returns the span list together
/// with the number of bytes consumed, so the caller can locate the next
/// column without a separate length field.
pub fn decode_column(bytes: &[u8]) -> Result<(Vec<Span>, usize), SpanError> {
    let mut pos = 0usize;
    let mut spans = Vec::new();

    loop {
        let [skip, count] = read2(bytes, pos)?;
        pos += 2;

        if count == 0 {
            // (remaining_skip, 0) terminator
            return Ok((spans, pos));
        }

        let mut voxels = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let [color, normal] = read2(bytes, pos)?;
            pos += 2;
            voxels.push(Voxel { color, normal });
        }

        let trailing = *bytes.get(pos).ok_or(SpanError::Truncated { offset: pos })?;
        pos += 1;
        if trailing != count {
            return Err(SpanError::CountMismatch {
                leading: count,
                trailing,
            });
        }

        spans.push(Span { skip, voxels });
    }
}

/// Encode one column's spans, including the terminator.
///
/// `dim_z` is the column height; the terminator's skip byte is the empty
/// space left above the last span. Fails if the spans overflow the column
/// or a single span holds more than 255 voxels.
pub fn encode_column(spans: &[Span], dim_z: u8, out: &mut Vec<u8>) -> Result<(), SpanError> {
    let mut occupied = 0usize;

    for span in spans {
        if span.voxels.len() > u8::MAX as usize {
            return Err(SpanError::Overflow {
                occupied: span.voxels.len(),
                dim_z,
            });
        }
        occupied += span.skip as usize + span.voxels.len();
        if occupied > dim_z as usize {
            return Err(SpanError::Overflow {
                occupied,
                dim_z,
            });
        }

        let count = span.voxels.len() as u8;
        out.push(span.skip);
        out.push(count);
        for v in &span.voxels {
            out.push(v.color);
            out.push(v.normal);
        }
        out.push(count);
    }

    out.push((dim_z as usize - occupied) as u8);
    out.push(0);
    Ok(())
}

fn read2(bytes: &[u8], pos: usize) -> Result<[u8; 2], SpanError> {
    match bytes.get(pos..pos + 2) {
        Some(&[a, b]) => Ok([a, b]),
        _ => Err(SpanError::Truncated { offset: pos }),
    }
}
