//! MagicaVoxel `.vox` reader.
//!
//! Reads the subset the converter needs: the first model's SIZE and XYZI
//! chunks plus the RGBA palette. Scene-graph chunks (nTRN, nGRP, MATL,
//! ...) are skipped by the generic chunk walk.
//!
//! MagicaVoxel color indices are 1-based; index 0 is empty. The default
//! grayscale palette applies when no RGBA chunk is present.

use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::grid::{GridVoxel, VoxelGrid};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoxError {
    #[error("not a VOX file: magic {found:?}")]
    BadMagic { found: Vec<u8> },

    #[error("chunk {chunk} truncated at byte {offset}")]
    TruncatedChunk { chunk: String, offset: usize },

    #[error("no SIZE chunk found")]
    MissingSize,

    #[error("{axis} dimension {value} exceeds the voxel format limit of 255")]
    OversizedModel { axis: &'static str, value: usize },
}

/// Load a `.vox` file from disk into a grid.
pub fn load_vox_file(path: &Path) -> Result<VoxelGrid> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read VOX file: {:?}", path))?;
    let grid = parse_vox(&bytes).with_context(|| format!("Failed to parse {:?}", path))?;
    Ok(grid)
}

/// Parse `.vox` bytes into a grid.
pub fn parse_vox(bytes: &[u8]) -> Result<VoxelGrid, VoxError> {
    if bytes.len() < 8 || &bytes[0..4] != b"VOX " {
        return Err(VoxError::BadMagic {
            found: bytes.get(0..4).unwrap_or_default().to_vec(),
        });
    }
    // bytes 4..8: format version, accepted as-is.

    let mut dims: Option<[usize; 3]> = None;
    let mut voxels: Vec<[u8; 4]> = Vec::new();
    let mut palette: Option<Vec<[u8; 3]>> = None;

    let mut pos = 8usize;
    while pos + 12 <= bytes.len() {
        let id = [bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]];
        let content_size = read_u32(bytes, pos + 4) as usize;
        let children_size = read_u32(bytes, pos + 8) as usize;
        let content_start = pos + 12;
        let content = bytes
            .get(content_start..content_start + content_size)
            .ok_or_else(|| VoxError::TruncatedChunk {
                chunk: String::from_utf8_lossy(&id).into_owned(),
                offset: content_start,
            })?;

        match &id {
            b"SIZE" if dims.is_none() => {
                if content.len() < 12 {
                    return Err(VoxError::TruncatedChunk {
                        chunk: "SIZE".to_string(),
                        offset: content_start,
                    });
                }
                dims = Some([
                    read_u32(content, 0) as usize,
                    read_u32(content, 4) as usize,
                    read_u32(content, 8) as usize,
                ]);
            }
            b"XYZI" if voxels.is_empty() => {
                if content.len() < 4 {
                    return Err(VoxError::TruncatedChunk {
                        chunk: "XYZI".to_string(),
                        offset: content_start,
                    });
                }
                let count = read_u32(content, 0) as usize;
                let records = content.get(4..4 + count * 4).ok_or_else(|| {
                    VoxError::TruncatedChunk {
                        chunk: "XYZI".to_string(),
                        offset: content_start + 4,
                    }
                })?;
                for r in records.chunks_exact(4) {
                    voxels.push([r[0], r[1], r[2], r[3]]);
                }
            }
            b"RGBA" => {
                if content.len() < 256 * 4 {
                    return Err(VoxError::TruncatedChunk {
                        chunk: "RGBA".to_string(),
                        offset: content_start,
                    });
                }
                palette = Some(
                    content[..256 * 4]
                        .chunks_exact(4)
                        .map(|c| [c[0], c[1], c[2]])
                        .collect(),
                );
            }
            // MAIN carries everything as children; walk into it. Any
            // other chunk is skipped whole.
            b"MAIN" => {
                pos = content_start + content_size;
                continue;
            }
            _ => {}
        }
        pos = content_start + content_size + children_size;
    }

    let dims = dims.ok_or(VoxError::MissingSize)?;
    // Bound the declared extents before allocating: the target format
    // caps each axis at 255 anyway, and a hostile SIZE chunk must not
    // drive the grid allocation.
    for (value, axis) in dims.into_iter().zip(["x", "y", "z"]) {
        if value > 255 {
            return Err(VoxError::OversizedModel { axis, value });
        }
    }
    let palette =
        palette.unwrap_or_else(|| (0..=255u8).map(|i| [i, i, i]).collect::<Vec<[u8; 3]>>());

    let mut grid = VoxelGrid::new(dims);
    let mut dropped = 0usize;
    for [x, y, z, ci] in voxels {
        if ci == 0 {
            continue;
        }
        let rgb = palette[(ci - 1) as usize];
        if !grid.set(x as usize, y as usize, z as usize, GridVoxel::solid(rgb)) {
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::warn!("{dropped} voxels outside the declared SIZE were dropped");
    }
    Ok(grid)
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    match bytes.get(offset..offset + 4) {
        Some(&[a, b, c, d]) => u32::from_le_bytes([a, b, c, d]),
        _ => 0,
    }
}
