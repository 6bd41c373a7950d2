//! Voxel grid to VXL/HVA conversion.
//!
//! Conversion is two-pass. The first pass walks the grid in a fixed
//! order (y, then x, then z) feeding colors to the palette builder, so
//! slot assignment is deterministic. The second pass encodes columns in
//! parallel against the now read-only palette.

use rayon::prelude::*;

use vxl_common::error::ConversionError;
use vxl_common::formats::span::{Column, Span, Voxel};
use vxl_common::formats::vxl::{DEFAULT_REMAP_END, DEFAULT_REMAP_START};
use vxl_common::{HvaFile, Limb, Matrix3x4, NormalsMode, SectionName, VxlFile};

use crate::grid::VoxelGrid;
use crate::normals::{face_normal_index, ExposedFaces};
use crate::palette::PaletteBuilder;

/// Knobs for a single conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Section name written to both files.
    pub name: String,
    /// File name slot of the generated animation.
    pub model_name: String,
    pub scale: f32,
    pub normals_mode: NormalsMode,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            name: "Body".to_string(),
            model_name: "EXPORT".to_string(),
            scale: 1.0,
            normals_mode: NormalsMode::RedAlert2,
        }
    }
}

/// Convert a grid into a single-limb geometry file and the single-frame
/// identity animation that poses it.
pub fn convert_grid(
    grid: &VoxelGrid,
    options: &ConvertOptions,
) -> Result<(VxlFile, HvaFile), ConversionError> {
    let dims = checked_dims(grid)?;

    let mut palette = PaletteBuilder::new();
    for y in 0..dims[1] as usize {
        for x in 0..dims[0] as usize {
            for z in 0..dims[2] as usize {
                if let Some(v) = grid.get(x, y, z) {
                    if !v.team {
                        palette.index_for(v.rgb);
                    }
                }
            }
        }
    }

    let columns: Vec<Column> = (0..dims[0] as usize * dims[1] as usize)
        .into_par_iter()
        .map(|i| {
            let x = i % dims[0] as usize;
            let y = i / dims[0] as usize;
            encode_grid_column(grid, &palette, x, y)
        })
        .collect();

    let limb = Limb {
        name: SectionName::new(&options.name),
        scale: options.scale,
        transform: Matrix3x4::IDENTITY,
        min_bounds: [0.0, 0.0, 0.0],
        max_bounds: [dims[0] as f32, dims[1] as f32, dims[2] as f32],
        dims,
        normals_mode: options.normals_mode as u8,
        columns,
    };

    let vxl = VxlFile {
        palette: palette.finish(),
        remap_start: DEFAULT_REMAP_START,
        remap_end: DEFAULT_REMAP_END,
        limbs: vec![limb],
    };
    let hva = HvaFile::identity(&options.model_name, vec![SectionName::new(&options.name)]);
    Ok((vxl, hva))
}

fn checked_dims(grid: &VoxelGrid) -> Result<[u8; 3], ConversionError> {
    let dims = grid.dims();
    for (value, axis) in dims.into_iter().zip(["x", "y", "z"]) {
        if value == 0 || value > 255 {
            return Err(ConversionError::DimensionOutOfRange { axis, value });
        }
    }
    Ok([dims[0] as u8, dims[1] as u8, dims[2] as u8])
}

/// Scan one column bottom to top into spans, with skips relative to the
/// previous span's end.
fn encode_grid_column(grid: &VoxelGrid, palette: &PaletteBuilder, x: usize, y: usize) -> Column {
    let dim_z = grid.dims()[2];
    let mut spans = Vec::new();
    let mut z = 0usize;
    let mut last_end = 0usize;

    while z < dim_z {
        while z < dim_z && !grid.is_solid(x, y, z) {
            z += 1;
        }
        if z >= dim_z {
            break;
        }

        let skip = (z - last_end) as u8;
        let mut voxels = Vec::new();
        while z < dim_z {
            let Some(cell) = grid.get(x, y, z) else { break };
            let color = if cell.team {
                palette.team_index(cell.rgb)
            } else {
                palette.resolve(cell.rgb)
            };
            let normal = face_normal_index(exposed_faces(grid, x, y, z));
            voxels.push(Voxel { color, normal });
            z += 1;
        }
        last_end = z;
        spans.push(Span { skip, voxels });
    }

    if spans.is_empty() {
        Column::Empty
    } else {
        Column::Spans(spans)
    }
}

fn exposed_faces(grid: &VoxelGrid, x: usize, y: usize, z: usize) -> ExposedFaces {
    let [dx, dy, dz] = grid.dims();
    ExposedFaces {
        pos_x: x + 1 >= dx || !grid.is_solid(x + 1, y, z),
        neg_x: x == 0 || !grid.is_solid(x - 1, y, z),
        pos_y: y + 1 >= dy || !grid.is_solid(x, y + 1, z),
        neg_y: y == 0 || !grid.is_solid(x, y - 1, z),
        pos_z: z + 1 >= dz || !grid.is_solid(x, y, z + 1),
        neg_z: z == 0 || !grid.is_solid(x, y, z - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridVoxel;
    use vxl_common::PairedModel;

    #[test]
    fn test_single_red_voxel_scenario() {
        // 2x2x3 grid with one red voxel floating at (0, 0, 1).
        let mut grid = VoxelGrid::new([2, 2, 3]);
        grid.set(0, 0, 1, GridVoxel::solid([255, 0, 0]));

        let (vxl, hva) = convert_grid(&grid, &ConvertOptions::default()).unwrap();
        assert_eq!(vxl.limbs.len(), 1);
        let limb = &vxl.limbs[0];
        assert_eq!(limb.dims, [2, 2, 3]);
        assert_eq!(limb.columns.len(), 4);
        assert_eq!(limb.voxel_count(), 1);

        // Red is the first color seen: slot 1.
        assert_eq!(vxl.palette.0[1], [255, 0, 0]);
        match &limb.columns[0] {
            Column::Spans(spans) => {
                assert_eq!(spans.len(), 1);
                // One empty cell below the voxel: leading skip of 1.
                assert_eq!(spans[0].skip, 1);
                // Top face exposed: normal 0.
                assert_eq!(spans[0].voxels, [Voxel { color: 1, normal: 0 }]);
            }
            other => panic!("expected spans, got {other:?}"),
        }
        assert!(limb.columns[1..].iter().all(|c| *c == Column::Empty));

        // The pair validates and both files encode.
        assert!(PairedModel::new(&vxl, &hva).validate().is_ok());
        let bytes = vxl.encode().unwrap();
        assert_eq!(VxlFile::decode(&bytes).unwrap(), vxl);
        assert_eq!(hva.encode().unwrap().len(), 88);
    }

    #[test]
    fn test_voxel_accounting() {
        let mut grid = VoxelGrid::new([4, 4, 8]);
        // A 2x2 pillar of height 5 plus a floating voxel above a gap.
        for x in 0..2 {
            for y in 0..2 {
                for z in 0..5 {
                    grid.set(x, y, z, GridVoxel::solid([50, 60, 70]));
                }
            }
        }
        grid.set(0, 0, 7, GridVoxel::solid([1, 2, 3]));

        let (vxl, _) = convert_grid(&grid, &ConvertOptions::default()).unwrap();
        assert_eq!(vxl.limbs[0].voxel_count(), grid.voxel_count());

        // The gapped column carries two spans; the skip bridges z=5..7.
        match vxl.limbs[0].column(0, 0).unwrap() {
            Column::Spans(spans) => {
                assert_eq!(spans.len(), 2);
                assert_eq!(spans[1].skip, 2);
            }
            other => panic!("expected spans, got {other:?}"),
        }
    }

    #[test]
    fn test_interior_voxel_normals() {
        // 3x3x3 solid cube: the center voxel is buried and points up, the
        // top-center voxel sees only its top face.
        let mut grid = VoxelGrid::new([3, 3, 3]);
        for x in 0..3 {
            for y in 0..3 {
                for z in 0..3 {
                    grid.set(x, y, z, GridVoxel::solid([9, 9, 9]));
                }
            }
        }
        let (vxl, _) = convert_grid(&grid, &ConvertOptions::default()).unwrap();
        let column = match vxl.limbs[0].column(1, 1).unwrap() {
            Column::Spans(spans) => &spans[0],
            other => panic!("expected spans, got {other:?}"),
        };
        assert_eq!(column.voxels[0].normal, 12); // bottom
        assert_eq!(column.voxels[1].normal, 0); // buried, defaults up
        assert_eq!(column.voxels[2].normal, 0); // top
    }

    #[test]
    fn test_team_voxels_use_remap_range() {
        let mut grid = VoxelGrid::new([1, 1, 1]);
        grid.set(0, 0, 0, GridVoxel::team([255, 255, 255]));
        let (vxl, _) = convert_grid(&grid, &ConvertOptions::default()).unwrap();
        match vxl.limbs[0].column(0, 0).unwrap() {
            Column::Spans(spans) => {
                let color = spans[0].voxels[0].color;
                assert!((DEFAULT_REMAP_START..=DEFAULT_REMAP_END).contains(&color));
            }
            other => panic!("expected spans, got {other:?}"),
        }
    }

    #[test]
    fn test_dimension_out_of_range() {
        assert_eq!(
            convert_grid(&VoxelGrid::new([0, 2, 2]), &ConvertOptions::default()).unwrap_err(),
            ConversionError::DimensionOutOfRange { axis: "x", value: 0 }
        );
        assert_eq!(
            convert_grid(&VoxelGrid::new([2, 2, 256]), &ConvertOptions::default()).unwrap_err(),
            ConversionError::DimensionOutOfRange {
                axis: "z",
                value: 256
            }
        );
    }
}
