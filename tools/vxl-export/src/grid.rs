//! Dense voxel grid, the input side of conversion.
//!
//! Source formats (MagicaVoxel, future importers) load into this one
//! structure; the converter only ever sees a `VoxelGrid`. Coordinates
//! follow the model formats: x/y in the ground plane, z up, column
//! (x, y) holding voxels bottom to top.

/// One occupied grid cell: its color plus whether it should take the
/// player's team color in game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridVoxel {
    pub rgb: [u8; 3],
    /// Team-tagged cells are mapped into the palette's remap range
    /// instead of the shared color table.
    pub team: bool,
}

impl GridVoxel {
    pub fn solid(rgb: [u8; 3]) -> Self {
        Self { rgb, team: false }
    }

    pub fn team(rgb: [u8; 3]) -> Self {
        Self { rgb, team: true }
    }
}

/// Dense `(x, y, z) -> Option<GridVoxel>` grid.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    dims: [usize; 3],
    cells: Vec<Option<GridVoxel>>,
}

impl VoxelGrid {
    /// Empty grid of the given extents. Extents are validated against the
    /// file format's limits at conversion time, not here, so loaders can
    /// build a grid before deciding what to do with an oversized model.
    pub fn new(dims: [usize; 3]) -> Self {
        Self {
            dims,
            cells: vec![None; dims[0] * dims[1] * dims[2]],
        }
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    fn index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x >= self.dims[0] || y >= self.dims[1] || z >= self.dims[2] {
            return None;
        }
        Some((z * self.dims[1] + y) * self.dims[0] + x)
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<GridVoxel> {
        self.cells[self.index(x, y, z)?]
    }

    /// Place a voxel. Returns false (and drops the voxel) outside the
    /// grid, so loaders can count out-of-bounds source data instead of
    /// failing on it.
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: GridVoxel) -> bool {
        match self.index(x, y, z) {
            Some(i) => {
                self.cells[i] = Some(voxel);
                true
            }
            None => false,
        }
    }

    pub fn is_solid(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z).is_some()
    }

    /// Occupied cells.
    pub fn voxel_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
