//! Lighting-normal encoding.
//!
//! Converted voxels get a normal index from their exposed faces, with a
//! fixed priority so the result is deterministic regardless of how many
//! faces are open. Re-normalization instead averages the open-face
//! directions and snaps to the nearest entry of the engine's unit-normal
//! table.

/// The engine's 36-entry unit-normal table: the 6 cardinals, the 12 edge
/// diagonals, the 8 corner diagonals, and 10 steeper edge normals.
pub const NORMAL_TABLE: [[f32; 3]; 36] = [
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.707, 0.0, 0.707],
    [-0.707, 0.0, 0.707],
    [0.0, 0.707, 0.707],
    [0.0, -0.707, 0.707],
    [0.707, 0.0, -0.707],
    [-0.707, 0.0, -0.707],
    [0.0, 0.707, -0.707],
    [0.0, -0.707, -0.707],
    [0.707, 0.707, 0.0],
    [-0.707, 0.707, 0.0],
    [0.707, -0.707, 0.0],
    [-0.707, -0.707, 0.0],
    [0.577, 0.577, 0.577],
    [-0.577, 0.577, 0.577],
    [0.577, -0.577, 0.577],
    [-0.577, -0.577, 0.577],
    [0.577, 0.577, -0.577],
    [-0.577, 0.577, -0.577],
    [0.577, -0.577, -0.577],
    [-0.577, -0.577, -0.577],
    [0.894, 0.447, 0.0],
    [-0.894, 0.447, 0.0],
    [0.894, -0.447, 0.0],
    [-0.894, -0.447, 0.0],
    [0.447, 0.0, 0.894],
    [-0.447, 0.0, 0.894],
    [0.447, 0.0, -0.894],
    [-0.447, 0.0, -0.894],
    [0.0, 0.447, 0.894],
    [0.0, -0.447, 0.894],
];

/// Which of a voxel's six faces border empty space, in the face order
/// used throughout the converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExposedFaces {
    pub pos_z: bool,
    pub neg_z: bool,
    pub pos_x: bool,
    pub neg_x: bool,
    pub pos_y: bool,
    pub neg_y: bool,
}

impl ExposedFaces {
    pub fn any(&self) -> bool {
        self.pos_z || self.neg_z || self.pos_x || self.neg_x || self.pos_y || self.neg_y
    }

    /// Sum of the open-face direction vectors, the input to
    /// [`closest_normal`].
    pub fn direction(&self) -> [f32; 3] {
        let mut v = [0.0f32; 3];
        if self.pos_x {
            v[0] += 1.0;
        }
        if self.neg_x {
            v[0] -= 1.0;
        }
        if self.pos_y {
            v[1] += 1.0;
        }
        if self.neg_y {
            v[1] -= 1.0;
        }
        if self.pos_z {
            v[2] += 1.0;
        }
        if self.neg_z {
            v[2] -= 1.0;
        }
        v
    }
}

/// Conversion-time normal index from exposed faces.
///
/// Priority order is top, bottom, +X, -X, +Y, -Y; the first open face
/// wins. Fully buried voxels point up, they are never lit anyway.
pub fn face_normal_index(faces: ExposedFaces) -> u8 {
    if faces.pos_z {
        0
    } else if faces.neg_z {
        12
    } else if faces.pos_x {
        6
    } else if faces.neg_x {
        18
    } else if faces.pos_y {
        3
    } else if faces.neg_y {
        21
    } else {
        0
    }
}

/// Index of the table normal closest to `v` by dot product.
///
/// A degenerate input (all faces open, or none) falls back to straight
/// up, matching the converter's buried-voxel behavior.
pub fn closest_normal(v: [f32; 3]) -> u8 {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len < 1e-4 {
        return 0;
    }
    let unit = [v[0] / len, v[1] / len, v[2] / len];

    let mut best = 0usize;
    let mut best_dot = f32::NEG_INFINITY;
    for (i, n) in NORMAL_TABLE.iter().enumerate() {
        let d = unit[0] * n[0] + unit[1] * n[1] + unit[2] * n[2];
        if d > best_dot {
            best_dot = d;
            best = i;
        }
    }
    best as u8
}
