//! Normal re-computation for existing models.
//!
//! Hand-edited or machine-converted files often ship flat or garbage
//! normals; this pass reconstructs each limb's occupancy, derives a
//! surface direction per voxel from its open faces, and snaps it to the
//! nearest table normal. Geometry, colors, and the normals-mode byte are
//! left untouched.

use vxl_common::formats::span::Column;
use vxl_common::{Limb, VxlFile};

use crate::normals::{closest_normal, ExposedFaces};

/// New file with every voxel's normal recomputed from its neighborhood.
pub fn renormalize(file: &VxlFile) -> VxlFile {
    let mut out = file.clone();
    for limb in &mut out.limbs {
        renormalize_limb(limb);
    }
    out
}

fn renormalize_limb(limb: &mut Limb) {
    let occupancy = Occupancy::from_limb(limb);
    let dim_x = limb.dims[0] as usize;

    for (i, column) in limb.columns.iter_mut().enumerate() {
        let Column::Spans(spans) = column else { continue };
        let (x, y) = (i % dim_x.max(1), i / dim_x.max(1));
        let mut z = 0usize;
        for span in spans {
            z += span.skip as usize;
            for voxel in &mut span.voxels {
                voxel.normal = closest_normal(occupancy.exposed(x, y, z).direction());
                z += 1;
            }
        }
    }
}

/// Dense solid/empty view of one limb, rebuilt from its span columns.
struct Occupancy {
    dims: [usize; 3],
    solid: Vec<bool>,
}

impl Occupancy {
    fn from_limb(limb: &Limb) -> Self {
        let dims = [
            limb.dims[0] as usize,
            limb.dims[1] as usize,
            limb.dims[2] as usize,
        ];
        let mut solid = vec![false; dims[0] * dims[1] * dims[2]];

        for (i, column) in limb.columns.iter().enumerate() {
            let Column::Spans(spans) = column else { continue };
            let mut z = 0usize;
            for span in spans {
                z += span.skip as usize;
                for _ in &span.voxels {
                    if z < dims[2] {
                        solid[(z * dims[1] + i / dims[0].max(1)) * dims[0] + i % dims[0].max(1)] =
                            true;
                    }
                    z += 1;
                }
            }
        }
        Self { dims, solid }
    }

    fn is_solid(&self, x: usize, y: usize, z: usize) -> bool {
        if x >= self.dims[0] || y >= self.dims[1] || z >= self.dims[2] {
            return false;
        }
        self.solid[(z * self.dims[1] + y) * self.dims[0] + x]
    }

    fn exposed(&self, x: usize, y: usize, z: usize) -> ExposedFaces {
        ExposedFaces {
            pos_x: !self.is_solid(x + 1, y, z),
            neg_x: x == 0 || !self.is_solid(x - 1, y, z),
            pos_y: !self.is_solid(x, y + 1, z),
            neg_y: y == 0 || !self.is_solid(x, y - 1, z),
            pos_z: !self.is_solid(x, y, z + 1),
            neg_z: z == 0 || !self.is_solid(x, y, z - 1),
        }
    }
}
