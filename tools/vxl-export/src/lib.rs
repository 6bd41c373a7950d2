//! vxl-export library
//!
//! Provides grid conversion, normal repair, validation, and archive
//! packing for use by other tools, with the CLI binary as the thin
//! front-end.

pub mod archive;
pub mod convert;
pub mod grid;
pub mod manifest;
pub mod normalize;
pub mod normals;
pub mod palette;
pub mod validate;
pub mod vox;

// Re-export key conversion types
pub use convert::{convert_grid, ConvertOptions};
pub use grid::{GridVoxel, VoxelGrid};
pub use normalize::renormalize;

// Re-export the codec layer the tool operates on
pub use vxl_common::{
    ConversionError, FormatError, HvaFile, MixArchive, NormalsMode, PairedModel, ValidationError,
    VxlFile, STANDARD_SCALE,
};
