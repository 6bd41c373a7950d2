//! Legacy Westwood binary formats.
//!
//! Three codecs share this module: VXL voxel geometry, HVA animation, and
//! the MIX archive container. All three are little-endian throughout and
//! round-trip exactly: decode-then-encode reproduces the input bytes.
//!
//! Magic bytes identify VXL; HVA and MIX have none and are recognized by
//! extension or by [`mix::sniff_member`].

pub mod hva;
pub mod mix;
pub mod name;
pub mod span;
pub mod vxl;

pub use hva::{HvaFile, HvaHeader};
pub use mix::{member_id, MemberKind, MixArchive, MixMember};
pub use name::SectionName;
pub use span::{Column, Span, Voxel};
pub use vxl::{
    Limb, LimbHeader, LimbTailer, NormalsMode, Palette, VxlFile, VxlHeader, EMPTY_COLUMN_SENTINEL,
    STANDARD_SCALE, VXL_MAGIC,
};
