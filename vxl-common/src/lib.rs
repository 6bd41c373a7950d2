//! Shared codecs and validation for the Westwood voxel model toolchain
//!
//! This crate provides the format layer shared between:
//! - `vxl-export` (conversion and archive tooling)
//! - downstream viewers and validators
//!
//! # Modules
//!
//! - [`formats`] - VXL geometry, HVA animation, and MIX archive codecs
//! - [`pair`] - VXL/HVA cross-file consistency checks
//! - [`math`] - the 3x4 transform both file formats carry
//! - [`error`] - structural and semantic error types

pub mod error;
pub mod formats;
pub mod math;
pub mod pair;

pub use error::{ConversionError, FormatError, SpanError, ValidationError};
pub use math::Matrix3x4;
pub use pair::{rename_section, PairedModel};

// Re-export commonly used format items
pub use formats::{
    member_id, Column, HvaFile, HvaHeader, Limb, MemberKind, MixArchive, MixMember, NormalsMode,
    Palette, SectionName, Span, Voxel, VxlFile, VxlHeader, EMPTY_COLUMN_SENTINEL, STANDARD_SCALE,
    VXL_MAGIC,
};
