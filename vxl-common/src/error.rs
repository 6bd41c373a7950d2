//! Error types for the VXL/HVA/MIX codecs.
//!
//! `FormatError` covers structural corruption: the input bytes cannot be
//! decoded (or a value set cannot be encoded) at all. `ValidationError`
//! covers well-formed files that are semantically unusable, which callers
//! often want to special-case (zero dimensions and section mismatches are
//! the two failure modes seen most in the wild).
//!
//! Codecs never attempt partial recovery: the first structural violation
//! aborts that file's decode and surfaces enough context (offset, limb
//! index, column index) to diagnose without re-deriving it.

use thiserror::Error;

/// Structural error inside one voxel column's span data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    /// The duplicate trailing count byte disagrees with the leading count.
    #[error("span count mismatch: leading {leading}, trailing {trailing}")]
    CountMismatch { leading: u8, trailing: u8 },

    /// Span data ended before the column terminator.
    #[error("column data truncated at byte {offset}")]
    Truncated { offset: usize },

    /// Skips plus voxel counts exceed the column height.
    #[error("column occupies {occupied} voxels but the limb is only {dim_z} deep")]
    Overflow { occupied: usize, dim_z: u8 },
}

/// Structural corruption in a VXL, HVA, or MIX byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// File identifier does not match the fixed 16-byte magic string.
    #[error("bad magic: expected \"Voxel Animation\", found {found:?}")]
    BadMagic { found: String },

    /// Buffer is shorter than a computed offset demands.
    #[error("truncated input: need {needed} bytes at offset {offset}, have {available}")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Span data of one column failed to decode.
    #[error("limb {limb} column {column}: {source}")]
    Span {
        limb: usize,
        column: usize,
        #[source]
        source: SpanError,
    },

    /// A column offset table entry points outside the limb's body segment.
    #[error("limb {limb} column {column}: span range {start}..{end} outside body of {body_len} bytes")]
    ColumnOutOfBounds {
        limb: usize,
        column: usize,
        start: u32,
        end: u32,
        body_len: usize,
    },

    /// Archive index keys decreased; the index must be sorted ascending.
    #[error("unsorted archive index at record {position}: {prev:#010x} followed by {next:#010x}")]
    UnsortedIndex { position: usize, prev: u32, next: u32 },

    /// Two archive members hash to the same lookup id.
    #[error("duplicate archive id {id:#010x} for {first:?} and {second:?}")]
    DuplicateMemberId {
        id: u32,
        first: String,
        second: String,
    },

    /// Archive bodies do not add up to the size declared in the header.
    #[error("archive body size mismatch: header declares {declared} bytes, members total {actual}")]
    ArchiveBodyMismatch { declared: u32, actual: usize },

    /// A value does not fit the field that must carry it (e.g. more than
    /// 65535 archive members, or a limb body larger than 4 GiB).
    #[error("{what} = {value} exceeds the {field} field")]
    FieldOverflow {
        what: &'static str,
        value: u64,
        field: &'static str,
    },

    /// A limb's column list does not match its declared dimensions.
    #[error("limb {limb}: {actual} columns but dimensions demand {expected}")]
    ColumnCountMismatch {
        limb: usize,
        expected: usize,
        actual: usize,
    },

    /// An animation frame holds the wrong number of section transforms.
    #[error("frame {frame}: {actual} transforms but the file has {expected} sections")]
    FrameSizeMismatch {
        frame: usize,
        expected: usize,
        actual: usize,
    },
}

/// Well-formed but semantically inconsistent model data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// VXL and HVA disagree on the number of sections.
    #[error("section count mismatch: VXL has {vxl}, HVA has {hva}")]
    SectionCountMismatch { vxl: usize, hva: usize },

    /// VXL and HVA section names diverge at `index`.
    #[error("section {index} mismatch: VXL {vxl_name:?}, HVA {hva_name:?}")]
    SectionMismatch {
        index: usize,
        vxl_name: String,
        hva_name: String,
    },

    /// A limb declares a zero dimension. The file decodes structurally but
    /// the model is unusable; broken exporters ship these in the field.
    #[error("limb {limb} has zero dimension {dims:?}; model is unusable")]
    ZeroDimensions { limb: usize, dims: [u8; 3] },

    /// A column's skips and voxels add up past the limb's declared depth.
    /// The spans decode structurally; the voxels above the top are simply
    /// invisible in game.
    #[error("limb {limb} column {column} occupies {occupied} voxels but the limb is only {dim_z} deep")]
    ColumnOverflow {
        limb: usize,
        column: usize,
        occupied: usize,
        dim_z: u8,
    },

    /// An animation with no frames cannot pose anything.
    #[error("animation has no frames")]
    EmptyAnimation,

    /// A section index addressed a section the pair does not have.
    #[error("section index {index} out of range, pair has {count} sections")]
    SectionIndexOutOfRange { index: usize, count: usize },
}

/// Failure turning source voxel data into a model file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Grid extents must fit the format's u8 dimension fields and must
    /// not be zero.
    #[error("{axis} dimension {value} out of range, must be 1..=255")]
    DimensionOutOfRange { axis: &'static str, value: usize },
}
