//! Tests for the VXL codec

use super::*;
use crate::error::{FormatError, SpanError};
use crate::formats::span::{Span, Voxel};

fn solid_column(color: u8, normal: u8, count: usize) -> Column {
    Column::Spans(vec![Span {
        skip: 0,
        voxels: vec![Voxel { color, normal }; count],
    }])
}

fn test_limb(name: &str, dims: [u8; 3]) -> Limb {
    let columns_len = dims[0] as usize * dims[1] as usize;
    let mut columns = vec![Column::Empty; columns_len];
    if columns_len > 0 {
        columns[0] = solid_column(100, 0, dims[2] as usize);
    }
    Limb {
        name: SectionName::new(name),
        scale: STANDARD_SCALE,
        transform: Matrix3x4::IDENTITY,
        min_bounds: [0.0, 0.0, 0.0],
        max_bounds: [dims[0] as f32, dims[1] as f32, dims[2] as f32],
        dims,
        normals_mode: NormalsMode::RedAlert2 as u8,
        columns,
    }
}

fn test_file(limbs: Vec<Limb>) -> VxlFile {
    VxlFile {
        palette: Palette::grayscale_with_team_ramp(DEFAULT_REMAP_START, DEFAULT_REMAP_END),
        remap_start: DEFAULT_REMAP_START,
        remap_end: DEFAULT_REMAP_END,
        limbs,
    }
}

// ========================================================================
// Header record tests
// ========================================================================

#[test]
fn test_header_roundtrip() {
    let header = VxlHeader {
        limb_count: 3,
        body_size: 1234,
        remap_start: 16,
        remap_end: 31,
    };
    let bytes = header.to_bytes();
    assert_eq!(bytes.len(), VxlHeader::SIZE);
    assert_eq!(&bytes[0..16], &VXL_MAGIC);
    // Limb count is stored twice.
    assert_eq!(&bytes[20..24], &3u32.to_le_bytes());
    assert_eq!(&bytes[24..28], &3u32.to_le_bytes());
    assert_eq!(VxlHeader::from_bytes(&bytes).unwrap(), header);
}

#[test]
fn test_header_bad_magic() {
    let mut bytes = VxlHeader {
        limb_count: 1,
        body_size: 0,
        remap_start: 16,
        remap_end: 31,
    }
    .to_bytes();
    bytes[0..5].copy_from_slice(b"Pixel");
    match VxlHeader::from_bytes(&bytes) {
        Err(FormatError::BadMagic { found }) => assert!(found.starts_with("Pixel")),
        other => panic!("expected BadMagic, got {other:?}"),
    }
}

#[test]
fn test_tailer_layout() {
    let tailer = LimbTailer {
        span_start_offset: 0,
        span_end_offset: 16,
        span_data_offset: 32,
        scale: STANDARD_SCALE,
        transform: Matrix3x4::IDENTITY,
        min_bounds: [-1.0, -2.0, 0.0],
        max_bounds: [1.0, 2.0, 3.0],
        dims: [2, 2, 3],
        normals_mode: 4,
    };
    let bytes = tailer.to_bytes();
    assert_eq!(bytes.len(), LimbTailer::SIZE);
    // Dimensions live at tailer offset 88..91, normals mode at 91.
    assert_eq!(&bytes[88..91], &[2, 2, 3]);
    assert_eq!(bytes[91], 4);
    assert_eq!(LimbTailer::from_bytes(&bytes).unwrap(), tailer);
}

#[test]
fn test_limb_header_constants() {
    let bytes = LimbHeader {
        name: SectionName::new("turret"),
        index: 1,
    }
    .to_bytes();
    assert_eq!(&bytes[16..20], &1u32.to_le_bytes());
    assert_eq!(&bytes[20..24], &1u32.to_le_bytes()); // legacy word, always 1
    assert_eq!(&bytes[24..28], &0u32.to_le_bytes()); // legacy word, always 0
}

#[test]
fn test_palette_roundtrip() {
    let palette = Palette::grayscale_with_team_ramp(16, 31);
    assert_eq!(palette.0[100], [100, 100, 100]);
    assert_eq!(palette.0[16], [0, 0, 0]);
    assert_eq!(palette.0[17], [16, 8, 4]);
    let bytes = palette.to_bytes();
    assert_eq!(bytes.len(), Palette::SIZE);
    assert_eq!(Palette::from_bytes(&bytes).unwrap(), palette);
}

// ========================================================================
// Whole-file codec tests
// ========================================================================

#[test]
fn test_single_limb_roundtrip() {
    let mut limb = test_limb("Body", [2, 2, 3]);
    // One gapped column alongside the solid one and two empties.
    limb.columns[3] = Column::Spans(vec![
        Span {
            skip: 0,
            voxels: vec![Voxel { color: 5, normal: 12 }],
        },
        Span {
            skip: 1,
            voxels: vec![Voxel { color: 6, normal: 0 }],
        },
    ]);
    let file = test_file(vec![limb]);

    let bytes = file.encode().unwrap();
    let decoded = VxlFile::decode(&bytes).unwrap();
    assert_eq!(decoded, file);

    // Encoding the decode is byte-identical.
    assert_eq!(decoded.encode().unwrap(), bytes);
}

#[test]
fn test_multi_limb_roundtrip() {
    let file = test_file(vec![
        test_limb("Body", [3, 2, 4]),
        test_limb("turret", [2, 2, 2]),
        test_limb("barrel", [1, 1, 5]),
    ]);
    let bytes = file.encode().unwrap();
    let decoded = VxlFile::decode(&bytes).unwrap();
    assert_eq!(decoded, file);
    assert_eq!(
        decoded.section_names().map(|n| n.as_str().into_owned()).collect::<Vec<_>>(),
        ["Body", "turret", "barrel"]
    );
}

#[test]
fn test_file_size_formula() {
    let file = test_file(vec![test_limb("Body", [2, 2, 3])]);
    let bytes = file.encode().unwrap();
    let header = VxlHeader::from_bytes(&bytes).unwrap();
    assert_eq!(header.expected_file_size(), bytes.len());
    // 4 columns: two 16-byte offset tables, then one 11-byte span column
    // (skip, count, 3 voxel pairs, dup count, terminator).
    let expected_body = 4 * 8 + (2 + 3 * 2 + 1 + 2);
    assert_eq!(header.body_size as usize, expected_body);
}

#[test]
fn test_empty_columns_use_sentinel() {
    let file = test_file(vec![test_limb("Body", [2, 1, 3])]);
    let bytes = file.encode().unwrap();
    let body_start = VxlHeader::SIZE + Palette::SIZE + LimbHeader::SIZE;
    // Column 1 is empty: second entry of both tables is the sentinel.
    let start1 = &bytes[body_start + 4..body_start + 8];
    let end1 = &bytes[body_start + 12..body_start + 16];
    assert_eq!(start1, &EMPTY_COLUMN_SENTINEL.to_le_bytes());
    assert_eq!(end1, &EMPTY_COLUMN_SENTINEL.to_le_bytes());
}

#[test]
fn test_decode_truncated() {
    let bytes = test_file(vec![test_limb("Body", [2, 2, 3])])
        .encode()
        .unwrap();
    let err = VxlFile::decode(&bytes[..bytes.len() - 10]).unwrap_err();
    assert!(matches!(err, FormatError::TruncatedInput { .. }));
}

#[test]
fn test_decode_span_error_carries_context() {
    let file = test_file(vec![test_limb("Body", [1, 1, 3])]);
    let mut bytes = file.encode().unwrap();
    // Corrupt the duplicate count byte of column 0's only span. Body is
    // [start table 4][end table 4][skip count c n c n c n dup term term].
    let body_start = VxlHeader::SIZE + Palette::SIZE + LimbHeader::SIZE;
    let dup_offset = body_start + 8 + 2 + 3 * 2;
    bytes[dup_offset] = 9;
    match VxlFile::decode(&bytes).unwrap_err() {
        FormatError::Span {
            limb: 0,
            column: 0,
            source: SpanError::CountMismatch { leading: 3, trailing: 9 },
        } => {}
        other => panic!("expected span count mismatch with context, got {other:?}"),
    }
}

#[test]
fn test_decode_column_out_of_bounds() {
    let file = test_file(vec![test_limb("Body", [1, 1, 3])]);
    let mut bytes = file.encode().unwrap();
    let body_start = VxlHeader::SIZE + Palette::SIZE + LimbHeader::SIZE;
    // Point column 0's end offset far past the body.
    bytes[body_start + 4..body_start + 8].copy_from_slice(&500u32.to_le_bytes());
    assert!(matches!(
        VxlFile::decode(&bytes).unwrap_err(),
        FormatError::ColumnOutOfBounds { limb: 0, column: 0, .. }
    ));
}

#[test]
fn test_column_count_mismatch_rejected_on_encode() {
    let mut limb = test_limb("Body", [2, 2, 3]);
    limb.columns.pop();
    let err = test_file(vec![limb]).encode().unwrap_err();
    assert_eq!(
        err,
        FormatError::ColumnCountMismatch {
            limb: 0,
            expected: 4,
            actual: 3
        }
    );
}

// ========================================================================
// Validation
// ========================================================================

#[test]
fn test_zero_dimensions_decode_but_flag() {
    // A limb with 0x0x0 dims: no columns, no span data.
    let mut limb = test_limb("Body", [0, 0, 0]);
    limb.columns.clear();
    let file = test_file(vec![limb]);

    let bytes = file.encode().unwrap();
    let decoded = VxlFile::decode(&bytes).unwrap();
    assert_eq!(decoded.limbs[0].dims, [0, 0, 0]);

    // Structurally fine, semantically unusable.
    assert_eq!(
        decoded.validate().unwrap_err(),
        crate::error::ValidationError::ZeroDimensions {
            limb: 0,
            dims: [0, 0, 0]
        }
    );
}

#[test]
fn test_decoded_column_overflow_flagged() {
    let file = test_file(vec![test_limb("Body", [1, 1, 2])]);
    let mut bytes = file.encode().unwrap();
    // Inflate the column's skip byte so its span stacks past dim_z.
    let body_start = VxlHeader::SIZE + Palette::SIZE + LimbHeader::SIZE;
    bytes[body_start + 8] = 5;

    let decoded = VxlFile::decode(&bytes).unwrap();
    assert_eq!(
        decoded.validate().unwrap_err(),
        crate::error::ValidationError::ColumnOverflow {
            limb: 0,
            column: 0,
            occupied: 7,
            dim_z: 2
        }
    );
}

#[test]
fn test_valid_file_passes_validation() {
    let file = test_file(vec![test_limb("Body", [2, 2, 3])]);
    assert!(file.validate().is_ok());
}

#[test]
fn test_with_normals_mode() {
    let file = test_file(vec![
        test_limb("Body", [1, 1, 1]),
        test_limb("turret", [1, 1, 1]),
    ]);
    let fixed = file.with_normals_mode(NormalsMode::TiberianSun);
    assert!(fixed
        .limbs
        .iter()
        .all(|l| l.normals_style() == Some(NormalsMode::TiberianSun)));
    // Original untouched.
    assert!(file
        .limbs
        .iter()
        .all(|l| l.normals_style() == Some(NormalsMode::RedAlert2)));
}

#[test]
fn test_limb_column_lookup() {
    let limb = test_limb("Body", [3, 2, 4]);
    assert_eq!(limb.column(0, 0), Some(&limb.columns[0]));
    assert_eq!(limb.column(2, 1), Some(&limb.columns[5]));
    assert_eq!(limb.column(3, 0), None);
    assert_eq!(limb.voxel_count(), 4);
}
