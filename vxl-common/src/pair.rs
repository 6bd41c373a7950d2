//! Cross-file consistency checks for a VXL/HVA pair.
//!
//! The engine matches geometry limbs to animation sections by position,
//! then sanity-checks names. Both files are individually well-formed long
//! before this module sees them; everything here is about the two files
//! agreeing with each other.

use crate::error::ValidationError;
use crate::formats::hva::HvaFile;
use crate::formats::name::SectionName;
use crate::formats::vxl::VxlFile;

/// A geometry file and the animation that poses it, borrowed together.
#[derive(Debug, Clone, Copy)]
pub struct PairedModel<'a> {
    pub vxl: &'a VxlFile,
    pub hva: &'a HvaFile,
}

impl<'a> PairedModel<'a> {
    pub fn new(vxl: &'a VxlFile, hva: &'a HvaFile) -> Self {
        Self { vxl, hva }
    }

    /// Check that the animation can pose the geometry.
    ///
    /// Section counts must agree, names must match position by position
    /// (case sensitive, trailing NUL padding ignored), and the animation
    /// must have at least one frame. The first divergence is reported with
    /// its index and both names.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let vxl_count = self.vxl.limbs.len();
        let hva_count = self.hva.section_count();
        if vxl_count != hva_count {
            return Err(ValidationError::SectionCountMismatch {
                vxl: vxl_count,
                hva: hva_count,
            });
        }

        for (index, (limb, hva_name)) in self
            .vxl
            .limbs
            .iter()
            .zip(&self.hva.section_names)
            .enumerate()
        {
            if limb.name.as_str() != hva_name.as_str() {
                return Err(ValidationError::SectionMismatch {
                    index,
                    vxl_name: limb.name.as_str().into_owned(),
                    hva_name: hva_name.as_str().into_owned(),
                });
            }
        }

        if self.hva.frames.is_empty() {
            return Err(ValidationError::EmptyAnimation);
        }
        Ok(())
    }
}

/// Rename one section in both files at once, returning updated copies.
///
/// Renaming only one side of a pair is the most common way pairs drift
/// apart in the wild, so the operation is only offered pair-wide.
pub fn rename_section(
    vxl: &VxlFile,
    hva: &HvaFile,
    index: usize,
    new_name: &str,
) -> Result<(VxlFile, HvaFile), ValidationError> {
    if index >= vxl.limbs.len() || index >= hva.section_count() {
        return Err(ValidationError::SectionIndexOutOfRange {
            index,
            count: vxl.limbs.len().min(hva.section_count()),
        });
    }
    let name = SectionName::new(new_name);
    let mut vxl = vxl.clone();
    let mut hva = hva.clone();
    vxl.limbs[index].name = name;
    hva.section_names[index] = name;
    Ok((vxl, hva))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::span::Column;
    use crate::formats::vxl::{Limb, NormalsMode, Palette, STANDARD_SCALE};
    use crate::math::Matrix3x4;

    fn limb(name: &str) -> Limb {
        Limb {
            name: SectionName::new(name),
            scale: STANDARD_SCALE,
            transform: Matrix3x4::IDENTITY,
            min_bounds: [0.0; 3],
            max_bounds: [1.0, 1.0, 1.0],
            dims: [1, 1, 1],
            normals_mode: NormalsMode::RedAlert2 as u8,
            columns: vec![Column::Empty],
        }
    }

    fn pair(names: &[&str]) -> (VxlFile, HvaFile) {
        let vxl = VxlFile {
            palette: Palette::default(),
            remap_start: 16,
            remap_end: 31,
            limbs: names.iter().map(|&n| limb(n)).collect(),
        };
        let hva = HvaFile::identity(
            "TEST",
            names.iter().map(|&n| SectionName::new(n)).collect(),
        );
        (vxl, hva)
    }

    #[test]
    fn test_matching_pair_validates() {
        let (vxl, hva) = pair(&["Body", "turret", "barrel"]);
        assert!(PairedModel::new(&vxl, &hva).validate().is_ok());
    }

    #[test]
    fn test_count_mismatch() {
        let (vxl, mut hva) = pair(&["Body", "turret"]);
        hva.section_names.pop();
        hva.frames[0].pop();
        assert_eq!(
            PairedModel::new(&vxl, &hva).validate().unwrap_err(),
            ValidationError::SectionCountMismatch { vxl: 2, hva: 1 }
        );
    }

    #[test]
    fn test_name_mismatch_reports_index() {
        let (vxl, mut hva) = pair(&["Body", "turret", "barrel"]);
        hva.section_names[1] = SectionName::new("Turret");
        match PairedModel::new(&vxl, &hva).validate().unwrap_err() {
            ValidationError::SectionMismatch {
                index: 1,
                vxl_name,
                hva_name,
            } => {
                assert_eq!(vxl_name, "turret");
                assert_eq!(hva_name, "Turret");
            }
            other => panic!("expected SectionMismatch at 1, got {other:?}"),
        }
    }

    #[test]
    fn test_names_match_up_to_nul_padding() {
        let (vxl, mut hva) = pair(&["Body"]);
        // Same visible name, different bytes after the NUL.
        let mut raw = *hva.section_names[0].as_bytes();
        raw[10] = b'x';
        hva.section_names[0] = SectionName::from_bytes(raw);
        assert!(PairedModel::new(&vxl, &hva).validate().is_ok());
    }

    #[test]
    fn test_empty_animation() {
        let (vxl, mut hva) = pair(&["Body"]);
        hva.frames.clear();
        assert_eq!(
            PairedModel::new(&vxl, &hva).validate().unwrap_err(),
            ValidationError::EmptyAnimation
        );
    }

    #[test]
    fn test_rename_section_keeps_pair_consistent() {
        let (vxl, hva) = pair(&["Body", "turret"]);
        let (vxl2, hva2) = rename_section(&vxl, &hva, 1, "cannon").unwrap();
        assert!(PairedModel::new(&vxl2, &hva2).validate().is_ok());
        assert_eq!(vxl2.limbs[1].name.as_str(), "cannon");
        assert_eq!(hva2.section_names[1].as_str(), "cannon");
        // Inputs untouched.
        assert_eq!(vxl.limbs[1].name.as_str(), "turret");
    }

    #[test]
    fn test_rename_section_out_of_range() {
        let (vxl, hva) = pair(&["Body"]);
        assert_eq!(
            rename_section(&vxl, &hva, 3, "x").unwrap_err(),
            ValidationError::SectionIndexOutOfRange { index: 3, count: 1 }
        );
    }
}
