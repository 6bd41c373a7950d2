//! Validation report over model files on disk.
//!
//! Structural decode failures abort immediately; semantic findings are
//! collected so one run reports everything wrong with a file. The size
//! formula check is a warning, not a failure: padded files load fine in
//! game and show up in community archives.

use std::path::Path;

use anyhow::{Context, Result};
use vxl_common::{HvaFile, PairedModel, VxlFile, VxlHeader};

/// One reported problem. `fatal` findings fail the run; the rest are
/// logged and tolerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub message: String,
    pub fatal: bool,
}

/// Validate a geometry file, optionally against its animation.
pub fn validate_files(vxl_path: &Path, hva_path: Option<&Path>) -> Result<()> {
    let findings = collect_findings(vxl_path, hva_path)?;

    let mut fatal = 0usize;
    for finding in &findings {
        if finding.fatal {
            fatal += 1;
            tracing::error!("{}", finding.message);
        } else {
            tracing::warn!("{}", finding.message);
        }
    }

    if fatal > 0 {
        anyhow::bail!("{} fatal finding(s) in {:?}", fatal, vxl_path);
    }
    tracing::info!("{:?} is valid ({} warning(s))", vxl_path, findings.len());
    Ok(())
}

/// Decode and check, returning findings instead of logging. Split out so
/// tests can assert on the report.
pub fn collect_findings(vxl_path: &Path, hva_path: Option<&Path>) -> Result<Vec<Finding>> {
    let bytes =
        std::fs::read(vxl_path).with_context(|| format!("Failed to read: {:?}", vxl_path))?;
    let vxl = VxlFile::decode(&bytes)
        .with_context(|| format!("Failed to decode VXL: {:?}", vxl_path))?;

    let mut findings = Vec::new();

    // Size formula: header-implied size vs bytes on disk.
    let header = VxlHeader::from_bytes(&bytes)?;
    let expected = header.expected_file_size();
    if expected != bytes.len() {
        findings.push(Finding {
            message: format!(
                "file size {} does not match the header-implied {} bytes",
                bytes.len(),
                expected
            ),
            fatal: false,
        });
    }

    if let Err(e) = vxl.validate() {
        findings.push(Finding {
            message: e.to_string(),
            fatal: true,
        });
    }

    if let Some(hva_path) = hva_path {
        let hva_bytes =
            std::fs::read(hva_path).with_context(|| format!("Failed to read: {:?}", hva_path))?;
        let hva = HvaFile::decode(&hva_bytes)
            .with_context(|| format!("Failed to decode HVA: {:?}", hva_path))?;
        if let Err(e) = PairedModel::new(&vxl, &hva).validate() {
            findings.push(Finding {
                message: e.to_string(),
                fatal: true,
            });
        }
    }

    Ok(findings)
}
