//! Pack manifest parsing and build orchestration.
//!
//! Parses pack.toml and coordinates archive assembly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use vxl_common::{member_id, MixArchive};

/// Root manifest structure
///
/// ```toml
/// output = "expansion.mix"
/// members = ["ftnk.vxl", "ftnk.hva", "ftnktur.vxl"]
/// ```
#[derive(Debug, Deserialize)]
pub struct PackManifest {
    pub output: PathBuf,
    #[serde(default)]
    pub members: Vec<PathBuf>,
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<PackManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let manifest: PackManifest =
        toml::from_str(&content).with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    Ok(manifest)
}

/// Check that every member file exists without building anything.
pub fn validate(manifest: &PackManifest) -> Result<()> {
    if manifest.members.is_empty() {
        anyhow::bail!("Manifest lists no members");
    }
    for member in &manifest.members {
        if !member.is_file() {
            anyhow::bail!("Member file not found: {:?}", member);
        }
    }
    Ok(())
}

/// Build the archive the manifest describes. `output` overrides the
/// manifest's output path. Returns the path written.
pub fn build(manifest: &PackManifest, output: Option<&Path>) -> Result<PathBuf> {
    let output = output.unwrap_or(&manifest.output).to_path_buf();

    let mut files = Vec::with_capacity(manifest.members.len());
    for member in &manifest.members {
        let name = member
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Member path has no usable file name: {:?}", member))?
            .to_string();
        let bytes = std::fs::read(member)
            .with_context(|| format!("Failed to read member: {:?}", member))?;
        tracing::info!(
            "  {} ({} bytes, id {:#010x})",
            name,
            bytes.len(),
            member_id(&name)
        );
        files.push((name, bytes));
    }

    let archive = MixArchive::pack(files).context("Failed to pack archive")?;
    let bytes = archive.to_bytes().context("Failed to serialize archive")?;
    std::fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write archive: {:?}", output))?;
    tracing::info!(
        "Packed {} members into {:?} ({} bytes)",
        archive.len(),
        output,
        bytes.len()
    );
    Ok(output)
}
