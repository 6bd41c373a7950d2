//! Archive extraction and listing.
//!
//! A decoded archive knows its members only by id, so extraction without
//! a name falls back to content sniffing for the output extension.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vxl_common::formats::mix::{member_id, sniff_member, MemberKind, MixArchive, MixMember};

pub fn load_archive(path: &Path) -> Result<MixArchive> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read archive: {:?}", path))?;
    let archive = MixArchive::from_bytes(&bytes)
        .with_context(|| format!("Failed to decode archive: {:?}", path))?;
    Ok(archive)
}

/// Log every member: id, size, and sniffed content kind.
pub fn list(archive: &MixArchive) {
    tracing::info!("{} members", archive.len());
    for member in archive.members() {
        tracing::info!(
            "  {:#010x}  {:>10} bytes  {}",
            member.id,
            member.bytes.len(),
            kind_label(sniff_member(&member.bytes))
        );
    }
}

/// Extract one member by name, or every member when `name` is `None`.
/// Returns the files written.
pub fn extract(archive: &MixArchive, name: Option<&str>, out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output dir: {:?}", out_dir))?;

    let selected: Vec<&MixMember> = match name {
        Some(name) => {
            let member = archive
                .member_by_name(name)
                .with_context(|| format!("No member {:?} (id {:#010x})", name, member_id(name)))?;
            vec![member]
        }
        None => archive.members().iter().collect(),
    };

    let mut written = Vec::with_capacity(selected.len());
    for member in selected {
        let file_name = match name {
            Some(name) => name.to_string(),
            // Nameless member: synthesize from the id, extension from
            // content.
            None => format!(
                "{:08x}.{}",
                member.id,
                extension_for(sniff_member(&member.bytes))
            ),
        };
        let path = out_dir.join(file_name);
        std::fs::write(&path, &member.bytes)
            .with_context(|| format!("Failed to write {:?}", path))?;
        tracing::info!("  {:?} ({} bytes)", path, member.bytes.len());
        written.push(path);
    }
    Ok(written)
}

fn kind_label(kind: MemberKind) -> &'static str {
    match kind {
        MemberKind::Vxl => "VXL",
        MemberKind::Hva => "HVA",
        MemberKind::Other => "?",
    }
}

fn extension_for(kind: MemberKind) -> &'static str {
    match kind {
        MemberKind::Vxl => "vxl",
        MemberKind::Hva => "hva",
        MemberKind::Other => "bin",
    }
}
