//! vxl-export - voxel model export tool
//!
//! Converts voxel grids (.vox) to VXL/HVA pairs, repairs normals,
//! validates models, and packs/unpacks MIX archives.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vxl_export::{archive, convert, manifest, normalize, validate, vox};
use vxl_export::{ConvertOptions, NormalsMode, VxlFile, STANDARD_SCALE};

#[derive(Parser)]
#[command(name = "vxl-export")]
#[command(about = "Voxel model export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a voxel grid (.vox) to a VXL/HVA pair
    Convert {
        /// Input .vox file
        input: PathBuf,

        /// Output .vxl file (the .hva lands next to it)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Section name written to both files
        #[arg(short, long, default_value = "Body")]
        name: String,

        /// Model scale
        #[arg(short, long, default_value_t = STANDARD_SCALE)]
        scale: f32,

        /// Write Tiberian Sun style normals instead of Red Alert 2
        #[arg(long)]
        ts_normals: bool,
    },

    /// Recompute lighting normals of an existing VXL
    Normalize {
        /// Input .vxl file
        input: PathBuf,

        /// Output file (default: overwrite input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a VXL file, optionally against its HVA
    Validate {
        /// Input .vxl file
        vxl: PathBuf,

        /// Paired .hva file
        #[arg(long)]
        hva: Option<PathBuf>,
    },

    /// Pack an archive from a manifest file
    Pack {
        /// Path to pack.toml manifest
        #[arg(default_value = "pack.toml")]
        manifest: PathBuf,

        /// Output archive (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract members from an archive
    Extract {
        /// Input .mix archive
        archive: PathBuf,

        /// Member name to extract (default: all members)
        #[arg(short, long)]
        name: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// List archive members
    Info {
        /// Input .mix archive
        archive: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            name,
            scale,
            ts_normals,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension("vxl"));
            let hva_path = output.with_extension("hva");
            tracing::info!("Converting {:?} -> {:?}", input, output);

            let grid = vox::load_vox_file(&input)?;
            let options = ConvertOptions {
                name,
                model_name: model_name_for(&output),
                scale,
                normals_mode: if ts_normals {
                    NormalsMode::TiberianSun
                } else {
                    NormalsMode::RedAlert2
                },
            };
            let (vxl, hva) = convert::convert_grid(&grid, &options)?;
            std::fs::write(&output, vxl.encode()?)?;
            std::fs::write(&hva_path, hva.encode()?)?;
            tracing::info!(
                "Wrote {:?} ({} voxels) and {:?}",
                output,
                vxl.limbs[0].voxel_count(),
                hva_path
            );
        }

        Commands::Normalize { input, output } => {
            let output = output.unwrap_or_else(|| input.clone());
            tracing::info!("Normalizing {:?} -> {:?}", input, output);
            let vxl = VxlFile::decode(&std::fs::read(&input)?)?;
            let fixed = normalize::renormalize(&vxl);
            std::fs::write(&output, fixed.encode()?)?;
            tracing::info!("Done!");
        }

        Commands::Validate { vxl, hva } => {
            validate::validate_files(&vxl, hva.as_deref())?;
        }

        Commands::Pack { manifest, output } => {
            tracing::info!("Packing from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            manifest::build(&config, output.as_deref())?;
        }

        Commands::Extract {
            archive: archive_path,
            name,
            output,
        } => {
            let archive = archive::load_archive(&archive_path)?;
            let written = archive::extract(&archive, name.as_deref(), &output)?;
            tracing::info!("Extracted {} file(s)", written.len());
        }

        Commands::Info { archive: archive_path } => {
            let archive = archive::load_archive(&archive_path)?;
            archive::list(&archive);
        }
    }

    Ok(())
}

/// Uppercased base name for the animation's name slot, the convention
/// the game's own assets follow.
fn model_name_for(output: &std::path::Path) -> String {
    output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("EXPORT")
        .to_ascii_uppercase()
}
