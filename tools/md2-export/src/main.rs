//! md2-export - MD2 model export tool
//!
//! Splits Quake II MD2 models into independent mesh islands and writes each
//! animation clip as OBJ meshes plus JSON keyframe tracks.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use md2_export::{export_md2, inspect_md2, ExportOptions};

#[derive(Parser)]
#[command(name = "md2-export")]
#[command(about = "MD2 model export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print model layout, mesh islands and clips
    Info {
        /// Input .md2 file
        input: PathBuf,
    },

    /// Export every clip and mesh island
    Export {
        /// Input .md2 file
        input: PathBuf,

        /// Output directory (default: input path without extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target playback rate (default: 24)
        #[arg(short, long)]
        fps: Option<f32>,

        /// Clip table (clips.toml) replacing the standard MD2 clips
        #[arg(short, long)]
        clips: Option<PathBuf>,
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
        Commands::Info { input } => {
            inspect_md2(&input)?;
        }

        Commands::Export {
            input,
            output,
            fps,
            clips,
        } => {
            tracing::info!("Exporting {:?}", input);
            let summary = export_md2(
                &input,
                &ExportOptions {
                    output,
                    target_fps: fps,
                    clips,
                },
            )?;
            tracing::info!(
                "Done! {} islands x {} clips at {} fps -> {:?} ({} files)",
                summary.islands,
                summary.clips.len(),
                summary.target_fps,
                summary.output,
                summary.files_written
            );
        }
    }

    Ok(())
}
