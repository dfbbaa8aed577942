//! MD2 inspection and export

use anyhow::{bail, Context, Result};
use nether_md2::{
    emit_clips, load_md2, resolve_clips, AnimationClip, FrameReconstructor, Md2Model,
    DEFAULT_TARGET_FPS, STANDARD_CLIPS,
};
use std::path::{Path, PathBuf};

use crate::config::{is_valid_fps, ClipConfig};
use crate::sink::FileSink;

/// Options for [`export_md2`]
#[derive(Debug, Default, Clone)]
pub struct ExportOptions {
    /// Output directory (default: input path without extension)
    pub output: Option<PathBuf>,
    /// Host playback rate (overrides the clip config)
    pub target_fps: Option<f32>,
    /// clips.toml replacing the standard clip table
    pub clips: Option<PathBuf>,
}

/// What an export produced
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub output: PathBuf,
    pub islands: usize,
    pub clips: Vec<String>,
    pub target_fps: f32,
    pub files_written: usize,
}

/// Only `*.md2` inputs are accepted
fn ensure_md2(input: &Path) -> Result<()> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    if ext != "md2" {
        bail!("Unsupported model format: {:?} (expected .md2)", input);
    }
    Ok(())
}

fn load(input: &Path) -> Result<Md2Model> {
    ensure_md2(input)?;
    load_md2(input).with_context(|| format!("Failed to load MD2: {}", input.display()))
}

/// Decode and segment a model, logging its layout
pub fn inspect_md2(input: &Path) -> Result<()> {
    let model = load(input)?;
    let recon = FrameReconstructor::new(&model)
        .with_context(|| format!("Failed to segment {}", input.display()))?;

    tracing::info!(
        "{}: {}x{} skin, {} skins, {} frames",
        input.display(),
        model.header.skin_width,
        model.header.skin_height,
        model.skins.len(),
        model.frame_count()
    );
    for skin in &model.skins {
        tracing::info!("  skin: {}", skin);
    }
    for island in recon.segmentation().islands() {
        let mesh = recon.island_mesh(island.id())?;
        tracing::info!(
            "  island {}: {} vertices, {} faces",
            island.id(),
            island.len(),
            mesh.faces.len()
        );
    }
    for clip in resolve_clips(&STANDARD_CLIPS, model.frame_count()) {
        tracing::info!(
            "  clip {}: frames {}..={} at {} fps",
            clip.name,
            clip.first,
            clip.last,
            clip.fps
        );
    }
    Ok(())
}

/// Export every clip × island of an MD2 model through a [`FileSink`]
pub fn export_md2(input: &Path, options: &ExportOptions) -> Result<ExportSummary> {
    let config = options
        .clips
        .as_deref()
        .map(ClipConfig::load)
        .transpose()?;

    let model = load(input)?;
    let recon = FrameReconstructor::new(&model)
        .with_context(|| format!("Failed to segment {}", input.display()))?;

    let target_fps = options
        .target_fps
        .or(config.as_ref().and_then(|c| c.target_fps))
        .unwrap_or(DEFAULT_TARGET_FPS);
    if !is_valid_fps(target_fps) {
        bail!("Target fps must be finite and positive (got {})", target_fps);
    }

    let table: Vec<AnimationClip> = match &config {
        Some(config) => config.to_clips(),
        None => STANDARD_CLIPS.to_vec(),
    };
    let clips = resolve_clips(&table, model.frame_count());
    if clips.is_empty() {
        bail!("{} has no frames to export", input.display());
    }

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| input.with_extension(""));
    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output: {}", output.display()))?;

    let mut sink = FileSink::new(&output, target_fps);
    emit_clips(&recon, &clips, target_fps, &mut sink)?;

    Ok(ExportSummary {
        output,
        islands: recon.island_count(),
        clips: clips.iter().map(|c| c.name.to_string()).collect(),
        target_fps,
        files_written: sink.files_written(),
    })
}
