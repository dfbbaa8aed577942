//! Clip table configuration (clips.toml)
//!
//! Replaces the standard player-model clip table for models with their own
//! frame layout.
//!
//! ```toml
//! target_fps = 30.0
//!
//! [[clip]]
//! name = "IDLE"
//! first = 0
//! last = 9
//! fps = 8.0
//! ```

use anyhow::{bail, Context, Result};
use nether_md2::AnimationClip;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Component, Path};

/// clips.toml structure
#[derive(Debug, Deserialize)]
pub struct ClipConfig {
    /// Host playback rate; the command line takes precedence
    pub target_fps: Option<f32>,
    #[serde(default, rename = "clip")]
    pub clips: Vec<ClipEntry>,
}

/// One `[[clip]]` entry
#[derive(Debug, Deserialize)]
pub struct ClipEntry {
    pub name: String,
    pub first: usize,
    pub last: usize,
    #[serde(default = "default_clip_fps")]
    pub fps: f32,
}

fn default_clip_fps() -> f32 {
    nether_md2::FALLBACK_CLIP_FPS
}

/// Frame rates must be finite and positive
pub fn is_valid_fps(fps: f32) -> bool {
    fps.is_finite() && fps > 0.0
}

/// Clip names become output directory names: exactly one plain path component
fn is_plain_dir_name(name: &str) -> bool {
    if name.contains(['/', '\\', ':']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

impl ClipConfig {
    /// Load clip configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read clip config: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse clip configuration from a string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse clip config")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate entries independently of any model
    pub fn validate(&self) -> Result<()> {
        if self.clips.is_empty() {
            bail!("Clip config defines no [[clip]] entries");
        }
        if let Some(fps) = self.target_fps {
            if !is_valid_fps(fps) {
                bail!("target_fps must be finite and positive (got {})", fps);
            }
        }
        let mut seen = HashSet::new();
        for clip in &self.clips {
            if clip.name.trim().is_empty() {
                bail!("Clip with frames {}..={} has an empty name", clip.first, clip.last);
            }
            if !is_plain_dir_name(&clip.name) {
                bail!(
                    "Clip name '{}' is not usable as a directory name",
                    clip.name
                );
            }
            // Case-insensitive: clips share an output directory on case-folding filesystems
            if !seen.insert(clip.name.to_lowercase()) {
                bail!("Duplicate clip name '{}'", clip.name);
            }
            if clip.first > clip.last {
                bail!(
                    "Clip '{}' starts after it ends ({} > {})",
                    clip.name,
                    clip.first,
                    clip.last
                );
            }
            if !is_valid_fps(clip.fps) {
                bail!("Clip '{}' has invalid fps {}", clip.name, clip.fps);
            }
        }
        Ok(())
    }

    pub fn to_clips(&self) -> Vec<AnimationClip> {
        self.clips
            .iter()
            .map(|c| AnimationClip::named(c.name.clone(), c.first, c.last, c.fps))
            .collect()
    }
}
