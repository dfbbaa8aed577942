//! Named animation clips and their timelines
//!
//! MD2 files carry no clip information. Player models follow a fixed frame
//! layout (see <http://tfc.duke.free.fr/old/models/md2.htm>), described by
//! [`STANDARD_CLIPS`].

use std::borrow::Cow;

use crate::error::{Md2Error, Md2Result};

/// Default host playback rate clips are converted to
pub const DEFAULT_TARGET_FPS: f32 = 24.0;

/// Source rate of the catch-all clip used when no named clip fits
pub const FALLBACK_CLIP_FPS: f32 = 10.0;

/// Name of the catch-all clip
pub const FALLBACK_CLIP_NAME: &str = "ALL";

/// A named, inclusive range of frames played at a source rate
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: Cow<'static, str>,
    pub first: usize,
    pub last: usize,
    pub fps: f32,
}

impl AnimationClip {
    pub const fn new(name: &'static str, first: usize, last: usize, fps: f32) -> Self {
        Self {
            name: Cow::Borrowed(name),
            first,
            last,
            fps,
        }
    }

    /// Clip with an owned name (e.g. from a configuration file)
    pub fn named(name: impl Into<String>, first: usize, last: usize, fps: f32) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            first,
            last,
            fps,
        }
    }

    /// Number of frames in the clip, `last - first + 1`
    pub fn frame_count(&self) -> usize {
        self.last.saturating_sub(self.first) + 1
    }

    /// Time step between consecutive frames on a `target_fps` timeline
    pub fn effective_rate(&self, target_fps: f32) -> f32 {
        (self.frame_count() as f32 * self.fps) / target_fps
    }

    /// Whether the clip lies within `frame_count` frames
    pub fn fits(&self, frame_count: usize) -> bool {
        self.first <= self.last && self.last < frame_count
    }

    pub fn check(&self, frame_count: usize) -> Md2Result<()> {
        if self.fits(frame_count) {
            Ok(())
        } else {
            Err(Md2Error::ClipOutOfRange {
                name: self.name.to_string(),
                first: self.first,
                last: self.last,
                frame_count,
            })
        }
    }

    /// Keyframe positions of every frame, plus the first frame repeated at
    /// the end so looping playback interpolates back to the start
    pub fn timeline(&self, target_fps: f32) -> ClipTimeline {
        let rate = self.effective_rate(target_fps);
        let count = self.frame_count();

        let mut keys: Vec<Keyframe> = (0..count)
            .map(|i| Keyframe {
                frame: self.first + i,
                time: i as f32 * rate,
                loop_closing: false,
            })
            .collect();
        keys.push(Keyframe {
            frame: self.first,
            time: count as f32 * rate,
            loop_closing: true,
        });

        ClipTimeline { rate, keys }
    }
}

/// One sample on a clip timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Absolute frame index in the model
    pub frame: usize,
    /// Position on the target timeline
    pub time: f32,
    /// Repeat of the first frame closing the loop
    pub loop_closing: bool,
}

/// Keyframes of one clip on the target timeline
#[derive(Debug, Clone, PartialEq)]
pub struct ClipTimeline {
    pub rate: f32,
    pub keys: Vec<Keyframe>,
}

impl ClipTimeline {
    /// Time of the last key
    pub fn duration(&self) -> f32 {
        self.keys.last().map(|k| k.time).unwrap_or(0.0)
    }
}

/// Standard MD2 player-model animations
pub static STANDARD_CLIPS: [AnimationClip; 21] = [
    AnimationClip::new("STAND", 0, 39, 9.0),
    AnimationClip::new("RUN", 40, 45, 10.0),
    AnimationClip::new("ATTACK", 46, 53, 10.0),
    AnimationClip::new("PAIN_A", 54, 57, 7.0),
    AnimationClip::new("PAIN_B", 58, 61, 7.0),
    AnimationClip::new("PAIN_C", 62, 65, 7.0),
    AnimationClip::new("JUMP", 66, 71, 7.0),
    AnimationClip::new("FLIP", 72, 83, 7.0),
    AnimationClip::new("SALUTE", 84, 94, 7.0),
    AnimationClip::new("FALLBACK", 95, 111, 10.0),
    AnimationClip::new("WAVE", 112, 122, 7.0),
    AnimationClip::new("POINT", 123, 134, 6.0),
    AnimationClip::new("CROUCH_STAND", 135, 153, 10.0),
    AnimationClip::new("CROUCH_WALK", 154, 159, 7.0),
    AnimationClip::new("CROUCH_ATTACK", 160, 168, 10.0),
    AnimationClip::new("CROUCH_PAIN", 169, 172, 7.0),
    AnimationClip::new("CROUCH_DEATH", 173, 177, 5.0),
    AnimationClip::new("DEATH_FALLBACK", 178, 183, 7.0),
    AnimationClip::new("DEATH_FALLFORWARD", 184, 189, 7.0),
    AnimationClip::new("DEATH_FALLBACKSLOW", 190, 197, 7.0),
    AnimationClip::new("BOOM", 198, 198, 5.0),
];

/// Find a standard clip by name (case-insensitive)
pub fn standard_clip(name: &str) -> Option<&'static AnimationClip> {
    STANDARD_CLIPS
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Keep the clips that fit a model with `frame_count` frames
///
/// Clips that do not fit are skipped with a warning. If none fit, a single
/// [`FALLBACK_CLIP_NAME`] clip covering every frame is returned instead.
pub fn resolve_clips(clips: &[AnimationClip], frame_count: usize) -> Vec<AnimationClip> {
    let mut resolved = Vec::with_capacity(clips.len());
    for clip in clips {
        if clip.fits(frame_count) {
            resolved.push(clip.clone());
        } else {
            tracing::warn!(
                "Skipping clip {} (frames {}..={}), model has {} frames",
                clip.name,
                clip.first,
                clip.last,
                frame_count
            );
        }
    }

    if resolved.is_empty() && frame_count > 0 {
        tracing::debug!("No clip fits, using {} over {} frames", FALLBACK_CLIP_NAME, frame_count);
        resolved.push(AnimationClip::new(
            FALLBACK_CLIP_NAME,
            0,
            frame_count - 1,
            FALLBACK_CLIP_FPS,
        ));
    }
    resolved
}
