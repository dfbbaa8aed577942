//! Hand-off of reconstructed geometry to a scene consumer

use glam::Vec3;

use crate::clips::{AnimationClip, ClipTimeline, Keyframe};
use crate::error::Md2Error;
use crate::reconstruct::{FrameGeometry, FrameReconstructor, IslandMesh};

/// Consumer of reconstructed islands, one clip at a time
///
/// For every clip the emitter calls [`begin_clip`](Self::begin_clip), then
/// for each island one [`island_mesh`](Self::island_mesh) followed by one
/// [`island_keyframe`](Self::island_keyframe) per timeline key, and finally
/// [`end_clip`](Self::end_clip).
pub trait SceneSink {
    type Error: From<Md2Error>;

    fn begin_clip(
        &mut self,
        _clip: &AnimationClip,
        _timeline: &ClipTimeline,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Static mesh of an island, built from the clip's first frame
    fn island_mesh(
        &mut self,
        clip: &AnimationClip,
        island: usize,
        frame_name: &str,
        mesh: &IslandMesh,
        geometry: &FrameGeometry,
    ) -> Result<(), Self::Error>;

    /// Full position array of an island at one timeline key
    fn island_keyframe(
        &mut self,
        clip: &AnimationClip,
        island: usize,
        key: &Keyframe,
        positions: &[Vec3],
    ) -> Result<(), Self::Error>;

    fn end_clip(&mut self, _clip: &AnimationClip) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Feed every island of every clip to `sink`
///
/// All clips are checked against the model before the sink sees anything,
/// so a bad clip table produces no partial output.
pub fn emit_clips<S: SceneSink>(
    recon: &FrameReconstructor<'_>,
    clips: &[AnimationClip],
    target_fps: f32,
    sink: &mut S,
) -> Result<(), S::Error> {
    let model = recon.model();
    for clip in clips {
        clip.check(model.frame_count())?;
    }

    for clip in clips {
        let timeline = clip.timeline(target_fps);
        tracing::debug!(
            "Emitting clip {}: frames {}..={}, rate {:.3}",
            clip.name,
            clip.first,
            clip.last,
            timeline.rate
        );
        sink.begin_clip(clip, &timeline)?;

        let frame_name = &model.frame(clip.first)?.name;
        for island in 0..recon.island_count() {
            let mesh = recon.island_mesh(island)?;
            let base = recon.frame(island, clip.first)?;
            sink.island_mesh(clip, island, frame_name, mesh, &base)?;

            for key in &timeline.keys {
                if key.frame == clip.first {
                    sink.island_keyframe(clip, island, key, &base.positions)?;
                } else {
                    let positions = recon.positions(island, key.frame)?;
                    sink.island_keyframe(clip, island, key, &positions)?;
                }
            }
        }

        sink.end_clip(clip)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::two_triangle_model;

    #[derive(Debug, PartialEq)]
    enum Event {
        Begin(String, usize),
        Mesh(String, usize, String, usize),
        Key(String, usize, usize, f32, Vec3),
        End(String),
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<Event>,
    }

    impl SceneSink for RecordingSink {
        type Error = Md2Error;

        fn begin_clip(
            &mut self,
            clip: &AnimationClip,
            timeline: &ClipTimeline,
        ) -> Result<(), Md2Error> {
            self.events
                .push(Event::Begin(clip.name.to_string(), timeline.keys.len()));
            Ok(())
        }

        fn island_mesh(
            &mut self,
            clip: &AnimationClip,
            island: usize,
            frame_name: &str,
            mesh: &IslandMesh,
            _geometry: &FrameGeometry,
        ) -> Result<(), Md2Error> {
            self.events.push(Event::Mesh(
                clip.name.to_string(),
                island,
                frame_name.to_string(),
                mesh.faces.len(),
            ));
            Ok(())
        }

        fn island_keyframe(
            &mut self,
            clip: &AnimationClip,
            island: usize,
            key: &Keyframe,
            positions: &[Vec3],
        ) -> Result<(), Md2Error> {
            self.events.push(Event::Key(
                clip.name.to_string(),
                island,
                key.frame,
                key.time,
                positions[0],
            ));
            Ok(())
        }

        fn end_clip(&mut self, clip: &AnimationClip) -> Result<(), Md2Error> {
            self.events.push(Event::End(clip.name.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_emit_sequence() {
        let model = two_triangle_model();
        let recon = FrameReconstructor::new(&model).unwrap();
        // 2 frames at 12 fps on a 24 fps timeline: rate 1.0
        let clips = [AnimationClip::new("WALK", 0, 1, 12.0)];
        let mut sink = RecordingSink::default();

        emit_clips(&recon, &clips, 24.0, &mut sink).unwrap();

        let walk = || "WALK".to_string();
        assert_eq!(
            sink.events,
            vec![
                Event::Begin(walk(), 3),
                Event::Mesh(walk(), 0, "pose1".into(), 1),
                Event::Key(walk(), 0, 0, 0.0, Vec3::ZERO),
                Event::Key(walk(), 0, 1, 1.0, Vec3::new(1.0, 2.0, 3.0)),
                Event::Key(walk(), 0, 0, 2.0, Vec3::ZERO),
                Event::Mesh(walk(), 1, "pose1".into(), 1),
                Event::Key(walk(), 1, 0, 0.0, Vec3::new(100.0, 100.0, 0.0)),
                Event::Key(walk(), 1, 1, 1.0, Vec3::new(51.0, 52.0, 3.0)),
                Event::Key(walk(), 1, 0, 2.0, Vec3::new(100.0, 100.0, 0.0)),
                Event::End(walk()),
            ]
        );
    }

    #[test]
    fn test_bad_clip_emits_nothing() {
        let model = two_triangle_model();
        let recon = FrameReconstructor::new(&model).unwrap();
        let clips = [
            AnimationClip::new("OK", 0, 0, 10.0),
            AnimationClip::new("TOO_LONG", 0, 5, 10.0),
        ];
        let mut sink = RecordingSink::default();

        let result = emit_clips(&recon, &clips, 24.0, &mut sink);
        assert!(matches!(result, Err(Md2Error::ClipOutOfRange { .. })));
        assert!(sink.events.is_empty());
    }
}
