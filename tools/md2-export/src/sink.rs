//! File-system scene sink
//!
//! Writes one directory per clip containing, for every island:
//! - `island_<n>.obj`: static mesh from the clip's first frame
//!   (positions, normals, one UV per face corner)
//! - `island_<n>.keys.json`: position keyframes on the target timeline

use anyhow::{Context, Result};
use glam::Vec3;
use nether_md2::{AnimationClip, ClipTimeline, FrameGeometry, IslandMesh, Keyframe, SceneSink};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Keyframe track of one island in one clip
#[derive(Debug, Serialize)]
pub struct KeyTrack {
    pub clip: String,
    pub island: usize,
    pub source_fps: f32,
    pub target_fps: f32,
    /// Timeline step between consecutive frames
    pub rate: f32,
    pub keys: Vec<TrackKey>,
}

#[derive(Debug, Serialize)]
pub struct TrackKey {
    pub frame: usize,
    pub time: f32,
    pub loop_closing: bool,
    pub positions: Vec<[f32; 3]>,
}

/// Writes OBJ meshes and JSON keyframe tracks under an output directory
pub struct FileSink {
    out_dir: PathBuf,
    target_fps: f32,
    clip_dir: PathBuf,
    rate: f32,
    tracks: Vec<KeyTrack>,
    files_written: usize,
}

impl FileSink {
    pub fn new(out_dir: impl Into<PathBuf>, target_fps: f32) -> Self {
        let out_dir = out_dir.into();
        Self {
            clip_dir: out_dir.clone(),
            out_dir,
            target_fps,
            rate: 0.0,
            tracks: Vec::new(),
            files_written: 0,
        }
    }

    pub fn files_written(&self) -> usize {
        self.files_written
    }

    fn track(&mut self, clip: &AnimationClip, island: usize) -> &mut KeyTrack {
        if let Some(i) = self.tracks.iter().position(|t| t.island == island) {
            return &mut self.tracks[i];
        }
        self.tracks.push(KeyTrack {
            clip: clip.name.to_string(),
            island,
            source_fps: clip.fps,
            target_fps: self.target_fps,
            rate: self.rate,
            keys: Vec::new(),
        });
        let last = self.tracks.len() - 1;
        &mut self.tracks[last]
    }
}

impl SceneSink for FileSink {
    type Error = anyhow::Error;

    fn begin_clip(&mut self, clip: &AnimationClip, timeline: &ClipTimeline) -> Result<()> {
        self.clip_dir = self.out_dir.join(&*clip.name);
        std::fs::create_dir_all(&self.clip_dir)
            .with_context(|| format!("Failed to create {}", self.clip_dir.display()))?;
        self.rate = timeline.rate;
        self.tracks.clear();
        Ok(())
    }

    fn island_mesh(
        &mut self,
        clip: &AnimationClip,
        island: usize,
        frame_name: &str,
        mesh: &IslandMesh,
        geometry: &FrameGeometry,
    ) -> Result<()> {
        let path = self.clip_dir.join(format!("island_{}.obj", island));
        let object = format!("{}_{}", clip.name, island);
        write_obj(&path, &object, frame_name, mesh, geometry)?;
        self.files_written += 1;
        Ok(())
    }

    fn island_keyframe(
        &mut self,
        clip: &AnimationClip,
        island: usize,
        key: &Keyframe,
        positions: &[Vec3],
    ) -> Result<()> {
        self.track(clip, island).keys.push(TrackKey {
            frame: key.frame,
            time: key.time,
            loop_closing: key.loop_closing,
            positions: positions.iter().map(|p| p.to_array()).collect(),
        });
        Ok(())
    }

    fn end_clip(&mut self, clip: &AnimationClip) -> Result<()> {
        for track in &self.tracks {
            let path = self
                .clip_dir
                .join(format!("island_{}.keys.json", track.island));
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output: {}", path.display()))?;
            let mut w = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut w, track)
                .with_context(|| format!("Failed to write keyframes: {}", path.display()))?;
            w.flush()?;
        }
        self.files_written += self.tracks.len();

        tracing::info!(
            "Exported clip {}: {} islands, {} keys each",
            clip.name,
            self.tracks.len(),
            self.tracks.first().map(|t| t.keys.len()).unwrap_or(0)
        );
        self.tracks.clear();
        Ok(())
    }
}

/// Write one island as a Wavefront OBJ
///
/// UVs are not shared between faces, so every face corner gets its own `vt`.
fn write_obj(
    path: &Path,
    object: &str,
    frame_name: &str,
    mesh: &IslandMesh,
    geometry: &FrameGeometry,
) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create output: {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# md2-export, frame {}", frame_name)?;
    writeln!(w, "o {}", object)?;
    for p in &geometry.positions {
        writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for n in &geometry.normals {
        writeln!(w, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for [u, v] in &mesh.uvs {
        writeln!(w, "vt {} {}", u, v)?;
    }
    for (face, corners) in mesh.faces.iter().enumerate() {
        write!(w, "f")?;
        for (corner, &vertex) in corners.iter().enumerate() {
            // OBJ indices are 1-based
            let v = vertex + 1;
            let vt = face * 3 + corner + 1;
            write!(w, " {}/{}/{}", v, vt, v)?;
        }
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> (IslandMesh, FrameGeometry) {
        (
            IslandMesh {
                faces: vec![[0, 1, 2]],
                uvs: vec![[0.0, 0.0], [0.5, 0.0], [0.0, 0.5]],
                vertex_count: 3,
            },
            FrameGeometry {
                positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                normals: vec![Vec3::Z; 3],
            },
        )
    }

    #[test]
    fn test_write_obj() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        let (mesh, geometry) = triangle_mesh();

        write_obj(&path, "STAND_0", "stand01", &mesh, &geometry).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# md2-export, frame stand01");
        assert_eq!(lines[1], "o STAND_0");
        assert_eq!(lines.iter().filter(|l| l.starts_with("v ")).count(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("vn ")).count(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("vt ")).count(), 3);
        assert_eq!(*lines.last().unwrap(), "f 1/1/1 2/2/2 3/3/3");
    }

    #[test]
    fn test_sink_writes_clip_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path(), 24.0);
        let clip = AnimationClip::new("RUN", 0, 0, 10.0);
        let timeline = clip.timeline(24.0);
        let (mesh, geometry) = triangle_mesh();

        sink.begin_clip(&clip, &timeline).unwrap();
        sink.island_mesh(&clip, 0, "run1", &mesh, &geometry).unwrap();
        for key in &timeline.keys {
            sink.island_keyframe(&clip, 0, key, &geometry.positions)
                .unwrap();
        }
        sink.end_clip(&clip).unwrap();

        assert!(dir.path().join("RUN/island_0.obj").exists());
        let json = std::fs::read_to_string(dir.path().join("RUN/island_0.keys.json")).unwrap();
        let track: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(track["clip"], "RUN");
        assert_eq!(track["keys"].as_array().unwrap().len(), 2);
        assert_eq!(track["keys"][1]["loop_closing"], true);
        assert_eq!(sink.files_written(), 2);
    }
}
