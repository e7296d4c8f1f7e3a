use crate::display::DisplayList;
use crate::palette;
use crate::renderer::{Compositor, FrameBuffer, Timeline, Viewport};
use crate::scenes::FilmScene;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, info};

/// Renders one scene into numbered PPM frames
pub struct RenderEngine<'a> {
    scene: &'a dyn FilmScene,
    timeline: Timeline,
    viewport: Viewport,
}

impl<'a> RenderEngine<'a> {
    pub fn new(scene: &'a dyn FilmScene, width: u32, height: u32, fps: u32) -> Self {
        Self {
            scene,
            timeline: scene.timeline(fps),
            viewport: Viewport::new(width, height),
        }
    }

    /// Display list for `frame`; frames past the end hold the last one
    pub fn compose_frame(&self, frame: u32) -> DisplayList {
        let last = self.timeline.total_frames().saturating_sub(1);
        match self.timeline.cue_at_frame(frame.min(last)) {
            Some(cue) => self.scene.compose(cue),
            None => DisplayList::new(palette::BACKGROUND),
        }
    }

    /// Rasterize a single frame
    pub fn render_frame(&self, frame: u32) -> FrameBuffer {
        let mut buffer = FrameBuffer::new(self.viewport.width, self.viewport.height);
        Compositor::draw(&mut buffer, &self.viewport, &self.compose_frame(frame));
        buffer
    }

    /// ffmpeg input pattern matching the files written by `render`
    pub fn frame_pattern(output_dir: &Path) -> PathBuf {
        output_dir.join("frame_%05d.ppm")
    }

    /// Render all frames to the output directory. Frames are independent,
    /// so they are rendered in parallel. Frames left by an earlier render
    /// are removed first so the ffmpeg pattern only matches this one.
    pub fn render(&self, output_dir: &Path) -> Result<u32> {
        std::fs::create_dir_all(output_dir).with_context(|| {
            format!("Failed to create frames directory: {}", output_dir.display())
        })?;
        let stale = remove_frames(output_dir)?;
        if stale > 0 {
            debug!("Removed {} stale frames from {}", stale, output_dir.display());
        }

        let total_frames = self.timeline.total_frames();
        info!(
            scene = ?self.scene.kind(),
            frames = total_frames,
            "rendering frames to {}",
            output_dir.display()
        );

        let done = AtomicU32::new(0);
        (0..total_frames).into_par_iter().try_for_each(|frame| {
            let path = output_dir.join(format!("frame_{:05}.ppm", frame));
            self.render_frame(frame).save_ppm(&path)?;

            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if finished % 60 == 0 {
                debug!("  Rendered frame {}/{}", finished, total_frames);
            }
            Ok::<(), anyhow::Error>(())
        })?;

        Ok(total_frames)
    }

    /// Get timeline
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}

fn is_frame_file(name: &str) -> bool {
    name.strip_prefix("frame_")
        .and_then(|rest| rest.strip_suffix(".ppm"))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Delete `frame_NNNNN.ppm` files, leaving anything else in the directory
fn remove_frames(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read frames directory: {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_str().is_some_and(is_frame_file) && entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path()).with_context(|| {
                format!("Failed to remove stale frame: {}", entry.path().display())
            })?;
            removed += 1;
        }
    }
    Ok(removed)
}
