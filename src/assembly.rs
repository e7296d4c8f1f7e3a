//! Final film assembly: keep the clips that exist, in storyboard order, and
//! concatenate them.

use crate::renderer::{EncodeSettings, VideoEncoder};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Joins clips into one video
pub trait ClipConcatenator {
    fn concat(&self, clips: &[PathBuf], output: &Path) -> Result<()>;
}

/// Concatenation through the ffmpeg concat demuxer
pub struct FfmpegConcatenator {
    settings: EncodeSettings,
}

impl FfmpegConcatenator {
    pub fn new(settings: EncodeSettings) -> Self {
        Self { settings }
    }
}

impl ClipConcatenator for FfmpegConcatenator {
    fn concat(&self, clips: &[PathBuf], output: &Path) -> Result<()> {
        VideoEncoder::concat(clips, output, &self.settings)
    }
}

/// Which candidate clips will be used
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AssemblyPlan {
    pub clips: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    pub output: PathBuf,
    pub clips: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

impl fmt::Display for AssemblyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Output: {}", self.output.display())?;
        writeln!(f, "Clips: {}", self.clips.len())?;
        for clip in &self.clips {
            writeln!(f, "  ✓ {}", clip.display())?;
        }
        write!(f, "Skipped: {}", self.skipped.len())?;
        for clip in &self.skipped {
            write!(f, "\n  ✗ {}", clip.display())?;
        }
        Ok(())
    }
}

pub struct FilmAssembler<C: ClipConcatenator> {
    concatenator: C,
}

impl<C: ClipConcatenator> FilmAssembler<C> {
    pub fn new(concatenator: C) -> Self {
        Self { concatenator }
    }

    pub fn concatenator(&self) -> &C {
        &self.concatenator
    }

    /// Split candidates into existing clips and missing ones, keeping order
    pub fn plan(&self, candidates: &[PathBuf]) -> AssemblyPlan {
        let mut plan = AssemblyPlan::default();
        for clip in candidates {
            if clip.is_file() {
                plan.clips.push(clip.clone());
            } else {
                warn!("⚠️  Missing clip, skipping: {}", clip.display());
                plan.skipped.push(clip.clone());
            }
        }
        plan
    }

    /// Concatenate the existing candidates into `output`. Fails only when
    /// none of them exist.
    pub fn assemble(&self, candidates: &[PathBuf], output: &Path) -> Result<AssemblyReport> {
        let plan = self.plan(candidates);
        if plan.clips.is_empty() {
            anyhow::bail!("No rendered clips available to assemble");
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }

        info!(
            clips = plan.clips.len(),
            skipped = plan.skipped.len(),
            "assembling film into {}",
            output.display()
        );
        self.concatenator.concat(&plan.clips, output)?;

        Ok(AssemblyReport {
            output: output.to_path_buf(),
            clips: plan.clips,
            skipped: plan.skipped,
        })
    }
}
