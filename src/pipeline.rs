use crate::assembly::{AssemblyReport, ClipConcatenator, FfmpegConcatenator, FilmAssembler};
use crate::assets::AssetLoader;
use crate::config::AppConfig;
use crate::parser::StoryboardParser;
use crate::renderer::{EncodeSettings, RenderEngine, VideoEncoder};
use crate::scenes::build_scene;
use crate::storyboard::{Resolution, SceneEntry, Storyboard};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Outcome of rendering the storyboard's scenes
#[derive(Debug, Default)]
pub struct RenderSummary {
    /// Clips ready for assembly, in storyboard order
    pub clips: Vec<PathBuf>,
    /// Scene id and the reason it has no clip
    pub failed: Vec<(String, String)>,
}

/// Renders a storyboard scene by scene and assembles the film
pub struct Production<'a> {
    config: &'a AppConfig,
    storyboard: Storyboard,
}

impl<'a> Production<'a> {
    pub fn new(config: &'a AppConfig, storyboard: Storyboard) -> Self {
        Self { config, storyboard }
    }

    /// Where the film ends up: the storyboard's output, else the configured one
    pub fn final_output(&self) -> PathBuf {
        self.storyboard
            .output
            .clone()
            .unwrap_or_else(|| self.config.film.final_output.clone())
    }

    /// Clip paths for every scene, rendered or not
    pub fn clip_paths(&self) -> Vec<PathBuf> {
        self.storyboard.clip_paths(&self.config.renderer.output_dir)
    }

    /// Render one scene to its clip. Entries with a pre-rendered clip are
    /// left alone.
    pub fn render_scene(&self, entry: &SceneEntry, loader: &mut AssetLoader) -> Result<PathBuf> {
        let clip = entry.clip_path(&self.config.renderer.output_dir);
        if entry.clip.is_some() {
            info!("🎞️  Using pre-rendered clip for '{}': {}", entry.id, clip.display());
            return Ok(clip);
        }

        let (width, height) = self.storyboard.metadata.resolution.dimensions();
        let fps = self.storyboard.metadata.fps;
        let frames_dir = frames_dir_for(self.config, &entry.id);

        let scene = build_scene(entry.kind, loader, &self.config.assets);
        let engine = RenderEngine::new(scene.as_ref(), width, height, fps);
        let frames = engine.render(&frames_dir)?;
        info!("  ✓ {} frames for '{}'", frames, entry.id);

        if let Some(parent) = clip.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create clip directory: {}", parent.display()))?;
        }
        VideoEncoder::encode(
            &RenderEngine::frame_pattern(&frames_dir),
            &clip,
            fps,
            width,
            height,
        )?;

        if !self.config.renderer.keep_frames {
            if let Err(e) = std::fs::remove_dir_all(&frames_dir) {
                warn!("Failed to remove frames in {}: {}", frames_dir.display(), e);
            }
        }

        info!("✨ Clip created: {}", clip.display());
        Ok(clip)
    }

    /// Render every scene. A failing scene is logged and left out; the
    /// assembler later skips its missing clip.
    pub fn render_all(&self, loader: &mut AssetLoader) -> RenderSummary {
        let mut summary = RenderSummary::default();
        for entry in &self.storyboard.scenes {
            info!("🎬 Rendering scene '{}' ({:?})", entry.id, entry.kind);
            match self.render_scene(entry, loader) {
                Ok(clip) => summary.clips.push(clip),
                Err(e) => {
                    error!("Scene '{}' failed: {:#}", entry.id, e);
                    summary.failed.push((entry.id.clone(), format!("{:#}", e)));
                }
            }
        }
        summary
    }

    /// ffmpeg-backed assembler using the film's encoding settings
    pub fn assembler(&self) -> FilmAssembler<FfmpegConcatenator> {
        let settings = EncodeSettings::from_config(&self.config.film, self.storyboard.metadata.fps);
        FilmAssembler::new(FfmpegConcatenator::new(settings))
    }

    /// Render all scenes, then assemble
    pub fn run(&self, loader: &mut AssetLoader) -> Result<AssemblyReport> {
        if !VideoEncoder::is_available() {
            print_ffmpeg_hint();
            anyhow::bail!("FFmpeg not found. Please install ffmpeg to render the film.");
        }
        self.run_with(loader, &self.assembler())
    }

    /// Render all scenes and assemble only the clips this run produced.
    /// A clip left on disk by an earlier run of a failing scene is not used.
    pub fn run_with<C: ClipConcatenator>(
        &self,
        loader: &mut AssetLoader,
        assembler: &FilmAssembler<C>,
    ) -> Result<AssemblyReport> {
        let summary = self.render_all(loader);
        if !summary.failed.is_empty() {
            warn!(
                "{} of {} scenes failed to render",
                summary.failed.len(),
                self.storyboard.scenes.len()
            );
        }
        assembler.assemble(&summary.clips, &self.final_output())
    }
}

/// The built-in film at the configured resolution and frame rate
pub fn default_storyboard(config: &AppConfig) -> Result<Storyboard> {
    let (width, height) = config.video.dimensions();
    let mut storyboard = Storyboard::default();
    storyboard.metadata.resolution = Resolution::Named(format!("{}x{}", width, height));
    storyboard.metadata.fps = config.video.fps;
    StoryboardParser::validate(&storyboard).context("Invalid video configuration")?;
    Ok(storyboard)
}

/// Frame directory a scene renders into
pub fn frames_dir_for(config: &AppConfig, id: &str) -> PathBuf {
    config.renderer.frames_dir.join(id)
}

pub fn print_ffmpeg_hint() {
    eprintln!("⚠️  FFmpeg not found.");
    eprintln!("\n💡 To enable video generation, install FFmpeg:");
    if cfg!(target_os = "macos") {
        eprintln!("   brew install ffmpeg");
    } else if cfg!(target_os = "windows") {
        eprintln!("   choco install ffmpeg");
    } else if cfg!(target_os = "linux") {
        eprintln!("   sudo apt-get install ffmpeg");
    } else {
        eprintln!("   Install FFmpeg from https://ffmpeg.org/download.html");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storyboard::SceneKind;
    use std::cell::RefCell;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.renderer.output_dir = dir.join("clips");
        config.renderer.frames_dir = dir.join("frames");
        config.film.final_output = dir.join("film.mp4");
        config
    }

    #[test]
    fn test_default_storyboard_follows_config() {
        let mut config = AppConfig::default();
        config.video.resolution = "1280x720".into();
        config.video.fps = 30;
        let storyboard = default_storyboard(&config).unwrap();
        assert_eq!(storyboard.metadata.resolution.dimensions(), (1280, 720));
        assert_eq!(storyboard.metadata.fps, 30);
        assert_eq!(storyboard.scenes.len(), 5);
    }

    #[test]
    fn test_default_storyboard_rejects_zero_fps() {
        let mut config = AppConfig::default();
        config.video.fps = 0;
        let err = default_storyboard(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("FPS must be greater than 0"));
    }

    #[test]
    fn test_default_storyboard_malformed_resolution_falls_back() {
        let mut config = AppConfig::default();
        config.video.resolution = "0x0".into();
        let storyboard = default_storyboard(&config).unwrap();
        assert_eq!(storyboard.metadata.resolution.dimensions(), (1920, 1080));
    }

    #[test]
    fn test_final_output_prefers_storyboard() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());

        let production = Production::new(&config, Storyboard::default());
        assert_eq!(production.final_output(), dir.path().join("film.mp4"));

        let mut storyboard = Storyboard::default();
        storyboard.output = Some(PathBuf::from("elsewhere.mp4"));
        let production = Production::new(&config, storyboard);
        assert_eq!(production.final_output(), PathBuf::from("elsewhere.mp4"));
    }

    #[test]
    fn test_clip_paths_use_output_dir() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let production = Production::new(&config, Storyboard::default());
        let clips = production.clip_paths();
        assert_eq!(clips[1], dir.path().join("clips/starship_liftoff.mp4"));
        assert_eq!(
            frames_dir_for(&config, "intro"),
            dir.path().join("frames/intro")
        );
    }

    #[test]
    fn test_prerendered_clip_is_not_rendered() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let production = Production::new(&config, Storyboard::default());
        let mut loader = AssetLoader::new(dir.path());

        let mut entry = SceneEntry::new("landing", SceneKind::StarshipMarsLanding);
        entry.clip = Some(dir.path().join("landing.mp4"));

        let clip = production.render_scene(&entry, &mut loader).unwrap();
        assert_eq!(clip, dir.path().join("landing.mp4"));
        assert!(!dir.path().join("frames/landing").exists());
    }

    #[test]
    fn test_assemble_without_clips_fails() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let production = Production::new(&config, Storyboard::default());
        let err = production
            .assembler()
            .assemble(&production.clip_paths(), &production.final_output())
            .unwrap_err();
        assert!(err.to_string().contains("No rendered clips"));
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Vec<PathBuf>>>,
    }

    impl ClipConcatenator for Recorder {
        fn concat(&self, clips: &[PathBuf], _output: &Path) -> Result<()> {
            self.calls.borrow_mut().push(clips.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_run_ignores_old_clip_of_failed_scene() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(dir.path());
        // Frames cannot be written below a regular file, so liftoff fails
        config.renderer.frames_dir = dir.path().join("blocked");
        std::fs::write(&config.renderer.frames_dir, b"").unwrap();

        let old_clip = dir.path().join("clips/starship_liftoff.mp4");
        std::fs::create_dir_all(old_clip.parent().unwrap()).unwrap();
        std::fs::write(&old_clip, b"from an earlier run").unwrap();

        let landing_clip = dir.path().join("landing.mp4");
        std::fs::write(&landing_clip, b"clip").unwrap();
        let mut landing = SceneEntry::new("landing", SceneKind::StarshipMarsLanding);
        landing.clip = Some(landing_clip.clone());

        let mut storyboard = Storyboard::default();
        storyboard.scenes = vec![
            SceneEntry::new("starship_liftoff", SceneKind::StarshipLiftoff),
            landing,
        ];

        let production = Production::new(&config, storyboard);
        let mut loader = AssetLoader::new(dir.path());
        let assembler = FilmAssembler::new(Recorder::default());
        let report = production.run_with(&mut loader, &assembler).unwrap();

        assert_eq!(report.clips, vec![landing_clip.clone()]);
        assert!(report.skipped.is_empty());
        assert_eq!(assembler.concatenator().calls.borrow().clone(), vec![vec![landing_clip]]);
    }

    #[test]
    fn test_run_with_only_failed_scenes_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(dir.path());
        config.renderer.frames_dir = dir.path().join("blocked");
        std::fs::write(&config.renderer.frames_dir, b"").unwrap();

        let old_clip = dir.path().join("clips/starship_liftoff.mp4");
        std::fs::create_dir_all(old_clip.parent().unwrap()).unwrap();
        std::fs::write(&old_clip, b"from an earlier run").unwrap();

        let mut storyboard = Storyboard::default();
        storyboard.scenes = vec![SceneEntry::new("starship_liftoff", SceneKind::StarshipLiftoff)];

        let production = Production::new(&config, storyboard);
        let mut loader = AssetLoader::new(dir.path());
        let assembler = FilmAssembler::new(Recorder::default());
        let err = production.run_with(&mut loader, &assembler).unwrap_err();

        assert!(err.to_string().contains("No rendered clips"));
        assert!(assembler.concatenator().calls.borrow().is_empty());
    }
}
