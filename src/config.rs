use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub renderer: RendererConfig,
    pub video: VideoConfig,
    pub assets: AssetsConfig,
    pub film: FilmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RendererConfig {
    /// Where per-scene clips are written
    pub output_dir: PathBuf,
    /// Scratch directory for PPM frames
    pub frames_dir: PathBuf,
    pub keep_frames: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VideoConfig {
    pub resolution: String,
    pub fps: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    pub base_path: PathBuf,
    pub logo_svg: PathBuf,
    pub brand_image: PathBuf,
}

/// Final concatenation settings
#[derive(Debug, Deserialize, Clone)]
pub struct FilmConfig {
    pub final_output: PathBuf,
    pub codec: String,
    pub preset: String,
    pub bitrate: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            logo_svg: PathBuf::from("assets/logo.svg"),
            brand_image: PathBuf::from("assets/branding_image.png"),
        }
    }
}

impl Default for FilmConfig {
    fn default() -> Self {
        Self {
            final_output: PathBuf::from("media/videos/Compiled/1080p60/Complete_Film.mp4"),
            codec: "libx264".to_string(),
            preset: "medium".to_string(),
            bitrate: "8000k".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            renderer: RendererConfig {
                output_dir: PathBuf::from("media/videos/clips"),
                frames_dir: PathBuf::from("media/frames"),
                keep_frames: false,
            },
            video: VideoConfig {
                resolution: "1920x1080".to_string(),
                fps: 60,
            },
            assets: AssetsConfig::default(),
            film: FilmConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl VideoConfig {
    /// Width and height parsed from `WIDTHxHEIGHT`, falling back to 1080p
    pub fn dimensions(&self) -> (u32, u32) {
        let mut parts = self.resolution.split('x').map(|p| p.trim().parse::<u32>());
        match (parts.next(), parts.next(), parts.next()) {
            (Some(Ok(w)), Some(Ok(h)), None) if w > 0 && h > 0 => (w, h),
            _ => (1920, 1080),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Like `load`, but reading `file` instead of `starship-film.*` in the
    /// working directory
    pub fn load_from(file: Option<&std::path::Path>) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("renderer.output_dir", path_str(&defaults.renderer.output_dir))?
            .set_default("renderer.frames_dir", path_str(&defaults.renderer.frames_dir))?
            .set_default("renderer.keep_frames", defaults.renderer.keep_frames)?
            .set_default("video.resolution", defaults.video.resolution)?
            .set_default("video.fps", defaults.video.fps as i64)?
            .set_default("assets.base_path", path_str(&defaults.assets.base_path))?
            .set_default("assets.logo_svg", path_str(&defaults.assets.logo_svg))?
            .set_default("assets.brand_image", path_str(&defaults.assets.brand_image))?
            .set_default("film.final_output", path_str(&defaults.film.final_output))?
            .set_default("film.codec", defaults.film.codec)?
            .set_default("film.preset", defaults.film.preset)?
            .set_default("film.bitrate", defaults.film.bitrate)?
            .set_default("logging.level", defaults.logging.level)?
            .add_source(match file {
                Some(path) => config::File::from(path).required(true),
                // Load from file if exists
                None => config::File::with_name("starship-film").required(false),
            })
            // Allow env var overrides (e.g. STARSHIP__VIDEO__FPS=30)
            .add_source(
                config::Environment::with_prefix("STARSHIP")
                    .prefix_separator("__")
                    .separator("__"),
            );

        builder.build()?.try_deserialize()
    }
}

fn path_str(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}
