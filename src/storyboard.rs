use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ordered list of scenes that make up the film
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storyboard {
    pub metadata: Metadata,
    pub scenes: Vec<SceneEntry>,
    /// Final film path; falls back to the configured output
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// Film metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    #[serde(default = "default_resolution")]
    pub resolution: Resolution,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_resolution() -> Resolution {
    Resolution::Named("1920x1080".to_string())
}

fn default_fps() -> u32 {
    60
}

/// Video resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resolution {
    Named(String), // e.g., "1920x1080", "1280x720"
    Dimensions { width: u32, height: u32 },
}

impl Resolution {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Resolution::Named(s) => {
                let parts: Vec<&str> = s.split('x').collect();
                if parts.len() == 2 {
                    let width = parts[0].parse().unwrap_or(1920);
                    let height = parts[1].parse().unwrap_or(1080);
                    (width, height)
                } else {
                    (1920, 1080) // Default to 1080p
                }
            }
            Resolution::Dimensions { width, height } => (*width, *height),
        }
    }
}

/// One scene of the film
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEntry {
    pub id: String,
    pub kind: SceneKind,
    /// Pre-rendered clip; when absent the clip is rendered to `<output_dir>/<id>.mp4`
    #[serde(default)]
    pub clip: Option<PathBuf>,
}

impl SceneEntry {
    pub fn new(id: impl Into<String>, kind: SceneKind) -> Self {
        Self {
            id: id.into(),
            kind,
            clip: None,
        }
    }

    pub fn clip_path(&self, output_dir: &Path) -> PathBuf {
        self.clip
            .clone()
            .unwrap_or_else(|| output_dir.join(format!("{}.mp4", self.id)))
    }
}

/// Scenes the film knows how to compose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum SceneKind {
    LogoIntro,
    StarshipLiftoff,
    StarshipBuild,
    StarshipMarsLanding,
    LogoOutro,
    OpeningBranding,
}

impl SceneKind {
    pub fn default_id(&self) -> &'static str {
        match self {
            SceneKind::LogoIntro => "intro",
            SceneKind::StarshipLiftoff => "starship_liftoff",
            SceneKind::StarshipBuild => "starship_scene",
            SceneKind::StarshipMarsLanding => "starship_mars_landing",
            SceneKind::LogoOutro => "outro",
            SceneKind::OpeningBranding => "opening_branding",
        }
    }
}

impl Default for Storyboard {
    /// Intro, liftoff, orbital build-up, Mars landing, outro
    fn default() -> Self {
        let scenes = [
            SceneKind::LogoIntro,
            SceneKind::StarshipLiftoff,
            SceneKind::StarshipBuild,
            SceneKind::StarshipMarsLanding,
            SceneKind::LogoOutro,
        ]
        .into_iter()
        .map(|kind| SceneEntry::new(kind.default_id(), kind))
        .collect();

        Self {
            metadata: Metadata {
                title: "Complete Film".into(),
                resolution: default_resolution(),
                fps: default_fps(),
                description: Some("Logo intro, liftoff, orbit, Mars landing, outro".into()),
            },
            scenes,
            output: None,
        }
    }
}

impl Storyboard {
    /// Clip paths in film order
    pub fn clip_paths(&self, output_dir: &Path) -> Vec<PathBuf> {
        self.scenes
            .iter()
            .map(|scene| scene.clip_path(output_dir))
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&SceneEntry> {
        self.scenes.iter().find(|scene| scene.id == id)
    }
}
