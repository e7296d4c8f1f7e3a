//! Scene descriptions: timed beats plus a pure `compose` from cue to
//! display list.

pub mod branding;
pub mod landing;
pub mod liftoff;
pub mod logo;
pub mod orbit;

use crate::assets::AssetLoader;
use crate::config::AssetsConfig;
use crate::display::DisplayList;
use crate::geometry::{Color, ShapeSpec, Vec2};
use crate::rate::RateFunction;
use crate::renderer::timeline::{Cue, Timeline};
use crate::storyboard::SceneKind;

pub use branding::BrandingScene;
pub use landing::MarsLandingScene;
pub use liftoff::LiftoffScene;
pub use logo::LogoScene;
pub use orbit::OrbitScene;

/// Visible scene height in units
pub const FRAME_HEIGHT: f32 = 8.0;
/// Visible scene width in units for a 16:9 frame
pub const FRAME_WIDTH: f32 = FRAME_HEIGHT * 16.0 / 9.0;

/// One timed step of a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beat {
    pub name: &'static str,
    /// seconds
    pub duration: f32,
    pub rate: RateFunction,
}

impl Beat {
    pub const fn new(name: &'static str, duration: f32, rate: RateFunction) -> Self {
        Self {
            name,
            duration,
            rate,
        }
    }
}

/// A scene of the film. Implementations are immutable after construction,
/// so frames can be composed in any order and on any thread.
pub trait FilmScene: Send + Sync {
    fn kind(&self) -> SceneKind;

    fn beats(&self) -> &[Beat];

    /// Everything visible at `cue`
    fn compose(&self, cue: Cue) -> DisplayList;

    fn duration(&self) -> f32 {
        self.beats().iter().map(|b| b.duration).sum()
    }

    fn timeline(&self, fps: u32) -> Timeline {
        Timeline::new(fps, self.beats().iter().map(|b| (b.name, b.duration)))
    }

    /// Progress of `beat` at `cue`, shaped by the beat's rate function
    fn eased(&self, cue: Cue, beat: usize) -> f32 {
        let rate = self.beats().get(beat).map(|b| b.rate).unwrap_or_default();
        rate.apply(cue.of(beat))
    }

    /// Index of the beat called `name`
    fn beat_index(&self, name: &str) -> Option<usize> {
        self.beats().iter().position(|b| b.name == name)
    }
}

/// Build the scene for `kind`, resolving branding assets through `loader`
pub fn build_scene(
    kind: SceneKind,
    loader: &mut AssetLoader,
    assets: &AssetsConfig,
) -> Box<dyn FilmScene> {
    match kind {
        SceneKind::LogoIntro => Box::new(LogoScene::intro(loader.logo_from_svg(&assets.logo_svg))),
        SceneKind::LogoOutro => Box::new(LogoScene::outro(loader.logo_from_svg(&assets.logo_svg))),
        SceneKind::StarshipLiftoff => Box::new(LiftoffScene::new()),
        SceneKind::StarshipBuild => Box::new(OrbitScene::new()),
        SceneKind::StarshipMarsLanding => Box::new(MarsLandingScene::new()),
        SceneKind::OpeningBranding => Box::new(BrandingScene::new(loader.logo_from_raster(
            &assets.brand_image,
            branding::FALLBACK_LABEL,
            crate::palette::NEON_TEXT,
        ))),
    }
}

/// Left-aligned HUD text line starting at `left`
pub(crate) fn hud_line(name: &str, content: String, font_size: f32, left: Vec2, color: Color) -> ShapeSpec {
    let text = ShapeSpec::text(name, content, font_size).filled(color, 1.0);
    let half_width = text.box_size().map(|(w, _)| w / 2.0).unwrap_or(0.0);
    text.at(left + Vec2::RIGHT * half_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssetsConfig;
    use tempfile::TempDir;

    const ALL_KINDS: [SceneKind; 6] = [
        SceneKind::LogoIntro,
        SceneKind::StarshipLiftoff,
        SceneKind::StarshipBuild,
        SceneKind::StarshipMarsLanding,
        SceneKind::LogoOutro,
        SceneKind::OpeningBranding,
    ];

    fn build_all() -> Vec<Box<dyn FilmScene>> {
        let dir = TempDir::new().unwrap();
        let mut loader = AssetLoader::new(dir.path());
        let assets = AssetsConfig::default();
        ALL_KINDS
            .iter()
            .map(|kind| build_scene(*kind, &mut loader, &assets))
            .collect()
    }

    #[test]
    fn test_every_kind_builds_with_missing_assets() {
        for (scene, kind) in build_all().iter().zip(ALL_KINDS) {
            assert_eq!(scene.kind(), kind);
            assert!(scene.duration() > 0.0);
        }
    }

    #[test]
    fn test_every_beat_composes() {
        for scene in build_all() {
            for beat in 0..scene.beats().len() {
                for progress in [0.0, 0.5, 1.0] {
                    let list = scene.compose(Cue::new(beat, progress));
                    for item in &list.items {
                        assert!(item.opacity > 0.0 && item.opacity <= 1.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_timeline_matches_beats() {
        for scene in build_all() {
            let timeline = scene.timeline(60);
            let expected = (scene.duration() * 60.0).round() as i64;
            // Per-beat rounding can drift by a frame per beat
            let drift = (timeline.total_frames() as i64 - expected).abs();
            assert!(drift <= scene.beats().len() as i64);
        }
    }

    #[test]
    fn test_eased_uses_beat_rate() {
        let scene = LiftoffScene::new();
        let ascent = scene.beat_index("ascent").unwrap();
        let cue = Cue::new(ascent, 0.5);
        assert_eq!(
            scene.eased(cue, ascent),
            RateFunction::EaseInSine.apply(0.5)
        );
    }

    #[test]
    fn test_hud_line_is_left_aligned() {
        let line = hud_line("l", "ALT".to_string(), 48.0, Vec2::new(1.0, 0.0), Color::WHITE);
        let (min, _) = line.bounds();
        assert!((min.x - 1.0).abs() < 1e-5);
    }
}
