use super::{Beat, FilmScene};
use crate::assets::LogoVisual;
use crate::display::DisplayList;
use crate::geometry::{partial_path, ShapeKind, ShapeSpec, Transform2, Vec2};
use crate::palette;
use crate::rate::{lagged, RateFunction};
use crate::renderer::timeline::Cue;
use crate::storyboard::SceneKind;
use std::f32::consts::PI;

/// Shown when the branding image cannot be loaded
pub const FALLBACK_LABEL: &str = "Imran's Lab";
pub const TAGLINE: &str = "We Are Experts in Design, App, and Development";
pub const IMAGE_HEIGHT: f32 = 3.0;

const FRAME_BUFF: f32 = 0.25;
const FRAME_CORNER: f32 = 0.2;
const TAGLINE_GAP: f32 = 0.4;
const GLOW_WIDTH: f32 = 14.0;

const ENTRANCE: usize = 0;
const GLOW: usize = 1;
const TAGLINE_BEAT: usize = 2;
const PULSE: usize = 3;
const DRIFT: usize = 4;
const POP: usize = 5;
const FLICKER: usize = 6;
const OUT: usize = 7;

const BEATS: [Beat; 8] = [
    Beat::new("entrance", 1.6, RateFunction::Smooth),
    Beat::new("glow", 0.6, RateFunction::Smooth),
    Beat::new("tagline", 1.2, RateFunction::Linear),
    Beat::new("pulse", 2.0, RateFunction::ThereAndBack),
    Beat::new("drift", 3.0, RateFunction::Smooth),
    Beat::new("pop", 0.4, RateFunction::ThereAndBack),
    Beat::new("flicker", 0.25, RateFunction::Smooth),
    Beat::new("out", 0.8, RateFunction::Smooth),
];

/// Branding card: logo in a neon frame, tagline, glow pulse
pub struct BrandingScene {
    visual: ShapeSpec,
    frame: ShapeSpec,
    tagline: ShapeSpec,
}

impl BrandingScene {
    pub fn new(logo: LogoVisual) -> Self {
        let visual = match logo {
            LogoVisual::Bitmap(bitmap) => ShapeSpec::new(
                "brand",
                ShapeKind::Image {
                    bitmap,
                    height: IMAGE_HEIGHT,
                },
            ),
            LogoVisual::Shape(shape) => ShapeSpec {
                name: "brand".to_string(),
                ..shape
            },
        };

        let (min, max) = visual.bounds();
        let size = max - min;
        let frame = ShapeSpec::rounded_rectangle(
            "frame",
            size.x + 2.0 * FRAME_BUFF,
            size.y + 2.0 * FRAME_BUFF,
            FRAME_CORNER,
        )
        .stroked(palette::NEON_STROKE, 2.0, 1.0);

        let tagline = ShapeSpec::text("tagline", TAGLINE, 28.0).filled(palette::NEON_ACCENT, 1.0);
        let tagline_height = tagline.box_size().map(|(_, h)| h).unwrap_or(0.0);
        let tagline_y = min.y - FRAME_BUFF - TAGLINE_GAP - tagline_height / 2.0;

        Self {
            visual,
            frame,
            tagline: tagline.at(Vec2::new(0.0, tagline_y)),
        }
    }

    /// Glow stroke width and opacity at `cue`
    pub fn glow_stroke(&self, cue: Cue) -> (f32, f32) {
        if cue.reached(PULSE) {
            let wave = (self.eased(cue, PULSE) * PI).sin();
            let opacity = 0.20 + 0.15 * wave;
            let dimmed = opacity + (0.15 - opacity) * self.eased(cue, FLICKER);
            (GLOW_WIDTH + 6.0 * wave, dimmed)
        } else {
            (GLOW_WIDTH, 0.3 * self.eased(cue, GLOW))
        }
    }

    /// Placement of the logo group (visual, frame, glow)
    pub fn group_placement(&self, cue: Cue) -> Transform2 {
        let drift = self.eased(cue, DRIFT);
        let scale = (1.0 + 0.04 * self.eased(cue, PULSE)) * (1.0 + 0.08 * self.eased(cue, POP));
        Transform2::translate(Vec2::UP * 0.35 * drift)
            .with_rotation(0.02 * drift)
            .with_scale(scale)
    }
}

impl FilmScene for BrandingScene {
    fn kind(&self) -> SceneKind {
        SceneKind::OpeningBranding
    }

    fn beats(&self) -> &[Beat] {
        &BEATS
    }

    fn compose(&self, cue: Cue) -> DisplayList {
        let mut list = DisplayList::new(palette::BACKGROUND);
        let out = 1.0 - self.eased(cue, OUT);
        let group = self.group_placement(cue);

        if cue.reached(GLOW) {
            let (width, opacity) = self.glow_stroke(cue);
            let glow = ShapeSpec {
                name: "glow".to_string(),
                ..self.frame.clone()
            }
            .stroked(palette::NEON_STROKE, width, opacity);
            list.push(glow, group, out);
        }

        let entrance = cue.of(ENTRANCE);
        let appear = RateFunction::Smooth.apply(lagged(entrance, 0, 2, 0.2));
        let rise = Vec2::UP * 0.3 * (1.0 - appear);
        let mut visual_at = group;
        visual_at.translation = visual_at.translation + rise;
        visual_at.scale *= 0.85 + 0.15 * appear;
        list.push(self.visual.clone(), visual_at, appear * out);

        let drawn = RateFunction::Smooth.apply(lagged(entrance, 1, 2, 0.2));
        if drawn >= 1.0 {
            list.push(self.frame.clone(), group, out);
        } else if drawn > 0.0 {
            let outline = partial_path(&self.frame.outline(), true, drawn);
            list.push(
                ShapeSpec::polyline("frame", outline).stroked(palette::NEON_STROKE, 2.0, 1.0),
                group,
                out,
            );
        }

        if cue.reached(TAGLINE_BEAT) {
            let written = self.eased(cue, TAGLINE_BEAT);
            let dimmed = 1.0 - 0.3 * self.eased(cue, FLICKER);
            list.push(
                self.tagline.clone(),
                Transform2::translate(Vec2::UP * 0.25 * self.eased(cue, DRIFT)),
                written * dimmed * out,
            );
        }

        list
    }
}
