use super::{Beat, FilmScene};
use crate::assets::LogoVisual;
use crate::display::DisplayList;
use crate::geometry::{partial_path, Color, ShapeKind, ShapeSpec, Stroke, Vec2};
use crate::palette;
use crate::rate::{pulse, RateFunction};
use crate::renderer::timeline::Cue;
use crate::storyboard::SceneKind;

/// On-screen height of a bitmap logo
pub const LOGO_HEIGHT: f32 = 2.5;
const CAPTION_GAP: f32 = 0.75;
const TRACE_WIDTH: f32 = 3.0;

const TRACE: usize = 0;
const OUTLINE: usize = 1;
const FILL: usize = 2;
const UNSTROKE: usize = 3;
const CAPTION: usize = 5;

const INTRO_BEATS: [Beat; 7] = [
    Beat::new("trace", 2.2, RateFunction::Smooth),
    Beat::new("outline", 1.0, RateFunction::Linear),
    Beat::new("fill", 0.7, RateFunction::Smooth),
    Beat::new("unstroke", 0.4, RateFunction::Smooth),
    Beat::new("settle", 0.5, RateFunction::Linear),
    Beat::new("caption", 0.8, RateFunction::Smooth),
    Beat::new("hold", 1.0, RateFunction::Linear),
];

const OUTRO_BEATS: [Beat; 9] = [
    Beat::new("trace", 2.2, RateFunction::Smooth),
    Beat::new("outline", 1.0, RateFunction::Linear),
    Beat::new("fill", 0.7, RateFunction::Smooth),
    Beat::new("unstroke", 0.4, RateFunction::Smooth),
    Beat::new("settle", 0.5, RateFunction::Linear),
    Beat::new("caption", 0.8, RateFunction::Smooth),
    Beat::new("hold", 1.2, RateFunction::Linear),
    Beat::new("fade", 1.2, RateFunction::Smooth),
    Beat::new("tail", 0.3, RateFunction::Linear),
];

#[derive(Debug, Clone, PartialEq)]
struct Caption {
    text: &'static str,
    font_size: f32,
    color: Color,
}

/// Logo drawn on, filled, then captioned. The outro variant fades out.
pub struct LogoScene {
    kind: SceneKind,
    beats: &'static [Beat],
    logo: LogoVisual,
    caption: Caption,
}

impl LogoScene {
    pub fn intro(logo: LogoVisual) -> Self {
        Self {
            kind: SceneKind::LogoIntro,
            beats: &INTRO_BEATS,
            logo,
            caption: Caption {
                text: "Imranslab",
                font_size: 48.0,
                color: Color::WHITE,
            },
        }
    }

    pub fn outro(logo: LogoVisual) -> Self {
        Self {
            kind: SceneKind::LogoOutro,
            beats: &OUTRO_BEATS,
            logo,
            caption: Caption {
                text: "Thank you for watching!",
                font_size: 40.0,
                color: Color::BLUE.mix(Color::PURPLE, 0.5),
            },
        }
    }

    fn logo_bottom(&self) -> f32 {
        match &self.logo {
            LogoVisual::Bitmap(_) => -LOGO_HEIGHT / 2.0,
            LogoVisual::Shape(shape) => shape.bounds().0.y,
        }
    }

    fn compose_shape(&self, list: &mut DisplayList, shape: &ShapeSpec, cue: Cue, fade: f32) {
        let stroke_color = shape.stroke.map(|s| s.color).unwrap_or(Color::WHITE);

        if !cue.reached(FILL) {
            let traced = partial_path(&shape.outline(), shape.is_closed(), self.eased(cue, TRACE));
            let width = TRACE_WIDTH * (1.0 + pulse(cue.of(OUTLINE)));
            list.put(
                ShapeSpec::polyline("logo_trace", traced).stroked(stroke_color, width, 1.0),
                fade,
            );
            return;
        }

        let mut logo = shape.clone();
        if let Some(fill) = logo.fill.as_mut() {
            fill.opacity *= self.eased(cue, FILL);
        }
        let remaining = 1.0 - self.eased(cue, UNSTROKE);
        logo.stroke = if remaining > 0.0 {
            Some(Stroke {
                color: stroke_color,
                width: TRACE_WIDTH * remaining,
                opacity: 1.0,
            })
        } else {
            None
        };
        list.put(logo, fade);
    }
}

impl FilmScene for LogoScene {
    fn kind(&self) -> SceneKind {
        self.kind
    }

    fn beats(&self) -> &[Beat] {
        self.beats
    }

    fn compose(&self, cue: Cue) -> DisplayList {
        let mut list = DisplayList::new(palette::BACKGROUND);
        let fade = self
            .beat_index("fade")
            .map(|i| 1.0 - self.eased(cue, i))
            .unwrap_or(1.0);

        match &self.logo {
            LogoVisual::Bitmap(bitmap) => {
                let image = ShapeSpec::new(
                    "logo",
                    ShapeKind::Image {
                        bitmap: bitmap.clone(),
                        height: LOGO_HEIGHT,
                    },
                );
                // Faint while being traced, solid once filled
                let traced = 0.3 * self.eased(cue, TRACE) + 0.2 * self.eased(cue, OUTLINE);
                let opacity = traced.max(self.eased(cue, FILL));
                list.put(image, opacity * fade);
            }
            LogoVisual::Shape(shape) => self.compose_shape(&mut list, shape, cue, fade),
        }

        if cue.reached(CAPTION) {
            let caption = ShapeSpec::text("caption", self.caption.text, self.caption.font_size)
                .at(Vec2::new(0.0, self.logo_bottom() - CAPTION_GAP))
                .filled(self.caption.color, 1.0);
            list.put(caption, self.eased(cue, CAPTION) * fade);
        }

        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Bitmap, ShapeKind};

    fn caption_of(list: &DisplayList) -> Option<String> {
        list.find("caption").and_then(|item| match &item.shape.kind {
            ShapeKind::Text { content, .. } => Some(content.clone()),
            _ => None,
        })
    }

    #[test]
    fn test_intro_timing() {
        let scene = LogoScene::intro(LogoVisual::fallback_diamond());
        assert_eq!(scene.beats().len(), 7);
        assert!((scene.duration() - 6.6).abs() < 1e-4);
    }

    #[test]
    fn test_fallback_logo_is_traced_then_filled() {
        let scene = LogoScene::intro(LogoVisual::fallback_diamond());

        let tracing = scene.compose(Cue::new(TRACE, 0.5));
        assert!(tracing.find("logo_trace").is_some());
        assert!(tracing.find("logo").is_none());

        let settled = scene.compose(Cue::new(4, 1.0));
        let logo = settled.find("logo").unwrap();
        assert_eq!(logo.shape.fill.unwrap().opacity, 1.0);
        assert!(logo.shape.stroke.is_none());
    }

    #[test]
    fn test_caption_appears_with_its_beat() {
        let scene = LogoScene::intro(LogoVisual::fallback_diamond());
        assert!(caption_of(&scene.compose(Cue::new(4, 1.0))).is_none());

        let list = scene.compose(Cue::new(6, 0.0));
        assert_eq!(caption_of(&list).as_deref(), Some("Imranslab"));
        let caption = list.find("caption").unwrap();
        assert!(caption.shape.offset.y < -1.875);
    }

    #[test]
    fn test_outro_fades_to_black() {
        let scene = LogoScene::outro(LogoVisual::fallback_diamond());
        let fade = scene.beat_index("fade").unwrap();

        let before = scene.compose(Cue::new(fade, 0.0));
        assert_eq!(
            caption_of(&before).as_deref(),
            Some("Thank you for watching!")
        );

        assert!(scene.compose(Cue::new(fade, 1.0)).is_empty());
        assert!(scene.compose(Cue::new(fade + 1, 0.5)).is_empty());
    }

    #[test]
    fn test_bitmap_logo_reveals() {
        let bitmap = Bitmap::new(1, 1, vec![255, 255, 255, 255]);
        let scene = LogoScene::intro(LogoVisual::Bitmap(bitmap));

        assert!(scene.compose(Cue::new(TRACE, 0.0)).find("logo").is_none());
        let filled = scene.compose(Cue::new(FILL, 1.0));
        assert_eq!(filled.find("logo").unwrap().opacity, 1.0);
    }
}
