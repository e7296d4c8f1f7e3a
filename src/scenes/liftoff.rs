use super::{Beat, FilmScene};
use crate::display::DisplayList;
use crate::geometry::{Color, ShapeSpec, Transform2, Vec2};
use crate::palette;
use crate::rate::RateFunction;
use crate::renderer::timeline::Cue;
use crate::rocket::{build_rocket, RocketAssembly, RocketParams};
use crate::storyboard::SceneKind;

/// Rocket anchor on the pad
pub const LAUNCH_Y: f32 = -0.3;
/// Distance climbed during the ascent beat
pub const RISE: f32 = 4.5;

const COUNTDOWN_POS: Vec2 = Vec2::new(0.0, 1.5);

const COUNTDOWN_IN: usize = 0;
const COUNT_2: usize = 2;
const COUNT_1: usize = 3;
const COUNT_0: usize = 4;
const COUNTDOWN_OUT: usize = 5;
const IGNITE: usize = 6;
const ASCENT: usize = 7;
const EXIT: usize = 8;

const BEATS: [Beat; 9] = [
    Beat::new("countdown_in", 0.2, RateFunction::Smooth),
    Beat::new("count_3", 0.2, RateFunction::Linear),
    Beat::new("count_2", 0.25, RateFunction::Linear),
    Beat::new("count_1", 0.25, RateFunction::Linear),
    Beat::new("count_0", 0.25, RateFunction::Linear),
    Beat::new("countdown_out", 0.2, RateFunction::Smooth),
    Beat::new("ignite", 0.25, RateFunction::Smooth),
    Beat::new("ascent", 1.8, RateFunction::EaseInSine),
    Beat::new("exit", 0.4, RateFunction::Smooth),
];

/// Countdown, ignition and climb out of frame
pub struct LiftoffScene {
    rocket: RocketAssembly,
    ground: ShapeSpec,
}

impl LiftoffScene {
    pub fn new() -> Self {
        Self {
            rocket: build_rocket(&RocketParams::liftoff()),
            ground: ShapeSpec::rectangle("ground", 16.0, 1.2)
                .at(Vec2::new(0.0, -3.4))
                .filled(palette::GROUND, 1.0),
        }
    }

    /// Digit on screen at `cue`, if the countdown is showing
    pub fn countdown_digit(cue: Cue) -> Option<&'static str> {
        match cue.segment {
            s if s < COUNT_2 => Some("3"),
            COUNT_2 => Some("2"),
            COUNT_1 => Some("1"),
            COUNT_0 | COUNTDOWN_OUT => Some("0"),
            _ => None,
        }
    }

    /// Rocket anchor height at `cue`
    pub fn rocket_y(&self, cue: Cue) -> f32 {
        LAUNCH_Y + RISE * self.eased(cue, ASCENT)
    }
}

impl Default for LiftoffScene {
    fn default() -> Self {
        Self::new()
    }
}

impl FilmScene for LiftoffScene {
    fn kind(&self) -> SceneKind {
        SceneKind::StarshipLiftoff
    }

    fn beats(&self) -> &[Beat] {
        &BEATS
    }

    fn compose(&self, cue: Cue) -> DisplayList {
        let mut list = DisplayList::new(palette::BACKGROUND);
        list.put(self.ground.clone(), 1.0);

        let exit = 1.0 - self.eased(cue, EXIT);
        let placement = Transform2::translate(Vec2::new(0.0, self.rocket_y(cue)));

        if cue.reached(IGNITE) {
            list.extend(self.rocket.flames(), placement, self.eased(cue, IGNITE) * exit);
        }
        list.extend(self.rocket.hull(), placement, exit);

        if let Some(digit) = Self::countdown_digit(cue) {
            let opacity = self.eased(cue, COUNTDOWN_IN) * (1.0 - self.eased(cue, COUNTDOWN_OUT));
            list.put(
                ShapeSpec::rectangle("countdown_box", 4.2, 2.2)
                    .at(COUNTDOWN_POS)
                    .filled(Color::BLACK, 0.5),
                opacity,
            );
            list.put(
                ShapeSpec::text("countdown", digit, 96.0)
                    .at(COUNTDOWN_POS)
                    .filled(Color::WHITE, 1.0),
                opacity,
            );
        }

        list
    }
}
