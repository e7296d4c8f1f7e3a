use super::{hud_line, Beat, FilmScene};
use crate::display::DisplayList;
use crate::geometry::{Color, ShapeSpec, Transform2, Vec2};
use crate::hud::{OrbitReadout, OrbitTelemetry};
use crate::palette;
use crate::rate::{lagged, RateFunction};
use crate::renderer::timeline::Cue;
use crate::rocket::{build_rocket, RocketAssembly, RocketParams};
use crate::storyboard::SceneKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

pub const CAMERA_SCALE: f32 = 1.15;
pub const EARTH_RADIUS: f32 = 1.4;
pub const EARTH_CENTRE: Vec2 = Vec2::new(-2.5, -1.8);
pub const ORBIT_RADIUS: f32 = EARTH_RADIUS + 1.0;
pub const START_ANGLE: f32 = -PI / 2.0 + 0.2;
/// Sweep of each orbital leg
pub const LEG_SWEEPS: [f32; 2] = [1.3 * PI, 1.8 * PI];

const STAR_SPREAD: Vec2 = Vec2::new(7.8, 4.4);
const HUD_CENTRE: Vec2 = Vec2::new(3.41, 2.5);
const HUD_SIZE: (f32, f32) = (5.8, 1.4);
const TRACE_STEP: f32 = 0.05;

const STARS: usize = 0;
const EARTH: usize = 1;
const HUD: usize = 2;
const PATH: usize = 3;
const LEG_1: usize = 4;
const LEG_2: usize = 5;
const GROW: usize = 6;
const FADE: usize = 8;

const BEATS: [Beat; 9] = [
    Beat::new("stars", 0.8, RateFunction::Smooth),
    Beat::new("earth", 0.6, RateFunction::Smooth),
    Beat::new("hud", 0.4, RateFunction::Smooth),
    Beat::new("path", 0.3, RateFunction::Smooth),
    Beat::new("leg_1", 4.0, RateFunction::Smooth),
    Beat::new("leg_2", 5.5, RateFunction::Smooth),
    Beat::new("grow", 0.4, RateFunction::Smooth),
    Beat::new("hold", 0.8, RateFunction::Linear),
    Beat::new("fade", 0.8, RateFunction::Linear),
];

/// Seeded field of dots that drifts as the rocket travels
#[derive(Debug, Clone)]
pub struct StarLayer {
    pub name: &'static str,
    pub stars: Vec<ShapeSpec>,
    /// Shift applied over each orbital leg
    pub drift: [Vec2; 2],
}

impl StarLayer {
    pub fn generate(
        name: &'static str,
        count: usize,
        color: Color,
        radius: (f32, f32),
        seed: u64,
        drift: [Vec2; 2],
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let stars = (0..count)
            .map(|i| {
                let x = rng.gen_range(-STAR_SPREAD.x..STAR_SPREAD.x);
                let y = rng.gen_range(-STAR_SPREAD.y..STAR_SPREAD.y);
                let r = rng.gen_range(radius.0..radius.1);
                ShapeSpec::circle(format!("{}_{}", name, i), r)
                    .at(Vec2::new(x, y))
                    .filled(color, 1.0)
            })
            .collect();

        Self { name, stars, drift }
    }

    /// Accumulated drift after the given leg progress values
    pub fn offset(&self, legs: [f32; 2]) -> Vec2 {
        self.drift[0] * legs[0] + self.drift[1] * legs[1]
    }
}

/// Orbital build-up: parallax stars, Earth, the rocket on two orbital legs
/// and a telemetry HUD.
pub struct OrbitScene {
    rocket: RocketAssembly,
    layers: [StarLayer; 3],
    telemetry: OrbitTelemetry,
}

impl OrbitScene {
    pub fn new() -> Self {
        Self {
            rocket: build_rocket(&RocketParams::orbit()),
            layers: [
                StarLayer::generate(
                    "star_far",
                    120,
                    palette::STAR_FAR,
                    (0.006, 0.014),
                    1,
                    [Vec2::new(-0.3, 0.0), Vec2::new(-0.8, -0.1)],
                ),
                StarLayer::generate(
                    "star_mid",
                    90,
                    palette::STAR_MID,
                    (0.008, 0.018),
                    2,
                    [Vec2::new(-0.6, 0.0), Vec2::new(-1.4, -0.2)],
                ),
                StarLayer::generate(
                    "star_near",
                    70,
                    palette::STAR_NEAR,
                    (0.010, 0.024),
                    3,
                    [Vec2::new(-1.0, 0.0), Vec2::new(-2.2, -0.4)],
                ),
            ],
            telemetry: OrbitTelemetry::default(),
        }
    }

    pub fn layers(&self) -> &[StarLayer] {
        &self.layers
    }

    fn leg_progress(&self, cue: Cue) -> [f32; 2] {
        [self.eased(cue, LEG_1), self.eased(cue, LEG_2)]
    }

    /// Angle of the rocket around the Earth centre
    pub fn orbit_angle(&self, cue: Cue) -> f32 {
        let legs = self.leg_progress(cue);
        START_ANGLE + LEG_SWEEPS[0] * legs[0] + LEG_SWEEPS[1] * legs[1]
    }

    /// Rocket centre and heading; the nose points along the direction of travel
    pub fn rocket_placement(&self, cue: Cue) -> Transform2 {
        let angle = self.orbit_angle(cue);
        Transform2::translate(EARTH_CENTRE.polar(ORBIT_RADIUS, angle)).with_rotation(angle)
    }

    pub fn readout(&self, cue: Cue) -> Option<OrbitReadout> {
        if cue.reached(LEG_2) {
            self.telemetry.at(1, self.eased(cue, LEG_2))
        } else if cue.reached(LEG_1) {
            self.telemetry.at(0, self.eased(cue, LEG_1))
        } else {
            self.telemetry.initial()
        }
    }

    fn compose_hud(&self, list: &mut DisplayList, cue: Cue, opacity: f32) {
        let Some(readout) = self.readout(cue) else {
            return;
        };

        list.put(
            ShapeSpec::rounded_rectangle("hud_panel", HUD_SIZE.0, HUD_SIZE.1, 0.12)
                .at(HUD_CENTRE)
                .filled(palette::BACKGROUND, 0.5)
                .stroked(palette::OUTLINE, 1.0, 1.0),
            opacity,
        );

        let left = HUD_CENTRE.x - HUD_SIZE.0 / 2.0 + 0.25;
        let columns = [
            ("alt", "ALT", readout.altitude_text()),
            ("vel", "VEL", readout.velocity_text()),
            ("time", "T+", readout.time_text()),
        ];
        for (i, (id, label, value)) in columns.into_iter().enumerate() {
            let x = left + i as f32 * 1.6;
            list.put(
                hud_line(&format!("hud_{}_label", id), label.to_string(), 24.0, Vec2::new(x, 2.75), Color::WHITE),
                opacity,
            );
            list.put(
                hud_line(&format!("hud_{}", id), value, 28.0, Vec2::new(x, 2.35), Color::WHITE),
                opacity,
            );
        }

        let status = ShapeSpec::text("hud_status", readout.phase.as_str(), 22.0)
            .filled(palette::ACCENT, 1.0);
        let half_width = status.box_size().map(|(w, _)| w / 2.0).unwrap_or(0.0);
        let right = HUD_CENTRE.x + HUD_SIZE.0 / 2.0 - 0.25;
        list.put(status.at(Vec2::new(right - half_width, 2.7)), opacity);
    }
}

impl Default for OrbitScene {
    fn default() -> Self {
        Self::new()
    }
}

impl FilmScene for OrbitScene {
    fn kind(&self) -> SceneKind {
        SceneKind::StarshipBuild
    }

    fn beats(&self) -> &[Beat] {
        &BEATS
    }

    fn compose(&self, cue: Cue) -> DisplayList {
        let mut list = DisplayList::new(palette::BACKGROUND).with_camera_scale(CAMERA_SCALE);
        let fade = cue.of(FADE);
        // Fade-out order: rocket, trace, path, hud, near, mid, far, earth
        let gone = |index: usize| 1.0 - lagged(fade, index, 8, 0.1);

        let legs = self.leg_progress(cue);
        for (i, layer) in self.layers.iter().enumerate() {
            let appear = RateFunction::Smooth.apply(lagged(cue.of(STARS), i, 3, 0.2));
            let settle = Vec2::DOWN * (0.1 + 0.05 * i as f32) * (1.0 - appear);
            let placement = Transform2::translate(layer.offset(legs) - settle);
            list.extend(&layer.stars, placement, appear * gone(6 - i));
        }

        let earth_in = self.eased(cue, EARTH);
        let earth_at = EARTH_CENTRE + Vec2::UP * 0.3 * (1.0 - earth_in);
        list.push(
            ShapeSpec::circle("earth", EARTH_RADIUS)
                .filled(palette::EARTH_OCEAN, 1.0)
                .stroked(palette::EARTH_OUTLINE, 2.0, 1.0),
            Transform2::translate(earth_at).with_scale(1.0 + 0.05 * self.eased(cue, GROW)),
            earth_in * gone(7),
        );

        if cue.reached(PATH) {
            let samples = 64;
            let arc: Vec<Vec2> = (0..=samples)
                .map(|i| {
                    let angle = START_ANGLE + LEG_SWEEPS[0] * i as f32 / samples as f32;
                    EARTH_CENTRE.polar(ORBIT_RADIUS, angle)
                })
                .collect();
            list.put(
                ShapeSpec::polyline("orbit_path", arc).stroked(palette::OUTLINE, 1.0, 0.35),
                self.eased(cue, PATH) * gone(2),
            );
        }

        if cue.reached(LEG_1) {
            let end = self.orbit_angle(cue);
            let steps = ((end - START_ANGLE) / TRACE_STEP).ceil().max(1.0) as usize;
            let trace: Vec<Vec2> = (0..=steps)
                .map(|i| {
                    let angle = START_ANGLE + (end - START_ANGLE) * i as f32 / steps as f32;
                    EARTH_CENTRE.polar(ORBIT_RADIUS, angle)
                })
                .collect();
            list.put(
                ShapeSpec::polyline("trace", trace).stroked(palette::ACCENT, 2.0, 1.0),
                gone(1),
            );
        }

        list.extend(self.rocket.hull(), self.rocket_placement(cue), gone(0));

        if cue.reached(HUD) {
            let hud_in = self.eased(cue, HUD);
            self.compose_hud(&mut list, cue, hud_in * gone(3));
        }

        list
    }
}
