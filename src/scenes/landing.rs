use super::{hud_line, Beat, FilmScene, FRAME_HEIGHT, FRAME_WIDTH};
use crate::display::DisplayList;
use crate::geometry::{Color, ShapeSpec, Transform2, Vec2};
use crate::hud::{LandingReadout, LandingStatus, LandingTelemetry};
use crate::palette;
use crate::rate::{lagged, RateFunction};
use crate::renderer::timeline::Cue;
use crate::rocket::{build_lander, LanderGear, RocketAssembly, RocketParams};
use crate::storyboard::SceneKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SURFACE_Y: f32 = -3.5;
pub const SURFACE_HEIGHT: f32 = 2.0;
pub const SURFACE_TOP: f32 = SURFACE_Y + SURFACE_HEIGHT / 2.0;
/// Centre of the lander when it arrives from space
pub const ARRIVAL: Vec2 = Vec2::new(2.0, 4.0);

const ROCK_COUNT: usize = 8;
const DUST_COUNT: usize = 50;
const IMPACT_COUNT: usize = 20;
const TERRAIN_SEED: u64 = 7;
const DUST_SEED: u64 = 11;
const IMPACT_SEED: u64 = 13;

const HUD_CENTRE: Vec2 = Vec2::new(4.81, 2.45);
const HUD_SIZE: (f32, f32) = (4.0, 2.5);

const ENVIRONMENT: usize = 0;
const ARRIVE: usize = 1;
const HUD: usize = 2;
const DESCENT: usize = 3;
const IMPACT: usize = 4;
const STATUS: usize = 5;
const FADE: usize = 7;

const BEATS: [Beat; 8] = [
    Beat::new("environment", 2.0, RateFunction::Smooth),
    Beat::new("arrive", 1.0, RateFunction::Smooth),
    Beat::new("hud", 0.8, RateFunction::Smooth),
    Beat::new("descent", 6.0, RateFunction::EaseInSine),
    Beat::new("impact", 1.5, RateFunction::Smooth),
    Beat::new("status", 0.5, RateFunction::Smooth),
    Beat::new("hold", 2.0, RateFunction::Linear),
    Beat::new("fade", 1.5, RateFunction::Linear),
];

/// Dust kicked up on touchdown
#[derive(Debug, Clone)]
struct ImpactParticle {
    dot: ShapeSpec,
    travel: Vec2,
}

/// Mars surface, lander descent with live telemetry, touchdown dust
pub struct MarsLandingScene {
    lander: Vec<ShapeSpec>,
    gear: LanderGear,
    /// Lander centre relative to its body anchor
    centre_offset: f32,
    /// Height of the body anchor above the pads
    stance: f32,
    surface: ShapeSpec,
    sky: ShapeSpec,
    terrain: Vec<ShapeSpec>,
    dust: Vec<ShapeSpec>,
    impact: Vec<ImpactParticle>,
    telemetry: LandingTelemetry,
}

impl MarsLandingScene {
    pub fn new() -> Self {
        let (assembly, gear) = build_lander(&RocketParams::lander());
        let foot = gear.foot(&assembly);
        let apex = assembly.nose_apex().map(|p| p.y).unwrap_or(assembly.height() / 2.0);

        Self {
            lander: silver_hull(&assembly),
            centre_offset: (apex + foot) / 2.0,
            stance: -foot,
            gear,
            surface: ShapeSpec::rectangle("surface", FRAME_WIDTH * 2.0, SURFACE_HEIGHT)
                .at(Vec2::new(0.0, SURFACE_Y))
                .filled(palette::MARS_SURFACE, 1.0),
            sky: ShapeSpec::rectangle("sky", FRAME_WIDTH * 2.0, FRAME_HEIGHT)
                .at(Vec2::new(0.0, 2.0))
                .filled(palette::MARS_SKY, 0.3),
            terrain: scatter_rocks(),
            dust: scatter_dust(),
            impact: scatter_impact(),
            telemetry: LandingTelemetry::default(),
        }
    }

    /// Body anchor where the pads rest on the surface
    pub fn touchdown(&self) -> Vec2 {
        Vec2::new(ARRIVAL.x, SURFACE_TOP + self.stance)
    }

    /// Body anchor at `cue`
    pub fn lander_anchor(&self, cue: Cue) -> Vec2 {
        let drop_in = Vec2::UP * (1.0 - self.eased(cue, ARRIVE));
        let start = ARRIVAL - Vec2::UP * self.centre_offset + drop_in;
        start.lerp(self.touchdown(), self.eased(cue, DESCENT))
    }

    pub fn readout(&self, cue: Cue) -> LandingReadout {
        self.telemetry.at(self.eased(cue, DESCENT))
    }

    /// Retro jets burn during the descent once the telemetry says so
    pub fn retro_firing(&self, cue: Cue) -> bool {
        cue.segment == DESCENT && self.readout(cue).retro_active
    }

    fn compose_hud(&self, list: &mut DisplayList, cue: Cue, opacity: f32) {
        let readout = self.readout(cue);
        let slide = Vec2::RIGHT * (1.0 - self.eased(cue, HUD));
        let centre = HUD_CENTRE + slide;

        list.put(
            ShapeSpec::rounded_rectangle("hud_panel", HUD_SIZE.0, HUD_SIZE.1, 0.1)
                .at(centre)
                .filled(Color::BLACK, 0.8)
                .stroked(palette::HUD, 2.0, 1.0),
            opacity,
        );

        let status_color = if readout.status == LandingStatus::Landed {
            palette::HUD.mix(readout.status.color(), self.eased(cue, STATUS))
        } else {
            readout.status.color()
        };

        let rows = [
            ("alt", "ALT", readout.altitude_text(), Color::WHITE),
            ("vel", "VEL", readout.velocity_text(), Color::WHITE),
            ("fuel", "FUEL", readout.fuel_text(), readout.fuel_level.color()),
            ("status", "STATUS", readout.status.to_string(), status_color),
        ];

        let left = centre.x - HUD_SIZE.0 / 2.0 + 0.25;
        let top = centre.y + HUD_SIZE.1 / 2.0 - 0.4;
        for (i, (id, label, value, color)) in rows.into_iter().enumerate() {
            let y = top - i as f32 * 0.45;
            list.put(
                hud_line(&format!("hud_{}_label", id), label.to_string(), 24.0, Vec2::new(left, y), palette::HUD),
                opacity,
            );
            list.put(
                hud_line(&format!("hud_{}", id), value, 20.0, Vec2::new(left + 1.35, y), color),
                opacity,
            );
        }
    }
}

impl Default for MarsLandingScene {
    fn default() -> Self {
        Self::new()
    }
}

impl FilmScene for MarsLandingScene {
    fn kind(&self) -> SceneKind {
        SceneKind::StarshipMarsLanding
    }

    fn beats(&self) -> &[Beat] {
        &BEATS
    }

    fn compose(&self, cue: Cue) -> DisplayList {
        let mut list = DisplayList::new(palette::BACKGROUND);
        let fade = cue.of(FADE);
        // Fade-out order: lander, hud, impact, dust, terrain, surface, sky
        let gone = |index: usize| 1.0 - lagged(fade, index, 7, 0.2);

        let env = cue.of(ENVIRONMENT);
        let appear = |index: usize| RateFunction::Smooth.apply(lagged(env, index, 4, 0.3));

        let sky_in = appear(2);
        list.push(
            self.sky.clone(),
            Transform2::translate(Vec2::UP * (1.0 - sky_in)),
            sky_in * gone(6),
        );

        let dust_in = appear(3);
        let dust_lift = Vec2::UP * (0.5 * self.eased(cue, DESCENT) + (1.0 - dust_in));
        list.extend(&self.dust, Transform2::translate(dust_lift), dust_in * gone(3));

        let surface_in = appear(0);
        list.push(
            self.surface.clone(),
            Transform2::translate(Vec2::DOWN * (1.0 - surface_in)),
            surface_in * gone(5),
        );

        let terrain_in = appear(1);
        list.extend(
            &self.terrain,
            Transform2::translate(Vec2::DOWN * (1.0 - terrain_in)),
            terrain_in * gone(4),
        );

        if cue.reached(ARRIVE) {
            let placement = Transform2::translate(self.lander_anchor(cue));
            let opacity = self.eased(cue, ARRIVE) * gone(0);
            if self.retro_firing(cue) {
                list.extend(&self.gear.retro_flames, placement, opacity);
            }
            list.extend(self.gear.shapes(), placement, opacity);
            list.extend(&self.lander, placement, opacity);
        }

        if cue.segment == IMPACT {
            let burst = self.eased(cue, IMPACT);
            let origin = Vec2::new(ARRIVAL.x, SURFACE_TOP - 0.2);
            for particle in &self.impact {
                list.push(
                    particle.dot.clone(),
                    Transform2::translate(origin + particle.travel * burst),
                    (1.0 - burst) * gone(2),
                );
            }
        }

        if cue.reached(HUD) {
            self.compose_hud(&mut list, cue, self.eased(cue, HUD) * gone(1));
        }

        list
    }
}

/// Hull in the lander's silver livery; windows keep their accent
fn silver_hull(assembly: &RocketAssembly) -> Vec<ShapeSpec> {
    assembly
        .hull()
        .iter()
        .map(|shape| {
            let mut shape = shape.clone();
            if !shape.name.starts_with("window") {
                if let Some(fill) = shape.fill.as_mut() {
                    fill.color = palette::STARSHIP;
                }
            }
            shape
        })
        .collect()
}

fn scatter_rocks() -> Vec<ShapeSpec> {
    let mut rng = StdRng::seed_from_u64(TERRAIN_SEED);
    (0..ROCK_COUNT)
        .map(|i| {
            let radius = rng.gen_range(0.1_f32..0.3);
            let x = rng.gen_range(-6.0_f32..6.0);
            let y = SURFACE_TOP + rng.gen_range(0.0_f32..0.5);
            ShapeSpec::circle(format!("rock_{}", i), radius)
                .at(Vec2::new(x, y))
                .filled(palette::MARS_DUST, 0.8)
        })
        .collect()
}

fn scatter_dust() -> Vec<ShapeSpec> {
    let mut rng = StdRng::seed_from_u64(DUST_SEED);
    (0..DUST_COUNT)
        .map(|i| {
            let radius = rng.gen_range(0.01_f32..0.03);
            let opacity = rng.gen_range(0.2_f32..0.6);
            let x = rng.gen_range(-8.0_f32..8.0);
            let y = rng.gen_range(-2.0_f32..4.0);
            ShapeSpec::circle(format!("dust_{}", i), radius)
                .at(Vec2::new(x, y))
                .filled(palette::MARS_DUST, opacity)
        })
        .collect()
}

fn scatter_impact() -> Vec<ImpactParticle> {
    let mut rng = StdRng::seed_from_u64(IMPACT_SEED);
    (0..IMPACT_COUNT)
        .map(|i| {
            let radius = rng.gen_range(0.02_f32..0.05);
            let opacity = rng.gen_range(0.4_f32..0.8);
            let travel = Vec2::new(rng.gen_range(-1.0_f32..1.0), rng.gen_range(0.5_f32..1.5));
            ImpactParticle {
                dot: ShapeSpec::circle(format!("impact_{}", i), radius)
                    .filled(palette::MARS_DUST, opacity),
                travel,
            }
        })
        .collect()
}
