//! Procedural rocket geometry.
//!
//! Every part is positioned relative to the body anchor at the origin by
//! fixed offset rules: the nose cone sits on the body's top corners, fins
//! hang off the body edges, engine bells line up below the body and each
//! flame grows downwards from its bell.

use crate::geometry::{Color, Fill, ShapeKind, ShapeSpec, Vec2};
use crate::palette;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_4;

/// Horizontal reach of a fin as a fraction of `fin_span`
pub const FIN_REACH: f32 = 0.35;
/// Height of the fin tip below the fin root, as a fraction of `fin_height`
pub const FIN_TIP_DROP: f32 = 0.55;
/// Gap between a bell centre and the base of its flame
pub const FLAME_GAP: f32 = 0.05;
/// Scale of the inner flame core relative to the outer flame
pub const FLAME_CORE_SCALE: f32 = 0.6;

/// A porthole on the body centreline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub y: f32,
    pub radius: f32,
}

/// Rocket proportions in scene units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocketParams {
    pub body_height: f32,
    pub body_width: f32,
    pub nose_height: f32,
    pub fin_span: f32,
    pub fin_height: f32,
    pub engine_count: usize,
    pub engine_spacing: f32,
    pub flame_peak: f32,
    pub flame_base: f32,
    #[serde(default = "default_corner_radius")]
    pub corner_radius: f32,
    #[serde(default = "default_bell_radius")]
    pub bell_radius: f32,
    #[serde(default = "default_bell_margin")]
    pub bell_margin: f32,
    #[serde(default)]
    pub windows: Vec<Window>,
}

fn default_corner_radius() -> f32 {
    0.18
}

fn default_bell_radius() -> f32 {
    0.12
}

fn default_bell_margin() -> f32 {
    0.15
}

impl Default for RocketParams {
    fn default() -> Self {
        Self::orbit()
    }
}

impl RocketParams {
    /// Full-size vehicle standing on the launch pad
    pub fn liftoff() -> Self {
        Self {
            body_height: 5.0,
            body_width: 1.2,
            nose_height: 1.2,
            fin_span: 2.6,
            fin_height: 1.0,
            engine_count: 3,
            engine_spacing: 0.35,
            flame_peak: 1.3,
            flame_base: 0.35,
            corner_radius: 0.18,
            bell_radius: 0.18,
            bell_margin: 0.15,
            windows: vec![
                Window { y: 1.1, radius: 0.12 },
                Window { y: 0.4, radius: 0.10 },
                Window { y: -0.3, radius: 0.10 },
            ],
        }
    }

    /// Smaller vehicle flown around the Earth
    pub fn orbit() -> Self {
        Self {
            body_height: 3.2,
            body_width: 0.8,
            nose_height: 0.8,
            fin_span: 1.8,
            fin_height: 0.7,
            engine_count: 3,
            engine_spacing: 0.25,
            flame_peak: 1.3,
            flame_base: 0.35,
            corner_radius: 0.18,
            bell_radius: 0.12,
            bell_margin: 0.15,
            windows: vec![
                Window { y: 0.7, radius: 0.08 },
                Window { y: 0.25, radius: 0.07 },
                Window { y: -0.2, radius: 0.07 },
            ],
        }
    }

    /// Mars lander: same hull as the orbiter, no fins, no main flames
    pub fn lander() -> Self {
        Self {
            fin_span: 0.0,
            fin_height: 0.0,
            corner_radius: 0.0,
            flame_peak: 0.0,
            ..Self::orbit()
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "liftoff" => Some(Self::liftoff()),
            "orbit" => Some(Self::orbit()),
            "lander" => Some(Self::lander()),
            _ => None,
        }
    }

    /// Symmetric horizontal engine offsets, e.g. `[-0.25, 0, 0.25]`
    pub fn engine_offsets(&self) -> Vec<f32> {
        let centre = (self.engine_count as f32 - 1.0) / 2.0;
        (0..self.engine_count)
            .map(|i| (i as f32 - centre) * self.engine_spacing)
            .collect()
    }

    /// Vertical position of the bell centres
    pub fn engine_y(&self) -> f32 {
        -(self.body_height / 2.0 + self.bell_margin)
    }
}

/// Ordered parts of a rocket, anchored on the body centre
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocketAssembly {
    pub params: RocketParams,
    hull: Vec<ShapeSpec>,
    flames: Vec<ShapeSpec>,
}

impl RocketAssembly {
    /// Total height from body bottom to nose apex
    pub fn height(&self) -> f32 {
        self.params.body_height + self.params.nose_height
    }

    pub fn part(&self, name: &str) -> Option<&ShapeSpec> {
        self.shapes().find(|s| s.name == name)
    }

    /// Body, nose, fins, windows and bells in drawing order
    pub fn hull(&self) -> &[ShapeSpec] {
        &self.hull
    }

    /// Outer flame and core for every engine, in engine order
    pub fn flames(&self) -> &[ShapeSpec] {
        &self.flames
    }

    pub fn shapes(&self) -> impl Iterator<Item = &ShapeSpec> {
        self.hull.iter().chain(self.flames.iter())
    }

    /// Apex of the nose cone
    pub fn nose_apex(&self) -> Option<Vec2> {
        match &self.part("nose")?.kind {
            ShapeKind::ArcPolygon { vertices, .. } | ShapeKind::Polygon { vertices } => {
                vertices.get(1).copied()
            }
            _ => None,
        }
    }

    /// Bottom of the body, where a landing leg or the pad meets the hull
    pub fn body_bottom(&self) -> f32 {
        -self.params.body_height / 2.0
    }
}

/// Build a rocket from its proportions. Inputs are trusted: negative sizes
/// produce inverted geometry rather than an error.
pub fn build_rocket(params: &RocketParams) -> RocketAssembly {
    let p = params;
    let half_w = p.body_width / 2.0;
    let top = p.body_height / 2.0;

    let mut hull = Vec::new();

    hull.push(
        ShapeSpec::rounded_rectangle("body", p.body_width, p.body_height, p.corner_radius)
            .filled(palette::METAL, 1.0)
            .stroked(palette::OUTLINE, 2.0, 1.0),
    );

    hull.push(
        ShapeSpec::new(
            "nose",
            ShapeKind::ArcPolygon {
                vertices: vec![
                    Vec2::new(-half_w, top),
                    Vec2::new(0.0, top + p.nose_height),
                    Vec2::new(half_w, top),
                ],
                arc_angle: FRAC_PI_4,
            },
        )
        .filled(palette::METAL, 1.0)
        .stroked(palette::OUTLINE, 2.0, 1.0),
    );

    if p.fin_span > 0.0 && p.fin_height > 0.0 {
        let left: Vec<Vec2> = vec![
            Vec2::new(-half_w, 0.0),
            Vec2::new(-(half_w + p.fin_span * FIN_REACH), -p.fin_height * FIN_TIP_DROP),
            Vec2::new(-half_w, -p.fin_height),
        ];
        let right = left.iter().map(|v| v.mirror_x()).collect();

        for (name, vertices) in [("left_fin", left), ("right_fin", right)] {
            hull.push(
                ShapeSpec::polygon(name, vertices)
                    .filled(palette::METAL, 1.0)
                    .stroked(palette::OUTLINE, 2.0, 1.0),
            );
        }
    }

    for (i, window) in p.windows.iter().enumerate() {
        hull.push(
            ShapeSpec::circle(format!("window_{}", i + 1), window.radius)
                .at(Vec2::new(0.0, window.y))
                .filled(palette::ACCENT, 1.0)
                .stroked(palette::OUTLINE, 1.0, 1.0),
        );
    }

    let engine_y = p.engine_y();
    for (i, x) in p.engine_offsets().into_iter().enumerate() {
        hull.push(
            ShapeSpec::circle(format!("bell_{}", i + 1), p.bell_radius)
                .at(Vec2::new(x, engine_y))
                .filled(palette::METAL_DARK, 1.0)
                .stroked(palette::OUTLINE, 2.0, 1.0),
        );
    }

    let mut flames = Vec::new();
    if p.flame_peak > 0.0 {
        for (i, x) in p.engine_offsets().into_iter().enumerate() {
            let (outer, core) = build_flame(Vec2::new(x, engine_y), p.flame_peak, p.flame_base);
            flames.push(renamed(outer, format!("flame_{}", i + 1)));
            flames.push(renamed(core, format!("flame_core_{}", i + 1)));
        }
    }

    RocketAssembly {
        params: params.clone(),
        hull,
        flames,
    }
}

/// Tapered teardrop flame below an engine centre, plus its inner core
pub fn build_flame(engine: Vec2, peak: f32, base: f32) -> (ShapeSpec, ShapeSpec) {
    let nozzle = engine + Vec2::DOWN * FLAME_GAP;
    let p0 = nozzle + Vec2::LEFT * base;
    let p1 = p0 + Vec2::DOWN * peak + Vec2::RIGHT * base;
    let p2 = nozzle + Vec2::RIGHT * base;
    let p3 = p2 + Vec2::DOWN * peak + Vec2::LEFT * base;

    let outer = ShapeSpec::new(
        "flame",
        ShapeKind::Curve {
            control_points: vec![p0, p1, p2, p3],
        },
    )
    .filled(palette::THRUST, 0.85);

    let mut core = outer.scaled_about(FLAME_CORE_SCALE, p0);
    core.fill = Some(Fill {
        color: palette::THRUST_CORE,
        opacity: 0.75,
    });

    (outer, core)
}

/// Landing legs, pads and retro-rocket jets for the Mars lander
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanderGear {
    pub legs: Vec<ShapeSpec>,
    pub pads: Vec<ShapeSpec>,
    pub retro_flames: Vec<ShapeSpec>,
}

impl LanderGear {
    pub const LEG_WIDTH: f32 = 0.1;
    pub const LEG_HEIGHT: f32 = 0.8;
    pub const PAD_RADIUS: f32 = 0.15;
    pub const LEG_SPREAD: f32 = 0.3;
    pub const JET_LENGTH: f32 = 0.3;
    pub const JET_HALF_WIDTH: f32 = 0.1;

    /// Lowest point of the gear relative to the body anchor
    pub fn foot(&self, assembly: &RocketAssembly) -> f32 {
        assembly.body_bottom() - Self::LEG_HEIGHT - 2.0 * Self::PAD_RADIUS
    }

    pub fn shapes(&self) -> impl Iterator<Item = &ShapeSpec> {
        self.legs.iter().chain(self.pads.iter())
    }
}

/// Gear hanging from the body bottom: legs at the centre and at
/// `±LEG_SPREAD`, a pad under each leg and a jet next to each leg.
pub fn build_lander(params: &RocketParams) -> (RocketAssembly, LanderGear) {
    let assembly = build_rocket(params);
    let bottom = assembly.body_bottom();
    let leg_y = bottom - LanderGear::LEG_HEIGHT / 2.0;
    let pad_y = bottom - LanderGear::LEG_HEIGHT - LanderGear::PAD_RADIUS;

    let mut gear = LanderGear {
        legs: Vec::new(),
        pads: Vec::new(),
        retro_flames: Vec::new(),
    };

    for (i, x) in [-LanderGear::LEG_SPREAD, 0.0, LanderGear::LEG_SPREAD]
        .into_iter()
        .enumerate()
    {
        gear.legs.push(
            ShapeSpec::rectangle(
                format!("leg_{}", i + 1),
                LanderGear::LEG_WIDTH,
                LanderGear::LEG_HEIGHT,
            )
            .at(Vec2::new(x, leg_y))
            .filled(palette::STARSHIP, 1.0)
            .stroked(Color::WHITE, 1.0, 1.0),
        );
        gear.pads.push(
            ShapeSpec::circle(format!("pad_{}", i + 1), LanderGear::PAD_RADIUS)
                .at(Vec2::new(x, pad_y))
                .filled(palette::STARSHIP, 1.0),
        );

        // Jets fire from the body bottom beside each leg
        let jet_x = x + LanderGear::LEG_WIDTH;
        gear.retro_flames.push(
            ShapeSpec::polygon(
                format!("retro_flame_{}", i + 1),
                vec![
                    Vec2::new(jet_x, bottom - LanderGear::JET_LENGTH),
                    Vec2::new(jet_x - LanderGear::JET_HALF_WIDTH, bottom),
                    Vec2::new(jet_x + LanderGear::JET_HALF_WIDTH, bottom),
                ],
            )
            .filled(palette::MARS_FLAME, 0.8),
        );
    }

    (assembly, gear)
}

fn renamed(mut shape: ShapeSpec, name: String) -> ShapeSpec {
    shape.name = name;
    shape
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertices(shape: &ShapeSpec) -> Vec<Vec2> {
        match &shape.kind {
            ShapeKind::Polygon { vertices } | ShapeKind::ArcPolygon { vertices, .. } => {
                vertices.clone()
            }
            ShapeKind::Curve { control_points } => control_points.clone(),
            other => panic!("Expected a vertex shape, got {:?}", other),
        }
    }

    #[test]
    fn test_nose_apex_height() {
        for (body_height, nose_height) in [(3.2, 0.8), (5.0, 1.2), (1.0, 0.1), (7.5, 2.25)] {
            let params = RocketParams {
                body_height,
                nose_height,
                ..RocketParams::orbit()
            };
            let rocket = build_rocket(&params);
            let apex = rocket.nose_apex().unwrap();
            assert_eq!(apex.y, body_height / 2.0 + nose_height);
            assert_eq!(apex.x, 0.0);
        }
    }

    #[test]
    fn test_nose_base_meets_body_top_corners() {
        let params = RocketParams::liftoff();
        let rocket = build_rocket(&params);
        let nose = vertices(rocket.part("nose").unwrap());
        assert_eq!(nose[0], Vec2::new(-0.6, 2.5));
        assert_eq!(nose[2], Vec2::new(0.6, 2.5));
    }

    #[test]
    fn test_assembly_height() {
        let rocket = build_rocket(&RocketParams::liftoff());
        assert!((rocket.height() - 6.2).abs() < 1e-5);
    }

    #[test]
    fn test_fins_mirror_exactly() {
        let rocket = build_rocket(&RocketParams::orbit());
        let left = vertices(rocket.part("left_fin").unwrap());
        let right = vertices(rocket.part("right_fin").unwrap());
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(right.iter()) {
            assert_eq!(r.x, -l.x);
            assert_eq!(r.y, l.y);
        }
    }

    #[test]
    fn test_fin_shape() {
        let params = RocketParams::orbit();
        let rocket = build_rocket(&params);
        let left = vertices(rocket.part("left_fin").unwrap());
        // Root on the body edge, tip 0.35 * span outwards
        assert_eq!(left[0].x, -0.4);
        assert_eq!(left[2].x, -0.4);
        assert!((left[1].x - -(0.4 + 1.8 * 0.35)).abs() < 1e-6);
        assert_eq!(left[2].y, -0.7);
    }

    #[test]
    fn test_engine_offsets_are_symmetric() {
        let params = RocketParams::orbit();
        assert_eq!(params.engine_offsets(), vec![-0.25, 0.0, 0.25]);

        let params = RocketParams {
            engine_count: 4,
            engine_spacing: 0.2,
            ..RocketParams::orbit()
        };
        let offsets = params.engine_offsets();
        assert_eq!(offsets.len(), 4);
        assert!((offsets[0] + offsets[3]).abs() < 1e-6);
        assert!((offsets[1] + offsets[2]).abs() < 1e-6);
    }

    #[test]
    fn test_bells_below_body() {
        let params = RocketParams::liftoff();
        let rocket = build_rocket(&params);
        for i in 1..=3 {
            let bell = rocket.part(&format!("bell_{}", i)).unwrap();
            assert!((bell.offset.y - -(2.5 + 0.15)).abs() < 1e-6);
        }
        assert_eq!(rocket.part("bell_1").unwrap().offset.x, -0.35);
    }

    #[test]
    fn test_flame_teardrop() {
        let (outer, core) = build_flame(Vec2::new(0.0, -1.75), 1.3, 0.35);
        let points = vertices(&outer);
        assert_eq!(points.len(), 4);
        // Tip sits `peak` below the nozzle, centred on the engine
        assert!((points[1].y - (-1.8 - 1.3)).abs() < 1e-5);
        assert!(points[1].x.abs() < 1e-6);
        assert_eq!(points[1], points[3]);

        // Core is a 0.6 copy anchored at p0
        let core_points = vertices(&core);
        assert_eq!(core_points[0], points[0]);
        let expected = points[0] + (points[2] - points[0]) * FLAME_CORE_SCALE;
        assert!((core_points[2] - expected).length() < 1e-5);
    }

    #[test]
    fn test_flames_per_engine() {
        let rocket = build_rocket(&RocketParams::liftoff());
        assert_eq!(rocket.flames().len(), 6);
        assert!(rocket.part("flame_core_3").is_some());
    }

    #[test]
    fn test_part_order() {
        let rocket = build_rocket(&RocketParams::orbit());
        let names: Vec<&str> = rocket.hull().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "body", "nose", "left_fin", "right_fin", "window_1", "window_2", "window_3",
                "bell_1", "bell_2", "bell_3"
            ]
        );
    }

    #[test]
    fn test_lander_gear() {
        let (rocket, gear) = build_lander(&RocketParams::lander());
        assert!(rocket.part("left_fin").is_none());
        assert!(rocket.flames().is_empty());
        assert_eq!(gear.legs.len(), 3);
        assert_eq!(gear.pads.len(), 3);
        assert_eq!(gear.retro_flames.len(), 3);
        assert!((gear.foot(&rocket) - (-1.6 - 0.8 - 0.3)).abs() < 1e-5);
    }

    #[test]
    fn test_presets_by_name() {
        assert_eq!(RocketParams::preset("liftoff"), Some(RocketParams::liftoff()));
        assert!(RocketParams::preset("saturn").is_none());
    }
}
