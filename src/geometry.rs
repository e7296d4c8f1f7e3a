use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

/// Segments used when tessellating a full circle
const CIRCLE_SEGMENTS: usize = 48;
/// Segments per rounded corner
const CORNER_SEGMENTS: usize = 6;
/// Samples per arc edge of an arc polygon
const ARC_SAMPLES: usize = 12;
/// Samples per span of a smooth closed curve
const CURVE_SAMPLES: usize = 16;

/// Point or offset in scene units (origin at frame centre, y up)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const UP: Vec2 = Vec2 { x: 0.0, y: 1.0 };
    pub const DOWN: Vec2 = Vec2 { x: 0.0, y: -1.0 };
    pub const LEFT: Vec2 = Vec2 { x: -1.0, y: 0.0 };
    pub const RIGHT: Vec2 = Vec2 { x: 1.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Reflection across the vertical axis: x is negated, y unchanged
    pub fn mirror_x(self) -> Self {
        Self::new(-self.x, self.y)
    }

    /// Counter-clockwise rotation about the origin
    pub fn rotate(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn lerp(self, other: Vec2, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Point on a circle of `radius` around `self` at `angle`
    pub fn polar(self, radius: f32, angle: f32) -> Self {
        self + Vec2::new(angle.cos(), angle.sin()) * radius
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "default_alpha")]
    pub a: u8,
}

fn default_alpha() -> u8 {
    255
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(0xfc, 0x62, 0x55);
    pub const YELLOW: Color = Color::rgb(0xff, 0xff, 0x00);
    pub const GREEN: Color = Color::rgb(0x83, 0xc1, 0x67);
    pub const BLUE: Color = Color::rgb(0x58, 0xc4, 0xdd);
    pub const PURPLE: Color = Color::rgb(0x9a, 0x72, 0xac);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            anyhow::bail!("Invalid hex color: {}", hex);
        }

        let channel = |i: usize| -> Result<u8> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| anyhow::anyhow!("Invalid hex color: {}", hex))
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if digits.len() == 8 { channel(6)? } else { 255 },
        })
    }

    /// Linear blend between two colors
    pub fn mix(self, other: Color, t: f32) -> Self {
        let c = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: c(self.r, other.r),
            g: c(self.g, other.g),
            b: c(self.b, other.b),
            a: c(self.a, other.a),
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fill {
    pub color: Color,
    pub opacity: f32,
}

/// Outline; `width` follows the stroke-width convention of 1/100 scene unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub opacity: f32,
}

/// Decoded straight-alpha RGBA pixels
#[derive(Clone, PartialEq, Serialize)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pub pixels: Arc<Vec<u8>>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels: Arc::new(pixels),
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            let idx = (y as usize * self.width as usize + x as usize) * 4;
            let mut px = [0u8; 4];
            px.copy_from_slice(&self.pixels[idx..idx + 4]);
            Some(px)
        } else {
            None
        }
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitmap({}x{})", self.width, self.height)
    }
}

/// Primitive geometry of a shape, in the shape's local frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle {
        width: f32,
        height: f32,
        corner_radius: f32,
    },
    Circle {
        radius: f32,
    },
    Polygon {
        vertices: Vec<Vec2>,
    },
    /// Polygon whose edges are circular arcs of `arc_angle` radians
    ArcPolygon {
        vertices: Vec<Vec2>,
        arc_angle: f32,
    },
    /// Smooth closed curve through the control points
    Curve {
        control_points: Vec<Vec2>,
    },
    /// Open path; stroked only
    Polyline {
        points: Vec<Vec2>,
    },
    Text {
        content: String,
        font_size: f32,
    },
    Image {
        bitmap: Bitmap,
        height: f32,
    },
}

/// A named 2D primitive with position and paint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: ShapeKind,
    pub offset: Vec2,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

impl ShapeSpec {
    pub fn new(name: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            offset: Vec2::ZERO,
            fill: None,
            stroke: None,
        }
    }

    pub fn rectangle(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self::new(
            name,
            ShapeKind::Rectangle {
                width,
                height,
                corner_radius: 0.0,
            },
        )
    }

    pub fn rounded_rectangle(
        name: impl Into<String>,
        width: f32,
        height: f32,
        corner_radius: f32,
    ) -> Self {
        Self::new(
            name,
            ShapeKind::Rectangle {
                width,
                height,
                corner_radius,
            },
        )
    }

    pub fn circle(name: impl Into<String>, radius: f32) -> Self {
        Self::new(name, ShapeKind::Circle { radius })
    }

    pub fn polygon(name: impl Into<String>, vertices: Vec<Vec2>) -> Self {
        Self::new(name, ShapeKind::Polygon { vertices })
    }

    pub fn polyline(name: impl Into<String>, points: Vec<Vec2>) -> Self {
        Self::new(name, ShapeKind::Polyline { points })
    }

    pub fn text(name: impl Into<String>, content: impl Into<String>, font_size: f32) -> Self {
        Self::new(
            name,
            ShapeKind::Text {
                content: content.into(),
                font_size,
            },
        )
    }

    pub fn at(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn filled(mut self, color: Color, opacity: f32) -> Self {
        self.fill = Some(Fill { color, opacity });
        self
    }

    pub fn stroked(mut self, color: Color, width: f32, opacity: f32) -> Self {
        self.stroke = Some(Stroke {
            color,
            width,
            opacity,
        });
        self
    }

    pub fn unfilled(mut self) -> Self {
        self.fill = None;
        self
    }

    pub fn unstroked(mut self) -> Self {
        self.stroke = None;
        self
    }

    /// Copy with every point scaled by `factor` about `origin`
    pub fn scaled_about(&self, factor: f32, origin: Vec2) -> Self {
        let scale = |p: Vec2| origin + (p - origin) * factor;
        let mut copy = self.clone();
        match &mut copy.kind {
            ShapeKind::Polygon { vertices } | ShapeKind::ArcPolygon { vertices, .. } => {
                for v in vertices.iter_mut() {
                    *v = scale(*v + self.offset) - self.offset;
                }
            }
            ShapeKind::Curve {
                control_points: points,
            }
            | ShapeKind::Polyline { points } => {
                for p in points.iter_mut() {
                    *p = scale(*p + self.offset) - self.offset;
                }
            }
            ShapeKind::Rectangle {
                width,
                height,
                corner_radius,
            } => {
                *width *= factor;
                *height *= factor;
                *corner_radius *= factor;
                copy.offset = scale(self.offset);
            }
            ShapeKind::Circle { radius } => {
                *radius *= factor;
                copy.offset = scale(self.offset);
            }
            ShapeKind::Text { font_size, .. } => {
                *font_size *= factor;
                copy.offset = scale(self.offset);
            }
            ShapeKind::Image { height, .. } => {
                *height *= factor;
                copy.offset = scale(self.offset);
            }
        }
        copy
    }

    /// Width and height of the placeholder box for text and images
    pub fn box_size(&self) -> Option<(f32, f32)> {
        match &self.kind {
            ShapeKind::Text { content, font_size } => {
                let height = font_size / 96.0;
                Some((content.chars().count() as f32 * height * 0.55, height))
            }
            ShapeKind::Image { bitmap, height } => Some((height * bitmap.aspect(), *height)),
            _ => None,
        }
    }

    /// Whether the outline is a closed, fillable region
    pub fn is_closed(&self) -> bool {
        !matches!(self.kind, ShapeKind::Polyline { .. })
    }

    /// Outline in scene coordinates (offset applied); closed unless the
    /// shape is a polyline
    pub fn outline(&self) -> Vec<Vec2> {
        let local = match &self.kind {
            ShapeKind::Rectangle {
                width,
                height,
                corner_radius,
            } => rounded_rect_outline(*width, *height, *corner_radius),
            ShapeKind::Circle { radius } => (0..CIRCLE_SEGMENTS)
                .map(|i| Vec2::ZERO.polar(*radius, i as f32 * 2.0 * PI / CIRCLE_SEGMENTS as f32))
                .collect(),
            ShapeKind::Polygon { vertices } => vertices.clone(),
            ShapeKind::ArcPolygon {
                vertices,
                arc_angle,
            } => arc_polygon_outline(vertices, *arc_angle),
            ShapeKind::Curve { control_points } => smooth_closed_curve(control_points),
            ShapeKind::Polyline { points } => points.clone(),
            ShapeKind::Text { .. } | ShapeKind::Image { .. } => {
                let (w, h) = self.box_size().unwrap_or((0.0, 0.0));
                rounded_rect_outline(w, h, 0.0)
            }
        };

        local.into_iter().map(|p| p + self.offset).collect()
    }

    /// Axis-aligned bounds of the outline as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        bounds_of(&self.outline())
    }
}

pub fn bounds_of(points: &[Vec2]) -> (Vec2, Vec2) {
    let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
    let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}

fn rounded_rect_outline(width: f32, height: f32, corner_radius: f32) -> Vec<Vec2> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let r = corner_radius.min(hw).min(hh);

    if r <= 0.0 {
        return vec![
            Vec2::new(-hw, hh),
            Vec2::new(hw, hh),
            Vec2::new(hw, -hh),
            Vec2::new(-hw, -hh),
        ];
    }

    // Corner centres, counter-clockwise from top-right
    let corners = [
        (Vec2::new(hw - r, hh - r), 0.0),
        (Vec2::new(-hw + r, hh - r), FRAC_PI_2),
        (Vec2::new(-hw + r, -hh + r), PI),
        (Vec2::new(hw - r, -hh + r), 3.0 * FRAC_PI_2),
    ];

    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (centre, start) in corners {
        for i in 0..=CORNER_SEGMENTS {
            let angle = start + FRAC_PI_2 * i as f32 / CORNER_SEGMENTS as f32;
            points.push(centre.polar(r, angle));
        }
    }
    points
}

/// Points of the counter-clockwise arc of `angle` radians from `a` to `b`.
/// The start point is emitted exactly, the end point is not emitted.
pub fn arc_between(a: Vec2, b: Vec2, angle: f32, samples: usize) -> Vec<Vec2> {
    let chord = b - a;
    let c = chord.length();
    if angle.abs() < 1e-4 || c < 1e-6 {
        return (0..samples)
            .map(|i| a.lerp(b, i as f32 / samples as f32))
            .collect();
    }

    let radius = c / (2.0 * (angle / 2.0).sin());
    let mid = a.lerp(b, 0.5);
    // Centre sits on the left of a->b for a counter-clockwise sweep
    let left = Vec2::new(-chord.y, chord.x) * (1.0 / c);
    let centre = mid + left * (radius * (angle / 2.0).cos());
    let start = (a.y - centre.y).atan2(a.x - centre.x);

    let mut points = vec![a];
    for i in 1..samples {
        let t = i as f32 / samples as f32;
        points.push(centre.polar(radius.abs(), start + angle * t));
    }
    points
}

fn arc_polygon_outline(vertices: &[Vec2], arc_angle: f32) -> Vec<Vec2> {
    let n = vertices.len();
    let mut points = Vec::with_capacity(n * ARC_SAMPLES);
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        points.extend(arc_between(a, b, arc_angle, ARC_SAMPLES));
    }
    points
}

/// Closed Catmull-Rom spline through `control` (passes through every point)
pub fn smooth_closed_curve(control: &[Vec2]) -> Vec<Vec2> {
    let n = control.len();
    if n < 3 {
        return control.to_vec();
    }

    let mut points = Vec::with_capacity(n * CURVE_SAMPLES);
    for i in 0..n {
        let p0 = control[(i + n - 1) % n];
        let p1 = control[i];
        let p2 = control[(i + 1) % n];
        let p3 = control[(i + 2) % n];

        for s in 0..CURVE_SAMPLES {
            let t = s as f32 / CURVE_SAMPLES as f32;
            let t2 = t * t;
            let t3 = t2 * t;
            let point = (p1 * 2.0
                + (p2 - p0) * t
                + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
                + (-p0 + p1 * 3.0 - p2 * 3.0 + p3) * t3)
                * 0.5;
            points.push(point);
        }
    }
    points
}

/// Leading `fraction` of a path by arc length, for draw-on animations
pub fn partial_path(points: &[Vec2], closed: bool, fraction: f32) -> Vec<Vec2> {
    let mut path = points.to_vec();
    if closed {
        if let Some(first) = points.first() {
            path.push(*first);
        }
    }
    if path.len() < 2 || fraction >= 1.0 {
        return path;
    }

    let total: f32 = path.windows(2).map(|w| (w[1] - w[0]).length()).sum();
    let mut remaining = total * fraction.max(0.0);
    let mut out = vec![path[0]];
    for w in path.windows(2) {
        let len = (w[1] - w[0]).length();
        if remaining >= len {
            out.push(w[1]);
            remaining -= len;
        } else {
            if remaining > 0.0 {
                out.push(w[0].lerp(w[1], remaining / len));
            }
            break;
        }
    }
    out
}

/// Placement applied to shapes at draw time: scale, then rotate, then translate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2 {
    pub translation: Vec2,
    pub rotation: f32,
    pub scale: f32,
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2 {
    pub const IDENTITY: Transform2 = Transform2 {
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
    };

    pub fn translate(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        (p * self.scale).rotate(self.rotation) + self.translation
    }
}
