//! Film colour theme.

use crate::geometry::Color;

pub const BACKGROUND: Color = Color::rgb(0x00, 0x00, 0x00);
pub const METAL_DARK: Color = Color::rgb(0x1a, 0x1a, 0x1a);
pub const METAL: Color = Color::rgb(0x9e, 0x9e, 0x9e);
pub const OUTLINE: Color = Color::rgb(0xff, 0xff, 0xff);
pub const ACCENT: Color = Color::rgb(0x00, 0xf7, 0xff);
pub const THRUST: Color = Color::rgb(0xff, 0x7a, 0x00);
pub const THRUST_CORE: Color = Color::rgb(0xff, 0xd0, 0x00);
pub const GROUND: Color = Color::rgb(0x0b, 0x0b, 0x0b);

// Orbit
pub const STAR_NEAR: Color = Color::rgb(0xff, 0xff, 0xff);
pub const STAR_MID: Color = Color::rgb(0xcf, 0xd8, 0xff);
pub const STAR_FAR: Color = Color::rgb(0x9a, 0xa4, 0xff);
pub const EARTH_OCEAN: Color = Color::rgb(0x0b, 0x3d, 0x91);
pub const EARTH_OUTLINE: Color = Color::rgb(0x1e, 0x90, 0xff);

// Mars
pub const MARS_SURFACE: Color = Color::rgb(0xcd, 0x5c, 0x5c);
pub const MARS_SKY: Color = Color::rgb(0x2f, 0x1b, 0x14);
pub const MARS_DUST: Color = Color::rgb(0x8b, 0x45, 0x13);
pub const STARSHIP: Color = Color::rgb(0xc0, 0xc0, 0xc0);
pub const MARS_FLAME: Color = Color::rgb(0xff, 0x45, 0x00);
pub const HUD: Color = Color::rgb(0x00, 0xff, 0x00);

// Branding
pub const NEON_TEXT: Color = Color::rgb(0x00, 0xf7, 0xff);
pub const NEON_ACCENT: Color = Color::rgb(0x39, 0xff, 0x14);
pub const NEON_STROKE: Color = Color::rgb(0xff, 0x00, 0xea);
