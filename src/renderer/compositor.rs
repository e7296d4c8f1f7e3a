use crate::display::{DisplayList, Drawable};
use crate::geometry::{Bitmap, Color, ShapeKind, Vec2};
use crate::renderer::FrameBuffer;

/// Maps scene units (y up, origin at centre) to pixels (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Visible scene height at camera scale 1
    pub const FRAME_HEIGHT: f32 = 8.0;

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Visible scene width at camera scale 1
    pub fn frame_width(&self) -> f32 {
        Self::FRAME_HEIGHT * self.width as f32 / self.height.max(1) as f32
    }

    pub fn pixels_per_unit(&self, camera_scale: f32) -> f32 {
        self.height as f32 / (Self::FRAME_HEIGHT * camera_scale)
    }

    pub fn to_pixel(&self, p: Vec2, camera_scale: f32) -> (f32, f32) {
        let ppu = self.pixels_per_unit(camera_scale);
        (
            self.width as f32 / 2.0 + p.x * ppu,
            self.height as f32 / 2.0 - p.y * ppu,
        )
    }
}

/// Layer compositor
pub struct Compositor;

impl Compositor {
    /// Fill rectangle with color
    pub fn fill_rect(
        buffer: &mut FrameBuffer,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: [u8; 4],
    ) {
        let (buf_width, buf_height) = buffer.dimensions();

        for dy in 0..height {
            for dx in 0..width {
                let px = x + dx as i32;
                let py = y + dy as i32;

                if px >= 0 && py >= 0 && (px as u32) < buf_width && (py as u32) < buf_height {
                    buffer.blend_pixel(px as u32, py as u32, color);
                }
            }
        }
    }

    /// Even-odd scanline fill sampled at pixel centres
    pub fn fill_polygon(buffer: &mut FrameBuffer, points: &[(f32, f32)], color: [u8; 4]) {
        if color[3] == 0 || points.len() < 3 {
            return;
        }

        let (width, height) = buffer.dimensions();
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let row_start = (min_y.floor() as i64).max(0);
        let row_end = (max_y.ceil() as i64).min(height as i64 - 1);

        let mut crossings = Vec::new();
        for row in row_start..=row_end {
            let sy = row as f32 + 0.5;
            crossings.clear();

            for i in 0..points.len() {
                let (x0, y0) = points[i];
                let (x1, y1) = points[(i + 1) % points.len()];
                if (y0 <= sy && y1 > sy) || (y1 <= sy && y0 > sy) {
                    let t = (sy - y0) / (y1 - y0);
                    crossings.push(x0 + t * (x1 - x0));
                }
            }

            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                let start = ((span[0] - 0.5).ceil() as i64).max(0);
                let end = ((span[1] - 0.5).floor() as i64).min(width as i64 - 1);
                for col in start..=end {
                    buffer.blend_pixel(col as u32, row as u32, color);
                }
            }
        }
    }

    /// Thick line through `points`; each covered pixel is blended once
    pub fn stroke_polyline(
        buffer: &mut FrameBuffer,
        points: &[(f32, f32)],
        closed: bool,
        width: f32,
        color: [u8; 4],
    ) {
        if color[3] == 0 || points.len() < 2 {
            return;
        }

        let half = (width / 2.0).max(0.5);
        let (buf_width, buf_height) = buffer.dimensions();

        let min_x = points.iter().map(|p| p.0).fold(f32::INFINITY, f32::min) - half;
        let max_x = points.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max) + half;
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min) - half;
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max) + half;

        let x0 = (min_x.floor() as i64).max(0);
        let y0 = (min_y.floor() as i64).max(0);
        let x1 = (max_x.ceil() as i64).min(buf_width as i64 - 1);
        let y1 = (max_y.ceil() as i64).min(buf_height as i64 - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        let mask_w = (x1 - x0 + 1) as usize;
        let mut mask = vec![false; mask_w * (y1 - y0 + 1) as usize];

        let segments = if closed {
            points.len()
        } else {
            points.len() - 1
        };

        for i in 0..segments {
            let a = points[i];
            let b = points[(i + 1) % points.len()];

            let sx0 = ((a.0.min(b.0) - half).floor() as i64).max(x0);
            let sx1 = ((a.0.max(b.0) + half).ceil() as i64).min(x1);
            let sy0 = ((a.1.min(b.1) - half).floor() as i64).max(y0);
            let sy1 = ((a.1.max(b.1) + half).ceil() as i64).min(y1);

            for row in sy0..=sy1 {
                for col in sx0..=sx1 {
                    let p = (col as f32 + 0.5, row as f32 + 0.5);
                    if distance_to_segment(p, a, b) <= half {
                        mask[(row - y0) as usize * mask_w + (col - x0) as usize] = true;
                    }
                }
            }
        }

        for (idx, covered) in mask.iter().enumerate() {
            if *covered {
                let col = x0 + (idx % mask_w) as i64;
                let row = y0 + (idx / mask_w) as i64;
                buffer.blend_pixel(col as u32, row as u32, color);
            }
        }
    }

    /// Nearest-neighbour blit of a bitmap centred on `centre`
    pub fn draw_image(
        buffer: &mut FrameBuffer,
        bitmap: &Bitmap,
        centre: (f32, f32),
        size: (f32, f32),
        opacity: f32,
    ) {
        if bitmap.width == 0 || bitmap.height == 0 || size.0 < 1.0 || size.1 < 1.0 {
            return;
        }

        let (buf_width, buf_height) = buffer.dimensions();
        let left = centre.0 - size.0 / 2.0;
        let top = centre.1 - size.1 / 2.0;

        let col_start = (left.floor() as i64).max(0);
        let col_end = ((left + size.0).ceil() as i64).min(buf_width as i64 - 1);
        let row_start = (top.floor() as i64).max(0);
        let row_end = ((top + size.1).ceil() as i64).min(buf_height as i64 - 1);

        for row in row_start..=row_end {
            let v = (row as f32 + 0.5 - top) / size.1;
            if !(0.0..1.0).contains(&v) {
                continue;
            }
            for col in col_start..=col_end {
                let u = (col as f32 + 0.5 - left) / size.0;
                if !(0.0..1.0).contains(&u) {
                    continue;
                }
                let sx = (u * bitmap.width as f32) as u32;
                let sy = (v * bitmap.height as f32) as u32;
                if let Some(mut px) = bitmap.pixel(sx, sy) {
                    px[3] = (px[3] as f32 * opacity).round() as u8;
                    buffer.blend_pixel(col as u32, row as u32, px);
                }
            }
        }
    }

    /// Draw text (placeholder - a bar covering the text box)
    pub fn draw_text_placeholder(buffer: &mut FrameBuffer, corners: &[(f32, f32)], color: [u8; 4]) {
        Self::fill_polygon(buffer, corners, color);
    }

    /// Clear to the background and draw every item back to front
    pub fn draw(buffer: &mut FrameBuffer, viewport: &Viewport, list: &DisplayList) {
        buffer.clear(list.background);
        for item in &list.items {
            Self::draw_item(buffer, viewport, list.camera_scale, item);
        }
    }

    fn draw_item(buffer: &mut FrameBuffer, viewport: &Viewport, camera_scale: f32, item: &Drawable) {
        let shape = &item.shape;
        let project = |p: Vec2| viewport.to_pixel(item.transform.apply(p), camera_scale);

        match &shape.kind {
            ShapeKind::Image { bitmap, .. } => {
                if let Some((w, h)) = shape.box_size() {
                    let ppu = viewport.pixels_per_unit(camera_scale) * item.transform.scale;
                    Compositor::draw_image(
                        buffer,
                        bitmap,
                        project(shape.offset),
                        (w * ppu, h * ppu),
                        item.opacity,
                    );
                }
            }
            ShapeKind::Text { .. } => {
                let color = shape.fill.map(|f| (f.color, f.opacity)).unwrap_or((Color::WHITE, 1.0));
                let corners: Vec<(f32, f32)> = shape.outline().into_iter().map(project).collect();
                Compositor::draw_text_placeholder(buffer, &corners, paint(color.0, color.1 * item.opacity));
            }
            _ => {
                let points: Vec<(f32, f32)> = shape.outline().into_iter().map(project).collect();

                if let Some(fill) = shape.fill.filter(|_| shape.is_closed()) {
                    Compositor::fill_polygon(buffer, &points, paint(fill.color, fill.opacity * item.opacity));
                }

                if let Some(stroke) = shape.stroke {
                    let width = stroke.width
                        * 0.01
                        * viewport.pixels_per_unit(camera_scale)
                        * item.transform.scale;
                    Compositor::stroke_polyline(
                        buffer,
                        &points,
                        shape.is_closed(),
                        width,
                        paint(stroke.color, stroke.opacity * item.opacity),
                    );
                }
            }
        }
    }
}

/// Pixel color with opacity folded into alpha
pub fn paint(color: Color, opacity: f32) -> [u8; 4] {
    let alpha = (color.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    [color.r, color.g, color.b, alpha]
}

fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    (p.0 - cx).hypot(p.1 - cy)
}
