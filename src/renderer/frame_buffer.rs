use crate::geometry::Color;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// RGBA frame, row-major from the top-left pixel. Frames are always opaque:
/// blending keeps alpha at 255.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Black frame of the given size
    pub fn new(width: u32, height: u32) -> Self {
        let mut frame = Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        };
        frame.clear(Color::BLACK);
        frame
    }

    pub fn clear(&mut self, color: Color) {
        let rgba = [color.r, color.g, color.b, 255];
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx..idx + 4].copy_from_slice(&color);
        }
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = self.index(x, y)?;
        let mut pixel = [0u8; 4];
        pixel.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(pixel)
    }

    /// Source-over blend of a straight-alpha colour
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        match color[3] {
            0 => {}
            255 => {
                self.pixels[idx..idx + 3].copy_from_slice(&color[..3]);
                self.pixels[idx + 3] = 255;
            }
            a => {
                let alpha = a as f32 / 255.0;
                for (dst, src) in self.pixels[idx..idx + 3].iter_mut().zip(&color[..3]) {
                    *dst = (*src as f32 * alpha + *dst as f32 * (1.0 - alpha)).round() as u8;
                }
                self.pixels[idx + 3] = 255;
            }
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Save as binary PPM, the frame format handed to ffmpeg
    pub fn save_ppm(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create frame file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        for chunk in self.pixels.chunks_exact(4) {
            writer.write_all(&chunk[..3])?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Save a still; the image format follows the extension
    pub fn save_image(&self, path: &Path) -> Result<()> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .context("Frame buffer size does not match its dimensions")?;
        image
            .save(path)
            .with_context(|| format!("Failed to save still: {}", path.display()))
    }
}
