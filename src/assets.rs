use crate::geometry::{Bitmap, Color, ShapeSpec, Vec2};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Pixel height SVG logos are rasterized at
pub const SVG_RASTER_HEIGHT: u32 = 512;

/// Asset types that can be loaded
#[derive(Debug, Clone)]
pub enum Asset {
    Raster(Bitmap),
    Vector(Bitmap),
}

/// What a scene shows in place of a branding asset
#[derive(Debug, Clone, PartialEq)]
pub enum LogoVisual {
    /// Decoded image or rasterized SVG
    Bitmap(Bitmap),
    /// Drawn geometry used when the asset is unavailable
    Shape(ShapeSpec),
}

impl LogoVisual {
    pub const FALLBACK_SCALE: f32 = 1.25;

    /// Diamond outline shown when the SVG logo cannot be loaded
    pub fn fallback_diamond() -> Self {
        let vertices = [
            Vec2::UP * 1.5,
            Vec2::RIGHT * 1.0,
            Vec2::DOWN * 1.5,
            Vec2::LEFT * 1.0,
        ]
        .into_iter()
        .map(|v| v * Self::FALLBACK_SCALE)
        .collect();

        LogoVisual::Shape(
            ShapeSpec::polygon("logo", vertices)
                .filled(Color::WHITE, 1.0)
                .stroked(Color::WHITE, 3.0, 1.0),
        )
    }

    /// Text label shown when the branding image cannot be loaded
    pub fn fallback_label(text: &str, color: Color) -> Self {
        LogoVisual::Shape(ShapeSpec::text("logo", text, 48.0 * 1.2).filled(color, 1.0))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, LogoVisual::Shape(_))
    }
}

/// Asset loader that manages loading and caching of branding assets
pub struct AssetLoader {
    assets: HashMap<PathBuf, Asset>,
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with a base path for resolving relative paths
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            assets: HashMap::new(),
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Decode a PNG/JPEG into straight-alpha RGBA
    pub fn load_raster(&mut self, path: &Path) -> Result<Bitmap> {
        let full_path = self.resolve_path(path);

        if let Some(Asset::Raster(bitmap)) = self.assets.get(&full_path) {
            return Ok(bitmap.clone());
        }

        let image = image::open(&full_path)
            .with_context(|| format!("Failed to load image: {}", full_path.display()))?
            .to_rgba8();
        let bitmap = Bitmap::new(image.width(), image.height(), image.into_raw());

        debug!(path = %full_path.display(), width = bitmap.width, height = bitmap.height, "loaded raster asset");
        self.assets
            .insert(full_path, Asset::Raster(bitmap.clone()));
        Ok(bitmap)
    }

    /// Parse and rasterize an SVG at `SVG_RASTER_HEIGHT` pixels tall
    pub fn load_svg(&mut self, path: &Path) -> Result<Bitmap> {
        let full_path = self.resolve_path(path);

        if let Some(Asset::Vector(bitmap)) = self.assets.get(&full_path) {
            return Ok(bitmap.clone());
        }

        let data = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read SVG: {}", full_path.display()))?;
        let bitmap = rasterize_svg(&data)
            .with_context(|| format!("Failed to render SVG: {}", full_path.display()))?;

        debug!(path = %full_path.display(), width = bitmap.width, height = bitmap.height, "rasterized svg asset");
        self.assets
            .insert(full_path, Asset::Vector(bitmap.clone()));
        Ok(bitmap)
    }

    /// SVG logo, or the diamond fallback if it cannot be loaded
    pub fn logo_from_svg(&mut self, path: &Path) -> LogoVisual {
        match self.load_svg(path) {
            Ok(bitmap) => LogoVisual::Bitmap(bitmap),
            Err(e) => {
                warn!("⚠️  Logo unavailable, using fallback shape: {:#}", e);
                LogoVisual::fallback_diamond()
            }
        }
    }

    /// Branding image, or a text label if it cannot be loaded
    pub fn logo_from_raster(&mut self, path: &Path, label: &str, color: Color) -> LogoVisual {
        match self.load_raster(path) {
            Ok(bitmap) => LogoVisual::Bitmap(bitmap),
            Err(e) => {
                warn!("⚠️  Branding image unavailable, using text label: {:#}", e);
                LogoVisual::fallback_label(label, color)
            }
        }
    }

    /// Resolve a path relative to the base path
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Get statistics about loaded assets
    pub fn stats(&self) -> AssetStats {
        let mut rasters = 0;
        let mut vectors = 0;

        for asset in self.assets.values() {
            match asset {
                Asset::Raster(_) => rasters += 1,
                Asset::Vector(_) => vectors += 1,
            }
        }

        AssetStats {
            total: self.assets.len(),
            rasters,
            vectors,
        }
    }

    /// Clear all loaded assets from memory
    pub fn clear(&mut self) {
        self.assets.clear();
    }
}

fn rasterize_svg(data: &[u8]) -> Result<Bitmap> {
    let tree = resvg::usvg::Tree::from_data(data, &resvg::usvg::Options::default())?;
    let size = tree.size();
    if size.height() <= 0.0 || size.width() <= 0.0 {
        anyhow::bail!("SVG has an empty viewport");
    }

    let scale = SVG_RASTER_HEIGHT as f32 / size.height();
    let width = ((size.width() * scale).ceil() as u32).max(1);
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, SVG_RASTER_HEIGHT)
        .ok_or_else(|| anyhow::anyhow!("Invalid SVG raster size {}x{}", width, SVG_RASTER_HEIGHT))?;

    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are premultiplied
    let mut pixels = pixmap.take();
    for px in pixels.chunks_exact_mut(4) {
        let alpha = px[3] as u32;
        if alpha > 0 && alpha < 255 {
            for c in &mut px[..3] {
                *c = ((*c as u32 * 255 + alpha / 2) / alpha).min(255) as u8;
            }
        }
    }

    Ok(Bitmap::new(width, SVG_RASTER_HEIGHT, pixels))
}

/// Statistics about loaded assets
#[derive(Debug, Clone)]
pub struct AssetStats {
    pub total: usize,
    pub rasters: usize,
    pub vectors: usize,
}

impl std::fmt::Display for AssetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total: {}, Images: {}, SVGs: {}",
            self.total, self.rasters, self.vectors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ShapeKind;
    use std::fs;
    use tempfile::TempDir;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10" viewBox="0 0 20 10">
        <rect x="0" y="0" width="20" height="10" fill="#ffffff"/>
    </svg>"##;

    fn write_png(path: &Path) {
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([255, 0, 0, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_load_raster() {
        let temp_dir = TempDir::new().unwrap();
        write_png(&temp_dir.path().join("brand.png"));

        let mut loader = AssetLoader::new(temp_dir.path());
        let bitmap = loader.load_raster(Path::new("brand.png")).unwrap();
        assert_eq!((bitmap.width, bitmap.height), (4, 3));
        assert_eq!(bitmap.pixel(0, 0), Some([255, 0, 0, 255]));

        let stats = loader.stats();
        assert_eq!(stats.rasters, 1);
        assert_eq!(stats.total, 1);
    }

    #[test]
    fn test_asset_caching() {
        let temp_dir = TempDir::new().unwrap();
        write_png(&temp_dir.path().join("cached.png"));

        let mut loader = AssetLoader::new(temp_dir.path());

        loader.load_raster(Path::new("cached.png")).unwrap();
        let stats1 = loader.stats();

        // Load again - should use cache
        loader.load_raster(Path::new("cached.png")).unwrap();
        let stats2 = loader.stats();

        assert_eq!(stats1.total, stats2.total);
        assert_eq!(stats2.total, 1);
    }

    #[test]
    fn test_load_svg() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("logo.svg"), SQUARE_SVG).unwrap();

        let mut loader = AssetLoader::new(temp_dir.path());
        let bitmap = loader.load_svg(Path::new("logo.svg")).unwrap();
        assert_eq!(bitmap.height, SVG_RASTER_HEIGHT);
        assert_eq!(bitmap.width, SVG_RASTER_HEIGHT * 2);
        assert_eq!(bitmap.pixel(10, 10), Some([255, 255, 255, 255]));
        assert_eq!(loader.stats().vectors, 1);
    }

    #[test]
    fn test_missing_svg_falls_back_to_diamond() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = AssetLoader::new(temp_dir.path());

        let logo = loader.logo_from_svg(Path::new("assets/logo.svg"));
        assert!(logo.is_fallback());
        assert_eq!(logo, LogoVisual::fallback_diamond());
        assert_eq!(loader.stats().total, 0);
    }

    #[test]
    fn test_corrupt_svg_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("logo.svg"), "<svg><unclosed").unwrap();

        let mut loader = AssetLoader::new(temp_dir.path());
        assert!(loader.logo_from_svg(Path::new("logo.svg")).is_fallback());
    }

    #[test]
    fn test_corrupt_image_falls_back_to_label() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("brand.png"), b"not a png").unwrap();

        let mut loader = AssetLoader::new(temp_dir.path());
        let logo = loader.logo_from_raster(Path::new("brand.png"), "Imran's Lab", Color::WHITE);
        match logo {
            LogoVisual::Shape(shape) => match shape.kind {
                ShapeKind::Text { content, .. } => assert_eq!(content, "Imran's Lab"),
                other => panic!("Expected text fallback, got {:?}", other),
            },
            LogoVisual::Bitmap(_) => panic!("Expected fallback"),
        }
    }

    #[test]
    fn test_fallback_diamond_geometry() {
        match LogoVisual::fallback_diamond() {
            LogoVisual::Shape(shape) => {
                let (min, max) = shape.bounds();
                assert_eq!(max.y, 1.875);
                assert_eq!(min.x, -1.25);
            }
            LogoVisual::Bitmap(_) => panic!("Expected shape"),
        }
    }

    #[test]
    fn test_resolve_path_absolute() {
        let loader = AssetLoader::new("/base");
        let abs_path = PathBuf::from("/absolute/path.png");
        let resolved = loader.resolve_path(&abs_path);
        assert_eq!(resolved, abs_path);
    }

    #[test]
    fn test_resolve_path_relative() {
        let loader = AssetLoader::new("/base");
        let rel_path = Path::new("relative/path.png");
        let resolved = loader.resolve_path(rel_path);
        assert_eq!(resolved, PathBuf::from("/base/relative/path.png"));
    }

    #[test]
    fn test_clear_assets() {
        let temp_dir = TempDir::new().unwrap();
        write_png(&temp_dir.path().join("test.png"));

        let mut loader = AssetLoader::new(temp_dir.path());
        loader.load_raster(Path::new("test.png")).unwrap();

        assert_eq!(loader.stats().total, 1);

        loader.clear();
        assert_eq!(loader.stats().total, 0);
    }

    #[test]
    fn test_asset_stats_display() {
        let stats = AssetStats {
            total: 3,
            rasters: 2,
            vectors: 1,
        };
        let display = format!("{}", stats);
        assert!(display.contains("Total: 3"));
        assert!(display.contains("Images: 2"));
        assert!(display.contains("SVGs: 1"));
    }
}
