use crate::geometry::{Color, ShapeSpec, Transform2};

/// A shape placed in the frame with an overall opacity
#[derive(Debug, Clone)]
pub struct Drawable {
    pub shape: ShapeSpec,
    pub transform: Transform2,
    pub opacity: f32,
}

/// Everything visible in one frame, back to front
#[derive(Debug, Clone)]
pub struct DisplayList {
    pub background: Color,
    /// Camera zoom; values above 1 show more of the scene
    pub camera_scale: f32,
    pub items: Vec<Drawable>,
}

impl DisplayList {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            camera_scale: 1.0,
            items: Vec::new(),
        }
    }

    pub fn with_camera_scale(mut self, scale: f32) -> Self {
        self.camera_scale = scale;
        self
    }

    /// Add a shape; fully transparent shapes are dropped
    pub fn push(&mut self, shape: ShapeSpec, transform: Transform2, opacity: f32) {
        if opacity > 0.0 {
            self.items.push(Drawable {
                shape,
                transform,
                opacity: opacity.min(1.0),
            });
        }
    }

    /// Add a shape at its own offset
    pub fn put(&mut self, shape: ShapeSpec, opacity: f32) {
        self.push(shape, Transform2::IDENTITY, opacity);
    }

    pub fn extend<'a>(
        &mut self,
        shapes: impl IntoIterator<Item = &'a ShapeSpec>,
        transform: Transform2,
        opacity: f32,
    ) {
        for shape in shapes {
            self.push(shape.clone(), transform, opacity);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Drawable> {
        self.items.iter().find(|item| item.shape.name == name)
    }
}
