use std::path::Path;
use std::sync::Arc;

use crate::assets::{Bitmap, ImageCache};
use crate::coords::{Color, QuadVertices, Rect, Vec2};

/// Discriminant selecting geometry/property layout and pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    Primitive,
    Textured,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 2] = [ObjectKind::Primitive, ObjectKind::Textured];

    /// Integer tag written into the property record's `kind` slot.
    #[inline]
    pub const fn tag(self) -> u32 {
        match self {
            ObjectKind::Primitive => 0,
            ObjectKind::Textured => 1,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            ObjectKind::Primitive => "primitive",
            ObjectKind::Textured => "textured",
        }
    }
}

/// Solid-colored rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveObject {
    /// Diagnostic name.
    pub label: String,
    pub rect: Rect,
    pub color: Color,
}

impl PrimitiveObject {
    pub fn new(label: impl Into<String>, rect: Rect, color: Color) -> Self {
        Self {
            label: label.into(),
            rect,
            color,
        }
    }

    #[inline]
    pub fn vertices(&self) -> QuadVertices {
        self.rect.vertices()
    }
}

/// Rectangle filled with a bitmap.
///
/// `image` is `None` when the image cache could not provide the bitmap; such
/// objects are dropped from the scene when it is replaced.
#[derive(Debug, Clone)]
pub struct TexturedObject {
    /// Diagnostic name.
    pub label: String,
    pub rect: Rect,
    /// Not used by the builtin textured program; kept for custom programs.
    pub color: Color,
    pub image: Option<Arc<Bitmap>>,
    /// How many times the image repeats across the rectangle on each axis.
    pub tiling: Vec2,
}

impl TexturedObject {
    pub fn new(label: impl Into<String>, rect: Rect, image: Arc<Bitmap>) -> Self {
        Self {
            label: label.into(),
            rect,
            color: Color::white(),
            image: Some(image),
            tiling: Vec2::splat(1.0),
        }
    }

    /// Resolves the image through `cache`.
    ///
    /// Load failures are logged and yield an object without an image rather
    /// than an error, so one broken asset does not abort scene authoring.
    pub fn from_cache(
        label: impl Into<String>,
        rect: Rect,
        cache: &mut ImageCache,
        path: impl AsRef<Path>,
    ) -> Self {
        let label = label.into();
        let image = match cache.get_image(path) {
            Ok(bmp) => Some(bmp),
            Err(e) => {
                log::warn!("textured object '{label}': {e}");
                None
            }
        };

        Self {
            label,
            rect,
            color: Color::white(),
            image,
            tiling: Vec2::splat(1.0),
        }
    }

    #[inline]
    pub fn with_tiling(mut self, u: f32, v: f32) -> Self {
        self.tiling = Vec2::new(u, v);
        self
    }

    #[inline]
    pub fn vertices(&self) -> QuadVertices {
        self.rect.vertices()
    }

    /// Texture coordinates matching [`Rect::vertices`] order.
    ///
    /// The texture is uploaded bottom row first, so `v = tiling.y` is the top
    /// edge of the image and `v = 0` its bottom edge. Values above 1 tile
    /// through the repeat-addressing sampler.
    pub fn uvs(&self) -> QuadVertices {
        let (u, v) = (self.tiling.x, self.tiling.y);
        [
            [0.0, v],
            [0.0, 0.0],
            [u, v],
            [u, v],
            [0.0, 0.0],
            [u, 0.0],
        ]
    }

    /// The bitmap, if present and non-empty.
    #[inline]
    pub fn drawable_image(&self) -> Option<&Arc<Bitmap>> {
        self.image.as_ref().filter(|b| !b.is_empty())
    }
}

/// Scene object handed to the renderer.
#[derive(Debug, Clone)]
pub enum RenderObject {
    Primitive(PrimitiveObject),
    Textured(TexturedObject),
}

impl RenderObject {
    /// Convenience constructor for a solid rectangle.
    pub fn primitive(label: impl Into<String>, rect: Rect, color: Color) -> Self {
        RenderObject::Primitive(PrimitiveObject::new(label, rect, color))
    }

    /// Convenience constructor for a textured rectangle.
    pub fn textured(label: impl Into<String>, rect: Rect, image: Arc<Bitmap>) -> Self {
        RenderObject::Textured(TexturedObject::new(label, rect, image))
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        match self {
            RenderObject::Primitive(_) => ObjectKind::Primitive,
            RenderObject::Textured(_) => ObjectKind::Textured,
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        match self {
            RenderObject::Primitive(o) => &o.label,
            RenderObject::Textured(o) => &o.label,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        match self {
            RenderObject::Primitive(o) => o.rect,
            RenderObject::Textured(o) => o.rect,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        match self {
            RenderObject::Primitive(o) => o.color,
            RenderObject::Textured(o) => o.color,
        }
    }

    #[inline]
    pub fn vertices(&self) -> QuadVertices {
        self.rect().vertices()
    }
}

impl From<PrimitiveObject> for RenderObject {
    fn from(o: PrimitiveObject) -> Self {
        RenderObject::Primitive(o)
    }
}

impl From<TexturedObject> for RenderObject {
    fn from(o: TexturedObject) -> Self {
        RenderObject::Textured(o)
    }
}
