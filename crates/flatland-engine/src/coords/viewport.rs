use winit::dpi::PhysicalSize;

/// Live drawable surface size in physical pixels.
///
/// Re-uploaded to the viewport uniform every frame. The builtin vertex
/// programs map through World size only; the viewport binding stays wired so
/// custom programs can use it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

impl From<PhysicalSize<u32>> for Viewport {
    #[inline]
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }
}
