use super::{Vec2, Viewport};

/// Fixed logical coordinate space objects are authored in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

/// Uniform scale + centering offset that fits a World inside a viewport.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LetterboxFit {
    pub scale: f32,
    pub offset: Vec2,
}

impl World {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Largest uniform scale at which the whole World fits in `viewport`,
    /// with the leftover space split evenly on both sides.
    pub fn fit_scale(self, viewport: Viewport) -> LetterboxFit {
        if !self.is_valid() || !viewport.is_valid() {
            return LetterboxFit { scale: 1.0, offset: Vec2::zero() };
        }

        let scale = (viewport.width / self.width).min(viewport.height / self.height);
        let room = Vec2::new(viewport.width, viewport.height) - self.size() * scale;
        let offset = room * 0.5;

        LetterboxFit { scale, offset }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
