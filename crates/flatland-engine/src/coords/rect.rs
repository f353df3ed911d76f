use super::Vec2;

/// Number of vertices a rectangle decomposes into (two triangles).
pub const QUAD_VERTEX_COUNT: u32 = 6;

/// Two-triangle decomposition of a rectangle, as `(x, y)` pairs in World units.
///
/// Vertex order is fixed and every GPU buffer layout depends on it:
///
/// | index | corner       |
/// |-------|--------------|
/// | 0     | top-left     |
/// | 1     | bottom-left  |
/// | 2     | top-right    |
/// | 3     | top-right    |
/// | 4     | bottom-left  |
/// | 5     | bottom-right |
pub type QuadVertices = [[f32; 2]; 6];

/// Axis-aligned rectangle in World units (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Returns the triangle-list geometry covering `[x, x+w] × [y, y+h]`.
    ///
    /// Pure function of the current fields; callers re-derive it whenever the
    /// rectangle moves or resizes.
    pub fn vertices(self) -> QuadVertices {
        let Vec2 { x: x0, y: y0 } = self.min();
        let Vec2 { x: x1, y: y1 } = self.max();

        [
            [x0, y0],
            [x0, y1],
            [x1, y0],
            [x1, y0],
            [x0, y1],
            [x1, y1],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    #[test]
    fn vertices_follow_fixed_corner_order() {
        let v = r(80.0, 60.0, 500.0, 500.0).vertices();
        assert_eq!(
            v,
            [
                [80.0, 60.0],
                [80.0, 560.0],
                [580.0, 60.0],
                [580.0, 60.0],
                [80.0, 560.0],
                [580.0, 560.0],
            ]
        );
    }

    #[test]
    fn vertices_use_exactly_the_four_corners() {
        let rects = [
            r(0.0, 0.0, 0.0, 0.0),
            r(1.5, -2.0, 3.0, 0.0),
            r(-10.0, 4.0, 7.25, 9.5),
        ];

        for rect in rects {
            let (x, y, w, h) = (rect.origin.x, rect.origin.y, rect.size.x, rect.size.y);
            let corners = [[x, y], [x, y + h], [x + w, y], [x + w, y + h]];
            let v = rect.vertices();

            assert_eq!(v.len(), QUAD_VERTEX_COUNT as usize);
            assert!(v.iter().all(|p| corners.contains(p)));
            assert_eq!(v[0], corners[0]);
            assert_eq!(v[1], corners[1]);
            assert_eq!(v[2], corners[2]);
            assert_eq!(v[5], corners[3]);
        }
    }

    #[test]
    fn shared_diagonal_is_repeated() {
        let v = r(2.0, 3.0, 4.0, 5.0).vertices();
        assert_eq!(v[2], v[3]);
        assert_eq!(v[1], v[4]);
    }

    #[test]
    fn vertices_track_field_changes() {
        let mut rect = r(0.0, 0.0, 10.0, 10.0);
        let before = rect.vertices();
        rect.origin.x = 5.0;
        let after = rect.vertices();
        assert_ne!(before, after);
        assert_eq!(after[0], [5.0, 0.0]);
    }

    #[test]
    fn is_empty_zero_size() {
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(r(0.0, 0.0, 5.0, 0.0).is_empty());
        assert!(!r(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
