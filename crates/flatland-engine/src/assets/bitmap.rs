/// Immutable decoded image, tightly packed RGBA8 rows, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    pub const BYTES_PER_PIXEL: u32 = 4;

    /// Wraps raw RGBA8 pixels.
    ///
    /// Returns `None` when `pixels` does not hold exactly `width * height` texels.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(Self::BYTES_PER_PIXEL as usize)?;
        (pixels.len() == expected).then_some(Self { width, height, pixels })
    }

    /// Builds a bitmap by evaluating `f(x, y)` for every texel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity((width * height * Self::BYTES_PER_PIXEL) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// A bitmap with no texels cannot back a GPU texture.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * Self::BYTES_PER_PIXEL
    }

    /// Returns the pixel rows in bottom-to-top order.
    ///
    /// Texture upload uses this so that UV `v = 0` lands on the bottom edge
    /// of the source image.
    pub fn flipped_rows(&self) -> Vec<u8> {
        let row = self.bytes_per_row() as usize;
        if row == 0 {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(self.pixels.len());
        for chunk in self.pixels.chunks_exact(row).rev() {
            out.extend_from_slice(chunk);
        }
        out
    }
}

impl From<image::RgbaImage> for Bitmap {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_rejects_wrong_length() {
        assert!(Bitmap::from_rgba8(2, 2, vec![0; 15]).is_none());
        assert!(Bitmap::from_rgba8(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn flipped_rows_reverses_row_order() {
        // 1x3 column: red, green, blue from top to bottom.
        let bmp = Bitmap::from_rgba8(
            1,
            3,
            vec![255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255],
        )
        .unwrap();

        assert_eq!(
            bmp.flipped_rows(),
            vec![0, 0, 255, 255, 0, 255, 0, 255, 255, 0, 0, 255]
        );
    }

    #[test]
    fn flipped_rows_keeps_texels_within_a_row() {
        let bmp = Bitmap::from_fn(2, 2, |x, y| [x as u8, y as u8, 0, 255]);
        let flipped = bmp.flipped_rows();
        assert_eq!(&flipped[0..8], &[0, 1, 0, 255, 1, 1, 0, 255]);
        assert_eq!(&flipped[8..16], &[0, 0, 0, 255, 1, 0, 0, 255]);
    }

    #[test]
    fn empty_bitmap_is_empty() {
        let bmp = Bitmap::from_rgba8(0, 4, Vec::new()).unwrap();
        assert!(bmp.is_empty());
        assert!(bmp.flipped_rows().is_empty());
    }
}
