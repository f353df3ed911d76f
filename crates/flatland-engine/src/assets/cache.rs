use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Bitmap;

/// Error returned by [`ImageCache::get_image`].
#[derive(Debug)]
pub struct ImageLoadError {
    pub path: PathBuf,
    pub source: image::ImageError,
}

impl fmt::Display for ImageLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load image {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for ImageLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Decoded images memoized by path.
///
/// Bitmaps are handed out as `Arc<Bitmap>`; evicting an entry does not
/// invalidate bitmaps already held by scene objects.
#[derive(Debug, Default)]
pub struct ImageCache {
    images: HashMap<PathBuf, Arc<Bitmap>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached bitmap for `path`, decoding it on first request.
    pub fn get_image(&mut self, path: impl AsRef<Path>) -> Result<Arc<Bitmap>, ImageLoadError> {
        let path = path.as_ref();
        if let Some(bmp) = self.images.get(path) {
            return Ok(Arc::clone(bmp));
        }

        let decoded = image::open(path).map_err(|source| ImageLoadError {
            path: path.to_path_buf(),
            source,
        })?;

        let bmp = Arc::new(Bitmap::from(decoded.into_rgba8()));
        log::debug!(
            "decoded {} ({}x{})",
            path.display(),
            bmp.width(),
            bmp.height()
        );

        self.images.insert(path.to_path_buf(), Arc::clone(&bmp));
        Ok(bmp)
    }

    /// Stores an already-decoded bitmap under `path`, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<PathBuf>, bitmap: Bitmap) -> Arc<Bitmap> {
        let bmp = Arc::new(bitmap);
        self.images.insert(path.into(), Arc::clone(&bmp));
        bmp
    }

    /// Evicts `path`. Returns whether an entry was present.
    pub fn unload_image(&mut self, path: impl AsRef<Path>) -> bool {
        self.images.remove(path.as_ref()).is_some()
    }

    #[inline]
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.images.contains_key(path.as_ref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
