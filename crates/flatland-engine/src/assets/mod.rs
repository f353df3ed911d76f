//! Decoded image assets.
//!
//! The renderer never loads files itself: textured objects arrive carrying an
//! `Arc<Bitmap>` obtained from an [`ImageCache`].

mod bitmap;
mod cache;

pub use bitmap::Bitmap;
pub use cache::{ImageCache, ImageLoadError};
