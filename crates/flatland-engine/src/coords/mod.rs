//! Coordinate and geometry types shared by the scene and the renderer.
//!
//! Canonical CPU space is World space:
//! - fixed logical size chosen at design time
//! - origin top-left
//! - +X right, +Y down
//!
//! The vertex programs map World space to clip space using a world-size uniform.

mod color;
mod rect;
mod vec2;
mod viewport;
mod world;

pub use color::Color;
pub use rect::{QuadVertices, Rect, QUAD_VERTEX_COUNT};
pub use vec2::Vec2;
pub use viewport::Viewport;
pub use world::{LetterboxFit, World};
