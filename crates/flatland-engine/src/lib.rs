//! Flatland engine crate.
//!
//! A small wgpu renderer for axis-aligned 2D shapes. The application hands the
//! renderer a complete list of objects; the renderer re-derives its GPU buffers
//! from that list and redraws every frame.

pub mod assets;
pub mod coords;
pub mod core;
pub mod device;
pub mod driver;
pub mod logging;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;
