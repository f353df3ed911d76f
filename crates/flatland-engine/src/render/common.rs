//! GPU types shared by both object kinds.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};

use crate::coords::{QuadVertices, Viewport, World};

// ── size uniforms ─────────────────────────────────────────────────────────

/// Layout of the world-size (binding 0) and viewport-size (binding 1) uniforms.
///
/// WGSL: `struct Dimensions { size: vec2f, pad: vec2f }`, 16 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DimensionsUniform {
    pub size: [f32; 2],
    pub _pad: [f32; 2],
}

impl DimensionsUniform {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            size: [width, height],
            _pad: [0.0; 2],
        }
    }
}

impl From<World> for DimensionsUniform {
    fn from(w: World) -> Self {
        Self::new(w.width, w.height)
    }
}

impl From<Viewport> for DimensionsUniform {
    fn from(v: Viewport) -> Self {
        Self::new(v.width, v.height)
    }
}

// ── binding sizes ─────────────────────────────────────────────────────────

pub(super) const DIMENSIONS_SIZE: u64 = std::mem::size_of::<DimensionsUniform>() as u64;

/// One object's geometry: 6 `vec2f`, 48 bytes.
pub(super) const QUAD_SIZE: u64 = std::mem::size_of::<QuadVertices>() as u64;

/// `NonZeroU64` for a binding whose size is a non-zero constant.
pub(super) fn binding_size(bytes: u64) -> Option<NonZeroU64> {
    debug_assert!(bytes > 0, "binding sizes are non-zero constants");
    NonZeroU64::new(bytes)
}

// ── blend ─────────────────────────────────────────────────────────────────

/// Straight-alpha "over" blending; colors are not premultiplied.
pub(super) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState::ALPHA_BLENDING
}
