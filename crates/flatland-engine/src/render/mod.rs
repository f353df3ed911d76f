//! GPU rendering subsystem.
//!
//! - `pipeline`: per-kind binding layouts and pipelines, built once
//! - `buffers` / `upload`: GPU-resident copies of the object registry
//! - `plan`: the renderer-agnostic draw list for one tick
//! - `renderer`: owns all of the above and drives ticks
//!
//! Convention:
//! - CPU geometry is in World units (top-left origin, +Y down).
//! - Vertex programs convert to clip space using the world-size uniform.

mod buffers;
mod common;
mod ctx;
mod pipeline;
mod plan;
mod renderer;
mod shaders;
mod upload;

pub use buffers::{ExactSizeSlot, SlotAction};
pub use common::DimensionsUniform;
pub use ctx::RenderCtx;
pub use pipeline::{layout_entries, PipelineState, Pipelines};
pub use plan::{BindingSlot, DrawCall, DrawSink, FramePlan};
pub use renderer::{Renderer, RendererConfig};
pub use shaders::{KindPrograms, ProgramSource, ShaderSet};
pub use upload::{pack_geometry, pack_props, PropRecord, UploadReport};
