//! Scene model.
//!
//! Responsibilities:
//! - define the renderable object kinds (primitive, textured)
//! - hold the current scene as one ordered partition per kind
//! - replace the whole scene at once; there is no incremental add/remove

mod object;
mod registry;

pub use object::{ObjectKind, PrimitiveObject, RenderObject, TexturedObject};
pub use registry::{ObjectRegistry, ReplaceSummary};
