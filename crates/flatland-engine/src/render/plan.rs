//! Renderer-agnostic draw list for one tick.
//!
//! The plan is derived from the registry alone; `Renderer` replays it into a
//! wgpu render pass through [`DrawSink`]. Tests replay it into a recorder.

use crate::coords::{Viewport, QUAD_VERTEX_COUNT};
use crate::scene::{ObjectKind, ObjectRegistry};

use super::DimensionsUniform;

/// Which bind group a draw uses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BindingSlot {
    /// The single group covering every primitive.
    SharedPrimitive,
    /// The group of the n-th textured object.
    Textured(usize),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub kind: ObjectKind,
    pub binding: BindingSlot,
    pub vertex_count: u32,
    pub instance_count: u32,
}

/// Receives the commands of a [`FramePlan`].
pub trait DrawSink {
    fn set_pipeline(&mut self, kind: ObjectKind);

    /// Binds `slot` at group 0. Returns `false` if the slot has no resources,
    /// in which case the draw is skipped.
    fn bind(&mut self, slot: BindingSlot) -> bool;

    fn draw(&mut self, vertex_count: u32, instance_count: u32);
}

/// Ordered draws for one frame: all primitives first, then textured objects
/// in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub viewport: DimensionsUniform,
    pub draws: Vec<DrawCall>,
}

impl FramePlan {
    pub fn build(registry: &ObjectRegistry, viewport: Viewport) -> Self {
        let mut draws = Vec::with_capacity(1 + registry.textured().len());

        let primitives = registry.count_of(ObjectKind::Primitive);
        if primitives > 0 {
            draws.push(DrawCall {
                kind: ObjectKind::Primitive,
                binding: BindingSlot::SharedPrimitive,
                vertex_count: QUAD_VERTEX_COUNT,
                instance_count: primitives as u32,
            });
        }

        draws.extend((0..registry.textured().len()).map(|i| DrawCall {
            kind: ObjectKind::Textured,
            binding: BindingSlot::Textured(i),
            vertex_count: QUAD_VERTEX_COUNT,
            instance_count: 1,
        }));

        Self {
            viewport: DimensionsUniform::from(viewport),
            draws,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Replays the plan, switching pipelines only when the kind changes.
    /// Returns the number of draws issued.
    pub fn record(&self, sink: &mut impl DrawSink) -> usize {
        let mut current: Option<ObjectKind> = None;
        let mut issued = 0;

        for call in &self.draws {
            if current != Some(call.kind) {
                sink.set_pipeline(call.kind);
                current = Some(call.kind);
            }
            if !sink.bind(call.binding) {
                log::warn!("no bind group for {:?}; draw skipped", call.binding);
                continue;
            }
            sink.draw(call.vertex_count, call.instance_count);
            issued += 1;
        }

        issued
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use winit::dpi::PhysicalSize;

    use super::*;
    use crate::assets::Bitmap;
    use crate::coords::{Color, Rect};
    use crate::scene::RenderObject;

    #[derive(Debug, PartialEq)]
    enum Cmd {
        Pipeline(ObjectKind),
        Bind(BindingSlot),
        Draw(u32, u32),
    }

    #[derive(Default)]
    struct Recorder {
        cmds: Vec<Cmd>,
        missing: Option<BindingSlot>,
    }

    impl DrawSink for Recorder {
        fn set_pipeline(&mut self, kind: ObjectKind) {
            self.cmds.push(Cmd::Pipeline(kind));
        }

        fn bind(&mut self, slot: BindingSlot) -> bool {
            if self.missing == Some(slot) {
                return false;
            }
            self.cmds.push(Cmd::Bind(slot));
            true
        }

        fn draw(&mut self, vertex_count: u32, instance_count: u32) {
            self.cmds.push(Cmd::Draw(vertex_count, instance_count));
        }
    }

    fn bitmap() -> Arc<Bitmap> {
        Arc::new(Bitmap::from_fn(2, 2, |_, _| [255, 0, 0, 255]))
    }

    fn registry(objects: Vec<RenderObject>) -> ObjectRegistry {
        let mut reg = ObjectRegistry::new();
        reg.replace_all(objects);
        reg
    }

    #[test]
    fn empty_scene_has_no_draws() {
        let plan = FramePlan::build(&ObjectRegistry::new(), Viewport::new(800.0, 600.0));
        assert!(plan.is_empty());

        let mut rec = Recorder::default();
        assert_eq!(plan.record(&mut rec), 0);
        assert!(rec.cmds.is_empty());
    }

    #[test]
    fn single_primitive_is_one_instanced_draw() {
        let reg = registry(vec![RenderObject::primitive(
            "yellow",
            Rect::new(80.0, 60.0, 500.0, 500.0),
            Color::new(0.8, 0.8, 0.0, 1.0),
        )]);
        let plan = FramePlan::build(&reg, Viewport::new(800.0, 600.0));

        let mut rec = Recorder::default();
        assert_eq!(plan.record(&mut rec), 1);
        assert_eq!(
            rec.cmds,
            [
                Cmd::Pipeline(ObjectKind::Primitive),
                Cmd::Bind(BindingSlot::SharedPrimitive),
                Cmd::Draw(6, 1),
            ]
        );
    }

    #[test]
    fn primitives_draw_before_textured_in_registry_order() {
        let reg = registry(vec![
            RenderObject::textured("a", Rect::new(0.0, 0.0, 10.0, 10.0), bitmap()),
            RenderObject::primitive("p0", Rect::new(0.0, 0.0, 5.0, 5.0), Color::white()),
            RenderObject::textured("b", Rect::new(20.0, 0.0, 10.0, 10.0), bitmap()),
        ]);
        let plan = FramePlan::build(&reg, Viewport::new(800.0, 600.0));

        let mut rec = Recorder::default();
        assert_eq!(plan.record(&mut rec), 3);
        assert_eq!(
            rec.cmds,
            [
                Cmd::Pipeline(ObjectKind::Primitive),
                Cmd::Bind(BindingSlot::SharedPrimitive),
                Cmd::Draw(6, 1),
                Cmd::Pipeline(ObjectKind::Textured),
                Cmd::Bind(BindingSlot::Textured(0)),
                Cmd::Draw(6, 1),
                Cmd::Bind(BindingSlot::Textured(1)),
                Cmd::Draw(6, 1),
            ]
        );
    }

    #[test]
    fn all_primitives_share_one_draw() {
        let reg = registry(
            (0..5)
                .map(|i| {
                    RenderObject::primitive("p", Rect::new(i as f32, 0.0, 1.0, 1.0), Color::white())
                })
                .collect(),
        );
        let plan = FramePlan::build(&reg, Viewport::new(800.0, 600.0));

        assert_eq!(plan.draws.len(), 1);
        assert_eq!(plan.draws[0].instance_count, 5);
        assert_eq!(plan.draws[0].vertex_count, 6);
    }

    #[test]
    fn missing_binding_skips_only_that_draw() {
        let reg = registry(vec![
            RenderObject::textured("a", Rect::new(0.0, 0.0, 10.0, 10.0), bitmap()),
            RenderObject::textured("b", Rect::new(20.0, 0.0, 10.0, 10.0), bitmap()),
        ]);
        let plan = FramePlan::build(&reg, Viewport::new(800.0, 600.0));

        let mut rec = Recorder {
            missing: Some(BindingSlot::Textured(0)),
            ..Default::default()
        };
        assert_eq!(plan.record(&mut rec), 1);
        assert_eq!(rec.cmds.last(), Some(&Cmd::Draw(6, 1)));
    }

    #[test]
    fn viewport_change_shows_in_next_plan() {
        // The tick uploads `bytes_of(&plan.viewport)` verbatim.
        fn uploaded(plan: &FramePlan) -> [f32; 4] {
            let bytes = bytemuck::bytes_of(&plan.viewport);
            let mut out = [0.0; 4];
            for (v, c) in out.iter_mut().zip(bytes.chunks_exact(4)) {
                *v = f32::from_le_bytes([c[0], c[1], c[2], c[3]]);
            }
            out
        }

        let reg = registry(vec![RenderObject::primitive(
            "p",
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Color::white(),
        )]);
        let size = |w: u32, h: u32| Viewport::from(PhysicalSize::new(w, h));
        let before = FramePlan::build(&reg, size(800, 600));
        let after = FramePlan::build(&reg, size(1024, 768));

        assert_eq!(bytemuck::bytes_of(&before.viewport).len(), 16);
        assert_eq!(uploaded(&before), [800.0, 600.0, 0.0, 0.0]);
        assert_eq!(uploaded(&after), [1024.0, 768.0, 0.0, 0.0]);
        assert_eq!(before.draws, after.draws);
    }
}
