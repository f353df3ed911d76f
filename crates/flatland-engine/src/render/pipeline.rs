use crate::scene::ObjectKind;

use super::common::{alpha_blend, binding_size, DIMENSIONS_SIZE, QUAD_SIZE};
use super::upload::PROP_STRIDE;
use super::{KindPrograms, RenderCtx, ShaderSet};

const VISIBILITY: wgpu::ShaderStages = wgpu::ShaderStages::VERTEX_FRAGMENT;

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: VISIBILITY,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: binding_size(DIMENSIONS_SIZE),
        },
        count: None,
    }
}

fn storage_entry(binding: u32, min_size: u64) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: VISIBILITY,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: binding_size(min_size),
        },
        count: None,
    }
}

/// Binding layout for `kind`.
///
/// | binding | primitive                  | textured              |
/// |---------|----------------------------|-----------------------|
/// | 0       | world-size uniform         | world-size uniform    |
/// | 1       | viewport-size uniform      | viewport-size uniform |
/// | 2       | all objects' geometry      | this object's geometry|
/// | 3       | all objects' properties    | sampler               |
/// | 4       | -                          | texture               |
/// | 5       | -                          | this object's UVs     |
///
/// Depends only on the kind, never on object count.
pub fn layout_entries(kind: ObjectKind) -> Vec<wgpu::BindGroupLayoutEntry> {
    match kind {
        ObjectKind::Primitive => vec![
            uniform_entry(0),
            uniform_entry(1),
            storage_entry(2, QUAD_SIZE),
            storage_entry(3, PROP_STRIDE as u64),
        ],
        ObjectKind::Textured => vec![
            uniform_entry(0),
            uniform_entry(1),
            storage_entry(2, QUAD_SIZE),
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: VISIBILITY,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 4,
                visibility: VISIBILITY,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            storage_entry(5, QUAD_SIZE),
        ],
    }
}

/// Everything needed to draw one object kind.
///
/// Immutable once built: object data reaches the GPU through buffers and
/// bind groups, never by rebuilding the pipeline.
pub struct PipelineState {
    pub kind: ObjectKind,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub pipeline_layout: wgpu::PipelineLayout,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_module: wgpu::ShaderModule,
    pub fragment_module: wgpu::ShaderModule,
}

impl PipelineState {
    /// Compiles `programs` and builds the layout + pipeline for `kind`.
    ///
    /// A layout/program mismatch is a programming error; wgpu reports it
    /// through the device's error handler, which is fatal by default.
    pub fn build(ctx: &RenderCtx<'_>, kind: ObjectKind, programs: &KindPrograms) -> Self {
        let name = kind.name();

        let vertex_module = programs.vertex.compile(ctx.device);
        let fragment_module = programs.fragment.compile(ctx.device);

        let bgl_label = format!("flatland {name} bgl");
        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(&bgl_label),
                    entries: &layout_entries(kind),
                });

        let layout_label = format!("flatland {name} pipeline layout");
        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&layout_label),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline_label = format!("flatland {name} pipeline");
        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&pipeline_label),
            layout: Some(&pipeline_layout),

            // Geometry comes from storage buffers indexed by vertex/instance
            // index, so there are no vertex buffers.
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(programs.vertex.entry_point.as_ref()),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(programs.fragment.entry_point.as_ref()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("built {name} pipeline for {:?}", ctx.surface_format);

        Self {
            kind,
            bind_group_layout,
            pipeline_layout,
            pipeline,
            vertex_module,
            fragment_module,
        }
    }
}

/// Pipeline state for every kind, built once at initialization.
pub struct Pipelines {
    primitive: PipelineState,
    textured: PipelineState,
}

impl Pipelines {
    pub fn build(ctx: &RenderCtx<'_>, shaders: &ShaderSet) -> Self {
        Self {
            primitive: PipelineState::build(
                ctx,
                ObjectKind::Primitive,
                shaders.programs(ObjectKind::Primitive),
            ),
            textured: PipelineState::build(
                ctx,
                ObjectKind::Textured,
                shaders.programs(ObjectKind::Textured),
            ),
        }
    }

    #[inline]
    pub fn get(&self, kind: ObjectKind) -> &PipelineState {
        match kind {
            ObjectKind::Primitive => &self.primitive,
            ObjectKind::Textured => &self.textured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(kind: ObjectKind) -> Vec<u32> {
        layout_entries(kind).iter().map(|e| e.binding).collect()
    }

    #[test]
    fn primitive_layout_has_four_buffer_bindings() {
        let entries = layout_entries(ObjectKind::Primitive);
        assert_eq!(bindings(ObjectKind::Primitive), [0, 1, 2, 3]);
        assert!(entries
            .iter()
            .all(|e| matches!(e.ty, wgpu::BindingType::Buffer { .. })));
    }

    #[test]
    fn primitive_storage_bindings_are_read_only() {
        for e in &layout_entries(ObjectKind::Primitive)[2..] {
            assert!(matches!(
                e.ty,
                wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    ..
                }
            ));
        }
    }

    #[test]
    fn textured_layout_slots() {
        let entries = layout_entries(ObjectKind::Textured);
        assert_eq!(bindings(ObjectKind::Textured), [0, 1, 2, 3, 4, 5]);
        assert!(matches!(entries[3].ty, wgpu::BindingType::Sampler(_)));
        assert!(matches!(entries[4].ty, wgpu::BindingType::Texture { .. }));
        assert!(matches!(
            entries[5].ty,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                ..
            }
        ));
    }

    #[test]
    fn uniform_slots_are_shared_between_kinds() {
        let p = layout_entries(ObjectKind::Primitive);
        let t = layout_entries(ObjectKind::Textured);
        assert_eq!(p[0], t[0]);
        assert_eq!(p[1], t[1]);
    }
}
