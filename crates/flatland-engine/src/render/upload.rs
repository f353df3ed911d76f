//! Maps the object registry into GPU-resident buffers.

use bytemuck::{Pod, Zeroable};

use crate::assets::Bitmap;
use crate::coords::{QuadVertices, World};
use crate::scene::{ObjectKind, ObjectRegistry, PrimitiveObject, TexturedObject};

use super::buffers::{GpuBuffer, SlotAction};
use super::common::{DimensionsUniform, DIMENSIONS_SIZE};
use super::{Pipelines, RenderCtx};

// ── property records ──────────────────────────────────────────────────────

/// Byte stride of one property record.
pub const PROP_STRIDE: usize = 32;

/// Per-primitive property record.
///
/// Layout (32 bytes, matching WGSL `struct Prop { color: vec4f, kind: u32 }`,
/// whose size rounds up to its 16-byte alignment):
///
///  offset  0  color  [f32; 4]
///  offset 16  kind   u32
///  offset 20  padding (12 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PropRecord {
    pub color: [f32; 4],
    pub kind: u32,
    pub _pad: [u32; 3],
}

const _: () = assert!(std::mem::size_of::<PropRecord>() == PROP_STRIDE);

impl PropRecord {
    pub const COLOR_OFFSET: usize = 0;
    pub const KIND_OFFSET: usize = 16;

    #[inline]
    pub fn new(color: [f32; 4], kind: ObjectKind) -> Self {
        Self {
            color,
            kind: kind.tag(),
            _pad: [0; 3],
        }
    }
}

/// Geometry rows for every primitive, in registry order.
pub fn pack_geometry(primitives: &[PrimitiveObject]) -> Vec<QuadVertices> {
    primitives.iter().map(PrimitiveObject::vertices).collect()
}

/// Property rows for every primitive, in registry order.
pub fn pack_props(primitives: &[PrimitiveObject]) -> Vec<PropRecord> {
    primitives
        .iter()
        .map(|p| PropRecord::new(p.color.to_array(), ObjectKind::Primitive))
        .collect()
}

// ── uniforms ──────────────────────────────────────────────────────────────

/// World-size and viewport-size uniform buffers, shared by every bind group.
pub(crate) struct SceneUniforms {
    world: wgpu::Buffer,
    viewport: wgpu::Buffer,
}

impl SceneUniforms {
    fn new(ctx: &RenderCtx<'_>, world: World) -> Self {
        let make = |label| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: DIMENSIONS_SIZE,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        let uniforms = Self {
            world: make("flatland world ubo"),
            viewport: make("flatland viewport ubo"),
        };
        ctx.queue.write_buffer(
            &uniforms.world,
            0,
            bytemuck::bytes_of(&DimensionsUniform::from(world)),
        );
        uniforms
    }
}

// ── primitive buffers ─────────────────────────────────────────────────────

/// Shared geometry/property buffers and the single primitive bind group.
struct PrimitiveBuffers {
    geometry: GpuBuffer,
    props: GpuBuffer,
    bind_group: Option<wgpu::BindGroup>,
    /// Buffer generations the bind group was built against.
    bound: (u64, u64),
}

impl PrimitiveBuffers {
    fn new() -> Self {
        Self {
            geometry: GpuBuffer::new("flatland primitive geometry", wgpu::BufferUsages::STORAGE),
            props: GpuBuffer::new("flatland primitive props", wgpu::BufferUsages::STORAGE),
            bind_group: None,
            bound: (u64::MAX, u64::MAX),
        }
    }

    fn sync(
        &mut self,
        ctx: &RenderCtx<'_>,
        uniforms: &SceneUniforms,
        layout: &wgpu::BindGroupLayout,
        primitives: &[PrimitiveObject],
    ) -> (SlotAction, SlotAction) {
        let geometry = pack_geometry(primitives);
        let props = pack_props(primitives);

        let g = self
            .geometry
            .upload(ctx.device, ctx.queue, bytemuck::cast_slice(&geometry));
        let p = self
            .props
            .upload(ctx.device, ctx.queue, bytemuck::cast_slice(&props));

        let generations = (self.geometry.generation(), self.props.generation());
        if generations == self.bound {
            return (g, p);
        }

        self.bind_group = match (self.geometry.buffer(), self.props.buffer()) {
            (Some(geometry), Some(props)) => {
                Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("flatland primitive bind group"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniforms.world.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: uniforms.viewport.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: geometry.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 3,
                            resource: props.as_entire_binding(),
                        },
                    ],
                }))
            }
            _ => None,
        };
        self.bound = generations;

        (g, p)
    }
}

// ── textured resources ────────────────────────────────────────────────────

/// GPU resources owned by one textured object while it is in the scene.
///
/// Dropping this destroys the texture and both buffers, so replacing the
/// scene never leaks resources of objects that left it.
pub(crate) struct TexturedResources {
    texture: wgpu::Texture,
    vertices: wgpu::Buffer,
    uvs: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl TexturedResources {
    fn build(
        ctx: &RenderCtx<'_>,
        uniforms: &SceneUniforms,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        object: &TexturedObject,
        bitmap: &Bitmap,
    ) -> Self {
        let label = &object.label;
        let texture = upload_texture(ctx, bitmap, label);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let make_quad = |what: &str, data: QuadVertices| {
            let buf = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("flatland {what}: {label}")),
                size: std::mem::size_of::<QuadVertices>() as u64,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            ctx.queue.write_buffer(&buf, 0, bytemuck::cast_slice(&data));
            buf
        };

        let vertices = make_quad("vertices", object.vertices());
        let uvs = make_quad("uvs", object.uvs());

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("flatland textured bind group: {label}")),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.world.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: uniforms.viewport.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: vertices.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: uvs.as_entire_binding(),
                },
            ],
        });

        Self {
            texture,
            vertices,
            uvs,
            bind_group,
        }
    }
}

impl Drop for TexturedResources {
    fn drop(&mut self) {
        self.texture.destroy();
        self.vertices.destroy();
        self.uvs.destroy();
    }
}

/// Texel format for object images on a surface of `surface_format`.
///
/// Matches the surface's encoding so sampled texels reach the display with
/// the same values the image file holds.
pub(crate) fn texture_format_for(surface_format: wgpu::TextureFormat) -> wgpu::TextureFormat {
    if surface_format.is_srgb() {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

/// Whether `bitmap` can become a single 2D texture under `max_dimension`.
pub(crate) fn fits_texture_limit(bitmap: &Bitmap, max_dimension: u32) -> bool {
    bitmap.width() <= max_dimension && bitmap.height() <= max_dimension
}

/// Creates a sampled texture from `bitmap`, rows flipped bottom-to-top.
fn upload_texture(ctx: &RenderCtx<'_>, bitmap: &Bitmap, label: &str) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width: bitmap.width(),
        height: bitmap.height(),
        depth_or_array_layers: 1,
    };

    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("flatland texture: {label}")),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: texture_format_for(ctx.surface_format),
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &bitmap.flipped_rows(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(bitmap.bytes_per_row()),
            rows_per_image: Some(bitmap.height()),
        },
        size,
    );

    texture
}

fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("flatland texture sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

// ── manager ───────────────────────────────────────────────────────────────

/// What one scene upload did to the GPU buffers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UploadReport {
    pub geometry: SlotAction,
    pub props: SlotAction,
    pub textured_built: usize,
    pub textured_released: usize,
}

/// Keeps GPU buffers consistent with the registry contents.
pub(crate) struct UploadManager {
    uniforms: SceneUniforms,
    primitive: PrimitiveBuffers,
    /// Parallel to `ObjectRegistry::textured()`. `None` for objects whose
    /// image could not become a texture; their draws are skipped.
    textured: Vec<Option<TexturedResources>>,
    /// Created on first use of any textured object.
    sampler: Option<wgpu::Sampler>,
}

impl UploadManager {
    pub(crate) fn new(ctx: &RenderCtx<'_>, world: World) -> Self {
        Self {
            uniforms: SceneUniforms::new(ctx, world),
            primitive: PrimitiveBuffers::new(),
            textured: Vec::new(),
            sampler: None,
        }
    }

    /// Re-derives every per-object buffer from `registry`.
    pub(crate) fn rebuild(
        &mut self,
        ctx: &RenderCtx<'_>,
        pipelines: &Pipelines,
        registry: &ObjectRegistry,
    ) -> UploadReport {
        let (geometry, props) = self.primitive.sync(
            ctx,
            &self.uniforms,
            &pipelines.get(ObjectKind::Primitive).bind_group_layout,
            registry.primitives(),
        );

        let textured_released = self.textured.iter().flatten().count();
        self.textured.clear();

        let objects = registry.textured();
        if !objects.is_empty() {
            let sampler = &*self.sampler.get_or_insert_with(|| create_sampler(ctx.device));
            let layout = &pipelines.get(ObjectKind::Textured).bind_group_layout;

            let max_dimension = ctx.device.limits().max_texture_dimension_2d;

            self.textured.extend(objects.iter().map(|obj| {
                let bitmap = obj.drawable_image()?;
                if !fits_texture_limit(bitmap, max_dimension) {
                    log::warn!(
                        "textured object '{}': {}x{} image exceeds the {max_dimension}px texture limit; not drawn",
                        obj.label,
                        bitmap.width(),
                        bitmap.height()
                    );
                    return None;
                }
                Some(TexturedResources::build(
                    ctx,
                    &self.uniforms,
                    layout,
                    sampler,
                    obj,
                    bitmap,
                ))
            }));
        }

        UploadReport {
            geometry,
            props,
            textured_built: self.textured.iter().flatten().count(),
            textured_released,
        }
    }

    /// Overwrites the viewport-size uniform.
    pub(crate) fn write_viewport(&self, queue: &wgpu::Queue, viewport: &DimensionsUniform) {
        queue.write_buffer(&self.uniforms.viewport, 0, bytemuck::bytes_of(viewport));
    }

    #[inline]
    pub(crate) fn primitive_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.primitive.bind_group.as_ref()
    }

    #[inline]
    pub(crate) fn textured_bind_group(&self, index: usize) -> Option<&wgpu::BindGroup> {
        self.textured.get(index)?.as_ref().map(|t| &t.bind_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Color, Rect};

    fn prim(x: f32, color: [f32; 4]) -> PrimitiveObject {
        PrimitiveObject::new("p", Rect::new(x, 0.0, 10.0, 20.0), Color::from_array(color))
    }

    fn floats_at(bytes: &[u8], offset: usize, n: usize) -> Vec<f32> {
        bytes[offset..offset + n * 4]
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn prop_record_layout() {
        assert_eq!(std::mem::size_of::<PropRecord>(), 8 * 4);
        assert_eq!(std::mem::offset_of!(PropRecord, color), PropRecord::COLOR_OFFSET);
        assert_eq!(std::mem::offset_of!(PropRecord, kind), PropRecord::KIND_OFFSET);
    }

    #[test]
    fn color_round_trips_at_documented_offset() {
        let target = [0.8, 0.8, 0.0, 1.0];

        for preceding in [0usize, 1, 5] {
            let mut prims: Vec<_> = (0..preceding).map(|i| prim(i as f32, [0.1; 4])).collect();
            prims.push(prim(99.0, target));

            let records = pack_props(&prims);
            let bytes: &[u8] = bytemuck::cast_slice(&records);
            let base = preceding * PROP_STRIDE;

            assert_eq!(bytes.len(), (preceding + 1) * PROP_STRIDE);
            assert_eq!(floats_at(bytes, base + PropRecord::COLOR_OFFSET, 4), target);

            let tag = &bytes[base + PropRecord::KIND_OFFSET..base + PropRecord::KIND_OFFSET + 4];
            assert_eq!(
                u32::from_le_bytes([tag[0], tag[1], tag[2], tag[3]]),
                ObjectKind::Primitive.tag()
            );
        }
    }

    #[test]
    fn geometry_rows_are_twelve_floats_in_registry_order() {
        let prims = [prim(0.0, [1.0; 4]), prim(100.0, [1.0; 4])];
        let rows = pack_geometry(&prims);
        let bytes: &[u8] = bytemuck::cast_slice(&rows);

        assert_eq!(bytes.len(), 2 * 12 * 4);
        assert_eq!(floats_at(bytes, 0, 2), [0.0, 0.0]);
        assert_eq!(floats_at(bytes, 48, 2), [100.0, 0.0]);
        assert_eq!(floats_at(bytes, 48 + 5 * 8, 2), [110.0, 20.0]);
    }

    #[test]
    fn same_count_rescene_reuses_both_buffers() {
        use crate::render::ExactSizeSlot;

        let first = [prim(0.0, [1.0; 4]), prim(1.0, [0.5; 4])];
        let second = [prim(7.0, [0.0; 4]), prim(8.0, [0.2; 4])];
        let third = [prim(7.0, [0.0; 4])];

        let mut geometry = ExactSizeSlot::new();
        let mut props = ExactSizeSlot::new();
        let mut upload = |prims: &[PrimitiveObject]| {
            let g = bytemuck::cast_slice::<_, u8>(&pack_geometry(prims)).len() as u64;
            let p = bytemuck::cast_slice::<_, u8>(&pack_props(prims)).len() as u64;
            (geometry.resolve(g), props.resolve(p))
        };

        assert_eq!(
            upload(&first[..]),
            (SlotAction::Allocate { size: 96 }, SlotAction::Allocate { size: 64 })
        );
        assert_eq!(upload(&second[..]), (SlotAction::Reuse, SlotAction::Reuse));
        assert_eq!(
            upload(&third[..]),
            (SlotAction::Allocate { size: 48 }, SlotAction::Allocate { size: 32 })
        );
        assert_eq!(upload(&third[..0]), (SlotAction::Release, SlotAction::Release));
    }

    #[test]
    fn texture_encoding_follows_surface() {
        assert_eq!(
            texture_format_for(wgpu::TextureFormat::Bgra8Unorm),
            wgpu::TextureFormat::Rgba8Unorm
        );
        assert_eq!(
            texture_format_for(wgpu::TextureFormat::Bgra8UnormSrgb),
            wgpu::TextureFormat::Rgba8UnormSrgb
        );
        assert_eq!(
            texture_format_for(wgpu::TextureFormat::Rgba8UnormSrgb),
            wgpu::TextureFormat::Rgba8UnormSrgb
        );
    }

    #[test]
    fn oversized_images_are_rejected_per_axis() {
        let max = wgpu::Limits::default().max_texture_dimension_2d;
        let at_limit = Bitmap::from_fn(max, 1, |_, _| [0; 4]);
        let too_wide = Bitmap::from_fn(max + 1, 1, |_, _| [0; 4]);
        let too_tall = Bitmap::from_fn(1, max + 1, |_, _| [0; 4]);

        assert!(fits_texture_limit(&at_limit, max));
        assert!(!fits_texture_limit(&too_wide, max));
        assert!(!fits_texture_limit(&too_tall, max));
        assert!(fits_texture_limit(&Bitmap::from_fn(64, 64, |_, _| [0; 4]), max));
    }
}
