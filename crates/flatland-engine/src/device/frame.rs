/// Target image acquired for one tick plus the encoder recording into it.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// frame, so it must be handed to [`Gpu::submit`](super::Gpu::submit) promptly.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
