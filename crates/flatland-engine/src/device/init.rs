/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available. Off by default so colors
    /// written by the fragment programs reach the display unconverted.
    pub prefer_srgb: bool,

    /// Present mode. FIFO paces ticks to the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference; falls back to a supported mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Adapter power preference.
    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features. The builtin programs need none.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
