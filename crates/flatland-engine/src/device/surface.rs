use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = caps.formats.first().copied()?;

    Some(
        caps.formats
            .iter()
            .copied()
            .find(|f| f.is_srgb() == prefer_srgb)
            .unwrap_or(first),
    )
}

/// Size the surface is first configured with. wgpu rejects zero extents, so
/// a window that starts minimized gets a 1×1 surface until its first resize.
pub(crate) fn initial_surface_size(size: PhysicalSize<u32>) -> PhysicalSize<u32> {
    PhysicalSize::new(size.width.max(1), size.height.max(1))
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Reconfigures the surface for `new_size`.
///
/// Returns `true` when the surface was reconfigured. Unchanged sizes are a
/// no-op; zero-area sizes are recorded but configuration is deferred since
/// wgpu rejects them.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) -> bool {
    if *size == new_size {
        return false;
    }

    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return false;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
    true
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: &[wgpu::TextureFormat]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn default_init_renders_authored_colors_unconverted() {
        let c = caps(&[
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Bgra8Unorm,
        ]);
        let chosen = choose_surface_format(&c, crate::device::GpuInit::default().prefer_srgb);
        assert_eq!(chosen, Some(wgpu::TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn srgb_preference_is_honored_when_available() {
        let c = caps(&[
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ]);
        assert_eq!(
            choose_surface_format(&c, true),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn falls_back_to_first_format() {
        let c = caps(&[wgpu::TextureFormat::Rgba16Float]);
        assert_eq!(
            choose_surface_format(&c, false),
            Some(wgpu::TextureFormat::Rgba16Float)
        );
        assert_eq!(choose_surface_format(&caps(&[]), false), None);
    }

    #[test]
    fn zero_extent_window_gets_minimal_surface() {
        assert_eq!(initial_surface_size(PhysicalSize::new(0, 0)), PhysicalSize::new(1, 1));
        assert_eq!(initial_surface_size(PhysicalSize::new(0, 480)), PhysicalSize::new(1, 480));
        assert_eq!(
            initial_surface_size(PhysicalSize::new(800, 600)),
            PhysicalSize::new(800, 600)
        );
    }
}
