/// Depth format used by every pass and pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Offscreen attachments sized to the surface.
///
/// `msaa` is only present when the sample count is above 1; in that case it is
/// the color attachment and the swapchain image becomes the resolve target.
pub(crate) struct RenderTargets {
    msaa: Option<(wgpu::Texture, wgpu::TextureView)>,
    depth: (wgpu::Texture, wgpu::TextureView),
}

impl RenderTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let make = |label: &str, format: wgpu::TextureFormat| {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            (texture, view)
        };

        let msaa = (sample_count > 1).then(|| make("imgl msaa color", config.format));
        let depth = make("imgl depth", DEPTH_FORMAT);

        Self { msaa, depth }
    }

    pub(crate) fn msaa_view(&self) -> Option<&wgpu::TextureView> {
        self.msaa.as_ref().map(|(_, v)| v)
    }

    pub(crate) fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth.1
    }
}
