use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::resources::Pool;
use super::surface;
use super::targets::{RenderTargets, DEPTH_FORMAT};
use super::{GpuFrame, GpuInit, ImageDesc, ImageId, SamplerDesc, SamplerId, SurfaceErrorAction};

struct ImageEntry {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Owns the wgpu device, the window surface and the resources created
/// through it.
///
/// The surface borrows the window for `'w`; the runtime keeps both in one
/// self-referencing entry so the window always outlives this value.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    /// Drawable size in physical pixels. May be zero while minimized.
    size: PhysicalSize<u32>,

    sample_count: u32,
    targets: RenderTargets,

    images: Pool<ImageEntry>,
    samplers: Pool<wgpu::Sampler>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
            sample_count,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("imgl device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, prefer_srgb)
            .context("no supported surface formats")?;
        let alpha_mode = surface::choose_alpha_mode(&caps, alpha_mode);
        let sample_count =
            surface::choose_sample_count(&adapter, format, DEPTH_FORMAT, sample_count);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let targets = RenderTargets::new(&device, &config, sample_count);

        let info = adapter.get_info();
        log::info!(
            "gpu ready: {} ({:?}), {format:?}, {}x{}, {sample_count}x MSAA",
            info.name,
            info.backend,
            size.width,
            size.height,
        );

        Ok(Self {
            surface,
            adapter,
            device,
            queue,
            config,
            size,
            sample_count,
            targets,
            images: Pool::new(),
            samplers: Pool::new(),
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        DEPTH_FORMAT
    }

    /// Effective MSAA sample count, after adapter fallback.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Current drawable size in physical pixels.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Reconfigures the surface and rebuilds the MSAA and depth targets.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let configured = surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
        if configured {
            self.targets = RenderTargets::new(&self.device, &self.config, self.sample_count);
            log::debug!("surface resized to {}x{}", new_size.width, new_size.height);
        }
    }

    // ── resources ───────────────────────────────────────────────────────

    /// Uploads an immutable single-mip RGBA8 image.
    pub fn make_image(&mut self, desc: &ImageDesc<'_>) -> Result<ImageId> {
        anyhow::ensure!(
            desc.width > 0 && desc.height > 0,
            "image size must be non-zero, got {}x{}",
            desc.width,
            desc.height
        );
        anyhow::ensure!(
            desc.data.len() == desc.expected_len(),
            "image data is {} bytes, expected {} for {}x{} RGBA8",
            desc.data.len(),
            desc.expected_len(),
            desc.width,
            desc.height
        );

        let texture = self.device.create_texture_with_data(
            &self.queue,
            &wgpu::TextureDescriptor {
                label: desc.label,
                size: wgpu::Extent3d {
                    width: desc.width,
                    height: desc.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            desc.data,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let id = self
            .images
            .insert(ImageEntry { texture, view })
            .map_err(|_| anyhow::anyhow!("image pool exhausted"))?;

        log::debug!("image {id} created ({}x{})", desc.width, desc.height);
        Ok(ImageId::from_raw(id))
    }

    pub fn make_sampler(&mut self, desc: &SamplerDesc<'_>) -> Result<SamplerId> {
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: desc.label,
            address_mode_u: desc.wrap_u,
            address_mode_v: desc.wrap_v,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: desc.mag_filter,
            min_filter: desc.min_filter,
            mipmap_filter: desc.mipmap_filter,
            ..Default::default()
        });

        let id = self
            .samplers
            .insert(sampler)
            .map_err(|_| anyhow::anyhow!("sampler pool exhausted"))?;
        Ok(SamplerId::from_raw(id))
    }

    /// Releases an image. Returns `false` if the handle was already gone.
    pub fn destroy_image(&mut self, id: ImageId) -> bool {
        match self.images.remove(id.raw()) {
            Some(entry) => {
                entry.texture.destroy();
                true
            }
            None => {
                log::warn!("destroy_image: unknown image {}", id.raw());
                false
            }
        }
    }

    /// Releases a sampler. Returns `false` if the handle was already gone.
    pub fn destroy_sampler(&mut self, id: SamplerId) -> bool {
        let found = self.samplers.remove(id.raw()).is_some();
        if !found {
            log::warn!("destroy_sampler: unknown sampler {}", id.raw());
        }
        found
    }

    pub fn image_view(&self, id: ImageId) -> Option<&wgpu::TextureView> {
        self.images.get(id.raw()).map(|e| &e.view)
    }

    pub fn sampler(&self, id: SamplerId) -> Option<&wgpu::Sampler> {
        self.samplers.get(id.raw())
    }

    pub fn has_image(&self, id: ImageId) -> bool {
        self.images.contains(id.raw())
    }

    pub fn has_sampler(&self, id: SamplerId) -> bool {
        self.samplers.contains(id.raw())
    }

    /// Releases every image and sampler still alive.
    pub fn release_resources(&mut self) {
        let images = self.images.len();
        for entry in self.images.drain() {
            entry.texture.destroy();
        }
        let samplers = self.samplers.drain().count();
        if images + samplers > 0 {
            log::debug!("released {images} images and {samplers} samplers");
        }
    }

    // ── frames ──────────────────────────────────────────────────────────

    /// Acquires the next swapchain image and creates an encoder for it.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame<'_>, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("imgl frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
            msaa_view: self.targets.msaa_view(),
            depth_view: self.targets.depth_view(),
        })
    }

    /// Submits the frame's commands and presents its image.
    pub fn submit(&self, frame: GpuFrame<'_>) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
            ..
        } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Maps a frame-acquisition failure to the action the loop should take.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }
}
