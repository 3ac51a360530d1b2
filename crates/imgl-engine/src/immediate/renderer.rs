use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;

use crate::device::{Gpu, Pool};

use super::cmd::{Command, TextureBinding, Uniforms, Vertex, UNIFORM_SIZE};
use super::pipeline::{PipelineSet, TargetFormats};
use super::replay::{plan, PassOp};
use super::{ImmediateError, PipelineDesc, PipelineId, Recorder, RecorderDesc};

/// Helper configuration.
///
/// Formats and sample count default to whatever the [`Gpu`] renders with.
#[derive(Debug, Clone, Copy)]
pub struct ImmediateDesc {
    pub max_vertices: usize,
    pub max_commands: usize,
    pub pipeline_pool_size: usize,
    pub color_format: Option<wgpu::TextureFormat>,
    pub depth_format: Option<wgpu::TextureFormat>,
    pub sample_count: Option<u32>,
}

impl Default for ImmediateDesc {
    fn default() -> Self {
        let rec = RecorderDesc::default();
        Self {
            max_vertices: rec.max_vertices,
            max_commands: rec.max_commands,
            pipeline_pool_size: 64,
            color_format: None,
            depth_format: None,
            sample_count: None,
        }
    }
}

/// Rounds `size` up to a multiple of `align` (a power of two).
fn align_to(size: u64, align: u64) -> u64 {
    let align = align.max(1);
    size.div_ceil(align) * align
}

/// GPU side of the immediate-mode helper.
///
/// Derefs to its [`Recorder`], so recording calls go straight through:
/// `imm.begin_quads()`, `imm.v2f_c3b(..)`, `imm.end()`.
pub struct Immediate {
    recorder: Recorder,
    formats: TargetFormats,

    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    texture_bgl: wgpu::BindGroupLayout,
    pipelines: Pool<PipelineSet>,
    default_pipeline: PipelineId,

    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    uniform_staging: Vec<u8>,

    white_texture: wgpu::Texture,
    white_bind_group: wgpu::BindGroup,
    bind_groups: HashMap<TextureBinding, wgpu::BindGroup>,

}

impl Deref for Immediate {
    type Target = Recorder;

    fn deref(&self) -> &Recorder {
        &self.recorder
    }
}

impl DerefMut for Immediate {
    fn deref_mut(&mut self) -> &mut Recorder {
        &mut self.recorder
    }
}

impl Immediate {
    pub fn new(gpu: &Gpu<'_>, desc: ImmediateDesc) -> Result<Self> {
        anyhow::ensure!(desc.max_vertices > 0, "max_vertices must be non-zero");
        anyhow::ensure!(desc.max_commands > 0, "max_commands must be non-zero");
        anyhow::ensure!(desc.pipeline_pool_size > 0, "pipeline_pool_size must be non-zero");

        let device = gpu.device();
        let formats = TargetFormats {
            color: desc.color_format.unwrap_or(gpu.surface_format()),
            depth: desc.depth_format.unwrap_or(gpu.depth_format()),
            sample_count: desc.sample_count.unwrap_or(gpu.sample_count()),
        };

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("imgl immediate shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/immediate.wgsl").into()),
        });

        let uniform_size =
            wgpu::BufferSize::new(UNIFORM_SIZE).context("uniform block has zero size")?;

        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("imgl immediate uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: Some(uniform_size),
                },
                count: None,
            }],
        });

        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("imgl immediate texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("imgl immediate pipeline layout"),
            bind_group_layouts: &[&uniform_bgl, &texture_bgl],
            immediate_size: 0,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("imgl immediate vbo"),
            size: (desc.max_vertices * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_stride = align_to(
            UNIFORM_SIZE,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("imgl immediate ubo"),
            // Recorded blocks plus one clip-adjusted copy per draw.
            size: 2 * desc.max_commands as u64 * uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("imgl immediate uniform bind group"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: Some(uniform_size),
                }),
            }],
        });

        // Sampled when texturing is off, so untextured draws keep their color.
        let white_texture = device.create_texture_with_data(
            gpu.queue(),
            &wgpu::TextureDescriptor {
                label: Some("imgl immediate white texture"),
                size: wgpu::Extent3d {
                    width: 1,
                    height: 1,
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
            &[255, 255, 255, 255],
        );
        let white_view = white_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let white_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("imgl immediate white sampler"),
            ..Default::default()
        });
        let white_bind_group =
            make_texture_bind_group(device, &texture_bgl, &white_view, &white_sampler);

        let mut pipelines = Pool::with_limit(desc.pipeline_pool_size);
        let default_set = PipelineSet::build(
            device,
            &shader,
            &pipeline_layout,
            formats,
            &PipelineDesc {
                label: Some("imgl default pipeline".into()),
                ..PipelineDesc::default()
            },
        );
        let default_pipeline = pipelines
            .insert(default_set)
            .map(PipelineId::from_raw)
            .map_err(|_| anyhow::anyhow!("pipeline pool cannot hold the default pipeline"))?;

        let recorder = Recorder::new(
            RecorderDesc {
                max_vertices: desc.max_vertices,
                max_commands: desc.max_commands,
            },
            default_pipeline,
        );

        log::info!(
            "immediate helper ready: {} vertices, {} commands, {:?}/{:?} x{}",
            desc.max_vertices,
            desc.max_commands,
            formats.color,
            formats.depth,
            formats.sample_count,
        );

        Ok(Self {
            recorder,
            formats,
            shader,
            pipeline_layout,
            texture_bgl,
            pipelines,
            default_pipeline,
            vertex_buffer,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            uniform_staging: Vec::new(),
            white_texture,
            white_bind_group,
            bind_groups: HashMap::new(),
        })
    }

    // ── pipelines ───────────────────────────────────────────────────────

    /// Builds a pipeline from fixed-function state. Shader, vertex layout,
    /// formats and sample count come from the helper.
    pub fn make_pipeline(&mut self, gpu: &Gpu<'_>, desc: &PipelineDesc) -> Result<PipelineId> {
        let set = PipelineSet::build(
            gpu.device(),
            &self.shader,
            &self.pipeline_layout,
            self.formats,
            desc,
        );
        let id = self.pipelines.insert(set).map_err(|_| {
            anyhow::anyhow!("pipeline pool exhausted ({} in use)", self.pipelines.len())
        })?;
        log::debug!("immediate pipeline {id} created");
        Ok(PipelineId::from_raw(id))
    }

    /// Destroys a user pipeline. The default pipeline cannot be destroyed.
    pub fn destroy_pipeline(&mut self, id: PipelineId) -> bool {
        if id == self.default_pipeline {
            log::warn!("destroy_pipeline: refusing to destroy the default pipeline");
            return false;
        }
        let found = self.pipelines.remove(id.raw()).is_some();
        if !found {
            log::warn!("destroy_pipeline: unknown pipeline {}", id.raw());
        }
        found
    }

    // ── flush ───────────────────────────────────────────────────────────

    /// Uploads everything recorded since the last call, replays it into
    /// `pass` and rewinds the recorder. Call once per frame.
    pub fn draw(&mut self, gpu: &Gpu<'_>, pass: &mut wgpu::RenderPass<'_>) {
        let mut frame_error = self.recorder.error();
        if let Some(err) = frame_error {
            log::warn!("immediate: {err}; frame truncated");
        }

        let size = gpu.size();
        let (tw, th) = (size.width, size.height);
        let replay = plan(
            self.recorder.commands(),
            self.recorder.uniforms(),
            tw,
            th,
        );

        self.upload(gpu, &replay.uniforms);
        self.prepare_bind_groups(gpu);

        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_viewport(0.0, 0.0, tw as f32, th as f32, 0.0, 1.0);
        pass.set_scissor_rect(0, 0, tw, th);

        let mut bound: Option<(PipelineId, wgpu::PrimitiveTopology)> = None;
        let mut draw_calls = 0u32;

        for op in &replay.ops {
            match *op {
                PassOp::Viewport { x, y, w, h } => {
                    pass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);
                }
                PassOp::Scissor { x, y, w, h } => pass.set_scissor_rect(x, y, w, h),
                PassOp::Draw { args, uniform_index } => {
                    let Some(pipeline) = self
                        .pipelines
                        .get(args.pipeline.raw())
                        .and_then(|set| set.get(args.primitive))
                    else {
                        if frame_error.is_none() {
                            log::warn!("immediate: {}", ImmediateError::NoPipeline);
                            frame_error = Some(ImmediateError::NoPipeline);
                        }
                        continue;
                    };

                    let key = (args.pipeline, args.primitive.topology());
                    if bound != Some(key) {
                        pass.set_pipeline(pipeline);
                        bound = Some(key);
                    }

                    let offset = (uniform_index as u64 * self.uniform_stride) as u32;
                    pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);

                    let texture_bg = args
                        .texture
                        .and_then(|t| self.bind_groups.get(&t))
                        .unwrap_or(&self.white_bind_group);
                    pass.set_bind_group(1, texture_bg, &[]);

                    let first = args.base_vertex;
                    pass.draw(first..first + args.num_vertices, 0..1);
                    draw_calls += 1;
                }
            }
        }

        log::trace!(
            "immediate: {} vertices, {} commands, {draw_calls} draw calls",
            self.recorder.vertices().len(),
            self.recorder.commands().len(),
        );

        self.recorder.rewind();
    }

    fn upload(&mut self, gpu: &Gpu<'_>, uniforms: &[Uniforms]) {
        let vertices = self.recorder.vertices();
        if !vertices.is_empty() {
            gpu.queue()
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }

        if uniforms.is_empty() {
            return;
        }
        let stride = self.uniform_stride as usize;
        self.uniform_staging.clear();
        self.uniform_staging.resize(uniforms.len() * stride, 0);
        for (i, u) in uniforms.iter().enumerate() {
            let bytes = bytemuck::bytes_of::<Uniforms>(u);
            self.uniform_staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        gpu.queue()
            .write_buffer(&self.uniform_buffer, 0, &self.uniform_staging);
    }

    /// Drops bind groups whose image or sampler is gone and creates the ones
    /// this frame's draws need.
    fn prepare_bind_groups(&mut self, gpu: &Gpu<'_>) {
        self.bind_groups
            .retain(|t, _| gpu.has_image(t.image) && gpu.has_sampler(t.sampler));

        for cmd in self.recorder.commands() {
            let Command::Draw(args) = cmd else { continue };
            let Some(binding) = args.texture else { continue };
            if self.bind_groups.contains_key(&binding) {
                continue;
            }
            let (Some(view), Some(sampler)) =
                (gpu.image_view(binding.image), gpu.sampler(binding.sampler))
            else {
                log::debug!(
                    "immediate: texture {}/{} not found, drawing untextured",
                    binding.image.raw(),
                    binding.sampler.raw()
                );
                continue;
            };
            let bg = make_texture_bind_group(gpu.device(), &self.texture_bgl, view, sampler);
            self.bind_groups.insert(binding, bg);
        }
    }

    /// Releases the helper's GPU objects. User pipelines still alive are
    /// dropped with it.
    pub fn shutdown(mut self) {
        let leaked = self.pipelines.len().saturating_sub(1);
        if leaked > 0 {
            log::debug!("immediate shutdown: {leaked} user pipelines still alive");
        }
        self.pipelines.drain().for_each(drop);
        self.bind_groups.clear();
        self.white_texture.destroy();
        self.vertex_buffer.destroy();
        self.uniform_buffer.destroy();
        log::info!("immediate helper shut down");
    }
}

fn make_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("imgl immediate texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
