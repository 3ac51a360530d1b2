use super::cmd::{PrimitiveType, Vertex};

/// Handle to a pipeline created by [`Immediate::make_pipeline`](super::Immediate::make_pipeline).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PipelineId(u32);

impl PipelineId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DepthState {
    pub write_enabled: bool,
    pub compare: wgpu::CompareFunction,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            write_enabled: false,
            compare: wgpu::CompareFunction::Always,
        }
    }
}

/// Render state for a user pipeline.
///
/// Shader, vertex layout, color/depth formats and sample count are filled in
/// by the helper; only fixed-function state is configurable.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDesc {
    pub label: Option<String>,
    pub cull_mode: Option<wgpu::Face>,
    pub front_face: wgpu::FrontFace,
    pub depth: DepthState,
    pub blend: Option<wgpu::BlendState>,
    pub color_write_mask: wgpu::ColorWrites,
}

impl Default for PipelineDesc {
    fn default() -> Self {
        Self {
            label: None,
            cull_mode: None,
            front_face: wgpu::FrontFace::Ccw,
            depth: DepthState::default(),
            blend: None,
            color_write_mask: wgpu::ColorWrites::ALL,
        }
    }
}

/// Formats every helper pipeline renders into.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct TargetFormats {
    pub color: wgpu::TextureFormat,
    pub depth: wgpu::TextureFormat,
    pub sample_count: u32,
}

const TOPOLOGIES: [wgpu::PrimitiveTopology; 5] = [
    wgpu::PrimitiveTopology::PointList,
    wgpu::PrimitiveTopology::LineList,
    wgpu::PrimitiveTopology::LineStrip,
    wgpu::PrimitiveTopology::TriangleList,
    wgpu::PrimitiveTopology::TriangleStrip,
];

fn topology_slot(t: wgpu::PrimitiveTopology) -> usize {
    TOPOLOGIES.iter().position(|x| *x == t).unwrap_or(3)
}

/// One wgpu pipeline per topology, all sharing a [`PipelineDesc`].
pub(crate) struct PipelineSet {
    pipelines: Vec<wgpu::RenderPipeline>,
}

impl PipelineSet {
    pub(crate) fn build(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        layout: &wgpu::PipelineLayout,
        formats: TargetFormats,
        desc: &PipelineDesc,
    ) -> Self {
        let base_label = desc.label.as_deref().unwrap_or("imgl pipeline");

        let pipelines = TOPOLOGIES
            .iter()
            .map(|&topology| {
                let label = format!("{base_label} {topology:?}");
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(label.as_str()),
                    layout: Some(layout),

                    vertex: wgpu::VertexState {
                        module: shader,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &[Vertex::layout()],
                    },

                    fragment: Some(wgpu::FragmentState {
                        module: shader,
                        entry_point: Some("fs_main"),
                        compilation_options: Default::default(),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: formats.color,
                            blend: desc.blend,
                            write_mask: desc.color_write_mask,
                        })],
                    }),

                    primitive: wgpu::PrimitiveState {
                        topology,
                        strip_index_format: None,
                        front_face: desc.front_face,
                        cull_mode: desc.cull_mode,
                        polygon_mode: wgpu::PolygonMode::Fill,
                        unclipped_depth: false,
                        conservative: false,
                    },

                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: formats.depth,
                        depth_write_enabled: desc.depth.write_enabled,
                        depth_compare: desc.depth.compare,
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                    }),

                    multisample: wgpu::MultisampleState {
                        count: formats.sample_count,
                        mask: !0,
                        alpha_to_coverage_enabled: false,
                    },

                    multiview_mask: None,
                    cache: None,
                })
            })
            .collect();

        Self { pipelines }
    }

    pub(crate) fn get(&self, prim: PrimitiveType) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(topology_slot(prim.topology()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_desc_is_depth_always_without_culling() {
        let d = PipelineDesc::default();
        assert_eq!(d.cull_mode, None);
        assert_eq!(d.front_face, wgpu::FrontFace::Ccw);
        assert!(!d.depth.write_enabled);
        assert_eq!(d.depth.compare, wgpu::CompareFunction::Always);
    }

    #[test]
    fn every_primitive_has_a_slot() {
        let prims = [
            PrimitiveType::Points,
            PrimitiveType::Lines,
            PrimitiveType::LineStrip,
            PrimitiveType::Triangles,
            PrimitiveType::TriangleStrip,
            PrimitiveType::Quads,
        ];
        for p in prims {
            let slot = topology_slot(p.topology());
            assert_eq!(TOPOLOGIES[slot], p.topology());
        }
        assert_eq!(
            topology_slot(PrimitiveType::Quads.topology()),
            topology_slot(PrimitiveType::Triangles.topology())
        );
    }
}
