use anyhow::{Context, Result};
use imgl_engine::device::Gpu;
use imgl_engine::immediate::{DepthState, Immediate, PipelineDesc, PipelineId};

/// Back-face culling with a less-or-equal depth test that writes depth.
pub fn pipeline_3d_desc() -> PipelineDesc {
    PipelineDesc {
        label: Some("imgl demo 3d".to_string()),
        cull_mode: Some(wgpu::Face::Back),
        depth: DepthState {
            write_enabled: true,
            compare: wgpu::CompareFunction::LessEqual,
        },
        ..PipelineDesc::default()
    }
}

pub fn make_pipeline_3d(imm: &mut Immediate, gpu: &Gpu<'_>) -> Result<PipelineId> {
    imm.make_pipeline(gpu, &pipeline_3d_desc())
        .context("failed to create 3d pipeline")
}
