use anyhow::Result;
use imgl_engine::device::{Gpu, ImageId, PassAction, SamplerId};
use imgl_engine::immediate::{Immediate, PipelineId};
use imgl_engine::paint::ColorRgba;

use crate::pipeline::make_pipeline_3d;
use crate::texture::make_checkerboard;

/// GPU handles created once in `init` and released once in `cleanup`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppState {
    pub pass_action: PassAction,
    pub img: ImageId,
    pub smp: SamplerId,
    pub pip_3d: PipelineId,
}

impl AppState {
    pub fn create(gpu: &mut Gpu<'_>, imm: &mut Immediate) -> Result<Self> {
        let (img, smp) = make_checkerboard(gpu)?;
        let pip_3d = make_pipeline_3d(imm, gpu)?;

        Ok(Self {
            pass_action: PassAction::clear(ColorRgba::BLACK),
            img,
            smp,
            pip_3d,
        })
    }

    /// Consumes the handles so they cannot be released twice.
    pub fn release(self, gpu: &mut Gpu<'_>, imm: &mut Immediate) {
        imm.destroy_pipeline(self.pip_3d);
        gpu.destroy_sampler(self.smp);
        gpu.destroy_image(self.img);
    }
}
