use super::PassAction;

/// A single acquired swapchain image plus the encoder recording into it.
///
/// Short-lived: holding it blocks acquisition of the next image. Hand it back
/// through [`Gpu::submit`](super::Gpu::submit) to present.
pub struct GpuFrame<'a> {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
    pub(crate) msaa_view: Option<&'a wgpu::TextureView>,
    pub(crate) depth_view: &'a wgpu::TextureView,
}

impl GpuFrame<'_> {
    /// Opens the frame's render pass.
    ///
    /// With MSAA the multisampled target is rendered and resolved into the
    /// swapchain image at the end of the pass.
    pub fn begin_pass(&mut self, action: &PassAction) -> wgpu::RenderPass<'_> {
        let (view, resolve_target) = match self.msaa_view {
            Some(msaa) => (msaa, Some(&self.view)),
            None => (&self.view, None),
        };

        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imgl pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations {
                    load: action.color_load_op(),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(action.depth_clear),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}
