use crate::paint::ColorRgba;

/// What happens to the color attachment when a pass begins.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ColorAction {
    Clear(ColorRgba),
    Load,
}

/// Load behavior for a render pass.
///
/// The depth attachment is always cleared to `depth_clear`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PassAction {
    pub color: ColorAction,
    pub depth_clear: f32,
}

impl PassAction {
    /// Clears color to `color` and depth to 1.
    pub fn clear(color: ColorRgba) -> Self {
        Self {
            color: ColorAction::Clear(color),
            depth_clear: 1.0,
        }
    }

    pub(crate) fn color_load_op(&self) -> wgpu::LoadOp<wgpu::Color> {
        match self.color {
            ColorAction::Clear(c) => wgpu::LoadOp::Clear(c.to_wgpu()),
            ColorAction::Load => wgpu::LoadOp::Load,
        }
    }
}

impl Default for PassAction {
    fn default() -> Self {
        Self::clear(ColorRgba::new(0.5, 0.5, 0.5, 1.0))
    }
}
