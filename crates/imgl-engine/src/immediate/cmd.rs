use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::device::{ImageId, SamplerId};

use super::PipelineId;

// ── vertex ────────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
    /// RGBA8 in memory order.
    pub rgba: u32,
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Unorm8x4];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    /// Unpacks `rgba` into `[r, g, b, a]` bytes.
    pub fn color_bytes(&self) -> [u8; 4] {
        self.rgba.to_le_bytes()
    }
}

#[inline]
pub(crate) fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

#[inline]
pub(crate) fn pack_rgbaf(r: f32, g: f32, b: f32, a: f32) -> u32 {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    pack_rgba(q(r), q(g), q(b), q(a))
}

// ── uniforms ──────────────────────────────────────────────────────────────

/// Per-draw uniform block: model-view-projection and texture matrices.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub mvp: [[f32; 4]; 4],
    pub tm: [[f32; 4]; 4],
}

pub(crate) const UNIFORM_SIZE: u64 = std::mem::size_of::<Uniforms>() as u64;

// ── primitives ────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    /// Expanded to a triangle list while recording.
    Quads,
}

impl PrimitiveType {
    pub(crate) fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveType::Points => wgpu::PrimitiveTopology::PointList,
            PrimitiveType::Lines => wgpu::PrimitiveTopology::LineList,
            PrimitiveType::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            PrimitiveType::Triangles | PrimitiveType::Quads => {
                wgpu::PrimitiveTopology::TriangleList
            }
            PrimitiveType::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }

    /// Strips cannot be concatenated without connecting them.
    pub(crate) fn mergeable(self) -> bool {
        !matches!(self, PrimitiveType::LineStrip | PrimitiveType::TriangleStrip)
    }
}

// ── commands ──────────────────────────────────────────────────────────────

/// Rectangle in framebuffer pixels, as recorded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    /// `false` means `y` counts up from the bottom edge.
    pub origin_top_left: bool,
}

impl Rect {
    /// `(x, y, w, h)` with a top-left origin, unclamped.
    fn top_left(self, target_h: u32) -> (i64, i64, i64, i64) {
        let (x, w, h) = (self.x as i64, self.w as i64, self.h as i64);
        let y = if self.origin_top_left {
            self.y as i64
        } else {
            target_h as i64 - (self.y as i64 + h)
        };
        (x, y, w, h)
    }

    /// Visible part of the rect on a `target_w × target_h` framebuffer, top-left
    /// based. `None` when nothing of the rect is left.
    pub fn to_target(self, target_w: u32, target_h: u32) -> Option<(u32, u32, u32, u32)> {
        let (tw, th) = (target_w as i64, target_h as i64);
        let (x, y, w, h) = self.top_left(target_h);

        let x0 = x.clamp(0, tw);
        let y0 = y.clamp(0, th);
        let x1 = (x + w).clamp(0, tw);
        let y1 = (y + h).clamp(0, th);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }

    /// Clip-space transform that maps this rect, used as a viewport, onto its
    /// visible part from [`to_target`](Self::to_target).
    ///
    /// Premultiplied onto a draw's `mvp`, it keeps geometry at the size and
    /// position of the full rect; the off-screen part is clipped rather than
    /// squeezed in. `None` when the rect is fully visible or fully hidden.
    pub fn clip_transform(self, target_w: u32, target_h: u32) -> Option<Mat4> {
        let (cx, cy, cw, ch) = self.to_target(target_w, target_h)?;
        let (rx, ry, rw, rh) = self.top_left(target_h);
        if (rx, ry, rw, rh) == (cx as i64, cy as i64, cw as i64, ch as i64) {
            return None;
        }

        let (cw, ch) = (cw as f32, ch as f32);
        let sx = rw as f32 / cw;
        let sy = rh as f32 / ch;
        // NDC x grows right with pixels, NDC y grows up against them.
        let ox = sx - 1.0 + 2.0 * (rx - cx as i64) as f32 / cw;
        let oy = 1.0 - sy - 2.0 * (ry - cy as i64) as f32 / ch;

        Some(Mat4::from_cols(
            Vec4::new(sx, 0.0, 0.0, 0.0),
            Vec4::new(0.0, sy, 0.0, 0.0),
            Vec4::Z,
            Vec4::new(ox, oy, 0.0, 1.0),
        ))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureBinding {
    pub image: ImageId,
    pub sampler: SamplerId,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawArgs {
    pub pipeline: PipelineId,
    pub primitive: PrimitiveType,
    /// `None` samples the built-in white texture.
    pub texture: Option<TextureBinding>,
    pub uniform_index: u32,
    pub base_vertex: u32,
    pub num_vertices: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Viewport(Rect),
    Scissor(Rect),
    Draw(DrawArgs),
}
