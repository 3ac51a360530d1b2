use glam::{Mat4, Vec3};

use crate::device::{ImageId, SamplerId};

use super::cmd::{
    pack_rgba, pack_rgbaf, Command, DrawArgs, PrimitiveType, Rect, TextureBinding, Uniforms,
    Vertex,
};
use super::matrix::{self, MatrixMode, MatrixStacks};
use super::{ImmediateError, PipelineId};

/// Depth of the pipeline stack, including the bottom entry.
pub const MAX_PIPELINE_STACK_DEPTH: usize = 32;

const WHITE: u32 = 0xFFFF_FFFF;

/// Capacity of one frame's recording.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RecorderDesc {
    pub max_vertices: usize,
    /// Also bounds the number of distinct uniform blocks per frame.
    pub max_commands: usize,
}

impl Default for RecorderDesc {
    fn default() -> Self {
        Self {
            max_vertices: 65536,
            max_commands: 16384,
        }
    }
}

/// CPU side of the immediate-mode helper.
///
/// Records vertices, uniforms and commands for one frame. Drawing state
/// (matrices, color, texture, pipeline) persists across frames until changed
/// or reset with [`defaults`](Self::defaults); the recorded arrays are cleared
/// by [`rewind`](Self::rewind).
#[derive(Debug)]
pub struct Recorder {
    vertices: Vec<Vertex>,
    commands: Vec<Command>,
    uniforms: Vec<Uniforms>,
    max_vertices: usize,
    max_commands: usize,

    rgba: u32,
    uv: [f32; 2],
    primitive: Option<PrimitiveType>,
    base_vertex: usize,
    vtx_count: u32,

    texture_enabled: bool,
    texture: Option<TextureBinding>,

    matrices: MatrixStacks,
    matrix_mode: MatrixMode,
    matrix_dirty: bool,

    default_pipeline: PipelineId,
    pipelines: Vec<PipelineId>,

    error: Option<ImmediateError>,
}

impl Recorder {
    pub fn new(desc: RecorderDesc, default_pipeline: PipelineId) -> Self {
        let mut pipelines = Vec::with_capacity(MAX_PIPELINE_STACK_DEPTH);
        pipelines.push(default_pipeline);

        Self {
            vertices: Vec::with_capacity(desc.max_vertices),
            commands: Vec::with_capacity(desc.max_commands),
            uniforms: Vec::new(),
            max_vertices: desc.max_vertices,
            max_commands: desc.max_commands,
            rgba: WHITE,
            uv: [0.0, 0.0],
            primitive: None,
            base_vertex: 0,
            vtx_count: 0,
            texture_enabled: false,
            texture: None,
            matrices: MatrixStacks::new(),
            matrix_mode: MatrixMode::ModelView,
            matrix_dirty: true,
            default_pipeline,
            pipelines,
            error: None,
        }
    }

    // ── inspection ──────────────────────────────────────────────────────

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn uniforms(&self) -> &[Uniforms] {
        &self.uniforms
    }

    /// First error raised since the last rewind.
    pub fn error(&self) -> Option<ImmediateError> {
        self.error
    }

    /// Pipeline on top of the pipeline stack.
    pub fn pipeline(&self) -> PipelineId {
        self.pipelines.last().copied().unwrap_or(self.default_pipeline)
    }

    pub fn default_pipeline(&self) -> PipelineId {
        self.default_pipeline
    }

    pub fn matrix(&self, mode: MatrixMode) -> Mat4 {
        self.matrices.top(mode)
    }

    pub fn matrix_mode(&self) -> MatrixMode {
        self.matrix_mode
    }

    pub fn texture_enabled(&self) -> bool {
        self.texture_enabled
    }

    /// Current sticky color as `[r, g, b, a]` bytes.
    pub fn color(&self) -> [u8; 4] {
        self.rgba.to_le_bytes()
    }

    /// Clears everything recorded this frame, including the error flag.
    pub fn rewind(&mut self) {
        self.vertices.clear();
        self.commands.clear();
        self.uniforms.clear();
        self.primitive = None;
        self.base_vertex = 0;
        self.vtx_count = 0;
        self.matrix_dirty = true;
        self.error = None;
    }

    fn raise(&mut self, err: ImmediateError) {
        if self.error.is_none() {
            log::debug!("immediate: {err}");
            self.error = Some(err);
        }
    }

    // ── render state ────────────────────────────────────────────────────

    /// Identity matrices, white color, texturing off, default pipeline.
    pub fn defaults(&mut self) {
        self.rgba = WHITE;
        self.uv = [0.0, 0.0];
        self.texture_enabled = false;
        self.texture = None;
        self.matrix_mode = MatrixMode::ModelView;
        self.matrices.reset();
        self.matrix_dirty = true;
        self.load_default_pipeline();
    }

    pub fn viewport(&mut self, x: i32, y: i32, w: i32, h: i32, origin_top_left: bool) {
        self.push_state(Command::Viewport(Rect { x, y, w, h, origin_top_left }));
    }

    pub fn scissor_rect(&mut self, x: i32, y: i32, w: i32, h: i32, origin_top_left: bool) {
        self.push_state(Command::Scissor(Rect { x, y, w, h, origin_top_left }));
    }

    fn push_state(&mut self, cmd: Command) {
        if self.commands.len() >= self.max_commands {
            self.raise(ImmediateError::CommandsFull);
            return;
        }
        self.commands.push(cmd);
    }

    pub fn enable_texture(&mut self) {
        self.texture_enabled = true;
    }

    pub fn disable_texture(&mut self) {
        self.texture_enabled = false;
    }

    pub fn texture(&mut self, image: ImageId, sampler: SamplerId) {
        self.texture = Some(TextureBinding { image, sampler });
    }

    fn active_texture(&self) -> Option<TextureBinding> {
        self.texture.filter(|_| self.texture_enabled)
    }

    // ── pipelines ───────────────────────────────────────────────────────

    pub fn load_pipeline(&mut self, pipeline: PipelineId) {
        match self.pipelines.last_mut() {
            Some(top) => *top = pipeline,
            None => self.pipelines.push(pipeline),
        }
    }

    pub fn load_default_pipeline(&mut self) {
        self.load_pipeline(self.default_pipeline);
    }

    pub fn push_pipeline(&mut self) {
        if self.pipelines.len() >= MAX_PIPELINE_STACK_DEPTH {
            self.raise(ImmediateError::StackOverflow);
            return;
        }
        let top = self.pipeline();
        self.pipelines.push(top);
    }

    pub fn pop_pipeline(&mut self) {
        if self.pipelines.len() <= 1 {
            self.raise(ImmediateError::StackUnderflow);
            return;
        }
        self.pipelines.pop();
    }

    // ── matrices ────────────────────────────────────────────────────────

    pub fn matrix_mode_modelview(&mut self) {
        self.matrix_mode = MatrixMode::ModelView;
    }

    pub fn matrix_mode_projection(&mut self) {
        self.matrix_mode = MatrixMode::Projection;
    }

    pub fn matrix_mode_texture(&mut self) {
        self.matrix_mode = MatrixMode::Texture;
    }

    fn set_top(&mut self, m: Mat4) {
        *self.matrices.top_mut(self.matrix_mode) = m;
        self.matrix_dirty = true;
    }

    fn mul_top(&mut self, m: Mat4) {
        let top = self.matrices.top(self.matrix_mode);
        self.set_top(top * m);
    }

    pub fn load_identity(&mut self) {
        self.set_top(Mat4::IDENTITY);
    }

    /// Replaces the current matrix with a column-major array.
    pub fn load_matrix(&mut self, m: &[f32; 16]) {
        self.set_top(Mat4::from_cols_array(m));
    }

    /// Like [`load_matrix`](Self::load_matrix) but `m` is row-major.
    pub fn load_transpose_matrix(&mut self, m: &[f32; 16]) {
        self.set_top(Mat4::from_cols_array(m).transpose());
    }

    pub fn mult_matrix(&mut self, m: &[f32; 16]) {
        self.mul_top(Mat4::from_cols_array(m));
    }

    pub fn mult_transpose_matrix(&mut self, m: &[f32; 16]) {
        self.mul_top(Mat4::from_cols_array(m).transpose());
    }

    /// `angle` in radians.
    pub fn rotate(&mut self, angle: f32, x: f32, y: f32, z: f32) {
        self.mul_top(matrix::rotation(angle, x, y, z));
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.mul_top(Mat4::from_scale(Vec3::new(x, y, z)));
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.mul_top(Mat4::from_translation(Vec3::new(x, y, z)));
    }

    pub fn frustum(&mut self, l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) {
        self.mul_top(matrix::frustum(l, r, b, t, n, f));
    }

    pub fn ortho(&mut self, l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) {
        self.mul_top(matrix::ortho(l, r, b, t, n, f));
    }

    /// `fovy` in radians.
    pub fn perspective(&mut self, fovy: f32, aspect: f32, z_near: f32, z_far: f32) {
        self.mul_top(matrix::perspective(fovy, aspect, z_near, z_far));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn lookat(
        &mut self,
        eye_x: f32,
        eye_y: f32,
        eye_z: f32,
        center_x: f32,
        center_y: f32,
        center_z: f32,
        up_x: f32,
        up_y: f32,
        up_z: f32,
    ) {
        self.mul_top(matrix::lookat(
            Vec3::new(eye_x, eye_y, eye_z),
            Vec3::new(center_x, center_y, center_z),
            Vec3::new(up_x, up_y, up_z),
        ));
    }

    pub fn push_matrix(&mut self) {
        if let Err(e) = self.matrices.push(self.matrix_mode) {
            self.raise(e);
        }
    }

    pub fn pop_matrix(&mut self) {
        match self.matrices.pop(self.matrix_mode) {
            Ok(()) => self.matrix_dirty = true,
            Err(e) => self.raise(e),
        }
    }

    // ── primitives ──────────────────────────────────────────────────────

    pub fn begin_points(&mut self) {
        self.begin(PrimitiveType::Points);
    }

    pub fn begin_lines(&mut self) {
        self.begin(PrimitiveType::Lines);
    }

    pub fn begin_line_strip(&mut self) {
        self.begin(PrimitiveType::LineStrip);
    }

    pub fn begin_triangles(&mut self) {
        self.begin(PrimitiveType::Triangles);
    }

    pub fn begin_triangle_strip(&mut self) {
        self.begin(PrimitiveType::TriangleStrip);
    }

    pub fn begin_quads(&mut self) {
        self.begin(PrimitiveType::Quads);
    }

    fn begin(&mut self, prim: PrimitiveType) {
        if self.primitive.is_some() {
            log::debug!("immediate: begin inside begin/end, closing previous primitive");
            self.end();
        }
        self.primitive = Some(prim);
        self.base_vertex = self.vertices.len();
        self.vtx_count = 0;
    }

    /// Closes the current primitive and records (or extends) a draw command.
    pub fn end(&mut self) {
        let Some(primitive) = self.primitive.take() else {
            log::debug!("immediate: end without begin");
            return;
        };
        let base = self.base_vertex;
        let num = self.vertices.len() - base;
        self.vtx_count = 0;
        if num == 0 {
            return;
        }

        let Some(uniform_index) = self.current_uniform() else {
            self.vertices.truncate(base);
            self.raise(ImmediateError::CommandsFull);
            return;
        };

        let args = DrawArgs {
            pipeline: self.pipeline(),
            primitive,
            texture: self.active_texture(),
            uniform_index,
            base_vertex: base as u32,
            num_vertices: num as u32,
        };

        if let Some(Command::Draw(prev)) = self.commands.last_mut() {
            if can_merge(prev, &args) {
                prev.num_vertices += args.num_vertices;
                return;
            }
        }

        if self.commands.len() >= self.max_commands {
            self.vertices.truncate(base);
            self.raise(ImmediateError::CommandsFull);
            return;
        }
        self.commands.push(Command::Draw(args));
    }

    /// Index of the uniform block for the current matrices, appending a new
    /// block only when a matrix changed since the last one.
    fn current_uniform(&mut self) -> Option<u32> {
        if self.matrix_dirty || self.uniforms.is_empty() {
            if self.uniforms.len() >= self.max_commands {
                return None;
            }
            let mvp = self.matrices.top(MatrixMode::Projection)
                * self.matrices.top(MatrixMode::ModelView);
            self.uniforms.push(Uniforms {
                mvp: mvp.to_cols_array_2d(),
                tm: self.matrices.top(MatrixMode::Texture).to_cols_array_2d(),
            });
            self.matrix_dirty = false;
        }
        Some((self.uniforms.len() - 1) as u32)
    }

    // ── vertices ────────────────────────────────────────────────────────

    fn vtx(&mut self, x: f32, y: f32, z: f32, u: f32, v: f32, rgba: u32) {
        let Some(prim) = self.primitive else {
            return;
        };

        // The fourth vertex of a quad first repeats corners 0 and 2 so the
        // quad becomes triangles (0, 1, 2) and (0, 2, 3).
        let quad_tail = prim == PrimitiveType::Quads && self.vtx_count & 3 == 3;
        self.vtx_count = self.vtx_count.wrapping_add(1);

        let needed = if quad_tail { 3 } else { 1 };
        if self.vertices.len() + needed > self.max_vertices {
            self.raise(ImmediateError::VerticesFull);
            return;
        }

        if quad_tail {
            let n = self.vertices.len();
            if n < self.base_vertex + 3 {
                return;
            }
            let (v0, v2) = (self.vertices[n - 3], self.vertices[n - 1]);
            self.vertices.push(v0);
            self.vertices.push(v2);
        }

        self.vertices.push(Vertex {
            pos: [x, y, z],
            uv: [u, v],
            rgba,
        });
    }

    pub fn c3f(&mut self, r: f32, g: f32, b: f32) {
        self.rgba = pack_rgbaf(r, g, b, 1.0);
    }

    pub fn c4f(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.rgba = pack_rgbaf(r, g, b, a);
    }

    pub fn c3b(&mut self, r: u8, g: u8, b: u8) {
        self.rgba = pack_rgba(r, g, b, 255);
    }

    pub fn c4b(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.rgba = pack_rgba(r, g, b, a);
    }

    pub fn t2f(&mut self, u: f32, v: f32) {
        self.uv = [u, v];
    }

    pub fn v2f(&mut self, x: f32, y: f32) {
        let ([u, v], c) = (self.uv, self.rgba);
        self.vtx(x, y, 0.0, u, v, c);
    }

    pub fn v3f(&mut self, x: f32, y: f32, z: f32) {
        let ([u, v], c) = (self.uv, self.rgba);
        self.vtx(x, y, z, u, v, c);
    }

    pub fn v2f_t2f(&mut self, x: f32, y: f32, u: f32, v: f32) {
        let c = self.rgba;
        self.vtx(x, y, 0.0, u, v, c);
    }

    pub fn v3f_t2f(&mut self, x: f32, y: f32, z: f32, u: f32, v: f32) {
        let c = self.rgba;
        self.vtx(x, y, z, u, v, c);
    }

    /// Per-vertex color; does not change the sticky color.
    pub fn v2f_c3b(&mut self, x: f32, y: f32, r: u8, g: u8, b: u8) {
        let [u, v] = self.uv;
        self.vtx(x, y, 0.0, u, v, pack_rgba(r, g, b, 255));
    }

    pub fn v3f_c3b(&mut self, x: f32, y: f32, z: f32, r: u8, g: u8, b: u8) {
        let [u, v] = self.uv;
        self.vtx(x, y, z, u, v, pack_rgba(r, g, b, 255));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn v3f_t2f_c3b(&mut self, x: f32, y: f32, z: f32, u: f32, v: f32, r: u8, g: u8, b: u8) {
        self.vtx(x, y, z, u, v, pack_rgba(r, g, b, 255));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn v3f_t2f_c4b(
        &mut self,
        x: f32,
        y: f32,
        z: f32,
        u: f32,
        v: f32,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
    ) {
        self.vtx(x, y, z, u, v, pack_rgba(r, g, b, a));
    }
}

fn can_merge(prev: &DrawArgs, next: &DrawArgs) -> bool {
    next.primitive.mergeable()
        && prev.primitive == next.primitive
        && prev.pipeline == next.pipeline
        && prev.texture == next.texture
        && prev.uniform_index == next.uniform_index
        && prev.base_vertex + prev.num_vertices == next.base_vertex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::immediate::{rad, MAX_STACK_DEPTH};

    const DEFAULT_PIP: PipelineId = PipelineId::from_raw(1);

    fn recorder() -> Recorder {
        Recorder::new(RecorderDesc::default(), DEFAULT_PIP)
    }

    fn small(max_vertices: usize, max_commands: usize) -> Recorder {
        Recorder::new(RecorderDesc { max_vertices, max_commands }, DEFAULT_PIP)
    }

    fn draws(r: &Recorder) -> Vec<DrawArgs> {
        r.commands()
            .iter()
            .filter_map(|c| match c {
                Command::Draw(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    fn triangle(r: &mut Recorder) {
        r.begin_triangles();
        r.v2f(0.0, 0.5);
        r.v2f(-0.5, -0.5);
        r.v2f(0.5, -0.5);
        r.end();
    }

    // ── state ───────────────────────────────────────────────────────────

    #[test]
    fn defaults_reset_state() {
        let mut r = recorder();
        r.enable_texture();
        r.c3b(1, 2, 3);
        r.matrix_mode_projection();
        r.translate(1.0, 0.0, 0.0);
        r.load_pipeline(PipelineId::from_raw(9));

        r.defaults();

        assert!(!r.texture_enabled());
        assert_eq!(r.color(), [255, 255, 255, 255]);
        assert_eq!(r.matrix_mode(), MatrixMode::ModelView);
        assert_eq!(r.matrix(MatrixMode::Projection), Mat4::IDENTITY);
        assert_eq!(r.pipeline(), DEFAULT_PIP);
    }

    #[test]
    fn texture_only_bound_when_enabled() {
        let mut r = recorder();
        let img = ImageId::from_raw(3);
        let smp = SamplerId::from_raw(4);

        r.texture(img, smp);
        triangle(&mut r);
        r.enable_texture();
        triangle(&mut r);

        let d = draws(&r);
        assert_eq!(d[0].texture, None);
        assert_eq!(d[1].texture, Some(TextureBinding { image: img, sampler: smp }));
    }

    #[test]
    fn enabled_without_texture_uses_white() {
        let mut r = recorder();
        r.enable_texture();
        triangle(&mut r);
        assert_eq!(draws(&r)[0].texture, None);
    }

    // ── vertices ────────────────────────────────────────────────────────

    #[test]
    fn quads_expand_to_two_triangles() {
        let mut r = recorder();
        r.begin_quads();
        r.v2f_c3b(-0.5, -0.5, 255, 255, 0);
        r.v2f_c3b(0.5, -0.5, 0, 255, 0);
        r.v2f_c3b(0.5, 0.5, 0, 0, 255);
        r.v2f_c3b(-0.5, 0.5, 255, 0, 0);
        r.end();

        let v = r.vertices();
        assert_eq!(v.len(), 6);
        let pos: Vec<[f32; 2]> = v.iter().map(|v| [v.pos[0], v.pos[1]]).collect();
        assert_eq!(
            pos,
            vec![
                [-0.5, -0.5],
                [0.5, -0.5],
                [0.5, 0.5],
                [-0.5, -0.5],
                [0.5, 0.5],
                [-0.5, 0.5],
            ]
        );
        assert_eq!(v[3].color_bytes(), [255, 255, 0, 255]);
        assert_eq!(v[5].color_bytes(), [255, 0, 0, 255]);

        let d = draws(&r);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].primitive, PrimitiveType::Quads);
        assert_eq!(d[0].num_vertices, 6);
    }

    #[test]
    fn two_quads_expand_independently() {
        let mut r = recorder();
        r.begin_quads();
        for i in 0..8 {
            r.v2f(i as f32, 0.0);
        }
        r.end();
        let xs: Vec<f32> = r.vertices().iter().map(|v| v.pos[0]).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 0.0, 2.0, 3.0, 4.0, 5.0, 6.0, 4.0, 6.0, 7.0]);
    }

    #[test]
    fn sticky_color_and_uv_apply() {
        let mut r = recorder();
        r.begin_points();
        r.c4b(10, 20, 30, 40);
        r.t2f(0.25, 0.75);
        r.v3f(1.0, 2.0, 3.0);
        r.v2f_c3b(0.0, 0.0, 1, 2, 3);
        r.v2f(0.0, 0.0);
        r.end();

        let v = r.vertices();
        assert_eq!(v[0].pos, [1.0, 2.0, 3.0]);
        assert_eq!(v[0].uv, [0.25, 0.75]);
        assert_eq!(v[0].color_bytes(), [10, 20, 30, 40]);
        assert_eq!(v[1].color_bytes(), [1, 2, 3, 255]);
        assert_eq!(v[2].color_bytes(), [10, 20, 30, 40]);
    }

    #[test]
    fn float_colors_are_quantized() {
        let mut r = recorder();
        r.c3f(1.0, 0.5, 0.0);
        assert_eq!(r.color(), [255, 127, 0, 255]);
        r.c4f(0.0, 0.0, 1.0, 0.0);
        assert_eq!(r.color(), [0, 0, 255, 0]);
    }

    #[test]
    fn vertices_outside_begin_are_ignored() {
        let mut r = recorder();
        r.v2f(0.0, 0.0);
        assert!(r.vertices().is_empty());
    }

    #[test]
    fn empty_begin_end_records_nothing() {
        let mut r = recorder();
        r.begin_lines();
        r.end();
        assert!(r.commands().is_empty());
        assert!(r.uniforms().is_empty());
    }

    #[test]
    fn end_without_begin_is_harmless() {
        let mut r = recorder();
        r.end();
        assert!(r.commands().is_empty());
        assert_eq!(r.error(), None);
    }

    // ── merging ─────────────────────────────────────────────────────────

    #[test]
    fn identical_state_draws_merge() {
        let mut r = recorder();
        triangle(&mut r);
        triangle(&mut r);
        let d = draws(&r);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].num_vertices, 6);
        assert_eq!(r.uniforms().len(), 1);
    }

    #[test]
    fn matrix_change_splits_draws() {
        let mut r = recorder();
        triangle(&mut r);
        r.translate(1.0, 0.0, 0.0);
        triangle(&mut r);
        let d = draws(&r);
        assert_eq!(d.len(), 2);
        assert_eq!((d[0].uniform_index, d[1].uniform_index), (0, 1));
        assert_eq!(d[1].base_vertex, 3);
    }

    #[test]
    fn pipeline_change_splits_but_reuses_uniform() {
        let mut r = recorder();
        triangle(&mut r);
        r.load_pipeline(PipelineId::from_raw(2));
        triangle(&mut r);
        let d = draws(&r);
        assert_eq!(d.len(), 2);
        assert_eq!(d[1].pipeline, PipelineId::from_raw(2));
        assert_eq!(r.uniforms().len(), 1);
    }

    #[test]
    fn strips_never_merge() {
        let mut r = recorder();
        for _ in 0..2 {
            r.begin_triangle_strip();
            r.v2f(0.0, 0.0);
            r.v2f(1.0, 0.0);
            r.v2f(0.0, 1.0);
            r.end();
        }
        assert_eq!(draws(&r).len(), 2);
    }

    #[test]
    fn viewport_breaks_merging() {
        let mut r = recorder();
        triangle(&mut r);
        r.viewport(0, 0, 10, 10, true);
        triangle(&mut r);
        assert_eq!(r.commands().len(), 3);
        assert_eq!(draws(&r).len(), 2);
    }

    #[test]
    fn uniform_holds_projection_times_modelview() {
        let mut r = recorder();
        r.matrix_mode_projection();
        r.scale(2.0, 2.0, 1.0);
        r.matrix_mode_modelview();
        r.translate(1.0, 0.0, 0.0);
        r.matrix_mode_texture();
        r.scale(0.5, 0.5, 1.0);
        triangle(&mut r);

        let u = r.uniforms()[0];
        let mvp = Mat4::from_cols_array_2d(&u.mvp);
        let p = mvp.transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(Mat4::from_cols_array_2d(&u.tm), Mat4::from_scale(Vec3::new(0.5, 0.5, 1.0)));
    }

    // ── matrices ────────────────────────────────────────────────────────

    #[test]
    fn push_pop_matrix_round_trips() {
        let mut r = recorder();
        r.translate(0.0, 0.0, -12.0);
        let before = r.matrix(MatrixMode::ModelView);
        r.push_matrix();
        r.rotate(rad(30.0), 0.0, 1.0, 0.0);
        r.scale(0.5, 0.5, 0.5);
        r.pop_matrix();
        assert_eq!(r.matrix(MatrixMode::ModelView), before);
        assert_eq!(r.error(), None);
    }

    #[test]
    fn load_matrix_is_column_major() {
        let mut r = recorder();
        let mut m = [0.0; 16];
        m[0] = 1.0;
        m[5] = 1.0;
        m[10] = 1.0;
        m[15] = 1.0;
        m[12] = 7.0;
        r.load_matrix(&m);
        assert_eq!(r.matrix(MatrixMode::ModelView), Mat4::from_translation(Vec3::new(7.0, 0.0, 0.0)));

        r.load_identity();
        r.mult_transpose_matrix(&Mat4::from_translation(Vec3::Y).transpose().to_cols_array());
        assert_eq!(r.matrix(MatrixMode::ModelView), Mat4::from_translation(Vec3::Y));
    }

    #[test]
    fn transpose_variants_take_row_major_input() {
        let t = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let row_major = t.transpose().to_cols_array();

        let mut r = recorder();
        r.load_transpose_matrix(&row_major);
        assert_eq!(r.matrix(MatrixMode::ModelView), t);

        r.mult_transpose_matrix(&row_major);
        assert_eq!(r.matrix(MatrixMode::ModelView), t * t);
    }

    #[test]
    fn matrix_overflow_sets_error() {
        let mut r = recorder();
        for _ in 0..MAX_STACK_DEPTH {
            r.push_matrix();
        }
        assert_eq!(r.error(), Some(ImmediateError::StackOverflow));
    }

    #[test]
    fn matrix_underflow_sets_error() {
        let mut r = recorder();
        r.pop_matrix();
        assert_eq!(r.error(), Some(ImmediateError::StackUnderflow));
    }

    // ── pipeline stack ──────────────────────────────────────────────────

    #[test]
    fn pipeline_push_pop_round_trips() {
        let mut r = recorder();
        r.load_pipeline(PipelineId::from_raw(5));
        r.push_pipeline();
        r.load_pipeline(PipelineId::from_raw(6));
        assert_eq!(r.pipeline(), PipelineId::from_raw(6));
        r.pop_pipeline();
        assert_eq!(r.pipeline(), PipelineId::from_raw(5));
    }

    #[test]
    fn pipeline_stack_limits() {
        let mut r = recorder();
        r.pop_pipeline();
        assert_eq!(r.error(), Some(ImmediateError::StackUnderflow));

        let mut r = recorder();
        for _ in 0..MAX_PIPELINE_STACK_DEPTH {
            r.push_pipeline();
        }
        assert_eq!(r.error(), Some(ImmediateError::StackOverflow));
    }

    // ── capacity ────────────────────────────────────────────────────────

    #[test]
    fn vertex_overflow_drops_and_flags() {
        let mut r = small(4, 16);
        r.begin_points();
        for i in 0..6 {
            r.v2f(i as f32, 0.0);
        }
        r.end();
        assert_eq!(r.vertices().len(), 4);
        assert_eq!(r.error(), Some(ImmediateError::VerticesFull));
        assert_eq!(draws(&r)[0].num_vertices, 4);
    }

    #[test]
    fn quad_tail_needs_room_for_three() {
        let mut r = small(5, 16);
        r.begin_quads();
        for i in 0..4 {
            r.v2f(i as f32, 0.0);
        }
        r.end();
        assert_eq!(r.vertices().len(), 3);
        assert_eq!(r.error(), Some(ImmediateError::VerticesFull));
    }

    #[test]
    fn command_overflow_drops_draw() {
        let mut r = small(64, 1);
        triangle(&mut r);
        r.translate(1.0, 0.0, 0.0);
        triangle(&mut r);
        assert_eq!(draws(&r).len(), 1);
        assert_eq!(r.vertices().len(), 3);
        assert_eq!(r.error(), Some(ImmediateError::CommandsFull));
    }

    #[test]
    fn first_error_is_kept() {
        let mut r = small(1, 16);
        r.pop_matrix();
        r.begin_points();
        r.v2f(0.0, 0.0);
        r.v2f(0.0, 0.0);
        r.end();
        assert_eq!(r.error(), Some(ImmediateError::StackUnderflow));
    }

    // ── rewind ──────────────────────────────────────────────────────────

    #[test]
    fn rewind_clears_frame_but_keeps_state() {
        let mut r = small(2, 16);
        r.translate(3.0, 0.0, 0.0);
        triangle(&mut r);
        assert!(r.error().is_some());

        r.rewind();

        assert!(r.vertices().is_empty());
        assert!(r.commands().is_empty());
        assert!(r.uniforms().is_empty());
        assert_eq!(r.error(), None);
        assert_eq!(
            r.matrix(MatrixMode::ModelView),
            Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0))
        );

        r.begin_points();
        r.v2f(0.0, 0.0);
        r.end();
        assert_eq!(draws(&r)[0].uniform_index, 0);
    }
}
