use imgl_engine::immediate::{rad, Recorder};

use crate::state::AppState;

/// Rotation step of the quad, in degrees per 60 Hz frame. Zero keeps the
/// quad still while its scale stays driven by the angle.
const QUAD_ANGLE_STEP: f32 = 0.0;

/// Drawable scenes. Only `Quad` is part of the default layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Scene {
    Triangle,
    Quad,
    Cubes,
    TexCube,
}

/// Animation state that persists across frames.
#[derive(Debug, Clone, Default)]
pub struct SceneDrawer {
    quad_angle_deg: f32,
    cube_rot: [f32; 2],
    tex_cube_frame: f32,
}

impl SceneDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quad_angle_deg(&self) -> f32 {
        self.quad_angle_deg
    }

    /// `t` is the frame-time multiplier (1.0 at 60 Hz).
    pub fn draw(&mut self, scene: Scene, rec: &mut Recorder, state: &AppState, t: f32) {
        match scene {
            Scene::Triangle => draw_triangle(rec),
            Scene::Quad => self.draw_quad(rec, state, t),
            Scene::Cubes => self.draw_cubes(rec, state, t),
            Scene::TexCube => self.draw_tex_cube(rec, state, t),
        }
    }

    pub fn draw_quad(&mut self, rec: &mut Recorder, state: &AppState, t: f32) {
        let scale = 1.0 + rad(self.quad_angle_deg).sin() * 0.5;
        self.quad_angle_deg += QUAD_ANGLE_STEP * t;

        rec.defaults();
        rec.load_pipeline(state.pip_3d);

        rec.enable_texture();
        rec.texture(state.img, state.smp);

        rec.rotate(rad(self.quad_angle_deg), 0.0, 0.0, 1.0);
        rec.scale(scale, scale, 1.0);
        rec.begin_quads();
        rec.v2f_c3b(-0.5, -0.5, 255, 255, 0);
        rec.v2f_c3b(0.5, -0.5, 0, 255, 0);
        rec.v2f_c3b(0.5, 0.5, 0, 0, 255);
        rec.v2f_c3b(-0.5, 0.5, 255, 0, 0);
        rec.end();
    }

    /// Three nested cubes, each half the size of its parent.
    pub fn draw_cubes(&mut self, rec: &mut Recorder, state: &AppState, t: f32) {
        self.cube_rot[0] += 1.0 * t;
        self.cube_rot[1] += 2.0 * t;
        let [rx, ry] = self.cube_rot;

        rec.defaults();
        rec.load_pipeline(state.pip_3d);

        rec.matrix_mode_projection();
        rec.perspective(rad(45.0), 1.0, 0.1, 100.0);

        rec.matrix_mode_modelview();
        rec.translate(0.0, 0.0, -12.0);
        rec.rotate(rad(rx), 1.0, 0.0, 0.0);
        rec.rotate(rad(ry), 0.0, 1.0, 0.0);
        cube(rec);
        rec.push_matrix();
        {
            rec.translate(0.0, 0.0, 3.0);
            rec.scale(0.5, 0.5, 0.5);
            rec.rotate(-2.0 * rad(rx), 1.0, 0.0, 0.0);
            rec.rotate(-2.0 * rad(ry), 0.0, 1.0, 0.0);
            cube(rec);
            rec.push_matrix();
            {
                rec.translate(0.0, 0.0, 3.0);
                rec.scale(0.5, 0.5, 0.5);
                rec.rotate(-3.0 * rad(2.0 * rx), 1.0, 0.0, 0.0);
                rec.rotate(3.0 * rad(2.0 * ry), 0.0, 0.0, 1.0);
                cube(rec);
            }
            rec.pop_matrix();
        }
        rec.pop_matrix();
    }

    /// Textured cube seen from an orbiting eye, with an animated texture
    /// matrix.
    pub fn draw_tex_cube(&mut self, rec: &mut Recorder, state: &AppState, t: f32) {
        self.tex_cube_frame += 1.0 * t;
        let a = rad(self.tex_cube_frame);

        let tex_rot = 0.5 * a;
        let tex_scale = 1.0 + a.sin() * 0.5;

        let eye_x = a.sin() * 6.0;
        let eye_z = a.cos() * 6.0;
        let eye_y = a.sin() * 3.0;

        rec.defaults();
        rec.load_pipeline(state.pip_3d);

        rec.enable_texture();
        rec.texture(state.img, state.smp);

        rec.matrix_mode_projection();
        rec.perspective(rad(45.0), 1.0, 0.1, 100.0);
        rec.matrix_mode_modelview();
        rec.lookat(eye_x, eye_y, eye_z, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        rec.matrix_mode_texture();
        rec.rotate(tex_rot, 0.0, 0.0, 1.0);
        rec.scale(tex_scale, tex_scale, 1.0);
        cube(rec);
    }
}

pub fn draw_triangle(rec: &mut Recorder) {
    rec.defaults();
    rec.begin_triangles();
    rec.v2f_c3b(0.0, 0.5, 255, 0, 0);
    rec.v2f_c3b(-0.5, -0.5, 0, 0, 255);
    rec.v2f_c3b(0.5, -0.5, 0, 255, 0);
    rec.end();
}

/// Face color and four `(x, y, z, u, v)` corners, counter-clockwise when
/// seen from outside.
type Face = ([f32; 3], [[f32; 5]; 4]);

const CUBE: [Face; 6] = [
    (
        [1.0, 0.0, 0.0],
        [
            [-1.0, 1.0, -1.0, -1.0, 1.0],
            [1.0, 1.0, -1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0, 1.0, -1.0],
            [-1.0, -1.0, -1.0, -1.0, -1.0],
        ],
    ),
    (
        [0.0, 1.0, 0.0],
        [
            [-1.0, -1.0, 1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0, 1.0, -1.0],
            [-1.0, 1.0, 1.0, -1.0, -1.0],
        ],
    ),
    (
        [0.0, 0.0, 1.0],
        [
            [-1.0, -1.0, 1.0, -1.0, 1.0],
            [-1.0, 1.0, 1.0, 1.0, 1.0],
            [-1.0, 1.0, -1.0, 1.0, -1.0],
            [-1.0, -1.0, -1.0, -1.0, -1.0],
        ],
    ),
    (
        [1.0, 0.5, 0.0],
        [
            [1.0, -1.0, 1.0, -1.0, 1.0],
            [1.0, -1.0, -1.0, 1.0, 1.0],
            [1.0, 1.0, -1.0, 1.0, -1.0],
            [1.0, 1.0, 1.0, -1.0, -1.0],
        ],
    ),
    (
        [0.0, 0.5, 1.0],
        [
            [1.0, -1.0, -1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0, 1.0, 1.0],
            [-1.0, -1.0, 1.0, 1.0, -1.0],
            [-1.0, -1.0, -1.0, -1.0, -1.0],
        ],
    ),
    (
        [1.0, 0.0, 0.5],
        [
            [-1.0, 1.0, -1.0, -1.0, 1.0],
            [-1.0, 1.0, 1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0, 1.0, -1.0],
            [1.0, 1.0, -1.0, -1.0, -1.0],
        ],
    ),
];

fn cube(rec: &mut Recorder) {
    rec.begin_quads();
    for ([r, g, b], corners) in CUBE {
        rec.c3f(r, g, b);
        for [x, y, z, u, v] in corners {
            rec.v3f_t2f(x, y, z, u, v);
        }
    }
    rec.end();
}
