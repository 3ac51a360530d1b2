use glam::{Mat4, Vec3, Vec4};

use super::ImmediateError;

/// Depth of each matrix stack, including the bottom entry.
pub const MAX_STACK_DEPTH: usize = 16;

/// Which stack matrix operations apply to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatrixMode {
    ModelView,
    Projection,
    Texture,
}

impl MatrixMode {
    fn slot(self) -> usize {
        match self {
            MatrixMode::ModelView => 0,
            MatrixMode::Projection => 1,
            MatrixMode::Texture => 2,
        }
    }
}

/// Degrees to radians.
#[inline]
pub fn rad(deg: f32) -> f32 {
    deg.to_radians()
}

/// Radians to degrees.
#[inline]
pub fn deg(rad: f32) -> f32 {
    rad.to_degrees()
}

/// The three matrix stacks. Each always holds at least one matrix.
#[derive(Debug, Clone)]
pub(crate) struct MatrixStacks {
    stacks: [Vec<Mat4>; 3],
}

impl MatrixStacks {
    pub(crate) fn new() -> Self {
        let stack = || {
            let mut v = Vec::with_capacity(MAX_STACK_DEPTH);
            v.push(Mat4::IDENTITY);
            v
        };
        Self {
            stacks: [stack(), stack(), stack()],
        }
    }

    /// Resets every stack to a single identity matrix.
    pub(crate) fn reset(&mut self) {
        for s in &mut self.stacks {
            s.clear();
            s.push(Mat4::IDENTITY);
        }
    }

    pub(crate) fn top(&self, mode: MatrixMode) -> Mat4 {
        let s = &self.stacks[mode.slot()];
        s.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    pub(crate) fn top_mut(&mut self, mode: MatrixMode) -> &mut Mat4 {
        let s = &mut self.stacks[mode.slot()];
        if s.is_empty() {
            s.push(Mat4::IDENTITY);
        }
        let last = s.len() - 1;
        &mut s[last]
    }

    pub(crate) fn depth(&self, mode: MatrixMode) -> usize {
        self.stacks[mode.slot()].len()
    }

    pub(crate) fn push(&mut self, mode: MatrixMode) -> Result<(), ImmediateError> {
        let top = self.top(mode);
        let s = &mut self.stacks[mode.slot()];
        if s.len() >= MAX_STACK_DEPTH {
            return Err(ImmediateError::StackOverflow);
        }
        s.push(top);
        Ok(())
    }

    pub(crate) fn pop(&mut self, mode: MatrixMode) -> Result<(), ImmediateError> {
        let s = &mut self.stacks[mode.slot()];
        if s.len() <= 1 {
            return Err(ImmediateError::StackUnderflow);
        }
        s.pop();
        Ok(())
    }
}

/// Rotation of `angle` radians about `(x, y, z)`. A zero axis yields identity.
pub(crate) fn rotation(angle: f32, x: f32, y: f32, z: f32) -> Mat4 {
    let axis = Vec3::new(x, y, z).normalize_or_zero();
    if axis == Vec3::ZERO {
        return Mat4::IDENTITY;
    }
    Mat4::from_axis_angle(axis, angle)
}

/// Perspective frustum with a `[0, 1]` clip-space depth range.
pub(crate) fn frustum(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Mat4 {
    let w = r - l;
    let h = t - b;
    let d = n - f;
    Mat4::from_cols(
        Vec4::new(2.0 * n / w, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * n / h, 0.0, 0.0),
        Vec4::new((r + l) / w, (t + b) / h, f / d, -1.0),
        Vec4::new(0.0, 0.0, n * f / d, 0.0),
    )
}

pub(crate) fn ortho(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Mat4 {
    Mat4::orthographic_rh(l, r, b, t, n, f)
}

/// `fovy` in radians.
pub(crate) fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fovy, aspect, near, far)
}

pub(crate) fn lookat(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, center, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    // ── stacks ──────────────────────────────────────────────────────────

    #[test]
    fn push_pop_restores_previous_top() {
        let mut m = MatrixStacks::new();
        *m.top_mut(MatrixMode::ModelView) = Mat4::from_scale(Vec3::splat(2.0));
        m.push(MatrixMode::ModelView).unwrap();
        *m.top_mut(MatrixMode::ModelView) *= Mat4::from_translation(Vec3::X);
        m.pop(MatrixMode::ModelView).unwrap();
        assert_eq!(m.top(MatrixMode::ModelView), Mat4::from_scale(Vec3::splat(2.0)));
    }

    #[test]
    fn push_copies_top() {
        let mut m = MatrixStacks::new();
        let t = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        *m.top_mut(MatrixMode::Projection) = t;
        m.push(MatrixMode::Projection).unwrap();
        assert_eq!(m.top(MatrixMode::Projection), t);
        assert_eq!(m.depth(MatrixMode::Projection), 2);
    }

    #[test]
    fn stacks_are_independent() {
        let mut m = MatrixStacks::new();
        m.push(MatrixMode::Texture).unwrap();
        assert_eq!(m.depth(MatrixMode::Texture), 2);
        assert_eq!(m.depth(MatrixMode::ModelView), 1);
    }

    #[test]
    fn overflow_at_max_depth() {
        let mut m = MatrixStacks::new();
        for _ in 1..MAX_STACK_DEPTH {
            m.push(MatrixMode::ModelView).unwrap();
        }
        assert_eq!(m.push(MatrixMode::ModelView), Err(ImmediateError::StackOverflow));
        assert_eq!(m.depth(MatrixMode::ModelView), MAX_STACK_DEPTH);
    }

    #[test]
    fn underflow_keeps_bottom_entry() {
        let mut m = MatrixStacks::new();
        assert_eq!(m.pop(MatrixMode::ModelView), Err(ImmediateError::StackUnderflow));
        assert_eq!(m.depth(MatrixMode::ModelView), 1);
    }

    #[test]
    fn reset_returns_to_identity() {
        let mut m = MatrixStacks::new();
        m.push(MatrixMode::ModelView).unwrap();
        *m.top_mut(MatrixMode::ModelView) = Mat4::ZERO;
        m.reset();
        assert_eq!(m.depth(MatrixMode::ModelView), 1);
        assert_eq!(m.top(MatrixMode::ModelView), Mat4::IDENTITY);
    }

    // ── constructors ────────────────────────────────────────────────────

    #[test]
    fn rad_deg_round_trip() {
        assert!((rad(180.0) - std::f32::consts::PI).abs() < EPS);
        assert!((deg(std::f32::consts::FRAC_PI_2) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn zero_axis_rotation_is_identity() {
        assert_eq!(rotation(1.0, 0.0, 0.0, 0.0), Mat4::IDENTITY);
    }

    #[test]
    fn rotation_about_z_turns_x_into_y() {
        let m = rotation(rad(90.0), 0.0, 0.0, 1.0);
        let p = m.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn rotation_axis_is_normalized() {
        let a = rotation(0.7, 0.0, 0.0, 5.0);
        let b = rotation(0.7, 0.0, 0.0, 1.0);
        assert!(a.abs_diff_eq(b, EPS));
    }

    #[test]
    fn symmetric_frustum_matches_perspective() {
        let near = 0.1;
        let far = 100.0;
        let fovy = rad(45.0);
        let top = near * (fovy * 0.5).tan();
        let f = frustum(-top, top, -top, top, near, far);
        let p = perspective(fovy, 1.0, near, far);
        assert!(f.abs_diff_eq(p, EPS));
    }

    #[test]
    fn frustum_maps_near_and_far_to_unit_depth() {
        let m = frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0);
        let near = m.project_point3(Vec3::new(0.0, 0.0, -1.0));
        let far = m.project_point3(Vec3::new(0.0, 0.0, -10.0));
        assert!(near.z.abs() < EPS);
        assert!((far.z - 1.0).abs() < EPS);
    }

    #[test]
    fn ortho_maps_corners_to_clip_space() {
        let m = ortho(0.0, 100.0, 0.0, 50.0, -1.0, 1.0);
        let p = m.transform_point3(Vec3::new(100.0, 50.0, 0.0));
        assert!((p.x - 1.0).abs() < EPS && (p.y - 1.0).abs() < EPS);
    }

    #[test]
    fn lookat_puts_target_in_front() {
        let m = lookat(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let p = m.transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), EPS));
    }
}
