use imgl_engine::immediate::Recorder;

use crate::scene::{Scene, SceneDrawer};
use crate::state::AppState;

/// Converts a frame duration in seconds into a multiplier that is 1.0 at
/// 60 Hz.
pub fn frame_multiplier(duration: f64) -> f32 {
    (duration * 60.0) as f32
}

/// Which scenes are drawn and where.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Layout {
    /// The textured quad alone, in the top-left square.
    #[default]
    QuadOnly,
    /// All four scenes in a 2x2 grid centered horizontally.
    Quadrants,
}

impl std::str::FromStr for Layout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quad" => Ok(Self::QuadOnly),
            "quadrants" => Ok(Self::Quadrants),
            other => anyhow::bail!("unknown layout {other:?}, expected \"quad\" or \"quadrants\""),
        }
    }
}

/// Viewport in pixels with a top-left origin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ViewportRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Layout {
    /// Square viewports of side `height / 2` for each scene in this layout.
    pub fn viewports(self, width: i32, height: i32) -> Vec<(Scene, ViewportRect)> {
        let side = height / 2;
        let x0 = width / 2 - side;
        let x1 = width / 2;
        let y1 = height / 2;
        let vp = |x, y| ViewportRect { x, y, w: side, h: side };

        match self {
            Layout::QuadOnly => vec![(Scene::Quad, vp(0, 0))],
            Layout::Quadrants => vec![
                (Scene::Triangle, vp(x0, 0)),
                (Scene::Quad, vp(0, 0)),
                (Scene::Cubes, vp(x0, y1)),
                (Scene::TexCube, vp(x1, y1)),
            ],
        }
    }
}

/// Records one frame of `layout` into `rec`. Nothing is drawn here; the
/// recording is flushed later inside the render pass.
pub fn record_frame(
    rec: &mut Recorder,
    drawer: &mut SceneDrawer,
    state: &AppState,
    layout: Layout,
    width: u32,
    height: u32,
    duration: f64,
) {
    let t = frame_multiplier(duration);
    let w = i32::try_from(width).unwrap_or(i32::MAX);
    let h = i32::try_from(height).unwrap_or(i32::MAX);

    for (scene, r) in layout.viewports(w, h) {
        rec.viewport(r.x, r.y, r.w, r.h, true);
        drawer.draw(scene, rec, state, t);
    }
}
