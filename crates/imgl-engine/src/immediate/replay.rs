use std::collections::HashMap;

use glam::Mat4;

use super::cmd::{Command, DrawArgs, Uniforms};

/// One render-pass call, resolved against the target size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum PassOp {
    Viewport { x: u32, y: u32, w: u32, h: u32 },
    Scissor { x: u32, y: u32, w: u32, h: u32 },
    /// `uniform_index` may differ from `args.uniform_index` when the draw sits
    /// in a viewport that extends past the target.
    Draw { args: DrawArgs, uniform_index: u32 },
}

/// A frame's commands ready for replay, plus the uniform blocks they index.
#[derive(Debug, Default)]
pub(crate) struct Replay {
    pub ops: Vec<PassOp>,
    pub uniforms: Vec<Uniforms>,
}

/// Resolves recorded commands for a `target_w × target_h` pass.
///
/// Draws under a viewport or scissor with no visible area are dropped. Draws
/// under a partly visible viewport get a copy of their uniform block with the
/// viewport's clip transform applied, so `uniforms` holds at most one extra
/// block per draw.
pub(crate) fn plan(
    commands: &[Command],
    uniforms: &[Uniforms],
    target_w: u32,
    target_h: u32,
) -> Replay {
    let mut out = Replay {
        ops: Vec::with_capacity(commands.len()),
        uniforms: uniforms.to_vec(),
    };

    let mut viewport_hidden = false;
    let mut scissor_hidden = false;
    let mut clip: Option<Mat4> = None;
    // Original uniform index -> adjusted copy, valid for the current viewport.
    let mut adjusted: HashMap<u32, u32> = HashMap::new();

    for cmd in commands {
        match *cmd {
            Command::Viewport(r) => {
                adjusted.clear();
                match r.to_target(target_w, target_h) {
                    Some((x, y, w, h)) => {
                        out.ops.push(PassOp::Viewport { x, y, w, h });
                        clip = r.clip_transform(target_w, target_h);
                        viewport_hidden = false;
                    }
                    None => viewport_hidden = true,
                }
            }
            Command::Scissor(r) => match r.to_target(target_w, target_h) {
                Some((x, y, w, h)) => {
                    out.ops.push(PassOp::Scissor { x, y, w, h });
                    scissor_hidden = false;
                }
                None => scissor_hidden = true,
            },
            Command::Draw(args) => {
                if viewport_hidden || scissor_hidden {
                    continue;
                }
                let uniform_index = match clip {
                    None => args.uniform_index,
                    Some(m) => {
                        let Some(base) = uniforms.get(args.uniform_index as usize) else {
                            continue;
                        };
                        *adjusted.entry(args.uniform_index).or_insert_with(|| {
                            let mvp = m * Mat4::from_cols_array_2d(&base.mvp);
                            out.uniforms.push(Uniforms {
                                mvp: mvp.to_cols_array_2d(),
                                tm: base.tm,
                            });
                            (out.uniforms.len() - 1) as u32
                        })
                    }
                };
                out.ops.push(PassOp::Draw { args, uniform_index });
            }
        }
    }

    out
}
