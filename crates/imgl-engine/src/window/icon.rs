use anyhow::{Context, Result};
use winit::window::Icon;

/// Edge length of the built-in window icon.
pub const DEFAULT_ICON_SIZE: u32 = 32;

const BACKGROUND: [u8; 4] = [0x1e, 0x2a, 0x44, 0xff];
const TILE_A: [u8; 4] = [0xf0, 0xf0, 0xf0, 0xff];
const TILE_B: [u8; 4] = [0x40, 0x90, 0xe0, 0xff];

/// RGBA8 pixels of the built-in icon: a 4×4 two-tone checkerboard inside a
/// 2-pixel dark frame.
pub fn default_icon_rgba(size: u32) -> Vec<u8> {
    let border = 2;
    let inner = size.saturating_sub(2 * border).max(1);
    let tile = (inner / 4).max(1);
    let far = size.saturating_sub(border);

    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let in_frame = x < border || y < border || x >= far || y >= far;
            let px = if in_frame {
                BACKGROUND
            } else {
                let tx = (x - border) / tile;
                let ty = (y - border) / tile;
                if (tx ^ ty) & 1 == 0 { TILE_A } else { TILE_B }
            };
            rgba.extend_from_slice(&px);
        }
    }
    rgba
}

/// The built-in window icon.
pub fn default_icon() -> Result<Icon> {
    Icon::from_rgba(
        default_icon_rgba(DEFAULT_ICON_SIZE),
        DEFAULT_ICON_SIZE,
        DEFAULT_ICON_SIZE,
    )
    .context("failed to build default window icon")
}
