use anyhow::{Context, Result};
use imgl_engine::device::{Gpu, ImageDesc, ImageId, SamplerDesc, SamplerId};

pub const CHECKER_SIZE: usize = 8;

const WHITE: u32 = 0xFFFF_FFFF;
const BLACK: u32 = 0xFF00_0000;

/// 8×8 checkerboard, row-major. Odd `x ^ y` is opaque white, even is opaque
/// black.
pub fn checkerboard_pixels() -> [[u32; CHECKER_SIZE]; CHECKER_SIZE] {
    let mut pixels = [[0u32; CHECKER_SIZE]; CHECKER_SIZE];
    for (y, row) in pixels.iter_mut().enumerate() {
        for (x, px) in row.iter_mut().enumerate() {
            *px = if (x ^ y) & 1 == 1 { WHITE } else { BLACK };
        }
    }
    pixels
}

fn pixel_bytes(pixels: &[[u32; CHECKER_SIZE]; CHECKER_SIZE]) -> Vec<u8> {
    pixels
        .iter()
        .flatten()
        .flat_map(|p| p.to_le_bytes())
        .collect()
}

/// Uploads the checkerboard and a point-sampling sampler.
pub fn make_checkerboard(gpu: &mut Gpu<'_>) -> Result<(ImageId, SamplerId)> {
    let data = pixel_bytes(&checkerboard_pixels());

    let img = gpu
        .make_image(&ImageDesc {
            label: Some("checkerboard"),
            width: CHECKER_SIZE as u32,
            height: CHECKER_SIZE as u32,
            data: &data,
        })
        .context("failed to create checkerboard image")?;

    let smp = gpu
        .make_sampler(&SamplerDesc {
            label: Some("checkerboard sampler"),
            min_filter: wgpu::FilterMode::Nearest,
            mag_filter: wgpu::FilterMode::Nearest,
            ..SamplerDesc::default()
        })
        .context("failed to create checkerboard sampler")?;

    Ok((img, smp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_iff_xor_is_odd() {
        let px = checkerboard_pixels();
        for y in 0..CHECKER_SIZE {
            for x in 0..CHECKER_SIZE {
                let expected = if (x ^ y) % 2 == 1 { 0xFFFF_FFFF } else { 0xFF00_0000 };
                assert_eq!(px[y][x], expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn corners() {
        let px = checkerboard_pixels();
        assert_eq!(px[0][0], BLACK);
        assert_eq!(px[0][1], WHITE);
        assert_eq!(px[7][7], BLACK);
    }

    #[test]
    fn bytes_are_opaque_rgba8() {
        let bytes = pixel_bytes(&checkerboard_pixels());
        assert_eq!(bytes.len(), CHECKER_SIZE * CHECKER_SIZE * 4);
        assert_eq!(&bytes[0..4], &[0, 0, 0, 255]);
        assert_eq!(&bytes[4..8], &[255, 255, 255, 255]);
        assert!(bytes.chunks_exact(4).all(|p| p[3] == 255));
    }
}
