/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from `0..=255` bytes.
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Packs the color as `RGBA8` in memory order, matching `Unorm8x4`.
    #[inline]
    pub fn to_packed(self) -> u32 {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        u32::from_le_bytes([q(self.r), q(self.g), q(self.b), q(self.a)])
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8_normalizes() {
        let c = ColorRgba::from_u8(255, 0, 51, 255);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 0.2).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn packed_is_rgba_memory_order() {
        let bytes = ColorRgba::new(1.0, 0.0, 0.0, 1.0).to_packed().to_le_bytes();
        assert_eq!(bytes, [255, 0, 0, 255]);
    }

    #[test]
    fn packed_clamps_out_of_range() {
        let bytes = ColorRgba::new(2.0, -1.0, 0.5, 1.0).to_packed().to_le_bytes();
        assert_eq!(bytes, [255, 0, 128, 255]);
    }

    #[test]
    fn black_converts_to_opaque_wgpu_black() {
        let c = ColorRgba::BLACK.to_wgpu();
        assert_eq!((c.r, c.g, c.b, c.a), (0.0, 0.0, 0.0, 1.0));
    }
}
