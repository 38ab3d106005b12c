use bytemuck::{Pod, Zeroable};

/// Straight-alpha RGBA8 colour.
///
/// Layout is `r, g, b, a` bytes in that order, so a `&[Color]` can be cast to
/// the byte slice a texture upload expects.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Opaque colour from a packed `0xRRGGBB` integer.
    #[inline]
    pub const fn from_rgb_int(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Packs RGB into `0xRRGGBB`; alpha is dropped.
    #[inline]
    pub const fn to_rgb_int(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Composites `self` over `dst` ("source-over").
    ///
    /// Colour channels: `src_a * src + (1 - src_a) * dst`.
    /// Alpha: `src_a + dst_a * (1 - src_a)`.
    ///
    /// Results are rounded and clamped to `0..=255`, so a fully opaque source
    /// yields exactly the source colour and a fully transparent source leaves
    /// `dst` unchanged.
    #[inline]
    pub fn blend_over(self, dst: Color) -> Color {
        let src_a = self.a as f32 / 255.0;
        let inv = 1.0 - src_a;
        let mix = |s: u8, d: u8| channel(src_a * s as f32 + inv * d as f32);

        Color {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: channel((src_a + (dst.a as f32 / 255.0) * inv) * 255.0),
        }
    }
}

#[inline]
fn channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── packing ───────────────────────────────────────────────────────────

    #[test]
    fn rgb_int_round_trips() {
        let c = Color::from_rgb_int(0x12_34_56);
        assert_eq!(c, Color::rgb(0x12, 0x34, 0x56));
        assert_eq!(c.to_rgb_int(), 0x12_34_56);
    }

    // ── blend_over ────────────────────────────────────────────────────────

    #[test]
    fn opaque_source_replaces_destination() {
        let src = Color::rgb(200, 10, 30);
        for dst in [Color::TRANSPARENT, Color::WHITE, Color::rgba(1, 2, 3, 4)] {
            assert_eq!(src.blend_over(dst), src);
        }
    }

    #[test]
    fn transparent_source_leaves_destination_untouched() {
        let src = Color::rgba(255, 0, 0, 0);
        for a in 0..=255u8 {
            let dst = Color::rgba(17, 99, 250, a);
            assert_eq!(src.blend_over(dst), dst);
        }
    }

    #[test]
    fn half_alpha_mixes_channels() {
        let src = Color::rgba(255, 0, 0, 128);
        let out = src.blend_over(Color::rgb(0, 0, 255));
        assert_eq!(out.r, 128);
        assert_eq!(out.b, 127);
        assert_eq!(out.a, 255);
    }

    #[test]
    fn colors_cast_to_rgba_bytes() {
        let px = [Color::rgba(1, 2, 3, 4)];
        let bytes: &[u8] = bytemuck::cast_slice(&px);
        assert_eq!(bytes, &[1, 2, 3, 4]);
    }
}
