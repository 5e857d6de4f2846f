/// Straight-alpha sRGB color with `f32` channels in `[0, 1]`.
///
/// This is the color model a 2D drawing context exposes; rasterizers that blend
/// in premultiplied space convert with [`Color::premultiplied`].
///
/// Parsing CSS color strings is left to callers; build colors from bytes or
/// packed hex values.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    /// Creates a color from straight components, clamping each to `[0, 1]`.
    #[inline]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Creates an opaque color from sRGB bytes.
    #[inline]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Creates a color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[inline]
    pub fn from_hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Returns the same color with alpha multiplied by `factor`.
    #[inline]
    pub fn with_alpha_factor(self, factor: f32) -> Self {
        Self { a: (self.a * factor).clamp(0.0, 1.0), ..self }
    }

    /// Premultiplied `(r, g, b, a)`.
    #[inline]
    pub fn premultiplied(self) -> (f32, f32, f32, f32) {
        (self.r * self.a, self.g * self.a, self.b * self.a, self.a)
    }

    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_unpacks_channels() {
        let c = Color::from_hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn new_clamps_out_of_range() {
        let c = Color::new(2.0, -1.0, 0.5, 3.0);
        assert_eq!(c, Color { r: 1.0, g: 0.0, b: 0.5, a: 1.0 });
    }

    #[test]
    fn premultiplied_scales_rgb() {
        let (r, g, b, a) = Color::new(1.0, 0.5, 0.0, 0.5).premultiplied();
        assert_eq!((r, g, b, a), (0.5, 0.25, 0.0, 0.5));
    }
}
