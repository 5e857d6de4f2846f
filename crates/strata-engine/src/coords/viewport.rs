/// Viewport size in logical pixels.
///
/// Layers allocate `width * dpr` by `height * dpr` physical pixels; culling and
/// clears work in the logical basis.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Physical pixel size for a device pixel ratio, never smaller than 1x1.
    #[inline]
    pub fn physical_size(self, dpr: f64) -> (u32, u32) {
        let w = (self.width * dpr).round().max(1.0);
        let h = (self.height * dpr).round().max(1.0);
        (w as u32, h as u32)
    }
}
