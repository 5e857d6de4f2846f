use std::rc::Rc;

/// Decoded bitmap handed over by the image-loading collaborator.
///
/// Pixels are premultiplied RGBA8, row-major, tightly packed.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageData {
    /// Wraps an RGBA buffer. Returns `None` when the buffer length does not
    /// match `width * height * 4` or either dimension is zero.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize).checked_mul(height as usize)?.checked_mul(4)?;
        if width == 0 || height == 0 || pixels.len() != expected {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let texels: &[[u8; 4]] = bytemuck::cast_slice(&self.pixels);
        texels.get((y * self.width + x) as usize).copied()
    }
}

/// How a pattern tiles outside the source image.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum PatternRepeat {
    #[default]
    Repeat,
    NoRepeat,
}

/// Image-backed paint. The image is shared so the same pattern can be used by
/// many styles without copying pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub image: Rc<ImageData>,
    pub repeat: PatternRepeat,
}

impl Pattern {
    pub fn new(image: Rc<ImageData>, repeat: PatternRepeat) -> Self {
        Self { image, repeat }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(ImageData::from_rgba8(2, 2, vec![0; 15]).is_none());
        assert!(ImageData::from_rgba8(0, 2, vec![]).is_none());
    }

    #[test]
    fn pixel_lookup_is_row_major() {
        let mut px = vec![0u8; 2 * 2 * 4];
        px[12..16].copy_from_slice(&[1, 2, 3, 4]);
        let img = ImageData::from_rgba8(2, 2, px).unwrap();
        assert_eq!(img.pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(img.pixel(2, 0), None);
    }
}
