use crate::{Float, Vec3f};

/// Decoded RGB texel data with nearest lookup. Decoding image files into
/// texels is the caller's concern; the render core only reads colors.
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<Vec3f>,
}

impl Texture {
    pub fn new(width: u32, height: u32, texels: Vec<Vec3f>) -> Self {
        assert_eq!(texels.len(), (width * height) as usize);
        Self { width, height, texels }
    }

    /// Nearest-texel lookup, normalized RGB. Coordinates outside [0, 1)
    /// clamp to the edge texels.
    pub fn sample(&self, u: Float, v: Float) -> Vec3f {
        let x = ((self.width as Float * u) as i64).max(0).min(self.width as i64 - 1);
        let y = ((self.height as Float * v) as i64).max(0).min(self.height as i64 - 1);
        self.texels[(y as u32 * self.width + x as u32) as usize]
    }
}
