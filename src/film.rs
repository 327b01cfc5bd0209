use crate::{to_rgb, Float, Vec3f};

/// Accumulates per-pixel linear radiance sums, row-major with the origin at
/// the top left of the output image.
pub struct Film {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Vec3f>,
}

impl Film {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3f::new(0.0, 0.0, 0.0); (width * height) as usize],
        }
    }

    pub fn add_sample(&mut self, x: u32, y: u32, radiance: Vec3f) {
        self.pixels[(y * self.width + x) as usize] += radiance;
    }

    /// Unclamped linear radiance sums; tone mapping is the consumer's job.
    pub fn pixels(&self) -> &[Vec3f] {
        &self.pixels
    }

    /// Scale every accumulated sum (by e.g. 1/spp), clamp to [0, 1] and
    /// pack as interleaved 8-bit RGB rows.
    pub fn to_rgb8(&self, scale: Float) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            data.extend_from_slice(&to_rgb(*p * scale));
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3f;

    #[test]
    fn test_accumulate_and_convert() {
        let mut film = Film::new(2, 1);
        film.add_sample(0, 0, vec3f!(0.5, 0.5, 0.5));
        film.add_sample(0, 0, vec3f!(0.5, 0.5, 0.5));
        film.add_sample(1, 0, vec3f!(4, 0, 0));

        let rgb = film.to_rgb8(0.5);
        // averaged to 0.5 gray
        assert_eq!(&rgb[0..3], &[127, 127, 127]);
        // overbright values clamp instead of wrapping
        assert_eq!(&rgb[3..6], &[255, 0, 0]);
    }
}
