use crate::{Float, Point2f, Vec3f, PI};

/// Uniform-solid-angle hemisphere sample in the local frame (+z up):
/// `z` drawn uniformly in [0, 1], azimuth uniformly in [0, 2π).
pub fn uniform_sample_hemisphere(u: Point2f) -> Vec3f {
    let z = u.x;
    let r = Float::sqrt(Float::max(0.0, 1.0 - z * z));
    let phi = 2.0 * PI * u.y;
    Vec3f::new(r * phi.cos(), r * phi.sin(), z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cgmath::InnerSpace;

    #[test]
    fn test_hemisphere_sample_is_unit_and_upward() {
        for i in 0..20 {
            for j in 0..20 {
                let u = Point2f::new(i as Float / 20.0, j as Float / 20.0);
                let w = uniform_sample_hemisphere(u);
                assert_abs_diff_eq!(w.magnitude(), 1.0, epsilon = 1e-5);
                assert!(w.z >= 0.0);
            }
        }
    }
}
