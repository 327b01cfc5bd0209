use crate::{Float, Point3f, Ray, Vec3f};
use cgmath::InnerSpace;

/// Pinhole look-at camera. The screen plane sits one unit in front of the
/// eye; `ray(s, t)` maps screen coordinates in [0, 1]² (lower-left origin)
/// to an unnormalized primary ray.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    pub eye: Point3f,
    pub lower_left_corner: Point3f,
    pub horizontal: Vec3f,
    pub vertical: Vec3f,
}

impl Camera {
    /// `fov` is the vertical field of view in degrees, `aspect` is
    /// width / height.
    pub fn look_at(eye: Point3f, center: Point3f, up: Vec3f, fov: Float, aspect: Float) -> Self {
        let theta = fov.to_radians();
        let half_height = (theta * 0.5).tan();
        let half_width = aspect * half_height;

        let w = (eye - center).normalize();
        let u = up.cross(w).normalize();
        let v = w.cross(u);

        Self {
            eye,
            lower_left_corner: eye - u * half_width - v * half_height - w,
            horizontal: u * (2.0 * half_width),
            vertical: v * (2.0 * half_height),
        }
    }

    pub fn ray(&self, s: Float, t: Float) -> Ray {
        Ray::new(
            self.eye,
            self.lower_left_corner + self.horizontal * s + self.vertical * t - self.eye,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{point3f, vec3f};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::look_at(
            point3f!(0, 0, 5),
            point3f!(0, 0, 0),
            vec3f!(0, 1, 0),
            60.0,
            1.0,
        );
        let ray = camera.ray(0.5, 0.5);
        let dir = ray.dir.normalize();
        assert_abs_diff_eq!(dir.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(dir.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(dir.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_corner_rays_span_the_fov() {
        let camera = Camera::look_at(
            point3f!(0, 0, 0),
            point3f!(0, 0, -1),
            vec3f!(0, 1, 0),
            90.0,
            1.0,
        );
        let top = camera.ray(0.5, 1.0).dir.normalize();
        let bottom = camera.ray(0.5, 0.0).dir.normalize();
        // 90 degree vertical fov: the extreme rays are orthogonal
        assert_abs_diff_eq!(top.dot(bottom), 0.0, epsilon = 1e-5);
    }
}
