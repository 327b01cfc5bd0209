use crate::{Float, Point3f, Ray, Vec3f, INFINITY};

/// Axis-aligned bounding box.
///
/// The empty box uses the min = +inf, max = -inf sentinel so that `join` is
/// associative and commutative with `empty` as the identity element.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    pub min: Point3f,
    pub max: Point3f,
}

impl Bounds3f {
    pub fn with_bounds(min: Point3f, max: Point3f) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3f::new(INFINITY, INFINITY, INFINITY),
            max: Point3f::new(-INFINITY, -INFINITY, -INFINITY),
        }
    }

    pub fn join(&self, other: &Bounds3f) -> Self {
        Self::with_bounds(
            Point3f::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Point3f::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    pub fn join_point(&self, p: &Point3f) -> Self {
        Self::with_bounds(
            Point3f::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z)),
            Point3f::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z)),
        )
    }

    pub fn diagonal(&self) -> Vec3f {
        self.max - self.min
    }

    pub fn surface_area(&self) -> Float {
        let d = self.diagonal();
        (d.x * d.y + d.x * d.z + d.y * d.z) * 2.0
    }

    pub fn centroid(&self) -> Point3f {
        self.min + self.diagonal() * 0.5
    }

    /// Ray-slab test against the interval `[0, t_max]`.
    ///
    /// Zero direction components divide to IEEE infinities; the 0/0 = NaN
    /// case is discarded by `f32::min`/`f32::max` rather than widening the
    /// interval.
    pub fn intersect_p(&self, ray: &Ray, t_max: Float) -> bool {
        let mut t0: Float = 0.0;
        let mut t1 = t_max;
        for i in 0..3 {
            let inv_dir = 1.0 / ray.dir[i];
            let mut t_near = (self.min[i] - ray.origin[i]) * inv_dir;
            let mut t_far = (self.max[i] - ray.origin[i]) * inv_dir;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            t0 = t0.max(t_near);
            t1 = t1.min(t_far);
            if t0 > t1 {
                return false;
            }
        }
        true
    }
}
