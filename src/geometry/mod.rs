use crate::{Float, Point3f, Vec3f, INFINITY};
use cgmath::InnerSpace;

pub mod bounds;

pub use bounds::*;

pub fn distance(p1: Point3f, p2: Point3f) -> Float {
    (p1 - p2).magnitude()
}

/// A ray with a parametric query interval `[0, t_max]`.
///
/// `t_max` is the interval the *caller* asks about; intersection routines
/// take it by shared reference and report hit distances in their return
/// value rather than writing back into the ray, so the same ray value can be
/// reused for any number of queries. Shadow rays in particular are never
/// perturbed by the occlusion test.
pub struct Ray {
    pub origin: Point3f,
    pub dir: Vec3f,
    pub t_max: Float,
}

impl Ray {
    pub fn new(origin: Point3f, dir: Vec3f) -> Self {
        Self { origin, dir, t_max: INFINITY }
    }

    pub fn with_t_max(origin: Point3f, dir: Vec3f, t_max: Float) -> Self {
        Self { origin, dir, t_max }
    }

    pub fn at(&self, t: Float) -> Point3f {
        self.origin + self.dir * t
    }
}

/// Index of the largest component of `v` by magnitude.
pub fn max_dimension(v: Vec3f) -> usize {
    if v.x.abs() >= v.y.abs() && v.x.abs() >= v.z.abs() {
        0
    } else if v.y.abs() >= v.z.abs() {
        1
    } else {
        2
    }
}

pub fn permute_vec(v: Vec3f, kx: usize, ky: usize, kz: usize) -> Vec3f {
    Vec3f::new(v[kx], v[ky], v[kz])
}

pub fn permute_point(p: Point3f, kx: usize, ky: usize, kz: usize) -> Point3f {
    Point3f::new(p[kx], p[ky], p[kz])
}
