use crate::{Float, Point2f, Point3f, Vec3f};

/// A surface hit found by the nearest-hit query.
///
/// The normal is the barycentric interpolation of the vertex normals,
/// flipped so it always faces the incoming ray.
#[derive(Copy, Clone, Debug)]
pub struct Interaction {
    pub p: Point3f,
    pub n: Vec3f,
    pub uv: Point2f,
    pub texture_id: Option<u32>,
    pub material_id: u32,
    pub t: Float,
}
