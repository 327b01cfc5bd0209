use crate::mesh::{Triangle, Vertex};
use crate::{max_dimension, permute_point, permute_vec, Float, Interaction, Point3f, Ray};
use cgmath::{EuclideanSpace, InnerSpace};

/// Barycentric weights and parametric distance of a ray-triangle hit.
struct TriHit {
    b0: Float,
    b1: Float,
    b2: Float,
    t: Float,
}

/// Watertight ray-triangle test against the interval `(0, t_max)`.
///
/// The triangle is translated into ray-relative space, the axes permuted so
/// the ray's dominant direction component becomes +z, and the x/y
/// dimensions sheared to align the ray exactly with +z. The signed edge
/// functions of the transformed triangle then decide containment of the
/// origin; shared edges evaluate identically for adjacent triangles, so no
/// ray can slip between them.
fn watertight_test(p0: Point3f, p1: Point3f, p2: Point3f, ray: &Ray, t_max: Float) -> Option<TriHit> {
    // translate vertices so the ray origin is at (0, 0, 0)
    let p0t = p0 - ray.origin.to_vec();
    let p1t = p1 - ray.origin.to_vec();
    let p2t = p2 - ray.origin.to_vec();

    // permute so the dominant direction component is z
    let kz = max_dimension(ray.dir);
    let kx = (kz + 1) % 3;
    let ky = (kx + 1) % 3;
    let dir = permute_vec(ray.dir, kx, ky, kz);
    let mut p0t = permute_point(p0t, kx, ky, kz);
    let mut p1t = permute_point(p1t, kx, ky, kz);
    let mut p2t = permute_point(p2t, kx, ky, kz);

    // shear so the ray points along +z
    let inv_dz = 1.0 / dir.z;
    let shear_x = -dir.x * inv_dz;
    let shear_y = -dir.y * inv_dz;
    p0t.x += shear_x * p0t.z;
    p0t.y += shear_y * p0t.z;
    p1t.x += shear_x * p1t.z;
    p1t.y += shear_y * p1t.z;
    p2t.x += shear_x * p2t.z;
    p2t.y += shear_y * p2t.z;

    // signed edge functions, twice the sub-triangle areas
    let mut e0 = p1t.x * p2t.y - p1t.y * p2t.x;
    let mut e1 = p2t.x * p0t.y - p2t.y * p0t.x;
    let mut e2 = p0t.x * p1t.y - p0t.y * p1t.x;

    // re-evaluate in double precision when an edge function rounds to zero,
    // so points exactly on a shared edge get a consistent sign
    if e0 == 0.0 || e1 == 0.0 || e2 == 0.0 {
        e0 = (p1t.x as f64 * p2t.y as f64 - p1t.y as f64 * p2t.x as f64) as Float;
        e1 = (p2t.x as f64 * p0t.y as f64 - p2t.y as f64 * p0t.x as f64) as Float;
        e2 = (p0t.x as f64 * p1t.y as f64 - p0t.y as f64 * p1t.x as f64) as Float;
    }

    // origin outside the triangle
    if (e0 < 0.0 || e1 < 0.0 || e2 < 0.0) && (e0 > 0.0 || e1 > 0.0 || e2 > 0.0) {
        return None;
    }

    // degenerate (colinear) triangle
    let det = e0 + e1 + e2;
    if det == 0.0 {
        return None;
    }

    // scaled hit distance, tested against (0, t_max * det) before dividing
    p0t.z *= inv_dz;
    p1t.z *= inv_dz;
    p2t.z *= inv_dz;
    let t_scaled = e0 * p0t.z + e1 * p1t.z + e2 * p2t.z;
    if det < 0.0 && (t_scaled >= 0.0 || t_scaled < t_max * det) {
        return None;
    } else if det > 0.0 && (t_scaled <= 0.0 || t_scaled > t_max * det) {
        return None;
    }

    let inv_det = 1.0 / det;
    Some(TriHit {
        b0: e0 * inv_det,
        b1: e1 * inv_det,
        b2: e2 * inv_det,
        t: t_scaled * inv_det,
    })
}

impl Triangle {
    /// Nearest-hit query against `(0, t_max)`. The returned interaction
    /// carries the hit distance; the caller threads the shrinking interval
    /// through subsequent queries.
    pub fn intersect(&self, vertices: &[Vertex], ray: &Ray, t_max: Float) -> Option<Interaction> {
        let v0 = &vertices[self.indices[0] as usize];
        let v1 = &vertices[self.indices[1] as usize];
        let v2 = &vertices[self.indices[2] as usize];

        let hit = watertight_test(v0.position, v1.position, v2.position, ray, t_max)?;

        let p = Point3f::from_vec(
            v0.position.to_vec() * hit.b0
                + v1.position.to_vec() * hit.b1
                + v2.position.to_vec() * hit.b2,
        );
        let uv = crate::Point2f::from_vec(
            v0.texcoord.to_vec() * hit.b0
                + v1.texcoord.to_vec() * hit.b1
                + v2.texcoord.to_vec() * hit.b2,
        );

        let mut n = v0.normal * hit.b0 + v1.normal * hit.b1 + v2.normal * hit.b2;
        if n.magnitude2() == 0.0 {
            // meshes without vertex normals fall back to the face normal
            n = (v1.position - v0.position).cross(v2.position - v0.position);
        }
        let mut n = n.normalize();
        // force the normal to face the incoming ray
        if n.dot(ray.dir) > 0.0 {
            n = -n;
        }

        Some(Interaction {
            p,
            n,
            uv,
            texture_id: self.texture_id,
            material_id: self.material_id,
            t: hit.t,
        })
    }

    /// Occlusion-only variant of the same geometric test. Returns no hit
    /// information and leaves the caller's interval untouched, so shadow
    /// queries cannot perturb the primary ray.
    pub fn intersect_p(&self, vertices: &[Vertex], ray: &Ray, t_max: Float) -> bool {
        let p0 = vertices[self.indices[0] as usize].position;
        let p1 = vertices[self.indices[1] as usize].position;
        let p2 = vertices[self.indices[2] as usize].position;
        watertight_test(p0, p1, p2, ray, t_max).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Triangle, Vertex};
    use crate::{point3f, vec3f, Point2f};
    use approx::assert_abs_diff_eq;

    fn unit_triangle() -> (Vec<Vertex>, Triangle) {
        let mut vertices = vec![Vertex::default(); 3];
        vertices[0].position = point3f!(0, 0, 0);
        vertices[1].position = point3f!(1, 0, 0);
        vertices[2].position = point3f!(0, 1, 0);
        for (v, uv) in vertices.iter_mut().zip(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]) {
            v.normal = vec3f!(0, 0, 1);
            v.texcoord = Point2f::new(uv.0, uv.1);
        }
        let tri = Triangle::new([0, 1, 2], 0, None, &vertices);
        (vertices, tri)
    }

    #[test]
    fn test_unit_triangle_hit() {
        let (vertices, tri) = unit_triangle();
        let ray = Ray::new(point3f!(0.2, 0.2, 1), vec3f!(0, 0, -1));
        let isect = tri.intersect(&vertices, &ray, ray.t_max).expect("expected a hit");

        assert_abs_diff_eq!(isect.t, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(isect.p.x, 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(isect.p.y, 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(isect.p.z, 0.0, epsilon = 1e-6);
        // interpolated vertex normal, already facing the ray
        assert_abs_diff_eq!(isect.n.z, 1.0, epsilon = 1e-6);
        // barycentric blend of the vertex UVs
        assert_abs_diff_eq!(isect.uv.x, 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(isect.uv.y, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_normal_faces_ray_from_behind() {
        let (vertices, tri) = unit_triangle();
        let ray = Ray::new(point3f!(0.2, 0.2, -1), vec3f!(0, 0, 1));
        let isect = tri.intersect(&vertices, &ray, ray.t_max).expect("expected a hit");
        assert_abs_diff_eq!(isect.n.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_miss_outside() {
        let (vertices, tri) = unit_triangle();
        let ray = Ray::new(point3f!(0.9, 0.9, 1), vec3f!(0, 0, -1));
        assert!(tri.intersect(&vertices, &ray, ray.t_max).is_none());
        assert!(!tri.intersect_p(&vertices, &ray, ray.t_max));
    }

    #[test]
    fn test_reject_behind_origin() {
        let (vertices, tri) = unit_triangle();
        let ray = Ray::new(point3f!(0.2, 0.2, -1), vec3f!(0, 0, -1));
        assert!(tri.intersect(&vertices, &ray, ray.t_max).is_none());
    }

    #[test]
    fn test_reject_beyond_t_max() {
        let (vertices, tri) = unit_triangle();
        let ray = Ray::new(point3f!(0.2, 0.2, 1), vec3f!(0, 0, -1));
        assert!(tri.intersect(&vertices, &ray, 0.5).is_none());
        assert!(!tri.intersect_p(&vertices, &ray, 0.5));
    }

    #[test]
    fn test_degenerate_triangle_no_hit() {
        // colinear vertices never report a hit
        let mut vertices = vec![Vertex::default(); 3];
        vertices[0].position = point3f!(0, 0, 0);
        vertices[1].position = point3f!(1, 0, 0);
        vertices[2].position = point3f!(2, 0, 0);
        let tri = Triangle::new([0, 1, 2], 0, None, &vertices);
        let ray = Ray::new(point3f!(0.5, 0, 1), vec3f!(0, 0, -1));
        assert!(tri.intersect(&vertices, &ray, ray.t_max).is_none());
    }

    #[test]
    fn test_intersect_matches_intersect_p() {
        let (vertices, tri) = unit_triangle();
        let hit_ray = Ray::new(point3f!(0.3, 0.3, 2), vec3f!(0, 0, -1));
        assert_eq!(
            tri.intersect(&vertices, &hit_ray, hit_ray.t_max).is_some(),
            tri.intersect_p(&vertices, &hit_ray, hit_ray.t_max)
        );
    }
}
