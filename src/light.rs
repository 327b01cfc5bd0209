use crate::mesh::{Material, Triangle, Vertex};
use crate::{Float, Point2f, Point3f, Vec3f};
use cgmath::{EuclideanSpace, InnerSpace};
use tracing::info;

/// One emissive triangle, identified by its index into the *permuted*
/// triangle array, with the running surface-area prefix sum up to and
/// including itself.
#[derive(Copy, Clone, Debug)]
pub struct Light {
    pub tri_index: u32,
    pub prefix_area: Float,
}

/// A point sampled uniformly by area across all emissive surface.
#[derive(Copy, Clone, Debug)]
pub struct LightSample {
    pub p: Point3f,
    pub n: Vec3f,
    pub material_id: u32,
    /// Selection density with respect to area: `1 / total_area`.
    pub pdf: Float,
}

/// Discrete distribution over emissive triangle area.
///
/// Built after the BVH so the stored indices are valid against the permuted
/// triangle order; rebuilding the BVH invalidates the table.
pub struct LightTable {
    lights: Vec<Light>,
    total_area: Float,
}

impl LightTable {
    pub fn from_triangles(triangles: &[Triangle], materials: &[Material]) -> Self {
        let mut lights = Vec::new();
        let mut prefix_area = 0.0;
        for (i, tri) in triangles.iter().enumerate() {
            if materials[tri.material_id as usize].is_emissive() {
                prefix_area += tri.area;
                lights.push(Light { tri_index: i as u32, prefix_area });
            }
        }
        info!(lights = lights.len(), total_area = prefix_area as f64, "built light table");
        Self { lights, total_area: prefix_area }
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn total_area(&self) -> Float {
        self.total_area
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Pick an emissive triangle by inverse-CDF search: the first entry
    /// whose prefix area reaches `u * total_area`. Returns `None` when
    /// there is no emissive surface, making direct lighting a no-op.
    pub fn pick(&self, u: Float) -> Option<u32> {
        if self.lights.is_empty() || self.total_area <= 0.0 {
            return None;
        }
        let target = u * self.total_area;
        let i = self
            .lights
            .partition_point(|l| l.prefix_area < target)
            .min(self.lights.len() - 1);
        Some(self.lights[i].tri_index)
    }

    /// Draw a point uniformly by area over all emissive surface: pick a
    /// triangle with `u`, then sample it with the square-root barycentric
    /// transform.
    pub fn sample(
        &self,
        triangles: &[Triangle],
        vertices: &[Vertex],
        u: Float,
        u2: Point2f,
    ) -> Option<LightSample> {
        let tri = &triangles[self.pick(u)? as usize];
        let v0 = &vertices[tri.indices[0] as usize];
        let v1 = &vertices[tri.indices[1] as usize];
        let v2 = &vertices[tri.indices[2] as usize];

        let sqrt_u0 = u2.x.sqrt();
        let b0 = 1.0 - sqrt_u0;
        let b1 = u2.y * sqrt_u0;
        let b2 = 1.0 - b0 - b1;

        let p = Point3f::from_vec(
            v0.position.to_vec() * b0 + v1.position.to_vec() * b1 + v2.position.to_vec() * b2,
        );

        let zero = Vec3f::new(0.0, 0.0, 0.0);
        let n = if v0.normal == zero || v1.normal == zero || v2.normal == zero {
            (v1.position - v0.position)
                .cross(v2.position - v0.position)
                .normalize()
        } else {
            (v0.normal * b0 + v1.normal * b1 + v2.normal * b2).normalize()
        };

        Some(LightSample {
            p,
            n,
            material_id: tri.material_id,
            pdf: 1.0 / self.total_area,
        })
    }
}
