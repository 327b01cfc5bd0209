use crate::{Bounds3f, Float, Point2f, Point3f, Vec3f};
use cgmath::InnerSpace;

/// A vertex in world space. Positions and normals are expected to already
/// carry the owning model's transform (and its inverse-transpose for
/// normals) before they reach the spatial index.
#[derive(Copy, Clone, Debug)]
pub struct Vertex {
    pub position: Point3f,
    pub normal: Vec3f,
    pub tangent: Vec3f,
    pub bitangent: Vec3f,
    pub texcoord: Point2f,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Point3f::new(0.0, 0.0, 0.0),
            normal: Vec3f::new(0.0, 0.0, 0.0),
            tangent: Vec3f::new(0.0, 0.0, 0.0),
            bitangent: Vec3f::new(0.0, 0.0, 0.0),
            texcoord: Point2f::new(0.0, 0.0),
        }
    }
}

/// An indexed triangle with its precomputed area, bound and bound centroid.
///
/// Triangles are value-identical regardless of their array position; the
/// position only gains meaning relative to the BVH that permutes the array.
#[derive(Copy, Clone, Debug)]
pub struct Triangle {
    pub indices: [u32; 3],
    pub material_id: u32,
    pub texture_id: Option<u32>,
    pub area: Float,
    pub bound: Bounds3f,
    pub centroid: Point3f,
}

impl Triangle {
    pub fn new(
        indices: [u32; 3],
        material_id: u32,
        texture_id: Option<u32>,
        vertices: &[Vertex],
    ) -> Self {
        let p0 = vertices[indices[0] as usize].position;
        let p1 = vertices[indices[1] as usize].position;
        let p2 = vertices[indices[2] as usize].position;
        let bound = Bounds3f::empty()
            .join_point(&p0)
            .join_point(&p1)
            .join_point(&p2);
        let area = (p1 - p0).cross(p2 - p0).magnitude() * 0.5;
        Self {
            indices,
            material_id,
            texture_id,
            area,
            bound,
            centroid: bound.centroid(),
        }
    }

    pub fn positions(&self, vertices: &[Vertex]) -> [Point3f; 3] {
        [
            vertices[self.indices[0] as usize].position,
            vertices[self.indices[1] as usize].position,
            vertices[self.indices[2] as usize].position,
        ]
    }
}

/// Surface description. Only `emissive` and `base_color` are consumed by the
/// implemented diffuse BSDF; the remaining parameters are carried for a
/// fuller scattering model and for the flat GPU layout.
#[derive(Copy, Clone, Debug)]
pub struct Material {
    pub emissive: Vec3f,
    pub base_color: Vec3f,
    pub subsurface: Float,
    pub metallic: Float,
    pub specular: Float,
    pub specular_tint: Float,
    pub roughness: Float,
    pub anisotropic: Float,
    pub sheen: Float,
    pub sheen_tint: Float,
    pub clearcoat: Float,
    pub clearcoat_gloss: Float,
    pub ior: Float,
    pub transmission: Float,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            emissive: Vec3f::new(0.0, 0.0, 0.0),
            base_color: Vec3f::new(0.8, 0.8, 0.8),
            subsurface: 0.0,
            metallic: 0.0,
            specular: 0.0,
            specular_tint: 0.0,
            roughness: 0.5,
            anisotropic: 0.0,
            sheen: 0.0,
            sheen_tint: 0.0,
            clearcoat: 0.0,
            clearcoat_gloss: 0.0,
            ior: 1.0,
            transmission: 0.0,
        }
    }
}

impl Material {
    pub fn is_emissive(&self) -> bool {
        self.emissive.x != 0.0 || self.emissive.y != 0.0 || self.emissive.z != 0.0
    }
}
