use crate::bvh::Bvh;
use crate::light::{LightSample, LightTable};
use crate::mesh::{Material, Triangle, Vertex};
use crate::texture::Texture;
use crate::{Bounds3f, Float, Interaction, Matrix4, Point2f, Ray, Vec3f};
use cgmath::{InnerSpace, Matrix, SquareMatrix, Transform};

/// Everything the integrator reads: the spatial index (which owns the
/// permuted vertex/triangle arrays), the material and texture tables, and
/// the light table derived from the permuted triangle order.
///
/// The scene is an explicit value owned by the caller; building two scenes
/// side by side is fine, nothing is process-global. Once constructed it is
/// read-only.
pub struct Scene {
    pub bvh: Bvh,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub lights: LightTable,
}

impl Scene {
    /// Consume flat world-space arrays: build the BVH (permuting the
    /// triangles) and then scan the permuted order for emissive surface.
    pub fn new(
        vertices: Vec<Vertex>,
        triangles: Vec<Triangle>,
        materials: Vec<Material>,
        textures: Vec<Texture>,
    ) -> Self {
        let bvh = Bvh::build(vertices, triangles);
        let lights = LightTable::from_triangles(&bvh.triangles, &materials);
        Self { bvh, materials, textures, lights }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Interaction> {
        self.bvh.intersect(ray)
    }

    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.bvh.intersect_p(ray)
    }

    pub fn sample_light(&self, u: Float, u2: Point2f) -> Option<LightSample> {
        self.lights.sample(&self.bvh.triangles, &self.bvh.vertices, u, u2)
    }

    pub fn material(&self, id: u32) -> &Material {
        &self.materials[id as usize]
    }

    /// Surface albedo at a hit point: the nearest texel when the triangle
    /// carries a texture, the material base color otherwise.
    pub fn base_color(&self, isect: &Interaction) -> Vec3f {
        match isect.texture_id {
            Some(id) => self.textures[id as usize].sample(isect.uv.x, isect.uv.y),
            None => self.material(isect.material_id).base_color,
        }
    }

    pub fn world_bound(&self) -> Bounds3f {
        self.bvh.world_bound()
    }
}

/// Flattens transformed meshes into the world-space vertex/triangle/material
/// arrays the core consumes, applying each mesh's model matrix to positions
/// and tangents and its inverse-transpose to normals.
pub struct SceneBuilder {
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
    materials: Vec<Material>,
    textures: Vec<Texture>,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
        }
    }

    pub fn add_material(&mut self, material: Material) -> u32 {
        self.materials.push(material);
        (self.materials.len() - 1) as u32
    }

    pub fn add_texture(&mut self, texture: Texture) -> u32 {
        self.textures.push(texture);
        (self.textures.len() - 1) as u32
    }

    /// Append one mesh. `indices` come in triples local to `vertices`;
    /// they are offset into the flattened array here.
    pub fn add_mesh(
        &mut self,
        model: Matrix4,
        vertices: &[Vertex],
        indices: &[u32],
        material_id: u32,
        texture_id: Option<u32>,
    ) {
        assert_eq!(indices.len() % 3, 0);
        assert!((material_id as usize) < self.materials.len());

        let normal_matrix = model
            .invert()
            .expect("model matrix must be invertible")
            .transpose();

        let base = self.vertices.len() as u32;
        for v in vertices {
            self.vertices.push(Vertex {
                position: model.transform_point(v.position),
                normal: normal_matrix.transform_vector(v.normal),
                tangent: model.transform_vector(v.tangent),
                bitangent: model.transform_vector(v.bitangent),
                texcoord: v.texcoord,
            });
        }
        for tri in indices.chunks_exact(3) {
            self.triangles.push(Triangle::new(
                [base + tri[0], base + tri[1], base + tri[2]],
                material_id,
                texture_id,
                &self.vertices,
            ));
        }
    }

    /// Convenience for axis-aligned scene walls and light panels: a quad
    /// from four corners with one shared normal.
    pub fn add_quad(
        &mut self,
        corners: [crate::Point3f; 4],
        normal: Vec3f,
        material_id: u32,
        texture_id: Option<u32>,
    ) {
        let n = normal.normalize();
        let vertices: Vec<Vertex> = corners
            .iter()
            .zip(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
            .map(|(&corner, &(u, v))| Vertex {
                position: corner,
                normal: n,
                texcoord: Point2f::new(u, v),
                ..Vertex::default()
            })
            .collect();
        self.add_mesh(
            Matrix4::identity(),
            &vertices,
            &[0, 1, 2, 0, 2, 3],
            material_id,
            texture_id,
        );
    }

    pub fn build(self) -> Scene {
        Scene::new(self.vertices, self.triangles, self.materials, self.textures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Material;
    use crate::{point3f, vec3f};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_builder_applies_transform() {
        let mut builder = SceneBuilder::new();
        let mat = builder.add_material(Material::default());

        let vertices = vec![
            Vertex { position: point3f!(0, 0, 0), normal: vec3f!(0, 0, 1), ..Vertex::default() },
            Vertex { position: point3f!(1, 0, 0), normal: vec3f!(0, 0, 1), ..Vertex::default() },
            Vertex { position: point3f!(0, 1, 0), normal: vec3f!(0, 0, 1), ..Vertex::default() },
        ];
        let model = Matrix4::from_translation(vec3f!(0, 0, 5)) * Matrix4::from_scale(2.0);
        builder.add_mesh(model, &vertices, &[0, 1, 2], mat, None);
        let scene = builder.build();

        // scaled by 2 and lifted to z = 5
        assert_eq!(scene.bvh.triangles[0].area, 2.0);
        let ray = Ray::new(point3f!(0.2, 0.2, 10), vec3f!(0, 0, -1));
        let isect = scene.intersect(&ray).expect("expected a hit");
        assert_abs_diff_eq!(isect.t, 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(isect.n.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_quad_scene_lights() {
        let mut builder = SceneBuilder::new();
        let lamp = builder.add_material(Material {
            emissive: vec3f!(5, 5, 5),
            ..Material::default()
        });
        builder.add_quad(
            [
                point3f!(0, 2, 0),
                point3f!(1, 2, 0),
                point3f!(1, 2, 1),
                point3f!(0, 2, 1),
            ],
            vec3f!(0, -1, 0),
            lamp,
            None,
        );
        let scene = builder.build();
        assert_eq!(scene.lights.len(), 2);
        assert_abs_diff_eq!(scene.lights.total_area(), 1.0, epsilon = 1e-6);

        let s = scene.sample_light(0.3, Point2f::new(0.5, 0.5)).unwrap();
        assert_abs_diff_eq!(s.p.y, 2.0, epsilon = 1e-6);
        assert_eq!(s.material_id, lamp);
    }

    #[test]
    fn test_base_color_prefers_texture() {
        let mut builder = SceneBuilder::new();
        let mat = builder.add_material(Material {
            base_color: vec3f!(0.8, 0.8, 0.8),
            ..Material::default()
        });
        let tex = builder.add_texture(crate::texture::Texture::new(
            1,
            1,
            vec![vec3f!(0.1, 0.2, 0.3)],
        ));
        builder.add_quad(
            [
                point3f!(0, 0, 0),
                point3f!(1, 0, 0),
                point3f!(1, 1, 0),
                point3f!(0, 1, 0),
            ],
            vec3f!(0, 0, 1),
            mat,
            Some(tex),
        );
        let scene = builder.build();
        let ray = Ray::new(point3f!(0.5, 0.25, 1), vec3f!(0, 0, -1));
        let isect = scene.intersect(&ray).unwrap();
        assert_eq!(scene.base_color(&isect), vec3f!(0.1, 0.2, 0.3));

        let plain = Interaction { texture_id: None, ..isect };
        assert_eq!(scene.base_color(&plain), vec3f!(0.8, 0.8, 0.8));
    }
}
