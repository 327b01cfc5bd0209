//! Flat `f32` encodings of the scene arrays for consumers that upload them
//! to GPU buffers. Field order and stride are part of the contract; keep
//! them stable even if the in-memory types change.

use crate::bvh::BvhNode;
use crate::light::Light;
use crate::mesh::{Material, Triangle, Vertex};

/// position(3) normal(3) tangent(3) bitangent(3) texcoord(2) pad(1)
pub const VERTEX_STRIDE: usize = 15;
/// emissive(3) base_color(3) subsurface metallic specular specular_tint
/// roughness anisotropic sheen sheen_tint clearcoat clearcoat_gloss ior
/// transmission
pub const MATERIAL_STRIDE: usize = 18;
/// i0 i1 i2 material_id texture_id(-1 = none) area
pub const TRIANGLE_STRIDE: usize = 6;
/// min(3) max(3) axis right_child start end pad(2)
pub const NODE_STRIDE: usize = 12;
/// tri_index prefix_area pad(1)
pub const LIGHT_STRIDE: usize = 3;

pub fn pack_vertices(vertices: &[Vertex]) -> Vec<f32> {
    let mut buf = Vec::with_capacity(vertices.len() * VERTEX_STRIDE);
    for v in vertices {
        buf.extend_from_slice(&[v.position.x, v.position.y, v.position.z]);
        buf.extend_from_slice(&[v.normal.x, v.normal.y, v.normal.z]);
        buf.extend_from_slice(&[v.tangent.x, v.tangent.y, v.tangent.z]);
        buf.extend_from_slice(&[v.bitangent.x, v.bitangent.y, v.bitangent.z]);
        buf.extend_from_slice(&[v.texcoord.x, v.texcoord.y]);
        buf.push(0.0);
    }
    buf
}

pub fn pack_materials(materials: &[Material]) -> Vec<f32> {
    let mut buf = Vec::with_capacity(materials.len() * MATERIAL_STRIDE);
    for m in materials {
        buf.extend_from_slice(&[m.emissive.x, m.emissive.y, m.emissive.z]);
        buf.extend_from_slice(&[m.base_color.x, m.base_color.y, m.base_color.z]);
        buf.extend_from_slice(&[
            m.subsurface,
            m.metallic,
            m.specular,
            m.specular_tint,
            m.roughness,
            m.anisotropic,
            m.sheen,
            m.sheen_tint,
            m.clearcoat,
            m.clearcoat_gloss,
            m.ior,
            m.transmission,
        ]);
    }
    buf
}

pub fn pack_triangles(triangles: &[Triangle]) -> Vec<f32> {
    let mut buf = Vec::with_capacity(triangles.len() * TRIANGLE_STRIDE);
    for t in triangles {
        buf.extend_from_slice(&[
            t.indices[0] as f32,
            t.indices[1] as f32,
            t.indices[2] as f32,
            t.material_id as f32,
            t.texture_id.map_or(-1.0, |id| id as f32),
            t.area,
        ]);
    }
    buf
}

pub fn pack_nodes(nodes: &[BvhNode]) -> Vec<f32> {
    let mut buf = Vec::with_capacity(nodes.len() * NODE_STRIDE);
    for n in nodes {
        buf.extend_from_slice(&[n.bound.min.x, n.bound.min.y, n.bound.min.z]);
        buf.extend_from_slice(&[n.bound.max.x, n.bound.max.y, n.bound.max.z]);
        buf.extend_from_slice(&[
            n.axis as f32,
            n.right_child as f32,
            n.start as f32,
            n.end as f32,
            0.0,
            0.0,
        ]);
    }
    buf
}

pub fn pack_lights(lights: &[Light]) -> Vec<f32> {
    let mut buf = Vec::with_capacity(lights.len() * LIGHT_STRIDE);
    for l in lights {
        buf.extend_from_slice(&[l.tri_index as f32, l.prefix_area, 0.0]);
    }
    buf
}
