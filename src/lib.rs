#[macro_use] pub mod macros; // must stay at the top
pub mod geometry;
pub mod interaction;
pub mod mesh;
pub mod texture;
pub mod triangle;
pub mod bvh;
pub mod light;
pub mod sampling;
pub mod sampler;
pub mod bsdf;
pub mod integrator;
pub mod camera;
pub mod film;
pub mod renderer;
pub mod scene;
pub mod serialize;

pub use geometry::*;
pub use interaction::Interaction;

use cgmath::{Point2, Point3, Vector2, Vector3};

pub type Float = f32;

pub type Point2f = Point2<Float>;
pub type Point3f = Point3<Float>;
pub type Vec2f = Vector2<Float>;
pub type Vec3f = Vector3<Float>;
pub type Matrix4 = cgmath::Matrix4<Float>;

pub const INFINITY: Float = std::f32::INFINITY;
pub const PI: Float = std::f32::consts::PI;
pub const INV_PI: Float = std::f32::consts::FRAC_1_PI;

pub fn to_rgb(v: Vec3f) -> [u8; 3] {
    let clamped = v.map(|x| x.max(0.0).min(1.0) * 255.0);
    [clamped.x as u8, clamped.y as u8, clamped.z as u8]
}
