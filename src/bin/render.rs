use std::env::args;

use pathtracer::camera::Camera;
use pathtracer::integrator::PathIntegrator;
use pathtracer::mesh::Material;
use pathtracer::renderer::{render, RenderSettings};
use pathtracer::scene::{Scene, SceneBuilder};
use pathtracer::{point3f, to_rgb, vec3f, Float, Point3f, Vec3f};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let samples_per_pixel: u32 = args().nth(1).map_or(Ok(64), |s| s.parse())?;
    let output = args().nth(2).unwrap_or_else(|| "render.png".to_string());

    let scene = cornell_box();
    let camera = Camera::look_at(
        point3f!(278, 273, -800),
        point3f!(278, 273, 0),
        vec3f!(0, 1, 0),
        40.0,
        1.0,
    );
    let settings = RenderSettings {
        width: 512,
        height: 512,
        samples_per_pixel,
        seed: 0,
    };
    let integrator = PathIntegrator::default();

    let film = render(&scene, &camera, &integrator, &settings);

    // average, gamma-encode and quantize for the PNG
    let scale = 1.0 / samples_per_pixel as Float;
    let mut data = Vec::with_capacity(film.pixels().len() * 3);
    for p in film.pixels() {
        let gamma = (*p * scale).map(|c| c.max(0.0).powf(1.0 / 2.2));
        data.extend_from_slice(&to_rgb(gamma));
    }
    image::save_buffer(&output, &data, film.width, film.height, image::ColorType::Rgb8)?;
    Ok(())
}

fn cornell_box() -> Scene {
    let mut builder = SceneBuilder::new();

    let white = builder.add_material(Material {
        base_color: vec3f!(0.73, 0.73, 0.73),
        ..Material::default()
    });
    let red = builder.add_material(Material {
        base_color: vec3f!(0.65, 0.05, 0.05),
        ..Material::default()
    });
    let green = builder.add_material(Material {
        base_color: vec3f!(0.12, 0.45, 0.15),
        ..Material::default()
    });
    let lamp = builder.add_material(Material {
        emissive: vec3f!(17, 12, 4),
        base_color: vec3f!(0.78, 0.78, 0.78),
        ..Material::default()
    });

    // floor
    builder.add_quad(
        [
            point3f!(0, 0, 0),
            point3f!(555, 0, 0),
            point3f!(555, 0, 555),
            point3f!(0, 0, 555),
        ],
        vec3f!(0, 1, 0),
        white,
        None,
    );
    // ceiling
    builder.add_quad(
        [
            point3f!(0, 555, 0),
            point3f!(555, 555, 0),
            point3f!(555, 555, 555),
            point3f!(0, 555, 555),
        ],
        vec3f!(0, -1, 0),
        white,
        None,
    );
    // back wall
    builder.add_quad(
        [
            point3f!(0, 0, 555),
            point3f!(555, 0, 555),
            point3f!(555, 555, 555),
            point3f!(0, 555, 555),
        ],
        vec3f!(0, 0, -1),
        white,
        None,
    );
    // left wall
    builder.add_quad(
        [
            point3f!(0, 0, 0),
            point3f!(0, 0, 555),
            point3f!(0, 555, 555),
            point3f!(0, 555, 0),
        ],
        vec3f!(1, 0, 0),
        red,
        None,
    );
    // right wall
    builder.add_quad(
        [
            point3f!(555, 0, 0),
            point3f!(555, 555, 0),
            point3f!(555, 555, 555),
            point3f!(555, 0, 555),
        ],
        vec3f!(-1, 0, 0),
        green,
        None,
    );
    // ceiling lamp
    builder.add_quad(
        [
            point3f!(213, 554, 227),
            point3f!(343, 554, 227),
            point3f!(343, 554, 332),
            point3f!(213, 554, 332),
        ],
        vec3f!(0, -1, 0),
        lamp,
        None,
    );

    add_box(&mut builder, point3f!(130, 0, 65), point3f!(295, 165, 230), white);
    add_box(&mut builder, point3f!(265, 0, 295), point3f!(430, 330, 460), white);

    builder.build()
}

/// An axis-aligned block with outward-facing quads.
fn add_box(builder: &mut SceneBuilder, min: Point3f, max: Point3f, material_id: u32) {
    let (x0, y0, z0) = (min.x, min.y, min.z);
    let (x1, y1, z1) = (max.x, max.y, max.z);
    let faces: [([Point3f; 4], Vec3f); 6] = [
        (
            [
                point3f!(x0, y0, z0),
                point3f!(x1, y0, z0),
                point3f!(x1, y1, z0),
                point3f!(x0, y1, z0),
            ],
            vec3f!(0, 0, -1),
        ),
        (
            [
                point3f!(x0, y0, z1),
                point3f!(x1, y0, z1),
                point3f!(x1, y1, z1),
                point3f!(x0, y1, z1),
            ],
            vec3f!(0, 0, 1),
        ),
        (
            [
                point3f!(x0, y0, z0),
                point3f!(x0, y0, z1),
                point3f!(x0, y1, z1),
                point3f!(x0, y1, z0),
            ],
            vec3f!(-1, 0, 0),
        ),
        (
            [
                point3f!(x1, y0, z0),
                point3f!(x1, y0, z1),
                point3f!(x1, y1, z1),
                point3f!(x1, y1, z0),
            ],
            vec3f!(1, 0, 0),
        ),
        (
            [
                point3f!(x0, y0, z0),
                point3f!(x1, y0, z0),
                point3f!(x1, y0, z1),
                point3f!(x0, y0, z1),
            ],
            vec3f!(0, -1, 0),
        ),
        (
            [
                point3f!(x0, y1, z0),
                point3f!(x1, y1, z0),
                point3f!(x1, y1, z1),
                point3f!(x0, y1, z1),
            ],
            vec3f!(0, 1, 0),
        ),
    ];
    for (corners, normal) in &faces {
        builder.add_quad(*corners, *normal, material_id, None);
    }
}
