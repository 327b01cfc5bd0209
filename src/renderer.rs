use crate::camera::Camera;
use crate::film::Film;
use crate::integrator::PathIntegrator;
use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::Float;
use indicatif::ProgressBar;
use std::time::Instant;
use tracing::info;

pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            samples_per_pixel: 64,
            seed: 0,
        }
    }
}

/// Sequential per-pixel render loop: every pixel takes
/// `samples_per_pixel` jittered camera rays, each estimated with its own
/// deterministically seeded random stream, and the film accumulates the
/// sums. Callers divide by the sample count when reading the film out.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    integrator: &PathIntegrator,
    settings: &RenderSettings,
) -> Film {
    let start = Instant::now();
    let mut film = Film::new(settings.width, settings.height);
    let progress = ProgressBar::new(settings.height as u64);

    for y in 0..settings.height {
        for x in 0..settings.width {
            for sample in 0..settings.samples_per_pixel {
                let mut sampler = Sampler::for_pixel(settings.seed, x, y, sample);
                let jitter = sampler.get_2d();
                let s = (x as Float + jitter.x) / settings.width as Float;
                // the film's y axis points down, the camera's t axis up
                let t = 1.0 - (y as Float + jitter.y) / settings.height as Float;
                let ray = camera.ray(s, t);
                let radiance = integrator.li(scene, &ray, &mut sampler);
                film.add_sample(x, y, radiance);
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(
        width = settings.width,
        height = settings.height,
        spp = settings.samples_per_pixel,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "render finished"
    );
    film
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Material;
    use crate::scene::SceneBuilder;
    use crate::{point3f, vec3f};

    #[test]
    fn test_render_is_deterministic_for_a_seed() {
        let mut builder = SceneBuilder::new();
        let lamp = builder.add_material(Material {
            emissive: vec3f!(2, 2, 2),
            ..Material::default()
        });
        builder.add_quad(
            [
                point3f!(-1, 0, -1),
                point3f!(1, 0, -1),
                point3f!(1, 0, 1),
                point3f!(-1, 0, 1),
            ],
            vec3f!(0, 1, 0),
            lamp,
            None,
        );
        let scene = builder.build();
        let camera = Camera::look_at(
            point3f!(0, 3, 0),
            point3f!(0, 0, 0),
            vec3f!(0, 0, 1),
            45.0,
            1.0,
        );
        let settings = RenderSettings {
            width: 8,
            height: 8,
            samples_per_pixel: 2,
            seed: 5,
        };
        let integrator = PathIntegrator::default();

        let a = render(&scene, &camera, &integrator, &settings);
        let b = render(&scene, &camera, &integrator, &settings);
        assert_eq!(a.pixels(), b.pixels());

        // the lamp fills the view, so something must be non-zero
        assert!(a.pixels().iter().any(|p| p.x > 0.0));
    }
}
