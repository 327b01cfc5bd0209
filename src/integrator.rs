use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::{bsdf, Float, Interaction, Ray, Vec3f, INV_PI};
use cgmath::{ElementWise, InnerSpace};
use smallvec::SmallVec;

/// Per-bounce record kept while walking a path forward; the radiance
/// estimate is folded backward over these after the walk terminates.
struct Bounce {
    /// Emission (bounce 0 only) plus the next-event-estimation term.
    radiance: Vec3f,
    f: Vec3f,
    cos_wi: Float,
    pdf: Float,
}

/// Monte Carlo path-tracing estimator.
///
/// `li` estimates the full rendering equation along a camera ray with
/// next-event estimation at every vertex and Russian-roulette termination;
/// `lo` estimates only the direct term at an already-known surface point.
pub struct PathIntegrator {
    /// Hard cap on path length.
    pub max_depth: u32,
    /// Fixed Russian-roulette continuation probability. Must be below 1.
    pub continue_prob: Float,
    /// Offset applied along the surface normal when spawning secondary
    /// rays, in world units.
    pub shadow_epsilon: Float,
}

impl Default for PathIntegrator {
    fn default() -> Self {
        Self {
            max_depth: 4,
            continue_prob: 0.85,
            shadow_epsilon: 1e-4,
        }
    }
}

impl PathIntegrator {
    pub fn new(max_depth: u32, continue_prob: Float) -> Self {
        Self { max_depth, continue_prob, ..Self::default() }
    }

    /// Estimated radiance arriving along `ray`.
    pub fn li(&self, scene: &Scene, ray: &Ray, sampler: &mut Sampler) -> Vec3f {
        let mut bounces: SmallVec<[Bounce; 8]> = SmallVec::new();
        let mut ray = Ray::with_t_max(ray.origin, ray.dir, ray.t_max);

        for depth in 0..self.max_depth {
            let isect = match scene.intersect(&ray) {
                Some(isect) => isect,
                None => break,
            };
            let material = scene.material(isect.material_id);
            let wo = -ray.dir.normalize();

            let scatter = bsdf::sample_diffuse(
                scene.base_color(&isect),
                isect.n,
                wo,
                sampler.get_2d(),
            );

            let mut radiance = Vec3f::new(0.0, 0.0, 0.0);
            // light seen directly by the camera; later bounces get emission
            // through next-event estimation instead, never twice
            if depth == 0 {
                radiance += material.emissive;
            }
            radiance += self.estimate_direct(scene, &isect, sampler);

            bounces.push(Bounce {
                radiance,
                f: scatter.f,
                cos_wi: scatter.wi.dot(isect.n).abs(),
                pdf: scatter.pdf,
            });

            if sampler.get_1d() >= self.continue_prob {
                break;
            }
            ray = Ray::new(isect.p + isect.n * self.shadow_epsilon, scatter.wi);
        }

        // fold the recorded walk backward into a single estimate
        let mut radiance = Vec3f::new(0.0, 0.0, 0.0);
        for bounce in bounces.iter().rev() {
            radiance = bounce.radiance
                + bounce.f.mul_element_wise(radiance) * bounce.cos_wi
                    / (bounce.pdf * (1.0 - self.continue_prob));
        }
        radiance
    }

    /// Direct-only estimate at a known interaction: emission toward `wo`
    /// plus a single next-event-estimation term. No indirect bounce.
    pub fn lo(&self, scene: &Scene, isect: &Interaction, _wo: Vec3f, sampler: &mut Sampler) -> Vec3f {
        let material = scene.material(isect.material_id);
        material.emissive + self.estimate_direct(scene, isect, sampler)
    }

    /// One next-event-estimation sample:
    /// `f · Le · |cosθ_surface · cosθ_light| / (pdf_light · d²)`, zero when
    /// the scene has no emissive area or the light point is occluded.
    fn estimate_direct(&self, scene: &Scene, isect: &Interaction, sampler: &mut Sampler) -> Vec3f {
        let light = match scene.sample_light(sampler.get_1d(), sampler.get_2d()) {
            Some(light) => light,
            None => return Vec3f::new(0.0, 0.0, 0.0),
        };

        let origin = isect.p + isect.n * self.shadow_epsilon;
        let to_light = light.p - origin;
        // the unnormalized direction makes t = 1 the light point itself;
        // stopping just short avoids re-hitting the sampled triangle
        let shadow_ray = Ray::with_t_max(origin, to_light, 1.0 - self.shadow_epsilon);
        if scene.intersect_p(&shadow_ray) {
            return Vec3f::new(0.0, 0.0, 0.0);
        }

        let d2 = (light.p - isect.p).magnitude2();
        if d2 == 0.0 {
            return Vec3f::new(0.0, 0.0, 0.0);
        }
        let wi = (light.p - isect.p) / d2.sqrt();
        let cos_surface = isect.n.dot(wi);
        let cos_light = light.n.dot(-wi);

        let f = scene.base_color(isect) * INV_PI;
        let emissive = scene.material(light.material_id).emissive;
        f.mul_element_wise(emissive) * (cos_surface * cos_light).abs() / (light.pdf * d2)
    }
}
