use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pathtracer::bvh::Bvh;
use pathtracer::mesh::{Triangle, Vertex};
use pathtracer::{vec3f, Float, Point3f, Ray};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

fn triangle_soup(n: usize, seed: u64) -> (Vec<Vertex>, Vec<Triangle>) {
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    for _ in 0..n {
        let center = Point3f::new(
            rng.gen::<Float>() * 100.0,
            rng.gen::<Float>() * 100.0,
            rng.gen::<Float>() * 100.0,
        );
        let base = vertices.len() as u32;
        for _ in 0..3 {
            let mut v = Vertex::default();
            v.position = center + vec3f!(rng.gen::<Float>(), rng.gen::<Float>(), rng.gen::<Float>());
            vertices.push(v);
        }
        triangles.push(Triangle::new([base, base + 1, base + 2], 0, None, &vertices));
    }
    (vertices, triangles)
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("bvh_build_10k", |b| {
        b.iter_with_setup(
            || triangle_soup(10_000, 1),
            |(vertices, triangles)| black_box(Bvh::build(vertices, triangles)),
        )
    });
}

fn bench_intersect(c: &mut Criterion) {
    let (vertices, triangles) = triangle_soup(10_000, 1);
    let bvh = Bvh::build(vertices, triangles);
    let mut rng = Xoshiro256Plus::seed_from_u64(2);
    let rays: Vec<Ray> = (0..1024)
        .map(|_| {
            let origin = Point3f::new(-10.0, rng.gen::<Float>() * 100.0, rng.gen::<Float>() * 100.0);
            let target = Point3f::new(
                110.0,
                rng.gen::<Float>() * 100.0,
                rng.gen::<Float>() * 100.0,
            );
            Ray::new(origin, target - origin)
        })
        .collect();

    c.bench_function("bvh_intersect_1k_rays", |b| {
        b.iter(|| {
            let mut hits = 0;
            for ray in &rays {
                if bvh.intersect(black_box(ray)).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });

    c.bench_function("bvh_intersect_p_1k_rays", |b| {
        b.iter(|| {
            let mut hits = 0;
            for ray in &rays {
                if bvh.intersect_p(black_box(ray)) {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
}

criterion_group!(benches, bench_build, bench_intersect);
criterion_main!(benches);
