use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use ndarray::Array1;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use starspots::{Angle, SolarSunspotSampler, Spot, Star};

fn spotted_star(n_spots: usize) -> Star<f64> {
    let mut sampler = SolarSunspotSampler::new(ChaChaRng::seed_from_u64(0));
    let spots = (0..n_spots)
        .map(|_| Spot::from_sunspot_distribution(&mut sampler, Angle::degrees(15.), 20.))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    Star::new(spots)
}

fn flux_benchmark(c: &mut Criterion) {
    let mut flux = c.benchmark_group("flux");
    flux.sample_size(10);

    let star = spotted_star(100);
    let times = Array1::random(10_000, Uniform::new(0., 100.));
    flux.bench_function("flux blocking", |b| {
        b.iter_batched(
            || star.clone(),
            |mut s| s.flux(times.view(), 0.),
            BatchSize::SmallInput,
        )
    });

    flux.bench_function("flux parallel", |b| {
        b.iter(|| star.flux_par(times.view(), 0.))
    });
}

fn image_benchmark(c: &mut Criterion) {
    let mut image = c.benchmark_group("image");
    image.sample_size(10);

    let star = spotted_star(100);
    image.bench_function("image blocking", |b| b.iter(|| star.compute_image(500)));
    image.bench_function("image parallel", |b| b.iter(|| star.compute_image_par(500)));
}

criterion_group!(benches, flux_benchmark, image_benchmark);
criterion_main!(benches);
