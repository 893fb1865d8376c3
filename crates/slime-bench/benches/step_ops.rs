//! Criterion benchmarks for whole-tick stepping and the individual kernels.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use slime_bench::{guided_settings, reference_profile, swirl_guides};
use slime_core::{FrameTiming, TickId};
use slime_engine::{SimConfig, Simulation};
use slime_field::TrailGrid;
use slime_kernel::{Kernel, KernelContext, RayonExecutor, SerialExecutor};
use slime_kernels::Diffuse;

const DT: f32 = 1.0 / 60.0;

fn bench_tick_reference(c: &mut Criterion) {
    let mut sim = Simulation::new(reference_profile(42)).unwrap();
    sim.step(FrameTiming::new(DT, 0.0)).unwrap();

    c.bench_function("tick_256_50k", |b| {
        b.iter(|| {
            let result = sim.step(FrameTiming::new(DT, 0.0)).unwrap();
            black_box(&result);
        });
    });
}

fn bench_tick_serial(c: &mut Criterion) {
    let mut sim =
        Simulation::with_executor(reference_profile(42), Box::new(SerialExecutor)).unwrap();
    sim.step(FrameTiming::new(DT, 0.0)).unwrap();

    c.bench_function("tick_256_50k_serial", |b| {
        b.iter(|| {
            let result = sim.step(FrameTiming::new(DT, 0.0)).unwrap();
            black_box(&result);
        });
    });
}

fn bench_tick_guided(c: &mut Criterion) {
    let config = SimConfig {
        settings: guided_settings(),
        guides: swirl_guides(256).unwrap(),
        ..reference_profile(42)
    };
    let mut sim = Simulation::new(config).unwrap();

    c.bench_function("tick_256_50k_guided", |b| {
        b.iter(|| {
            let result = sim.step(FrameTiming::new(DT, 0.0)).unwrap();
            black_box(&result);
        });
    });
}

fn bench_diffuse_pair(c: &mut Criterion) {
    let mut source = TrailGrid::new(512).unwrap();
    for (i, v) in source.cells_mut().iter_mut().enumerate() {
        *v = (i % 97) as f32;
    }
    let mut scratch = TrailGrid::new(512).unwrap();
    let mut out = TrailGrid::new(512).unwrap();
    let [h, v] = Diffuse::separable_pair(1, 10.0, 0.2).unwrap();
    let exec = RayonExecutor::new();
    let timing = FrameTiming::new(DT, 0.0);

    c.bench_function("diffuse_pair_512", |b| {
        b.iter(|| {
            let mut ctx = KernelContext::new(&source, timing, TickId(1)).with_target(&mut scratch);
            h.dispatch(&mut ctx, &exec).unwrap();
            let mut ctx = KernelContext::new(&scratch, timing, TickId(1)).with_target(&mut out);
            v.dispatch(&mut ctx, &exec).unwrap();
            black_box(out.total());
        });
    });
}

criterion_group!(
    benches,
    bench_tick_reference,
    bench_tick_serial,
    bench_tick_guided,
    bench_diffuse_pair
);
criterion_main!(benches);
