use std::env;
use std::time::{Duration, Instant};

use cfft_q16::{Cluster, Q16Plan, SUPPORTED_LENGTHS};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rustfft::num_complex::Complex32;
use rustfft::FftPlanner as RustFftPlanner;

/// Core counts to benchmark, from `CFFT_BENCH_CORES` (comma separated).
fn core_counts() -> Vec<usize> {
    env::var("CFFT_BENCH_CORES")
        .ok()
        .map(|s| {
            s.split(',')
                .filter_map(|p| p.trim().parse::<usize>().ok())
                .filter(|&n| n > 0)
                .collect()
        })
        .unwrap_or_else(|| vec![1, 2, 4, 8])
}

fn input(size: usize) -> Vec<i16> {
    (0..2 * size)
        .map(|i| (((i * 7919) % 32768) as i32 - 16384) as i16)
        .collect()
}

fn bench_length(c: &mut Criterion, size: usize, clusters: &[Cluster]) {
    let mut group = c.benchmark_group(format!("cfft_q16_{}", size));
    group.throughput(Throughput::Elements(size as u64));

    let plan = Q16Plan::new(size).unwrap();
    let input = input(size);
    let mut data = input.clone();

    group.bench_function(BenchmarkId::new("q16/single", size), |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::ZERO;
            for _ in 0..iters {
                data.copy_from_slice(&input);
                let start = Instant::now();
                plan.fft(&mut data).unwrap();
                total += start.elapsed();
            }
            total
        });
    });

    for cluster in clusters.iter().filter(|c| c.cores() > 1) {
        let label = format!("q16/cores_{}", cluster.cores());
        group.bench_function(BenchmarkId::new(label, size), |b| {
            b.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    data.copy_from_slice(&input);
                    let start = Instant::now();
                    plan.fft_on(cluster, &mut data).unwrap();
                    total += start.elapsed();
                }
                total
            });
        });
    }

    let float_input: Vec<Complex32> = input
        .chunks(2)
        .map(|c| Complex32::new(c[0] as f32, c[1] as f32))
        .collect();
    let mut float_data = float_input.clone();
    let mut planner = RustFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(size);
    group.bench_function(BenchmarkId::new("rustfft/f32", size), |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::ZERO;
            for _ in 0..iters {
                float_data.copy_from_slice(&float_input);
                let start = Instant::now();
                fft.process(&mut float_data);
                total += start.elapsed();
            }
            total
        });
    });

    group.finish();
}

fn main_bench(c: &mut Criterion) {
    let clusters: Vec<Cluster> = core_counts()
        .into_iter()
        .filter_map(|n| Cluster::new(n).ok())
        .collect();
    for &size in SUPPORTED_LENGTHS.iter() {
        bench_length(c, size, &clusters);
    }
}

criterion_group!(benches, main_bench);
criterion_main!(benches);
