//! Benchmarks for curve table construction (runs on every note event).

use std::hint::black_box;

use adsr_cv::dsp::{build_attack_decay, build_release};
use criterion::{BenchmarkId, Criterion};

use crate::SEGMENT_LENGTHS;

pub fn bench_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/curve");

    for &len in SEGMENT_LENGTHS {
        group.bench_with_input(BenchmarkId::new("attack_decay", len), &len, |b, &len| {
            b.iter(|| build_attack_decay(black_box(len), black_box(len), 1500, 4000))
        });

        group.bench_with_input(BenchmarkId::new("release", len), &len, |b, &len| {
            b.iter(|| build_release(black_box(2731), black_box(len)))
        });
    }

    group.finish();
}
