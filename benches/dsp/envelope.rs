//! Benchmarks for the tick path of the envelope engine.

use std::hint::black_box;

use adsr_cv::dsp::{EnvelopeEngine, EnvelopeParameters};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let params = EnvelopeParameters::new(255, 255, 1500, 255, 4000).unwrap();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0u16; size];

        // Attack/decay (walking the table)
        let mut env = EnvelopeEngine::new(params);
        group.bench_with_input(BenchmarkId::new("attack_decay", size), &size, |b, _| {
            b.iter(|| {
                env.trigger();
                env.render(black_box(&mut buffer));
            })
        });

        // Sustain (holding steady)
        let mut env = EnvelopeEngine::new(params.with_attack(0).with_decay(0));
        env.trigger();
        env.render(&mut [0u16; 4]);
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });

        // Release (rebuilt each iteration from the sustain level)
        let mut env = EnvelopeEngine::new(params.with_attack(0).with_decay(0));
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                env.trigger();
                env.render(&mut [0u16; 4]);
                env.release();
                env.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
