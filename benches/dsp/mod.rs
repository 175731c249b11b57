//! Benchmarks for the envelope primitives.

mod curve;
mod envelope;

pub use curve::bench_curve;
pub use envelope::bench_envelope;
