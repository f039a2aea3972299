//! End-to-end segmentation benchmarks.
//!
//! Measures [`graphseg_core::Segmenter::run`] for each execution strategy.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use graphseg_benches::{
    error::BenchSetupError,
    params::{RasterBenchParams, SegmentBenchParams},
    source::{NoisyBlocksConfig, noisy_blocks},
};
use graphseg_core::{DEFAULT_K, DEFAULT_MIN_SIZE, ExecutionStrategy, SegmenterBuilder};

const SEED: u64 = 42;

const SIDES: &[usize] = &[128, 512];

fn segment_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("segment");
    group.sample_size(10);

    for &side in SIDES {
        let raster = RasterBenchParams::square(side, 3);
        let stack = noisy_blocks(&NoisyBlocksConfig::new(raster, SEED))?;
        let params = SegmentBenchParams {
            raster,
            k: DEFAULT_K,
            min_size: DEFAULT_MIN_SIZE,
        };
        group.throughput(Throughput::Elements(raster.pixel_count() as u64));

        for (label, strategy) in [
            ("sequential", ExecutionStrategy::Sequential),
            ("auto", ExecutionStrategy::Auto),
        ] {
            let segmenter = SegmenterBuilder::new()
                .with_k(params.k)
                .with_min_size(params.min_size)
                .with_execution_strategy(strategy)
                .build()?;
            group.bench_with_input(BenchmarkId::new(label, params), &stack, |b, stack| {
                b.iter(|| {
                    if let Err(err) = segmenter.run(stack) {
                        panic!("segmentation failed during benchmark: {err}");
                    }
                });
            });
        }
    }

    group.finish();
    Ok(())
}

fn segment(c: &mut Criterion) {
    if let Err(err) = segment_impl(c) {
        panic!("segment benchmark setup failed: {err}");
    }
}

criterion_group!(benches, segment);
criterion_main!(benches);
