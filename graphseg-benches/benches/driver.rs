//! Threshold driver benchmarks.
//!
//! Builds each graph once and measures sorting plus the union-find merge loop,
//! then the small-region pass on the resulting partition.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]

use std::num::NonZeroUsize;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};

use graphseg_benches::{
    error::BenchSetupError,
    params::{RasterBenchParams, SegmentBenchParams},
    source::{NoisyBlocksConfig, noisy_blocks},
};
use graphseg_core::{Neighbourhood, PixelGraph, merge_small_regions, segment_graph};

const SEED: u64 = 42;

const SIDES: &[usize] = &[64, 256];

const K_VALUES: &[f32] = &[50.0, 500.0];

const MIN_SIZE: usize = 50;

fn segment_graph_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("segment_graph");
    group.sample_size(20);

    for &side in SIDES {
        let raster = RasterBenchParams::square(side, 3);
        let stack = noisy_blocks(&NoisyBlocksConfig::new(raster, SEED))?;
        let graph = PixelGraph::build(&stack, Neighbourhood::Reference, false);
        let vertices = graph.vertex_count();

        for &k in K_VALUES {
            let params = SegmentBenchParams {
                raster,
                k,
                min_size: MIN_SIZE,
            };
            group.bench_with_input(BenchmarkId::from_parameter(params), graph.edges(), |b, edges| {
                b.iter_batched(
                    || edges.to_vec(),
                    |mut edges| {
                        if let Err(err) = segment_graph(vertices, &mut edges, k, false) {
                            panic!("segment_graph failed during benchmark: {err}");
                        }
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
    Ok(())
}

fn merge_small_regions_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("merge_small_regions");
    group.sample_size(20);
    let min_size = NonZeroUsize::new(MIN_SIZE).unwrap_or(NonZeroUsize::MIN);

    for &side in SIDES {
        let raster = RasterBenchParams::square(side, 3);
        let stack = noisy_blocks(&NoisyBlocksConfig::new(raster, SEED))?;
        let mut edges = PixelGraph::build(&stack, Neighbourhood::Reference, false).into_edges();
        let vertices = raster.pixel_count();
        let partition = segment_graph(vertices, &mut edges, 50.0, false)?;

        group.bench_with_input(BenchmarkId::from_parameter(raster), &edges, |b, edges| {
            b.iter_batched(
                || partition.clone(),
                |mut set| {
                    if let Err(err) = merge_small_regions(&mut set, edges, min_size) {
                        panic!("merge_small_regions failed during benchmark: {err}");
                    }
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
    Ok(())
}

fn driver(c: &mut Criterion) {
    if let Err(err) = segment_graph_impl(c) {
        panic!("segment_graph benchmark setup failed: {err}");
    }
    if let Err(err) = merge_small_regions_impl(c) {
        panic!("merge_small_regions benchmark setup failed: {err}");
    }
}

criterion_group!(benches, driver);
criterion_main!(benches);
