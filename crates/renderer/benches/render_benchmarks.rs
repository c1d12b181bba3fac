//! Benchmarks for the renderer crate - compositing and PNG encoding.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use radar_common::ScalarGrid;
use renderer::{composite, encode_bitmap, ColorRamp};
use test_utils::create_reflectivity_grid;

fn reflectivity(width: u32, height: u32) -> ScalarGrid {
    let samples = create_reflectivity_grid(width as usize, height as usize);
    ScalarGrid::new(width, height, samples).unwrap()
}

// =============================================================================
// COMPOSITE BENCHMARKS
// =============================================================================

fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");
    let ramp = ColorRamp::reflectivity();

    // (width, height, name)
    let sizes = [
        (256, 256, "tile"),
        (1000, 600, "placeholder_size"),
        (2500, 1200, "alaska_1km"),
    ];

    for (width, height, name) in sizes {
        let grid = reflectivity(width, height);
        group.throughput(Throughput::Elements((width * height) as u64));
        group.bench_with_input(BenchmarkId::new(name, "reflectivity"), &grid, |b, grid| {
            b.iter(|| composite(black_box(grid), black_box(&ramp)))
        });
    }

    group.finish();
}

// =============================================================================
// PNG ENCODING BENCHMARKS
// =============================================================================

fn bench_png_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_encoding");
    let ramp = ColorRamp::reflectivity();

    for (width, height) in [(256u32, 256u32), (1000, 600)] {
        let bitmap = composite(&reflectivity(width, height), &ramp);
        group.throughput(Throughput::Bytes((width * height * 4) as u64));
        group.bench_with_input(
            BenchmarkId::new("indexed", format!("{}x{}", width, height)),
            &bitmap,
            |b, bitmap| b.iter(|| encode_bitmap(black_box(bitmap)).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_composite, bench_png_encoding);
criterion_main!(benches);
