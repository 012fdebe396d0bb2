//! Performance benchmarks for overpass-stitch
//!
//! Run with: cargo bench
//!
//! Covers the two hot paths: stitching fragmented polylines and full area
//! reconstruction through the ring-closure and polygon-assembly pipeline.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use overpass_stitch::{RawWay, Relation, RelationMember, reconstruct_areas, reconstruct_lines};

const EPS: f64 = 1e-5;

/// Split a circle of `num_points` vertices into `num_fragments` arc fragments,
/// reversing every other fragment to exercise orientation handling.
fn generate_ring_fragments(num_points: usize, num_fragments: usize) -> Vec<Vec<(f64, f64)>> {
    let vertices: Vec<(f64, f64)> = (0..=num_points)
        .map(|i| {
            let angle = (i % num_points) as f64 / num_points as f64 * std::f64::consts::TAU;
            (0.05 * angle.cos(), 0.05 * angle.sin())
        })
        .collect();

    let chunk = num_points / num_fragments;
    let mut fragments = Vec::with_capacity(num_fragments);
    for f in 0..num_fragments {
        let start = f * chunk;
        let end = if f == num_fragments - 1 {
            num_points
        } else {
            (f + 1) * chunk
        };
        let mut fragment: Vec<(f64, f64)> = vertices[start..=end].to_vec();
        if f % 2 == 1 {
            fragment.reverse();
        }
        fragments.push(fragment);
    }
    fragments
}

fn generate_ways(num_fragments: usize) -> Vec<RawWay> {
    generate_ring_fragments(1024, num_fragments)
        .into_iter()
        .map(RawWay::from_coords)
        .collect()
}

fn generate_relation(id: i64, num_fragments: usize) -> Relation {
    let members = generate_ring_fragments(1024, num_fragments)
        .into_iter()
        .map(|fragment| RelationMember::way("outer", fragment))
        .collect();
    Relation::new(id, members)
}

fn bench_stitching(c: &mut Criterion) {
    let mut group = c.benchmark_group("stitch");

    for &num_fragments in &[8usize, 64, 256] {
        let ways = generate_ways(num_fragments);
        group.throughput(Throughput::Elements(num_fragments as u64));
        group.bench_with_input(
            BenchmarkId::new("reconstruct_lines", num_fragments),
            &ways,
            |b, ways| b.iter(|| reconstruct_lines(ways, EPS)),
        );
    }

    group.finish();
}

fn bench_area_reconstruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("areas");

    for &num_fragments in &[8usize, 64, 256] {
        let relations = vec![generate_relation(1, num_fragments)];
        group.throughput(Throughput::Elements(num_fragments as u64));
        group.bench_with_input(
            BenchmarkId::new("reconstruct_areas", num_fragments),
            &relations,
            |b, relations| b.iter(|| reconstruct_areas(relations, EPS).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_stitching, bench_area_reconstruction);
criterion_main!(benches);
