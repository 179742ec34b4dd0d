use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Point3;

use spicecrab::{
    neighbor_walks, parse_spices, positions_and_connections, tokenize, ParseOptions,
    PlacementConfigBuilder, Spices,
};

const LINEAR: &str = "A-B-C-D-E-F-G-H";
const BRANCHED: &str = "A[1]-B(C-D(E))-F-G[2]-H(I)-J[1]-K-L[2]";
const COPOLYMER: &str = "X'1'-20{A[HEAD][1]-B(C)-D[TAIL][1]}#PE-Y[START]'2'-Z[END]'3'";
const MIXTURE: &str = "4<A-B(C)-D>3<E-F-G>";

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    group.bench_function("linear", |b| {
        b.iter(|| black_box(tokenize(black_box(LINEAR)).unwrap()))
    });
    group.bench_function("copolymer", |b| {
        b.iter(|| black_box(tokenize(black_box(COPOLYMER)).unwrap()))
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let options = ParseOptions::default();
    let mut group = c.benchmark_group("parse");

    group.bench_function("linear", |b| {
        b.iter(|| black_box(parse_spices(black_box(LINEAR), &options).unwrap()))
    });
    group.bench_function("branched", |b| {
        b.iter(|| black_box(parse_spices(black_box(BRANCHED), &options).unwrap()))
    });
    group.bench_function("copolymer", |b| {
        b.iter(|| black_box(parse_spices(black_box(COPOLYMER), &options).unwrap()))
    });
    group.bench_function("mixture", |b| {
        b.iter(|| black_box(parse_spices(black_box(MIXTURE), &options).unwrap()))
    });

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let copolymer = parse_spices(COPOLYMER, &ParseOptions::default()).unwrap();
    let spices = Spices::parse(COPOLYMER);
    let config = PlacementConfigBuilder::new()
        .first(Point3::origin())
        .last(Point3::new(10.0, 10.0, 10.0))
        .bond_length(0.47)
        .build()
        .unwrap();

    let mut group = c.benchmark_group("queries");

    group.bench_function("walks_depth_4", |b| {
        b.iter(|| black_box(neighbor_walks(black_box(&copolymer), 4, false)))
    });
    group.bench_function("matrix", |b| {
        b.iter(|| black_box(positions_and_connections(black_box(&copolymer), 1)))
    });
    group.bench_function("coordinates", |b| {
        b.iter(|| black_box(spices.coordinates(black_box(&config)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_queries);
criterion_main!(benches);
