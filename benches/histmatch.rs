use criterion::{criterion_group, criterion_main, Criterion};
use histmatch::{
    build_histogram, intersect, project_color_axes, AxisBins, DistanceMetric, MemoryCatalog,
    PixelArray, RetrievalConfig, RetrievalMode, Retriever,
};
use std::hint::black_box;

fn make_image(width: usize, height: usize, seed: usize) -> PixelArray {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            data.push(((x * 13 + seed) ^ (y * 7)) as u8);
            data.push(((x * y + seed * 3) & 0xFF) as u8);
            data.push(((y * 5) ^ (x + seed * 11)) as u8);
        }
    }
    PixelArray::rgb(data, width, height).unwrap()
}

fn bench_features(c: &mut Criterion) {
    let image = make_image(256, 256, 1);
    c.bench_function("build_histogram_255", |b| {
        b.iter(|| black_box(build_histogram(image.clone(), 255, false).unwrap()));
    });

    let hist = build_histogram(image, 255, false).unwrap();
    c.bench_function("project_color_axes", |b| {
        b.iter(|| black_box(project_color_axes(&hist, AxisBins::default()).unwrap()));
    });

    let coarse = build_histogram(make_image(256, 256, 2), 64, false).unwrap();
    c.bench_function("intersect_rescaled", |b| {
        b.iter(|| black_box(intersect(&coarse, &hist).unwrap()));
    });
}

fn bench_retrieval(c: &mut Criterion) {
    let mut catalog = MemoryCatalog::new(128).unwrap();
    for i in 0..1000 {
        catalog
            .add(format!("ref{i}"), make_image(32, 32, i))
            .unwrap();
    }
    let query = build_histogram(make_image(32, 32, 500), 128, false).unwrap();

    let intersection = Retriever::new();
    c.bench_function("retrieve_intersection_1000", |b| {
        b.iter(|| black_box(intersection.search(&catalog, &query).unwrap()));
    });

    let incremental = Retriever::new().with_config(RetrievalConfig {
        mode: RetrievalMode::Incremental,
        metric: DistanceMetric::Euclidean,
        ..RetrievalConfig::default()
    });
    c.bench_function("retrieve_incremental_1000", |b| {
        b.iter(|| black_box(incremental.search(&catalog, &query).unwrap()));
    });

    if cfg!(feature = "rayon") {
        let parallel = Retriever::new().with_config(RetrievalConfig {
            parallel: true,
            ..RetrievalConfig::default()
        });
        c.bench_function("retrieve_intersection_1000_parallel", |b| {
            b.iter(|| black_box(parallel.search(&catalog, &query).unwrap()));
        });
    }
}

criterion_group!(benches, bench_features, bench_retrieval);
criterion_main!(benches);
