use criterion::{Criterion, black_box, criterion_group, criterion_main};
use clustervis::{Engine, FixedEntropy, FrameLog, NoDelay, PointSet};

fn grid_points(side: usize, spacing: f64) -> PointSet {
    let mut set = PointSet::new();
    for x in 0..side {
        for y in 0..side {
            set.add(x as f64 * spacing, y as f64 * spacing);
        }
    }
    set
}

fn benchmark_full_run_dense(c: &mut Criterion) {
    let set = grid_points(30, 12.0);

    c.bench_function("full_run_dense_900", |b| {
        b.iter(|| {
            let mut engine = Engine::with_entropy(FixedEntropy(1));
            engine.set_parameters(20.0, 3).unwrap();
            let mut sink = FrameLog::new();
            engine
                .run(black_box(&set), &mut sink, &mut NoDelay::new())
                .unwrap();
            black_box(sink.frames().len());
        })
    });
}

fn benchmark_full_run_sparse(c: &mut Criterion) {
    // Spacing beyond the radius: every point takes the saturation skip.
    let set = grid_points(30, 100.0);

    c.bench_function("full_run_sparse_900", |b| {
        b.iter(|| {
            let mut engine = Engine::with_entropy(FixedEntropy(1));
            engine.set_parameters(20.0, 3).unwrap();
            let mut sink = FrameLog::new();
            engine
                .run(black_box(&set), &mut sink, &mut NoDelay::new())
                .unwrap();
            black_box(sink.frames().len());
        })
    });
}

criterion_group!(benches, benchmark_full_run_dense, benchmark_full_run_sparse);
criterion_main!(benches);
