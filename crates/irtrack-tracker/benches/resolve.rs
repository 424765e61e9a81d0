use criterion::{black_box, criterion_group, criterion_main, Criterion};
use irtrack_core::{RawDetection, Triangulator};
use irtrack_tracker::{CorrespondenceResolver, ResolverParams, StereoFrame};

fn det(x: f64, y: f64) -> RawDetection {
    RawDetection::new(x, y, 2.0)
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = CorrespondenceResolver::new(Triangulator::default(), ResolverParams::default());

    let off_plane = StereoFrame::new(
        [det(400.0, 390.0), det(150.0, 500.0)],
        [det(600.0, 390.0), det(850.0, 460.0)],
    );
    let shared_plane = StereoFrame::new(
        [det(327.0, 497.0), det(138.0, 513.0)],
        [det(882.0, 441.0), det(692.0, 460.0)],
    );
    let partial = StereoFrame::new(
        [det(400.0, 390.0), RawDetection::missing()],
        [RawDetection::missing(), det(600.0, 390.0)],
    );

    let mut group = c.benchmark_group("resolve");
    for (name, frame) in [
        ("residual", off_plane),
        ("shared_plane", shared_plane),
        ("partial", partial),
    ] {
        let mut state = resolver.initial_state();
        group.bench_function(name, |b| {
            b.iter(|| resolver.resolve(black_box(&frame), &mut state))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
