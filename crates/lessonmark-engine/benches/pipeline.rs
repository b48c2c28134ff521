use criterion::{Criterion, criterion_group, criterion_main};
use lessonmark_engine::{Pipeline, parse_document};

fn generate_lesson(sections: usize) -> String {
    let base = "## [!COMPONENT:X] Section $O(n)$\n\n> [!NOTE]\n> Read this first.\n\nUse **[3!]care** with `[teal!]code`.\n\n1. Step\n   1.1. Detail\n   1.2. Detail\n2. Step\n\n- a) first\n- b) second\n  • point\n  • point\n\n";
    base.repeat(sections)
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let content = generate_lesson(100);
    let pipeline = Pipeline::builder()
        .without_code_import()
        .build()
        .expect("default pipeline");

    group.bench_function("parse_only", |b| {
        b.iter(|| parse_document(std::hint::black_box(&content)));
    });

    group.bench_function("render", |b| {
        b.iter(|| pipeline.render(std::hint::black_box(&content)));
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
