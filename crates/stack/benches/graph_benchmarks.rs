use criterion::{black_box, criterion_group, criterion_main, Criterion};

use projovo_stack::{build, render_template, InMemoryProvisioner, Provisioner, StackConfig};

fn bench_build(c: &mut Criterion) {
    let config = StackConfig::default();

    c.bench_function("build_default_stack", |b| {
        b.iter(|| build(black_box(&config)).unwrap())
    });

    let graph = build(&config).unwrap();
    c.bench_function("render_default_stack", |b| {
        b.iter(|| render_template(black_box(&graph)))
    });

    c.bench_function("apply_default_stack_in_memory", |b| {
        let provisioner = InMemoryProvisioner::new("eu-west-1");
        b.iter(|| provisioner.apply(black_box(&graph)).unwrap())
    });
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
