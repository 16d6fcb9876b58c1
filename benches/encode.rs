//! Benchmarks for normalization and observation encoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use goalrec::encode::{encode, encode_frame};
use goalrec::normalize::{Groups, apply_groups};
use goalrec::relation::Relation;

fn kitchen_frame(objects: usize) -> Vec<Relation> {
    let variants = ["shell_egg", "boiled_egg", "broken_egg", "mixed_egg"];
    (0..objects)
        .map(|i| {
            let subject = if i % 5 == 0 {
                variants[i % variants.len()].to_string()
            } else {
                format!("obj{i}")
            };
            Relation::binary(subject, "on", format!("obj{}", i + 1))
        })
        .collect()
}

fn egg_groups() -> Groups {
    [(
        "egg",
        ["shell_egg", "boiled_egg", "broken_egg", "mixed_egg", "omelette"],
    )]
    .into_iter()
    .collect()
}

fn bench_apply_groups(c: &mut Criterion) {
    let frame = kitchen_frame(40);
    let groups = egg_groups();

    c.bench_function("apply_groups_40", |bench| {
        bench.iter(|| black_box(apply_groups(&frame, &groups)))
    });
}

fn bench_encode(c: &mut Criterion) {
    let frame = apply_groups(&kitchen_frame(40), &egg_groups());

    c.bench_function("encode_40", |bench| bench.iter(|| black_box(encode(&frame))));
}

fn bench_encode_frame(c: &mut Criterion) {
    let frame = kitchen_frame(40);
    let groups = egg_groups();

    c.bench_function("encode_frame_40", |bench| {
        bench.iter(|| black_box(encode_frame(&frame, &groups)))
    });
}

criterion_group!(benches, bench_apply_groups, bench_encode, bench_encode_frame);
criterion_main!(benches);
