use collex::{from_str, Document, Value};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample_text() -> String {
    let mut doc = Document::new();
    doc.put_one("name", Value::from("benchmark")).unwrap();
    doc.put(
        "tags",
        (0..16).map(|i| Value::from(format!("tag-{i}"))).collect(),
    )
    .unwrap();
    doc.put("nums", (0..64).map(Value::from).collect()).unwrap();
    doc.put_one("ratio", Value::from(0.577_215_664_901_532_9))
        .unwrap();

    let mut nested = Document::new();
    nested.put_one("level", Value::from(1)).unwrap();
    nested
        .put_one("payload", Value::Opaque(vec![0xAB; 256]))
        .unwrap();
    doc.put_one("nested", Value::Collection(nested)).unwrap();

    doc.render(0).unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let text = sample_text();

    c.bench_function("parse_shallow", |b| {
        // Parsing alone only captures raw entries.
        b.iter(|| from_str(black_box(&text)).unwrap());
    });

    c.bench_function("parse_materialize", |b| {
        b.iter(|| {
            let mut doc = from_str(black_box(&text)).unwrap();
            doc.materialize().unwrap();
            doc
        });
    });
}

fn bench_render(c: &mut Criterion) {
    let text = sample_text();
    let mut doc = from_str(&text).unwrap();
    doc.materialize().unwrap();

    c.bench_function("render_inline", |b| {
        b.iter(|| black_box(&mut doc).render(0).unwrap());
    });

    c.bench_function("render_pretty", |b| {
        b.iter(|| black_box(&mut doc).render(4).unwrap());
    });
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
