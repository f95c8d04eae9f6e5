//! Benchmarks for layout selection and deck assembly.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use deckgen::{select, Assembler, LayoutMapping, Presentation, SlideBuilder, SlideContent};

#[path = "../tests/common/mod.rs"]
mod common;

/// Benchmark rule evaluation over a mix of slide shapes.
fn bench_layout_selection(c: &mut Criterion) {
    let mapping = LayoutMapping::default();
    let contents: Vec<SlideContent> = (0..64)
        .map(|i| {
            let mut content = SlideContent::with_title(format!("Slide {}", i));
            if i % 2 == 0 {
                content.bullet_points.push("point".to_string());
            }
            match i % 5 {
                0 => content.image_path = Some("a.png".into()),
                1 => content.table_path = Some("t.xlsx".into()),
                2 => content.chart_path = Some("c.xlsx".into()),
                3 => content.media_path = Some("m.mp4".into()),
                _ => {}
            }
            content
        })
        .collect();

    let mut group = c.benchmark_group("layout_selection");
    group.throughput(Throughput::Elements(contents.len() as u64));
    group.bench_function("mixed_64", |b| {
        b.iter(|| {
            for content in &contents {
                black_box(select(black_box(content), &mapping));
            }
        });
    });
    group.finish();
}

/// Benchmark assembly of text-and-table decks at various sizes.
fn bench_assembly(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let template = common::write_template(dir.path());
    common::write_workbook(
        dir.path(),
        "table.xlsx",
        &[&["Name", "Value"], &["a", "1"], &["b", "2"], &["c", "3"]],
    );
    let mapping = LayoutMapping::default();
    let assembler = Assembler::new().with_asset_root(dir.path());

    let mut group = c.benchmark_group("assembly");
    group.sample_size(20);

    for slide_count in [1, 10, 50].iter() {
        let mut deck = Presentation::new("Benchmark");
        for i in 0..*slide_count {
            let mut builder = SlideBuilder::new(&mapping);
            builder
                .set_title(format!("Slide {}", i))
                .add_bullet_point("First point")
                .add_bullet_point("Second point");
            if i % 3 == 0 {
                builder.set_table("table.xlsx");
            }
            deck.push(builder.finalize());
        }
        let output = dir.path().join(format!("bench_{}.pptx", slide_count));

        group.bench_with_input(BenchmarkId::new("slides", slide_count), &deck, |b, deck| {
            b.iter(|| {
                let _ = assembler.assemble(black_box(deck), &template, &output);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout_selection, bench_assembly);
criterion_main!(benches);
