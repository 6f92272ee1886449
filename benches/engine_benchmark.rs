//! Engine benchmark: the per-revision hot path.
//!
//! Every streamed chunk runs revision -> extent -> recompute -> reposition,
//! so this path bounds the sustainable token rate.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pageturn::{MarkdownRenderer, PlainRenderer, PreviewConfig, PreviewEngine, Render};
use std::time::{Duration, Instant};

fn streaming_revision(c: &mut Criterion) {
    c.bench_function("streaming_revision_paged", |b| {
        let base = Instant::now();
        let mut engine = PreviewEngine::new(PreviewConfig::paged());
        engine.set_viewport_extent(40.0, base);

        let mut text = String::new();
        let mut now = base;
        b.iter(|| {
            text.push_str("another dozen tokens of streamed output ");
            now += Duration::from_millis(10);
            engine.set_text(black_box(&text), now);
            engine.set_content_extent(black_box(text.len() as f64 / 80.0), now);
            engine.drain_effects()
        });
    });
}

fn geometry_recompute(c: &mut Criterion) {
    c.bench_function("geometry_recompute", |b| {
        let base = Instant::now();
        let mut engine = PreviewEngine::new(PreviewConfig::paged());
        engine.set_viewport_extent(40.0, base);

        let mut extent = 100.0;
        b.iter(|| {
            extent += 1.0;
            engine.set_content_extent(black_box(extent), base);
            engine.drain_effects()
        });
    });
}

fn scroll_observation(c: &mut Criterion) {
    c.bench_function("scroll_observation", |b| {
        let base = Instant::now();
        let mut engine = PreviewEngine::new(PreviewConfig::default());
        engine.set_viewport_extent(40.0, base);
        engine.set_text("doc", base);
        engine.set_content_extent(4000.0, base);

        let mut offset = 0.0;
        b.iter(|| {
            offset = (offset + 7.0) % 3000.0;
            engine.on_scroll(black_box(offset), base);
        });
    });
}

fn render_markdown(c: &mut Criterion) {
    let document = include_str!("../demos/paged_reader.rs")
        .repeat(4)
        .replace("//!", "#");

    c.bench_function("render_markdown_80col", |b| {
        b.iter(|| MarkdownRenderer.render(black_box(&document), 80))
    });

    c.bench_function("render_plain_80col", |b| {
        b.iter(|| PlainRenderer.render(black_box(&document), 80))
    });
}

criterion_group!(
    benches,
    streaming_revision,
    geometry_recompute,
    scroll_observation,
    render_markdown,
);
criterion_main!(benches);
