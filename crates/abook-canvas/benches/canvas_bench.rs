// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the abook-canvas hot paths: stroke rasterization
// on a full-size layer and compositing a rotated display frame.

use abook_canvas::compositor::{compose_visible, render_portrait, rotate_for_display};
use abook_canvas::{DisplayGeometry, Layer, Point, StrokeRasterizer, ToolSizes};
use abook_core::{TemplateKind, Tool};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// A zig-zag stroke of 20 segments for each tool on a default 520x5120 layer.
fn bench_strokes(c: &mut Criterion) {
    let points: Vec<Point> = (0..=20)
        .map(|i| Point::new(20 + i * 22, if i % 2 == 0 { 100 } else { 180 }))
        .collect();

    for tool in [Tool::Pen, Tool::Highlighter, Tool::Eraser] {
        let mut layer = Layer::create("Blank");
        c.bench_function(&format!("stroke 20 segments ({})", tool.label()), |b| {
            b.iter(|| {
                let mut r = StrokeRasterizer::new(tool, ToolSizes::default());
                r.begin_stroke(points[0]);
                for p in &points {
                    black_box(r.extend_stroke(&mut layer, *p));
                }
                r.end_stroke();
            });
        });
    }
}

/// Three visible layers composited, framed, and rotated for display.
fn bench_frame(c: &mut Criterion) {
    let geometry = DisplayGeometry::default();
    let mut layers = vec![Layer::create("Graph"), Layer::create("Blank"), Layer::create("Blank")];
    layers[0].apply_template(TemplateKind::Graph);

    c.bench_function("compose + rotate frame (3 layers)", |b| {
        b.iter(|| {
            let viewport = compose_visible(
                &layers,
                black_box(1200),
                geometry.canvas_width(),
                geometry.visible_height(),
            );
            let portrait = render_portrait(&viewport, &geometry);
            black_box(rotate_for_display(&portrait));
        });
    });
}

criterion_group!(benches, bench_strokes, bench_frame);
criterion_main!(benches);
