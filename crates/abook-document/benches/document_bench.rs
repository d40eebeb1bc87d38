// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for abook-document: OCR preparation of a written page
// and spell checking a paragraph.

use abook_canvas::{Layer, Point, StrokeRasterizer, ToolSizes};
use abook_core::Tool;
use abook_document::assist::SpellChecker;
use abook_document::ocr::prepare_layer;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Ten pen lines across the first page of a default 520x5120 layer.
fn bench_prepare(c: &mut Criterion) {
    let mut layer = Layer::create("Blank");
    let mut pen = StrokeRasterizer::new(Tool::Pen, ToolSizes::default());
    for row in 0..10 {
        let y = 60 + row * 40;
        pen.begin_stroke(Point::new(40, y));
        for x in (40..480).step_by(20) {
            pen.extend_stroke(&mut layer, Point::new(x, y + (x / 20) % 7));
        }
        pen.end_stroke();
    }

    c.bench_function("prepare_layer (520x5120, 10 lines)", |b| {
        b.iter(|| black_box(prepare_layer(black_box(&layer.pixels))));
    });
}

fn bench_spelling(c: &mut Criterion) {
    let words = [
        "a", "and", "book", "draw", "hello", "is", "layer", "note", "notebook", "of", "page",
        "pen", "that", "the", "this", "with", "world", "write",
    ];
    let checker = SpellChecker::from_words(words).expect("word list");
    let text = "Teh notebok is a boook of pages adn layers. Write with teh pen on this page.";

    c.bench_function("spell check paragraph", |b| {
        b.iter(|| black_box(checker.check(black_box(text))));
    });
}

criterion_group!(benches, bench_prepare, bench_spelling);
criterion_main!(benches);
