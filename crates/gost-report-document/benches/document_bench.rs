// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for numbering, preview layout and DOCX export on a
// synthetic 60-section report.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use gost_report_core::{DocumentState, DocumentStore, Numbering, SectionKind, SectionUpdate};
use gost_report_document::markup::figure_markup;
use gost_report_document::{DocxProjector, PreviewRenderer, TableGrid};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn synthetic_report() -> DocumentState {
    let mut store = DocumentStore::default();
    for i in 0..60 {
        let kind = SectionKind::ALL[i % SectionKind::ALL.len()];
        let id = store.add_section(kind, Some(format!("Раздел {i}")));
        let content = match kind {
            SectionKind::Text => "<p>Текст лабораторной работы. </p>".repeat(20),
            SectionKind::Figure => figure_markup("figure.png"),
            SectionKind::Table => TableGrid::placeholder(6, 4).to_markup(),
            SectionKind::Formula => "F = m · a".to_string(),
        };
        store.update_section(&id, SectionUpdate { title: None, content });
    }
    store.into_document()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_numbering(c: &mut Criterion) {
    let document = synthetic_report();
    c.bench_function("numbering (65 sections)", |b| {
        b.iter(|| black_box(Numbering::resolve(black_box(&document.sections))));
    });
}

fn bench_preview(c: &mut Criterion) {
    let document = synthetic_report();
    let renderer = PreviewRenderer::default();
    c.bench_function("preview render (65 sections)", |b| {
        b.iter(|| black_box(renderer.render(black_box(&document))));
    });
}

fn bench_docx(c: &mut Criterion) {
    let document = synthetic_report();
    let projector = DocxProjector::default();
    c.bench_function("docx export (65 sections)", |b| {
        b.iter(|| black_box(projector.export(black_box(&document))));
    });
}

criterion_group!(benches, bench_numbering, bench_preview, bench_docx);
criterion_main!(benches);
