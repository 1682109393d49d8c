//! Performance benchmarks for pdfmarkup.
//!
//! Benchmarks cover compact extraction (span correlation against annotation
//! and visual marks), full extraction, and the highlight report across two
//! PDF sizes:
//! - Simple: 1-page, a few lines with one highlight
//! - Medium: 20-page, dense text with several highlights and filled boxes per page

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lopdf::{Dictionary, Object, Stream, dictionary};
use pdfmarkup::{ExtractOptions, Pdf};

// ---------------------------------------------------------------------------
// PDF fixture generators
// ---------------------------------------------------------------------------

fn build_pdf(pages: &[(Vec<u8>, Vec<Dictionary>)]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut page_ids = Vec::new();
    for (content, annots) in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.clone()));
        let annots: Vec<Object> = annots
            .iter()
            .map(|a| Object::Reference(doc.add_object(a.clone())))
            .collect();
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
            "Annots" => annots,
        }));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(page_ids.len() as i64),
    });
    for &pid in &page_ids {
        if let Ok(obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save benchmark PDF");
    buf
}

/// One text line per 14pt row, a highlight on every fourth line and a filled
/// box behind every seventh.
fn dense_page(lines: usize) -> (Vec<u8>, Vec<Dictionary>) {
    let mut content = String::new();
    let mut annots = Vec::new();
    for i in 0..lines {
        let y = 760 - (i as i64) * 14;
        if i % 7 == 0 {
            content.push_str(&format!("1 1 0 rg 70 {} 200 14 re f 0 g\n", y - 3));
        }
        content.push_str(&format!(
            "BT /F1 10 Tf 72 {y} Td (Line {i} of the benchmark page with some words) Tj ET\n"
        ));
        if i % 4 == 0 {
            let quad: Vec<Object> = [70, y + 11, 300, y + 11, 70, y - 3, 300, y - 3]
                .iter()
                .map(|v| Object::Integer(*v))
                .collect();
            annots.push(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Highlight",
                "Rect" => vec![70.into(), (y - 3).into(), 300.into(), (y + 11).into()],
                "C" => vec![Object::Real(0.2), Object::Real(0.9), Object::Real(0.2)],
                "QuadPoints" => quad,
            });
        }
    }
    (content.into_bytes(), annots)
}

fn simple_pdf() -> Vec<u8> {
    build_pdf(&[dense_page(5)])
}

fn medium_pdf() -> Vec<u8> {
    let pages: Vec<_> = (0..20).map(|_| dense_page(50)).collect();
    build_pdf(&pages)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_compact(c: &mut Criterion) {
    let mut group = c.benchmark_group("compact");
    for (name, bytes) in [("simple", simple_pdf()), ("medium", medium_pdf())] {
        let options = ExtractOptions::compact();
        group.bench_function(name, |b| {
            b.iter(|| {
                let pdf = Pdf::open(black_box(&bytes)).expect("open");
                black_box(pdf.extract(&options).expect("extract"))
            })
        });
    }
    group.finish();
}

fn bench_full(c: &mut Criterion) {
    let bytes = medium_pdf();
    let options = ExtractOptions::default();
    c.bench_function("full/medium", |b| {
        b.iter(|| {
            let pdf = Pdf::open(black_box(&bytes)).expect("open");
            black_box(pdf.extract(&options).expect("extract"))
        })
    });
}

fn bench_highlights(c: &mut Criterion) {
    let bytes = medium_pdf();
    c.bench_function("highlights/medium", |b| {
        b.iter(|| {
            let pdf = Pdf::open(black_box(&bytes)).expect("open");
            black_box(pdf.highlights().expect("highlights"))
        })
    });
}

criterion_group!(benches, bench_compact, bench_full, bench_highlights);
criterion_main!(benches);
