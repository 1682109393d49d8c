//! End-to-end tests for the Pdf public API.
//!
//! PDF bytes → Pdf::open → extract / highlights / fulltext → JSON.
//!
//! Test PDFs are created programmatically using lopdf.

use lopdf::{Dictionary, Object, Stream, dictionary};
use pdfmarkup::pdfmarkup_core::{MarkupKind, is_green};
use pdfmarkup::{ExtractOptions, PageResult, Pdf};

// --- Test PDF creation helpers ---

struct PageFixture {
    content: Vec<u8>,
    annots: Vec<Dictionary>,
}

fn build_pdf(pages: Vec<PageFixture>) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for page in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page.content));
        let mut annots = Vec::new();
        for annot in page.annots {
            annots.push(Object::Reference(doc.add_object(annot)));
        }
        let page_dict = dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
            "Annots" => annots,
        };
        page_ids.push(doc.add_object(page_dict));
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
    doc.save_to(&mut buf).unwrap();
    buf
}

fn reals(values: &[f32]) -> Vec<Object> {
    values.iter().map(|v| Object::Real(*v)).collect()
}

fn ints(values: &[i64]) -> Vec<Object> {
    values.iter().map(|v| Object::Integer(*v)).collect()
}

/// Page 1: "Hello" fully covered by a green highlight.
/// Page 2: "World" partly covered by a red filled rectangle.
fn two_page_pdf() -> Vec<u8> {
    let highlight = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Highlight",
        "Rect" => ints(&[68, 688, 106, 716]),
        "C" => reals(&[0.1, 0.8, 0.1]),
        "QuadPoints" => ints(&[68, 716, 106, 716, 68, 688, 106, 688]),
    };
    build_pdf(vec![
        PageFixture {
            content: b"BT /F1 12 Tf 72 700 Td (Hello) Tj ET".to_vec(),
            annots: vec![highlight],
        },
        PageFixture {
            content: b"1 0 0 rg 72 695 10 20 re f BT /F1 12 Tf 72 700 Td (World) Tj ET".to_vec(),
            annots: Vec::new(),
        },
    ])
}

fn compact_spans(page: &PageResult) -> &[pdfmarkup::TextSpan] {
    match page {
        PageResult::Compact(p) => &p.spans,
        PageResult::Full(_) => panic!("expected compact page"),
    }
}

// --- Compact extraction ---

#[test]
fn annotation_and_visual_marks_end_to_end() {
    let pdf = Pdf::open(&two_page_pdf()).unwrap();
    let response = pdf.extract(&ExtractOptions::compact()).unwrap();
    assert_eq!(response.meta.page_count, 2);
    assert_eq!(response.meta.returned_pages, 2);

    let first = compact_spans(&response.pages[0]);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].text, "Hello");
    let marks = &first[0].annotation_marks;
    assert!(marks.present);
    assert_eq!(
        marks.kinds.iter().copied().collect::<Vec<_>>(),
        vec![MarkupKind::Highlight]
    );
    assert!(marks.samples[0].is_green);
    assert!(!first[0].visual_marks.present);

    let second = compact_spans(&response.pages[1]);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].text, "World");
    assert!(!second[0].annotation_marks.present);
    let visual = &second[0].visual_marks;
    assert!(visual.present);
    let fill = visual.samples[0].fill_rgb;
    assert!(!is_green(fill.as_ref()));
    assert!(!visual.samples[0].is_green);
}

#[test]
fn compact_json_shape() {
    let pdf = Pdf::open(&two_page_pdf()).unwrap();
    let response = pdf.extract(&ExtractOptions::compact()).unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["meta"]["page_count"], 2);
    assert_eq!(json["meta"]["compact"], true);
    let span = &json["pages"][0]["spans"][0];
    assert_eq!(span["page"], 1);
    assert_eq!(span["bbox"].as_array().unwrap().len(), 4);
    assert_eq!(span["annotation_marks"]["kinds"][0], "highlight");
    assert_eq!(span["annotation_marks"]["samples"][0]["is_green"], true);
    assert_eq!(json["pages"][1]["number"], 2);
}

#[test]
fn extraction_is_idempotent() {
    let bytes = two_page_pdf();
    let run = |compact: bool| {
        let pdf = Pdf::open(&bytes).unwrap();
        let options = ExtractOptions {
            compact,
            ..ExtractOptions::default()
        };
        serde_json::to_vec(&pdf.extract(&options).unwrap()).unwrap()
    };
    assert_eq!(run(true), run(true));
    assert_eq!(run(false), run(false));
}

// --- Budget and page selection ---

#[test]
fn tiny_budget_returns_exactly_one_page() {
    let pdf = Pdf::open(&two_page_pdf()).unwrap();
    let options = ExtractOptions {
        byte_budget: 16,
        ..ExtractOptions::compact()
    };
    let response = pdf.extract(&options).unwrap();
    assert_eq!(response.pages.len(), 1);
    assert_eq!(response.meta.returned_pages, 1);
    assert!(response.meta.returned_pages < response.meta.page_count);
}

#[test]
fn out_of_range_selection_selects_all() {
    let pdf = Pdf::open(&two_page_pdf()).unwrap();
    let options = ExtractOptions {
        pages: Some("9".into()),
        ..ExtractOptions::compact()
    };
    assert_eq!(pdf.extract(&options).unwrap().meta.returned_pages, 2);
}

#[test]
fn selection_picks_single_page() {
    let pdf = Pdf::open(&two_page_pdf()).unwrap();
    let options = ExtractOptions {
        pages: Some("2,x".into()),
        ..ExtractOptions::default()
    };
    let response = pdf.extract(&options).unwrap();
    assert_eq!(response.pages.len(), 1);
    assert_eq!(response.pages[0].number(), 2);
}

// --- Full mode and reports ---

#[test]
fn full_mode_reports_annotations_with_text() {
    let pdf = Pdf::open(&two_page_pdf()).unwrap();
    let response = pdf.extract(&ExtractOptions::default()).unwrap();
    let PageResult::Full(first) = &response.pages[0] else {
        panic!("expected full page");
    };
    assert_eq!(first.annotations.len(), 1);
    assert_eq!(first.annotations[0].kind, "highlight");
    assert_eq!(first.annotations[0].text, "Hello");

    let json = serde_json::to_value(&response).unwrap();
    let block = &json["pages"][0]["text_raw"]["blocks"][0];
    assert_eq!(block["type"], "text");
    assert_eq!(block["lines"][0]["spans"][0]["text"], "Hello");
    assert_eq!(json["pages"][0]["annotations"][0]["type"], "highlight");
}

#[test]
fn highlight_report() {
    let pdf = Pdf::open(&two_page_pdf()).unwrap();
    let report = pdf.highlights().unwrap();
    assert_eq!(report.count, 1);
    let h = &report.highlights[0];
    assert_eq!(h.page, 1);
    assert_eq!(h.text, "Hello");
    assert!(h.is_green);
    assert_eq!(h.boxes.len(), 1);
}

#[test]
fn fulltext_report() {
    let pdf = Pdf::open(&two_page_pdf()).unwrap();
    let report = pdf.fulltext().unwrap();
    assert_eq!(report.page_count, 2);
    assert_eq!(report.pages[1].page, 2);
    assert!(report.pages[1].text.contains("World"));
}

// --- Inline images ---

fn inline_image_pdf() -> Vec<u8> {
    build_pdf(vec![PageFixture {
        content: b"BT /F1 12 Tf 72 700 Td (Hello) Tj ET \
                   q 10 0 0 10 300 300 cm BI /W 1 /H 1 /BPC 8 /CS /G ID \x80 EI Q"
            .to_vec(),
        annots: Vec::new(),
    }])
}

#[test]
fn inline_image_keeps_page_text() {
    let pdf = Pdf::open(&inline_image_pdf()).unwrap();

    let compact = pdf.extract(&ExtractOptions::compact()).unwrap();
    let spans = compact_spans(&compact.pages[0]);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text, "Hello");

    let full = serde_json::to_value(pdf.extract(&ExtractOptions::default()).unwrap()).unwrap();
    let blocks = full["pages"][0]["text_raw"]["blocks"].as_array().unwrap();
    assert!(
        blocks
            .iter()
            .any(|b| b["type"] == "text" && b["lines"][0]["spans"][0]["text"] == "Hello")
    );

    let text = pdf.fulltext().unwrap();
    assert!(text.pages[0].text.contains("Hello"));
}

#[test]
fn open_rejects_garbage() {
    assert!(Pdf::open(b"%PDF-1.5 nothing here").is_err());
}
