//! Integration tests for the lopdf document provider.
//!
//! Test PDFs are created programmatically using lopdf.

use lopdf::{Object, Stream, dictionary};
use pdfmarkup_core::{BlockKind, LogOp, Rgb, Vertices};
use pdfmarkup_parse::{LopdfBackend, ParseOptions, PdfBackend};

fn ints(values: &[i64]) -> Object {
    Object::Array(values.iter().map(|v| Object::Integer(*v)).collect())
}

/// Two pages sharing inherited resources. Page 1 splits its content over two
/// streams and has a highlight; page 2 has a CropBox, a form XObject and an
/// image.
fn two_page_pdf() -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let form_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => ints(&[0, 0, 100, 100]),
        },
        b"1 1 0 rg 0 0 50 10 re f".to_vec(),
    ));
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 1,
            "Height" => 1,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        vec![0u8],
    ));

    let part1 = doc.add_object(Stream::new(
        dictionary! {},
        b"BT /F1 10 Tf 100 700 Td (Marked) Tj".to_vec(),
    ));
    let part2 = doc.add_object(Stream::new(dictionary! {}, b"( text) Tj ET".to_vec()));
    let highlight_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Highlight",
        "Rect" => ints(&[98, 695, 140, 712]),
        "C" => ints(&[1, 1, 0]),
        "QuadPoints" => ints(&[100, 710, 138, 710, 100, 697, 138, 697]),
    });
    let page1 = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => vec![Object::Reference(part1), Object::Reference(part2)],
        "Annots" => vec![Object::Reference(highlight_id)],
    });

    let content2 = doc.add_object(Stream::new(
        dictionary! {},
        b"q 1 0 0 1 100 600 cm /Fm0 Do Q q 20 0 0 20 300 300 cm /Im0 Do Q".to_vec(),
    ));
    let page2 = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content2,
        "CropBox" => ints(&[50, 50, 562, 742]),
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page1), Object::Reference(page2)],
            "Count" => 2,
            "MediaBox" => ints(&[0, 0, 612, 792]),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
                "XObject" => dictionary! { "Fm0" => form_id, "Im0" => image_id },
            },
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[test]
fn split_content_streams_form_one_line() {
    let bytes = two_page_pdf();
    let doc = LopdfBackend::open(&bytes, &ParseOptions::default()).unwrap();
    assert_eq!(LopdfBackend::page_count(&doc), 2);

    let page = LopdfBackend::get_page(&doc, 0).unwrap();
    let text = LopdfBackend::text_page(&doc, &page).unwrap();
    assert_eq!(text.blocks.len(), 1);
    let line = &text.blocks[0].lines[0];
    let joined: String = line.spans.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(joined, "Marked text");
    assert_eq!(line.spans[0].font, "Helvetica-Bold");
    assert!(pdfmarkup_core::is_bold(&line.spans[0].font, line.spans[0].flags));
}

#[test]
fn highlight_geometry_overlaps_text() {
    let bytes = two_page_pdf();
    let doc = LopdfBackend::open(&bytes, &ParseOptions::default()).unwrap();
    let page = LopdfBackend::get_page(&doc, 0).unwrap();

    let annots = LopdfBackend::annotations(&doc, &page).unwrap();
    assert_eq!(annots.len(), 1);
    assert_eq!(annots[0].stroke, Some(Rgb::new(1.0, 1.0, 0.0)));
    assert!(matches!(annots[0].vertices, Some(Vertices::Flat(_))));
    let rects = annots[0].vertices.as_ref().unwrap().normalize().unwrap();
    let clipped = LopdfBackend::plain_text(&doc, &page, Some(&rects[0])).unwrap();
    assert_eq!(clipped.trim(), "Marked");
}

#[test]
fn crop_box_offsets_page_space() {
    let bytes = two_page_pdf();
    let doc = LopdfBackend::open(&bytes, &ParseOptions::default()).unwrap();
    let page = LopdfBackend::get_page(&doc, 1).unwrap();

    let text = LopdfBackend::text_page(&doc, &page).unwrap();
    assert_eq!(text.width, 512.0);
    assert_eq!(text.height, 692.0);

    // Form rectangle: user space (100, 600)-(150, 610), CropBox origin (50, 742).
    let drawings = LopdfBackend::drawings(&doc, &page).unwrap();
    assert_eq!(drawings.len(), 1);
    let rect = drawings[0].rect.unwrap();
    assert!((rect.x0 - 50.0).abs() < 1e-6);
    assert!((rect.y0 - 132.0).abs() < 1e-6);
    assert!((rect.x1 - 100.0).abs() < 1e-6);
    assert!((rect.y1 - 142.0).abs() < 1e-6);
    assert_eq!(drawings[0].fill, Some(Rgb::new(1.0, 1.0, 0.0)));

    let image_blocks: Vec<_> = text
        .blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Image)
        .collect();
    assert_eq!(image_blocks.len(), 1);

    let ops: Vec<LogOp> = LopdfBackend::fill_log(&doc, &page)
        .unwrap()
        .iter()
        .map(|e| e.op)
        .collect();
    assert_eq!(ops, vec![LogOp::FillPath, LogOp::FillImage]);
}

#[test]
fn pages_without_annotations_return_empty() {
    let bytes = two_page_pdf();
    let doc = LopdfBackend::open(&bytes, &ParseOptions::default()).unwrap();
    let page = LopdfBackend::get_page(&doc, 1).unwrap();
    assert!(LopdfBackend::annotations(&doc, &page).unwrap().is_empty());
    assert!(LopdfBackend::warnings(&doc, &page).is_empty());
}
