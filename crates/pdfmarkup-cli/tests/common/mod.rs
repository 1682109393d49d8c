//! Shared fixtures for CLI integration tests.

#![allow(dead_code)]

use std::io::Write;

use assert_cmd::Command;
use lopdf::{Object, Stream, dictionary};

pub fn cmd() -> Command {
    Command::cargo_bin("pdfmarkup").unwrap()
}

/// Two pages: "Hello" under a green highlight, then "World" behind a red box.
pub fn marked_pdf() -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources = dictionary! {
        "Font" => dictionary! { "F1" => Object::Reference(font_id) },
    };
    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let annot_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Highlight",
        "Rect" => vec![Object::Integer(68), Object::Integer(688), Object::Integer(106), Object::Integer(716)],
        "C" => vec![Object::Real(0.1), Object::Real(0.8), Object::Real(0.1)],
        "QuadPoints" => [68, 716, 106, 716, 68, 688, 106, 688]
            .iter()
            .map(|v| Object::Integer(*v))
            .collect::<Vec<_>>(),
    });

    let contents: [&[u8]; 2] = [
        b"BT /F1 12 Tf 72 700 Td (Hello) Tj ET",
        b"1 0 0 rg 72 695 10 20 re f BT /F1 12 Tf 72 700 Td (World) Tj ET",
    ];
    let mut page_ids = Vec::new();
    for (i, content) in contents.iter().enumerate() {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let annots = if i == 0 {
            vec![Object::Reference(annot_id)]
        } else {
            Vec::new()
        };
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => resources.clone(),
            "Annots" => annots,
        }));
    }

    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        "Count" => Object::Integer(page_ids.len() as i64),
    });
    for &pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
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

pub fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(bytes).unwrap();
    tmp
}
