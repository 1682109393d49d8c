use std::path::Path;

use pdfmarkup::ExtractOptions;

use crate::shared::{open_pdf, print_json};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    compact: bool,
    truncate_span: Option<usize>,
    byte_budget: usize,
    pretty: bool,
) -> Result<(), i32> {
    let pdf = open_pdf(file)?;
    let options = ExtractOptions {
        compact,
        pages: pages.map(str::to_string),
        truncate_span,
        byte_budget,
        ..ExtractOptions::default()
    };

    let response = pdf.extract(&options).map_err(|e| {
        eprintln!("Error: extraction failed: {e}");
        1
    })?;
    if options.pages.is_none() && response.is_truncated() {
        eprintln!(
            "Note: byte budget reached, returned {} of {} pages",
            response.meta.returned_pages, response.meta.page_count
        );
    }
    print_json(&response, pretty)
}
