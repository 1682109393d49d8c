use std::path::Path;

use crate::cli::OutputFormat;
use crate::shared::{open_pdf, print_json};

pub fn run(file: &Path, format: &OutputFormat, pretty: bool) -> Result<(), i32> {
    let pdf = open_pdf(file)?;
    let report = pdf.fulltext().map_err(|e| {
        eprintln!("Error: text extraction failed: {e}");
        1
    })?;

    match format {
        OutputFormat::Json => print_json(&report, pretty),
        OutputFormat::Text => {
            for page in &report.pages {
                println!("--- Page {} ---", page.page);
                println!("{}", page.text);
            }
            Ok(())
        }
    }
}
