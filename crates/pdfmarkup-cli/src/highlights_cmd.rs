use std::path::Path;

use pdfmarkup::Rgb;

use crate::cli::OutputFormat;
use crate::shared::{open_pdf, print_json};

pub fn run(file: &Path, format: &OutputFormat, pretty: bool) -> Result<(), i32> {
    let pdf = open_pdf(file)?;
    let report = pdf.highlights().map_err(|e| {
        eprintln!("Error: highlight extraction failed: {e}");
        1
    })?;

    match format {
        OutputFormat::Json => print_json(&report, pretty),
        OutputFormat::Text => {
            println!("page\tgreen\tcolor\ttext");
            for h in &report.highlights {
                println!(
                    "{}\t{}\t{}\t{}",
                    h.page,
                    if h.is_green { "yes" } else { "no" },
                    color_hex(h.color_rgb.as_ref()),
                    h.text.replace('\n', " ")
                );
            }
            Ok(())
        }
    }
}

fn color_hex(color: Option<&Rgb>) -> String {
    match color {
        Some(c) => format!("#{:06x}", c.to_srgb_int()),
        None => "-".to_string(),
    }
}
