use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pdfmarkup::pdfmarkup_core::DEFAULT_BYTE_BUDGET;

/// Extract highlighted and marked-up text from PDF documents.
#[derive(Debug, Parser)]
#[command(name = "pdfmarkup", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract page text with annotation and visual markup as JSON
    Parse {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Emit compact spans with markup attached instead of raw text
        #[arg(long)]
        compact: bool,

        /// Maximum characters kept per span text
        #[arg(long)]
        truncate_span: Option<usize>,

        /// Stop after the page that pushes output past this many bytes
        #[arg(long, default_value_t = DEFAULT_BYTE_BUDGET)]
        byte_budget: usize,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },

    /// List the text under every highlight annotation
    Highlights {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Extract the plain text of every page
    Fulltext {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
}

/// Output format for the report subcommands.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}
