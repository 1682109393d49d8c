//! Per-page results and the response envelopes built from them.

use crate::color::Rgb;
use crate::geometry::Rect;
use crate::text::{TextPage, TextSpan};

/// Result for one page, in either compact or full form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum PageResult {
    Compact(CompactPage),
    Full(FullPage),
}

impl PageResult {
    /// 1-based page number.
    pub fn number(&self) -> usize {
        match self {
            PageResult::Compact(p) => p.number,
            PageResult::Full(p) => p.number,
        }
    }
}

/// Text spans with their markup attachments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompactPage {
    pub number: usize,
    pub spans: Vec<TextSpan>,
}

/// Raw structured text plus every annotation on the page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FullPage {
    pub number: usize,
    pub text_raw: TextPage,
    pub annotations: Vec<AnnotationSummary>,
}

/// An annotation as listed on a full page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationSummary {
    /// Lowercased subtype name.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
    pub color_rgb: Option<Rgb>,
    pub boxes: Vec<Rect>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meta {
    /// Pages in the source document.
    pub page_count: usize,
    /// Pages included in this response.
    pub returned_pages: usize,
    pub compact: bool,
}

/// Top-level extraction response.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponseEnvelope {
    pub meta: Meta,
    pub pages: Vec<PageResult>,
}

impl ResponseEnvelope {
    /// True when fewer pages were returned than the document holds.
    pub fn is_truncated(&self) -> bool {
        self.meta.returned_pages < self.meta.page_count
    }
}

/// Text under one highlight annotation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Highlight {
    pub page: usize,
    pub text: String,
    pub color_rgb: Option<Rgb>,
    pub is_green: bool,
    pub boxes: Vec<Rect>,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HighlightReport {
    pub highlights: Vec<Highlight>,
    pub count: usize,
}

impl HighlightReport {
    pub fn new(highlights: Vec<Highlight>) -> Self {
        let count = highlights.len();
        Self { highlights, count }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageText {
    pub page: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FullTextReport {
    pub pages: Vec<PageText>,
    pub page_count: usize,
}
