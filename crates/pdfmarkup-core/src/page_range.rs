//! Page-range expressions like `"1-3,5"`.

use std::collections::BTreeSet;

/// Parse a page range string into a set of 1-based page numbers.
///
/// Tokens are comma-separated single pages or inclusive `a-b` ranges.
/// Malformed tokens and pages outside `1..=page_count` are dropped without
/// affecting the rest of the expression.
pub fn parse_page_range(input: &str, page_count: usize) -> BTreeSet<usize> {
    let mut pages = BTreeSet::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start_str, end_str)) = part.split_once('-') {
            let (Ok(start), Ok(end)) = (
                start_str.trim().parse::<usize>(),
                end_str.trim().parse::<usize>(),
            ) else {
                continue;
            };
            let start = start.max(1);
            let end = end.min(page_count);
            if start <= end {
                pages.extend(start..=end);
            }
        } else if let Ok(page) = part.parse::<usize>() {
            if (1..=page_count).contains(&page) {
                pages.insert(page);
            }
        }
    }

    pages
}

/// Pages to process, in ascending order.
///
/// An absent or blank expression, or one that selects nothing, means every
/// page of the document.
pub fn select_pages(input: Option<&str>, page_count: usize) -> Vec<usize> {
    let selected = input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_page_range(s, page_count))
        .unwrap_or_default();
    if selected.is_empty() {
        (1..=page_count).collect()
    } else {
        selected.into_iter().collect()
    }
}
