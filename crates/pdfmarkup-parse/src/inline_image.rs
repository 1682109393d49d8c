//! Inline image segmentation.
//!
//! Splits raw content stream bytes around `BI <dict> ID <data> EI` blocks so
//! the operator runs between them can be decoded on their own. Image data is
//! binary and never reaches the operator decoder.

use crate::error::BackendError;

/// A piece of a content stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'s> {
    /// Operator text with no inline image in it.
    Operators(&'s [u8]),
    /// One complete inline image.
    InlineImage,
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

/// Advance past the next lexical item and return it when it is a bare
/// keyword or number. Strings, names and comments are skipped whole.
fn next_keyword<'s>(input: &'s [u8], pos: &mut usize) -> Option<&'s [u8]> {
    while *pos < input.len() {
        let b = input[*pos];
        match b {
            _ if is_whitespace(b) => *pos += 1,
            b'%' => {
                while *pos < input.len() && !matches!(input[*pos], b'\r' | b'\n') {
                    *pos += 1;
                }
            }
            b'(' => skip_literal_string(input, pos),
            b'<' if input.get(*pos + 1) == Some(&b'<') => *pos += 2,
            b'<' => {
                while *pos < input.len() && input[*pos] != b'>' {
                    *pos += 1;
                }
                *pos = (*pos + 1).min(input.len());
            }
            b'/' => {
                *pos += 1;
                while *pos < input.len() && is_regular(input[*pos]) {
                    *pos += 1;
                }
            }
            _ if is_delimiter(b) => *pos += 1,
            _ => {
                let start = *pos;
                while *pos < input.len() && is_regular(input[*pos]) {
                    *pos += 1;
                }
                return Some(&input[start..*pos]);
            }
        }
    }
    None
}

fn skip_literal_string(input: &[u8], pos: &mut usize) {
    let mut depth = 0usize;
    while *pos < input.len() {
        match input[*pos] {
            b'\\' => *pos += 1,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    *pos += 1;
                    return;
                }
            }
            _ => {}
        }
        *pos += 1;
    }
    *pos = input.len();
}

/// Skip the dictionary and data of an inline image whose `BI` has already
/// been consumed. Leaves `pos` just after `EI`.
fn skip_inline_image(input: &[u8], pos: &mut usize) -> Result<(), BackendError> {
    loop {
        match next_keyword(input, pos) {
            Some(b"ID") => break,
            Some(_) => {}
            None => {
                return Err(BackendError::Interpreter(
                    "unterminated inline image (missing ID)".to_string(),
                ));
            }
        }
    }
    if *pos < input.len() && is_whitespace(input[*pos]) {
        *pos += 1;
    }

    let data_start = *pos;
    while *pos + 2 <= input.len() {
        if input[*pos] == b'E'
            && input[*pos + 1] == b'I'
            && (*pos == data_start || is_whitespace(input[*pos - 1]))
            && (*pos + 2 == input.len()
                || is_whitespace(input[*pos + 2])
                || is_delimiter(input[*pos + 2]))
        {
            *pos += 2;
            return Ok(());
        }
        *pos += 1;
    }

    Err(BackendError::Interpreter(
        "unterminated inline image (missing EI)".to_string(),
    ))
}

/// Split a content stream into operator runs and inline images, in order.
pub(crate) fn split_inline_images(input: &[u8]) -> Result<Vec<Segment<'_>>, BackendError> {
    let mut segments = Vec::new();
    let mut run_start = 0;
    let mut pos = 0;

    while let Some(word) = next_keyword(input, &mut pos) {
        if word != b"BI" {
            continue;
        }
        let token_start = pos - word.len();
        if token_start > run_start {
            segments.push(Segment::Operators(&input[run_start..token_start]));
        }
        skip_inline_image(input, &mut pos)?;
        segments.push(Segment::InlineImage);
        run_start = pos;
    }

    if run_start < input.len() {
        segments.push(Segment::Operators(&input[run_start..]));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operators<'s>(segments: &[Segment<'s>]) -> Vec<&'s [u8]> {
        segments
            .iter()
            .filter_map(|s| match s {
                Segment::Operators(bytes) => Some(*bytes),
                Segment::InlineImage => None,
            })
            .collect()
    }

    #[test]
    fn stream_without_images_is_one_run() {
        let input = b"BT /F1 12 Tf (Hi) Tj ET";
        let segments = split_inline_images(input).unwrap();
        assert_eq!(segments, vec![Segment::Operators(input)]);
    }

    #[test]
    fn image_is_cut_out_between_runs() {
        let input = b"q 10 0 0 10 300 300 cm BI /W 1 /H 1 /BPC 8 /CS /G ID \x80 EI Q";
        let segments = split_inline_images(input).unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1], Segment::InlineImage);
        assert_eq!(operators(&segments), vec![&b"q 10 0 0 10 300 300 cm "[..], b" Q"]);
    }

    #[test]
    fn binary_data_may_contain_e_and_i() {
        let input = b"BI /W 2 /H 1 /BPC 8 /CS /G ID xEIy EI";
        let segments = split_inline_images(input).unwrap();
        assert_eq!(segments, vec![Segment::InlineImage]);
    }

    #[test]
    fn keywords_inside_strings_and_names_are_ignored() {
        let input = b"(BI (nested) ID) Tj /BI gs <4249> Tj % BI\n";
        let segments = split_inline_images(input).unwrap();
        assert_eq!(segments, vec![Segment::Operators(input)]);
    }

    #[test]
    fn filter_array_in_dictionary_is_skipped() {
        let input = b"BI /W 1 /H 1 /F [/AHx] ID 00> EI";
        assert_eq!(split_inline_images(input).unwrap(), vec![Segment::InlineImage]);
    }

    #[test]
    fn missing_end_marker_is_an_error() {
        let err = split_inline_images(b"q BI /W 1 ID \x80\x81").unwrap_err();
        assert!(err.to_string().contains("missing EI"));
    }

    #[test]
    fn missing_data_marker_is_an_error() {
        let err = split_inline_images(b"BI /W 1 /H 1").unwrap_err();
        assert!(err.to_string().contains("missing ID"));
    }
}
