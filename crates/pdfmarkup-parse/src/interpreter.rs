//! Content stream interpreter.
//!
//! Cuts inline images out of the stream, decodes the operator runs between
//! them with [`lopdf::content::Content`], maintains graphics and text state,
//! and emits events to a [`ContentHandler`]. Handles Form XObject recursion
//! via the `Do` operator.

use std::collections::HashMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object};
use pdfmarkup_core::{ExtractWarning, ExtractWarningCode, FLAG_SUPERSCRIPT, Point};

use crate::backend::ParseOptions;
use crate::error::BackendError;
use crate::font_metrics::LoadedFont;
use crate::handler::{ContentHandler, GlyphEvent, ImageEvent, PaintOp, PathEvent, PathSegment};
use crate::inline_image::{Segment, split_inline_images};
use crate::interpreter_state::{ColorSpaceKind, InterpreterState};
use crate::lopdf_backend::{object_to_f64, resolve_ref};
use crate::matrix::Matrix;
use crate::text_state::{TextRenderMode, TextState};

/// State shared across a page and all Form XObjects it draws.
pub(crate) struct PageContext<'a> {
    pub doc: &'a Document,
    pub options: &'a ParseOptions,
    next_run: usize,
}

impl<'a> PageContext<'a> {
    pub fn new(doc: &'a Document, options: &'a ParseOptions) -> Self {
        Self {
            doc,
            options,
            next_run: 0,
        }
    }

    fn begin_run(&mut self) -> usize {
        let run = self.next_run;
        self.next_run += 1;
        run
    }
}

/// Path under construction. Points are stored after the CTM is applied.
#[derive(Default)]
struct PathBuilder {
    segments: Vec<PathSegment>,
    start: Option<Point>,
    current: Option<Point>,
}

impl PathBuilder {
    fn move_to(&mut self, p: Point) {
        self.segments.push(PathSegment::MoveTo(p));
        self.start = Some(p);
        self.current = Some(p);
    }

    fn line_to(&mut self, p: Point) {
        if self.current.is_none() {
            self.move_to(p);
            return;
        }
        self.segments.push(PathSegment::LineTo(p));
        self.current = Some(p);
    }

    fn curve_to(&mut self, c1: Point, c2: Point, end: Point) {
        if self.current.is_none() {
            self.move_to(c1);
        }
        self.segments.push(PathSegment::CurveTo([c1, c2, end]));
        self.current = Some(end);
    }

    fn rect(&mut self, corners: [Point; 4]) {
        self.segments.push(PathSegment::Rect(corners));
        self.start = Some(corners[0]);
        self.current = Some(corners[0]);
    }

    fn close(&mut self) {
        if self.current.is_some() {
            self.segments.push(PathSegment::ClosePath);
            self.current = self.start;
        }
    }

    fn take(&mut self) -> Vec<PathSegment> {
        self.start = None;
        self.current = None;
        std::mem::take(&mut self.segments)
    }
}

fn transform(ctm: &Matrix, x: f64, y: f64) -> Point {
    let (x, y) = ctm.transform(x, y);
    Point::new(x, y)
}

/// Decode a content stream into operations. Each inline image becomes a
/// bare `BI` operation.
fn decode_operations(stream_bytes: &[u8]) -> Result<Vec<Operation>, BackendError> {
    let mut operations = Vec::new();
    for segment in split_inline_images(stream_bytes)? {
        match segment {
            Segment::Operators(bytes) => {
                let content = Content::decode(bytes).map_err(|e| {
                    BackendError::Interpreter(format!("failed to decode content stream: {e}"))
                })?;
                operations.extend(content.operations);
            }
            Segment::InlineImage => operations.push(Operation::new("BI", Vec::new())),
        }
    }
    Ok(operations)
}

/// Interpret a content stream and emit events to the handler.
///
/// `depth` is 0 for the page itself and grows by one per nested Form
/// XObject. Only an undecodable top-level stream is an error; faults inside
/// Form XObjects are reported as warnings and the form is skipped.
pub(crate) fn interpret_content_stream<'a>(
    ctx: &mut PageContext<'a>,
    stream_bytes: &[u8],
    resources: &'a Dictionary,
    handler: &mut dyn ContentHandler,
    depth: usize,
    state: &mut InterpreterState<TextState>,
) -> Result<(), BackendError> {
    let operations = decode_operations(stream_bytes)?;

    let mut font_cache: HashMap<String, LoadedFont<'a>> = HashMap::new();
    let mut path = PathBuilder::default();

    for op in &operations {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            // --- Graphics state ---
            "q" => state.save(),
            "Q" => {
                state.restore();
            }
            "cm" => {
                if let Some(m) = matrix_operand(operands) {
                    state.concat_matrix(&m);
                }
            }
            "w" | "J" | "j" | "M" | "d" | "ri" | "i" | "gs" => {}

            // --- Color ---
            "G" | "g" | "RG" | "rg" | "K" | "k" => {
                let components = numbers(operands);
                let space = ColorSpaceKind::from_components(components.len());
                let color = space.resolve(&components);
                let gs = state.graphics_mut();
                if op.operator.chars().all(|c| c.is_ascii_uppercase()) {
                    gs.stroke_space = space;
                    gs.stroke = color;
                } else {
                    gs.fill_space = space;
                    gs.fill = color;
                }
            }
            "CS" => {
                let space = color_space_operand(ctx.doc, resources, operands);
                state.graphics_mut().set_stroke_space(space);
            }
            "cs" => {
                let space = color_space_operand(ctx.doc, resources, operands);
                state.graphics_mut().set_fill_space(space);
            }
            "SC" | "SCN" => {
                let gs = state.graphics_mut();
                gs.stroke = gs.stroke_space.resolve(&numbers(operands));
            }
            "sc" | "scn" => {
                let gs = state.graphics_mut();
                gs.fill = gs.fill_space.resolve(&numbers(operands));
            }

            // --- Text state ---
            "BT" => state.text_mut().begin_text(),
            "ET" => {}
            "Tf" => {
                if let (Some(name), Some(size)) = (name_operand(operands, 0), get_f64(operands, 1)) {
                    load_font_if_needed(ctx.doc, resources, &name, &mut font_cache, handler);
                    let ts = state.text_mut();
                    ts.font = Some(name);
                    ts.font_size = size;
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operand(operands) {
                    state.text_mut().set_text_matrix(m);
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (get_f64(operands, 0), get_f64(operands, 1)) {
                    state.text_mut().move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (get_f64(operands, 0), get_f64(operands, 1)) {
                    state.text_mut().move_text_position_and_set_leading(tx, ty);
                }
            }
            "T*" => state.text_mut().move_to_next_line(),
            "Tc" => {
                if let Some(v) = get_f64(operands, 0) {
                    state.text_mut().char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = get_f64(operands, 0) {
                    state.text_mut().word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = get_f64(operands, 0) {
                    state.text_mut().h_scaling = v / 100.0;
                }
            }
            "TL" => {
                if let Some(v) = get_f64(operands, 0) {
                    state.text_mut().leading = v;
                }
            }
            "Tr" => {
                if let Some(mode) = get_f64(operands, 0).and_then(|v| TextRenderMode::from_i64(v as i64)) {
                    state.text_mut().render_mode = mode;
                }
            }
            "Ts" => {
                if let Some(v) = get_f64(operands, 0) {
                    state.text_mut().rise = v;
                }
            }

            // --- Text showing ---
            "Tj" | "'" | "\"" | "TJ" => {
                if op.operator == "\"" {
                    if let Some(aw) = get_f64(operands, 0) {
                        state.text_mut().word_spacing = aw;
                    }
                    if let Some(ac) = get_f64(operands, 1) {
                        state.text_mut().char_spacing = ac;
                    }
                }
                if op.operator == "'" || op.operator == "\"" {
                    state.text_mut().move_to_next_line();
                }
                let font_name = state.text().font.clone().unwrap_or_default();
                load_font_if_needed(ctx.doc, resources, &font_name, &mut font_cache, handler);
                let Some(font) = font_cache.get(&font_name) else {
                    continue;
                };
                let run = ctx.begin_run();
                show_text(op, state, font, run, handler);
            }

            // --- XObjects ---
            "Do" => {
                if let Some(name) = name_operand(operands, 0) {
                    handle_do(ctx, resources, handler, depth, state, &name);
                }
            }
            "BI" => handler.on_image(ImageEvent {
                name: "inline".to_string(),
                ctm: state.graphics().ctm,
            }),

            // --- Path construction ---
            "m" => {
                if let (Some(x), Some(y)) = (get_f64(operands, 0), get_f64(operands, 1)) {
                    path.move_to(transform(&state.graphics().ctm, x, y));
                }
            }
            "l" => {
                if let (Some(x), Some(y)) = (get_f64(operands, 0), get_f64(operands, 1)) {
                    path.line_to(transform(&state.graphics().ctm, x, y));
                }
            }
            "c" => {
                let v = numbers(operands);
                if v.len() >= 6 {
                    let ctm = state.graphics().ctm;
                    path.curve_to(
                        transform(&ctm, v[0], v[1]),
                        transform(&ctm, v[2], v[3]),
                        transform(&ctm, v[4], v[5]),
                    );
                }
            }
            "v" => {
                let v = numbers(operands);
                if v.len() >= 4 {
                    let ctm = state.graphics().ctm;
                    let c2 = transform(&ctm, v[0], v[1]);
                    let end = transform(&ctm, v[2], v[3]);
                    let c1 = path.current.unwrap_or(c2);
                    path.curve_to(c1, c2, end);
                }
            }
            "y" => {
                let v = numbers(operands);
                if v.len() >= 4 {
                    let ctm = state.graphics().ctm;
                    let c1 = transform(&ctm, v[0], v[1]);
                    let end = transform(&ctm, v[2], v[3]);
                    path.curve_to(c1, end, end);
                }
            }
            "re" => {
                let v = numbers(operands);
                if v.len() >= 4 {
                    let ctm = state.graphics().ctm;
                    let (x, y, w, h) = (v[0], v[1], v[2], v[3]);
                    path.rect([
                        transform(&ctm, x, y),
                        transform(&ctm, x + w, y),
                        transform(&ctm, x + w, y + h),
                        transform(&ctm, x, y + h),
                    ]);
                }
            }
            "h" => path.close(),

            // --- Path painting ---
            "S" => emit_path(handler, state, &mut path, PaintOp::Stroke),
            "s" => {
                path.close();
                emit_path(handler, state, &mut path, PaintOp::Stroke);
            }
            "f" | "F" | "f*" => emit_path(handler, state, &mut path, PaintOp::Fill),
            "B" | "B*" => emit_path(handler, state, &mut path, PaintOp::FillAndStroke),
            "b" | "b*" => {
                path.close();
                emit_path(handler, state, &mut path, PaintOp::FillAndStroke);
            }
            "n" => {
                path.take();
            }

            // Clipping does not affect extraction.
            "W" | "W*" => {}

            _ => {}
        }
    }

    Ok(())
}

// --- Operand helpers ---

fn get_f64(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(|o| object_to_f64(o).ok())
}

fn numbers(operands: &[Object]) -> Vec<f64> {
    operands.iter().filter_map(|o| object_to_f64(o).ok()).collect()
}

fn name_operand(operands: &[Object], index: usize) -> Option<String> {
    operands
        .get(index)
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

fn matrix_operand(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    Matrix::from_slice(&numbers(&operands[..6]))
}

// --- Color spaces ---

fn color_space_operand(doc: &Document, resources: &Dictionary, operands: &[Object]) -> ColorSpaceKind {
    match operands.first().and_then(|o| o.as_name().ok()) {
        Some(name) => resolve_color_space_name(doc, resources, name),
        None => ColorSpaceKind::Unsupported,
    }
}

fn resolve_color_space_name(doc: &Document, resources: &Dictionary, name: &[u8]) -> ColorSpaceKind {
    if let Some(space) = device_space(name) {
        return space;
    }
    resources
        .get(b"ColorSpace")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict().ok())
        .and_then(|spaces| spaces.get(name).ok())
        .map(|o| color_space_object(doc, resolve_ref(doc, o)))
        .unwrap_or(ColorSpaceKind::Unsupported)
}

fn device_space(name: &[u8]) -> Option<ColorSpaceKind> {
    match name {
        b"DeviceGray" | b"G" | b"CalGray" => Some(ColorSpaceKind::Gray),
        b"DeviceRGB" | b"RGB" | b"CalRGB" => Some(ColorSpaceKind::Rgb),
        b"DeviceCMYK" | b"CMYK" => Some(ColorSpaceKind::Cmyk),
        b"Pattern" => Some(ColorSpaceKind::Pattern),
        _ => None,
    }
}

fn color_space_object(doc: &Document, obj: &Object) -> ColorSpaceKind {
    match obj {
        Object::Name(name) => device_space(name).unwrap_or(ColorSpaceKind::Unsupported),
        Object::Array(items) => {
            let family = items.first().and_then(|o| o.as_name().ok()).unwrap_or(b"");
            match family {
                b"ICCBased" => items
                    .get(1)
                    .map(|o| resolve_ref(doc, o))
                    .and_then(|o| o.as_stream().ok())
                    .and_then(|s| s.dict.get(b"N").ok())
                    .and_then(|n| n.as_i64().ok())
                    .map_or(ColorSpaceKind::Unsupported, |n| {
                        ColorSpaceKind::from_components(n.max(0) as usize)
                    }),
                // Separation, DeviceN, Indexed and Lab carry no direct RGB.
                _ => device_space(family).unwrap_or(ColorSpaceKind::Unsupported),
            }
        }
        _ => ColorSpaceKind::Unsupported,
    }
}

// --- Fonts ---

fn load_font_if_needed<'a>(
    doc: &'a Document,
    resources: &'a Dictionary,
    font_name: &str,
    cache: &mut HashMap<String, LoadedFont<'a>>,
    handler: &mut dyn ContentHandler,
) {
    if cache.contains_key(font_name) {
        return;
    }

    let font_dict = resources
        .get(b"Font")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict().ok())
        .and_then(|fonts| fonts.get(font_name.as_bytes()).ok())
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict().ok());

    let font = match font_dict {
        Some(dict) => LoadedFont::load(doc, dict, font_name),
        None => {
            handler.on_warning(
                ExtractWarning::new(
                    ExtractWarningCode::FontError,
                    "font not found in resources; using default metrics",
                )
                .element(format!("font /{font_name}")),
            );
            LoadedFont::fallback(font_name)
        }
    };
    cache.insert(font_name.to_string(), font);
}

// --- Text showing ---

fn show_text(
    op: &Operation,
    state: &mut InterpreterState<TextState>,
    font: &LoadedFont<'_>,
    run: usize,
    handler: &mut dyn ContentHandler,
) {
    let string_operand = if op.operator == "\"" { 2 } else { 0 };
    match op.operator.as_str() {
        "TJ" => {
            let Some(items) = op.operands.first().and_then(|o| o.as_array().ok()) else {
                return;
            };
            for item in items {
                match item {
                    Object::String(bytes, _) => show_string(state, font, bytes, run, handler),
                    other => {
                        if let Ok(adjust) = object_to_f64(other) {
                            let ts = state.text();
                            let tx = -adjust / 1000.0 * ts.font_size * ts.h_scaling;
                            state.text_mut().advance(tx);
                        }
                    }
                }
            }
        }
        _ => {
            if let Some(Object::String(bytes, _)) = op.operands.get(string_operand) {
                show_string(state, font, bytes, run, handler);
            }
        }
    }
}

fn show_string(
    state: &mut InterpreterState<TextState>,
    font: &LoadedFont<'_>,
    bytes: &[u8],
    run: usize,
    handler: &mut dyn ContentHandler,
) {
    for code in font.codes(bytes) {
        let gs = state.graphics();
        let ts = state.text();
        let trm = ts.rendering_matrix().multiply(&gs.ctm);
        let width = font.width(code);
        let color = if ts.render_mode.fills() || !ts.render_mode.strokes() {
            gs.fill
        } else {
            gs.stroke
        };
        let mut flags = font.flags;
        if ts.rise > 0.0 {
            flags |= FLAG_SUPERSCRIPT;
        }

        handler.on_glyph(GlyphEvent {
            text: font.decode(code),
            trm,
            width,
            ascent: font.ascent,
            descent: font.descent,
            font: font.name.clone(),
            size: trm.vertical_scale(),
            flags,
            color,
            render_mode: ts.render_mode,
            run,
        });

        let word_spacing = if !font.is_composite() && code == 32 {
            ts.word_spacing
        } else {
            0.0
        };
        let tx = (width * ts.font_size + ts.char_spacing + word_spacing) * ts.h_scaling;
        state.text_mut().advance(tx);
    }
}

// --- Paths ---

fn emit_path(
    handler: &mut dyn ContentHandler,
    state: &InterpreterState<TextState>,
    path: &mut PathBuilder,
    paint_op: PaintOp,
) {
    let segments = path.take();
    if segments.is_empty() {
        return;
    }
    let gs = state.graphics();
    handler.on_path_painted(PathEvent {
        segments,
        paint_op,
        fill: gs.fill,
        stroke: gs.stroke,
        ctm: gs.ctm,
    });
}

// --- XObjects ---

fn handle_do<'a>(
    ctx: &mut PageContext<'a>,
    resources: &'a Dictionary,
    handler: &mut dyn ContentHandler,
    depth: usize,
    state: &mut InterpreterState<TextState>,
    name: &str,
) {
    let doc = ctx.doc;
    let Some(stream) = resources
        .get(b"XObject")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict().ok())
        .and_then(|xobjects| xobjects.get(name.as_bytes()).ok())
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_stream().ok())
    else {
        handler.on_warning(
            ExtractWarning::new(ExtractWarningCode::ContentStreamError, "XObject not found")
                .element(format!("xobject /{name}")),
        );
        return;
    };

    match stream.dict.get(b"Subtype").and_then(Object::as_name) {
        Ok(b"Image") => handler.on_image(ImageEvent {
            name: name.to_string(),
            ctm: state.graphics().ctm,
        }),
        Ok(b"Form") => {
            if depth + 1 > ctx.options.max_recursion_depth {
                handler.on_warning(
                    ExtractWarning::new(
                        ExtractWarningCode::ContentStreamError,
                        format!(
                            "Form XObject recursion depth {} exceeds limit {}",
                            depth + 1,
                            ctx.options.max_recursion_depth
                        ),
                    )
                    .element(format!("xobject /{name}")),
                );
                return;
            }

            let form_resources = stream
                .dict
                .get(b"Resources")
                .ok()
                .map(|o| resolve_ref(doc, o))
                .and_then(|o| o.as_dict().ok())
                .unwrap_or(resources);

            let content = match stream.decompressed_content() {
                Ok(bytes) => bytes,
                Err(_) if stream.dict.get(b"Filter").is_err() => stream.content.clone(),
                Err(e) => {
                    handler.on_warning(
                        ExtractWarning::new(
                            ExtractWarningCode::ContentStreamError,
                            format!("failed to decompress Form XObject: {e}"),
                        )
                        .element(format!("xobject /{name}")),
                    );
                    return;
                }
            };

            state.save();
            if let Some(m) = stream
                .dict
                .get(b"Matrix")
                .ok()
                .and_then(|o| o.as_array().ok())
                .and_then(|arr| matrix_operand(arr))
            {
                state.concat_matrix(&m);
            }
            let result = interpret_content_stream(ctx, &content, form_resources, handler, depth + 1, state);
            state.restore();

            if let Err(e) = result {
                handler.on_warning(
                    ExtractWarning::new(ExtractWarningCode::ContentStreamError, e.to_string())
                        .element(format!("xobject /{name}")),
                );
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};
    use pdfmarkup_core::Rgb;

    #[derive(Default)]
    struct CollectingHandler {
        glyphs: Vec<GlyphEvent>,
        paths: Vec<PathEvent>,
        images: Vec<ImageEvent>,
        warnings: Vec<ExtractWarning>,
    }

    impl ContentHandler for CollectingHandler {
        fn on_glyph(&mut self, event: GlyphEvent) {
            self.glyphs.push(event);
        }
        fn on_path_painted(&mut self, event: PathEvent) {
            self.paths.push(event);
        }
        fn on_image(&mut self, event: ImageEvent) {
            self.images.push(event);
        }
        fn on_warning(&mut self, warning: ExtractWarning) {
            self.warnings.push(warning);
        }
    }

    fn helvetica_resources() -> Dictionary {
        dictionary! {
            "Font" => dictionary! {
                "F1" => dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                },
            },
        }
    }

    fn run(doc: &Document, content: &[u8], resources: &Dictionary) -> CollectingHandler {
        let options = ParseOptions::default();
        let mut ctx = PageContext::new(doc, &options);
        let mut handler = CollectingHandler::default();
        let mut state = InterpreterState::new(TextState::default());
        interpret_content_stream(&mut ctx, content, resources, &mut handler, 0, &mut state)
            .unwrap();
        handler
    }

    fn text(handler: &CollectingHandler) -> String {
        handler.glyphs.iter().map(|g| g.text.as_str()).collect()
    }

    #[test]
    fn simple_text_glyphs() {
        let doc = Document::with_version("1.5");
        let res = helvetica_resources();
        let h = run(&doc, b"BT /F1 12 Tf 72 700 Td (Hi) Tj ET", &res);
        assert_eq!(text(&h), "Hi");
        let first = &h.glyphs[0];
        assert_eq!(first.font, "Helvetica");
        assert!((first.size - 12.0).abs() < 1e-9);
        assert_eq!(first.trm.transform(0.0, 0.0), (72.0, 700.0));
        // H advance is 0.722 em.
        let second = h.glyphs[1].trm.transform(0.0, 0.0);
        assert!((second.0 - (72.0 + 0.722 * 12.0)).abs() < 1e-9);
        assert_eq!(first.color, Some(Rgb::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn tj_array_adjustment_moves_left() {
        let doc = Document::with_version("1.5");
        let res = helvetica_resources();
        let h = run(&doc, b"BT /F1 10 Tf 0 0 Td [(A) -1000 (B)] TJ ET", &res);
        assert_eq!(text(&h), "AB");
        let b_x = h.glyphs[1].trm.e;
        assert!((b_x - (0.667 * 10.0 + 10.0)).abs() < 1e-9);
        assert_eq!(h.glyphs[0].run, h.glyphs[1].run);
    }

    #[test]
    fn each_show_operator_is_its_own_run() {
        let doc = Document::with_version("1.5");
        let res = helvetica_resources();
        let h = run(&doc, b"BT /F1 10 Tf 14 TL (A) Tj (B) ' ET", &res);
        assert_eq!(text(&h), "AB");
        assert_ne!(h.glyphs[0].run, h.glyphs[1].run);
        assert_eq!(h.glyphs[1].trm.f, -14.0);
    }

    #[test]
    fn fill_color_and_rectangle_path() {
        let doc = Document::with_version("1.5");
        let res = Dictionary::new();
        let h = run(&doc, b"0 1 0 rg 10 20 30 40 re f", &res);
        assert_eq!(h.paths.len(), 1);
        let p = &h.paths[0];
        assert_eq!(p.paint_op, PaintOp::Fill);
        assert_eq!(p.fill, Some(Rgb::new(0.0, 1.0, 0.0)));
        assert_eq!(
            p.segments,
            vec![PathSegment::Rect([
                Point::new(10.0, 20.0),
                Point::new(40.0, 20.0),
                Point::new(40.0, 60.0),
                Point::new(10.0, 60.0),
            ])]
        );
    }

    #[test]
    fn cmyk_and_gray_fill() {
        let doc = Document::with_version("1.5");
        let res = Dictionary::new();
        let h = run(&doc, b"0.5 g 0 0 1 1 re f 1 0 1 0 k 0 0 1 1 re f", &res);
        assert_eq!(h.paths[0].fill, Some(Rgb::new(0.5, 0.5, 0.5)));
        assert_eq!(h.paths[1].fill, Some(Rgb::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn separation_space_has_no_color() {
        let doc = Document::with_version("1.5");
        let res = dictionary! {
            "ColorSpace" => dictionary! {
                "CS0" => vec![
                    Object::Name(b"Separation".to_vec()),
                    Object::Name(b"Spot".to_vec()),
                    Object::Name(b"DeviceCMYK".to_vec()),
                ],
            },
        };
        let h = run(&doc, b"/CS0 cs 1 scn 0 0 5 5 re f", &res);
        assert_eq!(h.paths[0].fill, None);
    }

    #[test]
    fn stroke_only_and_discarded_paths() {
        let doc = Document::with_version("1.5");
        let res = Dictionary::new();
        let h = run(&doc, b"0 0 m 10 10 l S 0 0 m 5 5 l n", &res);
        assert_eq!(h.paths.len(), 1);
        assert_eq!(h.paths[0].paint_op, PaintOp::Stroke);
    }

    #[test]
    fn ctm_applies_to_paths_and_restores() {
        let doc = Document::with_version("1.5");
        let res = Dictionary::new();
        let h = run(&doc, b"q 2 0 0 2 100 100 cm 0 0 m 10 0 l S Q 0 0 m 1 0 l S", &res);
        assert_eq!(
            h.paths[0].segments[1],
            PathSegment::LineTo(Point::new(120.0, 100.0))
        );
        assert_eq!(h.paths[1].segments[1], PathSegment::LineTo(Point::new(1.0, 0.0)));
    }

    #[test]
    fn missing_font_warns_and_uses_fallback() {
        let doc = Document::with_version("1.5");
        let res = Dictionary::new();
        let h = run(&doc, b"BT /F9 12 Tf (x) Tj ET", &res);
        assert_eq!(text(&h), "x");
        assert_eq!(h.warnings.len(), 1);
        assert_eq!(h.warnings[0].code, ExtractWarningCode::FontError);
    }

    #[test]
    fn form_xobject_text_and_image() {
        let mut doc = Document::with_version("1.5");
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0],
        ));
        let form_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 100.into(), 100.into()],
                "Matrix" => vec![1.into(), 0.into(), 0.into(), 1.into(), 50.into(), 0.into()],
            },
            b"BT /F1 10 Tf 0 0 Td (F) Tj ET".to_vec(),
        ));
        let mut res = helvetica_resources();
        res.set(
            "XObject",
            dictionary! { "Fm0" => form_id, "Im0" => image_id },
        );
        let h = run(&doc, b"/Fm0 Do q 20 0 0 20 5 5 cm /Im0 Do Q", &res);
        assert_eq!(text(&h), "F");
        assert_eq!(h.glyphs[0].trm.e, 50.0);
        assert_eq!(h.images.len(), 1);
        assert_eq!(h.images[0].ctm, Matrix::new(20.0, 0.0, 0.0, 20.0, 5.0, 5.0));
    }

    #[test]
    fn self_referencing_form_stops_at_depth_limit() {
        let mut doc = Document::with_version("1.5");
        let form_id = doc.new_object_id();
        doc.objects.insert(
            form_id,
            Object::Stream(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Form",
                    "Resources" => dictionary! {
                        "XObject" => dictionary! { "Fm0" => form_id },
                    },
                },
                b"/Fm0 Do".to_vec(),
            )),
        );
        let res = dictionary! { "XObject" => dictionary! { "Fm0" => form_id } };
        let h = run(&doc, b"/Fm0 Do", &res);
        assert_eq!(h.warnings.len(), 1);
        assert!(h.warnings[0].description.contains("recursion depth"));
    }

    #[test]
    fn truncated_stream_keeps_leading_operators() {
        let doc = Document::with_version("1.5");
        let res = helvetica_resources();
        let h = run(&doc, b"BT /F1 12 Tf (ok) Tj (unterminated", &res);
        assert_eq!(text(&h), "ok");
    }

    #[test]
    fn inline_image_between_text_runs() {
        let doc = Document::with_version("1.5");
        let res = helvetica_resources();
        let h = run(
            &doc,
            b"BT /F1 12 Tf 72 700 Td (Hello) Tj ET q 10 0 0 10 300 300 cm \
              BI /W 1 /H 1 /BPC 8 /CS /G ID \x80 EI Q BT /F1 12 Tf 72 600 Td (After) Tj ET",
            &res,
        );
        assert_eq!(text(&h), "HelloAfter");
        assert_eq!(h.images.len(), 1);
        assert_eq!(h.images[0].name, "inline");
        assert_eq!(h.images[0].ctm, Matrix::new(10.0, 0.0, 0.0, 10.0, 300.0, 300.0));
        assert!(h.warnings.is_empty());
    }

    #[test]
    fn filtered_inline_image_does_not_break_decoding() {
        let doc = Document::with_version("1.5");
        let res = helvetica_resources();
        let h = run(
            &doc,
            b"BI /W 2 /H 2 /BPC 8 /F /AHx ID 00ff00ff> EI BT /F1 12 Tf (ok) Tj ET",
            &res,
        );
        assert_eq!(text(&h), "ok");
        assert_eq!(h.images.len(), 1);
    }

    #[test]
    fn unterminated_inline_image_is_an_error() {
        let doc = Document::with_version("1.5");
        let options = ParseOptions::default();
        let mut ctx = PageContext::new(&doc, &options);
        let mut handler = CollectingHandler::default();
        let mut state = InterpreterState::new(TextState::default());
        let res = Dictionary::new();
        let result = interpret_content_stream(
            &mut ctx,
            b"BI /W 1 /H 1 ID \x80",
            &res,
            &mut handler,
            0,
            &mut state,
        );
        assert!(result.is_err());
    }
}
