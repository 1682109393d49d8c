//! Builds structured page output from interpreter events.
//!
//! [`PageCollector`] receives glyphs, paths and images in content order and
//! assembles:
//! - structured text: blocks of lines of spans of characters, in page space;
//! - vector drawings with their fill and stroke colors;
//! - the fill-operation log (one bounding box per painting operation).
//!
//! Glyphs join the current line while they continue along its baseline;
//! spans break on any change of font, size, flags or color.

use pdfmarkup_core::{
    BlockKind, Drawing, ExtractWarning, ExtractWarningCode, FillLogEntry, LogOp, PathItem,
    PathItemKind, Point, RawChar, RawSpan, Rect, Rgb, TextBlock, TextLine, TextPage,
};

use crate::handler::{ContentHandler, GlyphEvent, ImageEvent, PathEvent, PathSegment};
use crate::matrix::Matrix;
use crate::page_geometry::PageGeometry;
use crate::text_state::TextRenderMode;

/// A gap wider than this fraction of the font size inserts a space.
const SPACE_GAP_RATIO: f64 = 0.15;
/// Baseline offset, relative to font size, still counted as the same line.
const BASELINE_TOLERANCE: f64 = 0.5;
/// Vertical gap between lines, relative to font size, that starts a new block.
const BLOCK_GAP_RATIO: f64 = 1.0;

/// Interpretation results for one page.
#[derive(Debug, Clone)]
pub struct CollectedPage {
    pub text: TextPage,
    /// `Err((limit, actual))` when the drawing segment limit was exceeded.
    pub drawings: Result<Vec<Drawing>, (usize, usize)>,
    pub fill_log: Vec<FillLogEntry>,
    pub warnings: Vec<ExtractWarning>,
}

#[derive(Debug)]
struct LineState {
    line: TextLine,
    /// Baseline start of the last glyph.
    last_origin: Point,
    /// Baseline end of the last glyph.
    last_end: Point,
    last_size: f64,
    /// Whether the last emitted character was whitespace.
    last_blank: bool,
}

#[derive(Debug)]
struct RunState {
    run: usize,
    mode: TextRenderMode,
    bbox: Option<Rect>,
}

/// Collects one page's interpretation events.
pub struct PageCollector {
    geometry: PageGeometry,
    page_number: usize,
    max_segments: usize,
    blocks: Vec<TextBlock>,
    block: Option<TextBlock>,
    line: Option<LineState>,
    drawings: Vec<Drawing>,
    segment_count: usize,
    drawings_overflowed: bool,
    fill_log: Vec<FillLogEntry>,
    run: Option<RunState>,
    warnings: Vec<ExtractWarning>,
}

impl PageCollector {
    pub fn new(geometry: PageGeometry, page_number: usize, max_segments: usize) -> Self {
        Self {
            geometry,
            page_number,
            max_segments,
            blocks: Vec::new(),
            block: None,
            line: None,
            drawings: Vec::new(),
            segment_count: 0,
            drawings_overflowed: false,
            fill_log: Vec::new(),
            run: None,
            warnings: Vec::new(),
        }
    }

    /// Finish collection.
    pub fn finish(mut self) -> CollectedPage {
        self.flush_run();
        self.flush_block();
        let drawings = if self.drawings_overflowed {
            Err((self.max_segments, self.segment_count))
        } else {
            Ok(self.drawings)
        };
        CollectedPage {
            text: TextPage {
                width: self.geometry.width(),
                height: self.geometry.height(),
                blocks: self.blocks,
            },
            drawings,
            fill_log: self.fill_log,
            warnings: self.warnings,
        }
    }

    fn point(&self, m: &Matrix, x: f64, y: f64) -> Point {
        let (x, y) = m.transform(x, y);
        self.geometry.normalize_point(x, y)
    }

    // --- Fill log ---

    fn flush_run(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        let Some(bbox) = run.bbox else {
            return;
        };
        let ops: &[LogOp] = match run.mode {
            TextRenderMode::Fill | TextRenderMode::FillClip => &[LogOp::FillText],
            TextRenderMode::Stroke | TextRenderMode::StrokeClip => &[LogOp::StrokeText],
            TextRenderMode::FillStroke | TextRenderMode::FillStrokeClip => {
                &[LogOp::FillText, LogOp::StrokeText]
            }
            TextRenderMode::Invisible | TextRenderMode::Clip => &[LogOp::IgnoreText],
        };
        for &op in ops {
            self.fill_log.push(FillLogEntry { op, bbox });
        }
    }

    fn track_run(&mut self, run: usize, mode: TextRenderMode, bbox: Rect) {
        if self.run.as_ref().is_some_and(|r| r.run != run) {
            self.flush_run();
        }
        let state = self.run.get_or_insert(RunState {
            run,
            mode,
            bbox: None,
        });
        state.bbox = Some(state.bbox.map_or(bbox, |b| b.union(&bbox)));
    }

    // --- Text layout ---

    fn flush_line(&mut self) {
        let Some(state) = self.line.take() else {
            return;
        };
        let mut line = state.line;
        line.spans.retain(|s| !s.chars.is_empty());
        if line.spans.is_empty() {
            return;
        }
        for span in &mut line.spans {
            finish_span(span);
        }
        line.bbox = union_all(line.spans.iter().map(|s| s.bbox)).unwrap_or(line.bbox);

        let number = self.blocks.len();
        let block = self.block.get_or_insert_with(|| TextBlock {
            number,
            kind: BlockKind::Text,
            bbox: line.bbox,
            lines: Vec::new(),
        });
        block.bbox = block.bbox.union(&line.bbox);
        block.lines.push(line);
    }

    fn flush_block(&mut self) {
        self.flush_line();
        if let Some(block) = self.block.take() {
            self.blocks.push(block);
        }
    }

    /// Whether a glyph starting at `origin` continues the current line.
    fn continues_line(&self, origin: Point, dir: Point, size: f64) -> bool {
        let Some(state) = &self.line else {
            return false;
        };
        let line_dir = state.line.dir;
        if (line_dir.x - dir.x).abs() > 0.01 || (line_dir.y - dir.y).abs() > 0.01 {
            return false;
        }
        let dx = origin.x - state.last_origin.x;
        let dy = origin.y - state.last_origin.y;
        let off_baseline = (dx * line_dir.y - dy * line_dir.x).abs();
        let tolerance = BASELINE_TOLERANCE * size.max(state.last_size);
        let along = (origin.x - state.last_end.x) * line_dir.x
            + (origin.y - state.last_end.y) * line_dir.y;
        off_baseline <= tolerance && along >= -size.max(state.last_size)
    }

    /// Whether a new line with first glyph box `first_line_bbox` joins the current block.
    fn continues_block(&self, first_line_bbox: Rect, size: f64) -> bool {
        let Some(block) = &self.block else {
            return false;
        };
        let Some(last) = block.lines.last() else {
            return false;
        };
        let gap = first_line_bbox.y0 - last.bbox.y1;
        gap <= BLOCK_GAP_RATIO * size && first_line_bbox.y0 >= last.bbox.y0
    }

    fn add_glyph(&mut self, event: &GlyphEvent) {
        let trm = &event.trm;
        let origin = self.point(trm, 0.0, 0.0);
        let end = self.point(trm, event.width, 0.0);
        let dir = direction(origin, end, trm, &self.geometry);

        let glyph_box = Rect::bounding([
            self.point(trm, 0.0, event.descent),
            self.point(trm, event.width, event.descent),
            self.point(trm, event.width, event.ascent),
            self.point(trm, 0.0, event.ascent),
        ])
        .unwrap_or_else(|| Rect::new(origin.x, origin.y, origin.x, origin.y));

        self.track_run(event.run, event.render_mode, glyph_box);

        if event.text.is_empty() {
            return;
        }

        if !self.continues_line(origin, dir, event.size) {
            self.flush_line();
            if !self.continues_block(glyph_box, event.size) {
                self.flush_block();
            }
            self.line = Some(LineState {
                line: TextLine {
                    bbox: glyph_box,
                    wmode: 0,
                    dir,
                    spans: Vec::new(),
                },
                last_origin: origin,
                last_end: origin,
                last_size: event.size,
                last_blank: true,
            });
        }

        // Ligatures and multi-character mappings share the glyph's advance.
        let count = event.text.chars().count() as f64;
        let chars: Vec<RawChar> = event
            .text
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let from = event.width * i as f64 / count;
                let to = event.width * (i + 1) as f64 / count;
                let bbox = Rect::bounding([
                    self.point(trm, from, event.descent),
                    self.point(trm, to, event.descent),
                    self.point(trm, to, event.ascent),
                    self.point(trm, from, event.ascent),
                ])
                .unwrap_or(glyph_box);
                RawChar {
                    c,
                    bbox,
                    origin: self.point(trm, from, 0.0),
                }
            })
            .collect();

        let color = event.color.map(|c: Rgb| i64::from(c.to_srgb_int()));
        let Some(state) = self.line.as_mut() else {
            return;
        };

        let starts_span = state.line.spans.last().is_none_or(|span| {
            span.font != event.font
                || (span.size - event.size).abs() > 0.01
                || span.flags != event.flags
                || span.color != color
        });

        // Synthetic space for visible gaps between words.
        let gap = (origin.x - state.last_end.x) * dir.x + (origin.y - state.last_end.y) * dir.y;
        let first_char_blank = event.text.starts_with(char::is_whitespace);
        if !state.last_blank && !first_char_blank && gap > SPACE_GAP_RATIO * event.size {
            if let Some(span) = state.line.spans.last_mut() {
                let bbox = Rect::bounding([
                    state.last_end,
                    origin,
                    Point::new(state.last_end.x, glyph_box.y0),
                    Point::new(origin.x, glyph_box.y1),
                ])
                .unwrap_or(glyph_box);
                span.chars.push(RawChar {
                    c: ' ',
                    bbox,
                    origin: state.last_end,
                });
            }
        }

        if starts_span {
            state.line.spans.push(RawSpan {
                text: String::new(),
                bbox: glyph_box,
                origin,
                font: event.font.clone(),
                size: event.size,
                flags: event.flags,
                color,
                is_bold: false,
                chars: Vec::new(),
            });
        }
        let Some(span) = state.line.spans.last_mut() else {
            return;
        };

        span.chars.extend(chars);

        state.last_origin = origin;
        state.last_end = end;
        state.last_size = event.size;
        state.last_blank = event.text.ends_with(char::is_whitespace);
    }

    // --- Paths ---

    fn add_path(&mut self, event: &PathEvent) {
        self.flush_run();

        let points: Vec<Point> = event
            .segments
            .iter()
            .flat_map(|s| s.points().iter().copied())
            .map(|p| self.geometry.normalize_point(p.x, p.y))
            .collect();
        let bounds = Rect::bounding(points.iter().copied().filter(|p| p.x.is_finite() && p.y.is_finite()));

        if let Some(bbox) = bounds {
            if event.paint_op.fills() {
                self.fill_log.push(FillLogEntry {
                    op: LogOp::FillPath,
                    bbox,
                });
            }
            if event.paint_op.strokes() {
                self.fill_log.push(FillLogEntry {
                    op: LogOp::StrokePath,
                    bbox,
                });
            }
        }

        if self.drawings_overflowed {
            self.segment_count += event.segments.len();
            return;
        }
        self.segment_count += event.segments.len();
        if self.segment_count > self.max_segments {
            self.drawings_overflowed = true;
            self.drawings = Vec::new();
            self.warnings.push(
                ExtractWarning::new(
                    ExtractWarningCode::DrawingsUnavailable,
                    format!(
                        "drawing segment limit {} exceeded; detailed drawings dropped",
                        self.max_segments
                    ),
                )
                .on_page(self.page_number),
            );
            return;
        }

        let single_rect = match event.segments.as_slice() {
            [PathSegment::Rect(corners)] | [PathSegment::Rect(corners), PathSegment::ClosePath] => {
                Some(corners)
            }
            _ => None,
        };
        let rect = single_rect
            .filter(|_| event.ctm.preserves_axes())
            .and_then(|corners| {
                Rect::bounding(corners.iter().map(|p| self.geometry.normalize_point(p.x, p.y)))
            });

        let items = self.path_items(&event.segments);
        self.drawings.push(Drawing {
            fill: if event.paint_op.fills() { event.fill } else { None },
            stroke: if event.paint_op.strokes() {
                event.stroke
            } else {
                None
            },
            rect,
            items,
        });
    }

    fn path_items(&self, segments: &[PathSegment]) -> Vec<PathItem> {
        let norm = |p: &Point| self.geometry.normalize_point(p.x, p.y);
        let mut items = Vec::new();
        let mut start: Option<Point> = None;
        let mut current: Option<Point> = None;
        for segment in segments {
            match segment {
                PathSegment::MoveTo(p) => {
                    start = Some(norm(p));
                    current = start;
                }
                PathSegment::LineTo(p) => {
                    let p = norm(p);
                    if let Some(from) = current {
                        items.push(PathItem {
                            kind: PathItemKind::Line,
                            points: vec![from, p],
                        });
                    }
                    current = Some(p);
                }
                PathSegment::CurveTo(pts) => {
                    let [c1, c2, end] = [norm(&pts[0]), norm(&pts[1]), norm(&pts[2])];
                    if let Some(from) = current {
                        items.push(PathItem {
                            kind: PathItemKind::Curve,
                            points: vec![from, c1, c2, end],
                        });
                    }
                    current = Some(end);
                }
                PathSegment::Rect(corners) => {
                    let points: Vec<Point> = corners.iter().map(norm).collect();
                    start = points.first().copied();
                    current = start;
                    items.push(PathItem {
                        kind: PathItemKind::Rect,
                        points,
                    });
                }
                PathSegment::ClosePath => {
                    if let (Some(from), Some(to)) = (current, start) {
                        if from != to {
                            items.push(PathItem {
                                kind: PathItemKind::Line,
                                points: vec![from, to],
                            });
                        }
                    }
                    current = start;
                }
            }
        }
        items
    }

    // --- Images ---

    fn add_image(&mut self, event: &ImageEvent) {
        self.flush_run();
        let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
            .map(|(x, y)| self.point(&event.ctm, x, y));
        let Some(bbox) = Rect::bounding(corners) else {
            return;
        };
        self.fill_log.push(FillLogEntry {
            op: LogOp::FillImage,
            bbox,
        });

        self.flush_block();
        let number = self.blocks.len();
        self.blocks.push(TextBlock {
            number,
            kind: BlockKind::Image,
            bbox,
            lines: Vec::new(),
        });
    }
}

impl ContentHandler for PageCollector {
    fn on_glyph(&mut self, event: GlyphEvent) {
        self.add_glyph(&event);
    }

    fn on_path_painted(&mut self, event: PathEvent) {
        self.add_path(&event);
    }

    fn on_image(&mut self, event: ImageEvent) {
        self.add_image(&event);
    }

    fn on_warning(&mut self, warning: ExtractWarning) {
        self.warnings.push(warning.on_page(self.page_number));
    }
}

/// Unit baseline direction in page space.
fn direction(origin: Point, end: Point, trm: &Matrix, geometry: &PageGeometry) -> Point {
    let (mut dx, mut dy) = (end.x - origin.x, end.y - origin.y);
    if dx.hypot(dy) < 1e-9 {
        // Zero-width glyph: use the text matrix's x axis.
        let p0 = geometry.normalize_point(trm.e, trm.f);
        let p1 = geometry.normalize_point(trm.e + trm.a, trm.f + trm.b);
        dx = p1.x - p0.x;
        dy = p1.y - p0.y;
    }
    let len = dx.hypot(dy);
    if len < 1e-9 || !len.is_finite() {
        return Point::new(1.0, 0.0);
    }
    // Round to suppress floating noise in the common axis-aligned cases.
    let round = |v: f64| (v * 1e6).round() / 1e6;
    Point::new(round(dx / len), round(dy / len))
}

fn union_all(rects: impl Iterator<Item = Rect>) -> Option<Rect> {
    rects.reduce(|a, b| a.union(&b))
}

fn finish_span(span: &mut RawSpan) {
    span.text = span.chars.iter().map(|c| c.c).collect();
    if let Some(bbox) = union_all(span.chars.iter().map(|c| c.bbox)) {
        span.bbox = bbox;
    }
    if let Some(first) = span.chars.first() {
        span.origin = first.origin;
    }
}
