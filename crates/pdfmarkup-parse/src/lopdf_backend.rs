//! lopdf-based PDF parsing backend.
//!
//! Implements [`PdfBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate. Each page's content stream is interpreted once, when the page is
//! loaded; text, drawings and the fill log are then served from that result.

use lopdf::{Dictionary, Document, Object, ObjectId};
use pdfmarkup_core::{
    AnnotationRecord, Drawing, ExtractWarning, ExtractWarningCode, FillLogEntry, Point, Quad, Rect,
    Rgb, TextPage, Vertices,
};

use crate::backend::{ParseOptions, PdfBackend};
use crate::error::BackendError;
use crate::interpreter::{PageContext, interpret_content_stream};
use crate::interpreter_state::InterpreterState;
use crate::page_collector::{CollectedPage, PageCollector};
use crate::page_geometry::PageGeometry;
use crate::text_state::TextState;

/// US Letter, used when a page tree carries no usable MediaBox.
const DEFAULT_MEDIA_BOX: Rect = Rect {
    x0: 0.0,
    y0: 0.0,
    x1: 612.0,
    y1: 792.0,
};

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: Document,
    /// Page ObjectIds indexed by 0-based page number.
    page_ids: Vec<ObjectId>,
    options: ParseOptions,
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// A loaded page and its interpretation result.
#[derive(Debug, Clone)]
pub struct LopdfPage {
    pub object_id: ObjectId,
    /// The 0-based page index.
    pub index: usize,
    pub geometry: PageGeometry,
    /// `Err` holds the description of an undecodable content stream.
    collected: Result<CollectedPage, String>,
}

impl LopdfPage {
    /// 1-based page number.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    fn collected(&self) -> Result<&CollectedPage, BackendError> {
        self.collected
            .as_ref()
            .map_err(|msg| BackendError::Interpreter(msg.clone()))
    }
}

/// The lopdf-based PDF backend.
///
/// # Example
///
/// ```ignore
/// use pdfmarkup_parse::{LopdfBackend, ParseOptions, PdfBackend};
///
/// let doc = LopdfBackend::open(pdf_bytes, &ParseOptions::default())?;
/// let page = LopdfBackend::get_page(&doc, 0)?;
/// let annots = LopdfBackend::annotations(&doc, &page)?;
/// ```
pub struct LopdfBackend;

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &Object) -> Result<f64, BackendError> {
    match obj {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(f) => Ok(*f as f64),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Follow an indirect reference; unresolvable references stay as they are.
pub(crate) fn resolve_ref<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Extract a [`Rect`] from a lopdf array of 4 numbers `[x0, y0, x1, y1]`.
fn rect_from_array(array: &[Object]) -> Result<Rect, BackendError> {
    if array.len() != 4 {
        return Err(BackendError::Parse(format!(
            "expected 4-element array for box, got {}",
            array.len()
        )));
    }
    Ok(Rect::new(
        object_to_f64(&array[0])?,
        object_to_f64(&array[1])?,
        object_to_f64(&array[2])?,
        object_to_f64(&array[3])?,
    ))
}

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current_id = page_id;
    // Bounded walk: a malformed tree may contain a /Parent cycle.
    for _ in 0..64 {
        let dict = doc
            .get_object(current_id)
            .and_then(Object::as_dict)
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(resolve_ref(doc, value)));
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

fn inherited_box(
    doc: &Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<Rect>, BackendError> {
    Ok(resolve_inherited(doc, page_id, key)?
        .and_then(|obj| obj.as_array().ok())
        .and_then(|arr| rect_from_array(arr).ok()))
}

fn page_geometry(doc: &Document, page_id: ObjectId) -> Result<PageGeometry, BackendError> {
    let media_box = inherited_box(doc, page_id, b"MediaBox")?.unwrap_or(DEFAULT_MEDIA_BOX);
    let crop_box = inherited_box(doc, page_id, b"CropBox")?;
    Ok(PageGeometry::new(media_box, crop_box))
}

/// Concatenated bytes of a page's content stream(s).
fn get_page_content_bytes(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>, BackendError> {
    let contents = match page_dict.get(b"Contents") {
        Ok(obj) => resolve_ref(doc, obj),
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Stream(stream) => decode_content_stream(stream),
        Object::Array(arr) => {
            let mut content = Vec::new();
            for item in arr {
                let stream = resolve_ref(doc, item).as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                let bytes = decode_content_stream(stream)?;
                if !content.is_empty() {
                    content.push(b' ');
                }
                content.extend_from_slice(&bytes);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}

/// Decode a content stream, decompressing if needed.
fn decode_content_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress content stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// Get the resources dictionary for a page, handling inheritance.
fn get_page_resources(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, BackendError> {
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => obj
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => {
            static EMPTY_DICT: std::sync::LazyLock<Dictionary> =
                std::sync::LazyLock::new(Dictionary::new);
            Ok(&EMPTY_DICT)
        }
    }
}

/// Interpret the page's content into text, drawings and the fill log.
fn collect_page(
    doc: &LopdfDocument,
    page_id: ObjectId,
    geometry: PageGeometry,
    page_number: usize,
) -> Result<CollectedPage, BackendError> {
    let inner = &doc.inner;
    let page_dict = inner
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
    let content = get_page_content_bytes(inner, page_dict)?;
    let resources = get_page_resources(inner, page_id)?;

    let mut ctx = PageContext::new(inner, &doc.options);
    let mut collector =
        PageCollector::new(geometry, page_number, doc.options.max_drawing_segments);
    let mut state = InterpreterState::new(TextState::default());
    interpret_content_stream(&mut ctx, &content, resources, &mut collector, 0, &mut state)?;
    Ok(collector.finish())
}

fn subtype(dict: &Dictionary) -> Option<String> {
    dict.get(b"Subtype")
        .and_then(Object::as_name)
        .ok()
        .map(|name| String::from_utf8_lossy(name).into_owned())
}

fn number_or_nan(doc: &Document, obj: &Object) -> f64 {
    object_to_f64(resolve_ref(doc, obj)).unwrap_or(f64::NAN)
}

/// Read a `[x y]` pair; anything else becomes a NaN point.
fn point_pair(doc: &Document, obj: &Object, geometry: &PageGeometry) -> Point {
    match resolve_ref(doc, obj).as_array() {
        Ok(pair) if pair.len() == 2 => geometry.normalize_point(
            number_or_nan(doc, &pair[0]),
            number_or_nan(doc, &pair[1]),
        ),
        _ => Point::new(f64::NAN, f64::NAN),
    }
}

/// Read an 8-number quad; anything else becomes a NaN quad.
fn quad_array(doc: &Document, obj: &Object, geometry: &PageGeometry) -> Quad {
    let nums: Vec<f64> = match resolve_ref(doc, obj).as_array() {
        Ok(arr) if arr.len() == 8 => arr.iter().map(|o| number_or_nan(doc, o)).collect(),
        _ => vec![f64::NAN; 8],
    };
    Quad::new([
        geometry.normalize_point(nums[0], nums[1]),
        geometry.normalize_point(nums[2], nums[3]),
        geometry.normalize_point(nums[4], nums[5]),
        geometry.normalize_point(nums[6], nums[7]),
    ])
}

/// Classify an annotation's geometry array by its first element and convert
/// its coordinates to page space.
///
/// A number selects the flat encoding, a 2-element array the point
/// encoding, an 8-element array the grouped quad encoding. Entries that do
/// not fit the chosen encoding become NaN so normalization rejects them.
fn read_vertices(doc: &Document, obj: &Object, geometry: &PageGeometry) -> Option<Vertices> {
    let items = resolve_ref(doc, obj).as_array().ok()?;
    let first = resolve_ref(doc, items.first()?);
    match first {
        Object::Integer(_) | Object::Real(_) => {
            let nums: Vec<f64> = items.iter().map(|o| number_or_nan(doc, o)).collect();
            let mut flat = Vec::with_capacity(nums.len());
            for pair in nums.chunks(2) {
                if let [x, y] = pair {
                    let p = geometry.normalize_point(*x, *y);
                    flat.push(p.x);
                    flat.push(p.y);
                } else {
                    flat.extend_from_slice(pair);
                }
            }
            Some(Vertices::Flat(flat))
        }
        Object::Array(arr) if arr.len() == 2 => Some(Vertices::Points(
            items
                .iter()
                .map(|o| point_pair(doc, o, geometry))
                .collect(),
        )),
        Object::Array(arr) if arr.len() == 8 => Some(Vertices::Quads(
            items
                .iter()
                .map(|o| quad_array(doc, o, geometry))
                .collect(),
        )),
        _ => None,
    }
}

/// Read an annotation color. An absent key or an empty array means no color;
/// anything else that is not 1, 3 or 4 numbers is an error.
fn read_color(
    doc: &Document,
    dict: &Dictionary,
    key: &[u8],
) -> Result<Option<Rgb>, BackendError> {
    let Ok(obj) = dict.get(key) else {
        return Ok(None);
    };
    let arr = resolve_ref(doc, obj)
        .as_array()
        .map_err(|e| BackendError::Parse(format!("color is not an array: {e}")))?;
    if arr.is_empty() {
        return Ok(None);
    }
    let components = arr
        .iter()
        .map(|o| object_to_f64(resolve_ref(doc, o)))
        .collect::<Result<Vec<f64>, _>>()?;
    Rgb::from_components(&components).map(Some).ok_or_else(|| {
        BackendError::Parse(format!(
            "expected 1, 3 or 4 color components, got {}",
            components.len()
        ))
    })
}

fn read_rect(doc: &Document, dict: &Dictionary, geometry: &PageGeometry) -> Option<Rect> {
    let arr = resolve_ref(doc, dict.get(b"Rect").ok()?).as_array().ok()?;
    let raw = rect_from_array(arr).ok()?;
    Some(geometry.normalize_rect(raw.x0, raw.y0, raw.x1, raw.y1))
}

/// Read a page's annotations, skipping links and form widgets.
///
/// Unreadable colors are pushed to `warnings` and the annotation is kept
/// without one.
fn extract_page_annotations(
    doc: &Document,
    page_id: ObjectId,
    geometry: &PageGeometry,
    warnings: &mut Vec<ExtractWarning>,
) -> Result<Vec<AnnotationRecord>, BackendError> {
    let page_dict = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

    let annots = match page_dict.get(b"Annots") {
        Ok(obj) => resolve_ref(doc, obj),
        Err(_) => return Ok(Vec::new()),
    };
    let annots = annots
        .as_array()
        .map_err(|e| BackendError::Parse(format!("/Annots is not an array: {e}")))?;

    let mut records = Vec::new();
    for entry in annots {
        let Ok(dict) = resolve_ref(doc, entry).as_dict() else {
            continue;
        };
        let Some(subtype) = subtype(dict) else {
            continue;
        };
        if subtype == "Link" || subtype == "Widget" {
            continue;
        }

        let vertices = dict
            .get(b"QuadPoints")
            .or_else(|_| dict.get(b"Vertices"))
            .ok()
            .and_then(|obj| read_vertices(doc, obj, geometry));

        let stroke = read_color(doc, dict, b"C").unwrap_or_else(|e| {
            warnings.push(
                ExtractWarning::new(ExtractWarningCode::MissingColor, e.to_string())
                    .element(format!("annotation /{subtype}")),
            );
            None
        });

        records.push(AnnotationRecord {
            subtype,
            stroke,
            vertices,
            rect: read_rect(doc, dict, geometry),
        });
    }
    Ok(records)
}

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8], options: &ParseOptions) -> Result<Self::Document, Self::Error> {
        let inner = Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Parse(
                "encrypted documents are not supported".to_string(),
            ));
        }

        // get_pages returns a BTreeMap keyed by 1-based page number.
        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(pages = page_ids.len(), "opened document");

        Ok(LopdfDocument {
            inner,
            page_ids,
            options: options.clone(),
        })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
        let Some(&object_id) = doc.page_ids.get(index) else {
            return Err(BackendError::Core(pdfmarkup_core::PdfError::PageOutOfRange {
                page: index + 1,
                page_count: doc.page_ids.len(),
            }));
        };
        let geometry = page_geometry(&doc.inner, object_id)?;
        let collected = collect_page(doc, object_id, geometry, index + 1).map_err(|e| {
            #[cfg(feature = "tracing")]
            tracing::warn!(page = index + 1, error = %e, "content stream unreadable");
            e.to_string()
        });
        Ok(LopdfPage {
            object_id,
            index,
            geometry,
            collected,
        })
    }

    fn text_page(_doc: &Self::Document, page: &Self::Page) -> Result<TextPage, Self::Error> {
        Ok(page.collected()?.text.clone())
    }

    fn plain_text(
        _doc: &Self::Document,
        page: &Self::Page,
        clip: Option<&Rect>,
    ) -> Result<String, Self::Error> {
        Ok(page.collected()?.text.plain_text(clip))
    }

    fn annotations(
        doc: &Self::Document,
        page: &Self::Page,
    ) -> Result<Vec<AnnotationRecord>, Self::Error> {
        let mut warnings = Vec::new();
        extract_page_annotations(&doc.inner, page.object_id, &page.geometry, &mut warnings)
    }

    fn drawings(_doc: &Self::Document, page: &Self::Page) -> Result<Vec<Drawing>, Self::Error> {
        match &page.collected()?.drawings {
            Ok(drawings) => Ok(drawings.clone()),
            Err((limit, actual)) => Err(BackendError::ResourceLimit {
                name: "max_drawing_segments",
                limit: *limit,
                actual: *actual,
            }),
        }
    }

    fn fill_log(
        _doc: &Self::Document,
        page: &Self::Page,
    ) -> Result<Vec<FillLogEntry>, Self::Error> {
        Ok(page.collected()?.fill_log.clone())
    }

    fn warnings(doc: &Self::Document, page: &Self::Page) -> Vec<ExtractWarning> {
        let mut warnings = match &page.collected {
            Ok(collected) => collected.warnings.clone(),
            Err(msg) => vec![
                ExtractWarning::new(ExtractWarningCode::ContentStreamError, msg)
                    .on_page(page.number()),
            ],
        };
        let mut annotation_warnings = Vec::new();
        // A missing or malformed /Annots is reported by `annotations` itself.
        let _ = extract_page_annotations(
            &doc.inner,
            page.object_id,
            &page.geometry,
            &mut annotation_warnings,
        );
        warnings.extend(annotation_warnings.into_iter().map(|w| w.on_page(page.number())));
        warnings
    }
}
