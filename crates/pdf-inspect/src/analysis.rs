//! Page geometry and metadata read back from a loaded PDF

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::types::*;

const POINTS_PER_INCH: f64 = 72.0;

/// Parent links followed when resolving inherited page attributes
const MAX_INHERIT_DEPTH: usize = 32;

/// Width and height of one page, in inches
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PageDimensions {
    pub width_inches: f64,
    pub height_inches: f64,
}

/// Dimensions of a page box, in inches
pub type BoxInches = PageDimensions;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FirstPageBoxes {
    pub bleed_box: BoxInches,
    pub trim_box: BoxInches,
}

/// Summary of a PDF's pages
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PdfAnalysis {
    pub page_count: usize,
    pub page_dimensions: Vec<PageDimensions>,
    pub first_page_width_inches: f64,
    pub first_page_height_inches: f64,
    /// Every page has the same rounded size
    pub consistent_size: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub first_page_boxes: Option<FirstPageBoxes>,
}

/// Analyze an in-memory PDF.
///
/// Page sizes come from each page's MediaBox. The bleed and trim boxes of the
/// first page fall back to its CropBox, then its MediaBox.
pub fn analyze_pdf(bytes: &[u8]) -> Result<PdfAnalysis> {
    let doc = Document::load_mem(bytes)?;
    analyze_document(&doc)
}

pub(crate) fn analyze_document(doc: &Document) -> Result<PdfAnalysis> {
    let pages = doc.get_pages();

    let mut page_dimensions = Vec::with_capacity(pages.len());
    let mut first_page_boxes = None;
    for (index, &page_id) in pages.values().enumerate() {
        let media = page_box(doc, page_id, b"MediaBox")?.unwrap_or(LETTER);
        page_dimensions.push(to_inches(media));

        if index == 0 {
            let crop = page_box(doc, page_id, b"CropBox")?.unwrap_or(media);
            let bleed = page_box(doc, page_id, b"BleedBox")?.unwrap_or(crop);
            let trim = page_box(doc, page_id, b"TrimBox")?.unwrap_or(crop);
            first_page_boxes = Some(FirstPageBoxes {
                bleed_box: to_inches(bleed),
                trim_box: to_inches(trim),
            });
        }
    }

    let first = page_dimensions.first().copied();
    let consistent_size = page_dimensions
        .iter()
        .all(|d| Some(*d) == first);

    log::debug!(
        "Analyzed PDF: {} page(s), consistent size: {}",
        page_dimensions.len(),
        consistent_size
    );

    Ok(PdfAnalysis {
        page_count: page_dimensions.len(),
        first_page_width_inches: first.map_or(0.0, |d| d.width_inches),
        first_page_height_inches: first.map_or(0.0, |d| d.height_inches),
        page_dimensions,
        consistent_size,
        title: document_title(doc),
        first_page_boxes,
    })
}

/// US Letter, used when a page carries no MediaBox anywhere in its tree
const LETTER: (f64, f64) = (612.0, 792.0);

/// Points rounded to thousandths of an inch
pub fn round_inches(points: f64) -> f64 {
    (points / POINTS_PER_INCH * 1000.0).round() / 1000.0
}

fn to_inches((width, height): (f64, f64)) -> PageDimensions {
    PageDimensions {
        width_inches: round_inches(width),
        height_inches: round_inches(height),
    }
}

/// Width and height of a page box, looking up the page tree for inherited values
fn page_box(doc: &Document, page_id: ObjectId, key: &[u8]) -> Result<Option<(f64, f64)>> {
    let mut dict = doc.get_dictionary(page_id)?;
    for _ in 0..MAX_INHERIT_DEPTH {
        if let Ok(value) = dict.get(key) {
            return box_size(doc, value);
        }
        // Only the page-tree attributes are inherited
        if key != b"MediaBox" && key != b"CropBox" {
            return Ok(None);
        }
        match parent(doc, dict) {
            Some(next) => dict = next,
            None => return Ok(None),
        }
    }
    Ok(None)
}

fn parent<'a>(doc: &'a Document, dict: &Dictionary) -> Option<&'a Dictionary> {
    let id = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
    doc.get_dictionary(id).ok()
}

fn box_size(doc: &Document, value: &Object) -> Result<Option<(f64, f64)>> {
    let (_, value) = doc.dereference(value)?;
    let Ok(items) = value.as_array() else {
        return Ok(None);
    };
    let mut coords = Vec::with_capacity(4);
    for item in items {
        let (_, item) = doc.dereference(item)?;
        match item.as_float() {
            Ok(v) => coords.push(f64::from(v)),
            Err(_) => return Ok(None),
        }
    }
    match coords.as_slice() {
        [llx, lly, urx, ury] => Ok(Some(((urx - llx).abs(), (ury - lly).abs()))),
        _ => Ok(None),
    }
}

/// Title from the document information dictionary, trimmed; `None` when blank
fn document_title(doc: &Document) -> Option<String> {
    let info = doc.trailer.get(b"Info").ok()?;
    let (_, info) = doc.dereference(info).ok()?;
    let title = info.as_dict().ok()?.get(b"Title").ok()?;
    let (_, title) = doc.dereference(title).ok()?;
    let text = decode_text_string(title.as_str().ok()?);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// PDF text strings are UTF-16BE with a byte order mark, or PDFDocEncoding
fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        // PDFDocEncoding matches Latin-1 for the printable range
        _ => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
