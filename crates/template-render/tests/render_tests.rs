use std::sync::Arc;

use lopdf::{Document, Object};
use template_geometry::*;
use template_render::container::read_entries;
use template_render::pdf::build_cover_document;
use template_render::*;

fn perfect_bind() -> CoverGeometry {
    derive_cover_geometry(&TemplateRequest::default()).unwrap()
}

fn coil() -> CoverGeometry {
    let request = TemplateRequest {
        binding_name: "Coil / Wire-O".to_string(),
        is_hardcover_coil_wire: Some(false),
        ..Default::default()
    };
    derive_cover_geometry(&request).unwrap()
}

fn interior() -> InteriorGeometry {
    derive_interior_geometry(&TemplateRequest::default()).unwrap()
}

/// Low resolution keeps raster tests quick
fn small_raster() -> RenderContext {
    RenderContext {
        dpi: 40,
        logo: None,
    }
}

fn page_box(doc: &Document, page: lopdf::ObjectId, key: &[u8]) -> Vec<f32> {
    doc.get_dictionary(page)
        .unwrap()
        .get(key)
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_float().unwrap())
        .collect()
}

fn assert_box(actual: &[f32], expected: [f32; 4]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 0.01, "{:?} vs {:?}", actual, expected);
    }
}

fn entry<'a>(entries: &'a [(String, Vec<u8>)], name: &str) -> &'a str {
    let (_, data) = entries
        .iter()
        .find(|(n, _)| n == name)
        .unwrap_or_else(|| panic!("missing entry {}", name));
    std::str::from_utf8(data).unwrap()
}

fn be_u16(bytes: &[u8], at: usize) -> usize {
    u16::from_be_bytes([bytes[at], bytes[at + 1]]) as usize
}

fn be_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

/// Text shown by a page's content stream
fn page_text(doc: &Document, page: lopdf::ObjectId) -> String {
    fn collect(object: &Object, out: &mut String) {
        match object {
            Object::String(bytes, _) => out.push_str(&String::from_utf8_lossy(bytes)),
            Object::Array(items) => items.iter().for_each(|item| collect(item, out)),
            _ => {}
        }
    }

    let content = lopdf::content::Content::decode(&doc.get_page_content(page).unwrap()).unwrap();
    let mut text = String::new();
    for op in content.operations {
        if op.operator == "Tj" || op.operator == "TJ" {
            op.operands.iter().for_each(|o| collect(o, &mut text));
            text.push('\n');
        }
    }
    text
}

/// Number of XObjects painted on a page
fn painted_xobjects(doc: &Document, page: lopdf::ObjectId) -> usize {
    let content = lopdf::content::Content::decode(&doc.get_page_content(page).unwrap()).unwrap();
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Do")
        .count()
}

fn test_logo() -> Arc<LogoImage> {
    let mut source = image::RgbaImage::new(8, 4);
    for pixel in source.pixels_mut() {
        *pixel = image::Rgba([10, 20, 30, 200]);
    }
    let mut png = std::io::Cursor::new(Vec::new());
    source.write_to(&mut png, image::ImageFormat::Png).unwrap();
    Arc::new(LogoImage::decode(png.get_ref()).unwrap())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[test]
fn test_cover_pdf_boxes() {
    let bytes = CoverPdf.render(&perfect_bind(), &RenderContext::default()).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);

    let page = *pages.values().next().unwrap();
    // 12.75 x 9.25 in spread, trimmed 0.125 in on every side
    assert_box(&page_box(&doc, page, b"MediaBox"), [0.0, 0.0, 918.0, 666.0]);
    assert_box(&page_box(&doc, page, b"BleedBox"), [0.0, 0.0, 918.0, 666.0]);
    assert_box(&page_box(&doc, page, b"TrimBox"), [9.0, 9.0, 909.0, 657.0]);
}

#[test]
fn test_cover_pdf_title_and_coil_pages() {
    let doc = build_cover_document(&perfect_bind(), &RenderContext::default()).unwrap();
    let info = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let title = doc.get_dictionary(info).unwrap().get(b"Title").unwrap();
    match title {
        Object::String(bytes, _) => {
            assert_eq!(bytes.as_slice(), b"Perfect Bind / Softcover Cover Template")
        }
        other => panic!("unexpected title {:?}", other),
    }

    let bytes = CoverPdf.render(&coil(), &RenderContext::default()).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn test_cover_pdf_embeds_logo() {
    let ctx = RenderContext {
        logo: Some(test_logo()),
        ..Default::default()
    };

    let doc = build_cover_document(&perfect_bind(), &ctx).unwrap();
    let images = doc
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| s.dict.get(b"Subtype").and_then(|v| v.as_name()).ok() == Some(&b"Image"[..]))
        .count();
    // Color image plus its soft mask
    assert_eq!(images, 2);
}

#[test]
fn test_interior_pdf_pages() {
    let geometry = interior();
    let bytes = InteriorPdf.render(&geometry, &RenderContext::default()).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 3);

    // 6 x 9 trim plus 0.125 in bleed on every side
    for page in pages.values() {
        let media = page_box(&doc, *page, b"MediaBox");
        assert!((media[2] - media[0] - 450.0).abs() < 0.01);
        assert!((media[3] - media[1] - 666.0).abs() < 0.01);
    }
}

#[test]
fn test_interior_pdf_page_content() {
    let ctx = RenderContext {
        logo: Some(test_logo()),
        ..Default::default()
    };
    let bytes = InteriorPdf.render(&interior(), &ctx).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let pages: Vec<_> = doc.get_pages().into_values().collect();
    let texts: Vec<String> = pages.iter().map(|p| page_text(&doc, *p)).collect();

    // Legend on the first and last page, requirements in between
    for index in [0, 2] {
        assert!(texts[index].contains("Bleed Area - Extend your color"));
        assert!(texts[index].contains("Gutter (inside) - By page count (200 pp)"));
        assert!(texts[index].contains("0.750 in"));
        assert!(!texts[index].contains("Interior File Requirements"));
    }
    assert!(texts[1].contains("Interior File Requirements"));
    assert!(texts[1].contains("Minimum 0.5 in Safety Margin"));
    assert!(texts[1].contains("Security: Do NOT use any security"));
    assert!(!texts[1].contains("Bleed Area"));

    for (index, text) in texts.iter().enumerate() {
        assert!(text.contains(&format!("Page {} of 3", index + 1)));
        assert!(text.contains("Template for 200-page interior."));
        assert_eq!(painted_xobjects(&doc, pages[index]), 1, "page {}", index + 1);
    }
}

#[test]
fn test_interior_pdf_single_page_book_has_no_notice() {
    let request = TemplateRequest {
        page_count: 1,
        ..Default::default()
    };
    let geometry = derive_interior_geometry(&request).unwrap();
    let bytes = InteriorPdf.render(&geometry, &RenderContext::default()).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    for page in doc.get_pages().values() {
        let text = page_text(&doc, *page);
        assert!(text.contains("Page "));
        assert!(!text.contains("Template for"));
        assert_eq!(painted_xobjects(&doc, *page), 0);
    }
}

#[test]
fn test_psd_sections() {
    let bytes = CoverPsd.render(&perfect_bind(), &small_raster()).unwrap();
    assert_eq!(&bytes[0..4], b"8BPS");
    assert_eq!(be_u16(&bytes, 4), 1);
    assert_eq!(be_u16(&bytes, 12), 3);
    let height = be_u32(&bytes, 14);
    let width = be_u32(&bytes, 18);
    assert_eq!((width, height), (510, 370));
    assert_eq!(be_u16(&bytes, 22), 8);
    assert_eq!(be_u16(&bytes, 24), 3);

    let mut at = 26;
    at += 4 + be_u32(&bytes, at);

    let resources_len = be_u32(&bytes, at);
    let resources = &bytes[at + 4..at + 4 + resources_len];
    at += 4 + resources_len;
    let resolution = find(resources, b"8BIM\x03\xED").unwrap();
    assert_eq!(be_u32(resources, resolution + 12), 40 << 16);
    let guides = find(resources, b"8BIM\x04\x08").unwrap();
    // Trim, both safe areas and both folds
    assert!(be_u32(resources, guides + 24) >= 8);

    let layers_len = be_u32(&bytes, at);
    let layers = &bytes[at + 4..at + 4 + layers_len];
    at += 4 + layers_len;
    for name in [
        "Bleed/Wrap Area",
        "Background Color",
        "Spine Color",
        "Your Artwork Here",
        "White Page Area",
        "Barcode Area",
        "Logo & Text",
        "</Layer group>",
    ] {
        assert!(find(layers, name.as_bytes()).is_some(), "missing layer {}", name);
    }
    assert!(find(layers, b"lspf").is_some());

    // RLE composite: row counts then exactly that much data
    assert_eq!(be_u16(&bytes, at), 1);
    let rows = 3 * height;
    let packed: usize = (0..rows).map(|i| be_u16(&bytes, at + 2 + 2 * i)).sum();
    assert_eq!(at + 2 + 2 * rows + packed, bytes.len());
}

#[test]
fn test_psd_coil_groups() {
    let bytes = CoverPsd.render(&coil(), &small_raster()).unwrap();
    assert!(find(&bytes, b"Front Cover").is_some());
    assert!(find(&bytes, b"Back Cover").is_some());
    assert!(find(&bytes, b"Punch Holes").is_some());
}

#[test]
fn test_cover_idml_package() {
    let bytes = CoverIdml.render(&perfect_bind(), &RenderContext::default()).unwrap();
    let entries = read_entries(&bytes).unwrap();
    assert_eq!(entries[0].0, "mimetype");
    assert_eq!(entry(&entries, "mimetype"), idml::MIMETYPE);

    let designmap = entry(&entries, "designmap.xml");
    assert!(designmap.contains("<?aid "));
    assert!(designmap.contains("idPkg:Spread"));

    let manifest = entry(&entries, "META-INF/manifest.xml");
    for part in ["designmap.xml", "MasterSpreads/", "Spreads/", "Stories/", "Resources/Graphic.xml"] {
        assert!(manifest.contains(part), "manifest lacks {}", part);
    }

    let spread = entries
        .iter()
        .find(|(name, _)| name.starts_with("Spreads/"))
        .map(|(_, data)| std::str::from_utf8(data).unwrap())
        .unwrap();
    assert!(spread.contains("Name=\"Bleed_Rectangle\""));
    assert!(spread.contains("Name=\"Spine_Rectangle\""));
    assert!(spread.contains("FillColor=\"Color/BleedColor\""));

    let preferences = entry(&entries, "Resources/Preferences.xml");
    assert!(preferences.contains("PageWidth=\"918\""));
    assert!(preferences.contains("PageHeight=\"666\""));
}

#[test]
fn test_interior_idml_facing_pages() {
    let bytes = InteriorIdml.render(&interior(), &RenderContext::default()).unwrap();
    let entries = read_entries(&bytes).unwrap();
    assert_eq!(entries[0].0, "mimetype");

    let spreads = entries
        .iter()
        .filter(|(name, _)| name.starts_with("Spreads/"))
        .count();
    assert_eq!(spreads, 2);

    let preferences = entry(&entries, "Resources/Preferences.xml");
    assert!(preferences.contains("FacingPages=\"true\""));
    assert!(preferences.contains("PageWidth=\"432\""));
    // 200 pages uses the 0.75 in gutter as the inside margin
    assert!(preferences.contains("Left=\"54\""));
}

#[test]
fn test_docx_page_setup() {
    let bytes = InteriorDocx.render(&interior(), &RenderContext::default()).unwrap();
    let entries = read_entries(&bytes).unwrap();
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert!(names.contains(&"[Content_Types].xml"));
    assert!(names.contains(&"_rels/.rels"));

    let document = entry(&entries, "word/document.xml");
    assert!(document.contains("w:w=\"8640\""));
    assert!(document.contains("w:h=\"12960\""));
    assert!(document.contains("w:left=\"1080\""));
    assert!(document.contains("Perfect Bind / Softcover"));
    assert!(entry(&entries, "word/settings.xml").contains("w:mirrorMargins"));
}

#[test]
fn test_unsupported_binding_placeholders() {
    let request = TemplateRequest {
        binding_name: "Lay Flat".to_string(),
        ..Default::default()
    };
    let geometry = derive_cover_geometry(&request).unwrap();
    assert!(!geometry.is_supported());

    let pdf = CoverPdf.render(&geometry, &RenderContext::default()).unwrap();
    assert_eq!(Document::load_mem(&pdf).unwrap().get_pages().len(), 1);

    let psd = CoverPsd.render(&geometry, &small_raster()).unwrap();
    assert_eq!(&psd[0..4], b"8BPS");
    assert!(find(&psd, b"not yet supported").is_some());

    let idml = CoverIdml.render(&geometry, &RenderContext::default()).unwrap();
    assert!(read_entries(&idml).is_ok());
}

#[test]
fn test_renderer_entry_names() {
    assert_eq!(CoverPdf.entry_name(), "Cover/cover.pdf");
    assert_eq!(CoverPsd.entry_name(), "Cover/cover.psd");
    assert_eq!(CoverIdml.entry_name(), "Cover/cover.idml");
    assert_eq!(InteriorPdf.entry_name(), "Interior/interior.pdf");
    assert_eq!(InteriorIdml.entry_name(), "Interior/interior.idml");
    assert_eq!(InteriorDocx.entry_name(), "Interior/interior.docx");
}
