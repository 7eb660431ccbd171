use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use template_geometry::{
    Axis, CoverGeometry, CoverPage, LegendColumn, Projection, Rect, RegionId, Unit,
};

use super::content::ContentOps;
use crate::logo::LogoImage;
use crate::palette;
use crate::types::*;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const GS_BARCODE: &str = "GSBarcode";
const GS_PUNCH: &str = "GSPunch";
const LOGO_NAME: &str = "Logo";

const LABEL_SIZE: f64 = 14.0;
const SPINE_LABEL_SIZE: f64 = 9.0;
const LEGEND_VALUE_SIZE: f64 = 11.0;
const LEGEND_TEXT_SIZE: f64 = 8.0;
const LEGEND_BAR_WIDTH: f64 = 4.0;
const LEGEND_BAR_HEIGHT: f64 = 24.0;
const LEGEND_TEXT_GAP: f64 = 10.0;

/// Annotated cover PDF, one page per cover page
pub struct CoverPdf;

impl TemplateRenderer<CoverGeometry> for CoverPdf {
    fn entry_name(&self) -> &'static str {
        "Cover/cover.pdf"
    }

    fn render(&self, geometry: &CoverGeometry, ctx: &RenderContext) -> Result<Vec<u8>> {
        let mut doc = build_cover_document(geometry, ctx)?;
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        log::debug!(
            "Rendered cover PDF: {} page(s), {} bytes",
            geometry.pages.len(),
            writer.len()
        );
        Ok(writer)
    }
}

/// Build the cover document without serializing it
pub fn build_cover_document(geometry: &CoverGeometry, ctx: &RenderContext) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(standard_font("Helvetica"));
    let bold_id = doc.add_object(standard_font("Helvetica-Bold"));
    let barcode_gs = doc.add_object(opacity_state(palette::BARCODE_OPACITY));
    let punch_gs = doc.add_object(opacity_state(palette::PUNCH_HOLE_OPACITY));
    let logo_id = ctx
        .logo
        .as_deref()
        .map(|logo| add_logo_xobject(&mut doc, logo));

    let mut kids = Vec::new();
    for page in &geometry.pages {
        let projection = Projection::new(Unit::Points, Axis::YUp, page.height);
        let content = page_content(geometry, page, &projection, ctx.logo.as_deref());
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let mut fonts = Dictionary::new();
        fonts.set(FONT_REGULAR, Object::Reference(regular_id));
        fonts.set(FONT_BOLD, Object::Reference(bold_id));
        let mut states = Dictionary::new();
        states.set(GS_BARCODE, Object::Reference(barcode_gs));
        states.set(GS_PUNCH, Object::Reference(punch_gs));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        resources.set("ExtGState", Object::Dictionary(states));
        if let Some(logo_id) = logo_id {
            let mut xobjects = Dictionary::new();
            xobjects.set(LOGO_NAME, Object::Reference(logo_id));
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let media = projection.rect(&page.bounds());
        let trim = projection.rect(&page.trim_box());
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("MediaBox", pdf_box(&media)),
            ("BleedBox", pdf_box(&media)),
            ("TrimBox", pdf_box(&trim)),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ])),
    );

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    let info_id = doc.add_object(Dictionary::from_iter(vec![
        (
            "Title",
            Object::string_literal(format!("{} Cover Template", geometry.binding)),
        ),
        ("Producer", Object::string_literal("template-render")),
    ]));
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    Ok(doc)
}

fn page_content(
    geometry: &CoverGeometry,
    page: &CoverPage,
    projection: &Projection,
    logo: Option<&LogoImage>,
) -> Vec<u8> {
    let mut ops = ContentOps::new();

    for region in &page.regions {
        let rect = projection.rect(&region.rect);
        if rect.is_empty() {
            continue;
        }
        match (region.id, palette::region_fill(region.id)) {
            (RegionId::BarcodeZone, Some(color)) => {
                ops.save();
                ops.graphics_state(GS_BARCODE);
                ops.fill_color(color);
                ops.fill_rect(&rect);
                ops.restore();
            }
            (_, Some(color)) => {
                ops.fill_color(color);
                ops.fill_rect(&rect);
            }
            (RegionId::BackCoverTrim | RegionId::FrontCoverTrim, None) => {
                ops.stroke_color(palette::TRIM_LINE);
                ops.dashed_rect(&rect);
            }
            _ => {}
        }
    }

    if !page.punch_holes.is_empty() {
        ops.save();
        ops.graphics_state(GS_PUNCH);
        ops.fill_color(palette::PUNCH_HOLE);
        for hole in &page.punch_holes {
            ops.fill_circle(
                projection.x(hole.cx),
                projection.y(hole.cy),
                projection.length(hole.radius),
            );
        }
        ops.restore();
    }

    if let Some(logo) = logo {
        for slot in &page.logo_slots {
            let placed = projection.rect(&slot.fit_aspect(logo.aspect()));
            ops.image(LOGO_NAME, &placed);
        }
    }

    ops.fill_color(palette::TEXT);
    for label in &page.labels {
        let size = if label.rotation == 0.0 {
            LABEL_SIZE
        } else {
            SPINE_LABEL_SIZE
        };
        ops.centered_text(
            FONT_BOLD,
            size,
            projection.x(label.center.x),
            projection.y(label.center.y),
            label.rotation,
            &label.text,
        );
    }

    for column in &page.legend {
        legend_ops(&mut ops, column, projection);
    }

    log::trace!(
        "Cover page {:?} of {}: {} regions",
        page.side,
        geometry.binding,
        page.regions.len()
    );
    ops.into_bytes()
}

fn legend_ops(ops: &mut ContentOps, column: &LegendColumn, projection: &Projection) {
    for (index, line) in column.lines.iter().enumerate() {
        let origin = column.line_origin(index);
        let x = projection.x(origin.x);
        let y = projection.y(origin.y);

        ops.fill_color(palette::indicator_color(line.indicator));
        ops.fill_rect(&Rect::new(
            x,
            y - LEGEND_BAR_HEIGHT / 2.0,
            LEGEND_BAR_WIDTH,
            LEGEND_BAR_HEIGHT,
        ));

        ops.fill_color(palette::TEXT);
        let text_x = x + LEGEND_TEXT_GAP;
        ops.text(FONT_BOLD, LEGEND_VALUE_SIZE, text_x, y + 2.0, &line.value);
        ops.text(
            FONT_REGULAR,
            LEGEND_TEXT_SIZE,
            text_x,
            y - LEGEND_TEXT_SIZE - 2.0,
            &line.description,
        );
    }
}

fn standard_font(base: &str) -> Dictionary {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(base.as_bytes().to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    font
}

fn opacity_state(alpha: f64) -> Dictionary {
    let mut gs = Dictionary::new();
    gs.set("Type", Object::Name(b"ExtGState".to_vec()));
    gs.set("ca", Object::Real(alpha as f32));
    gs.set("CA", Object::Real(alpha as f32));
    gs
}

fn add_logo_xobject(doc: &mut Document, logo: &LogoImage) -> ObjectId {
    let (rgb, alpha) = logo.split_rgb_alpha();
    let mut dict = image_dict(logo, b"DeviceRGB");
    if !logo.is_opaque() {
        let mask_id = doc.add_object(Stream::new(image_dict(logo, b"DeviceGray"), alpha));
        dict.set("SMask", Object::Reference(mask_id));
    }
    doc.add_object(Stream::new(dict, rgb))
}

fn image_dict(logo: &LogoImage, color_space: &[u8]) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(logo.width()))),
        ("Height", Object::Integer(i64::from(logo.height()))),
        ("ColorSpace", Object::Name(color_space.to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
    ])
}

/// `[llx lly urx ury]` for a rectangle already in points
fn pdf_box(r: &Rect) -> Object {
    Object::Array(vec![
        Object::Real(r.x as f32),
        Object::Real(r.y as f32),
        Object::Real(r.right() as f32),
        Object::Real(r.top() as f32),
    ])
}
