use printpdf::{
    BuiltinFont, Color, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions, Point, Polygon,
    PolygonRing, Pt, RawImage, RawImageData, RawImageFormat, TextItem, TextMatrix, WindingOrder,
    XObjectId, XObjectTransform,
};
use template_geometry::constants::{
    INTERIOR_TEMPLATE_PAGES, LOGO_SLOT_HEIGHT, LOGO_SLOT_WIDTH, in_to_pt,
};
use template_geometry::{
    Axis, InteriorGeometry, InteriorPage, LegendLine, PageSide, Projection, Rect, Unit,
};

use crate::logo::LogoImage;
use crate::palette::{self, Rgb};
use crate::types::*;

/// Page index carrying the file requirements instead of the legend
const REQUIREMENTS_PAGE: usize = 1;

// Legend rows, in points
const LEGEND_ROW_HEIGHT: f64 = 50.0;
const LEGEND_OFFSET_ABOVE_CENTER: f64 = 80.0;
const LEGEND_INSET: f64 = 20.0;
const LEGEND_BAR_WIDTH: f64 = 4.0;
const LEGEND_BAR_HEIGHT: f64 = 25.0;
const LEGEND_VALUE_SIZE: f32 = 13.0;
const LEGEND_DESCRIPTION_SIZE: f32 = 10.0;

const LOGO_TOP_GAP: f64 = 20.0;
const TEXT_INSET: f64 = 4.0;
const BODY_SIZE: f32 = 10.0;
const BODY_LINE_HEIGHT: f64 = 14.0;
const GUTTER_LABEL_SIZE: f32 = 8.0;

const REQUIREMENTS_TITLE: &str = "Interior File Requirements";
const REQUIREMENTS_TITLE_GAP: f64 = 54.0;

const REQUIREMENTS_INTRO: [&str; 2] = [
    "For your book, please provide a single PDF that encompasses all interior",
    "elements, including the title, copyright pages, and any desired blank pages.",
];

const REQUIREMENTS: [&str; 7] = [
    "• Margins:",
    "• Minimum 0.5 in Safety Margin",
    "• Minimum 0.5 in Gutter Margin (more to be added if pages exceeds 150 pages; refer gutter section)",
    "• Exclusions: Do NOT include trim, bleed, or margin Marks",
    "• Font Embedding: All fonts must be embedded",
    "• Flatten Transparent Layers: Ensure transparency layers and vector objects are flattened",
    "• Security: Do NOT use any security or password file protection.",
];

/// Three-page interior template PDF
pub struct InteriorPdf;

/// Logo registered with the document, with its pixel size
struct PlacedLogo {
    id: XObjectId,
    width: u32,
    height: u32,
    aspect: f64,
}

impl TemplateRenderer<InteriorGeometry> for InteriorPdf {
    fn entry_name(&self) -> &'static str {
        "Interior/interior.pdf"
    }

    fn render(&self, geometry: &InteriorGeometry, ctx: &RenderContext) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new(&format!("{} Interior Template", geometry.binding_name));
        let logo = ctx.logo.as_deref().map(|logo| add_logo(&mut doc, logo));

        let projection = Projection::new(Unit::Points, Axis::YUp, geometry.page_height);
        let media = projection.rect(&Rect::new(
            0.0,
            0.0,
            geometry.page_width,
            geometry.page_height,
        ));
        for page in geometry.template_pages() {
            let ops = page_ops(geometry, &page, &projection, logo.as_ref());
            doc.pages.push(PdfPage {
                media_box: to_pdf_rect(&media),
                trim_box: to_pdf_rect(&projection.rect(&page.trim)),
                crop_box: to_pdf_rect(&media),
                ops,
            });
        }

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            log::debug!("Interior PDF produced {} warning(s)", warnings.len());
        }
        Ok(bytes)
    }
}

fn add_logo(doc: &mut PdfDocument, logo: &LogoImage) -> PlacedLogo {
    let image = RawImage {
        pixels: RawImageData::U8(logo.image.as_raw().clone()),
        width: logo.width() as usize,
        height: logo.height() as usize,
        data_format: RawImageFormat::RGBA8,
        tag: Vec::new(),
    };
    PlacedLogo {
        id: doc.add_image(&image),
        width: logo.width().max(1),
        height: logo.height().max(1),
        aspect: logo.aspect(),
    }
}

fn page_ops(
    geometry: &InteriorGeometry,
    page: &InteriorPage,
    projection: &Projection,
    logo: Option<&PlacedLogo>,
) -> Vec<Op> {
    let mut ops = Vec::new();

    // Bleed band, blue trim, white safe area
    let full = Rect::new(0.0, 0.0, geometry.page_width, geometry.page_height);
    fill_rect(&mut ops, &projection.rect(&full), palette::BLEED);
    fill_rect(&mut ops, &projection.rect(&page.trim), palette::BACKGROUND);
    let safe = projection.rect(&page.safe);
    fill_rect(&mut ops, &safe, palette::SAFE_AREA);

    gutter_label(&mut ops, page, projection);

    if page.index != REQUIREMENTS_PAGE {
        let trim = projection.rect(&page.trim);
        legend(
            &mut ops,
            &geometry.legend(),
            safe.x + LEGEND_INSET,
            trim.center_y() + LEGEND_OFFSET_ABOVE_CENTER,
        );
    }

    // Logo slot at the top center of the safe area; content starts below it
    let (slot_width, slot_height) = (in_to_pt(LOGO_SLOT_WIDTH), in_to_pt(LOGO_SLOT_HEIGHT));
    let slot = Rect::new(
        safe.center_x() - slot_width / 2.0,
        safe.top() - LOGO_TOP_GAP - slot_height,
        slot_width,
        slot_height,
    );
    if let Some(logo) = logo {
        draw_logo(&mut ops, logo, &slot.fit_aspect(logo.aspect));
    }
    let content_y = slot.y - LOGO_TOP_GAP;
    let left = safe.x + TEXT_INSET;

    if page.index == REQUIREMENTS_PAGE {
        text(
            &mut ops,
            BuiltinFont::HelveticaBold,
            12.0,
            palette::TEXT,
            left,
            content_y,
            REQUIREMENTS_TITLE,
        );
        let mut y = content_y - REQUIREMENTS_TITLE_GAP;
        for line in REQUIREMENTS_INTRO {
            text(&mut ops, BuiltinFont::Helvetica, BODY_SIZE, palette::TEXT, left, y, line);
            y -= BODY_LINE_HEIGHT;
        }
        y -= 6.0;
        for line in REQUIREMENTS {
            text(&mut ops, BuiltinFont::Helvetica, BODY_SIZE, palette::TEXT, left, y, line);
            y -= BODY_LINE_HEIGHT;
        }
    } else {
        let y = content_y - 4.0;
        text(
            &mut ops,
            BuiltinFont::HelveticaBold,
            14.0,
            palette::TEXT,
            left,
            y,
            "Interior Page Template",
        );
        let size_line = format!(
            "{:.2}\" × {:.2}\" • {}",
            geometry.trim_width, geometry.trim_height, geometry.binding_name
        );
        text(
            &mut ops,
            BuiltinFont::Helvetica,
            BODY_SIZE,
            palette::TEXT_MUTED,
            left,
            y - 16.0,
            &size_line,
        );
        text(
            &mut ops,
            BuiltinFont::Helvetica,
            BODY_SIZE,
            palette::TEXT_MUTED,
            left,
            y - 32.0,
            "Replace with your content. Top/bottom/outside: 0.5\". Gutter by page count.",
        );
    }

    // Reference text sits on the blue trim band below the safe area
    let number = format!("Page {} of {}", page.number(), INTERIOR_TEMPLATE_PAGES);
    text(
        &mut ops,
        BuiltinFont::Helvetica,
        9.0,
        palette::TEXT_ON_BACKGROUND,
        left,
        safe.y - 14.0,
        &number,
    );
    if geometry.page_count > 1 {
        let notice = format!(
            "Template for {}-page interior. Add more pages in your layout software.",
            geometry.page_count
        );
        text(
            &mut ops,
            BuiltinFont::Helvetica,
            8.0,
            palette::TEXT_ON_BACKGROUND,
            left,
            safe.y - 28.0,
            &notice,
        );
    }

    ops
}

/// Legend rows: a color bar, the value in bold and its description below
fn legend(ops: &mut Vec<Op>, lines: &[LegendLine], x: f64, top: f64) {
    let mut y = top;
    for line in lines {
        let bar = Rect::new(x, y, LEGEND_BAR_WIDTH, LEGEND_BAR_HEIGHT);
        fill_rect(ops, &bar, palette::indicator_color(line.indicator));
        text(
            ops,
            BuiltinFont::HelveticaBold,
            LEGEND_VALUE_SIZE,
            palette::TEXT,
            x + 12.0,
            y + 13.0,
            &line.value,
        );
        text(
            ops,
            BuiltinFont::Helvetica,
            LEGEND_DESCRIPTION_SIZE,
            palette::TEXT_MUTED,
            x + 12.0,
            y,
            &line.description,
        );
        y -= LEGEND_ROW_HEIGHT;
    }
}

fn draw_logo(ops: &mut Vec<Op>, logo: &PlacedLogo, at: &Rect) {
    ops.push(Op::UseXobject {
        id: logo.id.clone(),
        transform: XObjectTransform {
            translate_x: Some(Pt(at.x as f32)),
            translate_y: Some(Pt(at.y as f32)),
            rotate: None,
            scale_x: Some((at.width / f64::from(logo.width)) as f32),
            scale_y: Some((at.height / f64::from(logo.height)) as f32),
            // One pixel per point before scaling
            dpi: Some(72.0),
        },
    });
}

/// "Gutter / Binding Side" along the gutter strip, reading toward the spine
fn gutter_label(ops: &mut Vec<Op>, page: &InteriorPage, projection: &Projection) {
    let label = "Gutter / Binding Side";
    let strip = projection.rect(&page.gutter_label);
    let x = strip.center_x() - f64::from(GUTTER_LABEL_SIZE);
    let y = projection.rect(&page.trim).center_y();
    let degrees = match page.side {
        PageSide::Recto => 90.0,
        PageSide::Verso => -90.0,
    };

    ops.push(Op::SetFillColor {
        col: color(palette::TEXT_ON_BACKGROUND),
    });
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextMatrix {
        matrix: TextMatrix::TranslateRotate(Pt(x as f32), Pt(y as f32), degrees),
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        font: BuiltinFont::Helvetica,
        size: Pt(GUTTER_LABEL_SIZE),
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(label.to_string())],
        font: BuiltinFont::Helvetica,
    });
    ops.push(Op::EndTextSection);
}

fn text(
    ops: &mut Vec<Op>,
    font: BuiltinFont,
    size: f32,
    fill: Rgb,
    x: f64,
    y: f64,
    content: &str,
) {
    ops.push(Op::SetFillColor { col: color(fill) });
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(x as f32),
            y: Pt(y as f32),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        font,
        size: Pt(size),
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(content.to_string())],
        font,
    });
    ops.push(Op::EndTextSection);
}

fn fill_rect(ops: &mut Vec<Op>, r: &Rect, fill: Rgb) {
    if r.is_empty() {
        return;
    }
    let points = [
        (r.x, r.y),
        (r.right(), r.y),
        (r.right(), r.top()),
        (r.x, r.top()),
    ]
    .into_iter()
    .map(|(x, y)| printpdf::LinePoint {
        p: Point {
            x: Pt(x as f32),
            y: Pt(y as f32),
        },
        bezier: false,
    })
    .collect();

    ops.push(Op::SetFillColor { col: color(fill) });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing { points }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });
}

fn color(c: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb {
        r: c.r as f32,
        g: c.g as f32,
        b: c.b as f32,
        icc_profile: None,
    })
}

fn to_pdf_rect(r: &Rect) -> printpdf::Rect {
    printpdf::Rect {
        x: Pt(r.x as f32),
        y: Pt(r.y as f32),
        width: Pt(r.width as f32),
        height: Pt(r.height as f32),
    }
}
