//! Layered PSD cover template
//!
//! Every region becomes a named pixel layer so designers can hide, lock or
//! paint over each part. Coil covers get one group per page on a shared
//! canvas, with the back cover group hidden.

mod layers;
mod packbits;
mod text;
mod writer;

use image::RgbaImage;
use template_geometry::constants::pt_to_in;
use template_geometry::{
    Axis, CoverGeometry, CoverPage, CoverSide, LegendLine, Projection, Rect, RegionId, Unit,
};

use self::layers::{Fill, Guide, Layer, Node, PixelRect, PsdDocument};
use self::text::Weight;
use crate::palette;
use crate::types::*;

const BLEED_LAYER: &str = "Bleed/Wrap Area";
const ARTWORK_GROUP: &str = "Your Artwork Here";

/// Legend swatch size in inches
const SWATCH_WIDTH: f64 = 0.06;
const SWATCH_HEIGHT: f64 = 0.33;

/// Text sizes in points, matching the cover PDF
const LABEL_SIZE: f64 = 14.0;
const SPINE_LABEL_SIZE: f64 = 9.0;
const LEGEND_VALUE_SIZE: f64 = 11.0;
const LEGEND_TEXT_SIZE: f64 = 8.0;

/// Gap between a legend swatch and its text
const LEGEND_TEXT_GAP: f64 = 0.14;

/// Layered raster cover template
pub struct CoverPsd;

impl TemplateRenderer<CoverGeometry> for CoverPsd {
    fn entry_name(&self) -> &'static str {
        "Cover/cover.psd"
    }

    fn render(&self, geometry: &CoverGeometry, ctx: &RenderContext) -> Result<Vec<u8>> {
        let document = build_document(geometry, ctx)?;
        let bytes = writer::write_document(&document)?;
        log::debug!(
            "Rendered cover PSD: {}x{} px at {} dpi, {} bytes",
            document.width,
            document.height,
            document.dpi,
            bytes.len()
        );
        Ok(bytes)
    }
}

/// Pixel size shared by every page
struct Canvas {
    width: u32,
    height: u32,
}

impl Canvas {
    fn bounds(&self, projection: &Projection, r: &Rect) -> PixelRect {
        PixelRect::project(projection, r, self.width, self.height)
    }

    /// Bitmap layer with its top-left pixel at `(left, top)`, cropped to the canvas
    fn bitmap_layer(&self, name: &str, image: RgbaImage, left: i64, top: i64) -> Option<Layer> {
        let clip = |v: i64, max: u32| v.clamp(0, i64::from(max));
        let (x0, y0) = (clip(left, self.width), clip(top, self.height));
        let x1 = clip(left + i64::from(image.width()), self.width);
        let y1 = clip(top + i64::from(image.height()), self.height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        let cropped = image::imageops::crop_imm(
            &image,
            (x0 - left) as u32,
            (y0 - top) as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        )
        .to_image();
        let bounds = PixelRect {
            top: y0 as i32,
            left: x0 as i32,
            bottom: y1 as i32,
            right: x1 as i32,
        };
        Some(Layer::new(name, bounds, Fill::Image(cropped)))
    }
}

fn build_document(geometry: &CoverGeometry, ctx: &RenderContext) -> Result<PsdDocument> {
    let first = geometry
        .pages
        .first()
        .ok_or_else(|| RenderError::Layer("Cover geometry has no pages".to_string()))?;
    let unit = Unit::Pixels { dpi: ctx.dpi };
    let canvas = Canvas {
        width: unit.from_inches(first.width).round() as u32,
        height: unit.from_inches(first.height).round() as u32,
    };

    let mut guides = Vec::new();
    let mut nodes = Vec::new();
    for page in &geometry.pages {
        let projection = Projection::new(unit, Axis::YDown, page.height);
        guides.extend(page_guides(page, &projection));
        let page_nodes = page_nodes(page, &projection, &canvas, ctx);
        match page.side {
            CoverSide::Spread => nodes.extend(page_nodes),
            side => nodes.push(Node::Group {
                name: side.title().to_string(),
                hidden: side == CoverSide::Back,
                children: page_nodes,
            }),
        }
    }
    guides.sort();
    guides.dedup();

    // Page groups are listed front first; the front belongs on top
    if geometry.pages.len() > 1 {
        nodes.reverse();
    }

    Ok(PsdDocument {
        width: canvas.width,
        height: canvas.height,
        dpi: ctx.dpi,
        guides,
        nodes,
    })
}

fn page_guides(page: &CoverPage, projection: &Projection) -> Vec<Guide> {
    let mut rects = vec![page.trim_box()];
    rects.extend(page.safe_areas().into_iter().map(|(_, safe, _)| safe));
    rects.extend(page.region(RegionId::Spine));

    let mut guides = Vec::new();
    for r in rects {
        guides.push(Guide::vertical(projection.x(r.x)));
        guides.push(Guide::vertical(projection.x(r.right())));
        guides.push(Guide::horizontal(projection.y(r.top())));
        guides.push(Guide::horizontal(projection.y(r.y)));
    }
    guides
}

fn page_nodes(
    page: &CoverPage,
    projection: &Projection,
    canvas: &Canvas,
    ctx: &RenderContext,
) -> Vec<Node> {
    let mut base: Vec<Node> = Vec::new();
    let mut white: Vec<Node> = Vec::new();
    let mut marks: Vec<Node> = Vec::new();

    if page.regions.is_empty() {
        let full = canvas.bounds(projection, &page.bounds());
        base.push(Layer::solid("Background", full, palette::SAFE_AREA).into());
    }

    for region in &page.regions {
        let bounds = canvas.bounds(projection, &region.rect);
        match region.id {
            RegionId::BleedArea => {
                base.push(Layer::solid(BLEED_LAYER, bounds, palette::BLEED).locked().into())
            }
            RegionId::BackgroundTrim => {
                base.push(Layer::solid("Background Color", bounds, palette::BACKGROUND).into())
            }
            RegionId::Spine => {
                base.push(Layer::solid("Spine Color", bounds, palette::SPINE).into())
            }
            RegionId::LeftSafeArea => white.push(
                Layer::solid("Back Cover Safe Area", bounds, palette::SAFE_AREA).into(),
            ),
            RegionId::RightSafeArea => white.push(
                Layer::solid("Front Cover Safe Area", bounds, palette::SAFE_AREA).into(),
            ),
            RegionId::BarcodeZone => marks.push(
                Layer::solid("Barcode Area", bounds, palette::BARCODE)
                    .with_opacity(palette::BARCODE_OPACITY)
                    .into(),
            ),
            RegionId::PunchHoleZone => {
                let discs = page
                    .punch_holes
                    .iter()
                    .map(|h| {
                        (
                            projection.x(h.cx),
                            projection.y(h.cy),
                            projection.length(h.radius),
                        )
                    })
                    .collect();
                let fill = Fill::Discs {
                    color: palette::PUNCH_HOLE.to_bytes(),
                    discs,
                };
                marks.push(
                    Layer::new("Punch Holes", bounds, fill)
                        .with_opacity(palette::PUNCH_HOLE_OPACITY)
                        .into(),
                );
            }
            // Trim lines are carried by the guides
            RegionId::BackCoverTrim | RegionId::FrontCoverTrim => {}
        }
    }

    let mut artwork: Vec<Node> = Vec::new();
    if !white.is_empty() {
        artwork.push(Node::group("White Page Area", white));
    }
    artwork.extend(marks);

    let mut information: Vec<Node> = Vec::new();
    for column in &page.legend {
        for (index, line) in column.lines.iter().enumerate() {
            let origin = column.line_origin(index);
            let swatch = Rect::new(
                origin.x,
                origin.y - SWATCH_HEIGHT / 2.0,
                SWATCH_WIDTH,
                SWATCH_HEIGHT,
            );
            information.push(
                Layer::solid(
                    format!("{} Swatch", line.description),
                    canvas.bounds(projection, &swatch),
                    palette::indicator_color(line.indicator),
                )
                .into(),
            );

            let Some(block) = legend_text(line, projection) else {
                continue;
            };
            let left = projection.x(origin.x + SWATCH_WIDTH + LEGEND_TEXT_GAP).round() as i64;
            let top = (projection.y(origin.y) - f64::from(block.height()) / 2.0).round() as i64;
            information.extend(
                canvas
                    .bitmap_layer(&line.text(), block, left, top)
                    .map(Node::from),
            );
        }
    }
    if !information.is_empty() {
        artwork.push(Node::group("Information", information));
    }

    let mut logo_and_text: Vec<Node> = Vec::new();
    if let Some(logo) = ctx.logo.as_deref() {
        for slot in &page.logo_slots {
            let bounds = canvas.bounds(projection, &slot.fit_aspect(logo.aspect()));
            if bounds.is_empty() {
                continue;
            }
            let image = logo.resized(bounds.width(), bounds.height());
            logo_and_text.push(Layer::new("Logo", bounds, Fill::Image(image)).into());
        }
    }
    for label in &page.labels {
        let size = if label.rotation == 0.0 {
            LABEL_SIZE
        } else {
            SPINE_LABEL_SIZE
        };
        let height = projection.length(pt_to_in(size));
        let color = palette::TEXT.to_bytes();
        let Some(line) = text::render_line(&label.text, Weight::Bold, height, color) else {
            continue;
        };
        let image = text::rotate(line, label.rotation);
        let left = (projection.x(label.center.x) - f64::from(image.width()) / 2.0).round() as i64;
        let top = (projection.y(label.center.y) - f64::from(image.height()) / 2.0).round() as i64;
        logo_and_text.extend(
            canvas
                .bitmap_layer(&label.text, image, left, top)
                .map(Node::from),
        );
    }
    artwork.push(Node::group("Logo & Text", logo_and_text));

    base.push(Node::group(ARTWORK_GROUP, artwork));
    base
}

/// Bold value over its description, as one bitmap
fn legend_text(line: &LegendLine, projection: &Projection) -> Option<RgbaImage> {
    let color = palette::TEXT.to_bytes();
    let lines: Vec<RgbaImage> = [
        (line.value.as_str(), Weight::Bold, LEGEND_VALUE_SIZE),
        (line.description.as_str(), Weight::Regular, LEGEND_TEXT_SIZE),
    ]
    .into_iter()
    .filter_map(|(content, weight, size)| {
        text::render_line(content, weight, projection.length(pt_to_in(size)), color)
    })
    .collect();
    text::stack(lines, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use template_geometry::{TemplateRequest, derive_cover_geometry};

    fn find_group<'a>(nodes: &'a [Node], wanted: &str) -> Option<&'a [Node]> {
        nodes.iter().find_map(|node| match node {
            Node::Group { name, children, .. } if name == wanted => Some(children.as_slice()),
            Node::Group { children, .. } => find_group(children, wanted),
            Node::Layer(_) => None,
        })
    }

    fn layer<'a>(nodes: &'a [Node], wanted: &str) -> &'a Layer {
        nodes
            .iter()
            .find_map(|node| match node {
                Node::Layer(layer) if layer.name == wanted => Some(layer),
                _ => None,
            })
            .unwrap_or_else(|| panic!("missing layer {}", wanted))
    }

    fn inked_pixels(layer: &Layer) -> usize {
        let b = layer.bounds;
        (b.top..b.bottom)
            .flat_map(|y| (b.left..b.right).map(move |x| (x, y)))
            .filter(|&(x, y)| matches!(layer.sample(x, y), Some((_, alpha)) if alpha > 0))
            .count()
    }

    #[test]
    fn labels_and_legend_are_drawn_into_layers() {
        let request = TemplateRequest {
            book_title: Some("My Book".to_string()),
            ..Default::default()
        };
        let geometry = derive_cover_geometry(&request).unwrap();
        let ctx = RenderContext {
            dpi: 72,
            logo: None,
        };
        let document = build_document(&geometry, &ctx).unwrap();

        let logo_and_text = find_group(&document.nodes, "Logo & Text").unwrap();
        for label in ["BACK COVER", "FRONT COVER", "My Book"] {
            let label = layer(logo_and_text, label);
            assert!(inked_pixels(label) > 0, "{} has no pixels", label.name);
        }
        // Spine title runs top to bottom
        let spine = layer(logo_and_text, "My Book");
        assert!(spine.bounds.height() > spine.bounds.width());

        let information = find_group(&document.nodes, "Information").unwrap();
        let page = &geometry.pages[0];
        for line in page.legend.iter().flat_map(|column| &column.lines) {
            assert!(inked_pixels(layer(information, &line.text())) > 0);
        }
    }

    #[test]
    fn bitmap_layers_are_cropped_to_the_canvas() {
        let canvas = Canvas {
            width: 10,
            height: 10,
        };
        let image = RgbaImage::from_pixel(6, 4, image::Rgba([0, 0, 0, 255]));
        let layer = canvas.bitmap_layer("edge", image.clone(), 7, -2).unwrap();
        assert_eq!((layer.bounds.left, layer.bounds.top), (7, 0));
        assert_eq!((layer.bounds.width(), layer.bounds.height()), (3, 2));
        assert_eq!(inked_pixels(&layer), 6);

        assert!(canvas.bitmap_layer("outside", image, 20, 0).is_none());
    }
}
