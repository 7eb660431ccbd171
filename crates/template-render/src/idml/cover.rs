use template_geometry::{
    Axis, CoverGeometry, CoverPage, LegendColumn, Projection, Rect, RegionId, Unit,
};

use super::package::{DocumentSetup, FrameStyle, Margins, NO_SWATCH, Package, Paragraph, SpreadXml};
use crate::palette;
use crate::pdf::approx_text_width;
use crate::types::*;

const LABEL_SIZE: f64 = 14.0;
const SPINE_LABEL_SIZE: f64 = 9.0;
const VALUE_SIZE: f64 = 11.0;
const DESCRIPTION_SIZE: f64 = 8.0;
/// Legend swatch bar, points
const BAR_WIDTH: f64 = 4.0;
const BAR_HEIGHT: f64 = 24.0;
const BAR_GAP: f64 = 10.0;

/// Cover template for desktop publishing, one page per cover page
pub struct CoverIdml;

impl TemplateRenderer<CoverGeometry> for CoverIdml {
    fn entry_name(&self) -> &'static str {
        "Cover/cover.idml"
    }

    fn render(&self, geometry: &CoverGeometry, ctx: &RenderContext) -> Result<Vec<u8>> {
        let first = geometry
            .pages
            .first()
            .ok_or_else(|| RenderError::Xml("Cover geometry has no pages".to_string()))?;
        let points = |inches: f64| Unit::Points.from_inches(inches);

        let mut package = Package::new(DocumentSetup {
            name: format!("{} Cover Template", geometry.binding),
            page_width: points(first.width),
            page_height: points(first.height),
            pages: geometry.pages.len(),
            facing_pages: false,
            bleed: 0.0,
            margins: Margins::default(),
        });

        for (index, page) in geometry.pages.iter().enumerate() {
            let mut spread = package.open_spread(1, 0)?;
            let page_id = package.next_id();
            spread.page(&page_id, &(index + 1).to_string(), 0.0, package.setup())?;
            let projection = Projection::new(Unit::Points, Axis::YDown, page.height);
            page_items(&mut package, &mut spread, page, &projection, ctx)?;
            package.close_spread(spread)?;
        }

        let bytes = package.finish()?;
        log::debug!("Rendered cover IDML: {} bytes", bytes.len());
        Ok(bytes)
    }
}

fn frame_name(id: RegionId) -> &'static str {
    match id {
        RegionId::BleedArea => "Bleed_Rectangle",
        RegionId::BackgroundTrim => "Background_Rectangle",
        RegionId::Spine => "Spine_Rectangle",
        RegionId::BackCoverTrim => "BackTrim_Rectangle",
        RegionId::FrontCoverTrim => "FrontTrim_Rectangle",
        RegionId::LeftSafeArea => "LeftSafe_Rectangle",
        RegionId::RightSafeArea => "RightSafe_Rectangle",
        RegionId::BarcodeZone => "Barcode_Rectangle",
        RegionId::PunchHoleZone => "PunchHole_Rectangle",
    }
}

fn page_items(
    package: &mut Package,
    spread: &mut SpreadXml,
    page: &CoverPage,
    projection: &Projection,
    ctx: &RenderContext,
) -> Result<()> {
    for region in &page.regions {
        let style = match (region.id, palette::region_swatch(region.id)) {
            (_, Some(swatch)) => FrameStyle {
                locked: region.id == RegionId::BleedArea,
                ..FrameStyle::filled(swatch)
            },
            (RegionId::BackCoverTrim | RegionId::FrontCoverTrim, None) => FrameStyle {
                fill: NO_SWATCH.to_string(),
                stroke: Some("TrimColor"),
                dashed: true,
                locked: true,
                graphic: false,
            },
            // Holes are drawn individually below
            _ => continue,
        };
        let id = package.next_id();
        spread.rectangle(&id, frame_name(region.id), &projection.rect(&region.rect), &style)?;
    }

    for (index, hole) in page.punch_holes.iter().enumerate() {
        let id = package.next_id();
        spread.oval(
            &id,
            &format!("PunchHole_{}", index + 1),
            projection.x(hole.cx),
            projection.y(hole.cy),
            projection.length(hole.radius),
            "PunchHoleColor",
        )?;
    }

    // Empty graphic frames ready to receive the logo
    for slot in &page.logo_slots {
        let frame = match ctx.logo.as_deref() {
            Some(logo) => slot.fit_aspect(logo.aspect()),
            None => *slot,
        };
        let id = package.next_id();
        let style = FrameStyle {
            fill: NO_SWATCH.to_string(),
            stroke: None,
            dashed: false,
            locked: false,
            graphic: true,
        };
        spread.rectangle(&id, "Logo_Frame", &projection.rect(&frame), &style)?;
    }

    for label in &page.labels {
        let size = if label.rotation == 0.0 {
            LABEL_SIZE
        } else {
            SPINE_LABEL_SIZE
        };
        let story = package.add_story(true, vec![Paragraph::new(&label.text, size, true)]);
        let id = package.next_id();
        spread.text_frame(
            &id,
            &format!("Text_{}", label.text.replace(' ', "_")),
            &story,
            projection.x(label.center.x),
            projection.y(label.center.y),
            approx_text_width(&label.text, size) + size,
            size * 1.6,
            label.rotation,
        )?;
    }

    for column in &page.legend {
        legend_items(package, spread, column, projection)?;
    }
    Ok(())
}

fn legend_items(
    package: &mut Package,
    spread: &mut SpreadXml,
    column: &LegendColumn,
    projection: &Projection,
) -> Result<()> {
    for (index, line) in column.lines.iter().enumerate() {
        let origin = column.line_origin(index);
        let x = projection.x(origin.x);
        let y = projection.y(origin.y);

        let bar = Rect::new(x, y - BAR_HEIGHT / 2.0, BAR_WIDTH, BAR_HEIGHT);
        let id = package.next_id();
        spread.rectangle(
            &id,
            &format!("Swatch_{:?}", line.indicator),
            &bar,
            &FrameStyle::filled(palette::swatch_name(line.indicator)),
        )?;

        let width = approx_text_width(&line.value, VALUE_SIZE)
            .max(approx_text_width(&line.description, DESCRIPTION_SIZE))
            + VALUE_SIZE;
        let height = BAR_HEIGHT + DESCRIPTION_SIZE;
        let story = package.add_story(
            false,
            vec![
                Paragraph::new(&line.value, VALUE_SIZE, true),
                Paragraph::new(&line.description, DESCRIPTION_SIZE, false),
            ],
        );
        let id = package.next_id();
        spread.text_frame(
            &id,
            &format!("Text_{:?}Info", line.indicator),
            &story,
            x + BAR_WIDTH + BAR_GAP + width / 2.0,
            y,
            width,
            height,
            0.0,
        )?;
    }
    Ok(())
}
