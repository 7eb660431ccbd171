use template_geometry::{Axis, InteriorGeometry, InteriorPage, PageSide, Projection, Rect, Unit};

use super::package::{DocumentSetup, Margins, Package, Paragraph};
use crate::types::*;

const TITLE_SIZE: f64 = 16.0;
const BODY_SIZE: f64 = 10.0;

/// Facing-pages interior template with the recommended margins
pub struct InteriorIdml;

impl TemplateRenderer<InteriorGeometry> for InteriorIdml {
    fn entry_name(&self) -> &'static str {
        "Interior/interior.idml"
    }

    fn render(&self, geometry: &InteriorGeometry, _ctx: &RenderContext) -> Result<Vec<u8>> {
        let points = |inches: f64| Unit::Points.from_inches(inches);
        let width = points(geometry.trim_width);
        let height = points(geometry.trim_height);
        let pages = geometry.template_pages();

        let mut package = Package::new(DocumentSetup {
            name: format!("{} Interior Template", geometry.binding_name),
            page_width: width,
            page_height: height,
            pages: pages.len(),
            facing_pages: true,
            bleed: points(geometry.bleed),
            margins: Margins {
                top: points(geometry.top),
                bottom: points(geometry.bottom),
                inside: points(geometry.gutter),
                outside: points(geometry.outside),
            },
        });

        let mut legend = vec![Paragraph::new("Interior Template", TITLE_SIZE, true)];
        legend.extend(
            geometry
                .legend()
                .iter()
                .map(|line| Paragraph::new(line.text(), BODY_SIZE, false)),
        );
        let story = package.add_story(false, legend);

        // The first recto stands alone; later pages pair up verso then recto
        let rest: Vec<usize> = (1..pages.len()).collect();
        let mut spreads: Vec<Vec<usize>> = vec![vec![0]];
        spreads.extend(rest.chunks(2).map(<[usize]>::to_vec));

        for indices in &spreads {
            let binding = usize::from(pages[indices[0]].side == PageSide::Verso);
            let mut spread = package.open_spread(indices.len(), binding)?;
            for (slot, &index) in indices.iter().enumerate() {
                let page = &pages[index];
                let id = package.next_id();
                spread.page(
                    &id,
                    &page.number().to_string(),
                    width * slot as f64,
                    package.setup(),
                )?;

                if index == 0 {
                    let safe = safe_frame(page);
                    let frame_id = package.next_id();
                    spread.text_frame(
                        &frame_id,
                        "Text_Instructions",
                        &story,
                        safe.center_x(),
                        safe.center_y(),
                        safe.width,
                        safe.height,
                        0.0,
                    )?;
                }
            }
            package.close_spread(spread)?;
        }

        let bytes = package.finish()?;
        log::debug!(
            "Rendered interior IDML: {} spreads, {} bytes",
            spreads.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

/// Safe area in points, top-left origin at the trimmed page corner
fn safe_frame(page: &InteriorPage) -> Rect {
    Projection::new(Unit::Points, Axis::YDown, page.trim.top())
        .with_offset(-page.trim.x, 0.0)
        .rect(&page.safe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use template_geometry::{TemplateRequest, derive_interior_geometry};

    #[test]
    fn safe_frame_is_measured_from_the_trim_corner() {
        let geometry = derive_interior_geometry(&TemplateRequest::default()).unwrap();
        let pages = geometry.template_pages();

        // Recto: gutter on the left, 0.75 in for 200 pages
        let recto = safe_frame(&pages[0]);
        assert!((recto.x - 54.0).abs() < 1e-9);
        assert!((recto.y - 36.0).abs() < 1e-9);
        assert!((recto.width - (6.0 - 0.75 - 0.5) * 72.0).abs() < 1e-9);
        assert!((recto.height - 8.0 * 72.0).abs() < 1e-9);

        // Verso: outside margin on the left
        let verso = safe_frame(&pages[1]);
        assert!((verso.x - 36.0).abs() < 1e-9);
        assert!((verso.y - 36.0).abs() < 1e-9);
    }
}
