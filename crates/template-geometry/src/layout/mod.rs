//! Cover and interior layout derivation
//!
//! The flow is:
//! 1. Validate the request
//! 2. Resolve binding defaults through the policy table
//! 3. Run the layout variant for the policy's family
//! 4. Attach legends computed from the finished geometry

mod coil;
mod interior;
mod spread;
mod types;

pub use interior::*;
pub use types::*;

use crate::binding::{BindingMethod, EdgeKind, EdgeMargins, LayoutFamily};
use crate::constants::*;
use crate::legend;
use crate::request::TemplateRequest;
use crate::types::*;

/// Derive the cover layout for a request.
///
/// Pure and deterministic. Bindings without a layout variant produce
/// [`Coverage::Unsupported`] geometry rather than an error.
pub fn derive_cover_geometry(request: &TemplateRequest) -> Result<CoverGeometry> {
    request.validate()?;

    let binding = request.binding();
    let mut geometry = match binding.policy() {
        Some(policy) => {
            let resolved = policy.resolve(request);
            match policy.family {
                LayoutFamily::Spread => spread::derive(request, binding.clone(), policy, &resolved)?,
                LayoutFamily::CoilPages => coil::derive(request, binding.clone(), policy, &resolved)?,
            }
        }
        None => unsupported(request, binding),
    };

    attach_legends(&mut geometry);
    Ok(geometry)
}

fn unsupported(request: &TemplateRequest, binding: BindingMethod) -> CoverGeometry {
    let (width, height) = (request.trim_width, request.trim_height);
    let mut page = CoverPage::new(CoverSide::Spread, width, height);
    page.labels.push(TextLabel::new(
        format!("{} templates are not yet supported", binding.display_name()),
        Point::new(width / 2.0, height / 2.0),
    ));

    CoverGeometry {
        coverage: Coverage::Unsupported {
            binding_name: binding.display_name().to_string(),
        },
        binding,
        book_title: request.book_title.clone(),
        page_count: request.page_count,
        paper_stock: request.paper_stock.clone(),
        trim_width: width,
        trim_height: height,
        panel_width: width,
        panel_height: height,
        edge_kind: EdgeKind::Bleed,
        edge: 0.0,
        spine_width: 0.0,
        safety: EdgeMargins::uniform(0.0),
        total_width: width,
        total_height: height,
        left_spine_fold_x: None,
        right_spine_fold_x: None,
        spine_label_drawable: false,
        pages: vec![page],
    }
}

fn attach_legends(geometry: &mut CoverGeometry) {
    if !geometry.is_supported() {
        return;
    }
    let columns: Vec<_> = geometry
        .pages
        .iter()
        .map(|page| legend::cover_columns(geometry, page))
        .collect();
    for (page, legend) in geometry.pages.iter_mut().zip(columns) {
        page.legend = legend;
    }
}

/// Fail when the margins consume the whole panel
pub(super) fn ensure_room(safe: &Rect, what: &str) -> Result<()> {
    if safe.is_empty() {
        return Err(GeometryError::InvalidInput(format!(
            "Safety margins leave no room on the {}",
            what
        )));
    }
    Ok(())
}

/// Barcode box in the bottom-right corner of a safe area, or `None` if it
/// does not fit
pub(super) fn barcode_zone(safe: &Rect, inset: f64) -> Option<Rect> {
    let zone = Rect::new(
        safe.right() - inset - BARCODE_WIDTH,
        safe.y + inset,
        BARCODE_WIDTH,
        BARCODE_HEIGHT,
    );
    safe.contains(&zone).then_some(zone)
}

/// Logo slot and cover label near the top of a safe area
pub(super) fn place_cover_label(page: &mut CoverPage, safe: &Rect, text: &str) {
    let slot = Rect::new(
        safe.center_x() - LOGO_SLOT_WIDTH / 2.0,
        safe.top() - LOGO_SLOT_GAP - LOGO_SLOT_HEIGHT,
        LOGO_SLOT_WIDTH,
        LOGO_SLOT_HEIGHT,
    );
    if safe.contains(&slot) {
        page.logo_slots.push(slot);
    }
    page.labels.push(TextLabel::new(
        text,
        Point::new(safe.center_x(), slot.y - LABEL_GAP),
    ));
}
