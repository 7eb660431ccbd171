//! Coil and Wire-O covers: front and back as independent pages
//!
//! The binding edge is on the left of the front cover and on the right of
//! the back cover. Punch holes run along it.

use super::*;
use crate::binding::{BindingPolicy, ResolvedMargins};

pub(super) fn derive(
    request: &TemplateRequest,
    binding: BindingMethod,
    policy: &BindingPolicy,
    resolved: &ResolvedMargins,
) -> Result<CoverGeometry> {
    let edge = resolved.edge;
    let trim = Rect::new(edge, edge, request.trim_width, request.trim_height);
    let total_width = 2.0 * edge + request.trim_width;
    let total_height = 2.0 * edge + request.trim_height;

    let pages = [CoverSide::Front, CoverSide::Back]
        .into_iter()
        .map(|side| coil_page(side, &trim, total_width, total_height, resolved, policy))
        .collect::<Result<Vec<_>>>()?;

    Ok(CoverGeometry {
        binding,
        coverage: Coverage::Supported,
        book_title: request.book_title.clone(),
        page_count: request.page_count,
        paper_stock: request.paper_stock.clone(),
        trim_width: request.trim_width,
        trim_height: request.trim_height,
        panel_width: request.trim_width,
        panel_height: request.trim_height,
        edge_kind: policy.edge_kind,
        edge,
        spine_width: 0.0,
        safety: resolved.safety,
        total_width,
        total_height,
        left_spine_fold_x: None,
        right_spine_fold_x: None,
        spine_label_drawable: false,
        pages,
    })
}

fn coil_page(
    side: CoverSide,
    trim: &Rect,
    width: f64,
    height: f64,
    resolved: &ResolvedMargins,
    policy: &BindingPolicy,
) -> Result<CoverPage> {
    let m = resolved.safety;
    let front = side == CoverSide::Front;
    let safe = if front {
        trim.inset_edges(m.binding, m.bottom, m.outside, m.top)
    } else {
        trim.inset_edges(m.outside, m.bottom, m.binding, m.top)
    };
    ensure_room(&safe, side.title())?;

    let hole_x = if front {
        trim.x + PUNCH_HOLE_OFFSET
    } else {
        trim.right() - PUNCH_HOLE_OFFSET
    };

    let mut page = CoverPage::new(side, width, height);
    page.push(RegionId::BleedArea, page.bounds());
    page.push(RegionId::BackgroundTrim, *trim);
    if front {
        page.push(RegionId::FrontCoverTrim, *trim);
        page.push(RegionId::RightSafeArea, safe);
    } else {
        page.push(RegionId::BackCoverTrim, *trim);
        page.push(RegionId::LeftSafeArea, safe);
    }
    page.push(
        RegionId::PunchHoleZone,
        Rect::new(
            hole_x - PUNCH_HOLE_RADIUS,
            trim.y,
            PUNCH_HOLE_RADIUS * 2.0,
            trim.height,
        ),
    );
    page.punch_holes = punch_holes(hole_x, trim);

    if !front {
        if let Some(barcode) = barcode_zone(&safe, policy.barcode_inset) {
            page.push(RegionId::BarcodeZone, barcode);
        }
    }

    let label = if front { "FRONT COVER" } else { "BACK COVER" };
    place_cover_label(&mut page, &safe, label);

    Ok(page)
}

/// Hole centers from half a spacing above the trim bottom, while the center
/// stays at or below the trim top
pub(crate) fn punch_holes(center_x: f64, trim: &Rect) -> Vec<Circle> {
    let first = trim.y + PUNCH_HOLE_SPACING / 2.0;
    (0..)
        .map(|i| first + PUNCH_HOLE_SPACING * i as f64)
        .take_while(|cy| *cy <= trim.top() + EPSILON)
        .map(|cy| Circle {
            cx: center_x,
            cy,
            radius: PUNCH_HOLE_RADIUS,
        })
        .collect()
}
