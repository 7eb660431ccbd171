//! Single-canvas covers: back cover, spine, front cover
//!
//! Perfect bind and saddle stitch surround the trim with bleed; case bind
//! surrounds board panels with wrap. Both share one layout.

use super::*;
use crate::binding::{BindingPolicy, ResolvedMargins};

pub(super) fn derive(
    request: &TemplateRequest,
    binding: BindingMethod,
    policy: &BindingPolicy,
    resolved: &ResolvedMargins,
) -> Result<CoverGeometry> {
    let ResolvedMargins {
        edge,
        spine,
        safety,
        panel_width,
        panel_height,
    } = *resolved;

    let total_width = 2.0 * edge + 2.0 * panel_width + spine;
    let total_height = 2.0 * edge + panel_height;
    let left_fold = edge + panel_width;
    let right_fold = left_fold + spine;

    let back_trim = Rect::new(edge, edge, panel_width, panel_height);
    let front_trim = Rect::new(right_fold, edge, panel_width, panel_height);
    // The binding edge of each panel faces the spine
    let back_safe =
        back_trim.inset_edges(safety.outside, safety.bottom, safety.binding, safety.top);
    let front_safe =
        front_trim.inset_edges(safety.binding, safety.bottom, safety.outside, safety.top);
    ensure_room(&back_safe, "back cover")?;
    ensure_room(&front_safe, "front cover")?;

    let mut page = CoverPage::new(CoverSide::Spread, total_width, total_height);
    page.push(
        RegionId::BleedArea,
        Rect::new(0.0, 0.0, total_width, total_height),
    );
    page.push(
        RegionId::BackgroundTrim,
        Rect::new(edge, edge, total_width - 2.0 * edge, panel_height),
    );
    page.push(
        RegionId::Spine,
        Rect::new(left_fold, 0.0, spine, total_height),
    );
    page.push(RegionId::BackCoverTrim, back_trim);
    page.push(RegionId::FrontCoverTrim, front_trim);
    page.push(RegionId::LeftSafeArea, back_safe);
    page.push(RegionId::RightSafeArea, front_safe);
    if let Some(barcode) = barcode_zone(&back_safe, policy.barcode_inset) {
        page.push(RegionId::BarcodeZone, barcode);
    }

    place_cover_label(&mut page, &back_safe, "BACK COVER");
    place_cover_label(&mut page, &front_safe, "FRONT COVER");

    let spine_label_drawable = policy.spine_text_allowed(spine);
    if spine_label_drawable {
        let text = request
            .book_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("SPINE");
        page.labels.push(
            TextLabel::new(
                text,
                Point::new(left_fold + spine / 2.0, total_height / 2.0),
            )
            .rotated(-90.0),
        );
    }

    Ok(CoverGeometry {
        binding,
        coverage: Coverage::Supported,
        book_title: request.book_title.clone(),
        page_count: request.page_count,
        paper_stock: request.paper_stock.clone(),
        trim_width: request.trim_width,
        trim_height: request.trim_height,
        panel_width,
        panel_height,
        edge_kind: policy.edge_kind,
        edge,
        spine_width: spine,
        safety,
        total_width,
        total_height,
        left_spine_fold_x: Some(left_fold),
        right_spine_fold_x: Some(right_fold),
        spine_label_drawable,
        pages: vec![page],
    })
}
