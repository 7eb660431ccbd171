use template_geometry::*;

const TOL: f64 = 1e-9;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < TOL
}

fn perfect_bind(trim_w: f64, trim_h: f64, bleed: f64, spine: f64) -> TemplateRequest {
    TemplateRequest {
        binding_name: "Perfect Bind".to_string(),
        trim_width: trim_w,
        trim_height: trim_h,
        bleed: Some(bleed),
        spine_width: Some(spine),
        safety_margin: Some(0.375),
        ..Default::default()
    }
}

fn case_bind(spine: f64) -> TemplateRequest {
    TemplateRequest {
        binding_name: "Case Bind".to_string(),
        trim_width: 6.0,
        trim_height: 9.0,
        bleed: None,
        spine_width: Some(spine),
        safety_margin: None,
        ..Default::default()
    }
}

fn coil(hardcover: bool) -> TemplateRequest {
    TemplateRequest {
        binding_name: "Coil / Wire-O".to_string(),
        is_hardcover_coil_wire: Some(hardcover),
        trim_width: 8.5,
        trim_height: 11.0,
        bleed: Some(0.125),
        wrap_amount: Some(0.5),
        spine_width: None,
        safety_margin: None,
        ..Default::default()
    }
}

fn assert_safe_inside_trim(geometry: &CoverGeometry) {
    for page in &geometry.pages {
        let pairs = page.safe_areas();
        assert!(!pairs.is_empty(), "page {:?} has no safe areas", page.side);
        for (id, safe, trim) in pairs {
            assert!(
                trim.contains(&safe),
                "{} {:?} escapes trim {:?}",
                id.name(),
                safe,
                trim
            );
        }
    }
}

#[test]
fn test_perfect_bind_reference_spread() {
    let geometry = derive_cover_geometry(&perfect_bind(6.0, 9.0, 0.125, 0.5)).unwrap();

    assert_eq!(geometry.binding, BindingMethod::PerfectBind);
    assert!(close(geometry.total_width, 12.75));
    assert!(close(geometry.total_height, 9.25));
    assert_eq!(geometry.left_spine_fold_x, Some(6.125));
    assert_eq!(geometry.right_spine_fold_x, Some(6.625));
    assert!(geometry.spine_label_drawable);
    assert_eq!(geometry.pages.len(), 1);

    let page = &geometry.pages[0];
    assert_eq!(
        page.region(RegionId::Spine),
        Some(Rect::new(6.125, 0.0, 0.5, 9.25))
    );
    assert_eq!(
        page.region(RegionId::BackgroundTrim),
        Some(Rect::new(0.125, 0.125, 12.5, 9.0))
    );
    assert_eq!(
        page.region(RegionId::LeftSafeArea),
        Some(Rect::new(0.5, 0.5, 5.25, 8.25))
    );
    assert_eq!(
        page.region(RegionId::RightSafeArea),
        Some(Rect::new(7.0, 0.5, 5.25, 8.25))
    );
}

#[test]
fn test_narrow_spine_is_not_drawable() {
    let geometry = derive_cover_geometry(&perfect_bind(6.0, 9.0, 0.125, 0.1)).unwrap();
    assert!(!geometry.spine_label_drawable);
    // No rotated spine label is emitted
    assert!(geometry.pages[0].labels.iter().all(|l| l.rotation == 0.0));
}

#[test]
fn test_spread_width_identity_holds_across_inputs() {
    for trim_w in [4.0, 5.5, 6.0, 8.5] {
        for trim_h in [6.0, 8.5, 9.0, 11.0] {
            for bleed in [0.0, 0.125, 0.25] {
                for spine in [0.0, 0.0625, 0.333, 1.2] {
                    let geometry =
                        derive_cover_geometry(&perfect_bind(trim_w, trim_h, bleed, spine)).unwrap();
                    assert!(close(
                        geometry.total_width,
                        2.0 * bleed + 2.0 * trim_w + spine
                    ));
                    assert!(close(geometry.total_height, trim_h + 2.0 * bleed));

                    let page = &geometry.pages[0];
                    let back = page.region(RegionId::BackCoverTrim).unwrap();
                    let front = page.region(RegionId::FrontCoverTrim).unwrap();
                    let spine_rect = page.region(RegionId::Spine).unwrap();
                    // Edges plus panels plus spine rebuild the canvas
                    assert!(close(
                        back.width + front.width + spine_rect.width + 2.0 * bleed,
                        geometry.total_width
                    ));
                    assert_safe_inside_trim(&geometry);
                }
            }
        }
    }
}

#[test]
fn test_perfect_bind_spine_threshold() {
    let below = derive_cover_geometry(&perfect_bind(6.0, 9.0, 0.125, 0.124)).unwrap();
    let at = derive_cover_geometry(&perfect_bind(6.0, 9.0, 0.125, 0.125)).unwrap();
    let above = derive_cover_geometry(&perfect_bind(6.0, 9.0, 0.125, 0.126)).unwrap();
    assert!(!below.spine_label_drawable);
    assert!(at.spine_label_drawable);
    assert!(above.spine_label_drawable);
}

#[test]
fn test_case_bind_spine_threshold() {
    assert!(!derive_cover_geometry(&case_bind(0.249)).unwrap().spine_label_drawable);
    assert!(derive_cover_geometry(&case_bind(0.25)).unwrap().spine_label_drawable);
    assert!(derive_cover_geometry(&case_bind(0.26)).unwrap().spine_label_drawable);
    // A spine that passes perfect bind still fails case bind
    assert!(!derive_cover_geometry(&case_bind(0.2)).unwrap().spine_label_drawable);
}

#[test]
fn test_case_bind_defaults_and_wrap() {
    let geometry = derive_cover_geometry(&case_bind(0.5)).unwrap();

    assert_eq!(geometry.edge_kind, EdgeKind::Wrap);
    assert!(close(geometry.edge, 0.75));
    assert!(close(geometry.safety.top, 0.5));
    assert!(close(geometry.total_width, 2.0 * 0.75 + 2.0 * 6.0 + 0.5));
    assert!(close(geometry.total_height, 9.0 + 1.5));

    // Panel width recovered from the total
    let panel = (geometry.total_width - 2.0 * geometry.edge - geometry.spine_width) / 2.0;
    assert!(close(panel, geometry.panel_width));
    assert_safe_inside_trim(&geometry);
}

#[test]
fn test_case_bind_board_panels() {
    let mut request = case_bind(0.5);
    request.board_width = Some(6.25);
    request.board_height = Some(9.25);
    let geometry = derive_cover_geometry(&request).unwrap();

    assert!(close(geometry.panel_width, 6.25));
    assert!(close(geometry.total_width, 1.5 + 12.5 + 0.5));
    assert!(close(geometry.total_height, 1.5 + 9.25));
    // Trim is still reported as requested
    assert!(close(geometry.trim_width, 6.0));
}

#[test]
fn test_barcode_sits_beside_spine_without_overlap() {
    for request in [perfect_bind(6.0, 9.0, 0.125, 0.5), case_bind(0.5)] {
        let geometry = derive_cover_geometry(&request).unwrap();
        let policy = geometry.binding.policy().unwrap();
        let page = &geometry.pages[0];
        let barcode = page.region(RegionId::BarcodeZone).unwrap();
        let back_safe = page.region(RegionId::LeftSafeArea).unwrap();

        assert!(close(barcode.width, 1.75));
        assert!(close(barcode.height, 1.0));
        assert!(back_safe.contains(&barcode));
        assert!(close(barcode.right(), back_safe.right() - policy.barcode_inset));
        assert!(close(barcode.y, back_safe.y + policy.barcode_inset));
        assert!(barcode.right() <= geometry.left_spine_fold_x.unwrap());
    }
}

#[test]
fn test_barcode_omitted_when_it_cannot_fit() {
    let geometry = derive_cover_geometry(&perfect_bind(2.0, 3.0, 0.125, 0.2)).unwrap();
    assert!(geometry.barcode_zone().is_none());
}

#[test]
fn test_coil_softcover_pages() {
    let geometry = derive_cover_geometry(&coil(false)).unwrap();

    assert_eq!(geometry.binding, BindingMethod::CoilWireOSoftcover);
    assert_eq!(geometry.edge_kind, EdgeKind::Bleed);
    assert!(close(geometry.edge, 0.125));
    assert_eq!(geometry.pages.len(), 2);
    assert_eq!(geometry.pages[0].side, CoverSide::Front);
    assert_eq!(geometry.pages[1].side, CoverSide::Back);
    assert!(close(geometry.total_width, 8.75));
    assert!(close(geometry.total_height, 11.25));
    assert_eq!(geometry.left_spine_fold_x, None);
    assert!(!geometry.spine_label_drawable);

    let front = &geometry.pages[0];
    let safe = front.region(RegionId::RightSafeArea).unwrap();
    // Binding edge on the left of the front cover
    assert!(close(safe.x, 0.125 + 0.75));
    assert!(close(safe.right(), 0.125 + 8.5 - 0.375));
    assert!(front.region(RegionId::BarcodeZone).is_none());

    let back = &geometry.pages[1];
    let safe = back.region(RegionId::LeftSafeArea).unwrap();
    assert!(close(safe.x, 0.125 + 0.375));
    assert!(close(safe.right(), 0.125 + 8.5 - 0.75));
    let barcode = back.region(RegionId::BarcodeZone).unwrap();
    assert!(close(barcode.right(), safe.right()));
    assert!(close(barcode.y, safe.y));

    assert_safe_inside_trim(&geometry);
}

#[test]
fn test_coil_hardcover_margins_are_fixed() {
    let mut request = coil(true);
    request.safety_margin = Some(1.0);
    request.safety_margin_binding_edge = Some(1.0);
    let geometry = derive_cover_geometry(&request).unwrap();

    assert_eq!(geometry.binding, BindingMethod::CoilWireOHardcover);
    assert_eq!(geometry.edge_kind, EdgeKind::Wrap);
    assert!(close(geometry.edge, 0.5));
    assert!(close(geometry.safety.binding, 0.625));
    assert!(close(geometry.safety.outside, 0.375));
    assert!(close(geometry.total_width, 8.5 + 1.0));
    assert_safe_inside_trim(&geometry);
}

#[test]
fn test_coil_softcover_margin_fallbacks() {
    let mut request = coil(false);
    request.safety_margin = Some(0.25);
    request.safety_margin_outside_edge = Some(0.3);
    let geometry = derive_cover_geometry(&request).unwrap();

    // Per-edge value, then legacy safety margin, then default
    assert!(close(geometry.safety.outside, 0.3));
    assert!(close(geometry.safety.top, 0.25));
    assert!(close(geometry.safety.binding, 0.75));
}

#[test]
fn test_coil_punch_holes_along_binding_edge() {
    let geometry = derive_cover_geometry(&coil(false)).unwrap();
    let front = &geometry.pages[0];
    let back = &geometry.pages[1];

    assert!(!front.punch_holes.is_empty());
    assert_eq!(front.punch_holes.len(), back.punch_holes.len());
    assert!(front.punch_holes.iter().all(|h| close(h.cx, 0.125 + 0.375)));
    assert!(back.punch_holes.iter().all(|h| close(h.cx, 0.125 + 8.5 - 0.375)));

    let zone = front.region(RegionId::PunchHoleZone).unwrap();
    for hole in &front.punch_holes {
        assert!(close(hole.radius, 0.075));
        assert!(hole.cx >= zone.x && hole.cx <= zone.right());
    }
}

#[test]
fn test_unsupported_binding_is_explicit() {
    let request = TemplateRequest {
        binding_name: "Lay Flat".to_string(),
        trim_width: 7.0,
        trim_height: 10.0,
        ..Default::default()
    };
    let geometry = derive_cover_geometry(&request).unwrap();

    assert!(!geometry.is_supported());
    match &geometry.coverage {
        Coverage::Unsupported { binding_name } => assert_eq!(binding_name, "Lay Flat"),
        other => panic!("Expected unsupported coverage, got {:?}", other),
    }
    assert_eq!(geometry.pages.len(), 1);
    assert!(geometry.pages[0].regions.is_empty());
    assert!(close(geometry.pages[0].width, 7.0));
    assert!(geometry.pages[0].labels[0].text.contains("not yet supported"));
}

#[test]
fn test_legend_reports_geometry_values() {
    let mut request = perfect_bind(6.0, 9.0, 0.125, 0.5);
    request.page_count = 320;
    request.paper_stock = "50# Cream".to_string();
    let geometry = derive_cover_geometry(&request).unwrap();
    let columns = &geometry.pages[0].legend;
    assert_eq!(columns.len(), 2);

    let texts: Vec<String> = columns
        .iter()
        .flat_map(|c| c.lines.iter().map(|l| l.text()))
        .collect();
    assert!(texts.iter().any(|t| t.starts_with("0.125 in  Bleed Area")));
    assert!(texts.iter().any(|t| t.starts_with("12.750 x 9.250 in")));
    assert!(texts.iter().any(|t| t.starts_with("6 x 9 in  Trim Size")));
    assert!(texts
        .iter()
        .any(|t| t.contains("Spine Text Area for 320 pages using 50# Cream")));
}

#[test]
fn test_legend_warns_on_narrow_spine() {
    let geometry = derive_cover_geometry(&perfect_bind(6.0, 9.0, 0.125, 0.1)).unwrap();
    let spine_line = geometry.pages[0]
        .legend
        .iter()
        .flat_map(|c| c.lines.iter())
        .find(|l| l.indicator == Indicator::Spine)
        .unwrap();
    assert!(spine_line.description.contains("below 0.125"));
}

#[test]
fn test_geometry_is_deterministic() {
    let request = perfect_bind(5.5, 8.5, 0.125, 0.4);
    assert_eq!(
        derive_cover_geometry(&request).unwrap(),
        derive_cover_geometry(&request).unwrap()
    );
}

#[test]
fn test_margins_larger_than_trim_are_rejected() {
    let mut request = perfect_bind(2.0, 3.0, 0.125, 0.2);
    request.safety_margin = Some(1.5);
    match derive_cover_geometry(&request) {
        Err(GeometryError::InvalidInput(msg)) => assert!(msg.contains("no room")),
        other => panic!("Expected InvalidInput error, got {:?}", other),
    }
}
