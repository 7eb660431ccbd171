use template_geometry::*;

fn request(pages: u32) -> TemplateRequest {
    TemplateRequest {
        page_count: pages,
        trim_width: 6.0,
        trim_height: 9.0,
        ..Default::default()
    }
}

#[test]
fn test_gutter_steps() {
    let cases = [
        (1, 0.5),
        (60, 0.5),
        (61, 0.675),
        (150, 0.675),
        (151, 0.75),
        (400, 0.75),
        (401, 1.0),
        (600, 1.0),
        (601, 1.25),
        (1200, 1.25),
    ];
    for (pages, expected) in cases {
        assert_eq!(gutter_for_page_count(pages), expected, "{} pages", pages);
    }
}

#[test]
fn test_recto_verso_alternation() {
    let geometry = derive_interior_geometry(&request(200)).unwrap();
    assert_eq!(geometry.gutter, 0.75);

    let recto_x = 0.125 + 0.75;
    let verso_x = 0.125 + 0.5;
    let expected = [recto_x, verso_x, recto_x, verso_x, recto_x];
    for (index, x) in expected.iter().enumerate() {
        let page = geometry.page(index);
        assert!((page.safe.x - x).abs() < 1e-12, "page {}", index);
        assert!((page.safe.y - 0.625).abs() < 1e-12);
        let side = if index % 2 == 0 {
            PageSide::Recto
        } else {
            PageSide::Verso
        };
        assert_eq!(page.side, side);
    }
}

#[test]
fn test_safe_area_and_gutter_strip() {
    let geometry = derive_interior_geometry(&request(100)).unwrap();
    assert!((geometry.page_width - 6.25).abs() < 1e-12);
    assert!((geometry.page_height - 9.25).abs() < 1e-12);
    assert!((geometry.safe_width() - (6.0 - 0.675 - 0.5)).abs() < 1e-12);
    assert!((geometry.safe_height() - 8.0).abs() < 1e-12);

    for page in geometry.template_pages() {
        assert!(page.trim.contains(&page.safe));
        assert!(page.trim.contains(&page.gutter_label));
        match page.side {
            PageSide::Recto => assert_eq!(page.gutter_label.x, page.trim.x),
            PageSide::Verso => {
                assert!((page.gutter_label.right() - page.trim.right()).abs() < 1e-12)
            }
        }
    }
}

#[test]
fn test_template_has_three_pages() {
    let geometry = derive_interior_geometry(&request(48)).unwrap();
    let pages = geometry.template_pages();
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[2].number(), 3);
}

#[test]
fn test_interior_legend() {
    let geometry = derive_interior_geometry(&request(320)).unwrap();
    let lines = geometry.legend();
    let gutter = lines
        .iter()
        .find(|l| l.indicator == Indicator::Gutter)
        .unwrap();
    assert_eq!(gutter.value, "0.750 in");
    assert!(gutter.description.contains("(320 pp)"));
    assert!(lines.iter().any(|l| l.value == "6.250 x 9.250 in"));
}

#[test]
fn test_tiny_trim_is_rejected() {
    let mut r = request(700);
    r.trim_width = 1.5;
    assert!(matches!(
        derive_interior_geometry(&r),
        Err(GeometryError::InvalidInput(_))
    ));
}
