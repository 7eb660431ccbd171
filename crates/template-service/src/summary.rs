//! Plain-text specification sheet placed at the root of each package

use chrono::{DateTime, Utc};
use template_geometry::{CoverGeometry, InteriorGeometry, TemplateRequest};

const RULE: &str = "================================";

/// Summary of the book and the generated layouts.
///
/// Sections for geometry that was not generated say so instead of guessing.
pub fn summary_text(
    request: &TemplateRequest,
    cover: Option<&CoverGeometry>,
    interior: Option<&InteriorGeometry>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut lines = vec![
        "BOOK SPECIFICATION SUMMARY".to_string(),
        RULE.to_string(),
        format!("Binding Type: {}", request.binding()),
    ];
    if let Some(title) = request.book_title.as_deref().filter(|t| !t.trim().is_empty()) {
        lines.push(format!("Book Title: {}", title.trim()));
    }
    lines.push(format!("Page Count: {}", request.page_count));
    lines.push(format!("Paper Stock: {}", request.paper_stock));
    lines.push(String::new());

    lines.push("--- Cover Dimensions ---".to_string());
    match cover {
        Some(cover) if cover.is_supported() => {
            lines.push(format!(
                "Trim Size (Single Page): {}",
                inches_pair(cover.trim_width, cover.trim_height)
            ));
            if cover.panel_width != cover.trim_width || cover.panel_height != cover.trim_height {
                lines.push(format!(
                    "Board Size: {}",
                    inches_pair(cover.panel_width, cover.panel_height)
                ));
            }
            lines.push(format!("Spine Width: {:.3}\"", cover.spine_width));
            lines.push(format!("{}: {:.3}\"", cover.edge_kind.label(), cover.edge));
            let total_label = if cover.pages.len() > 1 {
                "Cover Page Size (each of front and back)"
            } else {
                "Total Cover Size"
            };
            lines.push(format!(
                "{} (with {}): {}",
                total_label,
                cover.edge_kind.label().to_lowercase(),
                inches_pair(cover.total_width, cover.total_height)
            ));
        }
        Some(cover) => {
            lines.push(format!(
                "{} covers are not yet supported; the cover files are placeholders.",
                cover.binding
            ));
        }
        None => lines.push("Not included in this package.".to_string()),
    }
    lines.push(String::new());

    lines.push("--- Interior Dimensions ---".to_string());
    match interior {
        Some(interior) => {
            lines.push(format!(
                "Page Size: {}",
                inches_pair(interior.trim_width, interior.trim_height)
            ));
            lines.push(format!(
                "Page Size (with bleed): {}",
                inches_pair(interior.page_width, interior.page_height)
            ));
            lines.push(format!(
                "Recommended Margins: top {:.3}\", bottom {:.3}\", outside {:.3}\", inside (gutter) {:.3}\"",
                interior.top, interior.bottom, interior.outside, interior.gutter
            ));
        }
        None => lines.push("Not included in this package.".to_string()),
    }
    lines.push(String::new());

    lines.push(format!(
        "Generated on: {}",
        generated_at.format("%a, %d %b %Y %H:%M:%S GMT")
    ));
    lines.join("\n")
}

fn inches_pair(width: f64, height: f64) -> String {
    format!("{:.3}\" x {:.3}\"", width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use template_geometry::{derive_cover_geometry, derive_interior_geometry};

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap()
    }

    #[test]
    fn perfect_bind_summary() {
        let request = TemplateRequest::default();
        let cover = derive_cover_geometry(&request).unwrap();
        let interior = derive_interior_geometry(&request).unwrap();
        let text = summary_text(&request, Some(&cover), Some(&interior), timestamp());

        assert!(text.starts_with("BOOK SPECIFICATION SUMMARY\n"));
        assert!(text.contains("Binding Type: Perfect Bind / Softcover"));
        assert!(text.contains("Trim Size (Single Page): 6.000\" x 9.000\""));
        assert!(text.contains("Spine Width: 0.500\""));
        assert!(text.contains("Bleed: 0.125\""));
        assert!(text.contains("Total Cover Size (with bleed): 12.750\" x 9.250\""));
        assert!(text.contains("inside (gutter) 0.750\""));
        assert!(text.ends_with("Generated on: Tue, 05 Mar 2024 14:30:00 GMT"));
    }

    #[test]
    fn cover_only_summary_skips_interior() {
        let request = TemplateRequest::default();
        let cover = derive_cover_geometry(&request).unwrap();
        let text = summary_text(&request, Some(&cover), None, timestamp());

        let interior = text.split("--- Interior Dimensions ---").nth(1).unwrap();
        assert!(interior.contains("Not included in this package."));
    }
}
