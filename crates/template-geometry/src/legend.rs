//! Proofing legend shared by every output format
//!
//! Values are formatted once here so each format prints the same numbers.

use crate::binding::EdgeKind;
use crate::constants::{BARCODE_HEIGHT, BARCODE_WIDTH, LEGEND_COLUMN_INSET, LEGEND_LINE_SPACING};
use crate::layout::{CoverGeometry, CoverPage, CoverSide, InteriorGeometry, RegionId};
use crate::types::{Point, Rect};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Swatch shown beside a legend line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Indicator {
    Bleed,
    Wrap,
    Safety,
    Barcode,
    DocumentSize,
    Trim,
    Spine,
    PunchHole,
    Margin,
    Gutter,
}

impl From<EdgeKind> for Indicator {
    fn from(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::Bleed => Indicator::Bleed,
            EdgeKind::Wrap => Indicator::Wrap,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LegendLine {
    pub indicator: Indicator,
    pub value: String,
    pub description: String,
}

impl LegendLine {
    fn new(indicator: Indicator, value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            indicator,
            value: value.into(),
            description: description.into(),
        }
    }

    /// Value and description on one line
    pub fn text(&self) -> String {
        if self.value.is_empty() {
            self.description.clone()
        } else {
            format!("{}  {}", self.value, self.description)
        }
    }
}

/// Legend lines stacked downward from an anchor point
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LegendColumn {
    /// Left end of the first line's baseline
    pub anchor: Point,
    pub lines: Vec<LegendLine>,
}

impl LegendColumn {
    /// Column placed near the vertical middle of a safe area
    fn within(safe: &Rect, lines: Vec<LegendLine>) -> Self {
        let block = LEGEND_LINE_SPACING * lines.len().saturating_sub(1) as f64;
        Self {
            anchor: Point::new(
                safe.x + LEGEND_COLUMN_INSET,
                safe.center_y() + block / 2.0,
            ),
            lines,
        }
    }

    /// Baseline origin of line `index`
    pub fn line_origin(&self, index: usize) -> Point {
        Point::new(
            self.anchor.x,
            self.anchor.y - LEGEND_LINE_SPACING * index as f64,
        )
    }
}

/// `0.125 in`
pub fn format_inches(value: f64) -> String {
    format!("{:.3} in", value)
}

/// Shortest decimal form: `6`, `8.5`, `0.125`
pub fn format_dimension(value: f64) -> String {
    let fixed = format!("{:.3}", value);
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// `12.750 x 9.250 in`
pub fn format_size(width: f64, height: f64) -> String {
    format!("{:.3} x {:.3} in", width, height)
}

/// `6 x 9 in`
pub fn format_trim(width: f64, height: f64) -> String {
    format!(
        "{} x {} in",
        format_dimension(width),
        format_dimension(height)
    )
}

fn edge_line(kind: EdgeKind, edge: f64) -> LegendLine {
    let description = match kind {
        EdgeKind::Bleed => "Bleed Area - Extend your color or BG till bleed area",
        EdgeKind::Wrap => "Wrap Area - Extend your color or BG till here",
    };
    LegendLine::new(kind.into(), format_inches(edge), description)
}

fn safety_line(margin: f64) -> LegendLine {
    LegendLine::new(
        Indicator::Safety,
        format_inches(margin),
        "Safety Margin Keep all your important text inside it",
    )
}

fn barcode_line() -> LegendLine {
    LegendLine::new(
        Indicator::Barcode,
        format!(
            "{} x {} in",
            format_dimension(BARCODE_WIDTH),
            format_dimension(BARCODE_HEIGHT)
        ),
        "Barcode optional",
    )
}

fn document_size_line(kind: EdgeKind, width: f64, height: f64) -> LegendLine {
    let description = match kind {
        EdgeKind::Bleed => "Total Document Size with bleed",
        EdgeKind::Wrap => "Total Document Size with wrap",
    };
    LegendLine::new(
        Indicator::DocumentSize,
        format_size(width, height),
        description,
    )
}

fn trim_line(width: f64, height: f64) -> LegendLine {
    LegendLine::new(Indicator::Trim, format_trim(width, height), "Trim Size")
}

fn spine_line(geometry: &CoverGeometry) -> LegendLine {
    let description = if geometry.spine_label_drawable {
        format!(
            "Spine Text Area for {} pages using {}",
            geometry.page_count, geometry.paper_stock
        )
    } else {
        geometry
            .binding
            .policy()
            .map(|p| p.spine_warning.to_string())
            .unwrap_or_default()
    };
    LegendLine::new(
        Indicator::Spine,
        format_inches(geometry.spine_width),
        description,
    )
}

fn punch_hole_line(binding_on_left: bool) -> LegendLine {
    let side = if binding_on_left { "left" } else { "Right" };
    LegendLine::new(
        Indicator::PunchHole,
        "0.375\" punchhole",
        format!("leave extra margin on {} side", side),
    )
}

/// Legend columns for one cover page
pub(crate) fn cover_columns(geometry: &CoverGeometry, page: &CoverPage) -> Vec<LegendColumn> {
    let left_safe = page.region(RegionId::LeftSafeArea);
    let right_safe = page.region(RegionId::RightSafeArea);
    let kind = geometry.edge_kind;

    match page.side {
        CoverSide::Spread => {
            let mut columns = Vec::new();
            if let Some(safe) = left_safe {
                columns.push(LegendColumn::within(
                    &safe,
                    vec![
                        edge_line(kind, geometry.edge),
                        safety_line(geometry.safety.outside),
                        barcode_line(),
                    ],
                ));
            }
            if let Some(safe) = right_safe {
                columns.push(LegendColumn::within(
                    &safe,
                    vec![
                        document_size_line(kind, geometry.total_width, geometry.total_height),
                        trim_line(geometry.trim_width, geometry.trim_height),
                        spine_line(geometry),
                    ],
                ));
            }
            columns
        }
        CoverSide::Front => right_safe
            .map(|safe| {
                vec![LegendColumn::within(
                    &safe,
                    vec![
                        document_size_line(kind, geometry.total_width, geometry.total_height),
                        trim_line(geometry.trim_width, geometry.trim_height),
                        punch_hole_line(true),
                    ],
                )]
            })
            .unwrap_or_default(),
        CoverSide::Back => left_safe
            .map(|safe| {
                vec![LegendColumn::within(
                    &safe,
                    vec![
                        edge_line(kind, geometry.edge),
                        safety_line(geometry.safety.outside),
                        barcode_line(),
                        punch_hole_line(false),
                    ],
                )]
            })
            .unwrap_or_default(),
    }
}

/// Legend lines describing an interior template
pub fn interior_lines(geometry: &InteriorGeometry) -> Vec<LegendLine> {
    vec![
        LegendLine::new(
            Indicator::Bleed,
            format_inches(geometry.bleed),
            "Bleed Area - Extend your color or BG till bleed area",
        ),
        LegendLine::new(
            Indicator::Margin,
            format_inches(geometry.outside),
            "Top / Bottom / Outside margin - Keep text inside",
        ),
        LegendLine::new(
            Indicator::Gutter,
            format_inches(geometry.gutter),
            format!("Gutter (inside) - By page count ({} pp)", geometry.page_count),
        ),
        LegendLine::new(
            Indicator::DocumentSize,
            format_size(geometry.page_width, geometry.page_height),
            "Total Document Size (with bleed)",
        ),
        trim_line(geometry.trim_width, geometry.trim_height),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_drop_trailing_zeros() {
        assert_eq!(format_dimension(6.0), "6");
        assert_eq!(format_dimension(8.5), "8.5");
        assert_eq!(format_dimension(0.125), "0.125");
        assert_eq!(format_trim(5.5, 8.5), "5.5 x 8.5 in");
    }

    #[test]
    fn sizes_keep_three_decimals() {
        assert_eq!(format_size(12.75, 9.25), "12.750 x 9.250 in");
        assert_eq!(format_inches(0.5), "0.500 in");
    }

    #[test]
    fn column_lines_step_downward() {
        let safe = Rect::new(1.0, 1.0, 4.0, 6.0);
        let column = LegendColumn::within(&safe, vec![barcode_line(), barcode_line()]);
        assert_eq!(column.anchor.x, 1.25);
        assert!(column.line_origin(1).y < column.line_origin(0).y);
        assert!((column.line_origin(0).y - column.line_origin(1).y - LEGEND_LINE_SPACING).abs() < 1e-12);
    }
}
