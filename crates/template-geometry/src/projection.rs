//! Conversion of canonical page geometry into a format's coordinate space
//!
//! Canonical geometry is inches, origin bottom-left, Y up. Formats differ in
//! unit (points, pixels, twips) and in Y direction; multi-page layouts also
//! place each page at an offset. All of that happens here and nowhere else.

use crate::constants::{POINTS_PER_INCH, TWIPS_PER_INCH};
use crate::types::{Point, Rect};

/// Target length unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unit {
    Inches,
    Points,
    Pixels { dpi: u32 },
    Twips,
}

impl Unit {
    /// Units per inch
    pub fn per_inch(self) -> f64 {
        match self {
            Unit::Inches => 1.0,
            Unit::Points => POINTS_PER_INCH,
            Unit::Pixels { dpi } => f64::from(dpi),
            Unit::Twips => TWIPS_PER_INCH,
        }
    }

    pub fn from_inches(self, inches: f64) -> f64 {
        inches * self.per_inch()
    }

    pub fn to_inches(self, value: f64) -> f64 {
        value / self.per_inch()
    }
}

/// Direction of the target's Y axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Origin bottom-left (PDF)
    YUp,
    /// Origin top-left (raster, IDML, word processing)
    YDown,
}

/// Maps page-relative inch geometry into a target space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub unit: Unit,
    pub axis: Axis,
    /// Height of the source page in inches
    pub page_height: f64,
    /// Page placement inside the target, in inches, applied after the flip
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Projection {
    pub fn new(unit: Unit, axis: Axis, page_height: f64) -> Self {
        Self {
            unit,
            axis,
            page_height,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Place the page at an offset within a larger target (spreads)
    pub fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    pub fn length(&self, inches: f64) -> f64 {
        self.unit.from_inches(inches)
    }

    pub fn x(&self, x: f64) -> f64 {
        self.unit.from_inches(x + self.offset_x)
    }

    pub fn y(&self, y: f64) -> f64 {
        let flipped = match self.axis {
            Axis::YUp => y,
            Axis::YDown => self.page_height - y,
        };
        self.unit.from_inches(flipped + self.offset_y)
    }

    pub fn point(&self, p: Point) -> Point {
        Point::new(self.x(p.x), self.y(p.y))
    }

    /// Project a rectangle. The result is anchored at the corner nearest the
    /// target origin: bottom-left for `YUp`, top-left for `YDown`.
    pub fn rect(&self, r: &Rect) -> Rect {
        let y = match self.axis {
            Axis::YUp => self.y(r.y),
            Axis::YDown => self.y(r.top()),
        };
        Rect::new(self.x(r.x), y, self.length(r.width), self.length(r.height))
    }

    /// Inverse of [`Projection::rect`]
    pub fn unproject_rect(&self, r: &Rect) -> Rect {
        let width = self.unit.to_inches(r.width);
        let height = self.unit.to_inches(r.height);
        let x = self.unit.to_inches(r.x) - self.offset_x;
        let anchor = self.unit.to_inches(r.y) - self.offset_y;
        let y = match self.axis {
            Axis::YUp => anchor,
            Axis::YDown => self.page_height - anchor - height,
        };
        Rect::new(x, y, width, height)
    }

    /// Project a rectangle and snap each edge to the nearest whole unit.
    ///
    /// Returns `(left, near, right, far)` where `near` is the edge closest
    /// to the target origin (top for `YDown`). Edges snap
    /// independently so adjacent regions never gap or overlap.
    pub fn snapped_edges(&self, r: &Rect) -> (i64, i64, i64, i64) {
        let p = self.rect(r);
        (
            p.x.round() as i64,
            p.y.round() as i64,
            (p.x + p.width).round() as i64,
            (p.y + p.height).round() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Rect, b: &Rect) {
        assert!((a.x - b.x).abs() < 1e-6, "{:?} vs {:?}", a, b);
        assert!((a.y - b.y).abs() < 1e-6, "{:?} vs {:?}", a, b);
        assert!((a.width - b.width).abs() < 1e-6, "{:?} vs {:?}", a, b);
        assert!((a.height - b.height).abs() < 1e-6, "{:?} vs {:?}", a, b);
    }

    #[test]
    fn round_trips_every_unit_and_axis() {
        let source = Rect::new(0.5, 0.125, 1.75, 1.0);
        for unit in [
            Unit::Inches,
            Unit::Points,
            Unit::Pixels { dpi: 300 },
            Unit::Twips,
        ] {
            for axis in [Axis::YUp, Axis::YDown] {
                let projection = Projection::new(unit, axis, 9.25).with_offset(6.0, 0.0);
                let back = projection.unproject_rect(&projection.rect(&source));
                assert_close(&back, &source);
            }
        }
    }

    #[test]
    fn y_down_anchors_at_top_left() {
        let projection = Projection::new(Unit::Points, Axis::YDown, 10.0);
        let r = projection.rect(&Rect::new(1.0, 1.0, 2.0, 3.0));
        // Top edge at 4in from the bottom is 6in from the top
        assert_eq!(r.x, 72.0);
        assert_eq!(r.y, 432.0);
        assert_eq!(r.height, 216.0);
    }

    #[test]
    fn snapped_edges_share_boundaries() {
        let projection = Projection::new(Unit::Pixels { dpi: 300 }, Axis::YDown, 9.25);
        let left = Rect::new(0.125, 0.125, 6.0, 9.0);
        let spine = Rect::new(6.125, 0.0, 0.333, 9.25);
        let (_, _, left_right, _) = projection.snapped_edges(&left);
        let (spine_left, _, _, _) = projection.snapped_edges(&spine);
        assert_eq!(left_right, spine_left);
    }
}
