//! Shared constants for template geometry
//!
//! All lengths are in inches unless the name says otherwise.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per inch (PDF user space, IDML)
pub const POINTS_PER_INCH: f64 = 72.0;

/// Twentieths of a point per inch (word-processing page setup)
pub const TWIPS_PER_INCH: f64 = 1440.0;

/// Raster resolution used when none is configured
pub const DEFAULT_RASTER_DPI: u32 = 300;

/// Convert inches to points
#[inline]
pub fn in_to_pt(inches: f64) -> f64 {
    inches * POINTS_PER_INCH
}

/// Convert points to inches
#[inline]
pub fn pt_to_in(points: f64) -> f64 {
    points / POINTS_PER_INCH
}

/// Convert inches to whole twips
#[inline]
pub fn in_to_twips(inches: f64) -> i64 {
    (inches * TWIPS_PER_INCH).round() as i64
}

/// Convert inches to unrounded pixels
#[inline]
pub fn in_to_px(inches: f64, dpi: u32) -> f64 {
    inches * f64::from(dpi)
}

/// Snap an inch position to the nearest pixel edge
#[inline]
pub fn snap_px(inches: f64, dpi: u32) -> i64 {
    in_to_px(inches, dpi).round() as i64
}

// =============================================================================
// Cover Defaults
// =============================================================================

/// Wrap applied to case-bound covers when the request omits it
pub const DEFAULT_WRAP: f64 = 0.75;

/// Uniform safety margin for perfect-bind and saddle-stitch covers
pub const DEFAULT_SAFETY_MARGIN: f64 = 0.375;

/// Uniform safety margin for case-bound covers
pub const CASE_BIND_SAFETY_MARGIN: f64 = 0.5;

/// Softcover coil defaults
pub const COIL_SOFTCOVER_MARGIN: f64 = 0.375;
pub const COIL_SOFTCOVER_BINDING_EDGE: f64 = 0.75;

/// Hardcover coil margins are fixed
pub const COIL_HARDCOVER_MARGIN: f64 = 0.375;
pub const COIL_HARDCOVER_BINDING_EDGE: f64 = 0.625;

// =============================================================================
// Cover Marks
// =============================================================================

/// Barcode placeholder width
pub const BARCODE_WIDTH: f64 = 1.75;

/// Barcode placeholder height
pub const BARCODE_HEIGHT: f64 = 1.0;

/// Minimum spine for printable spine text, perfect bind and saddle stitch
pub const SOFTCOVER_SPINE_TEXT_MIN: f64 = 0.125;

/// Minimum spine for printable spine text, case bind
pub const HARDCOVER_SPINE_TEXT_MIN: f64 = 0.25;

/// Barcode inset from the safe corner, perfect bind (5pt)
pub const SOFTCOVER_BARCODE_INSET: f64 = 5.0 / POINTS_PER_INCH;

/// Barcode inset from the safe corner, case bind (10pt)
pub const HARDCOVER_BARCODE_INSET: f64 = 10.0 / POINTS_PER_INCH;

/// Distance from the binding trim edge to punch-hole centers
pub const PUNCH_HOLE_OFFSET: f64 = 0.375;

/// Punch-hole radius
pub const PUNCH_HOLE_RADIUS: f64 = 0.075;

/// Center-to-center punch-hole spacing
pub const PUNCH_HOLE_SPACING: f64 = 0.375;

// =============================================================================
// Labels And Legend
// =============================================================================

/// Horizontal offset of a legend column from its safe area's left edge
pub const LEGEND_COLUMN_INSET: f64 = 0.25;

/// Vertical distance between legend lines
pub const LEGEND_LINE_SPACING: f64 = 0.7;

/// Height of the logo slot above each cover label
pub const LOGO_SLOT_HEIGHT: f64 = 0.6;

/// Width of the logo slot
pub const LOGO_SLOT_WIDTH: f64 = 1.5;

/// Gap between the top of a safe area and the logo slot
pub const LOGO_SLOT_GAP: f64 = 0.25;

/// Gap between the logo slot and the cover label below it
pub const LABEL_GAP: f64 = 0.35;

// =============================================================================
// Interior
// =============================================================================

/// Interior bleed on every edge
pub const INTERIOR_BLEED: f64 = 0.125;

/// Top, bottom and outside interior margin
pub const INTERIOR_MARGIN: f64 = 0.5;

/// Page count assumed when a request leaves it out
pub const DEFAULT_PAGE_COUNT: u32 = 100;

/// Number of pages in an interior template
pub const INTERIOR_TEMPLATE_PAGES: usize = 3;
