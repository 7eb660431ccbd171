//! Interior page geometry
//!
//! Interior pages get a fixed bleed and margins; only the gutter grows with
//! the page count. Pages alternate recto and verso starting with a recto.

use crate::constants::*;
use crate::legend::{self, LegendLine};
use crate::request::TemplateRequest;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Which side of a bound book a page appears on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PageSide {
    /// Right-hand page, binding edge on the left
    Recto,
    /// Left-hand page, binding edge on the right
    Verso,
}

impl PageSide {
    /// Side of the page at a zero-based index
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            PageSide::Recto
        } else {
            PageSide::Verso
        }
    }
}

/// Inside margin for a book of `page_count` pages
pub fn gutter_for_page_count(page_count: u32) -> f64 {
    match page_count {
        0..=60 => 0.5,
        61..=150 => 0.675,
        151..=400 => 0.75,
        401..=600 => 1.0,
        _ => 1.25,
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InteriorGeometry {
    pub binding_name: String,
    pub page_count: u32,
    pub trim_width: f64,
    pub trim_height: f64,
    pub bleed: f64,
    pub top: f64,
    pub bottom: f64,
    pub outside: f64,
    pub gutter: f64,
    /// Page size including bleed
    pub page_width: f64,
    pub page_height: f64,
}

/// One template page with its regions
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InteriorPage {
    pub index: usize,
    pub side: PageSide,
    pub trim: Rect,
    pub safe: Rect,
    /// Strip between the binding edge and the safe area
    pub gutter_label: Rect,
}

impl InteriorPage {
    /// One-based page number
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Derive interior geometry for a request
pub fn derive_interior_geometry(request: &TemplateRequest) -> Result<InteriorGeometry> {
    request.validate()?;

    let bleed = INTERIOR_BLEED;
    let gutter = gutter_for_page_count(request.page_count);
    let geometry = InteriorGeometry {
        binding_name: request.binding().display_name().to_string(),
        page_count: request.page_count,
        trim_width: request.trim_width,
        trim_height: request.trim_height,
        bleed,
        top: INTERIOR_MARGIN,
        bottom: INTERIOR_MARGIN,
        outside: INTERIOR_MARGIN,
        gutter,
        page_width: request.trim_width + 2.0 * bleed,
        page_height: request.trim_height + 2.0 * bleed,
    };

    if geometry.safe_width() <= EPSILON || geometry.safe_height() <= EPSILON {
        return Err(GeometryError::InvalidInput(format!(
            "Trim size {} x {} leaves no room inside the interior margins",
            request.trim_width, request.trim_height
        )));
    }

    Ok(geometry)
}

impl InteriorGeometry {
    pub fn safe_width(&self) -> f64 {
        self.trim_width - self.gutter - self.outside
    }

    pub fn safe_height(&self) -> f64 {
        self.trim_height - self.top - self.bottom
    }

    pub fn trim_rect(&self) -> Rect {
        Rect::new(self.bleed, self.bleed, self.trim_width, self.trim_height)
    }

    pub fn page(&self, index: usize) -> InteriorPage {
        let side = PageSide::for_index(index);
        let y = self.bleed + self.bottom;
        let (safe_x, gutter_x) = match side {
            PageSide::Recto => (self.bleed + self.gutter, self.bleed),
            PageSide::Verso => (
                self.bleed + self.outside,
                self.bleed + self.trim_width - self.gutter,
            ),
        };

        InteriorPage {
            index,
            side,
            trim: self.trim_rect(),
            safe: Rect::new(safe_x, y, self.safe_width(), self.safe_height()),
            gutter_label: Rect::new(gutter_x, y, self.gutter, self.safe_height()),
        }
    }

    /// Pages of the interior template
    pub fn template_pages(&self) -> Vec<InteriorPage> {
        (0..INTERIOR_TEMPLATE_PAGES).map(|i| self.page(i)).collect()
    }

    pub fn legend(&self) -> Vec<LegendLine> {
        legend::interior_lines(self)
    }
}
