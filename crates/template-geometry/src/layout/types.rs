//! Layout data types shared by every cover variant

use crate::binding::{BindingMethod, EdgeKind, EdgeMargins};
use crate::legend::LegendColumn;
use crate::types::{Circle, Point, Rect};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Named region on a cover page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum RegionId {
    /// Whole canvas including bleed or wrap
    BleedArea,
    /// Trimmed area of the cover
    BackgroundTrim,
    Spine,
    BackCoverTrim,
    FrontCoverTrim,
    /// Safe content area of the back cover (left panel of a spread)
    LeftSafeArea,
    /// Safe content area of the front cover (right panel of a spread)
    RightSafeArea,
    BarcodeZone,
    /// Strip holding the punch holes of a coil page
    PunchHoleZone,
}

impl RegionId {
    pub fn name(self) -> &'static str {
        match self {
            RegionId::BleedArea => "bleedArea",
            RegionId::BackgroundTrim => "backgroundTrim",
            RegionId::Spine => "spine",
            RegionId::BackCoverTrim => "backCoverTrim",
            RegionId::FrontCoverTrim => "frontCoverTrim",
            RegionId::LeftSafeArea => "leftSafeArea",
            RegionId::RightSafeArea => "rightSafeArea",
            RegionId::BarcodeZone => "barcodeZone",
            RegionId::PunchHoleZone => "punchHoleZone",
        }
    }

    pub fn is_safe_area(self) -> bool {
        matches!(self, RegionId::LeftSafeArea | RegionId::RightSafeArea)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Region {
    pub id: RegionId,
    pub rect: Rect,
}

impl Region {
    pub fn new(id: RegionId, rect: Rect) -> Self {
        Self { id, rect }
    }
}

/// Which part of the book a cover page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum CoverSide {
    /// Back cover, spine and front cover on one page
    Spread,
    Front,
    Back,
}

impl CoverSide {
    pub fn title(self) -> &'static str {
        match self {
            CoverSide::Spread => "Cover",
            CoverSide::Front => "Front Cover",
            CoverSide::Back => "Back Cover",
        }
    }
}

/// Short text placed on the cover for orientation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TextLabel {
    pub text: String,
    pub center: Point,
    /// Counter-clockwise rotation in degrees
    pub rotation: f64,
}

impl TextLabel {
    pub fn new(text: impl Into<String>, center: Point) -> Self {
        Self {
            text: text.into(),
            center,
            rotation: 0.0,
        }
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }
}

/// One page of a cover template
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CoverPage {
    pub side: CoverSide,
    pub width: f64,
    pub height: f64,
    /// Regions in paint order, back to front
    pub regions: Vec<Region>,
    pub punch_holes: Vec<Circle>,
    pub labels: Vec<TextLabel>,
    /// Boxes reserved for the publisher logo
    pub logo_slots: Vec<Rect>,
    pub legend: Vec<LegendColumn>,
}

impl CoverPage {
    pub(crate) fn new(side: CoverSide, width: f64, height: f64) -> Self {
        Self {
            side,
            width,
            height,
            regions: Vec::new(),
            punch_holes: Vec::new(),
            labels: Vec::new(),
            logo_slots: Vec::new(),
            legend: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, id: RegionId, rect: Rect) {
        self.regions.push(Region::new(id, rect));
    }

    pub fn region(&self, id: RegionId) -> Option<Rect> {
        self.regions.iter().find(|r| r.id == id).map(|r| r.rect)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Trimmed area of the page, or the whole page when it has none
    pub fn trim_box(&self) -> Rect {
        self.region(RegionId::BackgroundTrim)
            .unwrap_or_else(|| self.bounds())
    }

    /// Each safe area paired with the trim rectangle that encloses it
    pub fn safe_areas(&self) -> Vec<(RegionId, Rect, Rect)> {
        let mut pairs = Vec::new();
        for region in self.regions.iter().filter(|r| r.id.is_safe_area()) {
            let trim_id = match (self.side, region.id) {
                (CoverSide::Spread, RegionId::LeftSafeArea) | (CoverSide::Back, _) => {
                    RegionId::BackCoverTrim
                }
                _ => RegionId::FrontCoverTrim,
            };
            if let Some(trim) = self.region(trim_id) {
                pairs.push((region.id, region.rect, trim));
            }
        }
        pairs
    }
}

/// Whether the layout engine knows the binding
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Coverage {
    Supported,
    /// Placeholder geometry: one blank trim-sized page
    Unsupported { binding_name: String },
}

/// Cover layout derived from a request, shared read-only by every renderer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CoverGeometry {
    pub binding: BindingMethod,
    pub coverage: Coverage,
    pub book_title: Option<String>,
    pub page_count: u32,
    pub paper_stock: String,

    pub trim_width: f64,
    pub trim_height: f64,
    /// Panel beside the spine: trim size, or board size for case binding
    pub panel_width: f64,
    pub panel_height: f64,

    pub edge_kind: EdgeKind,
    /// Bleed or wrap allowance
    pub edge: f64,
    pub spine_width: f64,
    pub safety: EdgeMargins,

    /// Size of one output page (the spread, or one coil page)
    pub total_width: f64,
    pub total_height: f64,
    pub left_spine_fold_x: Option<f64>,
    pub right_spine_fold_x: Option<f64>,
    pub spine_label_drawable: bool,

    pub pages: Vec<CoverPage>,
}

impl CoverGeometry {
    pub fn is_supported(&self) -> bool {
        self.coverage == Coverage::Supported
    }

    pub fn page(&self, side: CoverSide) -> Option<&CoverPage> {
        self.pages.iter().find(|p| p.side == side)
    }

    /// First occurrence of a region across all pages
    pub fn region(&self, id: RegionId) -> Option<Rect> {
        self.pages.iter().find_map(|p| p.region(id))
    }

    pub fn barcode_zone(&self) -> Option<Rect> {
        self.region(RegionId::BarcodeZone)
    }
}
