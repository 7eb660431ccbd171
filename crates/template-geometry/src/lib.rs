//! Canonical geometry for book cover and interior templates.
//!
//! Every template format is drawn from the values computed here. Lengths
//! are inches with the origin at the bottom-left corner of each page and
//! the Y axis pointing up; format adapters convert through [`Projection`].

pub mod binding;
pub mod constants;
pub mod layout;
pub mod legend;
mod projection;
mod request;
mod types;

pub use binding::{
    BindingMethod, BindingPolicy, EdgeKind, EdgeMargins, LayoutFamily, MarginSource,
    ResolvedMargins,
};
pub use layout::{
    CoverGeometry, CoverPage, CoverSide, Coverage, InteriorGeometry, InteriorPage, PageSide,
    Region, RegionId, TextLabel, derive_cover_geometry, derive_interior_geometry,
    gutter_for_page_count,
};
pub use legend::{Indicator, LegendColumn, LegendLine};
pub use projection::{Axis, Projection, Unit};
pub use request::*;
pub use types::*;
