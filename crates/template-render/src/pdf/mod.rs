//! PDF renderers
//!
//! Covers are assembled object by object with `lopdf` so every page can
//! carry its own bleed and trim boxes. Interior templates are plain pages
//! built with `printpdf`.

mod content;
mod cover;
mod interior;

pub use cover::{CoverPdf, build_cover_document};
pub use interior::InteriorPdf;
pub(crate) use content::{BEZIER_CIRCLE_FACTOR, approx_text_width};
