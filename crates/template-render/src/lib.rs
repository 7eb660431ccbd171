//! Format renderers for cover and interior templates.
//!
//! Each renderer turns shared, read-only geometry into the bytes of one
//! document. Renderers convert units and flip axes through
//! [`template_geometry::Projection`] and never derive geometry themselves.

pub mod container;
pub mod docx;
pub mod idml;
mod logo;
pub mod palette;
pub mod pdf;
pub mod psd;
mod types;
mod xml;

pub use docx::InteriorDocx;
pub use idml::{CoverIdml, InteriorIdml};
pub use logo::LogoImage;
pub use pdf::{CoverPdf, InteriorPdf};
pub use psd::CoverPsd;
pub use types::*;
