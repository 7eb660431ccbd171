//! IDML desktop-publishing packages
//!
//! Documents are written part by part rather than patched from a stored
//! template, so every frame is positioned from the shared geometry.

mod cover;
mod interior;
mod package;

pub use cover::CoverIdml;
pub use interior::InteriorIdml;
pub use package::MIMETYPE;
