use std::sync::Arc;

use template_geometry::constants::DEFAULT_RASTER_DPI;
use thiserror::Error;

use crate::logo::LogoImage;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("XML error: {0}")]
    Xml(String),
    #[error("Archive error: {0}")]
    Archive(String),
    #[error("Layer error: {0}")]
    Layer(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

pub(crate) fn xml_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Xml(e.to_string())
}

/// Inputs every renderer may read besides the geometry
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Raster resolution for layered image output
    pub dpi: u32,
    /// Publisher logo placed in each logo slot
    pub logo: Option<Arc<LogoImage>>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_RASTER_DPI,
            logo: None,
        }
    }
}

/// One output format for one kind of geometry
pub trait TemplateRenderer<G>: Send + Sync {
    /// Path of the rendered file inside a template package
    fn entry_name(&self) -> &'static str;

    /// Render the document
    fn render(&self, geometry: &G, ctx: &RenderContext) -> Result<Vec<u8>>;
}
