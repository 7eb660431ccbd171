use std::path::PathBuf;

use template_geometry::GeometryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Geometry error: {0}")]
    Geometry(GeometryError),
    #[error("Failed to render {entry}: {source}")]
    Render {
        entry: String,
        #[source]
        source: template_render::RenderError,
    },
    #[error("Failed to package templates: {0}")]
    Package(#[from] template_render::RenderError),
    #[error(transparent)]
    Inspect(#[from] pdf_inspect::InspectError),
    #[error("Asset {path} could not be used: {message}")]
    Asset { path: PathBuf, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<GeometryError> for ServiceError {
    fn from(e: GeometryError) -> Self {
        match e {
            GeometryError::InvalidInput(message) => ServiceError::InvalidInput(message),
            other => ServiceError::Geometry(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
