//! Files shipped alongside generated templates

use std::path::{Path, PathBuf};
use std::sync::Arc;

use template_render::LogoImage;

use crate::config::ServiceConfig;
use crate::types::*;

/// Production guide copied into packages as `Guide/<file_name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Assets loaded once and shared read-only by every render task
#[derive(Debug, Clone, Default)]
pub struct TemplateAssets {
    pub logo: Option<Arc<LogoImage>>,
    pub guide: Option<GuideFile>,
}

impl TemplateAssets {
    /// Load the assets named by a configuration.
    ///
    /// A configured logo that cannot be read or decoded is an error. A missing
    /// guide only logs a warning and is left out of packages.
    pub async fn load(config: &ServiceConfig) -> Result<Self> {
        let logo = match config.logo_path() {
            Some(path) => Some(Arc::new(load_logo(path).await?)),
            None => None,
        };
        let guide = match config.guide_path() {
            Some(path) => load_guide(&path).await,
            None => None,
        };
        Ok(Self { logo, guide })
    }
}

async fn load_logo(path: PathBuf) -> Result<LogoImage> {
    let bytes = tokio::fs::read(&path).await.map_err(|e| ServiceError::Asset {
        path: path.clone(),
        message: e.to_string(),
    })?;

    let decoded = tokio::task::spawn_blocking(move || LogoImage::decode(&bytes)).await?;
    let logo = decoded.map_err(|e| ServiceError::Asset {
        path: path.clone(),
        message: e.to_string(),
    })?;

    log::info!(
        "Loaded logo {} ({}x{})",
        path.display(),
        logo.width(),
        logo.height()
    );
    Ok(logo)
}

async fn load_guide(path: &Path) -> Option<GuideFile> {
    let file_name = path.file_name()?.to_string_lossy().into_owned();
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            log::info!("Loaded production guide {} ({} bytes)", path.display(), bytes.len());
            Some(GuideFile { file_name, bytes })
        }
        Err(e) => {
            log::warn!(
                "Production guide {} not available, packages will omit it: {}",
                path.display(),
                e
            );
            None
        }
    }
}
