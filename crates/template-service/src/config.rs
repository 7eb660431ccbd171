use std::path::PathBuf;
use std::time::Duration;

use template_geometry::constants::DEFAULT_RASTER_DPI;

use crate::types::*;

/// Highest raster resolution accepted for layered output
pub const MAX_RASTER_DPI: u32 = 1200;

/// Settings shared by every request a service handles
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ServiceConfig {
    /// Directory the logo and guide files are resolved against
    pub assets_dir: PathBuf,
    /// Publisher logo placed on covers
    pub logo_file: Option<String>,
    /// Production guide copied into every package under `Guide/`
    pub guide_file: Option<String>,
    pub raster_dpi: u32,
    /// Timeout for remote PDF inspection
    pub fetch_timeout_secs: u64,
    /// Deflate archive entries instead of storing them
    pub compress_archive: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            logo_file: None,
            guide_file: None,
            raster_dpi: DEFAULT_RASTER_DPI,
            fetch_timeout_secs: 30,
            compress_archive: true,
        }
    }
}

impl ServiceConfig {
    /// Load a configuration from a JSON file; omitted fields keep their defaults
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ServiceError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.raster_dpi == 0 || self.raster_dpi > MAX_RASTER_DPI {
            return Err(ServiceError::Config(format!(
                "rasterDpi must be between 1 and {}, got {}",
                MAX_RASTER_DPI, self.raster_dpi
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ServiceError::Config(
                "fetchTimeoutSecs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn logo_path(&self) -> Option<PathBuf> {
        self.logo_file.as_ref().map(|f| self.assets_dir.join(f))
    }

    pub fn guide_path(&self) -> Option<PathBuf> {
        self.guide_file.as_ref().map(|f| self.assets_dir.join(f))
    }
}
