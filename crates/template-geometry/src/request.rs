use crate::binding::BindingMethod;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which parts of a template package to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PackageScope {
    Cover,
    Interior,
    #[default]
    All,
}

impl PackageScope {
    pub fn includes_cover(self) -> bool {
        matches!(self, PackageScope::Cover | PackageScope::All)
    }

    pub fn includes_interior(self) -> bool {
        matches!(self, PackageScope::Interior | PackageScope::All)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PackageScope::Cover => "cover",
            PackageScope::Interior => "interior",
            PackageScope::All => "all",
        }
    }
}

/// Physical book description submitted for template generation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TemplateRequest {
    // What to build
    #[cfg_attr(feature = "serde", serde(default))]
    pub package_type: PackageScope,
    pub binding_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub book_title: Option<String>,

    // Book block
    #[cfg_attr(feature = "serde", serde(default = "default_page_count"))]
    pub page_count: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub paper_stock: String,
    pub trim_width: f64,
    pub trim_height: f64,

    // Cover allowances
    #[cfg_attr(feature = "serde", serde(default))]
    pub spine_width: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bleed: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub wrap_amount: Option<f64>,

    // Safety margins
    #[cfg_attr(feature = "serde", serde(default))]
    pub safety_margin: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub safety_margin_top_bottom: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub safety_margin_binding_edge: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub safety_margin_outside_edge: Option<f64>,

    // Hardcover details
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_hardcover_coil_wire: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub board_width: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub board_height: Option<f64>,
}

#[cfg(feature = "serde")]
fn default_page_count() -> u32 {
    crate::constants::DEFAULT_PAGE_COUNT
}

impl Default for TemplateRequest {
    fn default() -> Self {
        Self {
            package_type: PackageScope::All,
            binding_name: BindingMethod::PerfectBind.display_name().to_string(),
            book_title: None,
            page_count: 200,
            paper_stock: "60# White".to_string(),
            trim_width: 6.0,
            trim_height: 9.0,
            spine_width: Some(0.5),
            bleed: Some(0.125),
            wrap_amount: None,
            safety_margin: Some(0.375),
            safety_margin_top_bottom: None,
            safety_margin_binding_edge: None,
            safety_margin_outside_edge: None,
            is_hardcover_coil_wire: None,
            board_width: None,
            board_height: None,
        }
    }
}

impl TemplateRequest {
    /// Load a request from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let request = serde_json::from_slice(&bytes)
            .map_err(|e| GeometryError::Config(format!("Failed to parse request: {}", e)))?;
        Ok(request)
    }

    /// Save a request to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| GeometryError::Config(format!("Failed to serialize request: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Binding method named by the request
    pub fn binding(&self) -> BindingMethod {
        BindingMethod::from_name(&self.binding_name, self.is_hardcover_coil_wire)
    }

    /// Reject dimensions no layout can be derived from
    pub fn validate(&self) -> Result<()> {
        require_positive("trimWidth", self.trim_width)?;
        require_positive("trimHeight", self.trim_height)?;

        let optional = [
            ("spineWidth", self.spine_width),
            ("bleed", self.bleed),
            ("wrapAmount", self.wrap_amount),
            ("safetyMargin", self.safety_margin),
            ("safetyMarginTopBottom", self.safety_margin_top_bottom),
            ("safetyMarginBindingEdge", self.safety_margin_binding_edge),
            ("safetyMarginOutsideEdge", self.safety_margin_outside_edge),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                require_non_negative(name, value)?;
            }
        }

        for (name, value) in [("boardWidth", self.board_width), ("boardHeight", self.board_height)]
        {
            if let Some(value) = value {
                require_positive(name, value)?;
            }
        }

        Ok(())
    }

    /// Archive file name for this request
    ///
    /// Spaces and slashes are dropped from the binding name.
    pub fn archive_name(&self) -> String {
        let binding: String = self
            .binding_name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect();
        format!("Template_{}_{}.zip", binding, self.package_type.as_str())
    }
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GeometryError::InvalidInput(format!(
            "{} must be a positive number of inches, got {}",
            name, value
        )));
    }
    Ok(())
}

fn require_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(GeometryError::InvalidInput(format!(
            "{} must be zero or a positive number of inches, got {}",
            name, value
        )));
    }
    Ok(())
}
