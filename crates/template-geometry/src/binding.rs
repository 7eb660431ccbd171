//! Binding methods and the policy record each one carries
//!
//! Every default for an omitted request field is resolved here, once,
//! before any layout is derived.

use crate::constants::*;
use crate::request::TemplateRequest;
use crate::types::EPSILON;

/// Binding methods understood by the layout engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingMethod {
    /// Glued spine, softcover spread
    PerfectBind,
    /// Stapled spine, laid out like a perfect-bind spread
    SaddleStitch,
    /// Board-wrapped hardcover spread
    CaseBind,
    /// Two independent softcover pages punched for a coil
    CoilWireOSoftcover,
    /// Two independent wrapped board pages punched for a coil
    CoilWireOHardcover,
    /// Any name the engine has no layout for
    Unsupported(String),
}

impl BindingMethod {
    /// Resolve a binding name from a request.
    ///
    /// Matching ignores case, spacing and punctuation. A generic coil name
    /// ("Coil / Wire-O") picks hardcover or softcover from `hardcover`.
    pub fn from_name(name: &str, hardcover: Option<bool>) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "perfectbind" | "perfectbinding" | "perfectbindsoftcover" | "perfect" => {
                BindingMethod::PerfectBind
            }
            "saddlestitch" | "saddlestitched" | "saddle" => BindingMethod::SaddleStitch,
            "casebind" | "casebinding" | "casebindhardcover" | "hardcover" | "case" => {
                BindingMethod::CaseBind
            }
            "coilwireosoftcover" | "coilsoftcover" | "wireosoftcover" => {
                BindingMethod::CoilWireOSoftcover
            }
            "coilwireohardcover" | "coilhardcover" | "wireohardcover" => {
                BindingMethod::CoilWireOHardcover
            }
            "coilwireo" | "coil" | "wireo" | "spiral" => {
                if hardcover.unwrap_or(false) {
                    BindingMethod::CoilWireOHardcover
                } else {
                    BindingMethod::CoilWireOSoftcover
                }
            }
            _ => BindingMethod::Unsupported(name.trim().to_string()),
        }
    }

    /// Human-readable name used in legends, summaries and archive names
    pub fn display_name(&self) -> &str {
        match self {
            BindingMethod::PerfectBind => "Perfect Bind / Softcover",
            BindingMethod::SaddleStitch => "Saddle Stitch",
            BindingMethod::CaseBind => "Case Bind / Hardcover",
            BindingMethod::CoilWireOSoftcover => "Coil / Wire-O Softcover",
            BindingMethod::CoilWireOHardcover => "Coil / Wire-O Hardcover",
            BindingMethod::Unsupported(name) => name,
        }
    }

    /// Policy record, or `None` when the layout engine has no variant for it
    pub fn policy(&self) -> Option<&'static BindingPolicy> {
        match self {
            BindingMethod::PerfectBind | BindingMethod::SaddleStitch => Some(&PERFECT_BIND_POLICY),
            BindingMethod::CaseBind => Some(&CASE_BIND_POLICY),
            BindingMethod::CoilWireOSoftcover => Some(&COIL_SOFTCOVER_POLICY),
            BindingMethod::CoilWireOHardcover => Some(&COIL_HARDCOVER_POLICY),
            BindingMethod::Unsupported(_) => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.policy().is_some()
    }
}

impl std::fmt::Display for BindingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What surrounds the trim on a cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Printed past the trim and cut off
    Bleed,
    /// Folded around a board
    Wrap,
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::Bleed => "Bleed",
            EdgeKind::Wrap => "Wrap",
        }
    }
}

/// How the cover pages are arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFamily {
    /// Back cover, spine and front cover on one canvas
    Spread,
    /// Front and back as separate single pages
    CoilPages,
}

/// Safety margins, one per edge of a cover panel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeMargins {
    pub top: f64,
    pub bottom: f64,
    /// Edge nearest the spine or coil
    pub binding: f64,
    pub outside: f64,
}

impl EdgeMargins {
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            bottom: value,
            binding: value,
            outside: value,
        }
    }
}

/// Which request fields feed the safety margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginSource {
    /// `safetyMargin`, or the default, on every edge
    Uniform(f64),
    /// Per-edge fields, falling back to `safetyMargin`, then to the defaults
    PerEdge(EdgeMargins),
    /// The request cannot change them
    Fixed(EdgeMargins),
}

/// Layout rules attached to a binding method
#[derive(Debug, Clone, PartialEq)]
pub struct BindingPolicy {
    pub family: LayoutFamily,
    pub edge_kind: EdgeKind,
    /// Edge allowance when `bleed` / `wrapAmount` is omitted
    pub default_edge: f64,
    pub margins: MarginSource,
    /// Whether a spine exists at all
    pub has_spine: bool,
    /// Smallest spine that may carry text
    pub spine_text_min: Option<f64>,
    /// Inset of the barcode from the corner of its safe area
    pub barcode_inset: f64,
    /// Legend text shown when the spine is too narrow for text
    pub spine_warning: &'static str,
    /// Panels sized from `boardWidth` / `boardHeight` when present
    pub uses_board_panels: bool,
}

pub static PERFECT_BIND_POLICY: BindingPolicy = BindingPolicy {
    family: LayoutFamily::Spread,
    edge_kind: EdgeKind::Bleed,
    default_edge: 0.0,
    margins: MarginSource::Uniform(DEFAULT_SAFETY_MARGIN),
    has_spine: true,
    spine_text_min: Some(SOFTCOVER_SPINE_TEXT_MIN),
    barcode_inset: SOFTCOVER_BARCODE_INSET,
    spine_warning: "(Do not add text on Spine if it's below 0.125\")",
    uses_board_panels: false,
};

pub static CASE_BIND_POLICY: BindingPolicy = BindingPolicy {
    family: LayoutFamily::Spread,
    edge_kind: EdgeKind::Wrap,
    default_edge: DEFAULT_WRAP,
    margins: MarginSource::Uniform(CASE_BIND_SAFETY_MARGIN),
    has_spine: true,
    spine_text_min: Some(HARDCOVER_SPINE_TEXT_MIN),
    barcode_inset: HARDCOVER_BARCODE_INSET,
    spine_warning: "(Spine text not recommended if below 0.25\")",
    uses_board_panels: true,
};

pub static COIL_SOFTCOVER_POLICY: BindingPolicy = BindingPolicy {
    family: LayoutFamily::CoilPages,
    edge_kind: EdgeKind::Bleed,
    default_edge: 0.0,
    margins: MarginSource::PerEdge(EdgeMargins {
        top: COIL_SOFTCOVER_MARGIN,
        bottom: COIL_SOFTCOVER_MARGIN,
        binding: COIL_SOFTCOVER_BINDING_EDGE,
        outside: COIL_SOFTCOVER_MARGIN,
    }),
    has_spine: false,
    spine_text_min: None,
    barcode_inset: 0.0,
    spine_warning: "",
    uses_board_panels: false,
};

pub static COIL_HARDCOVER_POLICY: BindingPolicy = BindingPolicy {
    family: LayoutFamily::CoilPages,
    edge_kind: EdgeKind::Wrap,
    default_edge: 0.0,
    margins: MarginSource::Fixed(EdgeMargins {
        top: COIL_HARDCOVER_MARGIN,
        bottom: COIL_HARDCOVER_MARGIN,
        binding: COIL_HARDCOVER_BINDING_EDGE,
        outside: COIL_HARDCOVER_MARGIN,
    }),
    has_spine: false,
    spine_text_min: None,
    barcode_inset: 0.0,
    spine_warning: "",
    uses_board_panels: false,
};

/// Request values after the policy defaults have been applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMargins {
    /// Bleed or wrap allowance
    pub edge: f64,
    pub spine: f64,
    pub safety: EdgeMargins,
    /// Panel size on each side of the spine
    pub panel_width: f64,
    pub panel_height: f64,
}

impl BindingPolicy {
    /// Apply this policy's defaults to a request
    pub fn resolve(&self, request: &TemplateRequest) -> ResolvedMargins {
        let edge = match self.edge_kind {
            EdgeKind::Bleed => request.bleed,
            EdgeKind::Wrap => request.wrap_amount,
        }
        .unwrap_or(self.default_edge);

        let spine = if self.has_spine {
            request.spine_width.unwrap_or(0.0)
        } else {
            0.0
        };

        let safety = match self.margins {
            MarginSource::Uniform(default) => {
                EdgeMargins::uniform(request.safety_margin.unwrap_or(default))
            }
            MarginSource::PerEdge(defaults) => {
                let legacy = request.safety_margin;
                let top_bottom = request
                    .safety_margin_top_bottom
                    .or(legacy)
                    .unwrap_or(defaults.top);
                EdgeMargins {
                    top: top_bottom,
                    bottom: top_bottom,
                    binding: request
                        .safety_margin_binding_edge
                        .unwrap_or(defaults.binding),
                    outside: request
                        .safety_margin_outside_edge
                        .or(legacy)
                        .unwrap_or(defaults.outside),
                }
            }
            MarginSource::Fixed(margins) => margins,
        };

        let (panel_width, panel_height) = if self.uses_board_panels {
            (
                request.board_width.unwrap_or(request.trim_width),
                request.board_height.unwrap_or(request.trim_height),
            )
        } else {
            (request.trim_width, request.trim_height)
        };

        ResolvedMargins {
            edge,
            spine,
            safety,
            panel_width,
            panel_height,
        }
    }

    /// Whether the spine is wide enough for text under this policy
    pub fn spine_text_allowed(&self, spine: f64) -> bool {
        self.spine_text_min
            .is_some_and(|min| spine + EPSILON >= min)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Serialize};

    impl Serialize for BindingMethod {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(self.display_name())
        }
    }

    impl<'de> Deserialize<'de> for BindingMethod {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Ok(BindingMethod::from_name(&s, None))
        }
    }

    impl Serialize for EdgeKind {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(match self {
                EdgeKind::Bleed => "bleed",
                EdgeKind::Wrap => "wrap",
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_ignore_case_and_punctuation() {
        assert_eq!(
            BindingMethod::from_name("Perfect Bind / Softcover", None),
            BindingMethod::PerfectBind
        );
        assert_eq!(
            BindingMethod::from_name("saddle-stitch", None),
            BindingMethod::SaddleStitch
        );
        assert_eq!(
            BindingMethod::from_name("CASE BIND", None),
            BindingMethod::CaseBind
        );
    }

    #[test]
    fn generic_coil_uses_hardcover_flag() {
        assert_eq!(
            BindingMethod::from_name("Coil / Wire-O", Some(true)),
            BindingMethod::CoilWireOHardcover
        );
        assert_eq!(
            BindingMethod::from_name("Coil / Wire-O", None),
            BindingMethod::CoilWireOSoftcover
        );
        // An explicit variant wins over the flag
        assert_eq!(
            BindingMethod::from_name("Coil / Wire-O Softcover", Some(true)),
            BindingMethod::CoilWireOSoftcover
        );
    }

    #[test]
    fn unknown_names_are_kept() {
        let method = BindingMethod::from_name(" Lay-Flat ", None);
        assert_eq!(method, BindingMethod::Unsupported("Lay-Flat".to_string()));
        assert!(method.policy().is_none());
        assert_eq!(method.display_name(), "Lay-Flat");
    }

    #[test]
    fn spine_thresholds_differ_per_policy() {
        assert!(PERFECT_BIND_POLICY.spine_text_allowed(0.125));
        assert!(!PERFECT_BIND_POLICY.spine_text_allowed(0.124));
        assert!(CASE_BIND_POLICY.spine_text_allowed(0.25));
        assert!(!CASE_BIND_POLICY.spine_text_allowed(0.249));
        assert!(!COIL_SOFTCOVER_POLICY.spine_text_allowed(2.0));
    }
}
