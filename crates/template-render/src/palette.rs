//! Colors shared by every format so proofs look alike

use template_geometry::{Indicator, RegionId};

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn to_bytes(self) -> [u8; 3] {
        let c = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [c(self.r), c(self.g), c(self.b)]
    }
}

pub const BACKGROUND: Rgb = Rgb::new(0.125, 0.294, 0.498);
pub const BLEED: Rgb = Rgb::new(0.004, 0.525, 0.522);
pub const SPINE: Rgb = Rgb::new(0.925, 0.455, 0.424);
pub const BARCODE: Rgb = Rgb::new(0.980, 0.835, 0.443);
pub const PUNCH_HOLE: Rgb = Rgb::new(0.6, 0.6, 0.6);
pub const SAFE_AREA: Rgb = Rgb::new(1.0, 1.0, 1.0);
pub const TRIM_LINE: Rgb = Rgb::new(0.2, 0.2, 0.2);
pub const TEXT: Rgb = Rgb::new(0.0, 0.0, 0.0);
pub const TEXT_MUTED: Rgb = Rgb::new(0.4, 0.4, 0.4);
/// Reference text printed on the background color
pub const TEXT_ON_BACKGROUND: Rgb = Rgb::new(1.0, 1.0, 1.0);
pub const MARGIN: Rgb = Rgb::new(0.306, 0.541, 0.843);

pub const BARCODE_OPACITY: f64 = 0.8;
pub const PUNCH_HOLE_OPACITY: f64 = 0.5;

/// Named swatches written into desktop-publishing packages
pub const SWATCHES: [(&str, Rgb); 8] = [
    ("BleedColor", BLEED),
    ("BackgroundColor", BACKGROUND),
    ("SpineColor", SPINE),
    ("SafeColor", SAFE_AREA),
    ("BarcodeColor", BARCODE),
    ("PunchHoleColor", PUNCH_HOLE),
    ("MarginColor", MARGIN),
    ("TrimColor", TRIM_LINE),
];

/// Fill for a region, or `None` for regions drawn as outlines or marks
pub fn region_fill(id: RegionId) -> Option<Rgb> {
    match id {
        RegionId::BleedArea => Some(BLEED),
        RegionId::BackgroundTrim => Some(BACKGROUND),
        RegionId::Spine => Some(SPINE),
        RegionId::LeftSafeArea | RegionId::RightSafeArea => Some(SAFE_AREA),
        RegionId::BarcodeZone => Some(BARCODE),
        RegionId::BackCoverTrim | RegionId::FrontCoverTrim | RegionId::PunchHoleZone => None,
    }
}

/// Swatch filling a region in desktop-publishing packages
pub fn region_swatch(id: RegionId) -> Option<&'static str> {
    match id {
        RegionId::BleedArea => Some("BleedColor"),
        RegionId::BackgroundTrim => Some("BackgroundColor"),
        RegionId::Spine => Some("SpineColor"),
        RegionId::LeftSafeArea | RegionId::RightSafeArea => Some("SafeColor"),
        RegionId::BarcodeZone => Some("BarcodeColor"),
        RegionId::BackCoverTrim | RegionId::FrontCoverTrim | RegionId::PunchHoleZone => None,
    }
}

pub fn indicator_color(indicator: Indicator) -> Rgb {
    match indicator {
        Indicator::Bleed | Indicator::Wrap => BLEED,
        Indicator::Safety | Indicator::Margin => MARGIN,
        Indicator::Barcode => BARCODE,
        Indicator::DocumentSize | Indicator::Trim => BACKGROUND,
        Indicator::Spine | Indicator::Gutter => SPINE,
        Indicator::PunchHole => PUNCH_HOLE,
    }
}

/// Swatch name used in desktop-publishing packages
pub fn swatch_name(indicator: Indicator) -> &'static str {
    match indicator {
        Indicator::Bleed | Indicator::Wrap => "BleedColor",
        Indicator::Safety | Indicator::Margin => "MarginColor",
        Indicator::Barcode => "BarcodeColor",
        Indicator::DocumentSize | Indicator::Trim => "BackgroundColor",
        Indicator::Spine | Indicator::Gutter => "SpineColor",
        Indicator::PunchHole => "PunchHoleColor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_match_reference_colors() {
        assert_eq!(BACKGROUND.to_bytes(), [0x20, 0x4B, 0x7F]);
        assert_eq!(BLEED.to_bytes(), [0x01, 0x86, 0x85]);
        assert_eq!(SPINE.to_bytes(), [0xEC, 0x74, 0x6C]);
        assert_eq!(PUNCH_HOLE.to_bytes(), [153, 153, 153]);
    }

    #[test]
    fn every_swatch_reference_is_defined() {
        let defined: Vec<&str> = SWATCHES.iter().map(|(name, _)| *name).collect();
        let indicators = [
            Indicator::Bleed,
            Indicator::Safety,
            Indicator::Barcode,
            Indicator::Trim,
            Indicator::Spine,
            Indicator::PunchHole,
        ];
        for indicator in indicators {
            assert!(defined.contains(&swatch_name(indicator)));
        }
        assert!(defined.contains(&"SafeColor"));
    }
}
