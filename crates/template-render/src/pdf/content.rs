//! Content stream operators for cover pages
//!
//! Coordinates are PDF points with the origin at the bottom-left.

use template_geometry::Rect;

use crate::palette::Rgb;

/// Bezier control point factor for approximating circles
pub(crate) const BEZIER_CIRCLE_FACTOR: f64 = 0.552284749831;

/// Average Helvetica glyph width as a fraction of the font size
pub(crate) const HELVETICA_CHAR_WIDTH_RATIO: f64 = 0.5;

/// Line width for trim outlines
const TRIM_LINE_WIDTH: f64 = 0.5;

#[derive(Default)]
pub(crate) struct ContentOps {
    ops: String,
}

impl ContentOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self) {
        self.ops.push_str("q\n");
    }

    pub fn restore(&mut self) {
        self.ops.push_str("Q\n");
    }

    /// Select a named graphics state from the page resources
    pub fn graphics_state(&mut self, name: &str) {
        self.ops.push_str(&format!("/{} gs\n", name));
    }

    pub fn fill_color(&mut self, c: Rgb) {
        self.ops
            .push_str(&format!("{:.3} {:.3} {:.3} rg\n", c.r, c.g, c.b));
    }

    pub fn stroke_color(&mut self, c: Rgb) {
        self.ops
            .push_str(&format!("{:.3} {:.3} {:.3} RG\n", c.r, c.g, c.b));
    }

    pub fn fill_rect(&mut self, r: &Rect) {
        self.ops.push_str(&format!(
            "{:.3} {:.3} {:.3} {:.3} re f\n",
            r.x, r.y, r.width, r.height
        ));
    }

    /// Dashed outline, as used for fold and trim lines
    pub fn dashed_rect(&mut self, r: &Rect) {
        self.ops.push_str(&format!("{} w\n", TRIM_LINE_WIDTH));
        self.ops.push_str("[6 3] 0 d\n");
        self.ops.push_str(&format!(
            "{:.3} {:.3} {:.3} {:.3} re S\n",
            r.x, r.y, r.width, r.height
        ));
        self.ops.push_str("[] 0 d\n");
    }

    /// Filled circle from four Bezier arcs
    pub fn fill_circle(&mut self, cx: f64, cy: f64, r: f64) {
        let k = r * BEZIER_CIRCLE_FACTOR;
        self.ops.push_str(&format!("{:.3} {:.3} m\n", cx + r, cy));
        let arcs = [
            (cx + r, cy + k, cx + k, cy + r, cx, cy + r),
            (cx - k, cy + r, cx - r, cy + k, cx - r, cy),
            (cx - r, cy - k, cx - k, cy - r, cx, cy - r),
            (cx + k, cy - r, cx + r, cy - k, cx + r, cy),
        ];
        for (x1, y1, x2, y2, x3, y3) in arcs {
            self.ops.push_str(&format!(
                "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c\n",
                x1, y1, x2, y2, x3, y3
            ));
        }
        self.ops.push_str("f\n");
    }

    pub fn text(&mut self, font: &str, size: f64, x: f64, y: f64, text: &str) {
        self.ops.push_str(&format!(
            "BT /{} {} Tf {:.3} {:.3} Td ({}) Tj ET\n",
            font,
            size,
            x,
            y,
            escape_text(text)
        ));
    }

    /// Text centered on a point, rotated counter-clockwise by `degrees`
    pub fn centered_text(&mut self, font: &str, size: f64, cx: f64, cy: f64, degrees: f64, text: &str) {
        let half_width = approx_text_width(text, size) / 2.0;
        // Baseline sits a third of the font size below the visual center
        let drop = size / 3.0;
        let (sin, cos) = degrees.to_radians().sin_cos();
        let x = cx - half_width * cos + drop * sin;
        let y = cy - half_width * sin - drop * cos;
        self.ops.push_str(&format!(
            "BT /{} {} Tf {:.4} {:.4} {:.4} {:.4} {:.3} {:.3} Tm ({}) Tj ET\n",
            font,
            size,
            cos,
            sin,
            -sin,
            cos,
            x,
            y,
            escape_text(text)
        ));
    }

    /// Paint an image XObject into a rectangle
    pub fn image(&mut self, name: &str, r: &Rect) {
        self.ops.push_str(&format!(
            "q {:.3} 0 0 {:.3} {:.3} {:.3} cm /{} Do Q\n",
            r.width, r.height, r.x, r.y, name
        ));
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.ops.into_bytes()
    }
}

pub(crate) fn approx_text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * HELVETICA_CHAR_WIDTH_RATIO
}

/// Escape a string for a PDF literal. Characters outside printable ASCII
/// become `?` since the standard fonts are used without an encoding map.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_delimiters() {
        assert_eq!(escape_text("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape_text("0.375\" punch"), "0.375\" punch");
        assert_eq!(escape_text("caf\u{e9}"), "caf?");
    }

    #[test]
    fn circle_is_closed_path_fill() {
        let mut ops = ContentOps::new();
        ops.fill_circle(10.0, 10.0, 5.0);
        let text = String::from_utf8(ops.into_bytes()).unwrap();
        assert!(text.starts_with("15.000 10.000 m"));
        assert_eq!(text.matches(" c\n").count(), 4);
        assert!(text.ends_with("f\n"));
    }
}
