//! In-memory layer tree for a PSD document

use image::RgbaImage;
use template_geometry::{Projection, Rect};

use crate::palette::Rgb;

/// Pixel bounds on the canvas; `right` and `bottom` are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct PixelRect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl PixelRect {
    /// Project an inch rectangle, snap its edges and clip it to the canvas
    pub fn project(projection: &Projection, r: &Rect, width: u32, height: u32) -> Self {
        let (left, top, right, bottom) = projection.snapped_edges(r);
        let clip = |v: i64, max: u32| v.clamp(0, i64::from(max)) as i32;
        Self {
            top: clip(top, height),
            left: clip(left, width),
            bottom: clip(bottom, height),
            right: clip(right, width),
        }
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// What a layer paints inside its bounds
pub(crate) enum Fill {
    Solid([u8; 3]),
    /// Discs given as canvas-space `(cx, cy, radius)` in pixels
    Discs { color: [u8; 3], discs: Vec<(f64, f64, f64)> },
    /// Bitmap covering the bounds exactly
    Image(RgbaImage),
}

pub(crate) struct Layer {
    pub name: String,
    pub bounds: PixelRect,
    pub fill: Fill,
    pub opacity: u8,
    pub hidden: bool,
    pub locked: bool,
}

impl Layer {
    pub fn solid(name: impl Into<String>, bounds: PixelRect, color: Rgb) -> Self {
        Self::new(name, bounds, Fill::Solid(color.to_bytes()))
    }

    pub fn new(name: impl Into<String>, bounds: PixelRect, fill: Fill) -> Self {
        Self {
            name: name.into(),
            bounds,
            fill,
            opacity: u8::MAX,
            hidden: false,
            locked: false,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Color and coverage this layer paints at a canvas pixel
    pub fn sample(&self, x: i32, y: i32) -> Option<([u8; 3], u8)> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        match &self.fill {
            Fill::Solid(color) => Some((*color, u8::MAX)),
            Fill::Discs { color, discs } => {
                let (px, py) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
                discs
                    .iter()
                    .any(|&(cx, cy, r)| (px - cx).powi(2) + (py - cy).powi(2) <= r * r)
                    .then_some((*color, u8::MAX))
            }
            Fill::Image(image) => {
                let local_x = (x - self.bounds.left) as u32;
                let local_y = (y - self.bounds.top) as u32;
                image
                    .get_pixel_checked(local_x, local_y)
                    .map(|p| ([p.0[0], p.0[1], p.0[2]], p.0[3]))
            }
        }
    }
}

/// Layer tree; children are listed bottom to top
pub(crate) enum Node {
    Layer(Layer),
    Group {
        name: String,
        hidden: bool,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn group(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Group {
            name: name.into(),
            hidden: false,
            children,
        }
    }
}

impl From<Layer> for Node {
    fn from(layer: Layer) -> Self {
        Node::Layer(layer)
    }
}

/// Leaf layers that contribute to the flattened image, bottom to top
pub(crate) fn visible_layers(nodes: &[Node]) -> Vec<&Layer> {
    let mut out = Vec::new();
    collect_visible(nodes, &mut out);
    out
}

fn collect_visible<'a>(nodes: &'a [Node], out: &mut Vec<&'a Layer>) {
    for node in nodes {
        match node {
            Node::Layer(layer) if !layer.hidden => out.push(layer),
            Node::Layer(_) => {}
            Node::Group {
                hidden: false,
                children,
                ..
            } => collect_visible(children, out),
            Node::Group { .. } => {}
        }
    }
}

/// Ruler guide in 1/32 pixel units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Guide {
    pub vertical: bool,
    pub location: i32,
}

impl Guide {
    pub fn vertical(px: f64) -> Self {
        Self {
            vertical: true,
            location: (px * 32.0).round() as i32,
        }
    }

    pub fn horizontal(px: f64) -> Self {
        Self {
            vertical: false,
            location: (px * 32.0).round() as i32,
        }
    }
}

pub(crate) struct PsdDocument {
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
    pub guides: Vec<Guide>,
    pub nodes: Vec<Node>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use template_geometry::{Axis, Unit};

    #[test]
    fn projected_bounds_clip_to_canvas() {
        let projection = Projection::new(Unit::Pixels { dpi: 100 }, Axis::YDown, 2.0);
        let bounds = PixelRect::project(&projection, &Rect::new(-0.5, 1.0, 1.0, 2.0), 300, 200);
        assert_eq!(
            bounds,
            PixelRect {
                top: 0,
                left: 0,
                bottom: 100,
                right: 50
            }
        );
    }

    #[test]
    fn hidden_groups_drop_out_of_the_composite() {
        let bounds = PixelRect {
            top: 0,
            left: 0,
            bottom: 2,
            right: 2,
        };
        let nodes = vec![
            Node::from(Layer::solid("base", bounds, crate::palette::BLEED)),
            Node::Group {
                name: "Back".to_string(),
                hidden: true,
                children: vec![Layer::solid("back", bounds, crate::palette::SPINE).into()],
            },
        ];
        let layers = visible_layers(&nodes);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].name, "base");
    }

    #[test]
    fn discs_cover_only_their_pixels() {
        let bounds = PixelRect {
            top: 0,
            left: 0,
            bottom: 10,
            right: 10,
        };
        let layer = Layer::new(
            "holes",
            bounds,
            Fill::Discs {
                color: [1, 2, 3],
                discs: vec![(5.0, 5.0, 2.0)],
            },
        );
        assert_eq!(layer.sample(4, 4), Some(([1, 2, 3], 255)));
        assert_eq!(layer.sample(0, 0), None);
        assert_eq!(layer.sample(20, 20), None);
    }
}
