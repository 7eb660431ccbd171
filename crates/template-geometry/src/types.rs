use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GeometryError>;

/// Tolerance used when comparing derived lengths
pub const EPSILON: f64 = 1e-9;

/// A point in inches
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Shrink the rectangle by a different amount on each edge
    pub fn inset_edges(&self, left: f64, bottom: f64, right: f64, top: f64) -> Rect {
        Rect {
            x: self.x + left,
            y: self.y + bottom,
            width: self.width - left - right,
            height: self.height - bottom - top,
        }
    }

    pub fn inset(&self, amount: f64) -> Rect {
        self.inset_edges(amount, amount, amount, amount)
    }

    /// True when `other` lies within this rectangle (edges may touch)
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.top() <= self.top() + EPSILON
    }

    pub fn is_empty(&self) -> bool {
        self.width <= EPSILON || self.height <= EPSILON
    }

    /// Largest rectangle with the given aspect ratio centered inside this one
    pub fn fit_aspect(&self, aspect: f64) -> Rect {
        if aspect <= 0.0 || !aspect.is_finite() {
            return *self;
        }
        let (width, height) = if self.width / self.height > aspect {
            (self.height * aspect, self.height)
        } else {
            (self.width, self.width / aspect)
        };
        Rect::new(
            self.center_x() - width / 2.0,
            self.center_y() - height / 2.0,
            width,
            height,
        )
    }
}

/// Circle given by its center and radius, in inches
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl Circle {
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.cx - self.radius,
            self.cy - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}
