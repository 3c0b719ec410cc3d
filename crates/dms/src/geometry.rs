//! Geometry primitives used by signal extraction

use serde::{Deserialize, Serialize};

/// 2D point in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points
pub fn distance(p1: Point2, p2: Point2) -> f64 {
    (p1.x - p2.x).hypot(p1.y - p2.y)
}
