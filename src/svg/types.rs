//! Geometry shared by the layout output and the SVG renderer.

use serde::{Deserialize, Serialize};

/// A 2D point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Drawing surface size: the host viewport minus [`CANVAS_INSET`](super::CANVAS_INSET)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn from_viewport(width: f64, height: f64) -> Self {
        Self {
            width: width - super::CANVAS_INSET,
            height: height - super::CANVAS_INSET,
        }
    }

    /// Width and height left for the diagram once the margins are taken off
    pub fn inner_size(&self) -> (f64, f64) {
        (
            self.width - super::Margin::LEFT - super::Margin::RIGHT,
            self.height - super::Margin::TOP - super::Margin::BOTTOM,
        )
    }

    /// Nodes left of this x get their label on the right, and vice versa
    pub fn midpoint(&self) -> f64 {
        self.width / 2.0
    }
}
