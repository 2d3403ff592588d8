//! Sankey layout: assigns every node a rectangle and every link a band.
//!
//! The renderer only depends on the [`SankeyLayout`] trait, so any
//! implementation producing a [`PositionedSankey`] can be substituted.
//! [`SankeyLayoutEngine`] is the built-in one.

mod engine;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::svg::{NodeGeometry, Point};
use crate::types::SankeyGraph;

pub use engine::SankeyLayoutEngine;

/// Computes node extents and link paths for a graph
pub trait SankeyLayout {
    fn layout(&self, graph: &SankeyGraph, options: &LayoutOptions) -> Result<PositionedSankey>;
}

/// Horizontal placement strategy for nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeAlign {
    /// By depth from the sources
    Left,
    /// By height above the sinks
    Right,
    /// Like `Left`, but sources are pulled next to their first target
    Center,
    /// Like `Left`, but sinks are pushed to the last column
    #[default]
    Justify,
}

/// Rectangle the diagram is laid out in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Extent {
    pub fn sized(width: f64, height: f64) -> Self {
        Self { x0: 0.0, y0: 0.0, x1: width, y1: height }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub extent: Extent,
    #[serde(default = "default_node_width")]
    pub node_width: f64,
    #[serde(default = "default_node_padding")]
    pub node_padding: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default)]
    pub align: NodeAlign,
}

fn default_node_width() -> f64 {
    NodeGeometry::WIDTH
}

fn default_node_padding() -> f64 {
    NodeGeometry::PADDING
}

fn default_iterations() -> usize {
    6
}

impl LayoutOptions {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            extent: Extent::sized(width, height),
            ..Default::default()
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            extent: Extent::sized(1.0, 1.0),
            node_width: default_node_width(),
            node_padding: default_node_padding(),
            iterations: default_iterations(),
            align: NodeAlign::default(),
        }
    }
}

/// Layout result, ready for SVG rendering
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionedSankey {
    pub nodes: Vec<PositionedNode>,
    pub links: Vec<PositionedLink>,
}

/// A node with its computed rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: Option<String>,
    pub value: f64,
    /// Longest path from any source
    pub depth: usize,
    /// Longest path to any sink
    pub height: usize,
    /// Column index
    pub layer: usize,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PositionedNode {
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

/// A link with its band width and centerline endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionedLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    pub width: f64,
    pub path: LinkPath,
}

/// Centerline of a horizontal link, from the right edge of its source node to
/// the left edge of its target node
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinkPath {
    pub source: Point,
    pub target: Point,
}

impl LinkPath {
    /// SVG path data: a cubic curve with both control points at the horizontal midpoint
    pub fn to_path_data(&self) -> String {
        let (s, t) = (self.source, self.target);
        let mx = (s.x + t.x) / 2.0;
        format!(
            "M{},{}C{},{},{},{},{},{}",
            s.x, s.y, mx, s.y, mx, t.y, t.x, t.y
        )
    }
}
