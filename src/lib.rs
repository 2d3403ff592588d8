//! sankey-viz - Render two-dimension, one-metric tables as Sankey diagrams
//!
//! Each distinct dimension value becomes a node and each row a link weighted
//! by its metric. The graph is laid out into columns and painted as SVG with
//! optional node labels, styled by the host's style configuration.
//!
//! # Example
//!
//! ```rust
//! use sankey_viz::{render_to_svg, Row};
//!
//! let rows = vec![Row::new("A", "B", 5.0), Row::new("B", "C", 3.0)];
//! let svg = render_to_svg(&rows, 800.0, 600.0).unwrap();
//! assert!(svg.contains("<rect"));
//! ```
//!
//! A host drives the same pipeline through [`SankeyVisualization::on_data`],
//! which also replaces the previously attached drawing surface.

pub mod error;
pub mod types;
pub mod style;
pub mod message;
pub mod transform;
pub mod layout;
pub mod svg;
pub mod host;
pub mod viz;

pub use error::{Error, Result};
pub use types::*;
pub use message::{Message, DEFAULT_TABLE};
pub use style::{parse_style, Style, StyleElement, StyleSection};
pub use transform::transform;
pub use host::{Document, FixedViewport, Viewport};
pub use viz::SankeyVisualization;

/// Render rows to SVG with the default style (black nodes and links, no labels).
///
/// # Arguments
/// * `rows` - table rows, two dimensions and one metric each
/// * `width`, `height` - host viewport size in px
pub fn render_to_svg(rows: &[Row], width: f64, height: f64) -> Result<String> {
    let message = Message::new(rows.to_vec(), Vec::new());
    SankeyVisualization::new().render(&message, &FixedViewport::new(width, height))
}
