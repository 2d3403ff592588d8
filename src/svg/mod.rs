//! SVG renderer - paints a laid-out Sankey diagram as an SVG string.
//!
//! Pure string building, no DOM manipulation.

mod types;
mod renderer;
mod theme;
mod styles;

pub use types::*;
pub use renderer::{escape_xml, render_sankey_svg, SvgSurface};
pub use theme::{LabelStyle, SankeyTheme};
pub use styles::*;
