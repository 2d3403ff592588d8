//! Fixed geometry and styling constants.

/// Space kept free around the diagram inside the canvas (in px)
pub struct Margin;

impl Margin {
    pub const LEFT: f64 = 20.0;
    pub const RIGHT: f64 = 50.0;
    pub const TOP: f64 = 20.0;
    pub const BOTTOM: f64 = 20.0;
}

/// Subtracted from both viewport dimensions to get the canvas size
pub const CANVAS_INSET: f64 = 20.0;

/// Node rectangle sizing handed to the layout
pub struct NodeGeometry;

impl NodeGeometry {
    /// Horizontal thickness of every node
    pub const WIDTH: f64 = 15.0;
    /// Minimum vertical gap between nodes in a column
    pub const PADDING: f64 = 10.0;
}

/// Offset of the whole canvas within the host page
pub const CANVAS_TRANSLATE: (f64, f64) = (30.0, 30.0);

/// Vertical shift applied to each drawing layer (nodes, links, labels)
pub const LAYER_SHIFT_Y: f64 = 10.0;

/// Fill and stroke used when no colour is configured
pub const FALLBACK_COLOR: &str = "black";

/// Vertical shift applied to all text elements for font-agnostic centering.
/// Using 0.35em ensures it scales with font size.
pub const TEXT_BASELINE_SHIFT: &str = "0.35em";
