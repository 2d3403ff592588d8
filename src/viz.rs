//! The data-update handler: one transform-and-render cycle per message.

use log::{debug, warn};

use crate::error::Result;
use crate::host::{Document, ElementKind, Viewport};
use crate::layout::{Extent, LayoutOptions, NodeAlign, SankeyLayout, SankeyLayoutEngine};
use crate::message::Message;
use crate::style::Style;
use crate::svg::{Canvas, LabelStyle, NodeGeometry, SankeyTheme, SvgSurface};
use crate::transform::transform;
use crate::types::SankeyGraph;

/// Sankey visualization bound to a layout implementation.
///
/// Holds no state between messages; the document passed to
/// [`on_data`](Self::on_data) is the only thing it mutates. A failed cycle
/// only affects that cycle's surface; the next message renders normally.
pub struct SankeyVisualization {
    layout: Box<dyn SankeyLayout>,
    iterations: usize,
    align: NodeAlign,
}

impl Default for SankeyVisualization {
    fn default() -> Self {
        Self::new()
    }
}

impl SankeyVisualization {
    pub fn new() -> Self {
        Self::with_layout(SankeyLayoutEngine)
    }

    pub fn with_layout(layout: impl SankeyLayout + 'static) -> Self {
        let defaults = LayoutOptions::default();
        Self {
            layout: Box::new(layout),
            iterations: defaults.iterations,
            align: defaults.align,
        }
    }

    pub fn align(mut self, align: NodeAlign) -> Self {
        self.align = align;
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Layout options for a canvas, with the diagram fitted inside the margins
    pub fn layout_options(&self, canvas: &Canvas) -> LayoutOptions {
        let (width, height) = canvas.inner_size();
        LayoutOptions {
            extent: Extent::sized(width, height),
            node_width: NodeGeometry::WIDTH,
            node_padding: NodeGeometry::PADDING,
            iterations: self.iterations,
            align: self.align,
        }
    }

    /// Paint a graph onto a fresh surface, layer by layer.
    ///
    /// The surface keeps whatever was painted before a failure: nothing when
    /// the layout fails, nodes and links when the label style is incomplete.
    fn paint(&self, graph: &SankeyGraph, style: &Style, surface: &mut SvgSurface) -> Result<()> {
        let canvas = *surface.canvas();
        let diagram = self.layout.layout(graph, &self.layout_options(&canvas))?;

        let theme = SankeyTheme::without_labels(style);
        if theme.link_opacity.is_nan() {
            warn!("link_opacity is not numeric");
        }
        surface.paint_nodes(&diagram, &theme.node_color);
        surface.paint_links(&diagram, &theme.link_color, theme.link_opacity);

        if let Some(labels) = LabelStyle::from_style(style)? {
            surface.paint_labels(&diagram, &labels);
        }
        Ok(())
    }

    /// Build the SVG for a message without touching any document
    pub fn render(&self, message: &Message, viewport: &dyn Viewport) -> Result<String> {
        let graph = transform(message.default_rows()?);
        let canvas = Canvas::from_viewport(viewport.width(), viewport.height());
        let mut surface = SvgSurface::open(&canvas);
        self.paint(&graph, &message.style(), &mut surface)?;
        Ok(surface.finish())
    }

    /// Handle one data update.
    ///
    /// A message without rows fails before the document is touched, leaving
    /// the previous diagram in place. Otherwise the previous surface is
    /// replaced by a new one, which is attached even when painting stops
    /// part way; the error is still returned.
    pub fn on_data(&self, message: &Message, viewport: &dyn Viewport, document: &mut Document) -> Result<()> {
        let graph = transform(message.default_rows()?);
        let style = message.style();

        let removed = document.remove_all(ElementKind::Svg);
        debug!("removed {} previous surface(s)", removed);

        let canvas = Canvas::from_viewport(viewport.width(), viewport.height());
        let mut surface = SvgSurface::open(&canvas);
        let painted = self.paint(&graph, &style, &mut surface);
        document.append_svg(surface.finish());
        painted
    }

    /// Parse a raw JSON message and handle it
    pub fn on_json(&self, input: &str, viewport: &dyn Viewport, document: &mut Document) -> Result<()> {
        let message = Message::from_json(input)?;
        self.on_data(&message, viewport, document)
    }
}
