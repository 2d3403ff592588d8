//! SVG renderer - converts a PositionedSankey into an SVG string.
//!
//! Renders back-to-front: nodes → links → left labels → right labels.
//! [`SvgSurface`] paints one layer at a time; [`render_sankey_svg`] paints them all.

use super::styles::{CANVAS_TRANSLATE, LAYER_SHIFT_Y, Margin, NodeGeometry, TEXT_BASELINE_SHIFT};
use super::theme::{LabelStyle, SankeyTheme};
use super::types::Canvas;
use crate::layout::{PositionedNode, PositionedSankey};
use crate::types::js_number;

/// Render a laid-out Sankey diagram as an SVG string.
pub fn render_sankey_svg(diagram: &PositionedSankey, canvas: &Canvas, theme: &SankeyTheme) -> String {
    let mut surface = SvgSurface::open(canvas);
    surface.paint_nodes(diagram, &theme.node_color);
    surface.paint_links(diagram, &theme.link_color, theme.link_opacity);
    if let Some(labels) = &theme.labels {
        surface.paint_labels(diagram, labels);
    }
    surface.finish()
}

/// A drawing surface being painted layer by layer.
///
/// Whatever has been painted when [`finish`](Self::finish) is called is
/// closed into a well-formed `<svg>` element, so a render cycle that stops
/// part way still yields the layers drawn so far.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    canvas: Canvas,
    parts: Vec<String>,
}

impl SvgSurface {
    pub fn open(canvas: &Canvas) -> Self {
        Self {
            canvas: *canvas,
            parts: vec![svg_open_tag(canvas)],
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Node rectangles
    pub fn paint_nodes(&mut self, diagram: &PositionedSankey, fill: &str) {
        self.parts.push(format!(r#"<g class="nodes" transform="{}">"#, layer_transform()));
        for node in &diagram.nodes {
            self.parts.push(render_node(node, fill));
        }
        self.parts.push("</g>".to_string());
    }

    /// Links, with stroke colour and opacity shared on the group
    pub fn paint_links(&mut self, diagram: &PositionedSankey, stroke: &str, opacity: f64) {
        self.parts.push(format!(
            r#"<g fill="none" transform="{}" stroke="{}" stroke-opacity="{}">"#,
            layer_transform(),
            escape_xml(stroke),
            fmt_num(opacity)
        ));
        for link in &diagram.links {
            self.parts.push(format!(
                r#"<path d="{}" stroke-width="{}" />"#,
                link.path.to_path_data(),
                fmt_num(link.width)
            ));
        }
        self.parts.push("</g>".to_string());
    }

    /// Labels on the inner side of each node. Nodes exactly at the canvas
    /// midpoint get none.
    pub fn paint_labels(&mut self, diagram: &PositionedSankey, labels: &LabelStyle) {
        let mid = self.canvas.midpoint();
        self.parts.push(render_label_group(
            diagram.nodes.iter().filter(|n| n.x0 < mid),
            labels,
            LabelSide::Right,
        ));
        self.parts.push(render_label_group(
            diagram.nodes.iter().filter(|n| n.x0 > mid),
            labels,
            LabelSide::Left,
        ));
    }

    pub fn finish(mut self) -> String {
        self.parts.push("</svg>".to_string());
        self.parts.join("\n")
    }
}

fn svg_open_tag(canvas: &Canvas) -> String {
    let (tx, ty) = CANVAS_TRANSLATE;
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" transform="translate({}, {})" width="{}" height="{}">"#,
        fmt_num(tx),
        fmt_num(ty),
        fmt_num(canvas.width - Margin::LEFT),
        fmt_num(canvas.height - Margin::TOP)
    )
}

fn layer_transform() -> String {
    format!("translate(0, {})", fmt_num(LAYER_SHIFT_Y))
}

fn render_node(node: &PositionedNode, fill: &str) -> String {
    format!(
        r#"<rect class="node" x="{}" y="{}" height="{}" width="{}" style="fill: {};" />"#,
        fmt_num(node.x0),
        fmt_num(node.y0),
        fmt_num(node.y1 - node.y0),
        fmt_num(NodeGeometry::WIDTH),
        escape_xml(fill)
    )
}

// ============================================================================
// Label rendering
// ============================================================================

/// Which side of its node a label is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelSide {
    Left,
    Right,
}

fn render_label_group<'a>(
    nodes: impl Iterator<Item = &'a PositionedNode>,
    labels: &LabelStyle,
    side: LabelSide,
) -> String {
    let mut css = Vec::new();
    if let Some(size) = &labels.font_size {
        css.push(format!("font-size: {};", size));
    }
    css.push(format!("fill: {};", labels.color));

    let mut parts = vec![format!(
        r#"<g transform="{}" style="{}">"#,
        layer_transform(),
        escape_xml(&css.join(" "))
    )];

    let (anchor, dx) = match side {
        LabelSide::Right => ("start", labels.left_offset),
        LabelSide::Left => ("end", -labels.right_offset),
    };
    for node in nodes {
        parts.push(format!(
            r#"<text x="{}" y="{}" text-anchor="{}" dy="{}">{}</text>"#,
            fmt_num(node.x0 + dx),
            fmt_num((node.y0 + node.y1) / 2.0),
            anchor,
            TEXT_BASELINE_SHIFT,
            escape_xml(node.label())
        ));
    }
    parts.push("</g>".to_string());
    parts.join("\n")
}

// ============================================================================
// Utilities
// ============================================================================

/// Escape special XML characters in text content
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Format a number the way a browser prints it into an attribute:
/// whole numbers without a decimal point.
fn fmt_num(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        js_number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LinkPath, PositionedLink};
    use crate::svg::Point;

    fn node(id: &str, x0: f64, y0: f64, y1: f64) -> PositionedNode {
        PositionedNode {
            id: Some(id.to_string()),
            value: 1.0,
            depth: 0,
            height: 0,
            layer: 0,
            x0,
            y0,
            x1: x0 + 15.0,
            y1,
        }
    }

    fn diagram() -> PositionedSankey {
        PositionedSankey {
            nodes: vec![node("A&B", 0.0, 10.0, 50.0), node("C", 300.0, 20.0, 60.0)],
            links: vec![PositionedLink {
                source: 0,
                target: 1,
                value: 1.0,
                width: 40.0,
                path: LinkPath {
                    source: Point { x: 15.0, y: 30.0 },
                    target: Point { x: 300.0, y: 40.0 },
                },
            }],
        }
    }

    #[test]
    fn test_render_without_labels() {
        let svg = render_sankey_svg(&diagram(), &Canvas { width: 400.0, height: 200.0 }, &SankeyTheme::default());
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" transform="translate(30, 30)" width="380" height="180">"#));
        assert!(svg.contains(r#"<rect class="node" x="0" y="10" height="40" width="15" style="fill: black;" />"#));
        assert!(svg.contains(r#"stroke-opacity="NaN""#));
        assert!(svg.contains(r#"<path d="M15,30C157.5,30,157.5,40,300,40" stroke-width="40" />"#));
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn test_render_labels_on_inner_side() {
        let theme = SankeyTheme {
            labels: Some(LabelStyle {
                font_size: Some("12px".to_string()),
                color: "#111".to_string(),
                left_offset: 25.0,
                right_offset: 25.0,
            }),
            ..SankeyTheme::default()
        };
        let svg = render_sankey_svg(&diagram(), &Canvas { width: 400.0, height: 200.0 }, &theme);
        assert!(svg.contains(r#"<text x="25" y="30" text-anchor="start" dy="0.35em">A&amp;B</text>"#));
        assert!(svg.contains(r#"<text x="275" y="40" text-anchor="end" dy="0.35em">C</text>"#));
        assert!(svg.contains(r#"style="font-size: 12px; fill: #111;""#));
    }

    #[test]
    fn test_node_at_midpoint_has_no_label() {
        let canvas = Canvas { width: 400.0, height: 200.0 };
        let mut d = diagram();
        d.nodes.push(node("Middle", canvas.midpoint(), 70.0, 90.0));
        let labels = LabelStyle {
            font_size: None,
            color: "#111".to_string(),
            left_offset: 25.0,
            right_offset: 25.0,
        };
        let mut surface = SvgSurface::open(&canvas);
        surface.paint_labels(&d, &labels);
        let svg = surface.finish();
        assert_eq!(svg.matches("<text").count(), 2);
        assert!(!svg.contains("Middle"));
        assert!(svg.contains(r#"style="fill: #111;""#));
    }

    #[test]
    fn test_partial_surface_is_well_formed() {
        let canvas = Canvas { width: 400.0, height: 200.0 };
        let empty = SvgSurface::open(&canvas).finish();
        assert!(roxmltree::Document::parse(&empty).is_ok());
        assert!(!empty.contains("<rect"));

        let mut surface = SvgSurface::open(&canvas);
        surface.paint_nodes(&diagram(), "black");
        surface.paint_links(&diagram(), "black", 1.0);
        let svg = surface.finish();
        let tree = roxmltree::Document::parse(&svg).unwrap();
        assert_eq!(tree.descendants().filter(|n| n.has_tag_name("rect")).count(), 2);
        assert_eq!(tree.descendants().filter(|n| n.has_tag_name("path")).count(), 1);
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(15.0), "15");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(2.5), "2.5");
        assert_eq!(fmt_num(f64::NAN), "NaN");
    }
}
