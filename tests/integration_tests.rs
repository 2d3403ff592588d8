//! Integration tests using test data fixtures
//!
//! Each file in testdata/ holds a viewport, a host message and the expected
//! shape of the rendered diagram (or the expected error). Each fixture gets
//! its own test function.
//! Run all tests with: cargo test

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use sankey_viz::host::ElementKind;
use sankey_viz::{Document, FixedViewport, Message, Row, SankeyVisualization};

#[derive(Debug, Deserialize)]
struct Fixture {
    viewport: FixedViewport,
    message: Message,
    expect: Expected,
}

#[derive(Debug, Deserialize)]
struct Expected {
    #[serde(default)]
    error: Option<String>,
    /// Drawing surfaces left attached after a failed cycle
    #[serde(default)]
    surfaces: usize,
    #[serde(default)]
    nodes: usize,
    #[serde(default)]
    links: usize,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    node_fill: Option<String>,
    #[serde(default)]
    link_stroke: Option<String>,
    #[serde(default)]
    link_opacity: Option<String>,
}

/// Get the path to the test data directory
fn get_testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn load_fixture(test_name: &str) -> Fixture {
    let path = get_testdata_dir().join(format!("{}.json", test_name));
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {:?}: {}", path, e))
}

/// Run a fixture through the handler and compare against its expectations
fn run_fixture_test(test_name: &str) {
    let fixture = load_fixture(test_name);
    let viz = SankeyVisualization::new();
    let mut doc = Document::new();
    let result = viz.on_data(&fixture.message, &fixture.viewport, &mut doc);

    if let Some(expected_error) = &fixture.expect.error {
        let err = result.expect_err("expected the render cycle to fail");
        let actual = format!("{:?}", err);
        assert!(
            actual.starts_with(expected_error.as_str()),
            "{}: expected {} error, got {}",
            test_name,
            expected_error,
            actual
        );
        assert_eq!(
            doc.count(ElementKind::Svg),
            fixture.expect.surfaces,
            "{}: surfaces left after failure",
            test_name
        );
        if let Some(svg) = doc.svg() {
            let tree = roxmltree::Document::parse(svg)
                .unwrap_or_else(|e| panic!("{}: partial surface is not well-formed: {}", test_name, e));
            let rects = tree.descendants().filter(|n| n.has_tag_name("rect")).count();
            assert_eq!(rects, fixture.expect.nodes, "{}: nodes painted before failure", test_name);
            let paths = tree.descendants().filter(|n| n.has_tag_name("path")).count();
            assert_eq!(paths, fixture.expect.links, "{}: links painted before failure", test_name);
            assert_eq!(tree.descendants().filter(|n| n.has_tag_name("text")).count(), 0);
        }
        return;
    }

    result.unwrap_or_else(|e| panic!("{}: render failed: {}", test_name, e));
    assert_eq!(doc.count(ElementKind::Svg), 1);
    let svg = doc.svg().unwrap();
    let tree = roxmltree::Document::parse(svg)
        .unwrap_or_else(|e| panic!("{}: output is not well-formed XML: {}\n{}", test_name, e, svg));
    let expect = &fixture.expect;

    let root = tree.root_element();
    assert!(root.has_tag_name("svg"));
    let canvas_width = fixture.viewport.width - 20.0;
    assert_eq!(root.attribute("width"), Some(format!("{}", canvas_width - 20.0).as_str()));

    let rects: Vec<_> = tree.descendants().filter(|n| n.has_tag_name("rect")).collect();
    assert_eq!(rects.len(), expect.nodes, "{}: node count", test_name);
    for rect in &rects {
        assert_eq!(rect.attribute("class"), Some("node"));
        assert_eq!(rect.attribute("width"), Some("15"));
        if let Some(fill) = &expect.node_fill {
            assert_eq!(rect.attribute("style"), Some(format!("fill: {};", fill).as_str()));
        }
    }

    let paths: Vec<_> = tree.descendants().filter(|n| n.has_tag_name("path")).collect();
    assert_eq!(paths.len(), expect.links, "{}: link count", test_name);
    for path in &paths {
        assert!(path.attribute("d").unwrap().starts_with('M'));
        let group = path.parent_element().unwrap();
        assert_eq!(group.attribute("fill"), Some("none"));
        if let Some(stroke) = &expect.link_stroke {
            assert_eq!(group.attribute("stroke"), Some(stroke.as_str()));
        }
        if let Some(opacity) = &expect.link_opacity {
            assert_eq!(group.attribute("stroke-opacity"), Some(opacity.as_str()));
        }
    }

    let labels: Vec<&str> = tree
        .descendants()
        .filter(|n| n.has_tag_name("text"))
        .map(|n| n.text().unwrap_or(""))
        .collect();
    assert_eq!(labels, expect.labels, "{}: labels", test_name);
}

/// Macro to generate fixture test functions
macro_rules! fixture_test {
    ($name:ident) => {
        paste::paste! {
            #[test]
            fn [<fixture_ $name>]() {
                run_fixture_test(stringify!($name));
            }
        }
    };
}

// =============================================================================
// Fixture tests
// =============================================================================

fixture_test!(basic_chain);
fixture_test!(styled_colors);
fixture_test!(labels_shown);
fixture_test!(labels_hidden);
fixture_test!(duplicate_pairs);
fixture_test!(missing_font_color);
fixture_test!(missing_table);
fixture_test!(circular);
fixture_test!(null_opacity);

// =============================================================================
// Handler behaviour
// =============================================================================

#[test]
fn test_label_sides() {
    let fixture = load_fixture("labels_shown");
    let mut doc = Document::new();
    SankeyVisualization::new()
        .on_data(&fixture.message, &fixture.viewport, &mut doc)
        .unwrap();
    let tree = roxmltree::Document::parse(doc.svg().unwrap()).unwrap();
    let midpoint = (fixture.viewport.width - 20.0) / 2.0;

    for text in tree.descendants().filter(|n| n.has_tag_name("text")) {
        let x: f64 = text.attribute("x").unwrap().parse().unwrap();
        let group = text.parent_element().unwrap();
        assert_eq!(group.attribute("style"), Some("font-size: 14px; fill: #333333;"));
        match text.attribute("text-anchor") {
            // left_offset = 20 to the right of x0
            Some("start") => assert!(x - 20.0 < midpoint),
            // right_offset = 10 to the left of x0
            Some("end") => assert!(x + 10.0 > midpoint),
            other => panic!("unexpected anchor {:?}", other),
        }
    }
}

#[test]
fn test_rerender_replaces_surface() {
    let viz = SankeyVisualization::new();
    let viewport = FixedViewport::new(600.0, 400.0);
    let mut doc = Document::new();

    let first = Message::new(vec![Row::new("A", "B", 1.0)], Vec::new());
    let second = Message::new(
        vec![Row::new("A", "B", 1.0), Row::new("B", "C", 1.0)],
        Vec::new(),
    );
    viz.on_data(&first, &viewport, &mut doc).unwrap();
    viz.on_data(&second, &viewport, &mut doc).unwrap();

    assert_eq!(doc.count(ElementKind::Svg), 1);
    assert_eq!(doc.svg().unwrap().matches("<rect").count(), 3);
}

#[test]
fn test_render_to_svg() {
    let rows = vec![Row::new("A", "B", 5.0), Row::new("B", "C", 3.0)];
    let svg = sankey_viz::render_to_svg(&rows, 800.0, 600.0).unwrap();
    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(!svg.contains("<text"), "Default style shows no labels");
    assert_eq!(svg.matches("<path").count(), 2);
}
