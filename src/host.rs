//! The host page the visualization draws into: viewport size queries and the
//! document body holding the drawing surface.

use serde::{Deserialize, Serialize};

/// Size of the area the host gives the visualization, queried on every render
pub trait Viewport {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
}

/// A viewport with a fixed size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedViewport {
    pub width: f64,
    pub height: f64,
}

impl FixedViewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for FixedViewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport for FixedViewport {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }
}

/// Kind of a top-level element in the document body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Svg,
    Other,
}

/// A top-level element in the document body, stored as markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub markup: String,
}

/// The document body. The visualization owns every `<svg>` child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    body: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, element: Element) {
        self.body.push(element);
    }

    pub fn append_svg(&mut self, markup: String) {
        self.append(Element {
            kind: ElementKind::Svg,
            markup,
        });
    }

    /// Remove every element of `kind`, returning how many were removed
    pub fn remove_all(&mut self, kind: ElementKind) -> usize {
        let before = self.body.len();
        self.body.retain(|e| e.kind != kind);
        before - self.body.len()
    }

    pub fn count(&self, kind: ElementKind) -> usize {
        self.body.iter().filter(|e| e.kind == kind).count()
    }

    /// Markup of the first attached drawing surface
    pub fn svg(&self) -> Option<&str> {
        self.body
            .iter()
            .find(|e| e.kind == ElementKind::Svg)
            .map(|e| e.markup.as_str())
    }

    pub fn elements(&self) -> &[Element] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_all_keeps_other_elements() {
        let mut doc = Document::new();
        doc.append(Element {
            kind: ElementKind::Other,
            markup: "<div></div>".to_string(),
        });
        doc.append_svg("<svg></svg>".to_string());
        doc.append_svg("<svg></svg>".to_string());
        assert_eq!(doc.count(ElementKind::Svg), 2);
        assert_eq!(doc.remove_all(ElementKind::Svg), 2);
        assert_eq!(doc.count(ElementKind::Svg), 0);
        assert_eq!(doc.elements().len(), 1);
        assert_eq!(doc.svg(), None);
    }
}
