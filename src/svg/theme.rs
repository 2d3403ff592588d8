//! Theme - the resolved paint settings for one render, built from the flat
//! style map with fallbacks applied.

use serde::{Deserialize, Serialize};

use super::styles::{Margin, FALLBACK_COLOR};
use crate::error::{Error, Result};
use crate::style::Style;

/// Label paint settings, present only when labels are switched on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    /// CSS font-size; unset leaves the inherited size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    pub color: String,
    /// Distance from a left-half node's x0 to its label anchor
    pub left_offset: f64,
    /// Distance from a right-half node's x0 back to its label anchor
    pub right_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyTheme {
    pub node_color: String,
    pub link_color: String,
    /// May be NaN when the configured opacity is not numeric
    pub link_opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelStyle>,
}

impl Default for SankeyTheme {
    fn default() -> Self {
        Self {
            node_color: FALLBACK_COLOR.to_string(),
            link_color: FALLBACK_COLOR.to_string(),
            link_opacity: f64::NAN,
            labels: None,
        }
    }
}

impl LabelStyle {
    /// Label settings when `show_labels` is on, `None` otherwise.
    ///
    /// Fails when labels are shown without `node_font_color`, which has no
    /// fallback.
    pub fn from_style(style: &Style) -> Result<Option<Self>> {
        if !style.is_truthy("show_labels") {
            return Ok(None);
        }
        let color = style
            .color("node_font_color")
            .ok_or(Error::MissingStyle("node_font_color"))?;
        let default_offset = Margin::RIGHT / 2.0;
        Ok(Some(Self {
            font_size: style.font_size("node_font_size"),
            color: color.to_string(),
            left_offset: if style.is_truthy("left_offset") {
                style.integer("left_offset")
            } else {
                default_offset
            },
            right_offset: if style.is_truthy("right_offset") {
                style.number("right_offset")
            } else {
                default_offset
            },
        }))
    }
}

impl SankeyTheme {
    /// Node and link paint from a flat style map, without labels. Never fails.
    pub fn without_labels(style: &Style) -> Self {
        Self {
            node_color: style.color("node_color").unwrap_or(FALLBACK_COLOR).to_string(),
            link_color: style.color("link_color").unwrap_or(FALLBACK_COLOR).to_string(),
            link_opacity: style.number("link_opacity"),
            labels: None,
        }
    }

    /// Resolve the full theme from a flat style map.
    pub fn from_style(style: &Style) -> Result<Self> {
        Ok(Self {
            labels: LabelStyle::from_style(style)?,
            ..Self::without_labels(style)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn style(pairs: &[(&str, Value)]) -> Style {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_defaults() {
        let theme = SankeyTheme::from_style(&Style::default()).unwrap();
        assert_eq!(theme.node_color, "black");
        assert_eq!(theme.link_color, "black");
        assert!(theme.link_opacity.is_nan());
        assert!(theme.labels.is_none());
    }

    #[test]
    fn test_configured_colors() {
        let theme = SankeyTheme::from_style(&style(&[
            ("node_color", json!({"color": "#336699"})),
            ("link_color", json!({"color": "#999999"})),
            ("link_opacity", json!("0.3")),
        ]))
        .unwrap();
        assert_eq!(theme.node_color, "#336699");
        assert_eq!(theme.link_color, "#999999");
        assert_eq!(theme.link_opacity, 0.3);
    }

    #[test]
    fn test_labels_need_font_color() {
        let err = SankeyTheme::from_style(&style(&[("show_labels", json!(true))])).unwrap_err();
        assert!(matches!(err, Error::MissingStyle("node_font_color")));
    }

    #[test]
    fn test_label_offsets() {
        let theme = SankeyTheme::from_style(&style(&[
            ("show_labels", json!(true)),
            ("node_font_color", json!({"color": "#000"})),
            ("node_font_size", json!("12px")),
            ("left_offset", json!("18px")),
        ]))
        .unwrap();
        let labels = theme.labels.unwrap();
        assert_eq!(labels.left_offset, 18.0);
        assert_eq!(labels.right_offset, 25.0);
        assert_eq!(labels.font_size.as_deref(), Some("12px"));
    }

    #[test]
    fn test_labels_off_ignores_font_color() {
        let theme = SankeyTheme::from_style(&style(&[
            ("show_labels", json!(false)),
            ("left_offset", json!(5)),
        ]))
        .unwrap();
        assert!(theme.labels.is_none());
    }
}
