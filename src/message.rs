//! Inbound data message from the host: style configuration plus row tables
//! keyed by config id.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::style::{parse_style, Style, StyleSection};
use crate::types::Row;

/// Config id of the table holding the visualization's rows
pub const DEFAULT_TABLE: &str = "DEFAULT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageConfig {
    #[serde(default)]
    pub style: Vec<StyleSection>,
}

/// One data update delivered by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub config: MessageConfig,
    #[serde(default)]
    pub tables: HashMap<String, Vec<Row>>,
}

impl Message {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn new(rows: Vec<Row>, style: Vec<StyleSection>) -> Self {
        Self {
            config: MessageConfig { style },
            tables: HashMap::from([(DEFAULT_TABLE.to_string(), rows)]),
        }
    }

    pub fn rows_by_config_id(&self) -> &HashMap<String, Vec<Row>> {
        &self.tables
    }

    /// Rows of the default table
    pub fn default_rows(&self) -> Result<&[Row]> {
        self.tables
            .get(DEFAULT_TABLE)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MissingTable(DEFAULT_TABLE.to_string()))
    }

    pub fn style(&self) -> Style {
        parse_style(&self.config.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message() {
        let input = r##"{
            "config": {"style": [{"id": "colors", "elements": [
                {"id": "node_color", "value": {"color": "#123456"}, "type": "FILL_COLOR"}
            ]}]},
            "tables": {"DEFAULT": [
                {"dimensions": ["A", "B"], "metrics": [5]}
            ]},
            "fields": {}
        }"##;
        let message = Message::from_json(input).unwrap();
        assert_eq!(message.default_rows().unwrap().len(), 1);
        assert_eq!(message.style().color("node_color"), Some("#123456"));
    }

    #[test]
    fn test_missing_default_table() {
        let message = Message::from_json(r#"{"tables": {"OTHER": []}}"#).unwrap();
        assert!(matches!(message.default_rows(), Err(Error::MissingTable(_))));
        assert_eq!(message.rows_by_config_id().len(), 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Message::from_json("{"), Err(Error::Json(_))));
    }
}
