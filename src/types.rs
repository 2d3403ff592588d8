//! Type definitions for rows and the Sankey node/link graph

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::style::to_number;

/// One observation from the host table: dimension values plus metric values.
///
/// Only the first two dimensions and the first metric are read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub dimensions: Vec<Value>,
    #[serde(default)]
    pub metrics: Vec<Value>,
}

impl Row {
    pub fn new(source: &str, target: &str, metric: f64) -> Self {
        Self {
            dimensions: vec![Value::from(source), Value::from(target)],
            metrics: vec![Value::from(metric)],
        }
    }

    /// Identity of the dimension at `index`, used to deduplicate nodes
    pub fn dimension(&self, index: usize) -> DimensionKey {
        match self.dimensions.get(index) {
            None => DimensionKey::Missing,
            Some(Value::Null) => DimensionKey::Null,
            Some(Value::Bool(b)) => DimensionKey::Bool(*b),
            Some(Value::Number(n)) => DimensionKey::Number(match n.as_f64() {
                Some(f) => js_number(f),
                None => n.to_string(),
            }),
            Some(Value::String(s)) => DimensionKey::Text(s.clone()),
            Some(other) => DimensionKey::Compound(other.to_string()),
        }
    }

    /// First metric as a number. `None` when missing or not numeric.
    pub fn metric(&self) -> Option<f64> {
        match self.metrics.first()? {
            Value::Number(n) => n.as_f64(),
            v @ Value::String(_) => Some(to_number(Some(v))).filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

/// A dimension value compared by kind as well as content: the number `1`
/// and the string `"1"` are different nodes, and so are `null` and a row
/// too short to have the dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DimensionKey {
    Missing,
    Null,
    Bool(bool),
    /// Printed form; numbers that print alike are the same node
    Number(String),
    Text(String),
    /// Arrays and objects, by their JSON text
    Compound(String),
}

impl DimensionKey {
    /// Node id for this value. Missing and null values have none.
    pub fn id(&self) -> Option<String> {
        match self {
            DimensionKey::Missing | DimensionKey::Null => None,
            DimensionKey::Bool(b) => Some(b.to_string()),
            DimensionKey::Number(s) | DimensionKey::Text(s) | DimensionKey::Compound(s) => {
                Some(s.clone())
            }
        }
    }
}

/// Print a finite number the way a browser does: integral values without a
/// fractional part, negative zero as `0`.
pub fn js_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

/// A graph node, identified by its dimension value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: Option<String>,
}

impl Node {
    /// Text drawn next to the node; absent ids draw nothing.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

/// A weighted edge between two nodes, by index into the node list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub value: Option<f64>,
}

/// Nodes and links derived from one table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SankeyGraph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}
