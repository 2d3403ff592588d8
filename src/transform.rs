//! Rows -> Sankey graph.
//!
//! Every distinct value of either dimension becomes a node, in order of first
//! appearance (all first-dimension values, then all second-dimension values).
//! Values are compared by kind as well as content (see [`DimensionKey`]).
//! Every row becomes one link; rows repeating a (source, target) pair produce
//! parallel links.

use log::{debug, warn};
use std::collections::HashMap;

use crate::types::{DimensionKey, Link, Node, Row, SankeyGraph};

pub fn transform(rows: &[Row]) -> SankeyGraph {
    let sources: Vec<DimensionKey> = rows.iter().map(|r| r.dimension(0)).collect();
    let targets: Vec<DimensionKey> = rows.iter().map(|r| r.dimension(1)).collect();

    let mut index: HashMap<&DimensionKey, usize> = HashMap::new();
    let mut nodes = Vec::new();
    for key in sources.iter().chain(targets.iter()) {
        if !index.contains_key(key) {
            index.insert(key, nodes.len());
            nodes.push(Node { id: key.id() });
        }
    }

    let links: Vec<Link> = rows
        .iter()
        .zip(sources.iter().zip(targets.iter()))
        .map(|(row, (source, target))| Link {
            source: index[source],
            target: index[target],
            value: row.metric(),
        })
        .collect();

    let missing = links.iter().filter(|l| l.value.is_none()).count();
    if missing > 0 {
        warn!("{} of {} rows have no numeric metric", missing, links.len());
    }
    debug!("transformed {} rows into {} nodes", rows.len(), nodes.len());

    SankeyGraph { nodes, links }
}
