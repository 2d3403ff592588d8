//! Built-in Sankey layout.
//!
//! Columns come from longest-path depth, node heights from flow value, and
//! vertical positions from a few rounds of relaxation toward the weighted
//! centre of each node's neighbours, with overlap removal after every pass.

use log::debug;
use std::cmp::Ordering;
use std::mem;

use super::{LayoutOptions, LinkPath, NodeAlign, PositionedLink, PositionedNode, PositionedSankey, SankeyLayout};
use crate::error::{Error, Result};
use crate::svg::Point;
use crate::types::SankeyGraph;

/// Minimum shift applied while resolving overlaps
const COLLISION_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Default)]
pub struct SankeyLayoutEngine;

impl SankeyLayout for SankeyLayoutEngine {
    fn layout(&self, graph: &SankeyGraph, options: &LayoutOptions) -> Result<PositionedSankey> {
        let mut state = LayoutState::new(graph, options)?;
        if state.nodes.is_empty() {
            return Ok(PositionedSankey::default());
        }
        state.compute_node_values();
        state.compute_node_depths()?;
        state.compute_node_heights()?;
        state.compute_node_breadths();
        state.compute_link_breadths();
        debug!(
            "laid out {} nodes in {} columns",
            state.nodes.len(),
            state.columns.len()
        );
        Ok(state.finish(graph))
    }
}

#[derive(Debug, Default)]
struct NodeState {
    value: f64,
    depth: usize,
    height: usize,
    layer: usize,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    source_links: Vec<usize>,
    target_links: Vec<usize>,
}

impl NodeState {
    fn shift(&mut self, dy: f64) {
        self.y0 += dy;
        self.y1 += dy;
    }
}

#[derive(Debug)]
struct LinkState {
    source: usize,
    target: usize,
    value: f64,
    width: f64,
    y0: f64,
    y1: f64,
}

struct LayoutState<'a> {
    options: &'a LayoutOptions,
    nodes: Vec<NodeState>,
    links: Vec<LinkState>,
    columns: Vec<Vec<usize>>,
    /// Effective vertical padding, shrunk when the tallest column would not fit
    py: f64,
}

impl<'a> LayoutState<'a> {
    fn new(graph: &SankeyGraph, options: &'a LayoutOptions) -> Result<Self> {
        let mut nodes: Vec<NodeState> = graph.nodes.iter().map(|_| NodeState::default()).collect();
        let mut links = Vec::with_capacity(graph.links.len());
        for (i, link) in graph.links.iter().enumerate() {
            for node in [link.source, link.target] {
                if node >= nodes.len() {
                    return Err(Error::MissingNode { link: i, node });
                }
            }
            nodes[link.source].source_links.push(i);
            nodes[link.target].target_links.push(i);
            links.push(LinkState {
                source: link.source,
                target: link.target,
                value: link.value.filter(|v| v.is_finite()).unwrap_or(0.0),
                width: 0.0,
                y0: 0.0,
                y1: 0.0,
            });
        }
        Ok(Self {
            options,
            nodes,
            links,
            columns: Vec::new(),
            py: options.node_padding,
        })
    }

    fn compute_node_values(&mut self) {
        for node in &mut self.nodes {
            let out: f64 = node.source_links.iter().map(|&l| self.links[l].value).sum();
            let inc: f64 = node.target_links.iter().map(|&l| self.links[l].value).sum();
            node.value = out.max(inc);
        }
    }

    fn compute_node_depths(&mut self) -> Result<()> {
        let links = &self.links;
        walk_layers(&mut self.nodes, |node| &node.source_links, |l| links[l].target, |node, x| node.depth = x)
    }

    fn compute_node_heights(&mut self) -> Result<()> {
        let links = &self.links;
        walk_layers(&mut self.nodes, |node| &node.target_links, |l| links[l].source, |node, x| node.height = x)
    }

    fn align(&self, node: &NodeState, columns: usize) -> isize {
        let last = columns as isize - 1;
        match self.options.align {
            NodeAlign::Left => node.depth as isize,
            NodeAlign::Right => last - node.height as isize,
            NodeAlign::Justify => {
                if node.source_links.is_empty() {
                    last
                } else {
                    node.depth as isize
                }
            }
            NodeAlign::Center => {
                if !node.target_links.is_empty() {
                    node.depth as isize
                } else {
                    node.source_links
                        .iter()
                        .map(|&l| self.nodes[self.links[l].target].depth as isize)
                        .min()
                        .map_or(0, |d| d - 1)
                }
            }
        }
    }

    fn compute_node_layers(&mut self) {
        let extent = self.options.extent;
        let dx = self.options.node_width;
        let count = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0) + 1;
        let kx = if count > 1 {
            (extent.x1 - extent.x0 - dx) / (count - 1) as f64
        } else {
            0.0
        };
        let mut columns = vec![Vec::new(); count];
        for i in 0..self.nodes.len() {
            let layer = self.align(&self.nodes[i], count).clamp(0, count as isize - 1) as usize;
            let node = &mut self.nodes[i];
            node.layer = layer;
            node.x0 = extent.x0 + layer as f64 * kx;
            node.x1 = node.x0 + dx;
            columns[layer].push(i);
        }
        self.columns = columns;
    }

    fn compute_node_breadths(&mut self) {
        self.compute_node_layers();
        let extent = self.options.extent;
        let tallest = self.columns.iter().map(Vec::len).max().unwrap_or(1);
        self.py = if tallest > 1 {
            self.options.node_padding.min((extent.y1 - extent.y0) / (tallest - 1) as f64)
        } else {
            self.options.node_padding
        };
        self.initialize_node_breadths();
        let iterations = self.options.iterations;
        for i in 0..iterations {
            let alpha = 0.99f64.powi(i as i32);
            let beta = (1.0 - alpha).max((i + 1) as f64 / iterations as f64);
            self.relax_right_to_left(alpha, beta);
            self.relax_left_to_right(alpha, beta);
        }
    }

    fn initialize_node_breadths(&mut self) {
        let extent = self.options.extent;
        let py = self.py;
        let ky = self
            .columns
            .iter()
            .filter_map(|column| {
                let total: f64 = column.iter().map(|&n| self.nodes[n].value).sum();
                (total > 0.0).then(|| (extent.y1 - extent.y0 - (column.len() as f64 - 1.0) * py) / total)
            })
            .fold(f64::INFINITY, f64::min);
        let ky = if ky.is_finite() { ky } else { 0.0 };

        for c in 0..self.columns.len() {
            let column = mem::take(&mut self.columns[c]);
            let mut y = extent.y0;
            for &n in &column {
                let node = &mut self.nodes[n];
                node.y0 = y;
                node.y1 = y + node.value * ky;
                y = node.y1 + py;
                for &l in &node.source_links {
                    self.links[l].width = self.links[l].value * ky;
                }
            }
            let spare = (extent.y1 - y + py) / (column.len() as f64 + 1.0);
            for (i, &n) in column.iter().enumerate() {
                self.nodes[n].shift(spare * (i + 1) as f64);
            }
            for &n in &column {
                self.sort_source_links(n);
                self.sort_target_links(n);
            }
            self.columns[c] = column;
        }
    }

    fn relax_left_to_right(&mut self, alpha: f64, beta: f64) {
        for c in 1..self.columns.len() {
            let mut column = mem::take(&mut self.columns[c]);
            for &target in &column {
                let (mut y, mut w) = (0.0, 0.0);
                for &l in &self.nodes[target].target_links {
                    let link = &self.links[l];
                    let v = link.value * self.layer_gap(link.source, target);
                    y += self.target_top(link.source, target) * v;
                    w += v;
                }
                if !(w > 0.0) {
                    continue;
                }
                let dy = (y / w - self.nodes[target].y0) * alpha;
                self.nodes[target].shift(dy);
                self.reorder_node_links(target);
            }
            self.sort_by_breadth(&mut column);
            self.resolve_collisions(&column, beta);
            self.columns[c] = column;
        }
    }

    fn relax_right_to_left(&mut self, alpha: f64, beta: f64) {
        for c in (0..self.columns.len().saturating_sub(1)).rev() {
            let mut column = mem::take(&mut self.columns[c]);
            for &source in &column {
                let (mut y, mut w) = (0.0, 0.0);
                for &l in &self.nodes[source].source_links {
                    let link = &self.links[l];
                    let v = link.value * self.layer_gap(source, link.target);
                    y += self.source_top(source, link.target) * v;
                    w += v;
                }
                if !(w > 0.0) {
                    continue;
                }
                let dy = (y / w - self.nodes[source].y0) * alpha;
                self.nodes[source].shift(dy);
                self.reorder_node_links(source);
            }
            self.sort_by_breadth(&mut column);
            self.resolve_collisions(&column, beta);
            self.columns[c] = column;
        }
    }

    fn layer_gap(&self, source: usize, target: usize) -> f64 {
        self.nodes[target].layer as f64 - self.nodes[source].layer as f64
    }

    /// Where the link source -> target would enter `target` if `target` were
    /// positioned to line up with `source`
    fn target_top(&self, source: usize, target: usize) -> f64 {
        let s = &self.nodes[source];
        let mut y = s.y0 - (s.source_links.len() as f64 - 1.0) * self.py / 2.0;
        for &l in &s.source_links {
            if self.links[l].target == target {
                break;
            }
            y += self.links[l].width + self.py;
        }
        for &l in &self.nodes[target].target_links {
            if self.links[l].source == source {
                break;
            }
            y -= self.links[l].width;
        }
        y
    }

    /// Counterpart of `target_top` for positioning `source` against `target`
    fn source_top(&self, source: usize, target: usize) -> f64 {
        let t = &self.nodes[target];
        let mut y = t.y0 - (t.target_links.len() as f64 - 1.0) * self.py / 2.0;
        for &l in &t.target_links {
            if self.links[l].source == source {
                break;
            }
            y += self.links[l].width + self.py;
        }
        for &l in &self.nodes[source].source_links {
            if self.links[l].target == target {
                break;
            }
            y -= self.links[l].width;
        }
        y
    }

    fn resolve_collisions(&mut self, column: &[usize], alpha: f64) {
        if column.is_empty() {
            return;
        }
        let extent = self.options.extent;
        let i = column.len() >> 1;
        let subject = &self.nodes[column[i]];
        let (above, below) = (subject.y0 - self.py, subject.y1 + self.py);
        self.push_up(column, above, i as isize - 1, alpha);
        self.push_down(column, below, i + 1, alpha);
        self.push_up(column, extent.y1, column.len() as isize - 1, alpha);
        self.push_down(column, extent.y0, 0, alpha);
    }

    fn push_down(&mut self, column: &[usize], mut y: f64, start: usize, alpha: f64) {
        for &n in column.iter().skip(start) {
            let node = &mut self.nodes[n];
            let dy = (y - node.y0) * alpha;
            if dy > COLLISION_EPSILON {
                node.shift(dy);
            }
            y = node.y1 + self.py;
        }
    }

    fn push_up(&mut self, column: &[usize], mut y: f64, start: isize, alpha: f64) {
        if start < 0 {
            return;
        }
        for &n in column[..=start as usize].iter().rev() {
            let node = &mut self.nodes[n];
            let dy = (node.y1 - y) * alpha;
            if dy > COLLISION_EPSILON {
                node.shift(-dy);
            }
            y = node.y0 - self.py;
        }
    }

    fn sort_by_breadth(&self, column: &mut [usize]) {
        column.sort_by(|&a, &b| cmp_f64(self.nodes[a].y0, self.nodes[b].y0));
    }

    fn reorder_node_links(&mut self, n: usize) {
        let sources: Vec<usize> = self.nodes[n].target_links.iter().map(|&l| self.links[l].source).collect();
        for source in sources {
            self.sort_source_links(source);
        }
        let targets: Vec<usize> = self.nodes[n].source_links.iter().map(|&l| self.links[l].target).collect();
        for target in targets {
            self.sort_target_links(target);
        }
    }

    /// Order a node's outgoing links top to bottom by their target's position
    fn sort_source_links(&mut self, n: usize) {
        let mut links = mem::take(&mut self.nodes[n].source_links);
        links.sort_by(|&a, &b| {
            cmp_f64(self.nodes[self.links[a].target].y0, self.nodes[self.links[b].target].y0)
                .then(a.cmp(&b))
        });
        self.nodes[n].source_links = links;
    }

    /// Order a node's incoming links top to bottom by their source's position
    fn sort_target_links(&mut self, n: usize) {
        let mut links = mem::take(&mut self.nodes[n].target_links);
        links.sort_by(|&a, &b| {
            cmp_f64(self.nodes[self.links[a].source].y0, self.nodes[self.links[b].source].y0)
                .then(a.cmp(&b))
        });
        self.nodes[n].target_links = links;
    }

    fn compute_link_breadths(&mut self) {
        for node in &self.nodes {
            let mut y0 = node.y0;
            let mut y1 = node.y0;
            for &l in &node.source_links {
                let link = &mut self.links[l];
                link.y0 = y0 + link.width / 2.0;
                y0 += link.width;
            }
            for &l in &node.target_links {
                let link = &mut self.links[l];
                link.y1 = y1 + link.width / 2.0;
                y1 += link.width;
            }
        }
    }

    fn finish(self, graph: &SankeyGraph) -> PositionedSankey {
        let links = self
            .links
            .iter()
            .map(|link| PositionedLink {
                source: link.source,
                target: link.target,
                value: link.value,
                width: link.width,
                path: LinkPath {
                    source: Point { x: self.nodes[link.source].x1, y: link.y0 },
                    target: Point { x: self.nodes[link.target].x0, y: link.y1 },
                },
            })
            .collect();
        let nodes = self
            .nodes
            .into_iter()
            .zip(&graph.nodes)
            .map(|(node, input)| PositionedNode {
                id: input.id.clone(),
                value: node.value,
                depth: node.depth,
                height: node.height,
                layer: node.layer,
                x0: node.x0,
                y0: node.y0,
                x1: node.x1,
                y1: node.y1,
            })
            .collect();
        PositionedSankey { nodes, links }
    }
}

/// Breadth-first walk assigning each node its longest distance from the
/// starting frontier (every node). Fails when the walk outlasts the node count.
fn walk_layers<E, N, S>(nodes: &mut [NodeState], edges: E, next_of: N, mut set: S) -> Result<()>
where
    E: Fn(&NodeState) -> &Vec<usize>,
    N: Fn(usize) -> usize,
    S: FnMut(&mut NodeState, usize),
{
    let n = nodes.len();
    let mut current: Vec<usize> = (0..n).collect();
    let mut x = 0;
    while !current.is_empty() {
        let mut seen = vec![false; n];
        let mut next = Vec::new();
        for &i in &current {
            set(&mut nodes[i], x);
            for &l in edges(&nodes[i]) {
                let j = next_of(l);
                if !seen[j] {
                    seen[j] = true;
                    next.push(j);
                }
            }
        }
        x += 1;
        if x > n {
            return Err(Error::CircularLink);
        }
        current = next;
    }
    Ok(())
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
