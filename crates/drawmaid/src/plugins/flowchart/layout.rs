//! Flowchart layout implementation
//!
//! Longest-path leveling that tolerates cycles, followed by subtree-width
//! column assignment over a spanning forest of the layout edges. All graph
//! walks are iterative over node indices with explicit visited bookkeeping,
//! so cyclic input always terminates.

use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, info, span, trace, Level};

use super::FlowchartDatabase;
use crate::core::{lexicon, Database, Direction, LayoutAlgorithm, LayoutConfig, Point, Position};

/// Position data for a laid out node
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    /// Longest-path level from the roots
    pub level: usize,
    /// Column centre; fractional when centred over an even span
    pub column: f64,
    pub position: Position,
}

/// Layout data for an edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedEdge {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    /// Whether the edge took part in column assignment
    pub tree_edge: bool,
    /// Detour points for edges that run against the flow
    pub waypoints: Vec<Point>,
}

/// Layout output containing positioned elements
#[derive(Debug, Clone)]
pub struct FlowchartLayoutResult {
    pub direction: Direction,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
    pub width: i32,
    pub height: i32,
}

impl FlowchartLayoutResult {
    /// Position of a node by id
    pub fn position(&self, id: &str) -> Option<Position> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.position)
    }

    /// Level of a node by id
    pub fn level(&self, id: &str) -> Option<usize> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.level)
    }

    /// Node id to position map
    pub fn positions(&self) -> HashMap<String, Position> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.position))
            .collect()
    }
}

/// Index-based view of the database used during layout
struct Graph {
    ids: Vec<String>,
    /// Outgoing targets per node, one entry per edge
    out: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
    /// (source, target) per edge, in edge order
    edges: Vec<(usize, usize)>,
}

impl Graph {
    fn from_database(database: &FlowchartDatabase) -> Self {
        let ids: Vec<String> = database.nodes().map(|n| n.id.clone()).collect();
        let index: HashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut out = vec![Vec::new(); ids.len()];
        let mut in_degree = vec![0; ids.len()];
        let mut edges = Vec::new();
        for edge in database.edges() {
            if let (Some(&u), Some(&v)) =
                (index.get(edge.from.as_str()), index.get(edge.to.as_str()))
            {
                out[u].push(v);
                in_degree[v] += 1;
                edges.push((u, v));
            }
        }

        Self {
            ids,
            out,
            in_degree,
            edges,
        }
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    /// Nodes without incoming edges, or the first node when there are none
    fn roots(&self) -> Vec<usize> {
        let roots: Vec<usize> = (0..self.len()).filter(|&i| self.in_degree[i] == 0).collect();
        if roots.is_empty() && self.len() > 0 {
            vec![0]
        } else {
            roots
        }
    }
}

/// Flowchart layout algorithm implementation
pub struct FlowchartLayoutAlgorithm {
    config: LayoutConfig,
}

impl FlowchartLayoutAlgorithm {
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }
}

impl Default for FlowchartLayoutAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

/// Longest-path levels; back-edges to nodes on the current path are not followed
fn assign_levels(graph: &Graph, roots: &[usize]) -> Vec<usize> {
    let mut level: Vec<Option<usize>> = vec![None; graph.len()];
    let mut on_stack = vec![false; graph.len()];

    for &root in roots {
        if level[root].is_some() {
            continue;
        }
        level[root] = Some(0);
        on_stack[root] = true;
        let mut stack = vec![(root, 0usize)];

        while let Some(top) = stack.last_mut() {
            let u = top.0;
            if top.1 < graph.out[u].len() {
                let v = graph.out[u][top.1];
                top.1 += 1;
                if on_stack[v] {
                    trace!(from = %graph.ids[u], to = %graph.ids[v], "Back-edge");
                    continue;
                }
                let candidate = level[u].unwrap_or(0) + 1;
                if level[v].map_or(true, |current| candidate > current) {
                    level[v] = Some(candidate);
                    on_stack[v] = true;
                    stack.push((v, 0));
                }
            } else {
                on_stack[u] = false;
                stack.pop();
            }
        }
    }

    level.into_iter().map(|l| l.unwrap_or(0)).collect()
}

/// Layout edges: level increases, or the source branches
fn select_tree_edges(graph: &Graph, levels: &[usize]) -> Vec<bool> {
    graph
        .edges
        .iter()
        .map(|&(u, v)| levels[v] > levels[u] || graph.out[u].len() > 1)
        .collect()
}

/// Spanning forest over the tree edges, claimed depth-first from the roots
///
/// Returns forest children per node and the preorder of claimed nodes.
fn build_forest(
    graph: &Graph,
    roots: &[usize],
    tree_edge: &[bool],
) -> (Vec<Vec<usize>>, Vec<usize>, Vec<bool>) {
    let mut tree_children: Vec<Vec<usize>> = vec![Vec::new(); graph.len()];
    for (i, &(u, v)) in graph.edges.iter().enumerate() {
        if tree_edge[i] && u != v && !tree_children[u].contains(&v) {
            tree_children[u].push(v);
        }
    }

    let mut claimed = vec![false; graph.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); graph.len()];
    let mut preorder = Vec::with_capacity(graph.len());

    for &root in roots {
        if claimed[root] {
            continue;
        }
        claimed[root] = true;
        preorder.push(root);
        let mut stack = vec![(root, 0usize)];

        while let Some(top) = stack.last_mut() {
            let u = top.0;
            if top.1 < tree_children[u].len() {
                let v = tree_children[u][top.1];
                top.1 += 1;
                if !claimed[v] {
                    claimed[v] = true;
                    children[u].push(v);
                    preorder.push(v);
                    stack.push((v, 0));
                }
            } else {
                stack.pop();
            }
        }
    }

    (children, preorder, claimed)
}

/// Leaf-column count per node: 1 for leaves, else the sum over children
fn subtree_widths(children: &[Vec<usize>], preorder: &[usize]) -> Vec<usize> {
    let mut width = vec![1; children.len()];
    for &u in preorder.iter().rev() {
        if !children[u].is_empty() {
            width[u] = children[u].iter().map(|&c| width[c]).sum::<usize>().max(1);
        }
    }
    width
}

/// Column centres per node
fn assign_columns(
    roots: &[usize],
    children: &[Vec<usize>],
    preorder: &[usize],
    claimed: &[bool],
    width: &[usize],
) -> Vec<f64> {
    let n = children.len();
    let mut start = vec![0usize; n];
    let mut next_free = 0usize;

    for &root in roots {
        if claimed[root] && preorder.first().is_some() {
            start[root] = next_free;
            next_free += width[root];
        }
    }
    for &u in preorder {
        let mut cursor = start[u];
        for &c in &children[u] {
            start[c] = cursor;
            cursor += width[c];
        }
    }

    let span_center = |u: usize| start[u] as f64 + (width[u] as f64 - 1.0) / 2.0;
    let mut column: Vec<Option<f64>> = vec![None; n];
    for &u in preorder.iter().rev() {
        column[u] = Some(match children[u].as_slice() {
            [] => start[u] as f64,
            [only] => column[*only].unwrap_or(start[u] as f64),
            [first, .., last] => (span_center(*first) + span_center(*last)) / 2.0,
        });
    }

    column
        .into_iter()
        .map(|c| {
            c.unwrap_or_else(|| {
                let orphan = next_free as f64;
                next_free += 1;
                orphan
            })
        })
        .collect()
}

impl FlowchartLayoutAlgorithm {
    fn place(
        &self,
        direction: Direction,
        level: usize,
        max_level: usize,
        column: f64,
        size: (i32, i32),
    ) -> Position {
        let level = if direction.is_reversed() {
            max_level - level
        } else {
            level
        };
        let (x_step, y_step) = if direction.is_horizontal() {
            (level as f64, column)
        } else {
            (column, level as f64)
        };
        // Slot centre of a default 120x60 box
        let center_x = f64::from(self.config.origin_x)
            + x_step * f64::from(self.config.horizontal_gap)
            + 60.0;
        let center_y =
            f64::from(self.config.origin_y) + y_step * f64::from(self.config.vertical_gap) + 30.0;
        let (width, height) = size;
        Position::new(
            self.config.snap(center_x - f64::from(width) / 2.0),
            self.config.snap(center_y - f64::from(height) / 2.0),
            width,
            height,
        )
    }

    /// Detour for an edge whose target is not below its source
    fn detour(&self, direction: Direction, from: Position, to: Position) -> Vec<Point> {
        let offset = 40;
        if from == to {
            let x = self.config.snap(f64::from(from.right() + offset));
            return vec![
                Point::new(x, self.config.snap(f64::from(from.y + 10))),
                Point::new(x, self.config.snap(f64::from(from.bottom() - 10))),
            ];
        }
        if direction.is_horizontal() {
            let y = self.config.snap(f64::from(from.bottom().max(to.bottom()) + offset));
            vec![
                Point::new(self.config.snap(f64::from(from.center_x())), y),
                Point::new(self.config.snap(f64::from(to.center_x())), y),
            ]
        } else {
            let x = self.config.snap(f64::from(from.right().max(to.right()) + offset));
            vec![
                Point::new(x, self.config.snap(f64::from(from.center_y()))),
                Point::new(x, self.config.snap(f64::from(to.center_y()))),
            ]
        }
    }
}

impl LayoutAlgorithm<FlowchartDatabase> for FlowchartLayoutAlgorithm {
    type Output = FlowchartLayoutResult;

    fn layout(&self, database: &FlowchartDatabase) -> Result<Self::Output> {
        let layout_span = span!(
            Level::INFO,
            "layout_flowchart",
            node_count = database.node_count(),
            edge_count = database.edge_count()
        );
        let _enter = layout_span.enter();

        let direction = database.direction();
        let graph = Graph::from_database(database);
        let roots = graph.roots();

        let levels = assign_levels(&graph, &roots);
        let tree_edge = select_tree_edges(&graph, &levels);
        let (children, preorder, claimed) = build_forest(&graph, &roots, &tree_edge);
        let widths = subtree_widths(&children, &preorder);
        let columns = assign_columns(&roots, &children, &preorder, &claimed, &widths);
        debug!(
            roots = roots.len(),
            tree_edges = tree_edge.iter().filter(|t| **t).count(),
            "Levels and columns assigned"
        );

        let max_level = levels.iter().copied().max().unwrap_or(0);
        let nodes: Vec<PositionedNode> = database
            .nodes()
            .enumerate()
            .map(|(i, node)| {
                let size = lexicon::node_size(node.shape, &node.label);
                PositionedNode {
                    id: node.id.clone(),
                    level: levels[i],
                    column: columns[i],
                    position: self.place(direction, levels[i], max_level, columns[i], size),
                }
            })
            .collect();

        let mut edges = Vec::with_capacity(database.edge_count());
        let mut tree_flags = tree_edge.iter();
        for edge in database.edges() {
            let from = nodes.iter().find(|n| n.id == edge.from);
            let to = nodes.iter().find(|n| n.id == edge.to);
            let (Some(from), Some(to)) = (from, to) else {
                continue;
            };
            let waypoints = if to.level <= from.level {
                self.detour(direction, from.position, to.position)
            } else {
                Vec::new()
            };
            edges.push(PositionedEdge {
                id: edge.id.clone(),
                from_id: edge.from.clone(),
                to_id: edge.to.clone(),
                tree_edge: tree_flags.next().copied().unwrap_or(false),
                waypoints,
            });
        }

        let width = nodes
            .iter()
            .map(|n| n.position.right())
            .max()
            .unwrap_or(0)
            + self.config.origin_x;
        let height = nodes
            .iter()
            .map(|n| n.position.bottom())
            .max()
            .unwrap_or(0)
            + self.config.origin_y;

        info!(width, height, "Flowchart layout completed");
        Ok(FlowchartLayoutResult {
            direction,
            nodes,
            edges,
            width,
            height,
        })
    }

    fn name(&self) -> &'static str {
        "leveled-tree"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parser;
    use crate::plugins::flowchart::FlowchartParser;

    fn layout(input: &str) -> FlowchartLayoutResult {
        let mut db = FlowchartDatabase::new();
        FlowchartParser::new().parse(input, &mut db).unwrap();
        FlowchartLayoutAlgorithm::new().layout(&db).unwrap()
    }

    #[test]
    fn test_chain_levels_and_coordinates() {
        let result = layout("flowchart TD\nA --> B\nB --> C");
        assert_eq!(result.level("A"), Some(0));
        assert_eq!(result.level("C"), Some(2));
        assert_eq!(result.position("A").map(|p| (p.x, p.y)), Some((100, 40)));
        assert_eq!(result.position("B").map(|p| (p.x, p.y)), Some((100, 130)));
        assert_eq!(result.position("C").map(|p| (p.x, p.y)), Some((100, 220)));
    }

    #[test]
    fn test_longest_path_wins() {
        let result = layout("flowchart TD\nA --> B\nB --> C\nA --> C");
        assert_eq!(result.level("C"), Some(2));
    }

    #[test]
    fn test_decision_centers_over_children() {
        let result = layout("flowchart TD\nA{Pick} --> B\nA --> C");
        let a = result.nodes.iter().find(|n| n.id == "A").unwrap();
        let b = result.nodes.iter().find(|n| n.id == "B").unwrap();
        let c = result.nodes.iter().find(|n| n.id == "C").unwrap();
        assert_eq!(b.column, 0.0);
        assert_eq!(c.column, 1.0);
        assert_eq!(a.column, 0.5);
    }

    #[test]
    fn test_single_child_inherits_column() {
        let result = layout("flowchart TD\nA --> B\nB --> C\nB --> D\nC --> E");
        let col = |id: &str| result.nodes.iter().find(|n| n.id == id).unwrap().column;
        assert_eq!(col("C"), col("E"));
        assert_eq!(col("B"), 0.5);
        assert_eq!(col("A"), col("B"));
    }

    #[test]
    fn test_cycle_terminates_with_defined_levels() {
        let result = layout("flowchart TD\nA --> B\nB --> C\nC --> A");
        assert_eq!(result.nodes.len(), 3);
        assert_eq!(result.level("A"), Some(0));
        assert_eq!(result.level("B"), Some(1));
        assert_eq!(result.level("C"), Some(2));
        let back = result.edges.iter().find(|e| e.from_id == "C").unwrap();
        assert_eq!(back.waypoints.len(), 2);
    }

    #[test]
    fn test_decision_back_edge_is_a_tree_edge() {
        let result = layout("flowchart TD\nA --> B\nB{Retry?} --> A\nB --> C");
        let back = result
            .edges
            .iter()
            .find(|e| e.from_id == "B" && e.to_id == "A")
            .unwrap();
        assert!(back.tree_edge);
        assert!(!back.waypoints.is_empty());
    }

    #[test]
    fn test_disconnected_nodes_get_distinct_columns() {
        let result = layout("flowchart TD\nA[One]\nB[Two]\nC[Three]");
        let xs: Vec<i32> = result.nodes.iter().map(|n| n.position.x).collect();
        assert_eq!(xs, vec![100, 300, 500]);
        assert!(result.nodes.iter().all(|n| n.level == 0));
    }

    #[test]
    fn test_horizontal_swaps_axes() {
        let result = layout("flowchart LR\nA --> B");
        assert_eq!(result.position("A").map(|p| (p.x, p.y)), Some((100, 40)));
        assert_eq!(result.position("B").map(|p| (p.x, p.y)), Some((300, 40)));
    }

    #[test]
    fn test_reversed_directions_mirror_levels() {
        let bt = layout("flowchart BT\nA --> B");
        assert!(bt.position("A").unwrap().y > bt.position("B").unwrap().y);
        let rl = layout("flowchart RL\nA --> B");
        assert!(rl.position("A").unwrap().x > rl.position("B").unwrap().x);
    }

    #[test]
    fn test_self_loop_gets_a_route() {
        let result = layout("flowchart TD\nA --> A");
        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.edges[0].waypoints.len(), 2);
    }

    #[test]
    fn test_everything_on_grid() {
        let result = layout(
            "flowchart TD\nA([Begin]) --> B{Long decision label here}\nB --> C((Round))\nB --> D[[Sub]]\nD --> A",
        );
        for node in &result.nodes {
            assert_eq!(node.position.x % 10, 0, "{} x", node.id);
            assert_eq!(node.position.y % 10, 0, "{} y", node.id);
        }
        for edge in &result.edges {
            for point in &edge.waypoints {
                assert_eq!(point.x % 10, 0);
                assert_eq!(point.y % 10, 0);
            }
        }
    }

    #[test]
    fn test_empty_database() {
        let db = FlowchartDatabase::new();
        let result = FlowchartLayoutAlgorithm::new().layout(&db).unwrap();
        assert!(result.nodes.is_empty());
        assert!(result.edges.is_empty());
    }
}
