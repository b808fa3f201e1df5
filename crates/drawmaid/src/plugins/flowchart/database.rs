//! Flowchart database implementation
//!
//! Stores flowchart nodes with shapes, edges with arrow kinds and labels,
//! subgraph groups, and the flow direction.

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

use crate::core::{Database, Direction, EdgeData, NodeData, NodeShape};

/// A subgraph container grouping related nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subgraph {
    /// Identifier, either declared (`subgraph id[Title]`) or `subgraph_<n>`
    pub id: String,
    /// Display title
    pub label: String,
    /// Member node IDs in first-mention order, without duplicates
    pub members: Vec<String>,
}

impl Subgraph {
    /// Create an empty subgraph
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            members: Vec::new(),
        }
    }

    /// Add a member if it is not already present
    pub fn add_member(&mut self, node_id: &str) {
        if !self.contains(node_id) {
            self.members.push(node_id.to_string());
        }
    }

    /// Check membership
    pub fn contains(&self, node_id: &str) -> bool {
        self.members.iter().any(|m| m == node_id)
    }
}

/// Flowchart database implementation
///
/// Maintains insertion order for deterministic layout. A node declared with
/// an explicit shape keeps that shape until another explicit declaration
/// replaces it; bare references never downgrade it.
#[derive(Debug, Default)]
pub struct FlowchartDatabase {
    /// Flow direction for the diagram
    direction: Direction,
    /// Nodes indexed by ID
    nodes: HashMap<String, NodeData>,
    /// Node IDs in insertion order
    node_order: Vec<String>,
    /// Nodes that carry explicit shape information
    shaped: HashSet<String>,
    /// Edges in insertion order
    edges: Vec<EdgeData>,
    /// Sealed subgraphs in closing order
    subgraphs: Vec<Subgraph>,
    /// The group currently open, if any
    open_group: Option<Subgraph>,
    /// Counter for generating synthetic subgraph IDs
    subgraph_counter: usize,
}

impl FlowchartDatabase {
    /// Create a new empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new database with a specific direction
    pub fn with_direction(direction: Direction) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }

    /// Set the flow direction
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Get the flow direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Check if a node exists
    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Check if a node was declared with an explicit shape
    pub fn has_explicit_shape(&self, id: &str) -> bool {
        self.shaped.contains(id)
    }

    /// Create or update a node
    ///
    /// With shape information the node is (re)declared: shape and label are
    /// overwritten. Without it the node is only created if missing.
    pub fn upsert_node(&mut self, id: &str, shape: Option<(NodeShape, String)>) -> Result<()> {
        match shape {
            Some((shape, label)) => self.add_node(NodeData::with_shape(id, label, shape)),
            None => {
                if !self.has_node(id) {
                    trace!(node_id = %id, "Creating node from bare reference");
                    self.node_order.push(id.to_string());
                    self.nodes.insert(id.to_string(), NodeData::new(id, id));
                }
                Ok(())
            }
        }
    }

    /// Get in-degree (number of incoming edges) for a node
    pub fn in_degree(&self, node_id: &str) -> usize {
        self.edges.iter().filter(|e| e.to == node_id).count()
    }

    /// Get out-degree (number of outgoing edges) for a node
    pub fn out_degree(&self, node_id: &str) -> usize {
        self.edges.iter().filter(|e| e.from == node_id).count()
    }

    /// Get IDs of nodes that this node points to
    pub fn successors(&self, node_id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.from == node_id)
            .map(|e| e.to.as_str())
            .collect()
    }

    /// Get IDs of nodes that point to this node
    pub fn predecessors(&self, node_id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.to == node_id)
            .map(|e| e.from.as_str())
            .collect()
    }

    /// Get source nodes (no incoming edges) in declaration order
    pub fn source_nodes(&self) -> Vec<&str> {
        self.node_order
            .iter()
            .filter(|id| self.in_degree(id) == 0)
            .map(|id| id.as_str())
            .collect()
    }

    /// Get sink nodes (no outgoing edges) in declaration order
    pub fn sink_nodes(&self) -> Vec<&str> {
        self.node_order
            .iter()
            .filter(|id| self.out_degree(id) == 0)
            .map(|id| id.as_str())
            .collect()
    }

    /// Get edges between two specific nodes
    pub fn edges_between(&self, from: &str, to: &str) -> Vec<&EdgeData> {
        self.edges
            .iter()
            .filter(|e| e.from == from && e.to == to)
            .collect()
    }

    /// Open a subgraph group
    ///
    /// Without an explicit id a synthetic `subgraph_<n>` id is generated.
    /// Groups do not nest: a group that is still open is discarded.
    pub fn open_subgraph(&mut self, id: Option<String>, label: impl Into<String>) -> String {
        let id = id.unwrap_or_else(|| {
            let generated = format!("subgraph_{}", self.subgraph_counter);
            self.subgraph_counter += 1;
            generated
        });
        if let Some(abandoned) = self.open_group.take() {
            debug!(subgraph_id = %abandoned.id, "Discarding unclosed subgraph");
        }
        trace!(subgraph_id = %id, "Opening subgraph");
        self.open_group = Some(Subgraph::new(id.clone(), label));
        id
    }

    /// Seal the open group, returning its id
    pub fn close_subgraph(&mut self) -> Option<String> {
        let group = self.open_group.take()?;
        let id = group.id.clone();
        trace!(subgraph_id = %id, member_count = group.members.len(), "Sealing subgraph");
        self.subgraphs.push(group);
        Some(id)
    }

    /// Record a node as a member of the open group, if any
    pub fn record_membership(&mut self, node_id: &str) {
        if let Some(group) = self.open_group.as_mut() {
            group.add_member(node_id);
        }
    }

    /// The group currently open, if any
    pub fn active_subgraph(&self) -> Option<&Subgraph> {
        self.open_group.as_ref()
    }

    /// Drop any group left open at the end of input
    pub fn discard_open_subgraph(&mut self) {
        if let Some(group) = self.open_group.take() {
            debug!(subgraph_id = %group.id, "Dropping subgraph without end marker");
        }
    }

    /// Get a subgraph by ID
    pub fn get_subgraph(&self, id: &str) -> Option<&Subgraph> {
        self.subgraphs.iter().find(|s| s.id == id)
    }

    /// Iterate over all sealed subgraphs
    pub fn subgraphs(&self) -> impl Iterator<Item = &Subgraph> {
        self.subgraphs.iter()
    }

    /// Get the first subgraph that contains a given node, if any
    pub fn node_subgraph(&self, node_id: &str) -> Option<&Subgraph> {
        self.subgraphs.iter().find(|s| s.contains(node_id))
    }

    /// Get the count of sealed subgraphs
    pub fn subgraph_count(&self) -> usize {
        self.subgraphs.len()
    }

    /// Position of a node in declaration order
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.node_order.iter().position(|n| n == id)
    }
}

impl Database for FlowchartDatabase {
    type Node = NodeData;
    type Edge = EdgeData;

    /// Declare a node explicitly; the last declaration wins
    fn add_node(&mut self, node: NodeData) -> Result<()> {
        trace!(
            node_id = %node.id,
            node_label = %node.label,
            node_shape = ?node.shape,
            "Declaring node"
        );
        if !self.nodes.contains_key(&node.id) {
            self.node_order.push(node.id.clone());
        }
        self.shaped.insert(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Append an edge, creating missing endpoints and assigning an `e<n>` id
    fn add_edge(&mut self, mut edge: EdgeData) -> Result<()> {
        self.upsert_node(&edge.from, None)?;
        self.upsert_node(&edge.to, None)?;
        if edge.id.is_empty() {
            edge.id = format!("e{}", self.edges.len() + 1);
        }
        trace!(
            edge_id = %edge.id,
            edge_from = %edge.from,
            edge_to = %edge.to,
            arrow = ?edge.arrow,
            edge_label = ?edge.label,
            "Adding edge"
        );
        self.edges.push(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    fn edges(&self) -> impl Iterator<Item = &EdgeData> {
        self.edges.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.node_order.clear();
        self.shaped.clear();
        self.edges.clear();
        self.subgraphs.clear();
        self.open_group = None;
        self.subgraph_counter = 0;
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
