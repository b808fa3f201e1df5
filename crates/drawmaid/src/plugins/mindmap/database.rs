//! Mindmap database implementation

use anyhow::Result;
use std::collections::HashMap;

use crate::core::{Database, EdgeData, NodeShape, StyleRef};

/// A mindmap topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MindmapNode {
    /// Synthetic id (`mm<n>`)
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
    /// Indentation depth in the source
    pub depth: usize,
    pub style: StyleRef,
}

impl MindmapNode {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        shape: NodeShape,
        depth: usize,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape,
            depth,
            style: StyleRef::Palette(depth),
        }
    }
}

/// Mindmap database: topics plus parent→child links
#[derive(Debug, Default)]
pub struct MindmapDatabase {
    nodes: Vec<MindmapNode>,
    index: HashMap<String, usize>,
    edges: Vec<EdgeData>,
}

impl MindmapDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next synthetic node id
    pub fn next_id(&self) -> String {
        format!("mm{}", self.nodes.len() + 1)
    }

    /// Children of a node in insertion order
    pub fn children(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.from == id)
            .map(|e| e.to.as_str())
            .collect()
    }

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.edges
            .iter()
            .find(|e| e.to == id)
            .map(|e| e.from.as_str())
    }

    /// Nodes without a parent
    pub fn roots(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| self.parent(&n.id).is_none())
            .map(|n| n.id.as_str())
            .collect()
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}

impl Database for MindmapDatabase {
    type Node = MindmapNode;
    type Edge = EdgeData;

    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        match self.index.get(&node.id) {
            Some(&slot) => self.nodes[slot] = node,
            None => {
                self.index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
        Ok(())
    }

    fn add_edge(&mut self, mut edge: Self::Edge) -> Result<()> {
        if edge.id.is_empty() {
            edge.id = format!("l{}", self.edges.len() + 1);
        }
        self.edges.push(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&Self::Node> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.nodes.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.edges.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.edges.clear();
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
