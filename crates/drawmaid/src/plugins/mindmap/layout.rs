//! Mindmap tree layout
//!
//! Levels run left to right. Each subtree gets a vertical band as tall as
//! its children's bands plus sibling gaps (or the node itself, if taller),
//! and every node is centred in its band.

use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, span, Level};

use super::database::MindmapDatabase;
use crate::core::{lexicon, Database, LayoutAlgorithm, LayoutConfig, Position};

/// Vertical space between sibling bands
const SIBLING_GAP: i32 = 20;

/// Placed mindmap topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedTopic {
    pub id: String,
    /// Distance from the topic's root
    pub level: usize,
    pub position: Position,
}

/// Result of the mindmap layout
#[derive(Debug, Clone)]
pub struct MindmapLayoutResult {
    pub topics: Vec<PositionedTopic>,
    pub width: i32,
    pub height: i32,
}

impl MindmapLayoutResult {
    pub fn position(&self, id: &str) -> Option<Position> {
        self.topics.iter().find(|t| t.id == id).map(|t| t.position)
    }
}

/// Mindmap layout algorithm
pub struct MindmapLayoutAlgorithm {
    config: LayoutConfig,
}

impl MindmapLayoutAlgorithm {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }
}

impl Default for MindmapLayoutAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutAlgorithm<MindmapDatabase> for MindmapLayoutAlgorithm {
    type Output = MindmapLayoutResult;

    fn layout(&self, database: &MindmapDatabase) -> Result<Self::Output> {
        let layout_span = span!(Level::INFO, "layout_mindmap", node_count = database.node_count());
        let _enter = layout_span.enter();

        let count = database.node_count();
        let sizes: Vec<(i32, i32)> = database
            .nodes()
            .map(|node| lexicon::node_size(node.shape, &node.label))
            .collect();
        let children: Vec<Vec<usize>> = database
            .nodes()
            .map(|node| {
                database
                    .children(&node.id)
                    .into_iter()
                    .filter_map(|child| database.node_index(child))
                    .collect()
            })
            .collect();
        let roots: Vec<usize> = database
            .roots()
            .into_iter()
            .filter_map(|id| database.node_index(id))
            .collect();

        // Preorder with levels; each node is visited once
        let mut visited = vec![false; count];
        let mut level = vec![0usize; count];
        let mut preorder = Vec::with_capacity(count);
        for &root in &roots {
            let mut stack = vec![root];
            while let Some(u) = stack.pop() {
                if visited[u] {
                    continue;
                }
                visited[u] = true;
                preorder.push(u);
                for &c in children[u].iter().rev() {
                    if !visited[c] {
                        level[c] = level[u] + 1;
                        stack.push(c);
                    }
                }
            }
        }

        let mut extent = vec![0i32; count];
        for &u in preorder.iter().rev() {
            let kids: Vec<usize> = children[u]
                .iter()
                .copied()
                .filter(|&c| level[c] == level[u] + 1)
                .collect();
            let stacked: i32 = kids.iter().map(|&c| extent[c]).sum::<i32>()
                + SIBLING_GAP * kids.len().saturating_sub(1) as i32;
            extent[u] = sizes[u].1.max(stacked);
        }

        // Top of each node's band
        let mut band_top: HashMap<usize, i32> = HashMap::new();
        let mut cursor = self.config.origin_y;
        for &root in &roots {
            band_top.insert(root, cursor);
            cursor += extent[root] + SIBLING_GAP * 2;
        }
        for &u in &preorder {
            let top = band_top.get(&u).copied().unwrap_or(self.config.origin_y);
            let kids: Vec<usize> = children[u]
                .iter()
                .copied()
                .filter(|&c| level[c] == level[u] + 1)
                .collect();
            let stacked: i32 = kids.iter().map(|&c| extent[c]).sum::<i32>()
                + SIBLING_GAP * kids.len().saturating_sub(1) as i32;
            let mut child_top = top + (extent[u] - stacked).max(0) / 2;
            for c in kids {
                band_top.entry(c).or_insert(child_top);
                child_top += extent[c] + SIBLING_GAP;
            }
        }

        let topics: Vec<PositionedTopic> = database
            .nodes()
            .enumerate()
            .map(|(i, node)| {
                let (width, height) = sizes[i];
                let top = band_top.get(&i).copied().unwrap_or(self.config.origin_y);
                let center_y = f64::from(top) + f64::from(extent[i]) / 2.0;
                let x = self.config.origin_x + level[i] as i32 * self.config.horizontal_gap;
                PositionedTopic {
                    id: node.id.clone(),
                    level: level[i],
                    position: Position::new(
                        self.config.snap(f64::from(x)),
                        self.config.snap(center_y - f64::from(height) / 2.0),
                        width,
                        height,
                    ),
                }
            })
            .collect();

        let width =
            topics.iter().map(|t| t.position.right()).max().unwrap_or(0) + self.config.origin_x;
        let height =
            topics.iter().map(|t| t.position.bottom()).max().unwrap_or(0) + self.config.origin_y;
        debug!(roots = roots.len(), width, height, "Mindmap layout completed");

        Ok(MindmapLayoutResult {
            topics,
            width,
            height,
        })
    }

    fn name(&self) -> &'static str {
        "mindmap-tree"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}
