//! Mindmap renderers

use anyhow::Result;
use std::collections::HashMap;
use tracing::{info, span, trace, Level};

use super::database::{MindmapDatabase, MindmapNode};
use super::layout::{MindmapLayoutAlgorithm, MindmapLayoutResult};
use crate::core::drawio::{DrawioDocument, EdgeEnds};
use crate::core::markdown::MarkdownPage;
use crate::core::{lexicon, Database, LayoutAlgorithm, NodeData, OutputFormat, Renderer};

const BRANCH_STYLE: &str = "edgeStyle=entityRelationEdgeStyle;curved=1;html=1;endArrow=none;startArrow=none;";

/// draw.io style for a topic, coloured by its depth
pub fn topic_style(node: &MindmapNode) -> String {
    let data = NodeData::with_shape(node.id.as_str(), node.label.as_str(), node.shape)
        .styled(node.style);
    lexicon::node_style(&data)
}

/// Mindmap renderer
pub struct MindmapRenderer {
    format: OutputFormat,
    layout: MindmapLayoutAlgorithm,
}

impl MindmapRenderer {
    pub fn new() -> Self {
        Self::with_format(OutputFormat::default())
    }

    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            format,
            layout: MindmapLayoutAlgorithm::new(),
        }
    }

    fn render_drawio(
        &self,
        database: &MindmapDatabase,
        layout: &MindmapLayoutResult,
    ) -> Result<String> {
        let mut doc = DrawioDocument::new("Mindmap");
        let mut cells: HashMap<&str, String> = HashMap::new();

        for (node, placed) in database.nodes().zip(layout.topics.iter()) {
            let cell = doc.add_vertex(&node.label, &topic_style(node), placed.position);
            cells.insert(node.id.as_str(), cell);
        }

        for edge in database.edges() {
            let (Some(source), Some(target)) =
                (cells.get(edge.from.as_str()), cells.get(edge.to.as_str()))
            else {
                trace!(from = %edge.from, to = %edge.to, "Branch endpoint missing");
                continue;
            };
            doc.add_edge(
                "",
                BRANCH_STYLE,
                EdgeEnds::Cells {
                    source: source.clone(),
                    target: target.clone(),
                },
                &[],
            );
        }

        doc.finish()
    }

    fn render_markdown(&self, database: &MindmapDatabase) -> String {
        let mut page = MarkdownPage::new("Mindmap");
        let roots = database.roots();
        page.paragraph(&format!(
            "{} topics under {} {}.",
            database.node_count(),
            roots.len(),
            if roots.len() == 1 { "root" } else { "roots" }
        ));

        page.heading("Outline");
        if roots.is_empty() {
            page.paragraph("_None._");
            return page.finish();
        }

        let mut seen = vec![false; database.node_count()];
        for root in roots {
            let mut stack = vec![(root, 0usize)];
            while let Some((id, depth)) = stack.pop() {
                let Some(slot) = database.node_index(id) else {
                    continue;
                };
                if seen[slot] {
                    continue;
                }
                seen[slot] = true;
                if let Some(node) = database.get_node(id) {
                    page.nested_bullet(depth, &node.label);
                }
                for child in database.children(id).into_iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }
        page.end_list();

        page.finish()
    }
}

impl Default for MindmapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer<MindmapDatabase> for MindmapRenderer {
    type Output = String;

    fn render(&self, database: &MindmapDatabase) -> Result<Self::Output> {
        let render_span = span!(
            Level::INFO,
            "render_mindmap",
            format = %self.format,
            node_count = database.node_count()
        );
        let _enter = render_span.enter();

        let output = match self.format {
            OutputFormat::Drawio => {
                let layout = self.layout.layout(database)?;
                self.render_drawio(database, &layout)?
            }
            OutputFormat::Markdown => self.render_markdown(database),
        };

        info!(output_len = output.len(), "Mindmap rendered");
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "mindmap"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> OutputFormat {
        self.format
    }
}
