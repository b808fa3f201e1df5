//! Flowchart renderers
//!
//! Both formats run the leveled-tree layout first so the Markdown page and
//! the draw.io document describe the same diagram.

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, span, trace, Level};

use super::{FlowchartDatabase, FlowchartLayoutAlgorithm, FlowchartLayoutResult};
use crate::core::drawio::{DrawioDocument, EdgeEnds};
use crate::core::markdown::MarkdownPage;
use crate::core::{lexicon, Database, LayoutAlgorithm, OutputFormat, Position, Renderer};

/// Space between a subgraph border and its members
const GROUP_PADDING: i32 = 20;
/// Height of a subgraph title bar
const GROUP_TITLE: i32 = 30;
const GROUP_STYLE: &str =
    "swimlane;startSize=30;whiteSpace=wrap;html=1;dashed=1;fillColor=none;collapsible=0;";

/// Flowchart renderer implementation
pub struct FlowchartRenderer {
    format: OutputFormat,
    layout: FlowchartLayoutAlgorithm,
}

impl FlowchartRenderer {
    pub fn new() -> Self {
        Self::with_format(OutputFormat::default())
    }

    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            format,
            layout: FlowchartLayoutAlgorithm::new(),
        }
    }

    /// Use a custom layout, e.g. one with different spacing
    pub fn with_layout(mut self, layout: FlowchartLayoutAlgorithm) -> Self {
        self.layout = layout;
        self
    }

    fn render_drawio(
        &self,
        database: &FlowchartDatabase,
        layout: &FlowchartLayoutResult,
    ) -> Result<String> {
        let mut doc = DrawioDocument::new("Flowchart");
        let positions = layout.positions();

        for group in database.subgraphs() {
            let members: Vec<Position> = group
                .members
                .iter()
                .filter_map(|id| positions.get(id).copied())
                .collect();
            if let Some(bounds) = group_bounds(&members) {
                let cell = doc.add_vertex(&group.label, GROUP_STYLE, bounds);
                trace!(subgraph = %group.id, cell = %cell, "Emitted subgraph container");
            }
        }

        let mut cells: HashMap<&str, String> = HashMap::new();
        for node in database.nodes() {
            let Some(position) = positions.get(&node.id) else {
                continue;
            };
            let cell = doc.add_vertex(&node.label, &lexicon::node_style(node), *position);
            cells.insert(node.id.as_str(), cell);
        }

        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        for (edge, placed) in database.edges().zip(layout.edges.iter()) {
            if !seen.insert((edge.from.as_str(), edge.to.as_str())) {
                trace!(from = %edge.from, to = %edge.to, "Dropping duplicate connection");
                continue;
            }
            let (Some(source), Some(target)) =
                (cells.get(edge.from.as_str()), cells.get(edge.to.as_str()))
            else {
                continue;
            };
            doc.add_edge(
                edge.label_text(),
                &lexicon::arrow_style(edge.arrow),
                EdgeEnds::Cells {
                    source: source.clone(),
                    target: target.clone(),
                },
                &placed.waypoints,
            );
        }

        debug!(
            vertices = doc.vertex_count(),
            edges = doc.edge_count(),
            "Built flowchart document"
        );
        doc.finish()
    }

    fn render_markdown(
        &self,
        database: &FlowchartDatabase,
        layout: &FlowchartLayoutResult,
    ) -> String {
        let mut page = MarkdownPage::new("Flowchart");
        page.paragraph(&format!(
            "Direction `{}` with {} nodes, {} connections and {} subgraphs. The layout spans {} x {} units.",
            database.direction(),
            database.node_count(),
            database.edge_count(),
            database.subgraph_count(),
            layout.width,
            layout.height
        ));

        page.heading("Nodes");
        let rows: Vec<Vec<String>> = database
            .nodes()
            .map(|node| {
                vec![
                    format!("`{}`", node.id),
                    node.label.clone(),
                    node.shape.to_string(),
                    layout
                        .level(&node.id)
                        .map(|level| level.to_string())
                        .unwrap_or_default(),
                ]
            })
            .collect();
        page.table(&["ID", "Label", "Shape", "Level"], &rows);

        page.heading("Connections");
        let rows: Vec<Vec<String>> = database
            .edges()
            .map(|edge| {
                vec![
                    display_name(database, &edge.from),
                    display_name(database, &edge.to),
                    edge.label_text().to_string(),
                    format!("`{}`", edge.arrow),
                ]
            })
            .collect();
        page.table(&["From", "To", "Label", "Arrow"], &rows);

        page.heading("Subgraphs");
        page.bullets(database.subgraphs().map(|group| {
            let members: Vec<String> = group
                .members
                .iter()
                .map(|id| display_name(database, id))
                .collect();
            format!("**{}**: {}", group.label, members.join(", "))
        }));

        page.finish()
    }
}

impl Default for FlowchartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn display_name(database: &FlowchartDatabase, id: &str) -> String {
    database
        .get_node(id)
        .map(|node| node.label.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Bounding box around member boxes, with room for the title bar
fn group_bounds(members: &[Position]) -> Option<Position> {
    let left = members.iter().map(|p| p.x).min()?;
    let top = members.iter().map(|p| p.y).min()?;
    let right = members.iter().map(|p| p.right()).max()?;
    let bottom = members.iter().map(|p| p.bottom()).max()?;
    Some(Position::new(
        left - GROUP_PADDING,
        top - GROUP_PADDING - GROUP_TITLE,
        right - left + 2 * GROUP_PADDING,
        bottom - top + 2 * GROUP_PADDING + GROUP_TITLE,
    ))
}

impl Renderer<FlowchartDatabase> for FlowchartRenderer {
    type Output = String;

    fn render(&self, database: &FlowchartDatabase) -> Result<Self::Output> {
        let render_span = span!(
            Level::INFO,
            "render_flowchart",
            format = %self.format,
            node_count = database.node_count(),
            edge_count = database.edge_count()
        );
        let _enter = render_span.enter();

        let layout = self.layout.layout(database)?;
        let output = match self.format {
            OutputFormat::Drawio => self.render_drawio(database, &layout)?,
            OutputFormat::Markdown => self.render_markdown(database, &layout),
        };

        info!(output_len = output.len(), "Flowchart rendered");
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "flowchart"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> OutputFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parser;
    use crate::plugins::flowchart::FlowchartParser;

    fn parse(input: &str) -> FlowchartDatabase {
        let mut db = FlowchartDatabase::new();
        FlowchartParser::new().parse(input, &mut db).unwrap();
        db
    }

    #[test]
    fn test_drawio_document_shape() {
        let db = parse("flowchart TD\nA[Start] --> B{Ok?}\nB -->|yes| C");
        let xml = FlowchartRenderer::with_format(OutputFormat::Drawio)
            .render(&db)
            .unwrap();
        assert!(xml.starts_with("<mxfile"));
        assert!(xml.contains("value=\"Start\""));
        assert!(xml.contains("rhombus;"));
        assert!(xml.contains("value=\"yes\""));
        assert_eq!(xml.matches("vertex=\"1\"").count(), 3);
        assert_eq!(xml.matches("edge=\"1\"").count(), 2);
    }

    #[test]
    fn test_duplicate_connections_emitted_once() {
        let db = parse("flowchart TD\nA --> B\nA -->|again| B\nB --> A");
        assert_eq!(db.edge_count(), 3);
        let xml = FlowchartRenderer::new().render(&db).unwrap();
        assert_eq!(xml.matches("edge=\"1\"").count(), 2);
        assert!(!xml.contains("value=\"again\""));
    }

    #[test]
    fn test_back_edge_carries_waypoints() {
        let db = parse("flowchart TD\nA --> B\nB --> A");
        let xml = FlowchartRenderer::new().render(&db).unwrap();
        assert!(xml.contains("<Array as=\"points\">"));
    }

    #[test]
    fn test_subgraph_container_precedes_members() {
        let db = parse("flowchart LR\nsubgraph core[Core]\nA --> B\nend");
        let xml = FlowchartRenderer::new().render(&db).unwrap();
        let group = xml.find("value=\"Core\"").unwrap();
        let member = xml.find("value=\"A\"").unwrap();
        assert!(group < member);
        assert!(xml.contains("swimlane;"));
    }

    #[test]
    fn test_markdown_sections() {
        let db = parse("flowchart LR\nsubgraph g[Group]\nA[Alpha] -->|go| B[Beta]\nend");
        let page = FlowchartRenderer::with_format(OutputFormat::Markdown)
            .render(&db)
            .unwrap();
        assert!(page.starts_with("# Flowchart"));
        assert!(page.contains("Direction `LR`"));
        assert!(page.contains("## Nodes"));
        assert!(page.contains("| `A` | Alpha | rectangle | 0 |"));
        assert!(page.contains("| Alpha | Beta | go | `-->` |"));
        assert!(page.contains("- **Group**: Alpha, Beta"));
    }

    #[test]
    fn test_group_bounds() {
        let bounds = group_bounds(&[
            Position::new(100, 100, 120, 60),
            Position::new(300, 100, 120, 60),
        ])
        .unwrap();
        assert_eq!(bounds, Position::new(80, 50, 360, 130));
        assert!(group_bounds(&[]).is_none());
    }
}
