//! Entity-relationship renderers

use anyhow::Result;
use std::collections::HashMap;
use tracing::{info, span, trace, Level};

use super::database::{ErDatabase, Relationship};
use super::layout::{ErLayoutAlgorithm, ErLayoutResult, ROW_HEIGHT, TITLE_HEIGHT};
use crate::core::drawio::{DrawioDocument, EdgeEnds};
use crate::core::markdown::MarkdownPage;
use crate::core::{lexicon, Database, LayoutAlgorithm, OutputFormat, Position, Renderer};

const ENTITY_STYLE: &str = "swimlane;fontStyle=1;childLayout=stackLayout;horizontal=1;startSize=40;horizontalStack=0;resizeParent=1;resizeParentMax=0;resizeLast=0;collapsible=0;marginBottom=0;whiteSpace=wrap;html=1;";
const ATTRIBUTE_STYLE: &str = "text;strokeColor=none;fillColor=none;align=left;verticalAlign=middle;spacingLeft=8;overflow=hidden;rotatable=0;points=[[0,0.5],[1,0.5]];portConstraint=eastwest;whiteSpace=wrap;html=1;";

/// draw.io style for a relationship connector
pub fn relationship_style(relationship: &Relationship) -> String {
    let mut style = format!(
        "edgeStyle=entityRelationEdgeStyle;fontSize=12;html=1;startArrow={};endArrow={};startFill=0;endFill=0;",
        lexicon::cardinality_arrow(&relationship.cardinality_start),
        lexicon::cardinality_arrow(&relationship.cardinality_end)
    );
    if !relationship.identifying {
        style.push_str("dashed=1;");
    }
    style
}

/// Entity-relationship renderer
pub struct ErRenderer {
    format: OutputFormat,
    layout: ErLayoutAlgorithm,
}

impl ErRenderer {
    pub fn new() -> Self {
        Self::with_format(OutputFormat::default())
    }

    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            format,
            layout: ErLayoutAlgorithm::new(),
        }
    }

    fn render_drawio(&self, database: &ErDatabase, layout: &ErLayoutResult) -> Result<String> {
        let mut doc = DrawioDocument::new("Entity Relationship");
        let mut cells: HashMap<&str, String> = HashMap::new();

        for (entity, placed) in database.nodes().zip(layout.entities.iter()) {
            let cell = doc.add_vertex(&entity.label, ENTITY_STYLE, placed.position);
            for (row, attribute) in entity.attributes.iter().enumerate() {
                let geometry = Position::new(
                    0,
                    TITLE_HEIGHT + row as i32 * ROW_HEIGHT,
                    placed.position.width,
                    ROW_HEIGHT,
                );
                doc.add_child_vertex(&cell, &attribute.display(), ATTRIBUTE_STYLE, geometry);
            }
            cells.insert(entity.id.as_str(), cell);
        }

        for relationship in database.relationships() {
            let (Some(source), Some(target)) = (
                cells.get(relationship.source.as_str()),
                cells.get(relationship.target.as_str()),
            ) else {
                trace!(id = %relationship.id, "Relationship endpoint missing");
                continue;
            };
            doc.add_edge(
                &relationship.label,
                &relationship_style(relationship),
                EdgeEnds::Cells {
                    source: source.clone(),
                    target: target.clone(),
                },
                &[],
            );
        }

        doc.finish()
    }

    fn render_markdown(&self, database: &ErDatabase) -> String {
        let mut page = MarkdownPage::new("Entity Relationship Diagram");
        page.paragraph(&format!(
            "{} entities with {} attributes and {} relationships.",
            database.node_count(),
            database.attribute_count(),
            database.edge_count()
        ));

        page.heading("Entities");
        for entity in database.entities() {
            page.paragraph(&format!("### {}", entity.label));
            let rows: Vec<Vec<String>> = entity
                .attributes
                .iter()
                .map(|attribute| {
                    vec![
                        format!("`{}`", attribute.name),
                        attribute.ty.clone(),
                        attribute.keys.join(", "),
                        attribute.comment.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            page.table(&["Attribute", "Type", "Keys", "Comment"], &rows);
        }

        page.heading("Relationships");
        let rows: Vec<Vec<String>> = database
            .relationships()
            .iter()
            .map(|relationship| {
                vec![
                    relationship.source.clone(),
                    format!(
                        "`{}{}{}`",
                        relationship.cardinality_start,
                        if relationship.identifying { "--" } else { ".." },
                        relationship.cardinality_end
                    ),
                    relationship.target.clone(),
                    relationship.label.clone(),
                ]
            })
            .collect();
        page.table(&["From", "Cardinality", "To", "Label"], &rows);

        page.finish()
    }
}

impl Default for ErRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer<ErDatabase> for ErRenderer {
    type Output = String;

    fn render(&self, database: &ErDatabase) -> Result<Self::Output> {
        let render_span = span!(
            Level::INFO,
            "render_er",
            format = %self.format,
            entity_count = database.node_count()
        );
        let _enter = render_span.enter();

        let output = match self.format {
            OutputFormat::Drawio => {
                let layout = self.layout.layout(database)?;
                self.render_drawio(database, &layout)?
            }
            OutputFormat::Markdown => self.render_markdown(database),
        };

        info!(output_len = output.len(), "ER diagram rendered");
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "erDiagram"
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
    use crate::plugins::er::ErParser;

    fn parse(input: &str) -> ErDatabase {
        let mut db = ErDatabase::new();
        ErParser::new().parse(input, &mut db).unwrap();
        db
    }

    #[test]
    fn test_drawio_entities_and_rows() {
        let db = parse(
            "erDiagram\nUSER {\n string id PK\n string name\n}\nUSER ||--o{ POST : writes",
        );
        let xml = ErRenderer::new().render(&db).unwrap();
        assert!(xml.starts_with("<mxfile"));
        assert_eq!(xml.matches("swimlane;").count(), 2);
        assert!(xml.contains("value=\"string id PK\""));
        assert!(xml.contains("startArrow=ERmandOne;endArrow=ERzeroToMany;"));
        assert!(xml.contains("value=\"writes\""));
    }

    #[test]
    fn test_non_identifying_is_dashed() {
        let relationship = Relationship::new("A", "B", "|o", "}|").identifying(false);
        let style = relationship_style(&relationship);
        assert!(style.contains("startArrow=ERzeroToOne"));
        assert!(style.contains("endArrow=ERoneToMany"));
        assert!(style.contains("dashed=1;"));
    }

    #[test]
    fn test_markdown_page() {
        let db = parse("erDiagram\nA ||--o{ B : \"has\"\nA { int id PK \"key\" }");
        let page = ErRenderer::with_format(OutputFormat::Markdown)
            .render(&db)
            .unwrap();
        assert!(page.starts_with("# Entity Relationship Diagram"));
        assert!(page.contains("### A"));
        assert!(page.contains("| `id` | int | PK | key |"));
        assert!(page.contains("| A | `\\|\\|--o{` | B | has |"));
    }
}
