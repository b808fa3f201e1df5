//! Sequence diagram renderers
//!
//! draw.io output uses lifeline cells whose height reaches the end of the
//! timeline; messages are free edges between lifeline x positions.

use anyhow::Result;
use tracing::{info, span, Level};

use super::database::{ArrowHead, LineKind, Message, SequenceDatabase};
use super::layout::{SequenceLayoutAlgorithm, SequenceLayoutResult};
use crate::core::drawio::{DrawioDocument, EdgeEnds};
use crate::core::markdown::MarkdownPage;
use crate::core::{Database, LayoutAlgorithm, OutputFormat, Point, Position, Renderer};

const LIFELINE_STYLE: &str =
    "shape=umlLifeline;perimeter=lifelinePerimeter;whiteSpace=wrap;html=1;container=0;collapsible=0;recursiveResize=0;outlineConnect=0;";
const ACTOR_STYLE: &str =
    "shape=umlLifeline;perimeter=lifelinePerimeter;participant=umlActor;whiteSpace=wrap;html=1;container=0;collapsible=0;recursiveResize=0;verticalAlign=top;spacingTop=36;outlineConnect=0;";
/// Horizontal reach of a self-message loop
const SELF_LOOP: i32 = 40;

/// draw.io style for a message edge
pub fn message_style(message: &Message) -> String {
    let mut style = String::from("html=1;verticalAlign=bottom;");
    style.push_str(match message.head {
        ArrowHead::Filled => "endArrow=block;endFill=1;",
        ArrowHead::Open => "endArrow=open;endFill=0;",
        ArrowHead::Cross => "endArrow=cross;endFill=0;",
        ArrowHead::None => "endArrow=none;",
    });
    if message.line == LineKind::Dashed {
        style.push_str("dashed=1;");
    }
    style
}

/// Sequence diagram renderer
pub struct SequenceRenderer {
    format: OutputFormat,
    layout: SequenceLayoutAlgorithm,
}

impl SequenceRenderer {
    pub fn new() -> Self {
        Self::with_format(OutputFormat::default())
    }

    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            format,
            layout: SequenceLayoutAlgorithm::new(),
        }
    }

    fn render_drawio(
        &self,
        database: &SequenceDatabase,
        layout: &SequenceLayoutResult,
    ) -> Result<String> {
        let mut doc = DrawioDocument::new("Sequence");

        for (participant, placed) in database.nodes().zip(layout.participants.iter()) {
            let style = if participant.is_actor {
                ACTOR_STYLE
            } else {
                LIFELINE_STYLE
            };
            let geometry = Position::new(
                placed.position.x,
                placed.position.y,
                placed.position.width,
                layout.lifeline_end - placed.position.y,
            );
            doc.add_vertex(&participant.label, style, geometry);
        }

        for (message, slot) in database.messages().iter().zip(layout.messages.iter()) {
            let (target, waypoints) = if message.is_self_message() {
                let out = slot.from_x + SELF_LOOP;
                (
                    Point::new(slot.to_x, slot.y + 20),
                    vec![Point::new(out, slot.y), Point::new(out, slot.y + 20)],
                )
            } else {
                (Point::new(slot.to_x, slot.y), Vec::new())
            };
            doc.add_edge(
                &message.text,
                &message_style(message),
                EdgeEnds::Points {
                    source: Point::new(slot.from_x, slot.y),
                    target,
                },
                &waypoints,
            );
        }

        doc.finish()
    }

    fn render_markdown(&self, database: &SequenceDatabase) -> String {
        let mut page = MarkdownPage::new("Sequence Diagram");
        page.paragraph(&format!(
            "{} participants exchange {} messages.",
            database.node_count(),
            database.edge_count()
        ));

        page.heading("Participants");
        page.bullets(database.nodes().map(|participant| {
            let kind = if participant.is_actor {
                "actor"
            } else {
                "participant"
            };
            if participant.label == participant.id {
                format!("**{}** ({})", participant.label, kind)
            } else {
                format!("**{}** (`{}`, {})", participant.label, participant.id, kind)
            }
        }));

        page.heading("Steps");
        let label = |id: &str| {
            database
                .get_node(id)
                .map(|p| p.label.clone())
                .unwrap_or_else(|| id.to_string())
        };
        let rows: Vec<Vec<String>> = database
            .messages()
            .iter()
            .enumerate()
            .map(|(step, message)| {
                vec![
                    (step + 1).to_string(),
                    label(&message.from),
                    label(&message.to),
                    message.text.clone(),
                    if message.is_async { "async" } else { "sync" }.to_string(),
                ]
            })
            .collect();
        page.table(&["#", "From", "To", "Message", "Kind"], &rows);

        page.finish()
    }
}

impl Default for SequenceRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer<SequenceDatabase> for SequenceRenderer {
    type Output = String;

    fn render(&self, database: &SequenceDatabase) -> Result<Self::Output> {
        let render_span = span!(
            Level::INFO,
            "render_sequence",
            format = %self.format,
            participant_count = database.node_count()
        );
        let _enter = render_span.enter();

        let output = match self.format {
            OutputFormat::Drawio => {
                let layout = self.layout.layout(database)?;
                self.render_drawio(database, &layout)?
            }
            OutputFormat::Markdown => self.render_markdown(database),
        };

        info!(output_len = output.len(), "Sequence diagram rendered");
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "sequence"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> OutputFormat {
        self.format
    }
}
