//! Plugin orchestrator for coordinating the diagram processing pipeline
//!
//! Source → Detector → Parser → Database → (Start/Stop synthesis) → Layout
//! → Renderer. Dispatch is driven by the header line; input without a
//! recognised header is handled as a flowchart.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, span, trace, Level};

use crate::core::{
    source, Database, Detector, Diagram, DiagramKind, OutputFormat, Parser, Renderer,
};
use crate::plugins::er::{ErDatabase, ErDiagram, ErRenderer};
use crate::plugins::flowchart::{
    synthesize_terminals, FlowchartDatabase, FlowchartDiagram, FlowchartRenderer,
};
use crate::plugins::mindmap::{MindmapDatabase, MindmapDiagram, MindmapRenderer};
use crate::plugins::sequence::{SequenceDatabase, SequenceDiagram, SequenceRenderer};

/// A parsed diagram of any supported dialect
#[derive(Debug)]
pub enum ParsedDiagram {
    Flowchart(FlowchartDatabase),
    Sequence(SequenceDatabase),
    Er(ErDatabase),
    Mindmap(MindmapDatabase),
}

impl ParsedDiagram {
    pub fn kind(&self) -> DiagramKind {
        match self {
            Self::Flowchart(_) => DiagramKind::Flowchart,
            Self::Sequence(_) => DiagramKind::Sequence,
            Self::Er(_) => DiagramKind::Er,
            Self::Mindmap(_) => DiagramKind::Mindmap,
        }
    }

    /// Nodes, participants or entities
    pub fn node_count(&self) -> usize {
        match self {
            Self::Flowchart(db) => db.node_count(),
            Self::Sequence(db) => db.node_count(),
            Self::Er(db) => db.node_count(),
            Self::Mindmap(db) => db.node_count(),
        }
    }

    /// Edges, messages or relationships
    pub fn edge_count(&self) -> usize {
        match self {
            Self::Flowchart(db) => db.edge_count(),
            Self::Sequence(db) => db.edge_count(),
            Self::Er(db) => db.edge_count(),
            Self::Mindmap(db) => db.edge_count(),
        }
    }

    pub fn as_flowchart(&self) -> Option<&FlowchartDatabase> {
        match self {
            Self::Flowchart(db) => Some(db),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceDatabase> {
        match self {
            Self::Sequence(db) => Some(db),
            _ => None,
        }
    }

    pub fn as_er(&self) -> Option<&ErDatabase> {
        match self {
            Self::Er(db) => Some(db),
            _ => None,
        }
    }

    pub fn as_mindmap(&self) -> Option<&MindmapDatabase> {
        match self {
            Self::Mindmap(db) => Some(db),
            _ => None,
        }
    }
}

fn parse_with<D: Diagram>(input: &str) -> Result<D::Database> {
    let parser = D::create_parser();
    let mut database = D::create_database();
    parser.parse(input, &mut database)?;
    Ok(database)
}

/// Plugin orchestrator that coordinates the entire pipeline
pub struct Orchestrator {
    detectors: Vec<Arc<dyn Detector>>,
}

impl Orchestrator {
    /// Create an orchestrator with every dialect registered
    pub fn new() -> Self {
        Self {
            detectors: vec![
                FlowchartDiagram::detector(),
                SequenceDiagram::detector(),
                ErDiagram::detector(),
                MindmapDiagram::detector(),
            ],
        }
    }

    /// Registered dialect names, in registration order
    pub fn dialects(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.diagram_type()).collect()
    }

    /// Detect the dialect of the input
    ///
    /// A recognised header decides. Otherwise the input is a flowchart.
    pub fn detect(&self, input: &str) -> DiagramKind {
        let detect_span = span!(Level::INFO, "detect_diagram_type", input_len = input.len());
        let _enter = detect_span.enter();

        for detector in &self.detectors {
            if detector.detect(input) {
                debug!(dialect = detector.diagram_type(), "Header recognised");
                return detector.kind();
            }
            trace!(
                dialect = detector.diagram_type(),
                confidence = detector.confidence(input),
                "Detector declined"
            );
        }

        let fallback = source::detect_kind(input);
        debug!(dialect = %fallback, "No header recognised, using fallback");
        fallback
    }

    /// Parse the input with the parser for its dialect
    pub fn parse(&self, input: &str) -> Result<ParsedDiagram> {
        let parse_span = span!(Level::INFO, "parse_diagram", input_len = input.len());
        let _enter = parse_span.enter();

        let parsed = match self.detect(input) {
            DiagramKind::Flowchart => {
                ParsedDiagram::Flowchart(parse_with::<FlowchartDiagram>(input)?)
            }
            DiagramKind::Sequence => ParsedDiagram::Sequence(parse_with::<SequenceDiagram>(input)?),
            DiagramKind::Er => ParsedDiagram::Er(parse_with::<ErDiagram>(input)?),
            DiagramKind::Mindmap => ParsedDiagram::Mindmap(parse_with::<MindmapDiagram>(input)?),
        };

        info!(
            dialect = %parsed.kind(),
            node_count = parsed.node_count(),
            edge_count = parsed.edge_count(),
            "Diagram parsed"
        );
        Ok(parsed)
    }

    /// Render a parsed diagram
    ///
    /// Flowcharts are completed with Start/Stop terminals before layout.
    pub fn render(&self, parsed: ParsedDiagram, format: OutputFormat) -> Result<String> {
        let render_span = span!(
            Level::INFO,
            "render_diagram",
            dialect = %parsed.kind(),
            format = %format
        );
        let _enter = render_span.enter();

        let output = match parsed {
            ParsedDiagram::Flowchart(mut db) => {
                let terminals = synthesize_terminals(&mut db)?;
                debug!(start = ?terminals.start, stop = ?terminals.stop, "Terminals checked");
                FlowchartRenderer::with_format(format).render(&db)?
            }
            ParsedDiagram::Sequence(db) => SequenceRenderer::with_format(format).render(&db)?,
            ParsedDiagram::Er(db) => ErRenderer::with_format(format).render(&db)?,
            ParsedDiagram::Mindmap(db) => MindmapRenderer::with_format(format).render(&db)?,
        };

        debug!(output_len = output.len(), "Rendering completed");
        Ok(output)
    }

    /// Run the whole pipeline
    pub fn convert(&self, input: &str, format: OutputFormat) -> Result<String> {
        let convert_span = span!(
            Level::INFO,
            "convert_diagram",
            input_len = input.len(),
            format = %format
        );
        let _enter = convert_span.enter();

        let parsed = self.parse(input)?;
        let output = self.render(parsed, format)?;
        info!(output_len = output.len(), "Pipeline completed successfully");
        Ok(output)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}
