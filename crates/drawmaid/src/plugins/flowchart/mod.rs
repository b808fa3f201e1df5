//! Flowchart diagram plugin
//!
//! `flowchart` / `graph` diagrams: a chumsky statement grammar driven by a
//! line scanner, Start/Stop terminal synthesis, and the leveled-tree layout.

use crate::core::{Detector, Diagram};
use std::sync::Arc;

mod database;
mod detector;
mod layout;
mod parser;
mod renderer;
mod statement;
mod terminals;

pub use database::*;
pub use detector::*;
pub use layout::*;
pub use parser::*;
pub use renderer::*;
pub use statement::{parse_statement, Link, NodeRef, Statement};
pub use terminals::{names_keyword, synthesize_terminals, Terminals};

/// Flowchart diagram implementation
pub struct FlowchartDiagram;

impl Diagram for FlowchartDiagram {
    type Database = FlowchartDatabase;
    type Parser = FlowchartParser;
    type Layout = FlowchartLayoutAlgorithm;
    type Renderer = FlowchartRenderer;

    fn detector() -> Arc<dyn Detector> {
        Arc::new(FlowchartDetector::new())
    }

    fn create_parser() -> Self::Parser {
        FlowchartParser::new()
    }

    fn create_database() -> Self::Database {
        FlowchartDatabase::new()
    }

    fn create_layout() -> Self::Layout {
        FlowchartLayoutAlgorithm::new()
    }

    fn create_renderer() -> Self::Renderer {
        FlowchartRenderer::new()
    }

    fn name() -> &'static str {
        "flowchart"
    }

    fn version() -> &'static str {
        "0.1.0"
    }
}
