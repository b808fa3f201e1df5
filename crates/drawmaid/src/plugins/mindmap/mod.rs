//! Mindmap plugin
//!
//! Nesting comes from indentation, two columns per level:
//!
//! ```text
//! mindmap
//!   root((Release))
//!     Scope
//!       (Parser)
//!     Risks
//! ```

mod database;
mod detector;
mod layout;
mod parser;
mod renderer;

pub use database::{MindmapDatabase, MindmapNode};
pub use detector::MindmapDetector;
pub use layout::{MindmapLayoutAlgorithm, MindmapLayoutResult, PositionedTopic};
pub use parser::{classify_topic, MindmapParser};
pub use renderer::{topic_style, MindmapRenderer};

use crate::core::{Detector, Diagram};
use std::sync::Arc;

/// Mindmap diagram implementation
pub struct MindmapDiagram;

impl Diagram for MindmapDiagram {
    type Database = MindmapDatabase;
    type Parser = MindmapParser;
    type Layout = MindmapLayoutAlgorithm;
    type Renderer = MindmapRenderer;

    fn detector() -> Arc<dyn Detector> {
        Arc::new(MindmapDetector::new())
    }

    fn create_parser() -> Self::Parser {
        MindmapParser::new()
    }

    fn create_database() -> Self::Database {
        MindmapDatabase::new()
    }

    fn create_layout() -> Self::Layout {
        MindmapLayoutAlgorithm::new()
    }

    fn create_renderer() -> Self::Renderer {
        MindmapRenderer::new()
    }

    fn name() -> &'static str {
        "mindmap"
    }

    fn version() -> &'static str {
        "0.1.0"
    }
}
