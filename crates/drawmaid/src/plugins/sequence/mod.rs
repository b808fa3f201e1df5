//! Sequence diagram plugin
//!
//! Participants in one row and messages on a vertical timeline.
//!
//! Syntax examples:
//! ```text
//! sequenceDiagram
//!     actor U as User
//!     U->>API: request
//!     API-->>U: response
//! ```

mod database;
mod detector;
mod layout;
mod parser;
mod renderer;

pub use database::{ArrowHead, LineKind, Message, Participant, SequenceDatabase};
pub use detector::SequenceDetector;
pub use layout::{MessageSlot, PositionedParticipant, SequenceLayoutAlgorithm, SequenceLayoutResult};
pub use parser::{classify_arrow, ArrowToken, SequenceParser};
pub use renderer::{message_style, SequenceRenderer};

use crate::core::{Detector, Diagram};
use std::sync::Arc;

/// Sequence diagram implementation
pub struct SequenceDiagram;

impl Diagram for SequenceDiagram {
    type Database = SequenceDatabase;
    type Parser = SequenceParser;
    type Layout = SequenceLayoutAlgorithm;
    type Renderer = SequenceRenderer;

    fn detector() -> Arc<dyn Detector> {
        Arc::new(SequenceDetector::new())
    }

    fn create_parser() -> Self::Parser {
        SequenceParser::new()
    }

    fn create_database() -> Self::Database {
        SequenceDatabase::new()
    }

    fn create_layout() -> Self::Layout {
        SequenceLayoutAlgorithm::new()
    }

    fn create_renderer() -> Self::Renderer {
        SequenceRenderer::new()
    }

    fn name() -> &'static str {
        "sequence"
    }

    fn version() -> &'static str {
        "0.1.0"
    }
}
