//! Entity-relationship diagram plugin
//!
//! ```text
//! erDiagram
//!     CUSTOMER ||--o{ ORDER : places
//!     ORDER {
//!         int id PK
//!         date placed_at
//!     }
//! ```

mod database;
mod detector;
mod layout;
mod parser;
mod renderer;

pub use database::{Attribute, Entity, ErDatabase, Relationship};
pub use detector::ErDetector;
pub use layout::{entity_size, ErLayoutAlgorithm, ErLayoutResult, PositionedEntity};
pub use parser::{parse_attribute, parse_relationship, ErParser};
pub use renderer::{relationship_style, ErRenderer};

use crate::core::{Detector, Diagram};
use std::sync::Arc;

/// Entity-relationship diagram implementation
pub struct ErDiagram;

impl Diagram for ErDiagram {
    type Database = ErDatabase;
    type Parser = ErParser;
    type Layout = ErLayoutAlgorithm;
    type Renderer = ErRenderer;

    fn detector() -> Arc<dyn Detector> {
        Arc::new(ErDetector::new())
    }

    fn create_parser() -> Self::Parser {
        ErParser::new()
    }

    fn create_database() -> Self::Database {
        ErDatabase::new()
    }

    fn create_layout() -> Self::Layout {
        ErLayoutAlgorithm::new()
    }

    fn create_renderer() -> Self::Renderer {
        ErRenderer::new()
    }

    fn name() -> &'static str {
        "erDiagram"
    }

    fn version() -> &'static str {
        "0.1.0"
    }
}
