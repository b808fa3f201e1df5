//! Drawmaid - Convert Mermaid-style diagrams to draw.io documents
//!
//! Flowcharts, sequence diagrams, entity-relationship diagrams and mindmaps
//! are parsed into typed graphs, laid out on a 10-unit grid and written as
//! draw.io XML or as a Markdown documentation page.
//!
//! # Quick Start
//!
//! ```rust
//! use drawmaid::{convert, OutputFormat};
//!
//! let xml = convert("flowchart LR\n  A[Order] --> B{Paid?}", OutputFormat::Drawio).unwrap();
//! assert!(xml.starts_with("<mxfile"));
//! assert!(xml.contains("value=\"Paid?\""));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use drawmaid::prelude::*;
//!
//! let input = "graph TD; A[Start] --> B{Decision}";
//!
//! let parser = FlowchartParser::new();
//! let mut database = FlowchartDatabase::new();
//! parser.parse(input, &mut database).unwrap();
//! assert_eq!(database.node_count(), 2);
//! assert_eq!(database.direction(), Direction::TopDown);
//!
//! let layout = FlowchartLayoutAlgorithm::new().layout(&database).unwrap();
//! assert_eq!(layout.position("A").unwrap().x % 10, 0);
//! ```

pub mod core;
pub mod plugins;
pub mod validator;

pub use core::*;
pub use plugins::orchestrator::{Orchestrator, ParsedDiagram};
pub use validator::{Compatibility, Diagnostic, ValidationReport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Database, Detector, Diagram, DiagramKind, Direction, EdgeData, LayoutAlgorithm,
        LayoutConfig, NodeData, NodeShape, OutputFormat, Parser, Position, Renderer,
    };
    pub use crate::plugins::er::{ErDatabase, ErLayoutAlgorithm, ErParser, ErRenderer};
    pub use crate::plugins::flowchart::{
        FlowchartDatabase, FlowchartDetector, FlowchartLayoutAlgorithm, FlowchartParser,
        FlowchartRenderer,
    };
    pub use crate::plugins::mindmap::{
        MindmapDatabase, MindmapLayoutAlgorithm, MindmapParser, MindmapRenderer,
    };
    pub use crate::plugins::sequence::{
        SequenceDatabase, SequenceLayoutAlgorithm, SequenceParser, SequenceRenderer,
    };
    pub use crate::plugins::orchestrator::{Orchestrator, ParsedDiagram};
    pub use crate::validator::{validate, ValidationReport};
}

/// Parse diagram text of any supported dialect
///
/// Input without a recognised header is parsed as a flowchart. Empty input
/// fails with [`DiagramError::EmptyDiagram`].
///
/// # Example
/// ```rust
/// use drawmaid::{parse, DiagramKind};
///
/// let diagram = parse("sequenceDiagram\n  Alice->>Bob: Hello").unwrap();
/// assert_eq!(diagram.kind(), DiagramKind::Sequence);
/// assert_eq!(diagram.node_count(), 2);
/// assert_eq!(diagram.edge_count(), 1);
/// ```
pub fn parse(input: &str) -> anyhow::Result<ParsedDiagram> {
    Orchestrator::new().parse(input)
}

/// Convert diagram text to the requested output format
///
/// # Example
/// ```rust
/// use drawmaid::{convert, OutputFormat};
///
/// let page = convert("erDiagram\n  USER ||--o{ POST : writes", OutputFormat::Markdown).unwrap();
/// assert!(page.starts_with("# Entity Relationship Diagram"));
/// ```
pub fn convert(input: &str, format: OutputFormat) -> anyhow::Result<String> {
    Orchestrator::new().convert(input, format)
}

/// Detect the dialect of diagram text
pub fn detect(input: &str) -> DiagramKind {
    Orchestrator::new().detect(input)
}

/// Check diagram text for constructs that do not convert cleanly
///
/// # Example
/// ```rust
/// use drawmaid::{validate, Compatibility};
///
/// let report = validate("flowchart TD\n  A --> B --> C");
/// assert!(!report.is_valid);
/// assert_eq!(report.compatibility, Compatibility::Low);
/// ```
pub fn validate(input: &str) -> ValidationReport {
    validator::validate(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_flowchart() {
        let xml = convert("flowchart TD\n    A --> B", OutputFormat::Drawio).unwrap();
        assert!(xml.contains("<mxGraphModel"));
        assert!(xml.contains("value=\"A\""));
    }

    #[test]
    fn test_parse_flowchart() {
        let diagram = parse("graph TD\n    A --> B --> C").unwrap();
        let db = diagram.as_flowchart().unwrap();
        assert_eq!(db.node_count(), 3);
        assert_eq!(db.edge_count(), 2);
        assert_eq!(db.direction(), Direction::TopDown);
    }

    #[test]
    fn test_parse_flowchart_lr() {
        let diagram = parse("graph LR\n    A --> B").unwrap();
        assert_eq!(diagram.as_flowchart().unwrap().direction(), Direction::LeftRight);
    }

    #[test]
    fn test_detect() {
        assert_eq!(detect("mindmap\n  root"), DiagramKind::Mindmap);
        assert_eq!(detect("A --> B"), DiagramKind::Flowchart);
    }

    #[test]
    fn test_empty_input_error_message() {
        let err = convert("", OutputFormat::Drawio).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
