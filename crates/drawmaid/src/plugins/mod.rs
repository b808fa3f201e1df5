//! Dialect plugins
//!
//! Each dialect implements the core traits in its own module; the
//! orchestrator dispatches between them.

pub mod er;
pub mod flowchart;
pub mod mindmap;
pub mod orchestrator;
pub mod sequence;

pub use er::ErDiagram;
pub use flowchart::FlowchartDiagram;
pub use mindmap::MindmapDiagram;
pub use orchestrator::*;
pub use sequence::SequenceDiagram;
