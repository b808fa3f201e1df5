//! Core renderer trait for diagram output

use anyhow::Result;

use super::{Database, OutputFormat};

/// Core trait for diagram renderers
///
/// A renderer lays out the database itself and emits a complete document
/// in its configured [`OutputFormat`].
///
/// # Example
/// ```
/// use drawmaid::core::{Database, NodeData, OutputFormat, Renderer};
/// use drawmaid::plugins::flowchart::{FlowchartDatabase, FlowchartRenderer};
///
/// let mut db = FlowchartDatabase::new();
/// db.add_node(NodeData::new("A", "Hello")).unwrap();
/// let renderer = FlowchartRenderer::with_format(OutputFormat::Drawio);
/// let xml = renderer.render(&db).unwrap();
/// assert!(xml.starts_with("<mxfile"));
/// ```
pub trait Renderer<D: Database>: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the diagram database into the output format
    fn render(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the version of this renderer
    fn version(&self) -> &'static str;

    /// Get the output format
    fn format(&self) -> OutputFormat;
}
