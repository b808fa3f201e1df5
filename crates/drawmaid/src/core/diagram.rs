//! Core diagram trait tying a dialect's components together

use super::{Database, Detector, LayoutAlgorithm, Parser, Renderer};
use std::sync::Arc;

/// Core trait for diagram types
///
/// # Example
/// ```
/// use drawmaid::core::Diagram;
/// use drawmaid::plugins::er::ErDiagram;
///
/// assert_eq!(ErDiagram::name(), "erDiagram");
/// let _parser = ErDiagram::create_parser();
/// ```
pub trait Diagram: Send + Sync {
    /// The specific database type for this diagram
    type Database: Database + Send + Sync;

    /// The parser type for this diagram
    type Parser: Parser<Self::Database> + Send + Sync;

    /// The layout type for this diagram
    type Layout: LayoutAlgorithm<Self::Database> + Send + Sync;

    /// The renderer type for this diagram
    type Renderer: Renderer<Self::Database> + Send + Sync;

    /// Get the detector for this diagram type
    fn detector() -> Arc<dyn Detector>;

    /// Create a new parser instance
    fn create_parser() -> Self::Parser;

    /// Create a new database instance
    fn create_database() -> Self::Database;

    /// Create a new layout instance
    fn create_layout() -> Self::Layout;

    /// Create a new renderer instance
    fn create_renderer() -> Self::Renderer;

    /// Get the name of this diagram type
    fn name() -> &'static str;

    /// Get the version of this diagram type
    fn version() -> &'static str;
}
