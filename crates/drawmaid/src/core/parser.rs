//! Core parser trait for diagram markup

use anyhow::Result;

use super::Database;

/// Core trait for diagram parsers
///
/// Parsers are permissive: unrecognised lines are skipped and only an empty
/// document or a dialect mismatch is reported as an error.
///
/// # Example
/// ```
/// use drawmaid::core::{Database, Parser};
/// use drawmaid::plugins::flowchart::{FlowchartDatabase, FlowchartParser};
///
/// let parser = FlowchartParser::new();
/// let mut db = FlowchartDatabase::new();
/// parser.parse("flowchart TD\n    A --> B", &mut db).unwrap();
/// assert_eq!(db.edge_count(), 1);
/// ```
pub trait Parser<D: Database>: Send + Sync {
    /// Parse diagram markup into the provided database
    fn parse(&self, input: &str, database: &mut D) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;

    /// Check if the input can be parsed by this parser
    fn can_parse(&self, input: &str) -> bool;
}
