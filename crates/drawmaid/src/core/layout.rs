//! Core layout trait and spacing configuration

use anyhow::Result;

use super::Database;

/// Spacing constants shared by every layout algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Distance between adjacent columns
    pub horizontal_gap: i32,
    /// Distance between adjacent levels
    pub vertical_gap: i32,
    /// X offset of column 0
    pub origin_x: i32,
    /// Y offset of level 0
    pub origin_y: i32,
    /// Grid every coordinate is snapped to
    pub grid: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_gap: 200,
            vertical_gap: 90,
            origin_x: 100,
            origin_y: 40,
            grid: 10,
        }
    }
}

impl LayoutConfig {
    /// Round a coordinate to the nearest grid multiple
    pub fn snap(&self, value: f64) -> i32 {
        if self.grid <= 1 {
            return value.round() as i32;
        }
        let grid = f64::from(self.grid);
        ((value / grid).round() * grid) as i32
    }
}

/// Core trait for layout algorithms
///
/// # Example
/// ```
/// use drawmaid::core::{Database, LayoutAlgorithm, NodeData};
/// use drawmaid::plugins::flowchart::{FlowchartDatabase, FlowchartLayoutAlgorithm};
///
/// let mut db = FlowchartDatabase::new();
/// db.add_node(NodeData::new("A", "A")).unwrap();
/// let layout = FlowchartLayoutAlgorithm::new();
/// let result = layout.layout(&db).unwrap();
/// assert_eq!(result.nodes.len(), 1);
/// ```
pub trait LayoutAlgorithm<D: Database>: Send + Sync {
    /// The output type of this layout algorithm
    type Output;

    /// Arrange elements in the database using this layout algorithm
    fn layout(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this layout algorithm
    fn name(&self) -> &'static str;

    /// Get the version of this layout algorithm
    fn version(&self) -> &'static str;
}
