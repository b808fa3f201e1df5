//! Core type definitions for diagram processing
//!
//! This module contains the fundamental types used throughout drawmaid:
//! node shapes, arrow kinds, flow direction, node and edge data, and the
//! positions produced by layout.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Node shapes supported by the flowchart and mindmap dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeShape {
    /// Rectangle: `A[label]`
    #[default]
    Rectangle,
    /// Rounded rectangle: `A(label)`
    RoundedRect,
    /// Diamond (decision): `A{label}`
    Diamond,
    /// Subroutine: `A[[label]]`
    Subroutine,
    /// Stadium (pill): `A([label])`
    Stadium,
    /// Circle: `A((label))`
    Circle,
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeShape::Rectangle => write!(f, "rectangle"),
            NodeShape::RoundedRect => write!(f, "roundedRect"),
            NodeShape::Diamond => write!(f, "diamond"),
            NodeShape::Subroutine => write!(f, "subroutine"),
            NodeShape::Stadium => write!(f, "stadium"),
            NodeShape::Circle => write!(f, "circle"),
        }
    }
}

/// Connector kinds for flowchart edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrowKind {
    /// Solid arrow: `-->`
    #[default]
    SolidClassic,
    /// Solid line without head: `---`
    SolidNone,
    /// Dashed arrow: `-.->`
    DashedClassic,
    /// Dashed line without head: `-.-`
    DashedNone,
    /// Thick arrow: `==>`
    ThickClassic,
}

impl ArrowKind {
    /// Returns true if this connector ends in an arrowhead
    pub fn has_arrow(&self) -> bool {
        matches!(
            self,
            ArrowKind::SolidClassic | ArrowKind::DashedClassic | ArrowKind::ThickClassic
        )
    }

    /// Returns true if this connector is drawn dashed
    pub fn is_dashed(&self) -> bool {
        matches!(self, ArrowKind::DashedClassic | ArrowKind::DashedNone)
    }

    /// Returns true if this connector is drawn thick
    pub fn is_thick(&self) -> bool {
        matches!(self, ArrowKind::ThickClassic)
    }
}

impl fmt::Display for ArrowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrowKind::SolidClassic => write!(f, "-->"),
            ArrowKind::SolidNone => write!(f, "---"),
            ArrowKind::DashedClassic => write!(f, "-.->"),
            ArrowKind::DashedNone => write!(f, "-.-"),
            ArrowKind::ThickClassic => write!(f, "==>"),
        }
    }
}

/// Flow direction for the diagram layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub enum Direction {
    /// Top to bottom (TD or TB)
    #[default]
    TopDown,
    /// Left to right (LR)
    LeftRight,
    /// Right to left (RL)
    RightLeft,
    /// Bottom to top (BT)
    BottomUp,
}

impl Direction {
    /// Parse direction from a header token (TD, TB, LR, RL, BT)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TD" | "TB" => Some(Direction::TopDown),
            "LR" => Some(Direction::LeftRight),
            "RL" => Some(Direction::RightLeft),
            "BT" => Some(Direction::BottomUp),
            _ => None,
        }
    }

    /// Returns true if this is a vertical layout (TD or BT)
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::TopDown | Direction::BottomUp)
    }

    /// Returns true if levels advance along the x axis (LR or RL)
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::LeftRight | Direction::RightLeft)
    }

    /// Returns true if the level axis runs backwards (RL or BT)
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::RightLeft | Direction::BottomUp)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::TopDown => write!(f, "TD"),
            Direction::LeftRight => write!(f, "LR"),
            Direction::RightLeft => write!(f, "RL"),
            Direction::BottomUp => write!(f, "BT"),
        }
    }
}

/// The supported diagram dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub enum DiagramKind {
    #[default]
    #[serde(rename = "flowchart")]
    Flowchart,
    #[serde(rename = "sequence")]
    Sequence,
    #[serde(rename = "erDiagram")]
    Er,
    #[serde(rename = "mindmap")]
    Mindmap,
}

impl DiagramKind {
    /// Every dialect, in detection order
    pub const ALL: [DiagramKind; 4] = [
        DiagramKind::Flowchart,
        DiagramKind::Sequence,
        DiagramKind::Er,
        DiagramKind::Mindmap,
    ];

    /// The kind string exposed in parse results and validation reports
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Sequence => "sequence",
            DiagramKind::Er => "erDiagram",
            DiagramKind::Mindmap => "mindmap",
        }
    }

    /// The header keyword that introduces this dialect
    pub fn keyword(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Sequence => "sequenceDiagram",
            DiagramKind::Er => "erDiagram",
            DiagramKind::Mindmap => "mindmap",
        }
    }

    /// Short human description used by `drawmaid types`
    pub fn description(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "Nodes, decisions and connections with subgraph groups",
            DiagramKind::Sequence => "Participants exchanging ordered messages",
            DiagramKind::Er => "Entities with attributes and cardinality relationships",
            DiagramKind::Mindmap => "Indented idea tree radiating from a root",
        }
    }

    /// Returns true for dialects whose header carries a direction token
    pub fn is_flow_style(&self) -> bool {
        matches!(self, DiagramKind::Flowchart)
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visual style reference attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleRef {
    /// Shape default style
    #[default]
    Default,
    /// Synthesized Start/Stop terminal
    Terminal,
    /// Mindmap palette entry
    Palette(usize),
}

/// A node in the diagram with all its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeData {
    /// Unique identifier for the node
    pub id: String,
    /// Display label (may differ from id)
    pub label: String,
    /// Visual shape of the node
    pub shape: NodeShape,
    /// Visual style reference
    pub style: StyleRef,
}

impl NodeData {
    /// Create a new node with default rectangle shape
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape: NodeShape::Rectangle,
            style: StyleRef::Default,
        }
    }

    /// Create a new node with a specific shape
    pub fn with_shape(id: impl Into<String>, label: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape,
            style: StyleRef::Default,
        }
    }

    /// Replace the style reference
    pub fn styled(mut self, style: StyleRef) -> Self {
        self.style = style;
        self
    }
}

/// An edge connecting two nodes with metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeData {
    /// Sequence-numbered identifier, assigned by the database
    pub id: String,
    /// Source node ID
    pub from: String,
    /// Target node ID
    pub to: String,
    /// Connector kind
    pub arrow: ArrowKind,
    /// Optional label on the edge
    pub label: Option<String>,
}

impl EdgeData {
    /// Create a new edge with the default solid arrow
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::with_arrow(from, to, ArrowKind::SolidClassic)
    }

    /// Create a new edge with a specific connector kind
    pub fn with_arrow(from: impl Into<String>, to: impl Into<String>, arrow: ArrowKind) -> Self {
        Self {
            id: String::new(),
            from: from.into(),
            to: to.into(),
            arrow,
            label: None,
        }
    }

    /// Create a new edge with a label
    pub fn with_label(
        from: impl Into<String>,
        to: impl Into<String>,
        arrow: ArrowKind,
        label: impl Into<String>,
    ) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::with_arrow(from, to, arrow)
        }
    }

    /// Label text, empty when the edge is unlabeled
    pub fn label_text(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

/// A placed box in abstract drawing units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal centre
    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Vertical centre
    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// A routing waypoint for connectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Output document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum OutputFormat {
    /// draw.io / diagrams.net XML document
    #[default]
    Drawio,
    /// Markdown documentation page
    Markdown,
}

impl OutputFormat {
    /// Conventional file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Drawio => "drawio",
            OutputFormat::Markdown => "md",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drawio" | "xml" => Ok(OutputFormat::Drawio),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Drawio => write!(f, "drawio"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!(Direction::from_str("TD"), Some(Direction::TopDown));
        assert_eq!(Direction::from_str("tb"), Some(Direction::TopDown));
        assert_eq!(Direction::from_str("LR"), Some(Direction::LeftRight));
        assert_eq!(Direction::from_str("RL"), Some(Direction::RightLeft));
        assert_eq!(Direction::from_str("BT"), Some(Direction::BottomUp));
        assert_eq!(Direction::from_str("invalid"), None);
    }

    #[test]
    fn test_direction_properties() {
        assert!(Direction::TopDown.is_vertical());
        assert!(Direction::BottomUp.is_vertical());
        assert!(Direction::LeftRight.is_horizontal());
        assert!(Direction::RightLeft.is_horizontal());
        assert!(Direction::RightLeft.is_reversed());
        assert!(Direction::BottomUp.is_reversed());
        assert!(!Direction::TopDown.is_reversed());
        assert!(!Direction::LeftRight.is_reversed());
    }

    #[test]
    fn test_arrow_kind_properties() {
        assert!(ArrowKind::SolidClassic.has_arrow());
        assert!(!ArrowKind::SolidNone.has_arrow());
        assert!(!ArrowKind::DashedNone.has_arrow());
        assert!(ArrowKind::DashedClassic.is_dashed());
        assert!(!ArrowKind::ThickClassic.is_dashed());
        assert!(ArrowKind::ThickClassic.is_thick());
        assert_eq!(ArrowKind::default(), ArrowKind::SolidClassic);
    }

    #[test]
    fn test_diagram_kind_strings() {
        assert_eq!(DiagramKind::Flowchart.as_str(), "flowchart");
        assert_eq!(DiagramKind::Sequence.as_str(), "sequence");
        assert_eq!(DiagramKind::Er.as_str(), "erDiagram");
        assert_eq!(DiagramKind::Mindmap.to_string(), "mindmap");
        assert_eq!(
            serde_json::to_string(&DiagramKind::Er).unwrap(),
            "\"erDiagram\""
        );
    }

    #[test]
    fn test_node_data_constructors() {
        let node = NodeData::new("A", "Label A");
        assert_eq!(node.id, "A");
        assert_eq!(node.shape, NodeShape::Rectangle);
        assert_eq!(node.style, StyleRef::Default);

        let start =
            NodeData::with_shape("S", "Start", NodeShape::Stadium).styled(StyleRef::Terminal);
        assert_eq!(start.shape, NodeShape::Stadium);
        assert_eq!(start.style, StyleRef::Terminal);
    }

    #[test]
    fn test_edge_data_constructors() {
        let edge = EdgeData::new("A", "B");
        assert_eq!(edge.arrow, ArrowKind::SolidClassic);
        assert!(edge.label.is_none());
        assert_eq!(edge.label_text(), "");

        let labeled = EdgeData::with_label("A", "B", ArrowKind::DashedClassic, "Yes");
        assert_eq!(labeled.label.as_deref(), Some("Yes"));
        assert_eq!(labeled.arrow, ArrowKind::DashedClassic);
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(NodeShape::RoundedRect.to_string(), "roundedRect");
        assert_eq!(NodeShape::Stadium.to_string(), "stadium");
        assert_eq!(ArrowKind::DashedNone.to_string(), "-.-");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("drawio".parse::<OutputFormat>(), Ok(OutputFormat::Drawio));
        assert_eq!("MD".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert!("svg".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Markdown.extension(), "md");
    }

    #[test]
    fn test_position_edges() {
        let pos = Position::new(100, 40, 120, 60);
        assert_eq!(pos.center_x(), 160);
        assert_eq!(pos.center_y(), 70);
        assert_eq!(pos.right(), 220);
        assert_eq!(pos.bottom(), 100);
    }
}
