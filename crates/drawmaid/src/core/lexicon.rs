//! Shape and arrow lexicon
//!
//! Ordered lookup tables from bracket and arrow syntax to semantic kinds,
//! plus the default draw.io styles for each kind. Tables are slices rather
//! than maps: the first matching entry wins, so multi-character delimiters
//! must stay ahead of the single-character ones they contain.

use unicode_width::UnicodeWidthStr;

use super::{ArrowKind, NodeData, NodeShape, StyleRef};

/// One bracket pair and the shape it denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapePattern {
    pub open: &'static str,
    pub close: &'static str,
    pub shape: NodeShape,
}

/// Bracket syntax, most specific first
pub const SHAPE_PATTERNS: &[ShapePattern] = &[
    ShapePattern {
        open: "([",
        close: "])",
        shape: NodeShape::Stadium,
    },
    ShapePattern {
        open: "((",
        close: "))",
        shape: NodeShape::Circle,
    },
    ShapePattern {
        open: "[[",
        close: "]]",
        shape: NodeShape::Subroutine,
    },
    ShapePattern {
        open: "[",
        close: "]",
        shape: NodeShape::Rectangle,
    },
    ShapePattern {
        open: "(",
        close: ")",
        shape: NodeShape::RoundedRect,
    },
    ShapePattern {
        open: "{",
        close: "}",
        shape: NodeShape::Diamond,
    },
];

/// One connector token and the arrow kind it denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowPattern {
    pub token: &'static str,
    pub kind: ArrowKind,
}

/// Connector tokens, checked by containment in this order
pub const ARROW_PATTERNS: &[ArrowPattern] = &[
    ArrowPattern {
        token: "-.->",
        kind: ArrowKind::DashedClassic,
    },
    ArrowPattern {
        token: "-.-",
        kind: ArrowKind::DashedNone,
    },
    ArrowPattern {
        token: "==>",
        kind: ArrowKind::ThickClassic,
    },
    ArrowPattern {
        token: "-->",
        kind: ArrowKind::SolidClassic,
    },
    ArrowPattern {
        token: "---",
        kind: ArrowKind::SolidNone,
    },
];

/// ER cardinality tokens accepted on either side of a relationship
pub const CARDINALITIES: &[&str] = &["||", "|o", "o|", "}|", "|{", "}o", "o{"];

/// Mindmap fill/stroke colours, indexed by depth modulo the length
pub const MINDMAP_PALETTE: [(&str, &str); 6] = [
    ("#dae8fc", "#6c8ebf"),
    ("#d5e8d4", "#82b366"),
    ("#ffe6cc", "#d79b00"),
    ("#fff2cc", "#d6b656"),
    ("#f8cecc", "#b85450"),
    ("#e1d5e7", "#9673a6"),
];

const TERMINAL_COLORS: (&str, &str) = ("#d5e8d4", "#82b366");

/// Classify a bracketed fragment such as `([Label])`
///
/// Returns the shape and the label with any surrounding quotes removed.
/// Fragments that match no pattern are rectangles labelled with the
/// trimmed raw text.
pub fn classify_shape(fragment: &str) -> (NodeShape, String) {
    let trimmed = fragment.trim();
    for pattern in SHAPE_PATTERNS {
        if trimmed.len() >= pattern.open.len() + pattern.close.len()
            && trimmed.starts_with(pattern.open)
            && trimmed.ends_with(pattern.close)
        {
            let inner = &trimmed[pattern.open.len()..trimmed.len() - pattern.close.len()];
            return (pattern.shape, strip_quotes(inner.trim()).to_string());
        }
    }
    (NodeShape::Rectangle, trimmed.to_string())
}

/// Classify a connector token; unknown tokens are solid arrows
pub fn classify_arrow(token: &str) -> ArrowKind {
    ARROW_PATTERNS
        .iter()
        .find(|pattern| token.contains(pattern.token))
        .map(|pattern| pattern.kind)
        .unwrap_or_default()
}

/// Returns true if `token` is a recognised ER cardinality
pub fn is_cardinality(token: &str) -> bool {
    CARDINALITIES.contains(&token)
}

/// Remove one pair of surrounding double quotes
pub fn strip_quotes(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Palette colours for a mindmap depth
pub fn palette(depth: usize) -> (&'static str, &'static str) {
    MINDMAP_PALETTE[depth % MINDMAP_PALETTE.len()]
}

/// Base draw.io style for a shape
pub fn shape_style(shape: NodeShape) -> &'static str {
    match shape {
        NodeShape::Rectangle => "rounded=0;whiteSpace=wrap;html=1;",
        NodeShape::RoundedRect => "rounded=1;whiteSpace=wrap;html=1;",
        NodeShape::Diamond => "rhombus;whiteSpace=wrap;html=1;",
        NodeShape::Subroutine => "shape=process;whiteSpace=wrap;html=1;backgroundOutline=1;",
        NodeShape::Stadium => "rounded=1;whiteSpace=wrap;html=1;arcSize=50;",
        NodeShape::Circle => "ellipse;whiteSpace=wrap;html=1;aspect=fixed;",
    }
}

/// Full draw.io style for a node, including its style reference colours
pub fn node_style(node: &NodeData) -> String {
    let base = shape_style(node.shape);
    match node.style {
        StyleRef::Default => base.to_string(),
        StyleRef::Terminal => format!(
            "{}fillColor={};strokeColor={};",
            base, TERMINAL_COLORS.0, TERMINAL_COLORS.1
        ),
        StyleRef::Palette(index) => {
            let (fill, stroke) = palette(index);
            format!("{}fillColor={};strokeColor={};", base, fill, stroke)
        }
    }
}

/// draw.io style for a flowchart connector
pub fn arrow_style(kind: ArrowKind) -> String {
    let mut style = String::from(
        "edgeStyle=orthogonalEdgeStyle;rounded=0;orthogonalLoop=1;jettySize=auto;html=1;",
    );
    style.push_str(if kind.has_arrow() {
        "endArrow=classic;"
    } else {
        "endArrow=none;"
    });
    if kind.is_dashed() {
        style.push_str("dashed=1;");
    }
    if kind.is_thick() {
        style.push_str("strokeWidth=3;");
    }
    style
}

/// draw.io arrow head for an ER cardinality token
pub fn cardinality_arrow(token: &str) -> &'static str {
    match token {
        "||" => "ERmandOne",
        "|o" | "o|" => "ERzeroToOne",
        "}|" | "|{" => "ERoneToMany",
        "}o" | "o{" => "ERzeroToMany",
        _ => "none",
    }
}

/// Default box size for a shape, widened to fit the label
///
/// Dimensions are multiples of 10. Label width is measured in terminal
/// columns so wide glyphs count double.
pub fn node_size(shape: NodeShape, label: &str) -> (i32, i32) {
    let (base_w, base_h) = match shape {
        NodeShape::Rectangle | NodeShape::RoundedRect => (120, 60),
        NodeShape::Subroutine => (140, 60),
        NodeShape::Stadium => (120, 40),
        NodeShape::Diamond => (140, 80),
        NodeShape::Circle => (80, 80),
    };
    let columns = UnicodeWidthStr::width(label) as i32;
    let padding = if shape == NodeShape::Diamond { 80 } else { 40 };
    let needed = round_up(columns * 8 + padding, 10);
    let width = base_w.max(needed);
    if shape == NodeShape::Circle {
        (width, width)
    } else {
        (width, base_h)
    }
}

fn round_up(value: i32, step: i32) -> i32 {
    (value + step - 1) / step * step
}
