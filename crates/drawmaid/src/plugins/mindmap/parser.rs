//! Mindmap parser
//!
//! Indentation decides nesting: depth is the leading whitespace width
//! divided by two. A node hangs off the most recent node one level up.

use anyhow::Result;
use tracing::{info, span, trace, Level};

use super::database::{MindmapDatabase, MindmapNode};
use crate::core::{
    lexicon, source, Database, DiagramError, DiagramKind, EdgeData, NodeShape, Parser,
};

/// Classify a mindmap topic: `((t))`, `(t)`, `[t]` or bare text
///
/// An identifier may precede the brackets (`root((Main))`); it is not kept.
pub fn classify_topic(text: &str) -> (NodeShape, String) {
    let text = text.trim();
    let body = match text.find(['(', '[']) {
        Some(at) if is_prefix(&text[..at]) => &text[at..],
        _ => return (NodeShape::Rectangle, lexicon::strip_quotes(text).to_string()),
    };

    let (shape, inner) = if let Some(inner) = body
        .strip_prefix("((")
        .and_then(|b| b.strip_suffix("))"))
    {
        (NodeShape::Circle, inner)
    } else if let Some(inner) = body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        (NodeShape::RoundedRect, inner)
    } else if let Some(inner) = body.strip_prefix('[').and_then(|b| b.strip_suffix(']')) {
        (NodeShape::Rectangle, inner)
    } else {
        return (NodeShape::Rectangle, lexicon::strip_quotes(text).to_string());
    };
    (shape, lexicon::strip_quotes(inner.trim()).to_string())
}

fn is_prefix(text: &str) -> bool {
    text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Mindmap parser
pub struct MindmapParser;

impl MindmapParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MindmapParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<MindmapDatabase> for MindmapParser {
    fn parse(&self, input: &str, database: &mut MindmapDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_mindmap", input_len = input.len());
        let _enter = parse_span.enter();

        let lines = source::prepare(input)?;
        let header = source::parse_header(lines[0].trimmed());
        let body = match header.kind {
            Some(DiagramKind::Mindmap) => &lines[1..],
            Some(other) => {
                return Err(DiagramError::dialect_mismatch("mindmap", other.as_str()).into())
            }
            None => &lines[..],
        };

        // Most recent node id seen at each depth; deeper entries are kept
        let mut last_at_depth: Vec<Option<String>> = Vec::new();
        for line in body {
            let text = line.trimmed();
            if text.starts_with("::") {
                trace!(line = line.number, "Skipping decoration");
                continue;
            }

            let depth = line.indent() / 2;
            let (shape, label) = classify_topic(text);
            let id = database.next_id();
            database.add_node(MindmapNode::new(&id, label, shape, depth))?;

            let parent = depth
                .checked_sub(1)
                .and_then(|up| last_at_depth.get(up).cloned().flatten());
            match parent {
                Some(parent) => database.add_edge(EdgeData::new(parent, id.clone()))?,
                None => trace!(line = line.number, id = %id, depth, "Topic without parent"),
            }

            if last_at_depth.len() <= depth {
                last_at_depth.resize(depth + 1, None);
            }
            last_at_depth[depth] = Some(id);
        }

        info!(
            node_count = database.node_count(),
            root_count = database.roots().len(),
            "Mindmap parsed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mindmap"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        source::detect_kind(input) == DiagramKind::Mindmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StyleRef;

    fn parse(input: &str) -> MindmapDatabase {
        let mut db = MindmapDatabase::new();
        MindmapParser::new().parse(input, &mut db).unwrap();
        db
    }

    #[test]
    fn test_topic_shapes() {
        assert_eq!(classify_topic("root((Main idea))"), (NodeShape::Circle, "Main idea".into()));
        assert_eq!(classify_topic("(Rounded)"), (NodeShape::RoundedRect, "Rounded".into()));
        assert_eq!(classify_topic("id[Square]"), (NodeShape::Rectangle, "Square".into()));
        assert_eq!(classify_topic("Plain text"), (NodeShape::Rectangle, "Plain text".into()));
        assert_eq!(classify_topic("two words(x)"), (NodeShape::Rectangle, "two words(x)".into()));
    }

    #[test]
    fn test_nesting_by_indentation() {
        let db = parse("mindmap\n  root((Plan))\n    Goals\n      Ship\n    Risks\n  Other root");
        let nodes: Vec<_> = db.nodes().map(|n| (n.label.as_str(), n.depth)).collect();
        assert_eq!(
            nodes,
            vec![("Plan", 1), ("Goals", 2), ("Ship", 3), ("Risks", 2), ("Other root", 1)]
        );
        assert_eq!(db.children("mm1"), vec!["mm2", "mm4"]);
        assert_eq!(db.children("mm2"), vec!["mm3"]);
        assert_eq!(db.roots(), vec!["mm1", "mm5"]);
        assert_eq!(db.get_node("mm1").unwrap().shape, NodeShape::Circle);
        assert_eq!(db.get_node("mm3").unwrap().style, StyleRef::Palette(3));
    }

    #[test]
    fn test_skipped_depth_leaves_node_parentless() {
        let db = parse("mindmap\nroot\n      deep");
        assert_eq!(db.edge_count(), 0);
        assert_eq!(db.roots().len(), 2);
    }

    #[test]
    fn test_decorations_are_ignored() {
        let db = parse("mindmap\n  root\n    ::icon(fa fa-book)\n    child");
        assert_eq!(db.node_count(), 2);
        assert_eq!(db.edge_count(), 1);
    }

    #[test]
    fn test_repeated_labels_get_distinct_ids() {
        let db = parse("mindmap\nroot\n  Same\n  Same");
        let ids: Vec<_> = db.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["mm1", "mm2", "mm3"]);
    }
}
