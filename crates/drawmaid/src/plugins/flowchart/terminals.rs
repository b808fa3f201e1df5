//! Start/Stop terminal synthesis
//!
//! Completes partial flowcharts before layout: a `Start` terminal feeding
//! every entry node and a `Stop` terminal fed by every exit node, unless
//! the author already drew them.

use anyhow::Result;
use tracing::debug;

use super::FlowchartDatabase;
use crate::core::{Database, EdgeData, NodeData, NodeShape, StyleRef};

/// Ids of the terminals that were added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Terminals {
    pub start: Option<String>,
    pub stop: Option<String>,
}

/// Does `text` name the keyword?
///
/// Matching is case-insensitive and allows only a digit or underscore
/// suffix, so `Stop2` and `end_1` count while `Ending` and
/// `End of quarter report` do not.
pub fn names_keyword(text: &str, keyword: &str) -> bool {
    let lower = text.trim().to_lowercase();
    match lower.strip_prefix(keyword) {
        Some(rest) => rest.chars().all(|c| c.is_ascii_digit() || c == '_'),
        None => false,
    }
}

fn carries_keyword(db: &FlowchartDatabase, keywords: &[&str]) -> bool {
    db.nodes().any(|node| {
        keywords
            .iter()
            .any(|keyword| names_keyword(&node.id, keyword) || names_keyword(&node.label, keyword))
    })
}

fn fresh_id(db: &FlowchartDatabase, base: &str) -> String {
    if !db.has_node(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !db.has_node(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Add Start and Stop terminals where the diagram lacks them
pub fn synthesize_terminals(db: &mut FlowchartDatabase) -> Result<Terminals> {
    let mut terminals = Terminals::default();
    if db.node_count() == 0 {
        return Ok(terminals);
    }

    let entries: Vec<String> = db.source_nodes().into_iter().map(String::from).collect();
    let exits: Vec<String> = db.sink_nodes().into_iter().map(String::from).collect();

    if !entries.is_empty() && !carries_keyword(db, &["start"]) {
        let id = fresh_id(db, "Start");
        db.add_node(
            NodeData::with_shape(&id, "Start", NodeShape::Stadium).styled(StyleRef::Terminal),
        )?;
        for entry in &entries {
            db.add_edge(EdgeData::new(&id, entry))?;
        }
        debug!(terminal = %id, wired = entries.len(), "Synthesized start terminal");
        terminals.start = Some(id);
    }

    if !exits.is_empty() && !carries_keyword(db, &["stop", "end"]) {
        let id = fresh_id(db, "Stop");
        db.add_node(
            NodeData::with_shape(&id, "Stop", NodeShape::Stadium).styled(StyleRef::Terminal),
        )?;
        for exit in &exits {
            db.add_edge(EdgeData::new(exit, &id))?;
        }
        debug!(terminal = %id, wired = exits.len(), "Synthesized stop terminal");
        terminals.stop = Some(id);
    }

    Ok(terminals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_from(edges: &[(&str, &str, &str, &str)]) -> FlowchartDatabase {
        let mut db = FlowchartDatabase::new();
        for (from, from_label, to, to_label) in edges {
            db.upsert_node(from, Some((NodeShape::Rectangle, from_label.to_string())))
                .unwrap();
            db.upsert_node(to, Some((NodeShape::Rectangle, to_label.to_string())))
                .unwrap();
            db.add_edge(EdgeData::new(*from, *to)).unwrap();
        }
        db
    }

    #[test]
    fn test_keyword_matching() {
        assert!(names_keyword("Start", "start"));
        assert!(names_keyword("  START ", "start"));
        assert!(names_keyword("Stop2", "stop"));
        assert!(names_keyword("end_1", "end"));
        assert!(!names_keyword("Ending", "end"));
        assert!(!names_keyword("Go", "start"));
        assert!(!names_keyword("End of quarter report", "end"));
        assert!(!names_keyword("Start-up costs", "start"));
    }

    #[test]
    fn test_multi_word_labels_do_not_suppress_terminals() {
        let mut db = db_from(&[("A", "Begin here", "B", "End of quarter report")]);
        let terminals = synthesize_terminals(&mut db).unwrap();
        assert_eq!(terminals.start.as_deref(), Some("Start"));
        assert_eq!(terminals.stop.as_deref(), Some("Stop"));

        let mut db = db_from(&[("A", "Start-up costs", "B", "Review")]);
        let terminals = synthesize_terminals(&mut db).unwrap();
        assert_eq!(terminals.start.as_deref(), Some("Start"));
        assert_eq!(terminals.stop.as_deref(), Some("Stop"));
    }

    #[test]
    fn test_skipped_when_author_drew_terminals() {
        let mut db = db_from(&[("A", "Start", "B", "End")]);
        let terminals = synthesize_terminals(&mut db).unwrap();
        assert_eq!(terminals, Terminals::default());
        assert_eq!(db.node_count(), 2);
        assert_eq!(db.edge_count(), 1);
    }

    #[test]
    fn test_only_start_side_fires_for_stop2() {
        let mut db = db_from(&[("X", "Go", "Y", "Stop2")]);
        let terminals = synthesize_terminals(&mut db).unwrap();
        assert_eq!(terminals.start.as_deref(), Some("Start"));
        assert!(terminals.stop.is_none());
        assert_eq!(db.successors("Start"), vec!["X"]);
        let start = db.get_node("Start").unwrap();
        assert_eq!(start.shape, NodeShape::Stadium);
        assert_eq!(start.style, StyleRef::Terminal);
    }

    #[test]
    fn test_both_terminals_wire_every_entry_and_exit() {
        let mut db = db_from(&[
            ("A", "a", "C", "c"),
            ("B", "b", "C", "c"),
            ("C", "c", "D", "d"),
            ("C", "c", "E", "e"),
        ]);
        let terminals = synthesize_terminals(&mut db).unwrap();
        assert_eq!(terminals.start.as_deref(), Some("Start"));
        assert_eq!(terminals.stop.as_deref(), Some("Stop"));
        assert_eq!(db.successors("Start"), vec!["A", "B"]);
        assert_eq!(db.predecessors("Stop"), vec!["D", "E"]);
    }

    #[test]
    fn test_pure_cycle_gets_no_terminals() {
        let mut db = db_from(&[("A", "a", "B", "b"), ("B", "b", "A", "a")]);
        let terminals = synthesize_terminals(&mut db).unwrap();
        assert_eq!(terminals, Terminals::default());
    }

    #[test]
    fn test_empty_database_is_untouched() {
        let mut db = FlowchartDatabase::new();
        assert_eq!(synthesize_terminals(&mut db).unwrap(), Terminals::default());
        assert_eq!(db.node_count(), 0);
    }
}
