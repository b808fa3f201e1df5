//! Tolerant parsing and layout corner cases

use drawmaid::prelude::*;
use drawmaid::{convert, parse, DiagramError};

fn flowchart(input: &str) -> FlowchartDatabase {
    let mut db = FlowchartDatabase::new();
    FlowchartParser::new().parse(input, &mut db).unwrap();
    db
}

#[test]
fn test_unrecognised_lines_are_skipped() {
    let db = flowchart("flowchart TD\nA --> B\n!!! nonsense ???\nclick A callback\nB --> C");
    assert!(db.has_node("C"));
    assert_eq!(db.edge_count(), 2);
}

#[test]
fn test_unclosed_subgraph_is_dropped() {
    let db = flowchart("flowchart TD\nsubgraph one[First]\nA --> B\nend\nsubgraph two\nC --> D");
    let ids: Vec<&str> = db.subgraphs().map(|group| group.id.as_str()).collect();
    assert_eq!(ids, vec!["one"]);
    assert!(db.has_node("D"));
}

#[test]
fn test_nested_subgraph_replaces_open_group() {
    let db = flowchart("flowchart TD\nsubgraph outer\nA --> B\nsubgraph inner\nC --> D\nend\nend");
    let ids: Vec<&str> = db.subgraphs().map(|group| group.id.as_str()).collect();
    assert_eq!(ids, vec!["inner"]);
    let inner = db.get_subgraph("inner").unwrap();
    assert!(inner.contains("C") && inner.contains("D"));
    assert!(!inner.contains("A"));
}

#[test]
fn test_dialect_mismatch_is_not_empty_error() {
    let err = FlowchartParser::new()
        .parse("sequenceDiagram\nA->>B: hi", &mut FlowchartDatabase::new())
        .unwrap_err();
    match err.downcast_ref::<DiagramError>() {
        Some(DiagramError::DialectMismatch { expected, found }) => {
            assert_eq!(expected, "flowchart");
            assert_eq!(found, "sequence");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(!err.to_string().contains("empty"));
}

#[test]
fn test_header_only_diagram() {
    let parsed = parse("flowchart LR").unwrap();
    assert_eq!(parsed.node_count(), 0);
    let xml = convert("flowchart LR", OutputFormat::Drawio).unwrap();
    assert!(!xml.contains("vertex=\"1\""));
}

#[test]
fn test_self_loop_and_cycle_terminate() {
    let db = flowchart("flowchart TD\nA --> A\nA --> B\nB --> C\nC --> A");
    let layout = FlowchartLayoutAlgorithm::new().layout(&db).unwrap();
    assert_eq!(layout.nodes.len(), 3);
    let xml = convert(
        "flowchart TD\nA --> A\nA --> B\nB --> C\nC --> A",
        OutputFormat::Drawio,
    )
    .unwrap();
    assert!(xml.contains("<Array as=\"points\">"));
}

#[test]
fn test_all_nodes_on_cycle_seed_from_first() {
    let db = flowchart("flowchart TD\nA --> B\nB --> C\nC --> A");
    let layout = FlowchartLayoutAlgorithm::new().layout(&db).unwrap();
    assert_eq!(layout.level("A"), Some(0));
    assert_eq!(layout.level("B"), Some(1));
    assert_eq!(layout.level("C"), Some(2));
}

#[test]
fn test_unicode_labels_widen_boxes() {
    let db = flowchart("flowchart TD\nA[短い] --> B[これはとても長いラベルです]");
    let layout = FlowchartLayoutAlgorithm::new().layout(&db).unwrap();
    let a = layout.position("A").unwrap();
    let b = layout.position("B").unwrap();
    assert!(b.width > a.width);
    assert_eq!(b.width % 10, 0);
}

#[test]
fn test_xml_special_characters_escaped() {
    let xml = convert("flowchart TD\nA[\"a < b & c\"] --> B", OutputFormat::Drawio).unwrap();
    assert!(xml.contains("a &lt; b &amp; c"));
    assert!(!xml.contains("a < b"));
}

#[test]
fn test_er_bare_entity_and_hyphenated_name() {
    let parsed = parse("erDiagram\nLONELY\nLINE-ITEM ||--o{ ORDER : in").unwrap();
    let db = parsed.as_er().unwrap();
    assert!(db.get_node("LONELY").is_some());
    assert_eq!(db.relationships().len(), 0);
}

#[test]
fn test_sequence_unknown_lines_ignored() {
    let parsed = parse(
        "sequenceDiagram\nautonumber\nNote over A: hmm\nA->>B: hi\nloop Every minute\nB-->>A: ok\nend",
    )
    .unwrap();
    assert_eq!(parsed.edge_count(), 2);
    assert_eq!(parsed.node_count(), 2);
}

#[test]
fn test_mindmap_bracket_topic_and_decoration() {
    let parsed = parse("mindmap\n  root\n    ::icon(fa fa-book)\n    [Child]\n").unwrap();
    let db = parsed.as_mindmap().unwrap();
    assert_eq!(db.node_count(), 2);
    assert_eq!(db.get_node("mm2").unwrap().label, "Child");
}
