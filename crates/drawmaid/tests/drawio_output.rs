//! Structure of the generated draw.io documents

use drawmaid::{convert, OutputFormat};
use std::collections::HashSet;

fn drawio(input: &str) -> String {
    convert(input, OutputFormat::Drawio).unwrap()
}

fn attribute_values<'a>(xml: &'a str, name: &str) -> Vec<&'a str> {
    let needle = format!(" {}=\"", name);
    xml.match_indices(&needle)
        .filter_map(|(at, _)| {
            let rest = &xml[at + needle.len()..];
            rest.find('"').map(|end| &rest[..end])
        })
        .collect()
}

#[test]
fn test_document_skeleton() {
    let xml = drawio("flowchart TD\nA --> B");
    let order = [
        "<mxfile",
        "<diagram",
        "<mxGraphModel",
        "<root>",
        "<mxCell id=\"0\"/>",
        "<mxCell id=\"1\" parent=\"0\"/>",
        "</root>",
        "</mxGraphModel>",
        "</diagram>",
        "</mxfile>",
    ];
    let mut cursor = 0;
    for marker in order {
        let found = xml[cursor..].find(marker).unwrap_or_else(|| panic!("missing {}", marker));
        cursor += found;
    }
}

#[test]
fn test_cell_ids_unique_within_document() {
    let inputs = [
        "flowchart TD\nsubgraph g[Group]\nA --> B\nend\nB --> C\nC --> A",
        "sequenceDiagram\nactor U\nU->>S: login\nS-->>U: token\nS->>S: audit",
        "erDiagram\nUSER {\n int id PK\n string name\n}\nUSER ||--o{ POST : writes\nPOST }o--|| TAG : tagged",
        "mindmap\nroot((Plan))\n  A\n    A1\n  B",
    ];
    for input in inputs {
        let xml = drawio(input);
        let ids = attribute_values(&xml, "id");
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len(), "duplicate ids in {}", input);
    }
}

#[test]
fn test_vertices_precede_edges() {
    let xml = drawio("flowchart LR\nA --> B\nB --> C");
    let last_vertex = xml.rfind("vertex=\"1\"").unwrap();
    let first_edge = xml.find("edge=\"1\"").unwrap();
    assert!(last_vertex < first_edge);
}

#[test]
fn test_edges_reference_existing_cells() {
    let xml = drawio("flowchart TD\nA{Pick} -->|left| B\nA -->|right| C\nB --> D\nC --> D");
    let ids: HashSet<&str> = attribute_values(&xml, "id").into_iter().collect();
    for endpoint in attribute_values(&xml, "source")
        .into_iter()
        .chain(attribute_values(&xml, "target"))
    {
        assert!(ids.contains(endpoint), "dangling endpoint {}", endpoint);
    }
    assert!(xml.contains("value=\"left\""));
    assert!(xml.contains("value=\"right\""));
}

#[test]
fn test_duplicate_connections_emitted_once() {
    let xml = drawio("flowchart TD\nStart --> A\nA --> B\nA -->|again| B\nB --> End");
    assert_eq!(xml.matches("edge=\"1\"").count(), 3);
    assert!(!xml.contains("value=\"again\""));
}

#[test]
fn test_geometry_on_grid() {
    let xml = drawio(
        "flowchart LR\nA[A fairly long label] --> B{Is it?}\nB --> C((Yes))\nB --> D([No])",
    );
    for name in ["x", "y", "width", "height"] {
        for value in attribute_values(&xml, name) {
            let number: i32 = value.parse().unwrap();
            assert_eq!(number % 10, 0, "{}={}", name, value);
        }
    }
}

#[test]
fn test_arrow_styles() {
    let xml = drawio("flowchart TD\nStart --> A\nA -.-> B\nB ==> C\nC --- End");
    assert!(xml.contains("dashed=1;"));
    assert!(xml.contains("strokeWidth=3;"));
    assert!(xml.contains("endArrow=none;"));
}

#[test]
fn test_sequence_lifelines_and_actor() {
    let xml = drawio(
        "sequenceDiagram\nactor U as User\nparticipant S as Server\nU->>S: request\nS--xU: reject",
    );
    assert!(xml.contains("umlLifeline"));
    assert!(xml.contains("participant=umlActor"));
    assert!(xml.contains("value=\"request\""));
    assert!(xml.contains("endArrow=cross;"));
}

#[test]
fn test_er_cardinality_heads() {
    let xml = drawio("erDiagram\nA |o..|{ B : maybe");
    assert!(xml.contains("startArrow=ERzeroToOne;endArrow=ERoneToMany;"));
    assert!(xml.contains("dashed=1;"));
}
