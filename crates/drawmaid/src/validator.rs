//! Import-compatibility checks on raw diagram text
//!
//! The validator never needs a successful parse. It scans content lines for
//! constructs that do not survive conversion and reports them as blocking
//! issues or advisory warnings. Node and edge counts come from a
//! best-effort parse and fall back to zero.

use serde::Serialize;
use tracing::{debug, span, trace, warn, Level};

use crate::core::{source, DiagramKind, SourceLine};
use crate::plugins::orchestrator::Orchestrator;

/// Every flowchart connector token begins with one of these
const CONNECTOR_STARTS: [&str; 3] = ["--", "-.", "=="];

/// Keywords that introduce styling directives
pub const STYLE_KEYWORDS: &[&str] = &["style", "classDef", "class", "linkStyle"];

/// Overall verdict of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compatibility {
    High,
    Medium,
    Low,
}

impl Compatibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compatibility::High => "high",
            Compatibility::Medium => "medium",
            Compatibility::Low => "low",
        }
    }
}

impl std::fmt::Display for Compatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding tied to a source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based line number, 0 when the finding concerns the whole input
    pub line: usize,
    pub issue: String,
    pub suggestion: String,
}

impl Diagnostic {
    fn new(line: usize, issue: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            line,
            issue: issue.into(),
            suggestion: suggestion.into(),
        }
    }
}

/// Result of validating one diagram
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub compatibility: Compatibility,
    pub issues: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub node_count: usize,
    pub edge_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagram_type: Option<String>,
}

impl ValidationReport {
    fn from_findings(issues: Vec<Diagnostic>, warnings: Vec<Diagnostic>) -> Self {
        let compatibility = if !issues.is_empty() {
            Compatibility::Low
        } else if !warnings.is_empty() {
            Compatibility::Medium
        } else {
            Compatibility::High
        };
        Self {
            is_valid: issues.is_empty(),
            compatibility,
            issues,
            warnings,
            node_count: 0,
            edge_count: 0,
            diagram_type: None,
        }
    }

    /// Serialize with the camelCase field names
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Validate diagram text
pub fn validate(input: &str) -> ValidationReport {
    let validate_span = span!(Level::INFO, "validate", input_len = input.len());
    let _enter = validate_span.enter();

    let lines = source::content_lines(input);
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    let header = lines
        .first()
        .map(|line| (line.number, source::parse_header(line.trimmed())));
    let (kind, body): (Option<DiagramKind>, &[SourceLine]) = match header {
        None => {
            issues.push(Diagnostic::new(
                0,
                "Diagram is empty",
                "Add a diagram type declaration such as `flowchart TD` followed by content",
            ));
            (None, &lines[..])
        }
        Some((number, header)) => match header.kind {
            Some(kind) => {
                if kind.is_flow_style() && header.direction.is_none() {
                    warnings.push(Diagnostic::new(
                        number,
                        "Flowchart has no direction",
                        "Add a direction after the keyword, e.g. `flowchart TD` or `flowchart LR`",
                    ));
                }
                (Some(kind), &lines[1..])
            }
            None => {
                issues.push(Diagnostic::new(
                    number,
                    "Missing or unrecognized diagram type declaration",
                    "Start with `flowchart`, `sequenceDiagram`, `erDiagram` or `mindmap`",
                ));
                (None, &lines[..])
            }
        },
    };

    let flow_style = kind.map_or(true, |kind| kind.is_flow_style());
    for line in body {
        check_line(line, flow_style, &mut issues, &mut warnings);
    }

    let mut report = ValidationReport::from_findings(issues, warnings);
    report.diagram_type = kind.map(|kind| kind.as_str().to_string());

    match Orchestrator::new().parse(input) {
        Ok(parsed) => {
            report.node_count = parsed.node_count();
            report.edge_count = parsed.edge_count();
        }
        Err(err) => warn!(error = %err, "Best-effort parse failed, counts set to zero"),
    }

    debug!(
        is_valid = report.is_valid,
        compatibility = %report.compatibility,
        issues = report.issues.len(),
        warnings = report.warnings.len(),
        "Validation finished"
    );
    report
}

fn check_line(
    line: &SourceLine,
    flow_style: bool,
    issues: &mut Vec<Diagnostic>,
    warnings: &mut Vec<Diagnostic>,
) {
    let text = line.trimmed();
    for segment in source::split_outside(text, &[';']) {
        let keyword = segment.split_whitespace().next().unwrap_or("");
        if STYLE_KEYWORDS.contains(&keyword) {
            trace!(line = line.number, keyword, "Style directive");
            warnings.push(Diagnostic::new(
                line.number,
                format!("Styling directive `{}` is not carried over", keyword),
                "Remove the directive and style the shapes after import",
            ));
        }
    }

    let first = text.split_whitespace().next().unwrap_or("");
    if STYLE_KEYWORDS.contains(&first) {
        return;
    }

    if text.matches("-->").count() > 1 {
        issues.push(Diagnostic::new(
            line.number,
            "Chained arrows on one line",
            "Split the chain into one connection per line, e.g. `A --> B` and `B --> C`",
        ));
    }

    if !flow_style || matches!(first, "subgraph" | "end" | "direction") {
        return;
    }
    let identifier = leading_identifier(text);
    if !identifier.is_empty() && !identifier.chars().all(|c| c.is_alphanumeric() || c == '_') {
        issues.push(Diagnostic::new(
            line.number,
            format!("Identifier `{}` contains non-word characters", identifier),
            "Use letters, digits and underscores for node ids and put display text in brackets",
        ));
    }
}

/// The node id a flowchart line starts with
///
/// The id ends at whitespace, a shape bracket, a `;` or the start of a
/// connector (`--`, `-.`, `==`).
pub fn leading_identifier(text: &str) -> &str {
    let mut end = text
        .find(|c: char| c.is_whitespace() || matches!(c, '[' | '(' | '{' | ';'))
        .unwrap_or(text.len());
    for start in CONNECTOR_STARTS {
        if let Some(at) = text[..end].find(start) {
            end = end.min(at);
        }
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_flowchart_is_high() {
        let report = validate("flowchart LR\n    A[Start] --> B[Done]");
        assert!(report.is_valid);
        assert_eq!(report.compatibility, Compatibility::High);
        assert_eq!(report.node_count, 2);
        assert_eq!(report.edge_count, 1);
        assert_eq!(report.diagram_type.as_deref(), Some("flowchart"));
    }

    #[test]
    fn test_chained_arrows_block() {
        let report = validate("flowchart TD\nA --> B --> C");
        assert!(!report.is_valid);
        assert_eq!(report.compatibility, Compatibility::Low);
        assert!(report.issues.iter().any(|d| d.issue.contains("Chained") && d.line == 2));
    }

    #[test]
    fn test_missing_direction_and_style_warn() {
        let report = validate("graph\nA --> B\nstyle A fill:#f9f\nclassDef hot fill:#f00");
        assert!(report.is_valid);
        assert_eq!(report.compatibility, Compatibility::Medium);
        assert_eq!(report.warnings.len(), 3);
        assert_eq!(report.warnings[0].line, 1);
    }

    #[test]
    fn test_style_after_semicolon_warns() {
        let report = validate("flowchart TD\nA --> B; style A fill:#f00");
        assert!(report.is_valid);
        assert_eq!(report.compatibility, Compatibility::Medium);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].line, 2);
        assert!(report.warnings[0].issue.contains("`style`"));
        assert_eq!(report.edge_count, 1);
    }

    #[test]
    fn test_unknown_header_is_issue() {
        let report = validate("pie title Pets\nA --> B");
        assert!(!report.is_valid);
        assert_eq!(report.issues[0].line, 1);
        assert_eq!(report.diagram_type, None);
    }

    #[test]
    fn test_non_word_identifier() {
        let report = validate("flowchart TD\nmy-node --> B\nok[Fine]");
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].issue.contains("`my-node`"));
    }

    #[test]
    fn test_leading_identifier() {
        assert_eq!(leading_identifier("A-->B"), "A");
        assert_eq!(leading_identifier("A[Box] --> B"), "A");
        assert_eq!(leading_identifier("x.y -.-> z"), "x.y");
        assert_eq!(leading_identifier("node_1"), "node_1");
        assert_eq!(leading_identifier("B-->|yes| C"), "B");
        assert_eq!(leading_identifier("A-- label -->B"), "A");
        assert_eq!(leading_identifier("start==>stop"), "start");
    }

    #[test]
    fn test_empty_input_degrades_counts() {
        let report = validate("   ");
        assert!(!report.is_valid);
        assert_eq!(report.node_count, 0);
        assert_eq!(report.edge_count, 0);
    }

    #[test]
    fn test_sequence_lines_skip_identifier_rule() {
        let report = validate("sequenceDiagram\nAlice->>Bob: Hi\nBob-->>Alice: Yo");
        assert_eq!(report.compatibility, Compatibility::High);
        assert_eq!(report.node_count, 2);
        assert_eq!(report.edge_count, 2);
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = validate("flowchart TD\nA --> B").to_json().unwrap();
        assert!(json.contains("\"isValid\": true"));
        assert!(json.contains("\"compatibility\": \"high\""));
        assert!(json.contains("\"nodeCount\": 2"));
        assert!(json.contains("\"diagramType\": \"flowchart\""));
    }
}
