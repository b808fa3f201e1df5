//! Sequence diagram detector

use crate::core::{source, Detector, DiagramKind};
use tracing::trace;

/// Detects sequence diagram syntax
pub struct SequenceDetector;

impl SequenceDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SequenceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for SequenceDetector {
    fn detect(&self, input: &str) -> bool {
        trace!(input_len = input.len(), "SequenceDetector::detect called");
        source::read_header(input)
            .and_then(|header| header.kind)
            .map_or(false, |kind| kind == DiagramKind::Sequence)
    }

    fn confidence(&self, input: &str) -> f64 {
        if self.detect(input) {
            return 1.0;
        }
        if source::read_header(input)
            .and_then(|header| header.kind)
            .is_some()
        {
            return 0.0;
        }

        let lines = source::content_lines(input);
        let hits = lines
            .iter()
            .filter(|line| {
                let text = line.trimmed();
                text.starts_with("participant ")
                    || text.starts_with("actor ")
                    || (text.contains("->>") && text.contains(':'))
            })
            .count();
        (0.2 * hits as f64).min(0.6)
    }

    fn kind(&self) -> DiagramKind {
        DiagramKind::Sequence
    }

    fn patterns(&self) -> Vec<&'static str> {
        vec!["sequenceDiagram", "participant", "actor", "->>", "-->>"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_sequence() {
        let detector = SequenceDetector::new();
        assert!(detector.detect("sequenceDiagram\n    Alice->>Bob: Hello"));
        assert!(detector.detect("```mermaid\nsequencediagram\n```"));
        assert!(!detector.detect("flowchart TD\nA-->B"));
        assert!(!detector.detect(""));
        assert_eq!(detector.diagram_type(), "sequence");
    }

    #[test]
    fn test_confidence() {
        let detector = SequenceDetector::new();
        assert_eq!(detector.confidence("sequenceDiagram\nA->>B: hi"), 1.0);
        assert!(detector.confidence("participant A\nA->>B: hi") > 0.0);
        assert_eq!(detector.confidence("graph LR\nA->>B: hi"), 0.0);
    }
}
