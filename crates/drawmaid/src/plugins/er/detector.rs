//! Entity-relationship detector

use crate::core::{lexicon, source, Detector, DiagramKind};
use tracing::trace;

/// Detects `erDiagram` input
pub struct ErDetector;

impl ErDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ErDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for ErDetector {
    fn detect(&self, input: &str) -> bool {
        trace!(input_len = input.len(), "ErDetector::detect called");
        source::read_header(input)
            .and_then(|header| header.kind)
            .map_or(false, |kind| kind == DiagramKind::Er)
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
        // Lines carrying a cardinality next to a relationship operator
        let hits = source::content_lines(input)
            .iter()
            .filter(|line| {
                let text = line.trimmed();
                (text.contains("--") || text.contains(".."))
                    && lexicon::CARDINALITIES
                        .iter()
                        .any(|token| text.contains(token))
            })
            .count();
        (0.2 * hits as f64).min(0.6)
    }

    fn kind(&self) -> DiagramKind {
        DiagramKind::Er
    }

    fn patterns(&self) -> Vec<&'static str> {
        let mut patterns = vec!["erDiagram", "--", ".."];
        patterns.extend(lexicon::CARDINALITIES.iter().copied());
        patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_er() {
        let detector = ErDetector::new();
        assert!(detector.detect("erDiagram\nA ||--o{ B : has"));
        assert!(detector.detect("ERDIAGRAM"));
        assert!(!detector.detect("graph TD\nA-->B"));
        assert_eq!(detector.diagram_type(), "erDiagram");
    }

    #[test]
    fn test_confidence_without_header() {
        let detector = ErDetector::new();
        assert!(detector.confidence("A ||--o{ B : has") > 0.0);
        assert_eq!(detector.confidence("sequenceDiagram\nA ||--o{ B"), 0.0);
    }
}
