//! Flowchart detector implementation
//!
//! Detects flowchart diagram syntax patterns.

use crate::core::{source, Detector, DiagramKind};
use tracing::{debug, trace};

/// Flowchart detector implementation
pub struct FlowchartDetector;

// Connectors that count toward confidence
const CONNECTORS: [&str; 5] = ["-.->", "-.-", "==>", "-->", "---"];

impl FlowchartDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FlowchartDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for FlowchartDetector {
    fn detect(&self, input: &str) -> bool {
        trace!(input_len = input.len(), "FlowchartDetector::detect called");
        let detected = source::read_header(input)
            .and_then(|header| header.kind)
            .map_or(false, |kind| kind == DiagramKind::Flowchart);
        if detected {
            debug!("Detected flowchart via graph/flowchart keyword");
        }
        detected
    }

    fn confidence(&self, input: &str) -> f64 {
        if self.detect(input) {
            let has_direction = source::read_header(input)
                .and_then(|header| header.direction)
                .is_some();
            return if has_direction { 1.0 } else { 0.9 };
        }

        let lines = source::content_lines(input);
        if lines.is_empty() {
            return 0.0;
        }
        // Another dialect's header rules this one out
        if source::read_header(input)
            .and_then(|header| header.kind)
            .is_some()
        {
            return 0.0;
        }

        let arrow_count: usize = lines
            .iter()
            .map(|line| {
                CONNECTORS
                    .iter()
                    .filter(|conn| line.trimmed().contains(*conn))
                    .count()
                    .min(1)
            })
            .sum();
        let mut score = 0.15 * (arrow_count as f64).min(3.0);
        if lines.iter().any(|line| line.trimmed().starts_with("subgraph")) {
            score += 0.15;
        }
        score.min(0.6)
    }

    fn kind(&self) -> DiagramKind {
        DiagramKind::Flowchart
    }

    fn patterns(&self) -> Vec<&'static str> {
        let mut patterns = vec!["flowchart", "graph", "subgraph", "end"];
        patterns.extend(CONNECTORS);
        patterns
    }
}
