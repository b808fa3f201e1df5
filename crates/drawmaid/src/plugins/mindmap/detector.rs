//! Mindmap detector

use crate::core::{source, Detector, DiagramKind};
use tracing::trace;

/// Detects `mindmap` input
pub struct MindmapDetector;

impl MindmapDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MindmapDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for MindmapDetector {
    fn detect(&self, input: &str) -> bool {
        trace!(input_len = input.len(), "MindmapDetector::detect called");
        source::read_header(input)
            .and_then(|header| header.kind)
            .map_or(false, |kind| kind == DiagramKind::Mindmap)
    }

    fn confidence(&self, input: &str) -> f64 {
        if self.detect(input) {
            1.0
        } else {
            // Indented outlines look like anything else without a header
            0.0
        }
    }

    fn kind(&self) -> DiagramKind {
        DiagramKind::Mindmap
    }

    fn patterns(&self) -> Vec<&'static str> {
        vec!["mindmap", "((", "::icon"]
    }
}
