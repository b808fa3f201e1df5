//! Core detector trait for diagram type identification

use super::DiagramKind;

/// Core trait for diagram type detectors
///
/// Each dialect provides a detector that recognises its header keyword.
/// Detection only looks at the first content line; a body that merely
/// resembles a dialect is reported through `confidence`.
///
/// # Example
/// ```
/// use drawmaid::core::Detector;
/// use drawmaid::plugins::sequence::SequenceDetector;
///
/// let detector = SequenceDetector::new();
/// assert!(detector.detect("sequenceDiagram\n    Alice->>Bob: Hi"));
/// ```
pub trait Detector: Send + Sync {
    /// Detect if the input declares this diagram type
    fn detect(&self, input: &str) -> bool;

    /// Get the confidence level of the detection (0.0 to 1.0)
    fn confidence(&self, input: &str) -> f64;

    /// Get the diagram kind this detector recognises
    fn kind(&self) -> DiagramKind;

    /// Get the diagram type name
    fn diagram_type(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Get key patterns that this detector looks for
    fn patterns(&self) -> Vec<&'static str>;
}
