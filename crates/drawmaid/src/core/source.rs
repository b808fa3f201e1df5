//! Source preprocessing shared by every dialect
//!
//! Strips surrounding code fences, drops blank and `%%` comment lines, and
//! reads the dialect header. Lines keep their original 1-based numbers so
//! diagnostics can point back into the input.

use super::{DiagramError, DiagramKind, Direction};

/// One content line of a diagram source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the original input
    pub number: usize,
    /// Line text with trailing whitespace removed; indentation is kept
    pub text: String,
}

impl SourceLine {
    /// Line text without indentation
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Number of leading whitespace characters
    pub fn indent(&self) -> usize {
        self.text.chars().take_while(|c| c.is_whitespace()).count()
    }
}

/// The dialect header read from the first content line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    /// Recognised dialect, if the first token named one
    pub kind: Option<DiagramKind>,
    /// Direction token, if one followed a flow-style keyword
    pub direction: Option<Direction>,
}

impl Header {
    /// Dialect with the flowchart fallback applied
    pub fn kind_or_default(&self) -> DiagramKind {
        self.kind.unwrap_or_default()
    }

    /// Direction with the top-down fallback applied
    pub fn direction_or_default(&self) -> Direction {
        self.direction.unwrap_or_default()
    }
}

/// Extract the content lines of a diagram source
///
/// One leading and one trailing fence line (```` ``` ```` with or without a
/// language tag) are removed, then blank and comment lines are dropped.
pub fn content_lines(input: &str) -> Vec<SourceLine> {
    let lines: Vec<&str> = input.lines().collect();
    let first = lines.iter().position(|line| !line.trim().is_empty());
    let last = lines.iter().rposition(|line| !line.trim().is_empty());

    let (mut start, mut end) = match (first, last) {
        (Some(first), Some(last)) => (first, last + 1),
        _ => return Vec::new(),
    };
    if lines[start].trim_start().starts_with("```") {
        start += 1;
    }
    if end > start && lines[end - 1].trim_start().starts_with("```") {
        end -= 1;
    }

    lines[start..end.max(start)]
        .iter()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with("%%")
        })
        .map(|(offset, line)| SourceLine {
            number: start + offset + 1,
            text: line.trim_end().to_string(),
        })
        .collect()
}

/// Content lines, failing when nothing remains
pub fn prepare(input: &str) -> Result<Vec<SourceLine>, DiagramError> {
    let lines = content_lines(input);
    if lines.is_empty() {
        return Err(DiagramError::EmptyDiagram);
    }
    Ok(lines)
}

/// Read the dialect keyword and direction from a header line
pub fn parse_header(line: &str) -> Header {
    let head = line.split(';').next().unwrap_or(line);
    let mut tokens = head.split_whitespace();
    let keyword = match tokens.next() {
        Some(token) => token.to_lowercase(),
        None => return Header::default(),
    };

    let kind = match keyword.as_str() {
        "flowchart" | "graph" => Some(DiagramKind::Flowchart),
        "sequencediagram" => Some(DiagramKind::Sequence),
        "erdiagram" => Some(DiagramKind::Er),
        "mindmap" => Some(DiagramKind::Mindmap),
        _ => None,
    };

    let direction = match kind {
        Some(kind) if kind.is_flow_style() => tokens.next().and_then(Direction::from_str),
        _ => None,
    };

    Header { kind, direction }
}

/// Detect the dialect of a whole input, falling back to flowchart
pub fn detect_kind(input: &str) -> DiagramKind {
    content_lines(input)
        .first()
        .map(|line| parse_header(line.trimmed()).kind_or_default())
        .unwrap_or_default()
}

/// Header of the input, if it has any content
pub fn read_header(input: &str) -> Option<Header> {
    content_lines(input)
        .first()
        .map(|line| parse_header(line.trimmed()))
}

/// Split `text` at any of `separators` that sit outside quotes, `|label|`
/// pipes and bracketed bodies
pub fn split_outside<'a>(text: &'a str, separators: &[char]) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut in_quotes = false;
    let mut in_pipe = false;
    let mut depth = 0usize;
    let mut start = 0;
    for (index, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            '|' => in_pipe = !in_pipe,
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            c if separators.contains(&c) && !in_pipe && depth == 0 => {
                segments.push(&text[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    segments.push(&text[start..]);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_lines_keep_numbers() {
        let lines = content_lines("flowchart TD\n\n%% note\n  A --> B\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].number, 4);
        assert_eq!(lines[1].text, "  A --> B");
        assert_eq!(lines[1].trimmed(), "A --> B");
        assert_eq!(lines[1].indent(), 2);
    }

    #[test]
    fn test_fences_are_stripped() {
        let lines = content_lines("\n```mermaid\nmindmap\n  root\n```\n\n");
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["mindmap", "  root"]);
        assert_eq!(lines[0].number, 3);
    }

    #[test]
    fn test_bare_fence_only_input_is_empty() {
        assert!(content_lines("```\n```").is_empty());
        assert!(content_lines("   \n\t\n").is_empty());
    }

    #[test]
    fn test_prepare_rejects_empty() {
        assert!(matches!(prepare(""), Err(DiagramError::EmptyDiagram)));
        assert!(matches!(prepare("  \n "), Err(DiagramError::EmptyDiagram)));
        assert!(prepare("graph").is_ok());
    }

    #[test]
    fn test_parse_header() {
        let header = parse_header("flowchart LR");
        assert_eq!(header.kind, Some(DiagramKind::Flowchart));
        assert_eq!(header.direction, Some(Direction::LeftRight));

        let header = parse_header("graph BT;");
        assert_eq!(header.direction, Some(Direction::BottomUp));

        let header = parse_header("graph TD; A-->B");
        assert_eq!(header.direction, Some(Direction::TopDown));

        assert_eq!(parse_header("GRAPH").direction, None);
        assert_eq!(parse_header("GRAPH").kind, Some(DiagramKind::Flowchart));
        assert_eq!(parse_header("SequenceDiagram").kind, Some(DiagramKind::Sequence));
        assert_eq!(parse_header("erDiagram").kind, Some(DiagramKind::Er));
        assert_eq!(parse_header("MINDMAP").kind, Some(DiagramKind::Mindmap));
        assert_eq!(parse_header("pie title Pets").kind, None);
    }

    #[test]
    fn test_detect_kind_falls_back_to_flowchart() {
        assert_eq!(detect_kind("sequenceDiagram\nA->>B: hi"), DiagramKind::Sequence);
        assert_eq!(detect_kind("A --> B"), DiagramKind::Flowchart);
        assert_eq!(detect_kind(""), DiagramKind::Flowchart);
    }

    #[test]
    fn test_split_outside_respects_quotes_pipes_and_brackets() {
        assert_eq!(split_outside("A --> B; B --> C", &[';']), vec!["A --> B", " B --> C"]);
        assert_eq!(split_outside("A -->|a;b| B", &[';']), vec!["A -->|a;b| B"]);
        assert_eq!(split_outside("A[x; y] --> B", &[';']), vec!["A[x; y] --> B"]);
        assert_eq!(split_outside("A[\"p;q\"];B", &[';']), vec!["A[\"p;q\"]", "B"]);
        assert_eq!(
            split_outside("string id PK \"a, b\", int n", &[',', ';']),
            vec!["string id PK \"a, b\"", " int n"]
        );
    }
}
