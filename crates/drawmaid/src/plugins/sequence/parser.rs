//! Sequence diagram parser
//!
//! Parses sequence diagram syntax into the database. Recognises participant
//! and actor declarations and message lines; block keywords, notes and
//! activations are skipped.

use anyhow::Result;
use tracing::{debug, info, span, trace, Level};

use super::database::{ArrowHead, LineKind, Message, Participant, SequenceDatabase};
use crate::core::{lexicon, source, Database, DiagramError, DiagramKind, Parser};

/// Message arrow tokens, longest first
const ARROW_TOKENS: [&str; 8] = ["-->>", "->>", "--x", "-x", "--)", "-)", "-->", "->"];

/// Semantics of a message arrow token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowToken {
    pub line: LineKind,
    pub head: ArrowHead,
    pub is_async: bool,
}

/// Classify a message arrow token
pub fn classify_arrow(token: &str) -> ArrowToken {
    let line = if token.contains("--") {
        LineKind::Dashed
    } else {
        LineKind::Solid
    };
    let head = if token.ends_with(">>") {
        ArrowHead::Filled
    } else if token.ends_with(')') {
        ArrowHead::Open
    } else if token.ends_with('x') {
        ArrowHead::Cross
    } else {
        ArrowHead::None
    };
    ArrowToken {
        line,
        head,
        is_async: token.contains(">>") || token.ends_with(')'),
    }
}

/// Sequence diagram parser
pub struct SequenceParser;

impl SequenceParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a message line like `Alice->>Bob: Hello`
    fn parse_message_line(&self, line: &str) -> Option<Message> {
        let (head, text) = match line.split_once(':') {
            Some((head, text)) => (head, text.trim()),
            None => (line, ""),
        };
        let (at, token) = find_arrow(head)?;

        let from = head[..at].trim();
        let to = head[at + token.len()..]
            .trim()
            .trim_start_matches(['+', '-'])
            .trim();
        if !is_participant_id(from) || !is_participant_id(to) {
            return None;
        }

        let arrow = classify_arrow(token);
        Some(
            Message::new(from, to, text)
                .with_line(arrow.line)
                .with_head(arrow.head)
                .asynchronous(arrow.is_async),
        )
    }

    /// Parse `participant X`, `participant X as Label` or the `actor` forms
    fn parse_participant_line(&self, line: &str) -> Option<Participant> {
        let (rest, is_actor) = if let Some(rest) = line.strip_prefix("participant ") {
            (rest, false)
        } else if let Some(rest) = line.strip_prefix("actor ") {
            (rest, true)
        } else {
            return None;
        };

        let rest = rest.trim();
        let participant = match rest.split_once(" as ") {
            Some((id, label)) => {
                Participant::with_label(id.trim(), lexicon::strip_quotes(label.trim()))
            }
            None => Participant::new(rest),
        };
        if participant.id.is_empty() {
            return None;
        }
        Some(if is_actor {
            participant.actor()
        } else {
            participant
        })
    }
}

impl Default for SequenceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Earliest arrow in the text, preferring the longest token at that offset
fn find_arrow(text: &str) -> Option<(usize, &'static str)> {
    text.char_indices()
        .filter(|(_, c)| *c == '-')
        .find_map(|(at, _)| {
            ARROW_TOKENS
                .iter()
                .find(|token| text[at..].starts_with(**token))
                .map(|token| (at, *token))
        })
}

fn is_participant_id(text: &str) -> bool {
    !text.is_empty() && !text.contains(char::is_whitespace)
}

impl Parser<SequenceDatabase> for SequenceParser {
    fn parse(&self, input: &str, database: &mut SequenceDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_sequence", input_len = input.len());
        let _enter = parse_span.enter();

        let lines = source::prepare(input)?;
        let header = source::parse_header(lines[0].trimmed());
        let body = match header.kind {
            Some(DiagramKind::Sequence) => &lines[1..],
            Some(other) => {
                return Err(DiagramError::dialect_mismatch("sequence", other.as_str()).into())
            }
            None => &lines[..],
        };

        for line in body {
            let text = line.trimmed();
            if let Some(participant) = self.parse_participant_line(text) {
                trace!(line = line.number, id = %participant.id, "Participant");
                database.add_node(participant)?;
            } else if let Some(message) = self.parse_message_line(text) {
                trace!(line = line.number, from = %message.from, to = %message.to, "Message");
                database.add_edge(message)?;
            } else {
                trace!(line = line.number, statement = text, "Skipping unrecognised statement");
            }
        }

        debug!(actors = database.actor_count(), "Sequence participants resolved");
        info!(
            participant_count = database.node_count(),
            message_count = database.edge_count(),
            "Sequence diagram parsed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sequence"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        source::detect_kind(input) == DiagramKind::Sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> SequenceDatabase {
        let mut db = SequenceDatabase::new();
        SequenceParser::new().parse(input, &mut db).unwrap();
        db
    }

    #[test]
    fn test_simple_message() {
        let db = parse("sequenceDiagram\n    Alice->>Bob: Hello Bob");
        assert_eq!(db.node_count(), 2);
        let message = &db.messages()[0];
        assert_eq!(message.from, "Alice");
        assert_eq!(message.to, "Bob");
        assert_eq!(message.text, "Hello Bob");
        assert_eq!(message.line, LineKind::Solid);
        assert!(message.is_async);
        assert_eq!(message.id, "m1");
    }

    #[test]
    fn test_arrow_semantics() {
        let cases = [
            ("->>", LineKind::Solid, ArrowHead::Filled, true),
            ("-->>", LineKind::Dashed, ArrowHead::Filled, true),
            ("->", LineKind::Solid, ArrowHead::None, false),
            ("-->", LineKind::Dashed, ArrowHead::None, false),
            ("-x", LineKind::Solid, ArrowHead::Cross, false),
            ("--x", LineKind::Dashed, ArrowHead::Cross, false),
            ("-)", LineKind::Solid, ArrowHead::Open, true),
            ("--)", LineKind::Dashed, ArrowHead::Open, true),
        ];
        for (token, line, head, is_async) in cases {
            let db = parse(&format!("sequenceDiagram\nA{}B: msg", token));
            let message = &db.messages()[0];
            assert_eq!((message.from.as_str(), message.to.as_str()), ("A", "B"), "{}", token);
            assert_eq!(message.line, line, "{}", token);
            assert_eq!(message.head, head, "{}", token);
            assert_eq!(message.is_async, is_async, "{}", token);
        }
    }

    #[test]
    fn test_participants_and_actors() {
        let db = parse(
            "sequenceDiagram\nactor U as \"End User\"\nparticipant API as Gateway\nparticipant DB\nU->>API: call\nAPI-->>U: done",
        );
        let participants = db.participants();
        assert_eq!(participants.len(), 3);
        assert!(participants[0].is_actor);
        assert_eq!(participants[0].label, "End User");
        assert_eq!(participants[1].label, "Gateway");
        assert_eq!(participants[2].id, "DB");
        assert_eq!(db.edge_count(), 2);
    }

    #[test]
    fn test_activation_markers_are_stripped() {
        let db = parse("sequenceDiagram\nA->>+B: start\nB-->>-A: stop");
        assert_eq!(db.messages()[0].to, "B");
        assert_eq!(db.messages()[1].to, "A");
        assert_eq!(db.node_count(), 2);
    }

    #[test]
    fn test_message_text_may_contain_arrows_and_colons() {
        let db = parse("sequenceDiagram\nA->B: see a-->>b: here");
        assert_eq!(db.messages()[0].text, "see a-->>b: here");
        assert_eq!(db.messages()[0].line, LineKind::Solid);
    }

    #[test]
    fn test_unrecognised_lines_are_skipped() {
        let db = parse(
            "sequenceDiagram\nNote over A,B: thinking\nloop Every minute\nA->>B: ping\nend\nautonumber",
        );
        assert_eq!(db.edge_count(), 1);
        assert_eq!(db.node_count(), 2);
    }

    #[test]
    fn test_other_dialect_is_rejected() {
        let mut db = SequenceDatabase::new();
        let err = SequenceParser::new()
            .parse("erDiagram\nA ||--o{ B : has", &mut db)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::DialectMismatch { .. })
        ));
    }
}
