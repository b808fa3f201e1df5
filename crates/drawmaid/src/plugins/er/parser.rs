//! Entity-relationship parser
//!
//! Relationship lines go through a chumsky grammar; entity blocks and
//! attribute rows are handled by the line scanner, which tracks whether it
//! is inside an `Entity {` block.

use anyhow::Result;
use chumsky::prelude::*;
use tracing::{debug, info, span, trace, Level};

use super::database::{Attribute, ErDatabase, Relationship};
use crate::core::chumsky_utils::{inline_whitespace, quoted, word};
use crate::core::{lexicon, source, Database, DiagramError, DiagramKind};

/// Key markers recognised after an attribute name
const KEY_MARKERS: [&str; 3] = ["PK", "FK", "UK"];

/// Relationship line before cardinality validation
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawRelationship {
    source: String,
    start: String,
    operator: String,
    end: String,
    target: String,
    label: Option<String>,
}

fn entity_name<'src>() -> impl chumsky::Parser<'src, &'src str, String> + Clone {
    word()
        .or(quoted().map(|text| lexicon::strip_quotes(&text).to_string()))
        .labelled("entity name")
}

fn cardinality<'src>() -> impl chumsky::Parser<'src, &'src str, String> + Clone {
    one_of("|o{}")
        .repeated()
        .exactly(2)
        .collect::<String>()
        .labelled("cardinality")
}

fn relationship_parser<'src>() -> impl chumsky::Parser<'src, &'src str, RawRelationship> + Clone {
    let operator = just("--").or(just("..")).map(str::to_string);
    let label = just(':').ignore_then(any().repeated().collect::<String>());

    inline_whitespace()
        .ignore_then(entity_name())
        .then_ignore(inline_whitespace())
        .then(cardinality())
        .then(operator)
        .then(cardinality())
        .then_ignore(inline_whitespace())
        .then(entity_name())
        .then_ignore(inline_whitespace())
        .then(label.or_not())
        .then_ignore(end())
        .map(
            |(((((source, start), operator), end), target), label)| RawRelationship {
                source,
                start,
                operator,
                end,
                target,
                label,
            },
        )
        .labelled("relationship")
}

/// Parse a relationship line; invalid cardinality tokens reject the line
pub fn parse_relationship(line: &str) -> Option<Relationship> {
    let raw = relationship_parser().parse(line).into_result().ok()?;
    if !lexicon::is_cardinality(&raw.start) || !lexicon::is_cardinality(&raw.end) {
        trace!(start = %raw.start, end = %raw.end, "Rejecting unknown cardinality");
        return None;
    }
    let label = raw
        .label
        .map(|text| lexicon::strip_quotes(text.trim()).to_string())
        .unwrap_or_default();
    Some(
        Relationship::new(raw.source, raw.target, raw.start, raw.end)
            .with_label(label)
            .identifying(raw.operator == "--"),
    )
}

/// Parse `type name [PK|FK|UK ...] ["comment"]`
pub fn parse_attribute(line: &str) -> Option<Attribute> {
    let (head, comment) = match line.find('"') {
        Some(at) => (&line[..at], Some(lexicon::strip_quotes(line[at..].trim()))),
        None => (line, None),
    };
    let mut tokens = head.split_whitespace();
    let ty = tokens.next()?;
    let name = tokens.next()?;
    let keys: Vec<String> = tokens
        .flat_map(|token| token.split(','))
        .map(|token| token.trim().to_uppercase())
        .filter(|token| KEY_MARKERS.contains(&token.as_str()))
        .collect();

    let mut attribute = Attribute::new(ty, name);
    attribute.keys = keys;
    attribute.comment = comment.filter(|c| !c.is_empty()).map(str::to_string);
    Some(attribute)
}

/// Entity-relationship parser
pub struct ErParser;

impl ErParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ErParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Scanner state carried across lines
#[derive(Debug, Default)]
struct ScanState {
    /// Entity whose attribute block is open
    open_entity: Option<String>,
}

fn scan_line(
    text: &str,
    line: usize,
    state: &mut ScanState,
    database: &mut ErDatabase,
) -> Result<()> {
    if let Some(entity) = state.open_entity.clone() {
        if text == "}" {
            trace!(line, entity = %entity, "Closed entity block");
            state.open_entity = None;
        } else if let Some(body) = text.strip_suffix('}') {
            add_attributes(database, &entity, body);
            state.open_entity = None;
        } else {
            add_attributes(database, &entity, text);
        }
        return Ok(());
    }

    if let Some(relationship) = parse_relationship(text) {
        trace!(line, source = %relationship.source, target = %relationship.target, "Relationship");
        database.add_edge(relationship)?;
        return Ok(());
    }

    if let Some((name, rest)) = text.split_once('{') {
        let name = lexicon::strip_quotes(name.trim());
        if !is_entity_name(name) {
            trace!(line, statement = text, "Skipping unrecognised block");
            return Ok(());
        }
        database.ensure_entity(name);
        let rest = rest.trim();
        match rest.strip_suffix('}') {
            Some(body) => add_attributes(database, name, body),
            None => {
                add_attributes(database, name, rest);
                state.open_entity = Some(name.to_string());
                trace!(line, entity = name, "Opened entity block");
            }
        }
        return Ok(());
    }

    let bare = lexicon::strip_quotes(text);
    if is_entity_name(bare) {
        database.ensure_entity(bare);
    } else {
        trace!(line, statement = text, "Skipping unrecognised statement");
    }
    Ok(())
}

/// Add every attribute in a `,`/`;` separated list; quoted comments may hold either
fn add_attributes(database: &mut ErDatabase, entity: &str, body: &str) {
    for part in source::split_outside(body, &[',', ';']) {
        if let Some(attribute) = parse_attribute(part.trim()) {
            database.add_attribute(entity, attribute);
        }
    }
}

fn is_entity_name(text: &str) -> bool {
    word().then_ignore(end()).parse(text).into_result().is_ok()
}

impl crate::core::Parser<ErDatabase> for ErParser {
    fn parse(&self, input: &str, database: &mut ErDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_er", input_len = input.len());
        let _enter = parse_span.enter();

        let lines = source::prepare(input)?;
        let header = source::parse_header(lines[0].trimmed());
        let body = match header.kind {
            Some(DiagramKind::Er) => &lines[1..],
            Some(other) => {
                return Err(DiagramError::dialect_mismatch("erDiagram", other.as_str()).into())
            }
            None => &lines[..],
        };

        let mut state = ScanState::default();
        for line in body {
            scan_line(line.trimmed(), line.number, &mut state, database)?;
        }
        if let Some(entity) = state.open_entity {
            debug!(entity = %entity, "Entity block left open at end of input");
        }

        info!(
            entity_count = database.node_count(),
            relationship_count = database.edge_count(),
            attribute_count = database.attribute_count(),
            "ER diagram parsed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "erDiagram"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        source::detect_kind(input) == DiagramKind::Er
    }
}
