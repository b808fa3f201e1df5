//! Flowchart parser implementation
//!
//! A single pass over the content lines. Group markers (`subgraph`, `end`)
//! are recognised per line; everything else goes through the chumsky
//! statement grammar. Lines that fit nothing are skipped.

use anyhow::Result;
use tracing::{debug, info, span, trace, Level};

use super::statement::{parse_statement, NodeRef, Statement};
use super::FlowchartDatabase;
use crate::core::chumsky_utils::word;
use crate::core::{
    lexicon, source, Database, DiagramError, DiagramKind, EdgeData, Parser, SourceLine,
};

/// Flowchart parser implementation
pub struct FlowchartParser;

impl FlowchartParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FlowchartParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<FlowchartDatabase> for FlowchartParser {
    fn parse(&self, input: &str, database: &mut FlowchartDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_flowchart", input_len = input.len());
        let _enter = parse_span.enter();

        let lines = source::prepare(input)?;
        let header = source::parse_header(lines[0].trimmed());
        if let Some(kind) = header.kind {
            if kind != DiagramKind::Flowchart {
                return Err(DiagramError::dialect_mismatch("flowchart", kind.as_str()).into());
            }
        }
        database.set_direction(header.direction_or_default());
        debug!(direction = %database.direction(), "Read flowchart header");

        let body: &[SourceLine] = if header.kind.is_some() {
            // `graph LR; A-->B` carries statements after the header
            if let Some((_, rest)) = lines[0].trimmed().split_once(';') {
                scan_line(rest, lines[0].number, database)?;
            }
            &lines[1..]
        } else {
            trace!("No dialect header, scanning first line as content");
            &lines[..]
        };

        for line in body {
            scan_line(line.trimmed(), line.number, database)?;
        }
        database.discard_open_subgraph();

        info!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            subgraph_count = database.subgraph_count(),
            "Flowchart parsed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "flowchart"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        source::detect_kind(input) == DiagramKind::Flowchart
            && !source::content_lines(input).is_empty()
    }
}

fn scan_line(text: &str, line: usize, database: &mut FlowchartDatabase) -> Result<()> {
    for segment in source::split_outside(text, &[';']) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let lower = segment.to_lowercase();

        if lower == "subgraph"
            || lower.starts_with("subgraph ")
            || lower.starts_with("subgraph\t")
        {
            let (id, label) = subgraph_title(segment["subgraph".len()..].trim());
            let id = database.open_subgraph(id, label);
            trace!(line, subgraph_id = %id, "Opened subgraph");
        } else if lower == "end" {
            if database.close_subgraph().is_none() {
                trace!(line, "End marker without open subgraph");
            }
        } else if lower.starts_with("direction ") {
            trace!(line, "Ignoring subgraph direction");
        } else {
            match parse_statement(segment) {
                Some(statement) => apply_statement(statement, database)?,
                None => trace!(line, statement = segment, "Skipping unrecognised statement"),
            }
        }
    }
    Ok(())
}

fn apply_statement(statement: Statement, database: &mut FlowchartDatabase) -> Result<()> {
    match statement {
        Statement::Declaration(node) => {
            touch_node(database, node)?;
        }
        Statement::Connection { head, links } => {
            let mut previous = touch_node(database, head)?;
            for link in links {
                let target = touch_node(database, link.target)?;
                let edge = match link.label {
                    Some(label) => EdgeData::with_label(&previous, &target, link.arrow, label),
                    None => EdgeData::with_arrow(&previous, &target, link.arrow),
                };
                database.add_edge(edge)?;
                previous = target;
            }
        }
    }
    Ok(())
}

/// Upsert a mentioned node and record group membership, returning its id
fn touch_node(database: &mut FlowchartDatabase, node: NodeRef) -> Result<String> {
    database.upsert_node(&node.id, node.shape)?;
    database.record_membership(&node.id);
    Ok(node.id)
}

/// Read `id[Title]`, `"Title"`, `id` or `Free text title`
fn subgraph_title(rest: &str) -> (Option<String>, String) {
    if rest.is_empty() {
        return (None, String::new());
    }
    if rest.starts_with('"') {
        return (None, lexicon::strip_quotes(rest).to_string());
    }
    if let Some(bracket) = rest.find(|c| matches!(c, '[' | '(' | '{')) {
        let id = rest[..bracket].trim();
        if is_word(id) {
            let (_, label) = lexicon::classify_shape(&rest[bracket..]);
            return (Some(id.to_string()), label);
        }
    }
    if is_word(rest) {
        return (Some(rest.to_string()), rest.to_string());
    }
    (None, rest.to_string())
}

fn is_word(text: &str) -> bool {
    use chumsky::Parser as _;
    word()
        .then_ignore(chumsky::prelude::end())
        .parse(text)
        .into_result()
        .is_ok()
}
