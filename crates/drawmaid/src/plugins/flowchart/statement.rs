//! Flowchart statement grammar using chumsky
//!
//! Parses one flowchart statement (a connection chain or a standalone node
//! declaration) into an AST. Line-level keywords such as `subgraph`, `end`
//! and `direction` are handled by the scanner before this grammar runs.

use chumsky::prelude::*;

use crate::core::chumsky_utils::{inline_whitespace, inline_whitespace_required, quoted, word};
use crate::core::{lexicon, ArrowKind, NodeShape};

/// Node mention with optional inline shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: String,
    /// Shape and label when the mention carried brackets
    pub shape: Option<(NodeShape, String)>,
}

/// One connector and the node it leads to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub arrow: ArrowKind,
    pub label: Option<String>,
    pub target: NodeRef,
}

/// A parsed flowchart statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `A --> B`, or a chain `A --> B -.-> C`
    Connection { head: NodeRef, links: Vec<Link> },
    /// `A[Label]`
    Declaration(NodeRef),
}

/// Parse a single statement, or `None` when the text is not one
pub fn parse_statement(input: &str) -> Option<Statement> {
    statement_parser().parse(input).into_result().ok()
}

fn statement_parser<'src>() -> impl Parser<'src, &'src str, Statement> + Clone {
    let connection = node_ref()
        .then(link().repeated().at_least(1).collect::<Vec<_>>())
        .map(|(head, links)| Statement::Connection { head, links });

    let declaration = word()
        .then(shape_fragment())
        .then_ignore(class_suffix().or_not())
        .map(|(id, shape)| {
            Statement::Declaration(NodeRef {
                id,
                shape: Some(shape),
            })
        });

    inline_whitespace()
        .ignore_then(connection.or(declaration))
        .then_ignore(inline_whitespace())
        .then_ignore(just(';').or_not())
        .then_ignore(inline_whitespace())
        .then_ignore(end())
        .labelled("flowchart statement")
}

fn node_ref<'src>() -> impl Parser<'src, &'src str, NodeRef> + Clone {
    word()
        .then(shape_fragment().or_not())
        .then_ignore(class_suffix().or_not())
        .map(|(id, shape)| NodeRef { id, shape })
        .labelled("node reference")
}

/// `:::className` suffix; accepted and ignored
fn class_suffix<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    just(":::").then(word()).ignored()
}

/// Bracketed shape body, classified through the lexicon
fn shape_fragment<'src>() -> impl Parser<'src, &'src str, (NodeShape, String)> + Clone {
    let opens = one_of("[({").repeated().at_least(1).collect::<String>();
    let body = quoted().or(none_of("[](){}|\"\n")
        .repeated()
        .at_least(1)
        .collect::<String>());
    let closes = one_of("])}").repeated().at_least(1).collect::<String>();

    opens
        .then(body)
        .then(closes)
        .map(|((open, body), close)| lexicon::classify_shape(&format!("{}{}{}", open, body, close)))
        .labelled("shape")
}

/// Raw connector token such as `-->`, `-.-` or `==>`
fn arrow_token<'src>() -> impl Parser<'src, &'src str, String> + Clone {
    one_of("-.=")
        .repeated()
        .at_least(2)
        .collect::<String>()
        .then(just('>').or_not())
        .map(|(body, head)| match head {
            Some(_) => format!("{}>", body),
            None => body,
        })
        .labelled("arrow")
}

/// Connector with inline text: `-- text -->`, `-. text .->`, `== text ==>`
fn texted_connector<'src>() -> impl Parser<'src, &'src str, (ArrowKind, Option<String>)> + Clone
{
    just("--")
        .or(just("-."))
        .or(just("=="))
        .then_ignore(inline_whitespace_required())
        .then(none_of("-.=|\n").repeated().at_least(1).collect::<String>())
        .then(arrow_token())
        .map(|((opener, text), token)| {
            let canonical = match (opener, token.ends_with('>')) {
                ("-.", true) => "-.->",
                ("-.", false) => "-.-",
                ("==", _) => "==>",
                (_, true) => "-->",
                (_, false) => "---",
            };
            let text = text.trim();
            let label = (!text.is_empty()).then(|| text.to_string());
            (lexicon::classify_arrow(canonical), label)
        })
}

fn connector<'src>() -> impl Parser<'src, &'src str, (ArrowKind, Option<String>)> + Clone {
    texted_connector().or(arrow_token().map(|token| (lexicon::classify_arrow(&token), None)))
}

/// `|label|` after a connector
fn pipe_label<'src>() -> impl Parser<'src, &'src str, String> + Clone {
    just('|')
        .ignore_then(none_of("|\n").repeated().collect::<String>())
        .then_ignore(just('|'))
        .map(|label| label.trim().to_string())
        .labelled("edge label")
}

fn link<'src>() -> impl Parser<'src, &'src str, Link> + Clone {
    inline_whitespace()
        .ignore_then(connector())
        .then_ignore(inline_whitespace())
        .then(pipe_label().then_ignore(inline_whitespace()).or_not())
        .then(node_ref())
        .map(|(((arrow, text), pipe), target)| Link {
            arrow,
            label: pipe.or(text),
            target,
        })
}
