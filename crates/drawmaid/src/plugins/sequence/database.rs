//! Sequence diagram database implementation
//!
//! Stores participants and messages for sequence diagrams. Message order is
//! the timeline; there is no other notion of time.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

use crate::core::Database;

/// Line style for message arrows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    #[default]
    Solid,
    Dashed,
}

/// Arrow head drawn at the receiving lifeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowHead {
    /// Filled head (`>>`)
    #[default]
    Filled,
    /// Open head (`)`)
    Open,
    /// Cross (`x`)
    Cross,
    /// Plain line (`>`)
    None,
}

/// A participant in the sequence diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Identifier used in message lines
    pub id: String,
    /// Display label (may differ from id via `as`)
    pub label: String,
    pub is_actor: bool,
}

impl Participant {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            is_actor: false,
        }
    }

    pub fn with_label(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            is_actor: false,
        }
    }

    pub fn actor(mut self) -> Self {
        self.is_actor = true;
        self
    }
}

/// A message between participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Synthetic id, assigned by the database
    pub id: String,
    pub from: String,
    pub to: String,
    pub text: String,
    pub line: LineKind,
    pub head: ArrowHead,
    pub is_async: bool,
}

impl Message {
    pub fn new(from: impl Into<String>, to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            from: from.into(),
            to: to.into(),
            text: text.into(),
            line: LineKind::Solid,
            head: ArrowHead::Filled,
            is_async: false,
        }
    }

    pub fn with_line(mut self, line: LineKind) -> Self {
        self.line = line;
        self
    }

    pub fn with_head(mut self, head: ArrowHead) -> Self {
        self.head = head;
        self
    }

    pub fn asynchronous(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    /// Does the message go back to its sender?
    pub fn is_self_message(&self) -> bool {
        self.from == self.to
    }
}

/// Sequence diagram database
#[derive(Debug, Default)]
pub struct SequenceDatabase {
    participants: Vec<Participant>,
    index: HashMap<String, usize>,
    messages: Vec<Message>,
}

impl SequenceDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant on first mention; known ids are left alone
    pub fn ensure_participant(&mut self, id: &str) {
        if !self.index.contains_key(id) {
            self.index.insert(id.to_string(), self.participants.len());
            self.participants.push(Participant::new(id));
        }
    }

    /// Position of a participant in the row
    pub fn participant_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn actor_count(&self) -> usize {
        self.participants.iter().filter(|p| p.is_actor).count()
    }
}

impl Database for SequenceDatabase {
    type Node = Participant;
    type Edge = Message;

    /// Declare a participant; a later declaration updates label and kind
    /// but keeps the original row position.
    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        match self.index.get(&node.id) {
            Some(&slot) => self.participants[slot] = node,
            None => {
                self.index.insert(node.id.clone(), self.participants.len());
                self.participants.push(node);
            }
        }
        Ok(())
    }

    fn add_edge(&mut self, mut edge: Self::Edge) -> Result<()> {
        self.ensure_participant(&edge.from);
        self.ensure_participant(&edge.to);
        if edge.id.is_empty() {
            edge.id = format!("m{}", self.messages.len() + 1);
        }
        self.messages.push(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&Self::Node> {
        self.index.get(id).map(|&slot| &self.participants[slot])
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.participants.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.messages.iter()
    }

    fn clear(&mut self) {
        self.participants.clear();
        self.index.clear();
        self.messages.clear();
    }

    fn node_count(&self) -> usize {
        self.participants.len()
    }

    fn edge_count(&self) -> usize {
        self.messages.len()
    }
}
