//! Entity-relationship database implementation

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

use crate::core::Database;

/// One attribute row of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    /// Key markers such as `PK` or `FK`
    pub keys: Vec<String>,
    pub comment: Option<String>,
}

impl Attribute {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            keys: Vec::new(),
            comment: None,
        }
    }

    /// Row text used in documents, e.g. `string id PK`
    pub fn display(&self) -> String {
        let mut text = format!("{} {}", self.ty, self.name);
        if !self.keys.is_empty() {
            text.push(' ');
            text.push_str(&self.keys.join(","));
        }
        text
    }
}

/// An entity and its attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub id: String,
    pub label: String,
    pub attributes: Vec<Attribute>,
}

impl Entity {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            attributes: Vec::new(),
        }
    }
}

/// A relationship between two entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Synthetic id, assigned by the database
    pub id: String,
    pub source: String,
    pub target: String,
    pub cardinality_start: String,
    pub cardinality_end: String,
    pub label: String,
    /// `--` relationships are identifying, `..` ones are not
    pub identifying: bool,
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        cardinality_start: impl Into<String>,
        cardinality_end: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            source: source.into(),
            target: target.into(),
            cardinality_start: cardinality_start.into(),
            cardinality_end: cardinality_end.into(),
            label: String::new(),
            identifying: true,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn identifying(mut self, identifying: bool) -> Self {
        self.identifying = identifying;
        self
    }
}

/// Entity-relationship diagram database
#[derive(Debug, Default)]
pub struct ErDatabase {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
    relationships: Vec<Relationship>,
}

impl ErDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty entity if the id is new
    pub fn ensure_entity(&mut self, id: &str) {
        if !self.index.contains_key(id) {
            self.index.insert(id.to_string(), self.entities.len());
            self.entities.push(Entity::new(id));
        }
    }

    /// Append an attribute, creating the entity if needed
    pub fn add_attribute(&mut self, entity: &str, attribute: Attribute) {
        self.ensure_entity(entity);
        if let Some(&slot) = self.index.get(entity) {
            self.entities[slot].attributes.push(attribute);
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn entity_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Number of relationships pointing at an entity
    pub fn incoming_count(&self, id: &str) -> usize {
        self.relationships.iter().filter(|r| r.target == id).count()
    }

    pub fn attribute_count(&self) -> usize {
        self.entities.iter().map(|e| e.attributes.len()).sum()
    }
}

impl Database for ErDatabase {
    type Node = Entity;
    type Edge = Relationship;

    /// Insert an entity; an existing entity gains the new attributes
    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        match self.index.get(&node.id) {
            Some(&slot) => {
                let existing = &mut self.entities[slot];
                existing.label = node.label;
                existing.attributes.extend(node.attributes);
            }
            None => {
                self.index.insert(node.id.clone(), self.entities.len());
                self.entities.push(node);
            }
        }
        Ok(())
    }

    fn add_edge(&mut self, mut edge: Self::Edge) -> Result<()> {
        self.ensure_entity(&edge.source);
        self.ensure_entity(&edge.target);
        if edge.id.is_empty() {
            edge.id = format!("r{}", self.relationships.len() + 1);
        }
        self.relationships.push(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&Self::Node> {
        self.index.get(id).map(|&slot| &self.entities[slot])
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.entities.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.relationships.iter()
    }

    fn clear(&mut self) {
        self.entities.clear();
        self.index.clear();
        self.relationships.clear();
    }

    fn node_count(&self) -> usize {
        self.entities.len()
    }

    fn edge_count(&self) -> usize {
        self.relationships.len()
    }
}
