//! Entity-relationship layout
//!
//! Two strategies. A three-entity diagram with a single junction entity
//! (target of two or more relationships) puts the junction in the centre and
//! the other entities around it. Everything else goes on a square-ish grid
//! in declaration order.

use anyhow::Result;
use std::f64::consts::PI;
use tracing::{debug, span, Level};
use unicode_width::UnicodeWidthStr;

use super::database::{Entity, ErDatabase};
use crate::core::{Database, LayoutAlgorithm, LayoutConfig, Position};

/// Height of the entity title bar
pub const TITLE_HEIGHT: i32 = 40;
/// Height of one attribute row
pub const ROW_HEIGHT: i32 = 30;
const MIN_WIDTH: i32 = 160;

/// Box size of an entity: title bar plus one row per attribute
pub fn entity_size(entity: &Entity) -> (i32, i32) {
    let widest = entity
        .attributes
        .iter()
        .map(|a| UnicodeWidthStr::width(a.display().as_str()))
        .chain(std::iter::once(UnicodeWidthStr::width(entity.label.as_str())))
        .max()
        .unwrap_or(0) as i32;
    let width = MIN_WIDTH.max((widest * 8 + 40 + 9) / 10 * 10);
    let height = TITLE_HEIGHT + ROW_HEIGHT * entity.attributes.len() as i32;
    (width, height)
}

/// Placed entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedEntity {
    pub id: String,
    pub position: Position,
}

/// Result of the ER layout
#[derive(Debug, Clone)]
pub struct ErLayoutResult {
    pub entities: Vec<PositionedEntity>,
    /// Junction entity when the radial layout was used
    pub junction: Option<String>,
    pub width: i32,
    pub height: i32,
}

impl ErLayoutResult {
    pub fn position(&self, id: &str) -> Option<Position> {
        self.entities
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.position)
    }
}

/// ER layout algorithm
pub struct ErLayoutAlgorithm {
    config: LayoutConfig,
}

impl ErLayoutAlgorithm {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// The junction entity, if the radial layout applies
    pub fn find_junction(database: &ErDatabase) -> Option<&str> {
        if database.node_count() != 3 {
            return None;
        }
        let mut junctions = database
            .nodes()
            .filter(|entity| database.incoming_count(&entity.id) >= 2);
        match (junctions.next(), junctions.next()) {
            (Some(junction), None) => Some(junction.id.as_str()),
            _ => None,
        }
    }

    fn junction_layout(&self, database: &ErDatabase, junction: &str) -> Vec<PositionedEntity> {
        let sizes: Vec<(i32, i32)> = database.nodes().map(entity_size).collect();
        let max_w = sizes.iter().map(|(w, _)| *w).max().unwrap_or(MIN_WIDTH);
        let max_h = sizes.iter().map(|(_, h)| *h).max().unwrap_or(TITLE_HEIGHT);
        let radius = f64::from(self.config.horizontal_gap.max(max_w + 80));

        let center_x = f64::from(self.config.origin_x) + radius + f64::from(max_w) / 2.0;
        let center_y = f64::from(self.config.origin_y) + f64::from(max_h) / 2.0;
        let others = database.node_count().saturating_sub(1).max(1) as f64;

        let mut placed = Vec::with_capacity(sizes.len());
        let mut spoke = 0.0;
        for (entity, (width, height)) in database.nodes().zip(sizes) {
            let (cx, cy) = if entity.id == junction {
                (center_x, center_y)
            } else {
                let angle = PI + spoke * 2.0 * PI / others;
                spoke += 1.0;
                (
                    center_x + radius * angle.cos(),
                    center_y + radius * angle.sin(),
                )
            };
            placed.push(PositionedEntity {
                id: entity.id.clone(),
                position: Position::new(
                    self.config.snap(cx - f64::from(width) / 2.0),
                    self.config.snap(cy - f64::from(height) / 2.0),
                    width,
                    height,
                ),
            });
        }
        placed
    }

    fn grid_layout(&self, database: &ErDatabase) -> Vec<PositionedEntity> {
        let sizes: Vec<(i32, i32)> = database.nodes().map(entity_size).collect();
        let columns = (sizes.len() as f64).sqrt().ceil().max(1.0) as usize;
        let max_w = sizes.iter().map(|(w, _)| *w).max().unwrap_or(MIN_WIDTH);
        let max_h = sizes.iter().map(|(_, h)| *h).max().unwrap_or(TITLE_HEIGHT);
        let pitch_x = self.config.horizontal_gap.max(max_w + 80);
        let pitch_y = (max_h + 60).max(self.config.vertical_gap);

        database
            .nodes()
            .zip(sizes)
            .enumerate()
            .map(|(i, (entity, (width, height)))| {
                let x = self.config.origin_x + (i % columns) as i32 * pitch_x;
                let y = self.config.origin_y + (i / columns) as i32 * pitch_y;
                PositionedEntity {
                    id: entity.id.clone(),
                    position: Position::new(
                        self.config.snap(f64::from(x)),
                        self.config.snap(f64::from(y)),
                        width,
                        height,
                    ),
                }
            })
            .collect()
    }
}

impl Default for ErLayoutAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutAlgorithm<ErDatabase> for ErLayoutAlgorithm {
    type Output = ErLayoutResult;

    fn layout(&self, database: &ErDatabase) -> Result<Self::Output> {
        let layout_span = span!(
            Level::INFO,
            "layout_er",
            entity_count = database.node_count(),
            relationship_count = database.edge_count()
        );
        let _enter = layout_span.enter();

        let junction = Self::find_junction(database).map(str::to_string);
        let entities = match &junction {
            Some(junction) => self.junction_layout(database, junction),
            None => self.grid_layout(database),
        };
        debug!(junction = ?junction, "ER layout strategy chosen");

        let width = entities
            .iter()
            .map(|e| e.position.right())
            .max()
            .unwrap_or(0)
            + self.config.origin_x;
        let height = entities
            .iter()
            .map(|e| e.position.bottom())
            .max()
            .unwrap_or(0)
            + self.config.origin_y;

        Ok(ErLayoutResult {
            entities,
            junction,
            width,
            height,
        })
    }

    fn name(&self) -> &'static str {
        "er-grid"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

#[cfg(test)]
mod tests {
    use super::super::database::{Attribute, Relationship};
    use super::*;

    fn relate(db: &mut ErDatabase, source: &str, target: &str) {
        db.add_edge(Relationship::new(source, target, "||", "o{"))
            .unwrap();
    }

    #[test]
    fn test_entity_size_grows_with_attributes() {
        let mut entity = Entity::new("USER");
        assert_eq!(entity_size(&entity), (160, 40));
        entity.attributes.push(Attribute::new("string", "id"));
        entity.attributes.push(Attribute::new("string", "an_unusually_long_column_name"));
        let (width, height) = entity_size(&entity);
        assert_eq!(height, 100);
        assert!(width > 160);
        assert_eq!(width % 10, 0);
    }

    #[test]
    fn test_junction_sits_between_the_others() {
        let mut db = ErDatabase::new();
        relate(&mut db, "STUDENT", "ENROLLMENT");
        relate(&mut db, "COURSE", "ENROLLMENT");
        assert_eq!(ErLayoutAlgorithm::find_junction(&db), Some("ENROLLMENT"));

        let result = ErLayoutAlgorithm::new().layout(&db).unwrap();
        assert_eq!(result.junction.as_deref(), Some("ENROLLMENT"));
        let left = result.position("STUDENT").unwrap();
        let middle = result.position("ENROLLMENT").unwrap();
        let right = result.position("COURSE").unwrap();
        assert!(left.center_x() < middle.center_x());
        assert!(middle.center_x() < right.center_x());
        assert!(left.x >= 100);
    }

    #[test]
    fn test_no_junction_without_unique_hub() {
        let mut db = ErDatabase::new();
        relate(&mut db, "A", "B");
        relate(&mut db, "B", "C");
        assert!(ErLayoutAlgorithm::find_junction(&db).is_none());

        let mut db = ErDatabase::new();
        relate(&mut db, "A", "B");
        relate(&mut db, "C", "B");
        relate(&mut db, "D", "B");
        assert!(ErLayoutAlgorithm::find_junction(&db).is_none());
    }

    #[test]
    fn test_grid_is_square_ish() {
        let mut db = ErDatabase::new();
        for name in ["A", "B", "C", "D", "E"] {
            db.ensure_entity(name);
        }
        let result = ErLayoutAlgorithm::new().layout(&db).unwrap();
        assert!(result.junction.is_none());
        let ys: Vec<i32> = result.entities.iter().map(|e| e.position.y).collect();
        assert_eq!(ys[0], ys[1]);
        assert_eq!(ys[1], ys[2]);
        assert!(ys[3] > ys[2]);
        for entity in &result.entities {
            assert_eq!(entity.position.x % 10, 0);
            assert_eq!(entity.position.y % 10, 0);
        }
    }
}
