//! Sequence diagram layout algorithm
//!
//! Participants sit in one row; messages are stacked below in declaration
//! order. Gaps between neighbouring participants widen when a message label
//! would not fit across the span it covers.

use anyhow::Result;
use tracing::{debug, span, Level};
use unicode_width::UnicodeWidthStr;

use super::database::{Participant, SequenceDatabase};
use crate::core::{lexicon, Database, LayoutAlgorithm, LayoutConfig, NodeShape, Position};

/// Height of a participant header box
const HEADER_HEIGHT: i32 = 40;
/// Vertical distance between consecutive messages
const ROW_HEIGHT: i32 = 50;

/// Positioned participant header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedParticipant {
    pub id: String,
    pub position: Position,
}

impl PositionedParticipant {
    /// X of the lifeline
    pub fn lifeline_x(&self) -> i32 {
        self.position.center_x()
    }
}

/// Vertical slot of one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSlot {
    pub from_x: i32,
    pub to_x: i32,
    pub y: i32,
}

/// Layout result containing all positioned elements
#[derive(Debug, Clone)]
pub struct SequenceLayoutResult {
    pub participants: Vec<PositionedParticipant>,
    /// One slot per message, in timeline order
    pub messages: Vec<MessageSlot>,
    /// Y where every lifeline ends
    pub lifeline_end: i32,
    pub width: i32,
    pub height: i32,
}

/// Sequence diagram layout algorithm
pub struct SequenceLayoutAlgorithm {
    config: LayoutConfig,
}

impl SequenceLayoutAlgorithm {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    fn participant_size(&self, participant: &Participant) -> (i32, i32) {
        let (width, _) = lexicon::node_size(NodeShape::Rectangle, &participant.label);
        (width, HEADER_HEIGHT)
    }

    /// Centre-to-centre distance after each participant
    fn gaps(&self, database: &SequenceDatabase, widths: &[i32]) -> Vec<i32> {
        let count = widths.len();
        let mut gaps: Vec<i32> = (0..count.saturating_sub(1))
            .map(|i| {
                let touching = (widths[i] + widths[i + 1]) / 2 + 40;
                self.config.horizontal_gap.max(touching)
            })
            .collect();

        for message in database.messages() {
            let (Some(from), Some(to)) = (
                database.participant_index(&message.from),
                database.participant_index(&message.to),
            ) else {
                continue;
            };
            let (left, right) = if from < to { (from, to) } else { (to, from) };
            if left == right {
                continue;
            }

            let needed = UnicodeWidthStr::width(message.text.as_str()) as i32 * 8 + 40;
            let span: i32 = gaps[left..right].iter().sum();
            if needed > span {
                let slots = (right - left) as i32;
                let per_slot = (needed - span + slots - 1) / slots;
                for gap in &mut gaps[left..right] {
                    *gap += per_slot;
                }
            }
        }

        gaps.into_iter()
            .map(|gap| self.config.snap(f64::from(gap)))
            .collect()
    }
}

impl Default for SequenceLayoutAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutAlgorithm<SequenceDatabase> for SequenceLayoutAlgorithm {
    type Output = SequenceLayoutResult;

    fn layout(&self, database: &SequenceDatabase) -> Result<Self::Output> {
        let layout_span = span!(
            Level::INFO,
            "layout_sequence",
            participant_count = database.node_count(),
            message_count = database.edge_count()
        );
        let _enter = layout_span.enter();

        let sizes: Vec<(i32, i32)> = database
            .nodes()
            .map(|participant| self.participant_size(participant))
            .collect();
        let widths: Vec<i32> = sizes.iter().map(|(w, _)| *w).collect();
        let gaps = self.gaps(database, &widths);

        let mut center_x = self.config.origin_x + 60;
        let mut participants = Vec::with_capacity(sizes.len());
        for (i, (participant, (width, height))) in database.nodes().zip(sizes.iter()).enumerate() {
            let x = self.config.snap(f64::from(center_x - width / 2));
            participants.push(PositionedParticipant {
                id: participant.id.clone(),
                position: Position::new(x, self.config.origin_y, *width, *height),
            });
            if let Some(gap) = gaps.get(i) {
                center_x += gap;
            }
        }

        let mut y = self.config.origin_y + HEADER_HEIGHT + ROW_HEIGHT;
        let mut messages = Vec::with_capacity(database.edge_count());
        for message in database.messages() {
            let lifeline = |id: &str| {
                database
                    .participant_index(id)
                    .and_then(|index| participants.get(index))
                    .map(PositionedParticipant::lifeline_x)
            };
            if let (Some(from_x), Some(to_x)) = (lifeline(&message.from), lifeline(&message.to)) {
                messages.push(MessageSlot { from_x, to_x, y });
                y += ROW_HEIGHT;
            }
        }
        let lifeline_end = y;

        let width = participants
            .iter()
            .map(|p| p.position.right())
            .max()
            .unwrap_or(0)
            + self.config.origin_x;
        let height = lifeline_end + self.config.origin_y;

        debug!(width, height, lifeline_end, "Sequence layout completed");
        Ok(SequenceLayoutResult {
            participants,
            messages,
            lifeline_end,
            width,
            height,
        })
    }

    fn name(&self) -> &'static str {
        "timeline"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}
