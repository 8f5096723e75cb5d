//! Study item domain model.
//!
//! # Responsibility
//! - Define the canonical `(subject, topic)` unit of curriculum work.
//! - Validate identity and label invariants on construction and decode.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `subject` and `topic` are non-blank; `subject` is stored trimmed.
//! - `is_completed` and `color` are carried through planning unchanged.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a study item.
pub type ItemId = Uuid;

/// Validation errors for `StudyItem` invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    NilId,
    BlankSubject,
    BlankTopic,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "item id must not be nil"),
            Self::BlankSubject => write!(f, "item subject must not be blank"),
            Self::BlankTopic => write!(f, "item topic must not be blank"),
        }
    }
}

impl Error for ItemValidationError {}

/// One unit of curriculum work, eventually assigned to exactly one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StudyItemWire")]
pub struct StudyItem {
    pub id: ItemId,
    /// Rotation key. Compared verbatim after trim.
    pub subject: String,
    /// Display text, never interpreted by planning.
    pub topic: String,
    /// Zero-based day in the plan. `None` until distributed.
    pub day_index: Option<u32>,
    pub is_completed: bool,
    /// UI tag color, e.g. `#ffcc00`.
    pub color: Option<String>,
}

#[derive(Deserialize)]
struct StudyItemWire {
    id: ItemId,
    subject: String,
    topic: String,
    #[serde(default)]
    day_index: Option<u32>,
    #[serde(default)]
    is_completed: bool,
    #[serde(default)]
    color: Option<String>,
}

impl TryFrom<StudyItemWire> for StudyItem {
    type Error = ItemValidationError;

    fn try_from(wire: StudyItemWire) -> Result<Self, Self::Error> {
        let mut item = Self::with_id(wire.id, wire.subject, wire.topic)?;
        item.day_index = wire.day_index;
        item.is_completed = wire.is_completed;
        item.color = wire.color;
        Ok(item)
    }
}

impl StudyItem {
    /// Creates a new item with a generated stable ID.
    ///
    /// Labels are not validated here; write paths call `validate()`.
    pub fn new(subject: impl Into<String>, topic: impl Into<String>) -> Self {
        Self::unchecked(Uuid::new_v4(), subject.into(), topic.into())
    }

    /// Creates an item with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    ///
    /// # Errors
    /// - Returns an error when `id` is nil or a label is blank.
    pub fn with_id(
        id: ItemId,
        subject: impl Into<String>,
        topic: impl Into<String>,
    ) -> Result<Self, ItemValidationError> {
        let item = Self::unchecked(id, subject.into(), topic.into());
        item.validate()?;
        Ok(item)
    }

    fn unchecked(id: ItemId, subject: String, topic: String) -> Self {
        Self {
            id,
            subject: subject.trim().to_string(),
            topic,
            day_index: None,
            is_completed: false,
            color: None,
        }
    }

    /// Checks identity and label invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.is_nil() {
            return Err(ItemValidationError::NilId);
        }
        if self.subject.trim().is_empty() {
            return Err(ItemValidationError::BlankSubject);
        }
        if self.topic.trim().is_empty() {
            return Err(ItemValidationError::BlankTopic);
        }
        Ok(())
    }

    /// Drops any previous day assignment.
    pub fn clear_day(&mut self) {
        self.day_index = None;
    }

    pub fn is_assigned(&self) -> bool {
        self.day_index.is_some()
    }
}
