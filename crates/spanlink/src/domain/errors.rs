//! Domain-specific errors.

use thiserror::Error;

use crate::domain::model::EntityId;

/// Contract violations raised by the span model and the segmentation engine.
///
/// These are caller mistakes, not user mistakes: a selection crossing a tag boundary is not an
/// error, but a selection whose `start` lies after its `end` is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid selection: start {start} is after end {end}")]
    InvalidSelection { start: usize, end: usize },
    #[error("selection end {end} exceeds translation length {len}")]
    SelectionOutOfBounds { end: usize, len: usize },
    #[error("span index {index} out of range for {len} spans")]
    SpanIndexOutOfRange { index: usize, len: usize },
    #[error("invalid entity id {0}")]
    InvalidEntityId(i64),
    #[error("entity {0} is not declared in the source sentence")]
    UnknownEntity(EntityId),
}
