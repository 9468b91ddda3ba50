//! Domain models for translation spans, source entities, and selections.

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Identifier of an element of the source sentence (1-based, assigned in order).
pub type EntityId = u32;

/// Wire value marking a span that was selected but not yet linked to an entity.
pub const UNRESOLVED_ID: i64 = -1;

/// Annotation state of a [`Span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tag {
    /// Plain translation text.
    #[default]
    Untagged,
    /// Carved out by a selection, waiting for the translator to pick an entity.
    Unresolved,
    /// Linked to a source entity.
    Resolved(EntityId),
}

impl Tag {
    pub fn is_untagged(&self) -> bool {
        matches!(self, Tag::Untagged)
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Tag::Unresolved)
    }

    /// The linked entity, if any.
    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            Tag::Resolved(id) => Some(*id),
            _ => None,
        }
    }

    /// Wire representation: absent, `-1`, or the positive entity id.
    pub fn to_raw(self) -> Option<i64> {
        match self {
            Tag::Untagged => None,
            Tag::Unresolved => Some(UNRESOLVED_ID),
            Tag::Resolved(id) => Some(i64::from(id)),
        }
    }

    /// Parse the wire representation produced by [`Tag::to_raw`].
    pub fn from_raw(raw: Option<i64>) -> Result<Self, DomainError> {
        match raw {
            None => Ok(Tag::Untagged),
            Some(UNRESOLVED_ID) => Ok(Tag::Unresolved),
            Some(value) if value > 0 => EntityId::try_from(value)
                .map(Tag::Resolved)
                .map_err(|_| DomainError::InvalidEntityId(value)),
            Some(value) => Err(DomainError::InvalidEntityId(value)),
        }
    }
}

/// A contiguous run of the translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpan", into = "RawSpan")]
pub struct Span {
    pub text: String,
    pub tag: Tag,
}

impl Span {
    pub fn new(text: impl Into<String>, tag: Tag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tag::Untagged)
    }

    pub fn unresolved(text: impl Into<String>) -> Self {
        Self::new(text, Tag::Unresolved)
    }

    pub fn resolved(text: impl Into<String>, id: EntityId) -> Self {
        Self::new(text, Tag::Resolved(id))
    }

    /// Length in characters, the unit selection offsets are expressed in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Same text, different tag.
    pub fn retagged(&self, tag: Tag) -> Self {
        Self::new(self.text.clone(), tag)
    }
}

/// Serialized shape of a [`Span`]: `{"text": "...", "id": -1}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSpan {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
}

impl TryFrom<RawSpan> for Span {
    type Error = DomainError;

    fn try_from(raw: RawSpan) -> Result<Self, Self::Error> {
        Ok(Span::new(raw.text, Tag::from_raw(raw.id)?))
    }
}

impl From<Span> for RawSpan {
    fn from(span: Span) -> Self {
        RawSpan {
            id: span.tag.to_raw(),
            text: span.text,
        }
    }
}

/// Ordered, gapless partition of the translation into spans.
///
/// Every constructor normalizes, so two untagged spans are never adjacent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Span>", into = "Vec<Span>")]
pub struct SpanList {
    spans: Vec<Span>,
}

impl SpanList {
    /// An empty translation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from arbitrary spans, merging adjacent untagged runs.
    pub fn from_spans(spans: impl IntoIterator<Item = Span>) -> Self {
        Self {
            spans: normalize(spans),
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn get(&self, index: usize) -> Option<&Span> {
        self.spans.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Span> {
        self.spans.iter()
    }

    /// Number of spans (not characters).
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The full translation text.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Length of the full translation in characters.
    pub fn char_len(&self) -> usize {
        self.spans.iter().map(Span::char_len).sum()
    }

    /// Number of spans linked to `id`.
    pub fn count_entity(&self, id: EntityId) -> usize {
        self.spans
            .iter()
            .filter(|span| span.tag == Tag::Resolved(id))
            .count()
    }

    pub fn has_unresolved(&self) -> bool {
        self.spans.iter().any(|span| span.tag.is_unresolved())
    }

    /// Re-run normalization; a no-op for lists built through the public constructors.
    pub fn normalized(self) -> Self {
        Self::from_spans(self.spans)
    }

    pub fn into_spans(self) -> Vec<Span> {
        self.spans
    }
}

impl From<Vec<Span>> for SpanList {
    fn from(spans: Vec<Span>) -> Self {
        Self::from_spans(spans)
    }
}

impl From<SpanList> for Vec<Span> {
    fn from(list: SpanList) -> Self {
        list.spans
    }
}

impl<'a> IntoIterator for &'a SpanList {
    type Item = &'a Span;
    type IntoIter = std::slice::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

/// Merge textually adjacent untagged spans.
///
/// Tagged spans are appended as-is and never merged with a neighbour, even one carrying the same
/// tag. Empty untagged spans contribute no text and are dropped.
pub fn normalize(spans: impl IntoIterator<Item = Span>) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::new();
    for span in spans {
        if span.tag.is_untagged() {
            if span.text.is_empty() {
                continue;
            }
            if let Some(last) = merged.last_mut()
                && last.tag.is_untagged()
            {
                last.text.push_str(&span.text);
                continue;
            }
        }
        merged.push(span);
    }
    merged
}

/// A character range `[start, end)` selected in the translation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Build a selection, rejecting ranges whose start lies after their end.
    pub fn new(start: usize, end: usize) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidSelection { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// One element of the source sentence.
///
/// Elements carrying an `alias` are entities the translation has to link to exactly once; the
/// rest is plain source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    pub id: EntityId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    /// Any other fields of the incoming element, passed through to linked answers.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SourceSpan {
    pub fn is_entity(&self) -> bool {
        self.alias.is_some()
    }

    /// Label used in the entity picker and diagnostics, e.g. `location ("Japan")`.
    pub fn label(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{alias} (\"{}\")", self.text),
            None => format!("\"{}\"", self.text),
        }
    }
}
