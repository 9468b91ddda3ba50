//! Segmentation engine: pure transformations of a [`SpanList`].
//!
//! Every operation borrows the current list and returns a new one. The caller (usually
//! [`crate::app::session::Session`]) decides whether to keep the result.

use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::{EntityId, Selection, Span, SpanList, Tag};

/// Replace the whole translation with `text`.
///
/// The input field always reports its full value, so there is no diff to replay: every prior tag
/// is dropped and the result is a single untagged span (or nothing for an empty field).
pub fn replace_text(text: &str) -> SpanList {
    SpanList::from_spans([Span::plain(text)])
}

/// Turn any pending (unresolved) span back into plain text.
pub fn resolve_pending(spans: &SpanList) -> SpanList {
    SpanList::from_spans(spans.iter().map(|span| {
        if span.tag.is_unresolved() {
            span.retagged(Tag::Untagged)
        } else {
            span.clone()
        }
    }))
}

/// Carve `selection` out of the untagged span containing it and mark it unresolved.
///
/// A zero-length selection returns the input untouched. Otherwise any stale unresolved span is
/// cleared first; if the selection then does not fit entirely inside one untagged span (it
/// crosses a tag boundary or sits inside a tagged span) the cleaned list is returned as-is.
pub fn apply_selection(spans: &SpanList, selection: Selection) -> Result<SpanList, DomainError> {
    let Selection { start, end } = selection;
    if start > end {
        return Err(DomainError::InvalidSelection { start, end });
    }
    if selection.is_empty() {
        return Ok(spans.clone());
    }
    let len = spans.char_len();
    if end > len {
        return Err(DomainError::SelectionOutOfBounds { end, len });
    }

    let cleaned = resolve_pending(spans);
    let mut output = Vec::with_capacity(cleaned.len() + 2);
    let mut pos = 0;
    let mut split = false;

    for span in &cleaned {
        let span_len = span.char_len();
        if !split && span.tag.is_untagged() && pos <= start && end <= pos + span_len {
            let left = byte_offset(&span.text, start - pos);
            let right = byte_offset(&span.text, end - pos);
            if pos < start {
                output.push(Span::plain(&span.text[..left]));
            }
            output.push(Span::unresolved(&span.text[left..right]));
            if end < pos + span_len {
                output.push(Span::plain(&span.text[right..]));
            }
            split = true;
        } else {
            output.push(span.clone());
        }
        pos += span_len;
    }

    if !split {
        debug!(start, end, "selection is not inside a single untagged span; ignoring");
        return Ok(cleaned);
    }

    debug!(start, end, "selection marked as unresolved");
    Ok(SpanList::from_spans(output))
}

/// Link the span at `index` to `entity`.
///
/// Uniqueness of the link is left to validation.
pub fn assign_entity(
    spans: &SpanList,
    index: usize,
    entity: EntityId,
) -> Result<SpanList, DomainError> {
    if entity == 0 {
        return Err(DomainError::InvalidEntityId(0));
    }
    retag(spans, index, Tag::Resolved(entity))
}

/// Drop the tag of the span at `index`, merging it into untagged neighbours.
pub fn unassign_entity(spans: &SpanList, index: usize) -> Result<SpanList, DomainError> {
    retag(spans, index, Tag::Untagged)
}

fn retag(spans: &SpanList, index: usize, tag: Tag) -> Result<SpanList, DomainError> {
    if index >= spans.len() {
        return Err(DomainError::SpanIndexOutOfRange {
            index,
            len: spans.len(),
        });
    }
    debug!(index, ?tag, "retagging span");
    Ok(SpanList::from_spans(spans.iter().enumerate().map(
        |(idx, span)| {
            if idx == index {
                span.retagged(tag)
            } else {
                span.clone()
            }
        },
    )))
}

/// Byte offset of the `chars`-th character of `text` (or its end).
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(idx, _)| idx)
}
