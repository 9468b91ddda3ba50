//! The annotation session: the single owner of the current span list.
//!
//! Every event runs the pure segmentation engine against the current list and swaps in the
//! result, so a failed operation leaves the session exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::answer::Answer;
use crate::app::params::SessionParams;
use crate::app::preview::{preview_source, preview_translation};
use crate::app::segmentation;
use crate::app::source::SourceSentence;
use crate::app::validation::{Diagnostic, Validator};
use crate::domain::errors::DomainError;
use crate::domain::model::{EntityId, Selection, SpanList};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("submission is disabled while previewing a task")]
    PreviewMode,
    #[error("translation is not ready for submission")]
    NotValid,
    #[error("failed to serialize answer payload")]
    Serialize(#[from] serde_json::Error),
}

/// A translator action, as reported by the input field and the entity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// The input field now holds this text.
    Edit(String),
    /// Characters `[start, end)` were selected.
    Select { start: usize, end: usize },
    /// The span at `span` was linked to `entity`.
    Assign { span: usize, entity: EntityId },
    /// The link of the span at `span` was removed.
    Unassign { span: usize },
}

/// The form the hosting page posts once the translation is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

impl Submission {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    params: SessionParams,
    source: SourceSentence,
    spans: SpanList,
    validator: Validator,
}

impl Session {
    /// Start annotating `source` with an empty translation.
    pub fn new(params: SessionParams, source: SourceSentence) -> Self {
        Self {
            params,
            source,
            spans: SpanList::new(),
            validator: Validator::default(),
        }
    }

    /// A session pre-populated with the canned demonstration data for the target language.
    pub fn preview(params: SessionParams) -> Self {
        let spans = preview_translation(params.language);
        let params = params.with_preview(true);
        Self {
            params,
            source: preview_source(),
            spans,
            validator: Validator::default(),
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Replace the current translation, e.g. to restore a shell-side snapshot.
    pub fn with_spans(mut self, spans: SpanList) -> Self {
        self.spans = spans;
        self
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn source(&self) -> &SourceSentence {
        &self.source
    }

    pub fn spans(&self) -> &SpanList {
        &self.spans
    }

    /// Whether the source sentence has anything to link to.
    pub fn annotation_enabled(&self) -> bool {
        self.source.has_entities()
    }

    pub fn edit(&mut self, text: &str) {
        self.spans = segmentation::replace_text(text);
        debug!(chars = self.spans.char_len(), "translation replaced");
    }

    /// Mark a selection as pending.
    ///
    /// Malformed selections are rejected even when the source declares no entities; a valid one
    /// is then ignored, since there is nothing to link it to.
    pub fn select(&mut self, start: usize, end: usize) -> Result<(), SessionError> {
        let selection = Selection::new(start, end)?;
        let spans = segmentation::apply_selection(&self.spans, selection)?;
        if !self.annotation_enabled() {
            debug!(start, end, "annotation disabled; selection ignored");
            return Ok(());
        }
        self.spans = spans;
        Ok(())
    }

    /// Link a span to one of the source sentence's entities.
    pub fn assign(&mut self, index: usize, entity: EntityId) -> Result<(), SessionError> {
        if self.source.find_entity(entity).is_none() {
            return Err(DomainError::UnknownEntity(entity).into());
        }
        self.spans = segmentation::assign_entity(&self.spans, index, entity)?;
        Ok(())
    }

    pub fn unassign(&mut self, index: usize) -> Result<(), SessionError> {
        self.spans = segmentation::unassign_entity(&self.spans, index)?;
        Ok(())
    }

    pub fn apply(&mut self, event: &Event) -> Result<(), SessionError> {
        match event {
            Event::Edit(text) => {
                self.edit(text);
                Ok(())
            }
            Event::Select { start, end } => self.select(*start, *end),
            Event::Assign { span, entity } => self.assign(*span, *entity),
            Event::Unassign { span } => self.unassign(*span),
        }
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.validator
            .diagnostics(&self.spans, self.source.required_entities())
    }

    pub fn is_valid(&self) -> bool {
        self.validator
            .is_valid(&self.spans, self.source.required_entities())
    }

    /// Whether the submit button should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.params.is_preview() && self.is_valid()
    }

    pub fn answer(&self) -> Answer {
        Answer::build(&self.spans, &self.source)
    }

    pub fn answer_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string(&self.answer())?)
    }

    /// Build the submission form, refusing in preview mode or while the translation is invalid.
    pub fn submission(&self) -> Result<Submission, SessionError> {
        if self.params.is_preview() {
            return Err(SessionError::PreviewMode);
        }
        if !self.is_valid() {
            return Err(SessionError::NotValid);
        }

        let translation = self.answer_json()?;
        let action = self.params.submit_url();
        info!(%action, spans = self.spans.len(), "submission ready");
        Ok(Submission {
            action,
            fields: vec![
                (
                    "assignmentId".to_owned(),
                    self.params.assignment_id.clone().unwrap_or_default(),
                ),
                ("translation".to_owned(), translation),
            ],
        })
    }
}
