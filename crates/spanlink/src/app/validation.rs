//! Completeness checks gating submission of an annotated translation.

use std::fmt;

use serde::Serialize;

use crate::domain::model::{SourceSpan, SpanList};

/// Shown once every entity is linked but the translator provided no connecting words.
pub const BARE_ENTITIES_WARNING: &str = "Any abuse of the system, such as not providing a complete translation, may result in your HIT being rejected.";

/// Shown while a selection is waiting for an entity.
pub const UNRESOLVED_MESSAGE: &str = "The entity is not selected.";

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message explaining why the translation cannot be submitted yet (or a warning once it can).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

impl Diagnostic {
    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Knobs for [`Validator`]; see the `[validation]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    pub warn_on_bare_entities: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            warn_on_bare_entities: true,
        }
    }
}

/// Checks a span list against the entities required by the source sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    options: ValidationOptions,
}

impl Validator {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    /// Whether the translation may be submitted.
    pub fn is_valid<'a>(
        &self,
        spans: &SpanList,
        required: impl IntoIterator<Item = &'a SourceSpan>,
    ) -> bool {
        is_valid(spans, required)
    }

    /// Diagnostics in display order. Evaluation stops at the first non-empty category.
    pub fn diagnostics<'a>(
        &self,
        spans: &SpanList,
        required: impl IntoIterator<Item = &'a SourceSpan>,
    ) -> Vec<Diagnostic> {
        if spans.char_len() == 0 {
            return Vec::new();
        }

        let required: Vec<&SourceSpan> = required
            .into_iter()
            .filter(|entity| entity.is_entity())
            .collect();

        let missing = required
            .iter()
            .filter(|entity| spans.count_entity(entity.id) == 0)
            .map(|entity| {
                Diagnostic::new(Level::Info, format!("{} is not selected.", entity.label()))
            });
        let duplicated = required
            .iter()
            .filter(|entity| spans.count_entity(entity.id) > 1)
            .map(|entity| {
                Diagnostic::new(
                    Level::Error,
                    format!("There are multiple {}.", entity.label()),
                )
            });
        let linking: Vec<Diagnostic> = missing.chain(duplicated).collect();
        if !linking.is_empty() {
            return linking;
        }

        if spans.has_unresolved() {
            return vec![Diagnostic::new(Level::Error, UNRESOLVED_MESSAGE)];
        }

        if self.options.warn_on_bare_entities && !has_plain_text(spans) {
            return vec![Diagnostic::new(Level::Warning, BARE_ENTITIES_WARNING)];
        }

        Vec::new()
    }
}

/// Non-empty translation, no pending selection, and every required entity linked exactly once.
pub fn is_valid<'a>(
    spans: &SpanList,
    required: impl IntoIterator<Item = &'a SourceSpan>,
) -> bool {
    if spans.char_len() == 0 || spans.has_unresolved() {
        return false;
    }
    required
        .into_iter()
        .filter(|entity| entity.is_entity())
        .all(|entity| spans.count_entity(entity.id) == 1)
}

/// [`Validator::diagnostics`] with default options.
pub fn diagnostics<'a>(
    spans: &SpanList,
    required: impl IntoIterator<Item = &'a SourceSpan>,
) -> Vec<Diagnostic> {
    Validator::default().diagnostics(spans, required)
}

fn has_plain_text(spans: &SpanList) -> bool {
    spans
        .iter()
        .filter(|span| span.tag.is_untagged())
        .any(|span| !span.text.trim().is_empty())
}
