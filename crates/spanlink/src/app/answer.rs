//! Serializing an annotated translation into the submitted answer payload.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::app::source::SourceSentence;
use crate::domain::model::{SourceSpan, Span, SpanList, Tag};

/// `{"count":0,"data":[...]}`, the payload posted as the `translation` form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub count: u32,
    pub data: Vec<AnswerSpan>,
}

/// One translation span on the wire. Internal tags never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerSpan {
    Linked(LinkedSpan),
    Plain(PlainSpan),
}

impl AnswerSpan {
    pub fn text(&self) -> &str {
        match self {
            AnswerSpan::Linked(span) => &span.text,
            AnswerSpan::Plain(span) => &span.text,
        }
    }

    pub fn is_user_defined(&self) -> bool {
        matches!(self, AnswerSpan::Linked(_))
    }
}

/// A span linked to a source entity: the entity's fields with the translated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedSpan {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    /// Extra fields of the source element, copied verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    user_defined: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainSpan {
    user_defined: bool,
    pub text: String,
}

impl Answer {
    /// Merge every linked span with its source entity.
    pub fn build(spans: &SpanList, source: &SourceSentence) -> Self {
        Self {
            count: 0,
            data: spans.iter().map(|span| answer_span(span, source)).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("failed to serialize answer payload")
    }

    /// The translation as plain text.
    pub fn text(&self) -> String {
        self.data.iter().map(AnswerSpan::text).collect()
    }
}

/// Serialize `spans` into the answer JSON string.
pub fn make_answer(spans: &SpanList, source: &SourceSentence) -> Result<String> {
    Answer::build(spans, source).to_json()
}

fn answer_span(span: &Span, source: &SourceSentence) -> AnswerSpan {
    match span.tag {
        Tag::Resolved(id) => {
            let entity = source.find(id);
            AnswerSpan::Linked(LinkedSpan {
                text: span.text.clone(),
                alias: entity.and_then(|entity| entity.alias.clone()),
                meta: entity.and_then(|entity| entity.meta.clone()),
                extra: entity.map(passthrough_fields).unwrap_or_default(),
                user_defined: true,
            })
        }
        Tag::Untagged | Tag::Unresolved => AnswerSpan::Plain(PlainSpan {
            user_defined: false,
            text: span.text.clone(),
        }),
    }
}

/// Source fields carried into a linked span, minus the ones the answer owns.
fn passthrough_fields(entity: &SourceSpan) -> Map<String, Value> {
    entity
        .extra
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "id" | "userDefined"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
