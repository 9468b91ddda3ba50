//! Loading the source sentence a translation is annotated against.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::model::{EntityId, SourceSpan};

/// One element of an incoming user-say payload, before ids are assigned.
///
/// Unknown fields are kept in `extra`; an empty `alias` counts as no alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceElement {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceElement {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alias: None,
            meta: None,
            extra: Map::new(),
        }
    }

    pub fn entity(
        text: impl Into<String>,
        alias: impl Into<String>,
        meta: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            alias: Some(alias.into()),
            meta: Some(meta.into()),
            extra: Map::new(),
        }
    }

    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserSay {
    data: Vec<SourceElement>,
}

/// The source sentence split into its fixed spans, with ids assigned 1-based in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSentence {
    spans: Vec<SourceSpan>,
}

impl SourceSentence {
    pub fn new(elements: impl IntoIterator<Item = SourceElement>) -> Self {
        let spans = elements
            .into_iter()
            .zip(1..)
            .map(|(element, id)| SourceSpan {
                id,
                text: element.text,
                alias: element.alias.filter(|alias| !alias.is_empty()),
                meta: element.meta,
                extra: element.extra,
            })
            .collect();
        Self { spans }
    }

    /// Parse a `{"data": [...]}` user-say payload.
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: UserSay =
            serde_json::from_str(json).context("invalid user-say payload")?;
        Ok(Self::new(payload.data))
    }

    /// Parse a user-say payload that was already decoded into a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let payload: UserSay =
            serde_json::from_value(value).context("invalid user-say payload")?;
        Ok(Self::new(payload.data))
    }

    pub fn spans(&self) -> &[SourceSpan] {
        &self.spans
    }

    /// Elements with an alias; each must be linked exactly once.
    pub fn required_entities(&self) -> impl Iterator<Item = &SourceSpan> {
        self.spans.iter().filter(|span| span.is_entity())
    }

    /// Annotation only makes sense when the sentence declares at least one entity.
    pub fn has_entities(&self) -> bool {
        self.required_entities().next().is_some()
    }

    /// Look up any element, entity or not.
    pub fn find(&self, id: EntityId) -> Option<&SourceSpan> {
        self.spans.iter().find(|span| span.id == id)
    }

    /// Look up an element that can be linked to.
    pub fn find_entity(&self, id: EntityId) -> Option<&SourceSpan> {
        self.find(id).filter(|span| span.is_entity())
    }

    /// The sentence as plain text.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_SAY: &str = r#"{
        "data": [
            {"text": "can", "meta": "@sys.ignore"},
            {"text": " I see the tourist places in "},
            {"text": "Japan", "alias": "location", "meta": "@sys.location", "userDefined": true}
        ]
    }"#;

    #[test]
    fn assigns_sequential_ids() {
        let sentence = SourceSentence::from_json(USER_SAY).unwrap();
        let ids: Vec<_> = sentence.spans().iter().map(|span| span.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(sentence.text(), "can I see the tourist places in Japan");
    }

    #[test]
    fn exposes_only_aliased_elements_as_required() {
        let sentence = SourceSentence::from_json(USER_SAY).unwrap();
        let required: Vec<_> = sentence.required_entities().collect();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0].id, 3);
        assert_eq!(required[0].label(), "location (\"Japan\")");

        assert!(sentence.find(1).is_some());
        assert!(sentence.find_entity(1).is_none());
        assert!(sentence.find_entity(3).is_some());
        assert!(sentence.has_entities());
    }

    #[test]
    fn empty_alias_is_plain_text() {
        let sentence = SourceSentence::new([SourceElement {
            text: "hello".into(),
            alias: Some(String::new()),
            meta: None,
            extra: Map::new(),
        }]);
        assert!(!sentence.has_entities());
    }

    #[test]
    fn keeps_unknown_fields() {
        let sentence = SourceSentence::from_json(USER_SAY).unwrap();
        let japan = sentence.find_entity(3).unwrap();
        assert_eq!(japan.extra.get("userDefined"), Some(&Value::Bool(true)));
        assert!(sentence.find(2).unwrap().extra.is_empty());
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(SourceSentence::from_json(r#"{"items": []}"#).is_err());
        assert!(SourceSentence::from_json("not json").is_err());
    }
}
