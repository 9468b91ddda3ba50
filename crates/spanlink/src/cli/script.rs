//! Replay scripts: a source sentence plus the translator events to run against it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::app::params::{Language, SessionParams};
use crate::app::session::{Event, Session};
use crate::app::source::SourceSentence;
use crate::domain::model::SpanList;

/// The user-say payload, inline or as the JSON string a task URL carries.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SourcePayload {
    Encoded(String),
    Inline(serde_json::Value),
}

impl SourcePayload {
    pub fn load(self) -> Result<SourceSentence> {
        match self {
            SourcePayload::Encoded(json) => SourceSentence::from_json(&json),
            SourcePayload::Inline(value) => SourceSentence::from_value(value),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    pub source: SourcePayload,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub assignment_id: Option<String>,
    /// Translation to start from instead of an empty one.
    #[serde(default)]
    pub spans: Option<SpanList>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl ReplayScript {
    /// Read a script, as YAML for `.yaml`/`.yml` files and JSON otherwise.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read replay script {}", path.display()))?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "yaml" | "yml"));
        if is_yaml {
            Self::from_yaml(&data)
                .with_context(|| format!("invalid YAML replay script {}", path.display()))
        } else {
            serde_json::from_str(&data)
                .with_context(|| format!("invalid JSON replay script {}", path.display()))
        }
    }

    /// Parse a YAML script. Events are written as single-key maps (`- edit: "..."`), not tags.
    pub fn from_yaml(data: &str) -> Result<Self, serde_yaml::Error> {
        let deserializer = serde_yaml::Deserializer::from_str(data);
        serde_yaml::with::singleton_map_recursive::deserialize(deserializer)
    }

    /// Run every event against a fresh session built from `defaults`.
    pub fn run(self, defaults: SessionParams) -> Result<Session> {
        let mut params = defaults;
        if let Some(language) = self.language {
            params.language = language;
        }
        if let Some(assignment_id) = self.assignment_id {
            params = params.with_assignment_id(assignment_id);
        }

        let source = self.source.load()?;
        let mut session = Session::new(params, source);
        if let Some(spans) = self.spans {
            session = session.with_spans(spans);
        }

        for (index, event) in self.events.iter().enumerate() {
            session
                .apply(event)
                .with_context(|| format!("event #{} ({event:?}) failed", index + 1))?;
        }
        Ok(session)
    }
}
