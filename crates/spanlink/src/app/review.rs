//! Reading back submitted answer payloads.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::info;

/// An element of a submitted answer's `data` array. Fields beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedSpan {
    pub text: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub meta: Option<String>,
    #[serde(default)]
    pub user_defined: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct SubmittedAnswer {
    data: Vec<SubmittedSpan>,
}

/// A translated phrase linked to a source entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityLink {
    pub alias: String,
    pub meta: Option<String>,
    pub text: String,
}

/// Summary of one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewedAnswer {
    pub translation: String,
    pub links: Vec<EntityLink>,
}

impl ReviewedAnswer {
    pub fn from_spans(spans: &[SubmittedSpan]) -> Self {
        let translation = spans.iter().map(|span| span.text.as_str()).collect();
        let links = spans
            .iter()
            .filter(|span| span.user_defined)
            .filter_map(|span| {
                span.alias.as_ref().map(|alias| EntityLink {
                    alias: alias.clone(),
                    meta: span.meta.clone(),
                    text: span.text.clone(),
                })
            })
            .collect();
        Self { translation, links }
    }

    /// Parse a single `{"count":0,"data":[...]}` payload.
    pub fn from_json(json: &str) -> Result<Self> {
        let answer: SubmittedAnswer =
            serde_json::from_str(json).context("invalid answer payload")?;
        Ok(Self::from_spans(&answer.data))
    }
}

/// Load a JSON array of answer payloads, as collected from reviewed assignments.
pub fn review_file(path: &Path) -> Result<Vec<ReviewedAnswer>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read answers from {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&data)
        .with_context(|| format!("invalid JSON in {}", path.display()))?;

    let answers: Vec<SubmittedAnswer> = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)
            .with_context(|| format!("invalid answer payloads in {}", path.display()))?,
        serde_json::Value::Object(_) => vec![
            serde_json::from_value(value)
                .with_context(|| format!("invalid answer payload in {}", path.display()))?,
        ],
        _ => bail!("expected an answer payload or an array of them in {}", path.display()),
    };

    let reviewed: Vec<ReviewedAnswer> = answers
        .iter()
        .map(|answer| ReviewedAnswer::from_spans(&answer.data))
        .collect();
    info!(
        path = %path.display(),
        answers = reviewed.len(),
        "loaded submitted answers"
    );
    Ok(reviewed)
}
