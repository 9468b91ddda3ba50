//! Session parameters supplied by the hosting page: target language, preview flag, submission.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Assignment id the task marketplace uses while a worker is only previewing a task.
pub const PREVIEW_ASSIGNMENT_ID: &str = "ASSIGNMENT_ID_NOT_AVAILABLE";

/// Path appended to the submission base URL.
pub const SUBMIT_PATH: &str = "/mturk/externalSubmit";

/// Supported target languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    Korean,
    Russian,
    French,
    Italian,
    Spanish,
    Portuguese,
    German,
    BrazilianPortuguese,
}

impl Language {
    /// Language code as it appears in task URLs.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::Russian => "ru",
            Language::French => "fr",
            Language::Italian => "it",
            Language::Spanish => "es",
            Language::Portuguese => "pt",
            Language::German => "de",
            Language::BrazilianPortuguese => "pt-br",
        }
    }

    /// Display label for headings.
    pub fn label(&self) -> &'static str {
        match self {
            Language::Korean => "Korean",
            Language::Russian => "Russian",
            Language::French => "French",
            Language::Italian => "Italian",
            Language::Spanish => "Spanish",
            Language::Portuguese => "Portuguese (Portugal)",
            Language::German => "German",
            Language::BrazilianPortuguese => "Portuguese (Brazil)",
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Language::Korean,
            Language::Russian,
            Language::French,
            Language::Italian,
            Language::Spanish,
            Language::Portuguese,
            Language::German,
            Language::BrazilianPortuguese,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Language::all()
            .iter()
            .copied()
            .find(|language| language.code() == normalized)
            .ok_or(LanguageParseError::UnknownLanguage(normalized))
    }
}

impl TryFrom<String> for Language {
    type Error = LanguageParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_owned()
    }
}

/// Error returned when parsing a [`Language`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LanguageParseError {
    #[error("unknown language code '{0}'")]
    UnknownLanguage(String),
}

/// Everything the shell knows about the task before the translator starts typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    pub language: Language,
    #[serde(default)]
    pub preview: bool,
    #[serde(default)]
    pub assignment_id: Option<String>,
    pub submit_to: String,
}

impl SessionParams {
    pub fn new(language: Language, submit_to: impl Into<String>) -> Self {
        Self {
            language,
            preview: false,
            assignment_id: None,
            submit_to: submit_to.into(),
        }
    }

    pub fn with_assignment_id(mut self, assignment_id: impl Into<String>) -> Self {
        self.assignment_id = Some(assignment_id.into());
        self
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Preview mode shows canned data and never submits.
    pub fn is_preview(&self) -> bool {
        self.preview || self.assignment_id.as_deref() == Some(PREVIEW_ASSIGNMENT_ID)
    }

    /// Form action the answer is posted to.
    pub fn submit_url(&self) -> String {
        format!("{}{SUBMIT_PATH}", self.submit_to.trim_end_matches('/'))
    }
}
