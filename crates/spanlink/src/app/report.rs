//! Human-readable rendering of an annotation session.

use anyhow::{Result, anyhow};
use minijinja::Environment;
use serde::Serialize;

use crate::app::palette::Palette;
use crate::app::session::Session;
use crate::app::validation::Diagnostic;
use crate::domain::model::Tag;

/// Built-in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// Source sentence, translation spans, entity table, and diagnostics.
    #[default]
    Full,
    /// A single line per span.
    Compact,
}

impl ReportStyle {
    fn template_name(&self) -> &'static str {
        match self {
            ReportStyle::Full => "report",
            ReportStyle::Compact => "compact",
        }
    }
}

/// Renders sessions through minijinja templates.
pub struct Renderer {
    env: Environment<'static>,
    palette: Palette,
}

impl Renderer {
    pub fn new(palette: Palette) -> Result<Self> {
        Ok(Self {
            env: default_environment()?,
            palette,
        })
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Build the template context without rendering it.
    pub fn context(&self, session: &Session) -> ReportContext {
        build_context(session, &self.palette)
    }

    pub fn render(&self, session: &Session, style: ReportStyle) -> Result<String> {
        let context = self.context(session);
        let name = style.template_name();
        self.env
            .get_template(name)
            .and_then(|template| template.render(&context))
            .map_err(|err| anyhow!("failed to render template '{name}': {err}"))
    }
}

fn default_environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("report", REPORT_TEMPLATE)
        .map_err(|err| anyhow!("failed to register report template: {err}"))?;
    env.add_template("compact", COMPACT_TEMPLATE)
        .map_err(|err| anyhow!("failed to register compact template: {err}"))?;
    Ok(env)
}

fn build_context(session: &Session, palette: &Palette) -> ReportContext {
    let source = session.source();
    let spans = session.spans();

    let source_spans = source
        .spans()
        .iter()
        .map(|span| ReportSourceSpan {
            id: span.id,
            text: span.text.clone(),
            alias: span.alias.clone(),
            color: span
                .is_entity()
                .then(|| palette.entity_color(span.id).name.to_owned()),
        })
        .collect();

    let translation = spans
        .iter()
        .enumerate()
        .map(|(index, span)| ReportSpan {
            index,
            text: span.text.clone(),
            tag: tag_label(span.tag, session),
            color: palette.tag_color(span.tag).map(|color| color.name.to_owned()),
            background: palette.background(span.tag),
        })
        .collect();

    let entities = source
        .required_entities()
        .map(|entity| ReportEntity {
            id: entity.id,
            label: entity.label(),
            linked: spans.count_entity(entity.id),
        })
        .collect();

    ReportContext {
        language: session.params().language.label().to_owned(),
        preview: session.params().is_preview(),
        source: source.text(),
        source_spans,
        translation_text: spans.text(),
        translation,
        entities,
        diagnostics: session.diagnostics(),
        valid: session.is_valid(),
    }
}

fn tag_label(tag: Tag, session: &Session) -> String {
    match tag {
        Tag::Untagged => "plain".to_owned(),
        Tag::Unresolved => "unresolved".to_owned(),
        Tag::Resolved(id) => session
            .source()
            .find(id)
            .and_then(|entity| entity.alias.clone())
            .unwrap_or_else(|| format!("#{id}")),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub language: String,
    pub preview: bool,
    pub source: String,
    pub source_spans: Vec<ReportSourceSpan>,
    pub translation_text: String,
    pub translation: Vec<ReportSpan>,
    pub entities: Vec<ReportEntity>,
    pub diagnostics: Vec<Diagnostic>,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSourceSpan {
    pub id: u32,
    pub text: String,
    pub alias: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSpan {
    pub index: usize,
    pub text: String,
    pub tag: String,
    pub color: Option<String>,
    pub background: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntity {
    pub id: u32,
    pub label: String,
    pub linked: usize,
}

const REPORT_TEMPLATE: &str = r#"English: {{ source }}
{% for span in source_spans %}
{% if span.alias %}
  [{{ span.id }}] {{ span.alias }} "{{ span.text }}" ({{ span.color }})
{% endif %}
{% endfor %}

{{ language }}{% if preview %} (preview){% endif %}: {{ translation_text }}
{% for span in translation %}
  {{ span.index }}. "{{ span.text }}" {{ span.tag }}{% if span.color %} ({{ span.color }}){% endif %}

{% endfor %}
{% if entities %}

Entities:
{% for entity in entities %}
  - {{ entity.label }}: linked {{ entity.linked }}x
{% endfor %}
{% endif %}
{% if diagnostics %}

Diagnostics:
{% for diagnostic in diagnostics %}
  [{{ diagnostic.level }}] {{ diagnostic.message }}
{% endfor %}
{% endif %}

Valid: {{ "yes" if valid else "no" }}
"#;

const COMPACT_TEMPLATE: &str = r#"{% for span in translation %}{{ span.index }} | {{ span.tag }} | {{ span.text }}
{% endfor %}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::palette::DaySeed;
    use crate::app::params::{Language, SessionParams};

    fn renderer() -> Renderer {
        Renderer::new(Palette::new(DaySeed::from_label("Mon Oct 19 2026"))).unwrap()
    }

    fn preview() -> Session {
        Session::preview(SessionParams::new(Language::French, "https://example.test"))
    }

    #[test]
    fn context_describes_spans_and_entities() {
        let renderer = renderer();
        let context = renderer.context(&preview());

        assert_eq!(context.language, "French");
        assert!(context.preview);
        assert!(context.valid);
        assert_eq!(context.translation.len(), 2);
        assert_eq!(context.translation[0].tag, "plain");
        assert!(context.translation[0].color.is_none());
        assert_eq!(context.translation[1].tag, "location");
        assert_eq!(
            context.translation[1].color.as_deref(),
            Some(renderer.palette().entity_color(3).name)
        );
        assert_eq!(context.entities[0].linked, 1);
    }

    #[test]
    fn renders_full_report() {
        let rendered = renderer().render(&preview(), ReportStyle::Full).unwrap();
        assert!(rendered.contains("English: can I see the tourist places in Japan"));
        assert!(
            rendered.contains("French (preview): puis-je voir les lieux touristiques au Japon")
        );
        assert!(rendered.contains("location (\"Japan\"): linked 1x"));
        assert!(rendered.contains("Valid: yes"));
        assert!(!rendered.contains("Diagnostics:"));
    }

    #[test]
    fn renders_compact_lines() {
        let rendered = renderer().render(&preview(), ReportStyle::Compact).unwrap();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "0 | plain | puis-je voir les lieux touristiques au ",
                "1 | location | Japon",
            ]
        );
    }

    #[test]
    fn lists_diagnostics_for_incomplete_translations() {
        let session = preview().with_spans(crate::app::segmentation::replace_text("au Japon"));
        let rendered = renderer().render(&session, ReportStyle::Full).unwrap();
        assert!(rendered.contains("[info] location (\"Japan\") is not selected."));
        assert!(rendered.contains("Valid: no"));
    }
}
