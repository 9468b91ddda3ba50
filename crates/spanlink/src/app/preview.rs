//! Canned demonstration data shown while a task is only being previewed.

use crate::app::params::Language;
use crate::app::source::{SourceElement, SourceSentence};
use crate::domain::model::{EntityId, Span, SpanList};

/// Id of "Japan" in [`preview_source`].
const JAPAN: EntityId = 3;

/// "can I see the tourist places in Japan", with "Japan" as the only entity.
pub fn preview_source() -> SourceSentence {
    SourceSentence::new([
        SourceElement::plain("can").with_meta("@sys.ignore"),
        SourceElement::plain(" I see the tourist places in "),
        SourceElement::entity("Japan", "location", "@sys.location"),
    ])
}

/// A fully annotated translation of [`preview_source`], when one exists for `language`.
pub fn preview_translation(language: Language) -> SpanList {
    let spans = match language {
        Language::Korean => vec![
            Span::resolved("일본", JAPAN),
            Span::plain("의 관광지를 볼 수 있습니까?"),
        ],
        Language::Russian => vec![
            Span::plain("я могу увидеть туристические места в "),
            Span::resolved("Японии", JAPAN),
        ],
        Language::French => vec![
            Span::plain("puis-je voir les lieux touristiques au "),
            Span::resolved("Japon", JAPAN),
        ],
        Language::Italian => vec![
            Span::plain("posso vedere i posti turistici in "),
            Span::resolved("Giappone", JAPAN),
        ],
        Language::Spanish => vec![
            Span::plain("puedo ver los lugares turísticos en "),
            Span::resolved("Japón", JAPAN),
        ],
        Language::Portuguese => vec![
            Span::plain("posso ver os lugares turísticos no "),
            Span::resolved("Japão", JAPAN),
        ],
        Language::German | Language::BrazilianPortuguese => Vec::new(),
    };
    SpanList::from_spans(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::validation::is_valid;

    #[test]
    fn preview_translations_are_valid() {
        let source = preview_source();
        for language in Language::all() {
            let spans = preview_translation(*language);
            if spans.is_empty() {
                continue;
            }
            assert!(
                is_valid(&spans, source.required_entities()),
                "{language} preview should be valid"
            );
        }
    }

    #[test]
    fn languages_without_canned_data_start_empty() {
        assert!(preview_translation(Language::German).is_empty());
        assert_eq!(preview_translation(Language::French).len(), 2);
    }
}
