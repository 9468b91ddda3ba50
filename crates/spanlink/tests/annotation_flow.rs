use insta::assert_snapshot;
use spanlink::app::params::{Language, SessionParams};
use spanlink::app::session::{Event, Session, SessionError};
use spanlink::app::source::SourceSentence;
use spanlink::app::validation::{BARE_ENTITIES_WARNING, Level};
use spanlink::domain::model::Tag;

const SOURCE: &str = r#"{"data":[{"text":"I can see the tourist places in "},{"text":"Japan","alias":"location","meta":"@sys.location"}]}"#;

fn korean_session() -> Session {
    let params =
        SessionParams::new(Language::Korean, "https://example.test/").with_assignment_id("A7");
    let source = SourceSentence::from_json(SOURCE).expect("source parses");
    Session::new(params, source)
}

#[test]
fn preview_answer_matches_submitted_payload() {
    let session = Session::preview(SessionParams::new(Language::French, "https://example.test"));
    let json = session.answer_json().expect("answer serializes");
    assert_snapshot!(json, @r#"{"count":0,"data":[{"userDefined":false,"text":"puis-je voir les lieux touristiques au "},{"text":"Japon","alias":"location","meta":"@sys.location","userDefined":true}]}"#);
}

#[test]
fn preview_sessions_never_submit() {
    let session = Session::preview(SessionParams::new(Language::Russian, "https://example.test"));
    assert!(session.is_valid());
    assert!(!session.can_submit());
    assert!(matches!(session.submission(), Err(SessionError::PreviewMode)));
}

#[test]
fn korean_translation_is_linked_by_character_offsets() {
    let mut session = korean_session();
    for event in [
        Event::Edit("일본의 관광지를 볼 수 있을까요".into()),
        Event::Select { start: 0, end: 2 },
    ] {
        session.apply(&event).expect("event applies");
    }
    assert_eq!(session.spans().get(0).map(|span| span.tag), Some(Tag::Unresolved));
    assert!(!session.is_valid());

    session
        .apply(&Event::Assign { span: 0, entity: 2 })
        .expect("entity assigns");
    assert!(session.diagnostics().is_empty());

    let submission = session.submission().expect("submission builds");
    assert_eq!(submission.action, "https://example.test/mturk/externalSubmit");
    assert_eq!(submission.field("assignmentId"), Some("A7"));
    assert_snapshot!(submission.field("translation").unwrap_or_default(), @r#"{"count":0,"data":[{"text":"일본","alias":"location","meta":"@sys.location","userDefined":true},{"userDefined":false,"text":"의 관광지를 볼 수 있을까요"}]}"#);
}

#[test]
fn bare_entities_are_valid_but_warned() {
    let mut session = korean_session();
    session.edit("일본");
    session.select(0, 2).expect("selection applies");
    session.assign(0, 2).expect("entity assigns");

    assert!(session.is_valid());
    let diagnostics = session.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].level, Level::Warning);
    assert_eq!(diagnostics[0].message, BARE_ENTITIES_WARNING);
}

#[test]
fn failed_events_leave_the_translation_untouched() {
    let mut session = korean_session();
    session.edit("일본의 관광지");
    let before = session.spans().clone();

    assert!(session.select(3, 99).is_err());
    assert!(session.assign(0, 1).is_err());
    assert!(session.unassign(5).is_err());
    assert_eq!(session.spans(), &before);
}

#[test]
fn editing_drops_existing_links() {
    let mut session = korean_session();
    session.edit("일본");
    session.select(0, 2).expect("selection applies");
    session.assign(0, 2).expect("entity assigns");

    session.edit("일본에");
    assert_eq!(session.spans().len(), 1);
    assert_eq!(session.spans().get(0).map(|span| span.tag), Some(Tag::Untagged));
    assert_eq!(session.diagnostics()[0].message, r#"location ("Japan") is not selected."#);
}
