use memovox::script::generator::{generate, parse_script, split_sentences};
use memovox::script::keywords;
use memovox::script::themes::{Theme, ALL_THEMES};

#[test]
fn split_sentences_on_terminal_punctuation() {
    let parts = split_sentences("First one. Second!? And a trailing fragment");
    assert_eq!(
        parts,
        vec![
            "First one.".to_string(),
            "Second!?".to_string(),
            "And a trailing fragment".to_string(),
        ]
    );
}

#[test]
fn split_sentences_empty_input() {
    assert!(split_sentences("   ").is_empty());
}

#[test]
fn parse_script_collects_labelled_sections() {
    let script = parse_script(
        Theme::Focus,
        "[Intro]\nWelcome. Sit down.\n[Body]\nWork now.\n",
    );
    assert_eq!(script.sections.len(), 2);
    assert_eq!(script.sections[0].label.as_deref(), Some("Intro"));
    assert_eq!(script.sections[0].sentences.len(), 2);
    assert_eq!(script.sections[1].label.as_deref(), Some("Body"));
    assert_eq!(script.sections[1].sentences, vec!["Work now.".to_string()]);
}

#[test]
fn parse_script_without_headers_yields_one_section() {
    let script = parse_script(Theme::Focus, "Just a plain line. Another one.");
    assert_eq!(script.sections.len(), 1);
    assert_eq!(script.sections[0].label, None);
    assert_eq!(script.sections[0].sentences.len(), 2);
}

#[test]
fn sentence_ids_are_queue_wide_and_sequential() {
    let script = parse_script(Theme::Focus, "[Intro]\nHello.\n[Outro]\nBye.\n");
    let sentences = script.sentences();

    // Labels are spoken too: Intro, Hello., Outro, Bye.
    assert_eq!(sentences.len(), 4);
    for (i, s) in sentences.iter().enumerate() {
        assert_eq!(s.id, i);
    }
    assert_eq!(sentences[0].text, "Intro");
    assert_eq!(sentences[2].text, "Outro");
}

#[test]
fn every_theme_template_parses_nonempty() {
    for theme in ALL_THEMES {
        let script = parse_script(theme, theme.template());
        assert!(
            !script.sentences().is_empty(),
            "{:?} template produced no sentences",
            theme
        );
        assert_eq!(script.theme, theme);
    }
}

#[test]
fn theme_labels_round_trip() {
    for theme in ALL_THEMES {
        assert_eq!(Theme::from_label(theme.label()), Some(theme));
    }
    assert_eq!(Theme::from_label("daily flow"), Some(Theme::DailyFlow));
    assert_eq!(Theme::from_label("jazz"), None);
}

#[tokio::test]
async fn generate_returns_the_theme_script_after_the_delay() {
    let script = generate(Theme::Discovery).await.expect("canned template");
    assert_eq!(script.theme, Theme::Discovery);
    assert!(script.sections.iter().any(|s| s.label.as_deref() == Some("Intro")));
}

#[test]
fn keywords_combine_event_and_work_titles() {
    let summary = keywords::extract("Meeting about the project deadline today");
    assert_eq!(summary.title, "Project Meeting");
    assert_eq!(
        summary.keywords,
        vec![
            "Meeting".to_string(),
            "Project".to_string(),
            "Deadline".to_string(),
        ]
    );
    assert_eq!(summary.tag, "#Meeting");
}

#[test]
fn keywords_event_only_title() {
    let summary = keywords::extract("quick sync with the team");
    assert_eq!(summary.title, "Sync Focus");
}

#[test]
fn keywords_date_only_title() {
    let summary = keywords::extract("thinking about tomorrow");
    assert_eq!(summary.title, "Tomorrow's Journal");
    assert_eq!(summary.tag, "#Tomorrow");
}

#[test]
fn keywords_fallback_when_nothing_matches() {
    let summary = keywords::extract("random musings and nothing else");
    assert_eq!(summary.title, "Daily Insight");
    assert_eq!(
        summary.keywords,
        vec!["General".to_string(), "Memo".to_string()]
    );
    assert_eq!(summary.tag, "#General");
}
