use sift_core::{ChainStep, FilterError, Subfilter};

use crate::integration::common::{PAGE, engine, state_for};

#[test]
fn element_by_id_isolates_subtree() {
    let (engine, _) = engine("{}");
    let state = state_for("https://status.example.org/");

    let out = engine
        .apply("element-by-id", Subfilter::scalar("status"), &state, PAGE)
        .unwrap();

    assert!(out.starts_with(r#"<div id="status" class="panel">"#));
    assert!(out.ends_with("</div>"));
    assert!(out.contains("<li>db: degraded</li>"));
    assert!(!out.contains("before"));
    assert!(!out.contains("after"));
    assert!(!out.contains("fake"));
}

#[test]
fn element_then_text_then_grep() {
    let (engine, _) = engine("{}");
    let state = state_for("https://status.example.org/");
    let steps = ChainStep::parse_list("element-by-class:panel,html2text,grepi:: ok$,strip").unwrap();

    let out = engine.apply_steps(&steps, &state, PAGE).unwrap();

    assert_eq!(out, "Service status\n    db: degraded");
}

#[test]
fn element_by_tag_reads_first_list_item() {
    let (engine, _) = engine("{}");
    let state = state_for("https://status.example.org/");

    let out = engine
        .apply("element-by-tag", Subfilter::scalar("li"), &state, PAGE)
        .unwrap();

    assert_eq!(out, "<li>api: ok</li>");
}

#[test]
fn element_filters_need_a_value() {
    let (engine, _) = engine("{}");
    let state = state_for("https://status.example.org/");

    let err = engine
        .apply("element-by-style", Subfilter::Absent, &state, PAGE)
        .unwrap_err();

    assert!(matches!(err, FilterError::MissingArgument { .. }));
}
