use sift_core::{ChainStep, FilterError, Subfilter};

use crate::integration::common::{PAGE, engine, state_for};

const RULES: &str = r#"{
    "filter": ["strip"],
    "rules": [
        {"match": {"url": "https://status.example.org/"}, "filter": ["element-by-id:status", "html2text"]},
        {"match": {"url": "^https://status\\."}, "regex": true, "filter": [{"grep": "degraded"}]},
        {"match": {"url": "https://elsewhere.example.org/"}, "filter": "sha1sum"}
    ]
}"#;

#[test]
fn rules_auto_apply_in_declaration_order() {
    let (engine, config) = engine(RULES);
    let state = state_for("https://status.example.org/");

    let out = engine.run(&config.filter, &state, PAGE).unwrap();

    assert_eq!(out, "db: degraded");
}

#[test]
fn auto_apply_is_reproducible() {
    let (engine, _) = engine(RULES);
    let state = state_for("https://status.example.org/");

    let first = engine.auto_apply(&state, PAGE).unwrap();
    let second = engine.auto_apply(&state, PAGE).unwrap();

    assert_eq!(first, second);
}

#[test]
fn unmatched_job_passes_through_auto_mode() {
    let (engine, _) = engine(RULES);
    let state = state_for("https://unrelated.example.org/");

    assert_eq!(engine.auto_apply(&state, PAGE).unwrap(), PAGE);
}

#[test]
fn unknown_kind_aborts_without_output() {
    let (engine, _) = engine("{}");
    let state = state_for("https://status.example.org/");
    let steps = vec![
        ChainStep::new("strip", Subfilter::Absent),
        ChainStep::new("nonexistent", Subfilter::Absent),
    ];

    let err = engine.apply_steps(&steps, &state, PAGE).unwrap_err();

    assert!(matches!(err, FilterError::UnknownFilterKind { ref kind, .. } if kind == "nonexistent"));
}

#[test]
fn no_subfilter_units_reject_arguments() {
    let (engine, _) = engine("{}");
    let state = state_for("https://status.example.org/");

    for kind in ["strip", "sha1sum", "hexdump", "ical2text"] {
        let err = engine
            .apply(kind, Subfilter::scalar("anything"), &state, "data")
            .unwrap_err();
        assert!(
            matches!(err, FilterError::UnsupportedArgument { .. }),
            "{kind} accepted a subfilter"
        );
    }
}

#[test]
fn rule_with_unknown_step_fails_at_startup() {
    let config = sift_core::PipelineConfig::from_json(
        r#"{"rules": [{"match": {"url": "x"}, "filter": "no-such-filter"}]}"#,
    )
    .unwrap();

    let err = sift_filters::build_registry(config.rules).unwrap_err();

    assert!(matches!(err, FilterError::UnknownFilterKind { .. }));
}

#[test]
fn hash_of_filtered_content_is_stable() {
    let (engine, _) = engine("{}");
    let state = state_for("https://status.example.org/");
    let steps = ChainStep::parse_list("element-by-id:status,sha1sum").unwrap();

    let first = engine.apply_steps(&steps, &state, PAGE).unwrap();
    let noisy = PAGE.replace("<p>after</p>", "<p>after, changed</p>");
    let second = engine.apply_steps(&steps, &state, &noisy).unwrap();

    assert_eq!(first.len(), 40);
    assert_eq!(first, second);
}
