//! Candidate selection against concrete release lines.

mod common;

use apilevel_core::ceiling::Candidate;
use apilevel_core::config::{ResolutionConfig, TieBreak};
use apilevel_core::specification::{ApiSpecification, SelectionKind};
use common::{JavaApi, ScoutApi, java_spec, scout_spec, v};

fn java_release(version: &str) -> u32 {
    java_spec(version)
        .require_api::<dyn JavaApi>()
        .expect("java resolves")
        .release()
}

fn scout_line(version: &str) -> &'static str {
    scout_spec(version)
        .require_api::<dyn ScoutApi>()
        .expect("scout resolves")
        .line()
}

// ─────────────────────────────────────────────────────────────────────────────
// Java {8, 11, 13}
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn exact_release_line_wins() {
    assert_eq!(java_release("8"), 8);
    assert_eq!(java_release("11"), 11);
    assert_eq!(java_release("13"), 13);
}

#[test]
fn patch_release_uses_its_line() {
    assert_eq!(java_release("11.2.14"), 11);
    assert_eq!(java_release("8.0.312"), 8);
}

#[test]
fn gap_between_lines_uses_next_ceiling() {
    assert_eq!(java_release("12"), 13);
    assert_eq!(java_release("9.0.4"), 11);
}

#[test]
fn older_than_known_falls_back_to_oldest() {
    let spec = java_spec("4.0.12");
    assert_eq!(spec.require_api::<dyn JavaApi>().unwrap().release(), 8);
    assert_eq!(spec.selection_kind(), SelectionKind::OlderThanKnown);
    assert_eq!(spec.max_level(), &v("8"));
}

#[test]
fn newer_than_known_falls_back_to_newest() {
    let spec = java_spec("21.0.1");
    assert_eq!(spec.require_api::<dyn JavaApi>().unwrap().release(), 13);
    assert_eq!(spec.selection_kind(), SelectionKind::NewerThanKnown);
    assert_eq!(spec.max_level(), &v("13"));
}

#[test]
fn unoverridden_method_answers_with_older_behaviour() {
    let spec = java_spec("13");
    let java13 = spec.require_api::<dyn JavaApi>().unwrap();
    assert_eq!(java13.release(), 13);
    assert_eq!(java13.http_client(), Some("java.net.http.HttpClient"));

    // Java13 alone answers every method; nothing is borrowed from Java11.
    assert!(spec.selected().name().contains("Java13"));
    let snapshot = spec.dump::<dyn JavaApi>().unwrap().to_json();
    assert_eq!(snapshot["release"], 13);
    assert_eq!(snapshot["http_client"], "java.net.http.HttpClient");

    let java8 = java_spec("8").require_api::<dyn JavaApi>().unwrap();
    assert_eq!(java8.http_client(), None);
}

#[test]
fn suffix_is_ignored_for_selection() {
    assert_eq!(java_release("11-SNAPSHOT"), 11);
    assert_eq!(java_release("12-ea"), 13);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scout {3, 4.3, 4}
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn nested_line_zero_minor_uses_major_line() {
    assert_eq!(scout_line("4.0"), "4");
    assert_eq!(scout_line("4"), "4");
}

#[test]
fn nested_line_below_nested_ceiling() {
    assert_eq!(scout_line("4.1"), "4.3");
    assert_eq!(scout_line("4.3"), "4.3");
    assert_eq!(scout_line("4.3.7"), "4.3");
    assert_eq!(scout_line("4.3-SNAPSHOT"), "4.3");
}

#[test]
fn nested_line_above_nested_ceiling_uses_major_line() {
    assert_eq!(scout_line("4.5"), "4");
    assert_eq!(scout_line("4.10.2"), "4");
}

#[test]
fn earlier_major_line() {
    assert_eq!(scout_line("3.2"), "3");
    assert_eq!(scout_line("3"), "3");
    assert_eq!(scout_line("1.9"), "3");
}

#[test]
fn beyond_every_line() {
    let spec = scout_spec("5.1");
    assert_eq!(spec.require_api::<dyn ScoutApi>().unwrap().line(), "4");
    assert_eq!(spec.max_level(), &v("4"));
}

#[test]
fn candidates_are_sorted_by_reach() {
    let spec = scout_spec("4");
    let ceilings: Vec<_> = spec
        .candidates()
        .iter()
        .map(|candidate| candidate.ceiling().to_string())
        .collect();
    assert_eq!(ceilings, ["3", "4.3", "4"]);
}

#[test]
fn display_reports_family_version_and_level() {
    let spec = scout_spec("4.1");
    let display = spec.to_string();
    assert!(display.contains("ScoutApi"));
    assert!(display.contains("4.1"));
    assert!(display.contains("max level 4.3"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Tie-break
// ─────────────────────────────────────────────────────────────────────────────

struct Named(&'static str);

impl ScoutApi for Named {
    fn line(&self) -> &'static str {
        self.0
    }
}

fn twins() -> Vec<Candidate> {
    ["first", "second"]
        .into_iter()
        .map(|name| {
            Candidate::new(move || Named(name))
                .named(name)
                .ceiling([7])
                .provides::<dyn ScoutApi>(|c| c)
                .build()
        })
        .collect()
}

#[test]
fn identical_ceilings_default_to_first_declared() {
    let spec = ApiSpecification::create::<dyn ScoutApi>(twins(), v("7")).unwrap();
    assert_eq!(spec.require_api::<dyn ScoutApi>().unwrap().line(), "first");
    assert_eq!(spec.selected().name(), "first");
}

#[test]
fn identical_ceilings_can_prefer_last_declared() {
    let config = ResolutionConfig::new().with_tie_break(TieBreak::LastDeclared);
    let spec = ApiSpecification::create_with_config::<dyn ScoutApi>(twins(), v("6"), config).unwrap();
    assert_eq!(spec.require_api::<dyn ScoutApi>().unwrap().line(), "second");
    assert_eq!(spec.selected().name(), "second");
}
