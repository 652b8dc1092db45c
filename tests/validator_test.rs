// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for the a11yguard validator

use a11yguard::config::{RuleSetting, ValidatorConfig};
use a11yguard::finding::{Category, Severity, ValidationResult, ValidationStatus};
use a11yguard::report::{generate_report, ReportFormat};
use a11yguard::rules::RULES;
use a11yguard::scanner;
use a11yguard::validate;
use std::collections::BTreeSet;
use std::path::Path;

fn rules_of(result: &ValidationResult) -> BTreeSet<&str> {
    result.errors.iter().map(|e| e.rule.as_str()).collect()
}

#[test]
fn test_scan_accessible_fixture() {
    let result = scanner::scan_file(
        Path::new("tests/fixtures/accessible.html"),
        &ValidatorConfig::default(),
    )
    .expect("scan should succeed");

    assert_eq!(
        result.status,
        ValidationStatus::Passed,
        "accessible fixture should pass, got {:?}",
        rules_of(&result)
    );
    assert_eq!(result.component, "accessible");
    assert_eq!(result.summary.total, 0);
}

#[test]
fn test_scan_inaccessible_fixture() {
    let result = scanner::scan_file(
        Path::new("tests/fixtures/inaccessible.html"),
        &ValidatorConfig::default(),
    )
    .expect("scan should succeed");

    assert_eq!(result.status, ValidationStatus::Blocked);

    let found = rules_of(&result);
    for rule in [
        "color-contrast",
        "tabindex",
        "click-events-have-key-events",
        "aria-valid-role",
        "button-name",
        "label",
        "image-alt",
        "image-redundant-alt",
        "link-name",
        "link-text-generic",
        "table-headers",
        "heading-order",
        "list",
    ] {
        assert!(found.contains(rule), "expected {} in {:?}", rule, found);
    }

    // Every error located in the file, every id unique
    assert!(result.errors.iter().all(|e| e.location.is_some()));
    let ids: BTreeSet<_> = result.errors.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), result.errors.len());
}

#[test]
fn test_vue_component_fixture() {
    let result = scanner::scan_file(
        Path::new("tests/fixtures/ProfileCard.vue"),
        &ValidatorConfig::default(),
    )
    .expect("scan should succeed");
    assert_eq!(result.component, "ProfileCard");
    assert!(result.is_passed(), "got {:?}", rules_of(&result));
}

#[test]
fn test_missing_alt_blocks_release() {
    let result = validate(r#"<img src="x.png">"#, "Avatar", None, None);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].category, Category::Images);
    assert_eq!(result.status, ValidationStatus::Blocked);
    assert_eq!(result.summary.by_category[&Category::Images], 1);
}

#[test]
fn test_disabled_rule_passes() {
    let config = ValidatorConfig::default().with_rule("image-alt", RuleSetting::Off);
    let result = validate(r#"<img src="x.png">"#, "Avatar", None, Some(&config));

    assert!(result.errors.is_empty());
    assert_eq!(result.status, ValidationStatus::Passed);
    assert!(result.summary.passed);
}

#[test]
fn test_disabled_rules_never_appear() {
    let markup = std::fs::read_to_string("tests/fixtures/inaccessible.html").expect("fixture");

    for spec in RULES {
        let config = ValidatorConfig::default().with_rule(spec.name, RuleSetting::Off);
        let result = validate(&markup, "Card", None, Some(&config));
        assert!(
            result.by_rule(spec.name).is_empty(),
            "{} reported while disabled",
            spec.name
        );
    }
}

#[test]
fn test_summary_sums_equal_total() {
    let markup = std::fs::read_to_string("tests/fixtures/inaccessible.html").expect("fixture");
    let result = validate(&markup, "Card", None, None);

    let summary = &result.summary;
    assert_eq!(summary.total, result.errors.len());
    assert_eq!(summary.by_severity.values().sum::<usize>(), summary.total);
    assert_eq!(summary.by_category.values().sum::<usize>(), summary.total);
    assert_eq!(summary.by_severity.len(), Severity::ALL.len());
    assert_eq!(summary.by_category.len(), Category::ALL.len());
}

#[test]
fn test_deterministic_output() {
    let markup = std::fs::read_to_string("tests/fixtures/inaccessible.html").expect("fixture");
    let first = validate(&markup, "Card", Some("Card.html"), None);
    let second = validate(&markup, "Card", Some("Card.html"), None);

    assert_eq!(first.errors, second.errors);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.status, second.status);
}

#[test]
fn test_discovery_order_follows_rule_table() {
    let markup = std::fs::read_to_string("tests/fixtures/inaccessible.html").expect("fixture");
    let result = validate(&markup, "Card", None, None);

    let position = |rule: &str| RULES.iter().position(|r| r.name == rule).unwrap_or(usize::MAX);
    let order: Vec<usize> = result.errors.iter().map(|e| position(&e.rule)).collect();
    let mut sorted = order.clone();
    sorted.sort();
    assert_eq!(order, sorted);
}

#[test]
fn test_malformed_markup_single_error() {
    let result = validate(r#"<button class="primary>Save</button>"#, "Button", None, None);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].rule, "markup-parse");
    assert_eq!(result.errors[0].category, Category::Structure);
    assert_eq!(result.errors[0].severity, Severity::Critical);
    assert_eq!(result.status, ValidationStatus::Blocked);
}

#[test]
fn test_warn_keeps_gate_open() {
    let config = ValidatorConfig::default()
        .with_rule("image-alt", RuleSetting::Warn)
        .with_rule("image-redundant-alt", RuleSetting::Off);
    let result = validate(r#"<img src="x.png">"#, "Avatar", None, Some(&config));

    assert_eq!(result.status, ValidationStatus::Warning);
    assert!(!result.fails(false));
    assert!(result.fails(true));
}

#[test]
fn test_min_severity_filter() {
    let markup = std::fs::read_to_string("tests/fixtures/inaccessible.html").expect("fixture");
    let config = ValidatorConfig::default().with_min_severity(Severity::Serious);
    let result = validate(&markup, "Card", None, Some(&config));

    assert!(!result.errors.is_empty());
    assert!(result.errors.iter().all(|e| e.severity >= Severity::Serious));
    assert_eq!(result.summary.count(Severity::Minor), 0);
    assert_eq!(result.summary.count(Severity::Moderate), 0);
}

#[test]
fn test_json_report_round_trip() {
    let markup = std::fs::read_to_string("tests/fixtures/inaccessible.html").expect("fixture");
    let result = validate(&markup, "Card", Some("tests/fixtures/inaccessible.html"), None);

    let json = generate_report(&result, ReportFormat::Json);
    let parsed: ValidationResult = serde_json::from_str(&json).expect("valid JSON");
    assert_eq!(parsed, result);
}

#[test]
fn test_recoverable_markup_is_not_a_parse_error() {
    for markup in [
        "<p><a href=/about title=Don't>About us</a></p>",
        "<p>Use a<b and don't forget</p>",
    ] {
        let result = validate(markup, "Copy", None, None);
        assert!(
            result.by_rule("markup-parse").is_empty(),
            "{} reported as unparseable",
            markup
        );
        assert_ne!(result.status, ValidationStatus::Blocked, "{}", markup);
    }
}
