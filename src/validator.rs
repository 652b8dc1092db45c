// SPDX-License-Identifier: PMPL-1.0-or-later
//! Validation entry point.
//!
//! `validate` never fails: parse errors and rule faults become synthetic
//! `structure`/`critical` errors in the returned result.

use crate::config::{RuleSetting, ValidatorConfig};
use crate::error::GuardError;
use crate::finding::{
    A11yError, Category, Severity, ValidationResult, ValidationStatus, ValidationSummary,
};
use crate::fixes::fix_suggestions;
use crate::markup::Markup;
use crate::rules::{self, RuleContext, MARKUP_PARSE_RULE, RULES, RULE_EXECUTION_RULE};
use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Validate a markup fragment with an optional source path and config
pub fn validate(
    markup: &str,
    component: &str,
    file: Option<&str>,
    config: Option<&ValidatorConfig>,
) -> ValidationResult {
    let default_config;
    let config = match config {
        Some(c) => c,
        None => {
            default_config = ValidatorConfig::default();
            &default_config
        }
    };

    let started = Instant::now();
    let timestamp = Utc::now();

    let raw = match Markup::parse(markup) {
        Ok(parsed) => run_battery(&parsed, file, config),
        Err(e) => {
            warn!("{}: markup could not be parsed: {}", component, e);
            vec![markup_parse_error(&e, file)]
        }
    };

    let errors = finalize(raw, config);
    let summary = ValidationSummary::from_errors(&errors);
    let status = status_for(&errors);

    info!(
        "Validated {} ({}): {} error(s), status {}",
        component,
        file.unwrap_or("<inline>"),
        errors.len(),
        status
    );

    ValidationResult {
        status,
        component: component.to_string(),
        file: file.map(str::to_string),
        timestamp,
        errors,
        summary,
        duration_ms: started.elapsed().as_millis() as u64,
    }
}

/// Config-bound validator, convenient when validating many files
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn validate(&self, markup: &str, component: &str, file: Option<&str>) -> ValidationResult {
        validate(markup, component, file, Some(&self.config))
    }
}

/// Run every enabled rule in table order, applying severity overrides
fn run_battery(markup: &Markup<'_>, file: Option<&str>, config: &ValidatorConfig) -> Vec<A11yError> {
    let mut errors = Vec::new();

    for spec in RULES {
        let setting = config.rule(spec.name);
        if !setting.is_enabled() {
            debug!("Skipping disabled rule {}", spec.name);
            continue;
        }

        let ctx = RuleContext::new(markup, file, spec);
        match (spec.check)(&ctx) {
            Ok(found) => {
                debug!("Rule {} found {} violation(s)", spec.name, found.len());
                errors.extend(found.into_iter().map(|e| apply_setting(e, setting)));
            }
            Err(e) => {
                warn!("Rule {} failed: {}", spec.name, e);
                errors.push(rule_execution_error(spec.name, &e, file));
            }
        }
    }

    errors
}

/// Apply a `warn`/`error` override, recording the nominal severity when it changes
fn apply_setting(mut error: A11yError, setting: RuleSetting) -> A11yError {
    let effective = setting.apply(error.severity);
    if effective != error.severity {
        error
            .context
            .insert("nominalSeverity".to_string(), error.severity.as_str().into());
        error.severity = effective;
    }
    error
}

/// Filter by minimum severity, attach fixes, and assign ids
fn finalize(raw: Vec<A11yError>, config: &ValidatorConfig) -> Vec<A11yError> {
    let mut ordinals: BTreeMap<String, usize> = BTreeMap::new();

    raw.into_iter()
        .filter(|e| e.severity >= config.min_severity)
        .map(|e| {
            let fixes = if config.include_fixes {
                fix_suggestions(&e.rule, Some(&e.context))
            } else {
                Vec::new()
            };
            let ordinal = ordinals.entry(e.rule.clone()).or_insert(0);
            *ordinal += 1;
            let id = format!("{}-{}", e.rule, ordinal);
            A11yError { id, ..e.with_fixes(fixes) }
        })
        .collect()
}

fn status_for(errors: &[A11yError]) -> ValidationStatus {
    if errors.iter().any(|e| e.severity.blocks_release()) {
        ValidationStatus::Blocked
    } else if errors.is_empty() {
        ValidationStatus::Passed
    } else {
        ValidationStatus::Warning
    }
}

fn markup_parse_error(error: &GuardError, file: Option<&str>) -> A11yError {
    let reason = match error {
        GuardError::Markup(reason) => reason.clone(),
        other => other.to_string(),
    };
    let mut synthetic = A11yError::new(
        MARKUP_PARSE_RULE,
        Category::Structure,
        Severity::Critical,
        &format!("Markup could not be parsed: {}", reason),
    )
    .with_context("reason", reason)
    .with_wcag(&["4.1.1"])
    .with_help_url(&rules::parsing_help_url());
    if let Some(file) = file {
        synthetic = synthetic.with_context("file", file);
    }
    synthetic
}

fn rule_execution_error(rule: &str, error: &GuardError, file: Option<&str>) -> A11yError {
    let mut synthetic = A11yError::new(
        RULE_EXECUTION_RULE,
        Category::Structure,
        Severity::Critical,
        &format!("Rule {} could not be evaluated: {}", rule, error),
    )
    .with_context("failedRule", rule)
    .with_context("reason", error.to_string());
    if let Some(file) = file {
        synthetic = synthetic.with_context("file", file);
    }
    synthetic
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_markup_passes() {
        let result = validate(
            r#"<button class="btn">Save</button><img src="a.png" alt="Team photo at the offsite">"#,
            "Button",
            None,
            None,
        );
        assert_eq!(result.status, ValidationStatus::Passed);
        assert_eq!(result.summary.total, 0);
        assert!(result.summary.passed);
    }

    #[test]
    fn test_missing_alt_blocks() {
        let result = validate(r#"<img src="x.png">"#, "Avatar", None, None);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].category, Category::Images);
        assert_eq!(result.errors[0].severity, Severity::Critical);
        assert_eq!(result.errors[0].id, "image-alt-1");
        assert_eq!(result.status, ValidationStatus::Blocked);
    }

    #[test]
    fn test_disabled_rule_is_skipped() {
        let config = ValidatorConfig::default().with_rule("image-alt", RuleSetting::Off);
        let result = validate(r#"<img src="x.png">"#, "Avatar", None, Some(&config));
        assert!(result.errors.is_empty());
        assert_eq!(result.status, ValidationStatus::Passed);
    }

    #[test]
    fn test_warn_caps_severity() {
        let config = ValidatorConfig::default().with_rule("image-alt", RuleSetting::Warn);
        let result = validate(r#"<img src="x.png">"#, "Avatar", None, Some(&config));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].severity, Severity::Moderate);
        assert_eq!(result.errors[0].context["nominalSeverity"], "critical");
        assert_eq!(result.status, ValidationStatus::Warning);
    }

    #[test]
    fn test_error_raises_severity() {
        let config = ValidatorConfig::default().with_rule("th-scope", RuleSetting::Error);
        let result = validate(
            "<table><tr><th>Name</th></tr><tr><td>a</td></tr></table>",
            "Table",
            None,
            Some(&config),
        );
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].severity, Severity::Serious);
        assert_eq!(result.status, ValidationStatus::Blocked);
    }

    #[test]
    fn test_min_severity_applies_after_warn() {
        let config = ValidatorConfig::default()
            .with_rule("image-alt", RuleSetting::Warn)
            .with_min_severity(Severity::Serious);
        let result = validate(r#"<img src="x.png">"#, "Avatar", None, Some(&config));
        assert!(result.errors.is_empty());
        assert_eq!(result.status, ValidationStatus::Passed);
    }

    #[test]
    fn test_fixes_stripped() {
        let config = ValidatorConfig::default().without_fixes();
        let result = validate(r#"<img src="x.png">"#, "Avatar", None, Some(&config));
        assert!(result.errors[0].fixes.is_empty());
        assert_eq!(result.summary.auto_fixable, 0);

        let with_fixes = validate(r#"<img src="x.png">"#, "Avatar", None, None);
        assert!(!with_fixes.errors[0].fixes.is_empty());
        assert_eq!(with_fixes.summary.auto_fixable, 1);
    }

    #[test]
    fn test_malformed_markup_is_reported() {
        let result = validate(r#"<div><img src="x.png""#, "Broken", Some("Broken.html"), None);
        assert_eq!(result.errors.len(), 1);
        let error = &result.errors[0];
        assert_eq!(error.rule, MARKUP_PARSE_RULE);
        assert_eq!(error.category, Category::Structure);
        assert_eq!(error.severity, Severity::Critical);
        assert_eq!(result.status, ValidationStatus::Blocked);
    }

    #[test]
    fn test_ids_are_unique_per_rule() {
        let result = validate(r#"<img src="a.png"><img src="b.png">"#, "Gallery", None, None);
        let ids: Vec<_> = result.errors.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["image-alt-1", "image-alt-2"]);
    }

    #[test]
    fn test_location_requires_file() {
        let without = validate(r#"<img src="x.png">"#, "Avatar", None, None);
        assert!(without.errors[0].location.is_none());

        let with = validate("<div>\n  <img src=\"x.png\">\n</div>", "Avatar", Some("Avatar.html"), None);
        let location = with.errors[0].location.as_ref().expect("location");
        assert_eq!(location.file, "Avatar.html");
        assert_eq!((location.line, location.column), (2, 3));
    }

    #[test]
    fn test_fail_on_warnings_does_not_change_blocked() {
        let config = ValidatorConfig::default().failing_on_warnings();
        let result = validate(r#"<ul><div>x</div></ul>"#, "List", None, Some(&config));
        assert_eq!(result.status, ValidationStatus::Blocked);

        let minor = validate(r#"<img src="a.png" alt="photo">"#, "Img", None, Some(&config));
        assert_eq!(minor.status, ValidationStatus::Warning);
        assert!(minor.fails(config.fail_on_warnings));
        assert!(!minor.fails(false));
    }

    #[test]
    fn test_rule_execution_error_shape() {
        let error = rule_execution_error(
            "color-contrast",
            &GuardError::Selector { selector: "p[[[".to_string(), reason: "unexpected token".to_string() },
            None,
        );
        assert_eq!(error.rule, RULE_EXECUTION_RULE);
        assert_eq!(error.category, Category::Structure);
        assert_eq!(error.severity, Severity::Critical);
        assert_eq!(error.context["failedRule"], "color-contrast");
    }
}
