// SPDX-License-Identifier: PMPL-1.0-or-later
//! Form labelling - WCAG 3.3.2 Labels or Instructions (Level A)
//!
//! Every form control needs a programmatic label: a `<label for>`, a wrapping
//! `<label>`, `aria-label`, `aria-labelledby`, or `title`. A placeholder alone
//! does not count.

use crate::error::Result;
use crate::finding::A11yError;
use crate::rules::RuleContext;
use scraper::ElementRef;

/// Input types that do not need a visible label
const EXEMPT_INPUT_TYPES: &[&str] = &["hidden", "submit", "reset", "button", "image"];

fn has_attr(element: &ElementRef<'_>, name: &str) -> bool {
    element
        .value()
        .attr(name)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

fn is_wrapped_in_label(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == "label")
}

pub fn check_labels(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let label_targets: Vec<String> = ctx
        .select("label[for]")?
        .into_iter()
        .filter_map(|l| l.value().attr("for").map(|f| f.trim().to_string()))
        .collect();

    let mut errors = Vec::new();

    for element in ctx.select("input, select, textarea")? {
        let value = element.value();
        let kind = value.attr("type").unwrap_or("text").to_lowercase();
        if value.name() == "input" && EXEMPT_INPUT_TYPES.contains(&kind.as_str()) {
            continue;
        }
        // Hidden mirrors of custom controls; aria-hidden-focus covers focusability
        if value.attr("aria-hidden").map(str::trim) == Some("true") {
            continue;
        }

        let labelled_by_for = value
            .id()
            .map(|id| label_targets.iter().any(|t| t == id))
            .unwrap_or(false);

        if labelled_by_for
            || is_wrapped_in_label(element)
            || has_attr(&element, "aria-label")
            || has_attr(&element, "aria-labelledby")
            || has_attr(&element, "title")
        {
            continue;
        }

        let placeholder_only = has_attr(&element, "placeholder");
        let control = if value.name() == "input" {
            format!("<input type=\"{}\">", kind)
        } else {
            format!("<{}>", value.name())
        };

        let message = if placeholder_only {
            format!(
                "{} relies on its placeholder as a label; placeholders disappear on input and are not announced reliably",
                control
            )
        } else {
            format!(
                "{} has no associated label, aria-label, or aria-labelledby",
                control
            )
        };

        let mut error = ctx
            .violation(element, &message)
            .with_context("control", value.name())
            .with_context("placeholderOnly", placeholder_only);
        if let Some(id) = value.id() {
            error = error.with_context("id", id);
        }
        errors.push(error);
    }

    Ok(errors)
}
