// SPDX-License-Identifier: PMPL-1.0-or-later
//! Link naming - WCAG 2.4.4 Link Purpose (In Context)

use crate::error::Result;
use crate::finding::A11yError;
use crate::rules::{accessible_name, text_of, RuleContext};

/// Link texts that say nothing about the destination
const GENERIC_LINK_TEXT: &[&str] = &[
    "click here",
    "click",
    "here",
    "read more",
    "more",
    "learn more",
    "link",
    "this link",
    "details",
    "go",
];

pub fn check_link_name(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for element in ctx.select("a[href], [role=\"link\"]")? {
        if accessible_name(element).is_some() {
            continue;
        }

        let mut error = ctx.violation(
            element,
            "Link has no accessible name; add link text or an aria-label describing the destination",
        );
        if let Some(href) = element.value().attr("href") {
            error = error.with_context("href", href);
        }
        errors.push(error);
    }

    Ok(errors)
}

pub fn check_generic_link_text(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for element in ctx.select("a[href]")? {
        let value = element.value();
        if value.attr("aria-label").is_some() || value.attr("aria-labelledby").is_some() {
            continue;
        }

        let text = text_of(element);
        let normalized = text
            .to_lowercase()
            .trim_end_matches(|c: char| c.is_ascii_punctuation() || c == '…')
            .trim()
            .to_string();

        if GENERIC_LINK_TEXT.contains(&normalized.as_str()) {
            errors.push(
                ctx.violation(
                    element,
                    &format!("Link text \"{}\" does not describe its destination", text),
                )
                .with_context("text", text.clone()),
            );
        }
    }

    Ok(errors)
}
