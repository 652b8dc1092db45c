// SPDX-License-Identifier: PMPL-1.0-or-later
//! Keyboard operability - WCAG 2.1.1 Keyboard (Level A), 2.4.3 Focus Order (Level A)

use crate::error::Result;
use crate::finding::A11yError;
use crate::rules::RuleContext;

/// Elements that receive no keyboard interaction on their own
const NON_INTERACTIVE: &[&str] = &["div", "span", "p", "li", "td", "img", "section", "article"];

/// Handler attributes that give keyboard users an equivalent
const KEY_HANDLERS: &[&str] = &["onkeydown", "onkeyup", "onkeypress"];

pub fn check_positive_tabindex(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for element in ctx.select("[tabindex]")? {
        let raw = element.value().attr("tabindex").unwrap_or("").trim();
        let value = match raw.parse::<i32>() {
            Ok(v) => v,
            Err(_) => continue,
        };

        if value > 0 {
            errors.push(
                ctx.violation(
                    element,
                    &format!(
                        "<{}> has tabindex=\"{}\"; positive tabindex values override the natural focus order",
                        element.value().name(),
                        value
                    ),
                )
                .with_context("tabindex", value),
            );
        }
    }

    Ok(errors)
}

pub fn check_click_without_keyboard(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for element in ctx.select("[onclick]")? {
        let value = element.value();
        let tag = value.name();
        if !NON_INTERACTIVE.contains(&tag) {
            continue;
        }

        let has_key_handler = KEY_HANDLERS.iter().any(|h| value.attr(h).is_some());
        let has_role = value.attr("role").is_some();
        let has_tabindex = value.attr("tabindex").is_some();

        if !has_key_handler || !has_role || !has_tabindex {
            let mut missing = Vec::new();
            if !has_key_handler {
                missing.push("key handler");
            }
            if !has_role {
                missing.push("role");
            }
            if !has_tabindex {
                missing.push("tabindex");
            }

            errors.push(
                ctx.violation(
                    element,
                    &format!(
                        "<{}> handles clicks but is not keyboard operable (missing {})",
                        tag,
                        missing.join(", ")
                    ),
                )
                .with_context("tag", tag)
                .with_context("missing", missing),
            );
        }
    }

    Ok(errors)
}
