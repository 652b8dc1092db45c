// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document structure - WCAG 1.3.1 Info and Relationships, 2.4.6 Headings and Labels
//!
//! - Heading levels do not skip (h2 -> h4)
//! - Headings are not empty
//! - `ul`/`ol` only contain `li` (plus script/template), `li` only sits in a list

use crate::error::Result;
use crate::finding::A11yError;
use crate::rules::{accessible_name, RuleContext};
use scraper::ElementRef;

/// Heading level from `h1`..`h6` or `role="heading"` + `aria-level`
fn heading_level(element: ElementRef<'_>) -> Option<u8> {
    let value = element.value();
    if value.attr("role").map(str::trim) == Some("heading") {
        return Some(
            value
                .attr("aria-level")
                .and_then(|l| l.trim().parse::<u8>().ok())
                .map(|l| l.clamp(1, 6))
                .unwrap_or(2),
        );
    }
    value
        .name()
        .strip_prefix('h')
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| (1..=6).contains(n))
}

const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, [role=\"heading\"]";

pub fn check_heading_order(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();
    let mut previous: Option<u8> = None;

    // Fragments may legitimately start at any level; only jumps are flagged
    for element in ctx.select(HEADING_SELECTOR)? {
        let level = match heading_level(element) {
            Some(level) => level,
            None => continue,
        };

        if let Some(prev) = previous {
            if level > prev + 1 {
                errors.push(
                    ctx.violation(
                        element,
                        &format!(
                            "Heading level jumps from h{} to h{}; levels should increase by one",
                            prev, level
                        ),
                    )
                    .with_context("previousLevel", prev)
                    .with_context("level", level),
                );
            }
        }
        previous = Some(level);
    }

    Ok(errors)
}

pub fn check_empty_heading(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for element in ctx.select(HEADING_SELECTOR)? {
        let level = match heading_level(element) {
            Some(level) => level,
            None => continue,
        };
        if accessible_name(element).is_none() {
            errors.push(
                ctx.violation(element, "Heading has no text content")
                    .with_context("level", level),
            );
        }
    }

    Ok(errors)
}

/// Children permitted directly inside `ul`/`ol`
const LIST_CHILDREN: &[&str] = &["li", "script", "template"];

pub fn check_list_structure(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mut errors = Vec::new();

    for list in ctx.select("ul, ol")? {
        if list.value().attr("role").is_some() {
            continue;
        }
        let invalid: Vec<String> = list
            .children()
            .filter_map(ElementRef::wrap)
            .map(|c| c.value().name().to_string())
            .filter(|name| !LIST_CHILDREN.contains(&name.as_str()))
            .collect();

        if !invalid.is_empty() {
            errors.push(
                ctx.violation(
                    list,
                    &format!(
                        "<{}> directly contains <{}>; lists may only contain <li> elements",
                        list.value().name(),
                        invalid.join(">, <")
                    ),
                )
                .with_context("invalidChildren", invalid),
            );
        }
    }

    for item in ctx.select("li")? {
        let parent = item
            .parent()
            .and_then(ElementRef::wrap)
            .map(|p| (p.value().name().to_string(), p.value().attr("role").map(str::to_string)));

        let in_list = match &parent {
            Some((name, None)) => matches!(name.as_str(), "ul" | "ol" | "menu"),
            Some((_, Some(role))) => role == "list",
            None => false,
        };

        if !in_list {
            let parent_name = parent.map(|(n, _)| n).unwrap_or_default();
            errors.push(
                ctx.violation(
                    item,
                    &format!("<li> is not contained in a <ul>, <ol>, or <menu> (parent is <{}>)", parent_name),
                )
                .with_context("parent", parent_name),
            );
        }
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Markup;
    use crate::rules::find_rule;

    fn run(rule: &str, markup: &str) -> Vec<A11yError> {
        let parsed = Markup::parse(markup).expect("parse");
        let spec = find_rule(rule).expect("rule");
        (spec.check)(&RuleContext::new(&parsed, None, spec)).expect("check")
    }

    #[test]
    fn test_heading_order_ok() {
        let errors = run("heading-order", "<h2>Section</h2><h3>Sub</h3><h2>Next</h2><h3>Sub</h3>");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_heading_skip() {
        let errors = run("heading-order", r#"<h1>Title</h1><h3>Skipped</h3><div role="heading" aria-level="6">Deep</div>"#);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].context["previousLevel"], 1);
        assert_eq!(errors[0].context["level"], 3);
        assert_eq!(errors[1].context["level"], 6);
    }

    #[test]
    fn test_empty_heading() {
        let errors = run("empty-heading", "<h2>  </h2><h3>Fine</h3><h4><img src=\"x\" alt=\"Logo text\"></h4>");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].context["level"], 2);
    }

    #[test]
    fn test_list_children() {
        let errors = run("list", "<ul><li>a</li><div>b</div><p>c</p></ul><ol><li>ok</li></ol>");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("<div>, <p>"));
    }

    #[test]
    fn test_orphan_list_item() {
        let errors = run("list", r#"<div><li>orphan</li></div><div role="list"><li>ok</li></div>"#);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].context["parent"], "div");
    }
}
