// SPDX-License-Identifier: PMPL-1.0-or-later
//! Landmark checks - WCAG 1.3.1 Info and Relationships, 2.4.1 Bypass Blocks
//!
//! Component markup is usually a fragment, so a missing landmark is not an
//! error; duplicated landmarks are.

use crate::error::Result;
use crate::finding::A11yError;
use crate::rules::RuleContext;
use scraper::ElementRef;

/// Elements with an implicit landmark role, and the role they map to
const IMPLICIT_LANDMARKS: &[(&str, &str)] = &[
    ("nav", "navigation"),
    ("aside", "complementary"),
    ("main", "main"),
    ("header", "banner"),
    ("footer", "contentinfo"),
    ("search", "search"),
];

const LANDMARK_ROLES: &[&str] = &[
    "banner",
    "complementary",
    "contentinfo",
    "form",
    "main",
    "navigation",
    "region",
    "search",
];

/// Landmark role of an element, explicit role taking precedence
fn landmark_role(element: ElementRef<'_>) -> Option<&'static str> {
    if let Some(role) = element.value().attr("role") {
        let role = role.split_whitespace().next().unwrap_or("");
        return LANDMARK_ROLES.iter().copied().find(|r| *r == role);
    }
    let name = element.value().name();
    IMPLICIT_LANDMARKS
        .iter()
        .find(|(tag, _)| *tag == name)
        .map(|(_, role)| *role)
}

fn landmark_label(element: ElementRef<'_>) -> String {
    element
        .value()
        .attr("aria-label")
        .or_else(|| element.value().attr("aria-labelledby"))
        .map(|l| l.trim().to_lowercase())
        .unwrap_or_default()
}

pub fn check_one_main(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let mains = ctx.select("main, [role=\"main\"]")?;
    let count = mains.len();

    Ok(mains
        .into_iter()
        .skip(1)
        .map(|element| {
            ctx.violation(
                element,
                &format!(
                    "Markup contains {} main landmarks; there must be at most one",
                    count
                ),
            )
            .with_context("mainCount", count)
        })
        .collect())
}

pub fn check_unique_landmarks(ctx: &RuleContext<'_>) -> Result<Vec<A11yError>> {
    let candidates = ctx.select("nav, aside, header, footer, search, [role]")?;
    let mut seen: Vec<(&'static str, String)> = Vec::new();
    let mut errors = Vec::new();

    for element in candidates {
        let role = match landmark_role(element) {
            Some(role) if role != "main" => role,
            _ => continue,
        };
        // header/footer are only landmarks at the top level
        if matches!(element.value().name(), "header" | "footer")
            && element.value().attr("role").is_none()
            && element.ancestors().filter_map(ElementRef::wrap).any(|a| {
                matches!(a.value().name(), "article" | "aside" | "main" | "nav" | "section")
            })
        {
            continue;
        }

        let label = landmark_label(element);
        if seen.iter().any(|(r, l)| *r == role && *l == label) {
            let message = if label.is_empty() {
                format!(
                    "Multiple {} landmarks without distinguishing labels; give each an aria-label",
                    role
                )
            } else {
                format!("Multiple {} landmarks share the label \"{}\"", role, label)
            };
            errors.push(
                ctx.violation(element, &message)
                    .with_context("role", role)
                    .with_context("label", label.clone()),
            );
        } else {
            seen.push((role, label));
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
    fn test_single_main_passes() {
        assert!(run("landmark-one-main", "<main><p>x</p></main>").is_empty());
        assert!(run("landmark-one-main", "<p>fragment without landmarks</p>").is_empty());
    }

    #[test]
    fn test_duplicate_main() {
        let errors = run("landmark-one-main", r#"<main>a</main><div role="main">b</div>"#);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].context["mainCount"], 2);
        assert_eq!(errors[0].element, "<div role=\"main\">");
    }

    #[test]
    fn test_unlabelled_duplicate_nav() {
        let errors = run("landmark-unique", "<nav>a</nav><nav>b</nav>");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].context["role"], "navigation");
    }

    #[test]
    fn test_labelled_navs_are_unique() {
        let errors = run(
            "landmark-unique",
            r#"<nav aria-label="Primary">a</nav><nav aria-label="Footer">b</nav>"#,
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_nested_header_is_not_a_landmark() {
        let errors = run(
            "landmark-unique",
            "<header>site</header><article><header>post</header></article>",
        );
        assert!(errors.is_empty());
    }
}
